/* Service code generation.
 *
 * Every method is classified into exactly one of three call shapes by
 * `call_shape`, evaluated once and never re-derived at emission sites:
 *
 *   1. Batched - a synthetic single-item accessor over a per-context
 *      batching loader, plus the underlying bulk method itself.
 *   2. Cached - a per-context loader memoizing on a structural hash of
 *      the request, coalescing duplicate in-flight calls.
 *   3. Plain - a direct encode/request/decode round trip.
 *
 * The generated service interface is usable for both the client side and
 * a promise-based server implementation. Emitted calls model eventual
 * completion only; cancellation is a documented limitation of the
 * generated surface, not of any particular transport. */

use std::fmt::Write;

use tsgen_types::{FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto};

use crate::codegen::Context;
use crate::error::GenResult;
use crate::options::ClientImpl;
use crate::schema::case::{camel_case, singular};
use crate::schema::source_info::{SourceInfo, fields};
use super::batch::{BatchPlan, detect_batch_method};
use super::fragment::Frag;
use super::helpers::maybe_add_comment;
use super::types::{request_type, response_observable, response_promise, response_type};

/* Type variable generated services are generic over when context passing
 * is on. `DataLoaders` is emitted into the same file. */
pub const CONTEXT_TYPE_VAR: &str = "Context extends DataLoaders";

#[derive(Debug)]
pub enum CallShape {
  Batched(BatchPlan),
  Cached,
  Plain,
}

/* The single resolution point for the per-method call-shape decision,
 * priority Batched > Cached > Plain. Batched and Cached require context
 * mode and a unary method; batch detection failing its structural
 * precondition falls through silently. */
pub fn call_shape(
  ctx: &Context,
  file: &FileDescriptorProto,
  service: &ServiceDescriptorProto,
  method: &MethodDescriptorProto,
) -> GenResult<CallShape> {
  if ctx.options.context && is_unary(method) {
    if let Some(plan) = detect_batch_method(ctx, file, service, method)? {
      return Ok(CallShape::Batched(plan));
    }
    if is_read_by_identifier(&method.name) {
      return Ok(CallShape::Cached);
    }
  }
  Ok(CallShape::Plain)
}

/* `Get` followed by an uppercase letter marks a read-by-identifier
 * method eligible for per-context caching. */
fn is_read_by_identifier(name: &str) -> bool {
  name
    .strip_prefix("Get")
    .and_then(|rest| rest.chars().next())
    .is_some_and(|c| c.is_ascii_uppercase())
}

fn is_unary(method: &MethodDescriptorProto) -> bool {
  !method.client_streaming && !method.server_streaming
}

fn method_name(ctx: &Context, name: &str) -> String {
  if ctx.options.lower_case_method_names {
    camel_case(name)
  } else {
    name.to_string()
  }
}

fn returns_observable(ctx: &Context, method: &MethodDescriptorProto) -> bool {
  ctx.options.return_as_stream
    || method.server_streaming
    || ctx.options.output_client_impl == ClientImpl::ObservableStream
}

/* Return type for a method's accessor. Batched and cached shapes are
 * loader-backed and therefore promise-based regardless of the streaming
 * options. */
fn method_return_type(
  ctx: &Context,
  method: &MethodDescriptorProto,
  shape: &CallShape,
) -> GenResult<Frag> {
  match shape {
    CallShape::Batched(_) | CallShape::Cached => response_promise(ctx, method),
    CallShape::Plain => {
      if returns_observable(ctx, method) {
        response_observable(ctx, method)
      } else {
        response_promise(ctx, method)
      }
    }
  }
}

fn reader() -> Frag {
  Frag::named("Reader", "protobufjs/minimal")
}

fn dataloader() -> Frag {
  Frag::default_import("DataLoader", "dataloader")
}

fn hash_fn() -> Frag {
  Frag::default_import("hash", "object-hash")
}

fn service_deprecated(service: &ServiceDescriptorProto) -> bool {
  service.options.as_ref().is_some_and(|o| o.deprecated)
}

fn method_deprecated(method: &MethodDescriptorProto) -> bool {
  method.options.as_ref().is_some_and(|o| o.deprecated)
}

/* Generates the interface for `service`. */
pub fn generate_service(
  ctx: &Context,
  file: &FileDescriptorProto,
  source_info: SourceInfo,
  service_index: usize,
  service: &ServiceDescriptorProto,
) -> GenResult<Frag> {
  let mut out = Frag::new();

  let service_path = [fields::FILE_SERVICE, service_index as i32];
  maybe_add_comment(&mut out, "", source_info.comment(&service_path), service_deprecated(service));

  let type_var = if ctx.options.context {
    format!("<{}>", CONTEXT_TYPE_VAR)
  } else {
    String::new()
  };
  writeln!(out, "export interface {}{} {{", service.name, type_var).unwrap();

  for (index, method) in service.method.iter().enumerate() {
    let method_path = [
      fields::FILE_SERVICE,
      service_index as i32,
      fields::SERVICE_METHOD,
      index as i32,
    ];
    maybe_add_comment(&mut out, "  ", source_info.comment(&method_path), method_deprecated(method));

    let shape = call_shape(ctx, file, service, method)?;
    let name = method_name(ctx, &method.name);
    let params = interface_params(ctx, method)?;
    let return_type = method_return_type(ctx, method, &shape)?;
    out.adopt(&params);
    out.adopt(&return_type);
    writeln!(out, "  {}({}): {};", name, params, return_type).unwrap();

    /* a bulk method also surfaces its synthetic single-item accessor */
    if let CallShape::Batched(plan) = &shape {
      maybe_add_comment(&mut out, "  ", None, method_deprecated(method));
      let single_name = method_name(ctx, &plan.single_method_name);
      out.adopt(&plan.input_type);
      out.adopt(&plan.output_type);
      writeln!(
        out,
        "  {}(ctx: Context, {}: {}): Promise<{}>;",
        single_name,
        singular(&plan.input_field_name),
        plan.input_type,
        plan.output_type
      )
      .unwrap();
    }
  }

  out.push_str("}\n");
  Ok(out)
}

fn interface_params(ctx: &Context, method: &MethodDescriptorProto) -> GenResult<Frag> {
  let mut params: Vec<Frag> = Vec::new();
  if ctx.options.context {
    params.push(Frag::lit("ctx: Context"));
  }

  let input_type = request_type(ctx, method)?;
  let mut request = Frag::new();
  request.adopt(&input_type);
  write!(request, "request: {}", input_type).unwrap();
  params.push(request);

  /* transport metadata is an interface-only affordance */
  if ctx.options.add_transport_metadata {
    let mut metadata = Frag::new();
    let metadata_type = Frag::named("Metadata", "grpc");
    metadata.adopt(&metadata_type);
    write!(metadata, "metadata?: {}", metadata_type).unwrap();
    params.push(metadata);
  }

  Ok(Frag::join(&params, ", "))
}

/* Generates the `FooServiceClientImpl` class backing the interface with
 * the transport abstraction. */
pub fn generate_service_client_impl(
  ctx: &Context,
  file: &FileDescriptorProto,
  service: &ServiceDescriptorProto,
) -> GenResult<Frag> {
  let name = &service.name;
  let interface = if ctx.options.context {
    format!("{}<Context>", name)
  } else {
    name.clone()
  };
  let type_var = if ctx.options.context {
    format!("<{}>", CONTEXT_TYPE_VAR)
  } else {
    String::new()
  };
  let rpc_type = if ctx.options.context { "Rpc<Context>" } else { "Rpc" };

  let mut out = Frag::new();
  writeln!(out, "export class {}ClientImpl{} implements {} {{", name, type_var, interface).unwrap();
  writeln!(out, "  private readonly rpc: {};", rpc_type).unwrap();
  writeln!(out, "\n  constructor(rpc: {}) {{", rpc_type).unwrap();
  out.push_str("    this.rpc = rpc;\n  }\n");

  for method in &service.method {
    match call_shape(ctx, file, service, method)? {
      CallShape::Batched(plan) => {
        out.push_str("\n");
        out.push(&generate_batching_rpc_method(ctx, &plan, method)?);
        out.push_str("\n");
        out.push(&generate_regular_rpc_method(ctx, file, service, method)?);
      }
      CallShape::Cached => {
        out.push_str("\n");
        out.push(&generate_caching_rpc_method(ctx, file, service, method)?);
      }
      CallShape::Plain => {
        out.push_str("\n");
        out.push(&generate_regular_rpc_method(ctx, file, service, method)?);
      }
    }
  }

  out.push_str("}\n");
  Ok(out)
}

/* Plain shape: encode, one transport round trip, decode. */
fn generate_regular_rpc_method(
  ctx: &Context,
  file: &FileDescriptorProto,
  service: &ServiceDescriptorProto,
  method: &MethodDescriptorProto,
) -> GenResult<Frag> {
  let name = method_name(ctx, &method.name);
  let input_type = request_type(ctx, method)?;
  let output_type = response_type(ctx, method)?;
  let reader = reader();
  let maybe_ctx = if ctx.options.context { "ctx, " } else { "" };
  let ctx_param = if ctx.options.context { "ctx: Context, " } else { "" };
  let service_name = format!("{}.{}", file.package, service.name);

  let mut out = Frag::new();
  out.adopt(&input_type);
  out.adopt(&output_type);
  out.adopt(&reader);
  maybe_add_comment(&mut out, "  ", None, method_deprecated(method));

  if returns_observable(ctx, method) {
    let from = Frag::named("from", "rxjs");
    let map = Frag::named("map", "rxjs/operators");
    out.adopt(&from);
    out.adopt(&map);
    writeln!(
      out,
      "  {}({}request: {}): Observable<{}> {{",
      name, ctx_param, input_type, output_type
    )
    .unwrap();
    out.adopt(&Frag::named("Observable", "rxjs"));
    writeln!(out, "    const data = {}.encode(request).finish();", input_type).unwrap();
    writeln!(
      out,
      "    const result = this.rpc.request({}\"{}\", \"{}\", data);",
      maybe_ctx, service_name, method.name
    )
    .unwrap();
    writeln!(
      out,
      "    return {}(result).pipe({}(data => {}.decode(new {}(data))));",
      from, map, output_type, reader
    )
    .unwrap();
    out.push_str("  }\n");
  } else {
    writeln!(
      out,
      "  {}({}request: {}): Promise<{}> {{",
      name, ctx_param, input_type, output_type
    )
    .unwrap();
    writeln!(out, "    const data = {}.encode(request).finish();", input_type).unwrap();
    writeln!(
      out,
      "    const promise = this.rpc.request({}\"{}\", \"{}\", data);",
      maybe_ctx, service_name, method.name
    )
    .unwrap();
    writeln!(
      out,
      "    return promise.then(data => {}.decode(new {}(data)));",
      output_type, reader
    )
    .unwrap();
    out.push_str("  }\n");
  }

  Ok(out)
}

/* Batched shape: the synthetic single-item accessor. Within one context's
 * lifetime, concurrent loads for the same key coalesce into at most one
 * underlying bulk call; distinct keys may share a call within one
 * scheduling window of the target runtime. */
fn generate_batching_rpc_method(
  ctx: &Context,
  plan: &BatchPlan,
  method: &MethodDescriptorProto,
) -> GenResult<Frag> {
  let single_name = method_name(ctx, &plan.single_method_name);
  let bulk_name = method_name(ctx, &method.name);
  let singular_param = singular(&plan.input_field_name);
  let dataloader = dataloader();
  let hash = hash_fn();

  let mut out = Frag::new();
  out.adopt(&plan.input_type);
  out.adopt(&plan.output_type);
  out.adopt(&dataloader);
  out.adopt(&hash);
  maybe_add_comment(&mut out, "  ", None, method_deprecated(method));

  writeln!(
    out,
    "  {}(ctx: Context, {}: {}): Promise<{}> {{",
    single_name, singular_param, plan.input_type, plan.output_type
  )
  .unwrap();
  writeln!(
    out,
    "    const dl = ctx.getDataLoader(\"{}\", () => {{",
    plan.unique_identifier
  )
  .unwrap();
  writeln!(
    out,
    "      return new {}<{}, {}>(({}) => {{",
    dataloader, plan.input_type, plan.output_type, plan.input_field_name
  )
  .unwrap();
  writeln!(out, "        const request = {{ {} }};", plan.input_field_name).unwrap();
  if plan.map_output {
    /* map-shaped output: demultiplex by key lookup, order-independent */
    writeln!(out, "        return this.{}(ctx, request).then(res => {{", bulk_name).unwrap();
    writeln!(
      out,
      "          return {}.map(key => res.{}[key]);",
      plan.input_field_name, plan.output_field_name
    )
    .unwrap();
    out.push_str("        });\n");
  } else {
    /* positional demultiplexing: response order is assumed to match
     * request order; the service is trusted, not verified */
    writeln!(
      out,
      "        /* assumes the response array preserves request order */"
    )
    .unwrap();
    writeln!(
      out,
      "        return this.{}(ctx, request).then(res => res.{});",
      bulk_name, plan.output_field_name
    )
    .unwrap();
  }
  writeln!(out, "      }}, {{ cacheKeyFn: {}, ...ctx.rpcDataLoaderOptions }});", hash).unwrap();
  out.push_str("    });\n");
  writeln!(out, "    return dl.load({});", singular_param).unwrap();
  out.push_str("  }\n");

  Ok(out)
}

/* Cached shape: no batching, but duplicate concurrent requests for the
 * same effective request value within one context resolve to a single
 * round trip. The cache key is a structural hash of the request, not
 * object identity. */
fn generate_caching_rpc_method(
  ctx: &Context,
  file: &FileDescriptorProto,
  service: &ServiceDescriptorProto,
  method: &MethodDescriptorProto,
) -> GenResult<Frag> {
  let name = method_name(ctx, &method.name);
  let input_type = request_type(ctx, method)?;
  let output_type = response_type(ctx, method)?;
  let unique_identifier = format!("{}.{}.{}", file.package, service.name, method.name);
  let service_name = format!("{}.{}", file.package, service.name);
  let reader = reader();
  let dataloader = dataloader();
  let hash = hash_fn();

  let mut out = Frag::new();
  out.adopt(&input_type);
  out.adopt(&output_type);
  out.adopt(&reader);
  out.adopt(&dataloader);
  out.adopt(&hash);
  maybe_add_comment(&mut out, "  ", None, method_deprecated(method));

  writeln!(
    out,
    "  {}(ctx: Context, request: {}): Promise<{}> {{",
    name, input_type, output_type
  )
  .unwrap();
  writeln!(out, "    const dl = ctx.getDataLoader(\"{}\", () => {{", unique_identifier).unwrap();
  writeln!(
    out,
    "      return new {}<{}, {}>((requests) => {{",
    dataloader, input_type, output_type
  )
  .unwrap();
  out.push_str("        const responses = requests.map(async request => {\n");
  writeln!(
    out,
    "          const data = {}.encode(request).finish();",
    input_type
  )
  .unwrap();
  writeln!(
    out,
    "          const response = await this.rpc.request(ctx, \"{}\", \"{}\", data);",
    service_name, method.name
  )
  .unwrap();
  writeln!(out, "          return {}.decode(new {}(response));", output_type, reader).unwrap();
  out.push_str("        });\n");
  out.push_str("        return Promise.all(responses);\n");
  writeln!(out, "      }}, {{ cacheKeyFn: {}, ...ctx.rpcDataLoaderOptions }});", hash).unwrap();
  out.push_str("    });\n");
  out.push_str("    return dl.load(request);\n");
  out.push_str("  }\n");

  Ok(out)
}

/* The transport abstraction generated clients call through. Kept
 * unexported so multi-file outputs do not collide on re-export. */
pub fn generate_rpc_type(ctx: &Context) -> Frag {
  let maybe_type_var = if ctx.options.context { "<Context>" } else { "" };
  let maybe_ctx_param = if ctx.options.context { "ctx: Context, " } else { "" };

  let mut out = Frag::new();
  writeln!(out, "interface Rpc{} {{", maybe_type_var).unwrap();
  writeln!(
    out,
    "  request({}service: string, method: string, data: Uint8Array): Promise<Uint8Array>;",
    maybe_ctx_param
  )
  .unwrap();
  out.push_str("}\n");
  out
}

/* The request-scoped context contract: a keyed registry of loaders living
 * exactly as long as the owning context, constructed explicitly on first
 * use. */
pub fn generate_data_loaders_type() -> Frag {
  let mut out = Frag::new();
  out.push_str("export interface DataLoaders {\n");
  out.push_str("  rpcDataLoaderOptions?: DataLoaderOptions;\n");
  out.push_str("  getDataLoader<T>(identifier: string, constructorFn: () => T): T;\n");
  out.push_str("}\n");
  out
}

pub fn generate_data_loader_options_type() -> Frag {
  let mut out = Frag::new();
  out.push_str("export interface DataLoaderOptions {\n");
  out.push_str("  cache?: boolean;\n");
  out.push_str("}\n");
  out
}
