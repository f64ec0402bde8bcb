pub mod ts;
pub mod ts_gen;

use tsgen_types::FileDescriptorProto;

use crate::error::GenResult;
use crate::options::{ClientImpl, GenerationOptions};
use crate::schema::source_info::SourceInfo;
use crate::schema::type_map::TypeMap;
use crate::schema::visit::{TypeDecl, collect_types};
use self::ts_gen::fragment::{Frag, render_file};

/* Read-only state shared by every resolver and emitter. The type map is
 * fully built before a Context is constructed. */
pub struct Context<'a> {
  pub options: &'a GenerationOptions,
  pub type_map: &'a TypeMap,
}

/* Generate one schema file. Returns the output path and the rendered
 * source text. */
pub fn generate_file(ctx: &Context, file: &FileDescriptorProto) -> GenResult<(String, String)> {
  let module_path = TypeMap::module_path(&file.name);
  let source_info = SourceInfo::new(file);

  let mut decls: Vec<Frag> = Vec::new();

  for visited in collect_types(file) {
    /* synthetic map entries exist only for map detection */
    if visited.is_map_entry() {
      continue;
    }
    match visited.decl {
      TypeDecl::Message(message) => {
        decls.push(ts::generate_interface(
          ctx,
          source_info,
          &visited.ts_name,
          message,
          &visited.source_path,
        )?);
        decls.push(ts::generate_default_constructor(ctx, &visited.ts_name, message)?);
      }
      TypeDecl::Enum(enum_desc) => {
        decls.push(ts::generate_enum(
          ctx,
          source_info,
          &visited.ts_name,
          enum_desc,
          &visited.source_path,
        ));
      }
    }
  }

  for (index, service) in file.service.iter().enumerate() {
    decls.push(ts_gen::services::generate_service(ctx, file, source_info, index, service)?);
    if ctx.options.output_client_impl != ClientImpl::None {
      decls.push(ts_gen::services::generate_service_client_impl(ctx, file, service)?);
    }
  }

  if !file.service.is_empty() {
    if ctx.options.output_client_impl != ClientImpl::None {
      decls.push(ts_gen::services::generate_rpc_type(ctx));
    }
    if ctx.options.context {
      decls.push(ts_gen::services::generate_data_loader_options_type());
      decls.push(ts_gen::services::generate_data_loaders_type());
    }
  }

  let body = Frag::join(&decls, "\n");
  Ok((format!("{}.ts", module_path), render_file(&body, &module_path)))
}
