/* Structural detection of "bulk" RPC methods.
 *
 * A method qualifies when its name carries the bulk marker prefix and both
 * its input and output messages consist of exactly one repeated field.
 * Detection failure is a normal, silent outcome - the method simply falls
 * through to a lower-priority call shape. */

use tsgen_types::{
  DescriptorProto, FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto,
};

use crate::codegen::Context;
use crate::error::GenResult;
use crate::schema::case::singular;
use crate::schema::type_map::TypeDesc;
use super::fragment::Frag;
use super::types::{basic_type_name, detect_map_type, is_repeated};

const BULK_PREFIX: &str = "Batch";
const SINGLE_PREFIX: &str = "Get";

/* `BatchGetWidgets` -> `GetWidget`: drop the bulk marker, ensure the
 * single-item prefix, singularize the trailing plural. */
fn single_method_name(bulk_name: &str) -> String {
  let stripped = bulk_name.strip_prefix(BULK_PREFIX).unwrap_or(bulk_name);
  if stripped.starts_with(SINGLE_PREFIX) {
    singular(stripped)
  } else {
    format!("{}{}", SINGLE_PREFIX, singular(stripped))
  }
}

/* The derived plan for a bulk method's synthetic single-item accessor. */
#[derive(Debug)]
pub struct BatchPlan {
  /* bulk name with the marker prefix swapped for the single-item prefix */
  pub single_method_name: String,
  pub input_field_name: String,
  /* element type of the input's sole repeated field */
  pub input_type: Frag,
  pub output_field_name: String,
  /* element type of the output's sole repeated field; for a map-shaped
   * output this is the map's value type */
  pub output_type: Frag,
  pub map_output: bool,
  /* batching/caching namespace key, unique per (package, service, method) */
  pub unique_identifier: String,
}

pub fn detect_batch_method(
  ctx: &Context,
  file: &FileDescriptorProto,
  service: &ServiceDescriptorProto,
  method: &MethodDescriptorProto,
) -> GenResult<Option<BatchPlan>> {
  if !method.name.starts_with(BULK_PREFIX) {
    return Ok(None);
  }

  /* An unresolved input or output is a silent miss here; the fatal lookup
   * happens when the method's own accessor is generated. */
  let (Some(input), Some(output)) = (
    ctx.type_map.get(&method.input_type),
    ctx.type_map.get(&method.output_type),
  ) else {
    return Ok(None);
  };
  let (TypeDesc::Message(input), TypeDesc::Message(output)) = (&input.desc, &output.desc) else {
    return Ok(None);
  };
  if !has_single_repeated_field(input) || !has_single_repeated_field(output) {
    return Ok(None);
  }

  let input_field = &input.field[0];
  let output_field = &output.field[0];

  let input_type = basic_type_name(ctx, input_field)?;
  let mut output_type = basic_type_name(ctx, output_field)?;
  let map_type = detect_map_type(ctx, output_field)?;
  let map_output = map_type.is_some();
  if let Some(map_type) = map_type {
    output_type = map_type.value_type;
  }

  Ok(Some(BatchPlan {
    single_method_name: single_method_name(&method.name),
    input_field_name: input_field.name.clone(),
    input_type,
    output_field_name: output_field.name.clone(),
    output_type,
    map_output,
    unique_identifier: format!("{}.{}.{}", file.package, service.name, method.name),
  }))
}

fn has_single_repeated_field(message: &DescriptorProto) -> bool {
  message.field.len() == 1 && is_repeated(&message.field[0])
}
