/* Type resolution: the total mapping from a schema field to the TypeScript
 * type expression it is declared as. Field declarations, default-value
 * construction and the service planner all call through here, so identical
 * inputs must always yield identical output. */

use std::fmt::Write;

use tsgen_types::field_descriptor_proto::{Label, Type};
use tsgen_types::{FieldDescriptorProto, MethodDescriptorProto};

use crate::codegen::Context;
use crate::error::{GenError, GenResult};
use crate::options::{
  GenerationOptions, LongRepresentation, OneofStyle, OptionalStyle, TargetEnvironment,
};
use super::fragment::Frag;

/* Closed-enumeration accessor: a type integer outside the enumeration is a
 * defect in the descriptor and fatal for the run. */
pub fn field_type(field: &FieldDescriptorProto) -> GenResult<Type> {
  Type::try_from(field.r#type).map_err(|_| GenError::InvalidFieldType {
    field: field.name.clone(),
    value: field.r#type,
  })
}

pub fn is_repeated(field: &FieldDescriptorProto) -> bool {
  field.label == Label::Repeated as i32
}

pub fn is_message(field: &FieldDescriptorProto) -> bool {
  field.r#type == Type::Message as i32
}

pub fn is_within_oneof(field: &FieldDescriptorProto) -> bool {
  field.oneof_index.is_some()
}

/* True when the field folds into a single discriminated-union property.
 * The synthetic proto3-optional oneof never folds. */
pub fn is_within_oneof_that_should_be_union(
  options: &GenerationOptions,
  field: &FieldDescriptorProto,
) -> bool {
  is_within_oneof(field)
    && options.oneof_style == OneofStyle::DiscriminatedUnion
    && !field.proto3_optional
}

/* The one selection point for the 64-bit integer representation. Every
 * site needing a 64-bit type, default or comparison goes through this so
 * declared types and runtime behavior cannot diverge. */
pub fn long_type_name(options: &GenerationOptions) -> Frag {
  match options.long_representation {
    LongRepresentation::Number => Frag::lit("number"),
    LongRepresentation::String => Frag::lit("string"),
    LongRepresentation::ArbitraryPrecision => Frag::lit("bigint"),
  }
}

/* Recognized scalar-wrapper types would collapse to their wrapped scalar
 * unioned with an absent marker. Deliberately inert: always reports no
 * wrapper. The collapse rules below stay in place for when a wrapper set
 * is ever wired up. */
fn wrapper_type_name(_type_name: &str) -> Option<Frag> {
  None
}

/* Maps `.some.pkg.Message` to an importable TypeScript type name. */
pub fn message_to_type_name(ctx: &Context, proto_type: &str, repeated: bool) -> GenResult<Frag> {
  if let Some(wrapped) = wrapper_type_name(proto_type) {
    /* Repeated elements are never individually absent, and native optional
     * properties already encode absence. */
    if repeated || ctx.options.optional_style == OptionalStyle::NativeOptional {
      return Ok(wrapped);
    }
    let mut frag = wrapped;
    frag.push_str(" | undefined");
    return Ok(frag);
  }

  let entry = ctx.type_map.resolve(proto_type)?;
  Ok(Frag::named(&entry.ts_name, &format!("./{}", entry.module_path)))
}

/* Returns the type name without any repeated/absent shaping. */
pub fn basic_type_name(ctx: &Context, field: &FieldDescriptorProto) -> GenResult<Frag> {
  match field_type(field)? {
    Type::Double
    | Type::Float
    | Type::Int32
    | Type::Uint32
    | Type::Sint32
    | Type::Fixed32
    | Type::Sfixed32 => Ok(Frag::lit("number")),
    Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64 => {
      Ok(long_type_name(ctx.options))
    }
    Type::Bool => Ok(Frag::lit("boolean")),
    Type::String => Ok(Frag::lit("string")),
    Type::Bytes => match ctx.options.target_environment {
      TargetEnvironment::NodeLike => Ok(Frag::lit("Buffer")),
      TargetEnvironment::BrowserLike => Ok(Frag::lit("Uint8Array")),
    },
    Type::Message | Type::Enum => {
      message_to_type_name(ctx, &field.type_name, is_repeated(field))
    }
    Type::Group => Err(GenError::InvalidFieldType {
      field: field.name.clone(),
      value: field.r#type,
    }),
  }
}

pub struct MapType {
  pub key_type: Frag,
  pub value_type: Frag,
}

/* A repeated message field is a map iff its referenced message carries the
 * synthetic map-entry marker. Key and value come from the entry message's
 * first and second field by position, never by name; neither gets the
 * absent union (associative keys and values are never individually
 * absent). */
pub fn detect_map_type(ctx: &Context, field: &FieldDescriptorProto) -> GenResult<Option<MapType>> {
  if is_repeated(field) && is_message(field) {
    let entry = ctx.type_map.resolve_message(&field.type_name)?;
    if entry.options.as_ref().is_some_and(|o| o.map_entry) {
      let key_type = to_type_name(ctx, &entry.field[0])?;
      let value_type = basic_type_name(ctx, &entry.field[1])?;
      return Ok(Some(MapType { key_type, value_type }));
    }
  }
  Ok(None)
}

pub fn is_map_type(ctx: &Context, field: &FieldDescriptorProto) -> GenResult<bool> {
  Ok(detect_map_type(ctx, field)?.is_some())
}

/* The type a field is declared as in its message interface. */
pub fn to_type_name(ctx: &Context, field: &FieldDescriptorProto) -> GenResult<Frag> {
  let basic = basic_type_name(ctx, field)?;

  if is_repeated(field) {
    if let Some(map_type) = detect_map_type(ctx, field)? {
      let mut frag = Frag::new();
      frag.adopt(&map_type.key_type);
      frag.adopt(&map_type.value_type);
      write!(frag, "{{ [key: {}]: {} }}", map_type.key_type, map_type.value_type).unwrap();
      return Ok(frag);
    }
    let mut frag = basic;
    frag.push_str("[]");
    return Ok(frag);
  }

  /* Union with `undefined` for: message fields outside oneofs (unless the
   * native-optional style already encodes absence), oneof members under
   * the per-field style, and the synthetic proto3-optional oneof under
   * either style. */
  let within_oneof = is_within_oneof(field);
  let absent_union = (!within_oneof
    && is_message(field)
    && ctx.options.optional_style == OptionalStyle::UnionWithAbsent)
    || (within_oneof && ctx.options.oneof_style == OneofStyle::PerField)
    || (within_oneof && field.proto3_optional);

  if absent_union {
    let mut frag = basic;
    frag.push_str(" | undefined");
    return Ok(frag);
  }
  Ok(basic)
}

pub fn request_type(ctx: &Context, method: &MethodDescriptorProto) -> GenResult<Frag> {
  let type_name = message_to_type_name(ctx, &method.input_type, false)?;
  if method.client_streaming {
    return Ok(observable_of(&type_name));
  }
  Ok(type_name)
}

pub fn response_type(ctx: &Context, method: &MethodDescriptorProto) -> GenResult<Frag> {
  message_to_type_name(ctx, &method.output_type, false)
}

pub fn response_promise(ctx: &Context, method: &MethodDescriptorProto) -> GenResult<Frag> {
  let inner = response_type(ctx, method)?;
  let mut frag = Frag::new();
  frag.adopt(&inner);
  write!(frag, "Promise<{}>", inner).unwrap();
  Ok(frag)
}

pub fn response_observable(ctx: &Context, method: &MethodDescriptorProto) -> GenResult<Frag> {
  Ok(observable_of(&response_type(ctx, method)?))
}

fn observable_of(inner: &Frag) -> Frag {
  let mut frag = Frag::named("Observable", "rxjs");
  frag.push_str("<");
  frag.push(inner);
  frag.push_str(">");
  frag
}
