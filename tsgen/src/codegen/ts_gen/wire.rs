/* Wire metadata: the binary-framing category, packed eligibility, runtime
 * reader call, zero value and presence test for every scalar/enum kind.
 * These functions are total over the closed enumeration; the encode/decode
 * routines that consume the metadata live outside the generator. */

use std::fmt::Write;

use tsgen_types::FieldDescriptorProto;
use tsgen_types::field_descriptor_proto::Type;

use crate::codegen::Context;
use crate::error::{GenError, GenResult};
use crate::options::{EnumRepresentation, LongRepresentation, TargetEnvironment};
use crate::schema::type_map::TypeDesc;
use super::fragment::Frag;
use super::types::message_to_type_name;

pub const WIRE_VARINT: u32 = 0;
pub const WIRE_FIXED64: u32 = 1;
pub const WIRE_LENGTH_DELIMITED: u32 = 2;
pub const WIRE_FIXED32: u32 = 5;

/* Framing category per scalar kind, following the encoding spec. */
pub fn basic_wire_type(kind: Type) -> GenResult<u32> {
  match kind {
    Type::Double | Type::Fixed64 | Type::Sfixed64 => Ok(WIRE_FIXED64),
    Type::Float | Type::Fixed32 | Type::Sfixed32 => Ok(WIRE_FIXED32),
    Type::Int32
    | Type::Int64
    | Type::Uint32
    | Type::Uint64
    | Type::Sint32
    | Type::Sint64
    | Type::Bool
    | Type::Enum => Ok(WIRE_VARINT),
    Type::String | Type::Bytes => Ok(WIRE_LENGTH_DELIMITED),
    Type::Message | Type::Group => Err(GenError::NonScalar(kind)),
  }
}

/* Wire type for the 64-bit integer families only. */
pub fn basic_long_wire_type(kind: Type) -> Option<u32> {
  match kind {
    Type::Int64 | Type::Uint64 | Type::Sint64 => Some(WIRE_VARINT),
    Type::Fixed64 | Type::Sfixed64 => Some(WIRE_FIXED64),
    _ => None,
  }
}

/* Wire type the element uses inside a packed repeated encoding; None for
 * kinds that can never be packed. */
pub fn packed_type(kind: Type) -> Option<u32> {
  match kind {
    Type::Double | Type::Fixed64 | Type::Sfixed64 => Some(WIRE_FIXED64),
    Type::Float | Type::Fixed32 | Type::Sfixed32 => Some(WIRE_FIXED32),
    Type::Int32
    | Type::Int64
    | Type::Uint32
    | Type::Uint64
    | Type::Sint32
    | Type::Sint64
    | Type::Bool
    | Type::Enum => Some(WIRE_VARINT),
    _ => None,
  }
}

/* The runtime reader/writer method name driving the external codec. */
pub fn to_reader_call(kind: Type) -> GenResult<&'static str> {
  match kind {
    Type::Double => Ok("double"),
    Type::Float => Ok("float"),
    Type::Int32 | Type::Enum => Ok("int32"),
    Type::Uint32 => Ok("uint32"),
    Type::Sint32 => Ok("sint32"),
    Type::Fixed32 => Ok("fixed32"),
    Type::Sfixed32 => Ok("sfixed32"),
    Type::Int64 => Ok("int64"),
    Type::Uint64 => Ok("uint64"),
    Type::Sint64 => Ok("sint64"),
    Type::Fixed64 => Ok("fixed64"),
    Type::Sfixed64 => Ok("sfixed64"),
    Type::Bool => Ok("bool"),
    Type::String => Ok("string"),
    Type::Bytes => Ok("bytes"),
    Type::Message | Type::Group => Err(GenError::NonScalar(kind)),
  }
}

/* Zero-value expression for a field under the active options. Message
 * fields default to `undefined`. */
pub fn default_value(ctx: &Context, field: &FieldDescriptorProto) -> GenResult<Frag> {
  match super::types::field_type(field)? {
    Type::Double
    | Type::Float
    | Type::Int32
    | Type::Uint32
    | Type::Sint32
    | Type::Fixed32
    | Type::Sfixed32 => Ok(Frag::lit("0")),
    Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64 => {
      Ok(Frag::lit(long_zero(ctx)))
    }
    Type::Enum => {
      let zero = enum_zero_value(ctx, &field.type_name)?;
      match ctx.options.enum_representation {
        EnumRepresentation::Numeric => Ok(Frag::lit(zero.number.to_string())),
        EnumRepresentation::StringName => {
          let enum_type = message_to_type_name(ctx, &field.type_name, false)?;
          let mut frag = Frag::new();
          frag.adopt(&enum_type);
          write!(frag, "{}.{}", enum_type, zero.name).unwrap();
          Ok(frag)
        }
      }
    }
    Type::Bool => Ok(Frag::lit("false")),
    Type::String => Ok(Frag::lit("\"\"")),
    Type::Bytes => match ctx.options.target_environment {
      TargetEnvironment::NodeLike => Ok(Frag::lit("Buffer.alloc(0)")),
      TargetEnvironment::BrowserLike => Ok(Frag::lit("new Uint8Array()")),
    },
    Type::Message | Type::Group => Ok(Frag::lit("undefined")),
  }
}

/* Expression testing that `place` differs from its zero value; a field is
 * omittable exactly when the check is false. Scalars and enums only. */
pub fn not_default_check(ctx: &Context, field: &FieldDescriptorProto, place: &str) -> GenResult<Frag> {
  match super::types::field_type(field)? {
    Type::Double
    | Type::Float
    | Type::Int32
    | Type::Uint32
    | Type::Sint32
    | Type::Fixed32
    | Type::Sfixed32 => Ok(Frag::lit(format!("{} !== 0", place))),
    Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64 => {
      Ok(Frag::lit(format!("{} !== {}", place, long_zero(ctx))))
    }
    Type::Enum => {
      let zero = enum_zero_value(ctx, &field.type_name)?;
      match ctx.options.enum_representation {
        EnumRepresentation::Numeric => Ok(Frag::lit(format!("{} !== {}", place, zero.number))),
        EnumRepresentation::StringName => {
          let enum_type = message_to_type_name(ctx, &field.type_name, false)?;
          let mut frag = Frag::new();
          frag.adopt(&enum_type);
          write!(frag, "{} !== {}.{}", place, enum_type, zero.name).unwrap();
          Ok(frag)
        }
      }
    }
    Type::Bool => Ok(Frag::lit(format!("{} === true", place))),
    Type::String => Ok(Frag::lit(format!("{} !== \"\"", place))),
    Type::Bytes => Ok(Frag::lit(format!("{}.length !== 0", place))),
    kind => Err(GenError::NonScalar(kind)),
  }
}

fn long_zero(ctx: &Context) -> &'static str {
  match ctx.options.long_representation {
    LongRepresentation::Number => "0",
    LongRepresentation::String => "\"0\"",
    LongRepresentation::ArbitraryPrecision => "0n",
  }
}

struct EnumZero {
  name: String,
  number: i32,
}

/* Probe the enum's declared values for the member numbered 0; schemas
 * without one are permitted, and the first declared member is the
 * documented fallback. */
fn enum_zero_value(ctx: &Context, type_name: &str) -> GenResult<EnumZero> {
  let entry = ctx.type_map.resolve(type_name)?;
  let enum_desc = match &entry.desc {
    TypeDesc::Enum(enum_desc) => enum_desc,
    TypeDesc::Message(_) => {
      return Err(GenError::UnresolvedType {
        type_name: type_name.to_string(),
      });
    }
  };

  enum_desc
    .value
    .iter()
    .find(|value| value.number == 0)
    .or_else(|| enum_desc.value.first())
    .map(|value| EnumZero {
      name: value.name.clone(),
      number: value.number,
    })
    .ok_or_else(|| GenError::EmptyEnum {
      type_name: type_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::options::GenerationOptions;
  use crate::schema::type_map::TypeMap;
  use tsgen_types::{
    EnumDescriptorProto, EnumValueDescriptorProto, FileDescriptorProto,
    field_descriptor_proto::Label,
  };

  const SCALARS: [Type; 15] = [
    Type::Double,
    Type::Float,
    Type::Int64,
    Type::Uint64,
    Type::Int32,
    Type::Fixed64,
    Type::Fixed32,
    Type::Bool,
    Type::String,
    Type::Bytes,
    Type::Uint32,
    Type::Sfixed32,
    Type::Sfixed64,
    Type::Sint32,
    Type::Sint64,
  ];

  fn enum_desc(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
      name: name.to_string(),
      value: values
        .iter()
        .map(|(name, number)| EnumValueDescriptorProto {
          name: name.to_string(),
          number: *number,
        })
        .collect(),
      ..Default::default()
    }
  }

  fn enum_field(type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
      name: "kind".to_string(),
      r#type: Type::Enum as i32,
      label: Label::Optional as i32,
      type_name: type_name.to_string(),
      ..Default::default()
    }
  }

  fn scalar_field(kind: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
      name: "f".to_string(),
      r#type: kind as i32,
      label: Label::Optional as i32,
      ..Default::default()
    }
  }

  fn with_context<R>(options: GenerationOptions, run: impl FnOnce(&Context) -> R) -> R {
    let files = vec![FileDescriptorProto {
      name: "test.proto".to_string(),
      package: "test".to_string(),
      enum_type: vec![
        enum_desc("NoZero", &[("A", 1), ("B", 2)]),
        enum_desc("LateZero", &[("A", 1), ("ZERO", 0), ("B", 2)]),
      ],
      ..Default::default()
    }];
    let type_map = TypeMap::build(&files);
    let ctx = Context {
      options: &options,
      type_map: &type_map,
    };
    run(&ctx)
  }

  #[test]
  fn test_wire_metadata_is_total_over_scalars() {
    for kind in SCALARS {
      assert!(basic_wire_type(kind).is_ok(), "no wire type for {:?}", kind);
      assert!(to_reader_call(kind).is_ok(), "no reader call for {:?}", kind);
    }
    assert_eq!(basic_wire_type(Type::Enum).unwrap(), WIRE_VARINT);
    assert_eq!(to_reader_call(Type::Enum).unwrap(), "int32");
  }

  #[test]
  fn test_default_value_is_total_over_scalars() {
    with_context(GenerationOptions::default(), |ctx| {
      for kind in SCALARS {
        let frag = default_value(ctx, &scalar_field(kind)).unwrap();
        assert!(!frag.text().is_empty(), "no default for {:?}", kind);
        let check = not_default_check(ctx, &scalar_field(kind), "value").unwrap();
        assert!(!check.text().is_empty(), "no presence test for {:?}", kind);
      }
    });
  }

  #[test]
  fn test_wire_categories() {
    assert_eq!(basic_wire_type(Type::Int32).unwrap(), WIRE_VARINT);
    assert_eq!(basic_wire_type(Type::Fixed32).unwrap(), WIRE_FIXED32);
    assert_eq!(basic_wire_type(Type::Sfixed64).unwrap(), WIRE_FIXED64);
    assert_eq!(basic_wire_type(Type::Bytes).unwrap(), WIRE_LENGTH_DELIMITED);
    assert!(basic_wire_type(Type::Message).is_err());
  }

  #[test]
  fn test_long_wire_types() {
    assert_eq!(basic_long_wire_type(Type::Int64), Some(WIRE_VARINT));
    assert_eq!(basic_long_wire_type(Type::Sint64), Some(WIRE_VARINT));
    assert_eq!(basic_long_wire_type(Type::Fixed64), Some(WIRE_FIXED64));
    assert_eq!(basic_long_wire_type(Type::Int32), None);
    assert_eq!(basic_long_wire_type(Type::Double), None);
  }

  #[test]
  fn test_packed_eligibility() {
    assert_eq!(packed_type(Type::Bool), Some(WIRE_VARINT));
    assert_eq!(packed_type(Type::Double), Some(WIRE_FIXED64));
    assert_eq!(packed_type(Type::Enum), Some(WIRE_VARINT));
    assert_eq!(packed_type(Type::String), None);
    assert_eq!(packed_type(Type::Bytes), None);
    assert_eq!(packed_type(Type::Message), None);
  }

  #[test]
  fn test_enum_default_falls_back_to_first_declared() {
    with_context(GenerationOptions::default(), |ctx| {
      let frag = default_value(ctx, &enum_field(".test.NoZero")).unwrap();
      assert_eq!(frag.text(), "1");
    });
  }

  #[test]
  fn test_enum_default_prefers_zero_member_regardless_of_order() {
    with_context(GenerationOptions::default(), |ctx| {
      let frag = default_value(ctx, &enum_field(".test.LateZero")).unwrap();
      assert_eq!(frag.text(), "0");
    });

    let options = GenerationOptions {
      enum_representation: EnumRepresentation::StringName,
      ..Default::default()
    };
    with_context(options, |ctx| {
      let frag = default_value(ctx, &enum_field(".test.LateZero")).unwrap();
      assert_eq!(frag.text(), "LateZero.ZERO");
    });
  }

  #[test]
  fn test_long_mode_defaults() {
    let field = scalar_field(Type::Uint64);
    let mut options = GenerationOptions::default();

    with_context(options.clone(), |ctx| {
      assert_eq!(default_value(ctx, &field).unwrap().text(), "0");
    });
    options.long_representation = LongRepresentation::String;
    with_context(options.clone(), |ctx| {
      assert_eq!(default_value(ctx, &field).unwrap().text(), "\"0\"");
      assert_eq!(
        not_default_check(ctx, &field, "value").unwrap().text(),
        "value !== \"0\""
      );
    });
    options.long_representation = LongRepresentation::ArbitraryPrecision;
    with_context(options, |ctx| {
      assert_eq!(default_value(ctx, &field).unwrap().text(), "0n");
      assert_eq!(
        not_default_check(ctx, &field, "value").unwrap().text(),
        "value !== 0n"
      );
    });
  }

  #[test]
  fn test_presence_tests() {
    with_context(GenerationOptions::default(), |ctx| {
      assert_eq!(
        not_default_check(ctx, &scalar_field(Type::Bool), "v").unwrap().text(),
        "v === true"
      );
      assert_eq!(
        not_default_check(ctx, &scalar_field(Type::String), "v").unwrap().text(),
        "v !== \"\""
      );
      assert_eq!(
        not_default_check(ctx, &scalar_field(Type::Bytes), "v").unwrap().text(),
        "v.length !== 0"
      );
    });
  }
}
