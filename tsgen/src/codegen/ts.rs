/* Data-type emission: message interfaces, enums, oneof unions and default
 * constructors. Field shapes all come from the type resolver, so the
 * declarations here stay consistent with the defaults and the service
 * surfaces. */

use std::collections::HashSet;
use std::fmt::Write;

use tsgen_types::{DescriptorProto, EnumDescriptorProto};

use crate::codegen::Context;
use crate::error::GenResult;
use crate::options::{EnumRepresentation, OptionalStyle};
use crate::schema::source_info::{SourceInfo, fields};
use super::ts_gen::fragment::Frag;
use super::ts_gen::helpers::{escape_ts_keyword, maybe_add_comment};
use super::ts_gen::types::{
  is_map_type, is_message, is_repeated, is_within_oneof, is_within_oneof_that_should_be_union,
  to_type_name,
};
use super::ts_gen::wire::default_value;

/* Emit `export interface Foo { ... }` for a message. */
pub fn generate_interface(
  ctx: &Context,
  source_info: SourceInfo,
  ts_name: &str,
  message: &DescriptorProto,
  source_path: &[i32],
) -> GenResult<Frag> {
  let mut out = Frag::new();
  let deprecated = message.options.as_ref().is_some_and(|o| o.deprecated);
  maybe_add_comment(&mut out, "", source_info.comment(source_path), deprecated);
  writeln!(out, "export interface {} {{", ts_name).unwrap();

  let mut emitted_oneofs: HashSet<i32> = HashSet::new();
  for (index, field) in message.field.iter().enumerate() {
    if is_within_oneof_that_should_be_union(ctx.options, field) {
      if let Some(oneof_index) = field.oneof_index {
        if emitted_oneofs.insert(oneof_index) {
          out.push(&generate_oneof_union(ctx, message, oneof_index)?);
        }
      }
      continue;
    }

    let mut field_path = source_path.to_vec();
    field_path.extend([fields::MESSAGE_FIELD, index as i32]);
    let field_deprecated = field.options.as_ref().is_some_and(|o| o.deprecated);
    maybe_add_comment(&mut out, "  ", source_info.comment(&field_path), field_deprecated);

    let type_name = to_type_name(ctx, field)?;
    let optional_marker = if ctx.options.optional_style == OptionalStyle::NativeOptional
      && is_message(field)
      && !is_repeated(field)
      && !is_within_oneof(field)
    {
      "?"
    } else {
      ""
    };
    out.adopt(&type_name);
    writeln!(
      out,
      "  {}{}: {};",
      escape_ts_keyword(&field.name),
      optional_marker,
      type_name
    )
    .unwrap();
  }

  out.push_str("}\n");
  Ok(out)
}

/* One property per oneof, holding a `$case`-tagged union of every member
 * field. Synthetic proto3-optional oneofs never reach here. */
fn generate_oneof_union(
  ctx: &Context,
  message: &DescriptorProto,
  oneof_index: i32,
) -> GenResult<Frag> {
  let oneof_name = &message.oneof_decl[oneof_index as usize].name;

  let mut arms: Vec<Frag> = Vec::new();
  for field in &message.field {
    if field.oneof_index == Some(oneof_index) && !field.proto3_optional {
      let member_type = to_type_name(ctx, field)?;
      let name = escape_ts_keyword(&field.name);
      let mut arm = Frag::new();
      arm.adopt(&member_type);
      write!(arm, "{{ $case: '{}'; {}: {} }}", name, name, member_type).unwrap();
      arms.push(arm);
    }
  }

  let union = Frag::join(&arms, " | ");
  let mut out = Frag::new();
  out.adopt(&union);
  writeln!(out, "  {}?: {};", escape_ts_keyword(oneof_name), union).unwrap();
  Ok(out)
}

/* Emit `export enum Foo { ... }`, numeric or string-valued per the enum
 * representation option. */
pub fn generate_enum(
  ctx: &Context,
  source_info: SourceInfo,
  ts_name: &str,
  enum_desc: &EnumDescriptorProto,
  source_path: &[i32],
) -> Frag {
  let mut out = Frag::new();
  let deprecated = enum_desc.options.as_ref().is_some_and(|o| o.deprecated);
  maybe_add_comment(&mut out, "", source_info.comment(source_path), deprecated);
  writeln!(out, "export enum {} {{", ts_name).unwrap();

  for (index, value) in enum_desc.value.iter().enumerate() {
    let mut value_path = source_path.to_vec();
    value_path.extend([fields::ENUM_VALUE, index as i32]);
    maybe_add_comment(&mut out, "  ", source_info.comment(&value_path), false);

    match ctx.options.enum_representation {
      EnumRepresentation::Numeric => {
        writeln!(out, "  {} = {},", value.name, value.number).unwrap();
      }
      EnumRepresentation::StringName => {
        writeln!(out, "  {} = \"{}\",", value.name, value.name).unwrap();
      }
    }
  }

  out.push_str("}\n");
  out
}

/* Emit the default-value constructor for a message. The external codec
 * layer builds decode targets and partial updates from these, so every
 * entry goes through the same resolution as the field declarations. */
pub fn generate_default_constructor(
  ctx: &Context,
  ts_name: &str,
  message: &DescriptorProto,
) -> GenResult<Frag> {
  let mut entries: Vec<Frag> = Vec::new();
  let mut emitted_oneofs: HashSet<i32> = HashSet::new();

  for field in &message.field {
    if is_within_oneof_that_should_be_union(ctx.options, field) {
      if let Some(oneof_index) = field.oneof_index {
        if emitted_oneofs.insert(oneof_index) {
          let oneof_name = &message.oneof_decl[oneof_index as usize].name;
          entries.push(Frag::lit(format!("{}: undefined", escape_ts_keyword(oneof_name))));
        }
      }
      continue;
    }

    let name = escape_ts_keyword(&field.name);
    let value = if is_repeated(field) {
      if is_map_type(ctx, field)? {
        Frag::lit("{}")
      } else {
        Frag::lit("[]")
      }
    } else if is_message(field) || is_within_oneof(field) {
      Frag::lit("undefined")
    } else {
      default_value(ctx, field)?
    };

    let mut entry = Frag::new();
    entry.adopt(&value);
    write!(entry, "{}: {}", name, value).unwrap();
    entries.push(entry);
  }

  let mut out = Frag::new();
  writeln!(out, "export function createBase{}(): {} {{", ts_name, ts_name).unwrap();
  if entries.is_empty() {
    out.push_str("  return {};\n");
  } else {
    let list = Frag::join(&entries, ", ");
    out.adopt(&list);
    writeln!(out, "  return {{ {} }};", list).unwrap();
  }
  out.push_str("}\n");
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::options::{GenerationOptions, OneofStyle};
  use crate::schema::type_map::TypeMap;
  use tsgen_types::field_descriptor_proto::{Label, Type};
  use tsgen_types::{
    EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    OneofDescriptorProto,
  };

  fn field(name: &str, kind: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
      name: name.to_string(),
      r#type: kind as i32,
      label: Label::Optional as i32,
      ..Default::default()
    }
  }

  fn oneof_message() -> DescriptorProto {
    let mut title = field("title", Type::String);
    title.oneof_index = Some(0);
    let mut count = field("count", Type::Int32);
    count.oneof_index = Some(0);

    DescriptorProto {
      name: "Widget".to_string(),
      field: vec![field("id", Type::String), title, count],
      oneof_decl: vec![OneofDescriptorProto {
        name: "detail".to_string(),
      }],
      ..Default::default()
    }
  }

  fn with_context<R>(options: GenerationOptions, run: impl FnOnce(&Context) -> R) -> R {
    let files: Vec<FileDescriptorProto> = Vec::new();
    let type_map = TypeMap::build(&files);
    let ctx = Context {
      options: &options,
      type_map: &type_map,
    };
    run(&ctx)
  }

  fn empty_source_file() -> FileDescriptorProto {
    FileDescriptorProto::default()
  }

  #[test]
  fn test_interface_per_field_oneof_style() {
    with_context(GenerationOptions::default(), |ctx| {
      let file = empty_source_file();
      let out = generate_interface(ctx, SourceInfo::new(&file), "Widget", &oneof_message(), &[4, 0]).unwrap();
      assert!(out.text().contains("  title: string | undefined;"));
      assert!(out.text().contains("  count: number | undefined;"));
    });
  }

  #[test]
  fn test_interface_discriminated_union_style() {
    let options = GenerationOptions {
      oneof_style: OneofStyle::DiscriminatedUnion,
      ..Default::default()
    };
    with_context(options, |ctx| {
      let file = empty_source_file();
      let out = generate_interface(ctx, SourceInfo::new(&file), "Widget", &oneof_message(), &[4, 0]).unwrap();
      assert!(out.text().contains(
        "  detail?: { $case: 'title'; title: string } | { $case: 'count'; count: number };"
      ));
      assert!(!out.text().contains("title: string | undefined"));
    });
  }

  #[test]
  fn test_proto3_optional_stays_plain_under_union_style() {
    let options = GenerationOptions {
      oneof_style: OneofStyle::DiscriminatedUnion,
      ..Default::default()
    };
    with_context(options, |ctx| {
      let mut nickname = field("nickname", Type::String);
      nickname.oneof_index = Some(0);
      nickname.proto3_optional = true;
      let message = DescriptorProto {
        name: "User".to_string(),
        field: vec![nickname],
        oneof_decl: vec![OneofDescriptorProto {
          name: "_nickname".to_string(),
        }],
        ..Default::default()
      };

      let file = empty_source_file();
      let out = generate_interface(ctx, SourceInfo::new(&file), "User", &message, &[4, 0]).unwrap();
      assert!(out.text().contains("  nickname: string | undefined;"));
      assert!(!out.text().contains("$case"));
    });
  }

  #[test]
  fn test_enum_representations() {
    let enum_desc = EnumDescriptorProto {
      name: "Status".to_string(),
      value: vec![
        EnumValueDescriptorProto {
          name: "ACTIVE".to_string(),
          number: 0,
        },
        EnumValueDescriptorProto {
          name: "DELETED".to_string(),
          number: 1,
        },
      ],
      ..Default::default()
    };

    with_context(GenerationOptions::default(), |ctx| {
      let file = empty_source_file();
      let out = generate_enum(ctx, SourceInfo::new(&file), "Status", &enum_desc, &[5, 0]);
      assert!(out.text().contains("  ACTIVE = 0,"));
      assert!(out.text().contains("  DELETED = 1,"));
    });

    let options = GenerationOptions {
      enum_representation: EnumRepresentation::StringName,
      ..Default::default()
    };
    with_context(options, |ctx| {
      let file = empty_source_file();
      let out = generate_enum(ctx, SourceInfo::new(&file), "Status", &enum_desc, &[5, 0]);
      assert!(out.text().contains("  ACTIVE = \"ACTIVE\","));
    });
  }

  #[test]
  fn test_default_constructor_values() {
    with_context(GenerationOptions::default(), |ctx| {
      let mut message = DescriptorProto {
        name: "Widget".to_string(),
        field: vec![field("id", Type::String), field("count", Type::Int32)],
        ..Default::default()
      };
      message.field.push(FieldDescriptorProto {
        name: "tags".to_string(),
        r#type: Type::String as i32,
        label: Label::Repeated as i32,
        ..Default::default()
      });

      let out = generate_default_constructor(ctx, "Widget", &message).unwrap();
      assert_eq!(
        out.text(),
        "export function createBaseWidget(): Widget {\n  return { id: \"\", count: 0, tags: [] };\n}\n"
      );
    });
  }
}
