/* Depth-first walk over a file's message/enum tree.
 *
 * Every type - nested and synthetic map-entry messages included - is
 * reported with a flattened target name (`Parent_Child`, no nesting in the
 * emitted identifier), the dot-joined qualified schema name
 * (`Parent.Child`, nesting preserved), and its source-location path. */

use tsgen_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};

use super::source_info::fields;

#[derive(Clone, Copy, Debug)]
pub enum TypeDecl<'a> {
  Message(&'a DescriptorProto),
  Enum(&'a EnumDescriptorProto),
}

/* One visited declaration. */
#[derive(Clone, Debug)]
pub struct VisitedType<'a> {
  /* flattened target-language name, e.g. `Foo_Bar` */
  pub ts_name: String,
  /* dotted qualified schema name, e.g. `Foo.Bar` */
  pub qualified_name: String,
  pub decl: TypeDecl<'a>,
  pub source_path: Vec<i32>,
}

impl VisitedType<'_> {
  /* Map-entry synthetics carry a marker consumed by map detection. */
  pub fn is_map_entry(&self) -> bool {
    match self.decl {
      TypeDecl::Message(message) => message.options.as_ref().is_some_and(|o| o.map_entry),
      TypeDecl::Enum(_) => false,
    }
  }
}

pub fn visit<'a>(file: &'a FileDescriptorProto, f: &mut impl FnMut(VisitedType<'a>)) {
  for (index, message) in file.message_type.iter().enumerate() {
    let path = vec![fields::FILE_MESSAGE_TYPE, index as i32];
    visit_message("", "", message, path, f);
  }
  for (index, enum_type) in file.enum_type.iter().enumerate() {
    f(VisitedType {
      ts_name: enum_type.name.clone(),
      qualified_name: enum_type.name.clone(),
      decl: TypeDecl::Enum(enum_type),
      source_path: vec![fields::FILE_ENUM_TYPE, index as i32],
    });
  }
}

/* Convenience wrapper collecting the walk into a vector, preserving
 * visitation order. */
pub fn collect_types(file: &FileDescriptorProto) -> Vec<VisitedType<'_>> {
  let mut types = Vec::new();
  visit(file, &mut |visited| types.push(visited));
  types
}

fn visit_message<'a>(
  ts_prefix: &str,
  qualified_prefix: &str,
  message: &'a DescriptorProto,
  path: Vec<i32>,
  f: &mut impl FnMut(VisitedType<'a>),
) {
  let ts_name = join(ts_prefix, &message.name, '_');
  let qualified_name = join(qualified_prefix, &message.name, '.');

  f(VisitedType {
    ts_name: ts_name.clone(),
    qualified_name: qualified_name.clone(),
    decl: TypeDecl::Message(message),
    source_path: path.clone(),
  });

  for (index, nested) in message.nested_type.iter().enumerate() {
    let mut nested_path = path.clone();
    nested_path.extend([fields::MESSAGE_NESTED_TYPE, index as i32]);
    visit_message(&ts_name, &qualified_name, nested, nested_path, f);
  }

  for (index, enum_type) in message.enum_type.iter().enumerate() {
    let mut enum_path = path.clone();
    enum_path.extend([fields::MESSAGE_ENUM_TYPE, index as i32]);
    f(VisitedType {
      ts_name: join(&ts_name, &enum_type.name, '_'),
      qualified_name: join(&qualified_name, &enum_type.name, '.'),
      decl: TypeDecl::Enum(enum_type),
      source_path: enum_path,
    });
  }
}

fn join(prefix: &str, name: &str, separator: char) -> String {
  if prefix.is_empty() {
    name.to_string()
  } else {
    format!("{}{}{}", prefix, separator, name)
  }
}
