/* The global type map: fully-qualified schema type name -> target identity.
 *
 * Built in a single collect pass over every file in the request and frozen
 * before any resolution reads it; lookups after construction never mutate.
 * A lookup miss is fatal for the whole run. */

use indexmap::IndexMap;
use tsgen_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};

use crate::error::{GenError, GenResult};
use super::visit::{TypeDecl, visit};

#[derive(Clone, Debug)]
pub enum TypeDesc {
  Message(DescriptorProto),
  Enum(EnumDescriptorProto),
}

#[derive(Clone, Debug)]
pub struct TypeMapEntry {
  /* schema file name with its extension stripped, e.g. `foo/widgets` */
  pub module_path: String,
  /* flattened target type name, e.g. `Foo_Bar` */
  pub ts_name: String,
  pub desc: TypeDesc,
}

#[derive(Debug, Default)]
pub struct TypeMap {
  entries: IndexMap<String, TypeMapEntry>,
}

impl TypeMap {
  /* Collect phase: register every type of every file, synthetic map
   * entries included. Exactly one entry per qualified name; a collision
   * would indicate a schema defect upstream and is not handled here. */
  pub fn build(files: &[FileDescriptorProto]) -> Self {
    let mut entries = IndexMap::new();

    for file in files {
      let module_path = Self::module_path(&file.name);
      let prefix = if file.package.is_empty() {
        String::new()
      } else {
        format!(".{}", file.package)
      };

      visit(file, &mut |visited| {
        let key = format!("{}.{}", prefix, visited.qualified_name);
        let desc = match visited.decl {
          TypeDecl::Message(message) => TypeDesc::Message(message.clone()),
          TypeDecl::Enum(enum_type) => TypeDesc::Enum(enum_type.clone()),
        };
        entries.insert(
          key,
          TypeMapEntry {
            module_path: module_path.clone(),
            ts_name: visited.ts_name.clone(),
            desc,
          },
        );
      });
    }

    Self { entries }
  }

  /* Module path for a schema file: strip the extension, keep directories.
   * `google/protobuf/wrappers.proto` -> `google/protobuf/wrappers`. */
  pub fn module_path(file_name: &str) -> String {
    file_name
      .strip_suffix(".proto")
      .unwrap_or(file_name)
      .to_string()
  }

  pub fn get(&self, type_name: &str) -> Option<&TypeMapEntry> {
    self.entries.get(type_name)
  }

  /* Fatal lookup: every reference reachable from a field or method must
   * resolve here. */
  pub fn resolve(&self, type_name: &str) -> GenResult<&TypeMapEntry> {
    self.entries.get(type_name).ok_or_else(|| GenError::UnresolvedType {
      type_name: type_name.to_string(),
    })
  }

  /* Fatal lookup of a message descriptor; resolving an enum here is a
   * reference defect reported as unresolved. */
  pub fn resolve_message<'a>(&'a self, type_name: &str) -> GenResult<&'a DescriptorProto> {
    match &self.resolve(type_name)?.desc {
      TypeDesc::Message(message) => Ok(message),
      TypeDesc::Enum(_) => Err(GenError::UnresolvedType {
        type_name: type_name.to_string(),
      }),
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &TypeMapEntry)> {
    self.entries.iter()
  }
}
