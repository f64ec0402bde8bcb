/* Comment lookup over a file's source-location map, keyed by the
 * field-number paths descriptor.proto defines. */

use tsgen_types::FileDescriptorProto;
use tsgen_types::source_code_info::Location;

/* Field numbers used to build source-location paths. */
pub mod fields {
  pub const FILE_MESSAGE_TYPE: i32 = 4;
  pub const FILE_ENUM_TYPE: i32 = 5;
  pub const FILE_SERVICE: i32 = 6;
  pub const MESSAGE_FIELD: i32 = 2;
  pub const MESSAGE_NESTED_TYPE: i32 = 3;
  pub const MESSAGE_ENUM_TYPE: i32 = 4;
  pub const ENUM_VALUE: i32 = 2;
  pub const SERVICE_METHOD: i32 = 2;
}

#[derive(Clone, Copy)]
pub struct SourceInfo<'a> {
  locations: &'a [Location],
}

impl<'a> SourceInfo<'a> {
  pub fn new(file: &'a FileDescriptorProto) -> Self {
    let locations = file
      .source_code_info
      .as_ref()
      .map(|info| info.location.as_slice())
      .unwrap_or(&[]);
    Self { locations }
  }

  /* Leading comment attached to the declaration at `path`, trimmed; None
   * when the location is absent or carries no comment. */
  pub fn comment(&self, path: &[i32]) -> Option<&'a str> {
    let location = self.locations.iter().find(|loc| loc.path == path)?;
    let comment = location.leading_comments.as_deref()?.trim();
    if comment.is_empty() { None } else { Some(comment) }
  }
}
