//! Descriptor Data Model
//!
//! This crate contains the compiled-schema data structures consumed by the
//! TypeScript generator: the subset of `google.protobuf` descriptors the
//! generator reads, plus the `protoc` plugin request/response envelope.
//! It provides pure data structures without any I/O or code generation
//! logic; the structs are hand-written prost messages that stay
//! wire-compatible with the upstream `descriptor.proto`/`plugin.proto`
//! field tags, so a real `protoc` invocation decodes straight into them.

pub mod descriptor;
pub mod plugin;

// Re-export commonly used types at the crate root
pub use descriptor::*;
pub use plugin::*;
