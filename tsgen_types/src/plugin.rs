use prost::Message;

use crate::descriptor::FileDescriptorProto;

/// The generation request `protoc` writes to a plugin's stdin.
#[derive(Clone, PartialEq, Message)]
pub struct CodeGeneratorRequest {
    /// The files the caller asked to generate. Every other entry in
    /// `proto_file` is a dependency, present only so references resolve.
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    /// Flat `key[=value](,key[=value])*` option string from the command line.
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    /// Every schema file in the transitive import closure, topologically
    /// ordered (imports before importers).
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptorProto>,
}

/// The generation response a plugin writes to stdout: either one generated
/// file per requested schema file, or a single fatal error for the whole run.
#[derive(Clone, PartialEq, Message)]
pub struct CodeGeneratorResponse {
    /// Set on any fatal condition; mutually exclusive with `file`.
    #[prost(string, optional, tag = "1")]
    pub error: Option<String>,
    #[prost(uint64, tag = "2")]
    pub supported_features: u64,
    #[prost(message, repeated, tag = "15")]
    pub file: Vec<code_generator_response::File>,
}

pub mod code_generator_response {
    use prost::Message;

    /// Declares support for proto3 `optional` fields.
    pub const FEATURE_PROTO3_OPTIONAL: u64 = 1;

    #[derive(Clone, PartialEq, Message)]
    pub struct File {
        /// Output path, relative to the output directory.
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(string, tag = "15")]
        pub content: String,
    }
}
