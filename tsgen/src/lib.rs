//! TypeScript Client Code Generation
//!
//! This crate turns a compiled protobuf generation request into TypeScript
//! declarations: data types for every message and enum, and client-side
//! call surfaces for every service. The binary wraps it as a `protoc`
//! plugin; the `generate` function is the whole pipeline as a library.

pub mod codegen;
pub mod error;
pub mod options;
pub mod schema;

use tsgen_types::{CodeGeneratorRequest, CodeGeneratorResponse, code_generator_response};

pub use error::{GenError, GenResult};
pub use options::GenerationOptions;

/* Run a whole request: parse options, build the frozen type map, emit
 * every requested file. All-or-nothing: the first fatal error aborts the
 * run with no partial output. */
pub fn generate(request: &CodeGeneratorRequest) -> GenResult<CodeGeneratorResponse> {
  let options = GenerationOptions::parse(request.parameter.as_deref().unwrap_or(""))?;
  let type_map = schema::type_map::TypeMap::build(&request.proto_file);
  let ctx = codegen::Context {
    options: &options,
    type_map: &type_map,
  };

  let mut files = Vec::new();
  for file_name in &request.file_to_generate {
    let file = request
      .proto_file
      .iter()
      .find(|f| f.name == *file_name)
      .ok_or_else(|| GenError::MissingFile {
        file: file_name.clone(),
      })?;
    let (name, content) = codegen::generate_file(&ctx, file)?;
    files.push(code_generator_response::File { name, content });
  }

  Ok(CodeGeneratorResponse {
    error: None,
    supported_features: code_generator_response::FEATURE_PROTO3_OPTIONAL,
    file: files,
  })
}

/* Plugin-facing wrapper folding fatal errors into the response's error
 * field: a run yields either every file or one descriptive message,
 * never both. */
pub fn generate_response(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
  match generate(request) {
    Ok(response) => response,
    Err(err) => CodeGeneratorResponse {
      error: Some(err.to_string()),
      supported_features: code_generator_response::FEATURE_PROTO3_OPTIONAL,
      file: Vec::new(),
    },
  }
}
