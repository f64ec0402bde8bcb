/* Plugin mode - the protoc side of the generator. Reads a serialized
 * CodeGeneratorRequest from stdin and writes the CodeGeneratorResponse to
 * stdout. Fatal conditions travel in the response's error field, never as
 * a broken exit. */

use std::io::{Read, Write};

use prost::Message;
use tsgen_types::CodeGeneratorRequest;

pub fn run() -> anyhow::Result<()> {
  let mut input = Vec::new();
  std::io::stdin().read_to_end(&mut input)?;

  let request = CodeGeneratorRequest::decode(input.as_slice())?;
  let response = tsgen::generate_response(&request);

  let mut output = Vec::new();
  response.encode(&mut output)?;
  std::io::stdout().write_all(&output)?;

  Ok(())
}
