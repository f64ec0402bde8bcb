/* Generate command - emit TypeScript from a descriptor set file. */

use std::path::PathBuf;

use prost::Message;
use tsgen_types::{CodeGeneratorRequest, FileDescriptorSet};

pub fn run(
  descriptor_set: PathBuf,
  options: String,
  output_dir: PathBuf,
  files: Vec<String>,
  verbose: bool,
) -> anyhow::Result<()> {
  if verbose {
    println!("[~] Loading descriptor set {}", descriptor_set.display());
  }

  let bytes = std::fs::read(&descriptor_set)?;
  let set = FileDescriptorSet::decode(bytes.as_slice())?;

  if verbose {
    println!("[~] Loaded {} schema file(s)", set.file.len());
    for file in &set.file {
      println!("    - {}", file.name);
    }
  }

  /* Default partition: every file in the set is requested for generation */
  let file_to_generate = if files.is_empty() {
    set.file.iter().map(|f| f.name.clone()).collect()
  } else {
    files
  };

  let request = CodeGeneratorRequest {
    file_to_generate,
    parameter: Some(options),
    proto_file: set.file,
  };

  let response = tsgen::generate(&request)?;

  std::fs::create_dir_all(&output_dir)?;
  for file in &response.file {
    let path = output_dir.join(&file.name);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &file.content)?;
    if verbose {
      println!("[✓] Generated {}", path.display());
    }
  }

  println!("[✓] Code generation complete!");
  Ok(())
}
