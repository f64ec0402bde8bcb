/* Analyze command - show what the generator resolved without emitting
 * code: the frozen type map, every method's call shape, and the batch
 * plans the structural heuristic derived. */

use std::path::PathBuf;

use prost::Message;
use serde::Serialize;
use tsgen_types::FileDescriptorSet;

use tsgen::GenerationOptions;
use tsgen::codegen::Context;
use tsgen::codegen::ts_gen::services::{CallShape, call_shape};
use tsgen::schema::type_map::{TypeDesc, TypeMap};

#[derive(Serialize)]
struct AnalyzeReport {
  types: Vec<TypeSummary>,
  services: Vec<ServiceSummary>,
}

#[derive(Serialize)]
struct TypeSummary {
  key: String,
  module_path: String,
  ts_name: String,
  kind: &'static str,
  map_entry: bool,
}

#[derive(Serialize)]
struct ServiceSummary {
  file: String,
  name: String,
  methods: Vec<MethodSummary>,
}

#[derive(Serialize)]
struct MethodSummary {
  name: String,
  call_shape: &'static str,
  batch: Option<BatchSummary>,
}

#[derive(Serialize)]
struct BatchSummary {
  single_method_name: String,
  unique_identifier: String,
  input_type: String,
  output_type: String,
  map_output: bool,
}

pub fn run(descriptor_set: PathBuf, options: String, pretty: bool) -> anyhow::Result<()> {
  let bytes = std::fs::read(&descriptor_set)?;
  let set = FileDescriptorSet::decode(bytes.as_slice())?;

  let options = GenerationOptions::parse(&options)?;
  let type_map = TypeMap::build(&set.file);
  let ctx = Context {
    options: &options,
    type_map: &type_map,
  };

  let types = type_map
    .iter()
    .map(|(key, entry)| {
      let (kind, map_entry) = match &entry.desc {
        TypeDesc::Message(message) => (
          "message",
          message.options.as_ref().is_some_and(|o| o.map_entry),
        ),
        TypeDesc::Enum(_) => ("enum", false),
      };
      TypeSummary {
        key: key.clone(),
        module_path: entry.module_path.clone(),
        ts_name: entry.ts_name.clone(),
        kind,
        map_entry,
      }
    })
    .collect();

  let mut services = Vec::new();
  for file in &set.file {
    for service in &file.service {
      let mut methods = Vec::new();
      for method in &service.method {
        let shape = call_shape(&ctx, file, service, method)?;
        let (shape_name, batch) = match shape {
          CallShape::Batched(plan) => (
            "batched",
            Some(BatchSummary {
              single_method_name: plan.single_method_name,
              unique_identifier: plan.unique_identifier,
              input_type: plan.input_type.text().to_string(),
              output_type: plan.output_type.text().to_string(),
              map_output: plan.map_output,
            }),
          ),
          CallShape::Cached => ("cached", None),
          CallShape::Plain => ("plain", None),
        };
        methods.push(MethodSummary {
          name: method.name.clone(),
          call_shape: shape_name,
          batch,
        });
      }
      services.push(ServiceSummary {
        file: file.name.clone(),
        name: service.name.clone(),
        methods,
      });
    }
  }

  let report = AnalyzeReport { types, services };
  let json = if pretty {
    serde_json::to_string_pretty(&report)?
  } else {
    serde_json::to_string(&report)?
  };
  println!("{}", json);

  Ok(())
}
