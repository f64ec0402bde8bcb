/* End-to-end generation tests over hand-built generation requests. */

use tsgen::generate;
use tsgen::generate_response;
use tsgen_types::field_descriptor_proto::{Label, Type};
use tsgen_types::source_code_info::Location;
use tsgen_types::{
  CodeGeneratorRequest, DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto,
  FieldDescriptorProto, FileDescriptorProto, MessageOptions, MethodDescriptorProto, MethodOptions,
  ServiceDescriptorProto, SourceCodeInfo,
};

fn scalar(name: &str, kind: Type) -> FieldDescriptorProto {
  FieldDescriptorProto {
    name: name.to_string(),
    r#type: kind as i32,
    label: Label::Optional as i32,
    ..Default::default()
  }
}

fn message_ref(name: &str, type_name: &str) -> FieldDescriptorProto {
  FieldDescriptorProto {
    name: name.to_string(),
    r#type: Type::Message as i32,
    label: Label::Optional as i32,
    type_name: type_name.to_string(),
    ..Default::default()
  }
}

fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
  field.label = Label::Repeated as i32;
  field
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
  DescriptorProto {
    name: name.to_string(),
    field: fields,
    ..Default::default()
  }
}

fn map_entry(name: &str, value_type: &str) -> DescriptorProto {
  DescriptorProto {
    name: name.to_string(),
    field: vec![scalar("key", Type::String), message_ref("value", value_type)],
    options: Some(MessageOptions {
      map_entry: true,
      ..Default::default()
    }),
    ..Default::default()
  }
}

fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
  MethodDescriptorProto {
    name: name.to_string(),
    input_type: input.to_string(),
    output_type: output.to_string(),
    ..Default::default()
  }
}

/* A package with a plain message, an enum, a map field, and a service
 * carrying one batchable, one cacheable and one plain method. */
fn widgets_file() -> FileDescriptorProto {
  let widget = message(
    "Widget",
    vec![scalar("id", Type::String), scalar("weight", Type::Int64)],
  );

  let mut inventory = message(
    "Inventory",
    vec![repeated(message_ref("by_id", ".acme.Inventory.ByIdEntry"))],
  );
  inventory.nested_type.push(map_entry("ByIdEntry", ".acme.Widget"));

  FileDescriptorProto {
    name: "acme/widgets.proto".to_string(),
    package: "acme".to_string(),
    syntax: "proto3".to_string(),
    message_type: vec![
      widget,
      inventory,
      message("GetWidgetRequest", vec![scalar("id", Type::String)]),
      message(
        "BatchGetWidgetsRequest",
        vec![repeated(scalar("ids", Type::String))],
      ),
      message(
        "BatchGetWidgetsResponse",
        vec![repeated(message_ref("widgets", ".acme.Widget"))],
      ),
    ],
    enum_type: vec![EnumDescriptorProto {
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
    }],
    service: vec![ServiceDescriptorProto {
      name: "WidgetService".to_string(),
      method: vec![
        method(
          "BatchGetWidgets",
          ".acme.BatchGetWidgetsRequest",
          ".acme.BatchGetWidgetsResponse",
        ),
        method("GetFeaturedWidget", ".acme.GetWidgetRequest", ".acme.Widget"),
        method("SaveWidget", ".acme.Widget", ".acme.Widget"),
      ],
      ..Default::default()
    }],
    ..Default::default()
  }
}

fn request_for(files: Vec<FileDescriptorProto>, generate: &[&str], parameter: &str) -> CodeGeneratorRequest {
  CodeGeneratorRequest {
    file_to_generate: generate.iter().map(|s| s.to_string()).collect(),
    parameter: Some(parameter.to_string()),
    proto_file: files,
  }
}

#[test]
fn test_generates_data_types_and_service() {
  let request = request_for(vec![widgets_file()], &["acme/widgets.proto"], "context=true");
  let response = generate(&request).unwrap();

  assert_eq!(response.error, None);
  assert_eq!(response.file.len(), 1);
  let file = &response.file[0];
  assert_eq!(file.name, "acme/widgets.ts");

  let content = &file.content;
  assert!(content.starts_with("/* Auto-generated TypeScript code */"));
  assert!(content.contains("export interface Widget {"));
  assert!(content.contains("  id: string;"));
  assert!(content.contains("export function createBaseWidget(): Widget {"));
  assert!(content.contains("export enum Status {"));
  assert!(content.contains("  ACTIVE = 0,"));
  assert!(content.contains("  by_id: { [key: string]: Widget };"));
  assert!(content.contains("export interface WidgetService<Context extends DataLoaders> {"));
  assert!(content.contains("GetWidget(ctx: Context, id: string): Promise<Widget>;"));
  assert!(content.contains("export class WidgetServiceClientImpl<Context extends DataLoaders>"));
  assert!(content.contains("interface Rpc<Context> {"));
  assert!(content.contains("export interface DataLoaders {"));

  /* synthetic map entries never surface as declarations */
  assert!(!content.contains("interface Inventory_ByIdEntry"));

  /* loader machinery imports */
  assert!(content.contains("import DataLoader from \"dataloader\";"));
  assert!(content.contains("import hash from \"object-hash\";"));
  assert!(content.contains("import { Reader } from \"protobufjs/minimal\";"));
}

#[test]
fn test_two_runs_are_byte_identical() {
  let request = request_for(vec![widgets_file()], &["acme/widgets.proto"], "context=true");
  let first = generate(&request).unwrap();
  let second = generate(&request).unwrap();
  assert_eq!(first, second);
}

#[test]
fn test_cross_file_references_become_imports() {
  let orders = FileDescriptorProto {
    name: "acme/orders.proto".to_string(),
    package: "acme".to_string(),
    syntax: "proto3".to_string(),
    message_type: vec![message("Order", vec![message_ref("widget", ".acme.Widget")])],
    ..Default::default()
  };

  let request = request_for(vec![widgets_file(), orders], &["acme/orders.proto"], "");
  let response = generate(&request).unwrap();

  assert_eq!(response.file.len(), 1, "dependency-only files are not emitted");
  let content = &response.file[0].content;
  assert!(content.contains("import { Widget } from \"./acme/widgets\";"));
  assert!(content.contains("  widget: Widget | undefined;"));
}

#[test]
fn test_unresolved_reference_fails_whole_run() {
  let broken = FileDescriptorProto {
    name: "acme/broken.proto".to_string(),
    package: "acme".to_string(),
    message_type: vec![message("Holder", vec![message_ref("ghost", ".acme.Ghost")])],
    ..Default::default()
  };

  let request = request_for(vec![broken], &["acme/broken.proto"], "");
  assert!(generate(&request).is_err());

  let response = generate_response(&request);
  let error = response.error.expect("fatal error expected");
  assert!(error.contains(".acme.Ghost"), "error names the offending type: {}", error);
  assert!(response.file.is_empty(), "no partial output on a fatal run");
}

#[test]
fn test_unrecognized_option_fails_whole_run() {
  let request = request_for(vec![widgets_file()], &["acme/widgets.proto"], "frobnicate=yes");
  let response = generate_response(&request);
  assert!(response.error.expect("fatal error expected").contains("frobnicate"));
}

#[test]
fn test_client_impl_none_emits_interfaces_only() {
  let request = request_for(
    vec![widgets_file()],
    &["acme/widgets.proto"],
    "outputClientImpl=none",
  );
  let response = generate(&request).unwrap();
  let content = &response.file[0].content;
  assert!(content.contains("export interface WidgetService {"));
  assert!(!content.contains("ClientImpl"));
  assert!(!content.contains("interface Rpc"));
}

#[test]
fn test_deprecated_method_gets_annotation() {
  let mut file = widgets_file();
  file.service[0].method[2].options = Some(MethodOptions { deprecated: true });

  let request = request_for(vec![file], &["acme/widgets.proto"], "");
  let response = generate(&request).unwrap();
  let content = &response.file[0].content;
  assert!(content.contains("/** @deprecated */\n  SaveWidget("));
}

#[test]
fn test_comments_travel_from_source_info() {
  let mut file = widgets_file();
  file.source_code_info = Some(SourceCodeInfo {
    location: vec![
      Location {
        path: vec![4, 0],
        span: vec![],
        leading_comments: Some(" A widget in the catalog.\n".to_string()),
        trailing_comments: None,
      },
      Location {
        path: vec![6, 0, 2, 1],
        span: vec![],
        leading_comments: Some(" Fetch one widget by id.\n".to_string()),
        trailing_comments: None,
      },
    ],
  });

  let request = request_for(vec![file], &["acme/widgets.proto"], "");
  let response = generate(&request).unwrap();
  let content = &response.file[0].content;
  assert!(content.contains("/** A widget in the catalog. */\nexport interface Widget {"));
  assert!(content.contains("/** Fetch one widget by id. */"));
}

#[test]
fn test_long_representation_flows_through_declarations_and_defaults() {
  let request = request_for(
    vec![widgets_file()],
    &["acme/widgets.proto"],
    "longRepresentation=arbitrary-precision",
  );
  let response = generate(&request).unwrap();
  let content = &response.file[0].content;
  assert!(content.contains("  weight: bigint;"));
  assert!(content.contains("weight: 0n"));
}

#[test]
fn test_missing_requested_file_is_fatal() {
  let request = request_for(vec![widgets_file()], &["acme/missing.proto"], "");
  let response = generate_response(&request);
  assert!(response.error.expect("fatal error expected").contains("acme/missing.proto"));
}
