use prost::Message;

/// A set of compiled schema files, as written by `protoc --descriptor_set_out`.
#[derive(Clone, PartialEq, Message)]
pub struct FileDescriptorSet {
    #[prost(message, repeated, tag = "1")]
    pub file: Vec<FileDescriptorProto>,
}

/// One compiled schema file: package, declared types and services, plus the
/// source-location map used for comment extraction.
#[derive(Clone, PartialEq, Message)]
pub struct FileDescriptorProto {
    /// File name, relative to the root of the source tree.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Dotted package name, e.g. "foo" or "foo.bar". May be empty.
    #[prost(string, tag = "2")]
    pub package: String,
    /// Names of files imported by this file.
    #[prost(string, repeated, tag = "3")]
    pub dependency: Vec<String>,
    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<DescriptorProto>,
    #[prost(message, repeated, tag = "5")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[prost(message, repeated, tag = "6")]
    pub service: Vec<ServiceDescriptorProto>,
    #[prost(message, optional, tag = "9")]
    pub source_code_info: Option<SourceCodeInfo>,
    /// "proto2" or "proto3". Empty means proto2.
    #[prost(string, tag = "12")]
    pub syntax: String,
}

/// A message declaration, possibly with nested messages and enums. Synthetic
/// map-entry messages appear here as nested types carrying
/// `options.map_entry`.
#[derive(Clone, PartialEq, Message)]
pub struct DescriptorProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub field: Vec<FieldDescriptorProto>,
    #[prost(message, repeated, tag = "3")]
    pub nested_type: Vec<DescriptorProto>,
    #[prost(message, repeated, tag = "4")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[prost(message, optional, tag = "7")]
    pub options: Option<MessageOptions>,
    #[prost(message, repeated, tag = "8")]
    pub oneof_decl: Vec<OneofDescriptorProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct FieldDescriptorProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub number: i32,
    #[prost(enumeration = "field_descriptor_proto::Label", tag = "4")]
    pub label: i32,
    #[prost(enumeration = "field_descriptor_proto::Type", tag = "5")]
    pub r#type: i32,
    /// Fully-qualified type name (".pkg.Message") for message and enum kinds;
    /// empty for scalars.
    #[prost(string, tag = "6")]
    pub type_name: String,
    #[prost(message, optional, tag = "8")]
    pub options: Option<FieldOptions>,
    /// Index into the enclosing message's `oneof_decl`, when the field is a
    /// oneof member. Presence matters: index 0 is a valid oneof.
    #[prost(int32, optional, tag = "9")]
    pub oneof_index: Option<i32>,
    /// Set when the field is a proto3 `optional`, which the compiler models
    /// as a synthetic single-field oneof.
    #[prost(bool, tag = "17")]
    pub proto3_optional: bool,
}

pub mod field_descriptor_proto {
    /// The closed scalar/composite kind enumeration from descriptor.proto.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Double = 1,
        Float = 2,
        Int64 = 3,
        Uint64 = 4,
        Int32 = 5,
        Fixed64 = 6,
        Fixed32 = 7,
        Bool = 8,
        String = 9,
        /// Proto2 legacy; never produced by proto3 and not supported here.
        Group = 10,
        Message = 11,
        Bytes = 12,
        Uint32 = 13,
        Enum = 14,
        Sfixed32 = 15,
        Sfixed64 = 16,
        Sint32 = 17,
        Sint64 = 18,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Label {
        Optional = 1,
        Required = 2,
        Repeated = 3,
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct OneofDescriptorProto {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct EnumDescriptorProto {
    #[prost(string, tag = "1")]
    pub name: String,
    /// Declared values in declaration order. A value numbered 0 is not
    /// guaranteed to exist (proto2 permits enums without one).
    #[prost(message, repeated, tag = "2")]
    pub value: Vec<EnumValueDescriptorProto>,
    #[prost(message, optional, tag = "3")]
    pub options: Option<EnumOptions>,
}

#[derive(Clone, PartialEq, Message)]
pub struct EnumValueDescriptorProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int32, tag = "2")]
    pub number: i32,
}

#[derive(Clone, PartialEq, Message)]
pub struct ServiceDescriptorProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub method: Vec<MethodDescriptorProto>,
    #[prost(message, optional, tag = "3")]
    pub options: Option<ServiceOptions>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MethodDescriptorProto {
    #[prost(string, tag = "1")]
    pub name: String,
    /// Fully-qualified request message name.
    #[prost(string, tag = "2")]
    pub input_type: String,
    /// Fully-qualified response message name.
    #[prost(string, tag = "3")]
    pub output_type: String,
    #[prost(message, optional, tag = "4")]
    pub options: Option<MethodOptions>,
    #[prost(bool, tag = "5")]
    pub client_streaming: bool,
    #[prost(bool, tag = "6")]
    pub server_streaming: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct MessageOptions {
    #[prost(bool, tag = "3")]
    pub deprecated: bool,
    /// Marks the synthetic key/value message the compiler generates for each
    /// map-typed field.
    #[prost(bool, tag = "7")]
    pub map_entry: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct FieldOptions {
    #[prost(bool, optional, tag = "2")]
    pub packed: Option<bool>,
    #[prost(bool, tag = "3")]
    pub deprecated: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct EnumOptions {
    #[prost(bool, tag = "3")]
    pub deprecated: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct ServiceOptions {
    #[prost(bool, tag = "33")]
    pub deprecated: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct MethodOptions {
    #[prost(bool, tag = "33")]
    pub deprecated: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct SourceCodeInfo {
    #[prost(message, repeated, tag = "1")]
    pub location: Vec<source_code_info::Location>,
}

pub mod source_code_info {
    use prost::Message;

    /// One source location, addressed by the field-number path described in
    /// descriptor.proto (e.g. `[4, 0, 2, 1]` = second field of the first
    /// message).
    #[derive(Clone, PartialEq, Message)]
    pub struct Location {
        #[prost(int32, repeated, tag = "1")]
        pub path: Vec<i32>,
        #[prost(int32, repeated, tag = "2")]
        pub span: Vec<i32>,
        #[prost(string, optional, tag = "3")]
        pub leading_comments: Option<String>,
        #[prost(string, optional, tag = "4")]
        pub trailing_comments: Option<String>,
    }
}
