/* Generation options - resolved once from the flat option string before any
 * generation starts, immutable afterwards. */

use crate::error::{GenError, GenResult};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ClientImpl {
  /* Promise-returning client class */
  Plain,
  /* rxjs Observable-returning client class */
  ObservableStream,
  /* interfaces only, no client class */
  None,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LongRepresentation {
  /* 64-bit integers as `number` (loses precision past 2^53) */
  Number,
  /* 64-bit integers as decimal strings */
  String,
  /* 64-bit integers as `bigint` */
  ArbitraryPrecision,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OneofStyle {
  /* one absent-unioned property per member field */
  PerField,
  /* one property per oneof holding a `$case`-tagged union */
  DiscriminatedUnion,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OptionalStyle {
  /* message fields declared as `T | undefined` */
  UnionWithAbsent,
  /* message fields declared as optional properties `field?: T` */
  NativeOptional,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TargetEnvironment {
  /* bytes as `Buffer` */
  NodeLike,
  /* bytes as `Uint8Array` */
  BrowserLike,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EnumRepresentation {
  /* enum members carry their declared numbers */
  Numeric,
  /* enum members carry their declared names as string values */
  StringName,
}

#[derive(Clone, Debug)]
pub struct GenerationOptions {
  pub context: bool,
  pub output_client_impl: ClientImpl,
  pub add_transport_metadata: bool,
  pub return_as_stream: bool,
  pub lower_case_method_names: bool,
  pub long_representation: LongRepresentation,
  pub oneof_style: OneofStyle,
  pub optional_style: OptionalStyle,
  pub target_environment: TargetEnvironment,
  pub enum_representation: EnumRepresentation,
}

impl Default for GenerationOptions {
  fn default() -> Self {
    Self {
      context: false,
      output_client_impl: ClientImpl::Plain,
      add_transport_metadata: false,
      return_as_stream: false,
      lower_case_method_names: false,
      long_representation: LongRepresentation::Number,
      oneof_style: OneofStyle::PerField,
      optional_style: OptionalStyle::UnionWithAbsent,
      target_environment: TargetEnvironment::NodeLike,
      enum_representation: EnumRepresentation::Numeric,
    }
  }
}

impl GenerationOptions {
  /* Parse the comma-separated `key[=value]` option string. A bare key turns
   * a boolean option on. Unrecognized keys and values are fatal for the
   * whole run rather than silently ignored. */
  pub fn parse(parameter: &str) -> GenResult<Self> {
    let mut options = Self::default();

    for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
      let (key, value) = match part.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (part, None),
      };

      match key {
        "context" => options.context = parse_bool(key, value)?,
        "addTransportMetadata" => options.add_transport_metadata = parse_bool(key, value)?,
        "returnAsStream" => options.return_as_stream = parse_bool(key, value)?,
        "lowerCaseMethodNames" => options.lower_case_method_names = parse_bool(key, value)?,
        "outputClientImpl" => {
          options.output_client_impl = match require_value(key, value)? {
            "plain" => ClientImpl::Plain,
            "observable-stream" => ClientImpl::ObservableStream,
            "none" => ClientImpl::None,
            other => return Err(unknown_value(key, other)),
          }
        }
        "longRepresentation" => {
          options.long_representation = match require_value(key, value)? {
            "number" => LongRepresentation::Number,
            "string" => LongRepresentation::String,
            "arbitrary-precision" => LongRepresentation::ArbitraryPrecision,
            other => return Err(unknown_value(key, other)),
          }
        }
        "oneofStyle" => {
          options.oneof_style = match require_value(key, value)? {
            "perField" => OneofStyle::PerField,
            "discriminatedUnion" => OneofStyle::DiscriminatedUnion,
            other => return Err(unknown_value(key, other)),
          }
        }
        "optionalStyle" => {
          options.optional_style = match require_value(key, value)? {
            "unionWithAbsent" => OptionalStyle::UnionWithAbsent,
            "nativeOptional" => OptionalStyle::NativeOptional,
            other => return Err(unknown_value(key, other)),
          }
        }
        "targetEnvironment" => {
          options.target_environment = match require_value(key, value)? {
            "nodeLike" => TargetEnvironment::NodeLike,
            "browserLike" => TargetEnvironment::BrowserLike,
            other => return Err(unknown_value(key, other)),
          }
        }
        "enumRepresentation" => {
          options.enum_representation = match require_value(key, value)? {
            "numeric" => EnumRepresentation::Numeric,
            "stringName" => EnumRepresentation::StringName,
            other => return Err(unknown_value(key, other)),
          }
        }
        _ => {
          return Err(GenError::UnknownOption { key: key.to_string() });
        }
      }
    }

    Ok(options)
  }
}

fn parse_bool(key: &str, value: Option<&str>) -> GenResult<bool> {
  match value {
    None | Some("true") => Ok(true),
    Some("false") => Ok(false),
    Some(other) => Err(unknown_value(key, other)),
  }
}

fn require_value<'a>(key: &str, value: Option<&'a str>) -> GenResult<&'a str> {
  value.ok_or_else(|| GenError::UnknownOptionValue {
    key: key.to_string(),
    value: String::new(),
  })
}

fn unknown_value(key: &str, value: &str) -> GenError {
  GenError::UnknownOptionValue {
    key: key.to_string(),
    value: value.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let options = GenerationOptions::parse("").unwrap();
    assert!(!options.context);
    assert_eq!(options.output_client_impl, ClientImpl::Plain);
    assert_eq!(options.long_representation, LongRepresentation::Number);
    assert_eq!(options.oneof_style, OneofStyle::PerField);
  }

  #[test]
  fn test_full_option_string() {
    let options = GenerationOptions::parse(
      "context,outputClientImpl=observable-stream,longRepresentation=string,\
       oneofStyle=discriminatedUnion,optionalStyle=nativeOptional,\
       targetEnvironment=browserLike,enumRepresentation=stringName,\
       lowerCaseMethodNames=true,addTransportMetadata,returnAsStream",
    )
    .unwrap();
    assert!(options.context);
    assert!(options.add_transport_metadata);
    assert!(options.return_as_stream);
    assert!(options.lower_case_method_names);
    assert_eq!(options.output_client_impl, ClientImpl::ObservableStream);
    assert_eq!(options.long_representation, LongRepresentation::String);
    assert_eq!(options.oneof_style, OneofStyle::DiscriminatedUnion);
    assert_eq!(options.optional_style, OptionalStyle::NativeOptional);
    assert_eq!(options.target_environment, TargetEnvironment::BrowserLike);
    assert_eq!(options.enum_representation, EnumRepresentation::StringName);
  }

  #[test]
  fn test_unknown_key_is_fatal() {
    let err = GenerationOptions::parse("noSuchOption=1").unwrap_err();
    assert!(matches!(err, GenError::UnknownOption { key } if key == "noSuchOption"));
  }

  #[test]
  fn test_unknown_value_is_fatal() {
    let err = GenerationOptions::parse("longRepresentation=float").unwrap_err();
    assert!(matches!(
      err,
      GenError::UnknownOptionValue { key, value } if key == "longRepresentation" && value == "float"
    ));
  }

  #[test]
  fn test_bool_value_must_be_true_or_false() {
    let err = GenerationOptions::parse("context=yes").unwrap_err();
    assert!(matches!(err, GenError::UnknownOptionValue { .. }));
  }
}
