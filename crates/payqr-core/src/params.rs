//! Query-fragment serialization shared by the scheme builders.
//!
//! Both serializers keep the input order of their arguments; nothing is sorted or
//! percent-encoded.

use std::fmt::Display;

use crate::types::{ExtraField, FunctionArg};

/// Joins contract call arguments as `type=value` pairs.
pub fn serialize_as_query(args: &[FunctionArg]) -> String {
    args.iter()
        .map(|arg| format!("{}={}", arg.kind, arg.value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Joins extra attributes as `key:value` pairs.
pub fn serialize_as_colon(fields: &[ExtraField]) -> String {
    fields
        .iter()
        .map(|field| format!("{}:{}", field.key, field.value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends `&key=value` to a URI under construction.
pub(crate) fn append_field(uri: &mut String, key: &str, value: impl Display) {
    uri.push('&');
    uri.push_str(key);
    uri.push('=');
    uri.push_str(&value.to_string());
}
