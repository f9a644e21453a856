use anyhow::{Context, Result};
use json_patch::{jsonptr::PointerBuf, PatchOperation, RemoveOperation, ReplaceOperation};
use serde_json::Value;

/// Builds a pointer from an unescaped base such as `/spec/imagePullSecrets` followed by extra tokens
pub(crate) fn json_pointer(base: &str, tokens: &[&str]) -> PointerBuf {
    PointerBuf::from_tokens(base.split('/').filter(|token| !token.is_empty()).chain(tokens.iter().copied()))
}

pub(crate) fn replace_op(path: PointerBuf, value: impl Into<Value>) -> PatchOperation {
    PatchOperation::Replace(ReplaceOperation { path, value: value.into() })
}

pub(crate) fn remove_op(path: PointerBuf) -> PatchOperation {
    PatchOperation::Remove(RemoveOperation { path })
}

/// A missing or null field is `None`, anything other than an array is an error
pub(crate) fn read_optional_array<'a>(value: &'a Value, pointer: &str) -> Result<Option<&'a Vec<Value>>> {
    match value.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(array) => Ok(Some(array.as_array().context(format!("{} not an array", pointer))?)),
    }
}

/// A missing or null field is `None`, anything other than a string is an error
pub(crate) fn read_optional_string<'a>(value: &'a Value, pointer: &str) -> Result<Option<&'a str>> {
    match value.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(string) => Ok(Some(string.as_str().context(format!("{} not a string", pointer))?)),
    }
}

/// The `name` of a local object reference such as `{"name": "builder-dockercfg-x8s7k"}`
pub(crate) fn read_reference_name<'a>(reference: &'a Value, pointer: &str) -> Result<&'a str> {
    reference
        .as_object()
        .context(format!("{} not an object", pointer))?
        .get("name")
        .context(format!("{} has no name", pointer))?
        .as_str()
        .context(format!("{}/name not a string", pointer))
}
