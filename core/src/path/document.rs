use std::io::Read;

use serde_json::Value;

use super::literal::parse_literal;
use super::types::{PathError, PathExpression};

/// A JSON value paired with the name of where it came from.
///
/// The origin (usually a file path) only decorates error messages; the
/// document does no I/O of its own beyond the optional reader constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    origin: String,
    root: Value,
}

impl Document {
    pub fn new(origin: impl Into<String>, root: Value) -> Self {
        Self { origin: origin.into(), root }
    }

    pub fn from_json_str(origin: impl Into<String>, text: &str) -> Result<Self, PathError> {
        let origin = origin.into();
        let root = serde_json::from_str(text).map_err(|e| PathError::InvalidJson {
            origin: origin.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { origin, root })
    }

    pub fn from_reader<R: Read>(origin: impl Into<String>, reader: R) -> Result<Self, PathError> {
        let origin = origin.into();
        let root = serde_json::from_reader(reader).map_err(|e| PathError::InvalidJson {
            origin: origin.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { origin, root })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn get(&self, path: &str) -> Result<Value, PathError> {
        PathExpression::parse(path)?.resolve(&self.root, &self.origin)
    }

    /// Overwrite an existing location.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        PathExpression::parse(path)?.write(&mut self.root, value, &self.origin)
    }

    /// Write, creating the final mapping key if it is missing.
    pub fn insert(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        PathExpression::parse(path)?.insert(&mut self.root, value, &self.origin)
    }

    /// `set` with the value given as literal text (see [`parse_literal`]).
    pub fn set_literal(&mut self, path: &str, literal: &str) -> Result<(), PathError> {
        self.set(path, parse_literal(literal))
    }

    pub fn to_json_string(&self) -> String {
        self.root.to_string()
    }
}
