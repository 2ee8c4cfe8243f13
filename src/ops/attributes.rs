use std::collections::BTreeMap;

use crate::{Error, Result};

/// The value of a single operator attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// An integer attribute.
    Int(i64),
    /// A floating point attribute.
    Float(f32),
    /// A list of integers attribute.
    Ints(Vec<i64>),
    /// A string attribute.
    String(String),
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<Vec<i64>> for AttributeValue {
    fn from(value: Vec<i64>) -> Self {
        AttributeValue::Ints(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

/// The attributes of a graph node, resolved once when its operator is constructed.
///
/// ```rust
/// use tensor_seq::ops::Attributes;
///
/// let attrs = Attributes::new().with("axis", 1_i64).with("keepdims", 0_i64);
/// assert_eq!(attrs.get_int("axis").unwrap(), 1);
/// assert_eq!(attrs.get_int_or("new_axis", 0).unwrap(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    /// Create an empty set of attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, replacing any previous value with the same name.
    pub fn with(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add an attribute, replacing any previous value with the same name.
    pub fn insert(&mut self, name: &str, value: impl Into<AttributeValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Get an attribute by name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Get a required integer attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the attribute is missing or is not an integer.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(_) => self.get_int_or(name, 0),
            None => {
                crate::log::error!("missing required attribute '{name}'");
                Err(Error::InvalidArgument("missing required attribute"))
            }
        }
    }

    /// Get an optional integer attribute, or `default` if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the attribute exists but is not an integer.
    pub fn get_int_or(&self, name: &str, default: i64) -> Result<i64> {
        match self.get(name) {
            None => Ok(default),
            Some(AttributeValue::Int(value)) => Ok(*value),
            Some(other) => {
                crate::log::error!("attribute '{name}' must be an integer, got {other:?}");
                Err(Error::InvalidArgument("attribute is not an integer"))
            }
        }
    }

    /// Get an optional flag attribute, encoded as the integer 0 or 1, or `default` if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the attribute exists but is not 0 or 1.
    pub fn get_bool_or(&self, name: &str, default: bool) -> Result<bool> {
        match self.get_int_or(name, default as i64)? {
            0 => Ok(false),
            1 => Ok(true),
            other => {
                crate::log::error!("attribute '{name}' must be 0 or 1, got {other}");
                Err(Error::InvalidArgument("flag attribute must be 0 or 1"))
            }
        }
    }
}
