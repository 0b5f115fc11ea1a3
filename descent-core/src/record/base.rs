//! Base implementation of records for logging.
use crate::error::DescentError;
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// Scalar, e.g., a reward or a loss.
    Scalar(f32),

    /// String, e.g., a phase transition label.
    String(String),
}

/// A container for key-value pairs produced during training.
#[derive(Debug)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<'_, String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// On key collisions the value of `record` wins.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, DescentError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(DescentError::RecordValueTypeError("Scalar".to_string())),
            None => Err(DescentError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, DescentError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(DescentError::RecordValueTypeError("String".to_string())),
            None => Err(DescentError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
