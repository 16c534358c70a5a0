//! The snapshot record cached per controller instance.
//!
//! A [`Snapshot`] pairs a plain-data copy of the controller's view-model with
//! the scroll offset at the moment of capture. It must survive a round trip
//! through a string-based store, so both halves are plain JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scroll offset in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    /// Top-left of the document.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendered state of a controller: field name to plain value.
///
/// Applying another view-model overwrites matching fields and leaves the
/// rest untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewModel {
    fields: Map<String, Value>,
}

impl ViewModel {
    /// Create an empty view-model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set a field.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Copy every field of `other` into `self`.
    pub fn set_attributes(&mut self, other: &ViewModel) {
        for (field, value) in &other.fields {
            self.fields.insert(field.clone(), value.clone());
        }
    }

    /// Plain-data copy of all fields.
    pub fn to_object(&self) -> Map<String, Value> {
        self.fields.clone()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Return `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for ViewModel {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ViewModel {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}

/// Cached view-model plus scroll position.
///
/// Created right before a history change, consumed once per restore attempt
/// and never mutated; the next capture under the same key overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// View-model fields. Older records spell this `vm`.
    #[serde(alias = "vm")]
    pub viewmodel: ViewModel,
    /// Scroll offset at capture time.
    pub position: ScrollPosition,
}

impl Snapshot {
    /// Create a snapshot.
    pub fn new(viewmodel: ViewModel, position: ScrollPosition) -> Self {
        Self {
            viewmodel,
            position,
        }
    }

    /// Encode as a JSON value for storage.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Decode a stored value. Records missing either field are rejected.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
