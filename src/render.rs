//! Render store: the named data fields a view draws from.
//!
//! Node and edge fields are written by different threads during publish, so
//! stores are `Sync` and lock per call. Nothing spans more than one field.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Value of one render field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// One number per element.
    Scalars(Vec<f32>),
    /// One `[start, end]` pair per element.
    Segments(Vec<[f32; 2]>),
}

impl FieldValue {
    /// Flattened contents: segments become `[s0, e0, s1, e1, ...]`.
    pub fn to_flat(&self) -> Vec<f32> {
        match self {
            Self::Scalars(values) => values.clone(),
            Self::Segments(pairs) => pairs.iter().flatten().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Scalars(values) => values.len(),
            Self::Segments(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Visible data ranges of a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub x_range: (f32, f32),
    pub y_range: (f32, f32),
}

impl Viewport {
    /// Whether `(x, y)` lies strictly inside both ranges.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x_range.0 < x && x < self.x_range.1 && self.y_range.0 < y && y < self.y_range.1
    }
}

/// A surface layouts are published to.
pub trait RenderStore: Sync {
    fn write_field(&self, name: &str, value: FieldValue);
    fn read_field(&self, name: &str) -> Option<FieldValue>;
    fn set_viewport(&self, viewport: Viewport);
    fn viewport(&self) -> Option<Viewport>;
}

/// In-memory render store.
#[derive(Debug, Default)]
pub struct MemoryRenderStore {
    fields: RwLock<HashMap<String, FieldValue>>,
    viewport: RwLock<Option<Viewport>>,
}

impl MemoryRenderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all written fields, sorted.
    pub fn field_names(&self) -> Vec<String> {
        let fields = self.fields.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = fields.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl RenderStore for MemoryRenderStore {
    fn write_field(&self, name: &str, value: FieldValue) {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), value);
    }

    fn read_field(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.write().unwrap_or_else(PoisonError::into_inner) = Some(viewport);
    }

    fn viewport(&self) -> Option<Viewport> {
        *self.viewport.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_overwrite() {
        let store = MemoryRenderStore::new();
        store.write_field("x", FieldValue::Scalars(vec![1.0]));
        store.write_field("x", FieldValue::Scalars(vec![2.0, 3.0]));
        store.write_field("xs", FieldValue::Segments(vec![[0.0, 1.0]]));

        assert_eq!(store.read_field("x"), Some(FieldValue::Scalars(vec![2.0, 3.0])));
        assert_eq!(store.read_field("xs").map(|v| v.to_flat()), Some(vec![0.0, 1.0]));
        assert!(store.read_field("y").is_none());
        assert_eq!(store.field_names(), vec!["x".to_owned(), "xs".to_owned()]);
    }

    #[test]
    fn test_viewport_round_trip() {
        let store = MemoryRenderStore::new();
        assert!(store.viewport().is_none());
        let viewport = Viewport {
            x_range: (-1.0, 1.0),
            y_range: (0.0, 2.0),
        };
        store.set_viewport(viewport);
        assert_eq!(store.viewport(), Some(viewport));
        assert!(viewport.contains(0.0, 1.0));
        assert!(!viewport.contains(1.0, 1.0));
    }

    #[test]
    fn test_segment_fields_serialize_as_nested_arrays() {
        let json = serde_json::to_string(&FieldValue::Segments(vec![[0.0, 1.5]])).unwrap();
        assert_eq!(json, "[[0.0,1.5]]");
    }
}
