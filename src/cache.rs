//! Per-(timestep, algorithm) layout result cache.
//!
//! Results are immutable and shared as `Arc<LayoutResult>`; a put replaces
//! the previous entry wholesale. The cache is unbounded unless a timestep
//! limit is set, in which case the timesteps least recently written are
//! evicted first, all of their algorithms together.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::geometry::{EdgeGeometry, PositionArrays};
use crate::layout::NodePositions;

/// A computed layout for one timestep and algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    pub algorithm: String,
    pub timestep: u32,
    #[serde(skip)]
    pub positions: NodePositions,
    pub arrays: PositionArrays,
    pub edges: EdgeGeometry,
}

type CacheKey = (u32, String);

/// Latest result per (timestep, algorithm name).
#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: HashMap<CacheKey, Arc<LayoutResult>>,
    /// Timesteps in write order, most recent last.
    recency: Vec<u32>,
    max_timesteps: Option<usize>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_timesteps` timesteps.
    pub fn with_max_timesteps(max_timesteps: usize) -> Self {
        Self {
            max_timesteps: Some(max_timesteps.max(1)),
            ..Self::default()
        }
    }

    pub fn get(&self, timestep: u32, algorithm: &str) -> Option<Arc<LayoutResult>> {
        self.entries.get(&(timestep, algorithm.to_owned())).cloned()
    }

    /// Store `result`, returning the entry it replaced.
    pub fn put(
        &mut self,
        timestep: u32,
        algorithm: &str,
        result: Arc<LayoutResult>,
    ) -> Option<Arc<LayoutResult>> {
        let previous = self.entries.insert((timestep, algorithm.to_owned()), result);

        self.recency.retain(|&t| t != timestep);
        self.recency.push(timestep);
        if let Some(limit) = self.max_timesteps {
            while self.recency.len() > limit {
                let evicted = self.recency.remove(0);
                self.entries.retain(|(t, _), _| *t != evicted);
                tracing::debug!(timestep = evicted, "evicted cached layouts");
            }
        }

        previous
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    /// Number of cached (timestep, algorithm) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry whose timestep fails `keep`.
    pub fn retain_timesteps(&mut self, mut keep: impl FnMut(u32) -> bool) {
        self.recency.retain(|&t| keep(t));
        let recency = &self.recency;
        self.entries.retain(|(t, _), _| recency.contains(t));
    }
}
