//! Edge attributes.
//!
//! Edges of the temporal graph are undirected and may repeat between the
//! same pair of nodes. Each carries:
//! - An optional timestep (the snapshot in which the edge appears)
//! - An optional weight (treated as 1.0 when absent)

use serde::{Deserialize, Serialize};

/// Attributes attached to a single (possibly repeated) edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttrs {
    /// Timestep at which the edge appears, if it is time-stamped.
    pub timestep: Option<u32>,
    /// Explicit weight, if any.
    pub weight: Option<f32>,
}

impl EdgeAttrs {
    /// Attributes for an untimed, unweighted edge.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes for an edge appearing at `timestep`.
    #[inline]
    pub fn at(timestep: u32) -> Self {
        Self {
            timestep: Some(timestep),
            weight: None,
        }
    }

    /// Set the weight attribute.
    #[inline]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Weight contributed when multi-edges are collapsed.
    #[inline]
    pub fn effective_weight(&self) -> f32 {
        self.weight.unwrap_or(1.0)
    }

    /// Whether the edge belongs to the snapshot at `timestep`.
    ///
    /// Untimed edges belong to every snapshot.
    #[inline]
    pub fn visible_at(&self, timestep: u32) -> bool {
        self.timestep.is_none_or(|t| t <= timestep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_weight_defaults_to_one() {
        assert_eq!(EdgeAttrs::new().effective_weight(), 1.0);
        assert_eq!(EdgeAttrs::at(3).with_weight(2.5).effective_weight(), 2.5);
    }

    #[test]
    fn test_visible_at() {
        let untimed = EdgeAttrs::new();
        assert!(untimed.visible_at(0));

        let timed = EdgeAttrs::at(4);
        assert!(!timed.visible_at(3));
        assert!(timed.visible_at(4));
        assert!(timed.visible_at(10));
    }
}
