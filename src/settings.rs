//! Runtime settings.
//!
//! Every field has a default, so a partial (or empty) settings object is
//! valid. The wasm surface reads it from a JS object; tests read JSON.

use serde::Deserialize;

use crate::algorithms::{KatzConfig, LouvainConfig};
use crate::layout::{PlacementConfig, SpringConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Viewport padding factor applied to each axis half-span (default: 1.5).
    pub padding: f32,
    pub spring: SpringConfig,
    /// Anchor and member scales of the community and centrality layouts.
    pub placement: PlacementConfig,
    /// Score bands of the centrality layout (default: 8).
    pub centrality_bands: u32,
    pub louvain: LouvainConfig,
    pub katz: KatzConfig,
    /// Keep at most this many timesteps cached; unbounded when absent.
    pub cache_max_timesteps: Option<usize>,
    /// Seed for layout randomness; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            padding: 1.5,
            spring: SpringConfig::default(),
            placement: PlacementConfig::default(),
            centrality_bands: 8,
            louvain: LouvainConfig::default(),
            katz: KatzConfig::default(),
            cache_max_timesteps: None,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let settings: LayoutSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.padding, 1.5);
        assert_eq!(settings.centrality_bands, 8);
        assert_eq!(settings.spring.iterations, 50);
        assert!(settings.cache_max_timesteps.is_none());
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_partial_nested_override() {
        let settings: LayoutSettings = serde_json::from_str(
            r#"{
                "padding": 2.0,
                "spring": { "iterations": 120 },
                "louvain": { "resolution": 0.5 },
                "cache_max_timesteps": 16,
                "seed": 42
            }"#,
        )
        .unwrap();

        assert_eq!(settings.padding, 2.0);
        assert_eq!(settings.spring.iterations, 120);
        assert_eq!(settings.spring.threshold, 1e-4);
        assert_eq!(settings.louvain.resolution, 0.5);
        assert_eq!(settings.louvain.max_iterations, 100);
        assert_eq!(settings.placement.anchor_scale, 3.0);
        assert_eq!(settings.cache_max_timesteps, Some(16));
        assert_eq!(settings.seed, Some(42));
    }
}
