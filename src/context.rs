//! The layout-request API.
//!
//! [`LayoutContext`] owns everything a request touches: the registry, the
//! result cache, the render store, the publisher and the random source.
//! Requests take `&mut self`, so one owner's cache lookups and writes never
//! interleave.
//!
//! A request either fully succeeds or leaves the cache and store untouched:
//! results are written only after computation and projection both succeed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::cache::{LayoutCache, LayoutResult};
use crate::error::{LayoutError, Result};
use crate::geometry::{EdgeProjector, PositionArrays};
use crate::graph::TemporalGraph;
use crate::publish::PublishCoordinator;
use crate::registry::LayoutRegistry;
use crate::render::{MemoryRenderStore, RenderStore, Viewport};
use crate::settings::LayoutSettings;
use crate::viewport::ViewportResizer;

/// A published layout and the viewport fitted to it.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedLayout {
    pub result: Arc<LayoutResult>,
    pub viewport: Option<Viewport>,
}

pub struct LayoutContext<S = MemoryRenderStore> {
    registry: LayoutRegistry,
    cache: LayoutCache,
    store: S,
    publisher: PublishCoordinator,
    projector: EdgeProjector,
    rng: ChaCha8Rng,
}

impl LayoutContext<MemoryRenderStore> {
    pub fn new(settings: LayoutSettings) -> Self {
        Self::with_store(settings, MemoryRenderStore::new())
    }
}

impl Default for LayoutContext<MemoryRenderStore> {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

impl<S: RenderStore> LayoutContext<S> {
    pub fn with_store(settings: LayoutSettings, store: S) -> Self {
        let cache = match settings.cache_max_timesteps {
            Some(limit) => LayoutCache::with_max_timesteps(limit),
            None => LayoutCache::new(),
        };
        let rng = match settings.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            registry: LayoutRegistry::from_settings(&settings),
            cache,
            store,
            publisher: PublishCoordinator::new(ViewportResizer::new(settings.padding)),
            projector: EdgeProjector,
            rng,
        }
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Mutable registry access, for registering additional algorithms.
    pub fn registry_mut(&mut self) -> &mut LayoutRegistry {
        &mut self.registry
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Drop cached layouts whose snapshot a new edge at `timestep` changes.
    ///
    /// An edge at `s` is visible from `s` onwards, so only earlier timesteps
    /// survive; an untimed edge is visible everywhere.
    pub fn invalidate_from(&mut self, timestep: Option<u32>) {
        match timestep {
            Some(first) => self.cache.retain_timesteps(|t| t < first),
            None => self.cache.clear(),
        }
        tracing::debug!(?timestep, remaining = self.cache.len(), "invalidated cached layouts");
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cached layout for `(timestep, name)`, computing it on a miss.
    pub fn compute_layout(
        &mut self,
        graph: &TemporalGraph,
        timestep: u32,
        name: &str,
    ) -> Result<Arc<LayoutResult>> {
        if let Some(cached) = self.cache.get(timestep, name) {
            tracing::debug!(timestep, algorithm = name, "layout cache hit");
            return Ok(cached);
        }
        tracing::debug!(timestep, algorithm = name, "layout cache miss");
        self.recompute_layout(graph, timestep, name)
    }

    /// Compute and cache a layout, ignoring any cached entry.
    pub fn recompute_layout(
        &mut self,
        graph: &TemporalGraph,
        timestep: u32,
        name: &str,
    ) -> Result<Arc<LayoutResult>> {
        let algorithm = self
            .registry
            .get(name)
            .ok_or_else(|| LayoutError::UnknownAlgorithm {
                name: name.to_owned(),
            })?;

        let positions = algorithm.compute_with_rng(graph, &mut self.rng)?;
        let arrays = PositionArrays::from_positions(&positions);
        let edges = self.projector.project_arrays(graph, &arrays)?;

        let result = Arc::new(LayoutResult {
            algorithm: algorithm.name().to_owned(),
            timestep,
            positions,
            arrays,
            edges,
        });
        self.cache.put(timestep, name, Arc::clone(&result));
        Ok(result)
    }

    /// Layout with an algorithm drawn uniformly from the registry.
    pub fn compute_random_layout(
        &mut self,
        graph: &TemporalGraph,
        timestep: u32,
    ) -> Result<Arc<LayoutResult>> {
        let name = self.pick_random()?;
        self.compute_layout(graph, timestep, name)
    }

    /// Compute (or fetch) a layout and publish it.
    pub fn apply(
        &mut self,
        graph: &TemporalGraph,
        timestep: u32,
        name: &str,
    ) -> Result<AppliedLayout> {
        let result = self.compute_layout(graph, timestep, name)?;
        let viewport = self.publisher.publish(&self.store, &result);
        Ok(AppliedLayout { result, viewport })
    }

    /// [`Self::apply`] with an algorithm drawn uniformly from the registry.
    pub fn apply_random(&mut self, graph: &TemporalGraph, timestep: u32) -> Result<AppliedLayout> {
        let name = self.pick_random()?;
        self.apply(graph, timestep, name)
    }

    fn pick_random(&mut self) -> Result<&'static str> {
        let (name, _) = self
            .registry
            .get_random(&mut self.rng)
            .ok_or(LayoutError::EmptyRegistry)?;
        tracing::debug!(algorithm = name, "picked random layout");
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeAttrs, NodeId};
    use crate::render::FieldValue;

    fn seeded() -> LayoutContext {
        LayoutContext::new(LayoutSettings {
            seed: Some(7),
            ..LayoutSettings::default()
        })
    }

    #[test]
    fn test_second_request_is_served_from_cache() {
        let mut context = seeded();
        let graph = TemporalGraph::from_edges([(0, 1), (1, 2)]);

        let first = context.compute_layout(&graph, 0, "random").unwrap();
        let second = context.compute_layout(&graph, 0, "random").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let fresh = context.recompute_layout(&graph, 0, "random").unwrap();
        assert!(!Arc::ptr_eq(&first, &fresh));
        let cached = context.compute_layout(&graph, 0, "random").unwrap();
        assert!(Arc::ptr_eq(&fresh, &cached));
    }

    #[test]
    fn test_invalidation_keeps_earlier_timesteps() {
        let mut context = seeded();
        let graph = TemporalGraph::from_edges([(0, 1), (1, 2)]);
        for timestep in 0..4 {
            context.compute_layout(&graph, timestep, "circular").unwrap();
        }

        context.invalidate_from(Some(2));
        assert!(context.cache().get(1, "circular").is_some());
        assert!(context.cache().get(2, "circular").is_none());
        assert_eq!(context.cache().len(), 2);

        context.invalidate_from(None);
        assert!(context.cache().is_empty());
    }

    #[test]
    fn test_unknown_algorithm_writes_nothing() {
        let mut context = seeded();
        let graph = TemporalGraph::from_edges([(0, 1)]);

        for name in ["simple_layouts", "kmeans", "nope"] {
            match context.apply(&graph, 0, name) {
                Err(LayoutError::UnknownAlgorithm { name: unknown }) => assert_eq!(unknown, name),
                other => panic!("expected UnknownAlgorithm, got {other:?}"),
            }
        }
        assert!(context.cache().is_empty());
        assert!(context.store().field_names().is_empty());
        assert!(context.store().viewport().is_none());
    }

    #[test]
    fn test_random_layout_uses_registered_name() {
        let mut context = seeded();
        let graph = TemporalGraph::from_edges([(0, 1), (1, 2), (2, 0)]);

        let applied = context.apply_random(&graph, 4).unwrap();
        assert!(context.registry().get(&applied.result.algorithm).is_some());
        assert!(context.cache().get(4, &applied.result.algorithm).is_some());
        assert!(applied.viewport.is_some());
    }

    #[test]
    fn test_empty_registry_is_an_error() {
        let mut context = seeded();
        *context.registry_mut() = LayoutRegistry::empty();
        let graph = TemporalGraph::from_edges([(0, 1)]);
        assert!(matches!(
            context.compute_random_layout(&graph, 0),
            Err(LayoutError::EmptyRegistry)
        ));
    }

    #[test]
    fn test_apply_publishes_snapshot() {
        let mut context = seeded();
        let mut timeline = TemporalGraph::new();
        timeline.add_edge_between(NodeId(0), NodeId(1), EdgeAttrs::at(0));
        timeline.add_edge_between(NodeId(1), NodeId(2), EdgeAttrs::at(1));
        timeline.add_edge_between(NodeId(2), NodeId(3), EdgeAttrs::at(2));

        let snapshot = timeline.snapshot(1);
        let applied = context.apply(&snapshot, 1, "circular").unwrap();

        assert_eq!(applied.result.arrays.nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(applied.result.edges.len(), 2);
        assert_eq!(
            context.store().read_field("x").map(|f| f.len()),
            Some(3)
        );
        assert!(matches!(
            context.store().read_field("xs"),
            Some(FieldValue::Segments(segments)) if segments.len() == 2
        ));
        assert_eq!(context.store().viewport(), applied.viewport);
    }
}
