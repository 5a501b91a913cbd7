//! Publishing layout results to a render store.
//!
//! Node fields and edge fields are independent, so they are written by two
//! scoped threads. Both writes are joined before the viewport is fitted,
//! and the fit reads the node fields back from the store, so it always sees
//! the positions just written.

use crate::cache::LayoutResult;
use crate::render::{FieldValue, RenderStore, Viewport};
use crate::viewport::ViewportResizer;

/// Node position fields.
pub const NODE_FIELDS: [&str; 2] = ["x", "y"];
/// Edge segment fields.
pub const EDGE_FIELDS: [&str; 7] = ["xs", "ys", "x0", "x1", "y0", "y1", "cx0"];
/// Optional per-node size field read by the viewport fit.
pub const SIZE_FIELD: &str = "size";

#[derive(Debug, Clone, Copy, Default)]
pub struct PublishCoordinator {
    pub resizer: ViewportResizer,
}

impl PublishCoordinator {
    pub fn new(resizer: ViewportResizer) -> Self {
        Self { resizer }
    }

    /// Write `result` to `store`, then fit and store the viewport.
    ///
    /// Returns the new viewport, or `None` when the result has no nodes (the
    /// stored viewport is then left as it was).
    pub fn publish<S: RenderStore + ?Sized>(
        &self,
        store: &S,
        result: &LayoutResult,
    ) -> Option<Viewport> {
        let _span = tracing::debug_span!(
            "publish",
            algorithm = %result.algorithm,
            timestep = result.timestep
        )
        .entered();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::scope(|scope| {
            scope.spawn(|| write_nodes(store, result));
            scope.spawn(|| write_edges(store, result));
        });

        // No threads on wasm32; the ordering guarantee is the same.
        #[cfg(target_arch = "wasm32")]
        {
            write_nodes(store, result);
            write_edges(store, result);
        }

        self.resize(store)
    }

    /// Fit the viewport to the node fields currently in `store`.
    pub fn resize<S: RenderStore + ?Sized>(&self, store: &S) -> Option<Viewport> {
        let x = store.read_field("x")?.to_flat();
        let y = store.read_field("y")?.to_flat();
        let sizes = store.read_field(SIZE_FIELD).map(|field| field.to_flat());

        let viewport = self.resizer.fit(&x, &y, sizes.as_deref())?;
        store.set_viewport(viewport);
        tracing::info!(
            x_range = ?viewport.x_range,
            y_range = ?viewport.y_range,
            "resized network graph"
        );
        Some(viewport)
    }
}

fn write_nodes<S: RenderStore + ?Sized>(store: &S, result: &LayoutResult) {
    store.write_field("x", FieldValue::Scalars(result.arrays.x.clone()));
    store.write_field("y", FieldValue::Scalars(result.arrays.y.clone()));
}

fn write_edges<S: RenderStore + ?Sized>(store: &S, result: &LayoutResult) {
    let edges = &result.edges;
    store.write_field("xs", FieldValue::Segments(edges.xs.clone()));
    store.write_field("ys", FieldValue::Segments(edges.ys.clone()));
    store.write_field("x0", FieldValue::Scalars(edges.x0.clone()));
    store.write_field("x1", FieldValue::Scalars(edges.x1.clone()));
    store.write_field("y0", FieldValue::Scalars(edges.y0.clone()));
    store.write_field("y1", FieldValue::Scalars(edges.y1.clone()));
    store.write_field("cx0", FieldValue::Scalars(edges.cx0()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{EdgeGeometry, PositionArrays};
    use crate::graph::NodeId;
    use crate::layout::NodePositions;
    use crate::render::MemoryRenderStore;

    fn result_with(x: Vec<f32>, y: Vec<f32>) -> LayoutResult {
        let nodes = (0..x.len() as u32).map(NodeId).collect();
        LayoutResult {
            algorithm: "circular".to_owned(),
            timestep: 0,
            positions: NodePositions::new(),
            arrays: PositionArrays { nodes, x, y },
            edges: EdgeGeometry {
                xs: vec![[0.0, 10.0]],
                ys: vec![[0.0, 5.0]],
                x0: vec![0.0],
                x1: vec![10.0],
                y0: vec![0.0],
                y1: vec![5.0],
            },
        }
    }

    #[test]
    fn test_publish_writes_every_field_and_fits() {
        let store = MemoryRenderStore::new();
        let result = result_with(vec![0.0, 10.0], vec![0.0, 5.0]);
        let viewport = PublishCoordinator::default().publish(&store, &result).unwrap();

        let mut expected: Vec<String> = NODE_FIELDS
            .iter()
            .chain(EDGE_FIELDS.iter())
            .map(|name| name.to_string())
            .collect();
        expected.sort_unstable();
        assert_eq!(store.field_names(), expected);
        assert_eq!(store.read_field("cx0"), Some(FieldValue::Scalars(vec![0.5])));

        assert_eq!(store.viewport(), Some(viewport));
        assert!(viewport.x_range.0 < 0.0 && viewport.x_range.1 > 10.0);
        assert!(viewport.y_range.0 < 0.0 && viewport.y_range.1 > 5.0);
    }

    #[test]
    fn test_size_field_is_honoured() {
        let store = MemoryRenderStore::new();
        store.write_field(SIZE_FIELD, FieldValue::Scalars(vec![4.0, 4.0]));
        let result = result_with(vec![0.0, 10.0], vec![0.0, 0.0]);
        let viewport = PublishCoordinator::new(ViewportResizer::new(1.0))
            .publish(&store, &result)
            .unwrap();
        assert_eq!(viewport.x_range, (-2.0, 12.0));
    }

    #[test]
    fn test_empty_result_keeps_viewport() {
        let store = MemoryRenderStore::new();
        let previous = Viewport {
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
        };
        store.set_viewport(previous);
        let mut result = result_with(Vec::new(), Vec::new());
        result.edges = EdgeGeometry::default();

        assert!(PublishCoordinator::default().publish(&store, &result).is_none());
        assert_eq!(store.viewport(), Some(previous));
        assert_eq!(store.read_field("x"), Some(FieldValue::Scalars(Vec::new())));
    }
}
