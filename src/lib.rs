//! Timeline Layout - WASM Module
//!
//! Layout algorithms for time-evolving graphs, compiled to WebAssembly and
//! exposed to JavaScript via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: temporal multigraph (petgraph's StableGraph) and its simple
//!   weighted projection
//! - `algorithms`: community detection and centrality
//! - `layout`: the layout algorithms behind one closed enum
//! - `geometry`: position arrays and edge segment projection
//! - `cache` / `registry`: per-(timestep, algorithm) results and named algorithms
//! - `render` / `publish` / `viewport`: render fields, fork/join publishing
//!   and viewport fitting
//! - `context`: the layout-request API tying the above together

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod algorithms;
pub mod cache;
pub mod context;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod publish;
pub mod registry;
pub mod render;
pub mod settings;
pub mod viewport;

pub use error::{LayoutError, Result};

use context::LayoutContext;
use graph::{EdgeAttrs, NodeId, TemporalGraph};
use render::{FieldValue, RenderStore};
use settings::LayoutSettings;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log `err` to the browser console and convert it for JavaScript.
fn js_error(err: impl std::fmt::Display) -> JsError {
    let message = err.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsError::new(&message)
}

/// Main entry point for timeline layouts.
///
/// Holds the full timeline graph; every request lays out the snapshot at
/// the requested timestep.
#[wasm_bindgen]
pub struct TimelineLayoutWasm {
    graph: TemporalGraph,
    context: LayoutContext,
}

#[wasm_bindgen]
impl TimelineLayoutWasm {
    /// Create an empty timeline.
    ///
    /// `settings` may be `undefined` or a (partial) settings object.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> std::result::Result<TimelineLayoutWasm, JsError> {
        let settings: LayoutSettings = if settings.is_undefined() || settings.is_null() {
            LayoutSettings::default()
        } else {
            serde_wasm_bindgen::from_value(settings).map_err(js_error)?
        };
        Ok(Self {
            graph: TemporalGraph::new(),
            context: LayoutContext::new(settings),
        })
    }

    // =========================================================================
    // Graph Construction
    // =========================================================================

    /// Add a node. Returns false if it already existed.
    ///
    /// Snapshots only hold nodes with a visible edge, so cached layouts
    /// stay valid.
    #[wasm_bindgen(js_name = addNode)]
    pub fn add_node(&mut self, id: u32) -> bool {
        self.graph.add_node(NodeId(id))
    }

    #[wasm_bindgen(js_name = hasNode)]
    pub fn has_node(&self, id: u32) -> bool {
        self.graph.contains_node(NodeId(id))
    }

    /// Add an edge, creating missing endpoints.
    ///
    /// Edges without a timestep are visible at every timestep. Cached
    /// layouts the edge is visible in are dropped.
    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge(
        &mut self,
        source: u32,
        target: u32,
        timestep: Option<u32>,
        weight: Option<f32>,
    ) {
        let attrs = EdgeAttrs { timestep, weight };
        self.graph.add_edge_between(NodeId(source), NodeId(target), attrs);
        self.context.invalidate_from(timestep);
    }

    /// Add edges from flat pairs [src0, tgt0, src1, tgt1, ...] at one timestep.
    ///
    /// Pairs naming an unknown node are skipped. Returns the number added.
    #[wasm_bindgen(js_name = addEdgesFromPairs)]
    pub fn add_edges_from_pairs(&mut self, pairs: &[u32], timestep: Option<u32>) -> u32 {
        let attrs = EdgeAttrs {
            timestep,
            weight: None,
        };
        let added = self.graph.add_edges_from_pairs(pairs, attrs);
        if added > 0 {
            self.context.invalidate_from(timestep);
        }
        added
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// Largest timestep on any edge.
    #[wasm_bindgen(js_name = latestTimestep)]
    pub fn latest_timestep(&self) -> Option<u32> {
        self.graph.latest_timestep()
    }

    /// Drop the graph and every cached layout.
    #[wasm_bindgen(js_name = clearGraph)]
    pub fn clear_graph(&mut self) {
        self.graph.clear();
        self.context.clear_cache();
    }

    // =========================================================================
    // Layout Requests
    // =========================================================================

    /// Compute (or fetch from cache) the named layout at `timestep`.
    #[wasm_bindgen(js_name = computeLayout)]
    pub fn compute_layout(
        &mut self,
        timestep: u32,
        name: &str,
    ) -> std::result::Result<JsValue, JsError> {
        let snapshot = self.graph.snapshot(timestep);
        let result = self
            .context
            .compute_layout(&snapshot, timestep, name)
            .map_err(js_error)?;
        serde_wasm_bindgen::to_value(&*result).map_err(js_error)
    }

    /// Compute the named layout at `timestep` and publish it.
    #[wasm_bindgen(js_name = applyLayout)]
    pub fn apply_layout(
        &mut self,
        timestep: u32,
        name: &str,
    ) -> std::result::Result<JsValue, JsError> {
        let snapshot = self.graph.snapshot(timestep);
        let applied = self
            .context
            .apply(&snapshot, timestep, name)
            .map_err(js_error)?;
        serde_wasm_bindgen::to_value(&applied).map_err(js_error)
    }

    /// Publish a layout drawn at random from the registry.
    #[wasm_bindgen(js_name = applyRandomLayout)]
    pub fn apply_random_layout(
        &mut self,
        timestep: u32,
    ) -> std::result::Result<JsValue, JsError> {
        let snapshot = self.graph.snapshot(timestep);
        let applied = self
            .context
            .apply_random(&snapshot, timestep)
            .map_err(js_error)?;
        serde_wasm_bindgen::to_value(&applied).map_err(js_error)
    }

    #[wasm_bindgen(js_name = clearCache)]
    pub fn clear_cache(&mut self) {
        self.context.clear_cache();
    }

    #[wasm_bindgen(js_name = cachedLayoutCount)]
    pub fn cached_layout_count(&self) -> u32 {
        self.context.cache().len() as u32
    }

    // =========================================================================
    // Render Fields
    // =========================================================================

    /// Copy of a render field; segment fields are flattened to
    /// [start0, end0, start1, end1, ...].
    #[wasm_bindgen(js_name = getField)]
    pub fn get_field(&self, name: &str) -> Option<Float32Array> {
        let values = self.context.store().read_field(name)?.to_flat();
        Some(Float32Array::from(&values[..]))
    }

    /// Set per-node sizes used when fitting the viewport.
    #[wasm_bindgen(js_name = setNodeSizes)]
    pub fn set_node_sizes(&self, sizes: &[f32]) {
        self.context
            .store()
            .write_field(publish::SIZE_FIELD, FieldValue::Scalars(sizes.to_vec()));
    }

    /// Current viewport as `{ x_range, y_range }`, or `undefined`.
    #[wasm_bindgen(js_name = getViewport)]
    pub fn get_viewport(&self) -> std::result::Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.context.store().viewport()).map_err(js_error)
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Names of every selectable algorithm, sorted.
    #[wasm_bindgen(js_name = algorithmNames)]
    pub fn algorithm_names(&self) -> Vec<String> {
        self.context
            .registry()
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Algorithm groups as `[{ label, members }]`, in menu order.
    #[wasm_bindgen(js_name = algorithmGroups)]
    pub fn algorithm_groups(&self) -> std::result::Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.context.registry().groups()).map_err(js_error)
    }
}
