//! Graph data structures consumed by the layouts.
//!
//! `TemporalGraph` is the time-evolving multigraph supplied by callers;
//! `WeightedGraph` is its simple weighted projection used by spring,
//! spectral, force-directed and community layouts.

mod edge;
mod node;
mod temporal;
mod weighted;

pub use edge::EdgeAttrs;
pub use node::{NodeId, canonical_pair};
pub use temporal::TemporalGraph;
pub use weighted::WeightedGraph;
