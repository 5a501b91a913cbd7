use crate::graph::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout algorithm `{algorithm}` is not implemented")]
    NotImplemented { algorithm: &'static str },
    #[error("edge references {node}, which is absent from the position snapshot")]
    InconsistentSnapshot { node: NodeId },
    #[error("position arrays are misaligned: {nodes} nodes, {x} x coordinates, {y} y coordinates")]
    MisalignedArrays { nodes: usize, x: usize, y: usize },
    #[error("unknown layout algorithm `{name}`")]
    UnknownAlgorithm { name: String },
    #[error("no layout algorithm is registered")]
    EmptyRegistry,
}

pub type Result<T> = std::result::Result<T, LayoutError>;
