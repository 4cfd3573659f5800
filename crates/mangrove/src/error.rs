use crate::graph::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid color: expected 3 components, got {actual}")]
    InvalidColor { actual: usize },
    #[error("node id already registered: {id}")]
    DuplicateId { id: NodeId },
    #[error("graph is already rendered; build a new graph to change its structure")]
    AlreadyRendered,
}

pub type Result<T> = std::result::Result<T, Error>;
