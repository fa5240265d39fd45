use crate::network::VertexId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("vertex {vertex} is not part of the network")]
    MissingVertex { vertex: VertexId },

    #[error("node `{key}` already has a vertex in the network")]
    DuplicateNode { key: String },
}

pub type Result<T> = std::result::Result<T, Error>;
