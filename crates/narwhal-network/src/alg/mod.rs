//! Graph algorithms over a [`Network`](crate::Network).

pub mod distance;

pub use distance::{ChildTree, Distances, derive_children, find_distances, shortest_paths};

use crate::{Network, VertexId};

/// Vertices without incoming edges, in insertion order.
pub fn roots<V>(net: &Network<V>) -> Vec<VertexId> {
    net.vertex_ids()
        .filter(|&v| net.source_edges(v).next().is_none())
        .collect()
}

/// Picks a layout root when the caller did not name one: the first node-backed vertex without
/// incoming edges, else the first vertex. `None` only for an empty network.
pub fn choose_root<V>(net: &Network<V>) -> Option<VertexId> {
    net.vertices()
        .find(|(id, v)| !v.is_dummy() && net.source_edges(*id).next().is_none())
        .map(|(id, _)| id)
        .or_else(|| net.vertex_ids().next())
}
