#![forbid(unsafe_code)]

//! Layout-time graph model used by `narwhal`.
//!
//! A [`Network`] is built from the current diagram content at the start of a layout pass,
//! threaded through that pass by value, and dropped when the pass ends. Vertices carry a
//! typed extension payload (`V`) so each layout can attach its own scratch fields without
//! dynamic properties.

pub mod alg;
pub mod error;
pub mod geom;
mod network;

pub use error::{Error, Result};
pub use network::{Edge, EdgeId, Network, Vertex, VertexId};
