//! Arena-backed network container.
//!
//! Vertex and edge ids are slot indices. Deleting a vertex or an edge empties its slot; ids are
//! never reused within one network, so per-slot side tables (`vec![..; net.slot_count()]`)
//! stay valid for the whole pass.

use crate::error::{Error, Result};
use crate::geom::{self, Point, Rect, Size};
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::ops::{Index, IndexMut};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

impl VertexId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Layout-time stand-in for one node.
#[derive(Debug, Clone)]
pub struct Vertex<V> {
    /// Key of the owning node; `None` for a dummy vertex.
    pub node: Option<String>,
    pub center: Point,
    pub size: Size,
    pub data: V,
}

impl<V: Default> Vertex<V> {
    pub fn new(node: impl Into<String>, center: Point, size: Size) -> Self {
        Self {
            node: Some(node.into()),
            center,
            size: clamp_size(size),
            data: V::default(),
        }
    }

    pub fn dummy(center: Point, size: Size) -> Self {
        Self {
            node: None,
            center,
            size: clamp_size(size),
            data: V::default(),
        }
    }
}

impl<V> Vertex<V> {
    pub fn is_dummy(&self) -> bool {
        self.node.is_none()
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    pub fn bounds(&self) -> Rect {
        geom::rect_centered(self.center, self.size)
    }
}

fn clamp_size(size: Size) -> Size {
    geom::size(size.width.max(0.0), size.height.max(0.0))
}

/// Layout-time stand-in for one link, or a dummy adjacency when `link` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub link: Option<String>,
}

impl Edge {
    pub fn new(from: VertexId, to: VertexId, link: Option<String>) -> Self {
        Self { from, to, link }
    }

    pub fn dummy(from: VertexId, to: VertexId) -> Self {
        Self::new(from, to, None)
    }

    pub fn is_dummy(&self) -> bool {
        self.link.is_none()
    }

    /// The endpoint opposite `v`, or `None` when `v` is not an endpoint.
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.from == v {
            Some(self.to)
        } else if self.to == v {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct Network<V> {
    vertices: Vec<Option<Vertex<V>>>,
    edges: Vec<Option<Edge>>,
    // Incident edges per vertex slot, in insertion order.
    adjacency: Vec<Vec<EdgeId>>,
    node_index: HashMap<String, VertexId>,
    vertex_count: usize,
    edge_count: usize,
}

impl<V> Default for Network<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Network<V> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            node_index: HashMap::default(),
            vertex_count: 0,
            edge_count: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Number of vertex slots ever allocated, including deleted ones.
    pub fn slot_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        matches!(self.vertices.get(id.0), Some(Some(_)))
    }

    pub fn add_vertex(&mut self, vertex: Vertex<V>) -> Result<VertexId> {
        let id = VertexId(self.vertices.len());
        if let Some(key) = vertex.node.as_deref() {
            if self.node_index.contains_key(key) {
                return Err(Error::DuplicateNode {
                    key: key.to_string(),
                });
            }
            self.node_index.insert(key.to_string(), id);
        }
        self.vertices.push(Some(vertex));
        self.adjacency.push(Vec::new());
        self.vertex_count += 1;
        Ok(id)
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        for v in [edge.from, edge.to] {
            if !self.contains_vertex(v) {
                return Err(Error::MissingVertex { vertex: v });
            }
        }
        let id = EdgeId(self.edges.len());
        self.adjacency[edge.from.0].push(id);
        if edge.to != edge.from {
            self.adjacency[edge.to.0].push(id);
        }
        self.edges.push(Some(edge));
        self.edge_count += 1;
        Ok(id)
    }

    /// Creates and registers an edge from `from` to `to`.
    pub fn link_vertexes(
        &mut self,
        from: VertexId,
        to: VertexId,
        link: Option<String>,
    ) -> Result<EdgeId> {
        self.add_edge(Edge::new(from, to, link))
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.0)?.take()?;
        for v in [edge.from, edge.to] {
            if let Some(adj) = self.adjacency.get_mut(v.0) {
                adj.retain(|e| *e != id);
            }
        }
        self.edge_count -= 1;
        Some(edge)
    }

    /// Removes a vertex together with every edge incident to it.
    pub fn delete_vertex(&mut self, id: VertexId) -> Option<Vertex<V>> {
        let vertex = self.vertices.get_mut(id.0)?.take()?;
        let incident = std::mem::take(&mut self.adjacency[id.0]);
        for e in incident {
            self.delete_edge(e);
        }
        if let Some(key) = vertex.node.as_deref() {
            self.node_index.remove(key);
        }
        self.vertex_count -= 1;
        Some(vertex)
    }

    /// The vertex standing in for the node with key `node`.
    pub fn find_vertex(&self, node: &str) -> Option<VertexId> {
        self.node_index.get(node).copied()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<V>> {
        self.vertices.get(id.0)?.as_ref()
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex<V>> {
        self.vertices.get_mut(id.0)?.as_mut()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)?.as_ref()
    }

    /// Live vertex ids in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_some())
            .map(|(i, _)| VertexId(i))
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex<V>)> {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (VertexId(i), v)))
    }

    pub fn vertices_mut(&mut self) -> impl Iterator<Item = (VertexId, &mut Vertex<V>)> {
        self.vertices
            .iter_mut()
            .enumerate()
            .filter_map(|(i, v)| v.as_mut().map(|v| (VertexId(i), v)))
    }

    /// Live edge ids in insertion order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| EdgeId(i))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeId(i), e)))
    }

    pub fn incident_edges(&self, v: VertexId) -> &[EdgeId] {
        self.adjacency.get(v.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges coming into `v`.
    pub fn source_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incident_edges(v)
            .iter()
            .copied()
            .filter(move |&e| self.edge(e).is_some_and(|edge| edge.to == v))
    }

    /// Edges going out of `v`.
    pub fn destination_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incident_edges(v)
            .iter()
            .copied()
            .filter(move |&e| self.edge(e).is_some_and(|edge| edge.from == v))
    }

    /// Opposite endpoints of every incident edge, in edge insertion order. A vertex reachable
    /// through several edges is reported once per edge.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.incident_edges(v)
            .iter()
            .filter_map(move |&e| self.edge(e).and_then(|edge| edge.other(v)))
    }

    pub fn successors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.destination_edges(v)
            .filter_map(move |e| self.edge(e).map(|edge| edge.to))
    }

    pub fn predecessors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.source_edges(v)
            .filter_map(move |e| self.edge(e).map(|edge| edge.from))
    }
}

impl<V> Index<VertexId> for Network<V> {
    type Output = Vertex<V>;

    fn index(&self, id: VertexId) -> &Vertex<V> {
        match self.vertex(id) {
            Some(v) => v,
            None => panic!("vertex {id} is not part of the network"),
        }
    }
}

impl<V> IndexMut<VertexId> for Network<V> {
    fn index_mut(&mut self, id: VertexId) -> &mut Vertex<V> {
        match self.vertex_mut(id) {
            Some(v) => v,
            None => panic!("vertex {id} is not part of the network"),
        }
    }
}

impl<V> Index<EdgeId> for Network<V> {
    type Output = Edge;

    fn index(&self, id: EdgeId) -> &Edge {
        match self.edge(id) {
            Some(e) => e,
            None => panic!("edge {id} is not part of the network"),
        }
    }
}
