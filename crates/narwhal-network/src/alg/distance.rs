//! Shortest-path distance labeling.
//!
//! Dijkstra over the undirected adjacency of a network. The frontier is kept in insertion
//! order and extraction takes the first vertex with the minimum tentative distance, so ties
//! resolve to whichever vertex was reached first. That choice is what decides which parent
//! claims a child in [`derive_children`] when several parents are equidistant.

use crate::error::{Error, Result};
use crate::{Edge, Network, VertexId};

/// Hop counts from one source vertex. `None` marks an unreached vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distances {
    source: VertexId,
    labels: Vec<Option<u32>>,
}

impl Distances {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn get(&self, v: VertexId) -> Option<u32> {
        self.labels.get(v.index()).copied().flatten()
    }

    pub fn is_reached(&self, v: VertexId) -> bool {
        self.get(v).is_some()
    }

    pub fn max_distance(&self) -> Option<u32> {
        self.labels.iter().flatten().copied().max()
    }

    /// Reached vertices with their distance, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, u32)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.map(|d| (VertexId::from_index(i), d)))
    }
}

/// Minimum total edge weight from `source` to every vertex, indexed by vertex slot.
///
/// Negative or NaN weights are treated as zero.
pub fn shortest_paths<V, F>(
    net: &Network<V>,
    source: VertexId,
    mut weight: F,
) -> Result<Vec<Option<f64>>>
where
    F: FnMut(&Edge) -> f64,
{
    if !net.contains_vertex(source) {
        return Err(Error::MissingVertex { vertex: source });
    }

    let slots = net.slot_count();
    let mut dist: Vec<Option<f64>> = vec![None; slots];
    let mut finished = vec![false; slots];
    let mut frontier: Vec<VertexId> = vec![source];
    dist[source.index()] = Some(0.0);

    while let Some(pos) = least(&frontier, &dist) {
        let v = frontier.remove(pos);
        finished[v.index()] = true;
        let Some(dv) = dist[v.index()] else {
            continue;
        };
        for &e in net.incident_edges(v) {
            let Some(edge) = net.edge(e) else {
                continue;
            };
            let Some(w) = edge.other(v) else {
                continue;
            };
            if finished[w.index()] {
                continue;
            }
            let candidate = dv + weight(edge).max(0.0);
            match dist[w.index()] {
                None => {
                    dist[w.index()] = Some(candidate);
                    frontier.push(w);
                }
                Some(dw) if candidate < dw => dist[w.index()] = Some(candidate),
                Some(_) => {}
            }
        }
    }

    Ok(dist)
}

fn least(frontier: &[VertexId], dist: &[Option<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in frontier.iter().enumerate() {
        let d = dist[v.index()].unwrap_or(f64::INFINITY);
        if best.is_none_or(|(_, b)| d < b) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Hop counts from `source` with every edge weighing 1.
pub fn find_distances<V>(net: &Network<V>, source: VertexId) -> Result<Distances> {
    let labels = shortest_paths(net, source, |_| 1.0)?
        .into_iter()
        .map(|d| d.map(|d| d.round() as u32))
        .collect();
    Ok(Distances { source, labels })
}

/// Parent/child structure derived from distance labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildTree {
    parents: Vec<Option<VertexId>>,
    children: Vec<Vec<VertexId>>,
}

impl ChildTree {
    pub fn children(&self, v: VertexId) -> &[VertexId] {
        self.children.get(v.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, v: VertexId) -> Option<VertexId> {
        self.parents.get(v.index()).copied().flatten()
    }
}

/// A vertex `w` becomes a child of `v` when they are adjacent and `w` sits exactly one hop
/// further from the source. Vertices are scanned in insertion order and incident edges in
/// insertion order; the first parent found claims the child.
pub fn derive_children<V>(net: &Network<V>, distances: &Distances) -> ChildTree {
    let slots = net.slot_count();
    let mut tree = ChildTree {
        parents: vec![None; slots],
        children: vec![Vec::new(); slots],
    };
    let mut claimed = vec![false; slots];
    if let Some(slot) = claimed.get_mut(distances.source().index()) {
        *slot = true;
    }

    for v in net.vertex_ids() {
        let Some(d) = distances.get(v) else {
            continue;
        };
        for w in net.neighbors(v) {
            if claimed[w.index()] || distances.get(w) != Some(d + 1) {
                continue;
            }
            claimed[w.index()] = true;
            tree.parents[w.index()] = Some(v);
            tree.children[v.index()].push(w);
        }
    }

    tree
}
