//! Layered tree layout.
//!
//! The tree is derived from the network's destination edges. Each subtree is measured bottom
//! up into a bounding rectangle relative to its root, children are offset from their parent,
//! and the roots are finally placed (stacked, or kept where they are).
//!
//! The split/merge, fishbone and double-tree layouts drive this module in stages through
//! [`TreeLayout::prepare`] and [`TreeLayout::arrange`] so they can adjust the network in
//! between.

mod angle;
mod arrange;

pub use angle::TreeAngle;

use crate::diagram::{Diagram, PartCollection};
use crate::error::{Error, Result, ensure_spacing};
use crate::network::{build_network, commit_centers};
use crate::routing;
use narwhal_network::geom::{self, Point, Rect, Vector};
use narwhal_network::{Network, VertexId};
use serde::Deserialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    /// Children stacked across the growth axis, centered on the parent.
    #[default]
    CenterChildren,
    /// Children paired on both sides of a bus running along the growth axis.
    BusBranching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arrangement {
    /// Trees stacked across the growth axis, starting at the origin.
    #[default]
    Stacked,
    /// Every root stays where it is.
    FixedRoots,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeOptions {
    pub angle: f64,
    pub layer_spacing: f64,
    pub node_spacing: f64,
    pub arrangement_spacing: f64,
    pub alignment: Alignment,
    pub arrangement: Arrangement,
    pub origin: Point,
    pub sets_port_spot: bool,
    pub sets_child_port_spot: bool,
    pub route_links: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            angle: 0.0,
            layer_spacing: 50.0,
            node_spacing: 20.0,
            arrangement_spacing: 50.0,
            alignment: Alignment::CenterChildren,
            arrangement: Arrangement::Stacked,
            origin: geom::point(0.0, 0.0),
            sets_port_spot: true,
            sets_child_port_spot: true,
            route_links: true,
        }
    }
}

impl TreeOptions {
    pub fn validate(&self) -> Result<()> {
        self.tree_angle("TreeLayout")?;
        ensure_spacing("layerSpacing", self.layer_spacing)?;
        ensure_spacing("nodeSpacing", self.node_spacing)?;
        ensure_spacing("arrangementSpacing", self.arrangement_spacing)?;
        Ok(())
    }

    pub(crate) fn tree_angle(&self, layout: &'static str) -> Result<TreeAngle> {
        TreeAngle::from_degrees(self.angle).ok_or(Error::UnsupportedAngle {
            layout,
            angle: self.angle,
        })
    }
}

/// Per-vertex tree state.
#[derive(Debug, Clone)]
pub struct TreeVertex {
    pub parent: Option<VertexId>,
    pub children: Vec<VertexId>,
    pub level: u32,
    pub angle: TreeAngle,
    pub alignment: Alignment,
    pub layer_spacing: f64,
    pub node_spacing: f64,
    /// Horizontal slant of a fishbone bone: -1, 0 or 1.
    pub direction: i8,
    /// Center offset from the parent's center.
    pub(crate) offset: Vector,
    /// Subtree bounds relative to this vertex's center.
    pub(crate) subtree: Rect,
}

impl Default for TreeVertex {
    fn default() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            level: 0,
            angle: TreeAngle::Right,
            alignment: Alignment::CenterChildren,
            layer_spacing: 0.0,
            node_spacing: 0.0,
            direction: 0,
            offset: geom::vector(0.0, 0.0),
            subtree: geom::rect_centered(geom::point(0.0, 0.0), geom::size(0.0, 0.0)),
        }
    }
}

/// Absolute bounds of the subtree rooted at `v`, as of the last arrangement.
pub fn subtree_bounds(net: &Network<TreeVertex>, v: VertexId) -> Rect {
    net[v].data.subtree.translate(net[v].center.to_vector())
}

#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    pub options: TreeOptions,
}

impl TreeLayout {
    pub fn new(options: TreeOptions) -> Self {
        Self { options }
    }

    pub fn do_layout(&self, diagram: &mut Diagram, collection: &PartCollection) -> Result<()> {
        self.options.validate()?;
        let mut net = self.make_network(diagram, collection)?;
        if net.is_empty() {
            return Ok(());
        }
        let roots = self.layout_network(&mut net)?;
        tracing::debug!(
            vertices = net.vertex_count(),
            trees = roots.len(),
            angle = self.options.angle,
            "tree layout"
        );
        self.commit_nodes(&net, diagram);
        self.commit_links(&net, diagram);
        Ok(())
    }

    pub fn make_network(
        &self,
        diagram: &Diagram,
        collection: &PartCollection,
    ) -> Result<Network<TreeVertex>> {
        build_network(diagram, collection)
    }

    /// Positions every vertex of `net`; returns the tree roots in placement order.
    pub fn layout_network(&self, net: &mut Network<TreeVertex>) -> Result<Vec<VertexId>> {
        let roots = self.prepare(net)?;
        self.arrange(net, &roots);
        Ok(roots)
    }

    /// Derives the trees and assigns per-vertex angle, alignment and spacing.
    pub fn prepare(&self, net: &mut Network<TreeVertex>) -> Result<Vec<VertexId>> {
        let angle = self.options.tree_angle("TreeLayout")?;
        let roots = build_trees(net);
        self.assign_tree_values(net, &roots, angle);
        Ok(roots)
    }

    /// Measures every tree and places it according to the arrangement.
    pub fn arrange(&self, net: &mut Network<TreeVertex>, roots: &[VertexId]) {
        let Some(angle) = TreeAngle::from_degrees(self.options.angle) else {
            return;
        };
        let mut cursor = 0.0;
        for &root in roots {
            arrange::measure(net, root);
            let center = match self.options.arrangement {
                Arrangement::FixedRoots => net[root].center,
                Arrangement::Stacked => {
                    let sub = net[root].data.subtree;
                    let origin = self.options.origin;
                    let (center, extent) = if angle.is_horizontal() {
                        (
                            geom::point(origin.x - sub.min_x(), origin.y + cursor - sub.min_y()),
                            sub.height(),
                        )
                    } else {
                        (
                            geom::point(origin.x + cursor - sub.min_x(), origin.y - sub.min_y()),
                            sub.width(),
                        )
                    };
                    cursor += extent + self.options.arrangement_spacing;
                    center
                }
            };
            arrange::place(net, root, center);
        }
    }

    fn assign_tree_values(&self, net: &mut Network<TreeVertex>, roots: &[VertexId], angle: TreeAngle) {
        let mut stack: Vec<VertexId> = Vec::new();
        for &root in roots {
            net[root].data.angle = angle;
            stack.push(root);
        }
        while let Some(v) = stack.pop() {
            let data = &mut net[v].data;
            data.alignment = self.options.alignment;
            data.layer_spacing = self.options.layer_spacing;
            data.node_spacing = self.options.node_spacing;
            let parent_angle = data.angle;
            let children = data.children.clone();

            let n = children.len();
            let (neg, pos) = parent_angle.side_angles();
            for (i, &c) in children.iter().enumerate() {
                let child_angle = match self.options.alignment {
                    Alignment::CenterChildren => parent_angle,
                    Alignment::BusBranching if n % 2 == 1 && i == n - 1 => parent_angle,
                    Alignment::BusBranching if i % 2 == 0 => neg,
                    Alignment::BusBranching => pos,
                };
                net[c].data.angle = child_angle;
                stack.push(c);
            }
        }
    }

    pub fn commit_nodes(&self, net: &Network<TreeVertex>, diagram: &mut Diagram) {
        commit_centers(net, diagram);
    }

    /// Sets link spots from each parent's growth direction and writes orthogonal routes.
    pub fn commit_links(&self, net: &Network<TreeVertex>, diagram: &mut Diagram) {
        let opts = &self.options;
        for (_, e) in net.edges() {
            let Some(key) = e.link.as_deref() else {
                continue;
            };
            let (from_spot, to_spot) = net[e.from].data.angle.port_spots();
            let from_rect = net[e.from].bounds();
            let to_rect = net[e.to].bounds();
            let Some(link) = diagram.link_mut(key) else {
                continue;
            };
            if opts.sets_port_spot {
                link.from_spot = from_spot;
            }
            if opts.sets_child_port_spot {
                link.to_spot = to_spot;
            }
            if opts.route_links {
                link.points =
                    routing::orthogonal_route(&from_rect, link.from_spot, &to_rect, link.to_spot);
            }
        }
    }
}

/// Claims every vertex for exactly one tree, breadth first along destination edges.
///
/// Vertices without incoming edges seed trees in insertion order; vertices still unclaimed
/// afterwards (only reachable through cycles) seed further trees.
fn build_trees(net: &mut Network<TreeVertex>) -> Vec<VertexId> {
    let ids: Vec<VertexId> = net.vertex_ids().collect();
    for &v in &ids {
        let data = &mut net[v].data;
        data.parent = None;
        data.children.clear();
        data.level = 0;
        data.direction = 0;
    }

    let seeds = narwhal_network::alg::roots(net);
    let mut claimed = vec![false; net.slot_count()];
    let mut roots = Vec::new();
    let mut queue = VecDeque::new();
    for &seed in seeds.iter().chain(ids.iter()) {
        if claimed[seed.index()] {
            continue;
        }
        claimed[seed.index()] = true;
        roots.push(seed);
        queue.push_back(seed);
        while let Some(v) = queue.pop_front() {
            let successors: Vec<VertexId> = net.successors(v).collect();
            let level = net[v].data.level + 1;
            for w in successors {
                if claimed[w.index()] {
                    continue;
                }
                claimed[w.index()] = true;
                net[w].data.parent = Some(v);
                net[w].data.level = level;
                net[v].data.children.push(w);
                queue.push_back(w);
            }
        }
    }
    roots
}
