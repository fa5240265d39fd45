//! Radial layout: concentric rings around a root.
//!
//! Each vertex sits on the ring whose index is its distance from the root. The root's full
//! sweep is divided recursively among descendants in proportion to their breadth.

use crate::diagram::{Diagram, Node, PartCollection};
use crate::error::{Error, Result};
use crate::network::build_network_with_layout_hidden;
use narwhal_network::alg::{self, derive_children, find_distances};
use narwhal_network::geom::{self, Point};
use narwhal_network::{Network, Vertex, VertexId};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialOptions {
    /// Key of the root node; `None` picks the first node without incoming links.
    pub root: Option<String>,
    pub layer_thickness: f64,
    /// Rings beyond this are neither positioned nor shown. `None` is unbounded.
    pub max_layers: Option<u32>,
    pub origin: Point,
}

impl Default for RadialOptions {
    fn default() -> Self {
        Self {
            root: None,
            layer_thickness: 100.0,
            max_layers: None,
            origin: geom::point(0.0, 0.0),
        }
    }
}

impl RadialOptions {
    pub fn validate(&self) -> Result<()> {
        if self.layer_thickness.is_finite() && self.layer_thickness > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidOption {
                name: "layerThickness",
                message: format!("expected a positive number, got {}", self.layer_thickness),
            })
        }
    }

    fn is_within(&self, distance: Option<u32>) -> bool {
        match (distance, self.max_layers) {
            (_, None) => true,
            (Some(d), Some(max)) => d <= max,
            (None, Some(_)) => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RadialVertex {
    /// Ring index; `None` when unreachable from the root.
    pub distance: Option<u32>,
    /// Center angle in degrees, in `[0, 360)`.
    pub angle: f64,
    pub sweep: f64,
    pub radius: f64,
    /// Whether this pass positioned the vertex.
    pub laid: bool,
    pub children: Vec<VertexId>,
}

/// Caller customization of the radial layout. Every method has a default.
pub trait RadialHooks {
    /// Weight of `vertex` when dividing its parent's sweep. Called once per vertex, children
    /// first.
    fn compute_breadth(
        &self,
        vertex: &Vertex<RadialVertex>,
        child_breadths: &[f64],
    ) -> Result<f64> {
        let _ = vertex;
        Ok(child_breadths.iter().sum::<f64>().max(1.0))
    }

    /// Called once for every node in the network after its center and visibility are
    /// committed. Nodes this pass did not position get an angle, sweep and radius of zero.
    fn rotate_node(&self, node: &mut Node, angle: f64, sweep: f64, radius: f64) -> Result<()> {
        let _ = (node, angle, sweep, radius);
        Ok(())
    }

    /// Called once per pass after all nodes are committed.
    fn commit_layers(
        &self,
        diagram: &mut Diagram,
        origin: Point,
        layer_thickness: f64,
        max_layer: u32,
    ) -> Result<()> {
        let _ = (diagram, origin, layer_thickness, max_layer);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRadialHooks;

impl RadialHooks for DefaultRadialHooks {}

/// Turns every positioned node to face away from the root, keeping text upright on the left
/// half.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotateOutward;

impl RadialHooks for RotateOutward {
    fn rotate_node(&self, node: &mut Node, angle: f64, _sweep: f64, radius: f64) -> Result<()> {
        if radius == 0.0 {
            node.angle = 0.0;
        } else if angle > 90.0 && angle < 270.0 {
            node.angle = geom::normalize_degrees(angle - 180.0);
        } else {
            node.angle = angle;
        }
        Ok(())
    }
}

/// Category of the ring nodes added by [`RingGuides`].
pub const RING_GUIDE_CATEGORY: &str = "RingGuide";

/// Key prefix of the ring nodes added by [`RingGuides`].
pub const RING_GUIDE_PREFIX: &str = "ring-guide-";

/// Adds one circle node per occupied ring. Guides from a previous pass are replaced; other
/// nodes sharing the category are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingGuides;

impl RadialHooks for RingGuides {
    fn commit_layers(
        &self,
        diagram: &mut Diagram,
        origin: Point,
        layer_thickness: f64,
        max_layer: u32,
    ) -> Result<()> {
        let stale: Vec<String> = diagram
            .nodes()
            .filter(|n| is_ring_guide(n))
            .map(|n| n.key.clone())
            .collect();
        for key in stale {
            diagram.remove_node(&key);
        }
        for layer in 1..=max_layer {
            let diameter = 2.0 * f64::from(layer) * layer_thickness;
            let key = diagram.unique_key(&format!("{RING_GUIDE_PREFIX}{layer}"));
            diagram.add_node(
                Node::new(key, diameter, diameter)
                    .with_category(RING_GUIDE_CATEGORY)
                    .at(origin.x, origin.y)
                    .not_layout_positioned(),
            );
        }
        Ok(())
    }
}

fn is_ring_guide(node: &Node) -> bool {
    node.category == RING_GUIDE_CATEGORY
        && node.key.starts_with(RING_GUIDE_PREFIX)
        && !node.is_layout_positioned
}

#[derive(Debug, Clone, Default)]
pub struct RadialLayout<H = DefaultRadialHooks> {
    pub options: RadialOptions,
    pub hooks: H,
}

impl RadialLayout {
    pub fn new(options: RadialOptions) -> Self {
        Self {
            options,
            hooks: DefaultRadialHooks,
        }
    }
}

impl<H: RadialHooks> RadialLayout<H> {
    pub fn with_hooks(options: RadialOptions, hooks: H) -> Self {
        Self { options, hooks }
    }

    pub fn do_layout(&self, diagram: &mut Diagram, collection: &PartCollection) -> Result<()> {
        self.options.validate()?;
        // Nodes an earlier bounded pass hid come back in; nodes the caller hid stay out.
        let mut net: Network<RadialVertex> =
            build_network_with_layout_hidden(diagram, collection)?;
        if self.layout_network(&mut net)?.is_none() {
            return Ok(());
        }
        self.commit(&net, diagram)
    }

    /// Labels and positions `net`. Returns the root, or `None` for an empty network.
    pub fn layout_network(&self, net: &mut Network<RadialVertex>) -> Result<Option<VertexId>> {
        self.options.validate()?;
        let root = match &self.options.root {
            Some(key) => net
                .find_vertex(key)
                .ok_or_else(|| Error::RootNotInNetwork { key: key.clone() })?,
            None => match alg::choose_root(net) {
                Some(root) => root,
                None => return Ok(None),
            },
        };

        let distances = find_distances(net, root)?;
        let tree = derive_children(net, &distances);
        for (id, v) in net.vertices_mut() {
            v.data = RadialVertex {
                distance: distances.get(id),
                children: tree.children(id).to_vec(),
                ..RadialVertex::default()
            };
        }
        tracing::debug!(
            root = %root,
            vertices = net.vertex_count(),
            reached = distances.iter().count(),
            rings = distances.max_distance().unwrap_or(0),
            "radial layout"
        );

        let breadths = self.breadths(net, root)?;
        let origin = self.options.origin;
        let r = &mut net[root];
        r.center = origin;
        r.data.angle = 0.0;
        r.data.sweep = 360.0;
        r.data.radius = 0.0;
        r.data.laid = true;
        self.lay_out_children(net, root, &breadths);
        Ok(Some(root))
    }

    /// Breadth of every reached vertex, each computed once.
    fn breadths(&self, net: &Network<RadialVertex>, root: VertexId) -> Result<Vec<f64>> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(net[v].data.children.iter().copied());
        }

        let mut breadths = vec![0.0; net.slot_count()];
        let mut child_breadths = Vec::new();
        for &v in order.iter().rev() {
            child_breadths.clear();
            child_breadths.extend(net[v].data.children.iter().map(|c| breadths[c.index()]));
            let b = self.hooks.compute_breadth(&net[v], &child_breadths)?;
            breadths[v.index()] = if b.is_finite() && b > 0.0 { b } else { 0.0 };
        }
        Ok(breadths)
    }

    fn lay_out_children(&self, net: &mut Network<RadialVertex>, v: VertexId, breadths: &[f64]) {
        let layer = net[v].data.distance.unwrap_or(0) + 1;
        if self.options.max_layers.is_some_and(|max| layer > max) {
            return;
        }
        let children = net[v].data.children.clone();
        if children.is_empty() {
            return;
        }

        let (angle, sweep) = (net[v].data.angle, net[v].data.sweep);
        let total: f64 = children.iter().map(|c| breadths[c.index()]).sum();
        let radius = f64::from(layer) * self.options.layer_thickness;
        let mut start = angle - sweep / 2.0;
        for &c in &children {
            let fraction = if total > 0.0 {
                breadths[c.index()] / total
            } else {
                1.0 / children.len() as f64
            };
            let sub = sweep * fraction;
            let a = geom::normalize_degrees(start + sub / 2.0);
            let child = &mut net[c];
            child.center = self.options.origin + geom::polar(radius, a);
            child.data.angle = a;
            child.data.sweep = sub;
            child.data.radius = radius;
            child.data.laid = true;
            start += sub;
        }
        for c in children {
            self.lay_out_children(net, c, breadths);
        }
    }

    fn commit(&self, net: &Network<RadialVertex>, diagram: &mut Diagram) -> Result<()> {
        let mut max_layer = 0;
        for (_, v) in net.vertices() {
            let Some(key) = v.node.as_deref() else {
                continue;
            };
            let Some(node) = diagram.node_mut(key) else {
                continue;
            };
            let within = self.options.is_within(v.data.distance);
            node.visible = within;
            node.hidden_by_layout = !within;
            if v.data.laid {
                node.center = v.center;
                max_layer = max_layer.max(v.data.distance.unwrap_or(0));
            }
            self.hooks
                .rotate_node(node, v.data.angle, v.data.sweep, v.data.radius)?;
        }
        self.hooks.commit_layers(
            diagram,
            self.options.origin,
            self.options.layer_thickness,
            max_layer,
        )
    }
}
