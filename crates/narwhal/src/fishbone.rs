//! Fishbone (Ishikawa) layout and its link router.
//!
//! Bus-branching tree where every parent is moved to the end of its own bus, so causes hang
//! off a straight spine. Slanted bones come from the shift pass. The layout commits node
//! positions and link spots only; [`FishboneRouter`] draws the connectors.

use crate::diagram::{Diagram, PartCollection, Spot};
use crate::error::{Error, Result};
use crate::network::commit_centers;
use crate::routing::END_SEGMENT_LENGTH;
use crate::tree::{Alignment, TreeAngle, TreeLayout, TreeOptions, TreeVertex};
use narwhal_network::geom::{self, Point, Rect, Vector};
use narwhal_network::{Network, Vertex, VertexId};
use serde::Deserialize;

const LAYOUT: &str = "FishboneLayout";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FishboneOptions {
    #[serde(flatten)]
    pub tree: TreeOptions,
}

impl Default for FishboneOptions {
    fn default() -> Self {
        Self {
            tree: TreeOptions {
                angle: 180.0,
                layer_spacing: 10.0,
                node_spacing: 20.0,
                alignment: Alignment::BusBranching,
                ..TreeOptions::default()
            },
        }
    }
}

impl FishboneOptions {
    pub fn validate(&self) -> Result<()> {
        self.angle()?;
        self.tree.validate()
    }

    fn angle(&self) -> Result<TreeAngle> {
        match self.tree.tree_angle(LAYOUT)? {
            angle @ (TreeAngle::Right | TreeAngle::Left) => Ok(angle),
            _ => Err(Error::UnsupportedAngle {
                layout: LAYOUT,
                angle: self.tree.angle,
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FishboneLayout {
    pub options: FishboneOptions,
}

impl FishboneLayout {
    pub fn new(options: FishboneOptions) -> Self {
        Self { options }
    }

    fn tree(&self) -> TreeLayout {
        TreeLayout::new(TreeOptions {
            alignment: Alignment::BusBranching,
            ..self.options.tree.clone()
        })
    }

    pub fn do_layout(&self, diagram: &mut Diagram, collection: &PartCollection) -> Result<()> {
        self.options.validate()?;
        let mut net = self.make_network(diagram, collection)?;
        if net.is_empty() {
            return Ok(());
        }
        self.layout_network(&mut net)?;
        commit_centers(&net, diagram);
        self.commit_spots(&net, diagram);
        Ok(())
    }

    /// Builds the network and pads every parent with dummy children.
    ///
    /// An odd out-degree gets a zero-sized dummy so the branches pair up; then every parent
    /// gets a dummy the size of itself, which ends its bus and marks where the parent moves.
    pub fn make_network(
        &self,
        diagram: &Diagram,
        collection: &PartCollection,
    ) -> Result<Network<TreeVertex>> {
        let mut net = self.tree().make_network(diagram, collection)?;
        let ids: Vec<VertexId> = net.vertex_ids().collect();
        let mut dummies = 0usize;
        for v in ids {
            let out = net.destination_edges(v).count();
            if out == 0 {
                continue;
            }
            let (center, size) = (net[v].center, net[v].size);
            if out % 2 == 1 {
                let d = net.add_vertex(Vertex::dummy(center, geom::size(0.0, 0.0)))?;
                net.link_vertexes(v, d, None)?;
                dummies += 1;
            }
            let d = net.add_vertex(Vertex::dummy(center, size))?;
            net.link_vertexes(v, d, None)?;
            dummies += 1;
        }
        tracing::trace!(dummies, "padded fishbone network");
        Ok(net)
    }

    pub fn layout_network(&self, net: &mut Network<TreeVertex>) -> Result<Vec<VertexId>> {
        self.options.validate()?;
        let tree = self.tree();
        let roots = tree.prepare(net)?;
        shrink_layer_spacing(net);
        tree.arrange(net, &roots);
        move_parents_to_bus_ends(net);
        for &root in &roots {
            shift(net, root);
        }
        tracing::debug!(
            vertices = net.vertex_count(),
            trees = roots.len(),
            "fishbone layout"
        );
        Ok(roots)
    }

    /// Spine links leave a moved parent toward where its bus starts.
    fn commit_spots(&self, net: &Network<TreeVertex>, diagram: &mut Diagram) {
        for (_, e) in net.edges() {
            let Some(key) = e.link.as_deref() else {
                continue;
            };
            let Some(link) = diagram.link_mut(key) else {
                continue;
            };
            link.from_spot = spine_spot(net[e.from].data.angle);
            link.to_spot = spine_spot(net[e.to].data.angle);
        }
    }
}

fn spine_spot(angle: TreeAngle) -> Spot {
    match angle {
        TreeAngle::Right => Spot::Left,
        TreeAngle::Left => Spot::Right,
        TreeAngle::Down | TreeAngle::Up => Spot::None,
    }
}

fn shrink_layer_spacing(net: &mut Network<TreeVertex>) {
    for (_, v) in net.vertices_mut() {
        if v.data.parent.is_some() {
            v.data.layer_spacing -= v.data.angle.along_extent(v.size);
        }
    }
}

fn move_parents_to_bus_ends(net: &mut Network<TreeVertex>) {
    let ids: Vec<VertexId> = net.vertex_ids().collect();
    for v in ids {
        let data = &net[v].data;
        if data.parent.is_none() {
            continue;
        }
        let Some(&last) = data.children.last() else {
            continue;
        };
        let center = net[last].center;
        net[v].center = center;
    }
}

/// Slants vertical bones so the horizontal bones hanging off them stay parallel.
///
/// A bone under the root leans away from the head. Deeper vertical bones inherit a lean from
/// their grandparent's direction and shift when they point against it.
fn shift(net: &mut Network<TreeVertex>, v: VertexId) {
    if let Some(p) = net[v].data.parent {
        let angle = net[v].data.angle;
        if !angle.is_horizontal() {
            let parent_angle = net[p].data.angle;
            match net[p].data.parent {
                None => {
                    let direction: i8 = if parent_angle == TreeAngle::Right { 1 } else { -1 };
                    net[v].data.direction = direction;
                    shift_all(net, f64::from(direction), 0.0, p, v);
                }
                Some(g) => {
                    let grand = &net[g].data;
                    let grand_direction = grand.direction;
                    let grand_down = match grand.angle {
                        TreeAngle::Down => Some(true),
                        TreeAngle::Up => Some(false),
                        _ => None,
                    };
                    if let (Some(grand_down), true) = (grand_down, grand_direction != 0) {
                        let toward_up = (grand_direction > 0) == grand_down;
                        let amount = net[v].data.node_spacing;
                        match parent_angle {
                            TreeAngle::Right => {
                                net[v].data.direction = 1;
                                let trigger = if toward_up { TreeAngle::Up } else { TreeAngle::Down };
                                if angle == trigger {
                                    shift_all(net, 2.0, -amount, p, v);
                                }
                            }
                            TreeAngle::Left => {
                                net[v].data.direction = -1;
                                let trigger = if toward_up { TreeAngle::Down } else { TreeAngle::Up };
                                if angle == trigger {
                                    shift_all(net, -2.0, amount, p, v);
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    let children = net[v].data.children.clone();
    for c in children {
        shift(net, c);
    }
}

/// Moves `v`'s subtree sideways in proportion to its vertical distance from `root`.
fn shift_all(net: &mut Network<TreeVertex>, direction: f64, absolute: f64, root: VertexId, v: VertexId) {
    let dy = (net[root].center.y - net[v].center.y).abs();
    net[v].center.x += direction * dy / 2.0 + absolute;
    let children = net[v].data.children.clone();
    for c in children {
        shift_all(net, direction, absolute, root, c);
    }
}

/// Computes fishbone connector routes from committed node positions and link spots.
#[derive(Debug, Clone, Copy)]
pub struct FishboneRouter {
    pub end_segment: f64,
}

impl Default for FishboneRouter {
    fn default() -> Self {
        Self {
            end_segment: END_SEGMENT_LENGTH,
        }
    }
}

impl FishboneRouter {
    /// The route for `link_key`, or `None` when the link or an endpoint is missing.
    ///
    /// A link leaving along the spine runs straight, then slants onto its bone so the bone
    /// meets the spine at half the vertical distance. A link arriving on the spine does the
    /// reverse. Anything else gets a straight center-to-center segment.
    pub fn route(&self, diagram: &Diagram, link_key: &str) -> Option<Vec<Point>> {
        let link = diagram.link(link_key)?;
        let from = diagram.node(&link.from)?.bounds();
        let to = diagram.node(&link.to)?.bounds();

        if let Some(sign) = horizontal_sign(link.from_spot) {
            let is_head = diagram.links_into(&link.from).next().is_none();
            // The head stays at the start of its bus, so it leaves the other way.
            let exit = if is_head { -sign } else { sign };
            let p0 = side_point(&from, exit);
            let p1 = p0 + geom::vector(exit * self.end_segment, 0.0);
            let toward_spine = if to.center().y < p1.y { 1.0 } else { -1.0 };
            let p2 = ray_exit(&to, geom::vector(sign * 0.5, toward_spine));
            let dx = (p2.y - p1.y).abs() / 2.0 * sign;
            return Some(vec![p0, p1, geom::point(p2.x + dx, p1.y), p2]);
        }

        if let Some(entry) = horizontal_sign(link.to_spot) {
            let p3 = side_point(&to, entry);
            let p2 = p3 + geom::vector(entry * self.end_segment, 0.0);
            let lean = diagram
                .links_into(&link.from)
                .next()
                .and_then(|parent| horizontal_sign(parent.from_spot))
                .unwrap_or(1.0);
            let toward = if from.center().y < p2.y { 1.0 } else { -1.0 };
            let p0 = ray_exit(&from, geom::vector(lean * 0.5, toward));
            let dx = (p2.y - p0.y).abs() / 2.0 * lean;
            return Some(vec![p0, geom::point(p0.x + dx, p2.y), p2, p3]);
        }

        let dir = to.center() - from.center();
        Some(vec![ray_exit(&from, dir), ray_exit(&to, -dir)])
    }

    /// Routes every link of `collection` whose endpoints exist.
    pub fn route_all(&self, diagram: &mut Diagram, collection: &PartCollection) {
        let parts = diagram.resolve(collection);
        for key in &parts.links {
            let Some(points) = self.route(diagram, key) else {
                continue;
            };
            if let Some(link) = diagram.link_mut(key) {
                link.points = points;
            }
        }
    }
}

fn horizontal_sign(spot: Spot) -> Option<f64> {
    match spot {
        Spot::Left | Spot::LeftSide => Some(-1.0),
        Spot::Right | Spot::RightSide => Some(1.0),
        _ => None,
    }
}

fn side_point(rect: &Rect, sign: f64) -> Point {
    let x = if sign > 0.0 { rect.max_x() } else { rect.min_x() };
    geom::point(x, rect.center().y)
}

/// Where the ray from `rect`'s center along `dir` leaves the rectangle.
fn ray_exit(rect: &Rect, dir: Vector) -> Point {
    let c = rect.center();
    let (hw, hh) = (rect.width() / 2.0, rect.height() / 2.0);
    let tx = if dir.x != 0.0 { hw / dir.x.abs() } else { f64::INFINITY };
    let ty = if dir.y != 0.0 { hh / dir.y.abs() } else { f64::INFINITY };
    let t = tx.min(ty);
    if t.is_finite() { c + dir * t } else { c }
}
