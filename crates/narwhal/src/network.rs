use crate::diagram::{Diagram, PartCollection, Parts};
use crate::error::Result;
use narwhal_network::{Network, Vertex};

/// Builds a fresh network over the parts of `diagram` selected by `collection`.
///
/// One vertex per visible, layout-positioned node; one edge per visible, layout-positioned
/// link whose endpoints both got a vertex. The diagram is not mutated.
pub fn build_network<V: Default>(
    diagram: &Diagram,
    collection: &PartCollection,
) -> Result<Network<V>> {
    build_network_from_parts(diagram, &diagram.resolve(collection))
}

pub fn build_network_from_parts<V: Default>(diagram: &Diagram, parts: &Parts) -> Result<Network<V>> {
    build_filtered(diagram, parts, false)
}

/// Like [`build_network`] but also keeps nodes a previous layout pass hid (see
/// [`Node::hidden_by_layout`](crate::diagram::Node::hidden_by_layout)). Nodes the caller hid
/// stay out.
pub fn build_network_with_layout_hidden<V: Default>(
    diagram: &Diagram,
    collection: &PartCollection,
) -> Result<Network<V>> {
    build_filtered(diagram, &diagram.resolve(collection), true)
}

fn build_filtered<V: Default>(
    diagram: &Diagram,
    parts: &Parts,
    include_layout_hidden: bool,
) -> Result<Network<V>> {
    let mut net = Network::new();
    for key in &parts.nodes {
        let Some(node) = diagram.node(key) else {
            continue;
        };
        let layout_hidden =
            include_layout_hidden && node.is_layout_positioned && node.hidden_by_layout;
        if !(node.is_layout_eligible() || layout_hidden) {
            continue;
        }
        net.add_vertex(Vertex::new(node.key.clone(), node.center, node.size))?;
    }
    for key in &parts.links {
        let Some(link) = diagram.link(key) else {
            continue;
        };
        if !link.is_layout_eligible() {
            continue;
        }
        let (Some(from), Some(to)) = (net.find_vertex(&link.from), net.find_vertex(&link.to))
        else {
            continue;
        };
        net.link_vertexes(from, to, Some(link.key.clone()))?;
    }
    tracing::trace!(
        vertices = net.vertex_count(),
        edges = net.edge_count(),
        "built layout network"
    );
    Ok(net)
}

/// Writes the center of every node-backed vertex back to its node.
pub fn commit_centers<V>(net: &Network<V>, diagram: &mut Diagram) {
    for (_, v) in net.vertices() {
        let Some(key) = v.node.as_deref() else {
            continue;
        };
        if let Some(node) = diagram.node_mut(key) {
            node.center = v.center;
        }
    }
}
