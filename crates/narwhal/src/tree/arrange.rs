use super::{Alignment, TreeVertex};
use narwhal_network::geom::{self, Point};
use narwhal_network::{Network, VertexId};

/// Computes child offsets and subtree bounds for the tree rooted at `v`, bottom up.
pub(super) fn measure(net: &mut Network<TreeVertex>, v: VertexId) {
    let children = net[v].data.children.clone();
    for &c in &children {
        measure(net, c);
    }

    let mut bounds = geom::rect_centered(geom::point(0.0, 0.0), net[v].size);
    if !children.is_empty() {
        match net[v].data.alignment {
            Alignment::CenterChildren => offset_centered(net, v, &children),
            Alignment::BusBranching => offset_bus(net, v, &children),
        }
        for &c in &children {
            let child = &net[c].data;
            bounds = geom::union(&bounds, &child.subtree.translate(child.offset));
        }
    }
    net[v].data.subtree = bounds;
}

fn offset_centered(net: &mut Network<TreeVertex>, v: VertexId, children: &[VertexId]) {
    let data = &net[v].data;
    let (angle, layer_spacing, node_spacing) = (data.angle, data.layer_spacing, data.node_spacing);
    let half = angle.along_extent(net[v].size) / 2.0;

    let mut cursor = 0.0;
    let mut across = Vec::with_capacity(children.len());
    for &c in children {
        let (lo, hi) = angle.across_range(&net[c].data.subtree);
        across.push(cursor - lo);
        cursor += hi - lo + node_spacing;
    }
    let total = (cursor - node_spacing).max(0.0);

    for (&c, a) in children.iter().zip(across) {
        let along = half + layer_spacing + angle.along_extent(net[c].size) / 2.0;
        net[c].data.offset = angle.compose(along, a - total / 2.0);
    }
}

/// Pairs children on both sides of the bus; an odd last child continues the bus.
fn offset_bus(net: &mut Network<TreeVertex>, v: VertexId, children: &[VertexId]) {
    let data = &net[v].data;
    let (angle, layer_spacing, node_spacing) = (data.angle, data.layer_spacing, data.node_spacing);
    let half = angle.along_extent(net[v].size) / 2.0;
    let gap = node_spacing / 2.0;

    let (paired, end) = match children.split_last() {
        Some((&last, rest)) if children.len() % 2 == 1 => (rest, Some(last)),
        _ => (children, None),
    };

    let mut cursor = half + layer_spacing;
    for pair in paired.chunks(2) {
        let mut width: f64 = 0.0;
        for (i, &c) in pair.iter().enumerate() {
            let sub = net[c].data.subtree;
            let (along_lo, along_hi) = angle.along_range(&sub);
            let (across_lo, across_hi) = angle.across_range(&sub);
            let across = if i == 0 { -gap - across_hi } else { gap - across_lo };
            net[c].data.offset = angle.compose(cursor - along_lo, across);
            width = width.max(along_hi - along_lo);
        }
        cursor += width + node_spacing;
    }
    if let Some(c) = end {
        let (along_lo, _) = angle.along_range(&net[c].data.subtree);
        net[c].data.offset = angle.compose(cursor - along_lo, 0.0);
    }
}

/// Places `v` at `center` and its descendants at their offsets, top down.
pub(super) fn place(net: &mut Network<TreeVertex>, v: VertexId, center: Point) {
    net[v].center = center;
    let children = net[v].data.children.clone();
    for c in children {
        let offset = net[c].data.offset;
        place(net, c, center + offset);
    }
}
