//! Split/merge layout: a tree hanging off one split node whose branches rejoin at one merge
//! node.
//!
//! The merge is removed from the network so the tree pass never places it, then positioned
//! one layer past the whole split subtree, on the split's axis.

use crate::diagram::{Diagram, Node, PartCollection, Parts, Spot};
use crate::error::{Error, Result};
use crate::network::build_network_from_parts;
use crate::routing::{self, PortSlot};
use crate::tree::{Alignment, TreeAngle, TreeLayout, TreeOptions, TreeVertex, subtree_bounds};
use narwhal_network::geom;
use narwhal_network::{Network, VertexId};
use rustc_hash::FxHashMap;
use serde::Deserialize;

const LAYOUT: &str = "ParallelLayout";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallelOptions {
    #[serde(flatten)]
    pub tree: TreeOptions,
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            tree: TreeOptions {
                alignment: Alignment::CenterChildren,
                ..TreeOptions::default()
            },
        }
    }
}

impl ParallelOptions {
    pub fn validate(&self) -> Result<()> {
        self.angle()?;
        self.tree.validate()
    }

    fn angle(&self) -> Result<TreeAngle> {
        match self.tree.tree_angle(LAYOUT)? {
            angle @ (TreeAngle::Right | TreeAngle::Down) => Ok(angle),
            _ => Err(Error::UnsupportedAngle {
                layout: LAYOUT,
                angle: self.tree.angle,
            }),
        }
    }
}

/// Classifies the nodes of a split/merge diagram. The defaults go by category.
pub trait ParallelPredicates {
    fn is_split(&self, node: &Node) -> Result<bool> {
        Ok(matches!(
            node.category.as_str(),
            "Split" | "Start" | "For" | "While" | "If" | "Switch"
        ))
    }

    fn is_merge(&self, node: &Node) -> Result<bool> {
        Ok(matches!(
            node.category.as_str(),
            "Merge" | "End" | "EndFor" | "EndWhile" | "EndIf" | "EndSwitch"
        ))
    }

    /// A two-way split: first branch leaves one side, the rest the opposite side.
    fn is_conditional(&self, node: &Node) -> Result<bool> {
        Ok(node.category == "If")
    }

    /// A many-way split whose branches fan out along one side.
    fn is_switch(&self, node: &Node) -> Result<bool> {
        Ok(node.category == "Switch")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryPredicates;

impl ParallelPredicates for CategoryPredicates {}

#[derive(Debug, Clone, Default)]
pub struct ParallelLayout<P = CategoryPredicates> {
    pub options: ParallelOptions,
    pub predicates: P,
}

impl ParallelLayout {
    pub fn new(options: ParallelOptions) -> Self {
        Self {
            options,
            predicates: CategoryPredicates,
        }
    }
}

struct SplitMerge {
    split: VertexId,
    split_key: String,
    merge_key: String,
}

impl<P: ParallelPredicates> ParallelLayout<P> {
    pub fn with_predicates(options: ParallelOptions, predicates: P) -> Self {
        Self {
            options,
            predicates,
        }
    }

    pub fn do_layout(&self, diagram: &mut Diagram, collection: &PartCollection) -> Result<()> {
        self.options.validate()?;
        let angle = self.options.angle()?;
        let tree = TreeLayout::new(self.options.tree.clone());
        let parts = diagram.resolve(collection);
        let mut net: Network<TreeVertex> = build_network_from_parts(diagram, &parts)?;
        if net.is_empty() {
            return Ok(());
        }

        let sm = self.find_split_merge(&net, diagram)?;
        self.make_tree(&mut net, &sm)?;
        tree.layout_network(&mut net)?;
        tree.commit_nodes(&net, diagram);
        self.place_merge(&net, &sm, angle, diagram);
        tree.commit_links(&net, diagram);
        let split_slots = self.commit_split_links(&sm, angle, &parts, diagram)?;
        self.commit_merge_links(&sm, angle, &parts, &split_slots, diagram)?;
        Ok(())
    }

    fn find_split_merge(&self, net: &Network<TreeVertex>, diagram: &Diagram) -> Result<SplitMerge> {
        let mut split: Option<(VertexId, &str)> = None;
        let mut merge: Option<&str> = None;
        for (id, v) in net.vertices() {
            let Some(node) = v.node.as_deref().and_then(|key| diagram.node(key)) else {
                continue;
            };
            if self.predicates.is_split(node)? {
                if let Some((_, existing)) = split {
                    return Err(Error::DuplicateSplit {
                        existing: existing.to_string(),
                        found: node.key.clone(),
                    });
                }
                split = Some((id, node.key.as_str()));
            } else if self.predicates.is_merge(node)? {
                if let Some(existing) = merge {
                    return Err(Error::DuplicateMerge {
                        existing: existing.to_string(),
                        found: node.key.clone(),
                    });
                }
                merge = Some(node.key.as_str());
            }
        }
        let (split, split_key) = split.ok_or(Error::MissingSplit)?;
        let merge_key = merge.ok_or(Error::MissingMerge)?;
        tracing::debug!(split = split_key, merge = merge_key, "found split and merge");
        Ok(SplitMerge {
            split,
            split_key: split_key.to_string(),
            merge_key: merge_key.to_string(),
        })
    }

    /// Drops the merge vertex and hangs every other entry point off the split.
    fn make_tree(&self, net: &mut Network<TreeVertex>, sm: &SplitMerge) -> Result<()> {
        if let Some(merge) = net.find_vertex(&sm.merge_key) {
            net.delete_vertex(merge);
        }
        let orphans: Vec<VertexId> = net
            .vertex_ids()
            .filter(|&v| v != sm.split && net.source_edges(v).next().is_none())
            .collect();
        for &v in &orphans {
            net.link_vertexes(sm.split, v, None)?;
        }
        tracing::trace!(dummy_edges = orphans.len(), "linked entry points to split");
        Ok(())
    }

    fn place_merge(
        &self,
        net: &Network<TreeVertex>,
        sm: &SplitMerge,
        angle: TreeAngle,
        diagram: &mut Diagram,
    ) {
        let bounds = subtree_bounds(net, sm.split);
        let split_center = net[sm.split].center;
        let spacing = self.options.tree.layer_spacing;
        let Some(merge) = diagram.node_mut(&sm.merge_key) else {
            return;
        };
        merge.center = match angle {
            TreeAngle::Down => geom::point(
                split_center.x,
                bounds.max_y() + spacing + merge.size.height / 2.0,
            ),
            _ => geom::point(
                bounds.max_x() + spacing + merge.size.width / 2.0,
                split_center.y,
            ),
        };
    }

    /// Sets spots and routes on the links leaving the split. Returns each link's port slot.
    fn commit_split_links(
        &self,
        sm: &SplitMerge,
        angle: TreeAngle,
        parts: &Parts,
        diagram: &mut Diagram,
    ) -> Result<FxHashMap<String, PortSlot>> {
        let mut slots = FxHashMap::default();
        let Some(split) = diagram.node(&sm.split_key) else {
            return Ok(slots);
        };
        let conditional = self.predicates.is_conditional(split)?;
        let switch = !conditional && self.predicates.is_switch(split)?;
        let split_rect = split.bounds();
        let keys: Vec<String> = diagram
            .links_out_of(&sm.split_key)
            .filter(|l| parts.contains_link(&l.key) && l.is_layout_eligible())
            .map(|l| l.key.clone())
            .collect();

        let opts = &self.options.tree;
        let count = keys.len();
        for (i, key) in keys.iter().enumerate() {
            slots.insert(key.clone(), PortSlot::new(i, count));
            let from_spot = match (angle, conditional, switch) {
                (TreeAngle::Down, true, _) if i == 0 => Spot::Left,
                (TreeAngle::Down, true, _) => Spot::Right,
                (TreeAngle::Down, _, true) => Spot::BottomSide,
                (TreeAngle::Down, _, _) => Spot::Bottom,
                (_, true, _) if i == 0 => Spot::Top,
                (_, true, _) => Spot::Bottom,
                (_, _, true) => Spot::RightSide,
                _ => Spot::Right,
            };
            let to_spot = if angle == TreeAngle::Down { Spot::Top } else { Spot::Left };
            let Some(to_rect) = diagram
                .link(key)
                .and_then(|l| diagram.node(&l.to))
                .map(Node::bounds)
            else {
                continue;
            };
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
                link.points = routing::orthogonal_route_with_slots(
                    &split_rect,
                    link.from_spot,
                    PortSlot::new(i, count),
                    &to_rect,
                    link.to_spot,
                    PortSlot::SINGLE,
                );
            }
        }
        Ok(slots)
    }

    /// Routes the links entering and leaving the merge; the incoming routes share the vertical
    /// (or horizontal) run half a layer before the merge. A link straight from the split keeps
    /// its port slot on the split.
    fn commit_merge_links(
        &self,
        sm: &SplitMerge,
        angle: TreeAngle,
        parts: &Parts,
        split_slots: &FxHashMap<String, PortSlot>,
        diagram: &mut Diagram,
    ) -> Result<()> {
        let Some(merge_rect) = diagram.node(&sm.merge_key).map(Node::bounds) else {
            return Ok(());
        };
        let opts = &self.options.tree;
        let (out_spot, in_spot) = angle.port_spots();
        let shared = match angle {
            TreeAngle::Down => merge_rect.min_y() - opts.layer_spacing / 2.0,
            _ => merge_rect.min_x() - opts.layer_spacing / 2.0,
        };

        let incoming: Vec<(String, String)> = diagram
            .links_into(&sm.merge_key)
            .filter(|l| parts.contains_link(&l.key) && l.is_layout_eligible())
            .map(|l| (l.key.clone(), l.from.clone()))
            .collect();
        for (key, from) in incoming {
            let Some(from_node) = diagram.node(&from) else {
                continue;
            };
            let from_is_split = self.predicates.is_split(from_node)?;
            let from_rect = from_node.bounds();
            let Some(link) = diagram.link_mut(&key) else {
                continue;
            };
            if !from_is_split && opts.sets_port_spot {
                link.from_spot = out_spot;
            }
            if opts.sets_child_port_spot {
                link.to_spot = in_spot;
            }
            if !opts.route_links {
                continue;
            }
            let from_slot = split_slots.get(&key).copied().unwrap_or(PortSlot::SINGLE);
            let mut points = routing::orthogonal_route_with_slots(
                &from_rect,
                link.from_spot,
                from_slot,
                &merge_rect,
                link.to_spot,
                PortSlot::SINGLE,
            );
            let n = points.len();
            if n >= 6 {
                let (a, b) = (points[n - 4], points[n - 3]);
                match angle {
                    TreeAngle::Down if a.y == b.y => {
                        points[n - 4].y = shared;
                        points[n - 3].y = shared;
                    }
                    TreeAngle::Right if a.x == b.x => {
                        points[n - 4].x = shared;
                        points[n - 3].x = shared;
                    }
                    _ => {}
                }
            }
            link.points = points;
        }

        let outgoing: Vec<(String, String)> = diagram
            .links_out_of(&sm.merge_key)
            .filter(|l| parts.contains_link(&l.key) && l.is_layout_eligible())
            .map(|l| (l.key.clone(), l.to.clone()))
            .collect();
        for (key, to) in outgoing {
            let Some(to_rect) = diagram.node(&to).map(Node::bounds) else {
                continue;
            };
            let Some(link) = diagram.link_mut(&key) else {
                continue;
            };
            if opts.sets_port_spot {
                link.from_spot = out_spot;
            }
            if opts.sets_child_port_spot {
                link.to_spot = in_spot;
            }
            if opts.route_links {
                link.points =
                    routing::orthogonal_route(&merge_rect, link.from_spot, &to_rect, link.to_spot);
            }
        }
        Ok(())
    }
}
