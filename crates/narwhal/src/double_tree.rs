//! Two trees growing in opposite directions from one shared root.

use crate::diagram::{Diagram, Link, Node, PartCollection, Parts};
use crate::error::Result;
use crate::tree::{Arrangement, TreeLayout, TreeOptions};
use indexmap::IndexSet;
use serde::Deserialize;

/// Decides which half a direct child of the root goes to.
pub trait TreeDirection {
    /// `true` sends the child (and its subtree) right, or down when vertical.
    fn is_positive_direction(&self, node: &Node) -> Result<bool>;
}

impl<F> TreeDirection for F
where
    F: Fn(&Node) -> Result<bool>,
{
    fn is_positive_direction(&self, node: &Node) -> Result<bool> {
        self(node)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPositive;

impl TreeDirection for AlwaysPositive {
    fn is_positive_direction(&self, _node: &Node) -> Result<bool> {
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoubleTreeOptions {
    /// Grow up and down instead of left and right.
    pub vertical: bool,
    /// Options for the left (or top) half. Angle and arrangement are overridden.
    pub top_left: TreeOptions,
    pub bottom_right: TreeOptions,
}

impl DoubleTreeOptions {
    pub fn validate(&self) -> Result<()> {
        self.half(false).validate()?;
        self.half(true).validate()
    }

    fn half(&self, positive: bool) -> TreeOptions {
        let (base, angle) = match (positive, self.vertical) {
            (false, false) => (&self.top_left, 180.0),
            (false, true) => (&self.top_left, 270.0),
            (true, false) => (&self.bottom_right, 0.0),
            (true, true) => (&self.bottom_right, 90.0),
        };
        TreeOptions {
            angle,
            arrangement: Arrangement::FixedRoots,
            ..base.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DoubleTreeLayout<D = AlwaysPositive> {
    pub options: DoubleTreeOptions,
    pub direction: D,
}

impl DoubleTreeLayout {
    pub fn new(options: DoubleTreeOptions) -> Self {
        Self {
            options,
            direction: AlwaysPositive,
        }
    }
}

impl<D: TreeDirection> DoubleTreeLayout<D> {
    pub fn with_direction(options: DoubleTreeOptions, direction: D) -> Self {
        Self { options, direction }
    }

    /// Lays out both halves. With several roots this adds a virtual root node (and links to
    /// each root) to `diagram`.
    pub fn do_layout(&self, diagram: &mut Diagram, collection: &PartCollection) -> Result<()> {
        self.options.validate()?;
        let mut parts = eligible_parts(diagram, &diagram.resolve(collection));
        if parts.nodes.is_empty() {
            return Ok(());
        }
        let root = find_root(diagram, &mut parts);
        let (negative, positive) = self.separate(diagram, &parts, &root)?;
        tracing::debug!(
            root = root.as_str(),
            negative = negative.nodes.len(),
            positive = positive.nodes.len(),
            "double tree halves"
        );

        TreeLayout::new(self.options.half(false))
            .do_layout(diagram, &negative.into_collection())?;
        TreeLayout::new(self.options.half(true)).do_layout(diagram, &positive.into_collection())
    }

    /// Splits `parts` around `root`; the root belongs to both halves.
    pub fn separate(&self, diagram: &Diagram, parts: &Parts, root: &str) -> Result<(Parts, Parts)> {
        let mut negative = Parts::default();
        let mut positive = Parts::default();
        negative.nodes.insert(root.to_string());
        positive.nodes.insert(root.to_string());

        let mut visited: IndexSet<String> = IndexSet::new();
        visited.insert(root.to_string());
        for link in diagram.links_out_of(root) {
            if !parts.contains_link(&link.key) || visited.contains(&link.to) {
                continue;
            }
            let Some(child) = diagram.node(&link.to) else {
                continue;
            };
            let half = if self.direction.is_positive_direction(child)? {
                &mut positive
            } else {
                &mut negative
            };
            half.links.insert(link.key.clone());
            collect_subtree(diagram, parts, &link.to, &mut visited, half);
        }
        Ok((negative, positive))
    }
}

/// Keeps only the visible, layout-positioned parts; links also need both endpoints.
fn eligible_parts(diagram: &Diagram, parts: &Parts) -> Parts {
    let mut out = Parts::default();
    out.nodes.extend(
        parts
            .nodes
            .iter()
            .filter(|k| diagram.node(k).is_some_and(Node::is_layout_eligible))
            .cloned(),
    );
    let links: Vec<String> = parts
        .links
        .iter()
        .filter(|k| {
            diagram.link(k).is_some_and(|l| {
                l.is_layout_eligible() && out.contains_node(&l.from) && out.contains_node(&l.to)
            })
        })
        .cloned()
        .collect();
    out.links.extend(links);
    out
}

/// The single node without a tree parent. Several candidates get a new virtual root.
fn find_root(diagram: &mut Diagram, parts: &mut Parts) -> String {
    let roots: Vec<String> = parts
        .nodes
        .iter()
        .filter(|k| {
            !diagram
                .links_into(k)
                .any(|l| parts.contains_link(&l.key) && l.from != **k)
        })
        .cloned()
        .collect();

    match roots.as_slice() {
        [] => parts.nodes.first().cloned().unwrap_or_default(),
        [only] => only.clone(),
        [first, ..] => {
            let center = diagram.node(first).map(|n| n.center);
            let key = diagram.unique_key("double-tree-root");
            let mut node = Node::new(key.clone(), 0.0, 0.0);
            if let Some(center) = center {
                node.center = center;
            }
            diagram.add_node(node);
            parts.nodes.insert(key.clone());
            for r in &roots {
                let link_key = diagram.unique_key(&format!("{key}-{r}"));
                diagram.add_link(Link::new(link_key.clone(), key.clone(), r.clone()));
                parts.links.insert(link_key);
            }
            tracing::debug!(root = key.as_str(), roots = roots.len(), "added virtual root");
            key
        }
    }
}

fn collect_subtree(
    diagram: &Diagram,
    parts: &Parts,
    start: &str,
    visited: &mut IndexSet<String>,
    half: &mut Parts,
) {
    let mut stack = vec![start.to_string()];
    while let Some(key) = stack.pop() {
        if !visited.insert(key.clone()) {
            continue;
        }
        for link in diagram.links_out_of(&key) {
            if !parts.contains_link(&link.key) || visited.contains(&link.to) {
                continue;
            }
            half.links.insert(link.key.clone());
            stack.push(link.to.clone());
        }
        half.nodes.insert(key);
    }
}
