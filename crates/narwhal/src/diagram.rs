//! The part model layouts read from and write back to.
//!
//! A [`Diagram`] owns nodes and links keyed by string, in insertion order. Layouts never keep
//! references into it between calls: each pass resolves a [`PartCollection`], builds a
//! network, and commits results by key.

use indexmap::{IndexMap, IndexSet};
use narwhal_network::geom::{self, Point, Rect, Size};
use serde::Deserialize;

/// Where a link attaches to a node.
///
/// The plain sides attach at the middle of that side. The `*Side` variants spread several links
/// along the same side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Spot {
    /// Let the router pick the side facing the other end.
    #[default]
    None,
    Center,
    Left,
    Right,
    Top,
    Bottom,
    LeftSide,
    RightSide,
    TopSide,
    BottomSide,
}

impl Spot {
    pub fn is_side(self) -> bool {
        matches!(
            self,
            Spot::LeftSide | Spot::RightSide | Spot::TopSide | Spot::BottomSide
        )
    }

    pub fn is_specific(self) -> bool {
        !matches!(self, Spot::None | Spot::Center)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: String,
    pub category: String,
    pub center: Point,
    pub size: Size,
    /// Rotation of the node's content in degrees.
    pub angle: f64,
    pub visible: bool,
    /// `false` keeps the node out of every layout (guides, annotations).
    pub is_layout_positioned: bool,
    pub group: Option<String>,
    /// Set when a layout (not the caller) hid the node, so a later pass may show it again.
    pub hidden_by_layout: bool,
}

impl Node {
    pub fn new(key: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            key: key.into(),
            category: String::new(),
            center: geom::point(0.0, 0.0),
            size: geom::size(width.max(0.0), height.max(0.0)),
            angle: 0.0,
            visible: true,
            is_layout_positioned: true,
            group: None,
            hidden_by_layout: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.center = geom::point(x, y);
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self.hidden_by_layout = false;
        self
    }

    pub fn not_layout_positioned(mut self) -> Self {
        self.is_layout_positioned = false;
        self
    }

    pub fn bounds(&self) -> Rect {
        geom::rect_centered(self.center, self.size)
    }

    pub fn is_layout_eligible(&self) -> bool {
        self.visible && self.is_layout_positioned
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub key: String,
    pub from: String,
    pub to: String,
    pub category: String,
    pub visible: bool,
    pub is_layout_positioned: bool,
    /// The committed route. Empty until a layout or router writes one.
    pub points: Vec<Point>,
    pub from_spot: Spot,
    pub to_spot: Spot,
    pub curviness: Option<f64>,
}

impl Link {
    pub fn new(key: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            from: from.into(),
            to: to.into(),
            category: String::new(),
            visible: true,
            is_layout_positioned: true,
            points: Vec::new(),
            from_spot: Spot::None,
            to_spot: Spot::None,
            curviness: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn is_layout_eligible(&self) -> bool {
        self.visible && self.is_layout_positioned
    }
}

/// Which parts of a diagram a layout pass covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PartCollection {
    /// Every node and link.
    #[default]
    All,
    /// Members of a group, with the links running between them.
    Group(String),
    /// An explicit list of node and link keys.
    Parts(Vec<String>),
}

/// A resolved [`PartCollection`]: node and link keys in diagram order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parts {
    pub nodes: IndexSet<String>,
    pub links: IndexSet<String>,
}

impl Parts {
    pub fn contains_node(&self, key: &str) -> bool {
        self.nodes.contains(key)
    }

    pub fn contains_link(&self, key: &str) -> bool {
        self.links.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn into_collection(self) -> PartCollection {
        PartCollection::Parts(self.nodes.into_iter().chain(self.links).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    nodes: IndexMap<String, Node>,
    links: IndexMap<String, Link>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a node, returning the previous one with the same key.
    pub fn add_node(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.key.clone(), node)
    }

    pub fn add_link(&mut self, link: Link) -> Option<Link> {
        self.links.insert(link.key.clone(), link)
    }

    /// Removes a node together with every link attached to it.
    pub fn remove_node(&mut self, key: &str) -> Option<Node> {
        let node = self.nodes.shift_remove(key)?;
        self.links.retain(|_, l| l.from != key && l.to != key);
        Some(node)
    }

    pub fn remove_link(&mut self, key: &str) -> Option<Link> {
        self.links.shift_remove(key)
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    pub fn link(&self, key: &str) -> Option<&Link> {
        self.links.get(key)
    }

    pub fn link_mut(&mut self, key: &str) -> Option<&mut Link> {
        self.links.get_mut(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn links_into<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.values().filter(move |l| l.to == key)
    }

    pub fn links_out_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.values().filter(move |l| l.from == key)
    }

    /// A key starting with `prefix` that names neither a node nor a link.
    pub fn unique_key(&self, prefix: &str) -> String {
        if !self.nodes.contains_key(prefix) && !self.links.contains_key(prefix) {
            return prefix.to_string();
        }
        (1usize..)
            .map(|i| format!("{prefix}-{i}"))
            .find(|k| !self.nodes.contains_key(k) && !self.links.contains_key(k))
            .unwrap_or_else(|| prefix.to_string())
    }

    pub fn resolve(&self, collection: &PartCollection) -> Parts {
        let mut parts = Parts::default();
        match collection {
            PartCollection::All => {
                parts.nodes.extend(self.nodes.keys().cloned());
                parts.links.extend(self.links.keys().cloned());
            }
            PartCollection::Group(group) => {
                parts.nodes.extend(
                    self.nodes
                        .values()
                        .filter(|n| n.group.as_deref() == Some(group.as_str()))
                        .map(|n| n.key.clone()),
                );
                let links: Vec<String> = self
                    .links
                    .values()
                    .filter(|l| parts.contains_node(&l.from) && parts.contains_node(&l.to))
                    .map(|l| l.key.clone())
                    .collect();
                parts.links.extend(links);
            }
            PartCollection::Parts(keys) => {
                for key in keys {
                    if self.nodes.contains_key(key) {
                        parts.nodes.insert(key.clone());
                    }
                    if self.links.contains_key(key) {
                        parts.links.insert(key.clone());
                    }
                }
            }
        }
        parts
    }
}
