//! Serpentine layout: a single chain of nodes laid in rows that alternate direction.

use crate::diagram::{Diagram, PartCollection, Parts, Spot};
use crate::error::{Error, Result, ensure_spacing};
use narwhal_network::geom::{self, Point, Size};
use rustc_hash::FxHashSet;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerpentineOptions {
    /// Gap between neighbors in a row (`width`) and between rows (`height`).
    pub spacing: Size,
    /// Row width, measured from the origin.
    pub wrap: f64,
    pub root: Option<String>,
    /// Top-left corner of the first row.
    pub origin: Point,
}

impl Default for SerpentineOptions {
    fn default() -> Self {
        Self {
            spacing: geom::size(30.0, 30.0),
            wrap: 1000.0,
            root: None,
            origin: geom::point(0.0, 0.0),
        }
    }
}

impl SerpentineOptions {
    pub fn validate(&self) -> Result<()> {
        ensure_spacing("spacing.width", self.spacing.width)?;
        ensure_spacing("spacing.height", self.spacing.height)?;
        ensure_spacing("wrap", self.wrap)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SerpentineLayout {
    pub options: SerpentineOptions,
}

impl SerpentineLayout {
    pub fn new(options: SerpentineOptions) -> Self {
        Self { options }
    }

    /// Follows the first outgoing link of each node from the root. A node seen twice ends the
    /// chain.
    pub fn do_layout(&self, diagram: &mut Diagram, collection: &PartCollection) -> Result<()> {
        self.options.validate()?;
        let parts = diagram.resolve(collection);
        let Some(mut node_key) = self.find_root(diagram, &parts)? else {
            return Ok(());
        };

        let opts = &self.options;
        let (spacing, wrap) = (opts.spacing, opts.wrap);
        let mut x = 0.0;
        let mut y = 0.0;
        let mut row_height: f64 = 0.0;
        let mut increasing = true;
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut placed = 0usize;

        loop {
            visited.insert(node_key.clone());
            let next = next_link(diagram, &parts, &node_key);
            let Some(size) = diagram.node(&node_key).map(|n| n.size) else {
                break;
            };
            let next_size = next
                .as_ref()
                .and_then(|(_, to)| diagram.node(to))
                .map_or(geom::size(0.0, 0.0), |n| n.size);
            row_height = row_height.max(size.height);

            let (from_spot, to_spot) = if increasing {
                self.move_to(diagram, &node_key, x, y);
                if x + spacing.width + size.width + next_size.width > wrap {
                    y += row_height + spacing.height;
                    x = wrap - spacing.width;
                    row_height = 0.0;
                    increasing = false;
                    (Spot::Right, Spot::Right)
                } else {
                    x += size.width + spacing.width;
                    (Spot::Right, Spot::Left)
                }
            } else {
                x -= size.width;
                self.move_to(diagram, &node_key, x, y);
                if x - spacing.width - next_size.width < 0.0 {
                    y += row_height + spacing.height;
                    x = 0.0;
                    row_height = 0.0;
                    increasing = true;
                    (Spot::Left, Spot::Left)
                } else {
                    x -= spacing.width;
                    (Spot::Left, Spot::Right)
                }
            };
            placed += 1;

            let Some((link_key, to)) = next else {
                break;
            };
            if let Some(link) = diagram.link_mut(&link_key) {
                link.from_spot = from_spot;
                link.to_spot = to_spot;
            }
            if visited.contains(&to) {
                break;
            }
            node_key = to;
        }
        tracing::debug!(placed, "serpentine layout");
        Ok(())
    }

    fn move_to(&self, diagram: &mut Diagram, key: &str, x: f64, y: f64) {
        let origin = self.options.origin;
        if let Some(node) = diagram.node_mut(key) {
            node.center = geom::point(
                origin.x + x + node.size.width / 2.0,
                origin.y + y + node.size.height / 2.0,
            );
        }
    }

    fn find_root(&self, diagram: &Diagram, parts: &Parts) -> Result<Option<String>> {
        let eligible = |key: &str| {
            parts.contains_node(key) && diagram.node(key).is_some_and(|n| n.is_layout_eligible())
        };
        if let Some(key) = &self.options.root {
            if !eligible(key) {
                return Err(Error::RootNotInNetwork { key: key.clone() });
            }
            return Ok(Some(key.clone()));
        }
        let mut candidates = parts.nodes.iter().filter(|k| eligible(k));
        let first = candidates.clone().next().cloned();
        let without_incoming = candidates.find(|k| {
            !diagram
                .links_into(k)
                .any(|l| parts.contains_link(&l.key) && l.is_layout_eligible() && eligible(&l.from))
        });
        Ok(without_incoming.cloned().or(first))
    }
}

fn next_link(diagram: &Diagram, parts: &Parts, key: &str) -> Option<(String, String)> {
    diagram
        .links_out_of(key)
        .find(|l| {
            parts.contains_link(&l.key)
                && l.is_layout_eligible()
                && parts.contains_node(&l.to)
                && diagram.node(&l.to).is_some_and(|n| n.is_layout_eligible())
        })
        .map(|l| (l.key.clone(), l.to.clone()))
}
