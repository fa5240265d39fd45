//! Spiral layout: a chain of nodes along the involute of a circle around the root.

use crate::diagram::{Diagram, PartCollection};
use crate::error::{Error, Result, ensure_spacing};
use crate::network::{build_network, commit_centers};
use narwhal_network::geom::{self, Point};
use narwhal_network::{Network, VertexId, alg};
use serde::Deserialize;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpiralOptions {
    /// Radius of the base circle; `None` uses a quarter of the root's diagonal.
    pub radius: Option<f64>,
    /// Gap between consecutive nodes along the spiral.
    pub spacing: f64,
    pub clockwise: bool,
    pub root: Option<String>,
    pub origin: Point,
}

impl Default for SpiralOptions {
    fn default() -> Self {
        Self {
            radius: None,
            spacing: 10.0,
            clockwise: true,
            root: None,
            origin: geom::point(0.0, 0.0),
        }
    }
}

impl SpiralOptions {
    pub fn validate(&self) -> Result<()> {
        ensure_spacing("spacing", self.spacing)?;
        match self.radius {
            Some(r) if !(r.is_finite() && r > 0.0) => Err(Error::InvalidOption {
                name: "radius",
                message: format!("expected a positive number, got {r}"),
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpiralLayout {
    pub options: SpiralOptions,
}

impl SpiralLayout {
    pub fn new(options: SpiralOptions) -> Self {
        Self { options }
    }

    pub fn do_layout(&self, diagram: &mut Diagram, collection: &PartCollection) -> Result<()> {
        self.options.validate()?;
        let mut net: Network<()> = build_network(diagram, collection)?;
        if net.is_empty() {
            return Ok(());
        }
        let curviness = self.layout_network(&mut net)?;
        commit_centers(&net, diagram);
        for (key, c) in curviness {
            if let Some(link) = diagram.link_mut(&key) {
                link.curviness = Some(c);
            }
        }
        Ok(())
    }

    /// Positions the chain starting at the root; returns the curviness for each followed link.
    pub fn layout_network(&self, net: &mut Network<()>) -> Result<Vec<(String, f64)>> {
        let root = match &self.options.root {
            Some(key) => net
                .find_vertex(key)
                .ok_or_else(|| Error::RootNotInNetwork { key: key.clone() })?,
            None => match alg::roots(net).first().copied().or_else(|| net.vertex_ids().next()) {
                Some(root) => root,
                None => return Ok(Vec::new()),
            },
        };

        let sign = if self.options.clockwise { 1.0 } else { -1.0 };
        let radius = self
            .options
            .radius
            .unwrap_or_else(|| geom::diagonal(net[root].size) / 4.0);
        // A zero-sized root still needs a circle to unwind from.
        let radius = if radius > 0.0 { radius } else { 1.0 };
        let origin = self.options.origin;

        let mut curviness = Vec::new();
        let mut visited = vec![false; net.slot_count()];
        visited[root.index()] = true;
        net[root].center = origin;

        let mut angle = sign * PI;
        let mut next = self.follow(net, root, sign * radius, &mut curviness);
        while let Some(v) = next {
            if visited[v.index()] {
                break;
            }
            visited[v.index()] = true;
            let (sin, cos) = angle.sin_cos();
            let x = radius * (cos + angle * sin);
            let y = radius * (sin - angle * cos);
            net[v].center = origin + geom::vector(x, y);

            let dist = x.hypot(y).max(radius);
            let diameter = geom::diagonal(net[v].size);
            angle += sign * (diameter + self.options.spacing) / dist;
            next = self.follow(net, v, sign * radius, &mut curviness);
        }
        tracing::debug!(
            placed = visited.iter().filter(|&&v| v).count(),
            radius,
            "spiral layout"
        );
        Ok(curviness)
    }

    fn follow(
        &self,
        net: &Network<()>,
        v: VertexId,
        curviness: f64,
        out: &mut Vec<(String, f64)>,
    ) -> Option<VertexId> {
        let edge = net.destination_edges(v).next()?;
        let e = &net[edge];
        if let Some(key) = &e.link {
            out.push((key.clone(), curviness));
        }
        Some(e.to)
    }
}
