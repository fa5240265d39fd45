#![forbid(unsafe_code)]

//! Headless graph layouts over an abstract diagram of sized nodes and links.
//!
//! Each layout builds a throwaway [`narwhal_network::Network`] from the selected parts, runs
//! on it, and commits positions, visibility, angles and link routes back into the
//! [`Diagram`]. Nothing is retained between passes apart from the options.
//!
//! A failing pass may already have written part of its results.

pub mod config;
pub mod diagram;
pub mod double_tree;
pub mod error;
pub mod fishbone;
pub mod network;
pub mod parallel;
pub mod radial;
pub mod routing;
pub mod serpentine;
pub mod spiral;
pub mod tree;

pub use config::LayoutConfig;
pub use diagram::{Diagram, Link, Node, PartCollection, Parts, Spot};
pub use double_tree::{AlwaysPositive, DoubleTreeLayout, DoubleTreeOptions, TreeDirection};
pub use error::{CallbackError, Error, Result};
pub use fishbone::{FishboneLayout, FishboneOptions, FishboneRouter};
pub use network::build_network;
pub use parallel::{CategoryPredicates, ParallelLayout, ParallelOptions, ParallelPredicates};
pub use radial::{
    DefaultRadialHooks, RadialHooks, RadialLayout, RadialOptions, RadialVertex, RingGuides,
    RotateOutward,
};
pub use serpentine::{SerpentineLayout, SerpentineOptions};
pub use spiral::{SpiralLayout, SpiralOptions};
pub use tree::{Alignment, Arrangement, TreeAngle, TreeLayout, TreeOptions, TreeVertex};

/// A layout and its options, with the default hooks and predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    Tree(TreeOptions),
    Radial(RadialOptions),
    Parallel(ParallelOptions),
    Fishbone(FishboneOptions),
    DoubleTree(DoubleTreeOptions),
    Serpentine(SerpentineOptions),
    Spiral(SpiralOptions),
}

impl Algorithm {
    /// Picks the layout named by `algorithm` (default `tree`) and reads its options from the
    /// section of the same name.
    pub fn from_config(config: &LayoutConfig) -> Result<Self> {
        let name = config.get_str("algorithm").unwrap_or("tree");
        Ok(match name {
            "tree" => Algorithm::Tree(config.section("tree")?),
            "radial" => Algorithm::Radial(config.section("radial")?),
            "parallel" => Algorithm::Parallel(config.section("parallel")?),
            "fishbone" => Algorithm::Fishbone(config.section("fishbone")?),
            "doubleTree" => Algorithm::DoubleTree(config.section("doubleTree")?),
            "serpentine" => Algorithm::Serpentine(config.section("serpentine")?),
            "spiral" => Algorithm::Spiral(config.section("spiral")?),
            other => {
                return Err(Error::UnknownAlgorithm {
                    name: other.to_string(),
                });
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Tree(_) => "tree",
            Algorithm::Radial(_) => "radial",
            Algorithm::Parallel(_) => "parallel",
            Algorithm::Fishbone(_) => "fishbone",
            Algorithm::DoubleTree(_) => "doubleTree",
            Algorithm::Serpentine(_) => "serpentine",
            Algorithm::Spiral(_) => "spiral",
        }
    }
}

/// Headless layout entry point.
pub fn layout(diagram: &mut Diagram, collection: &PartCollection, algorithm: Algorithm) -> Result<()> {
    tracing::debug!(algorithm = algorithm.name(), "layout");
    match algorithm {
        Algorithm::Tree(opts) => TreeLayout::new(opts).do_layout(diagram, collection),
        Algorithm::Radial(opts) => RadialLayout::new(opts).do_layout(diagram, collection),
        Algorithm::Parallel(opts) => ParallelLayout::new(opts).do_layout(diagram, collection),
        Algorithm::Fishbone(opts) => FishboneLayout::new(opts).do_layout(diagram, collection),
        Algorithm::DoubleTree(opts) => DoubleTreeLayout::new(opts).do_layout(diagram, collection),
        Algorithm::Serpentine(opts) => SerpentineLayout::new(opts).do_layout(diagram, collection),
        Algorithm::Spiral(opts) => SpiralLayout::new(opts).do_layout(diagram, collection),
    }
}
