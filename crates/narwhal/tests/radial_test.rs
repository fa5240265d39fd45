use narwhal::radial::{RING_GUIDE_CATEGORY, RING_GUIDE_PREFIX};
use narwhal::{
    Diagram, Error, Link, Node, PartCollection, RadialHooks, RadialLayout, RadialOptions,
    RadialVertex, RingGuides, RotateOutward, build_network,
};
use narwhal_network::geom::{normalize_degrees, point};
use narwhal_network::{Network, Vertex};
use proptest::prelude::*;

fn diagram(nodes: &[&str], links: &[(&str, &str)]) -> Diagram {
    let mut d = Diagram::new();
    for key in nodes {
        d.add_node(Node::new(*key, 10.0, 10.0).at(-999.0, -999.0));
    }
    for (from, to) in links {
        d.add_link(Link::new(format!("{from}->{to}"), *from, *to));
    }
    d
}

fn angle_of(d: &Diagram, key: &str) -> f64 {
    let c = d.node(key).unwrap().center;
    normalize_degrees(c.y.atan2(c.x).to_degrees())
}

fn radius_of(d: &Diagram, key: &str) -> f64 {
    let c = d.node(key).unwrap().center;
    c.x.hypot(c.y)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn three_children_split_the_circle_evenly() {
    let mut d = diagram(&["root", "a", "b", "c"], &[("root", "a"), ("root", "b"), ("root", "c")]);
    RadialLayout::new(RadialOptions::default())
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();

    assert_eq!(d.node("root").unwrap().center, point(0.0, 0.0));
    for key in ["a", "b", "c"] {
        assert_close(radius_of(&d, key), 100.0);
        assert!(d.node(key).unwrap().visible);
    }
    // Slices start at -180 and each child sits mid-slice.
    assert_close(angle_of(&d, "a"), 240.0);
    assert_close(angle_of(&d, "b"), 0.0);
    assert_close(angle_of(&d, "c"), 120.0);
}

#[test]
fn ring_radius_is_distance_times_thickness() {
    let mut d = diagram(
        &["r", "a", "b", "c"],
        &[("r", "a"), ("a", "b"), ("b", "c")],
    );
    let opts = RadialOptions {
        layer_thickness: 40.0,
        origin: point(100.0, 50.0),
        ..RadialOptions::default()
    };
    RadialLayout::new(opts).do_layout(&mut d, &PartCollection::All).unwrap();

    assert_eq!(d.node("r").unwrap().center, point(100.0, 50.0));
    for (key, ring) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
        let c = d.node(key).unwrap().center;
        assert_close((c.x - 100.0).hypot(c.y - 50.0), ring * 40.0);
    }
}

#[test]
fn max_layers_hides_outer_rings_and_a_later_pass_restores_them() {
    let mut d = diagram(&["r", "a", "b", "c"], &[("r", "a"), ("a", "b"), ("b", "c")]);
    let bounded = RadialOptions {
        max_layers: Some(1),
        ..RadialOptions::default()
    };
    RadialLayout::new(bounded).do_layout(&mut d, &PartCollection::All).unwrap();

    assert!(d.node("r").unwrap().visible);
    assert!(d.node("a").unwrap().visible);
    assert_close(radius_of(&d, "a"), 100.0);
    assert!(!d.node("b").unwrap().visible);
    assert!(!d.node("c").unwrap().visible);
    assert_eq!(d.node("b").unwrap().center, point(-999.0, -999.0));

    RadialLayout::new(RadialOptions::default())
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();
    assert!(d.node("b").unwrap().visible);
    assert!(d.node("c").unwrap().visible);
    assert_close(radius_of(&d, "c"), 300.0);
}

#[test]
fn caller_hidden_nodes_are_neither_shown_nor_used_as_paths() {
    let mut d = diagram(&["r", "x"], &[("r", "h"), ("h", "x")]);
    d.add_node(Node::new("h", 10.0, 10.0).at(-999.0, -999.0).hidden());
    RadialLayout::new(RadialOptions::default())
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();

    let h = d.node("h").unwrap();
    assert!(!h.visible);
    assert_eq!(h.center, point(-999.0, -999.0));
    // Only reachable through `h`, so it is left where it was.
    assert_eq!(d.node("x").unwrap().center, point(-999.0, -999.0));

    RadialLayout::new(RadialOptions {
        max_layers: Some(3),
        ..RadialOptions::default()
    })
    .do_layout(&mut d, &PartCollection::All)
    .unwrap();
    assert!(!d.node("x").unwrap().visible);
    RadialLayout::new(RadialOptions::default())
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();
    assert!(d.node("x").unwrap().visible);
    assert!(!d.node("h").unwrap().visible);
}

#[test]
fn unreached_nodes_stay_put_and_follow_the_max_layers_rule() {
    let mut d = diagram(&["r", "a", "lonely"], &[("r", "a")]);
    RadialLayout::new(RadialOptions::default())
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();
    let lonely = d.node("lonely").unwrap();
    assert_eq!(lonely.center, point(-999.0, -999.0));
    assert!(lonely.visible);

    let bounded = RadialOptions {
        root: Some("r".to_string()),
        max_layers: Some(5),
        ..RadialOptions::default()
    };
    RadialLayout::new(bounded).do_layout(&mut d, &PartCollection::All).unwrap();
    assert!(!d.node("lonely").unwrap().visible);
}

#[test]
fn configured_root_must_be_in_the_network() {
    let mut d = diagram(&["r", "a"], &[("r", "a")]);
    let opts = RadialOptions {
        root: Some("missing".to_string()),
        ..RadialOptions::default()
    };
    let err = RadialLayout::new(opts)
        .do_layout(&mut d, &PartCollection::All)
        .unwrap_err();
    assert!(matches!(err, Error::RootNotInNetwork { key } if key == "missing"));
}

#[test]
fn non_positive_thickness_is_rejected() {
    let mut d = diagram(&["r"], &[]);
    let opts = RadialOptions {
        layer_thickness: 0.0,
        ..RadialOptions::default()
    };
    let err = RadialLayout::new(opts)
        .do_layout(&mut d, &PartCollection::All)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption { name: "layerThickness", .. }));
}

#[test]
fn empty_collection_is_a_no_op() {
    let mut d = diagram(&["r", "a"], &[("r", "a")]);
    let before = d.clone();
    RadialLayout::new(RadialOptions::default())
        .do_layout(&mut d, &PartCollection::Parts(Vec::new()))
        .unwrap();
    assert_eq!(d, before);
}

#[test]
fn configured_root_sits_at_the_origin() {
    let mut d = diagram(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
    let opts = RadialOptions {
        root: Some("b".to_string()),
        ..RadialOptions::default()
    };
    RadialLayout::new(opts).do_layout(&mut d, &PartCollection::All).unwrap();
    assert_eq!(d.node("b").unwrap().center, point(0.0, 0.0));
    assert_close(radius_of(&d, "a"), 100.0);
    assert_close(radius_of(&d, "c"), 100.0);
}

#[test]
fn rotate_outward_keeps_left_half_upright() {
    let mut d = diagram(&["root", "a", "b", "c"], &[("root", "a"), ("root", "b"), ("root", "c")]);
    RadialLayout::with_hooks(RadialOptions::default(), RotateOutward)
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();
    assert_close(d.node("a").unwrap().angle, 60.0);
    assert_close(d.node("b").unwrap().angle, 0.0);
    assert_close(d.node("c").unwrap().angle, 300.0);
    assert_eq!(d.node("root").unwrap().angle, 0.0);
}

#[derive(Default)]
struct CountRotations(std::cell::RefCell<Vec<(String, f64)>>);

impl RadialHooks for CountRotations {
    fn rotate_node(
        &self,
        node: &mut Node,
        _angle: f64,
        _sweep: f64,
        radius: f64,
    ) -> narwhal::Result<()> {
        self.0.borrow_mut().push((node.key.clone(), radius));
        Ok(())
    }
}

#[test]
fn rotate_node_runs_for_every_node_including_unpositioned_ones() {
    let mut d = diagram(&["r", "a", "b", "lonely"], &[("r", "a"), ("a", "b")]);
    let layout = RadialLayout::with_hooks(
        RadialOptions {
            max_layers: Some(1),
            ..RadialOptions::default()
        },
        CountRotations::default(),
    );
    layout.do_layout(&mut d, &PartCollection::All).unwrap();

    let calls = layout.hooks.0.borrow();
    let keys: Vec<&str> = calls.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["r", "a", "b", "lonely"]);
    assert_eq!(calls[1].1, 100.0);
    assert_eq!(calls[2].1, 0.0);
    assert_eq!(calls[3].1, 0.0);
}

#[test]
fn ring_guides_leave_caller_nodes_of_the_same_category_alone() {
    let mut d = diagram(&["r", "a"], &[("r", "a")]);
    d.add_node(Node::new("legend", 30.0, 30.0).with_category(RING_GUIDE_CATEGORY));
    RadialLayout::with_hooks(RadialOptions::default(), RingGuides)
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();
    RadialLayout::with_hooks(RadialOptions::default(), RingGuides)
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();

    assert!(d.node("legend").is_some());
    let guides = d
        .nodes()
        .filter(|n| n.key.starts_with(RING_GUIDE_PREFIX))
        .count();
    assert_eq!(guides, 1);
}

#[test]
fn ring_guides_are_replaced_on_every_pass() {
    let mut d = diagram(&["r", "a", "b"], &[("r", "a"), ("a", "b")]);
    let layout = RadialLayout::with_hooks(RadialOptions::default(), RingGuides);
    layout.do_layout(&mut d, &PartCollection::All).unwrap();
    layout.do_layout(&mut d, &PartCollection::All).unwrap();

    let guides: Vec<&Node> = d
        .nodes()
        .filter(|n| n.category == RING_GUIDE_CATEGORY)
        .collect();
    assert_eq!(guides.len(), 2);
    assert_eq!(guides[0].size.width, 200.0);
    assert_eq!(guides[1].size.width, 400.0);
    assert!(guides.iter().all(|g| !g.is_layout_positioned));
    assert_eq!(d.node("r").unwrap().center, point(0.0, 0.0));
}

struct FailingBreadth;

impl RadialHooks for FailingBreadth {
    fn compute_breadth(&self, _: &Vertex<RadialVertex>, _: &[f64]) -> narwhal::Result<f64> {
        Err(Error::callback("breadth unavailable"))
    }
}

#[test]
fn hook_errors_propagate_unchanged() {
    let mut d = diagram(&["r", "a"], &[("r", "a")]);
    let err = RadialLayout::with_hooks(RadialOptions::default(), FailingBreadth)
        .do_layout(&mut d, &PartCollection::All)
        .unwrap_err();
    assert!(matches!(err, Error::Callback(_)));
    assert_eq!(err.to_string(), "breadth unavailable");
}

struct Weighted;

impl RadialHooks for Weighted {
    fn compute_breadth(&self, v: &Vertex<RadialVertex>, children: &[f64]) -> narwhal::Result<f64> {
        let own: f64 = if v.node.as_deref() == Some("heavy") { 3.0 } else { 1.0 };
        Ok(own.max(children.iter().sum()))
    }
}

#[test]
fn custom_breadth_changes_the_share_of_the_sweep() {
    let d = diagram(&["r", "heavy", "light"], &[("r", "heavy"), ("r", "light")]);
    let mut net: Network<RadialVertex> = build_network(&d, &PartCollection::All).unwrap();
    RadialLayout::with_hooks(RadialOptions::default(), Weighted)
        .layout_network(&mut net)
        .unwrap();
    let heavy = net.find_vertex("heavy").unwrap();
    let light = net.find_vertex("light").unwrap();
    assert_close(net[heavy].data.sweep, 270.0);
    assert_close(net[light].data.sweep, 90.0);
}

#[test]
fn repeated_passes_do_not_drift() {
    let mut d = diagram(
        &["r", "a", "b", "c", "d", "e"],
        &[("r", "a"), ("r", "b"), ("a", "c"), ("a", "d"), ("b", "e"), ("e", "r")],
    );
    let layout = RadialLayout::new(RadialOptions {
        max_layers: Some(2),
        ..RadialOptions::default()
    });
    layout.do_layout(&mut d, &PartCollection::All).unwrap();
    let first = d.clone();
    layout.do_layout(&mut d, &PartCollection::All).unwrap();
    assert_eq!(d, first);
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..20).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n), 0..(n * 2));
        (Just(n), edges)
    })
}

fn network(n: usize, edges: &[(usize, usize)]) -> Network<RadialVertex> {
    let keys: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
    let mut d = Diagram::new();
    for key in &keys {
        d.add_node(Node::new(key.clone(), 10.0, 10.0));
    }
    for (i, &(a, b)) in edges.iter().enumerate() {
        d.add_link(Link::new(format!("l{i}"), keys[a].clone(), keys[b].clone()));
    }
    build_network(&d, &PartCollection::All).unwrap()
}

proptest! {
    #[test]
    fn child_sweeps_partition_the_parent_sweep((n, edges) in graph_strategy()) {
        let mut net = network(n, &edges);
        let root = RadialLayout::new(RadialOptions::default())
            .layout_network(&mut net)
            .unwrap()
            .unwrap();
        prop_assert_eq!(net[root].data.sweep, 360.0);

        for (_, v) in net.vertices() {
            if v.data.laid {
                prop_assert!((0.0..360.0).contains(&v.data.angle), "angle {}", v.data.angle);
                let expected = f64::from(v.data.distance.unwrap()) * 100.0;
                prop_assert!((v.center.x.hypot(v.center.y) - expected).abs() < 1e-6);
            }
            if v.data.children.is_empty() {
                continue;
            }
            let sum: f64 = v.data.children.iter().map(|c| net[*c].data.sweep).sum();
            prop_assert!((sum / v.data.sweep - 1.0).abs() < 1e-9, "fractions sum to {}", sum / v.data.sweep);
        }
    }
}
