use narwhal::{
    Algorithm, Diagram, Error, LayoutConfig, Link, Node, PartCollection, RadialOptions,
    TreeOptions,
};
use narwhal_network::geom::point;
use serde_json::json;

#[test]
fn empty_config_selects_the_default_tree_layout() {
    let algorithm = Algorithm::from_config(&LayoutConfig::default()).unwrap();
    assert_eq!(algorithm, Algorithm::Tree(TreeOptions::default()));
    assert_eq!(algorithm.name(), "tree");
}

#[test]
fn radial_section_overrides_only_given_keys() {
    let cfg = LayoutConfig::from_json_str(
        r#"{"algorithm": "radial", "radial": {"layerThickness": 80, "maxLayers": 2, "origin": [5, 6]}}"#,
    )
    .unwrap();
    let Algorithm::Radial(opts) = Algorithm::from_config(&cfg).unwrap() else {
        panic!("expected a radial layout");
    };
    assert_eq!(
        opts,
        RadialOptions {
            layer_thickness: 80.0,
            max_layers: Some(2),
            origin: point(5.0, 6.0),
            ..RadialOptions::default()
        }
    );
}

#[test]
fn parallel_options_read_tree_keys_at_the_section_root() {
    let cfg = LayoutConfig::from_value(json!({
        "algorithm": "parallel",
        "parallel": {"angle": 90, "layerSpacing": 30}
    }));
    let Algorithm::Parallel(opts) = Algorithm::from_config(&cfg).unwrap() else {
        panic!("expected a parallel layout");
    };
    assert_eq!(opts.tree.angle, 90.0);
    assert_eq!(opts.tree.layer_spacing, 30.0);
    assert_eq!(opts.tree.node_spacing, TreeOptions::default().node_spacing);
}

#[test]
fn unknown_algorithm_and_bad_types_are_errors() {
    let cfg = LayoutConfig::from_value(json!({"algorithm": "force"}));
    assert!(matches!(
        Algorithm::from_config(&cfg),
        Err(Error::UnknownAlgorithm { name }) if name == "force"
    ));

    let cfg = LayoutConfig::from_value(json!({"algorithm": "radial", "radial": {"layerThickness": "wide"}}));
    assert!(matches!(Algorithm::from_config(&cfg), Err(Error::Config(_))));

    assert!(matches!(LayoutConfig::from_json_str("{"), Err(Error::Config(_))));
}

#[test]
fn set_value_and_deep_merge_build_nested_sections() {
    let mut cfg = LayoutConfig::empty_object();
    cfg.set_value("algorithm", json!("spiral"));
    cfg.set_value("spiral.spacing", json!(4));
    cfg.deep_merge(&json!({"spiral": {"clockwise": false}}));

    assert_eq!(cfg.get_str("algorithm"), Some("spiral"));
    assert_eq!(cfg.get_f64("spiral.spacing"), Some(4.0));
    assert_eq!(cfg.get_bool("spiral.clockwise"), Some(false));
    assert!(cfg.get("spiral.radius").is_none());

    let Algorithm::Spiral(opts) = Algorithm::from_config(&cfg).unwrap() else {
        panic!("expected a spiral layout");
    };
    assert_eq!(opts.spacing, 4.0);
    assert!(!opts.clockwise);
}

#[test]
fn set_value_replaces_scalars_on_the_path() {
    let mut cfg = LayoutConfig::from_value(json!({"tree": 3}));
    cfg.set_value("tree.angle", json!(180));
    assert_eq!(cfg.get_f64("tree.angle"), Some(180.0));

    let mut not_an_object = LayoutConfig::from_value(json!([1, 2]));
    not_an_object.set_value("algorithm", json!("radial"));
    assert_eq!(not_an_object.get_str("algorithm"), Some("radial"));
}

#[test]
fn layout_entry_point_runs_the_configured_algorithm() {
    let mut d = Diagram::new();
    d.add_node(Node::new("r", 20.0, 20.0));
    d.add_node(Node::new("a", 20.0, 20.0));
    d.add_link(Link::new("r-a", "r", "a"));

    let cfg = LayoutConfig::from_value(json!({"algorithm": "tree", "tree": {"angle": 90}}));
    narwhal::layout(&mut d, &PartCollection::All, Algorithm::from_config(&cfg).unwrap()).unwrap();
    let r = d.node("r").unwrap().center;
    let a = d.node("a").unwrap().center;
    assert_eq!(a.x, r.x);
    assert_eq!(a.y - r.y, 70.0);

    let cfg = LayoutConfig::from_value(json!({"algorithm": "radial"}));
    narwhal::layout(&mut d, &PartCollection::All, Algorithm::from_config(&cfg).unwrap()).unwrap();
    assert_eq!(d.node("r").unwrap().center, point(0.0, 0.0));
    let a = d.node("a").unwrap().center;
    assert!((a.x.hypot(a.y) - 100.0).abs() < 1e-9);
}
