use narwhal::{
    Diagram, Error, Link, Node, PartCollection, SerpentineLayout, SerpentineOptions, Spot,
    SpiralLayout, SpiralOptions,
};
use narwhal_network::geom::{point, size};

fn chain(n: usize, width: f64, height: f64) -> Diagram {
    let mut d = Diagram::new();
    for i in 0..n {
        d.add_node(Node::new(format!("n{i}"), width, height));
        if i > 0 {
            d.add_link(Link::new(format!("l{i}"), format!("n{}", i - 1), format!("n{i}")));
        }
    }
    d
}

fn serpentine(wrap: f64) -> SerpentineLayout {
    SerpentineLayout::new(SerpentineOptions {
        spacing: size(30.0, 30.0),
        wrap,
        ..SerpentineOptions::default()
    })
}

#[test]
fn serpentine_rows_alternate_direction() {
    let mut d = chain(10, 100.0, 50.0);
    serpentine(500.0).do_layout(&mut d, &PartCollection::All).unwrap();

    let c = |k: &str| d.node(k).unwrap().center;
    assert_eq!(c("n0"), point(50.0, 25.0));
    assert_eq!(c("n1"), point(180.0, 25.0));
    assert_eq!(c("n3"), point(440.0, 25.0));
    // Second row runs right to left.
    assert_eq!(c("n4"), point(420.0, 105.0));
    assert_eq!(c("n5"), point(290.0, 105.0));
    assert_eq!(c("n6"), point(160.0, 105.0));
    assert_eq!(c("n7"), point(50.0, 185.0));

    assert_eq!(d.link("l1").unwrap().from_spot, Spot::Right);
    assert_eq!(d.link("l1").unwrap().to_spot, Spot::Left);
    assert_eq!(d.link("l4").unwrap().from_spot, Spot::Right);
    assert_eq!(d.link("l4").unwrap().to_spot, Spot::Right);
    assert_eq!(d.link("l5").unwrap().from_spot, Spot::Left);
    assert_eq!(d.link("l5").unwrap().to_spot, Spot::Right);
    assert_eq!(d.link("l7").unwrap().from_spot, Spot::Left);
    assert_eq!(d.link("l7").unwrap().to_spot, Spot::Left);
}

#[test]
fn serpentine_rows_stay_within_the_wrap_width() {
    let mut d = chain(40, 70.0, 20.0);
    serpentine(400.0).do_layout(&mut d, &PartCollection::All).unwrap();
    for n in d.nodes() {
        let b = n.bounds();
        assert!(b.min_x() >= 0.0 && b.max_x() <= 400.0, "{} at {:?}", n.key, b);
    }
}

#[test]
fn serpentine_stops_at_a_cycle() {
    let mut d = chain(4, 50.0, 50.0);
    d.add_link(Link::new("back", "n3", "n0"));
    serpentine(1000.0).do_layout(&mut d, &PartCollection::All).unwrap();
    assert_eq!(d.node("n0").unwrap().center, point(25.0, 25.0));
    assert_eq!(d.node("n3").unwrap().center, point(265.0, 25.0));
}

#[test]
fn serpentine_root_must_be_laid_out() {
    let mut d = chain(3, 50.0, 50.0);
    let layout = SerpentineLayout::new(SerpentineOptions {
        root: Some("n9".to_string()),
        ..SerpentineOptions::default()
    });
    let err = layout.do_layout(&mut d, &PartCollection::All).unwrap_err();
    assert!(matches!(err, Error::RootNotInNetwork { key } if key == "n9"));
}

#[test]
fn spiral_starts_at_the_origin_and_unwinds_outward() {
    let mut d = chain(12, 40.0, 40.0);
    let opts = SpiralOptions {
        origin: point(10.0, 20.0),
        ..SpiralOptions::default()
    };
    SpiralLayout::new(opts).do_layout(&mut d, &PartCollection::All).unwrap();

    assert_eq!(d.node("n0").unwrap().center, point(10.0, 20.0));
    let mut last = 0.0;
    for i in 1..12 {
        let c = d.node(&format!("n{i}")).unwrap().center;
        let dist = (c.x - 10.0).hypot(c.y - 20.0);
        assert!(dist > last, "n{i} at {dist} is not beyond {last}");
        last = dist;
    }
    let radius = 40f64.hypot(40.0) / 4.0;
    for i in 1..12 {
        let curviness = d.link(&format!("l{i}")).unwrap().curviness.unwrap();
        assert!((curviness - radius).abs() < 1e-9);
    }
}

#[test]
fn counterclockwise_spiral_mirrors_the_clockwise_one() {
    let mut cw = chain(6, 40.0, 40.0);
    let mut ccw = cw.clone();
    SpiralLayout::default()
        .do_layout(&mut cw, &PartCollection::All)
        .unwrap();
    SpiralLayout::new(SpiralOptions {
        clockwise: false,
        ..SpiralOptions::default()
    })
    .do_layout(&mut ccw, &PartCollection::All)
    .unwrap();

    for i in 0..6 {
        let key = format!("n{i}");
        let a = cw.node(&key).unwrap().center;
        let b = ccw.node(&key).unwrap().center;
        assert!((a.x - b.x).abs() < 1e-6, "{key}");
        assert!((a.y + b.y).abs() < 1e-6, "{key}");
    }
    assert!(ccw.link("l1").unwrap().curviness.unwrap() < 0.0);
}

#[test]
fn spiral_stops_at_a_cycle_and_rejects_bad_radius() {
    let mut d = chain(3, 20.0, 20.0);
    d.add_link(Link::new("back", "n2", "n0"));
    SpiralLayout::default()
        .do_layout(&mut d, &PartCollection::All)
        .unwrap();
    assert_eq!(d.node("n0").unwrap().center, point(0.0, 0.0));

    let err = SpiralLayout::new(SpiralOptions {
        radius: Some(-1.0),
        ..SpiralOptions::default()
    })
    .do_layout(&mut d, &PartCollection::All)
    .unwrap_err();
    assert!(matches!(err, Error::InvalidOption { name: "radius", .. }));
}
