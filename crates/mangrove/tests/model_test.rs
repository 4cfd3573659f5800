use mangrove::{NodeLabel, Rgb, TreeGraph, TreeLayout};

fn family() -> TreeGraph {
    let mut g = TreeGraph::new();
    g.add(
        1,
        0,
        NodeLabel {
            width: 100.0,
            height: 50.0,
            message: "boss".to_string(),
            color: Rgb::new(200, 40, 40),
            url: "/people/boss".to_string(),
        },
    )
    .unwrap();
    g.add(
        2,
        1,
        NodeLabel {
            width: 60.0,
            height: 40.0,
            message: "dev".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    g.add(
        3,
        1,
        NodeLabel {
            width: 60.0,
            height: 40.0,
            message: "ops".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    g
}

#[test]
fn snapshot_captures_placed_nodes_in_insertion_order() {
    let mut g = family();
    let layout = TreeLayout::from_graph(&mut g);

    assert!(g.is_rendered());
    assert_eq!(layout.width, 100.0 + 60.0 + 10.0);
    assert_eq!(layout.height, 90.0 + 60.0);

    let ids: Vec<u64> = layout.nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let boss = &layout.nodes[0];
    assert_eq!((boss.x, boss.y), (30.0, 0.0));
    assert_eq!(boss.message, "boss");
    assert_eq!(boss.color, Rgb([200, 40, 40]));
    assert_eq!(boss.url, "/people/boss");
    assert_eq!(boss.links.len(), 2);

    let dev = &layout.nodes[1];
    assert_eq!((dev.x, dev.y), (0.0, 90.0));
    assert!(dev.links.is_empty());
}

#[test]
fn snapshot_serializes_connector_coordinates() {
    let mut g = family();
    let layout = TreeLayout::from_graph(&mut g);
    let value = serde_json::to_value(&layout).unwrap();

    assert_eq!(value["width"], serde_json::json!(170.0));
    assert_eq!(value["nodes"][0]["message"], serde_json::json!("boss"));
    assert_eq!(value["nodes"][0]["color"], serde_json::json!([200, 40, 40]));

    let link = &value["nodes"][0]["links"]["2"];
    assert_eq!(link["xa"], serde_json::json!(80.0));
    assert_eq!(link["ya"], serde_json::json!(50.0));
    assert_eq!(link["yb"], serde_json::json!(70.0));
    assert_eq!(link["xc"], serde_json::json!(30.0));
    assert_eq!(link["xd"], serde_json::json!(30.0));
    assert_eq!(link["yd"], serde_json::json!(90.0));
}

#[test]
fn snapshot_round_trips_through_json() {
    let mut g = family();
    let layout = TreeLayout::from_graph(&mut g);

    let json = serde_json::to_string(&layout).unwrap();
    let back: TreeLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(back, layout);
}
