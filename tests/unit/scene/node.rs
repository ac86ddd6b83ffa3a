use super::*;

fn sample_tree() -> SceneNode {
    let mut root = SceneNode::frame("root", NodeFrame::sized(750.0, 500.0));
    let body = SceneNode::frame("body", NodeFrame::sized(750.0, 500.0))
        .with_child(
            SceneNode::frame("header", NodeFrame::sized(750.0, 300.0)).with_child(
                SceneNode::text(
                    "subtitle",
                    "hi",
                    TextStyle::regular(24.0, Color::BLACK),
                    NodeFrame::new(10.0, 250.0, 100.0, 34.0),
                ),
            ),
        )
        .with_child(SceneNode::frame("footer", NodeFrame::new(0.0, 300.0, 750.0, 200.0)));
    root.append_child(body);
    root.assign_ids(1);
    root
}

#[test]
fn ids_follow_depth_first_order() {
    let root = sample_tree();
    let names: Vec<(u64, &str)> = root
        .walk()
        .map(|n| (n.id.as_u64(), n.name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            (1, "root"),
            (2, "body"),
            (3, "header"),
            (4, "subtitle"),
            (5, "footer")
        ]
    );
    assert_eq!(root.max_id(), NodeId(5));
    assert_eq!(root.node_count(), 5);
}

#[test]
fn clone_is_independent() {
    let source = sample_tree();
    let mut copy = source.clone();
    copy.children[0].children[0].resize(10.0, 10.0);
    copy.children[0].children.pop();
    assert_eq!(source.children[0].children[0].frame.width, 750.0);
    assert_eq!(source.children[0].children.len(), 2);
}

#[test]
fn take_child_supports_reparenting() {
    let mut root = sample_tree();
    let footer_id = root.find_named("footer").unwrap().id;
    let footer = root.children[0].take_child(footer_id).unwrap();
    root.append_child(footer);
    assert_eq!(root.children[0].children.len(), 1);
    assert_eq!(root.children[1].name, "footer");
    assert!(root.children[0].take_child(footer_id).is_none());
}

#[test]
fn set_fill_only_applies_to_paintable_kinds() {
    let mut f = SceneNode::frame("f", NodeFrame::sized(1.0, 1.0));
    assert!(f.set_fill(Some(Color::WHITE)));
    assert!(matches!(f.kind, NodeKind::Frame { fill: Some(_), .. }));

    let mut g = SceneNode::group("g", NodeFrame::default(), vec![]);
    assert!(!g.set_fill(Some(Color::WHITE)));
}

#[test]
fn content_bounds_and_bottom() {
    let root = sample_tree();
    let body = &root.children[0];
    assert_eq!(body.content_bottom(), 500.0);
    let b = body.content_bounds().unwrap();
    assert_eq!((b.width(), b.height()), (750.0, 500.0));
    assert!(
        SceneNode::frame("empty", NodeFrame::default())
            .content_bounds()
            .is_none()
    );
}

#[test]
fn serializes_kind_inline() {
    let node = SceneNode::placeholder(
        "hero",
        PlaceholderReason::Oversize,
        "too large",
        NodeFrame::sized(10.0, 10.0),
    );
    let v = serde_json::to_value(&node).unwrap();
    assert_eq!(v["type"], "placeholder");
    assert_eq!(v["reason"], "oversize");
    assert_eq!(v["name"], "hero");
    assert!(v.get("children").is_none());
    assert!(node.is_placeholder());
}

#[test]
fn placeholder_categories_look_different() {
    assert_ne!(
        PlaceholderReason::Oversize.fill(),
        PlaceholderReason::Generic.fill()
    );
}

#[test]
fn scale_to_width_scales_descendants() {
    let mut group = SceneNode::group(
        "banner",
        NodeFrame::sized(200.0, 50.0),
        vec![
            SceneNode::frame("a", NodeFrame::new(0.0, 0.0, 100.0, 50.0)),
            SceneNode::frame("b", NodeFrame::new(100.0, 0.0, 100.0, 50.0)),
        ],
    );
    group.scale_to_width(100.0);
    assert_eq!((group.frame.width, group.frame.height), (100.0, 25.0));
    let b = &group.children[1];
    assert_eq!((b.frame.x, b.frame.width, b.frame.height), (50.0, 50.0, 25.0));
}
