use super::*;
use crate::foundation::core::NodeFrame;

fn tree() -> SceneNode {
    let module = |name: &str, y: f64| {
        SceneNode::frame(name, NodeFrame::new(0.0, y, 750.0, 100.0))
            .with_child(
                SceneNode::frame("row", NodeFrame::sized(750.0, 50.0))
                    .with_child(SceneNode::frame("button", NodeFrame::sized(10.0, 10.0))),
            )
            .with_child(SceneNode::frame("button", NodeFrame::new(0.0, 60.0, 20.0, 20.0)))
    };
    let mut root = SceneNode::frame("root", NodeFrame::sized(750.0, 300.0)).with_child(
        SceneNode::frame("body", NodeFrame::sized(750.0, 300.0))
            .with_child(module("gameInfo", 0.0))
            .with_child(module("rules", 100.0))
            .with_child(module("gameInfo", 200.0)),
    );
    root.assign_ids(1);
    root
}

#[test]
fn find_named_is_depth_first_and_scoped() {
    let root = tree();
    let index = NodeIndex::build(&root);
    assert_eq!(index.len(), root.node_count());

    let body = root.children[0].id;
    let modules = index.children_named(body, "gameInfo");
    assert_eq!(modules.len(), 2);

    let first = index.find_named(modules[0], "button").unwrap();
    let node = index.get(&root, first).unwrap();
    // The nested button comes first in depth-first order.
    assert_eq!(node.frame.width, 10.0);

    let second = index.find_named(modules[1], "button").unwrap();
    assert_ne!(first, second);
    assert!(index.find_named(modules[0], "missing").is_none());
    // Scope itself is excluded.
    assert!(index.find_named(modules[0], "gameInfo").is_none());
}

#[test]
fn get_mut_resolves_by_id() {
    let mut root = tree();
    let index = NodeIndex::build(&root);
    let body = root.children[0].id;
    let rules = index.children_named(body, "rules")[0];
    index.get_mut(&mut root, rules).unwrap().resize(1.0, 2.0);
    assert_eq!(root.children[0].children[1].frame.width, 1.0);
    assert_eq!(index.parent_of(rules), Some(body));
    assert_eq!(index.parent_of(root.id), None);
}

#[test]
fn stale_paths_do_not_resolve_to_wrong_nodes() {
    let mut root = tree();
    let index = NodeIndex::build(&root);
    let body = root.children[0].id;
    let last = index.children_named(body, "gameInfo")[1];
    let first = root.children[0].children[0].id;
    root.children[0].take_child(first);
    assert!(index.get(&root, last).is_none());
    let rebuilt = NodeIndex::build(&root);
    assert_eq!(rebuilt.get(&root, last).unwrap().frame.y, 200.0);
}
