use std::io::Cursor;

use super::*;
use crate::compose::prototype::{Prototype, PrototypeComposer};
use crate::config::model::Configuration;
use crate::host::canvas::MemoryHost;
use crate::host::store::MemoryStore;
use crate::scene::fingerprint::fingerprint_tree;
use crate::slicing::local::LocalRasterizer;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([9, 9, 9, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

struct Env {
    host: MemoryHost,
    broker: SliceBroker,
    rasterizer: LocalRasterizer,
    registry: ProfileRegistry,
}

impl Env {
    fn new() -> Self {
        let broker = SliceBroker::new();
        Self {
            host: MemoryHost::new(),
            rasterizer: LocalRasterizer::new(broker.clone()),
            broker,
            registry: ProfileRegistry::builtin(),
        }
    }

    async fn source(&self) -> Prototype {
        let cfg: Configuration = serde_json::from_value(serde_json::json!({
            "modules": [
                { "id": "g", "type": "gameInfo", "content": {
                    "gameName": "Quest",
                    "gameDesc": "desc",
                    "gameIcon": png(64, 64),
                    "buttonBackground": png(20, 4),
                    "buttonText": "Download"
                } },
                { "id": "r", "type": "rules", "content": { "heading": "Rules", "lines": ["one"] } },
                { "id": "f", "type": "footer", "content": { "text": "fine print" } }
            ]
        }))
        .unwrap();
        PrototypeComposer::new(&self.host, &self.rasterizer, &self.broker, EngineOptions::default())
            .build(&cfg)
            .await
            .unwrap()
    }

    fn adapter(&self) -> ChannelAdapter<'_, MemoryHost, LocalRasterizer> {
        ChannelAdapter::new(
            &self.host,
            &self.rasterizer,
            &self.broker,
            EngineOptions::default(),
            &self.registry,
        )
    }
}

fn module<'n>(root: &'n SceneNode, name: &str) -> &'n SceneNode {
    root.child_named(BODY_NAME)
        .and_then(|b| b.child_named(name))
        .unwrap()
}

fn text_of(node: &SceneNode) -> &str {
    match &node.kind {
        NodeKind::Text { content, .. } => content,
        other => panic!("not text: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_channel_is_rejected() {
    let env = Env::new();
    let source = env.source().await;
    let store = MemoryStore::<ImagePayload>::new();
    let err = env
        .adapter()
        .generate("nokia", &source.root, &store)
        .await
        .unwrap_err();
    assert!(matches!(err, PromoError::Validation(_)));
}

#[tokio::test]
async fn vivo_swaps_the_button_and_footer_text() {
    let env = Env::new();
    let source = env.source().await;
    let before = fingerprint_tree(&source.root);
    let mut store = MemoryStore::<ImagePayload>::new();
    store
        .set(
            &channel_asset_key("vivo", "downloadButton"),
            ImagePayload::Bytes(png(67, 10)),
        )
        .unwrap();

    let variant = env
        .adapter()
        .generate("vivo", &source.root, &store)
        .await
        .unwrap();
    assert!(variant.diagnostics.is_empty(), "{:?}", variant.diagnostics);
    assert_eq!(fingerprint_tree(&source.root), before);

    let root = &variant.root;
    assert_eq!(root.name, "prototype@vivo");
    assert_eq!((root.frame.x, root.frame.y), (850.0, 0.0));

    let game = module(root, "gameInfo");
    let button = game.child_named("button").unwrap();
    assert!(matches!(button.kind, NodeKind::Image { .. }));
    assert_eq!(
        (button.frame.x, button.frame.y, button.frame.width, button.frame.height),
        (40.0, 196.0, 670.0, 96.0)
    );
    assert!(button.id > source.root.max_id());
    assert_eq!(game.children.iter().filter(|c| c.name == "button").count(), 1);

    let footer_text = module(root, "footer").child_named("text").unwrap();
    assert_eq!(text_of(footer_text), "Available on the vivo App Store");
}

#[tokio::test]
async fn oppo_reports_missing_modules_and_moves_the_icon() {
    let env = Env::new();
    let source = env.source().await;
    let store = MemoryStore::<ImagePayload>::new();
    let variant = env
        .adapter()
        .generate("oppo", &source.root, &store)
        .await
        .unwrap();

    assert_eq!(variant.root.frame.x, 1700.0);
    assert_eq!(
        variant.diagnostics,
        vec![Diagnostic::StructuralLookupMiss {
            channel: "oppo".into(),
            module: "header".into(),
            target: "header".into(),
        }]
    );
    let icon = module(&variant.root, "gameInfo").child_named("gameIcon").unwrap();
    assert_eq!(
        (icon.frame.x, icon.frame.y, icon.frame.width, icon.frame.height),
        (40.0, 44.0, 128.0, 128.0)
    );
}

#[tokio::test]
async fn missing_channel_asset_is_skipped_but_other_rewrites_apply() {
    let env = Env::new();
    let source = env.source().await;
    let store = MemoryStore::<ImagePayload>::new();
    let variant = env
        .adapter()
        .generate("huawei", &source.root, &store)
        .await
        .unwrap();

    assert_eq!(
        variant.diagnostics,
        vec![Diagnostic::StructuralLookupMiss {
            channel: "huawei".into(),
            module: "gameInfo".into(),
            target: "huawei/badge".into(),
        }]
    );
    let game = module(&variant.root, "gameInfo");
    assert!(game.find_named("buttonText").is_none());
    assert!(game.find_named("buttonBackground").is_some());
    let heading = module(&variant.root, "rules").child_named("heading").unwrap();
    assert_eq!(text_of(heading), "Event Rules (AppGallery)");
}

#[tokio::test]
async fn resizing_a_module_restacks_and_remeasures() {
    let mut env = Env::new();
    env.registry
        .extend_from_json_str(
            r#"[{ "id": "compact", "rules": {
                "gameInfo": [
                    { "op": "resizeModule", "height": 200 },
                    { "op": "moveNode", "target": "nope", "x": 0, "y": 0 },
                    { "op": "replaceText", "target": "gameIcon", "text": "x" },
                    { "op": "replaceText", "target": "gameName", "text": "A much longer title" }
                ]
            } }]"#,
        )
        .unwrap();
    let source = env.source().await;
    let store = MemoryStore::<ImagePayload>::new();
    let variant = env
        .adapter()
        .generate("compact", &source.root, &store)
        .await
        .unwrap();

    let targets: Vec<&str> = variant
        .diagnostics
        .iter()
        .map(|d| match d {
            Diagnostic::StructuralLookupMiss { target, .. } => target.as_str(),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(targets, vec!["nope", "gameIcon"]);

    let src_body = source.root.child_named(BODY_NAME).unwrap();
    let body = variant.root.child_named(BODY_NAME).unwrap();
    let shrink = 316.0 - 200.0;
    assert_eq!(body.frame.height, src_body.frame.height - shrink);
    assert_eq!(
        module(&variant.root, "rules").frame.y,
        module(&source.root, "rules").frame.y - shrink
    );
    assert_eq!(variant.root.frame.height, body.frame.height);
    // x = slot 3 (after the built-ins)
    assert_eq!(variant.root.frame.x, 4.0 * 850.0);

    let name = module(&variant.root, "gameInfo").child_named("gameName").unwrap();
    assert_eq!(text_of(name), "A much longer title");
    let old = module(&source.root, "gameInfo")
        .child_named("gameName")
        .unwrap();
    assert!(name.frame.width > old.frame.width);
}

#[tokio::test]
async fn minimal_page_has_nothing_to_rewrite() {
    let env = Env::new();
    let source = PrototypeComposer::new(
        &env.host,
        &env.rasterizer,
        &env.broker,
        EngineOptions::default(),
    )
    .build(&Configuration::default())
    .await
    .unwrap();
    let store = MemoryStore::<ImagePayload>::new();
    let variant = env
        .adapter()
        .generate("vivo", &source.root, &store)
        .await
        .unwrap();
    assert_eq!(variant.diagnostics.len(), 2);
    assert_eq!(
        (variant.root.frame.width, variant.root.frame.height),
        (750.0, 1334.0)
    );
}

#[tokio::test]
async fn lookups_after_a_removal_hit_the_intended_node() {
    let mut env = Env::new();
    env.registry
        .extend_from_json_str(
            r#"[{ "id": "slim", "rules": {
                "gameInfo": [
                    { "op": "removeNode", "target": "gameIcon" },
                    { "op": "moveNode", "target": "gameDesc", "x": 40, "y": 300 }
                ]
            } }]"#,
        )
        .unwrap();
    let source = env.source().await;
    let store = MemoryStore::<ImagePayload>::new();
    let variant = env
        .adapter()
        .generate("slim", &source.root, &store)
        .await
        .unwrap();
    assert!(variant.diagnostics.is_empty(), "{:?}", variant.diagnostics);

    let game = module(&variant.root, "gameInfo");
    assert!(game.child_named("gameIcon").is_none());
    let desc = game.child_named("gameDesc").unwrap();
    assert_eq!((desc.frame.x, desc.frame.y), (40.0, 300.0));
    let name = game.child_named("gameName").unwrap();
    let old = module(&source.root, "gameInfo")
        .child_named("gameName")
        .unwrap();
    assert_eq!((name.frame.x, name.frame.y), (old.frame.x, old.frame.y));
}

#[tokio::test]
async fn hand_built_source_without_ids_is_renumbered() {
    use crate::foundation::color::Color;
    use crate::foundation::core::NodeFrame;
    use crate::scene::node::TextStyle;

    let footer = SceneNode::frame("footer", NodeFrame::sized(750.0, 80.0)).with_child(
        SceneNode::text(
            "text",
            "fine print",
            TextStyle::regular(24.0, Color::BLACK),
            NodeFrame::sized(200.0, 34.0),
        ),
    );
    let body = SceneNode::frame(BODY_NAME, NodeFrame::sized(750.0, 80.0)).with_child(footer);
    let source = SceneNode::frame("prototype", NodeFrame::sized(750.0, 80.0)).with_child(body);
    assert!(source.walk().all(|n| n.id == NodeId::default()));

    let env = Env::new();
    let store = MemoryStore::<ImagePayload>::new();
    let variant = env
        .adapter()
        .generate("vivo", &source, &store)
        .await
        .unwrap();

    let footer_text = module(&variant.root, "footer").child_named("text").unwrap();
    assert_eq!(text_of(footer_text), "Available on the vivo App Store");
    let mut ids: Vec<NodeId> = variant.root.walk().map(|n| n.id).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert!(
        variant
            .diagnostics
            .iter()
            .all(|d| matches!(d, Diagnostic::StructuralLookupMiss { module, .. } if module == "gameInfo"))
    );
}
