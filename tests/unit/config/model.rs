use serde_json::json;

use super::*;

#[test]
fn parses_modules_with_type_and_content() {
    let cfg: Configuration = serde_json::from_value(json!({
        "page": { "width": 750, "backgroundColor": "#101010" },
        "modules": [
            { "id": "h", "type": "header", "content": { "titleImage": [1, 2, 3] } },
            { "id": "g", "type": "gameInfo", "title": "Game",
              "content": { "gameName": "Star Quest", "buttonLayout": "inline" } },
            { "id": "r", "type": "rules" }
        ]
    }))
    .unwrap();

    assert_eq!(cfg.modules.len(), 3);
    assert_eq!(cfg.modules[0].kind(), ModuleKind::Header);
    let ModuleContent::GameInfo(g) = &cfg.modules[1].content else {
        panic!("expected game info");
    };
    assert_eq!(g.game_name.as_deref(), Some("Star Quest"));
    assert_eq!(g.button_layout, ButtonLayout::Inline);
    assert_eq!(cfg.modules[1].title, "Game");
    assert_eq!(cfg.modules[2].content, ModuleContent::Rules(RulesContent::default()));
    assert!(cfg.validate().is_ok());
}

#[test]
fn unknown_module_type_is_rejected() {
    let err = Configuration::from_json_str(r#"{"modules":[{"id":"x","type":"carousel"}]}"#);
    assert!(err.is_err());
}

#[test]
fn bad_payload_names_the_module() {
    let err = Configuration::from_json_str(
        r#"{"modules":[{"id":"g1","type":"gameInfo","content":{"gameName":7}}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("g1"));
}

#[test]
fn header_requires_an_image() {
    let subtitle_only = HeaderContent {
        subtitle: Some("hello".to_string()),
        ..Default::default()
    };
    assert!(!subtitle_only.has_content());

    let with_title = HeaderContent {
        title_image: Some(ImagePayload::Bytes(vec![1])),
        ..Default::default()
    };
    assert!(with_title.has_content());
}

#[test]
fn blank_fields_do_not_count_as_content() {
    let rules = RulesContent {
        heading: Some("   ".to_string()),
        lines: vec![String::new(), " ".to_string()],
        ..Default::default()
    };
    assert!(!rules.has_content());

    let game = GameInfoContent {
        button_background: Some(ImagePayload::Bytes(vec![])),
        ..Default::default()
    };
    assert!(!game.has_content());
}

#[test]
fn family_order_groups_custom_modules() {
    assert!(ModuleKind::Header.family() < ModuleKind::GameInfo.family());
    assert_eq!(ModuleKind::NineGrid.family(), ModuleFamily::Custom);
    assert_eq!(ModuleKind::ImageBlock.family(), ModuleFamily::Custom);
    assert!(ModuleKind::Activity.family() < ModuleKind::Rules.family());
    assert!(ModuleKind::Rules.family() < ModuleKind::Footer.family());
}

#[test]
fn module_serializes_back_to_tagged_shape() {
    let m = Module {
        id: "f".to_string(),
        title: String::new(),
        content: ModuleContent::Footer(FooterContent {
            text: Some("(c) 2026".to_string()),
            ..Default::default()
        }),
    };
    let v = serde_json::to_value(&m).unwrap();
    assert_eq!(v["type"], "footer");
    assert_eq!(v["content"]["text"], "(c) 2026");
}

#[test]
fn validate_rejects_bad_width_and_empty_ids() {
    let mut cfg = Configuration::default();
    cfg.page.width = Some(0.0);
    assert!(cfg.validate().is_err());

    let cfg = Configuration::from_json_str(r#"{"modules":[{"id":" ","type":"footer"}]}"#).unwrap();
    assert!(cfg.validate().is_err());
}
