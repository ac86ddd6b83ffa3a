use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PromoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PromoError::asset_creation("x")
            .to_string()
            .contains("asset creation error:")
    );
    assert!(
        PromoError::slicing_timeout("x")
            .to_string()
            .contains("slicing timeout:")
    );
    assert!(
        PromoError::assembly("x")
            .to_string()
            .contains("assembly error:")
    );
    assert!(
        PromoError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn only_assembly_is_terminal() {
    assert!(PromoError::assembly("no tiles").is_terminal());
    assert!(!PromoError::rasterization("bad").is_terminal());
    assert!(!PromoError::module_build("bad").is_terminal());
    assert!(!PromoError::asset_creation("bad").is_terminal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PromoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
