use super::*;

#[test]
fn helper_constructors_map_to_variants() {
    assert!(matches!(DeckError::input("x"), DeckError::Input(_)));
    assert!(matches!(DeckError::provider("x"), DeckError::Provider(_)));
    assert!(matches!(DeckError::assembly("x"), DeckError::Assembly(_)));
    assert!(matches!(DeckError::persistence("x"), DeckError::Persistence(_)));
}

#[test]
fn display_includes_category() {
    assert_eq!(DeckError::input("missing file").to_string(), "input error: missing file");
    assert_eq!(
        DeckError::persistence("disk full").to_string(),
        "persistence error: disk full"
    );
}

#[test]
fn anyhow_errors_pass_through_transparently() {
    let inner = anyhow::anyhow!("boom");
    let err: DeckError = inner.into();
    assert!(matches!(err, DeckError::Other(_)));
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn question_mark_converts_from_anyhow() {
    fn inner() -> DeckResult<()> {
        Err(anyhow::anyhow!("io"))?;
        Ok(())
    }
    assert!(matches!(inner(), Err(DeckError::Other(_))));
}
