use super::*;

fn level(size: Option<f64>, color: Option<RgbColor>, bold: Option<bool>) -> TextStyle {
    TextStyle {
        size_pt: size,
        color,
        bold,
        font: None,
    }
}

#[test]
fn empty_chain_takes_hardcoded_defaults() {
    let resolved = resolve_style(&[]);
    assert_eq!(resolved.size_pt, DEFAULT_SIZE_PT);
    assert_eq!(resolved.color, RgbColor::BLACK);
    assert!(!resolved.bold);
    assert!(resolved.font.is_none());
}

#[test]
fn more_specific_levels_win() {
    let run = level(Some(24.0), None, None);
    let layout = level(Some(12.0), Some(RgbColor::WHITE), None);
    let resolved = resolve_style(&[run, layout]);
    assert_eq!(resolved.size_pt, 24.0);
    assert_eq!(resolved.color, RgbColor::WHITE);
}

#[test]
fn attributes_resolve_independently() {
    // Size from the shape level, color from the master, bold never declared.
    let run = level(None, None, None);
    let shape = level(Some(20.0), None, None);
    let layout = level(None, None, None);
    let master = level(Some(10.0), Some(RgbColor::new(0x33, 0x33, 0x33)), None);
    let resolved = resolve_style(&[run, shape, layout, master]);
    assert_eq!(resolved.size_pt, 20.0);
    assert_eq!(resolved.color, RgbColor::new(0x33, 0x33, 0x33));
    assert!(!resolved.bold);
}

#[test]
fn explicit_false_bold_is_not_treated_as_absent() {
    let run = level(None, None, Some(false));
    let master = level(None, None, Some(true));
    let resolved = resolve_style(&[run, master]);
    assert!(!resolved.bold);
}

#[test]
fn fonts_carry_through_the_chain() {
    let mut master = level(None, None, None);
    master.font = Some("Georgia".to_string());
    let resolved = resolve_style(&[level(None, None, None), master]);
    assert_eq!(resolved.font.as_deref(), Some("Georgia"));
}

#[test]
fn is_empty_reflects_attribute_presence() {
    assert!(TextStyle::default().is_empty());
    assert!(!level(Some(18.0), None, None).is_empty());
    assert!(!level(None, Some(RgbColor::BLACK), None).is_empty());
}
