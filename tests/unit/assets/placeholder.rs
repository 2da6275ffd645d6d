use super::*;
use rand::{SeedableRng as _, rngs::StdRng};

#[test]
fn output_is_decodable_png_at_declared_size() {
    let mut rng = StdRng::seed_from_u64(1);
    let png = synthesize_placeholder_png("mountain lake", &mut rng).unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!(img.width(), WIDTH);
    assert_eq!(img.height(), HEIGHT);
}

#[test]
fn same_seed_yields_identical_bytes() {
    let mut a = StdRng::seed_from_u64(42);
    let mut b = StdRng::seed_from_u64(42);
    let first = synthesize_placeholder_png("city skyline", &mut a).unwrap();
    let second = synthesize_placeholder_png("city skyline", &mut b).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_caption_is_tolerated() {
    let mut rng = StdRng::seed_from_u64(3);
    assert!(synthesize_placeholder_png("", &mut rng).is_ok());
}

#[test]
fn caption_with_markup_is_escaped_into_valid_svg() {
    let mut rng = StdRng::seed_from_u64(4);
    let png = synthesize_placeholder_png("<b>bold & \"risky\"</b>", &mut rng).unwrap();
    assert!(image::load_from_memory(&png).is_ok());
}

#[test]
fn long_captions_are_truncated_with_ellipsis() {
    let long = "a".repeat(80);
    let shown = truncate_caption(&long);
    assert_eq!(shown.chars().count(), MAX_CAPTION + 3);
    assert!(shown.ends_with("..."));
    assert_eq!(truncate_caption("short"), "short");
}

#[test]
fn palette_gradients_are_distinct() {
    for (i, (a_start, a_end)) in PALETTES.iter().enumerate() {
        assert_ne!(a_start, a_end, "palette {i} has no gradient");
        for (b_start, _) in &PALETTES[i + 1..] {
            assert_ne!(a_start, b_start);
        }
    }
}
