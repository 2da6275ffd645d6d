use std::fmt::Write as _;

use anyhow::Context as _;
use quick_xml::escape::escape;
use rand::Rng;

use crate::foundation::{core::RgbColor, error::DeckResult};

/// Placeholder raster dimensions.
const WIDTH: u32 = 800;
/// Placeholder raster dimensions.
const HEIGHT: u32 = 600;
/// Longest caption rendered before truncation.
const MAX_CAPTION: usize = 40;

/// Gradient color pairs the synthesizer picks from. Selection is driven by
/// the injected randomness source so output is reproducible under test.
const PALETTES: [(RgbColor, RgbColor); 4] = [
    // Blue, the original house gradient.
    (RgbColor { r: 41, g: 128, b: 185 }, RgbColor { r: 71, g: 168, b: 205 }),
    // Slate.
    (RgbColor { r: 44, g: 62, b: 80 }, RgbColor { r: 84, g: 110, b: 132 }),
    // Teal.
    (RgbColor { r: 22, g: 160, b: 133 }, RgbColor { r: 62, g: 200, b: 173 }),
    // Plum.
    (RgbColor { r: 108, g: 52, b: 131 }, RgbColor { r: 148, g: 92, b: 171 }),
];

/// Synthesize a placeholder image as PNG bytes: a gradient background with a
/// dot pattern, a border, and the (truncated) hint rendered as a caption.
///
/// Used as the terminal tier of the acquisition pipeline, guaranteeing a
/// valid asset when every remote provider has failed or is unconfigured.
pub fn synthesize_placeholder_png<R: Rng>(caption: &str, rng: &mut R) -> DeckResult<Vec<u8>> {
    let (start, end) = PALETTES[rng.gen_range(0..PALETTES.len())];
    let svg = placeholder_svg(caption, start, end);

    let opts = usvg::Options {
        fontdb: svg_fontdb(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts).context("parse placeholder svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(WIDTH, HEIGHT)
        .context("allocate placeholder pixmap")?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    let png = pixmap.encode_png().context("encode placeholder png")?;
    Ok(png)
}

fn svg_fontdb() -> std::sync::Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    std::sync::Arc::new(db)
}

fn placeholder_svg(caption: &str, start: RgbColor, end: RgbColor) -> String {
    let shown = truncate_caption(caption);
    let caption_esc = escape(shown.as_str());

    let mut svg = String::with_capacity(8 * 1024);
    let _ = write!(
        svg,
        r##"<svg width="{WIDTH}" height="{HEIGHT}" xmlns="http://www.w3.org/2000/svg">"##
    );
    let _ = write!(
        svg,
        r##"<defs><linearGradient id="bg" x1="0" y1="0" x2="0" y2="1">"##
    );
    let _ = write!(
        svg,
        r##"<stop offset="0" stop-color="#{}"/><stop offset="1" stop-color="#{}"/>"##,
        start.to_hex(),
        end.to_hex()
    );
    let _ = write!(
        svg,
        r##"</linearGradient></defs><rect width="{WIDTH}" height="{HEIGHT}" fill="url(#bg)"/>"##
    );

    // Subtle dot pattern on a 50px grid.
    for y in (0..HEIGHT).step_by(50) {
        for x in (0..WIDTH).step_by(50) {
            let _ = write!(
                svg,
                r##"<circle cx="{x}" cy="{y}" r="1.5" fill="#FFFFFF" fill-opacity="0.12"/>"##
            );
        }
    }

    let _ = write!(
        svg,
        r##"<rect x="2.5" y="2.5" width="{}" height="{}" fill="none" stroke="#FFFFFF" stroke-width="5"/>"##,
        WIDTH - 5,
        HEIGHT - 5
    );
    // Icon disc above the caption.
    let _ = write!(
        svg,
        r##"<circle cx="{}" cy="{}" r="40" fill="#FFFFFF" fill-opacity="0.2" stroke="#FFFFFF" stroke-width="3"/>"##,
        WIDTH / 2,
        HEIGHT / 2 - 60
    );

    let _ = write!(
        svg,
        r##"<text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="28" fill="#FFFFFF">{caption_esc}</text>"##,
        WIDTH / 2,
        HEIGHT / 2 + 60
    );
    let _ = write!(
        svg,
        r##"<text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="18" fill="#FFFFFF" fill-opacity="0.6">Image Placeholder</text>"##,
        WIDTH / 2,
        HEIGHT / 2 + 100
    );
    svg.push_str("</svg>");
    svg
}

fn truncate_caption(caption: &str) -> String {
    if caption.chars().count() <= MAX_CAPTION {
        return caption.to_string();
    }
    let head: String = caption.chars().take(MAX_CAPTION).collect();
    format!("{head}...")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/placeholder.rs"]
mod tests;
