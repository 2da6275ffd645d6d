use crate::{descriptor::model::Theme, foundation::core::RgbColor};

/// Luminance threshold (0..255) above which a background counts as light.
const LIGHT_THRESHOLD: f64 = 150.0;

/// Binary classification of a background's apparent brightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuminanceClass {
    /// Light background; pairs with black text.
    Light,
    /// Dark background; pairs with white text.
    Dark,
}

/// One background signal, in decreasing precedence order as assembled by the
/// caller: an explicit solid fill, then a full-bleed image, then a fill
/// inherited from the slide layout or master.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundSignal {
    /// The slide declares an explicit solid background fill.
    SolidFill(RgbColor),
    /// A full-bleed image (>= 80% of both canvas dimensions) backs the slide.
    ///
    /// Classified dark by policy: this is a structural heuristic, not a pixel
    /// sample of the actual image.
    FullBleedImage,
    /// A solid fill inherited from the slide layout or master.
    InheritedFill(RgbColor),
}

/// The per-slide color decision: a luminance class and a binary foreground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorDecision {
    /// Classified background brightness.
    pub luminance_class: LuminanceClass,
    /// Resolved foreground text color; always pure black or pure white.
    pub foreground: RgbColor,
}

/// Resolve the foreground text color for a slide from its background signals.
///
/// Signals are consulted in order; the first conclusive one wins. Absence of
/// any signal defaults to a light background. The mapping is intentionally
/// binary (black on light, white on dark) to guarantee maximum contrast; the
/// theme pair is accepted for callers that derive signals from it but never
/// produces an intermediate shade.
pub fn resolve_text_color(signals: &[BackgroundSignal], _theme: Theme) -> ColorDecision {
    let class = match signals.first() {
        Some(BackgroundSignal::SolidFill(color)) => classify(*color),
        Some(BackgroundSignal::FullBleedImage) => LuminanceClass::Dark,
        Some(BackgroundSignal::InheritedFill(color)) => classify(*color),
        None => LuminanceClass::Light,
    };
    decision(class)
}

/// Classify a solid color via `0.299R + 0.587G + 0.114B` against 150.
pub fn classify(color: RgbColor) -> LuminanceClass {
    if color.luminance() > LIGHT_THRESHOLD {
        LuminanceClass::Light
    } else {
        LuminanceClass::Dark
    }
}

fn decision(class: LuminanceClass) -> ColorDecision {
    let foreground = match class {
        LuminanceClass::Light => RgbColor::BLACK,
        LuminanceClass::Dark => RgbColor::WHITE,
    };
    ColorDecision {
        luminance_class: class,
        foreground,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/contrast.rs"]
mod tests;
