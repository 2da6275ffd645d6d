use crate::foundation::core::RgbColor;

/// Hardcoded terminal default applied when no level of the inheritance chain
/// answers for an attribute.
pub const DEFAULT_SIZE_PT: f64 = 18.0;

/// Partial text formatting as declared at one level of the PPTX style
/// inheritance chain. Every attribute is independently optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size_pt: Option<f64>,
    /// Solid font color.
    pub color: Option<RgbColor>,
    /// Bold weight.
    pub bold: Option<bool>,
    /// Typeface name.
    pub font: Option<String>,
}

impl TextStyle {
    /// True when no attribute is set at this level.
    pub fn is_empty(&self) -> bool {
        self.size_pt.is_none() && self.color.is_none() && self.bold.is_none() && self.font.is_none()
    }
}

/// Fully resolved formatting with every attribute decided.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTextStyle {
    /// Font size in points.
    pub size_pt: f64,
    /// Solid font color.
    pub color: RgbColor,
    /// Bold weight.
    pub bold: bool,
    /// Typeface name, when some chain level declared one.
    pub font: Option<String>,
}

impl Default for ResolvedTextStyle {
    fn default() -> Self {
        ResolvedTextStyle {
            size_pt: DEFAULT_SIZE_PT,
            color: RgbColor::BLACK,
            bold: false,
            font: None,
        }
    }
}

/// Walk the inheritance chain from most to least specific and take, per
/// attribute, the first explicit value found.
///
/// Callers order `chain` as run, shape, layout, master; a `None` at one level
/// defers to the next rather than resetting the attribute.
pub fn resolve_style(chain: &[TextStyle]) -> ResolvedTextStyle {
    let mut resolved = ResolvedTextStyle::default();
    let mut size = None;
    let mut color = None;
    let mut bold = None;
    let mut font = None;
    for level in chain {
        size = size.or(level.size_pt);
        color = color.or(level.color);
        bold = bold.or(level.bold);
        font = font.clone().or_else(|| level.font.clone());
    }
    if let Some(size_pt) = size {
        resolved.size_pt = size_pt;
    }
    if let Some(c) = color {
        resolved.color = c;
    }
    if let Some(b) = bold {
        resolved.bold = b;
    }
    resolved.font = font;
    resolved
}

#[cfg(test)]
#[path = "../../tests/unit/template/style.rs"]
mod tests;
