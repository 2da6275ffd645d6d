use std::path::PathBuf;

use crate::foundation::core::{Canvas, Region, RgbColor};

/// How generated slides inherit the template's visual identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundStrategy {
    /// A full-canvas screenshot of the template's first slide sits behind
    /// every generated slide.
    RasterizedScreenshot(PathBuf),
    /// Generated slides attach to a layout of the source package (or to the
    /// built-in blank layout when no template was supplied).
    NativeLayoutReuse {
        /// Zero-based layout index new slides reference.
        layout_index: usize,
    },
}

impl BackgroundStrategy {
    /// Short label for logs and the generation report.
    pub fn label(&self) -> &'static str {
        match self {
            BackgroundStrategy::RasterizedScreenshot(_) => "rasterized-screenshot",
            BackgroundStrategy::NativeLayoutReuse { .. } => "native-layout-reuse",
        }
    }
}

/// Horizontal paragraph alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Left-aligned (the writer's default, left implicit).
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right-aligned.
    Right,
}

/// One paragraph with fully resolved formatting.
///
/// Formatting is decided during assembly; the writer serializes these values
/// verbatim and never re-derives them.
#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    /// Paragraph text, a single run.
    pub text: String,
    /// Font size in points.
    pub size_pt: f64,
    /// Font color.
    pub color: RgbColor,
    /// Bold weight.
    pub bold: bool,
    /// Alignment.
    pub align: TextAlign,
    /// Whether the paragraph carries a bullet glyph.
    pub bullet: bool,
    /// Explicit typeface, when the template dictated one.
    pub font: Option<String>,
}

/// Paragraphs sharing one text box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextFrame {
    /// Paragraphs in order.
    pub paragraphs: Vec<Paragraph>,
}

/// A placed shape. Every variant is positioned by an absolute [`Region`].
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A borderless, fill-free text box.
    TextBox {
        /// Placement on the canvas.
        region: Region,
        /// Content.
        frame: TextFrame,
    },
    /// A picture stretched to its region.
    Picture {
        /// Placement on the canvas.
        region: Region,
        /// Local file holding PNG or JPEG bytes.
        path: PathBuf,
    },
    /// A borderless solid rectangle, used for legibility scrims.
    FilledRect {
        /// Placement on the canvas.
        region: Region,
        /// Fill color.
        fill: RgbColor,
        /// Fill opacity in `0.0..=1.0`.
        opacity: f64,
    },
}

/// One fully composed slide, in z-order (first shape is rearmost).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComposedSlide {
    /// Shapes back to front.
    pub shapes: Vec<Shape>,
}

/// The complete composed deck, ready for a single save.
#[derive(Clone, Debug, PartialEq)]
pub struct Deck {
    /// Output canvas dimensions.
    pub canvas: Canvas,
    /// Background inheritance decided during projection.
    pub background: BackgroundStrategy,
    /// Slides in presentation order.
    pub slides: Vec<ComposedSlide>,
}
