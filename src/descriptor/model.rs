use crate::foundation::core::RgbColor;

/// Structured description of one slide, supplied by the caller.
///
/// A descriptor is an immutable input consumed exactly once per generated
/// slide. Deserialized from JSON by the CLI and hosting services.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SlideDescriptor {
    /// Slide title text.
    pub title: String,
    /// Ordered bullet lines. Absent or empty is treated as zero bullets.
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Optional search hint for the slide's image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hint: Option<String>,
    /// Two-color theme carried through color resolution.
    #[serde(default)]
    pub theme: Theme,
    /// Optional per-slide layout override; wins over the deck-wide preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_hint: Option<LayoutPreference>,
}

impl SlideDescriptor {
    /// Construct a descriptor with defaults for the optional fields.
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        SlideDescriptor {
            title: title.into(),
            bullets,
            image_hint: None,
            theme: Theme::default(),
            layout_hint: None,
        }
    }
}

/// A primary/secondary color pair, serialized as two hex strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[String; 2]", into = "[String; 2]")]
pub struct Theme {
    /// Primary (brand) color.
    pub primary: RgbColor,
    /// Secondary (contrast) color.
    pub secondary: RgbColor,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            primary: RgbColor::new(0x00, 0x30, 0x87),
            secondary: RgbColor::WHITE,
        }
    }
}

impl TryFrom<[String; 2]> for Theme {
    type Error = String;

    fn try_from(value: [String; 2]) -> Result<Self, Self::Error> {
        Ok(Theme {
            primary: RgbColor::from_hex(&value[0]).map_err(|e| e.to_string())?,
            secondary: RgbColor::from_hex(&value[1]).map_err(|e| e.to_string())?,
        })
    }
}

impl From<Theme> for [String; 2] {
    fn from(value: Theme) -> Self {
        [
            format!("#{}", value.primary.to_hex()),
            format!("#{}", value.secondary.to_hex()),
        ]
    }
}

/// Caller-facing layout preference. `Auto` defers to the per-slide heuristic.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutPreference {
    /// Choose a layout per slide from content volume and image hints.
    #[default]
    Auto,
    /// Centered title above a single bullets block.
    TitleContent,
    /// Image pane on the left, text pane on the right.
    ImageLeft,
    /// Text pane on the left, image pane on the right.
    ImageRight,
    /// Full-bleed image with a bottom caption strip.
    FullImage,
    /// Centered title above two equal bullet columns.
    TwoColumn,
}

#[cfg(test)]
#[path = "../../tests/unit/descriptor/model.rs"]
mod tests;
