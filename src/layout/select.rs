use crate::descriptor::model::{LayoutPreference, SlideDescriptor};

/// The visual layout chosen for one slide. Derived per slide, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    /// Opening slide: large centered title, optional background image.
    TitleSlide,
    /// Centered title above a single bullets block.
    TitleContent,
    /// Image pane flush to the left border, text pane on the right.
    ImageLeft,
    /// Text pane on the left, image pane flush to the right border.
    ImageRight,
    /// Full-bleed image with a translucent bottom caption strip.
    FullImage,
    /// Centered title above two equal bullet columns.
    TwoColumn,
}

/// Title keywords that mark a slide as introductory regardless of position.
const INTRO_KEYWORDS: [&str; 2] = ["introduction", "overview"];

/// Select a layout for the slide at `index`.
///
/// An explicit (non-`Auto`) preference maps directly to its layout. Under
/// `Auto`, slide 0 and introductory titles become [`LayoutType::TitleSlide`];
/// otherwise image-hint presence takes strict precedence: with a hint, up to
/// five bullets place the image left and more place it right. Without a hint,
/// sparse slides (<= 3 bullets) still get a side-image frame, dense slides
/// (> 5) split into two columns, and the middle band is plain title/content.
///
/// Pure function of its inputs; an empty bullet list is simply zero bullets.
pub fn select_layout(
    descriptor: &SlideDescriptor,
    index: usize,
    preference: LayoutPreference,
) -> LayoutType {
    let effective = descriptor.layout_hint.unwrap_or(preference);
    match effective {
        LayoutPreference::TitleContent => return LayoutType::TitleContent,
        LayoutPreference::ImageLeft => return LayoutType::ImageLeft,
        LayoutPreference::ImageRight => return LayoutType::ImageRight,
        LayoutPreference::FullImage => return LayoutType::FullImage,
        LayoutPreference::TwoColumn => return LayoutType::TwoColumn,
        LayoutPreference::Auto => {}
    }

    let title = descriptor.title.to_lowercase();
    if index == 0 || INTRO_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return LayoutType::TitleSlide;
    }

    let bullets = descriptor.bullets.len();
    if descriptor.image_hint.is_some() {
        if bullets <= 5 {
            return LayoutType::ImageLeft;
        }
        return LayoutType::ImageRight;
    }

    if bullets <= 3 {
        return LayoutType::ImageLeft;
    }
    if bullets > 5 {
        return LayoutType::TwoColumn;
    }
    LayoutType::TitleContent
}

/// Whether the layout places an image when an asset is available.
pub(crate) fn layout_uses_image(layout: LayoutType) -> bool {
    matches!(
        layout,
        LayoutType::TitleSlide
            | LayoutType::ImageLeft
            | LayoutType::ImageRight
            | LayoutType::FullImage
    )
}

#[cfg(test)]
#[path = "../../tests/unit/layout/select.rs"]
mod tests;
