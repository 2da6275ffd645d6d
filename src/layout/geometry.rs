use crate::{
    foundation::core::{Canvas, Emu, Region},
    layout::select::LayoutType,
};

/// Baseline canvas width used for the typography scale factor.
const BASELINE_WIDTH_IN: f64 = 10.0;
/// Baseline canvas height used for the typography scale factor.
const BASELINE_HEIGHT_IN: f64 = 7.5;

/// Fraction of canvas width an image pane may occupy in two-pane layouts.
const IMAGE_PANE_MAX_FRAC: f64 = 0.44;

/// Font sizes chosen for one slide, in points. Always within the component
/// bounds declared by [`layout_regions`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Typography {
    /// Title font size.
    pub title_pt: f64,
    /// Body (bullets) font size.
    pub body_pt: f64,
}

/// Bounding regions computed for one slide.
///
/// `title` and `body`/`body_secondary` are the text regions and never overlap
/// one another. `image` and `caption_strip` are backdrop regions: a full-bleed
/// image or the translucent strip may sit underneath text regions, which are
/// then contained within the strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutRegions {
    /// Title text region.
    pub title: Region,
    /// Primary bullets region, when the layout carries bullets.
    pub body: Option<Region>,
    /// Second bullet column (two-column layout only).
    pub body_secondary: Option<Region>,
    /// Image placement region, when an image asset is available.
    pub image: Option<Region>,
    /// Translucent caption strip (full-image layout only).
    pub caption_strip: Option<Region>,
}

/// Regions plus typography for one slide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideGeometry {
    /// Computed bounding regions.
    pub regions: LayoutRegions,
    /// Computed font sizes.
    pub typography: Typography,
}

/// Compute bounding regions and font sizes for a slide.
///
/// `image_aspect` is the source image's width/height ratio and is preserved
/// exactly in two-pane layouts: the pane is first constrained to the
/// available width (up to 44% of the canvas), then re-constrained by the
/// available height if the width-derived height would overflow. `base_pt`
/// optionally feeds a template-inherited body size into the two-column
/// typography, mirroring how a branded template's own text scale carries
/// through.
///
/// Guarantees: text regions never overlap and all regions lie within the
/// canvas; font sizes lie within their declared bounds. No error conditions;
/// the layout type is a closed enum and inputs are pre-validated.
pub fn layout_regions(
    layout: LayoutType,
    canvas: Canvas,
    bullet_count: usize,
    image_aspect: Option<f64>,
    base_pt: Option<f64>,
) -> SlideGeometry {
    let scale = canvas_scale(canvas);
    let bf = bullet_factor(bullet_count);

    match layout {
        LayoutType::TitleSlide => title_slide(canvas, scale, image_aspect),
        LayoutType::TitleContent => title_content(canvas, scale, bf),
        LayoutType::ImageLeft => side_image(canvas, scale, bf, image_aspect, false),
        LayoutType::ImageRight => side_image(canvas, scale, bf, image_aspect, true),
        LayoutType::TwoColumn => two_column(canvas, scale, bf, base_pt),
        LayoutType::FullImage => full_image(canvas, scale, bf, image_aspect),
    }
}

/// Canvas scale factor relative to the 10 x 7.5 inch baseline, clamped to
/// `[0.7, 1.5]` to prevent runaway sizes on extreme aspect ratios.
fn canvas_scale(canvas: Canvas) -> f64 {
    let ws = canvas.width.to_inches() / BASELINE_WIDTH_IN;
    let hs = canvas.height.to_inches() / BASELINE_HEIGHT_IN;
    ((ws + hs) / 2.0).clamp(0.7, 1.5)
}

/// Body shrink factor for dense slides: more bullets shrink body text, but
/// never below 75% of nominal.
fn bullet_factor(bullet_count: usize) -> f64 {
    if bullet_count == 0 {
        return 1.0;
    }
    (6.0 / (bullet_count.max(3) as f64)).clamp(0.75, 1.0)
}

/// Vertical compression for canvases shorter than the baseline. Fixed-inch
/// vertical metrics shrink with the canvas so regions stay in bounds on
/// short-but-legal slide sizes; canvases at or above the baseline height are
/// unaffected.
fn height_factor(canvas: Canvas) -> f64 {
    (canvas.height.to_inches() / BASELINE_HEIGHT_IN).min(1.0)
}

fn title_slide(canvas: Canvas, scale: f64, image_aspect: Option<f64>) -> SlideGeometry {
    let title = Region::new(
        canvas.width.scaled(0.10),
        canvas.height.scaled(0.267),
        canvas.width.scaled(0.80),
        canvas.height.scaled(0.267),
    );
    // Background image is full-bleed; aspect is not preserved for backdrops.
    let image = image_aspect.map(|_| full_canvas(canvas));
    SlideGeometry {
        regions: LayoutRegions {
            title,
            image,
            ..LayoutRegions::default()
        },
        typography: Typography {
            title_pt: (44.0 * scale).clamp(20.0, 44.0),
            body_pt: (19.0 * scale).clamp(12.0, 28.0),
        },
    }
}

fn title_content(canvas: Canvas, scale: f64, bf: f64) -> SlideGeometry {
    let vh = height_factor(canvas);
    let margin_h = Emu::from_inches(0.7);
    let title = Region::new(
        margin_h,
        Emu::from_inches(0.5 * vh),
        canvas.width - margin_h - margin_h,
        Emu::from_inches(1.6 * vh),
    );

    let content_margin = Emu::from_inches(1.0);
    let remaining_top = title.bottom();
    let remaining_h =
        Emu((canvas.height - remaining_top - Emu::from_inches(0.6 * vh)).0.max(0));
    let content_h = Emu(canvas.height.scaled(0.45).0.min(remaining_h.0));
    let centered_top = remaining_top + Emu((remaining_h - content_h).0.max(0) / 2);
    let body = Region::new(
        content_margin,
        centered_top,
        canvas.width - content_margin - content_margin,
        content_h,
    );

    SlideGeometry {
        regions: LayoutRegions {
            title,
            body: Some(body),
            ..LayoutRegions::default()
        },
        typography: Typography {
            title_pt: (34.0 * scale).clamp(20.0, 44.0),
            body_pt: (19.0 * scale * bf).clamp(12.0, 28.0),
        },
    }
}

/// Shared two-pane math; `flip` mirrors the image pane to the right border.
fn side_image(
    canvas: Canvas,
    scale: f64,
    bf: f64,
    image_aspect: Option<f64>,
    flip: bool,
) -> SlideGeometry {
    let vh = height_factor(canvas);
    let v_margin = Emu::from_inches(0.4 * vh);
    let text_margin = Emu::from_inches(0.4);
    let gap = Emu::from_inches(0.35);

    let pane_max_h = canvas.height - v_margin - v_margin;
    let pane_max_w = canvas.width.scaled(IMAGE_PANE_MAX_FRAC);

    // Width-first fit, then re-constrain by height, preserving aspect exactly.
    let image = image_aspect.map(|aspect| {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            16.0 / 9.0
        };
        let mut w = pane_max_w;
        let mut h = w.scaled(1.0 / aspect);
        if h > pane_max_h {
            h = pane_max_h;
            w = h.scaled(aspect);
        }
        let top = v_margin + Emu((pane_max_h - h).0.max(0) / 2);
        let left = if flip { canvas.width - w } else { Emu::ZERO };
        Region::new(left, top, w, h)
    });

    let image_w = image.map(|r| r.width).unwrap_or(Emu::ZERO);
    let (text_left, text_w) = match (flip, image.is_some()) {
        // Image on the left: text pane starts after the image plus a gap.
        (false, true) => (image_w + gap, canvas.width - image_w - gap - text_margin),
        (false, false) => (
            Emu::from_inches(1.0),
            canvas.width - Emu::from_inches(1.0) - text_margin,
        ),
        // Image on the right: text pane hugs the left margin.
        (true, _) => (
            text_margin,
            canvas.width - text_margin - image_w - gap,
        ),
    };

    let title_h =
        Emu(Emu::from_inches(0.9).0.max(Emu::from_inches(1.2).scaled(scale).0)).scaled(vh);
    let title = Region::new(text_left, v_margin, text_w, title_h);

    let bullets_gap = Emu::from_inches(0.1 * vh);
    let bullets_top = v_margin + title_h + bullets_gap;
    let bullets_h = Emu((pane_max_h - title_h - bullets_gap).0.max(0));
    let body = Region::new(text_left, bullets_top, text_w, bullets_h);

    SlideGeometry {
        regions: LayoutRegions {
            title,
            body: Some(body),
            image,
            ..LayoutRegions::default()
        },
        typography: Typography {
            title_pt: (28.0 * scale).clamp(20.0, 44.0),
            body_pt: (18.0 * scale * bf).clamp(12.0, 28.0),
        },
    }
}

fn two_column(canvas: Canvas, scale: f64, bf: f64, base_pt: Option<f64>) -> SlideGeometry {
    let vh = height_factor(canvas);
    let v_margin = Emu::from_inches(0.2 * vh);
    let title_h = canvas.height.scaled(0.16);
    let title = Region::new(Emu::ZERO, v_margin, canvas.width, title_h);

    // 45% + 10% gap + 45%, identical column widths by construction.
    let columns_top = title.bottom() + Emu::from_inches(0.05 * vh);
    let columns_h = Emu((canvas.height - columns_top - v_margin).0.max(0));
    let col_w = canvas.width.scaled(0.45);
    let left_col = Region::new(Emu::ZERO, columns_top, col_w, columns_h);
    let right_col = Region::new(canvas.width.scaled(0.55), columns_top, col_w, columns_h);

    let base = base_pt.unwrap_or(20.0);
    SlideGeometry {
        regions: LayoutRegions {
            title,
            body: Some(left_col),
            body_secondary: Some(right_col),
            ..LayoutRegions::default()
        },
        typography: Typography {
            title_pt: (base * 1.3 * scale).clamp(20.0, 44.0),
            body_pt: (base * 0.9 * scale * bf).clamp(12.0, 28.0),
        },
    }
}

fn full_image(canvas: Canvas, scale: f64, bf: f64, image_aspect: Option<f64>) -> SlideGeometry {
    let strip_w = canvas.width.scaled(0.84);
    let strip_h = canvas.height.scaled(0.32);
    let strip = Region::new(
        canvas.width.scaled(0.08),
        canvas.height - strip_h - canvas.height.scaled(0.06),
        strip_w,
        strip_h,
    );

    let title_h = strip_h.scaled(0.18);
    let title = Region::new(
        strip.left + strip_w.scaled(0.05),
        strip.top + strip_h.scaled(0.08),
        strip_w.scaled(0.90),
        title_h,
    );

    let bullets_top = title.bottom() + strip_h.scaled(0.08);
    let bullets_h = strip.bottom() - strip_h.scaled(0.06) - bullets_top;
    let body = Region::new(
        strip.left + strip_w.scaled(0.08),
        bullets_top,
        strip_w.scaled(0.84),
        bullets_h,
    );

    SlideGeometry {
        regions: LayoutRegions {
            title,
            body: Some(body),
            image: image_aspect.map(|_| full_canvas(canvas)),
            caption_strip: Some(strip),
            ..LayoutRegions::default()
        },
        // Captions over photos get wider bounds to stay legible.
        typography: Typography {
            title_pt: (36.0 * scale).clamp(18.0, 60.0),
            body_pt: (20.0 * scale * bf).clamp(12.0, 30.0),
        },
    }
}

fn full_canvas(canvas: Canvas) -> Region {
    Region::new(Emu::ZERO, Emu::ZERO, canvas.width, canvas.height)
}

/// Split bullets into two ordered halves for the two-column layout, the first
/// half taking the extra item on odd counts.
pub fn split_columns(bullets: &[String]) -> (&[String], &[String]) {
    let half = bullets.len().div_ceil(2);
    bullets.split_at(half.min(bullets.len()))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
