use std::path::Path;

use tracing::info;

use crate::{
    deck::model::BackgroundStrategy,
    template::package::TemplatePackage,
    template::raster::{RasterOutcome, SlideRasterizer},
};

/// Decide how generated slides inherit the template's visual identity.
///
/// The preferred route is a rasterized screenshot of the template's first
/// slide stretched full-canvas behind every generated slide; it survives
/// arbitrary template complexity (gradients, pictures, grouped decorations)
/// because it never interprets them. When no converter is available, the
/// template has no slides to photograph, or the conversion fails, the engine
/// downgrades to reattaching the template's own layout parts. Either way the
/// caller gets a usable strategy; downgrades are logged, never surfaced as
/// errors.
pub fn establish_background(
    template: Option<&TemplatePackage>,
    backend: Option<&dyn SlideRasterizer>,
    work_dir: &Path,
) -> BackgroundStrategy {
    let Some(template) = template else {
        return BackgroundStrategy::NativeLayoutReuse { layout_index: 0 };
    };

    let reuse = BackgroundStrategy::NativeLayoutReuse {
        layout_index: template.default_layout_index(),
    };

    if template.slide_count == 0 {
        info!("template has no slides to photograph, reusing native layouts");
        return reuse;
    }
    let Some(backend) = backend else {
        info!("no slide converter on this host, reusing native layouts");
        return reuse;
    };

    match backend.rasterize_first_slide(&template.path, work_dir) {
        RasterOutcome::Screenshot(path) => {
            info!(screenshot = %path.display(), "template background rasterized");
            BackgroundStrategy::RasterizedScreenshot(path)
        }
        RasterOutcome::Unavailable => {
            info!("rasterization unavailable, reusing native layouts");
            reuse
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/project.rs"]
mod tests;
