use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use tracing::{info, info_span, warn};

use crate::{
    assets::acquire::{ImageAsset, ImagePipeline},
    assets::fetch::{ImageProvider, PexelsProvider, UnsplashProvider},
    color::contrast::{BackgroundSignal, resolve_text_color},
    deck::model::{
        BackgroundStrategy, ComposedSlide, Deck, Paragraph, Shape, TextAlign, TextFrame,
    },
    deck::pptx::save_deck,
    descriptor::model::{LayoutPreference, SlideDescriptor},
    foundation::core::{Canvas, Region, RgbColor},
    foundation::error::{DeckError, DeckResult},
    layout::geometry::{SlideGeometry, layout_regions, split_columns},
    layout::select::{LayoutType, layout_uses_image, select_layout},
    template::package::TemplatePackage,
    template::project::establish_background,
    template::raster::{RasterBackend, SlideRasterizer},
    template::style::resolve_style,
};

/// Opacity of the dark caption strip and of the title-slide scrim.
const SCRIM_OPACITY: f64 = 0.3;

/// Engine configuration. Everything external is bounded here: provider
/// credentials, per-call timeouts, the output directory and the seed that
/// drives all randomness of a generation.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Unsplash access key; `None` leaves the provider unconfigured.
    pub unsplash_key: Option<String>,
    /// Pexels API key; `None` leaves the provider unconfigured.
    pub pexels_key: Option<String>,
    /// Timeout for provider search calls.
    pub request_timeout: Duration,
    /// Timeout for image downloads.
    pub download_timeout: Duration,
    /// Timeout for the external slide converter.
    pub raster_timeout: Duration,
    /// Directory the finished `.pptx` lands in.
    pub output_dir: PathBuf,
    /// Seed for file naming and placeholder palettes.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            unsplash_key: None,
            pexels_key: None,
            request_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(30),
            raster_timeout: Duration::from_secs(60),
            output_dir: PathBuf::from("."),
            seed: 0,
        }
    }
}

/// Summary of one finished generation.
#[derive(Clone, Debug)]
pub struct GeneratedDeck {
    /// Path of the saved `.pptx`.
    pub path: PathBuf,
    /// Number of slides in the deck.
    pub slide_count: usize,
    /// Background strategy label, for reporting.
    pub background: String,
    /// Layout chosen per slide, in order.
    pub layouts: Vec<LayoutType>,
}

/// The generation engine. One call to [`DeckEngine::generate`] runs the whole
/// pipeline synchronously on the caller's thread.
pub struct DeckEngine {
    config: EngineConfig,
}

impl DeckEngine {
    /// Construct an engine over `config`.
    pub fn new(config: EngineConfig) -> Self {
        DeckEngine { config }
    }

    /// Generate a deck using the configured remote providers.
    pub fn generate(
        &self,
        descriptors: &[SlideDescriptor],
        template: Option<&Path>,
        preference: LayoutPreference,
    ) -> DeckResult<GeneratedDeck> {
        let providers: Vec<Box<dyn ImageProvider>> = vec![
            Box::new(UnsplashProvider::new(
                self.config.unsplash_key.clone(),
                self.config.request_timeout,
                self.config.download_timeout,
            )),
            Box::new(PexelsProvider::new(
                self.config.pexels_key.clone(),
                self.config.request_timeout,
                self.config.download_timeout,
            )),
        ];
        self.generate_with_providers(descriptors, template, preference, providers)
    }

    /// Generate a deck with an explicit provider chain, probing the host for
    /// a slide converter.
    ///
    /// The chain still ends in the synthesized placeholder, so an empty or
    /// all-failing chain degrades rather than fails.
    pub fn generate_with_providers(
        &self,
        descriptors: &[SlideDescriptor],
        template: Option<&Path>,
        preference: LayoutPreference,
        providers: Vec<Box<dyn ImageProvider>>,
    ) -> DeckResult<GeneratedDeck> {
        let backend = if template.is_some() {
            RasterBackend::probe(self.config.raster_timeout)
        } else {
            None
        };
        self.generate_with_rasterizer(
            descriptors,
            template,
            preference,
            providers,
            backend.as_ref().map(|b| b as &dyn SlideRasterizer),
        )
    }

    /// Generate a deck with both capabilities injected: the provider chain
    /// and the rasterization seam. `None` is the typed no-capability state
    /// and downgrades the background to native layout reuse.
    pub fn generate_with_rasterizer(
        &self,
        descriptors: &[SlideDescriptor],
        template: Option<&Path>,
        preference: LayoutPreference,
        providers: Vec<Box<dyn ImageProvider>>,
        rasterizer: Option<&dyn SlideRasterizer>,
    ) -> DeckResult<GeneratedDeck> {
        if descriptors.is_empty() {
            return Err(DeckError::input("descriptor list is empty"));
        }

        let mut template = match template {
            Some(path) => Some(TemplatePackage::open(path)?),
            None => None,
        };
        let canvas = template.as_ref().map(|t| t.canvas).unwrap_or_default();

        // Scoped working directory; assets and screenshots vanish with it
        // once the deck is saved.
        let work = tempfile::tempdir()
            .context("create working directory")
            .map_err(|e| DeckError::persistence(format!("{e:#}")))?;

        let strategy = establish_background(template.as_ref(), rasterizer, work.path());

        let inherited_fill = template.as_mut().and_then(|t| t.layout_background_fill());
        let inherited_style = template
            .as_mut()
            .map(|t| resolve_style(&[t.first_text_style()]));
        let base_pt = inherited_style.as_ref().map(|s| s.size_pt);
        let inherited_font = inherited_style.and_then(|s| s.font);

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut pipeline = ImagePipeline::new(work.path(), rng.r#gen(), providers);

        let mut slides = Vec::with_capacity(descriptors.len());
        let mut layouts = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            let span = info_span!("slide", index, title = %descriptor.title);
            let _guard = span.enter();

            let layout = select_layout(descriptor, index, preference);
            match compose_slide(
                descriptor,
                layout,
                canvas,
                &strategy,
                inherited_fill,
                base_pt,
                inherited_font.as_deref(),
                &mut pipeline,
            ) {
                Ok(slide) => {
                    slides.push(slide);
                    layouts.push(layout);
                }
                Err(e) => {
                    warn!(error = %e, "skipping slide");
                }
            }
        }
        if slides.is_empty() {
            return Err(DeckError::assembly("no slide could be composed"));
        }

        let deck = Deck {
            canvas,
            background: strategy,
            slides,
        };

        std::fs::create_dir_all(&self.config.output_dir)
            .with_context(|| {
                format!(
                    "create output directory '{}'",
                    self.config.output_dir.display()
                )
            })
            .map_err(|e| DeckError::persistence(format!("{e:#}")))?;
        let tag: u32 = rng.r#gen();
        let path = self.config.output_dir.join(format!("deck_{tag:08x}.pptx"));

        save_deck(&deck, template.as_mut(), &path)?;
        info!(
            path = %path.display(),
            slides = deck.slides.len(),
            background = deck.background.label(),
            "generation complete"
        );
        Ok(GeneratedDeck {
            path,
            slide_count: deck.slides.len(),
            background: deck.background.label().to_string(),
            layouts,
        })
    }
}

/// Compose one slide: acquire its image if the layout wants one, solve
/// geometry, resolve colors, and place shapes back to front.
///
/// A rasterized-screenshot background is never sampled and never emits a
/// [`BackgroundSignal::FullBleedImage`] of its own: the template's declared
/// layout fill stands in as the color signal, since the screenshot renders
/// that same fill. Only a slide's own full-bleed photo forces the dark
/// classification.
#[allow(clippy::too_many_arguments)]
fn compose_slide(
    descriptor: &SlideDescriptor,
    layout: LayoutType,
    canvas: Canvas,
    strategy: &BackgroundStrategy,
    inherited_fill: Option<RgbColor>,
    base_pt: Option<f64>,
    font: Option<&str>,
    pipeline: &mut ImagePipeline,
) -> DeckResult<ComposedSlide> {
    if descriptor.title.trim().is_empty() && descriptor.bullets.is_empty() {
        return Err(DeckError::assembly("descriptor has no title and no bullets"));
    }

    let asset: Option<ImageAsset> = if layout_uses_image(layout) {
        let hint = descriptor
            .image_hint
            .clone()
            .unwrap_or_else(|| descriptor.title.clone());
        Some(pipeline.acquire(&hint)?)
    } else {
        None
    };

    let geometry = layout_regions(
        layout,
        canvas,
        descriptor.bullets.len(),
        asset.as_ref().map(ImageAsset::aspect_ratio),
        base_pt,
    );

    let full_bleed = matches!(layout, LayoutType::FullImage | LayoutType::TitleSlide)
        && asset.is_some();
    let mut signals = Vec::new();
    if full_bleed {
        signals.push(BackgroundSignal::FullBleedImage);
    }
    if let Some(fill) = inherited_fill {
        signals.push(BackgroundSignal::InheritedFill(fill));
    }
    let decision = resolve_text_color(&signals, descriptor.theme);
    let foreground = decision.foreground;

    let mut shapes = Vec::new();

    if let BackgroundStrategy::RasterizedScreenshot(screenshot) = strategy {
        shapes.push(Shape::Picture {
            region: full_canvas(canvas),
            path: screenshot.clone(),
        });
    }

    if let (Some(asset), Some(region)) = (&asset, geometry.regions.image) {
        shapes.push(Shape::Picture {
            region,
            path: asset.local_path.clone(),
        });
    }

    // Legibility scrims go over the imagery, under the text.
    match layout {
        LayoutType::FullImage => {
            if let Some(strip) = geometry.regions.caption_strip {
                shapes.push(Shape::FilledRect {
                    region: strip,
                    fill: RgbColor::BLACK,
                    opacity: SCRIM_OPACITY,
                });
            }
        }
        LayoutType::TitleSlide if asset.is_some() => {
            shapes.push(Shape::FilledRect {
                region: full_canvas(canvas),
                fill: RgbColor::BLACK,
                opacity: SCRIM_OPACITY,
            });
        }
        _ => {}
    }

    // Caption text over a photo is forced white regardless of any inherited
    // fill underneath the photo.
    let text_color = if full_bleed { RgbColor::WHITE } else { foreground };
    let title_align = match layout {
        LayoutType::TitleSlide
        | LayoutType::TitleContent
        | LayoutType::TwoColumn => TextAlign::Center,
        _ => TextAlign::Left,
    };

    shapes.push(Shape::TextBox {
        region: geometry.regions.title,
        frame: TextFrame {
            paragraphs: vec![Paragraph {
                text: descriptor.title.clone(),
                size_pt: geometry.typography.title_pt,
                color: text_color,
                bold: true,
                align: title_align,
                bullet: false,
                font: font.map(str::to_owned),
            }],
        },
    });

    if !descriptor.bullets.is_empty() {
        match (geometry.regions.body, geometry.regions.body_secondary) {
            (Some(left), Some(right)) => {
                let (first, second) = split_columns(&descriptor.bullets);
                shapes.push(bullet_box(left, first, &geometry, text_color, font));
                if !second.is_empty() {
                    shapes.push(bullet_box(right, second, &geometry, text_color, font));
                }
            }
            (Some(body), None) => {
                shapes.push(bullet_box(body, &descriptor.bullets, &geometry, text_color, font));
            }
            _ => {}
        }
    }

    Ok(ComposedSlide { shapes })
}

fn bullet_box(
    region: Region,
    bullets: &[String],
    geometry: &SlideGeometry,
    color: RgbColor,
    font: Option<&str>,
) -> Shape {
    Shape::TextBox {
        region,
        frame: TextFrame {
            paragraphs: bullets
                .iter()
                .map(|text| Paragraph {
                    text: text.clone(),
                    size_pt: geometry.typography.body_pt,
                    color,
                    bold: false,
                    align: TextAlign::Left,
                    bullet: true,
                    font: font.map(str::to_owned),
                })
                .collect(),
        },
    }
}

fn full_canvas(canvas: Canvas) -> Region {
    Region::new(
        crate::foundation::core::Emu::ZERO,
        crate::foundation::core::Emu::ZERO,
        canvas.width,
        canvas.height,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/deck/assemble.rs"]
mod tests;
