//! Deckwright is an adaptive slide-deck composition engine.
//!
//! Deckwright turns a list of structured slide descriptors (title, bullets, an
//! optional image hint, a two-color theme) plus an optional visual template
//! into a finished `.pptx` artifact. The engine decides a visual layout per
//! slide, computes non-overlapping regions and font sizes scaled to the target
//! canvas, resolves foreground text color against background luminance, clones
//! or derives a usable background from the template, and acquires one image
//! per slide through a multi-provider fallback chain.
//!
//! # Pipeline overview
//!
//! 1. **Project**: template -> [`BackgroundStrategy`] (rasterized screenshot of
//!    the template's first slide, or reuse of the template's native layouts)
//! 2. **Select**: descriptor + position -> [`LayoutType`]
//! 3. **Solve**: layout + canvas + content volume -> [`SlideGeometry`]
//!    (regions and typography, both bounded)
//! 4. **Acquire**: image hint -> [`ImageAsset`] via provider fallback, ending
//!    in a locally synthesized placeholder (never fails to produce an asset)
//! 5. **Assemble**: shapes placed into regions, accumulated into a [`Deck`],
//!    saved once as the final mutation
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: layout selection, geometry and typography
//!   are pure functions of their inputs; randomness (file naming, placeholder
//!   palette) flows from a single injected seed.
//! - **Degrade, don't fail**: rasterization and image-provider failures are
//!   recovered internally; only input and persistence errors reach the caller.
//! - **Single-threaded and synchronous**: one generation runs start-to-finish
//!   on the caller's thread, with bounded timeouts on every external call.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod color;
mod deck;
mod descriptor;
mod foundation;
mod layout;
mod template;

pub use assets::acquire::{ImageAsset, ImagePipeline};
pub use assets::fetch::{ImageProvider, PexelsProvider, UnsplashProvider, sanitize_hint};
pub use assets::placeholder::synthesize_placeholder_png;
pub use color::contrast::{
    BackgroundSignal, ColorDecision, LuminanceClass, resolve_text_color,
};
pub use deck::assemble::{DeckEngine, EngineConfig, GeneratedDeck};
pub use deck::model::{
    BackgroundStrategy, ComposedSlide, Deck, Paragraph, Shape, TextAlign, TextFrame,
};
pub use deck::pptx::save_deck;
pub use descriptor::model::{LayoutPreference, SlideDescriptor, Theme};
pub use foundation::core::{Canvas, Emu, Region, RgbColor, EMU_PER_INCH};
pub use foundation::error::{DeckError, DeckResult};
pub use layout::geometry::{
    LayoutRegions, SlideGeometry, Typography, layout_regions, split_columns,
};
pub use layout::select::{LayoutType, select_layout};
pub use template::package::TemplatePackage;
pub use template::project::establish_background;
pub use template::raster::{RasterBackend, RasterOutcome, SlideRasterizer};
pub use template::style::{ResolvedTextStyle, TextStyle, resolve_style};
