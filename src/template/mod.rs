//! Template inspection and background projection.
//!
//! A template is an ordinary `.pptx` package supplied by the caller. This
//! module reads the pieces the engine cares about (canvas size, layout
//! inventory, inherited text style, layout background fill), rasterizes the
//! template's first slide through an external converter when one is
//! available, and folds both into a [`crate::BackgroundStrategy`].

pub mod package;
pub mod project;
pub mod raster;
pub mod style;
