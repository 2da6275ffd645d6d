use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::{
    assets::fetch::{ImageProvider, sanitize_hint},
    assets::placeholder::synthesize_placeholder_png,
    foundation::error::DeckResult,
};

/// A usable local image asset produced by the acquisition pipeline.
///
/// Ownership transfers to the slide assembler; the backing file lives in the
/// generation's scoped temporary directory and is removed with it.
#[derive(Clone, Debug)]
pub struct ImageAsset {
    /// Path of the decoded-and-validated local file.
    pub local_path: PathBuf,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl ImageAsset {
    /// Width/height ratio; used to preserve the source aspect in layout.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }

    /// File extension of the stored asset.
    pub fn extension(&self) -> &str {
        self.local_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
    }
}

/// Resolves a text hint into a local [`ImageAsset`] via ordered provider
/// fallback, ending in a synthesized placeholder.
///
/// The pipeline never fails to produce an asset when one is required: remote
/// failures (timeout, non-success status, empty results, bad payloads) only
/// advance it to the next tier.
pub struct ImagePipeline {
    providers: Vec<Box<dyn ImageProvider>>,
    rng: StdRng,
    dir: PathBuf,
}

impl ImagePipeline {
    /// Construct a pipeline writing assets under `dir`, with file naming and
    /// palette selection derived from `seed`.
    pub fn new(dir: impl Into<PathBuf>, seed: u64, providers: Vec<Box<dyn ImageProvider>>) -> Self {
        ImagePipeline {
            providers,
            rng: StdRng::seed_from_u64(seed),
            dir: dir.into(),
        }
    }

    /// Resolve `hint` into a local image asset.
    ///
    /// Only local-disk failures surface as errors; every remote condition is
    /// absorbed by the fallback chain.
    pub fn acquire(&mut self, hint: &str) -> DeckResult<ImageAsset> {
        let query = sanitize_hint(hint);

        for i in 0..self.providers.len() {
            let name = self.providers[i].name();
            match self.providers[i].search(&query) {
                Ok(Some(bytes)) => match self.store(&bytes) {
                    Ok(asset) => {
                        info!(provider = name, query = %query, path = %asset.local_path.display(), "fetched image");
                        return Ok(asset);
                    }
                    Err(e) => {
                        warn!(provider = name, query = %query, error = %e, "discarding undecodable image payload");
                    }
                },
                Ok(None) => {
                    debug!(provider = name, query = %query, "no results");
                }
                Err(e) => {
                    warn!(provider = name, query = %query, error = %e, "provider failed, falling back");
                }
            }
        }

        let png = synthesize_placeholder_png(&query, &mut self.rng)?;
        let path = self.unique_path("placeholder", "png");
        std::fs::write(&path, &png)
            .with_context(|| format!("write placeholder '{}'", path.display()))?;
        let (width, height) = image::load_from_memory(&png)
            .map(|img| (img.width(), img.height()))
            .context("decode synthesized placeholder")?;
        info!(query = %query, path = %path.display(), "synthesized placeholder image");
        Ok(ImageAsset {
            local_path: path,
            width,
            height,
        })
    }

    /// Decode, validate and persist fetched bytes under a fresh unique name.
    fn store(&mut self, bytes: &[u8]) -> anyhow::Result<ImageAsset> {
        let img = image::load_from_memory(bytes).context("decode fetched image")?;
        let (width, height) = (img.width(), img.height());

        let format = image::guess_format(bytes).context("sniff image format")?;
        let path = match format {
            image::ImageFormat::Jpeg => {
                let path = self.unique_path("slideimg", "jpg");
                std::fs::write(&path, bytes)
                    .with_context(|| format!("write image '{}'", path.display()))?;
                path
            }
            image::ImageFormat::Png => {
                let path = self.unique_path("slideimg", "png");
                std::fs::write(&path, bytes)
                    .with_context(|| format!("write image '{}'", path.display()))?;
                path
            }
            // Anything else is normalized to PNG so the output package only
            // ever carries the two content types it declares.
            _ => {
                let path = self.unique_path("slideimg", "png");
                img.save_with_format(&path, image::ImageFormat::Png)
                    .with_context(|| format!("transcode image to '{}'", path.display()))?;
                path
            }
        };

        Ok(ImageAsset {
            local_path: path,
            width,
            height,
        })
    }

    fn unique_path(&mut self, stem: &str, ext: &str) -> PathBuf {
        let tag: u32 = self.rng.r#gen();
        self.dir.join(format!("{stem}_{tag:08x}.{ext}"))
    }

    /// Directory assets are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/acquire.rs"]
mod tests;
