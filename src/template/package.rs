use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::{
    foundation::core::{Canvas, RgbColor},
    foundation::error::{DeckError, DeckResult},
    template::style::TextStyle,
};

/// Layout index preferred when the template carries a rich layout set.
///
/// Decks exported from mainstream authoring tools conventionally keep a
/// mostly-blank "content" layout at this position; falling back to index 0
/// otherwise at least inherits the master background.
const PREFERRED_LAYOUT_INDEX: usize = 6;

/// A caller-supplied `.pptx` template, opened read-only.
///
/// Only the parts the engine consumes are parsed up front; raw entries stay
/// in the archive and are streamed out on demand during assembly.
pub struct TemplatePackage {
    /// Location of the package on disk.
    pub path: PathBuf,
    /// Slide canvas declared by `p:sldSz`.
    pub canvas: Canvas,
    /// Number of slides in the package.
    pub slide_count: usize,
    /// Number of slide layouts in the package.
    pub layout_count: usize,
    archive: zip::ZipArchive<File>,
}

impl TemplatePackage {
    /// Open and inspect a template package.
    ///
    /// An unreadable or structurally broken package is an input error; the
    /// engine never silently substitutes a built-in deck for a template the
    /// caller explicitly asked for.
    pub fn open(path: &Path) -> DeckResult<Self> {
        let file = File::open(path)
            .with_context(|| format!("open template '{}'", path.display()))
            .map_err(|e| DeckError::input(format!("{e:#}")))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| DeckError::input(format!("template '{}' is not a zip package: {e}", path.display())))?;

        let presentation = read_archive_entry(&mut archive, "ppt/presentation.xml")
            .map_err(|e| DeckError::input(format!("{e:#}")))?;
        let (cx, cy) = parse_slide_size(&presentation)?;
        let canvas = Canvas::from_emu(cx, cy)?;

        let mut slide_count = 0;
        let mut layout_count = 0;
        for name in archive.file_names() {
            if name.starts_with("ppt/slides/slide") && name.ends_with(".xml") {
                slide_count += 1;
            } else if name.starts_with("ppt/slideLayouts/slideLayout") && name.ends_with(".xml") {
                layout_count += 1;
            }
        }
        if layout_count == 0 {
            return Err(DeckError::input(format!(
                "template '{}' contains no slide layouts",
                path.display()
            )));
        }

        debug!(
            path = %path.display(),
            slides = slide_count,
            layouts = layout_count,
            "opened template package"
        );

        Ok(TemplatePackage {
            path: path.to_path_buf(),
            canvas,
            slide_count,
            layout_count,
            archive,
        })
    }

    /// Zero-based index of the layout new slides attach to.
    pub fn default_layout_index(&self) -> usize {
        if self.layout_count > PREFERRED_LAYOUT_INDEX {
            PREFERRED_LAYOUT_INDEX
        } else {
            0
        }
    }

    /// Archive name of the layout part at `index`.
    pub fn layout_part_name(&self, index: usize) -> String {
        format!("ppt/slideLayouts/slideLayout{}.xml", index + 1)
    }

    /// Names of every entry in the package, in archive order.
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_owned).collect()
    }

    /// Read a raw entry out of the package.
    pub fn read_entry(&mut self, name: &str) -> DeckResult<Vec<u8>> {
        read_archive_entry(&mut self.archive, name).map_err(DeckError::from)
    }

    /// Solid background fill of the default layout, falling back to the first
    /// master, if either declares one.
    pub fn layout_background_fill(&mut self) -> Option<RgbColor> {
        let layout = self.layout_part_name(self.default_layout_index());
        for part in [layout.as_str(), "ppt/slideMasters/slideMaster1.xml"] {
            if let Ok(xml) = read_archive_entry(&mut self.archive, part) {
                if let Some(color) = parse_background_fill(&xml) {
                    return Some(color);
                }
            }
        }
        None
    }

    /// First default run properties found in the default layout or the first
    /// master. Empty when neither declares any.
    pub fn first_text_style(&mut self) -> TextStyle {
        let layout = self.layout_part_name(self.default_layout_index());
        for part in [layout.as_str(), "ppt/slideMasters/slideMaster1.xml"] {
            if let Ok(xml) = read_archive_entry(&mut self.archive, part) {
                if let Some(style) = parse_first_def_rpr(&xml) {
                    return style;
                }
            }
        }
        TextStyle::default()
    }
}

fn read_archive_entry(archive: &mut zip::ZipArchive<File>, name: &str) -> anyhow::Result<Vec<u8>> {
    let mut entry = archive
        .by_name(name)
        .with_context(|| format!("missing package entry '{name}'"))?;
    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut buf)
        .with_context(|| format!("read package entry '{name}'"))?;
    Ok(buf)
}

/// Extract `cx`/`cy` from the `p:sldSz` element of `presentation.xml`.
fn parse_slide_size(xml: &[u8]) -> DeckResult<(i64, i64)> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"p:sldSz" => {
                let cx = attr_i64(&e, b"cx")?;
                let cy = attr_i64(&e, b"cy")?;
                return Ok((cx, cy));
            }
            Ok(Event::Eof) => {
                return Err(DeckError::input("presentation.xml declares no slide size"));
            }
            Ok(_) => {}
            Err(e) => return Err(DeckError::input(format!("malformed presentation.xml: {e}"))),
        }
        buf.clear();
    }
}

fn attr_i64(e: &quick_xml::events::BytesStart<'_>, name: &[u8]) -> DeckResult<i64> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|e| DeckError::input(format!("malformed slide size attribute: {e}")))?
        .ok_or_else(|| {
            DeckError::input(format!(
                "p:sldSz missing '{}' attribute",
                String::from_utf8_lossy(name)
            ))
        })?;
    let text = attr
        .unescape_value()
        .map_err(|e| DeckError::input(format!("malformed slide size attribute: {e}")))?;
    text.parse::<i64>()
        .map_err(|e| DeckError::input(format!("non-numeric slide size '{text}': {e}")))
}

/// First `a:srgbClr` inside the part's `p:bg` element, if any.
fn parse_background_fill(xml: &[u8]) -> Option<RgbColor> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut in_bg = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"p:bg" => in_bg = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"p:bg" => in_bg = false,
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if in_bg && e.name().as_ref() == b"a:srgbClr" =>
            {
                let val = e.try_get_attribute("val").ok().flatten()?;
                let text = val.unescape_value().ok()?;
                return RgbColor::from_hex(&text).ok();
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
        buf.clear();
    }
}

/// First `a:defRPr` carrying a `sz` attribute, with any nested solid fill.
fn parse_first_def_rpr(xml: &[u8]) -> Option<TextStyle> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut current: Option<TextStyle> = None;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:defRPr" => {
                let style = def_rpr_attrs(&e);
                if style.size_pt.is_some() {
                    current = Some(style);
                }
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"a:defRPr" => {
                let style = def_rpr_attrs(&e);
                if style.size_pt.is_some() {
                    return Some(style);
                }
            }
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if current.is_some() && e.name().as_ref() == b"a:srgbClr" =>
            {
                if let Some(style) = current.as_mut() {
                    if style.color.is_none() {
                        style.color = e
                            .try_get_attribute("val")
                            .ok()
                            .flatten()
                            .and_then(|a| a.unescape_value().ok())
                            .and_then(|v| RgbColor::from_hex(&v).ok());
                    }
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"a:defRPr" => {
                if let Some(style) = current.take() {
                    return Some(style);
                }
            }
            Ok(Event::Eof) | Err(_) => return current,
            Ok(_) => {}
        }
        buf.clear();
    }
}

fn def_rpr_attrs(e: &quick_xml::events::BytesStart<'_>) -> TextStyle {
    let mut style = TextStyle::default();
    // sz is expressed in hundredths of a point.
    if let Ok(Some(sz)) = e.try_get_attribute("sz") {
        if let Ok(text) = sz.unescape_value() {
            if let Ok(hundredths) = text.parse::<f64>() {
                style.size_pt = Some(hundredths / 100.0);
            }
        }
    }
    if let Ok(Some(b)) = e.try_get_attribute("b") {
        if let Ok(text) = b.unescape_value() {
            style.bold = Some(text == "1" || text == "true");
        }
    }
    style
}

#[cfg(test)]
#[path = "../../tests/unit/template/package.rs"]
mod tests;
