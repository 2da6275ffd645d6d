//! Single-shot `.pptx` writer.
//!
//! The writer consumes a fully composed [`Deck`] and produces the output
//! package in one pass. Two routes exist, picked by the deck's background
//! strategy: a scratch package built from minimal parts, or an entry-by-entry
//! rewrite of the source template that drops its slides, patches the
//! presentation part and relationships, and appends the generated slides
//! attached to a template layout.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;

use crate::{
    deck::model::{BackgroundStrategy, ComposedSlide, Deck, Paragraph, Shape, TextAlign},
    foundation::core::Region,
    foundation::error::{DeckError, DeckResult},
    template::package::TemplatePackage,
};

const SLIDE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const LAYOUT_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const IMAGE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const MASTER_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const THEME_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

/// Write `deck` to `out_path`.
///
/// Saving is the pipeline's only output mutation; any failure removes the
/// partial file so a broken package never survives on disk.
pub fn save_deck(
    deck: &Deck,
    template: Option<&mut TemplatePackage>,
    out_path: &Path,
) -> DeckResult<()> {
    let result = write_package(deck, template, out_path);
    if result.is_err() {
        let _ = std::fs::remove_file(out_path);
    }
    result.map_err(|e| DeckError::persistence(format!("{e:#}")))
}

fn write_package(
    deck: &Deck,
    template: Option<&mut TemplatePackage>,
    out_path: &Path,
) -> anyhow::Result<()> {
    let file = File::create(out_path)
        .with_context(|| format!("create output '{}'", out_path.display()))?;
    let mut zip = zip::ZipWriter::new(file);

    match (&deck.background, template) {
        (BackgroundStrategy::NativeLayoutReuse { layout_index }, Some(tpl)) => {
            write_from_template(&mut zip, deck, tpl, *layout_index)?;
        }
        _ => write_scratch(&mut zip, deck)?,
    }

    zip.finish().context("finalize output package")?;
    info!(path = %out_path.display(), slides = deck.slides.len(), "deck saved");
    Ok(())
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}

fn put_entry(zip: &mut zip::ZipWriter<File>, name: &str, bytes: &[u8]) -> anyhow::Result<()> {
    zip.start_file(name, entry_options())
        .with_context(|| format!("start package entry '{name}'"))?;
    zip.write_all(bytes)
        .with_context(|| format!("write package entry '{name}'"))?;
    Ok(())
}

/// Media queued for the package, de-duplicated by source path so a background
/// screenshot referenced by every slide is stored once.
#[derive(Default)]
struct MediaRegistry {
    sources: Vec<PathBuf>,
    by_source: HashMap<PathBuf, usize>,
}

impl MediaRegistry {
    fn register(&mut self, source: &Path) -> usize {
        if let Some(&idx) = self.by_source.get(source) {
            return idx;
        }
        let idx = self.sources.len();
        self.sources.push(source.to_path_buf());
        self.by_source.insert(source.to_path_buf(), idx);
        idx
    }

    fn part_name(&self, idx: usize) -> String {
        format!("ppt/media/dwimage{}.{}", idx + 1, self.extension(idx))
    }

    fn extension(&self, idx: usize) -> &'static str {
        match self.sources[idx].extension().and_then(|e| e.to_str()) {
            Some("jpg") | Some("jpeg") => "jpg",
            _ => "png",
        }
    }

    fn write_all(&self, zip: &mut zip::ZipWriter<File>) -> anyhow::Result<()> {
        for (idx, source) in self.sources.iter().enumerate() {
            let bytes = std::fs::read(source)
                .with_context(|| format!("read media '{}'", source.display()))?;
            put_entry(zip, &self.part_name(idx), &bytes)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scratch package
// ---------------------------------------------------------------------------

fn write_scratch(zip: &mut zip::ZipWriter<File>, deck: &Deck) -> anyhow::Result<()> {
    let n = deck.slides.len();

    let mut content_types = String::from(XML_DECL);
    content_types.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Default Extension=\"png\" ContentType=\"image/png\"/>\
         <Default Extension=\"jpg\" ContentType=\"image/jpeg\"/>\
         <Default Extension=\"jpeg\" ContentType=\"image/jpeg\"/>\
         <Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
         <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
         <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
         <Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>",
    );
    for i in 1..=n {
        content_types.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{i}.xml\" ContentType=\"{SLIDE_CONTENT_TYPE}\"/>"
        ));
    }
    content_types.push_str("</Types>");
    put_entry(zip, "[Content_Types].xml", content_types.as_bytes())?;

    let root_rels = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"ppt/presentation.xml\"/>\
         </Relationships>"
    );
    put_entry(zip, "_rels/.rels", root_rels.as_bytes())?;

    let mut presentation = format!(
        "{XML_DECL}<p:presentation xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst><p:sldIdLst>"
    );
    for i in 0..n {
        presentation.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            256 + i,
            i + 2
        ));
    }
    presentation.push_str(&format!(
        "</p:sldIdLst><p:sldSz cx=\"{}\" cy=\"{}\"/>\
         <p:notesSz cx=\"6858000\" cy=\"9144000\"/></p:presentation>",
        deck.canvas.width.0, deck.canvas.height.0
    ));
    put_entry(zip, "ppt/presentation.xml", presentation.as_bytes())?;

    let mut pres_rels = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{MASTER_REL_TYPE}\" Target=\"slideMasters/slideMaster1.xml\"/>"
    );
    for i in 0..n {
        pres_rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{SLIDE_REL_TYPE}\" Target=\"slides/slide{}.xml\"/>",
            i + 2,
            i + 1
        ));
    }
    pres_rels.push_str("</Relationships>");
    put_entry(zip, "ppt/_rels/presentation.xml.rels", pres_rels.as_bytes())?;

    put_entry(zip, "ppt/slideMasters/slideMaster1.xml", MASTER_XML.as_bytes())?;
    let master_rels = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{LAYOUT_REL_TYPE}\" Target=\"../slideLayouts/slideLayout1.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{THEME_REL_TYPE}\" Target=\"../theme/theme1.xml\"/>\
         </Relationships>"
    );
    put_entry(zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", master_rels.as_bytes())?;

    put_entry(zip, "ppt/slideLayouts/slideLayout1.xml", LAYOUT_XML.as_bytes())?;
    let layout_rels = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{MASTER_REL_TYPE}\" Target=\"../slideMasters/slideMaster1.xml\"/>\
         </Relationships>"
    );
    put_entry(zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", layout_rels.as_bytes())?;

    put_entry(zip, "ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

    let mut media = MediaRegistry::default();
    write_slides(zip, deck, &mut media, "../slideLayouts/slideLayout1.xml")?;
    media.write_all(zip)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Template rewrite
// ---------------------------------------------------------------------------

fn write_from_template(
    zip: &mut zip::ZipWriter<File>,
    deck: &Deck,
    tpl: &mut TemplatePackage,
    layout_index: usize,
) -> anyhow::Result<()> {
    let names = tpl.entry_names();

    let rels_src = tpl
        .read_entry("ppt/_rels/presentation.xml.rels")
        .map_err(anyhow::Error::new)?;
    let (patched_rels, slide_rids) = patch_presentation_rels(&rels_src, deck.slides.len())?;

    let pres_src = tpl
        .read_entry("ppt/presentation.xml")
        .map_err(anyhow::Error::new)?;
    let patched_pres = patch_slide_id_list(&pres_src, &slide_rids)?;

    let ct_src = tpl
        .read_entry("[Content_Types].xml")
        .map_err(anyhow::Error::new)?;
    let patched_ct = patch_content_types(&ct_src, deck.slides.len())?;

    for name in &names {
        // Notes parts go with the slides they annotate; their rels target
        // ../slides/slideN.xml, which no longer names the same content.
        if name.starts_with("ppt/slides/")
            || name.starts_with("ppt/notesSlides/")
            || name.ends_with('/')
        {
            continue;
        }
        match name.as_str() {
            "[Content_Types].xml" => put_entry(zip, name, &patched_ct)?,
            "ppt/presentation.xml" => put_entry(zip, name, &patched_pres)?,
            "ppt/_rels/presentation.xml.rels" => put_entry(zip, name, &patched_rels)?,
            _ => {
                let bytes = tpl.read_entry(name).map_err(anyhow::Error::new)?;
                put_entry(zip, name, &bytes)?;
            }
        }
    }

    let layout_target = format!("../slideLayouts/slideLayout{}.xml", layout_index + 1);
    let mut media = MediaRegistry::default();
    write_slides(zip, deck, &mut media, &layout_target)?;
    media.write_all(zip)?;
    debug!(layout_index, "rewrote template package");
    Ok(())
}

/// Drop the template's slide relationships, keep everything else, and append
/// fresh slide relationships numbered past the highest surviving id.
fn patch_presentation_rels(src: &[u8], slides: usize) -> anyhow::Result<(Vec<u8>, Vec<String>)> {
    let mut reader = Reader::from_reader(src);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut buf = Vec::new();
    let mut max_rid: u32 = 0;
    loop {
        let event = reader.read_event_into(&mut buf).context("parse presentation rels")?;
        match event {
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"Relationship" => {
                let mut is_slide = false;
                for attr in e.attributes().flatten() {
                    let value = attr.unescape_value().unwrap_or_default();
                    match attr.key.as_ref() {
                        b"Type" if value.ends_with("/slide") => is_slide = true,
                        b"Id" => {
                            if let Some(n) = value.strip_prefix("rId").and_then(|n| n.parse().ok())
                            {
                                max_rid = max_rid.max(n);
                            }
                        }
                        _ => {}
                    }
                }
                if !is_slide {
                    writer.write_event(event.borrow()).context("emit rels")?;
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"Relationships" => {
                let mut rids = Vec::with_capacity(slides);
                for i in 0..slides {
                    let rid = format!("rId{}", max_rid + 1 + i as u32);
                    let mut rel = BytesStart::new("Relationship");
                    rel.push_attribute(("Id", rid.as_str()));
                    rel.push_attribute(("Type", SLIDE_REL_TYPE));
                    rel.push_attribute(("Target", format!("slides/slide{}.xml", i + 1).as_str()));
                    writer.write_event(Event::Empty(rel)).context("emit slide rel")?;
                    rids.push(rid);
                }
                writer.write_event(event).context("emit rels")?;
                return Ok((writer.into_inner().into_inner(), rids));
            }
            Event::Eof => anyhow::bail!("presentation rels missing Relationships element"),
            other => writer.write_event(other).context("emit rels")?,
        }
        buf.clear();
    }
}

/// Replace the contents of `p:sldIdLst` with the generated slide ids.
fn patch_slide_id_list(src: &[u8], slide_rids: &[String]) -> anyhow::Result<Vec<u8>> {
    let mut reader = Reader::from_reader(src);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut buf = Vec::new();
    let mut skipping = false;
    let mut injected = false;
    loop {
        let event = reader.read_event_into(&mut buf).context("parse presentation.xml")?;
        match event {
            Event::Start(ref e) if e.name().as_ref() == b"p:sldIdLst" => {
                write_slide_id_list(&mut writer, slide_rids)?;
                injected = true;
                skipping = true;
            }
            Event::Empty(ref e) if e.name().as_ref() == b"p:sldIdLst" => {
                write_slide_id_list(&mut writer, slide_rids)?;
                injected = true;
            }
            Event::End(ref e) if e.name().as_ref() == b"p:sldIdLst" => {
                skipping = false;
            }
            Event::Eof => return Ok(writer.into_inner().into_inner()),
            other if !skipping => {
                // Slideless templates carry no p:sldIdLst at all; the list
                // must precede p:sldSz in the part's element order.
                if !injected {
                    if let Event::Start(e) | Event::Empty(e) = &other {
                        if e.name().as_ref() == b"p:sldSz" {
                            write_slide_id_list(&mut writer, slide_rids)?;
                            injected = true;
                        }
                    }
                }
                writer.write_event(other).context("emit presentation.xml")?;
            }
            _ => {}
        }
        buf.clear();
    }
}

fn write_slide_id_list(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    slide_rids: &[String],
) -> anyhow::Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("p:sldIdLst")))
        .context("emit sldIdLst")?;
    for (i, rid) in slide_rids.iter().enumerate() {
        let mut id = BytesStart::new("p:sldId");
        id.push_attribute(("id", (256 + i).to_string().as_str()));
        id.push_attribute(("r:id", rid.as_str()));
        writer.write_event(Event::Empty(id)).context("emit sldId")?;
    }
    writer
        .write_event(Event::End(quick_xml::events::BytesEnd::new("p:sldIdLst")))
        .context("emit sldIdLst")?;
    Ok(())
}

/// Drop the template's slide and notes-slide overrides and register ours,
/// topping up the image defaults the generated media relies on.
fn patch_content_types(src: &[u8], slides: usize) -> anyhow::Result<Vec<u8>> {
    let mut reader = Reader::from_reader(src);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut buf = Vec::new();
    let mut have_png = false;
    let mut have_jpg = false;
    loop {
        let event = reader.read_event_into(&mut buf).context("parse content types")?;
        match event {
            Event::Empty(ref e) if e.name().as_ref() == b"Default" => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"Extension" {
                        match attr.unescape_value().unwrap_or_default().as_ref() {
                            "png" => have_png = true,
                            "jpg" => have_jpg = true,
                            _ => {}
                        }
                    }
                }
                writer.write_event(event.borrow()).context("emit content types")?;
            }
            Event::Empty(ref e) if e.name().as_ref() == b"Override" => {
                let mut dropped = false;
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"PartName" {
                        let part = attr.unescape_value().unwrap_or_default();
                        if part.starts_with("/ppt/slides/")
                            || part.starts_with("/ppt/notesSlides/")
                        {
                            dropped = true;
                        }
                    }
                }
                if !dropped {
                    writer.write_event(event.borrow()).context("emit content types")?;
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"Types" => {
                if !have_png {
                    let mut d = BytesStart::new("Default");
                    d.push_attribute(("Extension", "png"));
                    d.push_attribute(("ContentType", "image/png"));
                    writer.write_event(Event::Empty(d)).context("emit content types")?;
                }
                if !have_jpg {
                    let mut d = BytesStart::new("Default");
                    d.push_attribute(("Extension", "jpg"));
                    d.push_attribute(("ContentType", "image/jpeg"));
                    writer.write_event(Event::Empty(d)).context("emit content types")?;
                }
                for i in 1..=slides {
                    let mut o = BytesStart::new("Override");
                    o.push_attribute(("PartName", format!("/ppt/slides/slide{i}.xml").as_str()));
                    o.push_attribute(("ContentType", SLIDE_CONTENT_TYPE));
                    writer.write_event(Event::Empty(o)).context("emit content types")?;
                }
                writer.write_event(event).context("emit content types")?;
            }
            Event::Eof => return Ok(writer.into_inner().into_inner()),
            other => writer.write_event(other).context("emit content types")?,
        }
        buf.clear();
    }
}

// ---------------------------------------------------------------------------
// Slide parts
// ---------------------------------------------------------------------------

fn write_slides(
    zip: &mut zip::ZipWriter<File>,
    deck: &Deck,
    media: &mut MediaRegistry,
    layout_target: &str,
) -> anyhow::Result<()> {
    for (i, slide) in deck.slides.iter().enumerate() {
        let mut picture_rids = Vec::new();
        let mut rels = format!(
            "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" Type=\"{LAYOUT_REL_TYPE}\" Target=\"{layout_target}\"/>"
        );
        for shape in &slide.shapes {
            if let Shape::Picture { path, .. } = shape {
                let idx = media.register(path);
                let rid = format!("rId{}", picture_rids.len() + 2);
                rels.push_str(&format!(
                    "<Relationship Id=\"{rid}\" Type=\"{IMAGE_REL_TYPE}\" Target=\"../media/dwimage{}.{}\"/>",
                    idx + 1,
                    media.extension(idx)
                ));
                picture_rids.push(rid);
            }
        }
        rels.push_str("</Relationships>");

        let xml = slide_xml(slide, &picture_rids);
        put_entry(zip, &format!("ppt/slides/slide{}.xml", i + 1), xml.as_bytes())?;
        put_entry(
            zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
            rels.as_bytes(),
        )?;
    }
    Ok(())
}

fn slide_xml(slide: &ComposedSlide, picture_rids: &[String]) -> String {
    let mut xml = format!(
        "{XML_DECL}<p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
         <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>"
    );

    let mut shape_id = 2u32;
    let mut picture_no = 0usize;
    for shape in &slide.shapes {
        match shape {
            Shape::TextBox { region, frame } => {
                xml.push_str(&text_box_xml(shape_id, *region, frame));
            }
            Shape::Picture { region, .. } => {
                xml.push_str(&picture_xml(shape_id, *region, &picture_rids[picture_no]));
                picture_no += 1;
            }
            Shape::FilledRect {
                region,
                fill,
                opacity,
            } => {
                let alpha = (opacity.clamp(0.0, 1.0) * 100_000.0).round() as i64;
                xml.push_str(&format!(
                    "<p:sp><p:nvSpPr><p:cNvPr id=\"{shape_id}\" name=\"Rectangle {shape_id}\"/>\
                     <p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{}\
                     <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>\
                     <a:solidFill><a:srgbClr val=\"{}\"><a:alpha val=\"{alpha}\"/></a:srgbClr></a:solidFill>\
                     <a:ln><a:noFill/></a:ln></p:spPr>\
                     <p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody></p:sp>",
                    xfrm_xml(*region),
                    fill.to_hex()
                ));
            }
        }
        shape_id += 1;
    }

    xml.push_str(
        "</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
    );
    xml
}

fn xfrm_xml(region: Region) -> String {
    format!(
        "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        region.left.0, region.top.0, region.width.0, region.height.0
    )
}

fn text_box_xml(id: u32, region: Region, frame: &crate::deck::model::TextFrame) -> String {
    let mut xml = format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"TextBox {id}\"/>\
         <p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr>{}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>\
         <p:txBody><a:bodyPr wrap=\"square\" rtlCol=\"0\"><a:normAutofit/></a:bodyPr><a:lstStyle/>",
        xfrm_xml(region)
    );
    for paragraph in &frame.paragraphs {
        xml.push_str(&paragraph_xml(paragraph));
    }
    if frame.paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    xml.push_str("</p:txBody></p:sp>");
    xml
}

fn paragraph_xml(p: &Paragraph) -> String {
    let algn = match p.align {
        TextAlign::Left => "",
        TextAlign::Center => " algn=\"ctr\"",
        TextAlign::Right => " algn=\"r\"",
    };
    let bullet = if p.bullet {
        "<a:buFont typeface=\"Arial\"/><a:buChar char=\"\u{2022}\"/>"
    } else {
        "<a:buNone/>"
    };
    let bold = if p.bold { " b=\"1\"" } else { "" };
    let latin = match &p.font {
        Some(face) => format!("<a:latin typeface=\"{}\"/>", escape(face.as_str())),
        None => String::new(),
    };
    // sz takes hundredths of a point.
    format!(
        "<a:p><a:pPr{algn}>{bullet}</a:pPr>\
         <a:r><a:rPr lang=\"en-US\" sz=\"{}\"{bold} dirty=\"0\">\
         <a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>{latin}</a:rPr>\
         <a:t>{}</a:t></a:r></a:p>",
        (p.size_pt * 100.0).round() as i64,
        p.color.to_hex(),
        escape(p.text.as_str())
    )
}

fn picture_xml(id: u32, region: Region, rid: &str) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Picture {id}\"/>\
         <p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"{rid}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
         <p:spPr>{}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>",
        xfrm_xml(region)
    )
}

// ---------------------------------------------------------------------------
// Minimal built-in parts for the scratch route
// ---------------------------------------------------------------------------

const MASTER_XML: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
    "<p:sldMaster xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" ",
    "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" ",
    "xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">",
    "<p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"FFFFFF\"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>",
    "<p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>",
    "<p:grpSpPr/></p:spTree></p:cSld>",
    "<p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" ",
    "accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>",
    "<p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>",
    "</p:sldMaster>"
);

const LAYOUT_XML: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
    "<p:sldLayout xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" ",
    "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" ",
    "xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">",
    "<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>",
    "<p:grpSpPr/></p:spTree></p:cSld>",
    "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
);

const THEME_XML: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
    "<a:theme xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"Deckwright\">",
    "<a:themeElements><a:clrScheme name=\"Deckwright\">",
    "<a:dk1><a:srgbClr val=\"000000\"/></a:dk1><a:lt1><a:srgbClr val=\"FFFFFF\"/></a:lt1>",
    "<a:dk2><a:srgbClr val=\"1F3864\"/></a:dk2><a:lt2><a:srgbClr val=\"EEECE1\"/></a:lt2>",
    "<a:accent1><a:srgbClr val=\"003087\"/></a:accent1><a:accent2><a:srgbClr val=\"2980B9\"/></a:accent2>",
    "<a:accent3><a:srgbClr val=\"16A085\"/></a:accent3><a:accent4><a:srgbClr val=\"8E44AD\"/></a:accent4>",
    "<a:accent5><a:srgbClr val=\"2C3E50\"/></a:accent5><a:accent6><a:srgbClr val=\"C0392B\"/></a:accent6>",
    "<a:hlink><a:srgbClr val=\"0563C1\"/></a:hlink><a:folHlink><a:srgbClr val=\"954F72\"/></a:folHlink>",
    "</a:clrScheme>",
    "<a:fontScheme name=\"Deckwright\">",
    "<a:majorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>",
    "<a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>",
    "</a:fontScheme>",
    "<a:fmtScheme name=\"Deckwright\">",
    "<a:fillStyleLst><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:fillStyleLst>",
    "<a:lnStyleLst><a:ln w=\"6350\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>",
    "<a:ln w=\"12700\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>",
    "<a:ln w=\"19050\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln></a:lnStyleLst>",
    "<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>",
    "<a:bgFillStyleLst><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:bgFillStyleLst>",
    "</a:fmtScheme></a:themeElements></a:theme>"
);

#[cfg(test)]
#[path = "../../tests/unit/deck/pptx.rs"]
mod tests;
