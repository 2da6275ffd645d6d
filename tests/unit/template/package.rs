use super::*;
use std::io::Write as _;

const PRESENTATION_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#;

const MASTER_XML: &str = r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree/></p:cSld><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="3200" b="1"><a:solidFill><a:srgbClr val="445566"/></a:solidFill></a:defRPr></a:lvl1pPr></p:titleStyle></p:txStyles></p:sldMaster>"#;

const LAYOUT_WITH_BG: &str = r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="112233"/></a:solidFill></p:bgPr></p:bg><p:spTree/></p:cSld></p:sldLayout>"#;

const LAYOUT_PLAIN: &str = r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree/></p:cSld></p:sldLayout>"#;

/// Build a minimal template package with `layouts` layouts and `slides`
/// slides; the default layout carries a solid background fill.
pub(super) fn make_template(dir: &Path, layouts: usize, slides: usize) -> std::path::PathBuf {
    fn put(zip: &mut zip::ZipWriter<File>, name: String, body: &str) {
        zip.start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }

    let path = dir.join("template.pptx");
    let file = File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);

    put(&mut zip, "[Content_Types].xml".into(),"<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"><Default Extension=\"xml\" ContentType=\"application/xml\"/><Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/><Override PartName=\"/ppt/slides/slide1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/></Types>");
    put(&mut zip, "_rels/.rels".into(), "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"ppt/presentation.xml\"/></Relationships>");
    put(&mut zip, "ppt/presentation.xml".into(), PRESENTATION_XML);
    put(&mut zip, "ppt/_rels/presentation.xml.rels".into(), "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/><Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide1.xml\"/></Relationships>");
    put(&mut zip, "ppt/slideMasters/slideMaster1.xml".into(), MASTER_XML);

    let default_index = if layouts > 6 { 6 } else { 0 };
    for i in 0..layouts {
        let body = if i == default_index { LAYOUT_WITH_BG } else { LAYOUT_PLAIN };
        put(&mut zip, format!("ppt/slideLayouts/slideLayout{}.xml", i + 1), body);
    }
    for i in 0..slides {
        put(
            &mut zip,
            format!("ppt/slides/slide{}.xml", i + 1),
            "<p:sld xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:cSld><p:spTree/></p:cSld></p:sld>",
        );
    }
    zip.finish().unwrap();
    path
}

#[test]
fn open_reads_canvas_and_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let path = make_template(dir.path(), 3, 2);
    let tpl = TemplatePackage::open(&path).unwrap();
    assert_eq!(tpl.canvas.width, crate::foundation::core::Emu(12_192_000));
    assert_eq!(tpl.canvas.height, crate::foundation::core::Emu(6_858_000));
    assert_eq!(tpl.slide_count, 2);
    assert_eq!(tpl.layout_count, 3);
    assert_eq!(tpl.default_layout_index(), 0);
}

#[test]
fn rich_layout_sets_prefer_the_seventh_layout() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = TemplatePackage::open(&make_template(dir.path(), 11, 1)).unwrap();
    assert_eq!(tpl.default_layout_index(), 6);
    assert_eq!(tpl.layout_part_name(6), "ppt/slideLayouts/slideLayout7.xml");
}

#[test]
fn missing_or_malformed_templates_are_input_errors() {
    let dir = tempfile::tempdir().unwrap();

    let absent = dir.path().join("nope.pptx");
    assert!(matches!(TemplatePackage::open(&absent), Err(DeckError::Input(_))));

    let junk = dir.path().join("junk.pptx");
    std::fs::write(&junk, b"definitely not a zip").unwrap();
    assert!(matches!(TemplatePackage::open(&junk), Err(DeckError::Input(_))));
}

#[test]
fn packages_without_layouts_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = make_template(dir.path(), 0, 1);
    assert!(matches!(TemplatePackage::open(&path), Err(DeckError::Input(_))));
}

#[test]
fn background_fill_comes_from_the_default_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut tpl = TemplatePackage::open(&make_template(dir.path(), 8, 1)).unwrap();
    assert_eq!(
        tpl.layout_background_fill(),
        Some(RgbColor::new(0x11, 0x22, 0x33))
    );
}

#[test]
fn text_style_falls_back_to_the_master() {
    let dir = tempfile::tempdir().unwrap();
    let mut tpl = TemplatePackage::open(&make_template(dir.path(), 2, 1)).unwrap();
    let style = tpl.first_text_style();
    assert_eq!(style.size_pt, Some(32.0));
    assert_eq!(style.bold, Some(true));
    assert_eq!(style.color, Some(RgbColor::new(0x44, 0x55, 0x66)));
}

#[test]
fn read_entry_surfaces_missing_parts() {
    let dir = tempfile::tempdir().unwrap();
    let mut tpl = TemplatePackage::open(&make_template(dir.path(), 1, 1)).unwrap();
    assert!(tpl.read_entry("ppt/presentation.xml").is_ok());
    assert!(tpl.read_entry("ppt/nothing.xml").is_err());
}

#[test]
fn slide_size_parsing_requires_the_element() {
    let err = parse_slide_size(b"<p:presentation></p:presentation>");
    assert!(matches!(err, Err(DeckError::Input(_))));
    let ok = parse_slide_size(
        b"<p:presentation><p:sldSz cx=\"9144000\" cy=\"6858000\"/></p:presentation>",
    );
    assert_eq!(ok.unwrap(), (9_144_000, 6_858_000));
}

#[test]
fn background_parse_ignores_fills_outside_bg() {
    let xml = br#"<p:sldLayout><p:cSld><p:spTree><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></p:spTree></p:cSld></p:sldLayout>"#;
    assert_eq!(parse_background_fill(xml), None);
}
