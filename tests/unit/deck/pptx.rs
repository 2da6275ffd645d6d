use super::*;
use std::io::Read as _;

use crate::foundation::core::{Canvas, Emu};

fn region(l: f64, t: f64, w: f64, h: f64) -> Region {
    Region::new(
        Emu::from_inches(l),
        Emu::from_inches(t),
        Emu::from_inches(w),
        Emu::from_inches(h),
    )
}

fn title_box(text: &str) -> Shape {
    Shape::TextBox {
        region: region(1.0, 0.5, 8.0, 1.5),
        frame: crate::deck::model::TextFrame {
            paragraphs: vec![Paragraph {
                text: text.to_string(),
                size_pt: 34.0,
                color: crate::foundation::core::RgbColor::BLACK,
                bold: true,
                align: TextAlign::Center,
                bullet: false,
                font: None,
            }],
        },
    }
}

fn png_file(dir: &Path) -> PathBuf {
    let path = dir.join("pic.png");
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 40]));
    img.save(&path).unwrap();
    path
}

fn read_entry(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut out = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
    out
}

fn entry_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(str::to_owned).collect()
}

#[test]
fn scratch_package_carries_all_required_parts() {
    let dir = tempfile::tempdir().unwrap();
    let pic = png_file(dir.path());
    let deck = Deck {
        canvas: Canvas::default(),
        background: BackgroundStrategy::NativeLayoutReuse { layout_index: 0 },
        slides: vec![
            ComposedSlide {
                shapes: vec![
                    title_box("Q&A <session>"),
                    Shape::FilledRect {
                        region: region(0.0, 5.0, 10.0, 2.0),
                        fill: crate::foundation::core::RgbColor::BLACK,
                        opacity: 0.3,
                    },
                ],
            },
            ComposedSlide {
                shapes: vec![Shape::Picture {
                    region: region(0.0, 0.0, 4.0, 3.0),
                    path: pic.clone(),
                }],
            },
        ],
    };

    let out = dir.path().join("deck.pptx");
    save_deck(&deck, None, &out).unwrap();

    let names = entry_names(&out);
    for required in [
        "[Content_Types].xml",
        "_rels/.rels",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "ppt/slides/slide1.xml",
        "ppt/slides/slide2.xml",
        "ppt/slides/_rels/slide2.xml.rels",
        "ppt/media/dwimage1.png",
    ] {
        assert!(names.iter().any(|n| n == required), "missing {required}");
    }

    let presentation = read_entry(&out, "ppt/presentation.xml");
    assert!(presentation.contains("cx=\"9144000\""));
    assert!(presentation.contains("<p:sldId id=\"256\" r:id=\"rId2\"/>"));
    assert!(presentation.contains("<p:sldId id=\"257\" r:id=\"rId3\"/>"));

    let slide1 = read_entry(&out, "ppt/slides/slide1.xml");
    assert!(slide1.contains("Q&amp;A &lt;session&gt;"));
    assert!(slide1.contains("sz=\"3400\""));
    assert!(slide1.contains("algn=\"ctr\""));
    assert!(slide1.contains("<a:alpha val=\"30000\"/>"));

    let slide2_rels = read_entry(&out, "ppt/slides/_rels/slide2.xml.rels");
    assert!(slide2_rels.contains("Target=\"../media/dwimage1.png\""));
}

#[test]
fn repeated_picture_sources_are_stored_once() {
    let dir = tempfile::tempdir().unwrap();
    let pic = png_file(dir.path());
    let slide = ComposedSlide {
        shapes: vec![Shape::Picture {
            region: region(0.0, 0.0, 10.0, 7.5),
            path: pic.clone(),
        }],
    };
    let deck = Deck {
        canvas: Canvas::default(),
        background: BackgroundStrategy::RasterizedScreenshot(pic),
        slides: vec![slide.clone(), slide],
    };
    let out = dir.path().join("deck.pptx");
    save_deck(&deck, None, &out).unwrap();

    let media: Vec<String> = entry_names(&out)
        .into_iter()
        .filter(|n| n.starts_with("ppt/media/"))
        .collect();
    assert_eq!(media, vec!["ppt/media/dwimage1.png".to_string()]);
}

#[test]
fn failed_saves_leave_no_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let deck = Deck {
        canvas: Canvas::default(),
        background: BackgroundStrategy::NativeLayoutReuse { layout_index: 0 },
        slides: vec![ComposedSlide {
            shapes: vec![Shape::Picture {
                region: region(0.0, 0.0, 1.0, 1.0),
                path: dir.path().join("does-not-exist.png"),
            }],
        }],
    };
    let out = dir.path().join("broken.pptx");
    let err = save_deck(&deck, None, &out).unwrap_err();
    assert!(matches!(err, DeckError::Persistence(_)));
    assert!(!out.exists());
}

#[test]
fn presentation_rels_patch_renumbers_past_survivors() {
    let src = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/></Relationships>"#;
    let (patched, rids) = patch_presentation_rels(src, 2).unwrap();
    let text = String::from_utf8(patched).unwrap();
    assert!(text.contains("slideMaster1.xml"));
    // The original slide ids are gone; replacements number past rId3.
    assert!(!text.contains("Id=\"rId2\""));
    assert!(!text.contains("Id=\"rId3\""));
    assert_eq!(rids, vec!["rId4".to_string(), "rId5".to_string()]);
    assert!(text.contains("Id=\"rId4\""));
    assert!(text.contains("Target=\"slides/slide1.xml\""));
}

#[test]
fn slide_id_list_patch_replaces_entries() {
    let src = br#"<p:presentation><p:sldMasterIdLst/><p:sldIdLst><p:sldId id="900" r:id="rId9"/></p:sldIdLst><p:sldSz cx="1" cy="1"/></p:presentation>"#;
    let rids = vec!["rId7".to_string()];
    let patched = String::from_utf8(patch_slide_id_list(src, &rids).unwrap()).unwrap();
    assert!(!patched.contains("rId9"));
    assert!(patched.contains("<p:sldId id=\"256\" r:id=\"rId7\"/>"));
    assert!(patched.contains("<p:sldSz"));
}

#[test]
fn content_types_patch_swaps_slide_overrides() {
    let src = br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/></Types>"#;
    let patched = String::from_utf8(patch_content_types(src, 3).unwrap()).unwrap();
    assert!(patched.contains("/ppt/theme/theme1.xml"));
    assert!(patched.contains("/ppt/slides/slide3.xml"));
    assert!(patched.contains("Extension=\"png\""));
    assert!(patched.contains("Extension=\"jpg\""));
    // Exactly the three generated overrides survive.
    assert_eq!(patched.matches("/ppt/slides/").count(), 3);
}

fn make_template(dir: &Path) -> PathBuf {
    make_template_ext(dir, false)
}

fn make_template_ext(dir: &Path, with_notes: bool) -> PathBuf {
    use std::io::Write as _;
    fn put(zip: &mut zip::ZipWriter<File>, name: String, body: &str) {
        zip.start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }

    let notes_override = if with_notes {
        "<Override PartName=\"/ppt/notesSlides/notesSlide1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml\"/>"
    } else {
        ""
    };
    let path = dir.join("template.pptx");
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
    put(&mut zip, "[Content_Types].xml".into(), &format!("<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"><Default Extension=\"xml\" ContentType=\"application/xml\"/><Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/><Override PartName=\"/ppt/slides/slide1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/><Override PartName=\"/ppt/slides/slide2.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>{notes_override}</Types>"));
    put(&mut zip, "_rels/.rels".into(), "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"ppt/presentation.xml\"/></Relationships>");
    put(&mut zip, "ppt/presentation.xml".into(), "<p:presentation xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id=\"256\" r:id=\"rId2\"/><p:sldId id=\"257\" r:id=\"rId3\"/></p:sldIdLst><p:sldSz cx=\"12192000\" cy=\"6858000\"/></p:presentation>");
    put(&mut zip, "ppt/_rels/presentation.xml.rels".into(), "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/><Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide1.xml\"/><Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide2.xml\"/></Relationships>");
    put(&mut zip, "ppt/slideMasters/slideMaster1.xml".into(), "<p:sldMaster xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:cSld><p:spTree/></p:cSld></p:sldMaster>");
    for i in 1..=8 {
        put(
            &mut zip,
            format!("ppt/slideLayouts/slideLayout{i}.xml"),
            "<p:sldLayout xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:cSld><p:spTree/></p:cSld></p:sldLayout>",
        );
    }
    for i in 1..=2 {
        put(
            &mut zip,
            format!("ppt/slides/slide{i}.xml"),
            "<p:sld xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:cSld><p:spTree/></p:cSld></p:sld>",
        );
    }
    if with_notes {
        put(&mut zip, "ppt/notesSlides/notesSlide1.xml".into(), "<p:notes xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:cSld><p:spTree/></p:cSld></p:notes>");
        put(&mut zip, "ppt/notesSlides/_rels/notesSlide1.xml.rels".into(), "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"../slides/slide1.xml\"/></Relationships>");
    }
    zip.finish().unwrap();
    path
}

#[test]
fn template_rewrite_attaches_slides_to_the_chosen_layout() {
    let dir = tempfile::tempdir().unwrap();
    let tpl_path = make_template(dir.path());
    let mut tpl = TemplatePackage::open(&tpl_path).unwrap();

    let deck = Deck {
        canvas: tpl.canvas,
        background: BackgroundStrategy::NativeLayoutReuse { layout_index: 6 },
        slides: vec![ComposedSlide {
            shapes: vec![title_box("From the template")],
        }],
    };
    let out = dir.path().join("out.pptx");
    save_deck(&deck, Some(&mut tpl), &out).unwrap();

    let names = entry_names(&out);
    assert!(names.iter().any(|n| n == "ppt/slideMasters/slideMaster1.xml"));
    assert!(names.iter().any(|n| n == "ppt/slideLayouts/slideLayout7.xml"));
    assert!(names.iter().any(|n| n == "ppt/slides/slide1.xml"));
    assert!(!names.iter().any(|n| n == "ppt/slides/slide2.xml"));

    let rels = read_entry(&out, "ppt/slides/_rels/slide1.xml.rels");
    assert!(rels.contains("Target=\"../slideLayouts/slideLayout7.xml\""));

    let ct = read_entry(&out, "[Content_Types].xml");
    assert_eq!(ct.matches("/ppt/slides/").count(), 1);
}

#[test]
fn template_rewrite_drops_notes_parts() {
    let dir = tempfile::tempdir().unwrap();
    let tpl_path = make_template_ext(dir.path(), true);
    let mut tpl = TemplatePackage::open(&tpl_path).unwrap();

    let deck = Deck {
        canvas: tpl.canvas,
        background: BackgroundStrategy::NativeLayoutReuse { layout_index: 0 },
        slides: vec![ComposedSlide {
            shapes: vec![title_box("No notes survive")],
        }],
    };
    let out = dir.path().join("out.pptx");
    save_deck(&deck, Some(&mut tpl), &out).unwrap();

    // Notes annotate the dropped slides; keeping them would leave their rels
    // pointing at unrelated generated slides.
    let names = entry_names(&out);
    assert!(!names.iter().any(|n| n.starts_with("ppt/notesSlides/")));

    let ct = read_entry(&out, "[Content_Types].xml");
    assert!(!ct.contains("/ppt/notesSlides/"));
    assert_eq!(ct.matches("/ppt/slides/").count(), 1);
}
