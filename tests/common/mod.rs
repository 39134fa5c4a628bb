#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use docxide_normalize::StyleRecord;

pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const DOCUMENT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p></w:body></w:document>"#,
);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wrap `w:style` elements in a `w:styles` part.
pub fn styles_xml(styles: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:styles xmlns:w="{}">"#,
            "{}</w:styles>"
        ),
        WML_NS, styles
    )
}

pub fn record(name: &str, font_size: f32) -> StyleRecord {
    let mut r = StyleRecord::new(name);
    r.font_size = Some(font_size);
    r
}

pub fn spaced(name: &str, leading: f32, space_before: f32) -> StyleRecord {
    let mut r = StyleRecord::new(name);
    r.leading = Some(leading);
    r.space_before = space_before;
    r
}

/// Unique scratch path under the system temp dir.
pub fn scratch(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "docxide-normalize-{}-{nanos}-{n}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

/// Write a minimal package. `styles` of `None` leaves out `word/styles.xml`.
pub fn write_docx(path: &Path, styles: Option<&str>) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(DOCUMENT_XML.as_bytes()).unwrap();
    if let Some(styles) = styles {
        zip.start_file("word/styles.xml", options).unwrap();
        zip.write_all(styles.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

pub fn read_part(path: &Path, name: &str) -> String {
    let mut zip = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut content = String::new();
    zip.by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

pub fn part_names(path: &Path) -> Vec<String> {
    let zip = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    zip.file_names().map(str::to_string).collect()
}

/// `w:` attribute of the first `local` element inside the paragraph style `name`.
pub fn style_attr(xml: &str, name: &str, local: &str, attr: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    let style = doc.descendants().find(|n| {
        n.tag_name().name() == "style"
            && n.children().any(|c| {
                c.tag_name().name() == "name" && c.attribute((WML_NS, "val")) == Some(name)
            })
    })?;
    style
        .descendants()
        .find(|n| n.tag_name().name() == local)?
        .attribute((WML_NS, attr))
        .map(str::to_string)
}

/// Child element names of style `name`, then its `w:pPr` children as `pPr/<name>`.
pub fn element_layout(xml: &str, name: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    let Some(style) = doc.descendants().find(|n| {
        n.tag_name().name() == "style"
            && n.children().any(|c| {
                c.tag_name().name() == "name" && c.attribute((WML_NS, "val")) == Some(name)
            })
    }) else {
        return Vec::new();
    };
    style
        .children()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name().to_string())
        .chain(
            style
                .children()
                .find(|n| n.tag_name().name() == "pPr")
                .into_iter()
                .flat_map(|p| p.children().filter(|n| n.is_element()))
                .map(|n| format!("pPr/{}", n.tag_name().name())),
        )
        .collect()
}
