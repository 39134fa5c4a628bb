mod patch;
mod styles;

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;

pub(crate) use patch::apply_updates;
pub(crate) use styles::parse_catalog;

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const STYLES_PART: &str = "word/styles.xml";

pub(crate) fn twips_to_pts(twips: f32) -> f32 {
    twips / 20.0
}

/// Whole twips, as WordprocessingML writes lengths.
pub(crate) fn pts_to_twips(pts: f32) -> i64 {
    (pts * 20.0).round() as i64
}

pub(crate) fn wml<'a, 'i>(
    node: roxmltree::Node<'a, 'i>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'i>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

pub(crate) fn wml_attr<'a, 'i>(node: roxmltree::Node<'a, 'i>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

pub(crate) fn open(path: &Path) -> Result<zip::ZipArchive<File>, Error> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;

    let zip = zip::ZipArchive::new(file)
        .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;
    if zip.index_for_name("word/document.xml").is_none() {
        return Err(Error::InvalidDocx(
            "missing word/document.xml (is this a DOCX file?)".into(),
        ));
    }
    Ok(zip)
}

pub(crate) fn read_styles(zip: &mut zip::ZipArchive<File>) -> Result<String, Error> {
    let mut entry = match zip.by_name(STYLES_PART) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Err(Error::MissingStyles),
        Err(e) => return Err(Error::Zip(e)),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

/// Write a copy of `zip` to `output` with `styles_xml` as its style part.
///
/// Every other entry is copied raw, without recompression. The package is
/// written next to `output` first and renamed into place, so `output` may be
/// the file `zip` was opened from.
pub(crate) fn write_package(
    zip: &mut zip::ZipArchive<File>,
    styles_xml: &str,
    output: &Path,
) -> Result<(), Error> {
    let staging = staging_path(output);
    let mut writer = zip::ZipWriter::new(File::create(&staging)?);

    for i in 0..zip.len() {
        let entry = zip.by_index_raw(i)?;
        if entry.name() != STYLES_PART {
            writer.raw_copy_file(entry)?;
            continue;
        }
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(entry.compression());
        drop(entry);
        writer.start_file(STYLES_PART, options)?;
        writer.write_all(styles_xml.as_bytes())?;
    }

    writer.finish()?;
    std::fs::rename(&staging, output)?;
    Ok(())
}

fn staging_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    output.with_file_name(name)
}
