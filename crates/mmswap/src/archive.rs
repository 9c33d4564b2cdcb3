//! Resolving raw upload bytes into tool-path text.
//!
//! A print file arrives either as plain G-code or as a 3MF package. A 3MF is a
//! zip archive; sliced packages carry the G-code under `Metadata/`, next to
//! the model XML and thumbnails.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::{ExtractError, Result};
use crate::settings::ExtractSettings;

/// True if `name` ends with `suffix`, ignoring ASCII case.
pub fn has_extension(name: &str, suffix: &str) -> bool {
    let (name, suffix) = (name.as_bytes(), suffix.as_bytes());
    name.len() >= suffix.len() && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Turn `bytes` into the tool-path document text.
///
/// Names ending in the container extension are opened as zip archives and the
/// first entry ending in the document extension is decoded. Anything else is
/// decoded directly.
pub fn resolve_document(file_name: &str, bytes: &[u8], settings: &ExtractSettings) -> Result<String> {
    if has_extension(file_name, &settings.container_extension) {
        read_container(bytes, &settings.document_extension)
    } else {
        decode_text(bytes.to_vec())
    }
}

fn read_container(bytes: &[u8], document_extension: &str) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::UnreadableDocument(e.to_string()))?;

    let mut selected = None;
    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| ExtractError::UnreadableDocument(e.to_string()))?;
        if has_extension(entry.name(), document_extension) {
            selected = Some(i);
            break;
        }
    }

    let Some(index) = selected else {
        tracing::debug!(entries = archive.len(), "container has no tool-path entry");
        return Err(ExtractError::MissingDocument(document_extension.to_string()));
    };

    let mut entry = archive
        .by_index(index)
        .map_err(|e| ExtractError::UnreadableDocument(e.to_string()))?;
    tracing::debug!(entry = entry.name(), size = entry.size(), "reading tool-path entry");

    let mut buf = Vec::new();
    entry
        .read_to_end(&mut buf)
        .map_err(|e| ExtractError::UnreadableDocument(e.to_string()))?;
    if buf.is_empty() {
        return Err(ExtractError::UnreadableDocument(format!(
            "{} entry is empty",
            entry.name()
        )));
    }
    decode_text(buf)
}

fn decode_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| ExtractError::UnreadableDocument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    /// Build an in-memory zip with the given entries, in order.
    fn build_container(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        buffer.into_inner()
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_extension("Benchy.GCODE.3MF", ".3mf"));
        assert!(has_extension("plate_1.gcode", ".gcode"));
        assert!(!has_extension("plate_1.gcode.md5", ".gcode"));
        assert!(!has_extension("3mf", ".3mf"));
    }

    #[test]
    fn plain_text_passes_through() {
        let settings = ExtractSettings::default();
        let text = resolve_document("cube.gcode", b"G28\nT0\n", &settings).unwrap();
        assert_eq!(text, "G28\nT0\n");
    }

    #[test]
    fn invalid_utf8_is_unreadable() {
        let settings = ExtractSettings::default();
        let err = resolve_document("cube.gcode", &[0x47, 0xff, 0xfe], &settings).unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableDocument(_)));
    }

    #[test]
    fn container_yields_first_gcode_entry() {
        let bytes = build_container(&[
            ("[Content_Types].xml", "<Types/>".as_bytes()),
            ("Metadata/plate_1.gcode.md5", "abc".as_bytes()),
            ("Metadata/plate_1.gcode", "; first\n".as_bytes()),
            ("Metadata/plate_2.GCODE", "; second\n".as_bytes()),
        ]);
        let settings = ExtractSettings::default();
        let text = resolve_document("print.gcode.3mf", &bytes, &settings).unwrap();
        assert_eq!(text, "; first\n");
    }

    #[test]
    fn container_without_gcode_is_missing() {
        let bytes = build_container(&[
            ("[Content_Types].xml", "<Types/>".as_bytes()),
            ("3D/3dmodel.model", "<model/>".as_bytes()),
        ]);
        let settings = ExtractSettings::default();
        let err = resolve_document("model.3MF", &bytes, &settings).unwrap_err();
        assert!(matches!(err, ExtractError::MissingDocument(_)));
    }

    #[test]
    fn container_entry_must_be_utf8() {
        let bytes = build_container(&[("Metadata/plate_1.gcode", &[0xc3u8, 0x28][..])]);
        let settings = ExtractSettings::default();
        let err = resolve_document("print.3mf", &bytes, &settings).unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableDocument(_)));
    }

    #[test]
    fn empty_container_entry_is_unreadable() {
        let bytes = build_container(&[
            ("Metadata/plate_1.gcode", "".as_bytes()),
            ("Metadata/plate_2.gcode", "T0\n".as_bytes()),
        ]);
        let settings = ExtractSettings::default();
        let err = resolve_document("print.3mf", &bytes, &settings).unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableDocument(_)));
    }

    #[test]
    fn empty_plain_file_is_accepted() {
        let settings = ExtractSettings::default();
        assert_eq!(resolve_document("blank.gcode", b"", &settings).unwrap(), "");
    }

    #[test]
    fn corrupt_container_is_unreadable() {
        let settings = ExtractSettings::default();
        let err = resolve_document("print.3mf", b"not a zip", &settings).unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableDocument(_)));
    }
}
