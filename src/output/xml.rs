//! XML serialization for transformed documents.
//!
//! Emits the standard declaration header and the element tree with
//! two-space indentation. Because whitespace-only text was dropped at
//! parse time, serializing an already indented document reproduces the
//! same whitespace pattern.

use crate::parser::document::{Document, Element, Node};
use crate::utils::config::{INDENT_CHAR, INDENT_SIZE};
use crate::utils::error::OutputError;
use log::{debug, info};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialize a document to a string
///
/// **Public** - main entry point for serialization
///
/// With `indent` the output uses two-space child nesting; elements whose
/// only content is text keep that text inline. Without it the document
/// is emitted on a single line, which is the degraded best-effort form
/// the converter falls back to.
///
/// # Errors
/// * `OutputError::SerializationFailed` - the XML writer rejected an event
pub fn serialize_document(doc: &Document, indent: bool) -> Result<String, OutputError> {
    let mut buffer = Vec::new();

    if indent {
        let mut writer = Writer::new_with_indent(&mut buffer, INDENT_CHAR, INDENT_SIZE);
        write_tree(&mut writer, doc)?;
    } else {
        let mut writer = Writer::new(&mut buffer);
        write_tree(&mut writer, doc)?;
    }

    Ok(String::from_utf8(buffer)?)
}

/// Write serialized content to a file
///
/// **Public** - used by the converter for the final output
///
/// Validates the path and creates missing parent directories first.
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path, or path is a directory
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_document(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing converted document to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;

    Ok(())
}

/// Validate that an output path is usable
///
/// **Private** - internal validation
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn write_tree<W: Write>(writer: &mut Writer<W>, doc: &Document) -> Result<(), OutputError> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(writer, &doc.root)?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, elem: &Element) -> Result<(), OutputError> {
    let mut start = BytesStart::new(elem.name.as_str());
    for (key, value) in &elem.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if elem.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &elem.children {
        match child {
            Node::Element(child_elem) => write_element(writer, child_elem)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(elem.name.as_str())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tcx::parse_document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_indented() {
        let doc = parse_document("<A><B attr=\"1\"><C>text</C></B><D/></A>").unwrap();
        let xml = serialize_document(&doc, true).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <A>\n  <B attr=\"1\">\n    <C>text</C>\n  </B>\n  <D/>\n</A>"
        );
    }

    #[test]
    fn test_serialize_unindented() {
        let doc = parse_document("<A><B>text</B></A>").unwrap();
        let xml = serialize_document(&doc, false).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><A><B>text</B></A>"
        );
    }

    #[test]
    fn test_indentation_is_idempotent() {
        let doc = parse_document("<A><B><C>text</C></B></A>").unwrap();
        let once = serialize_document(&doc, true).unwrap();

        let reparsed = parse_document(&once).unwrap();
        let twice = serialize_document(&reparsed, true).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_text_is_escaped() {
        let doc = parse_document("<A>a &amp; b</A>").unwrap();
        let xml = serialize_document(&doc, true).unwrap();
        assert!(xml.contains("a &amp; b"));
    }

    #[test]
    fn test_write_document_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/out.tcx");

        write_document("<A/>", &nested_path).unwrap();
        assert!(nested_path.exists());
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }
}
