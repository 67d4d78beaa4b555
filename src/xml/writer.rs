//! Serialization of the element tree back to XML text.
//!
//! Output is re-indented with four spaces per level; elements whose only
//! content is text render inline (`<id>value</id>`), childless elements
//! render self-closed. Text and attribute values are entity-escaped.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{Document, Element, Node, XmlError, XmlResult};

const INDENT_CHAR: u8 = b' ';
const INDENT_SIZE: usize = 4;

/// Render a document to a string
pub fn to_string(document: &Document) -> XmlResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), INDENT_CHAR, INDENT_SIZE);
    if let Some(root) = document.root() {
        write_element(&mut writer, root)?;
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Render a document and overwrite the file at `path` with it.
/// The write is in place and non-transactional; no backup is made.
pub fn write_file(document: &Document, path: &Path) -> XmlResult<()> {
    let rendered = to_string(document)?;
    debug!("Writing {} bytes of XML to {}", rendered.len(), path.display());
    fs::write(path, rendered)?;
    Ok(())
}

fn write_element<W: io::Write>(writer: &mut Writer<W>, element: &Element) -> XmlResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        emit(writer, Event::Empty(start))?;
        return Ok(());
    }

    emit(writer, Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => emit(writer, Event::Text(BytesText::new(text)))?,
            Node::Comment(comment) => {
                // Comment content is written verbatim, never escaped
                emit(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))?
            }
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn emit<W: io::Write>(writer: &mut Writer<W>, event: Event) -> XmlResult<()> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::WriteFailed(e.to_string()))
}
