//! Event-based XML parsing into the element tree.
//!
//! Built on quick-xml's pull reader. Whitespace-only text is dropped (the
//! writer re-indents on output), comments inside the root are preserved,
//! CDATA is folded into plain text, and the XML declaration, doctype and
//! processing instructions are skipped.

use std::fs;
use std::path::Path;
use std::str;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Document, Element, Node, XmlError, XmlResult};

/// Parse the file at `path` into a document tree
pub fn parse_file(path: &Path) -> XmlResult<Document> {
    debug!("Parsing XML file: {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse an XML string into a document tree
pub fn parse_str(input: &str) -> XmlResult<Document> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut root: Option<Element> = None;
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::malformed(e.to_string()))?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::MultipleRoots);
                }
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                // Mismatched names are already rejected by the reader
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::malformed("closing tag without an open element"))?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|e| XmlError::malformed(e.to_string()))?;
                if value.is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(value.into_owned())),
                    None => {
                        return Err(XmlError::malformed("text content outside the root element"))
                    }
                }
            }
            Event::CData(cdata) => {
                let value = String::from_utf8_lossy(cdata.into_inner().as_ref()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(value)),
                    None => {
                        return Err(XmlError::malformed("text content outside the root element"))
                    }
                }
            }
            Event::Comment(comment) => {
                let value = String::from_utf8_lossy(comment.as_ref()).into_owned();
                // Comments outside the root are dropped
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Comment(value));
                }
            }
            Event::Eof => break,
            _ => {} // declaration, doctype, processing instructions
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnclosedElement { name: open.name });
    }
    Ok(Document { root })
}

/// Attach a completed element to its parent, or install it as the root
fn close_element(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> XmlResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => {
            if root.is_some() {
                return Err(XmlError::MultipleRoots);
            }
            *root = Some(element);
        }
    }
    Ok(())
}

fn element_from_start(start: &BytesStart) -> XmlResult<Element> {
    let name = str::from_utf8(start.name().as_ref())
        .map_err(|e| XmlError::malformed(e.to_string()))?
        .to_string();
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::malformed(e.to_string()))?;
        let key = str::from_utf8(attribute.key.as_ref())
            .map_err(|e| XmlError::malformed(e.to_string()))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::malformed(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements_and_text() {
        let doc = parse_str("<project><build><plugins><plugin>x</plugin></plugins></build></project>")
            .unwrap();
        let root = doc.root().unwrap();
        assert_eq!(root.name, "project");
        let plugin = root
            .find_child("build")
            .and_then(|b| b.find_child("plugins"))
            .and_then(|p| p.find_child("plugin"))
            .unwrap();
        assert_eq!(plugin.text(), "x");
    }

    #[test]
    fn test_parse_preserves_attributes_in_order() {
        let doc = parse_str(r#"<project xmlns="http://x" b="2" a="1"/>"#).unwrap();
        let root = doc.root().unwrap();
        let keys: Vec<_> = root.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["xmlns", "b", "a"]);
    }

    #[test]
    fn test_parse_drops_indentation_whitespace() {
        let doc = parse_str("<project>\n    <version>1.0</version>\n</project>").unwrap();
        let root = doc.root().unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.find_child("version").unwrap().text(), "1.0");
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let doc = parse_str("<name>Tom &amp; Jerry</name>").unwrap();
        assert_eq!(doc.root().unwrap().text(), "Tom & Jerry");
    }

    #[test]
    fn test_parse_keeps_comments() {
        let doc = parse_str("<project><!-- keep me --><build/></project>").unwrap();
        let root = doc.root().unwrap();
        assert!(root
            .children
            .iter()
            .any(|n| matches!(n, Node::Comment(c) if c == " keep me ")));
    }

    #[test]
    fn test_parse_element_free_document_has_no_root() {
        let doc = parse_str("").unwrap();
        assert!(doc.root().is_none());
        let doc = parse_str("<?xml version=\"1.0\"?>\n").unwrap();
        assert!(doc.root().is_none());
    }

    #[test]
    fn test_parse_rejects_multiple_roots() {
        let result = parse_str("<a/><b/>");
        assert!(matches!(result, Err(XmlError::MultipleRoots)));
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        assert!(parse_str("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_parse_rejects_unclosed_element() {
        let result = parse_str("<project><build>");
        assert!(result.is_err());
    }
}
