//! XML Tree Model
//!
//! An explicit element tree for documents that need structural editing:
//! parse into a tree, locate or create elements by name, mutate, serialize.
//! Namespace handling is deliberately simple: tags are matched by local name
//! after `strip_namespaces` has run.

mod parser;
mod writer;

pub use parser::{parse_file, parse_str};
pub use writer::{to_string, write_file};

use thiserror::Error;

/// Result type for XML operations
pub type XmlResult<T> = Result<T, XmlError>;

/// Errors raised while parsing or serializing XML
#[derive(Debug, Error)]
pub enum XmlError {
    /// Input is not well-formed XML
    #[error("malformed XML: {message}")]
    Malformed { message: String },

    /// More than one element at the top level of the document
    #[error("document has more than one root element")]
    MultipleRoots,

    /// Document ended while an element was still open
    #[error("unexpected end of document inside element '{name}'")]
    UnclosedElement { name: String },

    /// Serialization failure reported by the writer backend
    #[error("XML write failed: {0}")]
    WriteFailed(String),

    #[error("XML I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl XmlError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// One node in the tree. Elements carry the structure; text and comments
/// are kept so a round trip preserves document content.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An XML element: tag name, ordered attributes, ordered children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Build a leaf element containing a single text node
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.into()));
        element
    }

    /// Append a child element
    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Iterate over child nodes that are elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element with the given tag name
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Find the first child element with the given name, creating and
    /// appending an empty one if none exists.
    pub fn get_or_create_child(&mut self, name: &str) -> &mut Element {
        let position = self.children.iter().position(|node| {
            matches!(node, Node::Element(element) if element.name == name)
        });
        let index = match position {
            Some(index) => index,
            None => {
                self.children.push(Node::Element(Element::new(name)));
                self.children.len() - 1
            }
        };
        match &mut self.children[index] {
            Node::Element(element) => element,
            _ => unreachable!("position matched an element node"),
        }
    }

    /// Concatenated text content of direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Strip namespace qualifiers from this element and all descendants:
    /// `prefix:name` becomes `name`, and `xmlns` declarations along with any
    /// remaining prefixed attributes are removed. After this runs the tree
    /// serializes as a plain, namespace-free document.
    pub fn strip_namespaces(&mut self) {
        if let Some(index) = self.name.rfind(':') {
            self.name = self.name[index + 1..].to_string();
        }
        self.attributes
            .retain(|(key, _)| key != "xmlns" && !key.contains(':'));
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.strip_namespaces();
            }
        }
    }
}

/// A parsed document. `root` is `None` only for documents with no element
/// content at all, which keeps the missing-root check expressible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub root: Option<Element>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root: Some(root) }
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut()
    }

    pub fn strip_namespaces(&mut self) {
        if let Some(root) = &mut self.root {
            root.strip_namespaces();
        }
    }
}
