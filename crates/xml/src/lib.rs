//! XML documents as a docpath data source, backed by `roxmltree`.
//!
//! Element nodes are tagged with their local name, text nodes with `text`,
//! comments with `comment`, processing instructions with their target and
//! the document node with `document`.

use docpath_core::{Attribute, AttributeValue, DocpathError, DocumentNode, NodeType, compile};
use log::debug;
use roxmltree::Node;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("failed to parse XML: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error(transparent)]
    Query(#[from] DocpathError),
}

/// Wrapper around `roxmltree::Document` providing a queryable root node.
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, XmlError> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self { doc })
    }

    pub fn root_node(&self) -> XmlNode<'_> {
        XmlNode(self.doc.root())
    }

    /// Compiles `path` and returns its matches from the document node, in
    /// document order. Attribute matches are dropped.
    pub fn query(&self, path: &str) -> Result<Vec<XmlNode<'_>>, XmlError> {
        let matches: Vec<_> = compile(path)?
            .findall(self.root_node())?
            .into_iter()
            .filter_map(|found| found.as_node())
            .collect();
        debug!("query '{}' matched {} nodes", path, matches.len());
        Ok(matches)
    }
}

/// A handle to a node of a parsed XML document.
#[derive(Debug, Clone, Copy)]
pub struct XmlNode<'a>(Node<'a, 'a>);

impl<'a> XmlNode<'a> {
    pub fn new(node: Node<'a, 'a>) -> Self {
        XmlNode(node)
    }

    pub fn inner(&self) -> Node<'a, 'a> {
        self.0
    }
}

impl PartialEq for XmlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.id() == other.0.id()
    }
}

impl Eq for XmlNode<'_> {}

impl<'a> DocumentNode<'a> for XmlNode<'a> {
    fn node_type(&self) -> NodeType {
        let node = self.0;
        if node.is_root() {
            NodeType::Root
        } else if node.is_text() {
            NodeType::Text
        } else if node.is_comment() {
            NodeType::Comment
        } else if node.is_pi() {
            NodeType::ProcessingInstruction
        } else {
            NodeType::Element
        }
    }

    fn type_tag(&self) -> &'a str {
        let node = self.0;
        match self.node_type() {
            NodeType::Root => "document",
            NodeType::Text => "text",
            NodeType::Comment => "comment",
            NodeType::ProcessingInstruction => node.pi().map_or("", |pi| pi.target),
            _ => node.tag_name().name(),
        }
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent().map(XmlNode)
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        Box::new(self.0.children().map(XmlNode))
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Attribute<'a>> + 'a> {
        Box::new(self.0.attributes().map(|attr| Attribute {
            name: attr.name(),
            value: AttributeValue::Text(Cow::Borrowed(attr.value())),
        }))
    }

    fn text(&self) -> String {
        let node = self.0;
        match self.node_type() {
            NodeType::Root | NodeType::Element => node
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect(),
            NodeType::ProcessingInstruction => {
                node.pi().and_then(|pi| pi.value).unwrap_or_default().to_string()
            }
            _ => node.text().unwrap_or_default().to_string(),
        }
    }

    fn document(&self) -> Self {
        XmlNode(self.0.document().root())
    }
}
