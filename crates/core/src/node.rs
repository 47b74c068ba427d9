//! The items produced by axis traversal and their document-order addresses.

use crate::datasource::{Attribute, AttributeValue, DocumentNode, NodeType};
use std::fmt;

/// A node's coordinate from the document root.
///
/// The first component is always 1 (the root); each following component is
/// an index into the parent's children, so lexicographic order is document
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(Vec<usize>);

impl Address {
    pub const ROOT_INDEX: usize = 1;

    pub fn root() -> Self {
        Address(vec![Self::ROOT_INDEX])
    }

    /// This address extended by `index`.
    pub fn child(&self, index: usize) -> Self {
        let mut components = Vec::with_capacity(self.0.len() + 1);
        components.extend_from_slice(&self.0);
        components.push(index);
        Address(components)
    }

    /// This address with its last component removed.
    pub fn parent(&self) -> Self {
        let end = self.0.len().saturating_sub(1);
        Address(self.0[..end].to_vec())
    }

    /// The address of a sibling: the parent address extended by `index`.
    pub fn sibling(&self, index: usize) -> Self {
        self.parent().child(index)
    }

    pub fn components(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for Address {
    fn from(components: Vec<usize>) -> Self {
        Address(components)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", component)?;
        }
        f.write_str(")")
    }
}

/// A synthetic node standing for one attribute entry of `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNode<'a, N> {
    pub owner: N,
    pub index: usize,
    pub name: &'a str,
    pub value: AttributeValue<'a>,
}

impl<'a, N> AttributeNode<'a, N> {
    pub fn new(owner: N, index: usize, attribute: Attribute<'a>) -> Self {
        Self {
            owner,
            index,
            name: attribute.name,
            value: attribute.value,
        }
    }

    pub fn text(&self) -> String {
        self.value.to_string()
    }
}

/// An item reached by traversal: a tree node or an attribute of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef<'a, N> {
    Node(N),
    Attribute(AttributeNode<'a, N>),
}

/// A traversal result paired with its address.
pub type Located<'a, N> = (NodeRef<'a, N>, Address);

impl<'a, N: DocumentNode<'a> + 'a> NodeRef<'a, N> {
    pub fn as_node(&self) -> Option<N> {
        match self {
            NodeRef::Node(node) => Some(*node),
            NodeRef::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeNode<'a, N>> {
        match self {
            NodeRef::Node(_) => None,
            NodeRef::Attribute(attribute) => Some(attribute),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeRef::Node(node) => node.node_type(),
            NodeRef::Attribute(_) => NodeType::Attribute,
        }
    }

    /// The node's type tag; for attributes, the attribute name.
    pub fn type_tag(&self) -> &'a str {
        match self {
            NodeRef::Node(node) => node.type_tag(),
            NodeRef::Attribute(attribute) => attribute.name,
        }
    }

    pub fn text(&self) -> String {
        match self {
            NodeRef::Node(node) => node.text(),
            NodeRef::Attribute(attribute) => attribute.text(),
        }
    }

    pub fn parent(&self) -> Option<NodeRef<'a, N>> {
        match self {
            NodeRef::Node(node) => node.parent().map(NodeRef::Node),
            NodeRef::Attribute(attribute) => Some(NodeRef::Node(attribute.owner)),
        }
    }

    /// The index of this item under its parent: the child index for nodes,
    /// the attribute index for attributes.
    pub fn child_index(&self) -> Option<usize> {
        match self {
            NodeRef::Node(node) => node.child_index(),
            NodeRef::Attribute(attribute) => Some(attribute.index),
        }
    }

    pub fn children(&self) -> Box<dyn Iterator<Item = NodeRef<'a, N>> + 'a> {
        match self {
            NodeRef::Node(node) => Box::new(node.children().map(NodeRef::Node)),
            NodeRef::Attribute(_) => Box::new(std::iter::empty()),
        }
    }

    pub fn attributes(&self) -> Box<dyn Iterator<Item = NodeRef<'a, N>> + 'a> {
        match self {
            NodeRef::Node(node) => {
                let owner = *node;
                Box::new(node.attributes().enumerate().map(move |(index, attribute)| {
                    NodeRef::Attribute(AttributeNode::new(owner, index, attribute))
                }))
            }
            NodeRef::Attribute(_) => Box::new(std::iter::empty()),
        }
    }

    pub fn document(&self) -> N {
        match self {
            NodeRef::Node(node) => node.document(),
            NodeRef::Attribute(attribute) => attribute.owner.document(),
        }
    }
}

impl<'a, N> From<N> for NodeRef<'a, N> {
    fn from(node: N) -> Self {
        NodeRef::Node(node)
    }
}
