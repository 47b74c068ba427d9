//! Defines the contract a document tree must satisfy to be queried.
use std::borrow::Cow;
use std::fmt;

pub mod tests;

/// The category of a node, used by the `element` and `text` node tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// The value of a single attribute entry.
///
/// Document models such as docutils store list-valued attributes (`names`,
/// `classes`); those render as their items joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue<'a> {
    Text(Cow<'a, str>),
    List(Vec<Cow<'a, str>>),
}

impl fmt::Display for AttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(value) => f.write_str(value),
            AttributeValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(item)?;
                }
                Ok(())
            }
        }
    }
}

impl<'a> From<&'a str> for AttributeValue<'a> {
    fn from(value: &'a str) -> Self {
        AttributeValue::Text(Cow::Borrowed(value))
    }
}

/// One entry of a node's attribute mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: AttributeValue<'a>,
}

/// The read-only node contract the query engine is written against.
///
/// `'a` is the lifetime of the underlying tree. Implementations are cheap
/// handles (`Copy`) into a tree owned elsewhere; the engine never mutates it.
pub trait DocumentNode<'a>: fmt::Debug + Clone + Copy + PartialEq + Eq {
    /// The category of the node.
    fn node_type(&self) -> NodeType;

    /// The identifier matched by name tests and returned by `name()`,
    /// e.g. `section` or `paragraph`.
    fn type_tag(&self) -> &'a str;

    /// The parent node, `None` for the document root.
    fn parent(&self) -> Option<Self>;

    /// The ordered children of this node.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// The ordered attribute mapping of this node.
    fn attributes(&self) -> Box<dyn Iterator<Item = Attribute<'a>> + 'a>;

    /// The text rendering used by predicate comparisons.
    fn text(&self) -> String;

    /// The root of the document owning this node.
    fn document(&self) -> Self {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// The index of this node within its parent's children.
    fn child_index(&self) -> Option<usize> {
        let parent = self.parent()?;
        parent.children().position(|child| child == *self)
    }
}
