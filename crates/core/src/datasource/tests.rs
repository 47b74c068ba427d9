//! An in-memory document tree for tests, usable from downstream crates.

use super::{Attribute, AttributeValue, DocumentNode, NodeType};
use std::borrow::Cow;

#[derive(Debug, Clone)]
enum MockValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone)]
struct MockNodeData {
    node_type: NodeType,
    tag: String,
    content: String,
    parent: Option<usize>,
    children: Vec<usize>,
    attributes: Vec<(String, MockValue)>,
}

/// A tree of nodes addressed by id; id 0 is always the document root.
#[derive(Debug)]
pub struct MockTree {
    nodes: Vec<MockNodeData>,
}

/// A handle to one node of a `MockTree`.
#[derive(Debug, Clone, Copy)]
pub struct MockNode<'a> {
    pub id: usize,
    pub tree: &'a MockTree,
}

impl PartialEq for MockNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}
impl Eq for MockNode<'_> {}

impl MockTree {
    pub fn new(root_tag: &str) -> Self {
        let root = MockNodeData {
            node_type: NodeType::Root,
            tag: root_tag.to_string(),
            content: String::new(),
            parent: None,
            children: vec![],
            attributes: vec![],
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> MockNode<'_> {
        self.node(0)
    }

    pub fn node(&self, id: usize) -> MockNode<'_> {
        MockNode { id, tree: self }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, parent: usize, node_type: NodeType, tag: &str, content: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(MockNodeData {
            node_type,
            tag: tag.to_string(),
            content: content.to_string(),
            parent: Some(parent),
            children: vec![],
            attributes: vec![],
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn add_element(&mut self, parent: usize, tag: &str) -> usize {
        self.push(parent, NodeType::Element, tag, "")
    }

    pub fn add_text(&mut self, parent: usize, text: &str) -> usize {
        self.push(parent, NodeType::Text, "text", text)
    }

    pub fn add_comment(&mut self, parent: usize, text: &str) -> usize {
        self.push(parent, NodeType::Comment, "comment", text)
    }

    pub fn set_attribute(&mut self, id: usize, name: &str, value: &str) {
        self.nodes[id]
            .attributes
            .push((name.to_string(), MockValue::Text(value.to_string())));
    }

    pub fn set_list_attribute(&mut self, id: usize, name: &str, values: &[&str]) {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.nodes[id]
            .attributes
            .push((name.to_string(), MockValue::List(values)));
    }

    /// Finds the first node (in id order) whose `names` attribute contains `name`.
    pub fn find_named(&self, name: &str) -> Option<MockNode<'_>> {
        (0..self.nodes.len())
            .map(|id| self.node(id))
            .find(|node| node.names().split(' ').any(|n| n == name))
    }

    /// Adds a docutils-style element carrying the standard list attributes.
    fn add_named(&mut self, parent: usize, tag: &str, name: &str) -> usize {
        let id = self.add_element(parent, tag);
        self.set_list_attribute(id, "ids", &[name]);
        self.set_list_attribute(id, "classes", &[]);
        self.set_list_attribute(id, "names", &[name]);
        self.set_list_attribute(id, "dupnames", &[]);
        self.set_list_attribute(id, "backrefs", &[]);
        id
    }

    /// Adds a section named `name` with a title holding the upper-cased name.
    pub fn add_section(&mut self, parent: usize, name: &str) -> usize {
        let section = self.add_named(parent, "section", name);
        let title = self.add_element(section, "title");
        self.add_text(title, &name.to_uppercase());
        section
    }
}

impl<'a> MockNode<'a> {
    /// The space-joined `names` attribute, empty when absent.
    pub fn names(&self) -> String {
        self.tree.nodes[self.id]
            .attributes
            .iter()
            .find(|(name, _)| name == "names")
            .map(|(_, value)| match value {
                MockValue::Text(text) => text.clone(),
                MockValue::List(items) => items.join(" "),
            })
            .unwrap_or_default()
    }
}

impl<'a> DocumentNode<'a> for MockNode<'a> {
    fn node_type(&self) -> NodeType {
        self.tree.nodes[self.id].node_type
    }

    fn type_tag(&self) -> &'a str {
        let tree = self.tree;
        &tree.nodes[self.id].tag
    }

    fn parent(&self) -> Option<Self> {
        self.tree.nodes[self.id].parent.map(|id| MockNode {
            id,
            tree: self.tree,
        })
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        let tree = self.tree;
        Box::new(
            tree.nodes[self.id]
                .children
                .iter()
                .map(move |&id| MockNode { id, tree }),
        )
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Attribute<'a>> + 'a> {
        let tree = self.tree;
        Box::new(tree.nodes[self.id].attributes.iter().map(|(name, value)| {
            let value = match value {
                MockValue::Text(text) => AttributeValue::Text(Cow::Borrowed(text.as_str())),
                MockValue::List(items) => AttributeValue::List(
                    items.iter().map(|item| Cow::Borrowed(item.as_str())).collect(),
                ),
            };
            Attribute {
                name: name.as_str(),
                value,
            }
        }))
    }

    fn text(&self) -> String {
        let data = &self.tree.nodes[self.id];
        match data.node_type {
            NodeType::Text | NodeType::Comment => data.content.clone(),
            _ => self.children().map(|child| child.text()).collect(),
        }
    }

    fn child_index(&self) -> Option<usize> {
        let parent = self.tree.nodes[self.id].parent?;
        self.tree.nodes[parent]
            .children
            .iter()
            .position(|&id| id == self.id)
    }
}

/// Builds a docutils-style document. Every element carrying `names` is
/// listed; unnamed titles and text nodes are omitted:
///
/// ```text
/// document a
///   subtitle b
///   section c            (title, comment)
///   section d
///   section e
///     section f
///       section g
///     section h
///     section i          <- address (1, 4, 3)
///       section j
///       section k
///         section l
///         section m
///       section n
///       section o
///       section p
///         section q
///         section r
///     section s
///     section t
///       section u
///   section v
///   section w
/// ```
pub fn create_test_tree() -> MockTree {
    let mut tree = MockTree::new("document");
    tree.set_list_attribute(0, "ids", &["a"]);
    tree.set_list_attribute(0, "names", &["a"]);

    let title = tree.add_element(0, "title");
    tree.add_text(title, "A");
    let subtitle = tree.add_named(0, "subtitle", "b");
    tree.add_text(subtitle, "B");

    let c = tree.add_section(0, "c");
    tree.add_comment(c, "a comment");
    tree.add_section(0, "d");

    let e = tree.add_section(0, "e");
    let f = tree.add_section(e, "f");
    tree.add_section(f, "g");
    tree.add_section(e, "h");
    let i = tree.add_section(e, "i");
    tree.add_section(i, "j");
    let k = tree.add_section(i, "k");
    tree.add_section(k, "l");
    tree.add_section(k, "m");
    tree.add_section(i, "n");
    tree.add_section(i, "o");
    let p = tree.add_section(i, "p");
    tree.add_section(p, "q");
    tree.add_section(p, "r");
    tree.add_section(e, "s");
    let t = tree.add_section(e, "t");
    tree.add_section(t, "u");

    tree.add_section(0, "v");
    tree.add_section(0, "w");
    tree
}

/// Returns the `names` of every named node in `nodes`, skipping unnamed ones.
pub fn names<'a, I>(nodes: I) -> Vec<String>
where
    I: IntoIterator<Item = crate::NodeRef<'a, MockNode<'a>>>,
{
    nodes
        .into_iter()
        .filter_map(|node| node.as_node().map(|n| n.names()))
        .filter(|names| !names.is_empty())
        .collect()
}
