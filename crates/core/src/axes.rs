//! The thirteen traversal axes and the node addressing scheme.
//!
//! Every axis maps a `(node, address)` pair to a lazy sequence of
//! `(node, address)` pairs. `traverse_backwards` always yields the exact
//! reverse of `traverse`, so positional predicates can be evaluated in either
//! direction.

use crate::ast::{Docpath, NodeTest, PathExpr, Step};
use crate::datasource::DocumentNode;
use crate::error::DocpathError;
use crate::node::{Address, Located, NodeRef};
use std::fmt;
use std::iter;
use std::str::FromStr;

pub type AxisIter<'a, N> = Box<dyn Iterator<Item = Located<'a, N>> + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Ancestor,
    AncestorOrSelf,
    Attribute,
    Child,
    Descendant,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Parent,
    Preceding,
    PrecedingSibling,
    Root,
    SelfAxis,
}

impl Axis {
    pub const ALL: [Axis; 13] = [
        Axis::Ancestor,
        Axis::AncestorOrSelf,
        Axis::Attribute,
        Axis::Child,
        Axis::Descendant,
        Axis::DescendantOrSelf,
        Axis::Following,
        Axis::FollowingSibling,
        Axis::Parent,
        Axis::Preceding,
        Axis::PrecedingSibling,
        Axis::Root,
        Axis::SelfAxis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::Attribute => "attribute",
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Following => "following",
            Axis::FollowingSibling => "following-sibling",
            Axis::Parent => "parent",
            Axis::Preceding => "preceding",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Root => "root",
            Axis::SelfAxis => "self",
        }
    }

    /// Looks an axis up by name. Underscores are accepted in place of hyphens.
    pub fn lookup(name: &str) -> Option<Axis> {
        Axis::ALL.into_iter().find(|axis| {
            let canonical = axis.name();
            canonical.len() == name.len()
                && canonical
                    .bytes()
                    .zip(name.bytes())
                    .all(|(c, n)| c == n || (c == b'-' && n == b'_'))
        })
    }

    pub fn from_name(name: &str) -> Result<Axis, DocpathError> {
        Axis::lookup(name).ok_or_else(|| DocpathError::UnknownAxis(name.to_string()))
    }

    /// A single-step path along this axis, e.g. `Axis::Child.step("section")`.
    pub fn step(self, node_test: impl Into<NodeTest>) -> Docpath {
        Docpath::new(PathExpr::Step(Step::new(self, node_test)))
    }

    pub fn traverse<'a, N>(self, node: NodeRef<'a, N>, address: Address) -> AxisIter<'a, N>
    where
        N: DocumentNode<'a> + 'a,
    {
        match self {
            Axis::SelfAxis => Box::new(iter::once((node, address))),
            Axis::Child => Box::new(
                node.children()
                    .enumerate()
                    .map(move |(index, child)| (child, address.child(index))),
            ),
            Axis::Parent => match node.parent() {
                Some(parent) => Box::new(iter::once((parent, address.parent()))),
                None => Box::new(iter::empty()),
            },
            Axis::Ancestor => Box::new(ancestors_or_self(node, address).skip(1)),
            Axis::AncestorOrSelf => Box::new(ancestors_or_self(node, address)),
            Axis::Descendant => Box::new(Descendants::new(&node, &address)),
            Axis::DescendantOrSelf => {
                let descendants = Descendants::new(&node, &address);
                Box::new(iter::once((node, address)).chain(descendants))
            }
            Axis::FollowingSibling => match sibling_position(&node) {
                Some((parent, index)) => Box::new(
                    parent
                        .children()
                        .enumerate()
                        .skip(index + 1)
                        .map(move |(i, sibling)| (sibling, address.sibling(i))),
                ),
                None => Box::new(iter::empty()),
            },
            Axis::PrecedingSibling => {
                let mut siblings = preceding_siblings(&node, &address);
                siblings.reverse();
                Box::new(siblings.into_iter())
            }
            Axis::Following => Box::new(
                Axis::AncestorOrSelf
                    .traverse(node, address)
                    .flat_map(|(ancestor, address)| {
                        Axis::FollowingSibling.traverse(ancestor, address)
                    })
                    .flat_map(|(sibling, address)| {
                        Axis::DescendantOrSelf.traverse(sibling, address)
                    }),
            ),
            Axis::Preceding => Box::new(
                Axis::AncestorOrSelf
                    .traverse(node, address)
                    .flat_map(|(ancestor, address)| {
                        Axis::PrecedingSibling.traverse(ancestor, address)
                    })
                    .flat_map(|(sibling, address)| {
                        Axis::DescendantOrSelf.traverse_backwards(sibling, address)
                    }),
            ),
            Axis::Attribute => Box::new(
                node.attributes()
                    .enumerate()
                    .map(move |(index, attribute)| (attribute, address.child(index))),
            ),
            Axis::Root => Box::new(iter::once((NodeRef::Node(node.document()), Address::root()))),
        }
    }

    pub fn traverse_backwards<'a, N>(self, node: NodeRef<'a, N>, address: Address) -> AxisIter<'a, N>
    where
        N: DocumentNode<'a> + 'a,
    {
        match self {
            Axis::SelfAxis | Axis::Parent | Axis::Root => self.traverse(node, address),
            Axis::Child => {
                let mut children = children_of(&node, &address);
                children.reverse();
                Box::new(children.into_iter())
            }
            Axis::AncestorOrSelf => Box::new(
                Axis::Ancestor
                    .traverse_backwards(node.clone(), address.clone())
                    .chain(iter::once((node, address))),
            ),
            Axis::Descendant => Box::new(ReverseDescendants::new(&node, &address)),
            Axis::DescendantOrSelf => {
                let descendants = ReverseDescendants::new(&node, &address);
                Box::new(descendants.chain(iter::once((node, address))))
            }
            Axis::PrecedingSibling => Box::new(preceding_siblings(&node, &address).into_iter()),
            Axis::Preceding => Box::new(
                Axis::AncestorOrSelf
                    .traverse_backwards(node, address)
                    .flat_map(|(ancestor, address)| {
                        Axis::PrecedingSibling.traverse_backwards(ancestor, address)
                    })
                    .flat_map(|(sibling, address)| {
                        Axis::DescendantOrSelf.traverse(sibling, address)
                    }),
            ),
            Axis::Ancestor
            | Axis::Attribute
            | Axis::Following
            | Axis::FollowingSibling => {
                let mut forward: Vec<_> = self.traverse(node, address).collect();
                forward.reverse();
                Box::new(forward.into_iter())
            }
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Axis {
    type Err = DocpathError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Axis::from_name(name)
    }
}

/// Computes a node's address by walking from the document root down to it.
pub fn node_address<'a, N>(node: &NodeRef<'a, N>) -> Address
where
    N: DocumentNode<'a> + 'a,
{
    let components: Vec<usize> = Axis::AncestorOrSelf
        .traverse_backwards(node.clone(), Address::default())
        .map(|(ancestor, _)| match ancestor.parent() {
            None => Address::ROOT_INDEX,
            Some(_) => ancestor.child_index().unwrap_or_default(),
        })
        .collect();
    Address::from(components)
}

fn ancestors_or_self<'a, N>(
    node: NodeRef<'a, N>,
    address: Address,
) -> impl Iterator<Item = Located<'a, N>> + 'a
where
    N: DocumentNode<'a> + 'a,
{
    iter::successors(Some((node, address)), |(node, address)| {
        node.parent().map(|parent| (parent, address.parent()))
    })
}

fn children_of<'a, N>(node: &NodeRef<'a, N>, address: &Address) -> Vec<Located<'a, N>>
where
    N: DocumentNode<'a> + 'a,
{
    node.children()
        .enumerate()
        .map(|(index, child)| (child, address.child(index)))
        .collect()
}

/// The parent and the child index of a node that has siblings.
/// Attribute nodes have none.
fn sibling_position<'a, N>(node: &NodeRef<'a, N>) -> Option<(NodeRef<'a, N>, usize)>
where
    N: DocumentNode<'a> + 'a,
{
    if node.as_attribute().is_some() {
        return None;
    }
    Some((node.parent()?, node.child_index()?))
}

/// Preceding siblings in document order.
fn preceding_siblings<'a, N>(node: &NodeRef<'a, N>, address: &Address) -> Vec<Located<'a, N>>
where
    N: DocumentNode<'a> + 'a,
{
    match sibling_position(node) {
        Some((parent, index)) => parent
            .children()
            .take(index)
            .enumerate()
            .map(|(i, sibling)| (sibling, address.sibling(i)))
            .collect(),
        None => Vec::new(),
    }
}

struct DescendantFrame<'a, N> {
    children: Box<dyn Iterator<Item = NodeRef<'a, N>> + 'a>,
    address: Address,
    next_index: usize,
}

/// Pre-order descendants, driven by an explicit stack of child iterators.
struct Descendants<'a, N> {
    stack: Vec<DescendantFrame<'a, N>>,
}

impl<'a, N: DocumentNode<'a> + 'a> Descendants<'a, N> {
    fn new(node: &NodeRef<'a, N>, address: &Address) -> Self {
        Self {
            stack: vec![DescendantFrame {
                children: node.children(),
                address: address.clone(),
                next_index: 0,
            }],
        }
    }
}

impl<'a, N: DocumentNode<'a> + 'a> Iterator for Descendants<'a, N> {
    type Item = Located<'a, N>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame.children.next() {
                Some(child) => {
                    let address = frame.address.child(frame.next_index);
                    frame.next_index += 1;
                    self.stack.push(DescendantFrame {
                        children: child.children(),
                        address: address.clone(),
                        next_index: 0,
                    });
                    return Some((child, address));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

struct ReverseFrame<'a, N> {
    children: std::vec::IntoIter<Located<'a, N>>,
    pending: Option<Located<'a, N>>,
}

/// Reverse pre-order descendants: last child's subtree first, each node
/// after its own descendants.
struct ReverseDescendants<'a, N> {
    stack: Vec<ReverseFrame<'a, N>>,
}

impl<'a, N: DocumentNode<'a> + 'a> ReverseDescendants<'a, N> {
    fn new(node: &NodeRef<'a, N>, address: &Address) -> Self {
        Self {
            stack: vec![ReverseFrame {
                children: Self::reversed_children(node, address),
                pending: None,
            }],
        }
    }

    fn reversed_children(
        node: &NodeRef<'a, N>,
        address: &Address,
    ) -> std::vec::IntoIter<Located<'a, N>> {
        let mut children = children_of(node, address);
        children.reverse();
        children.into_iter()
    }
}

impl<'a, N: DocumentNode<'a> + 'a> Iterator for ReverseDescendants<'a, N> {
    type Item = Located<'a, N>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if let Some((child, address)) = frame.children.next() {
                let children = Self::reversed_children(&child, &address);
                self.stack.push(ReverseFrame {
                    children,
                    pending: Some((child, address)),
                });
            } else if let Some(frame) = self.stack.pop()
                && let Some(pending) = frame.pending
            {
                return Some(pending);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::tests::{MockNode, MockTree, create_test_tree, names};

    fn start(tree: &MockTree) -> (NodeRef<'_, MockNode<'_>>, Address) {
        let node = NodeRef::Node(tree.find_named("i").unwrap());
        let address = node_address(&node);
        (node, address)
    }

    fn assert_names(tree: &MockTree, axis: Axis, forward: &[&str], backward: &[&str]) {
        let (node, address) = start(tree);
        let found = names(axis.traverse(node.clone(), address.clone()).map(|(n, _)| n));
        assert_eq!(found, forward, "{} forward", axis);
        let found = names(axis.traverse_backwards(node, address).map(|(n, _)| n));
        assert_eq!(found, backward, "{} backward", axis);
    }

    #[test]
    fn test_node_address() {
        let tree = create_test_tree();
        let (_, address) = start(&tree);
        assert_eq!(address, Address::from(vec![1, 4, 3]));
        assert_eq!(node_address(&NodeRef::Node(tree.root())), Address::root());
    }

    #[test]
    fn test_axis_lookup() {
        assert_eq!(Axis::from_name("following-sibling"), Ok(Axis::FollowingSibling));
        assert_eq!(Axis::from_name("following_sibling"), Ok(Axis::FollowingSibling));
        assert_eq!(Axis::from_name("self"), Ok(Axis::SelfAxis));
        assert_eq!(
            Axis::from_name("sideways"),
            Err(DocpathError::UnknownAxis("sideways".to_string()))
        );
        for axis in Axis::ALL {
            assert_eq!(axis.name().parse::<Axis>(), Ok(axis));
        }
    }

    #[test]
    fn test_traverse_ancestor() {
        let tree = create_test_tree();
        assert_names(&tree, Axis::Ancestor, &["e", "a"], &["a", "e"]);
        assert_names(&tree, Axis::AncestorOrSelf, &["i", "e", "a"], &["a", "e", "i"]);
    }

    #[test]
    fn test_traverse_attribute() {
        let tree = create_test_tree();
        let (node, address) = start(&tree);
        let mut found: Vec<_> = Axis::Attribute
            .traverse(node, address.clone())
            .map(|(n, a)| {
                assert_eq!(a.parent(), address);
                n.type_tag()
            })
            .collect();
        found.sort();
        assert_eq!(found, ["backrefs", "classes", "dupnames", "ids", "names"]);
    }

    #[test]
    fn test_traverse_child() {
        let tree = create_test_tree();
        assert_names(
            &tree,
            Axis::Child,
            &["j", "k", "n", "o", "p"],
            &["p", "o", "n", "k", "j"],
        );
    }

    #[test]
    fn test_traverse_descendant() {
        let tree = create_test_tree();
        let forward = ["j", "k", "l", "m", "n", "o", "p", "q", "r"];
        let mut backward = forward;
        backward.reverse();
        assert_names(&tree, Axis::Descendant, &forward, &backward);

        let forward = ["i", "j", "k", "l", "m", "n", "o", "p", "q", "r"];
        let mut backward = forward;
        backward.reverse();
        assert_names(&tree, Axis::DescendantOrSelf, &forward, &backward);
    }

    #[test]
    fn test_traverse_following() {
        let tree = create_test_tree();
        assert_names(
            &tree,
            Axis::Following,
            &["s", "t", "u", "v", "w"],
            &["w", "v", "u", "t", "s"],
        );
        assert_names(&tree, Axis::FollowingSibling, &["s", "t"], &["t", "s"]);
    }

    #[test]
    fn test_traverse_parent_root_self() {
        let tree = create_test_tree();
        assert_names(&tree, Axis::Parent, &["e"], &["e"]);
        assert_names(&tree, Axis::Root, &["a"], &["a"]);
        assert_names(&tree, Axis::SelfAxis, &["i"], &["i"]);
    }

    #[test]
    fn test_traverse_preceding() {
        let tree = create_test_tree();
        assert_names(
            &tree,
            Axis::Preceding,
            &["h", "g", "f", "d", "c", "b"],
            &["b", "c", "d", "f", "g", "h"],
        );
        assert_names(&tree, Axis::PrecedingSibling, &["h", "f"], &["f", "h"]);
    }

    #[test]
    fn test_backwards_is_exact_reverse_for_every_axis() {
        let tree = create_test_tree();
        let root = NodeRef::Node(tree.root());
        let everything: Vec<_> = Axis::DescendantOrSelf.traverse(root, Address::root()).collect();
        for (node, address) in &everything {
            for axis in Axis::ALL {
                let mut forward: Vec<_> = axis.traverse(node.clone(), address.clone()).collect();
                forward.reverse();
                let backward: Vec<_> = axis
                    .traverse_backwards(node.clone(), address.clone())
                    .collect();
                assert_eq!(forward, backward, "{} from {}", axis, address);
            }
        }
    }

    #[test]
    fn test_addresses_agree_with_node_address() {
        let tree = create_test_tree();
        let root = NodeRef::Node(tree.root());
        let everything: Vec<_> = Axis::DescendantOrSelf.traverse(root, Address::root()).collect();
        for (node, address) in &everything {
            assert_eq!(&node_address(node), address);
            for axis in Axis::ALL {
                if axis == Axis::Attribute {
                    continue;
                }
                for (reached, reached_address) in axis.traverse(node.clone(), address.clone()) {
                    assert_eq!(node_address(&reached), reached_address, "{} from {}", axis, address);
                }
            }
        }
    }

    #[test]
    fn test_address_order_is_document_order() {
        let tree = create_test_tree();
        let root = NodeRef::Node(tree.root());
        let pre_order: Vec<_> = Axis::DescendantOrSelf.traverse(root, Address::root()).collect();
        let mut sorted = pre_order.clone();
        sorted.reverse();
        sorted.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(sorted, pre_order);
        assert_eq!(pre_order.len(), tree.len());
    }
}
