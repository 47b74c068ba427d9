//! Defines the path expression model: steps, sequences, unions and attached predicates.

use crate::axes::Axis;
use crate::error::DocpathError;
use crate::predicate::Predicate;
use std::fmt;
use std::ops::{BitOr, Div};

/// A test applied to the nodes an axis produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeTest {
    /// Any node.
    Node,
    /// Anything but text and comment nodes.
    Element,
    /// Text nodes only.
    Text,
    /// A type tag, or an attribute name on the attribute axis.
    Name(String),
}

impl From<&str> for NodeTest {
    fn from(test: &str) -> Self {
        match test {
            "node" => NodeTest::Node,
            "element" => NodeTest::Element,
            "text" => NodeTest::Text,
            name => NodeTest::Name(name.to_string()),
        }
    }
}

impl From<String> for NodeTest {
    fn from(test: String) -> Self {
        NodeTest::from(test.as_str())
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Node => f.write_str("node"),
            NodeTest::Element => f.write_str("element"),
            NodeTest::Text => f.write_str("text"),
            NodeTest::Name(name) => f.write_str(name),
        }
    }
}

/// An axis paired with a node test, e.g. `child::section`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
}

impl Step {
    pub fn new(axis: Axis, node_test: impl Into<NodeTest>) -> Self {
        Self {
            axis,
            node_test: node_test.into(),
        }
    }

    fn is_root(&self) -> bool {
        self.axis == Axis::Root && self.node_test == NodeTest::Node
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.axis, self.node_test)
    }
}

/// One node of a path expression tree.
///
/// Inside a `Sequence`, a `Predicate` binds to the part right before it.
#[derive(Debug, Clone, PartialEq)]
pub enum PathExpr {
    Step(Step),
    Predicate(Predicate),
    Sequence(Vec<PathExpr>),
    Union(Vec<PathExpr>),
}

impl PathExpr {
    fn into_sequence(self) -> Vec<PathExpr> {
        match self {
            PathExpr::Sequence(parts) => parts,
            other => vec![other],
        }
    }

    fn into_branches(self) -> Vec<PathExpr> {
        match self {
            PathExpr::Union(branches) => branches,
            other => vec![other],
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            PathExpr::Sequence(parts) | PathExpr::Union(parts) => parts.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpr::Step(step) => write!(f, "{}", step),
            PathExpr::Predicate(predicate) => write!(f, "[{}]", predicate),
            PathExpr::Sequence(parts) => {
                // `root::node/x` renders as `/x`.
                let absolute = matches!(
                    parts.as_slice(),
                    [PathExpr::Step(first), second, ..]
                        if first.is_root() && !matches!(second, PathExpr::Predicate(_))
                );
                for (i, part) in parts.iter().enumerate() {
                    if i == 0 && absolute {
                        continue;
                    }
                    if i > 0 && !matches!(part, PathExpr::Predicate(_)) {
                        f.write_str("/")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
            PathExpr::Union(branches) => {
                f.write_str("(")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", branch)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A compiled path expression.
///
/// Immutable once built; composition returns new paths. Evaluation lives in
/// [`crate::engine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Docpath {
    pub(crate) expr: PathExpr,
}

impl Docpath {
    pub fn new(expr: PathExpr) -> Self {
        Self { expr }
    }

    /// The path with no parts; it selects its start node unchanged.
    pub fn empty() -> Self {
        Self::new(PathExpr::Sequence(Vec::new()))
    }

    pub fn expr(&self) -> &PathExpr {
        &self.expr
    }

    pub fn into_expr(self) -> PathExpr {
        self.expr
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_empty()
    }

    /// `self/other`: appends the parts of `other` to those of `self`.
    pub fn concat(self, other: Docpath) -> Docpath {
        let mut parts = self.expr.into_sequence();
        parts.extend(other.expr.into_sequence());
        Docpath::new(PathExpr::Sequence(parts))
    }

    /// `self//other`: inserts a `descendant-or-self::node` step between both sides.
    pub fn descendant(self, other: Docpath) -> Docpath {
        self.concat(Axis::DescendantOrSelf.step(NodeTest::Node))
            .concat(other)
    }

    /// `self|other`: a single alternation holding the branches of both sides.
    pub fn union(self, other: Docpath) -> Docpath {
        let mut branches = self.expr.into_branches();
        branches.extend(other.expr.into_branches());
        Docpath::new(PathExpr::Union(branches))
    }

    /// `self[predicate]`: binds `predicate` to the last part of this path.
    pub fn with_predicate(self, predicate: Predicate) -> Result<Docpath, DocpathError> {
        if self.is_empty() {
            return Err(DocpathError::DetachedPredicate(predicate.to_string()));
        }
        let mut parts = self.expr.into_sequence();
        parts.push(PathExpr::Predicate(predicate));
        Ok(Docpath::new(PathExpr::Sequence(parts)))
    }
}

impl From<Step> for Docpath {
    fn from(step: Step) -> Self {
        Docpath::new(PathExpr::Step(step))
    }
}

impl fmt::Display for Docpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl Div for Docpath {
    type Output = Docpath;

    fn div(self, rhs: Docpath) -> Docpath {
        self.concat(rhs)
    }
}

impl Div for &Docpath {
    type Output = Docpath;

    fn div(self, rhs: &Docpath) -> Docpath {
        self.clone().concat(rhs.clone())
    }
}

impl BitOr for Docpath {
    type Output = Docpath;

    fn bitor(self, rhs: Docpath) -> Docpath {
        self.union(rhs)
    }
}

impl BitOr for &Docpath {
    type Output = Docpath;

    fn bitor(self, rhs: &Docpath) -> Docpath {
        self.clone().union(rhs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docpath_creation() {
        let path = Axis::Child.step("section");
        assert_eq!(path.to_string(), "child::section");
    }

    #[test]
    fn test_docpath_creation_steps() {
        let path = Docpath::new(PathExpr::Sequence(vec![
            PathExpr::Step(Step::new(Axis::Root, "node")),
            PathExpr::Step(Step::new(Axis::Child, "section")),
        ]));
        assert_eq!(path.to_string(), "/child::section");
    }

    #[test]
    fn test_docpath_creation_union() {
        let path = Docpath::new(PathExpr::Union(vec![
            PathExpr::Step(Step::new(Axis::Root, "node")),
            PathExpr::Step(Step::new(Axis::Child, "section")),
        ]));
        assert_eq!(path.to_string(), "(root::node|child::section)");
    }

    #[test]
    fn test_lone_root_step_is_not_stripped() {
        assert_eq!(Axis::Root.step("node").to_string(), "root::node");
        let path = Axis::Root
            .step("node")
            .with_predicate(Predicate::new("1"))
            .unwrap();
        assert_eq!(path.to_string(), "root::node[1]");
    }

    #[test]
    fn test_node_test_from_str() {
        assert_eq!(NodeTest::from("node"), NodeTest::Node);
        assert_eq!(NodeTest::from("element"), NodeTest::Element);
        assert_eq!(NodeTest::from("text"), NodeTest::Text);
        assert_eq!(NodeTest::from("section"), NodeTest::Name("section".into()));
    }

    #[test]
    fn test_concat_flattens_sequences() {
        let left = Axis::Child.step("a") / Axis::Child.step("b");
        let path = &left / &Axis::Child.step("c");
        assert_eq!(path.to_string(), "child::a/child::b/child::c");
        match path.expr() {
            PathExpr::Sequence(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected a sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_descendant_inserts_step() {
        let path = Axis::Root.step("node").descendant(Axis::Child.step("section"));
        assert_eq!(path.to_string(), "/descendant-or-self::node/child::section");
    }

    #[test]
    fn test_union_flattens_both_sides() {
        let left = Axis::Child.step("a") | Axis::Child.step("b");
        let right = Axis::Child.step("c") | Axis::Child.step("d");
        let path = left | right;
        assert_eq!(
            path.to_string(),
            "(child::a|child::b|child::c|child::d)"
        );
        match path.expr() {
            PathExpr::Union(branches) => assert_eq!(branches.len(), 4),
            other => panic!("expected a union, got {:?}", other),
        }
    }

    #[test]
    fn test_union_inside_sequence() {
        let union = Axis::Child.step("section") | Axis::Child.step("paragraph");
        let path = Axis::Child.step("node") / union / Axis::Child.step("node");
        assert_eq!(
            path.to_string(),
            "child::node/(child::section|child::paragraph)/child::node"
        );
    }

    #[test]
    fn test_predicates_render_without_separator() {
        let path = Axis::Child
            .step("section")
            .with_predicate(Predicate::new("@name == \"n\""))
            .and_then(|p| p.with_predicate(Predicate::new("1")))
            .unwrap();
        assert_eq!(path.to_string(), "child::section[attribute.name == \"n\"][1]");
    }

    #[test]
    fn test_predicate_on_empty_path_is_detached() {
        let result = Docpath::empty().with_predicate(Predicate::new("1"));
        assert_eq!(result, Err(DocpathError::DetachedPredicate("1".to_string())));
    }
}
