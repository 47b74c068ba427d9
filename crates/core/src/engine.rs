//! Evaluates a compiled `Docpath` against a generic `DocumentNode` tree.

use crate::ast::{Docpath, NodeTest, PathExpr, Step};
use crate::axes::node_address;
use crate::datasource::{DocumentNode, NodeType};
use crate::error::DocpathError;
use crate::node::{Address, Located, NodeRef};
use crate::predicate::Predicate;
use log::trace;

impl Docpath {
    /// Evaluates the path from `start`, returning matches in traversal order.
    pub fn traverse<'a, N>(&self, start: N) -> Result<Vec<Located<'a, N>>, DocpathError>
    where
        N: DocumentNode<'a> + 'a,
    {
        let start = NodeRef::Node(start);
        let address = node_address(&start);
        self.traverse_from(start, address)
    }

    /// Evaluates the path from an already located item.
    pub fn traverse_from<'a, N>(
        &self,
        start: NodeRef<'a, N>,
        address: Address,
    ) -> Result<Vec<Located<'a, N>>, DocpathError>
    where
        N: DocumentNode<'a> + 'a,
    {
        evaluate(&self.expr, &[], vec![(start, address)])
    }

    /// All matches in document order. Duplicates reached through different
    /// branches are kept.
    pub fn findall<'a, N>(&self, start: N) -> Result<Vec<NodeRef<'a, N>>, DocpathError>
    where
        N: DocumentNode<'a> + 'a,
    {
        Ok(in_document_order(self.traverse(start)?))
    }

    pub fn findall_from<'a, N>(
        &self,
        start: NodeRef<'a, N>,
        address: Address,
    ) -> Result<Vec<NodeRef<'a, N>>, DocpathError>
    where
        N: DocumentNode<'a> + 'a,
    {
        Ok(in_document_order(self.traverse_from(start, address)?))
    }

    /// The first match in document order.
    pub fn find<'a, N>(&self, start: N) -> Result<Option<NodeRef<'a, N>>, DocpathError>
    where
        N: DocumentNode<'a> + 'a,
    {
        Ok(self.findall(start)?.into_iter().next())
    }
}

impl NodeTest {
    pub fn matches<'a, N>(&self, node: &NodeRef<'a, N>) -> bool
    where
        N: DocumentNode<'a> + 'a,
    {
        if let NodeRef::Attribute(attribute) = node {
            return match self {
                NodeTest::Node | NodeTest::Element => true,
                NodeTest::Text => false,
                NodeTest::Name(name) => attribute.name == name,
            };
        }
        match self {
            NodeTest::Node => true,
            NodeTest::Element => !matches!(node.node_type(), NodeType::Text | NodeType::Comment),
            NodeTest::Text => node.node_type() == NodeType::Text,
            NodeTest::Name(name) => node.type_tag() == name,
        }
    }
}

fn in_document_order<'a, N>(mut located: Vec<Located<'a, N>>) -> Vec<NodeRef<'a, N>> {
    located.sort_by(|a, b| a.1.cmp(&b.1));
    located.into_iter().map(|(node, _)| node).collect()
}

fn evaluate<'a, N>(
    expr: &PathExpr,
    predicates: &[&Predicate],
    input: Vec<Located<'a, N>>,
) -> Result<Vec<Located<'a, N>>, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    match expr {
        PathExpr::Step(step) => evaluate_step(step, predicates, input),
        PathExpr::Sequence(parts) => evaluate_sequence(parts, predicates, input),
        PathExpr::Union(branches) => {
            let mut merged = Vec::new();
            for branch in branches {
                merged.extend(evaluate(branch, &[], input.clone())?);
            }
            apply_predicates(predicates, merged)
        }
        PathExpr::Predicate(predicate) => {
            Err(DocpathError::DetachedPredicate(predicate.to_string()))
        }
    }
}

fn evaluate_step<'a, N>(
    step: &Step,
    predicates: &[&Predicate],
    input: Vec<Located<'a, N>>,
) -> Result<Vec<Located<'a, N>>, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    let mut output = Vec::new();
    for (node, address) in input {
        let candidates: Vec<_> = step
            .axis
            .traverse(node, address)
            .filter(|(candidate, _)| step.node_test.matches(candidate))
            .collect();
        // Predicates see the candidates of one context node at a time.
        output.extend(apply_predicates(predicates, candidates)?);
    }
    trace!("step {} selected {} nodes", step, output.len());
    Ok(output)
}

fn evaluate_sequence<'a, N>(
    parts: &[PathExpr],
    predicates: &[&Predicate],
    input: Vec<Located<'a, N>>,
) -> Result<Vec<Located<'a, N>>, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    let mut grouped: Vec<(&PathExpr, Vec<&Predicate>)> = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            PathExpr::Predicate(predicate) => match grouped.last_mut() {
                Some((_, bound)) => bound.push(predicate),
                None => return Err(DocpathError::DetachedPredicate(predicate.to_string())),
            },
            other => grouped.push((other, Vec::new())),
        }
    }

    let mut current = input;
    for (part, bound) in grouped {
        current = evaluate(part, &bound, current)?;
    }
    apply_predicates(predicates, current)
}

fn apply_predicates<'a, N>(
    predicates: &[&Predicate],
    mut candidates: Vec<Located<'a, N>>,
) -> Result<Vec<Located<'a, N>>, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    for predicate in predicates {
        candidates = predicate.filter(candidates)?;
    }
    Ok(candidates)
}
