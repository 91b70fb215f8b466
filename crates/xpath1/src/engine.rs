//! The evaluation engine for executing a parsed XPath AST against a generic `DataSourceNode`.

use super::ast::{Axis, BinaryOperator, Expression, NodeTest, PathExpr, PathOrigin, Step};
use super::{axes, functions, operators};
use crate::datasource::{DataSourceNode, NodeType};
use crate::error::XPathError;
use crate::parser::parse_expression;
use log::trace;
use std::collections::HashSet;
use std::fmt;

/// Represents the possible result types of an XPath expression evaluation.
#[derive(Debug, Clone)]
pub enum XPathValue<N> {
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<'a, N: DataSourceNode<'a>> XPathValue<N> {
    /// Coerces the XPath value to a boolean as per XPath 1.0 rules.
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    /// Coerces the XPath value to a number as per XPath 1.0 rules.
    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::String(s) => string_to_number(s),
            XPathValue::Boolean(b) => f64::from(u8::from(*b)),
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map(|n| string_to_number(&n.string_value()))
                .unwrap_or(f64::NAN),
        }
    }
}

impl<'a, N: DataSourceNode<'a>> fmt::Display for XPathValue<N> {
    /// Coerces the XPath value to a string as per XPath 1.0 rules.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => write!(
                f,
                "{}",
                nodes.first().map(|n| n.string_value()).unwrap_or_default()
            ),
            XPathValue::String(s) => write!(f, "{}", s),
            XPathValue::Number(n) => write!(f, "{}", number_to_string(*n)),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// XPath `number()` of a string: optional minus, digits and at most one point.
/// Anything else, exponents and `inf` included, is NaN.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let valid = !digits.is_empty()
        && digits != "."
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if !valid {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// XPath `string()` of a number.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// Evaluation state: the context node and its proximity position within the
/// current node list.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<N> {
    pub context_node: N,
    pub root_node: N,
    /// 1-based
    pub context_position: usize,
    pub context_size: usize,
}

impl<N: Copy> EvaluationContext<N> {
    pub fn new(context_node: N, root_node: N, context_position: usize, context_size: usize) -> Self {
        Self {
            context_node,
            root_node,
            context_position,
            context_size,
        }
    }

    fn at(&self, node: N, position: usize, size: usize) -> Self {
        Self::new(node, self.root_node, position, size)
    }
}

/// Parses `xpath` and evaluates it with `root` as both the context and the root node.
///
/// The result must be a node-set; it is returned in document order without
/// duplicates.
pub fn select_nodes<'a, N>(xpath: &str, root: N) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let expr = parse_expression(xpath)?;
    let e_ctx = EvaluationContext::new(root, root, 1, 1);
    let mut nodes = node_set(evaluate(&expr, &e_ctx)?)?;
    nodes.sort();
    nodes.dedup();
    trace!("'{}' selected {} node(s)", xpath, nodes.len());
    Ok(nodes)
}

/// Evaluates a compiled expression and returns a concrete `XPathValue`.
pub fn evaluate<'a, N>(
    expr: &Expression,
    e_ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::Number(n) => Ok(XPathValue::Number(*n)),
        Expression::Path(path) => Ok(XPathValue::NodeSet(evaluate_path(path, e_ctx)?)),
        Expression::Variable(name) => Err(XPathError::UnknownVariable(name.clone())),
        Expression::Call { name, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, e_ctx))
                .collect::<Result<Vec<_>, _>>()?;
            functions::evaluate_function(name, args, e_ctx)
        }
        Expression::Binary(left, op, right) => {
            let left = evaluate(left, e_ctx)?;
            match op {
                BinaryOperator::And if !left.to_bool() => Ok(XPathValue::Boolean(false)),
                BinaryOperator::Or if left.to_bool() => Ok(XPathValue::Boolean(true)),
                _ => operators::evaluate(*op, left, evaluate(right, e_ctx)?),
            }
        }
        Expression::Negate(inner) => Ok(XPathValue::Number(-evaluate(inner, e_ctx)?.to_number())),
        Expression::Filter { base, predicates } => {
            let mut nodes = node_set(evaluate(base, e_ctx)?)?;
            nodes.sort();
            nodes.dedup();
            Ok(XPathValue::NodeSet(apply_predicates(&nodes, predicates, e_ctx)?))
        }
    }
}

fn node_set<N>(value: XPathValue<N>) -> Result<Vec<N>, XPathError> {
    match value {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        _ => Err(XPathError::TypeError(
            "Expression must evaluate to a node-set.".to_string(),
        )),
    }
}

fn evaluate_path<'a, N>(path: &PathExpr, e_ctx: &EvaluationContext<N>) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut nodes = match &path.origin {
        PathOrigin::Context => vec![e_ctx.context_node],
        PathOrigin::Root => vec![e_ctx.root_node],
        PathOrigin::Expr(base) => node_set(evaluate(base, e_ctx)?)?,
    };
    for step in &path.steps {
        nodes = evaluate_step(step, &nodes, e_ctx)?;
    }
    Ok(nodes)
}

/// Evaluates one step for every context node and merges the results into
/// document order. Predicates see positions relative to each context node.
fn evaluate_step<'a, N>(
    step: &Step,
    context_nodes: &[N],
    e_ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut merged = Vec::new();
    let mut merged_seen = HashSet::new();
    for &node in context_nodes {
        let mut axis_nodes = axes::collect(step.axis, node);
        axis_nodes.sort();
        if step.axis.is_reverse() {
            axis_nodes.reverse();
        }
        let tested = filter_by_node_test(&axis_nodes, &step.test, step.axis);
        for selected in apply_predicates(&tested, &step.predicates, e_ctx)? {
            if merged_seen.insert(selected) {
                merged.push(selected);
            }
        }
    }
    merged.sort();
    Ok(merged)
}

/// Name and wildcard tests only match the axis' principal node type.
fn filter_by_node_test<'a, N>(nodes: &[N], test: &NodeTest, axis: Axis) -> Vec<N>
where
    N: DataSourceNode<'a> + 'a,
{
    let principal = match axis {
        Axis::Attribute => NodeType::Attribute,
        _ => NodeType::Element,
    };
    nodes
        .iter()
        .filter(|&node| match test {
            NodeTest::AnyName => node.node_type() == principal,
            NodeTest::Name(name) => {
                node.node_type() == principal
                    && node.name().is_some_and(|q_name| q_name.matches(name))
            }
            NodeTest::AnyLocalName(prefix) => {
                node.node_type() == principal
                    && node
                        .name()
                        .is_some_and(|q_name| q_name.prefix == Some(prefix.as_str()))
            }
            NodeTest::Text => node.node_type() == NodeType::Text,
            NodeTest::Comment => node.node_type() == NodeType::Comment,
            NodeTest::ProcessingInstruction(target) => {
                node.node_type() == NodeType::ProcessingInstruction
                    && target.as_deref().is_none_or(|target| {
                        node.name().is_some_and(|q_name| q_name.matches(target))
                    })
            }
            NodeTest::AnyNode => true,
        })
        .copied()
        .collect()
}

/// Applies predicates in turn; a numeric result keeps the node at that position.
fn apply_predicates<'a, N>(
    nodes: &[N],
    predicates: &[Expression],
    e_ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut final_nodes = nodes.to_vec();
    for predicate in predicates {
        let mut predicate_results = Vec::new();
        let context_size = final_nodes.len();
        for (i, node) in final_nodes.iter().enumerate() {
            let predicate_e_ctx = e_ctx.at(*node, i + 1, context_size);
            let result = evaluate(predicate, &predicate_e_ctx)?;
            let keep = match result {
                XPathValue::Number(n) => n == (i + 1) as f64,
                _ => result.to_bool(),
            };
            if keep {
                predicate_results.push(*node);
            }
        }
        final_nodes = predicate_results;
    }
    Ok(final_nodes)
}
