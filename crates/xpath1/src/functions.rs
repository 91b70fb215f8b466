//! The XPath 1.0 core function library.
//!
//! Arity is checked once up front against [`arity`]; the implementations then
//! pull their arguments off an iterator in order.

use super::engine::{EvaluationContext, XPathValue, string_to_number};
use crate::datasource::DataSourceNode;
use crate::error::XPathError;

type Args<N> = std::vec::IntoIter<XPathValue<N>>;

/// Accepted argument counts as `(min, max)`, or `None` for an unknown function.
fn arity(name: &str) -> Option<(usize, usize)> {
    let range = match name {
        "position" | "last" | "true" | "false" => (0, 0),
        "local-name" | "name" | "string" | "string-length" | "normalize-space" | "number" => {
            (0, 1)
        }
        "count" | "sum" | "not" | "boolean" | "floor" | "ceiling" | "round" => (1, 1),
        "starts-with" | "contains" | "substring-before" | "substring-after" => (2, 2),
        "substring" => (2, 3),
        "translate" => (3, 3),
        "concat" => (2, usize::MAX),
        _ => return None,
    };
    Some(range)
}

fn arity_message(min: usize, max: usize) -> String {
    match (min, max) {
        (1, 1) => "Expected 1 argument".to_string(),
        (n, m) if n == m => format!("Expected {} arguments", n),
        (n, usize::MAX) => format!("Expected at least {} arguments", n),
        (n, m) => format!("Expected {} or {} arguments", n, m),
    }
}

fn unknown(name: &str) -> XPathError {
    XPathError::function(&format!("{}()", name), "Unknown XPath function")
}

pub fn evaluate_function<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError> {
    let (min, max) = arity(name).ok_or_else(|| unknown(name))?;
    if !(min..=max).contains(&args.len()) {
        return Err(XPathError::function(
            &format!("{}()", name),
            arity_message(min, max),
        ));
    }
    let context = e_ctx.context_node;
    let mut args = args.into_iter();

    let value = match name {
        "position" => XPathValue::Number(e_ctx.context_position as f64),
        "last" => XPathValue::Number(e_ctx.context_size as f64),
        "count" => XPathValue::Number(node_set(name, &mut args)?.len() as f64),
        "sum" => XPathValue::Number(
            node_set(name, &mut args)?
                .iter()
                .map(|node| string_to_number(&node.string_value()))
                .sum(),
        ),
        "name" | "local-name" => {
            let node = match args.next() {
                None => Some(context),
                Some(value) => first_node(name, value)?,
            };
            let qname = node.and_then(|n| n.name());
            let text = match qname {
                Some(q) if name == "name" => q.to_string(),
                Some(q) => q.local_part.to_string(),
                None => String::new(),
            };
            XPathValue::String(text)
        }

        "string" => XPathValue::String(string_arg(&mut args, context)),
        "string-length" => {
            XPathValue::Number(string_arg(&mut args, context).chars().count() as f64)
        }
        "normalize-space" => {
            let text = string_arg(&mut args, context);
            XPathValue::String(text.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        "concat" => XPathValue::String(args.map(|v| v.to_string()).collect()),
        "starts-with" | "contains" | "substring-before" | "substring-after" => {
            let haystack = string_arg(&mut args, context);
            let needle = string_arg(&mut args, context);
            let split = haystack.split_once(needle.as_str());
            match name {
                "starts-with" => XPathValue::Boolean(haystack.starts_with(&needle)),
                "contains" => XPathValue::Boolean(split.is_some()),
                "substring-before" => {
                    XPathValue::String(split.map(|(before, _)| before.to_string()).unwrap_or_default())
                }
                _ => XPathValue::String(split.map(|(_, after)| after.to_string()).unwrap_or_default()),
            }
        }
        "substring" => {
            let text = string_arg(&mut args, context);
            let first = xpath_round(number_arg(&mut args));
            let end = args
                .next()
                .map_or(f64::INFINITY, |len| first + xpath_round(len.to_number()));
            XPathValue::String(substring(&text, first, end))
        }
        "translate" => {
            let text = string_arg(&mut args, context);
            let from: Vec<char> = string_arg(&mut args, context).chars().collect();
            let to: Vec<char> = string_arg(&mut args, context).chars().collect();
            XPathValue::String(
                text.chars()
                    .filter_map(|c| match from.iter().position(|&f| f == c) {
                        Some(index) => to.get(index).copied(),
                        None => Some(c),
                    })
                    .collect(),
            )
        }

        "true" => XPathValue::Boolean(true),
        "false" => XPathValue::Boolean(false),
        "not" => XPathValue::Boolean(!args.next().is_some_and(|v| v.to_bool())),
        "boolean" => XPathValue::Boolean(args.next().is_some_and(|v| v.to_bool())),

        "number" => XPathValue::Number(match args.next() {
            Some(value) => value.to_number(),
            None => string_to_number(&context.string_value()),
        }),
        "floor" => XPathValue::Number(number_arg(&mut args).floor()),
        "ceiling" => XPathValue::Number(number_arg(&mut args).ceil()),
        "round" => XPathValue::Number(xpath_round(number_arg(&mut args))),

        _ => return Err(unknown(name)),
    };
    Ok(value)
}

/// The next argument as a string; an absent optional argument means the context node.
fn string_arg<'a, N: DataSourceNode<'a>>(args: &mut Args<N>, context: N) -> String {
    match args.next() {
        Some(value) => value.to_string(),
        None => context.string_value(),
    }
}

fn number_arg<'a, N: DataSourceNode<'a>>(args: &mut Args<N>) -> f64 {
    args.next().map_or(f64::NAN, |v| v.to_number())
}

fn node_set<'a, N: DataSourceNode<'a>>(name: &str, args: &mut Args<N>) -> Result<Vec<N>, XPathError> {
    match args.next() {
        Some(XPathValue::NodeSet(nodes)) => Ok(nodes),
        Some(other) => Err(not_a_node_set(name, &other)),
        None => Ok(Vec::new()),
    }
}

/// The first node of a node-set argument in document order.
fn first_node<'a, N: DataSourceNode<'a>>(
    name: &str,
    value: XPathValue<N>,
) -> Result<Option<N>, XPathError> {
    match value {
        XPathValue::NodeSet(nodes) => Ok(nodes.into_iter().min()),
        other => Err(not_a_node_set(name, &other)),
    }
}

fn not_a_node_set<'a, N: DataSourceNode<'a>>(name: &str, value: &XPathValue<N>) -> XPathError {
    XPathError::TypeError(format!(
        "{}() argument must be a node-set, got {:?}",
        name, value
    ))
}

/// Characters at 1-based positions `p` with `first <= p < end`.
fn substring(text: &str, first: f64, end: f64) -> String {
    text.chars()
        .zip(1u32..)
        .filter(|&(_, pos)| {
            let pos = f64::from(pos);
            pos >= first && pos < end
        })
        .map(|(c, _)| c)
        .collect()
}

/// Halves round towards positive infinity.
fn xpath_round(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() || n == 0.0 {
        n
    } else {
        (n + 0.5).floor()
    }
}
