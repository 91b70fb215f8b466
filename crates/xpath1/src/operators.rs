//! Binary operator semantics: logic, comparison, arithmetic and union.

use crate::ast::BinaryOperator;
use crate::datasource::DataSourceNode;
use crate::engine::{XPathValue, string_to_number};
use crate::error::XPathError;

pub fn evaluate<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match op {
        BinaryOperator::Or => Ok(XPathValue::Boolean(left.to_bool() || right.to_bool())),
        BinaryOperator::And => Ok(XPathValue::Boolean(left.to_bool() && right.to_bool())),
        BinaryOperator::Equals
        | BinaryOperator::NotEquals
        | BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => Ok(XPathValue::Boolean(compare(op, &left, &right))),
        BinaryOperator::Plus => Ok(XPathValue::Number(left.to_number() + right.to_number())),
        BinaryOperator::Minus => Ok(XPathValue::Number(left.to_number() - right.to_number())),
        BinaryOperator::Multiply => Ok(XPathValue::Number(left.to_number() * right.to_number())),
        BinaryOperator::Divide => Ok(XPathValue::Number(left.to_number() / right.to_number())),
        BinaryOperator::Modulo => Ok(XPathValue::Number(left.to_number() % right.to_number())),
        BinaryOperator::Union => match (left, right) {
            (XPathValue::NodeSet(mut l), XPathValue::NodeSet(r)) => {
                l.extend(r);
                l.sort();
                l.dedup();
                Ok(XPathValue::NodeSet(l))
            }
            _ => Err(XPathError::TypeError(
                "Union operands must be node-sets".to_string(),
            )),
        },
    }
}

/// One side of a comparison after node-sets have been split into their members.
enum Atom {
    Str(String),
    Num(f64),
    Bool(bool),
}

fn compare<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(l), XPathValue::NodeSet(r)) => {
            let right_values: Vec<String> = r.iter().map(|n| n.string_value()).collect();
            l.iter().any(|ln| {
                let lv = ln.string_value();
                right_values.iter().any(|rv| {
                    compare_atoms(op, &Atom::Str(lv.clone()), &Atom::Str(rv.clone()))
                })
            })
        }
        // A node-set compared with a boolean is compared as a whole.
        (XPathValue::NodeSet(_), XPathValue::Boolean(_))
        | (XPathValue::Boolean(_), XPathValue::NodeSet(_)) => compare_atoms(
            op,
            &Atom::Bool(left.to_bool()),
            &Atom::Bool(right.to_bool()),
        ),
        (XPathValue::NodeSet(nodes), other) => nodes.iter().any(|n| {
            compare_atoms(op, &node_atom(n.string_value(), other), &scalar_atom(other))
        }),
        (other, XPathValue::NodeSet(nodes)) => nodes.iter().any(|n| {
            compare_atoms(op, &scalar_atom(other), &node_atom(n.string_value(), other))
        }),
        (l, r) => compare_atoms(op, &scalar_atom(l), &scalar_atom(r)),
    }
}

/// A node compared with a number is converted to a number, otherwise to a string.
fn node_atom<'a, N: DataSourceNode<'a>>(value: String, other: &XPathValue<N>) -> Atom {
    match other {
        XPathValue::Number(_) => Atom::Num(string_to_number(&value)),
        _ => Atom::Str(value),
    }
}

fn scalar_atom<'a, N: DataSourceNode<'a>>(value: &XPathValue<N>) -> Atom {
    match value {
        XPathValue::Number(n) => Atom::Num(*n),
        XPathValue::Boolean(b) => Atom::Bool(*b),
        other => Atom::Str(other.to_string()),
    }
}

fn compare_atoms(op: BinaryOperator, left: &Atom, right: &Atom) -> bool {
    let is_equality = matches!(op, BinaryOperator::Equals | BinaryOperator::NotEquals);
    if !is_equality {
        return compare_numbers(op, atom_number(left), atom_number(right));
    }
    let equal = match (left, right) {
        (Atom::Bool(_), _) | (_, Atom::Bool(_)) => atom_bool(left) == atom_bool(right),
        (Atom::Num(_), _) | (_, Atom::Num(_)) => atom_number(left) == atom_number(right),
        (Atom::Str(l), Atom::Str(r)) => l == r,
    };
    if op == BinaryOperator::Equals {
        equal
    } else {
        !equal
    }
}

fn compare_numbers(op: BinaryOperator, l: f64, r: f64) -> bool {
    match op {
        BinaryOperator::LessThan => l < r,
        BinaryOperator::LessThanOrEqual => l <= r,
        BinaryOperator::GreaterThan => l > r,
        BinaryOperator::GreaterThanOrEqual => l >= r,
        _ => false,
    }
}

fn atom_number(atom: &Atom) -> f64 {
    match atom {
        Atom::Num(n) => *n,
        Atom::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Atom::Str(s) => string_to_number(s),
    }
}

fn atom_bool(atom: &Atom) -> bool {
    match atom {
        Atom::Num(n) => *n != 0.0 && !n.is_nan(),
        Atom::Bool(b) => *b,
        Atom::Str(s) => !s.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::tests::{MockNode, create_test_tree};

    type Value<'a> = XPathValue<MockNode<'a>>;

    fn boolean(value: Value<'_>) -> bool {
        match value {
            XPathValue::Boolean(b) => b,
            other => panic!("expected a boolean, got {:?}", other),
        }
    }

    #[test]
    fn test_node_set_equals_string() {
        let tree = create_test_tree();
        let keys: Value = XPathValue::NodeSet(vec![tree.node(4), tree.node(8)]);
        let b: Value = XPathValue::String("b".to_string());
        assert!(boolean(
            evaluate(BinaryOperator::Equals, keys.clone(), b.clone()).unwrap()
        ));
        // The "a" member differs from "b".
        assert!(boolean(evaluate(BinaryOperator::NotEquals, keys, b).unwrap()));
    }

    #[test]
    fn test_node_set_compared_with_number() {
        let tree = create_test_tree();
        let values: Value = XPathValue::NodeSet(vec![tree.node(5), tree.node(9)]);
        assert!(boolean(
            evaluate(BinaryOperator::GreaterThan, values.clone(), XPathValue::Number(1.5)).unwrap()
        ));
        assert!(!boolean(
            evaluate(BinaryOperator::Equals, values, XPathValue::Number(3.0)).unwrap()
        ));
    }

    #[test]
    fn test_empty_node_set_never_equals() {
        let empty: Value = XPathValue::NodeSet(vec![]);
        assert!(!boolean(
            evaluate(
                BinaryOperator::Equals,
                empty.clone(),
                XPathValue::String(String::new())
            )
            .unwrap()
        ));
        assert!(!boolean(
            evaluate(BinaryOperator::NotEquals, empty, XPathValue::String(String::new())).unwrap()
        ));
    }

    #[test]
    fn test_node_set_compared_with_boolean() {
        let empty: Value = XPathValue::NodeSet(vec![]);
        assert!(boolean(
            evaluate(BinaryOperator::Equals, empty, XPathValue::Boolean(false)).unwrap()
        ));
    }

    #[test]
    fn test_scalar_comparisons() {
        let t: Value = XPathValue::Boolean(true);
        assert!(boolean(
            evaluate(BinaryOperator::Equals, t, XPathValue::String("x".to_string())).unwrap()
        ));
        let n: Value = XPathValue::Number(2.0);
        assert!(boolean(
            evaluate(BinaryOperator::Equals, n, XPathValue::String("2".to_string())).unwrap()
        ));
    }

    #[test]
    fn test_arithmetic() {
        let l: Value = XPathValue::Number(7.0);
        match evaluate(BinaryOperator::Modulo, l, XPathValue::Number(3.0)).unwrap() {
            XPathValue::Number(n) => assert_eq!(n, 1.0),
            other => panic!("expected a number, got {:?}", other),
        }
    }

    #[test]
    fn test_union_requires_node_sets() {
        let l: Value = XPathValue::Number(1.0);
        assert!(evaluate(BinaryOperator::Union, l, XPathValue::NodeSet(vec![])).is_err());
    }
}
