//! Node collection along each XPath axis.
//!
//! Forward axes come out in document order and reverse axes nearest-first; the
//! engine re-sorts each step anyway, so callers only rely on membership.

use crate::ast::Axis;
use crate::datasource::{DataSourceNode, NodeType};

/// Every node reachable from `node` along `axis`, without duplicates.
pub fn collect<'a, N: DataSourceNode<'a>>(axis: Axis, node: N) -> Vec<N> {
    let mut out = Vec::new();
    match axis {
        Axis::SelfAxis => out.push(node),
        Axis::Child => out.extend(node.children()),
        Axis::Attribute if node.node_type() == NodeType::Element => {
            out.extend(node.attributes())
        }
        Axis::Attribute => {}
        Axis::Descendant => push_descendants(node, &mut out),
        Axis::DescendantOrSelf => {
            out.push(node);
            push_descendants(node, &mut out);
        }
        Axis::Parent => out.extend(node.parent()),
        Axis::Ancestor => out.extend(ancestors(node)),
        Axis::AncestorOrSelf => {
            out.push(node);
            out.extend(ancestors(node));
        }
        Axis::FollowingSibling => out.extend(siblings_after(node)),
        Axis::PrecedingSibling => out.extend(siblings_before(node)),
        Axis::Following => {
            for current in std::iter::once(node).chain(ancestors(node)) {
                for sibling in siblings_after(current) {
                    out.push(sibling);
                    push_descendants(sibling, &mut out);
                }
            }
        }
        Axis::Preceding => {
            for current in std::iter::once(node).chain(ancestors(node)) {
                for sibling in siblings_before(current) {
                    out.push(sibling);
                    push_descendants(sibling, &mut out);
                }
            }
        }
    }
    out
}

fn ancestors<'a, N: DataSourceNode<'a>>(node: N) -> impl Iterator<Item = N> {
    std::iter::successors(node.parent(), |n| n.parent())
}

/// Pre-order, so the output is in document order.
fn push_descendants<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    for child in node.children() {
        out.push(child);
        push_descendants(child, out);
    }
}

/// Siblings of `node` in its parent's child list. Attributes are not in that list
/// and so have no siblings.
fn sibling_split<'a, N: DataSourceNode<'a>>(node: N) -> Option<(Vec<N>, usize)> {
    let siblings: Vec<N> = node.parent()?.children().collect();
    let index = siblings.iter().position(|s| *s == node)?;
    Some((siblings, index))
}

fn siblings_after<'a, N: DataSourceNode<'a>>(node: N) -> Vec<N> {
    sibling_split(node)
        .map(|(mut siblings, index)| siblings.split_off(index + 1))
        .unwrap_or_default()
}

/// Nearest sibling first.
fn siblings_before<'a, N: DataSourceNode<'a>>(node: N) -> Vec<N> {
    sibling_split(node)
        .map(|(mut siblings, index)| {
            siblings.truncate(index);
            siblings.reverse();
            siblings
        })
        .unwrap_or_default()
}
