//! The chain of locators from the transform root down to the element being visited.
//!
//! Each frame borrows its parent, so a frame pushed for a child lives on the walk's
//! call stack and disappears when the child returns.

use crate::locator::{Locator, LocatorKind};

#[derive(Debug)]
pub struct LocatorStack<'p> {
    locator: Locator,
    parent: Option<&'p LocatorStack<'p>>,
}

impl<'p> LocatorStack<'p> {
    /// Starts a stack. The outermost path is anchored at the document: it gains a
    /// leading `/` unless it already begins with `//`.
    pub fn root(mut locator: Locator) -> Self {
        if !locator.path.starts_with("//") {
            locator.path.insert(0, '/');
        }
        LocatorStack {
            locator,
            parent: None,
        }
    }

    pub fn push(&'p self, locator: Locator) -> LocatorStack<'p> {
        LocatorStack {
            locator,
            parent: Some(self),
        }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn depth(&self) -> usize {
        self.frames().len()
    }

    /// Outermost first.
    fn frames(&self) -> Vec<&Locator> {
        let mut frames = Vec::new();
        let mut current = Some(self);
        while let Some(frame) = current {
            frames.push(&frame.locator);
            current = frame.parent;
        }
        frames.reverse();
        frames
    }

    /// The path selecting the current element's targets. The innermost XPath
    /// locator replaces everything above it; fragments below it are appended.
    pub fn compose(&self) -> String {
        let frames = self.frames();
        let start = frames
            .iter()
            .rposition(|locator| locator.kind == LocatorKind::XPath)
            .unwrap_or(0);
        frames[start..]
            .iter()
            .map(|locator| locator.path.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_anchored() {
        assert_eq!(LocatorStack::root(Locator::implied("a")).compose(), "//a");
        assert_eq!(LocatorStack::root(Locator::implied_parent()).compose(), "/");
        assert_eq!(
            LocatorStack::root(Locator::xpath("//a/b")).compose(),
            "//a/b"
        );
        assert_eq!(LocatorStack::root(Locator::xpath("a/b")).compose(), "/a/b");
    }

    #[test]
    fn test_fragments_concatenate() {
        let root = LocatorStack::root(Locator::implied("a"));
        let b = root.push(Locator {
            kind: LocatorKind::Match,
            path: "/b[@key='1']".to_string(),
        });
        let insert = b.push(Locator::implied_parent());
        assert_eq!(insert.compose(), "//a/b[@key='1']");
        assert_eq!(insert.depth(), 3);
        // The parent frame is unaffected by its children.
        assert_eq!(b.compose(), "//a/b[@key='1']");
        assert_eq!(root.compose(), "//a");
    }

    #[test]
    fn test_innermost_xpath_wins() {
        let root = LocatorStack::root(Locator::implied("a"));
        let b = root.push(Locator::xpath("//a/b[@key='1']"));
        let c = b.push(Locator {
            kind: LocatorKind::Match,
            path: "/c[@key='abc']".to_string(),
        });
        assert_eq!(c.compose(), "//a/b[@key='1']/c[@key='abc']");

        let d = c.push(Locator::xpath("//x"));
        let e = d.push(Locator::implied("e"));
        assert_eq!(e.compose(), "//x/e");
    }
}
