// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::{AttributeMap, StartTag};

#[derive(Clone, PartialEq, Debug)]
/// An open element as seen by the record builder
pub struct Node {
    /// The element's name
    pub name: String,
    /// The element's attributes
    pub attributes: AttributeMap,
}

impl Node {
    /// Looks up the value of an attribute
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Looks up an attribute, treating an empty value as absent
    pub fn non_empty_attr(&self, key: &str) -> Option<&str> {
        self.attr(key).filter(|v| !v.is_empty())
    }
}

impl From<StartTag> for Node {
    fn from(tag: StartTag) -> Node {
        Node {
            name: tag.name,
            attributes: tag.attributes,
        }
    }
}

/// The stack of currently open elements.
///
/// Leaf tag names in XMLTV mean different things depending on where they
/// appear, so the builder asks for the current element and its parent
/// rather than looking at the tag alone.
#[derive(Clone, Debug, Default)]
pub struct ContextStack {
    stack: Vec<Node>,
}

impl ContextStack {
    /// Returns an empty `ContextStack`
    pub fn new() -> ContextStack {
        ContextStack { stack: Vec::new() }
    }

    /// Enters an element
    pub fn push(&mut self, tag: StartTag) {
        self.stack.push(Node::from(tag));
    }

    /// Leaves the innermost element, returning it
    pub fn pop(&mut self) -> Option<Node> {
        self.stack.pop()
    }

    /// The innermost open element
    pub fn current(&self) -> Option<&Node> {
        self.stack.last()
    }

    /// The element enclosing the innermost open element
    pub fn parent(&self) -> Option<&Node> {
        self.ancestor(1)
    }

    /// The element `level` steps above the innermost one; `0` is `current()`
    pub fn ancestor(&self, level: usize) -> Option<&Node> {
        let len = self.stack.len();
        if level < len {
            self.stack.get(len - 1 - level)
        } else {
            None
        }
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether no element is open
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod context_tests {
    use super::ContextStack;
    use crate::StartTag;

    #[test]
    fn test_current_and_parent() {
        let mut ctx = ContextStack::new();
        assert!(ctx.current().is_none());

        ctx.push(StartTag::new("programme"));
        ctx.push(StartTag::new("rating").with_attr("system", "MPAA"));
        ctx.push(StartTag::new("value"));

        assert_eq!(ctx.current().map(|n| n.name.as_str()), Some("value"));
        let parent = ctx.parent().expect("rating is open");
        assert_eq!(parent.name, "rating");
        assert_eq!(parent.attr("system"), Some("MPAA"));
        assert_eq!(ctx.ancestor(2).map(|n| n.name.as_str()), Some("programme"));
        assert!(ctx.ancestor(3).is_none());
        assert_eq!(ctx.depth(), 3);
    }

    #[test]
    fn test_pop_restores_parent() {
        let mut ctx = ContextStack::new();
        ctx.push(StartTag::new("channel"));
        ctx.push(StartTag::new("icon"));
        assert_eq!(ctx.pop().map(|n| n.name), Some("icon".to_owned()));
        assert_eq!(ctx.current().map(|n| n.name.as_str()), Some("channel"));
        assert!(ctx.parent().is_none());
        ctx.pop();
        assert!(ctx.is_empty());
        assert!(ctx.pop().is_none());
    }

    #[test]
    fn test_non_empty_attr() {
        let mut ctx = ContextStack::new();
        ctx.push(StartTag::new("icon").with_attr("width", "").with_attr("src", "a.png"));
        let icon = ctx.current().expect("icon is open");
        assert_eq!(icon.non_empty_attr("width"), None);
        assert_eq!(icon.non_empty_attr("src"), Some("a.png"));
    }
}
