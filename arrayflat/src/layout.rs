//! Whitespace between root-level siblings.
//!
//! Transformers only move nodes around; this module decides what the tails
//! look like afterwards so that rewritten files diff cleanly against
//! hand-maintained ones.

use crate::document::{Element, Node};

/// Used when the document gives no hint about its own indentation.
pub const DEFAULT_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Newline, then indentation.
    Line,
    /// Empty line, then indentation.
    Blank,
}

impl Separator {
    fn render(self, indent: &str) -> String {
        match self {
            Separator::Line => format!("\n{indent}"),
            Separator::Blank => format!("\n\n{indent}"),
        }
    }

    /// Same break without indentation, placed before the parent's closing tag.
    fn closing(self) -> &'static str {
        match self {
            Separator::Line => "\n",
            Separator::Blank => "\n\n",
        }
    }
}

/// Separators used when appending groups of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    /// After the node that precedes the first appended one.
    pub before: Separator,
    /// Between nodes of the same group.
    pub within: Separator,
    /// After the last node of a group. The very last node of all gets the
    /// closing form of this separator.
    pub between: Separator,
}

impl Spacing {
    /// Flattened entries: one group per source array, blank line between groups.
    pub const ENTRIES: Spacing = Spacing {
        before: Separator::Blank,
        within: Separator::Line,
        between: Separator::Blank,
    };

    /// Relocated arrays, one per line.
    pub const ARRAYS: Spacing = Spacing {
        before: Separator::Line,
        within: Separator::Line,
        between: Separator::Line,
    };

    /// Placeholder entries copied into a translation.
    pub const BACKFILL: Spacing = Spacing {
        before: Separator::Line,
        within: Separator::Line,
        between: Separator::Blank,
    };
}

/// Indentation of the parent's children, taken from the whitespace that
/// precedes the first child.
pub fn detect_indent(parent: &Element) -> String {
    let candidates = std::iter::once(parent.text.as_str())
        .chain(parent.children.iter().map(|n| n.tail.as_str()));
    for ws in candidates {
        if let Some((_, indent)) = ws.rsplit_once('\n') {
            if !indent.is_empty() && indent.chars().all(|c| c == ' ' || c == '\t') {
                return indent.to_string();
            }
        }
    }
    DEFAULT_INDENT.to_string()
}

/// Appends `groups` to `parent` in order and assigns every tail involved.
///
/// Empty groups are skipped. Returns the number of nodes appended; when it
/// is zero the parent is left untouched.
pub fn append_groups(parent: &mut Element, groups: Vec<Vec<Node>>, spacing: Spacing) -> usize {
    let groups: Vec<Vec<Node>> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    if groups.is_empty() {
        return 0;
    }

    let indent = detect_indent(parent);
    match parent.children.last_mut() {
        Some(last) => last.tail = spacing.before.render(&indent),
        None => parent.text = Separator::Line.render(&indent),
    }

    let mut appended = 0;
    for group in groups {
        let count = group.len();
        for (i, mut node) in group.into_iter().enumerate() {
            let separator = if i + 1 == count {
                spacing.between
            } else {
                spacing.within
            };
            node.tail = separator.render(&indent);
            parent.children.push(node);
            appended += 1;
        }
    }

    if let Some(last) = parent.children.last_mut() {
        last.tail = spacing.between.closing().to_string();
    }
    appended
}

/// Drops the indentation that would otherwise sit in front of the parent's
/// closing tag, e.g. after its last children were removed.
pub fn settle(parent: &mut Element) {
    let ws = match parent.children.last_mut() {
        Some(last) => &mut last.tail,
        None => &mut parent.text,
    };
    if ws.contains('\n') && ws.trim().is_empty() {
        let trimmed = ws.trim_end_matches([' ', '\t']).len();
        ws.truncate(trimmed);
    }
}
