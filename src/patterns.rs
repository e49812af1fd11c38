use std::fmt;

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// A named token class backed by a compiled, anchored regex.
#[derive(Clone, Copy)]
pub struct RegexClass {
    name: &'static str,
    pattern: &'static str,
    regex: &'static Lazy<Regex>,
}

impl RegexClass {
    pub const fn new(
        name: &'static str,
        pattern: &'static str,
        regex: &'static Lazy<Regex>,
    ) -> Self {
        Self { name, pattern, regex }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn is_match(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    pub(crate) fn lazy(&self) -> &'static Lazy<Regex> {
        self.regex
    }
}

impl PartialEq for RegexClass {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for RegexClass {}

impl fmt::Debug for RegexClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Regex({}, {})", self.pattern, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternNode {
    Regex(RegexClass),
    /// Dictionary word, kept in its original case.
    Word(String),
    Param,
}

impl PatternNode {
    pub fn matches(&self, token: &str) -> bool {
        match self {
            PatternNode::Regex(class) => class.is_match(token),
            PatternNode::Word(word) => word.to_lowercase() == token.to_lowercase(),
            PatternNode::Param => true,
        }
    }

    pub fn human_readable(&self) -> String {
        match self {
            PatternNode::Regex(class) => format!("<{}>", class.name()),
            PatternNode::Word(word) => word.clone(),
            PatternNode::Param => "<Param>".to_string(),
        }
    }
}

/// Ordered, fixed-length sequence of nodes. Equal iff pairwise equal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    nodes: Vec<PatternNode>,
}

impl Pattern {
    pub fn new(nodes: Vec<PatternNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[PatternNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn matches(&self, tokens: &[&str]) -> bool {
        tokens.len() == self.nodes.len()
            && self.nodes.iter().zip(tokens).all(|(node, token)| node.matches(token))
    }

    pub fn human_readable(&self) -> String {
        self.nodes.iter().map(PatternNode::human_readable).join(" ")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human_readable())
    }
}

/// Append-only list of distinct patterns. Indices are never reused or reordered.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: Vec<Pattern>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of an equal pattern, registering it first if needed.
    pub fn put(&mut self, pattern: Pattern) -> usize {
        match self.find(&pattern) {
            Some(idx) => idx,
            None => {
                self.patterns.push(pattern);
                self.patterns.len() - 1
            }
        }
    }

    pub fn find(&self, pattern: &Pattern) -> Option<usize> {
        self.patterns.iter().position(|p| p == pattern)
    }

    pub fn get(&self, idx: usize) -> Option<&Pattern> {
        self.patterns.get(idx)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}
