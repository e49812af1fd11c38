use ahash::AHashMap;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::template::{PatternId, TemplateParser};

pub const DRAIN_PARSER_ID: u32 = 1;

const WILDCARD: &str = "<*>";
const DEFAULT_MIN_SIMILARITY: f32 = 0.5;

static RE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>\s]+>").unwrap());

/// Template extractor backed by a Drain clustering tree.
///
/// The tree decides which cluster a line joins. The template of each cluster
/// is kept here: a position becomes `<*>` as soon as two members disagree
/// there. Cluster ids are handed out in learning order and never change.
pub struct DrainParser {
    tree: drain_rs::DrainTree,
    min_similarity: f32,
    clusters: Vec<Vec<String>>,
    by_key: AHashMap<String, usize>,
    by_len: AHashMap<usize, Vec<usize>>,
    seen: AHashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainMatch {
    pub id: PatternId,
    pub tokens: Vec<String>,
}

impl DrainParser {
    pub fn new_default() -> Self {
        Self::from_tree(Default::default(), DEFAULT_MIN_SIMILARITY)
    }

    pub fn new_tuned(max_depth: u16, min_similarity: f32, max_children: u16) -> Self {
        let tree = drain_rs::DrainTree::new()
            .max_depth(max_depth)
            .min_similarity(min_similarity)
            .max_children(max_children);
        Self::from_tree(tree, min_similarity)
    }

    /// Like `new_tuned`, but common variable fields are masked before clustering.
    pub fn new_tuned_with_filters(max_depth: u16, min_similarity: f32, max_children: u16) -> Self {
        let patterns = vec![
            "%{IPV4:IPV4}",
            "%{UUID:UUID}",
            "(?<HEX>0x[0-9a-fA-F]+)",
            "%{NUMBER:NUMBER}",
        ];
        let mut g = grok::Grok::with_patterns();
        let tree = drain_rs::DrainTree::new()
            .max_depth(max_depth)
            .min_similarity(min_similarity)
            .max_children(max_children)
            .filter_patterns(patterns)
            .build_patterns(&mut g);
        Self::from_tree(tree, min_similarity)
    }

    pub fn from_config(config: &RunConfig) -> Self {
        let (depth, similarity, children) = (
            config.drain_depth,
            config.drain_similarity,
            config.drain_max_children,
        );
        if config.drain_masking {
            Self::new_tuned_with_filters(depth, similarity, children)
        } else {
            Self::new_tuned(depth, similarity, children)
        }
    }

    /// `min_similarity` must be the one the tree was built with; it also
    /// routes lines that were never learned.
    pub fn from_tree(tree: drain_rs::DrainTree, min_similarity: f32) -> Self {
        Self {
            tree,
            min_similarity,
            clusters: Vec::new(),
            by_key: AHashMap::new(),
            by_len: AHashMap::new(),
            seen: AHashMap::new(),
        }
    }

    /// Adds the line to the tree and returns the cluster it joined. A line
    /// learned twice stays in the cluster it joined first.
    pub fn learn(&mut self, line: &str) -> Result<PatternId> {
        if let Some(&idx) = self.seen.get(line) {
            return Ok(cluster_id(idx));
        }
        let tokens = tokenize(line);

        let idx = if tokens.is_empty() {
            self.cluster_for_key(String::new(), Vec::new())
        } else {
            // drain-rs 0.3 never rewrites a cluster's tokens once created,
            // so their rendering identifies the cluster
            let key = self
                .tree
                .add_log_line(line)
                .map(|cluster| cluster.as_string())
                .ok_or_else(|| Error::Drain(format!("tree refused line {line:?}")))?;
            let template: Vec<String> = to_generic_template(&key)
                .split(' ')
                .map(|t| t.trim().to_string())
                .collect();
            if template.len() != tokens.len() {
                return Err(Error::Drain(format!(
                    "cluster {key:?} does not fit line {line:?}"
                )));
            }
            let idx = self.cluster_for_key(key, template);
            generalize(&mut self.clusters[idx], &tokens);
            idx
        };

        self.seen.insert(line.to_string(), idx);
        Ok(cluster_id(idx))
    }

    /// Finds the learned cluster the line belongs to. Lines that were never
    /// learned go to the most similar cluster of the same length, provided
    /// the share of equal tokens reaches the tree's minimum similarity.
    pub fn search(&mut self, line: &str) -> Result<DrainMatch> {
        let known = self.seen.get(line).copied();
        let idx = match known {
            Some(idx) => idx,
            None => {
                let tokens = tokenize(line);
                if tokens.is_empty() {
                    self.cluster_for_key(String::new(), Vec::new())
                } else {
                    self.most_similar(&tokens)
                        .ok_or_else(|| Error::UnknownPattern(line.to_string()))?
                }
            }
        };
        Ok(DrainMatch {
            id: cluster_id(idx),
            tokens: self.clusters[idx].clone(),
        })
    }

    /// Current templates, in id order.
    pub fn clusters(&self) -> Vec<String> {
        self.clusters.iter().map(|t| t.join(" ")).collect()
    }

    fn cluster_for_key(&mut self, key: String, template: Vec<String>) -> usize {
        if let Some(&idx) = self.by_key.get(&key) {
            return idx;
        }
        let idx = self.clusters.len();
        self.by_len.entry(template.len()).or_default().push(idx);
        self.clusters.push(template);
        self.by_key.insert(key, idx);
        idx
    }

    fn most_similar(&self, tokens: &[&str]) -> Option<usize> {
        let candidates = self.by_len.get(&tokens.len())?;
        let len = tokens.len() as f32;

        let mut best: Option<(usize, usize, usize)> = None;
        for &idx in candidates {
            let (mut exact, mut wild) = (0, 0);
            for (pat, tok) in self.clusters[idx].iter().zip(tokens) {
                if pat == tok {
                    exact += 1;
                } else if pat == WILDCARD {
                    wild += 1;
                }
            }
            if (exact as f32) / len < self.min_similarity {
                continue;
            }
            if best.map_or(true, |(_, e, w)| (exact, wild) > (e, w)) {
                best = Some((idx, exact, wild));
            }
        }
        best.map(|(idx, _, _)| idx)
    }
}

impl TemplateParser for DrainParser {
    fn extract_pattern(&mut self, line: &str) -> Result<PatternId> {
        Ok(self.search(line)?.id)
    }

    fn learn_line(&mut self, line: &str) -> Result<Option<PatternId>> {
        self.learn(line)?;
        Ok(None)
    }

    fn human_readable(&self, id: PatternId) -> Result<String> {
        if id.parser != DRAIN_PARSER_ID {
            return Err(Error::UnknownPatternId(id));
        }
        usize::try_from(id.index)
            .ok()
            .and_then(|idx| self.clusters.get(idx))
            .map(|tokens| tokens.join(" "))
            .ok_or(Error::UnknownPatternId(id))
    }

    fn patterns_amount(&self) -> usize {
        self.clusters.len()
    }
}

fn cluster_id(idx: usize) -> PatternId {
    PatternId::new(DRAIN_PARSER_ID, idx as u64)
}

/// Splits the way the tree does: on single spaces, each piece trimmed.
/// Blank lines have no tokens.
fn tokenize(line: &str) -> Vec<&str> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    line.split(' ').map(str::trim).collect()
}

fn generalize(template: &mut [String], tokens: &[&str]) {
    for (slot, tok) in template.iter_mut().zip(tokens) {
        if slot.as_str() != WILDCARD && slot.as_str() != *tok {
            *slot = WILDCARD.to_string();
        }
    }
}

/// Typed placeholders and bare `*` wildcards both become `<*>`.
pub fn to_generic_template(s: &str) -> String {
    RE_PLACEHOLDER
        .replace_all(s, WILDCARD)
        .split(' ')
        .map(|t| if t == "*" { WILDCARD } else { t })
        .join(" ")
}
