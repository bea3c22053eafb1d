//! Parser and writer for the plain-text edge-list format.
//!
//! One edge per line: `nodeA nodeB [weight]`. A line with a single token
//! declares a bare node, so isolated nodes survive a save/load round trip.
//! Blank lines and `#` comments are ignored. Malformed lines are skipped
//! with a warning; loading always continues.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::model::{Graph, NodeId};

/// A skipped input line, with enough context to log and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// 1-based line number in the input.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Parse edge-list text into a graph. Node labels are deduplicated: the
/// first occurrence creates the node, later mentions reuse it.
pub fn parse(input: &str, directed: bool) -> (Graph, Vec<LoadWarning>) {
    let mut graph = Graph::new(directed);
    let mut by_label: HashMap<String, NodeId> = HashMap::new();
    let mut warnings = Vec::new();

    let mut intern = |graph: &mut Graph, label: &str| -> NodeId {
        if let Some(id) = by_label.get(label) {
            return *id;
        }
        let id = graph.add_node(label);
        by_label.insert(label.to_string(), id);
        id
    };

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        match tokens.as_slice() {
            [node] => {
                intern(&mut graph, node);
            }
            [a, b] => {
                let a = intern(&mut graph, a);
                let b = intern(&mut graph, b);
                // Both endpoints were just interned, so this cannot fail.
                let _ = graph.add_edge(a, b, None);
            }
            [a, b, weight] => match weight.parse::<f32>() {
                Ok(w) if w.is_finite() => {
                    let a = intern(&mut graph, a);
                    let b = intern(&mut graph, b);
                    let _ = graph.add_edge(a, b, Some(w));
                }
                _ => warnings.push(LoadWarning {
                    line,
                    message: format!("unparseable weight {weight:?}"),
                }),
            },
            _ => warnings.push(LoadWarning {
                line,
                message: format!("expected `nodeA nodeB [weight]`, got {} tokens", tokens.len()),
            }),
        }
    }

    (graph, warnings)
}

/// Write the graph's topology (not its layout) back to edge-list text.
///
/// Whitespace inside labels would break the format, so it is flattened to
/// `_` on the way out. Isolated nodes are written as bare-node lines.
pub fn serialize(graph: &Graph) -> String {
    let mut out = String::new();
    for id in graph.node_ids() {
        if !graph.incident_edges(id).is_empty() {
            continue;
        }
        if let Some(node) = graph.node(id) {
            out.push_str(&sanitize_label(&node.label));
            out.push('\n');
        }
    }

    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_by_key(|e| e.id);
    for edge in edges {
        let (Some(a), Some(b)) = (graph.node(edge.a), graph.node(edge.b)) else {
            continue;
        };
        out.push_str(&sanitize_label(&a.label));
        out.push(' ');
        out.push_str(&sanitize_label(&b.label));
        if let Some(w) = edge.weight {
            out.push(' ');
            out.push_str(&w.to_string());
        }
        out.push('\n');
    }
    out
}

fn sanitize_label(label: &str) -> String {
    if label.trim().is_empty() {
        return "_".to_string();
    }
    label.split_whitespace().collect::<Vec<_>>().join("_")
}

pub fn load(path: &Path, directed: bool) -> Result<(Graph, Vec<LoadWarning>)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading graph file {}", path.display()))?;
    Ok(parse(&text, directed))
}

pub fn save(path: &Path, graph: &Graph) -> Result<()> {
    fs::write(path, serialize(graph))
        .with_context(|| format!("writing graph file {}", path.display()))
}
