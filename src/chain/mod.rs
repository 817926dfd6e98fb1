//! Mastery Chain Graph
//!
//! Prerequisite-gated completion over a concept graph. A concept is chain
//! complete when its own mastery is at least 80 and every direct
//! prerequisite is at least 85. Unknown concepts count as mastery 0.
//!
//! The graph holds no learner state; mastery is supplied per evaluation.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ChainConfig;
use crate::sanitize::sanitize_mastery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDef {
    pub id: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl ConceptDef {
    pub fn new<I, S>(id: impl Into<String>, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            prerequisites: prerequisites.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.prerequisites.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Mastered,
    InProgress,
    Weak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainNode {
    pub id: String,
    pub mastery: f64,
    pub status: NodeStatus,
    pub prerequisites: Vec<String>,
    pub is_chain_complete: bool,
    pub depth: usize,
    /// Review aging is stretched by this factor; 1.0 outside a chain
    pub aging_multiplier: f64,
}

/// `source` is the prerequisite, `target` the dependent concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEdge {
    pub source: String,
    pub target: String,
    pub is_strong: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSummary {
    /// Chain-complete concepts that have at least one prerequisite
    pub chain_count: u32,
    pub resilience_bonus_days: u32,
    pub nodes: Vec<ChainNode>,
    pub edges: Vec<ChainEdge>,
}

impl ChainConfig {
    pub fn resilience_bonus(&self, is_part_of_chain: bool) -> f64 {
        if is_part_of_chain {
            self.resilience_multiplier
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct MasteryChainGraph {
    concepts: Vec<ConceptDef>,
    depths: Vec<usize>,
    index: HashMap<String, usize>,
}

impl MasteryChainGraph {
    /// Builds the graph; a repeated concept id keeps its first definition.
    pub fn new(concepts: impl IntoIterator<Item = ConceptDef>) -> Self {
        let mut index = HashMap::new();
        let mut unique = Vec::new();
        for concept in concepts {
            if index.contains_key(&concept.id) {
                tracing::warn!(concept = %concept.id, "duplicate concept ignored");
                continue;
            }
            index.insert(concept.id.clone(), unique.len());
            unique.push(concept);
        }

        let depths = compute_depths(&unique, &index);
        Self {
            concepts: unique,
            depths,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&i| self.depths[i])
    }

    pub fn evaluate(&self, config: &ChainConfig, mastery: &HashMap<String, f64>) -> ChainSummary {
        let lookup = |id: &str| mastery.get(id).copied().map_or(0.0, sanitize_mastery);

        let nodes: Vec<ChainNode> = self
            .concepts
            .par_iter()
            .zip(self.depths.par_iter())
            .map(|(concept, &depth)| {
                let score = lookup(concept.id.as_str());
                let status = if score >= config.self_threshold {
                    NodeStatus::Mastered
                } else if score >= config.in_progress_threshold {
                    NodeStatus::InProgress
                } else {
                    NodeStatus::Weak
                };
                let is_chain_complete = score >= config.self_threshold
                    && concept
                        .prerequisites
                        .iter()
                        .all(|p| lookup(p.as_str()) >= config.prerequisite_threshold);

                ChainNode {
                    id: concept.id.clone(),
                    mastery: score,
                    status,
                    prerequisites: concept.prerequisites.clone(),
                    is_chain_complete,
                    depth,
                    aging_multiplier: config.resilience_bonus(is_chain_complete),
                }
            })
            .collect();

        let mut edges = Vec::new();
        let mut chain_count: u32 = 0;
        for node in &nodes {
            for prerequisite in &node.prerequisites {
                let is_strong = self.contains(prerequisite)
                    && node.mastery >= config.self_threshold
                    && lookup(prerequisite.as_str()) >= config.prerequisite_threshold;
                edges.push(ChainEdge {
                    source: prerequisite.clone(),
                    target: node.id.clone(),
                    is_strong,
                });
            }
            if node.is_chain_complete && !node.prerequisites.is_empty() {
                chain_count += 1;
            }
        }

        tracing::debug!(concepts = nodes.len(), chain_count, "mastery chains evaluated");

        ChainSummary {
            chain_count,
            resilience_bonus_days: chain_count.saturating_mul(config.days_per_chain),
            nodes,
            edges,
        }
    }
}

/// Evaluates chains with the canonical thresholds (80 / 85, 2 days per chain)
pub fn evaluate_mastery_chains(concepts: &[ConceptDef], mastery: &HashMap<String, f64>) -> ChainSummary {
    MasteryChainGraph::new(concepts.iter().cloned()).evaluate(&ChainConfig::default(), mastery)
}

/// Aging multiplier with the canonical bonus: 1.4 inside a completed chain, else 1.0
pub fn calculate_resilience_bonus(is_part_of_chain: bool) -> f64 {
    ChainConfig::default().resilience_bonus(is_part_of_chain)
}

/// Longest path over defined prerequisites; an edge back into the current
/// path is cut.
fn compute_depths(concepts: &[ConceptDef], index: &HashMap<String, usize>) -> Vec<usize> {
    fn visit(
        node: usize,
        concepts: &[ConceptDef],
        index: &HashMap<String, usize>,
        memo: &mut Vec<Option<usize>>,
        on_path: &mut HashSet<usize>,
    ) -> usize {
        if let Some(depth) = memo[node] {
            return depth;
        }
        on_path.insert(node);

        let mut depth = 0;
        for prerequisite in &concepts[node].prerequisites {
            let Some(&p) = index.get(prerequisite) else {
                continue;
            };
            if on_path.contains(&p) {
                continue;
            }
            depth = depth.max(visit(p, concepts, index, memo, on_path) + 1);
        }

        on_path.remove(&node);
        memo[node] = Some(depth);
        depth
    }

    let mut memo = vec![None; concepts.len()];
    let mut on_path = HashSet::new();
    (0..concepts.len())
        .map(|node| visit(node, concepts, index, &mut memo, &mut on_path))
        .collect()
}
