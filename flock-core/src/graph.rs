//! Accumulated crawl graph and its summary statistics.

use std::collections::HashMap;

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{CoreError, Result};

/// Undirected reciprocal-connection graph accumulated during a crawl.
///
/// Nodes are labeled with the seed's screen name or a discovered user's
/// numeric id rendered as text. Insertion is idempotent per label and
/// parallel edges collapse into one.
#[derive(Debug, Default)]
pub struct SocialGraph {
    graph: UnGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node if its label is new, returning its index either way.
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeIndex {
        let label = label.into();
        if let Some(&index) = self.indices.get(&label) {
            return index;
        }
        let index = self.graph.add_node(label.clone());
        self.indices.insert(label, index);
        index
    }

    /// Adds an undirected edge, inserting endpoints as needed.
    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>) {
        let a = self.add_node(a);
        let b = self.add_node(b);
        self.graph.update_edge(a, b, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.indices.contains_key(label)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.indices.get(a), self.indices.get(b)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Neighbors of `label`, sorted for stable output. Empty for unknown
    /// labels.
    pub fn neighbors(&self, label: &str) -> Vec<&str> {
        let Some(&index) = self.indices.get(label) else {
            return Vec::new();
        };
        let mut neighbors: Vec<&str> = self
            .graph
            .neighbors(index)
            .map(|n| self.graph[n].as_str())
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    pub(crate) fn inner(&self) -> &UnGraph<String, ()> {
        &self.graph
    }

    /// Computes the summary statistics of the finished graph.
    ///
    /// Average distance and diameter are defined over hop counts and
    /// require a connected graph; any unreachable pair fails the whole
    /// computation with [`CoreError::Disconnected`].
    pub fn stats(&self) -> Result<GraphStats> {
        let nodes = self.graph.node_count();
        if nodes == 0 {
            return Err(CoreError::EmptyGraph);
        }

        let mut total_distance: u64 = 0;
        let mut diameter: usize = 0;
        for start in self.graph.node_indices() {
            let distances = dijkstra(&self.graph, start, None, |_| 1usize);
            if distances.len() < nodes {
                return Err(CoreError::Disconnected);
            }
            for distance in distances.values() {
                total_distance += *distance as u64;
                diameter = diameter.max(*distance);
            }
        }

        // Sum over ordered pairs divided by n(n-1); a lone node has average
        // distance zero by convention.
        let average_distance = if nodes > 1 {
            total_distance as f64 / (nodes * (nodes - 1)) as f64
        } else {
            0.0
        };

        Ok(GraphStats {
            nodes,
            edges: self.graph.edge_count(),
            average_distance,
            diameter,
        })
    }
}

/// Summary statistics for a finished crawl graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub average_distance: f64,
    pub diameter: usize,
}
