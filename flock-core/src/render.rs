//! Terminal and DOT rendering of the crawl graph.

use colored::Colorize;
use petgraph::dot::{Config, Dot};

use crate::graph::SocialGraph;

/// Renders the graph in Graphviz DOT form, suitable for `dot -Tpng`.
pub fn render_dot(graph: &SocialGraph) -> String {
    format!(
        "{:?}",
        Dot::with_config(graph.inner(), &[Config::EdgeNoLabel])
    )
}

/// Builds an ANSI adjacency listing of the graph for terminal display.
pub fn render_adjacency(graph: &SocialGraph) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "─".repeat(52)));
    out.push_str(&format!(
        "Network of {} node(s), {} edge(s)\n",
        graph.node_count(),
        graph.edge_count()
    ));
    out.push_str(&format!("{}\n", "─".repeat(52)));

    let mut labels: Vec<&str> = graph.labels().collect();
    labels.sort_unstable();

    for label in labels {
        let neighbors = graph.neighbors(label);
        out.push_str(&format!(
            "  {} ({} connection(s))\n",
            label.bright_white().bold(),
            neighbors.len()
        ));
        for (i, neighbor) in neighbors.iter().enumerate() {
            let branch = if i + 1 == neighbors.len() {
                "└─"
            } else {
                "├─"
            };
            out.push_str(&format!("    {} {}\n", branch, neighbor));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> SocialGraph {
        let mut graph = SocialGraph::new();
        graph.add_edge("seed", "101");
        graph.add_edge("seed", "102");
        graph
    }

    #[test]
    fn test_dot_output_contains_labels_and_edges() {
        let dot = render_dot(&sample_graph());
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("seed"));
        assert!(dot.contains("101"));
        assert!(dot.contains("--"));
    }

    #[test]
    fn test_adjacency_lists_every_node_with_its_degree() {
        let listing = render_adjacency(&sample_graph());
        assert!(listing.contains("3 node(s), 2 edge(s)"));
        assert!(listing.contains("(2 connection(s))"));
        assert!(listing.contains("101"));
        assert!(listing.contains("102"));
    }
}
