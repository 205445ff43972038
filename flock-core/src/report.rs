// Report generation for a finished crawl.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::graph::GraphStats;

/// Fixed name of the report file written in the working directory.
pub const REPORT_FILE: &str = "final_output.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Everything the report needs to know about a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub seed: String,
    pub nodes: usize,
    pub edges: usize,
    pub average_distance: f64,
    pub diameter: usize,
}

impl ReportData {
    pub fn new(seed: impl Into<String>, stats: &GraphStats) -> Self {
        Self {
            seed: seed.into(),
            nodes: stats.nodes,
            edges: stats.edges,
            average_distance: stats.average_distance,
            diameter: stats.diameter,
        }
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();
    report.push_str("A social network is created\n");
    report.push_str(&format!("Number of nodes is: {}\n", data.nodes));
    report.push_str(&format!("Number of edges is: {}\n", data.edges));
    report.push_str(&format!("Average Distance is: {}\n", data.average_distance));
    report.push_str(&format!("Average Diameter is: {}\n", data.diameter));
    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "flock",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "seed": data.seed,
            "network": {
                "nodes": data.nodes,
                "edges": data.edges,
                "average_distance": data.average_distance,
                "diameter": data.diameter
            }
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
