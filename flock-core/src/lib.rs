pub mod crawl;
pub mod error;
pub mod graph;
pub mod render;
pub mod report;

pub use crawl::{CrawlOptions, CrawlOutcome, CrawlProgressCallback, execute_crawl};
pub use error::{CoreError, Result};
pub use graph::{GraphStats, SocialGraph};

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
    __ _            _
   / _| | ___   ___| | __
  | |_| |/ _ \ / __| |/ /
  |  _| | (_) | (__|   <
  |_| |_|\___/ \___|_|\_\
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{}",
        "  reciprocal social-graph crawler and analyzer"
            .bright_white()
            .bold()
    );
    println!();
}
