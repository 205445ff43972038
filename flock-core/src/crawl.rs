//! Bounded breadth crawl over the reciprocal-connection graph.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use flock_client::{
    ApiClient, ProfileKey, RequestExecutor, fetch_friends_followers, lookup_profiles,
};

use crate::error::Result;
use crate::graph::SocialGraph;

/// Options for configuring a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Screen name of the user the crawl starts from.
    pub seed: String,
    /// Maximum friend ids fetched per expanded user.
    pub friends_cap: usize,
    /// Maximum follower ids fetched per expanded user.
    pub followers_cap: usize,
    /// Reciprocal connections kept per expansion step, ranked by follower
    /// count.
    pub trim_width: usize,
    /// How many frontier entries are expanded after the seed.
    pub expansion_steps: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            seed: String::new(),
            friends_cap: 5000,
            followers_cap: 5000,
            trim_width: 5,
            expansion_steps: 30,
        }
    }
}

/// Callback for reporting crawl progress.
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// A finished crawl: the accumulated graph plus the frontier in discovery
/// order (expanded entries first).
#[derive(Debug)]
pub struct CrawlOutcome {
    pub graph: SocialGraph,
    pub frontier: Vec<u64>,
}

/// Crawls outward from `options.seed`, one expansion at a time.
///
/// The seed is expanded first; each retained reciprocal connection gets an
/// edge from the seed and a slot on the frontier. Up to
/// `options.expansion_steps` frontier entries are then expanded the same
/// way, in discovery order, growing the frontier as they go. Strictly
/// sequential: at most one request is in flight at any moment.
pub async fn execute_crawl(
    client: &ApiClient,
    executor: &RequestExecutor,
    options: &CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome> {
    let mut graph = SocialGraph::new();
    graph.add_node(options.seed.clone());

    if let Some(ref callback) = progress_callback {
        callback(format!("Expanding seed {}", options.seed));
    }
    info!("Expanding seed {}", options.seed);

    let top = expand_one(client, executor, Some(&options.seed), None, options).await?;

    let mut frontier: Vec<u64> = Vec::new();
    for (id, _followers) in &top {
        graph.add_edge(options.seed.clone(), id.to_string());
        frontier.push(*id);
    }

    let mut step = 0;
    while step < options.expansion_steps && step < frontier.len() {
        let id = frontier[step];
        if let Some(ref callback) = progress_callback {
            callback(format!(
                "Expanding {} ({}/{})",
                id,
                step + 1,
                options.expansion_steps
            ));
        }
        info!("Expanding {} ({}/{})", id, step + 1, options.expansion_steps);

        let top = expand_one(client, executor, None, Some(id), options).await?;
        for (found, _followers) in &top {
            graph.add_edge(id.to_string(), found.to_string());
            frontier.push(*found);
        }
        step += 1;
    }

    info!(
        "Crawl complete: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(CrawlOutcome { graph, frontier })
}

/// Expands one user: fetches both directions, intersects them into the
/// reciprocal set, resolves profiles, then ranks and trims.
async fn expand_one(
    client: &ApiClient,
    executor: &RequestExecutor,
    screen_name: Option<&str>,
    user_id: Option<u64>,
    options: &CrawlOptions,
) -> Result<Vec<(u64, u64)>> {
    let listing = fetch_friends_followers(
        client,
        executor,
        screen_name,
        user_id,
        options.friends_cap,
        options.followers_cap,
    )
    .await?;

    let friends: HashSet<u64> = listing.friends.iter().copied().collect();
    let reciprocal: Vec<u64> = listing
        .followers
        .iter()
        .copied()
        .filter(|id| friends.contains(id))
        .collect();
    debug!("{} reciprocal connections", reciprocal.len());

    let profiles = lookup_profiles(client, executor, None, Some(&reciprocal)).await?;

    let mut ranked: Vec<(u64, u64)> = profiles
        .into_iter()
        .filter_map(|(key, record)| match key {
            ProfileKey::Id(id) => Some((id, record.followers_count)),
            ProfileKey::Name(_) => None,
        })
        .collect();
    rank_and_trim(&mut ranked, options.trim_width);
    Ok(ranked)
}

/// Sorts by follower count descending, breaking ties by ascending user id
/// so runs are reproducible, then truncates to the trim width.
fn rank_and_trim(candidates: &mut Vec<(u64, u64)>, trim_width: usize) {
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    candidates.truncate(trim_width);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_and_trim_keeps_top_k_by_follower_count() {
        let mut candidates = vec![(4, 20), (1, 50), (3, 30), (5, 10), (2, 40), (6, 5)];
        rank_and_trim(&mut candidates, 3);
        assert_eq!(candidates, vec![(1, 50), (2, 40), (3, 30)]);
    }

    #[test]
    fn test_rank_and_trim_breaks_ties_by_ascending_id() {
        let mut candidates = vec![(9, 10), (3, 10), (7, 10), (1, 99)];
        rank_and_trim(&mut candidates, 3);
        assert_eq!(candidates, vec![(1, 99), (3, 10), (7, 10)]);
    }

    #[test]
    fn test_rank_and_trim_with_fewer_candidates_than_width() {
        let mut candidates = vec![(2, 1), (1, 2)];
        rank_and_trim(&mut candidates, 5);
        assert_eq!(candidates, vec![(1, 2), (2, 1)]);
    }
}
