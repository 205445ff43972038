pub mod client;
pub mod error;
pub mod executor;
pub mod fetcher;
pub mod resolver;
pub mod retry;

pub use client::{ApiClient, ClientConfig, IdPage, ProfileRecord, UserRef};
pub use error::{ApiError, Result};
pub use executor::RequestExecutor;
pub use fetcher::{FriendsFollowers, fetch_friends_followers};
pub use resolver::{BATCH_LIMIT, ProfileKey, lookup_profiles};
pub use retry::{RetryDecision, RetryPolicy, RetryState};
