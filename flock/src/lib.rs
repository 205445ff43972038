// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{crawl_options_from_args, normalize_seed, resolve_token, retry_policy_from_args};
