//! Batch resolution of identifiers to profile records.

use std::collections::HashMap;

use tracing::debug;

use crate::client::{ApiClient, ProfileRecord};
use crate::error::{ApiError, Result};
use crate::executor::RequestExecutor;

/// Server-imposed maximum number of users per lookup request.
pub const BATCH_LIMIT: usize = 100;

/// Key under which a resolved profile is filed, matching the reference form
/// of the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProfileKey {
    Name(String),
    Id(u64),
}

/// Resolves a list of users, given by exactly one of `screen_names` and
/// `user_ids`, to their profile records.
///
/// The input is partitioned into consecutive batches of at most
/// [`BATCH_LIMIT`], sent first batch first. A batch that turns out
/// permanently unservable contributes nothing; the partial mapping is
/// still valid data.
pub async fn lookup_profiles(
    client: &ApiClient,
    executor: &RequestExecutor,
    screen_names: Option<&[String]>,
    user_ids: Option<&[u64]>,
) -> Result<HashMap<ProfileKey, ProfileRecord>> {
    match (screen_names, user_ids) {
        (Some(names), None) => lookup_by_names(client, executor, names).await,
        (None, Some(ids)) => lookup_by_ids(client, executor, ids).await,
        (Some(_), Some(_)) => Err(ApiError::InvalidArgument(
            "supply screen names or user ids, not both".to_string(),
        )),
        (None, None) => Err(ApiError::InvalidArgument(
            "supply screen names or user ids".to_string(),
        )),
    }
}

async fn lookup_by_names(
    client: &ApiClient,
    executor: &RequestExecutor,
    names: &[String],
) -> Result<HashMap<ProfileKey, ProfileRecord>> {
    let mut profiles = HashMap::new();

    for chunk in names.chunks(BATCH_LIMIT) {
        let joined = chunk.join(",");
        let joined = joined.as_str();
        let records = executor
            .execute(move || async move { client.users_lookup("screen_name", joined).await })
            .await?;

        let Some(records) = records else {
            debug!("Skipping unservable lookup batch of {} names", chunk.len());
            continue;
        };
        for record in records {
            profiles.insert(ProfileKey::Name(record.screen_name.clone()), record);
        }
    }

    Ok(profiles)
}

async fn lookup_by_ids(
    client: &ApiClient,
    executor: &RequestExecutor,
    ids: &[u64],
) -> Result<HashMap<ProfileKey, ProfileRecord>> {
    let mut profiles = HashMap::new();

    for chunk in ids.chunks(BATCH_LIMIT) {
        let joined = chunk
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let joined = joined.as_str();
        let records = executor
            .execute(move || async move { client.users_lookup("user_id", joined).await })
            .await?;

        let Some(records) = records else {
            debug!("Skipping unservable lookup batch of {} ids", chunk.len());
            continue;
        };
        for record in records {
            profiles.insert(ProfileKey::Id(record.id), record);
        }
    }

    Ok(profiles)
}
