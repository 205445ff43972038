//! Paginated identifier fetching for both edge directions.

use tracing::{debug, info};

use crate::client::{ApiClient, UserRef};
use crate::error::Result;
use crate::executor::RequestExecutor;

/// Cursor value that starts a listing.
pub const CURSOR_START: i64 = -1;
/// Cursor value the server returns once a listing is exhausted.
pub const CURSOR_END: i64 = 0;

/// Identifier lists for both directions of one user's edges.
#[derive(Debug, Clone, Default)]
pub struct FriendsFollowers {
    pub friends: Vec<u64>,
    pub followers: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Friends,
    Followers,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Friends => "friends",
            Direction::Followers => "followers",
        }
    }
}

/// Fetches up to `friends_cap` outgoing and `followers_cap` incoming
/// identifiers for one user, given by exactly one of `screen_name` and
/// `user_id`.
///
/// The two directions are drained independently, each with its own cursor
/// and cap. A direction that becomes permanently unservable mid-listing
/// keeps whatever it accumulated; that partial list is valid data, not an
/// error.
pub async fn fetch_friends_followers(
    client: &ApiClient,
    executor: &RequestExecutor,
    screen_name: Option<&str>,
    user_id: Option<u64>,
    friends_cap: usize,
    followers_cap: usize,
) -> Result<FriendsFollowers> {
    let user = UserRef::from_options(screen_name, user_id)?;

    let friends = fetch_direction(client, executor, &user, Direction::Friends, friends_cap).await?;
    let followers =
        fetch_direction(client, executor, &user, Direction::Followers, followers_cap).await?;

    Ok(FriendsFollowers { friends, followers })
}

async fn fetch_direction(
    client: &ApiClient,
    executor: &RequestExecutor,
    user: &UserRef,
    direction: Direction,
    cap: usize,
) -> Result<Vec<u64>> {
    let mut ids: Vec<u64> = Vec::new();
    if cap == 0 {
        return Ok(ids);
    }

    let mut cursor = CURSOR_START;
    while cursor != CURSOR_END {
        let page = executor
            .execute(move || async move {
                match direction {
                    Direction::Friends => client.friends_ids(user, cursor).await,
                    Direction::Followers => client.followers_ids(user, cursor).await,
                }
            })
            .await?;

        let Some(page) = page else {
            debug!(
                "{} listing for {} ended early, keeping {} ids",
                direction.label(),
                user.label(),
                ids.len()
            );
            break;
        };

        ids.extend(page.ids);
        cursor = page.next_cursor;

        info!(
            "Fetched {} total {} ids for {}",
            ids.len(),
            direction.label(),
            user.label()
        );

        if ids.len() >= cap {
            break;
        }
    }

    // The last page may overshoot the cap.
    ids.truncate(cap);
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::error::ApiError;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server_uri: &str) -> ApiClient {
        let config = ClientConfig::new(Url::parse(server_uri).unwrap(), "test-token");
        ApiClient::new(config).unwrap()
    }

    fn page(ids: &[u64], next_cursor: i64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"ids": ids, "next_cursor": next_cursor}))
    }

    #[tokio::test]
    async fn test_drains_pages_until_terminal_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/friends/ids.json"))
            .and(query_param("cursor", "-1"))
            .respond_with(page(&[1, 2, 3], 42))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/friends/ids.json"))
            .and(query_param("cursor", "42"))
            .respond_with(page(&[4, 5], 0))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/followers/ids.json"))
            .respond_with(page(&[], 0))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let executor = RequestExecutor::default();
        let result =
            fetch_friends_followers(&client, &executor, Some("alice"), None, 5000, 5000)
                .await
                .unwrap();

        assert_eq!(result.friends, vec![1, 2, 3, 4, 5]);
        assert!(result.followers.is_empty());
    }

    #[tokio::test]
    async fn test_result_never_exceeds_cap() {
        let server = MockServer::start().await;
        // Three-wide pages forever; the cap must stop and truncate.
        Mock::given(method("GET"))
            .and(path("/friends/ids.json"))
            .respond_with(page(&[7, 8, 9], 5))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/followers/ids.json"))
            .respond_with(page(&[1, 2, 3], 0))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let executor = RequestExecutor::default();
        let result = fetch_friends_followers(&client, &executor, None, Some(9), 4, 2)
            .await
            .unwrap();

        assert_eq!(result.friends.len(), 4);
        assert_eq!(result.friends, vec![7, 8, 9, 7]);
        // Caps apply per direction, independently.
        assert_eq!(result.followers, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_returns_min_of_total_available_and_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/friends/ids.json"))
            .respond_with(page(&[1, 2, 3], 0))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/followers/ids.json"))
            .respond_with(page(&[4], 0))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let executor = RequestExecutor::default();
        let result = fetch_friends_followers(&client, &executor, Some("bob"), None, 100, 100)
            .await
            .unwrap();

        assert_eq!(result.friends, vec![1, 2, 3]);
        assert_eq!(result.followers, vec![4]);
    }

    #[tokio::test]
    async fn test_zero_cap_skips_direction_entirely() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/friends/ids.json"))
            .respond_with(page(&[], 0))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/followers/ids.json"))
            .respond_with(page(&[5, 6], 0))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let executor = RequestExecutor::default();
        let result = fetch_friends_followers(&client, &executor, Some("carol"), None, 0, 10)
            .await
            .unwrap();

        assert!(result.friends.is_empty());
        assert_eq!(result.followers, vec![5, 6]);
    }

    #[tokio::test]
    async fn test_invalid_reference_forms_fail_before_any_request() {
        let server = MockServer::start().await;

        let client = test_client(&server.uri());
        let executor = RequestExecutor::default();

        let both = fetch_friends_followers(&client, &executor, Some("a"), Some(1), 10, 10).await;
        assert!(matches!(both, Err(ApiError::InvalidArgument(_))));

        let neither = fetch_friends_followers(&client, &executor, None, None, 10, 10).await;
        assert!(matches!(neither, Err(ApiError::InvalidArgument(_))));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unservable_second_page_keeps_partial_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/friends/ids.json"))
            .and(query_param("cursor", "-1"))
            .respond_with(page(&[1, 2, 3], 7))
            .mount(&server)
            .await;
        // cursor=7 has no mock: wiremock answers 404, which the executor
        // treats as permanently unservable.
        Mock::given(method("GET"))
            .and(path("/followers/ids.json"))
            .respond_with(page(&[9], 0))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let executor = RequestExecutor::default();
        let result = fetch_friends_followers(&client, &executor, Some("dave"), None, 100, 100)
            .await
            .unwrap();

        assert_eq!(result.friends, vec![1, 2, 3]);
        assert_eq!(result.followers, vec![9]);
    }
}
