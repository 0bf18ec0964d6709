//! Fetching raw menu records from the remote API.
//!
//! The API is a black box returning loosely-typed records; this module
//! only knows the three listing endpoints and the two response shapes
//! seen in practice. [`FeedView`] guards against responses that arrive
//! after the view asking for them has gone away.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::model::{DisplayMenu, RawMenuRecord, RestaurantContext};
use crate::normalize::MenuNormalizer;
use crate::urls::encode_component;
use crate::MenuError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    Featured,
    /// Menus carrying one claim, by its API key
    ByCategory { backend_key: String },
    /// The merchant's own storefront
    MyStore { restaurant_slug: String },
}

impl FeedQuery {
    fn path(&self) -> String {
        match self {
            FeedQuery::Featured => "/menus/featured".to_string(),
            FeedQuery::ByCategory { backend_key } => {
                format!("/menus?claim={}", encode_component(backend_key))
            }
            FeedQuery::MyStore { restaurant_slug } => {
                format!("/restaurants/{}/menus", encode_component(restaurant_slug))
            }
        }
    }

    /// Restaurant fields the records of this query may omit
    fn context(&self) -> Option<RestaurantContext> {
        match self {
            FeedQuery::MyStore { restaurant_slug } => Some(RestaurantContext {
                slug: Some(restaurant_slug.clone()),
                ..Default::default()
            }),
            _ => None,
        }
    }
}

/// Source of raw menu records
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawMenuRecord>, MenuError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedBody {
    List(Vec<Value>),
    Data { data: Vec<Value> },
    Menus { menus: Vec<Value> },
}

impl FeedBody {
    fn into_records(self) -> Vec<RawMenuRecord> {
        let items = match self {
            FeedBody::List(items) | FeedBody::Data { data: items } | FeedBody::Menus { menus: items } => {
                items
            }
        };
        items.into_iter().map(RawMenuRecord::from_value).collect()
    }
}

pub struct HttpFeedSource {
    client: Client,
    base_url: String,
}

impl HttpFeedSource {
    pub fn new(config: &ApiConfig) -> Result<Self, MenuError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("menu-kit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, query: &FeedQuery) -> String {
        format!("{}{}", self.base_url, query.path())
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawMenuRecord>, MenuError> {
        let url = self.url_for(query);
        debug!("Fetching menu feed from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MenuError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let records = serde_json::from_str::<FeedBody>(&body)?.into_records();
        info!("Fetched {} menu records from {}", records.len(), url);
        Ok(records)
    }
}

/// Fetch and normalize one feed, keeping the order the API returned.
pub async fn load_feed(
    source: &dyn FeedSource,
    query: &FeedQuery,
    normalizer: &MenuNormalizer,
) -> Result<Vec<DisplayMenu>, MenuError> {
    let records = source.fetch(query).await?;
    let context = query.context();
    Ok(normalizer.normalize_all(&records, context.as_ref()))
}

/// One mounted view that lists a feed.
///
/// At most one request per view counts: starting a new one or unmounting
/// the view makes every earlier [`FeedTicket`] stale.
#[derive(Debug, Clone, Default)]
pub struct FeedView {
    generation: Arc<AtomicU64>,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> FeedTicket {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        FeedTicket {
            id,
            generation: Arc::clone(&self.generation),
        }
    }

    pub fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Load a feed for this view.
    ///
    /// `Ok(None)` means the response went stale while in flight and was
    /// dropped; failures of stale requests are dropped the same way.
    pub async fn load(
        &self,
        source: &dyn FeedSource,
        query: &FeedQuery,
        normalizer: &MenuNormalizer,
    ) -> Result<Option<Vec<DisplayMenu>>, MenuError> {
        let ticket = self.begin();
        match load_feed(source, query, normalizer).await {
            Ok(menus) => Ok(ticket.accept(menus)),
            Err(e) if ticket.is_current() => Err(e),
            Err(e) => {
                debug!("Dropping error from stale feed request: {}", e);
                Ok(None)
            }
        }
    }
}

#[derive(Debug)]
pub struct FeedTicket {
    id: u64,
    generation: Arc<AtomicU64>,
}

impl FeedTicket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }

    /// Hand the response back only if this ticket is still current.
    pub fn accept<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            debug!("Discarding stale feed response (request {})", self.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticSource {
        records: Vec<Value>,
        // Simulates the user leaving the screen while the request is in flight
        unmount_during_fetch: Option<FeedView>,
    }

    #[async_trait]
    impl FeedSource for StaticSource {
        async fn fetch(&self, _query: &FeedQuery) -> Result<Vec<RawMenuRecord>, MenuError> {
            if let Some(view) = &self.unmount_during_fetch {
                view.unmount();
            }
            Ok(self
                .records
                .iter()
                .cloned()
                .map(RawMenuRecord::from_value)
                .collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl FeedSource for FailingSource {
        async fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawMenuRecord>, MenuError> {
            Err(MenuError::Api {
                status: 503,
                url: query.path(),
            })
        }
    }

    #[test]
    fn test_query_paths() {
        assert_eq!(FeedQuery::Featured.path(), "/menus/featured");
        assert_eq!(
            FeedQuery::ByCategory {
                backend_key: "low_sugar".into()
            }
            .path(),
            "/menus?claim=low_sugar"
        );
        assert_eq!(
            FeedQuery::MyStore {
                restaurant_slug: "warung sehat".into()
            }
            .path(),
            "/restaurants/warung%20sehat/menus"
        );
    }

    #[test]
    fn test_feed_body_shapes() {
        for body in [
            r#"[{"name": "A"}, {"name": "B"}]"#,
            r#"{"data": [{"name": "A"}, {"name": "B"}]}"#,
            r#"{"menus": [{"name": "A"}, {"name": "B"}]}"#,
        ] {
            let records = serde_json::from_str::<FeedBody>(body).unwrap().into_records();
            assert_eq!(records.len(), 2);
            assert_eq!(records[1].name, Some(json!("B")));
        }
        assert!(serde_json::from_str::<FeedBody>(r#"{"error": "nope"}"#).is_err());
    }

    #[test]
    fn test_newer_ticket_invalidates_older() {
        let view = FeedView::new();
        let first = view.begin();
        assert!(first.is_current());

        let second = view.begin();
        assert!(!first.is_current());
        assert_eq!(first.accept(1), None);
        assert_eq!(second.accept(2), Some(2));

        view.unmount();
        assert_eq!(second.accept(3), None);
    }

    #[tokio::test]
    async fn test_load_keeps_order_and_applies_store_context() {
        let source = StaticSource {
            records: vec![json!({ "id": 2, "name": "Kedua" }), json!({ "id": 1, "name": "Pertama" })],
            unmount_during_fetch: None,
        };
        let query = FeedQuery::MyStore {
            restaurant_slug: "dapur-hijau".into(),
        };
        let menus = FeedView::new()
            .load(&source, &query, &MenuNormalizer::default())
            .await
            .unwrap()
            .unwrap();

        let ids: Vec<&str> = menus.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(menus.iter().all(|m| m.restaurant_slug == "dapur-hijau"));
    }

    #[tokio::test]
    async fn test_response_after_unmount_is_discarded() {
        let view = FeedView::new();
        let source = StaticSource {
            records: vec![json!({ "name": "Terlambat" })],
            unmount_during_fetch: Some(view.clone()),
        };
        let result = view
            .load(&source, &FeedQuery::Featured, &MenuNormalizer::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_errors_surface_only_for_current_requests() {
        let view = FeedView::new();
        let result = view
            .load(&FailingSource, &FeedQuery::Featured, &MenuNormalizer::default())
            .await;
        assert!(matches!(result, Err(MenuError::Api { status: 503, .. })));
    }
}
