// crates/aggregator/src/lib.rs
//! Cross-source search orchestration
//!
//! The [`Aggregator`] owns a registry of source adapters and fans searches
//! out across them concurrently. Individual source failures and timeouts are
//! absorbed into per-source reports; a search only fails outright when every
//! dispatched source fails.

use brewbooks_core::{Item, SourceId};
use brewbooks_network::HttpClient;
use brewbooks_sources::{
    ArchiveAdapter, BbcAdapter, GutenbergAdapter, LibriVoxAdapter, Lit2GoAdapter,
    OpenLibraryAdapter, PodcastAdapter, SearchQuery, SourceAdapter, StorynoryAdapter,
};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Sources dispatched by the combined search. Metadata-only and niche
/// sources are reachable through [`Aggregator::search_source`] instead.
const FAN_OUT: &[SourceId] = &[SourceId::Librivox, SourceId::Archive];

const INVALID_SOURCE: &str = "Invalid source";

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Budget for each individual source call
    pub source_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            source_timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome of one source's part in a search
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: SourceId,
    pub count: usize,
    pub error: Option<String>,
}

/// Combined search outcome
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub items: Vec<Item>,
    pub total: usize,
    pub sources: Vec<SourceReport>,
    pub error: Option<String>,
}

impl SearchResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            items: Vec::new(),
            total: 0,
            sources: Vec::new(),
            error: Some(error.into()),
        }
    }
}

pub struct Aggregator {
    registry: HashMap<SourceId, Box<dyn SourceAdapter>>,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Adapters are injected; nothing is global
    pub fn new(
        registry: HashMap<SourceId, Box<dyn SourceAdapter>>,
        config: AggregatorConfig,
    ) -> Self {
        Self { registry, config }
    }

    /// Registry with every known source, sharing one HTTP client
    pub fn with_default_sources(client: HttpClient, config: AggregatorConfig) -> Self {
        let mut registry: HashMap<SourceId, Box<dyn SourceAdapter>> = HashMap::new();
        registry.insert(
            SourceId::Librivox,
            Box::new(LibriVoxAdapter::new(client.clone())),
        );
        registry.insert(
            SourceId::Archive,
            Box::new(ArchiveAdapter::new(client.clone())),
        );
        registry.insert(
            SourceId::OpenLibrary,
            Box::new(OpenLibraryAdapter::new(client.clone())),
        );
        registry.insert(
            SourceId::Gutenberg,
            Box::new(GutenbergAdapter::new(client.clone())),
        );
        registry.insert(SourceId::Bbc, Box::new(BbcAdapter::new(client.clone())));
        registry.insert(
            SourceId::Lit2Go,
            Box::new(Lit2GoAdapter::new(client.clone())),
        );
        registry.insert(
            SourceId::Storynory,
            Box::new(StorynoryAdapter::new(client.clone())),
        );
        registry.insert(SourceId::Podcast, Box::new(PodcastAdapter::new(client)));
        Self::new(registry, config)
    }

    pub fn sources(&self) -> Vec<SourceId> {
        let mut ids: Vec<SourceId> = self.registry.keys().copied().collect();
        ids.sort_by_key(|id| id.as_str());
        ids
    }

    /// Searches the fan-out sources concurrently and merges the results.
    ///
    /// The limit is split evenly across the dispatched sources. Merged order
    /// is dispatch order, then each source's own order; duplicates keep the
    /// first occurrence.
    pub async fn search_all(&self, text: &str, limit: usize) -> SearchResponse {
        let dispatched: Vec<SourceId> = FAN_OUT
            .iter()
            .copied()
            .filter(|id| self.registry.contains_key(id))
            .collect();
        if dispatched.is_empty() {
            return SearchResponse::failure("No sources registered");
        }

        let per_source = (limit / dispatched.len()).max(1);
        let query = SearchQuery::new(text).with_limit(per_source);

        let calls = dispatched
            .iter()
            .map(|&id| self.run_source(id, query.clone()));
        let outcomes = join_all(calls).await;

        let mut items = Vec::new();
        let mut sources = Vec::with_capacity(outcomes.len());
        for (source_items, report) in outcomes {
            items.extend(source_items);
            sources.push(report);
        }

        let items = dedup(items);
        let success = sources.iter().any(|r| r.error.is_none());
        let error = if success {
            None
        } else {
            sources.iter().find_map(|r| r.error.clone())
        };

        SearchResponse {
            success,
            total: items.len(),
            items,
            sources,
            error,
        }
    }

    /// Searches one source, addressed by its string key
    pub async fn search_source(&self, key: &str, text: &str, limit: usize) -> SearchResponse {
        let Some(adapter) = key
            .parse::<SourceId>()
            .ok()
            .and_then(|id| self.registry.get(&id))
        else {
            return SearchResponse::failure(INVALID_SOURCE);
        };

        let query = SearchQuery::new(text).with_limit(limit);
        let (items, report) = self.run_source(adapter.id(), query).await;
        SearchResponse {
            success: report.error.is_none(),
            total: items.len(),
            items,
            error: report.error.clone(),
            sources: vec![report],
        }
    }

    /// Popular items, served from the archive source's default set
    pub async fn featured(&self, limit: usize) -> SearchResponse {
        self.search_source(SourceId::Archive.as_str(), "", limit)
            .await
    }

    /// On-demand audio resolution for items listed without a direct URL
    pub async fn resolve_audio(&self, source: SourceId, raw_id: &str) -> Option<String> {
        let adapter = self.registry.get(&source)?;
        match adapter.resolve_audio(raw_id).await {
            Ok(url) => url,
            Err(e) => {
                log::warn!("audio resolution failed for {source}/{raw_id}: {e}");
                None
            }
        }
    }

    async fn run_source(&self, id: SourceId, query: SearchQuery) -> (Vec<Item>, SourceReport) {
        let adapter = match self.registry.get(&id) {
            Some(adapter) => adapter,
            None => {
                return (
                    Vec::new(),
                    SourceReport {
                        source: id,
                        count: 0,
                        error: Some(INVALID_SOURCE.to_string()),
                    },
                )
            }
        };

        // Timing out drops the in-flight future, which cancels the request
        let outcome = tokio::time::timeout(self.config.source_timeout, adapter.search(&query)).await;
        match outcome {
            Ok(Ok(page)) => {
                let count = page.items.len();
                log::debug!("{id}: {count} items");
                (
                    page.items,
                    SourceReport {
                        source: id,
                        count,
                        error: None,
                    },
                )
            }
            Ok(Err(e)) => {
                log::warn!("{id} search failed: {e}");
                (
                    Vec::new(),
                    SourceReport {
                        source: id,
                        count: 0,
                        error: Some(e.to_string()),
                    },
                )
            }
            Err(_) => {
                log::warn!(
                    "{id} search timed out after {:?}",
                    self.config.source_timeout
                );
                (
                    Vec::new(),
                    SourceReport {
                        source: id,
                        count: 0,
                        error: Some("Source timed out".to_string()),
                    },
                )
            }
        }
    }
}

/// Drops items whose normalized title+author key was already seen.
/// Order-preserving and idempotent.
pub fn dedup(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.dedup_key()))
        .collect()
}
