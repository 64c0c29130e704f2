use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::domain::{JobRecord, SiteConfig};
use crate::extractor::{self, ExtractContext};
use crate::fetcher::{FetchResult, SiteFetcher};
use crate::orchestrator::dedup::Deduplicator;
use crate::orchestrator::pagination::page_url;

/// Pagination state of one source within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceState {
    Paging,
    /// A page produced no newly admitted jobs
    Exhausted,
    /// A fetch failed; jobs gathered before it are kept
    Failed,
    /// Hit the per-source limit or the site's page cap
    Done,
    /// Stopped by cancellation or the run deadline
    Cancelled,
}

impl SourceState {
    pub fn is_terminal(self) -> bool {
        self != SourceState::Paging
    }
}

/// What one source did during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub site_id: String,
    pub state: SourceState,
    pub pages_fetched: usize,
    pub jobs_found: usize,
    pub failure: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub report: SourceReport,
    pub jobs: Vec<JobRecord>,
}

/// Search parameters shared by every source of a run.
#[derive(Debug, Clone)]
pub struct SourceQuery {
    pub query: String,
    pub location: String,
    pub limit: usize,
    pub now: DateTime<Utc>,
}

/// Drive one site's pagination until it reaches a terminal state.
///
/// Pages are fetched strictly one after another. Every candidate passes
/// through the shared deduplicator and admission stops once `limit` jobs
/// have been kept, so jobs past the limit stay available to other sources.
pub async fn run_source(
    site: &SiteConfig,
    fetcher: &SiteFetcher,
    dedup: &Deduplicator,
    params: &SourceQuery,
    cancel: &CancellationToken,
) -> SourceOutcome {
    let ctx = ExtractContext::at(params.location.clone(), params.now);
    let mut state = SourceState::Paging;
    let mut jobs: Vec<JobRecord> = Vec::new();
    let mut page_index = 0usize;
    let mut pages_fetched = 0usize;
    let mut failure = None;

    tracing::info!(site = %site.id, query = %params.query, location = %params.location, "Scraping {}", site.display_name());

    if params.limit == 0 || site.max_pages == 0 {
        state = SourceState::Done;
    }

    while state == SourceState::Paging {
        if cancel.is_cancelled() {
            state = SourceState::Cancelled;
            break;
        }

        let url = page_url(site, &params.query, &params.location, page_index);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = fetcher.fetch(&url, site) => Some(result),
        };

        let body = match result {
            None => {
                state = SourceState::Cancelled;
                break;
            }
            Some(FetchResult::Failed(reason)) => {
                failure = Some(reason.to_string());
                state = SourceState::Failed;
                break;
            }
            Some(FetchResult::Content { body }) => body,
        };
        pages_fetched += 1;

        let remaining = params.limit - jobs.len();
        let mut admitted = 0usize;
        for job in extractor::extract(&body, site, &ctx) {
            if admitted == remaining {
                break;
            }
            if dedup.admit(&job) {
                jobs.push(job);
                admitted += 1;
            }
        }

        tracing::debug!(site = %site.id, page = page_index + 1, admitted, "Page processed");

        if admitted == 0 {
            state = SourceState::Exhausted;
            continue;
        }

        page_index += 1;
        if jobs.len() >= params.limit || page_index >= site.max_pages {
            state = SourceState::Done;
        }
    }

    tracing::info!(
        site = %site.id,
        state = ?state,
        pages = pages_fetched,
        jobs = jobs.len(),
        "Finished {}",
        site.display_name()
    );

    SourceOutcome {
        report: SourceReport {
            site_id: site.id.clone(),
            state,
            pages_fetched,
            jobs_found: jobs.len(),
            failure,
        },
        jobs,
    }
}
