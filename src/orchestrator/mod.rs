//! Concurrent multi-site scraping.
//!
//! One task per site runs the pagination state machine in [`source`]; the
//! tasks share only the [`SiteFetcher`] (connection pool and rate limits)
//! and the run's [`Deduplicator`]. A failing site never affects its
//! siblings, and the run's result is whatever every site accumulated,
//! newest postings first.
//!
//! ```text
//!            ┌─ site A: page → fetch → extract → dedup ─┐
//! request ──►├─ site B: page → fetch → extract → dedup ─┤──► merge ──► sort
//!            └─ site C: ...                             ─┘
//! ```

pub mod dedup;
pub mod pagination;
pub mod source;

pub use dedup::Deduplicator;
pub use source::{SourceOutcome, SourceQuery, SourceReport, SourceState};

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::app::{JobScoutError, Result};
use crate::domain::{JobRecord, SiteConfig};
use crate::fetcher::SiteFetcher;
use crate::registry::SiteRegistry;

/// Parameters of one orchestration run.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub query: String,
    pub location: String,
    pub per_source_limit: usize,
    /// Stop issuing fetches after this long and return what has been gathered
    pub deadline: Option<Duration>,
    /// Treat a run where every site failed or came back empty as an error
    pub fail_on_empty: bool,
}

impl ScrapeRequest {
    pub fn new(query: impl Into<String>, location: impl Into<String>, per_source_limit: usize) -> Self {
        Self {
            query: query.into(),
            location: location.into(),
            per_source_limit,
            deadline: None,
            fail_on_empty: true,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.fail_on_empty = false;
        self
    }
}

/// Merged result of a run plus how each site ended.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub jobs: Vec<JobRecord>,
    pub sources: Vec<SourceReport>,
}

impl ScrapeReport {
    /// Every site failed or ran dry and nothing was gathered.
    pub fn is_total_failure(&self) -> bool {
        self.jobs.is_empty()
            && self
                .sources
                .iter()
                .all(|s| matches!(s.state, SourceState::Failed | SourceState::Exhausted))
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources
            .iter()
            .filter(|s| s.state == SourceState::Failed)
    }
}

/// Owns the fetch stack for its lifetime; each run gets a fresh deduplicator.
pub struct Orchestrator {
    registry: Arc<SiteRegistry>,
    fetcher: Arc<SiteFetcher>,
}

impl Orchestrator {
    pub fn new(registry: Arc<SiteRegistry>, fetcher: SiteFetcher) -> Self {
        Self {
            registry,
            fetcher: Arc::new(fetcher),
        }
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    /// Scrape every enabled site and return the merged, date-sorted jobs.
    pub async fn scrape_all(
        &self,
        query: &str,
        location: &str,
        per_source_limit: usize,
    ) -> Result<Vec<JobRecord>> {
        let request = ScrapeRequest::new(query, location, per_source_limit);
        Ok(self.run(&request, CancellationToken::new()).await?.jobs)
    }

    /// Scrape every site enabled at the moment the run starts.
    pub async fn run(&self, request: &ScrapeRequest, cancel: CancellationToken) -> Result<ScrapeReport> {
        let sites = self.registry.list_enabled();
        if sites.is_empty() {
            return Err(JobScoutError::NoEnabledSources);
        }
        self.run_on(sites, request, cancel).await
    }

    /// Scrape the named sites, enabled or not. Unknown ids fail before any fetch.
    pub async fn run_sites(
        &self,
        site_ids: &[String],
        request: &ScrapeRequest,
        cancel: CancellationToken,
    ) -> Result<ScrapeReport> {
        let sites = site_ids
            .iter()
            .map(|id| self.registry.get(id))
            .collect::<Result<Vec<_>>>()?;
        if sites.is_empty() {
            return Err(JobScoutError::NoEnabledSources);
        }
        self.run_on(sites, request, cancel).await
    }

    /// Run one site's state machine directly, without fan-out.
    pub async fn scrape_site(
        &self,
        site_id: &str,
        query: &str,
        location: &str,
        limit: usize,
    ) -> Result<SourceOutcome> {
        let site = self.registry.get(site_id)?;
        let params = SourceQuery {
            query: query.to_string(),
            location: location.to_string(),
            limit,
            now: Utc::now(),
        };
        let dedup = Deduplicator::new();
        Ok(source::run_source(&site, &self.fetcher, &dedup, &params, &CancellationToken::new()).await)
    }

    async fn run_on(
        &self,
        sites: Vec<SiteConfig>,
        request: &ScrapeRequest,
        cancel: CancellationToken,
    ) -> Result<ScrapeReport> {
        tracing::info!(
            query = %request.query,
            location = %request.location,
            sites = sites.len(),
            "Starting scrape"
        );

        let cancel = cancel.child_token();
        let deadline = request.deadline.map(|after| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                tracing::info!("Scrape deadline reached, stopping remaining fetches");
                cancel.cancel();
            })
        });

        let dedup = Arc::new(Deduplicator::new());
        let params = Arc::new(SourceQuery {
            query: request.query.clone(),
            location: request.location.clone(),
            limit: request.per_source_limit,
            now: Utc::now(),
        });

        let mut handles = Vec::with_capacity(sites.len());
        let mut site_ids = Vec::with_capacity(sites.len());
        for site in sites {
            let fetcher = self.fetcher.clone();
            let dedup = dedup.clone();
            let params = params.clone();
            let cancel = cancel.clone();
            site_ids.push(site.id.clone());

            handles.push(tokio::spawn(async move {
                source::run_source(&site, &fetcher, &dedup, &params, &cancel).await
            }));
        }

        let mut jobs = Vec::new();
        let mut sources = Vec::with_capacity(handles.len());
        for (site_id, joined) in site_ids.into_iter().zip(futures::future::join_all(handles).await) {
            match joined {
                Ok(outcome) => {
                    jobs.extend(outcome.jobs);
                    sources.push(outcome.report);
                }
                Err(e) => {
                    tracing::error!(site = %site_id, "Task join error: {}", e);
                    sources.push(SourceReport {
                        site_id,
                        state: SourceState::Failed,
                        pages_fetched: 0,
                        jobs_found: 0,
                        failure: Some(format!("task aborted: {}", e)),
                    });
                }
            }
        }

        if let Some(timer) = deadline {
            timer.abort();
        }

        sort_newest_first(&mut jobs);
        let report = ScrapeReport { jobs, sources };

        tracing::info!(
            jobs = report.jobs.len(),
            failed = report.failed_sources().count(),
            "Scrape complete"
        );

        if request.fail_on_empty && report.is_total_failure() {
            return Err(JobScoutError::NoResults(Box::new(report)));
        }
        Ok(report)
    }
}

/// Stable sort by posting date, newest first, undated last.
pub fn sort_newest_first(jobs: &mut [JobRecord]) {
    jobs.sort_by(|a, b| match (a.date_posted, b.date_posted) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
