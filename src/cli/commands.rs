use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, JobScoutError, Result};
use crate::cli::SearchArgs;
use crate::config::SearchDefaults;
use crate::domain::FetchMode;
use crate::orchestrator::{ScrapeReport, ScrapeRequest, SourceState};

pub async fn search(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    for id in &args.disable {
        ctx.registry.disable(id)?;
    }

    let request = build_request(&ctx.config.search, args);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, returning jobs gathered so far");
                cancel.cancel();
            }
        })
    };

    let result = if args.sites.is_empty() {
        ctx.orchestrator.run(&request, cancel).await
    } else {
        ctx.orchestrator.run_sites(&args.sites, &request, cancel).await
    };
    interrupt.abort();

    match result {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Err(JobScoutError::NoResults(report)) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_sources(&report);
            }
            Err(JobScoutError::NoResults(report))
        }
        Err(e) => Err(e),
    }
}

pub fn list_sites(ctx: &AppContext) -> Result<()> {
    let sites = ctx.registry.list_all();

    if sites.is_empty() {
        println!("No sites");
        return Ok(());
    }

    for site in sites {
        let marker = if site.enabled { "●" } else { " " };
        let mode = match site.fetch_mode {
            FetchMode::Http => "http",
            FetchMode::Browser => "browser",
        };
        println!(
            "{} {} ({})\n  {} | {}s between requests | up to {} pages",
            marker,
            site.display_name(),
            site.id,
            mode,
            site.rate_limit_secs,
            site.max_pages
        );
    }

    Ok(())
}

/// Merge command-line overrides onto the configured search defaults.
pub fn build_request(defaults: &SearchDefaults, args: &SearchArgs) -> ScrapeRequest {
    let location = args
        .location
        .clone()
        .unwrap_or_else(|| defaults.location.clone());
    let limit = args.limit.unwrap_or(defaults.per_source_limit);

    let mut request = ScrapeRequest::new(args.query.clone(), location, limit);
    if let Some(deadline) = args.timeout.map(Duration::from_secs).or(defaults.deadline()) {
        request = request.with_deadline(deadline);
    }
    if args.allow_empty || !defaults.fail_on_empty {
        request = request.allow_empty();
    }
    request
}

fn print_report(report: &ScrapeReport) {
    if report.jobs.is_empty() {
        println!("No jobs found");
    }

    for job in &report.jobs {
        println!("{}", job.display_line());
        if let Some(salary) = &job.salary {
            println!("  {}", salary);
        }
        println!("  {}", job.link);
    }

    println!();
    print_sources(report);
}

fn print_sources(report: &ScrapeReport) {
    for source in &report.sources {
        let state = match source.state {
            SourceState::Paging => "paging",
            SourceState::Exhausted => "exhausted",
            SourceState::Failed => "failed",
            SourceState::Done => "done",
            SourceState::Cancelled => "cancelled",
        };
        match &source.failure {
            Some(reason) => eprintln!(
                "  {}: {} after {} pages, {} jobs ({})",
                source.site_id, state, source.pages_fetched, source.jobs_found, reason
            ),
            None => println!(
                "  {}: {} after {} pages, {} jobs",
                source.site_id, state, source.pages_fetched, source.jobs_found
            ),
        }
    }
    println!("Search complete: {} jobs", report.jobs.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(query: &str) -> SearchArgs {
        SearchArgs {
            query: query.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_uses_config_defaults() {
        let request = build_request(&SearchDefaults::default(), &args("rust"));
        assert_eq!(request.query, "rust");
        assert_eq!(request.location, "South Africa");
        assert_eq!(request.per_source_limit, 10);
        assert_eq!(request.deadline, None);
        assert!(request.fail_on_empty);
    }

    #[test]
    fn test_request_overrides() {
        let defaults = SearchDefaults {
            deadline_secs: Some(120),
            ..Default::default()
        };
        let mut overrides = args("go");
        overrides.location = Some("Johannesburg".into());
        overrides.limit = Some(3);
        overrides.timeout = Some(15);
        overrides.allow_empty = true;

        let request = build_request(&defaults, &overrides);
        assert_eq!(request.location, "Johannesburg");
        assert_eq!(request.per_source_limit, 3);
        assert_eq!(request.deadline, Some(Duration::from_secs(15)));
        assert!(!request.fail_on_empty);
    }

    #[test]
    fn test_config_deadline_and_empty_policy() {
        let defaults = SearchDefaults {
            deadline_secs: Some(60),
            fail_on_empty: false,
            ..Default::default()
        };
        let request = build_request(&defaults, &args("java"));
        assert_eq!(request.deadline, Some(Duration::from_secs(60)));
        assert!(!request.fail_on_empty);
    }
}
