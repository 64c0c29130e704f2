//! Table-driven extraction of job records from a results page.
//!
//! [`extract`] is a pure function of the page content, the site's selector
//! map and an [`ExtractContext`]. Every failure is soft: a container missing
//! a title or company is skipped, and a page whose container selector cannot
//! be used yields no records.

mod dates;

pub use dates::parse_posted_date;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{JobRecord, SiteConfig};

/// Descriptions are cut to this many characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Inputs to extraction that come from the run rather than the page.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// Used when a container has no location of its own
    pub fallback_location: String,
    /// Reference time for relative dates such as "3 days ago"
    pub now: DateTime<Utc>,
}

impl ExtractContext {
    pub fn new(fallback_location: impl Into<String>) -> Self {
        Self {
            fallback_location: fallback_location.into(),
            now: Utc::now(),
        }
    }

    pub fn at(fallback_location: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            fallback_location: fallback_location.into(),
            now,
        }
    }
}

struct CompiledSelectors {
    container: Selector,
    title: Option<Selector>,
    company: Option<Selector>,
    location: Option<Selector>,
    description: Option<Selector>,
    salary: Option<Selector>,
    link: Option<Selector>,
    job_type: Option<Selector>,
    experience_level: Option<Selector>,
    date_posted: Option<Selector>,
}

impl CompiledSelectors {
    /// `None` only when the container selector itself is unusable.
    fn compile(site: &SiteConfig) -> Option<Self> {
        let s = &site.selectors;
        let optional = |selector: &Option<String>| selector.as_deref().and_then(parse_selector);

        Some(Self {
            container: parse_selector(&s.container)?,
            title: parse_selector(&s.title),
            company: parse_selector(&s.company),
            location: optional(&s.location),
            description: optional(&s.description),
            salary: optional(&s.salary),
            link: optional(&s.link),
            job_type: optional(&s.job_type),
            experience_level: optional(&s.experience_level),
            date_posted: optional(&s.date_posted),
        })
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!("Unusable selector {:?}: {}", selector, e);
            None
        }
    }
}

/// Extract job records from `content` in document order.
pub fn extract(content: &str, site: &SiteConfig, ctx: &ExtractContext) -> Vec<JobRecord> {
    let Some(selectors) = CompiledSelectors::compile(site) else {
        tracing::debug!(site = %site.id, "Container selector unusable, page yields no jobs");
        return Vec::new();
    };
    let base_url = Url::parse(&site.base_url).ok();

    let document = Html::parse_document(content);
    let mut jobs = Vec::new();
    let mut skipped = 0usize;

    for container in document.select(&selectors.container) {
        match extract_job(container, &selectors, site, base_url.as_ref(), ctx) {
            Some(job) => jobs.push(job),
            None => skipped += 1,
        }
    }

    tracing::debug!(
        site = %site.id,
        found = jobs.len(),
        skipped,
        "Extracted jobs from page"
    );
    jobs
}

fn extract_job(
    container: ElementRef<'_>,
    selectors: &CompiledSelectors,
    site: &SiteConfig,
    base_url: Option<&Url>,
    ctx: &ExtractContext,
) -> Option<JobRecord> {
    let title = select_text(container, selectors.title.as_ref())?;
    let company = select_text(container, selectors.company.as_ref())?;

    let location = select_text(container, selectors.location.as_ref())
        .unwrap_or_else(|| ctx.fallback_location.clone());
    let description = select_text(container, selectors.description.as_ref())
        .map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS))
        .unwrap_or_default();

    let date_posted = selectors
        .date_posted
        .as_ref()
        .and_then(|selector| container.select(selector).next())
        .and_then(|el| {
            el.value()
                .attr("datetime")
                .and_then(|raw| parse_posted_date(raw, ctx.now))
                .or_else(|| parse_posted_date(&element_text(el), ctx.now))
        });

    let link = selectors
        .link
        .as_ref()
        .and_then(|selector| container.select(selector).next())
        .and_then(find_href)
        .and_then(|href| resolve_link(base_url, href))
        .unwrap_or_else(|| site.base_url.clone());

    Some(JobRecord {
        title,
        company,
        location,
        description,
        salary: select_text(container, selectors.salary.as_ref()),
        job_type: select_text(container, selectors.job_type.as_ref()),
        experience_level: select_text(container, selectors.experience_level.as_ref()),
        date_posted,
        link,
        source: site.id.clone(),
    })
}

/// Cleaned text of the first match, `None` when absent or blank.
fn select_text(container: ElementRef<'_>, selector: Option<&Selector>) -> Option<String> {
    let el = container.select(selector?).next()?;
    let text = element_text(el);
    (!text.is_empty()).then_some(text)
}

fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// Collapse runs of whitespace and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// `href` of the matched element, or of the first link inside it.
fn find_href(el: ElementRef<'_>) -> Option<&str> {
    if let Some(href) = el.value().attr("href") {
        return Some(href);
    }
    let anchor = Selector::parse("a[href]").ok()?;
    el.select(&anchor).next()?.value().attr("href")
}

fn resolve_link(base_url: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = match base_url {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
