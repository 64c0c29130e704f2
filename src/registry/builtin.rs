use crate::domain::{FetchMode, SelectorMap, SiteConfig};

fn sel(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// The listing sites shipped with the crate, in registration order.
pub fn builtin_sites() -> Vec<SiteConfig> {
    vec![
        SiteConfig {
            id: "indeed_za".into(),
            name: "Indeed South Africa".into(),
            base_url: "https://za.indeed.com".into(),
            search_url: "https://za.indeed.com/jobs?q={query}&l={location}&start={start}".into(),
            selectors: SelectorMap {
                container: ".jobsearch-SerpJobCard, .job_seen_beacon".into(),
                title: ".jobTitle a span, .jobTitle-color-purple".into(),
                company: ".companyName, [data-testid=\"company-name\"]".into(),
                location: sel(".companyLocation, [data-testid=\"job-location\"]"),
                description: sel(".job-snippet, [data-testid=\"job-snippet\"]"),
                salary: sel(".salary-snippet, .salaryText"),
                link: sel(".jobTitle a, h2 a"),
                job_type: None,
                experience_level: None,
                date_posted: sel(".date, [data-testid=\"myJobsStateDate\"]"),
            },
            rate_limit_secs: 1.5,
            max_pages: 5,
            page_size: 10,
            fetch_mode: FetchMode::Http,
            enabled: true,
        },
        SiteConfig {
            id: "careers24".into(),
            name: "Careers24".into(),
            base_url: "https://www.careers24.com".into(),
            search_url: "https://www.careers24.com/jobs/search?q={query}&l={location}&p={page}"
                .into(),
            selectors: SelectorMap {
                container: ".job-result-card, .search-result".into(),
                title: ".job-title, h3 a".into(),
                company: ".company-name, .employer".into(),
                location: sel(".job-location, .location"),
                description: sel(".job-description, .snippet"),
                salary: sel(".salary, .remuneration"),
                link: sel(".job-title a, h3 a"),
                job_type: None,
                experience_level: None,
                date_posted: None,
            },
            rate_limit_secs: 2.0,
            max_pages: 5,
            page_size: 10,
            fetch_mode: FetchMode::Http,
            enabled: true,
        },
        SiteConfig {
            id: "pnet".into(),
            name: "PNet".into(),
            base_url: "https://www.pnet.co.za".into(),
            search_url: "https://www.pnet.co.za/jobs/search-results?q={query}&l={location}&p={page}"
                .into(),
            selectors: SelectorMap {
                container: ".job-item, .search-item".into(),
                title: ".job-title, h2 a".into(),
                company: ".company, .employer-name".into(),
                location: sel(".location, .job-location"),
                description: sel(".description, .job-summary"),
                salary: sel(".salary, .package"),
                link: sel(".job-title a, h2 a"),
                job_type: None,
                experience_level: None,
                date_posted: None,
            },
            rate_limit_secs: 2.5,
            max_pages: 5,
            page_size: 10,
            fetch_mode: FetchMode::Http,
            enabled: true,
        },
        SiteConfig {
            id: "spane4all".into(),
            name: "Spane4All".into(),
            base_url: "https://spane4all.co.za".into(),
            search_url: "https://spane4all.co.za/jobs?search={query}&location={location}&page={page}"
                .into(),
            selectors: SelectorMap {
                container: ".job-listing, .job-card".into(),
                title: ".job-title, h3".into(),
                company: ".company-name, .employer".into(),
                location: sel(".job-location, .location"),
                description: sel(".job-description, .summary"),
                salary: sel(".salary, .compensation"),
                link: sel(".job-title a, h3 a"),
                job_type: None,
                experience_level: None,
                date_posted: None,
            },
            rate_limit_secs: 1.0,
            max_pages: 5,
            page_size: 10,
            fetch_mode: FetchMode::Http,
            enabled: true,
        },
        // Rendered client-side; needs a browser, so it ships disabled.
        SiteConfig {
            id: "linkedin".into(),
            name: "LinkedIn Jobs".into(),
            base_url: "https://www.linkedin.com".into(),
            search_url: "https://www.linkedin.com/jobs/search/?keywords={query}&location={location}&f_TPR=r86400&start={start}"
                .into(),
            selectors: SelectorMap {
                container: ".job-search-card".into(),
                title: "h3.base-search-card__title".into(),
                company: "h4.base-search-card__subtitle".into(),
                location: sel(".job-search-card__location"),
                description: None,
                salary: None,
                link: sel("a.base-card__full-link"),
                job_type: None,
                experience_level: None,
                date_posted: sel("time.job-search-card__listdate"),
            },
            rate_limit_secs: 3.0,
            max_pages: 2,
            page_size: 25,
            fetch_mode: FetchMode::Browser,
            enabled: false,
        },
    ]
}
