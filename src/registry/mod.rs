//! Registry of listing sites.
//!
//! Holds one [`SiteConfig`] per site in registration order. The only
//! mutation after startup is toggling `enabled`, which orchestration runs
//! observe when they start (each run snapshots [`SiteRegistry::list_enabled`]).

mod builtin;

pub use builtin::builtin_sites;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use scraper::Selector;
use url::Url;

use crate::app::{JobScoutError, Result};
use crate::domain::SiteConfig;

#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: RwLock<Vec<SiteConfig>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in sites.
    pub fn with_builtin_sites() -> Self {
        Self {
            sites: RwLock::new(builtin_sites()),
        }
    }

    pub fn from_sites(sites: Vec<SiteConfig>) -> Result<Self> {
        let registry = Self::new();
        for site in sites {
            registry.register(site)?;
        }
        Ok(registry)
    }

    /// Add a site, or replace the one with the same id in place (keeping its position).
    pub fn register(&self, site: SiteConfig) -> Result<()> {
        validate(&site)?;

        let mut sites = self.write();
        match sites.iter_mut().find(|s| s.id == site.id) {
            Some(existing) => *existing = site,
            None => sites.push(site),
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<SiteConfig> {
        self.read()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| JobScoutError::UnknownSite(id.to_string()))
    }

    pub fn enable(&self, id: &str) -> Result<()> {
        self.set_enabled(id, true)
    }

    pub fn disable(&self, id: &str) -> Result<()> {
        self.set_enabled(id, false)
    }

    /// Enabled sites in registration order.
    pub fn list_enabled(&self) -> Vec<SiteConfig> {
        self.read().iter().filter(|s| s.enabled).cloned().collect()
    }

    pub fn list_all(&self) -> Vec<SiteConfig> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn set_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let mut sites = self.write();
        let site = sites
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| JobScoutError::UnknownSite(id.to_string()))?;

        if site.enabled != enabled {
            tracing::info!(site = %id, enabled, "Site toggled");
            site.enabled = enabled;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<SiteConfig>> {
        self.sites.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<SiteConfig>> {
        self.sites.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn validate(site: &SiteConfig) -> Result<()> {
    let invalid = |reason: String| JobScoutError::InvalidSite {
        id: site.id.clone(),
        reason,
    };

    if site.id.trim().is_empty() {
        return Err(invalid("site id must not be empty".into()));
    }

    Url::parse(&site.base_url).map_err(|e| invalid(format!("base_url: {}", e)))?;

    if !site.search_url.contains("{query}") {
        return Err(invalid("search_url has no {query} placeholder".into()));
    }

    if site.search_url.contains("{start}") && site.page_size == 0 {
        return Err(invalid("page_size must be positive for {start} pagination".into()));
    }

    let selectors = &site.selectors;
    let required = [
        ("container", Some(&selectors.container)),
        ("title", Some(&selectors.title)),
        ("company", Some(&selectors.company)),
    ];
    let optional = [
        ("location", selectors.location.as_ref()),
        ("description", selectors.description.as_ref()),
        ("salary", selectors.salary.as_ref()),
        ("link", selectors.link.as_ref()),
        ("job_type", selectors.job_type.as_ref()),
        ("experience_level", selectors.experience_level.as_ref()),
        ("date_posted", selectors.date_posted.as_ref()),
    ];

    for (field, selector) in required.into_iter().chain(optional) {
        if let Some(selector) = selector {
            Selector::parse(selector)
                .map_err(|e| invalid(format!("{} selector {:?}: {}", field, selector, e)))?;
        }
    }

    Ok(())
}
