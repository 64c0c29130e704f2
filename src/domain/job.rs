use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A normalized job posting produced by extraction.
///
/// Records are never mutated once extracted; the orchestrator only moves
/// them between per-source accumulators and the final result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub date_posted: Option<DateTime<Utc>>,
    pub link: String,
    pub source: String,
}

impl JobRecord {
    /// Deterministic dedup key over the normalized (title, company, location) triple.
    ///
    /// Link and source are deliberately left out so the same posting mirrored
    /// on two sites collapses to one record.
    pub fn fingerprint(&self) -> String {
        Self::generate_fingerprint(&self.title, &self.company, &self.location)
    }

    pub fn generate_fingerprint(title: &str, company: &str, location: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalize(title).as_bytes());
        hasher.update(b"|");
        hasher.update(normalize(company).as_bytes());
        hasher.update(b"|");
        hasher.update(normalize(location).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// One-line summary used by the CLI listing.
    pub fn display_line(&self) -> String {
        let date = self
            .date_posted
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "          ".to_string());
        format!(
            "{} {} @ {} ({}) [{}]",
            date, self.title, self.company, self.location, self.source
        )
    }
}

/// Lowercase and collapse internal whitespace.
fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, company: &str, location: &str, source: &str) -> JobRecord {
        JobRecord {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            description: String::new(),
            salary: None,
            job_type: None,
            experience_level: None,
            date_posted: None,
            link: format!("https://{}.example/job", source),
            source: source.into(),
        }
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let a = job("Rust Developer", "Acme", "Cape Town", "s1");
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_case_and_whitespace() {
        let a = job("Rust Developer", "Acme", "Cape Town", "s1");
        let b = job("  rust   DEVELOPER ", "ACME", "cape\ttown", "s1");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_link_and_source() {
        let a = job("Rust Developer", "Acme", "Cape Town", "s1");
        let b = job("Rust Developer", "Acme", "Cape Town", "s2");
        assert_ne!(a.link, b.link);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_field_boundaries() {
        let a = job("ab", "c", "d", "s1");
        let b = job("a", "bc", "d", "s1");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let id = job("Rust Developer", "Acme", "Cape Town", "s1").fingerprint();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_serializes_date_as_iso8601() {
        let mut j = job("Rust Developer", "Acme", "Cape Town", "s1");
        j.date_posted = Some("2024-03-01T08:00:00Z".parse().unwrap());
        let json = serde_json::to_value(&j).unwrap();
        assert_eq!(json["date_posted"], "2024-03-01T08:00:00Z");

        let undated = serde_json::to_value(job("a", "b", "c", "s1")).unwrap();
        assert!(undated["date_posted"].is_null());
    }
}
