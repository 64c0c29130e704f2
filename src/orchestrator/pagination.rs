use url::form_urlencoded::byte_serialize;

use crate::domain::SiteConfig;

/// Build the URL of the zero-based `page_index` results page for a site.
///
/// Templates with `{start}` paginate by result offset (`page_index *
/// page_size`); templates with `{page}` use a 1-based page number.
/// Query and location are form-encoded, so spaces become `+`.
pub fn page_url(site: &SiteConfig, query: &str, location: &str, page_index: usize) -> String {
    let offset = page_index.saturating_mul(site.page_size);
    site.search_url
        .replace("{query}", &encode(query))
        .replace("{location}", &encode(location))
        .replace("{start}", &offset.to_string())
        .replace("{page}", &page_index.saturating_add(1).to_string())
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin_sites;

    fn site(id: &str) -> SiteConfig {
        builtin_sites().into_iter().find(|s| s.id == id).unwrap()
    }

    #[test]
    fn test_offset_template() {
        let indeed = site("indeed_za");
        assert_eq!(
            page_url(&indeed, "python developer", "Cape Town", 0),
            "https://za.indeed.com/jobs?q=python+developer&l=Cape+Town&start=0"
        );
        assert_eq!(
            page_url(&indeed, "python developer", "Cape Town", 2),
            "https://za.indeed.com/jobs?q=python+developer&l=Cape+Town&start=20"
        );
    }

    #[test]
    fn test_page_number_template() {
        let careers = site("careers24");
        assert_eq!(
            page_url(&careers, "rust", "Durban", 0),
            "https://www.careers24.com/jobs/search?q=rust&l=Durban&p=1"
        );
        assert_eq!(
            page_url(&careers, "rust", "Durban", 3),
            "https://www.careers24.com/jobs/search?q=rust&l=Durban&p=4"
        );
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let careers = site("careers24");
        let url = page_url(&careers, "c++ & c#", "Port Elizabeth", 0);
        assert_eq!(
            url,
            "https://www.careers24.com/jobs/search?q=c%2B%2B+%26+c%23&l=Port+Elizabeth&p=1"
        );
    }

    #[test]
    fn test_custom_page_size() {
        let mut indeed = site("indeed_za");
        indeed.page_size = 25;
        assert!(page_url(&indeed, "a", "b", 2).ends_with("start=50"));
    }

    #[test]
    fn test_huge_page_size_saturates() {
        let mut indeed = site("indeed_za");
        indeed.page_size = usize::MAX;
        let expected = format!("start={}", usize::MAX);
        assert!(page_url(&indeed, "a", "b", 3).ends_with(&expected));
    }
}
