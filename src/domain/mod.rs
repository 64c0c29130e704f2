pub mod job;
pub mod site;

pub use job::JobRecord;
pub use site::{FetchMode, SelectorMap, SiteConfig};
