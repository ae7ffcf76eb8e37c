//! schema.org JSON-LD generation from page content.
//!
//! Every builder here reads a [`Document`](crate::document::Document) and
//! never fails on missing markup: absent elements drop the entry or the
//! optional entity instead.

pub mod breadcrumbs;
pub mod faq;
pub mod graph;
pub mod reviews;
pub mod services;
pub mod types;

pub use faq::{build_faq_page, inject_faq_schema};
pub use graph::{build_seo_graph, inject_seo_schema, GraphSummary, SchemaGraph, SchemaIds};
pub use reviews::{aggregate_rating, build_review_schemas, extract_reviews};
pub use services::{build_location_schemas, build_service_schemas};

use url::Url;

/// Element id of the business graph script.
pub const SEO_SCHEMA_ID: &str = "seo-schema";
/// Element id of the FAQ page script.
pub const FAQ_SCHEMA_ID: &str = "faq-schema";

/// Origin of the page (`https://host[:port]`), or `fallback` when there is no
/// page URL or its origin is opaque (e.g. `file:` URLs).
pub fn resolve_base_url(page_url: Option<&Url>, fallback: &str) -> String {
    match page_url.map(Url::origin) {
        Some(origin) if origin.is_tuple() => origin.ascii_serialization(),
        _ => fallback.trim_end_matches('/').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_url() {
        let page = Url::parse("https://www.example.com:8443/about/index.html?x=1").unwrap();
        assert_eq!(
            resolve_base_url(Some(&page), "https://fallback.example"),
            "https://www.example.com:8443"
        );

        let file = Url::parse("file:///srv/site/index.html").unwrap();
        assert_eq!(
            resolve_base_url(Some(&file), "https://fallback.example/"),
            "https://fallback.example"
        );
        assert_eq!(
            resolve_base_url(None, "https://fallback.example"),
            "https://fallback.example"
        );
    }
}
