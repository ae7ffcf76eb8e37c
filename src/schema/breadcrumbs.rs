use crate::document::{text_of, Document};
use crate::schema::types::{BreadcrumbList, ListItem, SCHEMA_CONTEXT};
use scraper::Selector;
use std::sync::LazyLock;
use url::Url;

static NAV_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".header-nav a, .header-content a").expect("nav link selector is valid")
});

/// Breadcrumbs from the header navigation links, in document order.
///
/// Links are resolved against `page_url` (or `base_url` when the page has
/// none). Links without text are dropped and the remaining ones are numbered
/// from 1. Returns `None` when no link has text.
pub fn build_breadcrumbs(
    document: &Document,
    page_url: Option<&Url>,
    base_url: &str,
) -> Option<BreadcrumbList> {
    let resolve_base = page_url.cloned().or_else(|| Url::parse(base_url).ok());

    let items: Vec<ListItem> = document
        .html()
        .select(&NAV_LINK_SELECTOR)
        .filter_map(|link| {
            let name = text_of(link);
            if name.is_empty() {
                return None;
            }
            let href = link.value().attr("href").unwrap_or("");
            Some((name, resolve_href(resolve_base.as_ref(), href)))
        })
        .enumerate()
        .map(|(index, (name, item))| ListItem {
            kind: "ListItem",
            position: index + 1,
            name,
            item,
        })
        .collect();

    if items.is_empty() {
        return None;
    }

    Some(BreadcrumbList {
        context: SCHEMA_CONTEXT,
        kind: "BreadcrumbList",
        item_list_element: items,
    })
}

fn resolve_href(base: Option<&Url>, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    match base.map(|b| b.join(href)) {
        Some(Ok(url)) => url.to_string(),
        _ => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<html><body>
        <header class="header">
          <div class="header-content">
            <a href="index.html" class="logo"><img src="logo.png" alt=""></a>
            <nav class="header-nav">
              <a href="services.html">Services</a>
              <a href="/about.html"> About </a>
              <a href="https://maps.example.com/x">Directions</a>
            </nav>
          </div>
        </header>
    </body></html>"#;

    #[test]
    fn test_links_resolved_and_numbered() {
        let doc = Document::parse(HEADER);
        let page = Url::parse("https://www.example.com/services/index.html").unwrap();
        let list = build_breadcrumbs(&doc, Some(&page), "https://fallback.example").unwrap();

        let items = &list.item_list_element;
        // 只有圖片的 logo 連結沒有文字，會被略過；巢狀的連結只出現一次
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].position, 1);
        assert_eq!(items[0].name, "Services");
        assert_eq!(items[0].item, "https://www.example.com/services/services.html");
        assert_eq!(items[1].name, "About");
        assert_eq!(items[1].item, "https://www.example.com/about.html");
        assert_eq!(items[2].position, 3);
        assert_eq!(items[2].item, "https://maps.example.com/x");
    }

    #[test]
    fn test_falls_back_to_base_url() {
        let doc = Document::parse(HEADER);
        let list = build_breadcrumbs(&doc, None, "https://fallback.example").unwrap();
        assert_eq!(
            list.item_list_element[0].item,
            "https://fallback.example/services.html"
        );
    }

    #[test]
    fn test_no_named_links_no_breadcrumbs() {
        let doc = Document::parse(
            r#"<html><body><nav class="header-nav"><a href="/"> </a></nav><a href="/x">Outside</a></body></html>"#,
        );
        assert!(build_breadcrumbs(&doc, None, "https://example.com").is_none());
    }
}
