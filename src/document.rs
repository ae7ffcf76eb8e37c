use crate::utils::error::Result;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>.*?</script\s*>(?:\r?\n)?")
        .expect("script pattern is valid")
});

static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("id attribute pattern is valid")
});

static HEAD_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("head close pattern is valid"));

static HEAD_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head\b[^>]*>").expect("head open pattern is valid"));

static HTML_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html\b[^>]*>").expect("html open pattern is valid"));

static DOCTYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\x{FEFF}?\s*<!doctype\b[^>]*>").expect("doctype pattern is valid")
});

static START_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([a-zA-Z][a-zA-Z0-9-]*)\b([^>]*)>").expect("start tag pattern is valid")
});

static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)\b([^>]*)>").expect("tag pattern is valid")
});

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

static ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("id selector is valid"));

static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("json-ld selector is valid")
});

/// An HTML page: the source text plus a parsed tree for selector queries.
///
/// Queries go through `scraper`. Writes are done on the source text and the
/// tree is rebuilt afterwards, so queries always reflect the latest write.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    html: Html,
}

impl Document {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let html = Html::parse_document(&source);
        Self { source, html }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn into_string(self) -> String {
        self.source
    }

    /// Number of elements whose `id` attribute equals `id`.
    pub fn count_by_id(&self, id: &str) -> usize {
        self.html
            .select(&ID_SELECTOR)
            .filter(|el| el.value().attr("id") == Some(id))
            .count()
    }

    /// Parsed payload of the JSON-LD script with the given id.
    pub fn json_ld(&self, id: &str) -> Option<serde_json::Value> {
        self.html
            .select(&JSON_LD_SELECTOR)
            .find(|el| el.value().attr("id") == Some(id))
            .and_then(|el| serde_json::from_str(&el.text().collect::<String>()).ok())
    }

    /// Removes every `<script>` element with the given id. Returns how many were removed.
    pub fn remove_script(&mut self, id: &str) -> usize {
        let removed = self.strip_scripts(id);
        if removed > 0 {
            self.reparse();
        }
        removed
    }

    /// Writes `value` as a JSON-LD script with the given id at the end of
    /// `<head>`, replacing any script that already carries that id.
    pub fn upsert_json_ld<T: Serialize>(&mut self, id: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        // `<` only occurs inside JSON strings, so escaping it keeps `</script>` out of the payload
        let payload = json.replace('<', "\\u003c");
        let element = format!(
            "<script type=\"application/ld+json\" id=\"{}\">{}</script>\n",
            id, payload
        );

        let removed = self.strip_scripts(id);
        if removed > 0 {
            tracing::debug!("Replaced {} existing #{} script(s)", removed, id);
        }
        self.insert_into_head(&element);
        self.reparse();
        Ok(())
    }

    /// Replaces the content of every `id="year"` element, child elements
    /// included, with `year`. Returns how many were stamped.
    ///
    /// A `#year` element nested inside another one is replaced along with its
    /// parent's content and is not counted separately.
    pub fn stamp_year(&mut self, year: i32) -> usize {
        let mut ranges: Vec<(usize, usize)> = Vec::new();

        for caps in START_TAG_RE.captures_iter(&self.source) {
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            if attrs.trim_end().ends_with('/') || attr_id(attrs) != Some("year") {
                continue;
            }
            let tag = caps[1].to_ascii_lowercase();
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                continue;
            }
            let content_start = caps.get(0).map_or(0, |m| m.end());
            if ranges.last().is_some_and(|(_, end)| content_start < *end) {
                continue;
            }
            if let Some(content_end) = find_closing_tag(&self.source, &tag, content_start) {
                ranges.push((content_start, content_end));
            }
        }

        if ranges.is_empty() {
            return 0;
        }

        let year = year.to_string();
        for (start, end) in ranges.iter().rev() {
            self.source.replace_range(*start..*end, &year);
        }
        self.reparse();
        ranges.len()
    }

    fn strip_scripts(&mut self, id: &str) -> usize {
        let mut removed = 0;
        let stripped = SCRIPT_RE.replace_all(&self.source, |caps: &regex::Captures| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            if attr_id(attrs) == Some(id) {
                removed += 1;
                String::new()
            } else {
                caps[0].to_string()
            }
        });
        let stripped = stripped.into_owned();
        if removed > 0 {
            self.source = stripped;
        }
        removed
    }

    fn insert_into_head(&mut self, element: &str) {
        if let Some(m) = HEAD_CLOSE_RE.find(&self.source) {
            self.source.insert_str(m.start(), element);
        } else if let Some(m) = HEAD_OPEN_RE.find(&self.source) {
            self.source.insert_str(m.end(), element);
        } else if let Some(m) = HTML_OPEN_RE.find(&self.source) {
            self.source
                .insert_str(m.end(), &format!("<head>{}</head>", element));
        } else if let Some(m) = DOCTYPE_RE.find(&self.source) {
            // 省略 <html>/<head> 的頁面：parser 會把 doctype 後的 script 放進隱含的 head
            self.source.insert_str(m.end(), element);
        } else {
            self.source.insert_str(0, &format!("<head>{}</head>", element));
        }
    }

    fn reparse(&mut self) {
        self.html = Html::parse_document(&self.source);
    }
}

/// Byte offset of the `</tag>` that closes an element whose content starts at
/// `from`, skipping nested elements with the same tag name.
fn find_closing_tag(source: &str, tag: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for caps in ANY_TAG_RE.captures_iter(&source[from..]) {
        if !caps[2].eq_ignore_ascii_case(tag) {
            continue;
        }
        let closing = !caps[1].is_empty();
        if closing {
            if depth == 0 {
                return caps.get(0).map(|m| from + m.start());
            }
            depth -= 1;
        } else if !caps[3].trim_end().ends_with('/') {
            depth += 1;
        }
    }
    None
}

/// Trimmed text content of an element.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn attr_id(attrs: &str) -> Option<&str> {
    let caps = ID_ATTR_RE.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}
