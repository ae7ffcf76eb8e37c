use serde::{Deserialize, Serialize};
use url::Url;

/// One entry of the service catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub description: String,
    pub area_served: Vec<String>,
    pub keywords: String,
    pub price_range: String,
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers: Option<Vec<OfferDescriptor>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDescriptor {
    pub name: String,
    pub price: String,
}

/// A named service area with its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDescriptor {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationDescriptor {
    /// "Leesburg, VA" -> "Leesburg"
    pub fn locality(&self) -> &str {
        self.location
            .split(',')
            .next()
            .unwrap_or(&self.location)
    }
}

/// A testimonial card read from the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub body: String,
    pub author: String,
    pub rating: u32,
    pub publisher: Option<String>,
}

/// 一個待處理的 HTML 頁面
#[derive(Debug, Clone)]
pub struct Page {
    /// Path relative to the site root, always with `/` separators.
    pub path: String,
    pub url: Option<Url>,
    /// File contents exactly as read, so a page that cannot be processed is
    /// written back byte for byte.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ProcessedPage {
    pub path: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageReport {
    pub path: String,
    pub url: Option<String>,
    pub entity_count: usize,
    pub review_count: usize,
    pub breadcrumb_count: usize,
    pub faq_question_count: usize,
    pub has_aggregate_rating: bool,
    pub year_elements_stamped: usize,
}

#[derive(Debug, Clone)]
pub struct PageFailure {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub pages: Vec<ProcessedPage>,
    pub reports: Vec<PageReport>,
    pub failures: Vec<PageFailure>,
}
