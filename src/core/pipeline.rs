use crate::core::{ConfigProvider, Page, Pipeline, Storage, TransformResult};
use crate::document::Document;
use crate::domain::model::{PageFailure, PageReport, ProcessedPage};
use crate::schema::{inject_faq_schema, inject_seo_schema};
use crate::utils::error::{Result, SchemaError};
use chrono::Datelike;
use url::Url;

const PAGE_EXTENSION: &str = "html";
const INDEX_PAGE: &str = "index.html";

/// Reads every page of a site, injects the structured data and writes the
/// pages back out.
pub struct SitePipeline<S: Storage, C: ConfigProvider> {
    source: S,
    target: S,
    config: C,
    year: i32,
}

impl<S: Storage, C: ConfigProvider> SitePipeline<S, C> {
    pub fn new(source: S, target: S, config: C) -> Self {
        Self {
            source,
            target,
            config,
            year: chrono::Local::now().year(),
        }
    }

    /// Year written into `#year` elements when stamping is enabled.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// FAQ graph, business graph, then the optional year stamp, on one page.
    ///
    /// Pages that are not valid UTF-8 are rejected rather than decoded lossily.
    pub fn process_page(&self, page: &Page) -> Result<(String, PageReport)> {
        let html = std::str::from_utf8(&page.bytes).map_err(|e| SchemaError::ProcessingError {
            message: format!("{} is not valid UTF-8: {}", page.path, e),
        })?;

        let profile = self.config.profile();
        let url = page.url.as_ref();
        let mut document = Document::parse(html);

        let faq_question_count = inject_faq_schema(&mut document, url, profile)?;
        let summary = inject_seo_schema(&mut document, url, profile)?;
        let year_elements_stamped = if self.config.stamp_year() {
            document.stamp_year(self.year)
        } else {
            0
        };

        let report = PageReport {
            path: page.path.clone(),
            url: url.map(ToString::to_string),
            entity_count: summary.entity_count,
            review_count: summary.review_count,
            breadcrumb_count: summary.breadcrumb_count,
            faq_question_count,
            has_aggregate_rating: summary.has_aggregate_rating,
            year_elements_stamped,
        };

        Ok((document.into_string(), report))
    }
}

/// Public URL of a page given its path relative to the site root.
///
/// `index.html` files map to their directory (`about/index.html` -> `/about/`),
/// whatever the case of the file name.
pub fn page_url(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }

    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, path),
    };
    let route = if file.eq_ignore_ascii_case(INDEX_PAGE) {
        dir.map(|d| format!("{}/", d)).unwrap_or_default()
    } else {
        path.to_string()
    };

    Ok(base.join(&route)?)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SitePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Page>> {
        tracing::debug!("Scanning {} for pages", self.config.input_path());
        let paths = self.source.list_files(PAGE_EXTENSION).await?;

        let mut pages = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = self.source.read_file(&path).await?;

            let url = match self.config.base_url() {
                Some(base) => Some(page_url(base, &path)?),
                None => None,
            };

            tracing::debug!("Read page {} ({} bytes)", path, bytes.len());
            pages.push(Page { path, url, bytes });
        }

        if pages.is_empty() {
            tracing::warn!("No .{} pages found in {}", PAGE_EXTENSION, self.config.input_path());
        }

        Ok(pages)
    }

    async fn transform(&self, pages: Vec<Page>) -> Result<TransformResult> {
        let mut result = TransformResult::default();

        for page in pages {
            match self.process_page(&page) {
                Ok((html, report)) => {
                    tracing::debug!(
                        "{}: {} entities, {} FAQ questions",
                        report.path,
                        report.entity_count,
                        report.faq_question_count
                    );
                    result.reports.push(report);
                    result.pages.push(ProcessedPage {
                        path: page.path,
                        bytes: html.into_bytes(),
                    });
                }
                Err(e) => {
                    // 失敗的頁面原樣輸出，不影響其他頁面
                    result.failures.push(PageFailure {
                        path: page.path.clone(),
                        message: e.to_string(),
                    });
                    result.pages.push(ProcessedPage {
                        path: page.path,
                        bytes: page.bytes,
                    });
                }
            }
        }

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        for page in &result.pages {
            self.target.write_file(&page.path, &page.bytes).await?;
        }

        tracing::debug!("Wrote {} pages", result.pages.len());
        Ok(self.config.output_path().to_string())
    }
}
