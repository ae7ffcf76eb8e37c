use crate::config::profile::SiteProfile;
use crate::document::{text_of, Document};
use crate::schema::types::{Answer, FaqPage, Question, SCHEMA_CONTEXT};
use crate::schema::{resolve_base_url, FAQ_SCHEMA_ID};
use crate::utils::error::Result;
use scraper::Selector;
use std::sync::LazyLock;
use url::Url;

static FAQ_ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".faq-item").expect("faq item selector is valid"));
static QUESTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".faq-question").expect("faq question selector is valid"));
static ANSWER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".faq-answer").expect("faq answer selector is valid"));

/// Question/answer pairs of every `.faq-item` that has both parts.
pub fn extract_questions(document: &Document) -> Vec<Question> {
    document
        .html()
        .select(&FAQ_ITEM_SELECTOR)
        .filter_map(|item| {
            let question = item.select(&QUESTION_SELECTOR).next()?;
            let answer = item.select(&ANSWER_SELECTOR).next()?;
            Some(Question {
                kind: "Question",
                name: text_of(question),
                accepted_answer: Answer {
                    kind: "Answer",
                    text: text_of(answer),
                },
            })
        })
        .collect()
}

pub fn build_faq_page(document: &Document, base_url: &str, profile: &SiteProfile) -> Option<FaqPage> {
    let questions = extract_questions(document);
    if questions.is_empty() {
        return None;
    }

    Some(FaqPage {
        context: SCHEMA_CONTEXT,
        kind: "FAQPage",
        main_entity: questions,
        url: format!("{}{}", base_url, profile.faq.page_path),
        name: profile.faq.name.clone(),
        description: profile.faq.description.clone(),
    })
}

/// Writes the FAQ page script. Leaves the document untouched when no item
/// has both a question and an answer. Returns the number of questions written.
pub fn inject_faq_schema(
    document: &mut Document,
    page_url: Option<&Url>,
    profile: &SiteProfile,
) -> Result<usize> {
    let base_url = resolve_base_url(page_url, &profile.business.fallback_base_url);

    let Some(faq_page) = build_faq_page(document, &base_url, profile) else {
        return Ok(0);
    };

    let count = faq_page.main_entity.len();
    document.upsert_json_ld(FAQ_SCHEMA_ID, &faq_page)?;
    tracing::debug!("Injected FAQ schema with {} question(s)", count);
    Ok(count)
}
