use crate::config::profile::MissingRatingPolicy;
use crate::document::{text_of, Document};
use crate::domain::model::ReviewRecord;
use crate::schema::types::{AggregateRating, Named, Rating, Review, SCHEMA_CONTEXT};
use scraper::Selector;
use std::sync::LazyLock;

pub const STAR_GLYPH: char = '★';
pub const BEST_RATING: u32 = 5;
pub const WORST_RATING: u32 = 1;

static CARD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".testimonial-card").expect("card selector is valid"));
static TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".testimonial-text").expect("text selector is valid"));
static AUTHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".testimonial-author").expect("author selector is valid"));
static SOURCE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".testimonial-source").expect("source selector is valid"));
static STARS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".testimonial-stars").expect("stars selector is valid"));

pub fn count_stars(text: &str) -> u32 {
    text.chars().filter(|c| *c == STAR_GLYPH).count() as u32
}

/// Reads every testimonial card that has a quote, an author and a stars element.
pub fn extract_reviews(document: &Document, policy: MissingRatingPolicy) -> Vec<ReviewRecord> {
    let mut reviews = Vec::new();

    for (index, card) in document.html().select(&CARD_SELECTOR).enumerate() {
        let quote = card.select(&TEXT_SELECTOR).next();
        let author = card.select(&AUTHOR_SELECTOR).next();
        let stars = card.select(&STARS_SELECTOR).next();
        let source = card.select(&SOURCE_SELECTOR).next();

        let (Some(quote), Some(author), Some(stars)) = (quote, author, stars) else {
            tracing::debug!("Skipping testimonial card #{}: missing quote, author or stars", index);
            continue;
        };

        let rating = match count_stars(&stars.text().collect::<String>()) {
            0 => match policy {
                MissingRatingPolicy::DefaultToBest => {
                    tracing::warn!(
                        "Testimonial card #{} has no {} glyphs, publishing it as {} stars",
                        index,
                        STAR_GLYPH,
                        BEST_RATING
                    );
                    BEST_RATING
                }
                MissingRatingPolicy::Skip => {
                    tracing::debug!("Skipping testimonial card #{}: no star glyphs", index);
                    continue;
                }
            },
            n => n,
        };

        let source_text = source.map(|s| s.text().collect::<String>());
        // 只移除第一次出現的來源字串
        let author_name = match &source_text {
            Some(src) => author.text().collect::<String>().replacen(src.as_str(), "", 1),
            None => author.text().collect::<String>(),
        };
        let publisher = source_text.map(|src| src.replacen('•', "", 1).trim().to_string());

        reviews.push(ReviewRecord {
            body: text_of(quote),
            author: author_name.trim().to_string(),
            rating,
            publisher,
        });
    }

    reviews
}

pub fn build_review_schemas(document: &Document, policy: MissingRatingPolicy) -> Vec<Review> {
    extract_reviews(document, policy)
        .into_iter()
        .map(review_schema)
        .collect()
}

fn review_schema(record: ReviewRecord) -> Review {
    Review {
        kind: "Review",
        review_body: record.body,
        author: Named::new("Person", record.author),
        review_rating: Rating {
            kind: "Rating",
            rating_value: record.rating,
            best_rating: BEST_RATING,
            worst_rating: WORST_RATING,
        },
        publisher: record.publisher.map(|name| Named::new("Organization", name)),
    }
}

/// Non-zero star counts of every card that has a stars element.
///
/// Unlike [`extract_reviews`], a card does not need a quote or author to count here.
pub fn collect_star_counts(document: &Document) -> Vec<u32> {
    document
        .html()
        .select(&CARD_SELECTOR)
        .filter_map(|card| card.select(&STARS_SELECTOR).next())
        .map(|stars| count_stars(&stars.text().collect::<String>()))
        .filter(|count| *count > 0)
        .collect()
}

pub fn aggregate_rating(document: &Document, base_url: &str) -> Option<AggregateRating> {
    aggregate_from_counts(&collect_star_counts(document), base_url)
}

pub fn aggregate_from_counts(counts: &[u32], base_url: &str) -> Option<AggregateRating> {
    if counts.is_empty() {
        return None;
    }

    let sum: u32 = counts.iter().sum();
    let average = f64::from(sum) / counts.len() as f64;

    Some(AggregateRating {
        context: SCHEMA_CONTEXT,
        kind: "AggregateRating",
        id: format!("{}#aggregate-rating", base_url),
        rating_value: format_one_decimal(average),
        best_rating: BEST_RATING.to_string(),
        worst_rating: WORST_RATING.to_string(),
        rating_count: counts.len(),
        review_count: counts.len(),
    })
}

/// Formats a non-negative value with one decimal, rounding on the exact value
/// of the `f64` and taking the larger neighbour on an exact tie.
///
/// 87 / 20 is stored as 4.34999…, so it formats as "4.3"; 4.25 is an exact
/// tie and formats as "4.3".
fn format_one_decimal(value: f64) -> String {
    // 只有 k/4 (k 為奇數) 會剛好落在兩個一位小數的正中間
    let quarters = value * 4.0;
    let exact_tie = quarters.fract() == 0.0 && quarters % 2.0 == 1.0;
    if exact_tie {
        format!("{:.1}", value + 0.05)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(stars: &str) -> String {
        format!(
            r#"<div class="testimonial-card">
                <div class="testimonial-stars">{}</div>
                <p class="testimonial-text"> Great crew, fast pour. </p>
                <p class="testimonial-author">Jane D. <span class="testimonial-source">• Google</span></p>
            </div>"#,
            stars
        )
    }

    fn page(cards: &[String]) -> Document {
        Document::parse(format!("<html><body>{}</body></html>", cards.join("\n")))
    }

    #[test]
    fn test_aggregate_of_five_five_four() {
        let doc = page(&[card("★★★★★"), card("★★★★★"), card("★★★★☆")]);
        let aggregate = aggregate_rating(&doc, "https://example.com").unwrap();

        assert_eq!(aggregate.rating_value, "4.7");
        assert_eq!(aggregate.rating_count, 3);
        assert_eq!(aggregate.review_count, 3);
        assert_eq!(aggregate.best_rating, "5");
        assert_eq!(aggregate.id, "https://example.com#aggregate-rating");
    }

    #[test]
    fn test_aggregate_rounds_half_up() {
        let aggregate = aggregate_from_counts(&[4, 5, 4, 4], "https://example.com").unwrap();
        assert_eq!(aggregate.rating_value, "4.3");

        let whole = aggregate_from_counts(&[5], "https://example.com").unwrap();
        assert_eq!(whole.rating_value, "5.0");

        let three_quarters = aggregate_from_counts(&[5, 5, 5, 4], "https://example.com").unwrap();
        assert_eq!(three_quarters.rating_value, "4.8");
    }

    #[test]
    fn test_aggregate_rounds_on_stored_mean() {
        // 7 × 5 + 13 × 4 = 87, 87 / 20 is just below 4.35 as an f64
        let mut counts = vec![5; 7];
        counts.extend(vec![4; 13]);
        let aggregate = aggregate_from_counts(&counts, "https://example.com").unwrap();

        assert_eq!(aggregate.rating_count, 20);
        assert_eq!(aggregate.rating_value, "4.3");

        let thirds = aggregate_from_counts(&[4, 4, 5], "https://example.com").unwrap();
        assert_eq!(thirds.rating_value, "4.3");
        let two_thirds = aggregate_from_counts(&[4, 5, 5], "https://example.com").unwrap();
        assert_eq!(two_thirds.rating_value, "4.7");
    }

    #[test]
    fn test_no_cards_no_aggregate() {
        let doc = page(&[]);
        assert!(aggregate_rating(&doc, "https://example.com").is_none());
        assert!(build_review_schemas(&doc, MissingRatingPolicy::DefaultToBest).is_empty());
    }

    #[test]
    fn test_review_fields() {
        let doc = page(&[card("★★★★")]);
        let reviews = extract_reviews(&doc, MissingRatingPolicy::DefaultToBest);

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].body, "Great crew, fast pour.");
        assert_eq!(reviews[0].author, "Jane D.");
        assert_eq!(reviews[0].rating, 4);
        assert_eq!(reviews[0].publisher.as_deref(), Some("Google"));
    }

    #[test]
    fn test_card_missing_author_or_stars_is_skipped() {
        let no_author = r#"<div class="testimonial-card">
            <div class="testimonial-stars">★★★★★</div>
            <p class="testimonial-text">Solid work.</p>
        </div>"#
            .to_string();
        let no_stars = r#"<div class="testimonial-card">
            <p class="testimonial-text">Solid work.</p>
            <p class="testimonial-author">Sam</p>
        </div>"#
            .to_string();
        let doc = page(&[no_author, no_stars, card("★★★")]);

        let reviews = extract_reviews(&doc, MissingRatingPolicy::DefaultToBest);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, 3);
    }

    #[test]
    fn test_zero_stars_policy() {
        let doc = page(&[card("no rating yet")]);

        let defaulted = extract_reviews(&doc, MissingRatingPolicy::DefaultToBest);
        assert_eq!(defaulted.len(), 1);
        assert_eq!(defaulted[0].rating, 5);

        assert!(extract_reviews(&doc, MissingRatingPolicy::Skip).is_empty());

        // a zero-star card never counts toward the aggregate
        assert!(aggregate_rating(&doc, "https://example.com").is_none());
    }

    #[test]
    fn test_author_without_source() {
        let html = r#"<div class="testimonial-card">
            <span class="testimonial-stars">★★★★★</span>
            <p class="testimonial-text">Would hire again</p>
            <p class="testimonial-author"> Lee M. </p>
        </div>"#
            .to_string();
        let reviews = build_review_schemas(&page(&[html]), MissingRatingPolicy::DefaultToBest);

        assert_eq!(reviews[0].author.name, "Lee M.");
        assert!(reviews[0].publisher.is_none());
        let json = serde_json::to_value(&reviews[0]).unwrap();
        assert!(json.get("publisher").is_none());
        assert_eq!(json["reviewRating"]["ratingValue"], 5);
        assert_eq!(json["author"]["@type"], "Person");
    }
}
