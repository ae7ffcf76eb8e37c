use site_schema::core::Pipeline;
use site_schema::schema::{FAQ_SCHEMA_ID, SEO_SCHEMA_ID};
use site_schema::{Document, EtlEngine, LocalStorage, SiteConfig, SiteProfile, SitePipeline};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const INDEX_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Home</title>
</head>
<body>
  <header><nav class="header-nav">
    <a href="/">Home</a>
    <a href="/services.html">Services</a>
    <a href="#contact"></a>
  </nav></header>
  <section class="testimonials">
    <div class="testimonial-card">
      <div class="testimonial-stars">★★★★★</div>
      <p class="testimonial-text">"Flawless slab work."</p>
      <p class="testimonial-author">Dana K. <span class="testimonial-source">• Google</span></p>
    </div>
    <div class="testimonial-card">
      <div class="testimonial-stars">★★★★</div>
      <p class="testimonial-text">On time and on budget.</p>
      <p class="testimonial-author">Lee M.</p>
    </div>
  </section>
  <footer>&copy; <span id="year">2019</span></footer>
</body>
</html>
"##;

const FAQ_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>FAQ</title></head>
<body>
  <div class="faq-item">
    <h3 class="faq-question">How long does concrete cure?</h3>
    <div class="faq-answer"><p>About 28 days for full strength.</p></div>
  </div>
  <div class="faq-item">
    <h3 class="faq-question">Do you work in winter?</h3>
    <div class="faq-answer">Yes, with cold weather protection.</div>
  </div>
</body>
</html>
"#;

const ABOUT_PAGE: &str = "<html><head><title>About</title></head><body><p>About us</p></body></html>";

fn write_site(root: &Path) {
    fs::write(root.join("index.html"), INDEX_PAGE).unwrap();
    fs::write(root.join("faq.html"), FAQ_PAGE).unwrap();
    fs::create_dir_all(root.join("about")).unwrap();
    fs::write(root.join("about/index.html"), ABOUT_PAGE).unwrap();
    fs::write(root.join("styles.css"), "body { margin: 0; }").unwrap();
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

fn engine_for(
    input: &Path,
    output: &Path,
    config: SiteConfig,
) -> EtlEngine<SitePipeline<LocalStorage, SiteConfig>> {
    let pipeline = SitePipeline::new(
        LocalStorage::new(path_str(input)),
        LocalStorage::new(path_str(output)),
        config,
    )
    .with_year(2026);
    EtlEngine::new(pipeline)
}

#[tokio::test]
async fn test_end_to_end_site_injection() -> anyhow::Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    write_site(input.path());

    let config = SiteConfig::new(path_str(input.path()), path_str(output.path()))
        .with_base_url("https://www.example.com")?
        .with_stamp_year(true);
    let written_to = engine_for(input.path(), output.path(), config).run().await?;
    assert_eq!(written_to, path_str(output.path()));

    // 非 HTML 檔案不會被輸出
    assert!(!output.path().join("styles.css").exists());

    let index = Document::parse(fs::read_to_string(output.path().join("index.html"))?);
    assert_eq!(index.count_by_id(SEO_SCHEMA_ID), 1);
    assert_eq!(index.count_by_id(FAQ_SCHEMA_ID), 0);
    assert!(index.as_str().contains(r#"<span id="year">2026</span>"#));

    let graph = index.json_ld(SEO_SCHEMA_ID).expect("index has a graph");
    let entities = graph.as_array().expect("graph is an array");
    assert_eq!(entities.len(), 20);
    assert_eq!(entities[0]["@id"], "https://www.example.com#organization");

    let business = &entities[1];
    assert_eq!(business["@type"], "HomeAndConstructionBusiness");
    let reviews = business["review"].as_array().expect("business has reviews");
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["author"]["name"], "Dana K.");
    assert_eq!(reviews[0]["publisher"]["name"], "Google");
    assert_eq!(reviews[0]["reviewRating"]["ratingValue"], 5);
    assert_eq!(reviews[1]["reviewRating"]["ratingValue"], 4);
    assert!(reviews[1].get("publisher").is_none());

    let breadcrumbs = &entities[18];
    assert_eq!(breadcrumbs["@type"], "BreadcrumbList");
    let items = breadcrumbs["itemListElement"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["position"], 2);
    assert_eq!(items[1]["item"], "https://www.example.com/services.html");

    let aggregate = &entities[19];
    assert_eq!(aggregate["@type"], "AggregateRating");
    assert_eq!(aggregate["ratingValue"], "4.5");
    assert_eq!(aggregate["reviewCount"], 2);

    let faq = Document::parse(fs::read_to_string(output.path().join("faq.html"))?);
    assert_eq!(faq.count_by_id(FAQ_SCHEMA_ID), 1);
    assert_eq!(faq.count_by_id(SEO_SCHEMA_ID), 1);
    let faq_json = faq.json_ld(FAQ_SCHEMA_ID).unwrap();
    assert_eq!(faq_json["url"], "https://www.example.com/faq.html");
    assert_eq!(faq_json["mainEntity"].as_array().unwrap().len(), 2);
    assert_eq!(
        faq_json["mainEntity"][0]["acceptedAnswer"]["text"],
        "About 28 days for full strength."
    );

    let about = Document::parse(fs::read_to_string(output.path().join("about/index.html"))?);
    let about_graph = about.json_ld(SEO_SCHEMA_ID).unwrap();
    assert_eq!(about_graph.as_array().unwrap().len(), 18);

    Ok(())
}

#[tokio::test]
async fn test_second_run_is_byte_identical() -> anyhow::Result<()> {
    let site = TempDir::new()?;
    write_site(site.path());

    let config = || {
        SiteConfig::new(path_str(site.path()), path_str(site.path()))
            .with_base_url("https://www.example.com")
            .map(|c| c.with_stamp_year(true))
    };

    engine_for(site.path(), site.path(), config()?).run().await?;
    let first_index = fs::read_to_string(site.path().join("index.html"))?;
    let first_faq = fs::read_to_string(site.path().join("faq.html"))?;

    engine_for(site.path(), site.path(), config()?).run().await?;
    let second_index = fs::read_to_string(site.path().join("index.html"))?;
    let second_faq = fs::read_to_string(site.path().join("faq.html"))?;

    assert_eq!(first_index, second_index);
    assert_eq!(first_faq, second_faq);
    assert_eq!(Document::parse(second_faq).count_by_id(FAQ_SCHEMA_ID), 1);

    Ok(())
}

#[tokio::test]
async fn test_dry_run_writes_nothing() -> anyhow::Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    write_site(input.path());

    let config = SiteConfig::new(path_str(input.path()), path_str(output.path()));
    let result = engine_for(input.path(), output.path(), config).dry_run().await?;

    assert_eq!(result.reports.len(), 3);
    assert!(result.failures.is_empty());
    assert_eq!(fs::read_dir(output.path())?.count(), 0);

    let faq_report = result
        .reports
        .iter()
        .find(|r| r.path == "faq.html")
        .expect("faq page reported");
    assert_eq!(faq_report.faq_question_count, 2);
    assert_eq!(faq_report.url, None);

    let index_report = result.reports.iter().find(|r| r.path == "index.html").unwrap();
    assert_eq!(index_report.review_count, 2);
    assert!(index_report.has_aggregate_rating);
    assert_eq!(index_report.year_elements_stamped, 0);

    Ok(())
}

#[tokio::test]
async fn test_without_base_url_uses_fallback_origin() -> anyhow::Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    write_site(input.path());

    let config = SiteConfig::new(path_str(input.path()), path_str(output.path()));
    engine_for(input.path(), output.path(), config).run().await?;

    let faq = Document::parse(fs::read_to_string(output.path().join("faq.html"))?);
    let graph = faq.json_ld(SEO_SCHEMA_ID).unwrap();
    assert_eq!(graph[0]["@id"], "https://www.rickyhorseman.com#organization");
    assert_eq!(
        faq.json_ld(FAQ_SCHEMA_ID).unwrap()["url"],
        "https://www.rickyhorseman.com/faq.html"
    );

    Ok(())
}

#[tokio::test]
async fn test_profile_override_changes_graph() -> anyhow::Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    fs::write(input.path().join("index.html"), ABOUT_PAGE)?;

    let profile_path = input.path().join("site.toml");
    fs::write(
        &profile_path,
        r#"
[business]
name = "Acme Paving"
fallback_base_url = "https://acme.example"

[[services]]
name = "Driveways"
description = "Residential driveways"
area_served = ["Reston, VA"]
keywords = "driveway, paving"
price_range = "$$"
availability = "Mon-Fri"
"#,
    )?;
    let profile = SiteProfile::from_file(&profile_path)?;

    let config =
        SiteConfig::new(path_str(input.path()), path_str(output.path())).with_profile(profile);
    let pipeline = SitePipeline::new(
        LocalStorage::new(path_str(input.path())),
        LocalStorage::new(path_str(output.path())),
        config,
    );

    let pages = pipeline.extract().await?;
    assert_eq!(pages.len(), 1);
    let result = pipeline.transform(pages).await?;
    assert_eq!(result.reports[0].entity_count, 14);

    pipeline.load(result).await?;
    let index = Document::parse(fs::read_to_string(output.path().join("index.html"))?);
    let graph = index.json_ld(SEO_SCHEMA_ID).unwrap();
    assert_eq!(graph[0]["name"], "Acme Paving");
    assert_eq!(graph[0]["@id"], "https://acme.example#organization");

    let services: Vec<_> = graph
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["@type"] == "Service")
        .collect();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["name"], "Driveways");
    assert_eq!(services[0]["areaServed"][0]["name"], "Reston, VA");

    Ok(())
}

#[tokio::test]
async fn test_non_utf8_page_passes_through_untouched() -> anyhow::Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    let latin1 = b"<html><head></head><body><p>Caf\xe9 menu</p></body></html>".to_vec();
    fs::write(input.path().join("menu.html"), &latin1)?;
    fs::write(input.path().join("index.html"), ABOUT_PAGE)?;

    let config = SiteConfig::new(path_str(input.path()), path_str(output.path()));
    let engine = engine_for(input.path(), output.path(), config);

    let preview = engine.dry_run().await?;
    assert_eq!(preview.failures.len(), 1);
    assert_eq!(preview.failures[0].path, "menu.html");

    engine.run().await?;
    assert_eq!(fs::read(output.path().join("menu.html"))?, latin1);
    let index = Document::parse(fs::read_to_string(output.path().join("index.html"))?);
    assert_eq!(index.count_by_id(SEO_SCHEMA_ID), 1);

    Ok(())
}

#[tokio::test]
async fn test_page_without_head_tags_keeps_doctype_first() -> anyhow::Result<()> {
    let site = TempDir::new()?;
    let page = "<!DOCTYPE html>\n<meta charset=\"utf-8\"><title>Short</title>\n<p>Short page</p>\n";
    fs::write(site.path().join("short.html"), page)?;

    let config = SiteConfig::new(path_str(site.path()), path_str(site.path()));
    engine_for(site.path(), site.path(), config).run().await?;

    let written = fs::read_to_string(site.path().join("short.html"))?;
    assert!(written.starts_with("<!DOCTYPE html><script"));
    assert!(written.ends_with("<p>Short page</p>\n"));
    assert_eq!(Document::parse(written).count_by_id(SEO_SCHEMA_ID), 1);

    Ok(())
}

#[tokio::test]
async fn test_nested_output_dir_is_not_reprocessed() -> anyhow::Result<()> {
    let site = TempDir::new()?;
    write_site(site.path());
    let output = site.path().join("dist");

    run_into_nested_output(site.path(), &output).await?;
    run_into_nested_output(site.path(), &output).await?;

    assert!(output.join("index.html").exists());
    assert!(!output.join("dist").exists());
    Ok(())
}

async fn run_into_nested_output(site: &Path, output: &Path) -> site_schema::Result<String> {
    let pipeline = SitePipeline::new(
        LocalStorage::new(path_str(site)).exclude_dir(output.to_path_buf()),
        LocalStorage::new(path_str(output)),
        SiteConfig::new(path_str(site), path_str(output)),
    );
    EtlEngine::new(pipeline).run().await
}
