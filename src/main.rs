use clap::Parser;
use site_schema::core::TransformResult;
use site_schema::utils::{logger, validation::Validate};
use site_schema::{CliConfig, EtlEngine, LocalStorage, SiteConfig, SiteProfile, SitePipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.print_profile {
        print!("{}", SiteProfile::default().to_toml_string()?);
        return Ok(());
    }

    // 初始化日誌
    if cli.json_log {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting site-schema");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證設定
    let config = match cli.to_site_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    display_config_summary(&config, cli.dry_run);

    let mut source = LocalStorage::new(config.input_path.clone());
    if config.output_path != config.input_path {
        // 輸出目錄放在輸入目錄底下時，不要把上次的輸出再處理一次
        source = source.exclude_dir(config.output_path.clone());
    }
    let target = LocalStorage::new(config.output_path.clone());
    let pipeline = SitePipeline::new(source, target, config);
    let engine = EtlEngine::new(pipeline);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No pages will be written");
        match engine.dry_run().await {
            Ok(result) => {
                print_report(&result)?;
                return Ok(());
            }
            Err(e) => exit_with(e),
        }
    }

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Schema injection completed successfully!");
            println!("✅ Schema injection completed successfully!");
            println!("📁 Pages written to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn display_config_summary(config: &SiteConfig, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Business: {}", config.profile.business.name);
    println!("  Input: {}", config.input_path);
    println!("  Output: {}", config.output_path);
    match &config.base_url {
        Some(url) => println!("  Base URL: {}", url),
        None => println!(
            "  Base URL: (fallback) {}",
            config.profile.business.fallback_base_url
        ),
    }
    println!("  Services: {}", config.profile.services.len());
    println!("  Locations: {}", config.profile.locations.len());
    println!("  Stamp year: {}", config.stamp_year);
    println!("  Dry run: {}", dry_run);
}

fn print_report(result: &TransformResult) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&result.reports)?);
    for failure in &result.failures {
        eprintln!("⚠️ {}: {}", failure.path, failure.message);
    }
    Ok(())
}

fn exit_with(e: site_schema::SchemaError) -> ! {
    tracing::error!(
        "❌ Schema injection failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
