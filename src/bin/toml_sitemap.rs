use anyhow::Context;
use clap::Parser;
use storefront_sitemap::core::ConfigProvider;
use storefront_sitemap::utils::{logger, validation::Validate};
use storefront_sitemap::{LocalStorage, SitemapEngine, SitemapError, SitemapPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-sitemap")]
#[command(about = "Generate sitemap.xml from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sitemap.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output path from config
    #[arg(short, long)]
    output: Option<String>,

    /// Dry run - print the sitemap without writing it
    #[arg(long)]
    dry_run: bool,
}

fn report_failure(e: &SitemapError) -> ! {
    tracing::error!(
        "❌ Sitemap generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Configuration summary:");
    tracing::info!("  Store: {}", config.store_domain());
    tracing::info!("  GraphQL endpoint: {}", config.graphql_endpoint());
    tracing::info!("  Site URL: {}", config.site_url());
    tracing::info!(
        "  Static pages: {}",
        config.static_source_url().unwrap_or("(none)")
    );
    tracing::info!(
        "  Page sizes: products={}, collections={}, images={}",
        config.product_page_size(),
        config.collection_page_size(),
        config.image_page_size()
    );
    tracing::info!(
        "  On failure: static={:?}, catalog={:?}",
        config.static_failure_policy(),
        config.catalog_failure_policy()
    );
    tracing::info!("  Output: {}", config.output_path());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(output) = args.output {
        tracing::info!("🔧 Output path overridden to: {}", output);
        config.output.path = Some(output);
    }

    if let Err(e) = config.validate() {
        report_failure(&e);
    }

    display_config_summary(&config);

    let pipeline = match SitemapPipeline::new(LocalStorage::current_dir(), config) {
        Ok(pipeline) => pipeline,
        Err(e) => report_failure(&e),
    };
    let engine = SitemapEngine::new(pipeline);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - sitemap will be printed, not written");
        match engine.preview().await {
            Ok(document) => print!("{}", document.xml),
            Err(e) => report_failure(&e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Sitemap generated successfully: {}", output_path);
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}
