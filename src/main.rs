use clap::Parser;
use storefront_sitemap::utils::{logger, validation::Validate};
use storefront_sitemap::{CliConfig, LocalStorage, SitemapEngine, SitemapError, SitemapPipeline};

fn report_failure(e: &SitemapError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Sitemap generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting storefront-sitemap");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        report_failure(&e);
    }

    let dry_run = config.dry_run;
    let pipeline = match SitemapPipeline::new(LocalStorage::current_dir(), config) {
        Ok(pipeline) => pipeline,
        Err(e) => report_failure(&e),
    };
    let engine = SitemapEngine::new(pipeline);

    if dry_run {
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
