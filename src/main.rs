use agri_dashboard::config::Command;
use agri_dashboard::core::Pipeline;
use agri_dashboard::server;
use agri_dashboard::utils::{logger, validation::Validate};
use agri_dashboard::{
    CliConfig, DashboardEngine, DashboardError, DashboardPipeline, DashboardSettings, LocalStorage,
};
use clap::Parser;

fn report_failure(stage: &str, e: &DashboardError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}

async fn render(settings: DashboardSettings) {
    let monitor_enabled = settings.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = DashboardPipeline::new(LocalStorage::new("."), settings);
    let engine = DashboardEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Dashboard rendered successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            if e.exit_code() == 0 {
                // 只是選了沒有資料的年份
                tracing::warn!("⚠️ {}", e.user_friendly_message());
                eprintln!("⚠️ {}", e.user_friendly_message());
                return;
            }
            report_failure("Dashboard render", &e);
        }
    }
}

async fn serve(settings: DashboardSettings) {
    let pipeline = DashboardPipeline::new(LocalStorage::new("."), settings.clone());
    let table = match pipeline.extract().await {
        Ok(table) => table,
        Err(e) => report_failure("Loading yield data", &e),
    };
    tracing::info!(
        "📥 Loaded {} yield records for {} years",
        table.len(),
        table.years().len()
    );

    if let Err(e) = server::run_http_server(&settings, table).await {
        report_failure("Dashboard server", &e);
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting agri-dashboard");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => report_failure("Loading configuration", &e),
    };

    // 驗證配置
    if let Err(e) = settings.validate() {
        report_failure("Configuration validation", &e);
    }
    tracing::debug!("Resolved settings: {:?}", settings);

    match cli.command {
        Command::Render(_) => render(settings).await,
        Command::Serve(_) => serve(settings).await,
    }
}
