use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quantum_ml_api::api::{run_server, AppState};
use quantum_ml_api::config::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quantum_ml_api=debug,tower_http=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    print_banner(&config);

    let state = Arc::new(AppState::from_config(&config));

    run_server(&config, state).await
}

fn print_banner(config: &Config) {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║               Quantum ML Prediction API                  ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("📊 Dashboard: http://{}", config.bind_addr());
    println!("🔗 API endpoints:");
    println!("   - GET  /api/health         - Health check");
    println!("   - GET  /api/dashboard-data - Dashboard data");
    println!("   - GET  /api/models         - Model performance");
    println!("   - POST /api/predict        - Get prediction");
    println!(
        "🐍 Compute: {}",
        if config.compute.simulation_mode {
            "SIMULATION (scripted demo output)".to_string()
        } else {
            format!(
                "{} in {} (max {} concurrent)",
                config.compute.python_bin,
                config.compute.workdir.display(),
                config.compute.max_concurrent
            )
        }
    );
    println!(
        "⏱️  Timeouts: predict {}s, dashboard {}s, models {}s",
        config.compute.predict_timeout_secs,
        config.compute.dashboard_timeout_secs,
        config.compute.models_timeout_secs
    );
    println!("📄 Prediction output format: {:?}", config.compute.output_format);
    println!();
    println!("Press Ctrl+C to stop");
    println!("═══════════════════════════════════════════════════════════");
    println!();
}
