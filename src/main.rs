use anyhow::Result;
use clap::Parser;
use tracing::info;

use linkpeek::cli::{Cli, Commands};
use linkpeek::config::StaticConfig;
use linkpeek::runtime::{modes, prepare_app_context};
use linkpeek::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command_or_default();

    if command == Commands::Config {
        modes::cli::print_sample_config();
        return Ok(());
    }

    // 配置错误直接退出，不进入任何模式
    let config = StaticConfig::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!(e.format_colored()))?;
    let _log_guard = init_logging(&config.logging)?;
    info!("linkpeek {} starting", env!("CARGO_PKG_VERSION"));

    let ctx = prepare_app_context(config)?;

    match command {
        Commands::Serve => modes::run_server(ctx).await,
        Commands::Create {
            url,
            description,
            thumbnail,
        } => modes::cli::create_link(&ctx, url, description, thumbnail).await,
        Commands::Resolve { code, user_agent } => {
            modes::cli::resolve_code(&ctx, code, user_agent).await
        }
        Commands::Config => Ok(()),
    }
}
