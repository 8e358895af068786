use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use coverfetch::{config, error, info, server, success, telemetry, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[command(flatten)]
    config: config::Config,
}

#[tokio::main]
async fn main() {
    // .env has to be loaded before clap reads the environment
    match config::load_env().await {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => warning!("No .env file found, using the process environment only"),
        Err(e) => error!("Cannot load environment. Err: {}", e),
    }

    let cli = Cli::parse();

    if let Err(e) = telemetry::init_tracing() {
        error!("Cannot initialize logging. Err: {}", e);
    }

    let folder_mode = if cli.config.storage.per_user_folders {
        "per user"
    } else {
        "shared"
    };
    success!(
        "Serving on http://{} (downloads in {}, {})",
        cli.config.server.server_address,
        cli.config.storage.root().display(),
        folder_mode
    );

    if let Err(e) = server::start_api_server(cli.config).await {
        error!("Server stopped. Err: {}", e);
    }
}
