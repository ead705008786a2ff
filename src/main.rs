use std::{path::PathBuf, sync::Arc};

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use sporelay::{
    config, error,
    management::TokenManager,
    server::{self, AppState},
    spotify::SpotifyClient,
};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[clap(long)]
    port: Option<u16>,

    /// Load environment variables from this file instead of ./.env
    #[clap(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = config::load_env(cli.env_file.as_deref()) {
        error!("Cannot load environment. Err: {}", e);
    }

    let port = match cli.port {
        Some(port) => port,
        None => match config::server_port() {
            Ok(port) => port,
            Err(e) => error!("{}", e),
        },
    };

    let state = Arc::new(AppState {
        tokens: TokenManager::new(),
        spotify: SpotifyClient::new(),
    });

    server::start_server(port, state).await;
}
