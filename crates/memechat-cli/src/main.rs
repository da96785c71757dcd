use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::chat::run_repl;
use commands::client::ChatClient;
use commands::probe::probe_media;
use memechat_core::tone::classify_reply;
use memechat_core::{load_config, load_media_catalog, MediaCatalog, MemechatConfig, ThreadRandom};
use memechat_schema::ToneSymbol;
use memechat_server::state::AppState;

#[derive(Parser)]
#[command(name = "memechat", version, about = "memechat AI meme chat relay")]
struct Cli {
    #[arg(
        long,
        default_value = "~/.memechat",
        help = "Config root directory (contains config/ and logs/)"
    )]
    config_root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the HTTP server")]
    Serve {
        #[arg(long, help = "HTTP port (overrides server.port)")]
        port: Option<u16>,
    },
    #[command(about = "Terminal chat client for a running server")]
    Chat {
        #[arg(long, default_value = "http://localhost:3001", help = "Server base URL")]
        url: String,
    },
    #[command(about = "Print the tone symbol the server would attach to a reply")]
    Classify {
        #[arg(help = "Text to classify")]
        text: String,
    },
    #[command(about = "Walk a symbol's media fallback chain with HTTP probes")]
    ProbeMedia {
        #[arg(help = "Tone symbol, e.g. 😂")]
        symbol: String,
        #[arg(
            long,
            default_value = "http://localhost:3001",
            help = "Base URL for locally hosted assets"
        )]
        base_url: String,
    },
    #[command(about = "Validate config files")]
    Validate,
}

fn expand_tilde(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}

fn load_all(root: &Path) -> Result<(MemechatConfig, MediaCatalog)> {
    let config_dir = root.join("config");
    let config = load_config(&config_dir)?;
    let catalog = load_media_catalog(&config_dir)?;
    Ok((config, catalog))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    cli.config_root = expand_tilde(cli.config_root);

    let log_dir = cli.config_root.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir: {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "memechat.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Serve { port } => {
            let (config, catalog) = load_all(&cli.config_root)?;
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", config.server.host, port);
            let state = AppState::from_config(&config, catalog);
            memechat_server::serve(state, &addr).await?;
        }
        Commands::Chat { url } => {
            run_repl(&ChatClient::new(url)).await?;
        }
        Commands::Classify { text } => {
            println!("{}", classify_reply(&text));
        }
        Commands::ProbeMedia { symbol, base_url } => {
            let (_, catalog) = load_all(&cli.config_root)?;
            let symbol = ToneSymbol::new(symbol);
            if !catalog.has_symbol(&symbol) {
                println!("{symbol} has no media list, using the default list.");
            }

            let report = probe_media(&catalog, &symbol, &base_url, &ThreadRandom).await;
            for step in &report.steps {
                println!("{} {}", if step.ok { "ok  " } else { "fail" }, step.url);
            }
            println!("Shown: {}", report.shown);
        }
        Commands::Validate => {
            let (config, catalog) = load_all(&cli.config_root)?;
            println!(
                "Config valid. Listening on {}:{}, {} media symbols, completion {}.",
                config.server.host,
                config.server.port,
                catalog.symbols().count(),
                if config.completion.active_api_key().is_some() {
                    "enabled"
                } else {
                    "mocked"
                }
            );
        }
    }

    Ok(())
}
