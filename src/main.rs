use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use thumbnailer::config::{self, ServerConfig};
use thumbnailer::imaging::RustBackend;
use thumbnailer::server;
use thumbnailer::service::ThumbnailService;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Flags that override values from the config file.
#[derive(clap::Args, Clone, Default)]
struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory of <identifier>.jpg source images
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Directory for generated thumbnails (created if missing)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

impl ServeArgs {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.source_dir {
            config.storage.source_dir = dir;
        }
        if let Some(dir) = self.cache_dir {
            config.storage.cache_dir = dir;
        }
    }
}

#[derive(Parser)]
#[command(name = "thumbnailer")]
#[command(about = "On-demand JPEG thumbnail server")]
#[command(long_about = "\
On-demand JPEG thumbnail server

Serves GET /images?filename=<id>&width=<px>&height=<px>. The first request
for a size renders <source_dir>/<id>.jpg and stores it as
<cache_dir>/<width>x<height>-<id>.jpg; later requests read that file.

Configuration is read from ./thumbnailer.toml when present, or from --config.
Run 'thumbnailer gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./thumbnailer.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve(ServeArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "thumbnailer=info",
        1 => "thumbnailer=debug",
        _ => "thumbnailer=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Serve(args) => {
            init_tracing(cli.verbose);

            let mut config = config::load_config(cli.config.as_deref())?;
            args.apply(&mut config);
            config.validate()?;

            let store = config.store();
            store.ensure_cache_dir()?;
            info!(
                source = %store.source_dir().display(),
                cache = %store.cache_dir().display(),
                "storage ready"
            );

            let service = Arc::new(ThumbnailService::new(
                store,
                RustBackend::new(),
                config.quality(),
            ));

            let addr = config.listen_addr()?;
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("listening on http://{}", listener.local_addr()?);

            server::serve(listener, Arc::clone(&service)).await?;
            info!("cache: {}", service.stats());
        }
    }

    Ok(())
}
