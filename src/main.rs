use anyhow::Result;
use clap::Parser;
use post_enricher::api::http::HttpApi;
use post_enricher::api::local::LocalData;
use post_enricher::config::{Config, OutputFormat, Overrides};
use post_enricher::{enrich, output};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "post-enricher")]
#[command(version, about = "Fetch posts and comments and join them with their authors")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL, e.g. http://10.0.2.2:9999 when talking to an emulator host
    #[arg(long, env = "POST_ENRICHER_BASE_URL")]
    base_url: Option<String>,

    /// Read posts and comments from this JSON file instead of the posts endpoint
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            data_file: self.data_file.clone(),
            timeout_secs: self.timeout,
            format: self.format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?.with_overrides(cli.overrides());

    let api = HttpApi::new(&config.base_url, config.timeout());
    info!(base_url = api.base_url(), "using API");

    let posts = match &config.data_file {
        Some(path) => {
            info!(path = %path.display(), "reading posts from local data");
            let local = LocalData::new(path);
            enrich::run(&local, &api).await
        }
        None => enrich::run(&api, &api).await,
    };

    println!("{}", output::render(&posts, config.format)?);
    Ok(())
}
