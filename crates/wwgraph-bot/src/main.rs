//! wwgraph bot entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wwgraph_bot::mastodon::MastodonPublisher;
use wwgraph_bot::twitter::TwitterPublisher;
use wwgraph_bot::{run, Publisher, RunOptions};
use wwgraph_config::SecretsLoader;
use wwgraph_data::PortalClient;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Save the rendered figure to image.png
    #[arg(long)]
    save_plot: bool,

    /// Post the figure to Twitter
    #[arg(long)]
    tweet: bool,

    /// Post the figure to Mastodon
    #[arg(long)]
    toot: bool,

    /// Write the cleaned dataset to wastewater.csv
    #[arg(long)]
    dump_csv: bool,

    /// Marker file that suppresses duplicate posts across runs
    #[arg(long)]
    last_run_file: Option<PathBuf>,

    /// Credentials file path
    #[arg(long, default_value = "secrets.toml")]
    secrets: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    info!("Starting wwgraph bot");

    // Credentials are only read (and validated) for the platforms asked for,
    // so a plot-only run needs no secrets file at all.
    let mut publishers: Vec<Box<dyn Publisher + Send + Sync>> = Vec::new();
    if args.tweet || args.toot {
        let secrets = SecretsLoader::load_from_file(&args.secrets)?;
        let client = reqwest::Client::new();
        if args.tweet {
            let credentials = secrets.twitter()?.clone();
            publishers.push(Box::new(TwitterPublisher::new(client.clone(), credentials)));
        }
        if args.toot {
            let credentials = secrets.mastodon()?.clone();
            publishers.push(Box::new(MastodonPublisher::new(client, credentials)));
        }
    }

    let options = RunOptions {
        save_plot: args.save_plot,
        dump_csv: args.dump_csv,
        last_run_file: args.last_run_file,
    };

    let portal = PortalClient::with_defaults()?;
    let posted = run(&portal, &publishers, &options).await?;
    for id in &posted {
        println!("{id}");
    }

    info!("Run complete");
    Ok(())
}
