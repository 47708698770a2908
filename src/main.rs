//! Terminal report of a channel's recent and same-day videos with RPM and
//! monetization, printed as markdown tables.

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;
use yt_metrics::{
    fetch_recent, fetch_today, initialize_client, logging, report::render_markdown_table, resolve_channel_scope,
    AggregatorConfig, ChannelProvider, Credentials, FetchContext, MetricsReport, RevenueProvider, RevenueStatus,
    YouTubeDataV3Client, YouTubeProvider,
};

#[derive(Parser)]
#[command(name = "yt-metrics")]
#[command(about = "YouTube channel video metrics with RPM and monetization")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY")]
    api_key: Option<String>,

    /// OAuth access token; required for revenue and for finding your own channel
    #[arg(long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Channel to report on (defaults to the channel of the access token)
    #[arg(long)]
    channel_id: Option<String>,

    /// RPM shown when a video has no reported revenue
    #[arg(long)]
    mock_rpm: Option<f64>,

    /// Monetization status shown when the API reports none
    #[arg(long)]
    mock_monetization: Option<String>,

    /// Skip the analytics revenue report
    #[arg(long)]
    no_revenue: bool,

    /// Only print videos at or above the popular threshold
    #[arg(long)]
    popular_only: bool,

    /// Print the reports as JSON instead of markdown
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;

    let mut config = AggregatorConfig::load(cli.config.as_deref())?;
    if let Some(rpm) = cli.mock_rpm {
        config.mock.rpm = Some(rpm);
    }
    if let Some(monetization) = cli.mock_monetization {
        config.mock.monetization = Some(monetization);
    }
    config.validate()?;

    let client = YouTubeDataV3Client::with_endpoints(
        initialize_client()?,
        config.data_api_base.as_str(),
        config.analytics_api_base.as_str(),
    );
    let provider = YouTubeProvider::new(client, Credentials {
        api_key: cli.api_key,
        bearer_token: cli.access_token,
    });

    let channel_provider = provider.has_bearer_token().then_some(&provider as &dyn ChannelProvider);
    let scope = resolve_channel_scope(cli.channel_id, channel_provider).await?;
    info!(channel_id = scope.channel_id(), "resolved channel");

    let revenue = (!cli.no_revenue && provider.has_bearer_token()).then_some(&provider as &dyn RevenueProvider);

    let recent_ctx = FetchContext::new(&provider, &provider, &config)
        .with_channel_scope(scope.clone())
        .with_revenue(revenue);
    let recent = fetch_recent(&recent_ctx).await?;

    let today_ctx = FetchContext::new(&provider, &provider, &config)
        .with_channel_scope(scope)
        .with_revenue(revenue);
    let today = fetch_today(&today_ctx).await?;

    if cli.json {
        let output = serde_json::json!({ "recent": recent, "today": today });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_section(
        "Recent Videos (With RPM & Monetization)",
        &recent,
        cli.popular_only,
        &format!("No recent videos found in the past {} days.", config.lookback_days),
    );
    print_section(
        "Today / Live (Videos + Livestreams, With RPM & Monetization)",
        &today,
        cli.popular_only,
        "No videos or livestreams found for today.",
    );

    Ok(())
}

fn print_section(title: &str, report: &MetricsReport, popular_only: bool, empty_message: &str) {
    println!("## {}\n", title);

    let records = if popular_only { &report.popular } else { &report.records };
    if records.is_empty() {
        println!("> {}\n", empty_message);
        return;
    }

    if let RevenueStatus::Unavailable(reason) = &report.revenue {
        println!("> Revenue unavailable: {}\n", reason);
    }

    println!("{}", render_markdown_table(records));
}
