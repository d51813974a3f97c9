use chrono::Utc;
use clap::Parser;
use legistar_monitor::config;
use legistar_monitor::prelude::*;
use std::path::PathBuf;
use tracing::info;

/// Poll Legistar for matters and push rule matches to Notion
#[derive(Parser, Debug)]
#[command(name = "legistar-monitor")]
#[command(about = "Classify Legistar matters and export matches to a Notion database")]
#[command(version)]
struct Args {
    /// Legistar client API root
    #[arg(long, env = "LEGISTAR_BASE_URL", default_value = config::DEFAULT_LEGISTAR_BASE_URL)]
    legistar_base_url: String,

    /// Public legislation detail page; records link to `<url>?ID=<matter id>`
    #[arg(long, env = "LEGISTAR_VIEWER_URL", default_value = config::DEFAULT_RECORD_VIEWER_URL)]
    viewer_url: String,

    /// Notion pages endpoint
    #[arg(long, env = "NOTION_API_URL", default_value = config::DEFAULT_NOTION_API_URL)]
    notion_api_url: String,

    /// Value of the Notion-Version header
    #[arg(long, env = "NOTION_VERSION", default_value = config::DEFAULT_NOTION_VERSION)]
    notion_version: String,

    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    notion_token: Option<String>,

    /// Target Notion database
    #[arg(long, env = "NOTION_DATABASE_ID")]
    notion_database_id: Option<String>,

    /// Repeated matter ids in one list: skip or export
    #[arg(long, env = "MONITOR_DUPLICATES", default_value = "skip", value_parser = ["skip", "export"])]
    duplicates: String,

    /// YAML file replacing the built-in rule tables
    #[arg(long, env = "MONITOR_RULES")]
    rules: Option<PathBuf>,
}

fn build_config(args: Args) -> legistar_monitor::Result<Config> {
    let mut builder = ConfigBuilder::new()
        .legistar_base_url(args.legistar_base_url)
        .record_viewer_url(args.viewer_url)
        .notion_api_url(args.notion_api_url)
        .notion_version(args.notion_version)
        .duplicate_policy(DuplicatePolicy::from(args.duplicates.as_str()));

    if let Some(token) = args.notion_token {
        builder = builder.notion_token(token);
    }
    if let Some(database_id) = args.notion_database_id {
        builder = builder.notion_database_id(database_id);
    }
    if let Some(rules) = args.rules {
        builder = builder.rules_path(rules);
    }

    builder.build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; real environment variables win over it
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = build_config(args)?;

    let rules = match &config.rules_path {
        Some(path) => {
            info!(path = %path.display(), "loading rule tables");
            RuleSet::from_yaml_file(path)?
        }
        None => RuleSet::default(),
    };

    let source = LegistarClient::new(config.legistar_base_url.clone());
    let sink = NotionClient::from_config(&mut config)?;
    let assembler = MatterAssembler::new(
        config.record_viewer_url.clone(),
        Utc::now().date_naive(),
    );

    let processor = MonitorProcessor::new(source, sink, rules, assembler)
        .with_duplicate_policy(config.duplicate_policy);

    let summary = processor.run().await?;

    println!("✅ Legistar monitor run complete.");
    println!("{}", summary);
    Ok(())
}
