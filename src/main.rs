mod cli;

use clap::Parser;
use cli::{Cli, Commands, PublishArgs, RenderArgs, SettingsArgs};
use markdown_confluence_sync::{
    config, ConfluenceClient, InputEnumerator, MarkdownRenderer, PublishConfig, Result,
};
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Seed the environment from .env before clap reads env fallbacks.
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        None => handle_publish_command(&PublishArgs::default(), &cli.settings).await,
        Some(Commands::Publish(args)) => handle_publish_command(args, &cli.settings).await,
        Some(Commands::List) => handle_list_command(&cli.settings),
        Some(Commands::Render(args)) => handle_render_command(args, &cli.settings).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_publish_command(args: &PublishArgs, settings: &SettingsArgs) -> Result<()> {
    let config = PublishConfig {
        dry_run: args.dry_run,
        strict_lookup: args.strict_lookup,
        ..config::load(&settings.to_raw())?
    };

    info!(
        "Publishing to {} under parent page {}",
        config.base_url(),
        config.parent_page_id
    );
    if config.dry_run {
        info!("Dry run: no pages will be created or updated");
    }

    let client = ConfluenceClient::from_config(&config)?;
    let report = markdown_confluence_sync::publish(&config, &client).await?;

    if let Some(json_path) = &args.json_output {
        let json_content = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(json_path, json_content).await?;
        info!("Publish report written to: {}", json_path.display());
    }

    let failures = report.failure_count();
    if failures > 0 {
        warn!("{} documents failed to publish", failures);
    }

    for link in report.links() {
        println!("{}", link);
    }

    Ok(())
}

fn handle_list_command(settings: &SettingsArgs) -> Result<()> {
    let input = config::load_input(&settings.to_raw())?;
    let files = InputEnumerator::enumerate(&input)?;

    for file in &files {
        println!("{}", file.display());
    }

    Ok(())
}

async fn handle_render_command(args: &RenderArgs, settings: &SettingsArgs) -> Result<()> {
    let markdown = tokio::fs::read_to_string(&args.file).await?;
    let html = MarkdownRenderer::new(settings.markdown_extensions).render(&markdown);

    match &args.output {
        Some(output) => {
            tokio::fs::write(output, html).await?;
            info!("Rendered {} to {}", args.file.display(), output.display());
        }
        None => print!("{}", html),
    }

    Ok(())
}
