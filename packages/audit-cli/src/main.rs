use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audit_cli::config::Config;
use audit_cli::report::CsvReport;
use audit_cli::{pipeline, verify};
use gitlab_client::GitlabClient;

/// Audit GitLab user activity: classify every active-state account by its
/// group/project memberships and write the two CSV reports.
#[derive(Parser)]
#[command(name = "user-audit", version)]
struct Args {
    /// Base URL of the GitLab instance (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Private API token (overrides TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Users-listing page size
    #[arg(long, default_value_t = audit_cli::config::DEFAULT_PER_PAGE)]
    per_page: u32,

    /// Output path for the active-members report
    #[arg(long, default_value = audit_cli::config::DEFAULT_ACTIVE_OUT)]
    active_out: std::path::PathBuf,

    /// Output path for the inactive-members report
    #[arg(long, default_value = audit_cli::config::DEFAULT_INACTIVE_OUT)]
    inactive_out: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(token) = args.token {
        config.token = token;
    }
    config.per_page = args.per_page;
    config.active_out = args.active_out;
    config.inactive_out = args.inactive_out;

    if config.token_is_placeholder() {
        tracing::warn!("TOKEN is not set; requests will fail authentication");
    }
    tracing::info!(host = %config.host, per_page = config.per_page, "Starting user audit");

    let client = GitlabClient::new(config.host.clone(), config.token.clone());

    let mut active = CsvReport::create(&config.active_out).with_context(|| {
        format!("Failed to create {}", config.active_out.display())
    })?;
    let mut inactive = CsvReport::create(&config.inactive_out).with_context(|| {
        format!("Failed to create {}", config.inactive_out.display())
    })?;

    let stats = pipeline::run(&client, config.per_page, &mut active, &mut inactive).await?;

    active.finish().context("Failed to flush active report")?;
    inactive.finish().context("Failed to flush inactive report")?;

    println!();
    println!("{}", style("Audit summary").bold());
    println!("  Pages fetched:       {}", stats.pages_fetched);
    println!("  Users listed:        {}", stats.users_listed);
    println!("  Skipped (state):     {}", stats.skipped_state);
    println!("  Membership failures: {}", stats.membership_failures);
    println!(
        "  {} -> {} rows",
        config.active_out.display(),
        stats.active_members
    );
    println!(
        "  {} -> {} rows",
        config.inactive_out.display(),
        stats.inactive_members
    );

    let outcome = verify::verify(&config.active_out, &config.inactive_out)
        .context("Failed to read reports back for verification")?;

    println!();
    println!("{}", style("Validation checks").bold());
    if outcome.duplicate_ids.is_empty() {
        println!("  {} no IDs present in both files", style("✓").green());
    } else {
        println!(
            "  {} IDs in both files: {}",
            style("✗").red(),
            outcome.duplicate_ids.join(", ")
        );
    }
    if outcome.integrity_errors == 0 {
        println!("  {} all rows have id and username", style("✓").green());
    } else {
        println!(
            "  {} {} row(s) with empty id or username",
            style("✗").red(),
            outcome.integrity_errors
        );
    }

    // Integrity findings are reported but never change the exit code; the
    // writes they describe already happened.
    Ok(())
}
