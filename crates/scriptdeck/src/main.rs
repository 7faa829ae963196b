//! scriptdeck - Browse the SAPP Lua script catalog

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scriptdeck_core::export::{export_entries_to_json, save_script};
use scriptdeck_core::{Catalog, CategoryFilter, SourceConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "scriptdeck",
    version,
    about = "Browse, search and download SAPP Lua scripts",
    long_about = "A terminal catalog for the HALO-SCRIPT-PROJECTS SAPP scripts.\n\
                  \n\
                  Loads metadata.json from GitHub, lists every script by category, and\n\
                  fetches script sources on demand (each file at most once per run).\n\
                  \n\
                  Examples:\n\
                    scriptdeck                               # Run TUI (default)\n\
                    scriptdeck list --query spawn            # Search scripts\n\
                    scriptdeck list --category \"Mini Games\"  # One category\n\
                    scriptdeck categories                    # Category counts\n\
                    scriptdeck show Core/foo                 # Print a script\n\
                    scriptdeck download Core/foo -o ./lua    # Save a script\n\
                  \n\
                  Environment Variables:\n\
                    SCRIPTDECK_METADATA_URL            # Override metadata.json URL\n\
                    SCRIPTDECK_RAW_BASE                # Override raw content base URL\n\
                    SCRIPTDECK_CONFIG                  # Config file path\n\
                    SCRIPTDECK_NO_COLOR                # Disable ANSI colors\n\
                    RUST_LOG                           # Log filter (TUI: scriptdeck=info, CLI: scriptdeck=warn)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Full URL of metadata.json
    #[arg(long, env = "SCRIPTDECK_METADATA_URL", global = true)]
    metadata_url: Option<String>,

    /// Base URL that `sapp/<category>/<file>` is appended to
    #[arg(long, env = "SCRIPTDECK_RAW_BASE", global = true)]
    raw_base: Option<String>,

    /// Config file (default: <config_dir>/scriptdeck/config.toml)
    #[arg(long, env = "SCRIPTDECK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "SCRIPTDECK_NO_COLOR", global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Run TUI interface (default)
    Tui {
        /// Where `d` saves scripts (default: Downloads folder)
        #[arg(long)]
        download_dir: Option<PathBuf>,
    },
    /// List scripts, optionally filtered
    List {
        /// Category name, or "all"
        #[arg(long, short = 'c', default_value = "all")]
        category: String,
        /// Case-insensitive match on title, description or filename
        #[arg(long, short = 'q', default_value = "")]
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Also write the listing to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List categories with script counts
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a script's details and source
    Show {
        /// <category>/<key>, or a key that is unique across categories
        id: String,
        /// Print only the source
        #[arg(long)]
        raw: bool,
    },
    /// Save a script to disk
    Download {
        /// <category>/<key>, or a key that is unique across categories
        id: String,
        /// Target directory
        #[arg(long, short = 'o', default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    let no_color = cli.no_color;

    match cli.mode.unwrap_or(Mode::Tui { download_dir: None }) {
        Mode::Tui { download_dir } => {
            init_file_logging()?;
            run_tui(config, download_dir).await?;
        }
        Mode::List {
            category,
            query,
            json,
            export,
        } => {
            init_stderr_logging(no_color);
            run_list(config, category, query, json, export, no_color).await?;
        }
        Mode::Categories { json } => {
            init_stderr_logging(no_color);
            run_categories(config, json, no_color).await?;
        }
        Mode::Show { id, raw } => {
            init_stderr_logging(no_color);
            run_show(config, id, raw).await?;
        }
        Mode::Download { id, output } => {
            init_stderr_logging(no_color);
            run_download(config, id, output).await?;
        }
    }

    Ok(())
}

/// Defaults, then config file, then flags/env
fn resolve_config(cli: &Cli) -> Result<SourceConfig> {
    let mut config =
        SourceConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(url) = &cli.metadata_url {
        config = config.with_metadata_url(url);
    }
    if let Some(base) = &cli.raw_base {
        config = config.with_raw_base(base);
    }

    Ok(config)
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// CLI subcommands log to stderr, warnings and up unless RUST_LOG says otherwise
fn init_stderr_logging(no_color: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("scriptdeck=warn"))
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init();
}

/// The TUI owns the terminal, so logs go to `<cache_dir>/scriptdeck/scriptdeck.log`
fn init_file_logging() -> Result<()> {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("scriptdeck")) else {
        return Ok(());
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let path = dir.join("scriptdeck.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("scriptdeck=info"))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

async fn run_tui(config: SourceConfig, download_dir: Option<PathBuf>) -> Result<()> {
    let catalog = Arc::new(Catalog::from_config(config).context("Failed to create HTTP client")?);

    let download_dir = download_dir
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    tracing::info!(download_dir = %download_dir.display(), "Starting TUI");

    // Run TUI (shows a loading spinner and loads metadata in background)
    scriptdeck_tui::run(catalog, download_dir).await
}

/// Build the catalog and load metadata behind a spinner
async fn load_catalog(config: SourceConfig, show_spinner: bool) -> Result<Catalog> {
    use indicatif::{ProgressBar, ProgressStyle};

    let catalog = Catalog::from_config(config).context("Failed to create HTTP client")?;

    let spinner = if show_spinner {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(format!("Loading {}", catalog.config().metadata_url));

    let report = catalog.reload().await;
    spinner.finish_and_clear();

    if let Some(reason) = report.error {
        anyhow::bail!("Failed to load script catalog: {}", reason);
    }

    tracing::debug!(
        entries = report.entries,
        categories = report.categories,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Catalog loaded"
    );

    Ok(catalog)
}

async fn run_list(
    config: SourceConfig,
    category: String,
    query: String,
    json: bool,
    export: Option<PathBuf>,
    no_color: bool,
) -> Result<()> {
    let catalog = load_catalog(config, !json).await?;
    let category = CategoryFilter::parse(&category);
    let entries = catalog.search(&query, &category);

    if let Some(path) = export {
        export_entries_to_json(&entries, &path)?;
        eprintln!("Exported {} scripts to {}", entries.len(), path.display());
    }

    if entries.is_empty() && !query.trim().is_empty() && !json {
        return Err(cli::CliError::NoResults {
            query: query.trim().to_string(),
            scanned: catalog.entries().len(),
        }
        .into());
    }

    println!("{}", cli::format_entry_table(&entries, json, no_color));
    Ok(())
}

async fn run_categories(config: SourceConfig, json: bool, no_color: bool) -> Result<()> {
    let catalog = load_catalog(config, !json).await?;
    println!(
        "{}",
        cli::format_category_table(&catalog.categories(), json, no_color)
    );
    Ok(())
}

async fn run_show(config: SourceConfig, id: String, raw: bool) -> Result<()> {
    let catalog = load_catalog(config, !raw).await?;
    let entry = cli::find_entry(&catalog.entries(), &id)?;

    let text = catalog
        .content_for(&entry)
        .await
        .with_context(|| format!("Error loading script {}", entry.id()))?;

    if raw {
        print!("{}", text);
    } else {
        println!("{}", cli::format_entry_info(&entry));
        println!("{}", "─".repeat(60));
        println!("{}", text);
    }
    Ok(())
}

async fn run_download(config: SourceConfig, id: String, output: PathBuf) -> Result<()> {
    let catalog = load_catalog(config, true).await?;
    let entry = cli::find_entry(&catalog.entries(), &id)?;

    let text = catalog
        .content_for(&entry)
        .await
        .with_context(|| format!("Error loading script {}", entry.id()))?;

    let path = save_script(Path::new(&output), &entry, &text)?;
    println!("✓ Saved {} ({} bytes)", path.display(), text.len());
    Ok(())
}
