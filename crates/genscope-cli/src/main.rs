//! genscope CLI - render the generations table as text.

use clap::{Parser, Subcommand};
use genscope::widgets::SortState;
use genscope::{DashboardConfig, DashboardError, GenerationFilter, GenerationsPage, MemorySource, Rect};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "genscope")]
#[command(about = "Browse LLM generations in a virtualized table")]
#[command(version)]
struct Cli {
    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the visible window of the table
    Render(RenderArgs),

    /// Validate a YAML config and print it with defaults filled in
    CheckConfig {
        /// Path to config file
        config: PathBuf,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// JSON array of generations
    #[arg(short, long)]
    data: PathBuf,

    /// YAML dashboard config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Table height in pixels, header included
    #[arg(long, default_value = "336")]
    height: f32,

    /// Table width in pixels
    #[arg(long, default_value = "800")]
    width: f32,

    /// Scroll offset of the body in pixels
    #[arg(long, default_value = "0")]
    scroll: f32,

    /// Column key to sort by
    #[arg(long)]
    sort: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long, requires = "sort")]
    asc: bool,

    /// Only show these models
    #[arg(long)]
    model: Vec<String>,

    /// Only show these statuses
    #[arg(long)]
    status: Vec<String>,

    /// Only show generations with any of these tags
    #[arg(long)]
    tag: Vec<String>,

    /// Only show these users
    #[arg(long)]
    user: Vec<String>,

    /// Case-insensitive text search
    #[arg(long)]
    search: Option<String>,
}

impl RenderArgs {
    fn filter(&self) -> GenerationFilter {
        let mut filter = GenerationFilter::new();
        for model in &self.model {
            filter = filter.model(model.as_str());
        }
        for status in &self.status {
            filter = filter.status(status.as_str());
        }
        for tag in &self.tag {
            filter = filter.tag(tag.as_str());
        }
        for user in &self.user {
            filter = filter.user(user.as_str());
        }
        if let Some(search) = &self.search {
            filter = filter.search(search.as_str());
        }
        filter
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render(args) => {
            load_config(args.config.as_deref()).and_then(|config| {
                init_tracing(cli.log_level.as_deref().unwrap_or(&config.log_level));
                render(&args, &config)
            })
        }
        Commands::CheckConfig { config } => {
            init_tracing(cli.log_level.as_deref().unwrap_or("info"));
            check_config(&config)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by RUST_LOG or `level`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig, DashboardError> {
    path.map_or_else(|| Ok(DashboardConfig::default()), DashboardConfig::load)
}

fn render(args: &RenderArgs, config: &DashboardConfig) -> Result<(), DashboardError> {
    let source = MemorySource::load(&args.data)?;
    debug!(generations = source.len(), path = %args.data.display(), "loaded data");

    let mut page = GenerationsPage::new(source, config)?;
    page.layout(Rect::new(0.0, 0.0, args.width, args.height));
    page.mount()?;

    let filter = args.filter();
    if !filter.is_empty() {
        page.set_filter(filter)?;
    }
    if let Some(column) = &args.sort {
        page.table_mut().set_sort(SortState::by(column.as_str(), !args.asc));
    }
    if args.scroll > 0.0 {
        page.scroll_to(args.scroll)?;
    }

    print!("{}", page.render_text());
    Ok(())
}

fn check_config(path: &Path) -> Result<(), DashboardError> {
    let config = DashboardConfig::load(path)?;
    println!("Config valid: {}", path.display());
    print!("{}", config.to_yaml()?);
    Ok(())
}
