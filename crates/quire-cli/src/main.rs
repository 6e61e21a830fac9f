use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use quire_api::{PostFilters, PostStatus, SortBy};
use quire_common::telemetry::{self, TelemetryConfig};
use quire_common::{ApiClient, Config, FileStore};
use quire_editor_core::UploadCoordinator;

mod attach;

#[derive(Parser)]
#[command(version, about = "Quire - markdown post editing with inline image uploads", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a config file (.json or .toml)
    #[arg(long, global = true, env = "QUIRE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload images and embed them at the end of a markdown file
    Attach {
        /// Markdown file to edit in place
        markdown: PathBuf,

        /// Images to upload
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// List posts
    Posts {
        #[arg(long)]
        tag: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default config file
    Init {
        /// Destination; the extension picks the format
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Draft,
    Published,
}

impl From<StatusArg> for PostStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => PostStatus::Draft,
            StatusArg::Published => PostStatus::Published,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Latest,
    Popular,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Latest => SortBy::Latest,
            SortArg::Popular => SortBy::Popular,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_miette()?;
    telemetry::init(TelemetryConfig::from_env("quire-cli"));

    let cli = Cli::parse();

    match cli.command {
        Commands::Attach { markdown, images } => {
            let config = load_config(cli.config.as_deref()).await?;
            attach(config, markdown, images).await?;
        }
        Commands::Posts {
            tag,
            username,
            status,
            sort,
            page,
            page_size,
        } => {
            let config = load_config(cli.config.as_deref()).await?;
            let filters = PostFilters {
                tag: tag.map(Into::into),
                username: username.map(Into::into),
                status: status.map(Into::into),
                sort_by: sort.map(Into::into),
            };
            list_posts(config, filters, page, page_size).await?;
        }
        Commands::Config {
            command: ConfigCommands::Init { path, force },
        } => {
            init_config(&path, force).await?;
        }
    }

    Ok(())
}

/// Explicit path, else the per-user config if present, else defaults. Env overrides apply last.
async fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(&FileStore::new(path)).await?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => Config::load(&FileStore::new(path)).await?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quire").join("config.toml"))
}

async fn attach(config: Config, markdown: PathBuf, images: Vec<PathBuf>) -> Result<()> {
    if !markdown.exists() {
        return Err(miette::miette!(
            "Markdown file not found: {}",
            markdown.display()
        ));
    }

    let client = ApiClient::new(&config)?;
    let notifier = |message: &str| eprintln!("⚠ {message}");
    let coordinator = UploadCoordinator::from_config(client, notifier, &config);

    println!("→ Uploading {} image(s)...", images.len());
    let start = std::time::Instant::now();
    let summary = attach::attach_images(&coordinator, &markdown, &images).await?;

    println!(
        "✓ Embedded {} image(s) in {:.2}s",
        summary.inserted,
        start.elapsed().as_secs_f64()
    );
    if summary.failed > 0 {
        println!("⚠ {} upload(s) failed", summary.failed);
    }

    Ok(())
}

async fn list_posts(config: Config, filters: PostFilters, page: u32, page_size: u32) -> Result<()> {
    let client = ApiClient::new(&config)?;
    let listing = client.list_posts(&filters, page, page_size).await?;

    for post in &listing.items {
        println!(
            "{}  {}  @{}  ({} views)",
            post.id, post.title, post.user.username, post.view_count
        );
    }
    println!("Page {}, {} posts total", listing.page, listing.total);
    if let Some(next) = listing.next_page() {
        println!("  More with --page {next}");
    }

    Ok(())
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(miette::miette!(
            help = "pass --force to overwrite",
            "Config file already exists: {}",
            path.display()
        ));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
    }

    Config::default().save(&FileStore::new(path)).await?;
    println!("✓ Wrote {}", path.display());

    Ok(())
}

fn init_miette() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    Ok(())
}
