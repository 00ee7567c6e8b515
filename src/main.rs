use anyhow::{Context, Result};
use arxiv_feed::config::{find_config_file, load_config, load_env_config, Config, SearchDefaults};
use arxiv_feed::feed::read_feed;
use arxiv_feed::models::{ArticleRecord, QueryBuilder, TaxonomyRow};
use arxiv_feed::{ArxivClient, ArxivError};
use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arxiv-feed - Query the arXiv API and turn its Atom feed into structured records
#[derive(Parser, Debug)]
#[command(name = "arxiv-feed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query the arXiv API and turn its Atom feed into structured records", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        if self == OutputFormat::Auto {
            if std::io::stdout().is_terminal() {
                OutputFormat::Table
            } else {
                OutputFormat::Json
            }
        } else {
            self
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the API request a search would send, without sending it
    Url {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Search arXiv and print the returned articles
    #[command(alias = "s")]
    Search {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Parse a saved arXiv Atom response and print its articles
    Parse {
        /// Path to the Atom XML file, or `-` for stdin
        file: PathBuf,
    },

    /// Fetch the arXiv category taxonomy
    Taxonomy,

    /// Show the effective configuration, or write a default configuration file
    Config {
        /// Write a default configuration file to this path
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

/// Query arguments shared by `url` and `search`
#[derive(Args, Debug)]
struct QueryArgs {
    /// arXiv search expression (e.g. "ti:transformer AND cat:cs.CL")
    #[arg(long)]
    query: Option<String>,

    /// arXiv identifiers to fetch (repeatable or comma-separated)
    #[arg(long = "id", value_delimiter = ',')]
    ids: Vec<String>,

    /// Result offset
    #[arg(long, conflicts_with = "no_start")]
    start: Option<u32>,

    /// Leave the start offset out of the request
    #[arg(long)]
    no_start: bool,

    /// Maximum number of results (at most 2000)
    #[arg(long, short = 'n')]
    max_results: Option<u32>,

    /// Sort field: submittedDate, lastUpdatedDate or relevance
    #[arg(long)]
    sort_by: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long, conflicts_with = "descending")]
    ascending: bool,

    /// Sort descending, overriding an ascending configuration default
    #[arg(long)]
    descending: bool,
}

impl QueryArgs {
    fn to_builder(&self, defaults: &SearchDefaults) -> QueryBuilder {
        let mut builder = defaults.builder();

        if let Some(query) = &self.query {
            builder = builder.search_terms(query.clone());
        }
        if !self.ids.is_empty() {
            builder = builder.id_list(self.ids.iter().map(|id| id.trim().to_string()));
        }
        if let Some(start) = self.start {
            builder = builder.start(start);
        }
        if self.no_start {
            builder = builder.without_start();
        }
        if let Some(max) = self.max_results {
            builder = builder.max_results(max);
        }
        if let Some(sort_by) = &self.sort_by {
            builder = builder.sort_by(sort_by.clone());
        }
        if self.ascending {
            builder = builder.ascending(true);
        }
        if self.descending {
            builder = builder.ascending(false);
        }
        builder
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => load_env_config().context("Failed to read configuration from environment")?,
    };
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_feed={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let format = cli.output.resolve();

    match cli.command {
        Commands::Url { query } => {
            let client = ArxivClient::from_config(&config)?;
            let request = client.prepare(&query.to_builder(&config.search))?;
            println!("{}", request.url());
        }

        Commands::Search { query } => {
            let client = ArxivClient::from_config(&config)?;
            let feed = client.search(&query.to_builder(&config.search)).await?;

            if !cli.quiet {
                let total = feed
                    .total_results
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "?".to_string());
                eprintln!("Found {} of {} articles", feed.entries.len(), total);
                if feed.skipped > 0 {
                    eprintln!("Skipped {} malformed entries", feed.skipped);
                }
            }

            output_records(&feed.entries, format)?;
        }

        Commands::Parse { file } => {
            let feed = if file.as_os_str() == "-" {
                read_feed(std::io::stdin().lock()).context("Failed to parse stdin")?
            } else {
                std::fs::File::open(&file)
                    .map_err(ArxivError::from)
                    .and_then(read_feed)
                    .with_context(|| format!("Failed to parse {}", file.display()))?
            };
            if !cli.quiet && feed.skipped > 0 {
                eprintln!("Skipped {} malformed entries", feed.skipped);
            }

            output_records(&feed.entries, format)?;
        }

        Commands::Taxonomy => {
            let client = ArxivClient::from_config(&config)?;
            let rows = client.fetch_category_taxonomy().await?;

            if !cli.quiet {
                eprintln!("Found {} categories", rows.len());
            }

            output_taxonomy(&rows, format)?;
        }

        Commands::Config { init } => match init {
            Some(path) => {
                if path.exists() {
                    anyhow::bail!("{} already exists", path.display());
                }
                Config::default().save(&path)?;
                if !cli.quiet {
                    eprintln!("Wrote default configuration to {}", path.display());
                }
            }
            None => print!("{}", config.to_toml()?),
        },
    }

    Ok(())
}

fn output_records(records: &[ArticleRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Plain => {
            for record in records {
                println!(
                    "{}{} - {}",
                    record.article_id, record.article_version, record.title
                );
                println!("  Authors: {}", record.author_names().join(", "));
                if let Some(primary) = record.primary_category().and_then(|c| c.term()) {
                    println!("  Category: {}", primary);
                }
                println!("  Published: {}", record.published);
                if let Some(url) = record.abstract_url() {
                    println!("  URL: {}", url);
                }
                if let Some(pdf_url) = record.pdf_url() {
                    println!("  PDF: {}", pdf_url);
                }
                println!();
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["ID", "Title", "Authors", "Category", "Published"]);

            for record in records {
                let published = record
                    .published_at()
                    .map(|dt| dt.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| record.published.clone());

                table.add_row(vec![
                    Cell::new(format!("{}{}", record.article_id, record.article_version)),
                    Cell::new(truncate(&record.title, 50)).add_attribute(Attribute::Bold),
                    Cell::new(truncate(&record.author_names().join(", "), 30)),
                    Cell::new(
                        record
                            .primary_category()
                            .and_then(|c| c.term())
                            .unwrap_or_default(),
                    ),
                    Cell::new(published),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn output_taxonomy(rows: &[TaxonomyRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        OutputFormat::Plain => {
            for row in rows {
                println!("{}\t{}\t{}", row.short_name, row.long_name, row.description);
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Short Name", "Long Name", "Description"]);

            for row in rows {
                table.add_row(vec![
                    Cell::new(&row.short_name),
                    Cell::new(&row.long_name),
                    Cell::new(truncate(&row.description, 60)),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Shorten `text` to at most `max` characters, ending in "..." when cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
