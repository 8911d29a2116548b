use anyhow::{Context, Result};
use book_finder::config::{find_config_file, get_config, load_config, Config};
use book_finder::display::{
    format_book_authors, format_book_categories, format_book_length, format_book_published,
    format_book_rating, format_category_for_search,
};
use book_finder::models::{
    Book, LengthBucket, LengthThresholds, SearchCriteria, DEFAULT_MIN_RESULTS,
};
use book_finder::search::BookCollector;
use book_finder::sources::{CatalogSource, GoogleBooksSource};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Book Finder - Search a book catalog by subject, length and publication year
#[derive(Parser, Debug)]
#[command(name = "book-finder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search a book catalog by subject, length and publication year", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
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

    #[command(subcommand)]
    command: Option<Commands>,
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

/// Book length bucket
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Length {
    /// Fewer than 200 pages
    Short,
    /// 200 to 400 pages
    Medium,
    /// More than 400 pages
    Long,
}

impl From<Length> for LengthBucket {
    fn from(length: Length) -> Self {
        match length {
            Length::Short => LengthBucket::Short,
            Length::Medium => LengthBucket::Medium,
            Length::Long => LengthBucket::Long,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for books on a subject
    #[command(alias = "s")]
    Search {
        /// Subject or category to search
        subject: String,

        /// Required book length
        #[arg(long, short, value_enum)]
        length: Length,

        /// First publication year to accept (inclusive)
        #[arg(long = "from")]
        start_year: i32,

        /// Last publication year to accept (inclusive)
        #[arg(long = "to")]
        end_year: i32,

        /// Number of books to collect
        #[arg(long, short, default_value_t = DEFAULT_MIN_RESULTS)]
        min_results: usize,

        /// Selected genre; "fiction" searches the subject within fiction
        #[arg(long, short)]
        genre: Option<String>,

        /// Drop books rated below this
        #[arg(long)]
        min_rating: Option<f32>,

        /// Print collection statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        load_config(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        get_config().context("Failed to read configuration from environment")?
    };

    init_tracing(&cli, &config);

    match cli.command {
        Some(Commands::Search {
            subject,
            length,
            start_year,
            end_year,
            min_results,
            genre,
            min_rating,
            stats,
        }) => {
            if start_year > end_year {
                anyhow::bail!(
                    "--from ({}) must not be later than --to ({})",
                    start_year,
                    end_year
                );
            }

            let subject = match genre.as_deref() {
                Some(genre) => format_category_for_search(&subject, genre),
                None => subject,
            };

            let mut criteria = SearchCriteria::new(&subject, length.into(), start_year, end_year)
                .min_results(min_results);
            if let Some(rating) = min_rating {
                criteria = criteria.min_rating(rating);
            }

            let source = GoogleBooksSource::from_config(&config.api)?;
            if !cli.quiet {
                eprintln!("Searching {} for \"{}\"...", source.name(), subject);
            }

            let collector = BookCollector::with_settings(&source, config.search.clone());
            let report = collector.collect(&criteria).await?;

            if !cli.quiet {
                eprintln!(
                    "Found {} of {} requested books ({} pages fetched)",
                    report.books.len(),
                    criteria.min_results,
                    report.stats.pages_fetched
                );
            }
            if stats {
                eprintln!("{}", serde_json::to_string_pretty(&report.stats)?);
            }

            output_books(
                &report.books,
                &collector.settings().length_thresholds,
                cli.output,
            )?;
        }

        Some(Commands::Config) => {
            println!("{}", toml::to_string_pretty(&config)?);
        }

        None => {
            println!("Book Finder v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Use --help for usage information");
            println!();
            println!("Commands:");
            println!("  search <subject> --length <len> --from <year> --to <year>");
            println!("  config           - Show the effective configuration");
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("book_finder={}", level)),
    );

    // Logs go to stderr so stdout stays clean for results
    if config.logging.is_json() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn output_books(
    books: &[Book],
    thresholds: &LengthThresholds,
    format: OutputFormat,
) -> Result<()> {
    let actual_format = if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    match actual_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(books)?);
        }
        OutputFormat::Plain => {
            for book in books {
                println!("{} - {}", book.title, format_book_authors(book));
                println!("  Published: {}", format_book_published(book));
                println!("  Categories: {}", format_book_categories(book));
                println!("  Rating: {}", format_book_rating(book));
                println!("  Length: {}", format_book_length(book, thresholds));
                println!();
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec![
                "Title",
                "Authors",
                "Published",
                "Categories",
                "Rating",
                "Length",
            ]);

            for book in books {
                table.add_row(vec![
                    Cell::new(truncate(&book.title, 50)).add_attribute(Attribute::Bold),
                    Cell::new(truncate(&format_book_authors(book), 30)),
                    Cell::new(format_book_published(book)),
                    Cell::new(format_book_categories(book)),
                    Cell::new(format_book_rating(book)),
                    Cell::new(format_book_length(book, thresholds)),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["book-finder"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["book-finder", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["book-finder", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["book-finder", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);

        let cli = Cli::parse_from(["book-finder", "--output", "plain"]);
        assert_eq!(cli.output, OutputFormat::Plain);
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from([
            "book-finder",
            "search",
            "history",
            "--length",
            "medium",
            "--from",
            "1990",
            "--to",
            "2020",
        ]);
        match &cli.command {
            Some(Commands::Search {
                subject,
                length,
                start_year,
                end_year,
                min_results,
                genre,
                min_rating,
                ..
            }) => {
                assert_eq!(subject, "history");
                assert_eq!(*length, Length::Medium);
                assert_eq!(*start_year, 1990);
                assert_eq!(*end_year, 2020);
                assert_eq!(*min_results, 10);
                assert!(genre.is_none());
                assert!(min_rating.is_none());
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_with_options() {
        let cli = Cli::parse_from([
            "book-finder",
            "search",
            "horror",
            "-l",
            "long",
            "--from",
            "2000",
            "--to",
            "2010",
            "--min-results",
            "3",
            "--genre",
            "fiction",
            "--min-rating",
            "4.0",
            "--stats",
        ]);
        match &cli.command {
            Some(Commands::Search {
                length,
                min_results,
                genre,
                min_rating,
                stats,
                ..
            }) => {
                assert_eq!(LengthBucket::from(*length), LengthBucket::Long);
                assert_eq!(*min_results, 3);
                assert_eq!(genre.as_deref(), Some("fiction"));
                assert_eq!(*min_rating, Some(4.0));
                assert!(*stats);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_requires_length() {
        let result = Cli::try_parse_from([
            "book-finder",
            "search",
            "history",
            "--from",
            "1990",
            "--to",
            "2020",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_config_command() {
        let cli = Cli::parse_from(["book-finder", "config"]);
        assert!(matches!(cli.command, Some(Commands::Config)));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long book title", 10), "a very ...");
    }
}
