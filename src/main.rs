//! wcb-privacy - personal-data exporters and erasers for WordCamp content.
//!
//! Speaker, sponsor and organizer posts hold personal data. This tool
//! registers one exporter and one eraser per post type and drives them for
//! an email address the way a data subject request does, page by page.
//!
//!   wcb-privacy import demos/fixtures.json                # Seed the content database
//!   wcb-privacy exporters                                 # Registered exporters/erasers
//!   wcb-privacy export a@x.com                            # Full export request
//!   wcb-privacy export a@x.com -k wcb_speaker -p 2        # One exporter page
//!   wcb-privacy -f json export a@x.com -o export.json     # Save as JSON
//!   wcb-privacy erase a@x.com                             # Eraser outcomes

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    format_erase_results, format_items_table, format_json, format_page_markdown,
    format_registry_table, format_report_markdown, format_report_table, format_summary,
    import_fixture, parse_fixture, register_erasers, register_exporters, run_erase_request,
    run_export_request, Exporter, OutputFormat,
};
use cli::{Cli, Commands, ConfigAction};
use domain::{AppConfig, ContentKind};
use infrastructure::{ensure_config_exists, load_config, render_config, SqliteContentStore};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| domain::AppError::Config { message: e })?;

    // `config init` must work before the file exists
    let mut config = match &cli.command {
        Commands::Config {
            action: ConfigAction::Init,
        } => AppConfig::default(),
        _ => load_config(cli.config.as_deref())?,
    };
    if let Some(path) = cli.database {
        config.database.path = Some(path);
    }

    match cli.command {
        Commands::Exporters => {
            cmd_exporters(&config)?;
        }
        Commands::Export {
            email,
            kind,
            page,
            output,
        } => {
            cmd_export(&config, &email, kind, page, output.as_deref(), format)?;
        }
        Commands::Erase { email, kind } => {
            cmd_erase(&config, &email, kind, format)?;
        }
        Commands::Import { file } => {
            cmd_import(&config, &file)?;
        }
        Commands::Config { action } => {
            cmd_config(&config, cli.config.as_deref(), &action)?;
        }
    }

    Ok(())
}

/// Opens the content database and wires the exporter over it.
fn build_exporter(config: &AppConfig) -> domain::Result<Rc<Exporter>> {
    let store = Rc::new(SqliteContentStore::open(&config.database_path())?);
    let exporter = Exporter::from_store(store)
        .with_organizer_compat(config.compat.organizer_uses_speaker_kind);
    Ok(Rc::new(exporter))
}

/// List registered exporters and erasers.
fn cmd_exporters(config: &AppConfig) -> domain::Result<()> {
    let exporter = build_exporter(config)?;
    let exporters = register_exporters(&exporter);
    let erasers = register_erasers();

    println!("{}", format_registry_table(&exporters, &erasers));
    Ok(())
}

/// Export personal data for an email address.
fn cmd_export(
    config: &AppConfig,
    email: &str,
    kind: Option<ContentKind>,
    page: Option<u32>,
    output_path: Option<&Path>,
    format: OutputFormat,
) -> domain::Result<()> {
    let exporter = build_exporter(config)?;
    let exporters = register_exporters(&exporter);

    let content = match (kind, page) {
        (Some(kind), Some(page)) => {
            let registered = exporters
                .get(kind.id())
                .ok_or_else(|| domain::AppError::InvalidData {
                    message: format!("No exporter registered for {kind}"),
                })?;
            let result = (registered.callback)(email, page)?;

            match format {
                OutputFormat::Markdown => format_page_markdown(&result),
                OutputFormat::Json => format_json(&result).map_err(domain::AppError::json_parse)?,
                OutputFormat::Table => format_items_table(&result.data),
            }
        }
        _ => {
            let report = run_export_request(&exporters, email, kind, config.request.max_pages)?;
            if output_path.is_some() {
                println!("{}", format_summary(&report));
            }

            match format {
                OutputFormat::Markdown => format_report_markdown(&report),
                OutputFormat::Json => format_json(&report).map_err(domain::AppError::json_parse)?,
                OutputFormat::Table => format_report_table(&report),
            }
        }
    };

    match output_path {
        Some(path) => {
            let mut file = std::fs::File::create(path).map_err(|e| {
                domain::AppError::io(format!("Failed to create {}", path.display()), e)
            })?;
            file.write_all(content.as_bytes())
                .map_err(|e| domain::AppError::io("Failed to write file", e))?;
            println!("{} Export written to {}", "✓".green().bold(), path.display());
        }
        None => {
            println!("{content}");
        }
    }

    Ok(())
}

/// Run the erasers for an email address.
fn cmd_erase(
    config: &AppConfig,
    email: &str,
    kind: Option<ContentKind>,
    format: OutputFormat,
) -> domain::Result<()> {
    let erasers = register_erasers();
    let results = run_erase_request(&erasers, email, kind, config.request.max_pages)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                format_json(&results).map_err(domain::AppError::json_parse)?
            );
        }
        OutputFormat::Markdown | OutputFormat::Table => {
            print!("{}", format_erase_results(&results));
        }
    }

    Ok(())
}

/// Create the content database and load a fixture into it.
fn cmd_import(config: &AppConfig, file: &Path) -> domain::Result<()> {
    let data = std::fs::read(file)
        .map_err(|e| domain::AppError::io(format!("Failed to read {}", file.display()), e))?;
    let fixture = parse_fixture(&data)?;

    let db_path = config.database_path();
    let store = SqliteContentStore::create(&db_path)?;
    let stats = import_fixture(&store, &fixture)?;

    println!(
        "{} Imported {} users, {} records ({} metadata entries) into {}",
        "✓".green().bold(),
        stats.users,
        stats.records,
        stats.meta,
        db_path.display()
    );

    Ok(())
}

/// Configuration file commands.
fn cmd_config(
    config: &AppConfig,
    explicit_path: Option<&Path>,
    action: &ConfigAction,
) -> domain::Result<()> {
    match action {
        ConfigAction::Init => {
            let path = explicit_path.map_or_else(|| config.config_file_path(), Path::to_path_buf);
            if ensure_config_exists(&path)? {
                println!("{} Created {}", "✓".green().bold(), path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
        ConfigAction::Show => {
            println!("{}", render_config(config)?);
            println!("# database: {}", config.database_path().display());
        }
    }

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
