//! Dashtable CLI
//!
//! Interactive terminal table plus one-shot listing commands over the
//! bundled EV-charging datasets.

use clap::{Parser, Subcommand, ValueEnum};
use console::{measure_text_width, pad_str, style, Alignment};
use dashtable::dataset::{self, DatasetKind, StoreRecord};
use dashtable::{AppConfig, ColumnDef, DashtableError, SortKey, TableView};
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Dashtable - searchable, sortable, paginated data tables
#[derive(Parser)]
#[command(name = "dashtable")]
#[command(version)]
#[command(about = "Searchable, sortable, paginated data tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a dataset in the terminal
    Tui {
        /// Dataset to show
        #[arg(short, long, value_enum, default_value_t = DatasetKind::Stations)]
        kind: DatasetKind,

        /// JSON file with records (default: built-in sample)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log file (default: dashtable.log next to the executable)
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Print one page of a dataset
    List {
        /// Dataset to list
        #[arg(short, long, value_enum, default_value_t = DatasetKind::Stations)]
        kind: DatasetKind,

        /// JSON file with records (default: built-in sample)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Search text for the configured search column
        #[arg(short, long, allow_hyphen_values = true)]
        search: Option<String>,

        /// Sort key as COLUMN or COLUMN:desc; repeat for secondary keys
        #[arg(long)]
        sort: Vec<String>,

        /// Page to print, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page (default: from config)
        #[arg(long)]
        page_size: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the columns of a dataset
    Columns {
        /// Dataset to describe
        #[arg(short, long, value_enum, default_value_t = DatasetKind::Stations)]
        kind: DatasetKind,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// `list` arguments shared by both datasets
struct ListArgs {
    search: Option<String>,
    sort: Vec<String>,
    page: usize,
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tui {
            kind,
            data,
            config,
            log,
        } => cmd_tui(kind, data.as_deref(), config.as_deref(), log.as_deref()),

        Commands::List {
            kind,
            data,
            config,
            search,
            sort,
            page,
            page_size,
            format,
        } => {
            let args = ListArgs {
                search,
                sort,
                page,
                format,
            };
            cmd_list(kind, data.as_deref(), config.as_deref(), page_size, args)
        }

        Commands::Columns { kind } => cmd_columns(kind),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> dashtable::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    }
}

/// Interactive terminal table
fn cmd_tui(
    kind: DatasetKind,
    data: Option<&Path>,
    config: Option<&Path>,
    log: Option<&Path>,
) -> dashtable::Result<()> {
    let config = load_config(config)?;
    let log_path = log.or(config.log_file.as_deref());
    dashtable::logging::init_file(log_path, LevelFilter::Debug)?;

    match kind {
        DatasetKind::Stations => {
            let records = match data {
                Some(path) => dataset::load_stations(path)?,
                None => dataset::sample_stations(),
            };
            dashtable::tui::launch("Charging Stations", dataset::station_columns(), records, &config)
        }
        DatasetKind::Connectors => {
            let records = match data {
                Some(path) => dataset::load_connectors(path)?,
                None => dataset::sample_connectors(),
            };
            dashtable::tui::launch("Connector Types", dataset::connector_columns(), records, &config)
        }
    }
}

/// Print one page as text or JSON
fn cmd_list(
    kind: DatasetKind,
    data: Option<&Path>,
    config: Option<&Path>,
    page_size: Option<usize>,
    args: ListArgs,
) -> dashtable::Result<()> {
    dashtable::logging::init_stderr(LevelFilter::Warn)?;

    let mut config = load_config(config)?;
    if let Some(size) = page_size {
        if size == 0 {
            return Err(DashtableError::InvalidArgument("page size must be at least 1".into()));
        }
        config.table.page_size = size;
    }

    match kind {
        DatasetKind::Stations => {
            let records = match data {
                Some(path) => dataset::load_stations(path)?,
                None => dataset::sample_stations(),
            };
            print_page(dataset::station_columns(), records, &config, &args)
        }
        DatasetKind::Connectors => {
            let records = match data {
                Some(path) => dataset::load_connectors(path)?,
                None => dataset::sample_connectors(),
            };
            print_page(dataset::connector_columns(), records, &config, &args)
        }
    }
}

fn print_page<R: StoreRecord>(
    columns: Vec<ColumnDef<R>>,
    records: Vec<R>,
    config: &AppConfig,
    args: &ListArgs,
) -> dashtable::Result<()> {
    let mut view = TableView::new(columns, records, config.table.clone().into_options())?;

    let keys = parse_sort_keys(view.columns(), &args.sort)?;
    view.set_sort(keys);

    if let Some(search) = &args.search {
        if !view.search_enabled() {
            log::warn!("search ignored: no searchable column");
        }
        view.set_search(search);
    }

    if args.page == 0 || args.page > view.page_count() {
        return Err(DashtableError::InvalidArgument(format!(
            "page {} out of range 1..={}",
            args.page,
            view.page_count()
        )));
    }
    view.set_page(args.page - 1);

    let frame = view.frame();
    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&frame)?);
        }
        OutputFormat::Text => {
            let widths: Vec<usize> = frame
                .header
                .iter()
                .map(|h| {
                    let title = measure_text_width(&h.title());
                    h.width.map_or(title, |w| usize::from(w).max(title))
                })
                .collect();

            let header: Vec<String> = frame
                .header
                .iter()
                .zip(&widths)
                .map(|(h, &w)| pad_str(&h.title(), w, Alignment::Left, Some("…")).into_owned())
                .collect();
            println!("{}", style(header.join("  ").trim_end()).bold());

            if frame.body.rows().is_empty() {
                if let dashtable::Body::Empty { title, message } = &frame.body {
                    println!();
                    println!("  {}", style(title).yellow());
                    println!("  {}", style(message).dim());
                }
            }
            for row in frame.body.rows() {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .zip(&widths)
                    .map(|(text, &w)| pad_str(text, w, Alignment::Left, Some("…")).into_owned())
                    .collect();
                println!("{}", cells.join("  ").trim_end());
            }

            println!();
            println!(
                "{} {}",
                style(frame.footer.summary()).dim(),
                style(frame.footer.page_label()).dim()
            );
        }
    }

    Ok(())
}

/// `--sort` values as sort keys; each must name a sortable column
fn parse_sort_keys<R>(columns: &[ColumnDef<R>], specs: &[String]) -> dashtable::Result<Vec<SortKey>> {
    let mut keys = Vec::with_capacity(specs.len());
    for spec in specs {
        let key = SortKey::parse(spec)
            .ok_or_else(|| DashtableError::InvalidArgument(format!("bad sort key '{}'", spec)))?;
        let column = columns
            .iter()
            .find(|c| c.id() == key.column)
            .ok_or_else(|| DashtableError::UnknownColumn(key.column.clone()))?;
        if !column.is_sortable() {
            return Err(DashtableError::InvalidArgument(format!(
                "column '{}' is not sortable",
                key.column
            )));
        }
        keys.push(key);
    }
    Ok(keys)
}

/// Column ids, headers and flags
fn cmd_columns(kind: DatasetKind) -> dashtable::Result<()> {
    match kind {
        DatasetKind::Stations => print_columns(&dataset::station_columns()),
        DatasetKind::Connectors => print_columns(&dataset::connector_columns()),
    }
    Ok(())
}

fn print_columns<R>(columns: &[ColumnDef<R>]) {
    for column in columns {
        let mut flags = Vec::new();
        if column.is_sortable() {
            flags.push("sortable");
        }
        if column.is_hideable() {
            flags.push("hideable");
        }
        if !column.initially_visible() {
            flags.push("hidden");
        }
        if !column.is_data_bound() {
            flags.push("display");
        }
        println!(
            "  {} {:<12} {}",
            style(format!("{:<10}", column.id())).cyan(),
            column.header(),
            style(flags.join(", ")).dim()
        );
    }
}
