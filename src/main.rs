use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use invoice_details::api::{
    fetch_with_retry, load_invoice, FileProvider, HttpProvider, InvoiceProvider, InvoiceQuery,
};
use invoice_details::config::{
    config_dir, load_companies, load_config, resolve_company_name, resolve_output_dir,
    CompanyDirectory, Config, COMPANIES_TEMPLATE, CONFIG_TEMPLATE,
};
use invoice_details::error::{InvoiceError, Result};
use invoice_details::export::{self, ExportFormat};
use invoice_details::invoice::Category;
use invoice_details::logging;
use invoice_details::notify::ConsoleNotifier;
use invoice_details::view::{FetchState, InvoiceView};

#[derive(Parser)]
#[command(name = "invoice-details")]
#[command(version, about = "Inspect and export invoice details", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.invoice-details or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// List known companies
    Companies,

    /// Show an invoice with per-category subtotals
    Show {
        #[command(flatten)]
        source: SourceArgs,

        /// Expand a category to list its items (can be repeated)
        #[arg(short, long, value_enum)]
        expand: Vec<Section>,

        /// Expand every category
        #[arg(long)]
        all: bool,
    },

    /// Export an invoice as a spreadsheet or PDF
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output directory (default: [export] output_dir from config.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Where the invoice comes from
#[derive(Args)]
struct SourceArgs {
    /// Invoice id to fetch from the API
    #[arg(long, conflicts_with = "company")]
    invoice_id: Option<String>,

    /// Company id; loads that company's invoice for --date
    #[arg(long)]
    company: Option<String>,

    /// Invoice date for --company (YYYY-MM-DD, default: today)
    #[arg(long, requires = "company")]
    date: Option<String>,

    /// Read the invoice from a saved JSON response instead of the API
    #[arg(long)]
    file: Option<PathBuf>,

    /// Company name to show when the company is not in the directory
    #[arg(long)]
    company_name: Option<String>,
}

impl SourceArgs {
    fn query(&self, today: NaiveDate) -> Result<InvoiceQuery> {
        if let Some(id) = &self.invoice_id {
            return Ok(InvoiceQuery::ById(id.clone()));
        }
        if let Some(company_id) = &self.company {
            let date = match &self.date {
                Some(raw) => parse_date_arg(raw)?,
                None => today,
            };
            return Ok(InvoiceQuery::ByCompany {
                company_id: company_id.clone(),
                date,
            });
        }
        match &self.file {
            Some(path) => Ok(InvoiceQuery::ById(path.display().to_string())),
            None => Err(InvoiceError::NoSource),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Section {
    Tolls,
    Violations,
    Fees,
}

impl From<Section> for Category {
    fn from(section: Section) -> Self {
        match section {
            Section::Tolls => Category::Tolls,
            Section::Violations => Category::Violations,
            Section::Fees => Category::Fees,
        }
    }
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(InvoiceError::Reported(_)) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Companies => cmd_companies(&cfg_dir),
        Commands::Show {
            source,
            expand,
            all,
        } => cmd_show(&cfg_dir, &source, &expand, all),
        Commands::Export {
            source,
            format,
            output,
        } => cmd_export(&cfg_dir, &source, format, output),
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| InvoiceError::InvalidDate(raw.to_string()))
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    if cfg_dir.exists() {
        return Err(InvoiceError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("companies.toml"), COMPANIES_TEMPLATE)?;

    println!("Initialized invoice-details config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point at your billing API:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Add known companies:        $EDITOR {}/companies.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then look at an invoice:");
    println!("  invoice-details show --invoice-id <id>");

    Ok(())
}

#[derive(Tabled)]
struct CompanyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
}

/// Companies from the API when configured, otherwise from companies.toml
fn company_directory(cfg_dir: &Path, config: &Config) -> Result<CompanyDirectory> {
    if config.api.base_url.is_none() {
        return load_companies(cfg_dir);
    }
    let provider = HttpProvider::new(&config.api)?;
    match fetch_with_retry(config.api.retries, || provider.active_companies()) {
        Ok(directory) => Ok(directory),
        Err(e) => {
            tracing::warn!(error = %e, "could not fetch companies, using companies.toml");
            load_companies(cfg_dir)
        }
    }
}

/// List known companies
fn cmd_companies(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let directory = company_directory(cfg_dir, &config)?;

    if directory.is_empty() {
        println!("No companies configured.");
        println!("Add companies to: {}/companies.toml", cfg_dir.display());
        return Ok(());
    }

    let rows: Vec<CompanyRow> = directory
        .companies()
        .iter()
        .filter(|c| c.is_active)
        .map(|c| CompanyRow {
            id: c.id.clone(),
            name: c.name.clone(),
            state: c.state_id.clone().unwrap_or_default(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Fetch the invoice and the company directory, and resolve the company name.
/// A failed fetch is kept in the view rather than returned.
fn load_view(cfg_dir: &Path, source: &SourceArgs, today: NaiveDate) -> Result<InvoiceView> {
    let config = load_config(cfg_dir)?;
    let query = source.query(today)?;

    let provider: Box<dyn InvoiceProvider> = match &source.file {
        Some(path) => Box::new(FileProvider::new(path, load_companies(cfg_dir)?)),
        None => Box::new(HttpProvider::new(&config.api)?),
    };

    let mut view = InvoiceView::new();
    let selected_date = match &query {
        InvoiceQuery::ByCompany { date, .. } => Some(*date),
        InvoiceQuery::ById(_) => None,
    };
    view.select(query.selected_company().map(str::to_string), selected_date);

    let invoice = match load_invoice(provider.as_ref(), &query, config.api.retries) {
        Ok(invoice) => invoice,
        Err(e) => {
            view.finish_loading(Err(e));
            return Ok(view);
        }
    };

    // A missing directory only costs us the company name
    let directory = match provider.active_companies() {
        Ok(directory) => directory,
        Err(e) => {
            tracing::warn!(error = %e, "could not load companies");
            CompanyDirectory::default()
        }
    };
    view.set_company_name(resolve_company_name(
        Some(&directory),
        &invoice.company_id,
        query.selected_company(),
        source.company_name.as_deref(),
    ));
    view.finish_loading(Ok(invoice));

    Ok(view)
}

/// Show an invoice
fn cmd_show(cfg_dir: &Path, source: &SourceArgs, expand: &[Section], all: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let mut view = load_view(cfg_dir, source, today)?;
    if let FetchState::Failed(message) = view.state() {
        eprintln!("{}", view.render());
        return Err(InvoiceError::Reported(message.clone()));
    }

    for category in Category::DOCUMENT_ORDER {
        let wanted = all || expand.iter().any(|s| Category::from(*s) == category);
        if wanted && !view.expanded().is_expanded(category) {
            view.toggle(category);
        }
    }

    println!("{}", view.render());
    println!();
    println!("Back to list: {}", view.back_link());
    if view.export_actions_visible() {
        println!("Export with: invoice-details export ... --format csv|json|pdf");
    }

    Ok(())
}

/// Export an invoice to the output directory
fn cmd_export(
    cfg_dir: &Path,
    source: &SourceArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let config = load_config(cfg_dir)?;
    let output_dir = match output {
        Some(dir) => dir,
        None => resolve_output_dir(&config.export.output_dir, cfg_dir),
    };

    let view = load_view(cfg_dir, source, today)?;
    if matches!(view.state(), FetchState::Failed(_)) {
        eprintln!("{}", view.render());
    }

    // The notifier has already told the user about any failure
    let path = export::run(
        view.invoice(),
        view.company_name(),
        format,
        &output_dir,
        today,
        &ConsoleNotifier,
    )
    .map_err(|e| InvoiceError::Reported(e.to_string()))?;

    println!("Saved to: {}", path.display());
    Ok(())
}
