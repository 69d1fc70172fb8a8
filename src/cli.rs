//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::adapters::clock_id_adapter::ClockIdAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_file_adapter::JsonFileAdapter;
use crate::adapters::points_csv::PointsCsvAdapter;
use crate::adapters::table_text::{render_matrix, TextStyle};
use crate::domain::dataset::{Dataset, PeriodId, ProductId};
use crate::domain::derivation::derive_metrics;
use crate::domain::error::BcgError;
use crate::domain::gate::{gate, Publication};
use crate::domain::payload::{parse_payload, repair};
use crate::domain::session::MatrixSession;
use crate::domain::settings::MatrixSettings;
use crate::ports::dataset_port::DatasetPort;
use crate::ports::id_port::IdPort;
use crate::ports::listener_port::MetricsListener;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "bcgmatrix", about = "BCG growth-share portfolio matrix builder")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Matrix JSON file (overrides [storage] dataset_path)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty matrix file
    Init {
        #[arg(long)]
        force: bool,
    },
    #[command(flatten)]
    Edit(Mutation),
    /// Print all tables with the quadrant of each product
    Show,
    /// Export bubble chart points as CSV
    ExportPoints {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Verify the stored matrix without modifying it
    Check,
}

/// Subcommands that load the matrix, change it, and save it back.
#[derive(Subcommand, Debug)]
pub enum Mutation {
    /// Add a product to every table
    AddProduct {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        sales: Option<String>,
    },
    /// Remove a product from every table
    RemoveProduct {
        #[arg(long)]
        product: u64,
    },
    /// Add a market growth period
    AddPeriod,
    /// Remove a market growth period
    RemovePeriod {
        #[arg(long)]
        period: u64,
    },
    /// Rename a product
    RenameProduct {
        #[arg(long)]
        product: u64,
        #[arg(long)]
        name: String,
    },
    /// Set a product's forecast sales
    SetSales {
        #[arg(long)]
        product: u64,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
    /// Set a product's market growth rate (%) for one period
    SetGrowth {
        #[arg(long)]
        period: u64,
        #[arg(long)]
        product: u64,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
    /// Set one competitor's sales for a product
    SetCompetitor {
        #[arg(long)]
        product: u64,
        #[arg(long)]
        competitor: String,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
}

/// Reports published metric tables on stderr.
struct StderrListener;

impl MetricsListener for StderrListener {
    fn metrics_published(&self, dataset: &Dataset) {
        eprintln!(
            "Derived metrics updated for {} products",
            dataset.bcg_table.products.len()
        );
    }
}

/// Install the stderr log subscriber, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

pub fn run(cli: Cli) -> ExitCode {
    let settings = match load_settings(cli.config.as_ref()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let data_path = cli
        .data
        .clone()
        .unwrap_or_else(|| settings.dataset_path.clone());
    let store = JsonFileAdapter::new(data_path);

    let result = match cli.command {
        Command::Init { force } => run_init(&store, force),
        Command::Show => run_show(&store, &settings),
        Command::ExportPoints { output } => run_export(&store, &settings, output.as_ref()),
        Command::Check => run_check(&store),
        Command::Edit(mutation) => run_mutation(&store, &settings, &mutation),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_settings(path: Option<&PathBuf>) -> Result<MatrixSettings, ExitCode> {
    let Some(path) = path else {
        return Ok(MatrixSettings::default());
    };
    eprintln!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BcgError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })?;
    MatrixSettings::from_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Build a session from settings and load whatever the store holds.
pub fn open_session(
    store: &dyn DatasetPort,
    settings: &MatrixSettings,
    ids: Box<dyn IdPort>,
) -> Result<MatrixSession, BcgError> {
    let mut session = MatrixSession::new(ids)
        .with_labels(settings.labels.clone())
        .with_listener(Box::new(StderrListener));
    session.load_from(store)?;
    Ok(session)
}

fn run_init(store: &JsonFileAdapter, force: bool) -> Result<(), BcgError> {
    if !force && store.fetch()?.is_some() {
        return Err(BcgError::Storage {
            reason: format!(
                "{} already exists (use --force to overwrite)",
                store.path().display()
            ),
        });
    }
    let session = MatrixSession::new(Box::new(ClockIdAdapter::new()));
    session.save_to(store)?;
    eprintln!("Created empty matrix at {}", store.path().display());
    Ok(())
}

fn run_mutation(
    store: &JsonFileAdapter,
    settings: &MatrixSettings,
    mutation: &Mutation,
) -> Result<(), BcgError> {
    let mut session = open_session(store, settings, Box::new(ClockIdAdapter::new()))?;
    if !session.has_loaded() {
        eprintln!("Starting new matrix at {}", store.path().display());
    }
    let message = apply_command(&mut session, mutation)?;
    session.save_to(store)?;
    eprintln!("{message}");
    Ok(())
}

/// Apply one mutation to the session and describe the outcome.
pub fn apply_command(session: &mut MatrixSession, mutation: &Mutation) -> Result<String, BcgError> {
    let publication = match mutation {
        Mutation::AddProduct { name, sales } => {
            let id = session.add_product();
            if let Some(name) = name {
                session.rename_product(id, name)?;
            }
            if let Some(sales) = sales {
                session.set_product_sales(id, sales.as_str())?;
            }
            println!("{id}");
            return Ok(format!("Added product {id}"));
        }
        Mutation::AddPeriod => {
            let id = session.add_period();
            println!("{id}");
            return Ok(format!("Added period {id}"));
        }
        Mutation::RemoveProduct { product } => session.remove_product(ProductId(*product))?,
        Mutation::RemovePeriod { period } => session.remove_period(PeriodId(*period))?,
        Mutation::RenameProduct { product, name } => {
            session.rename_product(ProductId(*product), name)?
        }
        Mutation::SetSales { product, value } => {
            session.set_product_sales(ProductId(*product), value.as_str())?
        }
        Mutation::SetGrowth {
            period,
            product,
            value,
        } => session.set_period_value(PeriodId(*period), ProductId(*product), value.as_str())?,
        Mutation::SetCompetitor {
            product,
            competitor,
            value,
        } => session.set_competitor_sales(ProductId(*product), competitor, value.as_str())?,
    };

    Ok(match publication {
        Publication::Publish => "Updated matrix".to_string(),
        Publication::NoOp => "Updated matrix (derived metrics unchanged)".to_string(),
    })
}

fn text_style(settings: &MatrixSettings) -> TextStyle {
    TextStyle {
        decimals: settings.decimals,
        show_icons: settings.show_icons,
    }
}

fn run_show(store: &JsonFileAdapter, settings: &MatrixSettings) -> Result<(), BcgError> {
    let session = open_session(store, settings, Box::new(ClockIdAdapter::new()))?;
    print!("{}", render_matrix(session.dataset(), &text_style(settings)));
    Ok(())
}

fn run_export(
    store: &JsonFileAdapter,
    settings: &MatrixSettings,
    output: Option<&PathBuf>,
) -> Result<(), BcgError> {
    let session = open_session(store, settings, Box::new(ClockIdAdapter::new()))?;
    match output {
        Some(path) => {
            PointsCsvAdapter.write(session.dataset(), &path.display().to_string())?;
            eprintln!("Points written to: {}", path.display());
        }
        None => PointsCsvAdapter.write_to(session.dataset(), io::stdout().lock())?,
    }
    Ok(())
}

/// Validate the stored payload without a session. `Publish` means a load
/// would change it: derivable rows are missing or the stored derived
/// metrics are stale.
pub fn check_store(store: &dyn DatasetPort) -> Result<Publication, BcgError> {
    let raw = store.fetch()?.ok_or_else(|| BcgError::Storage {
        reason: "no matrix saved yet".into(),
    })?;
    let stored = parse_payload(&raw)?;
    let dataset = repair(stored.clone());
    dataset.check_integrity()?;
    if dataset != stored {
        return Ok(Publication::Publish);
    }
    Ok(gate(&dataset.bcg_table.products, &derive_metrics(&dataset)))
}

fn run_check(store: &JsonFileAdapter) -> Result<(), BcgError> {
    match check_store(store)? {
        Publication::NoOp => eprintln!("Matrix is consistent"),
        Publication::Publish => {
            eprintln!("Matrix is consistent; stored tables are out of date and will refresh on next edit")
        }
    }
    Ok(())
}
