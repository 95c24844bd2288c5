use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medledger_core::lookup::Lookup;
use medledger_core::{LedgerConfig, MedicineForm, SearchOutcome, Store, ADD_FORM_DELAY};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod interactive;
mod render;

use interactive::FormSession;

#[derive(Parser)]
#[command(name = "medledger")]
#[command(about = "Record medicines and their generic alternatives")]
struct Cli {
    /// Data file (defaults to $MEDLEDGER_FILE, then medicines.csv)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data file with its header row if missing
    Init,
    /// Look up a medicine by exact name (case-insensitive)
    Search {
        /// Medicine name
        name: String,
        /// Do not open the add form when nothing matches
        #[arg(long)]
        no_add: bool,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new medicine
    Add {
        /// Medicine name (omit to fill the form interactively)
        #[arg(long)]
        name: Option<String>,
        /// Composition
        #[arg(long)]
        composition: Option<String>,
        /// Generic alternative as NAME|COMPOSITION|PRICE|SIDE_EFFECTS (repeatable, max 5)
        #[arg(long = "generic", value_name = "SPEC")]
        generics: Vec<String>,
    },
    /// Show database statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the most recently added medicines
    Recent,
    /// Open the data file in the default application
    View,
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medledger_core=info".parse()?)
                .add_directive("medledger_cli=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = LedgerConfig::resolve(cli.file);
    tracing::debug!(file = %config.data_file().display(), "resolved data file");
    let store = Store::new(&config);
    store
        .initialize()
        .with_context(|| format!("initialising {}", config.data_file().display()))?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Data file ready: {}", config.data_file().display());
        }
        Some(Commands::Search { name, no_add, json }) => {
            return search(&store, &name, no_add, json);
        }
        Some(Commands::Add {
            name,
            composition,
            generics,
        }) => {
            return add(&store, name, composition, &generics);
        }
        Some(Commands::Stats { json }) => {
            let stats = Lookup::new(&store)
                .statistics()
                .context("Error loading statistics")?;
            if json {
                println!("{}", stats.to_json()?);
            } else {
                render::print_statistics(&stats);
            }
        }
        Some(Commands::Recent) => {
            let recent = Lookup::new(&store)
                .recent()
                .context("Error loading recent medicines")?;
            render::print_recent(&recent);
        }
        Some(Commands::View) => {
            store.open_externally()?;
        }
        None => {
            println!("Use 'medledger --help' for commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn search(store: &Store, name: &str, no_add: bool, json: bool) -> Result<ExitCode> {
    let outcome = Lookup::new(store).search(name)?;
    match outcome {
        SearchOutcome::Found(record) => {
            if json {
                println!("{}", record.to_json()?);
            } else {
                println!("Medicine found!");
                render::print_medicine(&record);
            }
            Ok(ExitCode::SUCCESS)
        }
        SearchOutcome::BlankQuery => {
            eprintln!("Please enter a medicine name!");
            Ok(ExitCode::from(2))
        }
        SearchOutcome::NotFound { suggestions, .. } => {
            if !suggestions.is_empty() {
                eprintln!("Did you mean: {}?", suggestions.join(", "));
            }
            if no_add || !io::stdin().is_terminal() {
                eprintln!("Medicine not found.");
                return Ok(ExitCode::from(1));
            }
            eprintln!("Medicine not found. Opening add form...");
            std::thread::sleep(ADD_FORM_DELAY);
            run_interactive(store, MedicineForm::new())
        }
    }
}

fn add(
    store: &Store,
    name: Option<String>,
    composition: Option<String>,
    specs: &[String],
) -> Result<ExitCode> {
    let mut form = MedicineForm::new();
    form.composition = composition.unwrap_or_default();
    for spec in specs {
        interactive::push_generic_spec(&mut form, spec)?;
    }

    let Some(name) = name else {
        return run_interactive(store, form);
    };
    form.name = name;

    match form.save(store) {
        Ok(record) => {
            println!("Medicine saved successfully!");
            render::print_medicine(&record);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_validation() => {
            eprintln!("{}", e);
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e.into()),
    }
}

fn run_interactive(store: &Store, form: MedicineForm) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut session = FormSession::new(form, stdin.lock(), io::stdout());
    match session.run(store)? {
        Some(record) => {
            render::print_medicine(&record);
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::from(1)),
    }
}
