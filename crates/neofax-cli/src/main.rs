//! Neofax dosing calculator command line.

mod settings;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use neofax_core::catalog::DEFAULT_REFERENCE_PAGE;
use neofax_core::{
    parse_instant, Antibiotic, Calculator, Catalog, Category, PatientInput, PatientMetrics,
};
use settings::{OutputFormat, Settings, DEFAULT_CONFIG_PATH};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "neofax")]
#[command(about = "Calculadora de doses de antibióticos neonatais (Neofax)")]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level (overrides the configuration)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate dosing for every antibiotic in a category
    Calculate {
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: String,
        /// Completed gestational weeks at birth
        #[arg(long)]
        weeks: String,
        /// Extra gestational days at birth (0-6)
        #[arg(long, default_value = "0")]
        days: String,
        /// Current weight in kg
        #[arg(long)]
        weight: String,
        /// Calculation date or instant (defaults to now)
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// List antibiotics in a category
    List {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Reference document page for an antibiotic
    Reference { name: String },
    /// Print an antibiotic's dosage table
    Rules { name: String },
    /// Run the catalog self-check
    Check,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args.config)?;

    let log_level = args.log_level.as_deref().unwrap_or(&settings.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    debug!(?settings, "configuration loaded");

    let catalog = Catalog::standard().context("Catalog self-check failed")?;

    match args.command {
        Command::Calculate {
            birth_date,
            weeks,
            days,
            weight,
            today,
            category,
            format,
        } => {
            let input = PatientInput::new(birth_date, weeks, days, weight);
            let now = match today {
                Some(value) => parse_instant(&value)?,
                None => chrono::Local::now().naive_local(),
            };
            let category = category.unwrap_or(settings.default_category);
            let format = format.unwrap_or(settings.output_format);
            calculate(&catalog, &settings, &input, now, category, format)?;
        }
        Command::List { category } => {
            let category = category.unwrap_or(settings.default_category);
            println!("{}", category.label());
            for antibiotic in catalog.filter(category) {
                println!(
                    "  {:<26} {:<24} p. {}",
                    antibiotic.id, antibiotic.name, antibiotic.reference_page
                );
            }
        }
        Command::Reference { name } => {
            let indexed_name = match lookup(&catalog, &name) {
                Ok(antibiotic) => antibiotic.name.clone(),
                Err(_) => catalog
                    .references()
                    .by_id(&name)
                    .map_or_else(|| name.clone(), |entry| entry.name.clone()),
            };
            let doc = catalog.document_ref(&indexed_name, &settings.reference_document);
            if catalog.references().by_name(&indexed_name).is_none() {
                warn!(
                    %name,
                    page = DEFAULT_REFERENCE_PAGE,
                    "no reference entry, showing first page"
                );
            }
            println!("{} página {}", doc.path, doc.page);
        }
        Command::Rules { name } => {
            let antibiotic = lookup(&catalog, &name)?;
            println!("{} (Neofax p. {})", antibiotic.name, antibiotic.reference_page);
            println!("{}", antibiotic.rules);
        }
        Command::Check => {
            catalog.validate()?;
            info!("catalog self-check passed");
            println!(
                "ok: {} antibióticos, {} páginas de referência",
                catalog.len(),
                catalog.references().entries().len()
            );
        }
    }

    Ok(())
}

fn calculate(
    catalog: &Catalog,
    settings: &Settings,
    input: &PatientInput,
    now: chrono::NaiveDateTime,
    category: Category,
    format: OutputFormat,
) -> Result<()> {
    let metrics = PatientMetrics::derive(input, now).context("Invalid patient data")?;

    for violation in metrics.domain_violations() {
        if settings.strict_domain {
            bail!(violation);
        }
        warn!(%violation, "patient data outside reference range");
    }

    let report = Calculator::new(catalog).report(
        &metrics,
        category,
        Some(settings.reference_document.clone()),
    );
    info!(
        category = %category,
        antibiotics = report.antibiotics.len(),
        "dosing calculated"
    );

    match format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Csv => print!("{}", report.to_csv()),
    }
    Ok(())
}

/// Find an antibiotic by id or name, suggesting the closest name on a miss.
fn lookup<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a Antibiotic> {
    if let Some(found) = catalog.get(name).or_else(|| catalog.find_by_name(name)) {
        return Ok(found);
    }
    Err(match catalog.suggest(name) {
        Some(closest) => anyhow!("Unknown antibiotic {:?}; did you mean {}?", name, closest.name),
        None => anyhow!("Unknown antibiotic {:?}", name),
    })
}
