use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use registrar_cli::render;
use registrar_cli::resolve::{Listing, resolve, selection_update};
use registrar_config::{CatalogConfig, OptionSourceKind};
use registrar_filters::{
    FetchPolicy, OptionKind, OptionProvider, OptionSource, StoreConfig, fallback,
};
use registrar_models::{DepartmentId, LoadMode, SchoolId};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "registrar-cli")]
#[command(about = "Registrar CLI - Inspect the academic catalogue and resolve filters", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Option source: http or static (defaults to REGISTRAR_OPTION_SOURCE)
    #[arg(long, global = true)]
    source: Option<OptionSourceKind>,

    /// Backend base URL (defaults to REGISTRAR_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Serve the built-in catalogue when a fetch fails
    #[arg(long, global = true)]
    fallback: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List schools
    Schools,
    /// List departments, optionally within one school
    Departments {
        #[arg(short = 's', long)]
        school: Option<String>,
    },
    /// List programs, optionally within one department
    Programs {
        #[arg(short = 'd', long)]
        department: Option<String>,
    },
    /// Load the catalogue, apply a selection and print the derived view
    Resolve {
        #[arg(short = 's', long)]
        school: Option<String>,

        #[arg(short = 'd', long)]
        department: Option<String>,

        #[arg(short = 'p', long)]
        program: Option<String>,

        /// Free-text search term
        #[arg(long)]
        search: Option<String>,

        /// Load departments and programs only for the selected parents
        #[arg(long)]
        lazy: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    registrar_observability::init_basic_console_logging();

    let cli = Cli::parse();
    let config = catalog_config(&cli.source);

    let result = match OptionSource::from_config(&config) {
        Ok(provider) => run(cli.command, cli.json, provider, &config).await,
        Err(e) => Err(e).context("Failed to build option source"),
    };

    if let Err(e) = result {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

fn catalog_config(args: &SourceArgs) -> CatalogConfig {
    let mut config = CatalogConfig::from_env();
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if args.fallback {
        config.allow_mock_fallback = true;
    }
    config
}

async fn run(
    command: Commands,
    json: bool,
    provider: OptionSource,
    config: &CatalogConfig,
) -> anyhow::Result<()> {
    tracing::debug!(source = %provider.describe(), "Using option source");
    let policy = StoreConfig::from(config).policy;

    match command {
        Commands::Schools => {
            let listing = list(policy, OptionKind::Schools, provider.schools(), fallback::schools).await?;
            print_listing(&listing, json, render::schools_table)
        }
        Commands::Departments { school } => {
            let school = school.map(SchoolId::from);
            let listing = list(
                policy,
                OptionKind::Departments,
                provider.departments(school.as_ref()),
                || fallback::departments_of(school.as_ref()),
            )
            .await?;
            print_listing(&listing, json, render::departments_table)
        }
        Commands::Programs { department } => {
            let department = department.map(DepartmentId::from);
            let listing = list(
                policy,
                OptionKind::Programs,
                provider.programs(department.as_ref()),
                || fallback::programs_of(department.as_ref()),
            )
            .await?;
            print_listing(&listing, json, render::programs_table)
        }
        Commands::Resolve {
            school,
            department,
            program,
            search,
            lazy,
        } => {
            let update = selection_update(
                school.as_deref(),
                department.as_deref(),
                program.as_deref(),
                search.as_deref(),
            )?;
            let mut store_config = StoreConfig::from(config);
            if lazy {
                store_config.load_mode = LoadMode::Lazy;
            }

            let view = resolve(Arc::new(provider), store_config, update).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::view_summary(&view));
            }
            Ok(())
        }
    }
}

async fn list<T, F, B>(
    policy: FetchPolicy,
    kind: OptionKind,
    fetch: F,
    fallback: B,
) -> anyhow::Result<Listing<T>>
where
    F: Future<Output = Result<Vec<T>, registrar_filters::ProviderError>>,
    B: FnOnce() -> Vec<T>,
{
    let outcome = policy
        .run(kind, fetch, fallback)
        .await
        .with_context(|| format!("Failed to load {kind}"))?;
    Ok(Listing::from(outcome))
}

fn print_listing<T: Serialize>(
    listing: &Listing<T>,
    json: bool,
    table: fn(&[T]) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }
    if let Some(note) = render::source_note(listing) {
        eprintln!("{note}");
    }
    print!("{}", table(&listing.items));
    Ok(())
}
