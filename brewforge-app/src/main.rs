use anyhow::Result;
use brewforge_core::SpargeMethod;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use workflow::{Library, MashRequest};

mod config;
mod workflow;

#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// Configuration file.
    #[clap(short, long, default_value = "brewforge.yaml")]
    config: String,

    /// Overrides the store path from the configuration.
    #[clap(long)]
    store: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Sparge {
    None,
    Batch,
    Fly,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a BeerXML file against the grammar.
    Validate { file: String },
    /// Import recipes or ingredient libraries from a BeerXML file.
    Import {
        file: String,
        /// Import even if validation finds fatal problems.
        #[clap(long)]
        force: bool,
    },
    /// Write stored records as BeerXML.
    Export {
        #[clap(value_enum)]
        library: Library,
        /// Only this recipe.
        #[clap(long)]
        name: Option<String>,
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Compute infusion volumes and temperatures for a recipe's mash.
    Mash {
        recipe: String,
        #[clap(long, value_enum)]
        sparge: Option<Sparge>,
        #[clap(long, default_value_t = 1)]
        batches: u32,
        /// Water to grain ratio of the first infusion, L/kg.
        #[clap(long)]
        thickness: Option<f64>,
        /// Also write the schedule to this CSV file.
        #[clap(long)]
        schedule: Option<String>,
    },
    List {
        #[clap(value_enum)]
        library: Library,
    },
}

fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::AppConfig::load(&cli.config)?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    init_tracing(&config.log_filter);
    tracing::debug!("Using store '{}'", config.store_path);

    match cli.command {
        Command::Validate { file } => {
            if !workflow::validate_file(&file)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Import { file, force } => workflow::import_file(&config, &file, force),
        Command::Export {
            library,
            name,
            output,
        } => workflow::export(&config, library, name.as_deref(), output.as_deref()),
        Command::Mash {
            recipe,
            sparge,
            batches,
            thickness,
            schedule,
        } => {
            let sparge = sparge.map(|s| match s {
                Sparge::None => SpargeMethod::None,
                Sparge::Batch => SpargeMethod::Batch { batches },
                Sparge::Fly => SpargeMethod::Fly,
            });
            workflow::run_mash(
                &config,
                &MashRequest {
                    recipe,
                    sparge,
                    thickness_l_kg: thickness,
                    schedule_path: schedule,
                },
            )
        }
        Command::List { library } => workflow::list(&config, library),
    }
}
