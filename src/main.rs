use clap::{Args, Parser, Subcommand};
use property_browser::{
    advisor::HttpAdvisorClient,
    config::{Config, ServiceConfig},
    models::{PropertyFilter, PropertyId},
    PropertyService,
};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "property-browser")]
#[command(about = "Browse, filter and favorite property listings", long_about = None)]
struct Cli {
    /// Catalog JSON file, overriding catalog.path
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Skip the simulated service latency
    #[arg(long, global = true)]
    no_delay: bool,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List properties, optionally filtered or searched
    List {
        /// Free-text search; takes precedence over the filters
        #[arg(short, long)]
        query: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show a single property
    Get {
        #[arg(value_name = "PROPERTY_ID")]
        id: PropertyId,
    },

    /// Free-text search over title, location and description
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Toggle the favorite flag of a property
    Favorite {
        #[arg(value_name = "PROPERTY_ID")]
        id: PropertyId,
    },

    /// List favorited properties
    Favorites,

    /// Show the filter options derived from the catalog
    Facets,

    /// Ask the recommendation function for matching properties
    Advise {
        #[arg(value_name = "REQUIREMENTS")]
        brief: String,
    },
}

#[derive(Args, Default)]
struct FilterArgs {
    /// City, state or address substring
    #[arg(short, long)]
    location: Option<String>,

    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,

    #[arg(long)]
    min_beds: Option<u32>,
    #[arg(long)]
    max_beds: Option<u32>,

    #[arg(long)]
    min_year: Option<i32>,
    #[arg(long)]
    max_year: Option<i32>,

    #[arg(long)]
    min_hoa: Option<f64>,
    #[arg(long)]
    max_hoa: Option<f64>,

    /// Accepted property type (repeatable)
    #[arg(short = 't', long = "type")]
    property_type: Vec<String>,

    /// Amenity, at least one must match (repeatable)
    #[arg(short, long = "amenity")]
    amenities: Vec<String>,

    /// Property feature, at least one must match (repeatable)
    #[arg(short, long = "feature")]
    features: Vec<String>,
}

impl From<FilterArgs> for PropertyFilter {
    fn from(args: FilterArgs) -> Self {
        PropertyFilter {
            location: args.location,
            min_price: args.min_price,
            max_price: args.max_price,
            min_beds: args.min_beds,
            max_beds: args.max_beds,
            min_year: args.min_year,
            max_year: args.max_year,
            min_hoa_fees: args.min_hoa,
            max_hoa_fees: args.max_hoa,
            property_type: args.property_type,
            amenities: args.amenities,
            property_features: args.features,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_tracing(&config);

    if let Some(e) = config_error {
        tracing::warn!("Failed to load configuration: {}", e);
        tracing::warn!("Using default configuration");
    }

    if let Some(path) = cli.catalog {
        config.catalog.path = Some(path);
    }
    if cli.no_delay {
        config.service = ServiceConfig {
            fault_injection_every: config.service.fault_injection_every,
            ..ServiceConfig::immediate()
        };
    }

    if config.observability.metrics_enabled {
        if let Err(e) = property_browser::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
        }
    }

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.state.backend,
        "Starting property browser"
    );

    let service = PropertyService::from_config(&config).await?;

    match cli.command {
        Commands::List { query, filter } => {
            let filter = PropertyFilter::from(filter);
            let properties = service.load(query.as_deref(), &filter).await?;
            let chips: Vec<String> = filter.summary().iter().map(ToString::to_string).collect();

            print_json(&json!({
                "filters": chips,
                "count": properties.len(),
                "properties": properties,
            }))?;
        }

        Commands::Get { id } => match service.get_by_id(id).await {
            Some(property) => print_json(&property)?,
            None => {
                eprintln!("Property {} not found", id);
                std::process::exit(1);
            }
        },

        Commands::Search { query } => {
            let properties = service.search(&query).await?;
            print_json(&json!({
                "count": properties.len(),
                "properties": properties,
            }))?;
        }

        Commands::Favorite { id } => match service.toggle_favorite(id).await {
            Some(update) => {
                if let Some(warning) = &update.warning {
                    eprintln!("Warning: {}", warning);
                }
                print_json(&update)?;
            }
            None => {
                eprintln!("Property {} not found", id);
                std::process::exit(1);
            }
        },

        Commands::Favorites => {
            let favorites = service.get_favorites().await?;
            print_json(&json!({
                "count": favorites.len(),
                "properties": favorites,
            }))?;
        }

        Commands::Facets => print_json(service.facets())?,

        Commands::Advise { brief } => {
            let client = HttpAdvisorClient::from_config(&config.advisor)?;
            let advice = service.advise(&client, &brief).await?;
            if advice.is_empty() {
                eprintln!("No matching properties found");
            }
            print_json(&advice)?;
        }
    }

    if cli.print_metrics {
        eprintln!("{}", property_browser::metrics::gather_metrics());
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("property_browser={}", config.observability.log_level).into()
    });

    // stdout carries command output
    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
