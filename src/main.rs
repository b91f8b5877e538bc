use clap::{Args, Parser, Subcommand};
use chrono::Utc;
use ride_estimator::dispatch::{DriverRegistry, MATCH_RADIUS_KM};
use ride_estimator::fare::{FareSchedule, DEFAULT_BASE_FARE, DEFAULT_RATE_PER_KM, DEFAULT_RATE_PER_MINUTE};
use ride_estimator::geo::Coordinate;
use ride_estimator::places;
use ride_estimator::server::{self, AppState};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// ridequote — straight-line ride estimates and a small booking API.
///
/// Examples:
///   ridequote quote "Times Square" "Central Park"
///   ridequote quote 40.7128,-74.0060 40.7829,-73.9654
///   ridequote quote wtc "empire state" --per-km 2.0
///   ridequote match "Times Square"
///   ridequote serve --port 8080 --demo-drivers
#[derive(Parser)]
#[command(name = "ridequote", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate distance, duration and fare between two points.
    Quote {
        /// Pickup: landmark name or "lat,lng".
        #[arg(allow_hyphen_values = true)]
        pickup: String,

        /// Dropoff: landmark name or "lat,lng".
        #[arg(allow_hyphen_values = true)]
        dropoff: String,

        #[command(flatten)]
        fares: FareArgs,
    },
    /// Pick the best demo driver for a pickup point.
    Match {
        /// Pickup: landmark name or "lat,lng".
        #[arg(allow_hyphen_values = true)]
        pickup: String,
    },
    /// Run the JSON API.
    Serve {
        #[arg(long, env = "RIDEQUOTE_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, short = 'p', env = "RIDEQUOTE_PORT", default_value_t = 3000)]
        port: u16,

        /// Seed the registry with drivers parked at the built-in landmarks.
        #[arg(long)]
        demo_drivers: bool,

        #[command(flatten)]
        fares: FareArgs,
    },
}

#[derive(Args)]
struct FareArgs {
    /// Flat fare charged on every trip.
    #[arg(long, default_value_t = DEFAULT_BASE_FARE)]
    base_fare: f64,

    /// Rate per kilometer.
    #[arg(long, default_value_t = DEFAULT_RATE_PER_KM)]
    per_km: f64,

    /// Rate per minute of estimated duration.
    #[arg(long, default_value_t = DEFAULT_RATE_PER_MINUTE)]
    per_minute: f64,
}

impl FareArgs {
    fn schedule(&self) -> FareSchedule {
        FareSchedule::new(self.base_fare, self.per_km, self.per_minute).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_estimator=info,ridequote=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Quote { pickup, dropoff, fares } => quote(&pickup, &dropoff, &fares),
        Command::Match { pickup } => match_driver(&pickup),
        Command::Serve { host, port, demo_drivers, fares } => {
            let registry = if demo_drivers {
                DriverRegistry::demo()
            } else {
                DriverRegistry::new()
            };
            tracing::info!(drivers = registry.len(), "driver registry ready");

            let state = AppState::new(registry, fares.schedule());
            if let Err(e) = server::start(&host, port, state).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn quote(pickup: &str, dropoff: &str, fares: &FareArgs) {
    let from = resolve_endpoint(pickup);
    let to = resolve_endpoint(dropoff);

    let quote = fares.schedule().quote(from, to);
    let est = &quote.estimate;

    eprintln!("  From: {} ({})", pickup, places::format_coords(from));
    eprintln!("  To:   {} ({})", dropoff, places::format_coords(to));
    eprintln!("  {} \u{00B7} ~{} min", est.distance_km, est.duration_minutes);
    eprintln!(
        "  ${:.2} base + ${:.2} distance + ${:.2} time = ${:.2}",
        est.base_fare, est.distance_cost, est.time_cost, est.total_price
    );

    match serde_json::to_string_pretty(&quote) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn match_driver(pickup: &str) {
    let from = resolve_endpoint(pickup);
    let registry = DriverRegistry::demo();

    let Some(matched) = registry.best_match(from, Utc::now()) else {
        eprintln!("No available drivers within {} km of {}.", MATCH_RADIUS_KM, places::format_coords(from));
        std::process::exit(1);
    };

    let d = &matched.driver;
    eprintln!("  Pickup: {} ({})", pickup, places::format_coords(from));
    eprintln!("  Driver: {} \u{00B7} {} \u{00B7} score {:.2}", d.name, d.distance_km, matched.score);

    match serde_json::to_string_pretty(&matched) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Accept "lat,lng" or a landmark name.
fn resolve_endpoint(input: &str) -> Coordinate {
    if let Some((lat, lng)) = input.split_once(',') {
        if let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
            return Coordinate::new(lat, lng).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
        }
    }

    match places::lookup(input) {
        Some(place) => place.coordinate,
        None => {
            eprintln!("Error: Unknown place '{}'.", input);
            eprintln!();
            eprintln!("Known places:");
            for p in places::all() {
                eprintln!("  {}", p.name);
            }
            eprintln!("Or pass coordinates as \"lat,lng\".");
            std::process::exit(1);
        }
    }
}
