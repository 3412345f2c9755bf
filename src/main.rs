use clap::Parser;
use route_distances::{
    sdk::config::BackendConfig,
    sdk::routing::{client::DistanceClient, mode::Mode, route::Coord, route::RouteRequest},
    sdk::util::log::init_logging,
};
use std::error::Error;

/// A CLI tool to compute the distance and duration of a route between two
/// points using various routing services
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Routing service to query (google, otp, osrm, valhalla)
    #[arg(short, long, default_value = "osrm")]
    service: String,

    /// The origin, as "lon,lat"
    #[arg(long)]
    from: String,

    /// The destination, as "lon,lat"
    #[arg(long)]
    to: String,

    /// Travel mode (walk, bike, drive, transit)
    #[arg(short, long, default_value = "walk")]
    mode: String,

    /// Report "no result" instead of failing when the service keeps erroring
    #[arg(long)]
    tolerate_failures: bool,
}

fn parse_coord(input: &str) -> Result<Coord, Box<dyn Error>> {
    let (lon, lat) = input
        .split_once(',')
        .ok_or_else(|| format!("expected \"lon,lat\", got \"{}\"", input))?;
    Ok((lon.trim().parse()?, lat.trim().parse()?))
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mode: Mode = cli.mode.parse()?;
    let from = parse_coord(&cli.from)?;
    let to = parse_coord(&cli.to)?;

    let backend = BackendConfig::from_env(&cli.service)?.build();
    let client = DistanceClient::new(backend).fail_fast(!cli.tolerate_failures);

    log::info!(
        "Querying {} for a {} route from {:?} to {:?}",
        cli.service,
        mode,
        from,
        to
    );

    let request = RouteRequest::new(from, to, mode);
    match client.distance(&request)? {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => {
            log::warn!("No route found");
            println!("null");
        }
    }

    Ok(())
}
