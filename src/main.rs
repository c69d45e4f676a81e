use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use nominatim_search::{ClientConfig, Location, NominatimSearch, SearchParams};

/// Search OpenStreetMap places through a Nominatim server
///
/// Examples:
///   # Top matches for two places, searched concurrently
///   nominatim-search "Brandenburger Tor" "Tour Eiffel"
///
///   # Pharmacies in Vienna, nearest to a point first, at least 300m apart
///   nominatim-search "pharmacy Wien" -l 40 --sort distance --origin 48.2082,16.3738 --reduce 300
///
///   # Machine-readable output with full addresses
///   nominatim-search "10 Downing Street" -a --json
#[derive(Parser, Debug)]
#[command(name = "nominatim-search")]
#[command(version, about, long_about = None)]
struct Args {
    /// Free-form queries, each searched separately
    #[arg(required = true)]
    queries: Vec<String>,

    /// Path to config file (optional, auto-searches nominatim-search.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search endpoint (defaults to the public OpenStreetMap server)
    #[arg(long)]
    base_url: Option<String>,

    /// User-Agent identifying your application
    #[arg(short = 'u', long)]
    user_agent: Option<String>,

    /// Contact email sent with each request
    #[arg(long)]
    email: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum results per query
    #[arg(short = 'l', long, default_value = "10", value_parser = clap::value_parser!(u8).range(1..=40))]
    limit: u8,

    /// Restrict to ISO 3166-1 alpha-2 country codes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    countrycodes: Vec<String>,

    /// Include the address breakdown of each result
    #[arg(short = 'a', long)]
    addressdetails: bool,

    /// Drop results closer than this many meters to an earlier result
    #[arg(long)]
    reduce: Option<f64>,

    /// Reorder results before printing
    #[arg(long, value_enum)]
    sort: Option<SortOrder>,

    /// Reference point "lat,lon" for --sort distance
    #[arg(long, value_parser = parse_origin, allow_hyphen_values = true)]
    origin: Option<(f64, f64)>,

    /// Print one JSON object per query instead of text
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortOrder {
    Importance,
    Distance,
}

fn parse_origin(s: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got \"{s}\""))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude \"{lat}\""))?;
    let lon: f64 = lon.trim().parse().map_err(|_| format!("invalid longitude \"{lon}\""))?;
    Ok((lat, lon))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = if let Some(ref config_path) = args.config {
        ClientConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config file: {:?}", config_path))?
    } else {
        ClientConfig::load().unwrap_or_default()
    };
    if let Some(ref base_url) = args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(ref user_agent) = args.user_agent {
        config.user_agent = user_agent.clone();
    }
    if let Some(ref email) = args.email {
        config.email = Some(email.clone());
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = Some(secs);
    }

    let origin = match args.origin {
        Some((lat, lon)) => Some(Location::at(lat, lon).context("Invalid --origin")?),
        None => None,
    };
    if args.sort == Some(SortOrder::Distance) && origin.is_none() {
        bail!("--sort distance requires --origin");
    }

    let nominatim =
        NominatimSearch::from_config(&config).context("Failed to create Nominatim client")?;

    let params: Vec<SearchParams> = args
        .queries
        .iter()
        .map(|q| {
            SearchParams::free_text(q)
                .with_limit(args.limit.into())
                .with_addressdetails(args.addressdetails)
                .with_countrycodes(args.countrycodes.iter().cloned())
        })
        .collect();

    let spinner = create_spinner(&format!(
        "Searching {} for {} quer{}...",
        nominatim.base_url(),
        params.len(),
        if params.len() == 1 { "y" } else { "ies" }
    ));
    let start = Instant::now();
    let results = nominatim.search_multiple(params).await;
    spinner.finish_and_clear();
    tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Searches finished");

    let mut failed = 0;
    for (query, result) in args.queries.iter().zip(results) {
        let locations = match result {
            Ok(locations) => locations,
            Err(e) => {
                failed += 1;
                if args.json {
                    println!("{}", json!({ "query": query, "error": e.to_string() }));
                } else {
                    eprintln!("{query}: {e}");
                }
                continue;
            }
        };

        let locations = post_process(locations, args.sort, origin.as_ref(), args.reduce);

        if args.json {
            let dicts: Vec<Value> = locations
                .iter()
                .map(|l| Value::Object(l.to_dict()))
                .collect();
            println!("{}", json!({ "query": query, "results": dicts }));
        } else {
            print_locations(query, &locations, origin.as_ref(), args.addressdetails);
        }
    }

    if failed > 0 {
        bail!("{} of {} queries failed", failed, args.queries.len());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "nominatim_search=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn post_process(
    locations: Vec<Location>,
    sort: Option<SortOrder>,
    origin: Option<&Location>,
    reduce: Option<f64>,
) -> Vec<Location> {
    let sorted = match (sort, origin) {
        (Some(SortOrder::Importance), _) => NominatimSearch::sort_by_importance(&locations),
        (Some(SortOrder::Distance), Some(origin)) => {
            NominatimSearch::sort_by_distance(&locations, origin)
        }
        _ => locations,
    };

    match reduce {
        Some(min_distance) => NominatimSearch::reduce_locations(&sorted, min_distance),
        None => sorted,
    }
}

fn print_locations(
    query: &str,
    locations: &[Location],
    origin: Option<&Location>,
    address: bool,
) {
    println!("{query}");
    if locations.is_empty() {
        println!("  (no matches)");
        println!();
        return;
    }

    for (i, loc) in locations.iter().enumerate() {
        let osm = loc
            .osm_type
            .map(|t| format!(" {}{}", t.prefix(), loc.osm_id))
            .unwrap_or_default();
        println!("  {}. {}", i + 1, loc.display_name);
        print!(
            "     ({:.5}, {:.5}) {}/{} importance {:.3}{}",
            loc.lat, loc.lon, loc.class_, loc.type_, loc.importance, osm
        );
        if let Some(origin) = origin {
            print!(" - {:.2} km away", loc.distance_to(origin) / 1000.0);
        }
        println!();

        if address {
            for (component, value) in &loc.address {
                println!("       {component}: {value}");
            }
        }
    }
    println!();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin() {
        assert_eq!(parse_origin("48.2082,16.3738"), Ok((48.2082, 16.3738)));
        assert_eq!(parse_origin("-33.86, 151.21"), Ok((-33.86, 151.21)));
        assert!(parse_origin("48.2").is_err());
        assert!(parse_origin("north,16").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "nominatim-search",
            "Wien",
            "Graz",
            "--sort",
            "distance",
            "--origin",
            "-33.86,151.21",
            "--countrycodes",
            "at, de",
        ])
        .unwrap();
        assert_eq!(args.queries, vec!["Wien", "Graz"]);
        assert_eq!(args.sort, Some(SortOrder::Distance));
        assert_eq!(args.origin, Some((-33.86, 151.21)));
        assert_eq!(args.countrycodes, vec!["at", " de"]);
        assert_eq!(args.limit, 10);

        let params = SearchParams::free_text("Wien").with_countrycodes(args.countrycodes.iter());
        assert_eq!(params.countrycodes, vec!["at", "de"]);
        params.validate().unwrap();
    }

    #[test]
    fn test_post_process_sort_then_reduce() {
        let mut near = Location::new(1, 48.2083, 16.3731).unwrap();
        near.importance = 0.2;
        let mut nearby_duplicate = Location::new(2, 48.2084, 16.3732).unwrap();
        nearby_duplicate.importance = 0.9;
        let mut far = Location::new(3, 47.0707, 15.4395).unwrap();
        far.importance = 0.5;

        let out = post_process(
            vec![far, near, nearby_duplicate],
            Some(SortOrder::Importance),
            None,
            Some(100.0),
        );
        let ids: Vec<u64> = out.iter().map(|l| l.place_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
