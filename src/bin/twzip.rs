//! twzip: query a Taiwan postal-code dataset from the command line.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use twzip::{AddressQuery, Dataset, ZipDirectory};

#[derive(Parser)]
#[command(name = "twzip")]
#[command(version = "0.1.0")]
#[command(about = "Taiwan postal code lookup", long_about = None)]
struct Cli {
    /// Dataset snapshot (JSON with "zip3" and "data" mappings)
    #[arg(short, long)]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every city with road-level data
    Cities,

    /// List the areas of a city
    Areas {
        /// City name (縣市)
        city: String,
    },

    /// List the roads of an area
    Roads {
        /// City name (縣市)
        city: String,
        /// Area name (區)
        area: String,
    },

    /// Resolve an address to its 6-digit zip code
    Resolve {
        /// City name (縣市)
        city: String,
        /// Area name (區)
        area: String,
        /// Road name (路街段)
        road: String,

        /// House number (號)
        #[arg(short, long)]
        number: Option<i32>,

        /// Lane (巷)
        #[arg(short, long)]
        lane: Option<i32>,

        /// Alley (弄)
        #[arg(short, long)]
        alley: Option<i32>,

        /// Print the full result as JSON instead of just the code
        #[arg(long)]
        json: bool,
    },

    /// List every 6-digit code reachable on a road
    Codes {
        /// City name (縣市)
        city: String,
        /// Area name (區)
        area: String,
        /// Road name (路街段)
        road: String,
    },

    /// Search road names by substring
    Search {
        /// Substring to look for
        keyword: String,

        /// Limit the search to one city
        #[arg(short, long)]
        city: Option<String>,

        /// Limit the search to one area (requires --city)
        #[arg(short, long, requires = "city")]
        area: Option<String>,

        /// Print hits as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up districts by name or 3-digit code
    District {
        /// District name (區) or 3-digit code
        query: String,

        /// Print hits as JSON
        #[arg(long)]
        json: bool,
    },

    /// List district entries with their 3-digit codes
    Districts {
        /// Limit the listing to one city
        #[arg(short, long)]
        city: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a zip code is reachable in the dataset
    Validate {
        /// 6-digit code, or 3-digit code with --zip3
        code: String,

        /// Check against the district-level 3-digit codes instead
        #[arg(long)]
        zip3: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let directory = load_directory(&cli.data)?;

    match cli.command {
        Commands::Cities => {
            for city in directory.cities() {
                println!("{}", city);
            }
        }

        Commands::Areas { city } => {
            for area in directory.areas(&city) {
                println!("{}", area);
            }
        }

        Commands::Roads { city, area } => {
            for road in directory.roads(&city, &area) {
                println!("{}", road);
            }
        }

        Commands::Resolve {
            city,
            area,
            road,
            number,
            lane,
            alley,
            json,
        } => {
            let mut query = AddressQuery::new(&city, &area, &road);
            query.number = number;
            query.lane = lane;
            query.alley = alley;

            match directory.resolve(&query) {
                Some(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Some(result) => println!("{}", result.zipcode),
                None => return Err(format!("no zip code for {} {} {}", city, area, road).into()),
            }
        }

        Commands::Codes { city, area, road } => {
            let codes = directory.zip_codes_for_road(&city, &area, &road);
            if codes.is_empty() {
                return Err(format!("no codes for {} {} {}", city, area, road).into());
            }
            for code in codes {
                println!("{}", code);
            }
        }

        Commands::Search {
            keyword,
            city,
            area,
            json,
        } => {
            let hits = directory.search_roads(&keyword, city.as_deref(), area.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                for hit in hits {
                    println!("{} {} {}", hit.city, hit.area, hit.road);
                }
            }
        }

        Commands::District { query, json } => {
            let entries = directory.zip3().find_all(&query);
            if entries.is_empty() {
                return Err(format!("no district matches {}", query).into());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!("{} {} {}", entry.zip3, entry.city, entry.district);
                }
            }
        }

        Commands::Districts { city, json } => {
            let entries = directory.zip3().districts(city.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!("{} {} {}", entry.zip3, entry.city, entry.district);
                }
            }
        }

        Commands::Validate { code, zip3 } => {
            let valid = if zip3 {
                directory.zip3().is_valid_code(&code)
            } else {
                directory.is_valid_zip6(&code)
            };
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_directory(path: &Path) -> Result<ZipDirectory, Box<dyn std::error::Error>> {
    let file = File::open(path)
        .map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    let dataset = Dataset::from_reader(BufReader::new(file))?;
    if let Err(e) = dataset.validate() {
        log::warn!("dataset snapshot is inconsistent: {}", e);
    }
    Ok(ZipDirectory::new(dataset))
}
