//! romfetch CLI
//!
//! Drives the ticket-based scrape service from the command line: activate a
//! profile, submit one file, poll until its document is ready.

mod error;
mod spinner;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use romfetch_core::{Platform, Profile};
use romfetch_scraper::global;

use crate::error::CliError;
use crate::spinner::WaitSpinner;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "romfetch")]
#[command(about = "Look up game metadata and artwork for ROM files", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Hide the progress spinner
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one file and print the resulting document
    Scrape {
        /// ROM file to look up
        path: PathBuf,

        /// Platform name or alias (e.g., nes, genesis, arcade, neogeo)
        #[arg(short, long, default_value = "")]
        platform: String,

        /// Save artwork here instead of returning its URL
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Profile id (see `romfetch profiles`)
        #[arg(long, default_value_t = 0)]
        profile: i32,

        /// Seconds to wait for the result
        #[arg(long, default_value_t = 60)]
        timeout: u64,
    },

    /// List metadata profiles
    Profiles,

    /// List platform names accepted by --platform
    Platforms,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Scrape {
            path,
            platform,
            image,
            profile,
            timeout,
        } => run_scrape(path, platform, image, profile, timeout, cli.quiet),
        Commands::Profiles => {
            run_profiles();
            Ok(())
        }
        Commands::Platforms => {
            run_platforms();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!(
            "{} {}",
            "error:".if_supports_color(Stderr, |t| t.red()),
            e
        );
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run_scrape(
    path: PathBuf,
    platform: String,
    image: Option<PathBuf>,
    profile: i32,
    timeout: u64,
    quiet: bool,
) -> Result<(), CliError> {
    if !global::init(profile) {
        return Err(CliError::Init(profile));
    }

    let path_str = path
        .to_str()
        .ok_or_else(|| CliError::other(format!("path is not UTF-8: {}", path.display())))?;
    let image_str = match &image {
        Some(image) => image
            .to_str()
            .ok_or_else(|| CliError::other(format!("path is not UTF-8: {}", image.display())))?,
        None => "",
    };

    let ticket = global::submit_request(path_str, &platform, image_str);
    if ticket == global::NO_TICKET {
        return Err(CliError::NotRunning);
    }
    log::debug!("submitted {} as ticket {}", path.display(), ticket);

    let spinner = WaitSpinner::start(format!("Looking up {}", path.display()), quiet);
    let deadline = Instant::now() + Duration::from_secs(timeout);
    let outcome = loop {
        let (document, found) = global::poll_result(ticket);
        if found {
            break Ok(document);
        }
        if Instant::now() >= deadline {
            break Err(CliError::Timeout {
                ticket,
                secs: timeout,
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    };
    spinner.finish();
    global::close();

    let document = outcome?;
    if document.is_empty() {
        println!(
            "{}",
            "No match (run with -v for details)".if_supports_color(Stdout, |t| t.yellow())
        );
    } else {
        println!("{}", document);
    }
    Ok(())
}

fn run_profiles() {
    for profile in Profile::all() {
        let sources = match profile {
            Profile::ScreenScraper => "ScreenScraper (console + arcade)",
            Profile::OpenDb => "TheGamesDB, then ScummVM/Daphne/Neo Geo id tables (console)",
            Profile::ArcadeDb => "local MAME database (arcade)",
        };
        println!(
            "  {}  {:<14} {}",
            profile.id().if_supports_color(Stdout, |t| t.bold()),
            profile.name().if_supports_color(Stdout, |t| t.cyan()),
            sources
        );
    }
}

fn run_platforms() {
    for platform in Platform::all() {
        println!(
            "  {:<12} {}{}",
            platform
                .short_name()
                .if_supports_color(Stdout, |t| t.bold()),
            platform.display_name(),
            if platform.is_arcade() {
                format!(" {}", "(arcade)".if_supports_color(Stdout, |t| t.green()))
            } else {
                String::new()
            },
        );
        let aliases = &platform.aliases()[1..];
        if !aliases.is_empty() {
            println!("               aliases: {}", aliases.join(", "));
        }
    }
}
