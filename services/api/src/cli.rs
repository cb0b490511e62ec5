use crate::report::{render_chart, render_manglik, render_match};
use crate::server;
use clap::{Args, Parser, Subcommand};
use kundli::astro::chart::{BirthInput, ChartGenerator};
use kundli::astro::ephemeris::{SiderealMode, SwissEphemeris};
use kundli::error::AppError;
use kundli::manglik::{ManglikDetector, PlanetaryLongitudes};
use kundli::matching::{CompatibilityRequest, CompatibilityScorer, ProfileInput};
use serde::Serialize;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "Kundli Astro Engine",
    about = "Generate Vedic birth charts, score Ashta-Koota matches and detect Manglik Dosha",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate a sidereal birth chart
    Chart(ChartArgs),
    /// Score Ashta-Koota compatibility between two moon profiles
    Match(MatchArgs),
    /// Detect Manglik Dosha from sidereal longitudes
    Manglik(ManglikArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ChartArgs {
    /// Birth date (DD-MM-YYYY)
    #[arg(long)]
    pub(crate) date: String,
    /// Local birth time (HH:MM AM/PM)
    #[arg(long)]
    pub(crate) time: String,
    /// IANA timezone, e.g. Asia/Kolkata
    #[arg(long)]
    pub(crate) timezone: String,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) latitude: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) longitude: f64,
    /// Sidereal system: lahiri, krishnamurti, raman or fagan_bradley
    #[arg(long, default_value = "lahiri")]
    pub(crate) ayanamsa: SiderealMode,
    /// Print the JSON record instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    #[arg(long)]
    pub(crate) bride_sign: String,
    #[arg(long)]
    pub(crate) bride_nakshatra: String,
    #[arg(long)]
    pub(crate) groom_sign: String,
    #[arg(long)]
    pub(crate) groom_nakshatra: String,
    /// Print the JSON record instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ManglikArgs {
    /// Sidereal longitude of Mars in degrees
    #[arg(long)]
    pub(crate) mars: f64,
    /// Sidereal longitude of the ascendant in degrees
    #[arg(long)]
    pub(crate) ascendant: f64,
    #[arg(long)]
    pub(crate) moon: Option<f64>,
    #[arg(long)]
    pub(crate) jupiter: Option<f64>,
    #[arg(long)]
    pub(crate) venus: Option<f64>,
    /// Skip the check from the Moon
    #[arg(long)]
    pub(crate) lagna_only: bool,
    /// Print the JSON record instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Chart(args) => run_chart(args),
        Command::Match(args) => run_match(args),
        Command::Manglik(args) => run_manglik(args),
    }
}

fn emit<T: Serialize>(record: &T, json: bool, text: impl FnOnce(&T) -> String) -> Result<(), AppError> {
    if json {
        let rendered = serde_json::to_string_pretty(record).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", text(record));
    }
    Ok(())
}

fn run_chart(args: ChartArgs) -> Result<(), AppError> {
    let generator = ChartGenerator::new(Arc::new(SwissEphemeris::builtin(args.ayanamsa)));
    let chart = generator.generate(&BirthInput {
        date: args.date,
        time: args.time,
        timezone: args.timezone,
        latitude: args.latitude,
        longitude: args.longitude,
    })?;
    emit(&chart, args.json, render_chart)
}

fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let request = CompatibilityRequest {
        bride: ProfileInput {
            moon_sign: args.bride_sign,
            nakshatra: args.bride_nakshatra,
        },
        groom: ProfileInput {
            moon_sign: args.groom_sign,
            nakshatra: args.groom_nakshatra,
        },
    };
    let result = CompatibilityScorer.score_request(&request)?;
    emit(&result, args.json, render_match)
}

pub(crate) fn manglik_longitudes(args: &ManglikArgs) -> PlanetaryLongitudes {
    let optional = [
        ("moon", args.moon),
        ("jupiter", args.jupiter),
        ("venus", args.venus),
    ];
    [("mars", Some(args.mars)), ("ascendant", Some(args.ascendant))]
        .into_iter()
        .chain(optional)
        .filter_map(|(name, value)| value.map(|value| (name.to_string(), value)))
        .collect()
}

fn run_manglik(args: ManglikArgs) -> Result<(), AppError> {
    let detector = ManglikDetector::new(!args.lagna_only);
    let result = detector.detect(&manglik_longitudes(&args))?;
    emit(&result, args.json, render_manglik)
}
