//! fortune-calendar - Command line front end for the fortune engine.
//!
//! Every subcommand prints its result as JSON on stdout; logs go to stderr.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use fortune_calendar::adapters::{InMemoryFortuneCache, MeanMotionEphemeris, RedisFortuneCache};
use fortune_calendar::application::{
    AnalyzeTrendHandler, AnalyzeTrendQuery, CacheSlot, FindEventTimingHandler,
    FindEventTimingQuery, GenerateCalendarHandler, GenerateCalendarQuery, GetDailyFortuneHandler,
    GetDailyFortuneQuery, SnapshotSource,
};
use fortune_calendar::config::{CacheConfig, EngineConfig, LoggingConfig};
use fortune_calendar::domain::foundation::{DateRange, YearRange};
use fortune_calendar::domain::pillars::BirthMoment;
use fortune_calendar::domain::profile::{BirthData, Gender, NatalProfile};
use fortune_calendar::domain::timing::EventType;
use fortune_calendar::ports::FortuneCache;

#[derive(Parser)]
#[command(name = "fortune-calendar")]
#[command(about = "Saju and astrology fortune calendar.")]
struct CommandLine {
    #[command(flatten)]
    birth: BirthArgs,

    /// Add approximate Sun and Moon transits to the scores
    #[arg(long, global = true)]
    astro: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BirthArgs {
    /// Profile JSON with pillar strings (hanja or hangul)
    #[arg(long, global = true, conflicts_with = "birth_date")]
    profile: Option<PathBuf>,

    /// Birth date, YYYY-MM-DD
    #[arg(long, global = true)]
    birth_date: Option<NaiveDate>,

    /// Local birth time, HH:MM
    #[arg(long, global = true, value_parser = parse_time)]
    birth_time: Option<NaiveTime>,

    /// Birth place longitude, for true solar time
    #[arg(long, global = true, allow_negative_numbers = true)]
    longitude: Option<f64>,

    /// male or female; needed for Daeun cycles
    #[arg(long, global = true)]
    gender: Option<Gender>,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a single day
    #[command(alias = "d")]
    Day { date: NaiveDate },
    /// Grade every day of a year
    #[command(alias = "c")]
    Calendar { year: i32 },
    /// Find windows for a life event
    #[command(alias = "t")]
    Timing {
        event: EventType,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Score a range of years
    #[command(alias = "r")]
    Trend { start: i32, end: i32 },
}

fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_profile(args: &BirthArgs, config: &EngineConfig) -> Result<NatalProfile, Box<dyn Error>> {
    if let Some(path) = &args.profile {
        let raw = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&raw)?);
    }

    let date = args
        .birth_date
        .ok_or("either --profile or --birth-date is required")?;
    let mut moment = BirthMoment::new(date, args.birth_time);
    if let Some(longitude) = args.longitude {
        moment = moment.with_longitude(longitude);
    }
    let birth = BirthData {
        moment,
        gender: args.gender,
    };
    Ok(NatalProfile::from_birth(&birth, &config.calculator())?)
}

async fn build_cache(config: &CacheConfig) -> CacheSlot {
    let cache: Arc<dyn FortuneCache> = match &config.redis_url {
        Some(url) => match RedisFortuneCache::connect(url).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, using in-memory cache");
                Arc::new(InMemoryFortuneCache::new(config.capacity))
            }
        },
        None => Arc::new(InMemoryFortuneCache::new(config.capacity)),
    };
    CacheSlot::new(cache, config.ttl())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let commands = CommandLine::parse();

    let config = EngineConfig::load()?;
    config.validate()?;
    init_logging(&config.logging);

    let profile = load_profile(&commands.birth, &config)?;
    let cache = build_cache(&config.cache).await;
    let snapshots = if commands.astro {
        SnapshotSource::new(Arc::new(MeanMotionEphemeris::new()))
    } else {
        SnapshotSource::none()
    };

    match commands.command {
        Commands::Day { date } => {
            let handler = GetDailyFortuneHandler::new(config.grading_engine())
                .with_cache(cache)
                .with_snapshots(snapshots);
            print_json(&handler.handle(GetDailyFortuneQuery { profile, date }).await?)
        }
        Commands::Calendar { year } => {
            let handler = GenerateCalendarHandler::new(config.calendar_generator())
                .with_cache(cache)
                .with_snapshots(snapshots);
            print_json(&handler.handle(GenerateCalendarQuery { profile, year }).await?)
        }
        Commands::Timing { event, start, end } => {
            let handler = FindEventTimingHandler::new(config.timing_optimizer())
                .with_cache(cache)
                .with_snapshots(snapshots);
            let query = FindEventTimingQuery {
                profile,
                event_type: event,
                range: DateRange::new(start, end)?,
            };
            print_json(&handler.handle(query).await?)
        }
        Commands::Trend { start, end } => {
            let handler = AnalyzeTrendHandler::new(config.trend_analyzer()).with_cache(cache);
            let query = AnalyzeTrendQuery {
                profile,
                range: YearRange::new(start, end)?,
            };
            print_json(&handler.handle(query).await?)
        }
    }
}
