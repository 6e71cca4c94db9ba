//! `camp` CLI: scheduling checks over exported camp data.
//!
//! ## Usage
//!
//! ```sh
//! # Days of a week
//! camp days --start 2024-01-15 --end 2024-01-21
//!
//! # Closed date-range overlap (touching counts)
//! camp overlaps 2024-01-12 2024-01-15 2024-01-15 2024-01-21
//!
//! # Same-day time overlap (back-to-back does not count)
//! camp time-overlaps 09:00 10:00 10:00 11:00
//!
//! # Natural sort of names, one per line
//! printf 'Court 10\nCourt 2\n' | camp sort
//!
//! # Resolve {parents, joins, children} into parents with children
//! camp attach -i coach_groups.json
//!
//! # Week builder overview from a snapshot of the collections
//! camp week -i snapshot.json --week w1 --tz Europe/Madrid
//!
//! # Location double-booking report
//! camp bookings -i snapshot.json
//!
//! # Replace a coach's groups / delete a week, writing the updated snapshot
//! camp link -i snapshot.json --table coachGroups --parent c1 --children g1,g2 -o out.json
//! camp delete-week -i snapshot.json --week w1 -o out.json
//! ```
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=debug`) or pass `-v` to see store operations
//! on stderr.

use anyhow::{Context, Result};
use camp_core::interval::{local_date, parse_date, parse_instant, parse_timezone};
use camp_core::model::{collections, ScheduleSlot};
use camp_core::store::{delete_week, fetch_all, join_table};
use camp_core::week::load_week_overview;
use camp_core::{Association, DateRange, MemoryStore};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use clap::{ArgAction, Parser, Subcommand};
use serde_json::Value;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "camp", version, about = "Tennis-camp scheduling checks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA timezone used to turn stored instants into calendar dates
    #[arg(long, global = true, env = "CAMP_TZ", default_value = "UTC")]
    tz: String,

    /// Log store operations to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the days between two dates, both included
    Days {
        /// First day (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start: String,
        /// Last day (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        end: String,
        /// Print a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check whether two closed date ranges overlap
    Overlaps {
        a_start: String,
        a_end: String,
        b_start: String,
        b_end: String,
    },
    /// Check whether two same-day HH:MM ranges overlap
    TimeOverlaps {
        a_start: String,
        a_end: String,
        b_start: String,
        b_end: String,
    },
    /// Sort lines in natural order
    Sort {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Attach children to parents from a {parents, joins, children} JSON document
    Attach {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the week builder overview for one week of a snapshot
    Week {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Week id
        #[arg(long)]
        week: String,
    },
    /// Report locations booked twice at the same time
    Bookings {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Replace all links of one parent in a join table
    Link {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Updated snapshot file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Join collection: coachGroups, locationGroups or tournamentCoaches
        #[arg(long)]
        table: String,
        /// Parent id
        #[arg(long)]
        parent: String,
        /// Comma-separated child ids (empty clears all links)
        #[arg(long, default_value = "")]
        children: String,
    },
    /// Delete a week and list camps/preferences still pointing at it
    DeleteWeek {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Updated snapshot file (not written if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Week id
        #[arg(long)]
        week: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let tz = parse_timezone(&cli.tz).context("Invalid --tz")?;

    match cli.command {
        Commands::Days { start, end, json } => {
            let range = DateRange::new_unchecked(
                parse_calendar_date(&start, &tz)?,
                parse_calendar_date(&end, &tz)?,
            );
            let days = camp_core::expand_days(&range);
            if json {
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                for day in &days {
                    println!("{}  {:<9}  {}", day.iso_date, day.weekday_name, day.display_label);
                }
            }
        }
        Commands::Overlaps {
            a_start,
            a_end,
            b_start,
            b_end,
        } => {
            let result = camp_core::overlaps(
                parse_point(&a_start)?,
                parse_point(&a_end)?,
                parse_point(&b_start)?,
                parse_point(&b_end)?,
            );
            println!("{}", result);
        }
        Commands::TimeOverlaps {
            a_start,
            a_end,
            b_start,
            b_end,
        } => {
            let result = camp_core::time_overlaps(&a_start, &a_end, &b_start, &b_end)
                .context("Failed to compare time ranges")?;
            println!("{}", result);
        }
        Commands::Sort { input } => {
            let text = read_input(input.as_deref())?;
            let mut lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
            lines.sort_by(|a, b| camp_core::natural_compare(a, b));
            for line in lines {
                println!("{}", line);
            }
        }
        Commands::Attach { input } => {
            let doc = read_json(input.as_deref())?;
            let parents: Vec<Value> = field(&doc, "parents")?;
            let joins: Vec<Association> = field(&doc, "joins")?;
            let children: Vec<Value> = field(&doc, "children")?;
            let attached = camp_core::attach_children(parents, &joins, &children);
            println!("{}", serde_json::to_string_pretty(&attached)?);
        }
        Commands::Week { input, week } => {
            let store = load_store(input.as_deref())?;
            let overview = load_week_overview(&store, &week, &tz)
                .with_context(|| format!("Failed to build overview for week '{}'", week))?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        Commands::Bookings { input } => {
            let store = load_store(input.as_deref())?;
            let slots: Vec<ScheduleSlot> = fetch_all(&store, collections::SCHEDULE_SLOTS)
                .context("Failed to read schedule slots")?;
            let found = camp_core::find_double_bookings(&slots);
            info!(slots = slots.len(), double_bookings = found.len(), "checked bookings");
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Commands::Link {
            input,
            output,
            table,
            parent,
            children,
        } => {
            let join = join_table(&table).with_context(|| {
                format!(
                    "Unknown join table: '{}'. Available: coachGroups, locationGroups, tournamentCoaches",
                    table
                )
            })?;
            let child_ids: Vec<&str> = children
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            let mut store = load_store(input.as_deref())?;
            let outcome = camp_core::replace_associations(&mut store, join, &parent, &child_ids)
                .context("Failed to replace associations")?;
            info!(removed = outcome.removed, inserted = outcome.inserted, "links replaced");
            save_snapshot(&store, output.as_deref())?;
        }
        Commands::DeleteWeek {
            input,
            output,
            week,
        } => {
            let mut store = load_store(input.as_deref())?;
            let report = delete_week(&mut store, &week)
                .with_context(|| format!("Failed to delete week '{}'", week))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if let Some(path) = output.as_deref() {
                save_snapshot(&store, Some(path))?;
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// A calendar date passes through; an instant becomes its local date in `tz`.
fn parse_calendar_date(s: &str, tz: &Tz) -> Result<NaiveDate> {
    if let Ok(date) = parse_date(s) {
        return Ok(date);
    }
    let instant = parse_instant(s).with_context(|| format!("Invalid date: '{}'", s))?;
    Ok(local_date(instant, tz))
}

/// A calendar date is taken as midnight UTC; instants pass through.
fn parse_point(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = parse_date(s) {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    parse_instant(s).with_context(|| format!("Invalid date: '{}'", s))
}

fn field<T: serde::de::DeserializeOwned>(doc: &Value, name: &str) -> Result<T> {
    let value = doc.get(name).cloned().unwrap_or(Value::Array(Vec::new()));
    serde_json::from_value(value).with_context(|| format!("Invalid '{}' in input", name))
}

fn load_store(path: Option<&str>) -> Result<MemoryStore> {
    let snapshot = read_json(path)?;
    MemoryStore::from_snapshot(&snapshot).context("Invalid snapshot")
}

fn read_json(path: Option<&str>) -> Result<Value> {
    let text = read_input(path)?;
    serde_json::from_str(&text).context("Failed to parse input JSON")
}

/// Text of `path`, or all of stdin when no path is given.
fn read_input(path: Option<&str>) -> Result<String> {
    let Some(path) = path else {
        return io::read_to_string(io::stdin()).context("Failed to read from stdin");
    };
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

/// Write the store back out in snapshot form, to `path` or stdout.
fn save_snapshot(store: &MemoryStore, path: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(&store.to_snapshot())?;
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path)),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
