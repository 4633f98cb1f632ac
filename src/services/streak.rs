//! Writing streak
//!
//! Counts consecutive local days with at least one entry, walking backward
//! from the most recent entry. Days start at local midnight in the time zone
//! of the `now` passed in.

use chrono::{DateTime, Local, NaiveDate, Offset, TimeZone, Utc};

use crate::config::DayBoundary;
use crate::models::JournalEntry;

const DAY_MS: i64 = 86_400_000;

/// An entry's local day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Day {
    date: NaiveDate,
    /// Local midnight starting the day, as Unix milliseconds
    midnight_ms: i64,
}

fn day_of<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> Day {
    let local = at.with_timezone(tz);
    let date = local.date_naive();

    let midnight_ms = date
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| {
            tz.from_local_datetime(&naive)
                .earliest()
                .map(|m| m.timestamp_millis())
                // Midnight skipped by a DST jump: use the offset in force at `at`
                .or_else(|| {
                    local
                        .offset()
                        .fix()
                        .from_local_datetime(&naive)
                        .single()
                        .map(|m| m.timestamp_millis())
                })
        })
        .unwrap_or_else(|| at.timestamp_millis());

    Day { date, midnight_ms }
}

/// Whether `latest` is too far before `today` for any streak to survive
fn is_broken(latest: Day, today: Day, boundary: DayBoundary) -> bool {
    match boundary {
        DayBoundary::Elapsed => today.midnight_ms - latest.midnight_ms > DAY_MS,
        DayBoundary::Calendar => (today.date - latest.date).num_days() > 1,
    }
}

/// Whether `day` is exactly the day before `pointer`
fn is_previous_day(day: Day, pointer: Day, boundary: DayBoundary) -> bool {
    match boundary {
        DayBoundary::Elapsed => pointer.midnight_ms - day.midnight_ms == DAY_MS,
        DayBoundary::Calendar => pointer.date.pred_opt() == Some(day.date),
    }
}

/// Compute the streak as of `now`
///
/// The count starts at 1 only when the latest entry is from today; an
/// unbroken run ending yesterday counts the days before the latest entry.
/// Several entries on one day count once.
pub fn calculate_streak<Tz: TimeZone>(
    entries: &[JournalEntry],
    now: &DateTime<Tz>,
    boundary: DayBoundary,
) -> u32 {
    let tz = now.timezone();

    let mut stamps: Vec<DateTime<Utc>> = entries.iter().map(|e| e.created_at).collect();
    stamps.sort_by(|a, b| b.cmp(a));
    let days: Vec<Day> = stamps.iter().map(|at| day_of(at, &tz)).collect();

    let Some((&latest, rest)) = days.split_first() else {
        return 0;
    };

    let today = day_of(&now.with_timezone(&Utc), &tz);
    let latest_is_today = latest.date == today.date;

    if !latest_is_today && is_broken(latest, today, boundary) {
        return 0;
    }

    let mut streak = u32::from(latest_is_today);
    let mut pointer = latest;

    for &day in rest {
        if day.date == pointer.date {
            continue;
        }
        if is_previous_day(day, pointer, boundary) {
            streak += 1;
            pointer = day;
        } else {
            break;
        }
    }

    streak
}

/// Compute the streak against the local clock
pub fn current_streak(entries: &[JournalEntry], boundary: DayBoundary) -> u32 {
    calculate_streak(entries, &Local::now(), boundary)
}
