//! Encoding and presentation of weekly tutoring availability.
//!
//! The stored form lists every available (day, slot) pair grouped by day:
//!
//! ```text
//! grid  := "" | entry (";" entry)*
//! entry := day ":" slot ("," slot)*
//! day   := "mon" | "tue" | "wed" | "thu" | "fri" | "sat" | "sun"
//! slot  := "02-06" | "06-10" | "10-14" | "14-18" | "18-22" | "22-02"
//! ```
//!
//! Days appear in week order and slots in clock order, so equal grids always encode
//! to the same string. Decoding skips anything it does not recognise, and also reads
//! the JSON object form written by earlier releases (`{"monday": ["06:00-10:00"]}`).

use crate::error::app_error::AppError;
use crate::models::availability::{AvailabilityGrid, Day, SLOT_HOURS, Slot};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const ENTRY_SEPARATOR: &str = ";";
const DAY_SEPARATOR: &str = ":";
const SLOT_SEPARATOR: &str = ",";

/// Returns `grid` with `slot` flipped on `day`.
pub fn toggle_slot(grid: &AvailabilityGrid, day: Day, slot: Slot) -> AvailabilityGrid {
    grid.toggle_slot(day, slot)
}

pub fn serialize(grid: &AvailabilityGrid) -> String {
    grid.days()
        .into_iter()
        .map(|day| {
            let slots = grid.slots_for(day).into_iter().map(Slot::code).collect::<Vec<_>>().join(SLOT_SEPARATOR);
            format!("{}{}{}", day.code(), DAY_SEPARATOR, slots)
        })
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

pub fn deserialize(raw: &str) -> AvailabilityGrid {
    let raw = raw.trim();
    if raw.starts_with('{') {
        return deserialize_legacy(raw);
    }

    let mut grid = AvailabilityGrid::new();
    for entry in raw.split(ENTRY_SEPARATOR).map(str::trim).filter(|e| !e.is_empty()) {
        let Some((day, slots)) = entry.split_once(DAY_SEPARATOR) else {
            debug!(entry = %entry, "skipping availability entry without a day");
            continue;
        };

        let day = match day.parse::<Day>() {
            Ok(day) => day,
            Err(_) => {
                debug!(entry = %entry, "skipping availability entry with unknown day");
                continue;
            }
        };

        for slot in slots.split(SLOT_SEPARATOR).map(str::trim).filter(|s| !s.is_empty()) {
            match slot.parse::<Slot>() {
                Ok(slot) => grid = grid.with_slot(day, slot),
                Err(_) => debug!(day = %day, slot = %slot, "skipping unknown availability slot"),
            }
        }
    }

    grid
}

fn deserialize_legacy(raw: &str) -> AvailabilityGrid {
    let object = match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(object) => object,
        Err(e) => {
            warn!(error = %e, "could not read legacy availability; treating as empty");
            return AvailabilityGrid::new();
        }
    };

    object
        .iter()
        .filter_map(|(day, slots)| Some((day.parse::<Day>().ok()?, slots.as_array()?)))
        .flat_map(|(day, slots)| {
            slots
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|slot| slot.parse::<Slot>().ok())
                .map(move |slot| (day, slot))
        })
        .collect()
}

/// Short description for cards and lists, e.g. `Mon-Wed, Fri · 5 slots`.
pub fn summarize(grid: &AvailabilityGrid) -> String {
    let days = grid.days();
    if days.is_empty() {
        return "No availability".to_string();
    }

    let mut parts = Vec::new();
    let mut run: Vec<Day> = Vec::new();
    for day in days {
        if run.last().is_some_and(|last| last.index() + 1 != day.index()) {
            push_day_run(&mut parts, &run);
            run.clear();
        }
        run.push(day);
    }
    push_day_run(&mut parts, &run);

    let count = grid.slot_count();
    let noun = if count == 1 { "slot" } else { "slots" };
    format!("{} · {} {}", parts.join(", "), count, noun)
}

fn push_day_run(parts: &mut Vec<String>, run: &[Day]) {
    match run {
        [first, .., last] if run.len() >= 3 => parts.push(format!("{}-{}", first.short_label(), last.short_label())),
        _ => parts.extend(run.iter().map(|day| day.short_label().to_string())),
    }
}

/// Slot labels for one day, e.g. `6:00 AM - 10:00 AM, 6:00 PM - 10:00 PM`.
pub fn format_day_slots(grid: &AvailabilityGrid, day: Day) -> String {
    grid.slots_for(day).iter().map(|slot| slot.label()).collect::<Vec<_>>().join(", ")
}

pub fn slot_for_time(time: NaiveTime) -> Slot {
    Slot::ALL
        .into_iter()
        .find(|slot| slot.contains(time))
        .unwrap_or(Slot::LateNight)
}

/// Start times of the one-hour sessions that fit in `slot`.
pub fn hourly_slots(slot: Slot) -> Vec<NaiveTime> {
    (0..SLOT_HOURS)
        .filter_map(|offset| NaiveTime::from_hms_opt((slot.start_hour() + offset) % 24, 0, 0))
        .collect()
}

pub fn booking_slots_for_day(grid: &AvailabilityGrid, day: Day) -> Vec<NaiveTime> {
    grid.slots_for(day).into_iter().flat_map(hourly_slots).collect()
}

pub fn day_for_date(date: NaiveDate) -> Day {
    Day::from(date.weekday())
}

pub fn has_availability_on_date(grid: &AvailabilityGrid, date: NaiveDate) -> bool {
    grid.has_day(day_for_date(date))
}

pub fn booking_slots_for_date(grid: &AvailabilityGrid, date: NaiveDate) -> Vec<NaiveTime> {
    booking_slots_for_day(grid, day_for_date(date))
}

/// Parses `HH:MM` as entered in booking forms.
pub fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| AppError::InvalidTime(raw.to_string()))
}

/// `14:00` becomes `2:00 PM`.
pub fn format_time_for_display(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!("{}:{:02} {}", hour, time.minute(), if is_pm { "PM" } else { "AM" })
}

impl Serialize for AvailabilityGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&serialize(self))
    }
}

impl<'de> Deserialize<'de> for AvailabilityGrid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(deserialize).unwrap_or_default())
    }
}
