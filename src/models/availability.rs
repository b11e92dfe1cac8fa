use crate::error::app_error::AppError;
use chrono::{NaiveTime, Timelike, Weekday};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Token used in the encoded availability string.
    pub fn code(self) -> &'static str {
        match self {
            Day::Monday => "mon",
            Day::Tuesday => "tue",
            Day::Wednesday => "wed",
            Day::Thursday => "thu",
            Day::Friday => "fri",
            Day::Saturday => "sat",
            Day::Sunday => "sun",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn short_label(self) -> &'static str {
        &self.label()[..3]
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        Day::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl FromStr for Day {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| day.code() == token || day.name() == token)
            .ok_or_else(|| AppError::UnknownDay(s.to_string()))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A four-hour block of the day. The six slots cover 24 hours starting at 02:00;
/// the last one runs past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Night,
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
    LateNight,
}

pub const SLOT_HOURS: u32 = 4;

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::Night,
        Slot::EarlyMorning,
        Slot::Morning,
        Slot::Afternoon,
        Slot::Evening,
        Slot::LateNight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn start_hour(self) -> u32 {
        (2 + self.index() as u32 * SLOT_HOURS) % 24
    }

    pub fn end_hour(self) -> u32 {
        (self.start_hour() + SLOT_HOURS) % 24
    }

    /// Token used in the encoded availability string, e.g. `06-10`.
    pub fn code(self) -> String {
        format!("{:02}-{:02}", self.start_hour(), self.end_hour())
    }

    /// Clock range, e.g. `06:00-10:00`.
    pub fn range(self) -> String {
        format!("{:02}:00-{:02}:00", self.start_hour(), self.end_hour())
    }

    pub fn label(self) -> String {
        format!("{} - {}", format_hour(self.start_hour()), format_hour(self.end_hour()))
    }

    pub fn contains(self, time: NaiveTime) -> bool {
        (time.hour() + 24 - self.start_hour()) % 24 < SLOT_HOURS
    }
}

fn format_hour(hour: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:00 {}", display, period)
}

impl FromStr for Slot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Slot::ALL
            .into_iter()
            .find(|slot| slot.code() == token || slot.range() == token)
            .ok_or_else(|| AppError::UnknownSlot(s.to_string()))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// Weekly availability as a 7 x 6 bitset. Bit `day * 6 + slot` is set when the
/// tutor is available in that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AvailabilityGrid {
    bits: u64,
}

impl AvailabilityGrid {
    const SLOTS_PER_DAY: usize = Slot::ALL.len();

    pub fn new() -> Self {
        Self::default()
    }

    fn bit(day: Day, slot: Slot) -> u64 {
        1 << (day.index() * Self::SLOTS_PER_DAY + slot.index())
    }

    fn day_mask(day: Day) -> u64 {
        ((1 << Self::SLOTS_PER_DAY) - 1) << (day.index() * Self::SLOTS_PER_DAY)
    }

    pub fn contains(&self, day: Day, slot: Slot) -> bool {
        self.bits & Self::bit(day, slot) != 0
    }

    pub fn with_slot(self, day: Day, slot: Slot) -> Self {
        Self {
            bits: self.bits | Self::bit(day, slot),
        }
    }

    pub fn without_slot(self, day: Day, slot: Slot) -> Self {
        Self {
            bits: self.bits & !Self::bit(day, slot),
        }
    }

    /// Adds `slot` to `day` if absent, removes it otherwise.
    pub fn toggle_slot(self, day: Day, slot: Slot) -> Self {
        Self {
            bits: self.bits ^ Self::bit(day, slot),
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub fn intersect(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    pub fn clear_day(self, day: Day) -> Self {
        Self {
            bits: self.bits & !Self::day_mask(day),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn slot_count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn has_day(&self, day: Day) -> bool {
        self.bits & Self::day_mask(day) != 0
    }

    /// Days with at least one slot, in week order.
    pub fn days(&self) -> Vec<Day> {
        Day::ALL.into_iter().filter(|day| self.has_day(*day)).collect()
    }

    /// Slots for `day` in clock order.
    pub fn slots_for(&self, day: Day) -> Vec<Slot> {
        Slot::ALL.into_iter().filter(|slot| self.contains(day, *slot)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Day, Slot)> + '_ {
        Day::ALL
            .into_iter()
            .flat_map(|day| Slot::ALL.into_iter().map(move |slot| (day, slot)))
            .filter(|(day, slot)| self.contains(*day, *slot))
    }
}

impl FromIterator<(Day, Slot)> for AvailabilityGrid {
    fn from_iter<I: IntoIterator<Item = (Day, Slot)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |grid, (day, slot)| grid.with_slot(day, slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_cover_the_whole_day() {
        for hour in 0..24 {
            let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
            let matching = Slot::ALL.iter().filter(|slot| slot.contains(time)).count();
            assert_eq!(matching, 1, "hour {} should fall in exactly one slot", hour);
        }
    }

    #[test]
    fn slot_codes_and_ranges() {
        assert_eq!(Slot::Night.code(), "02-06");
        assert_eq!(Slot::EarlyMorning.range(), "06:00-10:00");
        assert_eq!(Slot::LateNight.code(), "22-02");
        assert_eq!(Slot::Morning.label(), "10:00 AM - 2:00 PM");
        assert_eq!(Slot::LateNight.label(), "10:00 PM - 2:00 AM");
    }

    #[test]
    fn slot_parses_short_and_long_forms() {
        assert_eq!("14-18".parse::<Slot>().unwrap(), Slot::Afternoon);
        assert_eq!("18:00-22:00".parse::<Slot>().unwrap(), Slot::Evening);
        assert!(matches!("09-13".parse::<Slot>(), Err(AppError::UnknownSlot(_))));
    }

    #[test]
    fn day_parses_codes_and_names() {
        assert_eq!("wed".parse::<Day>().unwrap(), Day::Wednesday);
        assert_eq!("Friday".parse::<Day>().unwrap(), Day::Friday);
        assert_eq!(" SUN ".parse::<Day>().unwrap(), Day::Sunday);
        assert!(matches!("funday".parse::<Day>(), Err(AppError::UnknownDay(_))));
    }

    #[test]
    fn day_from_weekday() {
        assert_eq!(Day::from(Weekday::Mon), Day::Monday);
        assert_eq!(Day::from(Weekday::Sun), Day::Sunday);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let grid = AvailabilityGrid::new().toggle_slot(Day::Monday, Slot::Morning);
        assert!(grid.contains(Day::Monday, Slot::Morning));
        assert!(!grid.contains(Day::Tuesday, Slot::Morning));

        let grid = grid.toggle_slot(Day::Monday, Slot::Morning);
        assert!(grid.is_empty());
    }

    #[test]
    fn toggle_leaves_input_untouched() {
        let original = AvailabilityGrid::new().with_slot(Day::Friday, Slot::Evening);
        let toggled = original.toggle_slot(Day::Friday, Slot::Night);
        assert_eq!(original.slot_count(), 1);
        assert_eq!(toggled.slot_count(), 2);
    }

    #[test]
    fn without_slot_only_removes() {
        let grid = AvailabilityGrid::new().with_slot(Day::Monday, Slot::Morning);
        assert!(grid.without_slot(Day::Monday, Slot::Morning).is_empty());
        assert_eq!(grid.without_slot(Day::Monday, Slot::Evening), grid);
        assert_eq!(grid.without_slot(Day::Tuesday, Slot::Morning), grid);
    }

    #[test]
    fn merge_and_intersect() {
        let a: AvailabilityGrid = [(Day::Monday, Slot::Night), (Day::Tuesday, Slot::Morning)].into_iter().collect();
        let b: AvailabilityGrid = [(Day::Tuesday, Slot::Morning), (Day::Sunday, Slot::LateNight)].into_iter().collect();

        assert_eq!(a.merge(b).slot_count(), 3);
        assert_eq!(a.intersect(b).iter().collect::<Vec<_>>(), vec![(Day::Tuesday, Slot::Morning)]);
    }

    #[test]
    fn days_and_slots_are_ordered() {
        let grid: AvailabilityGrid = [
            (Day::Sunday, Slot::Evening),
            (Day::Monday, Slot::LateNight),
            (Day::Monday, Slot::Night),
        ]
        .into_iter()
        .collect();

        assert_eq!(grid.days(), vec![Day::Monday, Day::Sunday]);
        assert_eq!(grid.slots_for(Day::Monday), vec![Slot::Night, Slot::LateNight]);
        assert!(grid.clear_day(Day::Monday).slots_for(Day::Monday).is_empty());
        assert!(grid.clear_day(Day::Monday).has_day(Day::Sunday));
    }
}
