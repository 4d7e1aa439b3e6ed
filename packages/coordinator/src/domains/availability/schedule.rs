//! Weekly open-hour schedules, as stored on the organization row.
//!
//! The platform stores availability as a JSON object keyed by lowercase
//! weekday name:
//!
//! ```json
//! {"monday": {"enabled": true, "start": "09:00", "end": "17:00"}, ...}
//! ```
//!
//! [`WeeklySchedule`] is a fixed record of seven named days rather than a
//! loose map, so a missing day cannot be confused with a closed one: absent
//! entries deserialize to the closed default.

use anyhow::Result;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Day of the week. Lowercase in display and serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weekday::Monday => write!(f, "monday"),
            Weekday::Tuesday => write!(f, "tuesday"),
            Weekday::Wednesday => write!(f, "wednesday"),
            Weekday::Thursday => write!(f, "thursday"),
            Weekday::Friday => write!(f, "friday"),
            Weekday::Saturday => write!(f, "saturday"),
            Weekday::Sunday => write!(f, "sunday"),
        }
    }
}

impl std::str::FromStr for Weekday {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            "saturday" => Ok(Weekday::Saturday),
            "sunday" => Ok(Weekday::Sunday),
            _ => Err(anyhow::anyhow!("Invalid weekday: {}", s)),
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// One day's open hours.
///
/// `start >= end` is degenerate but safe input: it yields zero slots, not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub enabled: bool,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl DayHours {
    /// Open from `start` to `end`.
    pub fn open(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            enabled: true,
            start,
            end,
        }
    }

    /// Closed all day.
    pub fn closed() -> Self {
        Self::default()
    }
}

impl Default for DayHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
        }
    }
}

/// An organization's recurring weekly open hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub monday: DayHours,
    #[serde(default)]
    pub tuesday: DayHours,
    #[serde(default)]
    pub wednesday: DayHours,
    #[serde(default)]
    pub thursday: DayHours,
    #[serde(default)]
    pub friday: DayHours,
    #[serde(default)]
    pub saturday: DayHours,
    #[serde(default)]
    pub sunday: DayHours,
}

impl WeeklySchedule {
    /// The hours for a given day.
    pub fn day(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DayHours {
        match weekday {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }

    /// Weekdays 9-5, weekends closed. The onboarding default.
    pub fn business_hours() -> Self {
        let open = DayHours::open(hm(9, 0), hm(17, 0));
        Self {
            monday: open,
            tuesday: open,
            wednesday: open,
            thursday: open,
            friday: open,
            saturday: DayHours::closed(),
            sunday: DayHours::closed(),
        }
    }

    /// True if no day is open.
    pub fn is_fully_closed(&self) -> bool {
        Weekday::ALL.iter().all(|day| !self.day(*day).enabled)
    }
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or(NaiveTime::MIN)
}

/// Serde for wall-clock times in the stored `"HH:MM"` form.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weekday_parses_case_insensitively() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("SUNDAY".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("someday".parse::<Weekday>().is_err());
    }

    #[test]
    fn weekday_display_is_lowercase() {
        assert_eq!(Weekday::Wednesday.to_string(), "wednesday");
    }

    #[test]
    fn schedule_round_trips_stored_json_shape() {
        let stored = json!({
            "monday": {"enabled": true, "start": "09:00", "end": "17:00"},
            "tuesday": {"enabled": true, "start": "09:00", "end": "17:00"},
            "wednesday": {"enabled": true, "start": "09:00", "end": "17:00"},
            "thursday": {"enabled": true, "start": "09:00", "end": "17:00"},
            "friday": {"enabled": true, "start": "09:00", "end": "17:00"},
            "saturday": {"enabled": false, "start": "09:00", "end": "17:00"},
            "sunday": {"enabled": false, "start": "09:00", "end": "17:00"}
        });

        let schedule: WeeklySchedule = serde_json::from_value(stored).unwrap();
        assert!(schedule.monday.enabled);
        assert!(!schedule.saturday.enabled);
        assert_eq!(schedule.monday.start, hm(9, 0));

        let back = serde_json::to_value(&schedule).unwrap();
        assert_eq!(back["friday"]["end"], json!("17:00"));
    }

    #[test]
    fn missing_days_deserialize_as_closed() {
        let partial = json!({
            "tuesday": {"enabled": true, "start": "09:00", "end": "10:00"}
        });
        let schedule: WeeklySchedule = serde_json::from_value(partial).unwrap();
        assert!(schedule.tuesday.enabled);
        assert!(!schedule.monday.enabled);
        assert!(!schedule.sunday.enabled);
    }

    #[test]
    fn business_hours_closes_weekends() {
        let schedule = WeeklySchedule::business_hours();
        assert!(schedule.friday.enabled);
        assert!(!schedule.saturday.enabled);
        assert!(!schedule.is_fully_closed());
        assert!(WeeklySchedule::default().is_fully_closed());
    }

    #[test]
    fn hhmm_accepts_seconds_suffix() {
        let day: DayHours = serde_json::from_value(json!({
            "enabled": true, "start": "08:30:00", "end": "12:00"
        }))
        .unwrap();
        assert_eq!(day.start, hm(8, 30));
    }
}
