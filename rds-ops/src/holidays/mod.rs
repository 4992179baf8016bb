//! Holiday calendar resolution
//!
//! The effective non-business days for a year are the union of two sources,
//! both re-read on every invocation:
//!
//! - **Official**: the Cabinet Office national holiday CSV, fetched over HTTP
//!   ([`OfficialCalendar`])
//! - **Custom**: a local CSV of company-specific days off ([`CustomHolidays`])
//!
//! A source that cannot be read contributes an empty set; resolution itself
//! never fails.

pub mod custom;
pub mod official;
pub mod resolver;

pub use custom::CustomHolidays;
pub use official::OfficialCalendar;
pub use resolver::HolidayResolver;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::clock::is_weekend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    Official,
    Custom,
}

impl HolidayKind {
    pub fn label(&self) -> &'static str {
        match self {
            HolidayKind::Official => "official",
            HolidayKind::Custom => "custom",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            HolidayKind::Official => "Official",
            HolidayKind::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    pub official: BTreeSet<NaiveDate>,
    pub custom: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    pub fn effective(&self) -> BTreeSet<NaiveDate> {
        self.official.union(&self.custom).copied().collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.classify(date).is_some()
    }

    /// Official wins when a date is listed in both sources
    pub fn classify(&self, date: NaiveDate) -> Option<HolidayKind> {
        if self.official.contains(&date) {
            Some(HolidayKind::Official)
        } else if self.custom.contains(&date) {
            Some(HolidayKind::Custom)
        } else {
            None
        }
    }

    /// Every date of `year` with its classification
    pub fn preview(&self, year: i32) -> Vec<CalendarDay> {
        let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            return Vec::new();
        };

        first
            .iter_days()
            .take_while(|date| date.year() == year)
            .map(|date| {
                let kind = match self.classify(date) {
                    Some(HolidayKind::Official) => DayKind::OfficialHoliday,
                    Some(HolidayKind::Custom) => DayKind::CustomHoliday,
                    None if is_weekend(date) => DayKind::Weekend,
                    None => DayKind::WorkingDay,
                };
                CalendarDay {
                    date,
                    weekday: date.weekday().to_string(),
                    kind,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    OfficialHoliday,
    CustomHoliday,
    Weekend,
    WorkingDay,
}

impl DayKind {
    pub fn is_business_day(&self) -> bool {
        matches!(self, DayKind::WorkingDay)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            DayKind::OfficialHoliday => "Official holiday",
            DayKind::CustomHoliday => "Custom holiday",
            DayKind::Weekend => "Weekend",
            DayKind::WorkingDay => "Working day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: String,
    pub kind: DayKind,
}
