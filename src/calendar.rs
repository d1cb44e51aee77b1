//! Classement des dates : jour ouvré, week-end ou jour férié.
//!
//! - La table des fériés est construite une fois par résolution, pour une
//!   juridiction et une année, puis seulement lue.
//! - `PeriodCalendar` fige le classement de chaque jour de la période.

use crate::config::{ExtraHoliday, Jurisdiction, Period, PlanConfig};
use crate::scheduler::PlanError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Années couvertes par les règles japonaises.
pub const JAPAN_SUPPORTED_YEARS: RangeInclusive<i32> = 2000..=2099;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarClass {
    Weekday,
    Weekend,
    Holiday(String),
}

impl CalendarClass {
    pub fn is_weekend_or_holiday(&self) -> bool {
        !matches!(self, CalendarClass::Weekday)
    }

    pub fn holiday_name(&self) -> Option<&str> {
        match self {
            CalendarClass::Holiday(name) => Some(name),
            _ => None,
        }
    }
}

/// Table des jours fériés, indexée par date exacte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayTable {
    days: BTreeMap<NaiveDate, String>,
}

impl HolidayTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn for_jurisdiction(jurisdiction: Jurisdiction, year: i32) -> Result<Self, PlanError> {
        match jurisdiction {
            Jurisdiction::None => Ok(Self::empty()),
            Jurisdiction::Japan => japan::holidays(year),
        }
    }

    /// Table de la configuration : juridiction + fériés supplémentaires.
    pub fn from_config(config: &PlanConfig) -> Result<Self, PlanError> {
        let mut table = Self::for_jurisdiction(config.jurisdiction, config.period.year)?;
        table.extend(config.extra_holidays.iter().cloned());
        Ok(table)
    }

    pub fn insert<S: Into<String>>(&mut self, date: NaiveDate, name: S) {
        self.days.insert(date, name.into());
    }

    pub fn name(&self, date: NaiveDate) -> Option<&str> {
        self.days.get(&date).map(String::as_str)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
        self.days.iter().map(|(d, n)| (*d, n.as_str()))
    }

    /// Classe une date ; un férié tombant un week-end reste un férié.
    pub fn classify(&self, date: NaiveDate) -> CalendarClass {
        if let Some(name) = self.name(date) {
            return CalendarClass::Holiday(name.to_string());
        }
        if is_weekend(date) {
            CalendarClass::Weekend
        } else {
            CalendarClass::Weekday
        }
    }
}

impl Extend<ExtraHoliday> for HolidayTable {
    fn extend<I: IntoIterator<Item = ExtraHoliday>>(&mut self, iter: I) {
        for extra in iter {
            self.days.insert(extra.date, extra.name);
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Jour de la période avec son classement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayInfo {
    pub date: NaiveDate,
    pub class: CalendarClass,
}

impl DayInfo {
    /// Libellé d'en-tête : `"3 (文化の日)"` ou `"4 (Sat)"`.
    pub fn label(&self) -> String {
        match &self.class {
            CalendarClass::Holiday(name) => format!("{} ({})", self.date.day(), name),
            _ => format!("{} ({})", self.date.day(), self.date.format("%a")),
        }
    }
}

/// Classement figé de tous les jours d'une période.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodCalendar {
    period: Period,
    days: Vec<DayInfo>,
}

impl PeriodCalendar {
    pub fn new(period: Period, holidays: &HolidayTable) -> Result<Self, PlanError> {
        period.validate()?;
        let mut days = Vec::with_capacity(period.len());
        for day in 1..=period.days {
            let date = period.date(day).ok_or_else(|| {
                PlanError::Config(format!(
                    "invalid date {}-{:02}-{:02}",
                    period.year, period.month, day
                ))
            })?;
            days.push(DayInfo {
                date,
                class: holidays.classify(date),
            });
        }
        Ok(Self { period, days })
    }

    pub fn from_config(config: &PlanConfig) -> Result<Self, PlanError> {
        let holidays = HolidayTable::from_config(config)?;
        Self::new(config.period, &holidays)
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Jour d'indice `index` (0-based).
    pub fn day(&self, index: usize) -> &DayInfo {
        &self.days[index]
    }

    /// Jour du mois `day` (1-based), s'il appartient à la période.
    pub fn day_of_month(&self, day: u32) -> Option<&DayInfo> {
        let idx = usize::try_from(day).ok()?.checked_sub(1)?;
        self.days.get(idx)
    }

    pub fn days(&self) -> &[DayInfo] {
        &self.days
    }

    pub fn labels(&self) -> Vec<String> {
        self.days.iter().map(DayInfo::label).collect()
    }
}

mod japan {
    use super::*;

    pub(super) fn holidays(year: i32) -> Result<HolidayTable, PlanError> {
        if !JAPAN_SUPPORTED_YEARS.contains(&year) {
            return Err(PlanError::Config(format!(
                "japanese holidays are only known for {}..={} (got {year})",
                JAPAN_SUPPORTED_YEARS.start(),
                JAPAN_SUPPORTED_YEARS.end()
            )));
        }
        let d = |m: u32, day: u32| ymd(year, m, day);
        let mut base: BTreeMap<NaiveDate, &'static str> = BTreeMap::new();

        base.insert(d(1, 1)?, "元日");
        base.insert(nth_monday(year, 1, 2)?, "成人の日");
        base.insert(d(2, 11)?, "建国記念の日");
        if year >= 2020 {
            base.insert(d(2, 23)?, "天皇誕生日");
        }
        base.insert(d(3, vernal_equinox_day(year))?, "春分の日");
        base.insert(d(4, 29)?, if year >= 2007 { "昭和の日" } else { "みどりの日" });
        base.insert(d(5, 3)?, "憲法記念日");
        if year >= 2007 {
            base.insert(d(5, 4)?, "みどりの日");
        }
        base.insert(d(5, 5)?, "こどもの日");

        let marine = match year {
            2020 => d(7, 23)?,
            2021 => d(7, 22)?,
            y if y >= 2003 => nth_monday(year, 7, 3)?,
            _ => d(7, 20)?,
        };
        base.insert(marine, "海の日");

        if year >= 2016 {
            let mountain = match year {
                2020 => d(8, 10)?,
                2021 => d(8, 8)?,
                _ => d(8, 11)?,
            };
            base.insert(mountain, "山の日");
        }

        let aged = if year >= 2003 {
            nth_monday(year, 9, 3)?
        } else {
            d(9, 15)?
        };
        base.insert(aged, "敬老の日");
        base.insert(d(9, autumnal_equinox_day(year))?, "秋分の日");

        match year {
            2020 => {
                base.insert(d(7, 24)?, "スポーツの日");
            }
            2021 => {
                base.insert(d(7, 23)?, "スポーツの日");
            }
            y if y > 2021 => {
                base.insert(nth_monday(year, 10, 2)?, "スポーツの日");
            }
            _ => {
                base.insert(nth_monday(year, 10, 2)?, "体育の日");
            }
        }

        base.insert(d(11, 3)?, "文化の日");
        base.insert(d(11, 23)?, "勤労感謝の日");
        if year <= 2018 {
            base.insert(d(12, 23)?, "天皇誕生日");
        }
        if year == 2019 {
            base.insert(d(5, 1)?, "天皇の即位の日");
            base.insert(d(10, 22)?, "即位礼正殿の儀が行われる日");
        }

        // 国民の休日 : jour ordinaire (hors dimanche) pris entre deux fériés.
        let sandwiched: Vec<NaiveDate> = base
            .keys()
            .filter_map(|day| {
                let next = *day + Duration::days(1);
                let after = next + Duration::days(1);
                let free = !base.contains_key(&next) && next.weekday() != Weekday::Sun;
                (free && base.contains_key(&after)).then_some(next)
            })
            .collect();
        for day in sandwiched {
            base.insert(day, "国民の休日");
        }

        // 振替休日 : un férié du dimanche reporte au prochain jour non férié.
        let mut substitutes = Vec::new();
        for day in base.keys().filter(|day| day.weekday() == Weekday::Sun) {
            let mut candidate = *day + Duration::days(1);
            while base.contains_key(&candidate) {
                candidate += Duration::days(1);
            }
            substitutes.push(candidate);
        }

        let mut table = HolidayTable::empty();
        for (day, name) in base {
            table.insert(day, name);
        }
        for day in substitutes {
            if day.year() == year {
                table.insert(day, "振替休日");
            }
        }
        Ok(table)
    }

    fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, PlanError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| PlanError::Config(format!("invalid date {year}-{month:02}-{day:02}")))
    }

    fn nth_monday(year: i32, month: u32, n: u8) -> Result<NaiveDate, PlanError> {
        NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, n).ok_or_else(|| {
            PlanError::Config(format!("no monday #{n} in {year}-{month:02}"))
        })
    }

    fn equinox_day(year: i32, base: f64) -> u32 {
        let offset = f64::from(year - 1980);
        let leap = f64::from((year - 1980) / 4);
        (base + 0.242194 * offset - leap).floor() as u32
    }

    pub(super) fn vernal_equinox_day(year: i32) -> u32 {
        equinox_day(year, 20.8431)
    }

    pub(super) fn autumnal_equinox_day(year: i32) -> u32 {
        equinox_day(year, 23.2488)
    }
}
