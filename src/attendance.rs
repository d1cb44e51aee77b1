//! Extraction des contraintes de présence à partir des lignes brutes.
//!
//! Pour chaque employé et chaque jour : repos imposé (congés), ajustement
//! de préférence (congé souhaité un week-end/férié) et aptitude au poste du
//! matin.

use crate::calendar::PeriodCalendar;
use crate::config::{ColumnLayout, Weights};
use crate::grid::Grid;
use crate::model::{CellValue, EmployeeRecord};
use crate::scheduler::PlanError;
use chrono::Datelike;
use std::collections::HashSet;

/// Masques d'un seul employé, un élément par jour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceMask {
    pub forced_rest: Vec<bool>,
    pub pref_adjust: Vec<i64>,
    pub morning_eligible: Vec<bool>,
}

impl AttendanceMask {
    pub fn empty(days: usize) -> Self {
        Self {
            forced_rest: vec![false; days],
            pref_adjust: vec![0; days],
            morning_eligible: vec![false; days],
        }
    }
}

/// Masques de tout le roster, stockés en grilles denses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub names: Vec<String>,
    pub forced_rest: Grid<bool>,
    pub pref_adjust: Grid<i64>,
    pub morning_eligible: Grid<bool>,
}

impl Attendance {
    pub fn employees(&self) -> usize {
        self.names.len()
    }

    pub fn days(&self) -> usize {
        self.forced_rest.days()
    }

    /// Assemble des masques individuels (tous de même longueur).
    pub fn from_masks(days: usize, entries: Vec<(String, AttendanceMask)>) -> Option<Self> {
        let mut names = Vec::with_capacity(entries.len());
        let mut rest = Vec::with_capacity(entries.len());
        let mut pref = Vec::with_capacity(entries.len());
        let mut morning = Vec::with_capacity(entries.len());
        for (name, mask) in entries {
            names.push(name);
            rest.push(mask.forced_rest);
            pref.push(mask.pref_adjust);
            morning.push(mask.morning_eligible);
        }
        Some(Self {
            names,
            forced_rest: Grid::from_rows(days, rest)?,
            pref_adjust: Grid::from_rows(days, pref)?,
            morning_eligible: Grid::from_rows(days, morning)?,
        })
    }
}

/// Extrait nom et masques d'une ligne.
pub fn extract_employee(
    record: &EmployeeRecord,
    layout: &ColumnLayout,
    calendar: &PeriodCalendar,
    weights: &Weights,
) -> Result<(String, AttendanceMask), PlanError> {
    let name = record
        .text(&layout.name)
        .ok_or_else(|| PlanError::MissingName {
            row: record.row,
            column: layout.name.clone(),
        })?;

    let days = calendar.len();
    let mut mask = AttendanceMask::empty(days);

    for column in &layout.forced_rest {
        if let Some(day) = day_index(record, column, &name, calendar)? {
            mask.forced_rest[day] = true;
        }
    }

    for column in &layout.requested_off {
        if let Some(day) = day_index(record, column, &name, calendar)? {
            // classement sur la période configurée, pas sur la date saisie
            if calendar.day(day).class.is_weekend_or_holiday() {
                mask.pref_adjust[day] = weights.requested_off_penalty;
            }
        }
    }

    for (idx, eligible) in mask.morning_eligible.iter_mut().enumerate() {
        let column = layout.morning_column(idx as u32 + 1);
        *eligible = record.get(&column).is_some_and(CellValue::is_truthy);
    }

    Ok((name, mask))
}

/// Extrait tout le roster, dans l'ordre des lignes.
pub fn extract_all(
    records: &[EmployeeRecord],
    layout: &ColumnLayout,
    calendar: &PeriodCalendar,
    weights: &Weights,
) -> Result<Attendance, PlanError> {
    let mut entries = Vec::with_capacity(records.len());
    let mut seen = HashSet::new();
    for record in records {
        let (name, mask) = extract_employee(record, layout, calendar, weights)?;
        if !seen.insert(name.clone()) {
            tracing::warn!(employee = %name, row = record.row, "duplicate employee name");
        }
        entries.push((name, mask));
    }
    Attendance::from_masks(calendar.len(), entries).ok_or_else(|| {
        PlanError::Other(anyhow::anyhow!("attendance masks have inconsistent lengths"))
    })
}

/// Indice 0-based du jour désigné par une colonne date, si présente.
fn day_index(
    record: &EmployeeRecord,
    column: &str,
    employee: &str,
    calendar: &PeriodCalendar,
) -> Result<Option<usize>, PlanError> {
    let Some(value) = record.get(column) else {
        return Ok(None);
    };
    let date = value.as_date().ok_or_else(|| PlanError::InvalidDate {
        employee: employee.to_string(),
        field: column.to_string(),
        value: value.as_text().unwrap_or_default(),
    })?;

    let period = calendar.period();
    if !period.contains_month_of(date) {
        tracing::warn!(
            employee,
            field = column,
            %date,
            "date outside the planned month, only its day-of-month is used"
        );
    }

    let day = date.day();
    if day == 0 || day > period.days {
        return Err(PlanError::DayOutOfRange {
            employee: employee.to_string(),
            field: column.to_string(),
            day,
            days: period.days,
        });
    }
    Ok(Some(day as usize - 1))
}
