use crate::scheduler::PlanError;
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Période planifiée : `days` jours à partir du 1er du mois.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
    pub days: u32,
}

impl Default for Period {
    fn default() -> Self {
        Self {
            year: 2023,
            month: 11,
            days: 30,
        }
    }
}

impl Period {
    pub fn new(year: i32, month: u32, days: u32) -> Result<Self, PlanError> {
        let period = Self { year, month, days };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if !(1..=12).contains(&self.month) {
            return Err(PlanError::Config(format!(
                "month must be within 1..=12 (got {})",
                self.month
            )));
        }
        if self.days == 0 {
            return Err(PlanError::Config("period length must be > 0".into()));
        }
        let month_len = self.month_length().ok_or_else(|| {
            PlanError::Config(format!("invalid year/month {}-{}", self.year, self.month))
        })?;
        if self.days > month_len {
            return Err(PlanError::Config(format!(
                "period length {} exceeds the {} days of {}-{:02}",
                self.days, month_len, self.year, self.month
            )));
        }
        Ok(())
    }

    /// Nombre de jours du mois calendaire.
    pub fn month_length(&self) -> Option<u32> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)?
        };
        u32::try_from(next.signed_duration_since(first).num_days()).ok()
    }

    /// Date du jour `day` (1-based) de la période.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.days {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn contains_month_of(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn len(&self) -> usize {
        self.days as usize
    }

    pub fn is_empty(&self) -> bool {
        self.days == 0
    }
}

/// Pondération de l'objectif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    /// Poids d'un jour ouvré.
    pub weekday: i64,
    /// Poids d'un jour de week-end ou férié.
    pub weekend_holiday: i64,
    /// Ajustement d'un congé souhaité tombant un week-end/férié.
    pub requested_off_penalty: i64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            weekday: 7,
            weekend_holiday: 10,
            requested_off_penalty: -5,
        }
    }
}

/// Jeu de jours fériés appliqué au classement des dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    #[default]
    Japan,
    None,
}

/// Jour férié supplémentaire (fermeture d'entreprise, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraHoliday {
    pub date: NaiveDate,
    pub name: String,
}

/// Noms des colonnes du tableau d'entrée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub name: String,
    pub forced_rest: Vec<String>,
    pub requested_off: Vec<String>,
    /// Préfixe des colonnes de disponibilité du matin (`朝番1`, `朝番2`, …).
    pub morning_prefix: String,
    /// Titre de la colonne des noms dans le tableau produit.
    pub output_name_title: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        let mut forced_rest = vec!["特別休".to_string()];
        forced_rest.extend((1..=9).map(|n| format!("有給{n}")));
        Self {
            name: "申請者".into(),
            forced_rest,
            requested_off: (1..=3).map(|n| format!("希望休{n}")).collect(),
            morning_prefix: "朝番".into(),
            output_name_title: "名前".into(),
        }
    }
}

impl ColumnLayout {
    pub fn morning_column(&self, day: u32) -> String {
        format!("{}{day}", self.morning_prefix)
    }
}

/// Configuration complète d'une résolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub period: Period,
    pub workdays_per_employee: u32,
    pub min_staffing: u32,
    pub weights: Weights,
    pub jurisdiction: Jurisdiction,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_holidays: Vec<ExtraHoliday>,
    pub columns: ColumnLayout,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            period: Period::default(),
            workdays_per_employee: 20,
            min_staffing: 2,
            weights: Weights::default(),
            jurisdiction: Jurisdiction::default(),
            extra_holidays: Vec::new(),
            columns: ColumnLayout::default(),
        }
    }
}

impl PlanConfig {
    /// Contrôles indépendants du roster.
    pub fn validate(&self) -> Result<(), PlanError> {
        self.period.validate()?;
        if self.workdays_per_employee > self.period.days {
            return Err(PlanError::Config(format!(
                "workdays per employee ({}) exceeds period length ({})",
                self.workdays_per_employee, self.period.days
            )));
        }
        if self.columns.name.trim().is_empty() {
            return Err(PlanError::Config("name column cannot be empty".into()));
        }
        if self.columns.morning_prefix.is_empty() {
            return Err(PlanError::Config("morning column prefix cannot be empty".into()));
        }
        Ok(())
    }

    /// Contrôles dépendant du nombre d'employés.
    pub fn validate_roster(&self, employees: usize) -> Result<(), PlanError> {
        if employees == 0 {
            return Err(PlanError::Config("roster is empty".into()));
        }
        if self.min_staffing as usize > employees {
            return Err(PlanError::Config(format!(
                "minimum staffing ({}) exceeds roster size ({employees})",
                self.min_staffing
            )));
        }
        Ok(())
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<PlanConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: PlanConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &PlanConfig) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    crate::io::write_atomic(path.as_ref(), json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_rejects_days_beyond_month() {
        assert!(Period::new(2023, 11, 30).is_ok());
        assert!(Period::new(2023, 11, 31).is_err());
        assert!(Period::new(2024, 2, 29).is_ok());
        assert!(Period::new(2023, 13, 5).is_err());
        assert!(Period::new(2023, 1, 0).is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: PlanConfig =
            serde_json::from_str(r#"{"period":{"year":2024,"month":2,"days":29},"min_staffing":3}"#)
                .unwrap();
        assert_eq!(cfg.period.days, 29);
        assert_eq!(cfg.min_staffing, 3);
        assert_eq!(cfg.workdays_per_employee, 20);
        assert_eq!(cfg.columns.requested_off.len(), 3);
        assert_eq!(cfg.columns.forced_rest.len(), 10);
    }

    #[test]
    fn quota_larger_than_period_is_rejected() {
        let cfg = PlanConfig {
            period: Period::new(2023, 11, 10).unwrap(),
            ..PlanConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }
}
