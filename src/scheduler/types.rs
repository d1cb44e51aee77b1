use std::fmt;
use thiserror::Error;

/// Statut rendu par le solveur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::NotSolved => "not_solved",
        })
    }
}

/// Famille d'erreur, pour l'appelant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Data,
    Solve,
    Configuration,
    Other,
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("row {row}: missing employee name (column {column})")]
    MissingName { row: usize, column: String },
    #[error("{employee}: field {field} is not a date ({value:?})")]
    InvalidDate {
        employee: String,
        field: String,
        value: String,
    },
    #[error("{employee}: field {field} resolves to day {day}, outside 1..={days}")]
    DayOutOfRange {
        employee: String,
        field: String,
        day: u32,
        days: u32,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("no optimal schedule found (solver status: {0})")]
    SolveFailure(SolveStatus),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::MissingName { .. }
            | PlanError::InvalidDate { .. }
            | PlanError::DayOutOfRange { .. } => ErrorKind::Data,
            PlanError::Config(_) => ErrorKind::Configuration,
            PlanError::SolveFailure(_) => ErrorKind::Solve,
            PlanError::Other(_) => ErrorKind::Other,
        }
    }
}

/// Contrainte violée par une affectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Nombre de jours travaillés différent du quota.
    Quota { employee: usize, worked: i64 },
    /// Effectif du jour sous le minimum.
    Staffing { day: usize, staffed: i64 },
    /// Affecté un jour de repos imposé.
    ForcedRest { employee: usize, day: usize },
    /// Aucun employé apte au matin affecté ce jour.
    MorningCoverage { day: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Position de la contrainte dans le modèle.
    pub constraint: usize,
    pub kind: ViolationKind,
}
