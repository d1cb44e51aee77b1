mod assignment;
mod builder;
mod conflicts;
mod materialize;
mod solve;
mod types;
mod util;

pub use assignment::Assignment;
pub use builder::{ConstraintKind, LinearConstraint, ModelOptions, Sense, ShiftModel};
pub use conflicts::check_assignment;
pub use materialize::{materialize, ShiftCell, ShiftRow, ShiftTable};
pub use solve::{solve, MicroLpBackend, Solution, SolverBackend};
pub use types::{ErrorKind, PlanError, SolveStatus, Violation, ViolationKind};

use crate::attendance::{self, Attendance};
use crate::calendar::PeriodCalendar;
use crate::config::PlanConfig;
use crate::model::EmployeeRecord;

/// Planificateur : configuration validée + calendrier de la période.
///
/// Les étapes s'enchaînent par types (`Extracted` → `Modeled` → `Solved`),
/// une étape ne peut donc pas être sautée.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlanConfig,
    calendar: PeriodCalendar,
}

impl Planner {
    /// Valide la configuration et construit le calendrier de la période.
    pub fn new(config: PlanConfig) -> Result<Self, PlanError> {
        config.validate()?;
        let calendar = PeriodCalendar::from_config(&config)?;
        Ok(Self { config, calendar })
    }

    /// Variante avec un calendrier fourni (autre juridiction, tests).
    pub fn with_calendar(config: PlanConfig, calendar: PeriodCalendar) -> Result<Self, PlanError> {
        config.validate()?;
        if calendar.period() != config.period {
            return Err(PlanError::Config(
                "calendar period does not match the configured period".into(),
            ));
        }
        Ok(Self { config, calendar })
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn calendar(&self) -> &PeriodCalendar {
        &self.calendar
    }

    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            workdays_per_employee: self.config.workdays_per_employee,
            min_staffing: self.config.min_staffing,
            weights: self.config.weights,
        }
    }

    pub fn extract(&self, records: &[EmployeeRecord]) -> Result<Extracted<'_>, PlanError> {
        let attendance = attendance::extract_all(
            records,
            &self.config.columns,
            &self.calendar,
            &self.config.weights,
        )?;
        tracing::info!(
            employees = attendance.employees(),
            days = attendance.days(),
            "attendance extracted"
        );
        Ok(Extracted {
            planner: self,
            attendance,
        })
    }

    /// Chaîne complète : extraction, modèle, résolution, planning.
    pub fn plan(
        &self,
        records: &[EmployeeRecord],
        backend: &dyn SolverBackend,
    ) -> Result<ShiftTable, PlanError> {
        let solved = self.extract(records)?.build_model()?.solve(backend)?;
        Ok(solved.materialize())
    }
}

/// Masques extraits, modèle pas encore construit.
#[derive(Debug)]
pub struct Extracted<'p> {
    planner: &'p Planner,
    attendance: Attendance,
}

impl<'p> Extracted<'p> {
    pub fn attendance(&self) -> &Attendance {
        &self.attendance
    }

    /// Vérifie la taille du roster puis construit le modèle.
    pub fn build_model(self) -> Result<Modeled<'p>, PlanError> {
        self.planner
            .config
            .validate_roster(self.attendance.employees())?;
        let model = ShiftModel::build(
            &self.attendance,
            &self.planner.calendar,
            &self.planner.model_options(),
        );
        tracing::info!(
            variables = model.variable_count(),
            constraints = model.constraints().len(),
            "model ready"
        );
        Ok(Modeled {
            planner: self.planner,
            attendance: self.attendance,
            model,
        })
    }
}

#[derive(Debug)]
pub struct Modeled<'p> {
    planner: &'p Planner,
    attendance: Attendance,
    model: ShiftModel,
}

impl<'p> Modeled<'p> {
    pub fn attendance(&self) -> &Attendance {
        &self.attendance
    }

    pub fn model(&self) -> &ShiftModel {
        &self.model
    }

    pub fn solve(self, backend: &dyn SolverBackend) -> Result<Solved<'p>, PlanError> {
        let solution = solve::solve(&self.model, backend)?;
        Ok(Solved {
            planner: self.planner,
            attendance: self.attendance,
            model: self.model,
            solution,
        })
    }
}

#[derive(Debug)]
pub struct Solved<'p> {
    planner: &'p Planner,
    attendance: Attendance,
    model: ShiftModel,
    solution: Solution,
}

impl Solved<'_> {
    pub fn attendance(&self) -> &Attendance {
        &self.attendance
    }

    pub fn model(&self) -> &ShiftModel {
        &self.model
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn materialize(&self) -> ShiftTable {
        materialize::materialize(
            &self.attendance.names,
            &self.solution.assignment,
            &self.attendance.morning_eligible,
            &self.planner.calendar,
        )
    }
}
