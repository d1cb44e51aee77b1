#![forbid(unsafe_code)]
//! Shiftplan : planification mensuelle d'équipe par programmation linéaire.
//!
//! - Entrée : tableau CSV/XLSX (congés, congés souhaités, aptitude matin).
//! - Une variable binaire par (employé, jour), résolue avec `good_lp`.
//! - Sortie : planning 0/1/2 avec en-tête calendaire (fériés japonais).
//! - Configuration explicite (JSON), aucun état global.

pub mod attendance;
pub mod calendar;
pub mod config;
pub mod grid;
pub mod io;
pub mod model;
pub mod scheduler;

pub use attendance::{extract_all, extract_employee, Attendance, AttendanceMask};
pub use calendar::{CalendarClass, DayInfo, HolidayTable, PeriodCalendar};
pub use config::{
    export_config_json, load_config_from_file, ColumnLayout, ExtraHoliday, Jurisdiction, Period,
    PlanConfig, Weights,
};
pub use grid::Grid;
pub use model::{CellValue, EmployeeRecord};
pub use scheduler::{
    check_assignment, materialize, solve, Assignment, ErrorKind, MicroLpBackend, ModelOptions,
    PlanError, Planner, ShiftCell, ShiftModel, ShiftRow, ShiftTable, Solution, SolveStatus,
    SolverBackend, Violation, ViolationKind,
};
