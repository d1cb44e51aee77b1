//! Formulation du problème d'affectation, indépendante du solveur.

use super::{util, Assignment};
use crate::attendance::Attendance;
use crate::calendar::PeriodCalendar;
use crate::config::Weights;
use crate::grid::Grid;

/// Paramètres structurels du modèle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOptions {
    pub workdays_per_employee: u32,
    pub min_staffing: u32,
    pub weights: Weights,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            workdays_per_employee: 20,
            min_staffing: 2,
            weights: Weights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Quota { employee: usize },
    Staffing { day: usize },
    ForcedRest { employee: usize, day: usize },
    MorningCoverage { day: usize },
}

/// `Σ x[cells] (sense) rhs`, les cellules étant des indices plats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub cells: Vec<usize>,
    pub sense: Sense,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn lhs(&self, assignment: &Assignment) -> i64 {
        util::count_assigned(assignment, &self.cells)
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        let lhs = self.lhs(assignment);
        match self.sense {
            Sense::Eq => lhs == self.rhs,
            Sense::Ge => lhs >= self.rhs,
        }
    }
}

/// Modèle PLNE : une variable binaire par (employé, jour).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftModel {
    weights: Grid<i64>,
    constraints: Vec<LinearConstraint>,
}

impl ShiftModel {
    /// Construit objectif et contraintes, dans l'ordre : quota, effectif
    /// minimal, repos imposés, couverture du matin.
    pub fn build(
        attendance: &Attendance,
        calendar: &PeriodCalendar,
        opts: &ModelOptions,
    ) -> Self {
        let employees = attendance.employees();
        let days = calendar.len();
        let w = opts.weights;

        let weights = Grid::from_fn(employees, days, |i, j| {
            let base = if calendar.day(j).class.is_weekend_or_holiday() {
                w.weekend_holiday
            } else {
                w.weekday
            };
            base + *attendance.pref_adjust.get(i, j)
        });

        let index = |i: usize, j: usize| i * days + j;
        let mut constraints = Vec::with_capacity(employees + 2 * days);

        for i in 0..employees {
            constraints.push(LinearConstraint {
                kind: ConstraintKind::Quota { employee: i },
                cells: (0..days).map(|j| index(i, j)).collect(),
                sense: Sense::Eq,
                rhs: i64::from(opts.workdays_per_employee),
            });
        }

        for j in 0..days {
            constraints.push(LinearConstraint {
                kind: ConstraintKind::Staffing { day: j },
                cells: (0..employees).map(|i| index(i, j)).collect(),
                sense: Sense::Ge,
                rhs: i64::from(opts.min_staffing),
            });
        }

        for i in 0..employees {
            for j in 0..days {
                if *attendance.forced_rest.get(i, j) {
                    constraints.push(LinearConstraint {
                        kind: ConstraintKind::ForcedRest {
                            employee: i,
                            day: j,
                        },
                        cells: vec![index(i, j)],
                        sense: Sense::Eq,
                        rhs: 0,
                    });
                }
            }
        }

        for j in 0..days {
            let eligible: Vec<usize> = (0..employees)
                .filter(|&i| *attendance.morning_eligible.get(i, j))
                .map(|i| index(i, j))
                .collect();
            // jour sans personne apte : pas de contrainte
            if eligible.is_empty() {
                continue;
            }
            constraints.push(LinearConstraint {
                kind: ConstraintKind::MorningCoverage { day: j },
                cells: eligible,
                sense: Sense::Ge,
                rhs: 1,
            });
        }

        tracing::debug!(
            employees,
            days,
            constraints = constraints.len(),
            "model built"
        );

        Self {
            weights,
            constraints,
        }
    }

    pub fn employees(&self) -> usize {
        self.weights.employees()
    }

    pub fn days(&self) -> usize {
        self.weights.days()
    }

    pub fn variable_count(&self) -> usize {
        self.weights.as_slice().len()
    }

    pub fn weight(&self, employee: usize, day: usize) -> i64 {
        *self.weights.get(employee, day)
    }

    /// Coefficients de l'objectif, dans l'ordre des indices plats.
    pub fn objective_coefficients(&self) -> &[i64] {
        self.weights.as_slice()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective_value(&self, assignment: &Assignment) -> i64 {
        self.weights
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(idx, _)| assignment.value_at(*idx))
            .map(|(_, w)| *w)
            .sum()
    }

    pub fn is_feasible(&self, assignment: &Assignment) -> bool {
        self.constraints
            .iter()
            .all(|c| c.is_satisfied_by(assignment))
    }
}
