use super::{conflicts, Assignment, PlanError, Sense, ShiftModel, SolveStatus};
use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution as _,
    SolverModel, Variable,
};

/// Point d'extension : moteur PLNE utilisé pour résoudre un `ShiftModel`.
///
/// L'appel est bloquant et sans délai maximal ; un appelant qui veut borner
/// la latence enveloppe l'appel lui-même.
pub trait SolverBackend {
    fn name(&self) -> &'static str;
    /// Renvoie l'affectation optimale, ou le statut obtenu à la place.
    fn solve(&self, model: &ShiftModel) -> Result<Assignment, SolveStatus>;
}

/// Solveur pur Rust `microlp`, via `good_lp`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicroLpBackend;

impl SolverBackend for MicroLpBackend {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, model: &ShiftModel) -> Result<Assignment, SolveStatus> {
        let mut vars = ProblemVariables::new();
        let x: Vec<Variable> = (0..model.variable_count())
            .map(|_| vars.add(variable().binary()))
            .collect();

        let objective = model
            .objective_coefficients()
            .iter()
            .zip(&x)
            .fold(Expression::from(0.0), |acc, (w, v)| acc + (*w as f64) * *v);
        let mut problem = vars.maximise(objective).using(microlp);

        for c in model.constraints() {
            let lhs = c
                .cells
                .iter()
                .fold(Expression::from(0.0), |acc, &idx| acc + x[idx]);
            let rhs = c.rhs as f64;
            problem = problem.with(match c.sense {
                Sense::Eq => constraint!(lhs == rhs),
                Sense::Ge => constraint!(lhs >= rhs),
            });
        }

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = x.iter().map(|v| solution.value(*v)).collect();
                Ok(Assignment::from_values(
                    model.employees(),
                    model.days(),
                    &values,
                ))
            }
            Err(ResolutionError::Infeasible) => Err(SolveStatus::Infeasible),
            Err(ResolutionError::Unbounded) => Err(SolveStatus::Unbounded),
            Err(err) => {
                tracing::warn!(%err, "solver stopped without a solution");
                Err(SolveStatus::NotSolved)
            }
        }
    }
}

/// Affectation optimale et valeur de l'objectif.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub status: SolveStatus,
    pub assignment: Assignment,
    pub objective: i64,
}

/// Résout le modèle ; tout statut autre qu'optimal est un échec.
pub fn solve(model: &ShiftModel, backend: &dyn SolverBackend) -> Result<Solution, PlanError> {
    tracing::info!(
        backend = backend.name(),
        variables = model.variable_count(),
        constraints = model.constraints().len(),
        "solving"
    );
    let assignment = match backend.solve(model) {
        Ok(a) => a,
        Err(status) => {
            tracing::info!(%status, "no optimal schedule");
            return Err(PlanError::SolveFailure(status));
        }
    };

    if assignment.employees() != model.employees() || assignment.days() != model.days() {
        tracing::error!(
            expected_employees = model.employees(),
            expected_days = model.days(),
            "backend returned an assignment of the wrong shape"
        );
        return Err(PlanError::SolveFailure(SolveStatus::NotSolved));
    }

    let violations = conflicts::check_assignment(model, &assignment);
    if !violations.is_empty() {
        for v in &violations {
            tracing::error!(constraint = v.constraint, kind = ?v.kind, "violated constraint");
        }
        return Err(PlanError::SolveFailure(SolveStatus::NotSolved));
    }

    let objective = model.objective_value(&assignment);
    tracing::info!(objective, "optimal schedule found");
    Ok(Solution {
        status: SolveStatus::Optimal,
        assignment,
        objective,
    })
}
