use super::{Assignment, ConstraintKind, ShiftModel, Violation, ViolationKind};

/// Liste les contraintes du modèle que l'affectation ne respecte pas.
pub fn check_assignment(model: &ShiftModel, assignment: &Assignment) -> Vec<Violation> {
    let mut out = Vec::new();

    for (idx, constraint) in model.constraints().iter().enumerate() {
        if constraint.is_satisfied_by(assignment) {
            continue;
        }
        let observed = constraint.lhs(assignment);
        let kind = match constraint.kind {
            ConstraintKind::Quota { employee } => ViolationKind::Quota {
                employee,
                worked: observed,
            },
            ConstraintKind::Staffing { day } => ViolationKind::Staffing {
                day,
                staffed: observed,
            },
            ConstraintKind::ForcedRest { employee, day } => {
                ViolationKind::ForcedRest { employee, day }
            }
            ConstraintKind::MorningCoverage { day } => ViolationKind::MorningCoverage { day },
        };
        out.push(Violation {
            constraint: idx,
            kind,
        });
    }

    out
}
