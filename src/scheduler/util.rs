use super::Assignment;

/// Nombre de cellules affectées parmi des indices plats.
pub(super) fn count_assigned(assignment: &Assignment, cells: &[usize]) -> i64 {
    cells.iter().filter(|&&idx| assignment.value_at(idx)).count() as i64
}
