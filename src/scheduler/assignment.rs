use crate::grid::Grid;

/// Affectation binaire `x[i][j]` : l'employé `i` travaille le jour `j`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    cells: Grid<bool>,
}

impl Assignment {
    pub fn new(employees: usize, days: usize) -> Self {
        Self {
            cells: Grid::filled(employees, days, false),
        }
    }

    pub fn from_fn<F>(employees: usize, days: usize, f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        Self {
            cells: Grid::from_fn(employees, days, f),
        }
    }

    /// Lit des valeurs de variables relâchées ; tout ce qui n'est pas
    /// clairement à 1 (NaN compris) compte comme 0.
    pub fn from_values(employees: usize, days: usize, values: &[f64]) -> Self {
        Self::from_fn(employees, days, |i, j| {
            values
                .get(i * days + j)
                .is_some_and(|v| v.is_finite() && *v > 0.5)
        })
    }

    pub fn employees(&self) -> usize {
        self.cells.employees()
    }

    pub fn days(&self) -> usize {
        self.cells.days()
    }

    pub fn is_assigned(&self, employee: usize, day: usize) -> bool {
        *self.cells.get(employee, day)
    }

    pub fn set(&mut self, employee: usize, day: usize, worked: bool) {
        self.cells.set(employee, day, worked);
    }

    /// Valeur à l'indice plat `i * days + j`.
    pub fn value_at(&self, index: usize) -> bool {
        self.cells.as_slice()[index]
    }

    pub fn worked_days(&self, employee: usize) -> usize {
        self.cells.row(employee).iter().filter(|w| **w).count()
    }

    pub fn staffed(&self, day: usize) -> usize {
        self.cells.column(day).filter(|w| **w).count()
    }
}
