use serde::{Deserialize, Serialize};

/// Tableau dense (employé × jour), stockage plat ligne par ligne.
///
/// La cellule `(i, j)` vit à l'indice `i * days + j`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    employees: usize,
    days: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(employees: usize, days: usize, value: T) -> Self {
        Self {
            employees,
            days,
            cells: vec![value; employees * days],
        }
    }
}

impl<T> Grid<T> {
    pub fn from_fn<F>(employees: usize, days: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut cells = Vec::with_capacity(employees * days);
        for i in 0..employees {
            for j in 0..days {
                cells.push(f(i, j));
            }
        }
        Self {
            employees,
            days,
            cells,
        }
    }

    /// Assemble des lignes de même longueur `days`.
    pub fn from_rows(days: usize, rows: Vec<Vec<T>>) -> Option<Self> {
        if rows.iter().any(|r| r.len() != days) {
            return None;
        }
        let employees = rows.len();
        let cells = rows.into_iter().flatten().collect();
        Some(Self {
            employees,
            days,
            cells,
        })
    }

    pub fn employees(&self) -> usize {
        self.employees
    }

    pub fn days(&self) -> usize {
        self.days
    }

    #[inline]
    pub fn index(&self, employee: usize, day: usize) -> usize {
        debug_assert!(employee < self.employees && day < self.days);
        employee * self.days + day
    }

    #[inline]
    pub fn get(&self, employee: usize, day: usize) -> &T {
        &self.cells[self.index(employee, day)]
    }

    #[inline]
    pub fn set(&mut self, employee: usize, day: usize, value: T) {
        let idx = self.index(employee, day);
        self.cells[idx] = value;
    }

    pub fn row(&self, employee: usize) -> &[T] {
        let start = employee * self.days;
        &self.cells[start..start + self.days]
    }

    /// Itère la colonne `day` (un élément par employé).
    pub fn column(&self, day: usize) -> impl Iterator<Item = &T> + '_ {
        (0..self.employees).map(move |i| self.get(i, day))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }
}
