use super::Assignment;
use crate::calendar::PeriodCalendar;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Valeur d'une case du planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ShiftCell {
    Off = 0,
    Work = 1,
    Morning = 2,
}

impl ShiftCell {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl From<ShiftCell> for u8 {
    fn from(cell: ShiftCell) -> Self {
        cell.value()
    }
}

impl TryFrom<u8> for ShiftCell {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(ShiftCell::Off),
            1 => Ok(ShiftCell::Work),
            2 => Ok(ShiftCell::Morning),
            other => Err(format!("invalid shift cell value {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRow {
    pub name: String,
    pub cells: Vec<ShiftCell>,
}

/// Planning produit : ligne d'en-tête calendaire puis une ligne par employé.
///
/// La première colonne porte le nom (vide sur la ligne d'en-tête).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTable {
    pub header: Vec<String>,
    pub rows: Vec<ShiftRow>,
}

impl ShiftTable {
    pub fn days(&self) -> usize {
        self.header.len().saturating_sub(1)
    }

    /// Grille rectangulaire de texte (`D+1` colonnes, `E+1` lignes).
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.header.clone());
        for row in &self.rows {
            let mut line = Vec::with_capacity(row.cells.len() + 1);
            line.push(row.name.clone());
            line.extend(row.cells.iter().map(|c| c.value().to_string()));
            out.push(line);
        }
        out
    }
}

/// Convertit l'affectation en planning ; `2` = affecté et apte au matin.
pub fn materialize(
    names: &[String],
    assignment: &Assignment,
    morning_eligible: &Grid<bool>,
    calendar: &PeriodCalendar,
) -> ShiftTable {
    let mut header = Vec::with_capacity(calendar.len() + 1);
    header.push(String::new());
    header.extend(calendar.labels());

    let rows = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells = (0..calendar.len())
                .map(|j| {
                    let worked = i < assignment.employees()
                        && j < assignment.days()
                        && assignment.is_assigned(i, j);
                    match (worked, *morning_eligible.get(i, j)) {
                        (true, true) => ShiftCell::Morning,
                        (true, false) => ShiftCell::Work,
                        (false, _) => ShiftCell::Off,
                    }
                })
                .collect();
            ShiftRow {
                name: name.clone(),
                cells,
            }
        })
        .collect();

    ShiftTable { header, rows }
}
