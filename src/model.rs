use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Valeur brute d'une cellule du tableau d'entrée.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    /// Type une cellule texte (CSV) : vide, booléen, nombre, date ou texte.
    pub fn from_text(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Empty;
        }
        if let Some(b) = parse_bool(s) {
            return CellValue::Bool(b);
        }
        if let Ok(n) = s.parse::<f64>() {
            return CellValue::Number(n);
        }
        if let Some(date) = parse_date(s) {
            return CellValue::Date(date);
        }
        CellValue::Text(s.to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// Vrai seulement pour `1` / `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n == 1.0,
            CellValue::Text(s) => parse_bool(s.trim()) == Some(true),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Date(d) => Some(d.to_string()),
            CellValue::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Some(true),
        "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Accepte `2023-11-05`, `2023/11/05`, avec ou sans heure.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Ligne brute d'un employé : nom de colonne → valeur.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Numéro de ligne dans la source (1 = première ligne de données).
    pub row: usize,
    pub fields: BTreeMap<String, CellValue>,
    /// Texte source (rogné) des cellules lues comme texte.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source: BTreeMap<String, String>,
}

impl EmployeeRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            fields: BTreeMap::new(),
            source: BTreeMap::new(),
        }
    }

    /// Comme `with`, à partir du texte saisi (typé, et conservé tel quel).
    pub fn with_text<K: Into<String>>(mut self, column: K, raw: &str) -> Self {
        self.insert_text(column, raw);
        self
    }

    pub fn with<K: Into<String>>(mut self, column: K, value: CellValue) -> Self {
        self.fields.insert(column.into(), value);
        self
    }

    pub fn insert<K: Into<String>>(&mut self, column: K, value: CellValue) {
        self.fields.insert(column.into(), value);
    }

    pub fn insert_text<K: Into<String>>(&mut self, column: K, raw: &str) {
        let column = column.into();
        self.fields.insert(column.clone(), CellValue::from_text(raw));
        self.source.insert(column, raw.trim().to_string());
    }

    /// Texte d'une colonne : la saisie d'origine si connue, sinon la valeur typée.
    pub fn text(&self, column: &str) -> Option<String> {
        match self.source.get(column) {
            Some(raw) => (!raw.is_empty()).then(|| raw.clone()),
            None => self.get(column).and_then(CellValue::as_text),
        }
    }

    /// Valeur non vide d'une colonne ; absente si la colonne manque.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column).filter(|v| !v.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(CellValue::is_empty) && self.source.values().all(String::is_empty)
    }
}
