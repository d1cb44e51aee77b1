use crate::model::{CellValue, EmployeeRecord};
use crate::scheduler::ShiftTable;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Import des lignes employés depuis un CSV ; la première ligne donne les
/// noms de colonnes. Les lignes entièrement vides sont ignorées.
pub fn import_records_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<EmployeeRecord>> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_records_csv(rdr)
}

/// Variante lisant depuis n'importe quel flux (fichier téléversé, tests).
pub fn import_records_csv_reader<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<EmployeeRecord>> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    read_records_csv(rdr)
}

fn read_records_csv<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
) -> anyhow::Result<Vec<EmployeeRecord>> {
    let headers: Vec<String> = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut out = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("reading CSV row {}", idx + 1))?;
        let mut record = EmployeeRecord::new(idx + 1);
        for (col, value) in rec.iter().enumerate() {
            if let Some(header) = headers.get(col) {
                record.insert_text(header.clone(), value);
            }
        }
        if record.is_blank() {
            continue;
        }
        out.push(record);
    }
    Ok(out)
}

/// Import depuis la première feuille d'un classeur XLSX.
#[cfg(feature = "xlsx")]
pub fn import_records_xlsx<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<EmployeeRecord>> {
    use calamine::{open_workbook, Data, Reader, Xlsx};

    let path = path.as_ref();
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("opening workbook {}", path.display()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheet")?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet {sheet}"))?;

    let mut rows = range.rows();
    let header_row = rows.next().context("sheet has no header row")?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut out = Vec::new();
    for (idx, row) in rows.enumerate() {
        let mut record = EmployeeRecord::new(idx + 1);
        for (col, cell) in row.iter().enumerate() {
            let Some(header) = headers.get(col) else {
                continue;
            };
            if let Data::String(s) = cell {
                record.insert_text(header.clone(), s);
                continue;
            }
            let value = match cell {
                Data::Bool(b) => CellValue::Bool(*b),
                Data::Int(i) => CellValue::Number(*i as f64),
                Data::Float(f) => CellValue::Number(*f),
                Data::DateTime(dt) => dt
                    .as_datetime()
                    .map(|d| CellValue::Date(d.date()))
                    .unwrap_or(CellValue::Number(dt.as_f64())),
                Data::DateTimeIso(s) => CellValue::from_text(s),
                _ => CellValue::Empty,
            };
            record.insert(header.clone(), value);
        }
        if record.is_blank() {
            continue;
        }
        out.push(record);
    }
    Ok(out)
}

/// Choisit le lecteur selon l'extension (`csv`, `xlsx`).
pub fn import_records<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<EmployeeRecord>> {
    let path = path.as_ref();
    match extension(path).as_str() {
        "csv" => import_records_csv(path),
        #[cfg(feature = "xlsx")]
        "xlsx" => import_records_xlsx(path),
        other => bail!("unsupported input format: {other:?}"),
    }
}

/// Lignes exportées : titres de colonnes, en-tête calendaire, employés.
fn table_records(table: &ShiftTable, name_title: &str) -> Vec<Vec<String>> {
    let mut titles = Vec::with_capacity(table.header.len());
    titles.push(name_title.to_string());
    titles.extend((1..=table.days()).map(|d| d.to_string()));

    let mut out = vec![titles];
    out.extend(table.to_string_rows());
    out
}

/// Rendu CSV du planning, en mémoire.
pub fn render_table_csv(table: &ShiftTable, name_title: &str) -> anyhow::Result<Vec<u8>> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    for record in table_records(table, name_title) {
        w.write_record(&record)?;
    }
    w.flush()?;
    w.into_inner().context("finishing CSV buffer")
}

/// Export CSV du planning.
pub fn export_table_csv<P: AsRef<Path>>(
    path: P,
    table: &ShiftTable,
    name_title: &str,
) -> anyhow::Result<()> {
    let bytes = render_table_csv(table, name_title)?;
    write_atomic(path.as_ref(), &bytes)
}

/// Export JSON du planning (jolie mise en forme).
pub fn export_table_json<P: AsRef<Path>>(path: P, table: &ShiftTable) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(table)?;
    write_atomic(path.as_ref(), s.as_bytes())
}

/// Classeur XLSX en mémoire, prêt à être proposé en téléchargement.
#[cfg(feature = "xlsx")]
pub fn render_table_xlsx(table: &ShiftTable, name_title: &str) -> anyhow::Result<Vec<u8>> {
    use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let records = table_records(table, name_title);
    for (r, record) in records.iter().enumerate() {
        let row = u32::try_from(r).context("too many rows")?;
        for (c, value) in record.iter().enumerate() {
            let col = u16::try_from(c).context("too many columns")?;
            // deux premières lignes = titres + calendrier
            if r < 2 || c == 0 {
                worksheet.write_with_format(row, col, value.as_str(), &header_format)?;
            } else {
                let n: f64 = value.parse().unwrap_or_default();
                worksheet.write_with_format(row, col, n, &cell_format)?;
            }
        }
    }

    let name_width = records
        .iter()
        .filter_map(|r| r.first())
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(4);
    worksheet.set_column_width(0, name_width as f64 * 2.0 + 2.0)?;
    for c in 1..=table.days() {
        let col = u16::try_from(c).context("too many columns")?;
        worksheet.set_column_width(col, 12.0)?;
    }
    worksheet.set_freeze_panes(2, 1)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(feature = "xlsx")]
pub fn export_table_xlsx<P: AsRef<Path>>(
    path: P,
    table: &ShiftTable,
    name_title: &str,
) -> anyhow::Result<()> {
    let bytes = render_table_xlsx(table, name_title)?;
    write_atomic(path.as_ref(), &bytes)
}

/// Choisit le format selon l'extension (`csv`, `json`, `xlsx`).
pub fn export_table<P: AsRef<Path>>(
    path: P,
    table: &ShiftTable,
    name_title: &str,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    match extension(path).as_str() {
        "csv" => export_table_csv(path, table, name_title),
        "json" => export_table_json(path, table),
        #[cfg(feature = "xlsx")]
        "xlsx" => export_table_xlsx(path, table, name_title),
        other => bail!("unsupported output format: {other:?}"),
    }
}

/// Écriture atomique : fichier temporaire voisin puis renommage.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}
