#![forbid(unsafe_code)]
use chrono::NaiveDate;
use shiftplan::{
    io, CellValue, Jurisdiction, MicroLpBackend, Period, PlanConfig, Planner, ShiftCell, ShiftRow,
    ShiftTable,
};
use std::fs;
use tempfile::tempdir;

fn sample_table() -> ShiftTable {
    ShiftTable {
        header: vec!["".into(), "1 (Wed)".into(), "2 (Thu)".into(), "3 (文化の日)".into()],
        rows: vec![
            ShiftRow {
                name: "佐藤".into(),
                cells: vec![ShiftCell::Morning, ShiftCell::Off, ShiftCell::Work],
            },
            ShiftRow {
                name: "鈴木".into(),
                cells: vec![ShiftCell::Work, ShiftCell::Work, ShiftCell::Off],
            },
        ],
    }
}

#[test]
fn csv_import_types_cells_and_skips_blank_rows() {
    let data = "\u{feff}申請者,特別休,有給1,希望休1,朝番1,朝番2\n\
                佐藤,2023-11-02,,2023/11/04,1,0\n\
                ,,,,,\n\
                鈴木,,2023-11-15 00:00:00,,true,\n";
    let records = io::import_records_csv_reader(data.as_bytes()).unwrap();
    assert_eq!(records.len(), 2);

    let sato = &records[0];
    assert_eq!(sato.row, 1);
    assert_eq!(sato.get("申請者"), Some(&CellValue::Text("佐藤".into())));
    assert_eq!(
        sato.get("特別休"),
        Some(&CellValue::Date(NaiveDate::from_ymd_opt(2023, 11, 2).unwrap()))
    );
    assert_eq!(sato.get("有給1"), None);
    assert_eq!(
        sato.get("希望休1").and_then(CellValue::as_date),
        NaiveDate::from_ymd_opt(2023, 11, 4)
    );
    assert!(sato.get("朝番1").unwrap().is_truthy());
    assert!(!sato.get("朝番2").unwrap().is_truthy());

    let suzuki = &records[1];
    assert_eq!(suzuki.row, 3);
    assert_eq!(
        suzuki.get("有給1").and_then(CellValue::as_date),
        NaiveDate::from_ymd_opt(2023, 11, 15)
    );
    assert_eq!(suzuki.get("朝番1"), Some(&CellValue::Bool(true)));
}

#[test]
fn csv_export_layout() {
    let bytes = io::render_table_csv(&sample_table(), "名前").unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    insta::assert_snapshot!(lines.join(" / "), @"名前,1,2,3 / ,1 (Wed),2 (Thu),3 (文化の日) / 佐藤,2,0,1 / 鈴木,1,1,0");
}

#[test]
fn export_dispatches_on_extension() {
    let dir = tempdir().unwrap();
    let table = sample_table();

    let csv_path = dir.path().join("plan.csv");
    io::export_table(&csv_path, &table, "名前").unwrap();
    assert!(fs::read_to_string(&csv_path).unwrap().starts_with("名前,1,2,3"));

    let json_path = dir.path().join("plan.json");
    io::export_table(&json_path, &table, "名前").unwrap();
    let back: ShiftTable = serde_json::from_slice(&fs::read(&json_path).unwrap()).unwrap();
    assert_eq!(back, table);
    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&json_path).unwrap()).unwrap();
    assert_eq!(raw["rows"][0]["cells"], serde_json::json!([2, 0, 1]));

    assert!(io::export_table(dir.path().join("plan.ods"), &table, "名前").is_err());
    assert!(io::import_records(dir.path().join("input.txt")).is_err());
}

#[test]
fn csv_file_end_to_end() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(
        &input,
        "申請者,有給1,希望休1,朝番1\n\
         A,2024-10-01,2024-10-05,\n\
         B,,,1\n\
         C,,,\n",
    )
    .unwrap();

    let cfg = PlanConfig {
        period: Period::new(2024, 10, 5).unwrap(),
        workdays_per_employee: 4,
        min_staffing: 2,
        jurisdiction: Jurisdiction::None,
        ..PlanConfig::default()
    };
    let planner = Planner::new(cfg).unwrap();
    let records = io::import_records(&input).unwrap();
    let table = planner.plan(&records, &MicroLpBackend).unwrap();

    assert_eq!(table.rows[0].name, "A");
    // A : congé le 1er, donc 2..5 ; le samedi 5 est pénalisé mais reste dû
    assert_eq!(table.rows[0].cells[0], ShiftCell::Off);
    assert!(table.rows[0].cells[1..].iter().all(|c| *c == ShiftCell::Work));
    // B seul apte le 1er : doit y être, avec la valeur 2
    assert_eq!(table.rows[1].cells[0], ShiftCell::Morning);

    let out = dir.path().join("out.csv");
    io::export_table(&out, &table, &planner.config().columns.output_name_title).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 5);
    assert!(text.lines().nth(1).unwrap().ends_with("5 (Sat)"));
}

#[test]
fn csv_names_reach_the_output_unchanged() {
    let data = "申請者,有給1\n007,\nYes,\nNaN,\n";
    let records = io::import_records_csv_reader(data.as_bytes()).unwrap();
    assert_eq!(records.len(), 3);

    let cfg = PlanConfig {
        period: Period::new(2024, 10, 3).unwrap(),
        workdays_per_employee: 2,
        min_staffing: 2,
        jurisdiction: Jurisdiction::None,
        ..PlanConfig::default()
    };
    let planner = Planner::new(cfg).unwrap();
    let table = planner.plan(&records, &MicroLpBackend).unwrap();
    let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["007", "Yes", "NaN"]);

    let text = String::from_utf8(io::render_table_csv(&table, "名前").unwrap()).unwrap();
    assert!(text.lines().nth(2).unwrap().starts_with("007,"));
}

#[cfg(feature = "xlsx")]
#[test]
fn xlsx_input_and_output() {
    use rust_xlsxwriter::Workbook;

    let dir = tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in ["申請者", "有給1", "朝番2"].iter().enumerate() {
        sheet.write(0, c as u16, *h).unwrap();
    }
    sheet.write(1, 0, "佐藤").unwrap();
    sheet.write(1, 1, "2023-11-02").unwrap();
    sheet.write(1, 2, 1).unwrap();
    sheet.write(2, 0, "鈴木").unwrap();
    workbook.save(&input).unwrap();

    let records = io::import_records(&input).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].get("有給1").and_then(CellValue::as_date),
        NaiveDate::from_ymd_opt(2023, 11, 2)
    );
    assert!(records[0].get("朝番2").unwrap().is_truthy());
    assert_eq!(records[1].get("有給1"), None);

    let out = dir.path().join("plan.xlsx");
    io::export_table(&out, &sample_table(), "名前").unwrap();
    let bytes = fs::read(&out).unwrap();
    // conteneur zip
    assert_eq!(&bytes[..2], b"PK");
    assert_eq!(io::render_table_xlsx(&sample_table(), "名前").unwrap()[..2], *b"PK");
}
