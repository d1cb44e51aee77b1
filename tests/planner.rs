#![forbid(unsafe_code)]
use chrono::NaiveDate;
use shiftplan::{
    io, Assignment, CellValue, EmployeeRecord, ErrorKind, ExtraHoliday, Jurisdiction,
    MicroLpBackend, Period, PlanConfig, PlanError, Planner, ShiftCell, ShiftModel, SolveStatus,
    SolverBackend,
};

fn config(year: i32, month: u32, days: u32, quota: u32, min_staffing: u32) -> PlanConfig {
    PlanConfig {
        period: Period::new(year, month, days).unwrap(),
        workdays_per_employee: quota,
        min_staffing,
        jurisdiction: Jurisdiction::None,
        ..PlanConfig::default()
    }
}

fn employee(row: usize, name: &str) -> EmployeeRecord {
    EmployeeRecord::new(row).with("申請者", CellValue::Text(name.into()))
}

fn ymd(y: i32, m: u32, d: u32) -> CellValue {
    CellValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Maximum exact de l'objectif par énumération de toutes les affectations.
fn brute_force_optimum(model: &ShiftModel) -> Option<i64> {
    let (e, d) = (model.employees(), model.days());
    let n = e * d;
    assert!(n <= 20, "enumeration too large");
    (0u32..(1 << n))
        .map(|mask| Assignment::from_fn(e, d, |i, j| mask >> (i * d + j) & 1 == 1))
        .filter(|a| model.is_feasible(a))
        .map(|a| model.objective_value(&a))
        .max()
}

struct PanicBackend;

impl SolverBackend for PanicBackend {
    fn name(&self) -> &'static str {
        "panic"
    }
    fn solve(&self, _model: &ShiftModel) -> Result<Assignment, SolveStatus> {
        panic!("solver must not be reached");
    }
}

/// Renvoie une affectation vide, qui viole le quota.
struct LazyBackend;

impl SolverBackend for LazyBackend {
    fn name(&self) -> &'static str {
        "lazy"
    }
    fn solve(&self, model: &ShiftModel) -> Result<Assignment, SolveStatus> {
        Ok(Assignment::new(model.employees(), model.days()))
    }
}

#[test]
fn small_instance_matches_brute_force_optimum() {
    // 2024-10-01 est un mardi : jours 1..4 ouvrés, jour 5 samedi
    let planner = Planner::new(config(2024, 10, 5, 4, 2)).unwrap();
    let records = vec![employee(1, "A"), employee(2, "B"), employee(3, "C")];

    let modeled = planner.extract(&records).unwrap().build_model().unwrap();
    let model = modeled.model().clone();
    let solved = modeled.solve(&MicroLpBackend).unwrap();
    let solution = solved.solution();

    assert_eq!(solution.status, SolveStatus::Optimal);
    for day in 0..5 {
        assert!(solution.assignment.staffed(day) >= 2);
    }
    let weekday_baseline = 3 * 4 * 7;
    assert!(solution.objective >= weekday_baseline);
    assert_eq!(Some(solution.objective), brute_force_optimum(&model));
    assert_eq!(solution.objective, 93);
}

#[test]
fn uncoverable_staffing_reports_solve_failure() {
    // 3 × 3 = 9 affectations pour 5 jours × 2 personnes : impossible
    let planner = Planner::new(config(2024, 10, 5, 3, 2)).unwrap();
    let records = vec![employee(1, "A"), employee(2, "B"), employee(3, "C")];

    let modeled = planner.extract(&records).unwrap().build_model().unwrap();
    assert_eq!(brute_force_optimum(modeled.model()), None);

    let err = planner.plan(&records, &MicroLpBackend).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Solve);
    assert!(matches!(err, PlanError::SolveFailure(status) if status != SolveStatus::Optimal));
}

#[test]
fn requested_holiday_off_steers_the_optimum() {
    // 2025-09-01..05 : lundi..vendredi, le 5 déclaré férié
    let mut cfg = config(2025, 9, 5, 4, 2);
    cfg.extra_holidays.push(ExtraHoliday {
        date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
        name: "創立記念日".into(),
    });
    let planner = Planner::new(cfg).unwrap();
    let records = vec![
        employee(1, "A").with("希望休1", ymd(2025, 9, 5)),
        employee(2, "B"),
        employee(3, "C"),
    ];

    let modeled = planner.extract(&records).unwrap().build_model().unwrap();
    assert_eq!(*modeled.attendance().pref_adjust.get(0, 4), -5);
    assert_eq!(*modeled.attendance().pref_adjust.get(1, 4), 0);
    assert_eq!(modeled.model().weight(0, 4), 5);
    assert_eq!(modeled.model().weight(1, 4), 10);

    let model = modeled.model().clone();
    let solved = modeled.solve(&MicroLpBackend).unwrap();
    let x = &solved.solution().assignment;
    assert!(!x.is_assigned(0, 4), "A should keep the requested holiday");
    assert!(x.is_assigned(1, 4));
    assert!(x.is_assigned(2, 4));
    assert_eq!(Some(solved.solution().objective), brute_force_optimum(&model));
}

#[test]
fn solved_schedule_honours_every_invariant() {
    let cfg = config(2023, 11, 14, 9, 2);
    let planner = Planner::new(cfg).unwrap();

    let mut alice = employee(1, "Alice")
        .with("特別休", ymd(2023, 11, 3))
        .with("有給1", ymd(2023, 11, 10));
    let mut bob = employee(2, "Bob").with("有給1", ymd(2023, 11, 1));
    let mut chloe = employee(3, "Chloé").with("希望休1", ymd(2023, 11, 4));
    let dan = employee(4, "Dan").with("有給2", ymd(2023, 11, 14));
    // jour 1 exclu : Bob y est en congé
    for day in 2..=7 {
        bob.insert(format!("朝番{day}"), CellValue::Number(1.0));
    }
    for day in 5..=14 {
        chloe.insert(format!("朝番{day}"), CellValue::Bool(true));
    }
    alice.insert("朝番12", CellValue::Number(1.0));
    let records = vec![alice, bob, chloe, dan];

    let solved = planner
        .extract(&records)
        .unwrap()
        .build_model()
        .unwrap()
        .solve(&MicroLpBackend)
        .unwrap();
    let att = solved.attendance();
    let x = &solved.solution().assignment;

    for i in 0..4 {
        assert_eq!(x.worked_days(i), 9, "quota for employee {i}");
    }
    for j in 0..14 {
        assert!(x.staffed(j) >= 2, "staffing on day {}", j + 1);
        let eligible: Vec<usize> = (0..4).filter(|&i| *att.morning_eligible.get(i, j)).collect();
        if !eligible.is_empty() {
            assert!(
                eligible.iter().any(|&i| x.is_assigned(i, j)),
                "morning coverage on day {}",
                j + 1
            );
        }
    }
    for i in 0..4 {
        for j in 0..14 {
            if *att.forced_rest.get(i, j) {
                assert!(!x.is_assigned(i, j));
            }
        }
    }
    assert!(!x.is_assigned(0, 2));
    assert!(!x.is_assigned(0, 9));
    assert!(!x.is_assigned(1, 0));
    assert!(!x.is_assigned(3, 13));

    let table = solved.materialize();
    for (i, row) in table.rows.iter().enumerate() {
        for (j, cell) in row.cells.iter().enumerate() {
            let expected = match (x.is_assigned(i, j), *att.morning_eligible.get(i, j)) {
                (true, true) => ShiftCell::Morning,
                (true, false) => ShiftCell::Work,
                (false, _) => ShiftCell::Off,
            };
            assert_eq!(*cell, expected);
        }
    }
}

#[test]
fn materialization_is_idempotent() {
    let planner = Planner::new(config(2024, 10, 5, 4, 2)).unwrap();
    let mut a = employee(1, "A");
    a.insert("朝番2", CellValue::Number(1.0));
    let records = vec![a, employee(2, "B"), employee(3, "C")];

    let solved = planner
        .extract(&records)
        .unwrap()
        .build_model()
        .unwrap()
        .solve(&MicroLpBackend)
        .unwrap();
    let first = solved.materialize();
    let second = solved.materialize();
    assert_eq!(first, second);
    assert_eq!(
        io::render_table_csv(&first, "名前").unwrap(),
        io::render_table_csv(&second, "名前").unwrap()
    );
    assert_eq!(
        first.header,
        vec!["", "1 (Tue)", "2 (Wed)", "3 (Thu)", "4 (Fri)", "5 (Sat)"]
    );
    assert_eq!(first.rows.len(), 3);
    assert!(first.rows.iter().all(|r| r.cells.len() == 5));
}

#[test]
fn inconsistent_configuration_never_reaches_the_solver() {
    // quota > période
    let err = Planner::new(config(2024, 10, 5, 6, 2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // effectif minimal > roster
    let planner = Planner::new(config(2024, 10, 5, 3, 3)).unwrap();
    let records = vec![employee(1, "A"), employee(2, "B")];
    let err = planner.plan(&records, &PanicBackend).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // roster vide
    let err = planner.plan(&[], &PanicBackend).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn data_errors_abort_before_modeling() {
    let planner = Planner::new(config(2024, 10, 5, 3, 1)).unwrap();
    let records = vec![employee(1, "A").with("有給1", ymd(2024, 10, 20))];
    let err = planner.plan(&records, &PanicBackend).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(err.to_string().contains("有給1"));

    let records = vec![EmployeeRecord::new(1).with("有給1", ymd(2024, 10, 2))];
    let err = planner.plan(&records, &PanicBackend).unwrap_err();
    assert!(matches!(err, PlanError::MissingName { row: 1, .. }));
}

#[test]
fn assignment_breaking_constraints_is_rejected() {
    let planner = Planner::new(config(2024, 10, 5, 3, 1)).unwrap();
    let records = vec![employee(1, "A"), employee(2, "B")];
    let err = planner.plan(&records, &LazyBackend).unwrap_err();
    assert!(matches!(err, PlanError::SolveFailure(SolveStatus::NotSolved)));
}
