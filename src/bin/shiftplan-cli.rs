#![forbid(unsafe_code)]
use anyhow::Result;
use shiftplan::{
    config::{export_config_json, load_config_from_file, Period, PlanConfig},
    io,
    scheduler::{ErrorKind, MicroLpBackend, Planner},
    CalendarClass,
};
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification mensuelle d'équipe
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de configuration (valeurs par défaut sinon)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

/// Surcharges de la période configurée
#[derive(Args, Debug, Default)]
struct PeriodArgs {
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    month: Option<u32>,
    /// Nombre de jours planifiés
    #[arg(long)]
    days: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer le planning à partir d'un tableau CSV/XLSX
    Solve {
        /// Tableau d'entrée (.csv ou .xlsx)
        #[arg(long)]
        input: String,
        /// Planning produit (.csv, .json ou .xlsx)
        #[arg(long)]
        out: String,
        #[command(flatten)]
        period: PeriodArgs,
        /// Jours travaillés par employé
        #[arg(long)]
        quota: Option<u32>,
        /// Effectif minimal par jour
        #[arg(long)]
        min_staffing: Option<u32>,
    },

    /// Afficher le classement des jours de la période
    Calendar {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Écrire la configuration par défaut
    InitConfig {
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let mut config = match &cli.config {
        Some(path) => load_config_from_file(path)?,
        None => PlanConfig::default(),
    };

    let code = match cli.cmd {
        Commands::Solve {
            input,
            out,
            period,
            quota,
            min_staffing,
        } => {
            apply_period(&mut config, &period)?;
            if let Some(q) = quota {
                config.workdays_per_employee = q;
            }
            if let Some(s) = min_staffing {
                config.min_staffing = s;
            }

            let planner = Planner::new(config)?;
            let records = io::import_records(&input)?;
            match planner.plan(&records, &MicroLpBackend) {
                Ok(table) => {
                    io::export_table(&out, &table, &planner.config().columns.output_name_title)?;
                    println!(
                        "OK: {} employee(s) x {} day(s) -> {}",
                        table.rows.len(),
                        table.days(),
                        out
                    );
                    0
                }
                Err(err) if err.kind() == ErrorKind::Solve => {
                    eprintln!("{err}");
                    eprintln!("No optimal solution found. Please check the input data.");
                    // Code 2 = aucun planning produit
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Calendar { period } => {
            apply_period(&mut config, &period)?;
            let planner = Planner::new(config)?;
            for day in planner.calendar().days() {
                let class = match &day.class {
                    CalendarClass::Weekday => "weekday",
                    CalendarClass::Weekend => "weekend",
                    CalendarClass::Holiday(_) => "holiday",
                };
                println!("{} | {} | {}", day.date, day.label(), class);
            }
            0
        }
        Commands::InitConfig { out } => {
            export_config_json(&out, &config)?;
            println!("Config written to {out}");
            0
        }
    };

    std::process::exit(code);
}

fn apply_period(config: &mut PlanConfig, args: &PeriodArgs) -> Result<()> {
    let current = config.period;
    let year = args.year.unwrap_or(current.year);
    let month = args.month.unwrap_or(current.month);
    let days = match args.days {
        Some(d) => d,
        // nouveau mois sans longueur explicite : le mois entier
        None if args.year.is_some() || args.month.is_some() => Period {
            year,
            month,
            days: 1,
        }
        .month_length()
        .unwrap_or(current.days),
        None => current.days,
    };
    config.period = Period::new(year, month, days)?;
    Ok(())
}
