use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use obra_sheet::cli;
use obra_sheet::core::RecordQuery;
use obra_sheet::error::ObraResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "obra-sheet")]
#[command(about = "Construction-site attendance to bilingual payroll spreadsheets")]
#[command(long_about = "Obra Sheet - Attendance payroll export
One worksheet per site | Live COUNTIF/SUM totals | 令和 era dates

COMMANDS:
  export   - Attendance records to a payroll workbook (.xlsx)
  summary  - Present/absent/overtime totals for a record file
  preview  - Print per-site worker totals without writing a file
  inspect  - Read an exported workbook back

RECORDS:
  JSON or YAML list of attendance rows as the backend returns them
  (fecha, obra_id, obra_nombre, empleado_id, presente, horas_extras, ...).

EXAMPLES:
  obra-sheet export records.json --from 2024-01-21 --to 2024-02-20
  obra-sheet export records.json --from 2024-01-21 --to 2024-02-20 --site 4 -o obra4.xlsx
  obra-sheet summary records.yaml --worker 7
  obra-sheet inspect asistencia_2024-02-20.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Record filters shared by the data commands
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only records of this client id
    #[arg(long)]
    client: Option<String>,

    /// Only records of this site id
    #[arg(long)]
    site: Option<String>,

    /// Only records of this worker id
    #[arg(long)]
    worker: Option<String>,

    /// Only records whose site leader has this id
    #[arg(long)]
    leader: Option<String>,
}

impl FilterArgs {
    fn into_query(self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> RecordQuery {
        RecordQuery {
            from,
            to,
            client_id: self.client,
            site_id: self.site,
            worker_id: self.worker,
            leader_id: self.leader,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Export attendance records to a payroll workbook.

Records inside the inclusive date range are grouped by site; each site
becomes one worksheet with a date column per calendar day, a presence row
and an overtime row per worker, and live subtotal/grand-total formulas.

OUTPUT:
  Defaults to <output_dir>/<file_prefix>_<today>.xlsx from the report
  config (asistencia_YYYY-MM-DD.xlsx in the current directory).

CONFIG (YAML):
  company_name: Obras del Sur SRL   # blank = each site's client name
  file_prefix: asistencia
  output_dir: reports")]
    /// Export attendance records to a payroll workbook (.xlsx)
    Export {
        /// Attendance records file (.json or .yaml)
        records: PathBuf,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output Excel file path (.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report configuration file
        #[arg(short, long, env = "OBRA_SHEET_CONFIG")]
        config: Option<PathBuf>,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show present/absent/overtime totals for a record file
    Summary {
        /// Attendance records file (.json or .yaml)
        records: PathBuf,

        /// First day to count (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day to count, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[command(flatten)]
        filters: FilterArgs,

        /// List each matching record (position, shift) and show debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print per-site worker totals without writing a workbook
    Preview {
        /// Attendance records file (.json or .yaml)
        records: PathBuf,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,

        #[command(flatten)]
        filters: FilterArgs,

        /// Report configuration file
        #[arg(short, long, env = "OBRA_SHEET_CONFIG")]
        config: Option<PathBuf>,

        /// Show verbose steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Read an exported workbook back and list its sheets and formulas
    Inspect {
        /// Excel file (.xlsx)
        file: PathBuf,

        /// List every formula cell
        #[arg(short, long)]
        verbose: bool,
    },
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Commands::Export { verbose, .. }
            | Commands::Summary { verbose, .. }
            | Commands::Preview { verbose, .. }
            | Commands::Inspect { verbose, .. } => *verbose,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "obra_sheet=debug"
    } else {
        "obra_sheet=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ObraResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.verbose());

    match cli.command {
        Commands::Export {
            records,
            from,
            to,
            filters,
            output,
            config,
            verbose,
        } => cli::export(
            records,
            (from, to),
            filters.into_query(None, None),
            output,
            config,
            verbose,
        ),

        Commands::Summary {
            records,
            from,
            to,
            filters,
            verbose,
        } => cli::summary(records, filters.into_query(from, to), verbose),

        Commands::Preview {
            records,
            from,
            to,
            filters,
            config,
            verbose,
        } => cli::preview(
            records,
            (from, to),
            filters.into_query(None, None),
            config,
            verbose,
        ),

        Commands::Inspect { file, verbose } => cli::inspect(file, verbose),
    }
}
