mod calendar;
mod dashboard;
mod history;
mod logging;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Parser;
use sirme_core::service::validation::validate_employee_name;
use sirme_core::time::{parse_date_arg, parse_month_arg, today};
use sirme_core::{
    Config, EmployeeRole, FileSessionStore, FileTimeEntryRepository, LogEntryUseCase, LogOutcome,
    ReportExporter, ReportType, ReportUseCase, Session, SessionStore, TimeEntryRepository,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "sirme")]
#[command(about = "Log working hours and build time reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args)]
struct Period {
    /// First day (YYYY-MM-DD, today, yesterday, sow, eow, som, eom)
    #[arg(long, default_value = "som")]
    from: String,
    /// Last day, inclusive
    #[arg(long, default_value = "eom")]
    to: String,
}

impl Period {
    fn resolve(&self) -> Result<(NaiveDate, NaiveDate)> {
        let now = today();
        let start = parse_date_arg(&self.from, now)?;
        let end = parse_date_arg(&self.to, now)?;
        if start > end {
            return Err(anyhow!("--from {} is after --to {}", start, end));
        }
        Ok((start, end))
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start a session as the given user
    Login {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// admin, employee or collaborator
        #[arg(long, default_value = "employee")]
        role: EmployeeRole,
        #[arg(long)]
        token: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Log hours (usage: log cl:Acme pro:Web hours:2.5 date:yesterday "Sprint review")
    Log {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Import time entries from a GraphQL response file
    Import { file: PathBuf },
    /// Print hours per resource and project
    Summary {
        #[command(flatten)]
        period: Period,
        /// Break hours down per day
        #[arg(long)]
        detailed: bool,
    },
    /// Print day-by-day hours, one table per week
    History {
        #[command(flatten)]
        period: Period,
    },
    /// Write the report workbook
    Export {
        #[command(flatten)]
        period: Period,
        /// Output directory (defaults to the configured export dir)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Only collaborator hours
        #[arg(long)]
        collaborators: bool,
    },
    /// Print one employee's logged days for a month
    Calendar {
        /// YYYY-MM, or a date inside the month
        #[arg(long, default_value = "today")]
        month: String,
        /// Another employee's hours (admins only)
        #[arg(long)]
        employee: Option<String>,
    },
    /// Open the terminal dashboard
    Dashboard {
        /// Another employee's hours (admins only)
        #[arg(long)]
        employee: Option<String>,
    },
}

fn require_session(store: &FileSessionStore) -> Result<Session> {
    store
        .load()?
        .ok_or_else(|| anyhow!("Not logged in. Run `sirme login --name <name> --email <email>` first."))
}

/// The signed-in user unless another name is requested and allowed.
fn viewed_employee(session: &Session, requested: Option<String>) -> Result<String> {
    let name = requested.unwrap_or_else(|| session.user.name.clone());
    if !session.can_view(&name) {
        return Err(anyhow!("{} can only view their own hours", session.user.name));
    }
    Ok(name)
}

fn run(cli: Cli, config: &Config) -> Result<ExitCode> {
    let data_dir = config.paths.data_dir.clone();
    let repo = FileTimeEntryRepository::new(data_dir.clone())?;
    let sessions = FileSessionStore::new(data_dir)?;

    match cli.command {
        Some(Commands::Login { name, email, role, token }) => {
            if let Some(err) = validate_employee_name(&name) {
                eprintln!("Error: {}", err);
                return Ok(ExitCode::FAILURE);
            }
            let token = token.unwrap_or_else(|| Uuid::new_v4().to_string());
            let session = Session::new(token, name.trim().to_string(), email, role);
            sessions.save(&session)?;
            println!("Logged in as {} ({:?})", session.user.name, session.user.role);
        }
        Some(Commands::Logout) => {
            sessions.clear()?;
            println!("Logged out.");
        }
        Some(Commands::Whoami) => match sessions.load()? {
            Some(session) => {
                println!("{} <{}>", session.user.name, session.user.email);
                println!("  Role:  {:?}", session.user.role);
                println!("  Since: {}", session.created_at.format("%Y-%m-%d %H:%M"));
            }
            None => println!("Not logged in."),
        },
        Some(Commands::Log { args }) => {
            let session = require_session(&sessions)?;
            let input = sirme_core::parse_entry(&args, today())?;
            match LogEntryUseCase::new(&repo, &config.rules).log(&session, input)? {
                LogOutcome::Saved(day) => {
                    println!("Saved {} for {}: {:.2}h total", day.date, day.employee_name, day.total_hours());
                    for p in &day.projects {
                        let mps = if p.is_mps { " [MPS]" } else { "" };
                        println!("  {}/{} {:.2}h{}", p.client_name, p.project_name, p.hours, mps);
                    }
                }
                LogOutcome::Rejected(errors) => {
                    eprintln!("Entry not saved:");
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Some(Commands::Import { file }) => {
            let count = repo.import_file(&file)?;
            println!("Imported {} time entries from {}", count, file.display());
        }
        Some(Commands::Summary { period, detailed }) => {
            let (start, end) = period.resolve()?;
            let bundle = ReportUseCase::new(&repo).build(ReportType::TimeReport, start, end)?;
            report::show_report(&bundle, detailed);
        }
        Some(Commands::History { period }) => {
            let (start, end) = period.resolve()?;
            history::show_history(repo.list_between(start, end)?, start, end);
        }
        Some(Commands::Export { period, out, collaborators }) => {
            let (start, end) = period.resolve()?;
            let report_type = if collaborators { ReportType::Collaborators } else { ReportType::TimeReport };
            let dir = out.unwrap_or_else(|| config.export.output_dir.clone());
            let exporter = ReportExporter::from_config(&config.export);
            let path = ReportUseCase::new(&repo).export(&exporter, &dir, report_type, start, end)?;
            println!("Report written to {}", path.display());
        }
        Some(Commands::Calendar { month, employee }) => {
            let session = require_session(&sessions)?;
            let employee = viewed_employee(&session, employee)?;
            let month = parse_month_arg(&month, today())?;
            calendar::show_calendar(&repo.list()?, &employee, month);
        }
        Some(Commands::Dashboard { employee }) => {
            let session = require_session(&sessions)?;
            let employee = viewed_employee(&session, employee)?;
            dashboard::run(&repo.list()?, &employee, &config.rules)?;
        }
        None => {
            let session = require_session(&sessions)?;
            dashboard::run(&repo.list()?, &session.user.name, &config.rules)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init_logging(&config.logging);
    debug!(data_dir = ?config.paths.data_dir, "Configuration loaded");

    run(cli, &config)
}
