#![warn(clippy::pedantic)]

mod config;
mod store;
mod term;

use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use periods::Date;
use periods::hours::{format_hours, parse_hours};
use periods::period::Frequency;
use periods::report::Output;
use periods::session::Action;
use periods::sheet::{Status, Timesheet};
use periods::verify::Mode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(version, about = "Timesheet periods, hours and validation")]
struct Cli {
    /// Configuration file, defaults to `$TIMEGRID_CONFIG` or `timegrid.json`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the period containing a date
    Period {
        /// WEEKLY, BIWEEKLY, SEMI_MONTHLY or MONTHLY
        frequency: Frequency,
        /// Date as MM/DD/YYYY, defaults to today
        date: Option<Date>,
    },
    /// Parse hour texts such as `7.5`, `7:30` or `90m`
    Hours {
        #[arg(required = true, allow_hyphen_values = true)]
        texts: Vec<String>,
    },
    /// Create an empty timesheet
    New {
        path: PathBuf,
        #[arg(long)]
        frequency: Option<Frequency>,
        /// Any date inside the period, defaults to today
        #[arg(long)]
        date: Option<Date>,
        #[arg(long)]
        project: Vec<String>,
        #[arg(long)]
        task: Vec<String>,
    },
    /// Validate a timesheet
    Check {
        path: PathBuf,
        /// Apply the rules for submission instead of saving
        #[arg(long)]
        submit: bool,
    },
    /// Print a timesheet with its daily totals
    Report {
        path: PathBuf,
        #[arg(long)]
        no_color: bool,
    },
    /// Validate a timesheet and mark it for approval
    Submit { path: PathBuf },
    /// Edit a timesheet in the terminal
    Edit { path: PathBuf },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(Cli { config, command }: Cli) -> Result<()> {
    let config = Config::resolve(config.as_deref())?;
    match command {
        Command::Period { frequency, date } => period(&config, frequency, date),
        Command::Hours { texts } => {
            let mut out = stdout().lock();
            for text in texts {
                writeln!(out, "{text} -> {}", format_hours(parse_hours(&text)))?;
            }
            Ok(())
        }
        Command::New {
            path,
            frequency,
            date,
            project,
            task,
        } => new(&config, &path, frequency, date, &project, &task),
        Command::Check { path, submit } => {
            let sheet = store::load(&path, &config.calculator()?)?;
            let mode = if submit { Mode::Submit } else { Mode::Save };
            sheet.validate(mode)?;
            println!(
                "{}: ok, {} recorded",
                path.display(),
                format_hours(sheet.total_hours())
            );
            Ok(())
        }
        Command::Report { path, no_color } => {
            let sheet = store::load(&path, &config.calculator()?)?;
            let calendar = config.calendar();
            let output = Output::new(&sheet).with_calendar(&calendar);
            let output = if no_color { output.plain() } else { output };
            write!(stdout().lock(), "{output}")?;
            Ok(())
        }
        Command::Submit { path } => submit(&config, &path),
        Command::Edit { path } => {
            term::run_term(path, config).context("Terminal editor failed")?;
            Ok(())
        }
    }
}

fn period(config: &Config, frequency: Frequency, date: Option<Date>) -> Result<()> {
    let calculator = config.calculator()?;
    let period = calculator.period(frequency, date.unwrap_or_else(Date::today));
    let mut out = stdout().lock();
    writeln!(out, "{frequency} {period} ({} days)", period.len)?;
    for day in period.days() {
        writeln!(out, "{} {day}", day.weekday())?;
    }
    Ok(())
}

fn new(
    config: &Config,
    path: &Path,
    frequency: Option<Frequency>,
    date: Option<Date>,
    projects: &[String],
    tasks: &[String],
) -> Result<()> {
    if projects.len() != tasks.len() {
        bail!(
            "Every --project needs a --task, got {} projects and {} tasks",
            projects.len(),
            tasks.len()
        );
    }
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    let calculator = config.calculator()?;
    let frequency = frequency.unwrap_or(config.default_frequency);
    let period = calculator.period(frequency, date.unwrap_or_else(Date::today));
    let mut sheet = Timesheet::new(period);
    for (project, task) in projects.iter().zip(tasks) {
        sheet.add_entry(project.as_str(), task.as_str());
    }
    store::save(path, &sheet)?;
    println!("{}: {frequency} {period}", path.display());
    Ok(())
}

fn submit(config: &Config, path: &Path) -> Result<()> {
    let mut sheet = store::load(path, &config.calculator()?)?;
    config.session().require(Action::Submit, sheet.status)?;
    sheet.validate(Mode::Submit)?;
    sheet.status = Status::PendingApproval;
    store::save(path, &sheet)?;
    info!(path = %path.display(), user = %config.user, "submitted timesheet");
    println!("{}: {}", path.display(), sheet.status);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    // the editor owns the terminal, log lines would tear through its frames
    if !matches!(cli.command, Command::Edit { .. }) {
        init_logging();
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
