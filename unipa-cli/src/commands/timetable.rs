//! Timetable commands.

use anyhow::{bail, Result};
use clap::Subcommand;
use unipa::SemesterKey;

use crate::config::build_authed_client;
use crate::handlers::timetable::ClassRow;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum TimetableAction {
    /// Show the weekly timetable
    Show {
        /// Academic year, e.g. 2024. Defaults to the current semester.
        #[arg(short, long)]
        year: Option<String>,
        /// Semester number, e.g. 1
        #[arg(short, long)]
        semester: Option<String>,
    },
}

pub async fn handle(action: TimetableAction, format: OutputFormat) -> Result<()> {
    match action {
        TimetableAction::Show { year, semester } => show(year, semester, format).await,
    }
}

async fn show(year: Option<String>, semester: Option<String>, format: OutputFormat) -> Result<()> {
    let key = match (year, semester) {
        (Some(year), Some(semester)) => Some(SemesterKey::new(year, semester)),
        (None, None) => None,
        _ => bail!("--year and --semester must be given together"),
    };

    let client = build_authed_client()?;
    let info = client.timetable().get(key).await?;

    println!("{} {} ({})", info.semester.year, info.semester.name, info.entries.len());

    let mut entries: Vec<_> = info.entries.iter().collect();
    entries.sort_by_key(|e| (e.weekday, e.period));
    let rows: Vec<ClassRow> = entries.into_iter().map(ClassRow::from).collect();
    print_table(rows, format);
    Ok(())
}
