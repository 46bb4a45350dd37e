//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open (and migrate) an admission database file.
//! - Print crate version and per-record counts for quick sanity checks.
//!
//! Usage: `admission_cli [DB_PATH]` (defaults to `admission.sqlite3`).
//! Set `ADMISSION_LOG_DIR` to an absolute directory to enable file logging.

use admission_core::db::open_db;
use admission_core::{
    core_version, default_log_level, init_logging, RecordStore, SqliteRecordStore,
};
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "admission.sqlite3";
const LOG_DIR_ENV: &str = "ADMISSION_LOG_DIR";

fn main() -> ExitCode {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    println!("admission_core version={}", core_version());
    match run(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        init_logging(default_log_level(), &log_dir)?;
    }

    let conn = open_db(db_path)?;
    let store = SqliteRecordStore::try_new(&conn)?;
    let counts = store.counts()?;
    log::info!(
        "event=cli_counts module=cli status=ok applicants={} applications={}",
        counts.applicants,
        counts.applications
    );

    println!("db={db_path}");
    println!("applicants={}", counts.applicants);
    println!("applications={}", counts.applications);
    println!("subject_grades={}", counts.subject_grades);
    println!("exam_results={}", counts.exam_results);
    Ok(())
}
