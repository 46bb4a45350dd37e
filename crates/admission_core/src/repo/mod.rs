//! Row-level persistence for admission records.
//!
//! # Responsibility
//! - Keep SQL text and row decoding for every table inside one boundary.
//! - Report storage failures and undecodable rows as typed errors.
//!
//! # Invariants
//! - Functions here never validate fields, resolve parents, or check
//!   uniqueness; callers run them inside a store transaction after those
//!   checks.
//! - Read paths reject invalid persisted data instead of masking it.
//! - Listing order is ascending identity.

pub mod applicant_repo;
pub mod application_repo;
pub mod exam_result_repo;
pub mod subject_grade_repo;

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::RecordId;
use rusqlite::ffi;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level error for admission tables.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted admission data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "admission store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "admission store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "admission store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    /// Whether SQLite rejected a write because of a UNIQUE index.
    pub fn is_unique_violation(&self) -> bool {
        self.constraint_code() == Some(ffi::SQLITE_CONSTRAINT_UNIQUE)
    }

    /// Whether SQLite rejected a write because of a FOREIGN KEY.
    pub fn is_foreign_key_violation(&self) -> bool {
        self.constraint_code() == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
    }

    fn constraint_code(&self) -> Option<i32> {
        match self {
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Some(err.extended_code)
            }
            _ => None,
        }
    }
}

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "applicants",
        &[
            "id",
            "last_name",
            "first_name",
            "patronymic",
            "gender",
            "citizenship",
            "birth_date",
            "passport_data",
            "applicant_address",
            "parents_address",
            "foreign_language",
        ],
    ),
    (
        "applications",
        &[
            "id",
            "applicant_id",
            "faculty",
            "specialty",
            "educational_institution",
            "graduation_year",
            "document_type",
            "document_number",
            "average_score",
            "ege_score",
            "group_number",
        ],
    ),
    (
        "subject_grades",
        &["id", "application_id", "subject", "grade"],
    ),
    (
        "exam_results",
        &[
            "id",
            "application_id",
            "classroom",
            "subject",
            "exam_date",
            "score",
        ],
    ),
];

/// Verifies that `conn` is migrated and carries every admission column.
pub fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

/// Number of rows in one admission table.
pub(crate) fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count {count} in {table}")))
}

/// Whether a row with `id` exists in `table`.
pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: RecordId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn decimal_to_db(value: Option<Decimal>) -> Option<String> {
    value.map(|value| value.to_string())
}

pub(crate) fn parse_decimal(
    value: Option<String>,
    column: &'static str,
) -> RepoResult<Option<Decimal>> {
    value
        .map(|text| {
            Decimal::from_str(&text).map_err(|_| {
                RepoError::InvalidData(format!("invalid decimal `{text}` in {column}"))
            })
        })
        .transpose()
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
