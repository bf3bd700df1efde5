// 🗄️ Storage - SQLite persistence for expenses
//
// Handlers only see the `Storage` trait; `SqliteStorage` is the production
// implementation (WAL journal for crash recovery).

use crate::expense::{Expense, NewExpense};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// File name of the database inside the data directory
pub const DATABASE_FILE: &str = "expenses.db";

#[derive(Debug, Error)]
pub enum StorageError {
    /// Delete of an id that does not exist
    #[error("expense not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Persistence interface used by the HTTP layer.
///
/// Implementations must be safe to call from concurrent requests.
pub trait Storage: Send + Sync {
    /// Persist a new expense, assigning its id (and the current time when no
    /// date was given). Returns the stored record.
    fn save_expense(&self, expense: NewExpense) -> Result<Expense, StorageError>;

    /// All expenses, newest first.
    fn get_all_expenses(&self) -> Result<Vec<Expense>, StorageError>;

    /// Remove one expense. Unknown ids yield `StorageError::NotFound`.
    fn delete_expense(&self, id: &str) -> Result<(), StorageError>;
}

// ============================================================================
// SQLITE IMPLEMENTATION
// ============================================================================

pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    pub fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        setup_database(&conn)?;
        Ok(SqliteStorage {
            conn: Mutex::new(conn),
        })
    }

    pub fn count(&self) -> Result<i64, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        verify_count(&conn)
    }
}

impl Storage for SqliteStorage {
    fn save_expense(&self, expense: NewExpense) -> Result<Expense, StorageError> {
        let expense = expense.into_expense(uuid::Uuid::new_v4().to_string(), Utc::now());
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        insert_expense(&conn, &expense)?;
        Ok(expense)
    }

    fn get_all_expenses(&self) -> Result<Vec<Expense>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        get_all_expenses(&conn)
    }

    fn delete_expense(&self, id: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        delete_expense(&conn, id)
    }
}

// ============================================================================
// QUERIES
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date)",
        [],
    )?;

    Ok(())
}

pub fn insert_expense(conn: &Connection, expense: &Expense) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO expenses (id, name, category, amount, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            expense.id,
            expense.name,
            expense.category,
            expense.amount,
            format_date(&expense.date),
        ],
    )?;

    tracing::debug!(id = %expense.id, "Inserted expense");
    Ok(())
}

pub fn get_all_expenses(conn: &Connection) -> Result<Vec<Expense>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category, amount, date
         FROM expenses
         ORDER BY date DESC, seq DESC",
    )?;

    let expenses = stmt
        .query_map([], |row| {
            let date_str: String = row.get(4)?;
            let date = DateTime::parse_from_rfc3339(&date_str)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
                .with_timezone(&Utc);

            Ok(Expense {
                id: row.get(0)?,
                name: row.get(1)?,
                category: row.get(2)?,
                amount: row.get(3)?,
                date,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(expenses)
}

pub fn delete_expense(conn: &Connection, id: &str) -> Result<(), StorageError> {
    let deleted = conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;

    if deleted == 0 {
        return Err(StorageError::NotFound(id.to_string()));
    }

    Ok(())
}

pub fn verify_count(conn: &Connection) -> Result<i64, StorageError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;

    Ok(count)
}

/// Fixed-width RFC 3339 in UTC so that text order matches time order
fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap())
    }

    #[test]
    fn test_save_assigns_unique_ids() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let a = storage
            .save_expense(NewExpense::new("Coffee", "Food", 3.5, at(2024, 1, 1)))
            .unwrap();
        let b = storage
            .save_expense(NewExpense::new("Coffee", "Food", 3.5, at(2024, 1, 1)))
            .unwrap();

        assert!(!a.id.is_empty());
        assert!(!b.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(storage.count().unwrap(), 2);
    }

    #[test]
    fn test_save_stamps_missing_date() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let before = Utc::now();

        let saved = storage
            .save_expense(NewExpense::new("Bus", "Travel", 2.0, None))
            .unwrap();

        assert!(saved.date >= before);
        assert!(saved.date <= Utc::now());
    }

    #[test]
    fn test_get_all_round_trips_fields_newest_first() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage
            .save_expense(NewExpense::new("Rent", "Rent", 1200.0, at(2024, 1, 1)))
            .unwrap();
        storage
            .save_expense(NewExpense::new("Lunch, with Sam", "Food", 14.25, at(2024, 3, 15)))
            .unwrap();

        let all = storage.get_all_expenses().unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Lunch, with Sam");
        assert_eq!(all[0].amount, 14.25);
        assert_eq!(all[0].date, at(2024, 3, 15).unwrap());
        assert_eq!(all[1].name, "Rent");
        assert_eq!(all[1].category, "Rent");
    }

    #[test]
    fn test_delete_then_delete_again_is_not_found() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let saved = storage
            .save_expense(NewExpense::new("Movie", "Entertainment", 11.0, at(2024, 2, 2)))
            .unwrap();

        storage.delete_expense(&saved.id).unwrap();
        let second = storage.delete_expense(&saved.id);

        assert!(matches!(second, Err(StorageError::NotFound(id)) if id == saved.id));
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_open_file_database_persists() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(DATABASE_FILE);

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage
                .save_expense(NewExpense::new("Gym", "Healthcare", 40.0, at(2024, 4, 1)))
                .unwrap();
        }

        let reopened = SqliteStorage::open(&path).unwrap();
        let all = reopened.get_all_expenses().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Gym");
    }
}
