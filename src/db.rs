use crate::error::{DeskError, DeskResult};
use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn open(db_path: &Path) -> DeskResult<Self> {
        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                DeskError::StorageUnavailable(format!(
                    "cannot create database directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        tracing::debug!(path = %db_path.display(), "opened database");

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn connection(&self) -> DeskResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DeskError::StorageUnavailable("database lock poisoned".to_string()))
    }

    pub fn initialize(&self) -> DeskResult<()> {
        let conn = self.connection()?;
        initialize_conn(&conn)?;
        Ok(())
    }
}

/// Creates the schema if missing and upgrades older databases in place.
pub fn initialize_conn(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Room occupancy
        CREATE TABLE IF NOT EXISTS rooms (
            room_number TEXT PRIMARY KEY,
            status TEXT NOT NULL DEFAULT 'available'
                CHECK (status IN ('available', 'occupied'))
        );

        -- Issued bills
        CREATE TABLE IF NOT EXISTS bills (
            bill_no TEXT PRIMARY KEY,
            guest_name TEXT NOT NULL,
            room_number TEXT NOT NULL,
            check_in_date TEXT NOT NULL,
            days INTEGER NOT NULL,
            rate REAL NOT NULL,
            subtotal REAL NOT NULL,
            cgst REAL NOT NULL,
            sgst REAL NOT NULL,
            total REAL NOT NULL,
            date TEXT NOT NULL,
            FOREIGN KEY (room_number) REFERENCES rooms(room_number)
        );
        ",
    )?;

    migrate_conn(conn)?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_bills_date ON bills (date, bill_no);
         CREATE INDEX IF NOT EXISTS idx_bills_room ON bills (room_number);",
    )?;

    Ok(())
}

fn migrate_conn(conn: &Connection) -> Result<()> {
    let columns: Vec<String> = conn
        .prepare("PRAGMA table_info(bills)")?
        .query_map([], |row| row.get::<_, String>(1))?
        .filter_map(|r| r.ok())
        .collect();

    let has = |name: &str| columns.iter().any(|c| c == name);

    // Bills that count `nights` and keep DD-MM-YYYY check-in dates
    if has("nights") && !has("days") {
        tracing::info!("rebuilding bills table from nights layout");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(
            "
            CREATE TABLE bills_new (
                bill_no TEXT PRIMARY KEY,
                guest_name TEXT NOT NULL,
                room_number TEXT NOT NULL,
                check_in_date TEXT NOT NULL,
                days INTEGER NOT NULL,
                rate REAL NOT NULL,
                subtotal REAL NOT NULL,
                cgst REAL NOT NULL,
                sgst REAL NOT NULL,
                total REAL NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY (room_number) REFERENCES rooms(room_number)
            );

            INSERT INTO bills_new
                (bill_no, guest_name, room_number, check_in_date, days, rate, subtotal, cgst, sgst, total, date)
            SELECT
                bill_no,
                guest_name,
                room_number,
                COALESCE(
                    CASE
                        WHEN trim(check_in_date) GLOB '[0-9][0-9]-[0-9][0-9]-[0-9][0-9][0-9][0-9]'
                        THEN substr(trim(check_in_date), 7, 4) || '-'
                            || substr(trim(check_in_date), 4, 2) || '-'
                            || substr(trim(check_in_date), 1, 2)
                        ELSE date(check_in_date)
                    END,
                    date(date)
                ),
                COALESCE(nights, 1),
                rate,
                subtotal,
                cgst,
                sgst,
                total,
                date
            FROM bills;

            DROP TABLE bills;
            ALTER TABLE bills_new RENAME TO bills;
            ",
        )?;
        tx.commit()?;
    } else if !has("check_in_date") {
        // Bills written before the check-in date was tracked
        tracing::debug!("adding check_in_date to bills");
        conn.execute("ALTER TABLE bills ADD COLUMN check_in_date TEXT", [])?;
        conn.execute(
            "UPDATE bills SET check_in_date = date(date) WHERE check_in_date IS NULL",
            [],
        )?;
    }

    // Space-separated timestamps sort before ISO ones on the same day
    let normalized = conn.execute(
        "UPDATE bills SET date = replace(date, ' ', 'T') WHERE date LIKE '____-__-__ __:__:__'",
        [],
    )?;
    if normalized > 0 {
        tracing::debug!(rows = normalized, "normalized bill timestamps");
    }

    Ok(())
}
