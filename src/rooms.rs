//! Room occupancy registry.
//!
//! The registry is the source of truth for which rooms exist and whether
//! each is available or occupied. It works on a borrowed connection so the
//! caller decides where the rows live (the app database, or an in-memory
//! database in tests).

use crate::error::{DeskError, DeskResult};
use crate::models::{Room, RoomStatus};
use rusqlite::{Connection, OptionalExtension};

pub struct RoomRegistry<'a> {
    conn: &'a Connection,
}

impl<'a> RoomRegistry<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Seeds a row for every room number that has none yet.
    ///
    /// Existing rows keep their status, so this runs on every startup.
    pub fn initialize<I, S>(&self, room_numbers: I) -> DeskResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO rooms (room_number, status) VALUES (?1, 'available')")?;

        let mut seeded = 0;
        for room_number in room_numbers {
            seeded += stmt.execute([room_number.as_ref()])?;
        }

        tracing::debug!(seeded, "room registry initialized");
        Ok(seeded)
    }

    pub fn list_rooms(&self) -> DeskResult<Vec<Room>> {
        let mut stmt = self.conn.prepare(
            "SELECT room_number, status FROM rooms
             ORDER BY length(room_number), room_number",
        )?;

        let rooms = stmt
            .query_map([], |row| {
                Ok(Room {
                    room_number: row.get(0)?,
                    status: parse_status(row.get(1)?, 1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rooms)
    }

    pub fn status(&self, room_number: &str) -> DeskResult<RoomStatus> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM rooms WHERE room_number = ?1",
                [room_number],
                |row| row.get(0),
            )
            .optional()?;

        match status {
            Some(s) => Ok(parse_status(s, 0)?),
            None => Err(DeskError::room_not_found(room_number)),
        }
    }

    /// Starts an occupancy episode.
    pub fn assign_occupied(&self, room_number: &str) -> DeskResult<()> {
        let changed = self.conn.execute(
            "UPDATE rooms SET status = 'occupied' WHERE room_number = ?1 AND status = 'available'",
            [room_number],
        )?;

        if changed == 0 {
            let message = match self.status(room_number) {
                Ok(_) => format!("Room {} is already occupied", room_number),
                Err(DeskError::NotFound { .. }) => format!("Room {} does not exist", room_number),
                Err(e) => return Err(e),
            };
            return Err(DeskError::InvalidState { message });
        }

        tracing::info!(room = room_number, "room assigned");
        Ok(())
    }

    /// Ends an occupancy episode. Checking out an available room is a no-op.
    pub fn mark_available(&self, room_number: &str) -> DeskResult<()> {
        let changed = self.conn.execute(
            "UPDATE rooms SET status = 'available' WHERE room_number = ?1",
            [room_number],
        )?;

        if changed == 0 {
            return Err(DeskError::room_not_found(room_number));
        }

        tracing::info!(room = room_number, "room checked out");
        Ok(())
    }
}

fn parse_status(raw: String, column: usize) -> rusqlite::Result<RoomStatus> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, e.into())
    })
}
