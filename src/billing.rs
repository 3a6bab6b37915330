//! Billing ledger: charge computation, bill numbering and bill storage.
//!
//! Bill numbers take the form `BILL<YYYYMMDD><seq>` where `seq` is a
//! four-digit counter that restarts every calendar day. The counter is read
//! and the row inserted inside one transaction, and `bill_no` is the primary
//! key, so a number is never handed out twice.

use crate::error::{DeskError, DeskResult};
use crate::models::{Bill, Charges, NewBill, RoomStatus};
use crate::rooms::RoomRegistry;
use chrono::{Days, Local, NaiveDate, NaiveDateTime, Timelike};
use rusqlite::{Connection, OptionalExtension, Row};
use std::collections::VecDeque;

pub const CGST_RATE: f64 = 0.09;
pub const SGST_RATE: f64 = 0.09;
/// Longest stay a single bill may cover.
pub const MAX_DAYS_STAYED: i64 = 3650;

const BILL_PREFIX: &str = "BILL";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const PAGE_SIZE: usize = 64;

const BILL_COLUMNS: &str = "bill_no, guest_name, room_number, check_in_date, days, rate, subtotal, cgst, sgst, total, date";

/// Computes subtotal, both tax components and the total for a stay.
pub fn compute_charges(days_stayed: i64, rate_per_day: f64) -> DeskResult<Charges> {
    if days_stayed < 1 {
        return Err(DeskError::validation("Days stayed must be at least 1"));
    }
    if days_stayed > MAX_DAYS_STAYED {
        return Err(DeskError::validation(format!(
            "Days stayed cannot exceed {}",
            MAX_DAYS_STAYED
        )));
    }
    if !rate_per_day.is_finite() || rate_per_day < 0.0 {
        return Err(DeskError::validation(
            "Rate per day must be a non-negative amount",
        ));
    }

    let subtotal = days_stayed as f64 * rate_per_day;
    let cgst = subtotal * CGST_RATE;
    let sgst = subtotal * SGST_RATE;
    let total = subtotal + cgst + sgst;
    if !total.is_finite() {
        return Err(DeskError::validation("Bill amount is too large"));
    }

    Ok(Charges {
        subtotal,
        cgst,
        sgst,
        total,
    })
}

pub struct BillingLedger<'a> {
    conn: &'a Connection,
}

impl<'a> BillingLedger<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Next free bill number for `issue_date`.
    pub fn allocate_bill_number(&self, issue_date: NaiveDate) -> DeskResult<String> {
        next_bill_number(self.conn, issue_date)
    }

    pub fn create_bill(&self, new_bill: &NewBill) -> DeskResult<Bill> {
        self.create_bill_at(new_bill, Local::now().naive_local())
    }

    /// Issues a bill with an explicit issue timestamp.
    ///
    /// The room must exist and be occupied. Room status is left untouched;
    /// checkout is a separate action.
    pub fn create_bill_at(&self, new_bill: &NewBill, issued_at: NaiveDateTime) -> DeskResult<Bill> {
        let guest_name = new_bill.guest_name.trim();
        if guest_name.is_empty() {
            return Err(DeskError::validation("Guest name is required"));
        }

        let charges = compute_charges(new_bill.days_stayed, new_bill.rate_per_day)?;
        if new_bill
            .check_in_date
            .checked_add_days(Days::new(new_bill.days_stayed as u64))
            .is_none()
        {
            return Err(DeskError::validation("Check-out date is out of range"));
        }

        let room_number = new_bill.room_number.as_str();
        if RoomRegistry::new(self.conn).status(room_number)? != RoomStatus::Occupied {
            return Err(DeskError::Precondition {
                message: format!("Room {} is not occupied", room_number),
            });
        }

        // Stored with second precision
        let issued_at = issued_at.with_nanosecond(0).unwrap_or(issued_at);

        let tx = self.conn.unchecked_transaction()?;
        let bill_number = next_bill_number(&tx, issued_at.date())?;

        let bill = Bill {
            bill_number,
            guest_name: guest_name.to_string(),
            room_number: room_number.to_string(),
            check_in_date: new_bill.check_in_date,
            days_stayed: new_bill.days_stayed,
            rate_per_day: new_bill.rate_per_day,
            subtotal: charges.subtotal,
            cgst: charges.cgst,
            sgst: charges.sgst,
            total: charges.total,
            issued_at,
        };

        tx.execute(
            "INSERT INTO bills (bill_no, guest_name, room_number, check_in_date, days, rate, subtotal, cgst, sgst, total, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                bill.bill_number,
                bill.guest_name,
                bill.room_number,
                bill.check_in_date.format(DATE_FORMAT).to_string(),
                bill.days_stayed,
                bill.rate_per_day,
                bill.subtotal,
                bill.cgst,
                bill.sgst,
                bill.total,
                bill.issued_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        tx.commit()?;

        tracing::info!(
            bill = %bill.bill_number,
            room = %bill.room_number,
            total = bill.total,
            "bill issued"
        );
        Ok(bill)
    }

    pub fn get_bill(&self, bill_number: &str) -> DeskResult<Bill> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM bills WHERE bill_no = ?1", BILL_COLUMNS),
                [bill_number],
                bill_from_row,
            )
            .optional()?
            .ok_or_else(|| DeskError::bill_not_found(bill_number))
    }

    /// All bills in issue order, fetched lazily a page at a time.
    pub fn list_bills(&self) -> Bills<'a> {
        Bills {
            conn: self.conn,
            cursor: None,
            page: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn bills_for_room(&self, room_number: &str) -> DeskResult<Vec<Bill>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bills WHERE room_number = ?1 ORDER BY date, bill_no",
            BILL_COLUMNS
        ))?;

        let bills = stmt
            .query_map([room_number], bill_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(bills)
    }
}

fn next_bill_number(conn: &Connection, issue_date: NaiveDate) -> DeskResult<String> {
    let prefix = format!("{}{}", BILL_PREFIX, issue_date.format("%Y%m%d"));

    let issued: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bills WHERE substr(bill_no, 1, ?2) = ?1",
        rusqlite::params![prefix, prefix.len() as i64],
        |row| row.get(0),
    )?;

    Ok(format!("{}{:04}", prefix, issued + 1))
}

/// Lazy, restartable iterator over stored bills ordered by issue time.
pub struct Bills<'a> {
    conn: &'a Connection,
    cursor: Option<(String, String)>,
    page: VecDeque<Bill>,
    exhausted: bool,
}

impl Bills<'_> {
    fn fetch_page(&mut self) -> DeskResult<()> {
        let (after_date, after_bill) = self.cursor.clone().unwrap_or_default();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bills
             WHERE ?1 = 0 OR date > ?2 OR (date = ?2 AND bill_no > ?3)
             ORDER BY date, bill_no
             LIMIT ?4",
            BILL_COLUMNS
        ))?;

        let rows = stmt
            .query_map(
                rusqlite::params![
                    self.cursor.is_some(),
                    after_date,
                    after_bill,
                    PAGE_SIZE as i64
                ],
                |row| Ok((bill_from_row(row)?, row.get::<_, String>(10)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        if rows.len() < PAGE_SIZE {
            self.exhausted = true;
        }

        for (bill, raw_date) in rows {
            self.cursor = Some((raw_date, bill.bill_number.clone()));
            self.page.push_back(bill);
        }

        Ok(())
    }
}

impl Iterator for Bills<'_> {
    type Item = DeskResult<Bill>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.page.is_empty() && !self.exhausted {
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }

        self.page.pop_front().map(Ok)
    }
}

fn bill_from_row(row: &Row<'_>) -> rusqlite::Result<Bill> {
    let check_in: String = row.get(3)?;
    let issued: String = row.get(10)?;

    Ok(Bill {
        bill_number: row.get(0)?,
        guest_name: row.get(1)?,
        room_number: row.get(2)?,
        check_in_date: NaiveDate::parse_from_str(&check_in, DATE_FORMAT)
            .map_err(|e| conversion_error(3, e))?,
        days_stayed: row.get(4)?,
        rate_per_day: row.get(5)?,
        subtotal: row.get(6)?,
        cgst: row.get(7)?,
        sgst: row.get(8)?,
        total: row.get(9)?,
        issued_at: NaiveDateTime::parse_from_str(&issued, TIMESTAMP_FORMAT)
            .map_err(|e| conversion_error(10, e))?,
    })
}

fn conversion_error(column: usize, err: chrono::ParseError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}
