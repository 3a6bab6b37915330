use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(RoomStatus::Available),
            "occupied" => Ok(RoomStatus::Occupied),
            other => Err(format!("unknown room status '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Room {
    pub room_number: String,
    pub status: RoomStatus,
}

/// Tax-inclusive breakdown of a stay.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Charges {
    pub subtotal: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub total: f64,
}

/// Validated input for a new bill.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewBill {
    pub guest_name: String,
    pub room_number: String,
    pub check_in_date: NaiveDate,
    pub days_stayed: i64,
    pub rate_per_day: f64,
}

/// A stored bill. Bills are never updated once written.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Bill {
    pub bill_number: String,
    pub guest_name: String,
    pub room_number: String,
    pub check_in_date: NaiveDate,
    pub days_stayed: i64,
    pub rate_per_day: f64,
    pub subtotal: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub total: f64,
    pub issued_at: NaiveDateTime,
}

impl Bill {
    pub fn charges(&self) -> Charges {
        Charges {
            subtotal: self.subtotal,
            cgst: self.cgst,
            sgst: self.sgst,
            total: self.total,
        }
    }

    pub fn check_out_date(&self) -> NaiveDate {
        self.check_in_date
            .checked_add_days(Days::new(self.days_stayed.max(0) as u64))
            .unwrap_or(self.check_in_date)
    }
}

/// Raw billing form as submitted by the front end.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BillForm {
    pub room_number: String,
    pub guest_name: String,
    pub check_in_date: String,
    pub check_out_date: Option<String>,
    pub days_stayed: Option<i64>,
    pub rate_per_day: String,
}

/// Result of issuing a bill. The bill is persisted even when `warning` is set.
#[derive(Debug, Serialize, Clone)]
pub struct BillOutcome {
    pub bill: Bill,
    pub receipt: Option<std::path::PathBuf>,
    pub warning: Option<String>,
}
