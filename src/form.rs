use crate::error::{DeskError, DeskResult};
use crate::models::{BillForm, NewBill};
use chrono::NaiveDate;

/// Accepted date layouts, ISO first.
const DATE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

impl BillForm {
    /// Turns raw form input into a validated bill request.
    ///
    /// When a check-out date is given the stay length is the number of
    /// nights between the two dates; otherwise `days_stayed` must be set.
    pub fn parse(&self) -> DeskResult<NewBill> {
        let room_number = self.room_number.trim();
        if room_number.is_empty() {
            return Err(DeskError::validation("Room number is required"));
        }

        let guest_name = self.guest_name.trim();
        if guest_name.is_empty() {
            return Err(DeskError::validation("Please enter guest name"));
        }

        let check_in_date = parse_date(&self.check_in_date, "check-in")?;

        let check_out = self
            .check_out_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let days_stayed = match (check_out, self.days_stayed) {
            (Some(raw), entered) => {
                let nights = nights_between(check_in_date, parse_date(raw, "check-out")?)?;
                if let Some(days) = entered.filter(|d| *d != nights) {
                    return Err(DeskError::validation(format!(
                        "Days stayed ({}) does not match the {} nights between check-in and check-out",
                        days, nights
                    )));
                }
                nights
            }
            (None, Some(days)) => days,
            (None, None) => {
                return Err(DeskError::validation(
                    "Enter a check-out date or the number of days stayed",
                ))
            }
        };
        if days_stayed < 1 {
            return Err(DeskError::validation("Number of nights must be at least 1"));
        }

        let rate_per_day: f64 = self
            .rate_per_day
            .trim()
            .parse()
            .map_err(|_| DeskError::validation("Please enter a valid room charge"))?;
        if !rate_per_day.is_finite() || rate_per_day < 0.0 {
            return Err(DeskError::validation("Room charge cannot be negative"));
        }

        Ok(NewBill {
            guest_name: guest_name.to_string(),
            room_number: room_number.to_string(),
            check_in_date,
            days_stayed,
            rate_per_day,
        })
    }
}

pub fn parse_date(raw: &str, field: &str) -> DeskResult<NaiveDate> {
    let raw = raw.trim();
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| {
            DeskError::validation(format!(
                "Please enter a valid {} date (YYYY-MM-DD or DD-MM-YYYY)",
                field
            ))
        })
}

/// Nights between check-in and check-out; check-out must be later.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> DeskResult<i64> {
    let nights = (check_out - check_in).num_days();
    if nights < 1 {
        return Err(DeskError::validation(
            "Check-out date must be after check-in date",
        ));
    }
    Ok(nights)
}
