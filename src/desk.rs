//! Front desk lifecycle: room selection, billing, receipts and checkout.

use crate::billing::BillingLedger;
use crate::config::DeskConfig;
use crate::db::Database;
use crate::error::DeskResult;
use crate::models::{Bill, BillForm, BillOutcome, Room};
use crate::receipt::{CommandPrinter, DocumentRenderer, HtmlReceiptRenderer, Printer};
use crate::rooms::RoomRegistry;
use std::path::PathBuf;

pub struct FrontDesk {
    db: Database,
    renderer: Box<dyn DocumentRenderer>,
    printer: Box<dyn Printer>,
}

impl FrontDesk {
    /// Prepares the schema and seeds `rooms` before handing out the desk.
    pub fn new(
        db: Database,
        rooms: &[String],
        renderer: Box<dyn DocumentRenderer>,
        printer: Box<dyn Printer>,
    ) -> DeskResult<Self> {
        db.initialize()?;
        {
            let conn = db.connection()?;
            RoomRegistry::new(&conn).initialize(rooms.iter().map(|r| r.trim()))?;
        }

        Ok(Self {
            db,
            renderer,
            printer,
        })
    }

    pub fn open(config: &DeskConfig) -> DeskResult<Self> {
        let db = Database::open(&config.database_path)?;
        let renderer = HtmlReceiptRenderer::new(config.hotel.clone(), config.receipts_dir.clone());
        let printer = CommandPrinter::new(config.print_command.clone());

        tracing::info!(
            database = %config.database_path.display(),
            rooms = config.rooms.len(),
            "front desk ready"
        );
        Self::new(db, &config.rooms, Box::new(renderer), Box::new(printer))
    }

    pub fn rooms(&self) -> DeskResult<Vec<Room>> {
        let conn = self.db.connection()?;
        RoomRegistry::new(&conn).list_rooms()
    }

    /// Starts an occupancy episode and returns the room's new state.
    pub fn select_room(&self, room_number: &str) -> DeskResult<Room> {
        let conn = self.db.connection()?;
        let registry = RoomRegistry::new(&conn);
        registry.assign_occupied(room_number)?;
        Ok(Room {
            room_number: room_number.to_string(),
            status: registry.status(room_number)?,
        })
    }

    pub fn checkout(&self, room_number: &str) -> DeskResult<Room> {
        let conn = self.db.connection()?;
        let registry = RoomRegistry::new(&conn);
        registry.mark_available(room_number)?;
        Ok(Room {
            room_number: room_number.to_string(),
            status: registry.status(room_number)?,
        })
    }

    /// Issues a bill from form input, then renders its receipt.
    ///
    /// The bill is committed before rendering starts; a rendering failure
    /// comes back as `warning` on an otherwise successful outcome.
    pub fn generate_bill(&self, form: &BillForm) -> DeskResult<BillOutcome> {
        let new_bill = form.parse()?;
        let bill = {
            let conn = self.db.connection()?;
            BillingLedger::new(&conn).create_bill(&new_bill)?
        };

        Ok(self.issue_receipt(bill))
    }

    /// Bills the stay and checks the room out in one step.
    pub fn settle_and_checkout(&self, form: &BillForm) -> DeskResult<BillOutcome> {
        let outcome = self.generate_bill(form)?;
        self.checkout(&outcome.bill.room_number)?;
        Ok(outcome)
    }

    /// Renders the stored bill again and sends it to the printer.
    pub fn print_receipt(&self, bill_number: &str) -> DeskResult<PathBuf> {
        let bill = self.bill(bill_number)?;
        let path = self.renderer.render(&bill)?;
        self.printer.print(&path)?;
        Ok(path)
    }

    pub fn bill(&self, bill_number: &str) -> DeskResult<Bill> {
        let conn = self.db.connection()?;
        BillingLedger::new(&conn).get_bill(bill_number)
    }

    pub fn bills(&self) -> DeskResult<Vec<Bill>> {
        let conn = self.db.connection()?;
        let bills: DeskResult<Vec<Bill>> = BillingLedger::new(&conn).list_bills().collect();
        bills
    }

    pub fn room_history(&self, room_number: &str) -> DeskResult<Vec<Bill>> {
        let conn = self.db.connection()?;
        RoomRegistry::new(&conn).status(room_number)?;
        BillingLedger::new(&conn).bills_for_room(room_number)
    }

    fn issue_receipt(&self, bill: Bill) -> BillOutcome {
        match self.renderer.render(&bill) {
            Ok(path) => BillOutcome {
                bill,
                receipt: Some(path),
                warning: None,
            },
            Err(e) => {
                tracing::warn!(bill = %bill.bill_number, error = %e, "receipt not rendered");
                BillOutcome {
                    bill,
                    receipt: None,
                    warning: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(feature = "desktop")]
pub trait FrontDeskExt {
    fn desk(&self) -> &FrontDesk;
}

#[cfg(feature = "desktop")]
impl FrontDeskExt for tauri::AppHandle {
    fn desk(&self) -> &FrontDesk {
        use tauri::Manager;
        self.state::<FrontDesk>().inner()
    }
}
