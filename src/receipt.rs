//! Receipt documents and print dispatch.
//!
//! Both are side effects that run after a bill has been committed. A
//! failure here is reported to the caller but never touches the ledger;
//! a receipt can always be rendered again from the stored bill.

use crate::billing::{CGST_RATE, SGST_RATE};
use crate::config::HotelProfile;
use crate::error::{DeskError, DeskResult};
use crate::models::Bill;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;

pub trait DocumentRenderer: Send + Sync {
    /// Writes the receipt for `bill` and returns where it was written.
    fn render(&self, bill: &Bill) -> DeskResult<PathBuf>;
}

pub trait Printer: Send + Sync {
    fn print(&self, document: &Path) -> DeskResult<()>;
}

/// Renders self-contained, printable HTML receipts.
pub struct HtmlReceiptRenderer {
    hotel: HotelProfile,
    output_dir: PathBuf,
}

impl HtmlReceiptRenderer {
    pub fn new(hotel: HotelProfile, output_dir: PathBuf) -> Self {
        Self { hotel, output_dir }
    }

    pub fn receipt_path(&self, bill: &Bill) -> PathBuf {
        self.output_dir.join(format!("{}.html", bill.bill_number))
    }

    pub fn render_html(&self, bill: &Bill) -> String {
        let mut html = String::with_capacity(4096);

        html.push_str(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
        );
        let _ = writeln!(html, "<title>Receipt {}</title>", escape(&bill.bill_number));
        html.push_str(RECEIPT_STYLE);
        html.push_str("</head>\n<body>\n<div class=\"receipt\">\n");

        let _ = writeln!(html, "<h1>{}</h1>", escape(&self.hotel.name));
        let _ = writeln!(html, "<p class=\"hotel\">{}</p>", escape(&self.hotel.address));
        if !self.hotel.gstin.is_empty() {
            let _ = writeln!(html, "<p class=\"hotel\">GSTIN: {}</p>", escape(&self.hotel.gstin));
        }
        if !self.hotel.phone.is_empty() {
            let _ = writeln!(html, "<p class=\"hotel\">Phone: {}</p>", escape(&self.hotel.phone));
        }

        let _ = writeln!(
            html,
            "<table class=\"meta\"><tr><td><b>Receipt No:</b> {}</td><td><b>Date &amp; Time:</b> {}</td></tr></table>",
            escape(&bill.bill_number),
            bill.issued_at.format("%d-%m-%Y %H:%M:%S")
        );

        html.push_str("<hr>\n<table class=\"guest\">\n");
        guest_row(&mut html, "Guest Name", &escape(&bill.guest_name));
        guest_row(&mut html, "Room Number", &format!("Room {}", escape(&bill.room_number)));
        guest_row(&mut html, "Check-in Date", &bill.check_in_date.format("%d-%m-%Y").to_string());
        guest_row(&mut html, "Check-out Date", &bill.check_out_date().format("%d-%m-%Y").to_string());
        html.push_str("</table>\n");

        let charges = bill.charges();
        let _ = writeln!(
            html,
            "<table class=\"items\">\n<tr><th>Description</th><th>Days</th><th>Rate / Day</th><th>Amount</th></tr>\n\
             <tr><td>Room Charges</td><td>{}</td><td>Rs {:.2}</td><td>Rs {:.2}</td></tr>\n</table>",
            bill.days_stayed, bill.rate_per_day, charges.subtotal
        );

        let _ = writeln!(
            html,
            "<table class=\"totals\">\n\
             <tr><td>Subtotal:</td><td>Rs {:.2}</td></tr>\n\
             <tr><td>CGST ({}%):</td><td>Rs {:.2}</td></tr>\n\
             <tr><td>SGST ({}%):</td><td>Rs {:.2}</td></tr>\n\
             <tr class=\"total\"><td>TOTAL AMOUNT:</td><td>Rs {:.2}</td></tr>\n</table>",
            charges.subtotal,
            percent(CGST_RATE),
            charges.cgst,
            percent(SGST_RATE),
            charges.sgst,
            charges.total
        );

        html.push_str("<p class=\"footer\">Thank you for staying with us!<br>Visit Again</p>\n");
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

impl DocumentRenderer for HtmlReceiptRenderer {
    fn render(&self, bill: &Bill) -> DeskResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            DeskError::Render(format!(
                "cannot create receipts directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let path = self.receipt_path(bill);
        std::fs::write(&path, self.render_html(bill))
            .map_err(|e| DeskError::Render(format!("cannot write {}: {}", path.display(), e)))?;

        tracing::debug!(bill = %bill.bill_number, path = %path.display(), "receipt rendered");
        Ok(path)
    }
}

/// Sends documents to the OS print spooler through an external command.
pub struct CommandPrinter {
    command: Vec<String>,
}

impl CommandPrinter {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Printer for CommandPrinter {
    fn print(&self, document: &Path) -> DeskResult<()> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| DeskError::Print("no print command configured".into()))?;

        let status = Command::new(program)
            .args(args)
            .arg(document)
            .status()
            .map_err(|e| DeskError::Print(format!("cannot run {}: {}", program, e)))?;

        if !status.success() {
            return Err(DeskError::Print(format!("{} exited with {}", program, status)));
        }

        tracing::info!(document = %document.display(), "receipt sent to printer");
        Ok(())
    }
}

const RECEIPT_STYLE: &str = "<style>
body { font-family: Helvetica, Arial, sans-serif; color: #1a1a1a; }
.receipt { max-width: 7in; margin: 0.75in auto; }
h1 { text-align: center; margin-bottom: 4px; }
.hotel { text-align: center; color: #333; margin: 2px 0; }
table { width: 100%; border-collapse: collapse; margin-top: 12px; }
.items th { background: #2c3e50; color: #fff; padding: 10px; }
.items td, .items th { border: 1px solid #999; text-align: center; padding: 8px; }
.totals td { text-align: right; padding: 6px; }
.totals .total td { font-size: 1.3em; font-weight: bold; color: #c0392b; }
.footer { text-align: center; font-weight: bold; color: #2c3e50; margin-top: 24px; }
@media print { .receipt { margin: 0 auto; } }
</style>
";

fn guest_row(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(html, "<tr><td><b>{}:</b></td><td>{}</td></tr>", label, value);
}

fn percent(rate: f64) -> String {
    format!("{}", (rate * 100.0 * 100.0).round() / 100.0)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
