use crate::desk::FrontDeskExt;
use crate::models::{Bill, BillForm, BillOutcome};
use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use tauri_plugin_opener::OpenerExt;

#[tauri::command]
pub fn generate_bill(app: AppHandle, form: BillForm) -> Result<BillOutcome, String> {
    let outcome = app.desk().generate_bill(&form).map_err(|e| e.to_string())?;
    present_receipt(&app, &outcome);
    Ok(outcome)
}

#[tauri::command]
pub fn settle_and_checkout(app: AppHandle, form: BillForm) -> Result<BillOutcome, String> {
    let outcome = app
        .desk()
        .settle_and_checkout(&form)
        .map_err(|e| e.to_string())?;
    present_receipt(&app, &outcome);
    Ok(outcome)
}

/// Returns the path of the receipt that was sent to the printer.
#[tauri::command]
pub fn print_receipt(app: AppHandle, bill_number: String) -> Result<String, String> {
    let path = app
        .desk()
        .print_receipt(&bill_number)
        .map_err(|e| e.to_string())?;
    Ok(path.to_string_lossy().into_owned())
}

#[tauri::command]
pub fn get_bill(app: AppHandle, bill_number: String) -> Result<Bill, String> {
    app.desk().bill(&bill_number).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn list_bills(app: AppHandle) -> Result<Vec<Bill>, String> {
    app.desk().bills().map_err(|e| e.to_string())
}

// Opening the viewer is best effort; the bill is already stored.
fn present_receipt(app: &AppHandle, outcome: &BillOutcome) {
    if let Some(path) = &outcome.receipt {
        if let Err(e) = app
            .opener()
            .open_path(path.to_string_lossy(), None::<&str>)
        {
            tracing::warn!(path = %path.display(), error = %e, "could not open receipt");
        }
    }

    if let Some(warning) = &outcome.warning {
        app.dialog()
            .message(format!(
                "Bill {} was saved, but the receipt could not be produced.\n{}",
                outcome.bill.bill_number, warning
            ))
            .kind(MessageDialogKind::Warning)
            .title("Receipt")
            .show(|_| {});
    }
}
