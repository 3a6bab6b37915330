use crate::desk::FrontDeskExt;
use crate::models::{Bill, Room};
use tauri::AppHandle;

#[tauri::command]
pub fn list_rooms(app: AppHandle) -> Result<Vec<Room>, String> {
    app.desk().rooms().map_err(|e| e.to_string())
}

/// Opens an occupancy episode; fails if the room is already taken.
#[tauri::command]
pub fn select_room(app: AppHandle, room_number: String) -> Result<Room, String> {
    app.desk()
        .select_room(&room_number)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn checkout_room(app: AppHandle, room_number: String) -> Result<Room, String> {
    app.desk().checkout(&room_number).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn room_history(app: AppHandle, room_number: String) -> Result<Vec<Bill>, String> {
    app.desk()
        .room_history(&room_number)
        .map_err(|e| e.to_string())
}
