pub mod bills;
pub mod rooms;
