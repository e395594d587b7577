pub mod interactive;
pub mod ui;
