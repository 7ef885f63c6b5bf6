//! Widgets and views of the application window

pub mod clip_overlay;
pub mod clip_panel;
pub mod file_list;
pub mod preview;
