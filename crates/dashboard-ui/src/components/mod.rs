pub mod filter_panel;
pub mod header;
pub mod progress_bar;
