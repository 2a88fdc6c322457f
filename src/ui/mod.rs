//! Panel views

mod panel;

pub use panel::LogPanel;
