//! carnet-report — printable transcript rendering.
//!
//! Formats a computed [`CalculationResult`] into a self-contained document.
//! No calculation logic lives here.
//!
//! [`CalculationResult`]: carnet_core::results::CalculationResult

pub mod html;

pub use html::{generate_html, write_html};
