//! Pane and overlay renderers

mod overlays;
mod panes;

#[cfg(test)]
mod tests;

pub use overlays::{render_export_dialog, render_history, render_tooltip};
pub use panes::render_panes;
