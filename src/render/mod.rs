//! Console output

pub mod reporter;

pub use reporter::{enable_terminal_colors, Level, Palette, Reporter};
