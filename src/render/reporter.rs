//! Leveled status lines for the terminal
//!
//! Every line the user sees goes through [`Reporter`]. Each level gets a
//! tag (`[INFO]`, `[SUCCESS]`, `[WARNING]`, `[ERROR]`) styled with the
//! matching entry of a [`Palette`].

use console::{Style, Term};
use std::fmt::Display;
use std::io::{self, Stdout, Write};

pub const INTERRUPTED_MESSAGE: &str = "Operation interrupted by user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Success => "[SUCCESS]",
            Level::Warning => "[WARNING]",
            Level::Error => "[ERROR]",
        }
    }
}

/// Styles used for tags and banners. Built once at start-up and never changed.
#[derive(Debug, Clone)]
pub struct Palette {
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub banner: Style,
}

impl Palette {
    pub fn colored() -> Self {
        Self {
            info: Style::new().blue(),
            success: Style::new().green(),
            warning: Style::new().yellow().bold(),
            error: Style::new().red(),
            banner: Style::new().magenta(),
        }
    }

    pub fn plain() -> Self {
        Self {
            info: Style::new(),
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            banner: Style::new(),
        }
    }

    fn for_level(&self, level: Level) -> &Style {
        match level {
            Level::Info => &self.info,
            Level::Success => &self.success,
            Level::Warning => &self.warning,
            Level::Error => &self.error,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::colored()
    }
}

/// Probe whether stdout can render ANSI colours and record the answer for
/// every later [`Style`] application.
///
/// On Windows the probe also switches the console into virtual terminal mode
/// when it can. Terminals without support just get plain text.
pub fn enable_terminal_colors() -> bool {
    let enabled = console::colors_enabled() && Term::stdout().features().colors_supported();
    console::set_colors_enabled(enabled);
    tracing::debug!(enabled, "terminal colour support");
    enabled
}

/// Writes status lines to a sink. Write failures are ignored; console output
/// is best effort.
pub struct Reporter<W: Write> {
    out: W,
    palette: Palette,
}

impl Reporter<Stdout> {
    pub fn stdout(palette: Palette) -> Self {
        Self::new(io::stdout(), palette)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self { out, palette }
    }

    pub fn info(&mut self, message: impl Display) {
        self.line(Level::Info, message);
    }

    pub fn success(&mut self, message: impl Display) {
        self.line(Level::Success, message);
    }

    pub fn warning(&mut self, message: impl Display) {
        self.line(Level::Warning, message);
    }

    pub fn error(&mut self, message: impl Display) {
        self.line(Level::Error, message);
    }

    pub fn line(&mut self, level: Level, message: impl Display) {
        let tag = self.palette.for_level(level).apply_to(level.tag());
        let _ = writeln!(self.out, "{tag} {message}");
    }

    pub fn banner(&mut self, title: &str) {
        let _ = writeln!(self.out, "{}", self.palette.banner.apply_to(format!("=== {title} ===")));
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    /// Print a multi-line listing, each line indented by two spaces.
    pub fn listing(&mut self, text: &str) {
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let _ = writeln!(self.out, "  {line}");
        }
    }

    pub fn interrupted(&mut self) {
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{}", self.palette.warning.apply_to(INTERRUPTED_MESSAGE));
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
