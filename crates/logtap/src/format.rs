//! Format — one terminal line per record for console echo.
//!
//! `[<basename:15>] HH:MM:SS.mmm LEVEL message`. Color touches only the
//! level field and is reset right after it.

use chrono::Local;
use owo_colors::{OwoColorize, Style};
use std::path::Path;

use crate::parser::{Level, NormalizedRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prefix each line with the source file's basename
    pub show_filename: bool,
    pub color: bool,
    /// Render times in the local timezone instead of UTC
    pub local_time: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            show_filename: false,
            color: true,
            local_time: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineFormatter {
    options: FormatOptions,
}

impl LineFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn format(&self, record: &NormalizedRecord) -> String {
        let mut out = String::with_capacity(record.message.len() + 48);

        if self.options.show_filename {
            let name = Path::new(&record.source_path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| record.source_path.clone());
            out.push_str(&format!("[{:<15}] ", name));
        }

        let time = if self.options.local_time {
            record.timestamp.with_timezone(&Local).format("%H:%M:%S%.3f").to_string()
        } else {
            record.timestamp.format("%H:%M:%S%.3f").to_string()
        };
        out.push_str(&time);
        out.push(' ');

        let level = format!("{:<5}", record.level.as_str());
        if self.options.color {
            out.push_str(&level.style(level_style(record.level)).to_string());
        } else {
            out.push_str(&level);
        }
        out.push(' ');

        out.push_str(&record.message);
        out
    }
}

pub fn level_style(level: Level) -> Style {
    match level {
        Level::Trace => Style::new().bright_black(),
        Level::Debug => Style::new().cyan(),
        Level::Info => Style::new().green(),
        Level::Warn => Style::new().yellow(),
        Level::Error => Style::new().red(),
        Level::Fatal => Style::new().magenta().bold(),
        Level::Unknown => Style::new().white(),
    }
}
