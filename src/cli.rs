use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Always,
    Never,
    Auto,
}

/// Print lines matching a yre pattern.
#[derive(Debug, Clone, Parser)]
#[command(name = "yre", version)]
pub struct Config {
    /// Pattern to search for; a leading '^' anchors it to the line start
    #[arg(short = 'E', value_name = "PATTERN")]
    pub pattern: String,

    /// Print only the matched parts of each line
    #[arg(short = 'o')]
    pub only_matching: bool,

    /// Search directories recursively
    #[arg(short = 'r')]
    pub recursive: bool,

    #[arg(long, value_enum, default_value_t = ColorWhen::Never)]
    pub color: ColorWhen,

    /// Files to search; stdin when empty
    pub paths: Vec<PathBuf>,
}

impl Config {
    pub fn anchored(&self) -> bool {
        self.pattern.starts_with('^')
    }

    /// The pattern with the anchoring '^' removed.
    pub fn pattern_source(&self) -> &str {
        self.pattern.strip_prefix('^').unwrap_or(&self.pattern)
    }
}

pub fn parse_args<I, T>(args: I) -> Result<Config, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Config::try_parse_from(args)
}

pub fn resolve_use_color(color: ColorWhen) -> bool {
    match color {
        ColorWhen::Always => true,
        ColorWhen::Never => false,
        ColorWhen::Auto => io::stdout().is_terminal(),
    }
}
