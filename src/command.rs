//! Command tokens understood by the navigator

use std::fmt;

/// All commands a session can receive at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NextPage,
    PreviousPage,
    Columns,
    Filter,
    Info,
    Help,
    Quit,
    BarChart,
    ScatterChart,
    /// Anything else, blank lines included
    Unknown(String),
}

impl Command {
    /// Parse a raw prompt line. Whitespace-trimmed, case-insensitive.
    pub fn parse(input: &str) -> Self {
        let token = input.trim().to_lowercase();
        match token.as_str() {
            "n" | "next" => Command::NextPage,
            "p" | "prev" | "previous" => Command::PreviousPage,
            "c" | "columns" | "cols" => Command::Columns,
            "f" | "filter" => Command::Filter,
            "i" | "info" => Command::Info,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            "b" | "bar" => Command::BarChart,
            "s" | "scatter" => Command::ScatterChart,
            _ => Command::Unknown(input.trim().to_string()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::NextPage => "next",
            Command::PreviousPage => "prev",
            Command::Columns => "columns",
            Command::Filter => "filter",
            Command::Info => "info",
            Command::Help => "help",
            Command::Quit => "quit",
            Command::BarChart => "bar",
            Command::ScatterChart => "scatter",
            Command::Unknown(token) => token,
        };
        write!(f, "{}", name)
    }
}

/// Outcome of reading a column index token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnToken {
    Valid(usize),
    NotAnInteger(String),
    OutOfRange(i64),
}

/// Validate a column index token against the table width
pub fn parse_column_token(token: &str, column_count: usize) -> ColumnToken {
    let trimmed = token.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n >= 0 && (n as u64) < column_count as u64 => ColumnToken::Valid(n as usize),
        Ok(n) => ColumnToken::OutOfRange(n),
        Err(_) => ColumnToken::NotAnInteger(trimmed.to_string()),
    }
}
