//! Interactive session state and command parsing

use advisor_stock::config::parse_symbol_list;

pub const HELP: &str = "\
Commands:
  /stocks <s1,s2,...>  - choose the stocks to analyze
  /complex             - toggle the statistical (complex) prompt
  /list                - show the selectable stocks
  /help                - show this help
  /exit                - quit
Anything else is sent as a question about the chosen stocks.";

/// One parsed line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Stocks(Vec<String>),
    ToggleComplex,
    List,
    Help,
    Exit,
    Ask(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Some(Self::Ask(line.to_string()));
        };
        let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));

        Some(match name.to_ascii_lowercase().as_str() {
            "stocks" | "s" => Self::Stocks(parse_symbol_list(&args.to_ascii_uppercase())),
            "complex" | "c" => Self::ToggleComplex,
            "list" | "l" => Self::List,
            "exit" | "quit" | "q" => Self::Exit,
            _ => Self::Help,
        })
    }
}

/// Selections that persist between questions
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub symbols: Vec<String>,
    pub complex: bool,
}

impl Session {
    pub fn new(symbols: Vec<String>, complex: bool) -> Self {
        Self { symbols, complex }
    }

    pub fn prompt(&self) -> String {
        let mode = if self.complex { "complex" } else { "simple" };
        if self.symbols.is_empty() {
            format!("[no stocks|{mode}]> ")
        } else {
            format!("[{}|{mode}]> ", self.symbols.join(","))
        }
    }
}
