use std::io::{self, IsTerminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Operator,
    Agent,
}

/// `--output json` always wins; otherwise piped stdout selects agent mode.
pub fn detect_mode(output_json: bool) -> Mode {
    if output_json || !io::stdout().is_terminal() {
        Mode::Agent
    } else {
        Mode::Operator
    }
}
