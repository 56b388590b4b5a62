//! Colored console rendering of status lines.

use console::{style, StyledObject};

use super::{Reporter, Severity};

/// Reporter printing colored lines to the terminal.
///
/// Success and info go to stdout, warnings and errors to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    bold: bool,
}

impl ConsoleReporter {
    pub fn new(bold: bool) -> Self {
        ConsoleReporter { bold }
    }

    fn styled<'a>(&self, severity: Severity, text: &'a str) -> StyledObject<&'a str> {
        let styled = match severity {
            Severity::Success => style(text).green(),
            Severity::Info => style(text).blue(),
            Severity::Warning => style(text).yellow(),
            Severity::Error => style(text).red(),
        };

        if self.bold {
            styled.bold()
        } else {
            styled
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, severity: Severity, text: &str) {
        let line = self.styled(severity, text);

        match severity {
            Severity::Success | Severity::Info => println!("{}", line),
            Severity::Warning | Severity::Error => eprintln!("{}", line),
        }
    }
}
