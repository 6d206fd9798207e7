use colored::*;
use std::io::Write;

const LABEL_WIDTH: usize = 32;

/// Prints "Label : value" lines the way a configure step reports its checks.
pub struct StatusLine<W: Write> {
    out: W,
    enabled: bool,
}

impl<W: Write> StatusLine<W> {
    pub fn new(out: W) -> Self {
        Self { out, enabled: true }
    }

    /// Swallow everything; used for `--quiet`.
    pub fn silent(out: W) -> Self {
        Self { out, enabled: false }
    }

    pub fn start(&mut self, label: &str) {
        if self.enabled {
            // console output is best effort
            let _ = write!(self.out, "{:<width$}: ", label, width = LABEL_WIDTH);
        }
    }

    pub fn end(&mut self, value: Option<&str>) {
        if !self.enabled {
            return;
        }
        let _ = match value {
            Some(value) => writeln!(self.out, "{}", value.green()),
            None => writeln!(self.out, "{}", "not found".yellow()),
        };
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
