//! Terminal output: two characters per module.

use std::io::Write;

use qrmask::{Matrix, State, Writer, WriterError};

const LIGHT: &str = "██";
const DARK: &str = "  ";
const UNWRITTEN: &str = "░░";

/// Draws matrices with block characters, light modules filled so the
/// result scans on a dark terminal background.
pub struct TerminalWriter<W: Write> {
    out: W,
    border: usize,
    closed: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(out: W, border: usize) -> Self {
        Self {
            out,
            border,
            closed: false,
        }
    }

    fn quiet_rows(&mut self, width: usize) -> std::io::Result<()> {
        let line = LIGHT.repeat(width + 2 * self.border);
        for _ in 0..self.border {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

impl<W: Write> Writer for TerminalWriter<W> {
    fn write(&mut self, matrix: &Matrix) -> Result<(), WriterError> {
        if self.closed {
            return Err(WriterError::Closed);
        }
        let margin = LIGHT.repeat(self.border);

        self.quiet_rows(matrix.width())?;
        for y in 0..matrix.height() {
            let mut line = margin.clone();
            for x in 0..matrix.width() {
                line.push_str(match matrix.get(x, y) {
                    Some(State::Set) => DARK,
                    Some(State::Clear) => LIGHT,
                    _ => UNWRITTEN,
                });
            }
            line.push_str(&margin);
            writeln!(self.out, "{line}")?;
        }
        self.quiet_rows(matrix.width())?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriterError> {
        if !self.closed {
            self.closed = true;
            self.out.flush()?;
        }
        Ok(())
    }
}
