use thiserror::Error;

use crate::matrix::Matrix;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("writer is already closed")]
    Closed,
}

/// A destination for finished matrices: a file, a terminal, a buffer.
///
/// `close` must be called once after the final `write`, whether or not the
/// write succeeded. [`write_and_close`] does both.
pub trait Writer {
    /// Externalize a finished matrix.
    fn write(&mut self, matrix: &Matrix) -> Result<(), WriterError>;

    /// Release any resources held by the writer.
    fn close(&mut self) -> Result<(), WriterError>;
}

/// A writer that accepts everything and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopWriter;

impl Writer for NopWriter {
    fn write(&mut self, _matrix: &Matrix) -> Result<(), WriterError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriterError> {
        Ok(())
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    fn write(&mut self, matrix: &Matrix) -> Result<(), WriterError> {
        (**self).write(matrix)
    }

    fn close(&mut self) -> Result<(), WriterError> {
        (**self).close()
    }
}

/// Write `matrix`, then close the writer even if the write failed.
///
/// Returns the write error if there was one, otherwise the close result.
pub fn write_and_close<W: Writer + ?Sized>(
    writer: &mut W,
    matrix: &Matrix,
) -> Result<(), WriterError> {
    let written = writer.write(matrix);
    let closed = writer.close();
    tracing::trace!(
        write_ok = written.is_ok(),
        close_ok = closed.is_ok(),
        "closed writer"
    );
    written.and(closed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records calls and optionally fails on write.
    #[derive(Default)]
    struct Recorder {
        fail_write: bool,
        writes: usize,
        closes: usize,
    }

    impl Writer for Recorder {
        fn write(&mut self, _matrix: &Matrix) -> Result<(), WriterError> {
            self.writes += 1;
            if self.fail_write {
                return Err(WriterError::Encode("boom".into()));
            }
            Ok(())
        }

        fn close(&mut self) -> Result<(), WriterError> {
            self.closes += 1;
            Ok(())
        }
    }

    #[test]
    fn nop_writer_accepts_and_closes() {
        let mut w = NopWriter;
        assert!(w.write(&Matrix::new(21, 21)).is_ok());
        assert!(w.close().is_ok());
    }

    #[test]
    fn write_and_close_closes_after_success() {
        let mut w = Recorder::default();
        write_and_close(&mut w, &Matrix::new(3, 3)).unwrap();
        assert_eq!(w.writes, 1);
        assert_eq!(w.closes, 1);
    }

    #[test]
    fn write_and_close_closes_after_failure() {
        let mut w = Recorder {
            fail_write: true,
            ..Default::default()
        };
        let err = write_and_close(&mut w, &Matrix::new(3, 3)).unwrap_err();
        assert!(matches!(err, WriterError::Encode(_)));
        assert_eq!(w.closes, 1);
    }

    #[test]
    fn boxed_writer_delegates() {
        let mut w: Box<dyn Writer> = Box::new(NopWriter);
        assert!(write_and_close(&mut w, &Matrix::new(1, 1)).is_ok());
    }
}
