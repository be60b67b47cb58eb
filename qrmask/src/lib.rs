pub mod error;
pub mod matrix;
pub mod mask;
pub mod writer;
pub mod render;
#[cfg(feature = "serde")]
pub mod config;

pub use error::{MaskError, MatrixError};
pub use mask::{predicate_for, Mask, MaskPattern, ModuloFn};
pub use matrix::{Direction, Matrix, State};
pub use writer::{write_and_close, NopWriter, Writer, WriterError};
