use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} matrix")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("a {width}x{height} matrix overflows the module count")]
    TooLarge { width: usize, height: usize },

    #[error("matrix data string contains no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid character '{0}' in matrix data at row {1}, column {2}")]
    InvalidChar(char, usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    #[error("unknown mask pattern {0}, expected 0-7")]
    UnknownPattern(u8),

    #[error("matrix write failed: {0}")]
    Matrix(#[from] MatrixError),

    #[error("mask is {mask_width}x{mask_height} but data matrix is {data_width}x{data_height}")]
    DimensionMismatch {
        mask_width: usize,
        mask_height: usize,
        data_width: usize,
        data_height: usize,
    },
}
