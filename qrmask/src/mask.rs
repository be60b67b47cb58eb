//! QR code mask patterns and mask application.
//!
//! A mask is built from a matrix holding only the function patterns
//! (finder, timing, alignment, format). Modules already written are flagged
//! `Reserved` in the mask and never inverted; every unwritten module gets
//! `Set` where the pattern's predicate holds and `Clear` elsewhere.
//! [`Mask::apply_to`] then flips the data modules under `Set`.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::MaskError;
use crate::matrix::{Direction, Matrix, State};

/// A mask predicate. Returns true where the data module is inverted.
pub type ModuloFn = fn(usize, usize) -> bool;

/// The eight QR code mask patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (x + y) mod 2 == 0
    Pattern0,
    /// y mod 2 == 0
    Pattern1,
    /// x mod 3 == 0
    Pattern2,
    /// (x + y) mod 3 == 0
    Pattern3,
    /// (floor(x / 3) + floor(y / 2)) mod 2 == 0
    Pattern4,
    /// (x * y) mod 2 + (x * y) mod 3 == 0
    Pattern5,
    /// ((x * y) mod 2 + (x * y) mod 3) mod 2 == 0
    Pattern6,
    /// ((x + y) mod 2 + (x * y) mod 3) mod 2 == 0
    Pattern7,
}

impl MaskPattern {
    /// All patterns in ordinal order.
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern::Pattern0,
        MaskPattern::Pattern1,
        MaskPattern::Pattern2,
        MaskPattern::Pattern3,
        MaskPattern::Pattern4,
        MaskPattern::Pattern5,
        MaskPattern::Pattern6,
        MaskPattern::Pattern7,
    ];

    /// Look up a pattern by its ordinal (0-7).
    pub fn from_index(mode: u8) -> Result<MaskPattern, MaskError> {
        Self::ALL
            .get(mode as usize)
            .copied()
            .ok_or(MaskError::UnknownPattern(mode))
    }

    /// The ordinal of this pattern (0-7).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The predicate bound to this pattern.
    pub fn predicate(self) -> ModuloFn {
        match self {
            MaskPattern::Pattern0 => modulo0,
            MaskPattern::Pattern1 => modulo1,
            MaskPattern::Pattern2 => modulo2,
            MaskPattern::Pattern3 => modulo3,
            MaskPattern::Pattern4 => modulo4,
            MaskPattern::Pattern5 => modulo5,
            MaskPattern::Pattern6 => modulo6,
            MaskPattern::Pattern7 => modulo7,
        }
    }

    /// Human-readable formula for this pattern.
    pub fn formula(self) -> &'static str {
        match self {
            MaskPattern::Pattern0 => "(x + y) mod 2 == 0",
            MaskPattern::Pattern1 => "y mod 2 == 0",
            MaskPattern::Pattern2 => "x mod 3 == 0",
            MaskPattern::Pattern3 => "(x + y) mod 3 == 0",
            MaskPattern::Pattern4 => "(floor(x / 3) + floor(y / 2)) mod 2 == 0",
            MaskPattern::Pattern5 => "(x * y) mod 2 + (x * y) mod 3 == 0",
            MaskPattern::Pattern6 => "((x * y) mod 2 + (x * y) mod 3) mod 2 == 0",
            MaskPattern::Pattern7 => "((x + y) mod 2 + (x * y) mod 3) mod 2 == 0",
        }
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = MaskError;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        MaskPattern::from_index(mode)
    }
}

impl From<MaskPattern> for u8 {
    fn from(pattern: MaskPattern) -> u8 {
        pattern.index()
    }
}

/// Look up the predicate for a raw mode identifier.
///
/// Returns `None` for anything outside 0-7; there is no fallback pattern.
pub fn predicate_for(mode: u8) -> Option<ModuloFn> {
    MaskPattern::from_index(mode).ok().map(MaskPattern::predicate)
}

fn modulo0(x: usize, y: usize) -> bool {
    (x + y) % 2 == 0
}

fn modulo1(_x: usize, y: usize) -> bool {
    y % 2 == 0
}

fn modulo2(x: usize, _y: usize) -> bool {
    x % 3 == 0
}

fn modulo3(x: usize, y: usize) -> bool {
    (x + y) % 3 == 0
}

fn modulo4(x: usize, y: usize) -> bool {
    (x / 3 + y / 2) % 2 == 0
}

fn modulo5(x: usize, y: usize) -> bool {
    (x * y) % 2 + (x * y) % 3 == 0
}

fn modulo6(x: usize, y: usize) -> bool {
    ((x * y) % 2 + (x * y) % 3) % 2 == 0
}

fn modulo7(x: usize, y: usize) -> bool {
    ((x + y) % 2 + (x * y) % 3) % 2 == 0
}

/// A mask pattern applied to a private copy of a matrix.
#[derive(Debug, Clone)]
pub struct Mask {
    pattern: MaskPattern,
    predicate: ModuloFn,
    matrix: Matrix,
}

impl Mask {
    /// Build the mask for `pattern` over a copy of `matrix`.
    ///
    /// The caller's matrix is never modified.
    pub fn new(matrix: &Matrix, pattern: MaskPattern) -> Result<Mask, MaskError> {
        let predicate = pattern.predicate();
        let masked = mask_cells(matrix, Direction::Column, predicate)?;

        tracing::debug!(
            pattern = pattern.index(),
            width = masked.width(),
            height = masked.height(),
            inverted = masked.count(State::Set),
            preserved = masked.count(State::Reserved),
            "built mask"
        );

        Ok(Mask {
            pattern,
            predicate,
            matrix: masked,
        })
    }

    /// Build a mask from a raw mode identifier.
    ///
    /// An unknown mode fails before the matrix is copied.
    pub fn from_mode(matrix: &Matrix, mode: u8) -> Result<Mask, MaskError> {
        let pattern = MaskPattern::try_from(mode)?;
        Mask::new(matrix, pattern)
    }

    /// Build the candidate mask for every pattern, each from its own copy.
    pub fn all(matrix: &Matrix) -> Result<Vec<Mask>, MaskError> {
        #[cfg(feature = "parallel")]
        {
            MaskPattern::ALL[..]
                .par_iter()
                .map(|&p| Mask::new(matrix, p))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            MaskPattern::ALL
                .iter()
                .map(|&p| Mask::new(matrix, p))
                .collect()
        }
    }

    pub fn pattern(&self) -> MaskPattern {
        self.pattern
    }

    pub fn predicate(&self) -> ModuloFn {
        self.predicate
    }

    /// The transformed matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> Matrix {
        self.matrix
    }

    /// Whether the data module at (x, y) is inverted by this mask.
    pub fn is_inverted(&self, x: usize, y: usize) -> bool {
        self.matrix.get(x, y) == Some(State::Set)
    }

    /// Apply the mask to a data-filled matrix of the same size.
    ///
    /// Modules under `Set` are flipped. Modules under `Reserved` or `Clear`
    /// are copied unchanged, so function patterns keep their values.
    pub fn apply_to(&self, data: &Matrix) -> Result<Matrix, MaskError> {
        if data.width() != self.matrix.width() || data.height() != self.matrix.height() {
            return Err(MaskError::DimensionMismatch {
                mask_width: self.matrix.width(),
                mask_height: self.matrix.height(),
                data_width: data.width(),
                data_height: data.height(),
            });
        }

        let mut out = data.copy();
        for (x, y, state) in data.cells(Direction::Column) {
            if self.is_inverted(x, y) {
                out.set(x, y, state.inverted())?;
            }
        }
        Ok(out)
    }
}

impl PartialEq for Mask {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.matrix == other.matrix
    }
}

impl Eq for Mask {}

/// Copy `source` and rewrite every module in one pass.
///
/// Modules already written become `Reserved`; the predicate is only
/// evaluated on unwritten modules.
pub(crate) fn mask_cells<F>(
    source: &Matrix,
    direction: Direction,
    mut predicate: F,
) -> Result<Matrix, MaskError>
where
    F: FnMut(usize, usize) -> bool,
{
    let mut out = source.copy();
    for (x, y, state) in source.cells(direction) {
        let next = if state != State::Reserved {
            State::Reserved
        } else if predicate(x, y) {
            State::Set
        } else {
            State::Clear
        };
        out.set(x, y, next)?;
    }
    Ok(out)
}
