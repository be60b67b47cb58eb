use crate::error::MatrixError;

/// The state of a single module in a [`Matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// Not yet written. In a finished mask, a module masking must not touch.
    #[default]
    Reserved,
    /// A dark ("on") module.
    Set,
    /// A light ("off") module.
    Clear,
}

impl State {
    /// Character used by [`Matrix::data_string`].
    pub fn to_char(self) -> char {
        match self {
            State::Reserved => '.',
            State::Set => '#',
            State::Clear => '_',
        }
    }

    /// Flip `Set` and `Clear`; `Reserved` stays `Reserved`.
    pub fn inverted(self) -> State {
        match self {
            State::Reserved => State::Reserved,
            State::Set => State::Clear,
            State::Clear => State::Set,
        }
    }
}

/// Traversal order for [`Matrix::iterate`] and [`Matrix::cells`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Row by row: `y` outer, `x` inner.
    Row,
    /// Column by column: `x` outer, `y` inner.
    Column,
}

/// A rectangular grid of module states, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    width: usize,
    height: usize,
    cells: Vec<State>,
}

impl Matrix {
    /// Create a matrix with every module `Reserved`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`. Use [`Matrix::try_new`]
    /// for untrusted dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create a matrix with every module `Reserved`, rejecting dimensions
    /// whose module count overflows `usize`.
    pub fn try_new(width: usize, height: usize) -> Result<Self, MatrixError> {
        let len = width
            .checked_mul(height)
            .ok_or(MatrixError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![State::Reserved; len],
        })
    }

    /// Parse a matrix from newline-separated rows of `.`, `#`/`1`, `_`/`0`.
    ///
    /// Blank lines and leading/trailing whitespace on each row are ignored.
    /// All rows must have the same length.
    pub fn from_data_string(data: &str) -> Result<Matrix, MatrixError> {
        let mut width = None;
        let mut cells = Vec::new();
        let mut height = 0;

        for line in data.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = height;
            let start = cells.len();
            for (col, c) in line.chars().enumerate() {
                cells.push(match c {
                    '.' => State::Reserved,
                    '#' | '1' => State::Set,
                    '_' | '0' => State::Clear,
                    _ => return Err(MatrixError::InvalidChar(c, row, col)),
                });
            }
            let found = cells.len() - start;
            let expected = *width.get_or_insert(found);
            if found != expected {
                return Err(MatrixError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            height += 1;
        }

        let width = width.ok_or(MatrixError::Empty)?;
        Ok(Matrix {
            width,
            height,
            cells,
        })
    }

    /// Serialize to the format accepted by [`Matrix::from_data_string`].
    pub fn data_string(&self) -> String {
        let mut s = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                s.push(self.cells[y * self.width + x].to_char());
            }
            s.push('\n');
        }
        s
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// An independent deep copy.
    pub fn copy(&self) -> Matrix {
        self.clone()
    }

    /// Get the state at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<State> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Set the state at (x, y).
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, state: State) -> Result<(), MatrixError> {
        if x >= self.width || y >= self.height {
            return Err(MatrixError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.cells[y * self.width + x] = state;
        Ok(())
    }

    /// Visit every module exactly once in the given order.
    pub fn iterate<F>(&self, direction: Direction, mut visit: F)
    where
        F: FnMut(usize, usize, State),
    {
        for (x, y, state) in self.cells(direction) {
            visit(x, y, state);
        }
    }

    /// Iterator over `(x, y, state)` in the given order.
    pub fn cells(&self, direction: Direction) -> Cells<'_> {
        Cells {
            matrix: self,
            direction,
            index: 0,
        }
    }

    /// Number of modules currently in `state`.
    pub fn count(&self, state: State) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }
}

/// Iterator returned by [`Matrix::cells`].
pub struct Cells<'a> {
    matrix: &'a Matrix,
    direction: Direction,
    index: usize,
}

impl Iterator for Cells<'_> {
    type Item = (usize, usize, State);

    fn next(&mut self) -> Option<Self::Item> {
        let (w, h) = (self.matrix.width, self.matrix.height);
        if self.index >= self.matrix.cells.len() {
            return None;
        }
        let (x, y) = match self.direction {
            Direction::Row => (self.index % w, self.index / w),
            Direction::Column => (self.index / h, self.index % h),
        };
        self.index += 1;
        Some((x, y, self.matrix.cells[y * w + x]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.matrix.cells.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells<'_> {}
