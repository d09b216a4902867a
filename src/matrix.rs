use crate::Error;

/// Dense row-major matrix of `f64`.
///
/// A matrix with zero rows or columns and no storage is the *invalid*
/// matrix. It stands for "absent" or "failed" wherever a constructor,
/// reader or multiply cannot produce a usable result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// The invalid (zero-sized) matrix.
    pub fn invalid() -> Self {
        Matrix {
            data: Vec::new(),
            rows: 0,
            cols: 0,
        }
    }

    /// Allocate a zero-filled `rows x cols` matrix.
    ///
    /// Returns the invalid matrix when either dimension is zero, when
    /// `rows * cols` overflows, or when the buffer cannot be allocated.
    pub fn create(rows: usize, cols: usize) -> Self {
        if rows == 0 || cols == 0 {
            return Self::invalid();
        }
        let Some(len) = rows.checked_mul(cols) else {
            return Self::invalid();
        };
        let mut data = Vec::new();
        if data.try_reserve_exact(len).is_err() {
            return Self::invalid();
        }
        data.resize(len, 0.0);
        Matrix { data, rows, cols }
    }

    /// Create a matrix from a row-major vector of data
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, Error> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidMatrix("dimensions must be non-zero"));
        }
        if Some(data.len()) != rows.checked_mul(cols) {
            return Err(Error::Truncated {
                expected: rows.saturating_mul(cols),
                found: data.len(),
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Free the storage and reset to the invalid matrix. Safe to repeat.
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.rows = 0;
        self.cols = 0;
    }

    /// True iff both dimensions are non-zero and storage is allocated.
    pub fn is_valid(&self) -> bool {
        self.rows > 0 && self.cols > 0 && self.data.len() == self.rows * self.cols
    }

    /// Number of rows; 0 for the invalid matrix.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns; 0 for the invalid matrix.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whole buffer in row order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable buffer in row order, e.g. as a receive target.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Get a value at a specific position
    pub fn get(&self, row: usize, col: usize) -> Result<f64, Error> {
        self.check_index(row, col)?;
        Ok(self.data[self.offset(row, col)])
    }

    /// Set a value at a specific position
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), Error> {
        self.check_index(row, col)?;
        let at = self.offset(row, col);
        self.data[at] = value;
        Ok(())
    }

    /// Get a row as a slice
    pub fn row(&self, row: usize) -> Result<&[f64], Error> {
        if row >= self.rows {
            return Err(self.out_of_bounds(row, 0));
        }
        let start = self.offset(row, 0);
        Ok(&self.data[start..start + self.cols])
    }

    /// View of rows `first_row..first_row + rows`.
    pub fn block(&self, first_row: usize, rows: usize) -> Result<RowBlock<'_>, Error> {
        let range = self.block_range(first_row, rows)?;
        Ok(RowBlock {
            data: &self.data[range],
            first_row,
            rows,
            cols: self.cols,
        })
    }

    /// Mutable view of rows `first_row..first_row + rows`.
    pub fn block_mut(&mut self, first_row: usize, rows: usize) -> Result<RowBlockMut<'_>, Error> {
        let range = self.block_range(first_row, rows)?;
        let cols = self.cols;
        Ok(RowBlockMut {
            data: &mut self.data[range],
            first_row,
            rows,
            cols,
        })
    }

    /// View of the whole matrix.
    pub fn as_block(&self) -> RowBlock<'_> {
        RowBlock {
            data: &self.data,
            first_row: 0,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Mutable view of the whole matrix.
    pub fn as_block_mut(&mut self) -> RowBlockMut<'_> {
        RowBlockMut {
            data: &mut self.data,
            first_row: 0,
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn check_index(&self, row: usize, col: usize) -> Result<(), Error> {
        if row >= self.rows || col >= self.cols {
            return Err(self.out_of_bounds(row, col));
        }
        Ok(())
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> Error {
        Error::IndexOutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn block_range(&self, first_row: usize, rows: usize) -> Result<std::ops::Range<usize>, Error> {
        match first_row.checked_add(rows) {
            Some(end) if end <= self.rows => Ok(first_row * self.cols..end * self.cols),
            _ => Err(self.out_of_bounds(first_row.saturating_add(rows), 0)),
        }
    }
}

/// Borrowed contiguous range of rows; never owns storage.
#[derive(Debug, Clone, Copy)]
pub struct RowBlock<'a> {
    data: &'a [f64],
    first_row: usize,
    rows: usize,
    cols: usize,
}

impl<'a> RowBlock<'a> {
    /// Row of the parent matrix this block starts at.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    /// Row `i` of the block, relative to `first_row`.
    pub fn row(&self, i: usize) -> &'a [f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}

/// Mutable counterpart of [`RowBlock`].
#[derive(Debug)]
pub struct RowBlockMut<'a> {
    data: &'a mut [f64],
    first_row: usize,
    rows: usize,
    cols: usize,
}

impl RowBlockMut<'_> {
    /// Row of the parent matrix this block starts at.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut *self.data
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }
}
