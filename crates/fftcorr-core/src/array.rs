//! Row-major 2D sample grids.
//!
//! [`Array2D`] is the exchange type between the correlation engine and its
//! host: the host hands in an image and a kernel, the engine hands back an
//! array of the image's shape.
//!
//! # Memory Layout
//!
//! Samples are stored in **row-major** order, top-to-bottom:
//!
//! ```text
//! Memory: [a00 a01 a02 ...]  <- Row 0
//!         [a10 a11 a12 ...]  <- Row 1
//!         ...
//! ```
//!
//! Sample `(row, col)` lives at index `row * cols + col`.
//!
//! # Usage
//!
//! ```rust
//! use fftcorr_core::Array2D;
//!
//! let mut a = Array2D::from_rows(vec![
//!     vec![1.0f64, 2.0, 3.0],
//!     vec![4.0, 5.0, 6.0],
//! ]).unwrap();
//!
//! assert_eq!(a.dims(), (2, 3));
//! assert_eq!(a[(1, 2)], 6.0);
//!
//! a[(0, 0)] = 10.0;
//! assert_eq!(a.row(0), &[10.0, 2.0, 3.0]);
//! ```
//!
//! Empty grids (`0 x n` or `n x 0`) are representable. Operations that need
//! a non-empty operand reject them with their own error.

use crate::{Error, Result};
use std::ops::{Index, IndexMut};

/// Owned row-major 2D grid with explicit `rows x cols` shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2D<T> {
    /// Samples, row-major
    data: Vec<T>,
    /// Number of rows
    rows: usize,
    /// Number of columns
    cols: usize,
}

impl<T> Array2D<T> {
    /// Wraps a flat row-major buffer.
    ///
    /// Fails with [`Error::DimensionMismatch`] when `data.len() != rows * cols`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fftcorr_core::Array2D;
    ///
    /// let a = Array2D::new(2, 2, vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(a[(1, 0)], 3);
    /// assert!(Array2D::new(2, 2, vec![1, 2, 3]).is_err());
    /// ```
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let expected = checked_len(rows, cols)?;
        if data.len() != expected {
            return Err(Error::dimension_mismatch(rows, cols, data.len()));
        }
        Ok(Self { data, rows, cols })
    }

    /// Builds a grid from nested rows.
    ///
    /// Every row must have the same length as the first one, otherwise
    /// [`Error::RaggedRows`] is returned. An empty outer vector yields a
    /// `0 x 0` grid.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        let mut data = Vec::with_capacity(checked_len(n_rows, n_cols)?);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(Error::RaggedRows {
                    row: r,
                    expected: n_cols,
                    got: row.len(),
                });
            }
            data.extend(row);
        }

        Ok(Self {
            data,
            rows: n_rows,
            cols: n_cols,
        })
    }

    /// Builds a grid by evaluating `f(row, col)` for every cell.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let len = rows.checked_mul(cols).expect("array dimensions overflow");
        let mut data = Vec::with_capacity(len);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { data, rows, cols }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if either extent is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Returns the sample at `(row, col)`, or `None` when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Mutable variant of [`get`](Self::get).
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// Borrows row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row {} out of range for {} rows", row, self.rows);
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterates over rows as slices.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact rejects a zero chunk size; zero-width grids yield no rows
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Row-major view of all samples.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major view of all samples.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the grid, returning the row-major buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterates over samples in row-major order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Applies `f` to every sample, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Array2D<U> {
        Array2D {
            data: self.data.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Clone> Array2D<T> {
    /// Creates a grid with every sample set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        let len = rows.checked_mul(cols).expect("array dimensions overflow");
        Self {
            data: vec![value; len],
            rows,
            cols,
        }
    }

    /// Rotates the grid by 180 degrees (flips both axes).
    ///
    /// Convolving with `k` is correlating with `k.flipped()`.
    ///
    /// ```rust
    /// use fftcorr_core::Array2D;
    ///
    /// let k = Array2D::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    /// assert_eq!(k.flipped().as_slice(), &[4, 3, 2, 1]);
    /// ```
    pub fn flipped(&self) -> Self {
        let mut data = self.data.clone();
        data.reverse();
        Self {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Shifts content down by `row_shift` and right by `col_shift` with
    /// wraparound, so `out[(r + row_shift) % rows][(c + col_shift) % cols]`
    /// equals `self[r][c]`.
    ///
    /// ```rust
    /// use fftcorr_core::Array2D;
    ///
    /// let a = Array2D::from_rows(vec![vec![1, 2, 3]]).unwrap();
    /// assert_eq!(a.circular_shift(0, 1).as_slice(), &[3, 1, 2]);
    /// ```
    pub fn circular_shift(&self, row_shift: usize, col_shift: usize) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        let (rows, cols) = (self.rows, self.cols);
        Self::from_fn(rows, cols, |r, c| {
            let sr = (r + rows - row_shift % rows) % rows;
            let sc = (c + cols - col_shift % cols) % cols;
            self.data[sr * cols + sc].clone()
        })
    }
}

impl<T: Clone + Default> Array2D<T> {
    /// Creates a grid of `T::default()` samples.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }
}

impl<T> Index<(usize, usize)> for Array2D<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} array",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2D<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} array",
            row,
            col,
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

#[inline]
fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(Error::Overflow { rows, cols })
}
