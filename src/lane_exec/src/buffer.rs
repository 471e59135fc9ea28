//! Host-visible buffers shared by pipeline stages.
//!
//! All allocation is fallible and surfaces [`ExecError::AllocationFailed`]
//! instead of aborting. Concurrent mutation only happens through views that
//! keep writers disjoint: [`Table2d`] hands out non-overlapping rows,
//! [`DoubleBuffer`] splits a read half from a write half, and
//! [`ScatterWriter`] bounds-checks every write while the caller guarantees
//! destination disjointness.

use std::marker::PhantomData;
use std::mem;

use rayon::prelude::*;

use crate::error::ExecError;

/// Allocate a zero-filled host-visible buffer, reporting allocation failure
/// instead of aborting the process.
pub fn alloc_zeroed<T: Copy + Default>(len: usize) -> Result<Vec<T>, ExecError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ExecError::AllocationFailed {
            bytes: len * mem::size_of::<T>(),
        })?;
    buf.resize(len, T::default());
    Ok(buf)
}

// ============================================================================
// Arena table
// ============================================================================

/// Fixed-size 2D table backed by one contiguous allocation.
///
/// The row is the unit of parallel mutation: [`par_rows_mut`] hands each
/// task a disjoint `&mut` row, so concurrent writers cannot alias a cell.
/// Cell reads go through [`get`]; there is no cell-level writer.
///
/// [`par_rows_mut`]: Table2d::par_rows_mut
/// [`get`]: Table2d::get
#[derive(Debug)]
pub struct Table2d<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default + Send> Table2d<T> {
    /// Allocate a `rows × cols` table of zeros. The shape is fixed for the
    /// table's lifetime.
    pub fn zeroed(rows: usize, cols: usize) -> Result<Self, ExecError> {
        assert!(rows > 0 && cols > 0, "table dimensions must be nonzero");
        Ok(Self {
            rows,
            cols,
            cells: alloc_zeroed(rows * cols)?,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Read the cell at (`row`, `col`).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col]
    }

    /// Borrow one row.
    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutably borrow one row.
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        &mut self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate all rows in parallel, each task owning a disjoint row.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = &mut [T]> + '_ {
        self.cells.par_chunks_mut(self.cols)
    }

    /// Reset every cell.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

// ============================================================================
// Double buffer
// ============================================================================

/// Ping-pong buffer pair with explicit front (read) and back (write) roles.
///
/// [`swap`] hands ownership of the freshly written back buffer to the front
/// role after a completed pass; [`parts_mut`] splits the pair so one stage
/// can read the front while scattering into the back without any chance of
/// aliasing the two.
///
/// [`swap`]: DoubleBuffer::swap
/// [`parts_mut`]: DoubleBuffer::parts_mut
#[derive(Debug)]
pub struct DoubleBuffer<T> {
    front: Vec<T>,
    back: Vec<T>,
}

impl<T: Copy + Default> DoubleBuffer<T> {
    /// Allocate both buffers zero-filled at a fixed length.
    pub fn zeroed(len: usize) -> Result<Self, ExecError> {
        Ok(Self {
            front: alloc_zeroed(len)?,
            back: alloc_zeroed(len)?,
        })
    }

    /// Length of each buffer.
    pub fn len(&self) -> usize {
        self.front.len()
    }

    /// True when the buffers hold no elements.
    pub fn is_empty(&self) -> bool {
        self.front.is_empty()
    }

    /// The current read half.
    pub fn front(&self) -> &[T] {
        &self.front
    }

    /// Copy new contents into the front buffer.
    pub fn load(&mut self, data: &[T]) {
        assert_eq!(data.len(), self.front.len(), "load length must match buffer length");
        self.front.copy_from_slice(data);
    }

    /// Split into the readable front and the writable back.
    pub fn parts_mut(&mut self) -> (&[T], &mut [T]) {
        (&self.front, &mut self.back)
    }

    /// Make the back buffer the new front after a completed pass.
    pub fn swap(&mut self) {
        mem::swap(&mut self.front, &mut self.back);
    }
}

// ============================================================================
// Scatter view
// ============================================================================

/// Shared write handle over an output buffer scattered into by many lanes
/// at once.
///
/// Every write is bounds-checked; what cannot be checked here is that two
/// lanes never target the same index, which is the caller's partitioning
/// contract and the reason [`write`](ScatterWriter::write) is `unsafe`.
pub struct ScatterWriter<'a, T> {
    ptr: *mut T,
    len: usize,
    _buffer: PhantomData<&'a mut [T]>,
}

// One writer is shared by every lane of a dispatch; lanes write disjoint
// cells, so the raw pointer is never used for overlapping writes.
unsafe impl<T: Send> Sync for ScatterWriter<'_, T> {}

impl<'a, T: Copy + Send> ScatterWriter<'a, T> {
    /// Wrap an output buffer for concurrent scattering.
    pub fn new(out: &'a mut [T]) -> Self {
        Self {
            ptr: out.as_mut_ptr(),
            len: out.len(),
            _buffer: PhantomData,
        }
    }

    /// Number of cells in the wrapped buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the wrapped buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Write `value` at `index`, failing on an out-of-bounds destination.
    ///
    /// # Safety
    /// No two lanes running in the same dispatch may write the same index.
    pub unsafe fn write(&self, index: usize, value: T) -> Result<(), ExecError> {
        if index >= self.len {
            return Err(ExecError::ScatterOutOfBounds {
                index,
                len: self.len,
            });
        }
        // SAFETY: index is in bounds and the caller keeps destinations
        // disjoint across lanes.
        unsafe { self.ptr.add(index).write(value) };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_zeroed() {
        let buf: Vec<u32> = alloc_zeroed(16).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_table_shape_and_rows() {
        let mut table = Table2d::<u32>::zeroed(4, 8).unwrap();
        assert_eq!(table.rows(), 4);
        assert_eq!(table.cols(), 8);

        table.row_mut(2)[5] = 77;
        assert_eq!(table.get(2, 5), 77);
        assert_eq!(table.row(2)[5], 77);
        assert_eq!(table.get(1, 5), 0);
    }

    #[test]
    fn test_table_par_rows_are_disjoint() {
        let mut table = Table2d::<u32>::zeroed(32, 16).unwrap();
        table.par_rows_mut().enumerate().for_each(|(r, row)| {
            for cell in row {
                *cell = r as u32;
            }
        });
        for r in 0..32 {
            assert!(table.row(r).iter().all(|&v| v == r as u32));
        }
    }

    #[test]
    fn test_table_fill() {
        let mut table = Table2d::<u32>::zeroed(2, 2).unwrap();
        table.fill(9);
        assert_eq!(table.row(1), &[9, 9]);
    }

    #[test]
    fn test_double_buffer_swap() {
        let mut buffers = DoubleBuffer::<u32>::zeroed(4).unwrap();
        buffers.load(&[1, 2, 3, 4]);

        let (front, back) = buffers.parts_mut();
        assert_eq!(front, &[1, 2, 3, 4]);
        back.copy_from_slice(&[5, 6, 7, 8]);

        buffers.swap();
        assert_eq!(buffers.front(), &[5, 6, 7, 8]);
    }

    #[test]
    #[should_panic(expected = "load length")]
    fn test_double_buffer_load_length_mismatch() {
        let mut buffers = DoubleBuffer::<u32>::zeroed(4).unwrap();
        buffers.load(&[1, 2]);
    }

    #[test]
    fn test_scatter_writer_in_bounds() {
        let mut out = vec![0u32; 4];
        let writer = ScatterWriter::new(&mut out);
        unsafe {
            writer.write(0, 10).unwrap();
            writer.write(3, 13).unwrap();
        }
        assert_eq!(out, vec![10, 0, 0, 13]);
    }

    #[test]
    fn test_scatter_writer_out_of_bounds() {
        let mut out = vec![0u32; 4];
        let writer = ScatterWriter::new(&mut out);
        let err = unsafe { writer.write(4, 99) }.unwrap_err();
        assert_eq!(err, ExecError::ScatterOutOfBounds { index: 4, len: 4 });
    }
}
