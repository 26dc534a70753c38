//! Partitioned buffer with O(1) logical rotation.
//!
//! Provides a fixed-capacity buffer divided into equal-sized partitions with:
//! - Zero-copy partition views into a single contiguous allocation
//! - Rotation that remaps partition indices instead of moving elements
//! - Generic element type
//!
//! A buffer of 3 partitions of 5 samples owns 15 contiguous elements:
//!
//! ```text
//! partition 0 -> elements 0..5
//! partition 1 -> elements 5..10
//! partition 2 -> elements 10..15
//! ```
//!
//! After one [`rotate`](PartitionedRingBuffer::rotate) call, partition 0
//! addresses elements `5..10`, partition 1 addresses `10..15`, and partition 2
//! wraps around to `0..5`. No element moves; only the mapping advances.
//! Callers never track where a partition physically points.
//!
//! Intended for streaming pipelines (audio frame processing) where a producer
//! repeatedly fills "the next" partition while consumers read "the previous"
//! ones, with [`rotate`](PartitionedRingBuffer::rotate) advancing the roles
//! between frames.

#![deny(unsafe_code)]

use std::num::NonZero;

use derive_more::Debug;

/// Recommended maximum partition count. It is possible to create a buffer
/// with more partitions, but the rotation addressing is designed for small
/// partition counts (indices that fit in a byte).
pub const MAX_PARTITIONS: usize = 255;

/// Errors returned by partition operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Logical partition index at or beyond the partition count.
    BadPartitionIndex,
    /// Fill source whose length does not match the partition length.
    BadSourceLength,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadPartitionIndex => write!(f, "bad partition index"),
            Self::BadSourceLength => write!(f, "bad source length"),
        }
    }
}

impl std::error::Error for Error {}

/// A fixed-capacity buffer split into equal-sized partitions with a rotating
/// logical-to-physical mapping.
///
/// The buffer tracks a single rotation counter and supports:
/// - [`fill_partition`](Self::fill_partition): bulk-copy one partition's
///   worth of elements into a logical slot
/// - [`partition`](Self::partition) / [`partition_mut`](Self::partition_mut):
///   borrow a logical slot as a slice, without copying
/// - [`partition_to_vec`](Self::partition_to_vec): copy a logical slot out
/// - [`rotate`](Self::rotate): advance the mapping by one partition in O(1),
///   leaving the stored elements where they are
///
/// There is no internal synchronization. Mutation requires `&mut self`, so a
/// pipeline sharing one buffer between a producer and consumers must
/// serialize access externally.
///
/// # Invariants
///
/// - the backing storage always holds exactly
///   `num_partitions * partition_len` elements
/// - the rotation counter stays in `0..num_partitions`
/// - the logical-to-physical mapping `(index + rotation) % num_partitions`
///   is a cyclic permutation, so distinct logical indices never share a slot
#[derive(Debug, Clone)]
pub struct PartitionedRingBuffer<T> {
    #[debug(skip)]
    data: Vec<T>,
    num_partitions: usize,
    partition_len: usize,
    /// Rotation steps applied so far, wrapped to `0..num_partitions`.
    shifts: usize,
}

impl<T: Clone + Default> PartitionedRingBuffer<T> {
    /// Creates a buffer of `num_partitions` partitions holding
    /// `partition_len` elements each, all default-initialized.
    ///
    /// Logs a warning if the partition count exceeds [`MAX_PARTITIONS`].
    pub fn new(num_partitions: NonZero<usize>, partition_len: NonZero<usize>) -> Self {
        let num_partitions = num_partitions.get();
        let partition_len = partition_len.get();
        if num_partitions > MAX_PARTITIONS {
            tracing::warn!(
                "PartitionedRingBuffer exceeds the recommended partition count. Partitions: {}",
                num_partitions
            );
        }
        Self {
            data: vec![T::default(); num_partitions * partition_len],
            num_partitions,
            partition_len,
            shifts: 0,
        }
    }

    /// Resets the buffer to its initial state, zeroing the rotation and
    /// default-filling every element. The dimensions are kept.
    pub fn clear(&mut self) {
        self.shifts = 0;
        self.data.fill(T::default());
    }
}

impl<T: Clone> PartitionedRingBuffer<T> {
    /// Copies `source` into the logical partition `index`.
    ///
    /// `source` must hold exactly [`partition_len`](Self::partition_len)
    /// elements. The copy is a plain linear `clone_from_slice` into the slot
    /// currently backing `index`; no allocation takes place.
    ///
    /// Returns [`Error::BadPartitionIndex`] if `index` is out of range and
    /// [`Error::BadSourceLength`] on a length mismatch. Nothing is written
    /// in either case.
    pub fn fill_partition(&mut self, index: usize, source: &[T]) -> Result<(), Error> {
        let start = self.partition_start(index)?;
        if source.len() != self.partition_len {
            return Err(Error::BadSourceLength);
        }
        self.data[start..start + self.partition_len].clone_from_slice(source);
        Ok(())
    }

    /// Copies the logical partition `index` into a freshly allocated `Vec`.
    ///
    /// This is the only operation that allocates after construction.
    ///
    /// Returns [`Error::BadPartitionIndex`] if `index` is out of range.
    pub fn partition_to_vec(&self, index: usize) -> Result<Vec<T>, Error> {
        self.partition(index).map(<[T]>::to_vec)
    }
}

impl<T> PartitionedRingBuffer<T> {
    /// Number of partitions.
    #[inline]
    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    /// Number of elements in each partition.
    #[inline]
    pub fn partition_len(&self) -> usize {
        self.partition_len
    }

    /// Total number of elements in the buffer,
    /// `num_partitions * partition_len`.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Rotation steps currently applied, in `0..num_partitions`.
    #[inline]
    pub fn rotation(&self) -> usize {
        self.shifts
    }

    /// Advances the partition mapping by one slot, wrapping around.
    ///
    /// No data moves. After the call every logical index `i` addresses the
    /// slot previously addressed by `i + 1`, so the whole window slides
    /// forward at constant cost regardless of the buffer dimensions.
    #[inline]
    pub fn rotate(&mut self) {
        self.shifts = (self.shifts + 1) % self.num_partitions;
    }

    /// Applies `offset` rotation steps in a single call.
    ///
    /// Positive offsets advance the mapping like repeated
    /// [`rotate`](Self::rotate) calls; negative offsets undo them. The
    /// offset is reduced modulo the partition count, so any magnitude is
    /// valid.
    pub fn rotate_by(&mut self, offset: isize) {
        let partitions = self.num_partitions as isize;
        self.shifts = (self.shifts as isize + offset).rem_euclid(partitions) as usize;
    }

    /// Borrows the logical partition `index` as a read-only slice.
    ///
    /// The view is exactly [`partition_len`](Self::partition_len) contiguous
    /// elements of the slot currently backing `index`; no copy is made.
    ///
    /// Returns [`Error::BadPartitionIndex`] if `index` is out of range.
    #[inline]
    pub fn partition(&self, index: usize) -> Result<&[T], Error> {
        let start = self.partition_start(index)?;
        Ok(&self.data[start..start + self.partition_len])
    }

    /// Borrows the logical partition `index` as a mutable slice.
    ///
    /// Returns [`Error::BadPartitionIndex`] if `index` is out of range.
    #[inline]
    pub fn partition_mut(&mut self, index: usize) -> Result<&mut [T], Error> {
        let start = self.partition_start(index)?;
        Ok(&mut self.data[start..start + self.partition_len])
    }

    /// Raw access to the backing storage, in physical slot order.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw access to the backing storage.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Physical slot currently backing a logical index.
    #[inline]
    fn physical_index(&self, index: usize) -> usize {
        (index + self.shifts) % self.num_partitions
    }

    /// Start offset of the slot backing `index`, checked before any element
    /// is touched.
    fn partition_start(&self, index: usize) -> Result<usize, Error> {
        if index >= self.num_partitions {
            return Err(Error::BadPartitionIndex);
        }
        Ok(self.physical_index(index) * self.partition_len)
    }
}
