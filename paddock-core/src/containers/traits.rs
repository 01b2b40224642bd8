use std::ops::Range;

use crate::{
    containers::{BufferError, RecordView, RecordViewMut},
    layout::{RecordLayout, RecordType},
};

/// Base trait for all record buffers in paddock. The only assumption this trait makes is that
/// the underlying memory can be borrowed by the buffer. Since records are stored back to back,
/// record data can be accessed both by untyped value (copying into a provided `&mut [u8]`) and
/// by reference.
pub trait BorrowedRecordBuffer<'a> {
    /// Returns the length of this buffer, i.e. the number of records. Every slot of an
    /// allocated buffer is live, so this is also the buffer's capacity.
    ///
    /// # Example
    ///
    /// ```
    /// use paddock_core::containers::*;
    /// use paddock_core::layout::*;
    ///
    /// let buffer = DynamicRecordBuffer::new_from_layout(RecordLayout::default());
    /// assert_eq!(0, buffer.len());
    /// ```
    fn len(&self) -> usize;
    /// Returns `true` if this buffer does not store any records
    ///
    /// # Example
    ///
    /// ```
    /// use paddock_core::containers::*;
    /// use paddock_core::layout::*;
    ///
    /// let buffer = DynamicRecordBuffer::new_from_layout(RecordLayout::default());
    /// assert!(buffer.is_empty());
    /// ```
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Returns the `RecordLayout` of this buffer. The `RecordLayout` describes the structure of
    /// a single record at runtime.
    ///
    /// # Example
    ///
    /// ```
    /// use paddock_core::containers::*;
    /// use paddock_core::layout::*;
    ///
    /// let layout = RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_Y]);
    /// let buffer = DynamicRecordBuffer::new_from_layout(layout.clone());
    /// assert_eq!(layout, *buffer.record_layout());
    /// ```
    fn record_layout(&self) -> &RecordLayout;
    /// Copies the data for the record at `index` from this buffer into `data`. Fails with
    /// [`BufferError::OutOfBounds`] if `index` is outside `[0, len)`.
    ///
    /// # Panics
    ///
    /// If `data.len()` does not equal `self.record_layout().size_of_record_entry()`
    fn get_record(&self, index: usize, data: &mut [u8]) -> Result<(), BufferError>;
    /// Copies the data for the given `range` of records from this buffer into `data`. Fails
    /// with [`BufferError::OutOfBounds`] if `range` is not contained in `[0, len)`.
    ///
    /// # Panics
    ///
    /// If `data.len()` does not equal `range.len() * self.record_layout().size_of_record_entry()`
    fn get_record_range(&self, range: Range<usize>, data: &mut [u8]) -> Result<(), BufferError>;
    /// Gets an immutable slice of the memory of the record at `index`. Fails with
    /// [`BufferError::OutOfBounds`] if `index` is outside `[0, len)`.
    ///
    /// # Lifetimes
    ///
    /// Has a more relaxed lifetime bound than the underlying buffer, since record data may be
    /// borrowed for a lifetime `'b` that is potentially shorter than the lifetime `'a` of the
    /// buffer itself
    fn get_record_ref<'b>(&'b self, index: usize) -> Result<&'b [u8], BufferError>
    where
        'a: 'b;
    /// Gets an immutable slice of the memory for the given `range` of records. This is the
    /// range version of [`get_record_ref`](Self::get_record_ref)
    fn get_record_range_ref<'b>(&'b self, range: Range<usize>) -> Result<&'b [u8], BufferError>
    where
        'a: 'b;
}

/// Trait for a record buffer that mutably borrows its memory. Compared to
/// [`BorrowedRecordBuffer`], buffers that implement this trait additionally support overwriting
/// record data in place through `set_record`, shuffling records through `swap`, and mutable
/// views through `view_mut`.
pub trait BorrowedRecordBufferMut<'a>: BorrowedRecordBuffer<'a> {
    /// Sets the data for the record at the given `index`. Fails with
    /// [`BufferError::OutOfBounds`] if `index` is outside `[0, len)`.
    ///
    /// `record_data` must contain the memory of a single record in the `RecordLayout` of this
    /// buffer. Record types are valid for any bit pattern, so a mismatched layout cannot cause
    /// undefined behavior, only garbage records.
    ///
    /// # Panics
    ///
    /// If `record_data.len()` does not equal `self.record_layout().size_of_record_entry()`
    fn set_record(&mut self, index: usize, record_data: &[u8]) -> Result<(), BufferError>;
    /// Sets the data for the given range of records. This is more efficient than calling
    /// [`set_record`](Self::set_record) repeatedly, which performs an index check on every
    /// call. Assumes `record_data` is tightly packed.
    ///
    /// # Panics
    ///
    /// If `record_data.len()` does not equal `record_range.len() * self.record_layout().size_of_record_entry()`
    fn set_record_range(
        &mut self,
        record_range: Range<usize>,
        record_data: &[u8],
    ) -> Result<(), BufferError>;
    /// Gets a mutable slice of the memory of the record at `index`. This is the mutable version
    /// of [`BorrowedRecordBuffer::get_record_ref`]
    fn get_record_mut<'b>(&'b mut self, index: usize) -> Result<&'b mut [u8], BufferError>
    where
        'a: 'b;
    /// Gets a mutable slice of the memory for the given `range` of records. This is the mutable
    /// version of [`BorrowedRecordBuffer::get_record_range_ref`]
    fn get_record_range_mut<'b>(
        &'b mut self,
        range: Range<usize>,
    ) -> Result<&'b mut [u8], BufferError>
    where
        'a: 'b;
    /// Swaps the two records at `from_index` and `to_index`. Implementations must allow the
    /// case where `from_index == to_index`
    fn swap(&mut self, from_index: usize, to_index: usize) -> Result<(), BufferError>;
}

/// Trait for record buffers that own their memory. Compared to [`BorrowedRecordBufferMut`],
/// buffers that implement this trait additionally support pushing records, resizing, clearing,
/// and explicit release of the backing storage.
pub trait OwningRecordBuffer<'a>: BorrowedRecordBufferMut<'a> + Sized {
    /// Pushes the raw memory of a single record into this buffer. Works similar to `Vec::push`
    ///
    /// # Panics
    ///
    /// If `record_bytes.len()` does not equal `self.record_layout().size_of_record_entry()`
    fn push_record(&mut self, record_bytes: &[u8]);
    /// Resizes this buffer to contain exactly `new_count` records. Records at indices
    /// `< min(len, new_count)` keep their values; if `new_count` exceeds the current length the
    /// contents of the new slots are unspecified, if it is smaller the truncated records are
    /// discarded without being read.
    ///
    /// Fails with [`BufferError::AllocationFailed`] if the backing storage cannot be grown. On
    /// failure the buffer is valid and unchanged: additional storage is reserved before any
    /// observable mutation, so a failed resize never leaves a dangling or partially-moved
    /// buffer behind.
    fn resize(&mut self, new_count: usize) -> Result<(), BufferError>;
    /// Clears the contents of this buffer, removing all record data and setting the length to `0`
    fn clear(&mut self);
    /// Relinquishes the backing storage, consuming the buffer. Dropping the buffer has the same
    /// effect; `release` is the explicit end of the lifecycle. Because the buffer is taken by
    /// value, releasing twice or accessing a released buffer is a compile error rather than a
    /// runtime condition.
    fn release(self);
}

/// Extension trait for `BorrowedRecordBuffer` that allows obtaining strongly-typed views over
/// records.
///
/// # Notes
///
/// The `view` method lives in an extension trait and not in `BorrowedRecordBuffer` itself so
/// that trait objects of the buffer traits keep working: both statically-typed buffers and
/// `dyn BorrowedRecordBuffer` values can produce views.
pub trait BorrowedRecordBufferExt<'a>: BorrowedRecordBuffer<'a> {
    /// Gets a strongly typed view of the records of this buffer
    ///
    /// # Panics
    ///
    /// If `T::layout()` does not match the `RecordLayout` of this buffer
    fn view<'b, T: RecordType>(&'b self) -> RecordView<'a, 'b, Self, T>
    where
        'a: 'b,
    {
        RecordView::new(self)
    }
}

impl<'a, T: BorrowedRecordBuffer<'a>> BorrowedRecordBufferExt<'a> for T {}
impl<'a> BorrowedRecordBufferExt<'a> for dyn BorrowedRecordBuffer<'a> + 'a {}
impl<'a> BorrowedRecordBufferExt<'a> for dyn BorrowedRecordBufferMut<'a> + 'a {}

/// Extension trait for `BorrowedRecordBufferMut` that allows obtaining strongly-typed mutable
/// views over records.
pub trait BorrowedRecordBufferMutExt<'a>: BorrowedRecordBufferMut<'a> {
    /// Gets a strongly typed view of the records of this buffer. This view allows mutating the
    /// record data!
    ///
    /// # Panics
    ///
    /// If `T::layout()` does not match the `RecordLayout` of this buffer
    fn view_mut<'b, T: RecordType>(&'b mut self) -> RecordViewMut<'a, 'b, Self, T>
    where
        'a: 'b,
    {
        RecordViewMut::new(self)
    }
}

impl<'a, T: BorrowedRecordBufferMut<'a>> BorrowedRecordBufferMutExt<'a> for T {}
impl<'a> BorrowedRecordBufferMutExt<'a> for dyn BorrowedRecordBufferMut<'a> + 'a {}

/// Trait for all buffers that can be default-constructed from a given `RecordLayout`. This
/// trait is helpful for generic code that needs to construct a buffer without knowing the
/// concrete buffer type
pub trait MakeBufferFromLayout<'a>: BorrowedRecordBuffer<'a> + Sized {
    /// Creates a new empty buffer from the given `RecordLayout`
    fn new_from_layout(record_layout: RecordLayout) -> Self;
}
