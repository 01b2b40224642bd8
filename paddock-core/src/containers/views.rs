use std::marker::PhantomData;

use crate::layout::RecordType;

use super::{
    BorrowedRecordBuffer, BorrowedRecordBufferMut, BufferError, OwningRecordBuffer,
    RecordIteratorByMut, RecordIteratorByRef, RecordIteratorByValue,
};

use bytemuck::Zeroable;

/// A strongly typed, read-only view over the records of a buffer. Obtained through
/// [`view`](super::BorrowedRecordBufferExt::view); the record type's layout is validated
/// against the buffer's layout once, when the view is created.
pub struct RecordView<'a, 'b, B: BorrowedRecordBuffer<'a> + ?Sized, T: RecordType>
where
    'a: 'b,
{
    buffer: &'b B,
    _phantom: PhantomData<&'a T>,
}

impl<'a, 'b, B: BorrowedRecordBuffer<'a> + ?Sized, T: RecordType> RecordView<'a, 'b, B, T>
where
    'a: 'b,
{
    pub(crate) fn new(buffer: &'b B) -> Self {
        assert_eq!(
            T::layout(),
            *buffer.record_layout(),
            "RecordLayout of the buffer does not match the RecordLayout of type T"
        );
        Self {
            buffer,
            _phantom: Default::default(),
        }
    }

    /// Returns the record at `index` by value. Fails with [`BufferError::OutOfBounds`] if
    /// `index` is outside `[0, len)`.
    pub fn at(&self, index: usize) -> Result<T, BufferError> {
        let mut record = T::zeroed();
        self.buffer
            .get_record(index, bytemuck::bytes_of_mut(&mut record))?;
        Ok(record)
    }

    /// Returns the record at `index` by reference. Fails with [`BufferError::OutOfBounds`] if
    /// `index` is outside `[0, len)`.
    pub fn at_ref(&self, index: usize) -> Result<&'b T, BufferError> {
        Ok(bytemuck::from_bytes(self.buffer.get_record_ref(index)?))
    }

    /// Iterates over all records by reference
    pub fn iter(&self) -> RecordIteratorByRef<'b, T> {
        self.buffer.into()
    }
}

impl<'a, 'b, B: BorrowedRecordBuffer<'a> + ?Sized, T: RecordType> IntoIterator
    for RecordView<'a, 'b, B, T>
where
    'a: 'b,
{
    type Item = T;
    type IntoIter = RecordIteratorByValue<'a, 'b, T, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.buffer.into()
    }
}

/// A strongly typed view over the records of a buffer that also allows mutating the record
/// data. Obtained through [`view_mut`](super::BorrowedRecordBufferMutExt::view_mut).
pub struct RecordViewMut<'a, 'b, B: BorrowedRecordBufferMut<'a> + ?Sized, T: RecordType>
where
    'a: 'b,
{
    buffer: &'b mut B,
    _phantom: PhantomData<&'a T>,
}

impl<'a, 'b, B: BorrowedRecordBufferMut<'a> + ?Sized, T: RecordType> RecordViewMut<'a, 'b, B, T>
where
    'a: 'b,
{
    pub(crate) fn new(buffer: &'b mut B) -> Self {
        assert_eq!(
            T::layout(),
            *buffer.record_layout(),
            "RecordLayout of the buffer does not match the RecordLayout of type T"
        );
        Self {
            buffer,
            _phantom: Default::default(),
        }
    }

    /// Returns the record at `index` by value. Fails with [`BufferError::OutOfBounds`] if
    /// `index` is outside `[0, len)`.
    pub fn at(&self, index: usize) -> Result<T, BufferError> {
        let mut record = T::zeroed();
        self.buffer
            .get_record(index, bytemuck::bytes_of_mut(&mut record))?;
        Ok(record)
    }

    /// Writes `record` into the slot at `index`. Fails with [`BufferError::OutOfBounds`] if
    /// `index` is outside `[0, len)`.
    pub fn set_at(&mut self, index: usize, record: T) -> Result<(), BufferError> {
        self.buffer.set_record(index, bytemuck::bytes_of(&record))
    }

    /// Returns the record at `index` by mutable reference. Fails with
    /// [`BufferError::OutOfBounds`] if `index` is outside `[0, len)`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, BufferError> {
        Ok(bytemuck::from_bytes_mut(
            self.buffer.get_record_mut(index)?,
        ))
    }

    /// Iterates over all records by reference
    pub fn iter(&self) -> RecordIteratorByRef<'_, T> {
        RecordIteratorByRef::from(&*self.buffer)
    }

    /// Iterates over all records by mutable reference
    pub fn iter_mut(&mut self) -> RecordIteratorByMut<'_, T> {
        RecordIteratorByMut::from(&mut *self.buffer)
    }
}

impl<'a, 'b, B: OwningRecordBuffer<'a>, T: RecordType> RecordViewMut<'a, 'b, B, T>
where
    'a: 'b,
{
    /// Appends `record` at the end of the buffer, growing it by one slot
    pub fn push_record(&mut self, record: T) {
        self.buffer.push_record(bytemuck::bytes_of(&record));
    }
}
