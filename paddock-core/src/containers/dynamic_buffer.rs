use std::{iter::FromIterator, ops::Range};

use crate::layout::{RecordLayout, RecordType};

use super::{
    BorrowedRecordBuffer, BorrowedRecordBufferMut, BufferError, MakeBufferFromLayout,
    OwningRecordBuffer,
};

/// A record buffer that uses a `Vec<u8>` as its underlying storage and owns it exclusively. The
/// buffer moves through three states: unallocated (created empty), allocated (after
/// [`allocate`](Self::allocate), [`allocate_zeroed`](Self::allocate_zeroed) or the first grow),
/// and released (after [`release`](OwningRecordBuffer::release), which consumes the buffer).
/// There is no way back from released: the ownership model makes any further access a compile
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecordBuffer {
    storage: Vec<u8>,
    record_layout: RecordLayout,
    length: usize,
}

impl DynamicRecordBuffer {
    /// Allocates storage for `count` records with the given `record_layout`. The contents of
    /// the slots are unspecified; callers that need a defined starting state use
    /// [`allocate_zeroed`](Self::allocate_zeroed) instead.
    ///
    /// Fails with [`BufferError::AllocationFailed`] if the backing storage request cannot be
    /// satisfied, including when `count * size_of_record_entry()` does not fit in memory at
    /// all. On failure no buffer exists, so there is no partially-allocated state to observe.
    ///
    /// # Example
    ///
    /// ```
    /// use paddock_core::containers::*;
    /// use paddock_core::layout::*;
    ///
    /// let layout = RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_Y]);
    /// let buffer = DynamicRecordBuffer::allocate(4, layout)?;
    /// assert_eq!(4, buffer.len());
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn allocate(count: usize, record_layout: RecordLayout) -> Result<Self, BufferError> {
        let mut buffer = Self::new_from_layout(record_layout);
        buffer.grow_storage(count)?;
        Ok(buffer)
    }

    /// Allocates storage for `count` records with the given `record_layout` and zero-fills it.
    /// Every byte of every slot is written, so every field of every record equals its type's
    /// zero value regardless of what [`allocate`](Self::allocate) left in the slots.
    ///
    /// Fails with [`BufferError::AllocationFailed`] under the same conditions as
    /// [`allocate`](Self::allocate).
    ///
    /// # Example
    ///
    /// ```
    /// use paddock_core::containers::*;
    /// use paddock_core::layout::*;
    ///
    /// let layout = RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_Y]);
    /// let buffer = DynamicRecordBuffer::allocate_zeroed(4, layout)?;
    /// assert!(buffer.get_record_range_ref(0..4)?.iter().all(|byte| *byte == 0));
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn allocate_zeroed(count: usize, record_layout: RecordLayout) -> Result<Self, BufferError> {
        let mut buffer = Self::allocate(count, record_layout)?;
        // Contract: every byte of every slot is zero, independent of what allocate left there
        buffer.storage.fill(0);
        Ok(buffer)
    }

    fn size_of_record(&self) -> usize {
        self.record_layout.size_of_record_entry() as usize
    }

    fn get_byte_range_of_record(&self, record_index: usize) -> Range<usize> {
        let size_of_record = self.size_of_record();
        (record_index * size_of_record)..((record_index + 1) * size_of_record)
    }

    fn get_byte_range_of_records(&self, records_range: Range<usize>) -> Range<usize> {
        let size_of_record = self.size_of_record();
        (records_range.start * size_of_record)..(records_range.end * size_of_record)
    }

    fn check_record_index(&self, index: usize) -> Result<(), BufferError> {
        if index >= self.length {
            Err(BufferError::OutOfBounds {
                index,
                len: self.length,
            })
        } else {
            Ok(())
        }
    }

    fn check_record_range(&self, range: &Range<usize>) -> Result<(), BufferError> {
        if range.start > range.end || range.end > self.length {
            Err(BufferError::OutOfBounds {
                index: range.end,
                len: self.length,
            })
        } else {
            Ok(())
        }
    }

    /// Grows the backing storage to hold exactly `new_count` records. The additional storage is
    /// reserved fallibly before the length changes, so on failure the buffer is untouched.
    fn grow_storage(&mut self, new_count: usize) -> Result<(), BufferError> {
        let size_of_record = self.size_of_record();
        let new_num_bytes =
            new_count
                .checked_mul(size_of_record)
                .ok_or(BufferError::AllocationFailed {
                    requested_records: new_count,
                    requested_bytes: usize::MAX,
                })?;
        let additional = new_num_bytes.saturating_sub(self.storage.len());
        self.storage
            .try_reserve_exact(additional)
            .map_err(|_| BufferError::AllocationFailed {
                requested_records: new_count,
                requested_bytes: new_num_bytes,
            })?;
        // The reservation succeeded, nothing below can fail
        self.storage.resize(new_num_bytes, 0);
        self.length = new_count;
        Ok(())
    }
}

impl<'a> MakeBufferFromLayout<'a> for DynamicRecordBuffer {
    fn new_from_layout(record_layout: RecordLayout) -> Self {
        Self {
            record_layout,
            storage: Default::default(),
            length: 0,
        }
    }
}

impl<'a> BorrowedRecordBuffer<'a> for DynamicRecordBuffer
where
    DynamicRecordBuffer: 'a,
{
    fn len(&self) -> usize {
        self.length
    }

    fn record_layout(&self) -> &RecordLayout {
        &self.record_layout
    }

    fn get_record(&self, index: usize, data: &mut [u8]) -> Result<(), BufferError> {
        let record_ref = self.get_record_ref(index)?;
        data.copy_from_slice(record_ref);
        Ok(())
    }

    fn get_record_range(&self, range: Range<usize>, data: &mut [u8]) -> Result<(), BufferError> {
        let records_ref = self.get_record_range_ref(range)?;
        data.copy_from_slice(records_ref);
        Ok(())
    }

    fn get_record_ref<'b>(&'b self, index: usize) -> Result<&'b [u8], BufferError>
    where
        'a: 'b,
    {
        self.check_record_index(index)?;
        Ok(&self.storage[self.get_byte_range_of_record(index)])
    }

    fn get_record_range_ref<'b>(&'b self, range: Range<usize>) -> Result<&'b [u8], BufferError>
    where
        'a: 'b,
    {
        self.check_record_range(&range)?;
        Ok(&self.storage[self.get_byte_range_of_records(range)])
    }
}

impl<'a> BorrowedRecordBufferMut<'a> for DynamicRecordBuffer
where
    DynamicRecordBuffer: 'a,
{
    fn set_record(&mut self, index: usize, record_data: &[u8]) -> Result<(), BufferError> {
        let record_bytes = self.get_record_mut(index)?;
        record_bytes.copy_from_slice(record_data);
        Ok(())
    }

    fn set_record_range(
        &mut self,
        record_range: Range<usize>,
        record_data: &[u8],
    ) -> Result<(), BufferError> {
        let record_bytes = self.get_record_range_mut(record_range)?;
        record_bytes.copy_from_slice(record_data);
        Ok(())
    }

    fn get_record_mut<'b>(&'b mut self, index: usize) -> Result<&'b mut [u8], BufferError>
    where
        'a: 'b,
    {
        self.check_record_index(index)?;
        let byte_range = self.get_byte_range_of_record(index);
        Ok(&mut self.storage[byte_range])
    }

    fn get_record_range_mut<'b>(
        &'b mut self,
        range: Range<usize>,
    ) -> Result<&'b mut [u8], BufferError>
    where
        'a: 'b,
    {
        self.check_record_range(&range)?;
        let byte_range = self.get_byte_range_of_records(range);
        Ok(&mut self.storage[byte_range])
    }

    fn swap(&mut self, from_index: usize, to_index: usize) -> Result<(), BufferError> {
        self.check_record_index(from_index)?;
        self.check_record_index(to_index)?;
        if from_index == to_index {
            return Ok(());
        }
        let size_of_record = self.size_of_record();
        // Is safe as long as both indices are in bounds, which was checked above
        unsafe {
            let from_ptr = self.storage.as_mut_ptr().add(from_index * size_of_record);
            let to_ptr = self.storage.as_mut_ptr().add(to_index * size_of_record);
            std::ptr::swap_nonoverlapping(from_ptr, to_ptr, size_of_record);
        }
        Ok(())
    }
}

impl<'a> OwningRecordBuffer<'a> for DynamicRecordBuffer
where
    DynamicRecordBuffer: 'a,
{
    fn push_record(&mut self, record_bytes: &[u8]) {
        let size_of_record = self.size_of_record();
        if size_of_record == 0 {
            assert_eq!(0, record_bytes.len());
        } else {
            assert_eq!(record_bytes.len(), size_of_record);
            self.storage.extend_from_slice(record_bytes);
            self.length += 1;
        }
    }

    fn resize(&mut self, new_count: usize) -> Result<(), BufferError> {
        if new_count > self.length {
            self.grow_storage(new_count)
        } else {
            // Truncated records are discarded without being read; excess storage goes back to
            // the allocator so the backing memory stays proportional to the record count
            self.storage.truncate(new_count * self.size_of_record());
            self.storage.shrink_to_fit();
            self.length = new_count;
            Ok(())
        }
    }

    fn clear(&mut self) {
        self.storage.clear();
        self.length = 0;
    }

    fn release(self) {}
}

impl<T: RecordType> FromIterator<T> for DynamicRecordBuffer {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let record_layout = T::layout();
        let iter = iter.into_iter();
        let (_, maybe_known_length) = iter.size_hint();
        if let Some(known_length) = maybe_known_length {
            let num_bytes = known_length * record_layout.size_of_record_entry() as usize;
            let storage = vec![0; num_bytes];
            let mut buffer = Self {
                record_layout,
                storage,
                length: known_length,
            };
            // Overwrite the preallocated memory of the buffer with the records in the iterator:
            iter.enumerate().for_each(|(index, record)| {
                let record_bytes = bytemuck::bytes_of(&record);
                buffer
                    .set_record(index, record_bytes)
                    .expect("record index is in bounds");
            });
            buffer
        } else {
            let mut buffer = Self {
                record_layout,
                storage: Default::default(),
                length: 0,
            };
            iter.for_each(|record| {
                let record_bytes = bytemuck::bytes_of(&record);
                buffer.push_record(record_bytes);
            });
            buffer
        }
    }
}
