use std::marker::PhantomData;

use bytemuck::Zeroable;

use crate::layout::RecordType;

use super::{BorrowedRecordBuffer, BorrowedRecordBufferMut};

/// Iterator over strongly typed records by value
pub struct RecordIteratorByValue<'a, 'b, T: RecordType, B: BorrowedRecordBuffer<'a> + ?Sized>
where
    'a: 'b,
{
    buffer: &'b B,
    current_index: usize,
    _phantom: PhantomData<&'a T>,
}

impl<'a, 'b, T: RecordType, B: BorrowedRecordBuffer<'a> + ?Sized> From<&'b B>
    for RecordIteratorByValue<'a, 'b, T, B>
{
    fn from(value: &'b B) -> Self {
        Self {
            buffer: value,
            current_index: 0,
            _phantom: Default::default(),
        }
    }
}

impl<'a, 'b, T: RecordType, B: BorrowedRecordBuffer<'a> + ?Sized> Iterator
    for RecordIteratorByValue<'a, 'b, T, B>
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index == self.buffer.len() {
            None
        } else {
            let mut record = T::zeroed();
            let record_bytes = bytemuck::bytes_of_mut(&mut record);
            self.buffer
                .get_record(self.current_index, record_bytes)
                .expect("record index is in bounds");
            self.current_index += 1;
            Some(record)
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.current_index += n;
        self.next()
    }
}

/// Iterator over strongly typed records by immutable borrow
pub struct RecordIteratorByRef<'a, T: RecordType> {
    record_data: &'a [T],
    current_index: usize,
}

impl<'a, 'b, T: RecordType, B: BorrowedRecordBuffer<'b> + ?Sized> From<&'a B>
    for RecordIteratorByRef<'a, T>
where
    'b: 'a,
{
    fn from(value: &'a B) -> Self {
        let records_memory = value
            .get_record_range_ref(0..value.len())
            .expect("record range is in bounds");
        Self {
            record_data: bytemuck::cast_slice(records_memory),
            current_index: 0,
        }
    }
}

impl<'a, T: RecordType> Iterator for RecordIteratorByRef<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index == self.record_data.len() {
            None
        } else {
            let record = &self.record_data[self.current_index];
            self.current_index += 1;
            Some(record)
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.current_index += n;
        self.next()
    }
}

/// Iterator over strongly typed records by mutable borrow
pub struct RecordIteratorByMut<'a, T: RecordType> {
    record_data: &'a mut [T],
    current_index: usize,
    _phantom: PhantomData<T>,
}

impl<'a, 'b, T: RecordType, B: BorrowedRecordBufferMut<'b> + ?Sized> From<&'a mut B>
    for RecordIteratorByMut<'a, T>
where
    'b: 'a,
{
    fn from(value: &'a mut B) -> Self {
        let len = value.len();
        let memory_for_all_records = value
            .get_record_range_mut(0..len)
            .expect("record range is in bounds");
        Self {
            record_data: bytemuck::cast_slice_mut(memory_for_all_records),
            current_index: 0,
            _phantom: Default::default(),
        }
    }
}

impl<'a, T: RecordType> Iterator for RecordIteratorByMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index == self.record_data.len() {
            None
        } else {
            // Disjoint because `current_index` only moves forward
            unsafe {
                let memory = self.record_data.as_mut_ptr().add(self.current_index);
                self.current_index += 1;
                Some(&mut *memory)
            }
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.current_index += n;
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use crate::{
        containers::{BorrowedRecordBufferExt, BorrowedRecordBufferMutExt, DynamicRecordBuffer},
        test_utils::{CustomRecordSmall, DefaultRecordDistribution},
    };

    #[test]
    #[allow(clippy::iter_nth_zero)]
    fn record_iterator_nth() {
        const COUNT: usize = 16;
        let mut records = thread_rng()
            .sample_iter::<CustomRecordSmall, _>(DefaultRecordDistribution)
            .take(COUNT)
            .collect::<DynamicRecordBuffer>();

        let expected = records.view::<CustomRecordSmall>().into_iter().collect::<Vec<_>>();

        {
            let view = records.view::<CustomRecordSmall>();
            assert_eq!(Some(expected[0]), view.into_iter().nth(0));
            let view = records.view::<CustomRecordSmall>();
            assert_eq!(Some(expected[7]), view.into_iter().nth(7));
            let view = records.view::<CustomRecordSmall>();
            assert_eq!(None, view.into_iter().nth(COUNT));
        }

        {
            let view = records.view::<CustomRecordSmall>();
            let mut by_ref = view.iter();
            assert_eq!(Some(&expected[3]), by_ref.nth(3));
            // nth is relative to the iterator's current position
            assert_eq!(Some(&expected[7]), by_ref.nth(3));
        }

        {
            let mut view = records.view_mut::<CustomRecordSmall>();
            let mut by_mut = view.iter_mut();
            assert_eq!(Some(&mut expected[5].clone()), by_mut.nth(5));
        }
    }
}
