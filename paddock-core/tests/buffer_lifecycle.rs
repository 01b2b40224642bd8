//! End-to-end tests for the allocate / fill / resize / release lifecycle of record buffers.

use paddock_core::containers::{
    BorrowedRecordBuffer, BorrowedRecordBufferExt, BorrowedRecordBufferMutExt, BufferError,
    DynamicRecordBuffer, OwningRecordBuffer,
};
use paddock_core::layout::RecordType;
use paddock_derive::RecordType;

#[derive(
    RecordType, Default, Copy, Clone, PartialEq, Debug, bytemuck::AnyBitPattern, bytemuck::NoUninit,
)]
#[repr(C, packed)]
struct SamplePoint {
    #[paddock(BUILTIN_COORD_X)]
    x: f64,
    #[paddock(BUILTIN_COORD_Y)]
    y: f64,
}

fn point(x: f64, y: f64) -> SamplePoint {
    SamplePoint { x, y }
}

/// Factory function that hands a freshly allocated buffer to the caller. Ownership of the
/// storage moves out with the return value.
fn sample_cloud(count: usize) -> Result<DynamicRecordBuffer, BufferError> {
    DynamicRecordBuffer::allocate_zeroed(count, SamplePoint::layout())
}

#[test]
fn zeroed_allocation_yields_all_zero_records() {
    let buffer = DynamicRecordBuffer::allocate_zeroed(8, SamplePoint::layout()).unwrap();
    assert_eq!(8, buffer.len());

    let raw_bytes = buffer.get_record_range_ref(0..8).unwrap();
    assert!(raw_bytes.iter().all(|byte| *byte == 0));

    for idx in 0..8 {
        assert_eq!(point(0.0, 0.0), buffer.view::<SamplePoint>().at(idx).unwrap());
    }
}

#[test]
fn set_then_get_roundtrips() {
    let mut buffer = DynamicRecordBuffer::allocate_zeroed(4, SamplePoint::layout()).unwrap();
    for idx in 0..4 {
        let record = point(idx as f64, -(idx as f64));
        buffer.view_mut().set_at(idx, record).unwrap();
        assert_eq!(record, buffer.view().at(idx).unwrap());
    }
}

#[test]
fn growing_resize_preserves_existing_records() {
    let mut buffer = DynamicRecordBuffer::allocate_zeroed(3, SamplePoint::layout()).unwrap();
    {
        let mut view = buffer.view_mut::<SamplePoint>();
        view.set_at(0, point(1.0, 2.0)).unwrap();
        view.set_at(1, point(3.0, 4.0)).unwrap();
        view.set_at(2, point(5.0, 6.0)).unwrap();
    }

    buffer.resize(5).unwrap();

    assert_eq!(5, buffer.len());
    assert_eq!(point(1.0, 2.0), buffer.view().at(0).unwrap());
    assert_eq!(point(3.0, 4.0), buffer.view().at(1).unwrap());
    assert_eq!(point(5.0, 6.0), buffer.view().at(2).unwrap());
    // Slots 3 and 4 exist but their contents are unspecified; they only need to be addressable
    assert!(buffer.view::<SamplePoint>().at(3).is_ok());
    assert!(buffer.view::<SamplePoint>().at(4).is_ok());
}

#[test]
fn shrinking_resize_keeps_the_prefix() {
    let mut buffer = DynamicRecordBuffer::allocate_zeroed(5, SamplePoint::layout()).unwrap();
    for idx in 0..5 {
        buffer
            .view_mut()
            .set_at(idx, point(idx as f64, idx as f64))
            .unwrap();
    }

    buffer.resize(2).unwrap();

    assert_eq!(2, buffer.len());
    assert_eq!(point(0.0, 0.0), buffer.view().at(0).unwrap());
    assert_eq!(point(1.0, 1.0), buffer.view().at(1).unwrap());
    assert!(matches!(
        buffer.view::<SamplePoint>().at(2),
        Err(BufferError::OutOfBounds { index: 2, len: 2 })
    ));
}

#[test]
fn empty_allocation_has_no_addressable_slots() {
    let mut buffer = DynamicRecordBuffer::allocate_zeroed(0, SamplePoint::layout()).unwrap();
    assert_eq!(0, buffer.len());
    assert!(matches!(
        buffer.view::<SamplePoint>().at(0),
        Err(BufferError::OutOfBounds { index: 0, len: 0 })
    ));
    assert!(matches!(
        buffer.view_mut::<SamplePoint>().set_at(0, point(1.0, 1.0)),
        Err(BufferError::OutOfBounds { index: 0, len: 0 })
    ));
}

#[test]
fn failed_relocation_leaves_the_original_buffer_valid() {
    let mut buffer = DynamicRecordBuffer::allocate_zeroed(3, SamplePoint::layout()).unwrap();
    buffer.view_mut().set_at(1, point(7.0, 8.0)).unwrap();

    let result = buffer.resize(usize::MAX / 8);
    assert!(matches!(result, Err(BufferError::AllocationFailed { .. })));

    // The strong guarantee: the buffer is still fully usable with its old contents
    assert_eq!(3, buffer.len());
    assert_eq!(point(7.0, 8.0), buffer.view().at(1).unwrap());
    buffer.view_mut().set_at(2, point(9.0, 10.0)).unwrap();
    assert_eq!(point(9.0, 10.0), buffer.view().at(2).unwrap());
}

#[test]
fn impossible_allocation_is_rejected_cleanly() {
    let result = DynamicRecordBuffer::allocate(usize::MAX, SamplePoint::layout());
    assert!(matches!(result, Err(BufferError::AllocationFailed { .. })));
}

#[test]
fn full_allocate_fill_resize_release_flow() {
    let n = 5;

    // First buffer: allocated, then filled record by record
    let mut points = DynamicRecordBuffer::allocate(n, SamplePoint::layout()).unwrap();
    for idx in 0..n {
        points
            .view_mut()
            .set_at(idx, point(idx as f64, (idx * 2) as f64))
            .unwrap();
    }
    assert_eq!(n, points.len());

    // Second buffer: zero-initialized on allocation
    let mut more_points = DynamicRecordBuffer::allocate_zeroed(n, SamplePoint::layout()).unwrap();
    assert!(more_points
        .view::<SamplePoint>()
        .into_iter()
        .all(|record| record == point(0.0, 0.0)));

    // Grown to four times its size, keeping the zeroed prefix
    more_points.resize(4 * n).unwrap();
    assert_eq!(4 * n, more_points.len());
    for idx in 0..n {
        assert_eq!(point(0.0, 0.0), more_points.view().at(idx).unwrap());
    }

    // Third buffer: ownership moves out of the factory function
    let even_more_points = sample_cloud(n).unwrap();
    assert_eq!(n, even_more_points.len());

    points.release();
    more_points.release();
    even_more_points.release();
}
