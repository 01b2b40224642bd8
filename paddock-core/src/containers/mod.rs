//! Defines traits for record buffers, as well as the default owning implementation.
//!
//! # Record buffers
//!
//! A record buffer stores a sequence of fixed-size records contiguously in untyped memory. The
//! structure of a single record at runtime is described by a
//! [`RecordLayout`](crate::layout::RecordLayout), which every buffer carries. Records are stored
//! back to back (the memory of a buffer of `Point` records looks exactly like a `Vec<Point>`),
//! so buffers can hand out records by value, by reference and by mutable reference.
//!
//! # Memory ownership traits
//!
//! Buffers are layered by how they relate to their memory, mirroring `&[T]`, `&mut [T]` and
//! `Vec<T>`:
//! 1) [`BorrowedRecordBuffer`]: the memory can be borrowed; records are read by value or by
//!    reference
//! 2) [`BorrowedRecordBufferMut`]: the memory can be borrowed mutably; records can be
//!    overwritten and swapped in place
//! 3) [`OwningRecordBuffer`]: the buffer owns its memory; records can be pushed, the buffer can
//!    be resized, cleared, and explicitly released
//!
//! Indexed accessors are bounds-checked and return a [`BufferError`] instead of invoking
//! undefined behavior or panicking on a bad index.
//!
//! # Lifecycle
//!
//! An owning buffer is created by [`DynamicRecordBuffer::allocate`] or
//! [`DynamicRecordBuffer::allocate_zeroed`], grown or shrunk in place with
//! [`resize`](OwningRecordBuffer::resize), and destroyed by
//! [`release`](OwningRecordBuffer::release), which takes the buffer by value. A released buffer
//! cannot be touched again: release consumes it, so double release and use-after-release do not
//! compile.
//!
//! # Raw vs. typed memory
//!
//! The buffer traits work with byte slices (`&[u8]` and `&mut [u8]`), since the record
//! structure is only known at runtime. Strongly-typed access goes through the
//! [`view`](BorrowedRecordBufferExt::view) and [`view_mut`](BorrowedRecordBufferMutExt::view_mut)
//! methods, which validate the Rust type's [`RecordLayout`](crate::layout::RecordLayout) against
//! the buffer's layout once, on construction of the view.

mod error;
pub use self::error::*;

mod traits;
pub use self::traits::*;

mod dynamic_buffer;
pub use self::dynamic_buffer::*;

mod record_iterators;
pub use self::record_iterators::*;

mod views;
pub use self::views::*;
