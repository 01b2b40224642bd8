#![warn(clippy::all)]

//! Core data structures for dynamic record storage
//!
//! Paddock provides growable, explicitly-owned buffers for fixed-size records — values like
//! 2D sample points that consist of a handful of named numeric fields. A buffer stores its
//! records contiguously in untyped memory described by a [`RecordLayout`](crate::layout::RecordLayout),
//! and strongly-typed access goes through views obtained from
//! [`view`](crate::containers::BorrowedRecordBufferExt::view) and
//! [`view_mut`](crate::containers::BorrowedRecordBufferMutExt::view_mut).
//! The best starting points are the [`RecordLayout`](crate::layout::RecordLayout) type and the
//! [`containers`](crate::containers) module.

pub extern crate nalgebra;
extern crate self as paddock_core;

pub mod containers;
/// Defines fields and the data layout of fixed-size records
pub mod layout;

#[cfg(test)]
mod test_utils;
