use super::record_layout::*;

/// Trait that marks a Rust type for usage as a record in a record buffer. This trait allows the
/// mapping between Rust types at compile time and the dynamic `RecordLayout` type.
///
/// Record fields are tightly packed, so implementing types must be `#[repr(C, packed)]`. The
/// `bytemuck` bounds allow record values to be viewed as raw bytes and reconstructed from them.
/// **You will almost never want to implement `RecordType` manually! Prefer to use the
/// `#[derive(RecordType)]` procedural macro!**
pub trait RecordType: bytemuck::NoUninit + bytemuck::AnyBitPattern {
    /// Returns the associated `RecordLayout` that describes the type implementing this trait.
    fn layout() -> RecordLayout;
}

/// Returns the corresponding RecordLayout for the given RecordType T
pub fn get_record_layout<T: RecordType>() -> RecordLayout {
    T::layout()
}
