use std::fmt::{self, Display, Formatter};

use nalgebra::Vector2;
use static_assertions::const_assert;

/// Possible data types for individual record fields
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecordFieldDataType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Vec2f32,
    Vec2f64,
}

impl RecordFieldDataType {
    /// Returns the size in bytes of a single value of this data type
    /// ```
    /// # use paddock_core::layout::*;
    /// assert_eq!(8, RecordFieldDataType::F64.size());
    /// assert_eq!(16, RecordFieldDataType::Vec2f64.size());
    /// ```
    pub fn size(&self) -> u64 {
        match self {
            RecordFieldDataType::U8 => 1,
            RecordFieldDataType::I8 => 1,
            RecordFieldDataType::U16 => 2,
            RecordFieldDataType::I16 => 2,
            RecordFieldDataType::U32 => 4,
            RecordFieldDataType::I32 => 4,
            RecordFieldDataType::U64 => 8,
            RecordFieldDataType::I64 => 8,
            RecordFieldDataType::F32 => 4,
            RecordFieldDataType::F64 => 8,
            RecordFieldDataType::Vec2f32 => 2 * 4,
            RecordFieldDataType::Vec2f64 => 2 * 8,
        }
    }
}

impl Display for RecordFieldDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecordFieldDataType::Vec2f32 => write!(f, "Vec2<f32>"),
            RecordFieldDataType::Vec2f64 => write!(f, "Vec2<f64>"),
            other => write!(f, "{:?}", other),
        }
    }
}

// Assert sizes of the vector types are as we expect. Scalar types always have the same size,
// but we don't know what nalgebra does with the Vector2 types on the target machine...
const_assert!(std::mem::size_of::<Vector2<f32>>() == 8);
const_assert!(std::mem::size_of::<Vector2<f64>>() == 16);

/// A definition for a single field of a record. Fields are things like the X and Y coordinates
/// of a sample point, a weight, a category and so on. Fields are identified by a unique name
/// together with the data type that a single value of the field is stored in. Fields can be
/// grouped into two categories: well-known fields (e.g. COORD_X, COORD_Y, WEIGHT etc.) and
/// custom fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFieldDefinition {
    name: &'static str,
    datatype: RecordFieldDataType,
}

impl RecordFieldDefinition {
    /// Creates a new custom RecordFieldDefinition with the given name and data type
    /// ```
    /// # use paddock_core::layout::*;
    /// let custom_field = RecordFieldDefinition::custom("Custom", RecordFieldDataType::F32);
    /// # assert_eq!(custom_field.name(), "Custom");
    /// # assert_eq!(*custom_field.datatype(), RecordFieldDataType::F32);
    /// ```
    pub fn custom(name: &'static str, datatype: RecordFieldDataType) -> Self {
        Self { name, datatype }
    }

    /// Returns the name of this RecordFieldDefinition
    /// ```
    /// # use paddock_core::layout::*;
    /// let custom_field = RecordFieldDefinition::custom("Custom", RecordFieldDataType::F32);
    /// let name = custom_field.name();
    /// # assert_eq!(name, "Custom");
    /// ```
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the data type of this RecordFieldDefinition
    /// ```
    /// # use paddock_core::layout::*;
    /// let custom_field = RecordFieldDefinition::custom("Custom", RecordFieldDataType::F32);
    /// let datatype = custom_field.datatype();
    /// # assert_eq!(*datatype, RecordFieldDataType::F32);
    /// ```
    pub fn datatype(&self) -> &RecordFieldDataType {
        &self.datatype
    }

    /// Returns the size in bytes of this field
    pub fn size(&self) -> u64 {
        self.datatype.size()
    }

    /// Returns a new RecordFieldDefinition based on this one, but with a different data type
    /// ```
    /// # use paddock_core::layout::*;
    /// let single_precision_x = fields::COORD_X.with_custom_datatype(RecordFieldDataType::F32);
    /// # assert_eq!(single_precision_x.name(), fields::COORD_X.name());
    /// # assert_eq!(*single_precision_x.datatype(), RecordFieldDataType::F32);
    /// ```
    pub fn with_custom_datatype(&self, new_datatype: RecordFieldDataType) -> Self {
        Self {
            name: self.name,
            datatype: new_datatype,
        }
    }
}

impl Display for RecordFieldDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.name, self.datatype)
    }
}

/// Module containing well-known field definitions
pub mod fields {
    use super::{RecordFieldDataType, RecordFieldDefinition};

    /// Field definition for the X coordinate of a 2D sample point. Default datatype is F64
    pub const COORD_X: RecordFieldDefinition = RecordFieldDefinition {
        name: "CoordX",
        datatype: RecordFieldDataType::F64,
    };

    /// Field definition for the Y coordinate of a 2D sample point. Default datatype is F64
    pub const COORD_Y: RecordFieldDefinition = RecordFieldDefinition {
        name: "CoordY",
        datatype: RecordFieldDataType::F64,
    };

    /// Field definition for a combined 2D coordinate. Default datatype is Vec2f64
    pub const COORD_2D: RecordFieldDefinition = RecordFieldDefinition {
        name: "Coord2D",
        datatype: RecordFieldDataType::Vec2f64,
    };

    /// Field definition for a sample weight. Default datatype is F32
    pub const WEIGHT: RecordFieldDefinition = RecordFieldDefinition {
        name: "Weight",
        datatype: RecordFieldDataType::F32,
    };

    /// Field definition for a category label. Default datatype is U8
    pub const CATEGORY: RecordFieldDefinition = RecordFieldDefinition {
        name: "Category",
        datatype: RecordFieldDataType::U8,
    };

    /// Field definition for a sample ID. Default datatype is U64
    pub const SAMPLE_ID: RecordFieldDefinition = RecordFieldDefinition {
        name: "SampleId",
        datatype: RecordFieldDataType::U64,
    };
}

/// Describes the layout of a single record in a record buffer. Fields are tightly packed in
/// declaration order, so the layout of a record matches a `#[repr(C, packed)]` Rust struct
/// with the same fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordLayout {
    fields: Vec<RecordFieldDefinition>,
    field_offsets: Vec<u64>,
}

impl RecordLayout {
    /// Creates a new empty RecordLayout
    /// ```
    /// # use paddock_core::layout::*;
    /// let layout = RecordLayout::new();
    /// # assert_eq!(0, layout.fields().count());
    /// ```
    pub fn new() -> Self {
        Self {
            ..Default::default()
        }
    }

    /// Creates a new RecordLayout from the given sequence of fields. Panics if any two fields
    /// within the sequence share the same field name.
    /// ```
    /// # use paddock_core::layout::*;
    /// let layout = RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_Y]);
    /// # assert_eq!(2, layout.fields().count());
    /// ```
    pub fn from_fields(fields: &[RecordFieldDefinition]) -> Self {
        let mut layout = Self::new();
        for field in fields {
            layout.add_field(field.clone());
        }
        layout
    }

    /// Adds the given RecordFieldDefinition to this RecordLayout. Panics if a field with the
    /// same name is already part of this RecordLayout.
    /// ```
    /// # use paddock_core::layout::*;
    /// let mut layout = RecordLayout::new();
    /// layout.add_field(fields::COORD_X);
    /// # assert_eq!(1, layout.fields().count());
    /// ```
    pub fn add_field(&mut self, record_field: RecordFieldDefinition) {
        if let Some(old_field) = self.get_field_by_name(record_field.name()) {
            panic!(
                "Record field {} is already present in this RecordLayout!",
                old_field.name()
            );
        }

        // The offset to the new field is the offset to the previous field plus the previous
        // field's size, since record fields are tightly packed
        if self.fields.is_empty() {
            self.field_offsets.push(0);
        } else {
            self.field_offsets
                .push(self.field_offsets.last().unwrap() + self.fields.last().unwrap().size());
        }

        self.fields.push(record_field);
    }

    /// Returns true if a field with the given name is part of this RecordLayout.
    /// ```
    /// # use paddock_core::layout::*;
    /// let mut layout = RecordLayout::new();
    /// layout.add_field(fields::COORD_X);
    /// assert!(layout.has_field(fields::COORD_X.name()));
    /// ```
    pub fn has_field(&self, field_name: &str) -> bool {
        self.fields.iter().any(|field| field.name() == field_name)
    }

    /// Returns the field with the given name from this RecordLayout. Returns None if no such
    /// field exists.
    /// ```
    /// # use paddock_core::layout::*;
    /// let mut layout = RecordLayout::new();
    /// layout.add_field(fields::COORD_X);
    /// let field = layout.get_field_by_name(fields::COORD_X.name());
    /// # assert!(field.is_some());
    /// assert_eq!(fields::COORD_X, *field.unwrap());
    /// ```
    pub fn get_field_by_name(&self, field_name: &str) -> Option<&RecordFieldDefinition> {
        self.fields.iter().find(|field| field.name() == field_name)
    }

    /// Returns an iterator over all fields in this RecordLayout.
    /// ```
    /// # use paddock_core::layout::*;
    /// let mut layout = RecordLayout::new();
    /// layout.add_field(fields::COORD_X);
    /// layout.add_field(fields::COORD_Y);
    /// # let all_fields = layout.fields().collect::<Vec<_>>();
    /// # assert_eq!(2, all_fields.len());
    /// # assert_eq!(fields::COORD_X, *all_fields[0]);
    /// # assert_eq!(fields::COORD_Y, *all_fields[1]);
    /// for field in layout.fields() {
    ///    println!("{:?}", field);
    /// }
    /// ```
    pub fn fields<'a>(&'a self) -> impl Iterator<Item = &'a RecordFieldDefinition> + 'a {
        self.fields.iter()
    }

    /// Returns the size in bytes of a single record entry with the associated `RecordLayout`.
    /// ```
    /// # use paddock_core::layout::*;
    /// let layout = RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_Y]);
    /// let size_of_record = layout.size_of_record_entry();
    /// assert_eq!(16, size_of_record);
    /// ```
    pub fn size_of_record_entry(&self) -> u64 {
        self.fields.iter().fold(0, |acc, field| acc + field.size())
    }

    /// Returns the offset in bytes to the start of the given field within this layout. Fields
    /// are tightly packed. Returns `None` if the given field is not part of the associated
    /// `RecordLayout`.
    ///
    /// ```
    /// # use paddock_core::layout::*;
    /// let layout = RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_Y]);
    /// let y_offset = layout.offset_of(&fields::COORD_Y).unwrap();
    /// assert_eq!(fields::COORD_X.size(), y_offset);
    /// ```
    pub fn offset_of(&self, field: &RecordFieldDefinition) -> Option<u64> {
        self.index_of(field).map(|idx| self.field_offsets[idx])
    }

    /// Returns the index of the given field within the associated `RecordLayout`, or `None` if
    /// the field is not part of the `RecordLayout`. The index depends on the order in which the
    /// fields have been added to the associated `RecordLayout`:
    /// ```
    /// # use paddock_core::layout::*;
    /// let layout = RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_Y]);
    /// assert_eq!(Some(0), layout.index_of(&fields::COORD_X));
    /// assert_eq!(Some(1), layout.index_of(&fields::COORD_Y));
    /// assert_eq!(None, layout.index_of(&fields::WEIGHT));
    /// ```
    pub fn index_of(&self, field: &RecordFieldDefinition) -> Option<usize> {
        self.fields.iter().position(|this_field| this_field == field)
    }
}

impl Display for RecordLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RecordLayout {{ ")?;
        for field in self.fields() {
            write!(f, "{} ", field)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_offsets_are_packed() {
        let layout = RecordLayout::from_fields(&[
            fields::SAMPLE_ID,
            fields::COORD_2D,
            fields::WEIGHT,
            fields::CATEGORY,
        ]);
        assert_eq!(Some(0), layout.offset_of(&fields::SAMPLE_ID));
        assert_eq!(Some(8), layout.offset_of(&fields::COORD_2D));
        assert_eq!(Some(24), layout.offset_of(&fields::WEIGHT));
        assert_eq!(Some(28), layout.offset_of(&fields::CATEGORY));
        assert_eq!(29, layout.size_of_record_entry());
    }

    #[test]
    fn test_empty_layout_has_zero_sized_records() {
        let layout = RecordLayout::new();
        assert_eq!(0, layout.size_of_record_entry());
        assert_eq!(0, layout.fields().count());
    }

    #[test]
    #[should_panic]
    fn test_duplicate_field_panics() {
        RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_X]);
    }

    #[test]
    fn test_field_lookup() {
        let layout = RecordLayout::from_fields(&[fields::COORD_X, fields::COORD_Y]);
        assert!(layout.has_field("CoordX"));
        assert!(!layout.has_field("Weight"));
        assert_eq!(
            Some(&fields::COORD_Y),
            layout.get_field_by_name(fields::COORD_Y.name())
        );
        assert_eq!(None, layout.get_field_by_name("NoSuchField"));
    }
}
