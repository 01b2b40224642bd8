extern crate proc_macro;

use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Error, Field, Fields, GenericArgument, Lit, Meta,
    NestedMeta, PathArguments, Result, Type,
};

/// The data types a record field can have. Mirrors the `RecordFieldDataType` enumeration in
/// paddock-core, which this macro cannot reference directly at expansion time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum RecordPrimitive {
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

impl RecordPrimitive {
    fn as_token_stream(&self) -> proc_macro2::TokenStream {
        match self {
            RecordPrimitive::U8 => quote! {paddock_core::layout::RecordFieldDataType::U8},
            RecordPrimitive::I8 => quote! {paddock_core::layout::RecordFieldDataType::I8},
            RecordPrimitive::U16 => quote! {paddock_core::layout::RecordFieldDataType::U16},
            RecordPrimitive::I16 => quote! {paddock_core::layout::RecordFieldDataType::I16},
            RecordPrimitive::U32 => quote! {paddock_core::layout::RecordFieldDataType::U32},
            RecordPrimitive::I32 => quote! {paddock_core::layout::RecordFieldDataType::I32},
            RecordPrimitive::U64 => quote! {paddock_core::layout::RecordFieldDataType::U64},
            RecordPrimitive::I64 => quote! {paddock_core::layout::RecordFieldDataType::I64},
            RecordPrimitive::F32 => quote! {paddock_core::layout::RecordFieldDataType::F32},
            RecordPrimitive::F64 => quote! {paddock_core::layout::RecordFieldDataType::F64},
            RecordPrimitive::Vec2f32 => {
                quote! {paddock_core::layout::RecordFieldDataType::Vec2f32}
            }
            RecordPrimitive::Vec2f64 => {
                quote! {paddock_core::layout::RecordFieldDataType::Vec2f64}
            }
        }
    }
}

/// Maps a Rust field type to the record primitive it is stored as. 2D vectors are
/// `nalgebra::Vector2`, matched by their final path segment so that both `Vector2<f64>` and
/// `nalgebra::Vector2<f64>` work.
fn primitive_from_type(ty: &Type) -> Option<RecordPrimitive> {
    let type_path = match ty {
        Type::Path(type_path) => type_path,
        _ => return None,
    };
    let last_segment = type_path.path.segments.last()?;
    match last_segment.ident.to_string().as_str() {
        "u8" => Some(RecordPrimitive::U8),
        "i8" => Some(RecordPrimitive::I8),
        "u16" => Some(RecordPrimitive::U16),
        "i16" => Some(RecordPrimitive::I16),
        "u32" => Some(RecordPrimitive::U32),
        "i32" => Some(RecordPrimitive::I32),
        "u64" => Some(RecordPrimitive::U64),
        "i64" => Some(RecordPrimitive::I64),
        "f32" => Some(RecordPrimitive::F32),
        "f64" => Some(RecordPrimitive::F64),
        "Vector2" => {
            let arguments = match &last_segment.arguments {
                PathArguments::AngleBracketed(arguments) => arguments,
                _ => return None,
            };
            let first_argument = arguments.args.first()?;
            let scalar_type = match first_argument {
                GenericArgument::Type(Type::Path(scalar_type)) => scalar_type,
                _ => return None,
            };
            match scalar_type.path.segments.last()?.ident.to_string().as_str() {
                "f32" => Some(RecordPrimitive::Vec2f32),
                "f64" => Some(RecordPrimitive::Vec2f64),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Returns the paddock-core path of the well-known field named by a `BUILTIN_*` attribute
/// ident, its field name, and the data type the Rust field must have
fn builtin_field(ident: &str) -> Option<(proc_macro2::TokenStream, &'static str, RecordPrimitive)> {
    match ident {
        "BUILTIN_COORD_X" => Some((
            quote! {paddock_core::layout::fields::COORD_X},
            "CoordX",
            RecordPrimitive::F64,
        )),
        "BUILTIN_COORD_Y" => Some((
            quote! {paddock_core::layout::fields::COORD_Y},
            "CoordY",
            RecordPrimitive::F64,
        )),
        "BUILTIN_COORD_2D" => Some((
            quote! {paddock_core::layout::fields::COORD_2D},
            "Coord2D",
            RecordPrimitive::Vec2f64,
        )),
        "BUILTIN_WEIGHT" => Some((
            quote! {paddock_core::layout::fields::WEIGHT},
            "Weight",
            RecordPrimitive::F32,
        )),
        "BUILTIN_CATEGORY" => Some((
            quote! {paddock_core::layout::fields::CATEGORY},
            "Category",
            RecordPrimitive::U8,
        )),
        "BUILTIN_SAMPLE_ID" => Some((
            quote! {paddock_core::layout::fields::SAMPLE_ID},
            "SampleId",
            RecordPrimitive::U64,
        )),
        _ => None,
    }
}

/// Expands a single struct member into the `RecordFieldDefinition` expression for the generated
/// layout, together with the field name used for duplicate detection
fn field_definition(field: &Field) -> Result<(proc_macro2::TokenStream, String)> {
    let paddock_attribute = field
        .attrs
        .iter()
        .find(|attribute| attribute.path.is_ident("paddock"))
        .ok_or_else(|| {
            Error::new_spanned(
                field,
                "Every member requires a #[paddock(...)] attribute that maps it to a record field",
            )
        })?;
    let rust_primitive = primitive_from_type(&field.ty).ok_or_else(|| {
        Error::new_spanned(&field.ty, "Type is not a valid record field type")
    })?;

    let meta = paddock_attribute.parse_meta()?;
    let meta_list = match meta {
        Meta::List(meta_list) => meta_list,
        _ => {
            return Err(Error::new_spanned(
                paddock_attribute,
                "Expected #[paddock(BUILTIN_...)] or #[paddock(field = \"...\")]",
            ))
        }
    };
    let nested = meta_list.nested.first().ok_or_else(|| {
        Error::new_spanned(
            &meta_list,
            "Expected #[paddock(BUILTIN_...)] or #[paddock(field = \"...\")]",
        )
    })?;

    match nested {
        NestedMeta::Meta(Meta::Path(path)) => {
            let builtin_ident = path.get_ident().ok_or_else(|| {
                Error::new_spanned(path, "Expected the name of a well-known field")
            })?;
            let (field_tokens, field_name, expected_primitive) =
                builtin_field(&builtin_ident.to_string()).ok_or_else(|| {
                    Error::new_spanned(
                        path,
                        format!("{} is not a well-known field", builtin_ident),
                    )
                })?;
            if expected_primitive != rust_primitive {
                return Err(Error::new_spanned(
                    &field.ty,
                    format!(
                        "Type of member does not match the data type of the well-known field {}",
                        builtin_ident
                    ),
                ));
            }
            Ok((field_tokens, field_name.to_owned()))
        }
        NestedMeta::Meta(Meta::NameValue(name_value)) if name_value.path.is_ident("field") => {
            let name_literal = match &name_value.lit {
                Lit::Str(name_literal) => name_literal,
                _ => {
                    return Err(Error::new_spanned(
                        &name_value.lit,
                        "Field name must be a string literal",
                    ))
                }
            };
            let datatype = rust_primitive.as_token_stream();
            let tokens = quote! {
                paddock_core::layout::RecordFieldDefinition::custom(#name_literal, #datatype)
            };
            Ok((tokens, name_literal.value()))
        }
        _ => Err(Error::new_spanned(
            nested,
            "Expected #[paddock(BUILTIN_...)] or #[paddock(field = \"...\")]",
        )),
    }
}

fn has_c_packed_repr(input: &DeriveInput) -> Result<bool> {
    for attribute in &input.attrs {
        if !attribute.path.is_ident("repr") {
            continue;
        }
        if let Meta::List(meta_list) = attribute.parse_meta()? {
            let mut has_c = false;
            let mut has_packed = false;
            for nested in meta_list.nested.iter() {
                if let NestedMeta::Meta(Meta::Path(path)) = nested {
                    has_c |= path.is_ident("C");
                    has_packed |= path.is_ident("packed");
                }
            }
            if has_c && has_packed {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn expand_record_type(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "derive(RecordType) does not support generic types",
        ));
    }
    if !has_c_packed_repr(input)? {
        return Err(Error::new_spanned(
            &input.ident,
            "derive(RecordType) requires #[repr(C, packed)], since record fields are tightly packed",
        ));
    }
    let data_struct = match &input.data {
        Data::Struct(data_struct) => data_struct,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "derive(RecordType) is only valid for structs",
            ))
        }
    };
    let members = match &data_struct.fields {
        Fields::Named(named_fields) => &named_fields.named,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "derive(RecordType) requires a struct with named members",
            ))
        }
    };

    let mut seen_field_names = HashSet::new();
    let mut field_definitions = Vec::with_capacity(members.len());
    for member in members {
        let (tokens, field_name) = field_definition(member)?;
        if !seen_field_names.insert(field_name.clone()) {
            return Err(Error::new_spanned(
                member,
                format!("Record field {} appears more than once", field_name),
            ));
        }
        field_definitions.push(tokens);
    }

    let name = &input.ident;
    Ok(quote! {
        impl paddock_core::layout::RecordType for #name {
            fn layout() -> paddock_core::layout::RecordLayout {
                paddock_core::layout::RecordLayout::from_fields(&[
                    #(#field_definitions),*
                ])
            }
        }
    })
}

/// Derives the `RecordType` trait of paddock-core for a `#[repr(C, packed)]` struct with named
/// members. Every member carries a `#[paddock(...)]` attribute naming either a well-known field
/// (`#[paddock(BUILTIN_COORD_X)]`) or a custom one (`#[paddock(field = "MyField")]`, with the
/// data type inferred from the member's Rust type). The generated `RecordLayout` lists the
/// fields in declaration order, which matches the packed in-memory order of the struct.
#[proc_macro_derive(RecordType, attributes(paddock))]
pub fn derive_record_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_record_type(&input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}
