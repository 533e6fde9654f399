//! Derives the binary codec and XML mirror glue for `lcf` record types.
//!
//! A record type is declared as a plain struct, one field per persistable slot, with an
//! attribute on each field naming its wire tag and kind:
//!
//! ```ignore
//! #[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
//! pub struct Terms {
//!     #[primitive(tag = 1)]
//!     pub ok: String,
//!     #[primitive(tag = 2)]
//!     pub cancel: String,
//!     #[unknown_chunks]
//!     pub unknown_chunks: Vec<lcf::chunk::UnknownChunk>,
//! }
//! ```
//!
//! Exactly one field must carry `#[unknown_chunks]`; it holds tags the schema doesn't
//! recognize, so writes can round-trip them byte-exactly. Every other field needs exactly
//! one of `#[primitive(tag = N)]`, `#[record(tag = N)]`, `#[array_primitive(tag = N)]`, or
//! `#[array_record(tag = N, size = M)]`. Appending `, always` to `primitive`/`record` makes
//! the field unconditionally persisted instead of omitted when equal to its default.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Field, Ident, LitInt, Type};

#[proc_macro_derive(
    LcfRecord,
    attributes(primitive, record, array_primitive, array_record, unknown_chunks)
)]
pub fn lcf_record_derive(input: TokenStream) -> TokenStream {
    match derive_impl(parse_macro_input!(input as DeriveInput)) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

enum FieldSpec {
    Primitive {
        tag: u32,
        always: bool,
        name: Ident,
        ty: Type,
    },
    Record {
        tag: u32,
        always: bool,
        name: Ident,
        ty: Type,
    },
    ArrayPrimitive {
        tag: u32,
        name: Ident,
        ty: Type,
    },
    ArrayRecord {
        tag: u32,
        size_tag: u32,
        name: Ident,
        ty: Type,
    },
}

fn derive_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let type_name = &input.ident;
    let type_name_str = type_name.to_string();

    let data = match &input.data {
        Data::Struct(s) => s,
        _ => return Err(syn::Error::new_spanned(&input, "LcfRecord only supports structs")),
    };

    let mut fields = Vec::new();
    let mut unknown_field: Option<Ident> = None;

    for field in &data.fields {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "tuple structs are not supported"));
        };

        if has_attr(field, "unknown_chunks") {
            if unknown_field.is_some() {
                return Err(syn::Error::new_spanned(field, "duplicate #[unknown_chunks]"));
            }
            unknown_field = Some(ident);
            continue;
        }

        fields.push(parse_field_spec(field, ident)?);
    }

    let Some(unknown_field) = unknown_field else {
        return Err(syn::Error::new_spanned(
            &input,
            "exactly one field must be marked #[unknown_chunks]",
        ));
    };

    let descriptors = build_descriptors(&fields);
    let read_body = build_read_body(&fields);
    let write_body = build_write_body(&fields);
    let xml_read = build_xml_read(&fields);
    let xml_write = build_xml_write(&fields);

    Ok(quote! {
        impl ::lcf::schema::Record for #type_name {
            const TYPE_NAME: &'static str = #type_name_str;
            const FIELDS: &'static [::lcf::schema::FieldDescriptor] = &[ #(#descriptors),* ];

            fn read_body(
                raw: &::lcf::chunk::RawChunks,
                ctx: &::lcf::codec::DecodeCtx,
            ) -> ::lcf::error::LcfResult<Self> {
                let mut value = Self::default();
                #(#read_body)*
                Ok(value)
            }

            fn write_body(
                &self,
                w: &mut ::lcf::chunk::RecordWriter,
                ctx: &::lcf::codec::EncodeCtx,
            ) -> ::lcf::error::LcfResult<()> {
                #(#write_body)*
                Ok(())
            }

            fn unknown_chunks(&self) -> &[::lcf::chunk::UnknownChunk] {
                &self.#unknown_field
            }

            fn unknown_chunks_mut(&mut self) -> &mut ::std::vec::Vec<::lcf::chunk::UnknownChunk> {
                &mut self.#unknown_field
            }
        }

        impl ::lcf::xml::XmlRecord for #type_name {
            fn read_xml_fields(
                elem: &::lcf::xml::XmlElement,
                ctx: &::lcf::codec::DecodeCtx,
            ) -> ::lcf::error::LcfResult<Self> {
                let mut value = Self::default();
                #(#xml_read)*
                Ok(value)
            }

            fn write_xml_fields(
                &self,
                w: &mut ::lcf::xml::XmlFieldWriter,
                ctx: &::lcf::codec::EncodeCtx,
            ) -> ::lcf::error::LcfResult<()> {
                #(#xml_write)*
                Ok(())
            }
        }
    })
}

fn has_attr(field: &Field, name: &str) -> bool {
    field.attrs.iter().any(|a| a.path().is_ident(name))
}

fn parse_field_spec(field: &Field, name: Ident) -> syn::Result<FieldSpec> {
    let ty = field.ty.clone();

    for attr in &field.attrs {
        if attr.path().is_ident("primitive") {
            let (tag, always) = parse_tag_always(attr)?;
            return Ok(FieldSpec::Primitive { tag, always, name, ty });
        } else if attr.path().is_ident("record") {
            let (tag, always) = parse_tag_always(attr)?;
            return Ok(FieldSpec::Record { tag, always, name, ty });
        } else if attr.path().is_ident("array_primitive") {
            let (tag, _) = parse_tag_always(attr)?;
            return Ok(FieldSpec::ArrayPrimitive { tag, name, ty });
        } else if attr.path().is_ident("array_record") {
            let (tag, size_tag) = parse_tag_size(attr)?;
            return Ok(FieldSpec::ArrayRecord { tag, size_tag, name, ty });
        }
    }

    Err(syn::Error::new_spanned(
        field,
        "field needs one of #[primitive], #[record], #[array_primitive], #[array_record] or #[unknown_chunks]",
    ))
}

fn parse_tag_always(attr: &syn::Attribute) -> syn::Result<(u32, bool)> {
    let mut tag = None;
    let mut always = false;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("tag") {
            let lit: LitInt = meta.value()?.parse()?;
            tag = Some(lit.base10_parse()?);
            Ok(())
        } else if meta.path.is_ident("always") {
            always = true;
            Ok(())
        } else {
            Err(meta.error("expected `tag = N` or `always`"))
        }
    })?;
    let tag = tag.ok_or_else(|| syn::Error::new_spanned(attr, "missing `tag = N`"))?;
    Ok((tag, always))
}

fn parse_tag_size(attr: &syn::Attribute) -> syn::Result<(u32, u32)> {
    let mut tag = None;
    let mut size = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("tag") {
            let lit: LitInt = meta.value()?.parse()?;
            tag = Some(lit.base10_parse()?);
            Ok(())
        } else if meta.path.is_ident("size") {
            let lit: LitInt = meta.value()?.parse()?;
            size = Some(lit.base10_parse()?);
            Ok(())
        } else {
            Err(meta.error("expected `tag = N` or `size = M`"))
        }
    })?;
    let tag = tag.ok_or_else(|| syn::Error::new_spanned(attr, "missing `tag = N`"))?;
    let size = size.ok_or_else(|| syn::Error::new_spanned(attr, "missing `size = M`"))?;
    Ok((tag, size))
}

fn build_descriptors(fields: &[FieldSpec]) -> Vec<TokenStream2> {
    let mut out = Vec::new();
    for field in fields {
        match field {
            FieldSpec::Primitive { tag, always, name, .. } => {
                let name_str = name.to_string();
                let presence = if *always {
                    quote!(::lcf::schema::Presence::Always)
                } else {
                    quote!(::lcf::schema::Presence::OmitIfDefault)
                };
                out.push(quote! {
                    ::lcf::schema::FieldDescriptor {
                        tag: #tag,
                        name: #name_str,
                        category: ::lcf::schema::FieldCategory::Primitive,
                        presence: #presence,
                    }
                });
            }
            FieldSpec::Record { tag, always, name, .. } => {
                let name_str = name.to_string();
                let presence = if *always {
                    quote!(::lcf::schema::Presence::Always)
                } else {
                    quote!(::lcf::schema::Presence::OmitIfDefault)
                };
                out.push(quote! {
                    ::lcf::schema::FieldDescriptor {
                        tag: #tag,
                        name: #name_str,
                        category: ::lcf::schema::FieldCategory::Record,
                        presence: #presence,
                    }
                });
            }
            FieldSpec::ArrayPrimitive { tag, name, .. } => {
                let name_str = name.to_string();
                out.push(quote! {
                    ::lcf::schema::FieldDescriptor {
                        tag: #tag,
                        name: #name_str,
                        category: ::lcf::schema::FieldCategory::ArrayPrimitive,
                        presence: ::lcf::schema::Presence::OmitIfDefault,
                    }
                });
            }
            FieldSpec::ArrayRecord { tag, size_tag, name, .. } => {
                let name_str = name.to_string();
                out.push(quote! {
                    ::lcf::schema::FieldDescriptor {
                        tag: #size_tag,
                        name: concat!(#name_str, ".size"),
                        category: ::lcf::schema::FieldCategory::Size { of_tag: #tag },
                        presence: ::lcf::schema::Presence::SizeOfCompanion,
                    }
                });
                out.push(quote! {
                    ::lcf::schema::FieldDescriptor {
                        tag: #tag,
                        name: #name_str,
                        category: ::lcf::schema::FieldCategory::ArrayRecord { size_tag: #size_tag },
                        presence: ::lcf::schema::Presence::OmitIfDefault,
                    }
                });
            }
        }
    }
    out
}

fn build_read_body(fields: &[FieldSpec]) -> Vec<TokenStream2> {
    fields
        .iter()
        .map(|field| match field {
            FieldSpec::Primitive { tag, name, ty, .. } => quote! {
                value.#name = match raw.get(#tag) {
                    ::std::option::Option::Some(payload) => {
                        <#ty as ::lcf::primitive::Primitive>::decode(payload, ctx)?
                    }
                    ::std::option::Option::None => <#ty as ::std::default::Default>::default(),
                };
            },
            FieldSpec::Record { tag, name, ty, .. } => quote! {
                value.#name = match raw.get(#tag) {
                    ::std::option::Option::Some(payload) => {
                        ::lcf::codec::decode_record::<#ty>(payload, ctx)?
                    }
                    ::std::option::Option::None => <#ty as ::std::default::Default>::default(),
                };
            },
            FieldSpec::ArrayPrimitive { tag, name, .. } => quote! {
                value.#name = match raw.get(#tag) {
                    ::std::option::Option::Some(payload) => {
                        ::lcf::codec::decode_primitive_array(payload, ctx)?
                    }
                    ::std::option::Option::None => ::std::vec::Vec::new(),
                };
            },
            FieldSpec::ArrayRecord { tag, size_tag, name, .. } => {
                let elem_ty = inner_type(&field_ty(field));
                quote! {
                    value.#name = {
                        let count = raw.get_varint(#size_tag)?;
                        match (count, raw.get(#tag)) {
                            (::std::option::Option::Some(n), ::std::option::Option::Some(payload)) => {
                                ::lcf::codec::decode_record_array::<#elem_ty>(payload, n, ctx)?
                            }
                            _ => ::std::vec::Vec::new(),
                        }
                    };
                }
            }
        })
        .collect()
}

fn field_ty(field: &FieldSpec) -> Type {
    match field {
        FieldSpec::Primitive { ty, .. }
        | FieldSpec::Record { ty, .. }
        | FieldSpec::ArrayPrimitive { ty, .. }
        | FieldSpec::ArrayRecord { ty, .. } => ty.clone(),
    }
}

/// Pulls `T` out of a `Vec<T>` type path, for array fields.
fn inner_type(ty: &Type) -> Type {
    if let Type::Path(p) = ty {
        if let Some(seg) = p.path.segments.last() {
            if seg.ident == "Vec" {
                if let syn::PathArguments::AngleBracketed(args) = &seg.arguments {
                    if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                        return inner.clone();
                    }
                }
            }
        }
    }
    ty.clone()
}

fn build_write_body(fields: &[FieldSpec]) -> Vec<TokenStream2> {
    fields
        .iter()
        .map(|field| match field {
            FieldSpec::Primitive { tag, always, name, ty } => {
                let guard = if *always {
                    quote!(true)
                } else {
                    quote!(self.#name != <#ty as ::std::default::Default>::default())
                };
                quote! {
                    if #guard {
                        let payload = <#ty as ::lcf::primitive::Primitive>::encode(&self.#name, ctx)?;
                        w.emit(#tag, payload);
                    }
                }
            }
            FieldSpec::Record { tag, always, name, ty } => {
                let guard = if *always {
                    quote!(true)
                } else {
                    quote!(self.#name != <#ty as ::std::default::Default>::default())
                };
                quote! {
                    if #guard {
                        let payload = ::lcf::codec::encode_record(&self.#name, ctx)?;
                        w.emit(#tag, payload);
                    }
                }
            }
            FieldSpec::ArrayPrimitive { tag, name, .. } => quote! {
                if !self.#name.is_empty() {
                    let payload = ::lcf::codec::encode_primitive_array(&self.#name, ctx)?;
                    w.emit(#tag, payload);
                }
            },
            FieldSpec::ArrayRecord { tag, size_tag, name, .. } => quote! {
                if !self.#name.is_empty() {
                    w.emit(#size_tag, ::lcf::varint::encode(self.#name.len() as u32));
                    let payload = ::lcf::codec::encode_record_array(&self.#name, ctx)?;
                    w.emit(#tag, payload);
                }
            },
        })
        .collect()
}

fn build_xml_read(fields: &[FieldSpec]) -> Vec<TokenStream2> {
    fields
        .iter()
        .map(|field| match field {
            FieldSpec::Primitive { name, .. } => {
                let name_str = name.to_string();
                quote! {
                    if let ::std::option::Option::Some(child) = elem.child(#name_str) {
                        value.#name = ::lcf::primitive::Primitive::decode_xml(child.text())?;
                    }
                }
            }
            FieldSpec::Record { name, ty, .. } => {
                let name_str = name.to_string();
                quote! {
                    if let ::std::option::Option::Some(child) = elem.child(#name_str) {
                        value.#name = <#ty as ::lcf::xml::XmlRecord>::read_xml_fields(child, ctx)?;
                    }
                }
            }
            FieldSpec::ArrayPrimitive { name, .. } => {
                let name_str = name.to_string();
                quote! {
                    if let ::std::option::Option::Some(child) = elem.child(#name_str) {
                        value.#name = ::lcf::xml::decode_primitive_tokens(child.text())?;
                    }
                }
            }
            FieldSpec::ArrayRecord { name, .. } => {
                let elem_ty = inner_type(&field_ty(field));
                let name_str = name.to_string();
                quote! {
                    value.#name = elem
                        .children(#name_str)
                        .map(|child| <#elem_ty as ::lcf::xml::XmlRecord>::read_xml_fields(child, ctx))
                        .collect::<::lcf::error::LcfResult<::std::vec::Vec<_>>>()?;
                }
            }
        })
        .collect()
}

fn build_xml_write(fields: &[FieldSpec]) -> Vec<TokenStream2> {
    fields
        .iter()
        .map(|field| match field {
            FieldSpec::Primitive { always, name, ty, .. } => {
                let name_str = name.to_string();
                let guard = if *always {
                    quote!(true)
                } else {
                    quote!(self.#name != <#ty as ::std::default::Default>::default())
                };
                quote! {
                    if #guard {
                        w.leaf(#name_str, &::lcf::primitive::Primitive::encode_xml(&self.#name));
                    }
                }
            }
            FieldSpec::Record { always, name, ty, .. } => {
                let name_str = name.to_string();
                let guard = if *always {
                    quote!(true)
                } else {
                    quote!(self.#name != <#ty as ::std::default::Default>::default())
                };
                quote! {
                    if #guard {
                        w.nested(#name_str, |w| ::lcf::xml::XmlRecord::write_xml_fields(&self.#name, w, ctx))?;
                    }
                }
            }
            FieldSpec::ArrayPrimitive { name, .. } => {
                let name_str = name.to_string();
                quote! {
                    if !self.#name.is_empty() {
                        w.leaf(#name_str, &::lcf::xml::encode_primitive_tokens(&self.#name));
                    }
                }
            }
            FieldSpec::ArrayRecord { name, .. } => {
                let name_str = name.to_string();
                quote! {
                    for (index, item) in self.#name.iter().enumerate() {
                        w.indexed(#name_str, index + 1, |w| ::lcf::xml::XmlRecord::write_xml_fields(item, w, ctx))?;
                    }
                }
            }
        })
        .collect()
}
