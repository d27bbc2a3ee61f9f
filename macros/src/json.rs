//! `#[derive(WriteJson)]` and `#[derive(ReadJson)]` implementations.
//!
//! Both resolve the type's shape with the same ladder as the hashing
//! derive, reading `#[json(...)]` attributes. A `with` hook names a module
//! providing `write_json(writer, &value)` and `read_json(reader)`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Error, Result};

use crate::resolve::{self, FieldsKind, Shape, Strategy, VariantInfo};

const NAMESPACE: &str = "json";

// =============================================================================
// WriteJson
// =============================================================================

pub fn expand_write(input: DeriveInput) -> Result<TokenStream> {
    let strategy = Strategy::resolve(&input, NAMESPACE)?;
    let name = &input.ident;

    let mut generics = if strategy.is_structural() {
        resolve::with_bounds(&input.generics, quote!(::shapehash::json::WriteJson))
    } else {
        input.generics.clone()
    };
    if let Strategy::Sequence = strategy {
        let (_, ty_generics, _) = input.generics.split_for_impl();
        let where_clause = generics.make_where_clause();
        where_clause.predicates.push(syn::parse_quote! {
            for<'__a> &'__a #name #ty_generics: ::core::iter::IntoIterator
        });
        where_clause.predicates.push(syn::parse_quote! {
            for<'__a> <&'__a #name #ty_generics as ::core::iter::IntoIterator>::Item:
                ::shapehash::json::WriteJson
        });
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &strategy {
        Strategy::Member(method) => quote!(self.#method(__writer)),
        Strategy::FreeFunction(module) => quote!(#module::write_json(__writer, self)),
        Strategy::Sequence => quote!(__writer.write_sequence(self)),
        Strategy::Struct(shape) => {
            let accesses = shape.fields.iter().map(|field| {
                let member = &field.member;
                quote!(&self.#member)
            });
            write_shape(shape, accesses.collect())
        }
        Strategy::Enum(variants) => write_enum(variants),
    };

    Ok(quote! {
        impl #impl_generics ::shapehash::json::WriteJson for #name #ty_generics #where_clause {
            fn write_json<__W: ::core::fmt::Write>(
                &self,
                __writer: &mut ::shapehash::json::JsonWriter<'_, __W>,
            ) -> ::shapehash::json::JsonResult<()> {
                #body
            }
        }
    })
}

/// Object for named fields, array otherwise. `accesses` are references.
fn write_shape(shape: &Shape, accesses: Vec<TokenStream>) -> TokenStream {
    let calls = shape.fields.iter().zip(accesses).map(|(field, access)| {
        let key = &field.name;
        match (shape.kind, &field.with) {
            (FieldsKind::Named, Some(module)) => quote! {
                __object.field_with(#key, |__writer| #module::write_json(__writer, #access))?;
            },
            (FieldsKind::Named, None) => quote!(__object.field(#key, #access)?;),
            (_, Some(module)) => quote! {
                __array.element_with(|__writer| #module::write_json(__writer, #access))?;
            },
            (_, None) => quote!(__array.element(#access)?;),
        }
    });
    match shape.kind {
        FieldsKind::Named if shape.fields.is_empty() => quote!(__writer.object()?.finish()),
        FieldsKind::Named => quote! {
            let mut __object = __writer.object()?;
            #(#calls)*
            __object.finish()
        },
        _ if shape.fields.is_empty() => quote!(__writer.array()?.finish()),
        FieldsKind::Tuple | FieldsKind::Unit => quote! {
            let mut __array = __writer.array()?;
            #(#calls)*
            __array.finish()
        },
    }
}

fn write_enum(variants: &[VariantInfo]) -> TokenStream {
    if variants.is_empty() {
        return quote!(match *self {});
    }

    let arms = variants.iter().map(|variant| {
        let ident = &variant.ident;
        let key = ident.to_string();
        let pattern = variant.shape.pattern(&quote!(Self::#ident));
        if variant.shape.kind == FieldsKind::Unit {
            return quote!(#pattern => __writer.write_str(#key),);
        }
        let accesses = variant
            .shape
            .fields
            .iter()
            .map(|field| {
                let binding = &field.binding;
                quote!(#binding)
            })
            .collect();
        let payload = write_shape(&variant.shape, accesses);
        quote! {
            #pattern => __writer.write_variant(#key, |__writer| { #payload }),
        }
    });

    quote! {
        match self {
            #(#arms)*
        }
    }
}

// =============================================================================
// ReadJson
// =============================================================================

pub fn expand_read(input: DeriveInput) -> Result<TokenStream> {
    let strategy = Strategy::resolve(&input, NAMESPACE)?;
    let name = &input.ident;
    let ty_name = name.to_string();

    let mut generics = if strategy.is_structural() {
        resolve::with_bounds(&input.generics, quote!(::shapehash::json::ReadJson))
    } else {
        input.generics.clone()
    };
    if let Strategy::Sequence = strategy {
        let (_, ty_generics, _) = input.generics.split_for_impl();
        let this = quote!(#name #ty_generics);
        let where_clause = generics.make_where_clause();
        where_clause.predicates.push(syn::parse_quote! {
            #this: ::core::iter::IntoIterator
                + ::core::iter::FromIterator<<#this as ::core::iter::IntoIterator>::Item>
        });
        where_clause.predicates.push(syn::parse_quote! {
            <#this as ::core::iter::IntoIterator>::Item: ::shapehash::json::ReadJson
        });
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &strategy {
        Strategy::Member(method) => {
            return Err(Error::new_spanned(
                method,
                "a `member` hook can only write JSON; implement `ReadJson` by hand \
                 or use `#[json(with = \"module\")]`",
            ));
        }
        Strategy::FreeFunction(module) => quote!(#module::read_json(__reader)),
        Strategy::Sequence => quote! {
            __reader.read_sequence::<<Self as ::core::iter::IntoIterator>::Item, Self>()
        },
        Strategy::Struct(shape) => read_shape(shape, &quote!(Self), &ty_name),
        Strategy::Enum(variants) => read_enum(variants, &ty_name),
    };

    Ok(quote! {
        impl #impl_generics ::shapehash::json::ReadJson for #name #ty_generics #where_clause {
            fn read_json(
                __reader: &mut ::shapehash::json::JsonReader<'_>,
            ) -> ::shapehash::json::JsonResult<Self> {
                #body
            }
        }
    })
}

/// Expression reading `shape` and building it with `path`.
fn read_shape(shape: &Shape, path: &TokenStream, ty_name: &str) -> TokenStream {
    let construct = shape.construct(path);
    match shape.kind {
        FieldsKind::Named => {
            let slots = shape.fields.iter().map(|field| {
                let binding = &field.binding;
                let ty = &field.ty;
                quote!(let mut #binding: ::core::option::Option<#ty> = ::core::option::Option::None;)
            });
            let arms = shape.fields.iter().map(|field| {
                let binding = &field.binding;
                let key = &field.name;
                let read = match &field.with {
                    Some(module) => quote!(#module::read_json(__reader)?),
                    None => quote!(__reader.read()?),
                };
                quote! {
                    #key => {
                        if #binding.is_some() {
                            return ::core::result::Result::Err(
                                __reader.duplicate_field(#key, #ty_name),
                            );
                        }
                        #binding = ::core::option::Option::Some(#read);
                    }
                }
            });
            let takes = shape.fields.iter().map(|field| {
                let binding = &field.binding;
                let key = &field.name;
                quote! {
                    let #binding = #binding
                        .ok_or_else(|| __reader.missing_field(__at, #key, #ty_name))?;
                }
            });
            quote! {{
                let __at = __reader.peek_position();
                #(#slots)*
                __reader.read_object(|__reader, __key| {
                    match __key {
                        #(#arms)*
                        _ => __reader.skip_unknown(__key, #ty_name)?,
                    }
                    ::core::result::Result::Ok(())
                })?;
                #(#takes)*
                ::core::result::Result::Ok(#construct)
            }}
        }
        _ if shape.fields.is_empty() => quote! {{
            __reader.tuple(0usize)?.finish()?;
            ::core::result::Result::Ok(#construct)
        }},
        FieldsKind::Tuple | FieldsKind::Unit => {
            let arity = shape.arity();
            let elements = shape.fields.iter().map(|field| {
                let binding = &field.binding;
                match &field.with {
                    Some(module) => quote! {
                        let #binding = __array.element_with(|__reader| #module::read_json(__reader))?;
                    },
                    None => quote!(let #binding = __array.element()?;),
                }
            });
            quote! {{
                let mut __array = __reader.tuple(#arity)?;
                #(#elements)*
                __array.finish()?;
                ::core::result::Result::Ok(#construct)
            }}
        }
    }
}

fn read_enum(variants: &[VariantInfo], ty_name: &str) -> TokenStream {
    let unit_arms = variants
        .iter()
        .filter(|v| v.shape.kind == FieldsKind::Unit)
        .map(|variant| {
            let ident = &variant.ident;
            let key = ident.to_string();
            quote!(#key => ::core::result::Result::Ok(Self::#ident),)
        });
    let by_name = quote! {
        let (__at, __name) = __reader.read_variant_name()?;
        match __name.as_str() {
            #(#unit_arms)*
            __other => ::core::result::Result::Err(__reader.unknown_variant(__at, __other, #ty_name)),
        }
    };
    if resolve::is_fieldless(variants) {
        return by_name;
    }

    let payload_arms = variants
        .iter()
        .filter(|v| v.shape.kind != FieldsKind::Unit)
        .map(|variant| {
            let ident = &variant.ident;
            let key = ident.to_string();
            let read = read_shape(&variant.shape, &quote!(Self::#ident), ty_name);
            quote!(#key => #read,)
        });
    quote! {
        if __reader.peek_token() == ::core::option::Option::Some(b'"') {
            #by_name
        } else {
            __reader.read_variant(|__reader, __at, __name| match __name {
                #(#payload_arms)*
                __other => ::core::result::Result::Err(__reader.unknown_variant(__at, __other, #ty_name)),
            })
        }
    }
}
