//! `#[derive(HashAppend)]` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, DeriveInput, Result};

use crate::resolve::{self, FieldInfo, Shape, Strategy, VariantInfo};

const NAMESPACE: &str = "hash_append";

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let strategy = Strategy::resolve(&input, NAMESPACE)?;
    let name = &input.ident;

    let mut generics = if strategy.is_structural() {
        resolve::with_bounds(&input.generics, quote!(::shapehash::HashAppend))
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
                ::shapehash::HashAppend
        });
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let class = strategy.class();
    let body = match &strategy {
        Strategy::Member(method) => quote!(self.#method(__hash)),
        Strategy::FreeFunction(path) => quote!(#path(__hash, self)),
        Strategy::Sequence => quote!(::shapehash::engine::append_sequence(__hash, self)),
        Strategy::Struct(shape) => {
            let parts = shape.fields.iter().map(|field| {
                let member = &field.member;
                append_part(field, quote!(&self.#member))
            });
            walk(shape, parts)
        }
        Strategy::Enum(variants) => expand_enum(variants, &input.attrs)?,
    };

    Ok(quote! {
        impl #impl_generics ::shapehash::HashAppend for #name #ty_generics #where_clause {
            const CLASS: ::shapehash::TraversalClass = ::shapehash::TraversalClass::#class;

            #[inline]
            fn hash_append<__H: ::shapehash::Accumulator>(&self, __hash: &mut __H) {
                #body
            }
        }
    })
}

/// One `Parts` call for `field`, read through `access` (a reference).
fn append_part(field: &FieldInfo, access: TokenStream) -> TokenStream {
    match &field.with {
        Some(path) => quote!(__parts.part_with(|__hash| #path(__hash, #access));),
        None => quote!(__parts.part(#access);),
    }
}

fn walk(shape: &Shape, parts: impl Iterator<Item = TokenStream>) -> TokenStream {
    let arity = shape.arity();
    if arity == 0 {
        return quote!(::shapehash::engine::Parts::with_arity(__hash, 0usize).finish(););
    }
    quote! {
        let mut __parts = ::shapehash::engine::Parts::with_arity(__hash, #arity);
        #(#parts)*
        __parts.finish();
    }
}

/// Fieldless enums hash their discriminant value at the `repr` width. Enums
/// with data hash the variant's declaration index, then the variant's fields.
fn expand_enum(variants: &[VariantInfo], attrs: &[Attribute]) -> Result<TokenStream> {
    if variants.is_empty() {
        return Ok(quote!(match *self {}));
    }

    let repr = if resolve::is_fieldless(variants) {
        Some(resolve::discriminant_repr(attrs)?)
    } else {
        None
    };
    let arms = variants.iter().map(|variant| {
        let ident = &variant.ident;
        let index = variant.index;
        let pattern = variant.shape.pattern(&quote!(Self::#ident));
        if let Some(repr) = &repr {
            return quote! {
                #pattern => ::shapehash::engine::append_scalar(__hash, Self::#ident as #repr),
            };
        }
        let parts = variant.shape.fields.iter().map(|field| {
            let binding = &field.binding;
            append_part(field, quote!(#binding))
        });
        let walk = walk(&variant.shape, parts);
        quote! {
            #pattern => {
                ::shapehash::engine::append_discriminant(__hash, #index);
                #walk
            }
        }
    });

    Ok(quote! {
        match self {
            #(#arms)*
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_str(input: DeriveInput) -> String {
        expand(input).map(|t| t.to_string()).unwrap_or_else(|e| e.to_string())
    }

    #[test]
    fn test_struct_walks_every_field() {
        let out = expand_str(parse_quote!(struct Ratio { max: i32, current: i32 }));
        assert!(out.contains("TraversalClass :: PlainData"));
        assert!(out.contains("with_arity (__hash , 2usize)"));
        assert!(out.contains("__parts . part (& self . max)"));
        assert!(out.contains("__parts . part (& self . current)"));
    }

    #[test]
    fn test_member_hook_replaces_traversal() {
        let out = expand_str(parse_quote! {
            #[hash_append(member = "fingerprint")]
            struct Player { name: String }
        });
        assert!(out.contains("self . fingerprint (__hash)"));
        assert!(!out.contains("Parts"));
    }

    #[test]
    fn test_field_with_hook() {
        let out = expand_str(parse_quote! {
            struct Wrapper(#[hash_append(with = "hooks::append_len")] Vec<u8>);
        });
        assert!(out.contains("part_with (| __hash | hooks :: append_len (__hash , & self . 0))"));
    }

    #[test]
    fn test_generic_bounds() {
        let out = expand_str(parse_quote!(struct Pair<A, B>(A, B);));
        assert!(out.contains("A : :: shapehash :: HashAppend"));
        assert!(out.contains("B : :: shapehash :: HashAppend"));
    }

    #[test]
    fn test_enum_discriminants() {
        let out = expand_str(parse_quote!(enum Mode { Idle, Busy }));
        assert!(out.contains("TraversalClass :: Scalar"));
        assert!(out.contains("append_scalar (__hash , Self :: Busy as isize)"));

        let out = expand_str(parse_quote! {
            #[repr(u8)]
            enum Level { Low = 10, High = 20 }
        });
        assert!(out.contains("append_scalar (__hash , Self :: High as u8)"));

        let out = expand_str(parse_quote!(enum Shape { Dot, Line(u8, u8) }));
        assert!(out.contains("TraversalClass :: PlainData"));
        assert!(out.contains("Self :: Line (__f0 , __f1)"));
    }

    #[test]
    fn test_union_error() {
        let out = expand_str(parse_quote!(union U { a: u32 }));
        assert!(out.contains("unions have no unambiguous shape"));
    }
}
