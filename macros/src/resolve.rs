//! Shape discovery and hook resolution shared by every derive.
//!
//! The three derives read the same container/field attributes (under their
//! own namespace) and pick exactly one strategy, first match wins:
//!
//! 1. `member = "method"`: the type's own method
//! 2. `with = "path"`: a free function (or module, for JSON)
//! 3. `sequence`: iterate `&Self`
//! 4. tuple or unit struct: positional product
//! 5. struct with named fields, or enum: plain data / scalar discriminant
//!
//! Unions have no unambiguous shape and are rejected unless a hook applies.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Error, Fields, GenericParam, Generics, Ident, LitStr, Member,
    Path, Result, Type,
};

/// Container-level hooks.
#[derive(Default)]
struct Hooks {
    member: Option<Ident>,
    with: Option<Path>,
    sequence: bool,
}

fn parse_hooks(attrs: &[Attribute], namespace: &str) -> Result<Hooks> {
    let mut hooks = Hooks::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident(namespace)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("member") {
                if hooks.member.is_some() {
                    return Err(meta.error("duplicate `member` hook"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                hooks.member = Some(lit.parse()?);
            } else if meta.path.is_ident("with") {
                if hooks.with.is_some() {
                    return Err(meta.error("duplicate `with` hook"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                hooks.with = Some(lit.parse()?);
            } else if meta.path.is_ident("sequence") {
                hooks.sequence = true;
            } else {
                return Err(meta.error(format!(
                    "unknown `{namespace}` attribute; expected `member`, `with` or `sequence`"
                )));
            }
            Ok(())
        })?;
    }
    Ok(hooks)
}

fn parse_field_with(attrs: &[Attribute], namespace: &str) -> Result<Option<Path>> {
    let mut with = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident(namespace)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("with") {
                let lit: LitStr = meta.value()?.parse()?;
                with = Some(lit.parse()?);
                Ok(())
            } else {
                Err(meta.error(format!("unknown `{namespace}` field attribute; expected `with`")))
            }
        })?;
    }
    Ok(with)
}

// =============================================================================
// Shapes
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FieldsKind {
    Named,
    Tuple,
    Unit,
}

pub struct FieldInfo {
    /// `self.<member>` accessor.
    pub member: Member,
    /// Binding used when destructuring a variant.
    pub binding: Ident,
    /// Member name as written in JSON.
    pub name: String,
    pub ty: Type,
    pub with: Option<Path>,
}

pub struct Shape {
    pub kind: FieldsKind,
    pub fields: Vec<FieldInfo>,
}

impl Shape {
    fn from_fields(fields: &Fields, namespace: &str) -> Result<Self> {
        let kind = match fields {
            Fields::Named(_) => FieldsKind::Named,
            Fields::Unnamed(_) => FieldsKind::Tuple,
            Fields::Unit => FieldsKind::Unit,
        };
        let fields = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let (member, binding, name) = match &field.ident {
                    Some(ident) => (
                        Member::Named(ident.clone()),
                        format_ident!("__field_{}", ident),
                        ident.unraw().to_string(),
                    ),
                    None => (Member::Unnamed(i.into()), format_ident!("__f{}", i), i.to_string()),
                };
                Ok(FieldInfo {
                    member,
                    binding,
                    name,
                    ty: field.ty.clone(),
                    with: parse_field_with(&field.attrs, namespace)?,
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self { kind, fields })
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Destructuring pattern for `path`, binding every field by reference.
    pub fn pattern(&self, path: &TokenStream) -> TokenStream {
        let bindings = self.fields.iter().map(|f| &f.binding);
        match self.kind {
            FieldsKind::Named => {
                let members = self.fields.iter().map(|f| &f.member);
                quote!(#path { #(#members: #bindings),* })
            }
            FieldsKind::Tuple => quote!(#path(#(#bindings),*)),
            FieldsKind::Unit => quote!(#path),
        }
    }

    /// Constructor expression for `path` from the field bindings.
    pub fn construct(&self, path: &TokenStream) -> TokenStream {
        self.pattern(path)
    }
}

pub struct VariantInfo {
    pub ident: Ident,
    pub index: u32,
    pub shape: Shape,
}

// =============================================================================
// Strategy
// =============================================================================

/// The traversal chosen for a type.
pub enum Strategy {
    Member(Ident),
    FreeFunction(Path),
    Sequence,
    Struct(Shape),
    Enum(Vec<VariantInfo>),
}

impl Strategy {
    /// Pick the first applicable strategy for `input`.
    pub fn resolve(input: &DeriveInput, namespace: &str) -> Result<Self> {
        let hooks = parse_hooks(&input.attrs, namespace)?;
        if let Some(member) = hooks.member {
            return Ok(Self::Member(member));
        }
        if let Some(with) = hooks.with {
            return Ok(Self::FreeFunction(with));
        }
        if hooks.sequence {
            return Ok(Self::Sequence);
        }

        match &input.data {
            Data::Struct(data) => Ok(Self::Struct(Shape::from_fields(&data.fields, namespace)?)),
            Data::Enum(data) => {
                let variants = data
                    .variants
                    .iter()
                    .enumerate()
                    .map(|(index, variant)| {
                        let index = u32::try_from(index).map_err(|_| {
                            Error::new_spanned(&variant.ident, "too many enum variants")
                        })?;
                        Ok(VariantInfo {
                            ident: variant.ident.clone(),
                            index,
                            shape: Shape::from_fields(&variant.fields, namespace)?,
                        })
                    })
                    .collect::<Result<_>>()?;
                Ok(Self::Enum(variants))
            }
            Data::Union(data) => Err(Error::new(
                data.union_token.span,
                format!(
                    "unions have no unambiguous shape; add `#[{namespace}(member = \"...\")]` \
                     or `#[{namespace}(with = \"...\")]`"
                ),
            )),
        }
    }

    /// Whether the generated code walks fields (and so needs bounds on the
    /// type parameters).
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Struct(_) | Self::Enum(_))
    }

    /// `TraversalClass` variant name for this strategy.
    pub fn class(&self) -> Ident {
        let name = match self {
            Self::Member(_) => "CustomMember",
            Self::FreeFunction(_) => "CustomFreeFunction",
            Self::Sequence => "Sequence",
            Self::Struct(shape) if shape.kind == FieldsKind::Named => "PlainData",
            Self::Struct(_) => "Product",
            Self::Enum(variants) if is_fieldless(variants) => "Scalar",
            Self::Enum(_) => "PlainData",
        };
        Ident::new(name, Span::call_site())
    }
}

/// Every variant is a unit variant (including the empty enum).
pub fn is_fieldless(variants: &[VariantInfo]) -> bool {
    variants.iter().all(|v| v.shape.kind == FieldsKind::Unit)
}

const INTEGER_REPRS: &[&str] = &[
    "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128", "isize",
];

/// Integer type named by `#[repr(..)]`, or `isize` when none is given.
pub fn discriminant_repr(attrs: &[Attribute]) -> Result<Ident> {
    let mut repr = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.get_ident() {
                if INTEGER_REPRS.iter().any(|name| ident == name) {
                    repr = Some(ident.clone());
                    return Ok(());
                }
            }
            // `align(N)`, `packed(N)`
            if meta.input.peek(syn::token::Paren) {
                let _args;
                syn::parenthesized!(_args in meta.input);
            }
            Ok(())
        })?;
    }
    Ok(repr.unwrap_or_else(|| Ident::new("isize", Span::call_site())))
}

/// Add `bound` to every type parameter.
pub fn with_bounds(generics: &Generics, bound: TokenStream) -> Generics {
    let mut generics = generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(param) = param {
            param.bounds.push(syn::parse_quote!(#bound));
        }
    }
    generics
}
