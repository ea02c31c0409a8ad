use proc_macro2::Span;
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Attribute, Lifetime, Token, Type, TypeParamBound};

pub(crate) const EXTENDS: &str = "extends";

pub(crate) fn is_extends(attr: &Attribute) -> bool {
    attr.path().is_ident(EXTENDS)
}

/// Parses the comma-separated type list of an `#[extends(...)]` attribute.
pub(crate) fn parse_extends(attr: &Attribute) -> syn::Result<Vec<Type>> {
    let types = attr.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;

    if types.is_empty() {
        return Err(syn::Error::new_spanned(
            attr,
            "`#[extends(...)]` must list at least one type",
        ));
    }

    types.into_iter().map(normalize).collect()
}

/// Removes invisible grouping and gives trait objects without a lifetime bound an explicit
/// `'static` bound, which is what the same type means when written as a generic argument.
///
/// Trait objects bounded by any other lifetime are rejected, since the generated impls have no
/// lifetime parameters to bind them to.
pub(crate) fn normalize(ty: Type) -> syn::Result<Type> {
    match ty {
        Type::Group(group) => normalize(*group.elem),
        Type::Paren(paren) => normalize(*paren.elem),
        Type::TraitObject(mut object) => {
            let mut has_lifetime = false;

            for bound in &object.bounds {
                if let TypeParamBound::Lifetime(lifetime) = bound {
                    if lifetime.ident != "static" {
                        return Err(syn::Error::new_spanned(
                            lifetime,
                            "trait objects in `#[one_of::variants]` must be `'static`",
                        ));
                    }

                    has_lifetime = true;
                }
            }

            if !has_lifetime {
                object.bounds.push(TypeParamBound::Lifetime(Lifetime::new(
                    "'static",
                    Span::call_site(),
                )));
            }

            Ok(Type::TraitObject(object))
        }
        other => Ok(other),
    }
}

/// Textual identity of a normalized type, used to detect duplicates.
pub(crate) fn type_key(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}
