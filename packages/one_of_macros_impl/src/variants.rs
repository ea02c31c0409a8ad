//! Expansion of `#[one_of::variants]`.
//!
//! Every candidate and every declared ancestor becomes a *class* with one slot in a generated
//! handler-set struct. For each candidate the expansion also spells out its chain of
//! generations (the candidate itself, then one generation per `#[extends(...)]` attribute)
//! in terms of the `one_of::dispatch` building blocks, which select the handler during trait
//! resolution.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Fields, Ident, Item, ItemEnum, Type, Visibility};

use crate::syn_helpers::{is_extends, normalize, parse_extends, type_key};

#[must_use]
pub fn entrypoint(attr: &TokenStream, input: &TokenStream) -> TokenStream {
    let result = core(attr, input);

    match result {
        Ok(r) => r,
        Err(e) => e.to_compile_error(),
    }
}

fn core(attr: &TokenStream, input: &TokenStream) -> syn::Result<TokenStream> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(
            attr,
            "`#[one_of::variants]` does not accept arguments",
        ));
    }

    let item = syn::parse2::<Item>(input.clone())?;

    let Item::Enum(mut item) = item else {
        return Err(syn::Error::new_spanned(
            input,
            "`#[one_of::variants]` can only be applied to an enum",
        ));
    };

    let model = Model::parse(&mut item)?;

    let handlers = model.handlers_struct();
    let variants_impl = model.variants_impl();
    let member_impls = model.member_impls();
    let insert_impls = model.insert_impls();
    let dispatch_impls = model.dispatch_impls();
    let project_impl = model.project_impl();

    Ok(quote! {
        #item

        #handlers
        #variants_impl
        #(#member_impls)*
        #(#insert_impls)*
        #dispatch_impls
        #project_impl
    })
}

struct Candidate {
    variant: Ident,
    ty: Type,
    class: usize,

    // Ancestor generations, nearest first. Entries are indexes into `Model::classes`.
    generations: Vec<Vec<usize>>,
}

struct Model {
    ident: Ident,
    vis: Visibility,
    handlers_ident: Ident,
    candidates: Vec<Candidate>,

    // Candidate types first (in declaration order), then ancestors in order of first use.
    classes: Vec<Type>,
}

impl Model {
    /// Validates the enum and removes the `#[extends]` attributes from its variants.
    fn parse(item: &mut ItemEnum) -> syn::Result<Self> {
        if !item.generics.params.is_empty() || item.generics.where_clause.is_some() {
            return Err(syn::Error::new_spanned(
                &item.generics,
                "`#[one_of::variants]` does not support generic enums",
            ));
        }

        if item.variants.is_empty() {
            return Err(syn::Error::new_spanned(
                &item.ident,
                "`#[one_of::variants]` requires at least one variant",
            ));
        }

        let mut errors: Option<syn::Error> = None;
        let mut report = |error: syn::Error| match errors.as_mut() {
            Some(existing) => existing.combine(error),
            None => errors = Some(error),
        };

        let mut classes = Vec::new();
        let mut class_index = HashMap::new();
        let mut declared = Vec::new();

        for variant in &mut item.variants {
            let ty = match &variant.fields {
                Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                    match normalize(fields.unnamed[0].ty.clone()) {
                        Ok(ty) => ty,
                        Err(error) => {
                            report(error);
                            continue;
                        }
                    }
                }
                _ => {
                    report(syn::Error::new_spanned(
                        &*variant,
                        "each variant must hold exactly one unnamed field, e.g. `Circle(Circle)`",
                    ));
                    continue;
                }
            };

            let key = type_key(&ty);
            if class_index.contains_key(&key) {
                report(syn::Error::new_spanned(
                    &ty,
                    "this type is already a candidate of this enum",
                ));
                continue;
            }

            let class = classes.len();
            class_index.insert(key, class);
            classes.push(ty.clone());

            let mut ancestors = Vec::new();
            for attr in variant.attrs.iter().filter(|attr| is_extends(attr)) {
                match parse_extends(attr) {
                    Ok(generation) => ancestors.push(generation),
                    Err(error) => report(error),
                }
            }

            variant.attrs.retain(|attr| !is_extends(attr));
            declared.push((variant.ident.clone(), ty, class, ancestors));
        }

        let mut candidates = Vec::with_capacity(declared.len());

        for (variant, ty, class, ancestors) in declared {
            let mut seen = vec![type_key(&ty)];
            let mut generations = Vec::with_capacity(ancestors.len());

            for ancestor_generation in ancestors {
                let mut generation = Vec::with_capacity(ancestor_generation.len());

                for ancestor in ancestor_generation {
                    let key = type_key(&ancestor);

                    if seen.contains(&key) {
                        report(syn::Error::new_spanned(
                            &ancestor,
                            "this type is already part of the hierarchy of this candidate",
                        ));
                        continue;
                    }

                    let index = *class_index.entry(key.clone()).or_insert_with(|| {
                        classes.push(ancestor);
                        classes.len() - 1
                    });

                    seen.push(key);
                    generation.push(index);
                }

                if !generation.is_empty() {
                    generations.push(generation);
                }
            }

            candidates.push(Candidate {
                variant,
                ty,
                class,
                generations,
            });
        }

        if let Some(errors) = errors {
            return Err(errors);
        }

        Ok(Self {
            handlers_ident: format_ident!("__{}Handlers", item.ident),
            ident: item.ident.clone(),
            vis: item.vis.clone(),
            candidates,
            classes,
        })
    }

    fn slot_params(&self) -> Vec<Ident> {
        (0..self.classes.len())
            .map(|index| format_ident!("__S{}", index))
            .collect()
    }

    fn slot_fields(&self) -> Vec<Ident> {
        (0..self.classes.len())
            .map(|index| format_ident!("s{}", index))
            .collect()
    }

    fn handlers_struct(&self) -> TokenStream {
        let vis = &self.vis;
        let handlers = &self.handlers_ident;
        let params = self.slot_params();
        let fields = self.slot_fields();

        quote! {
            #[doc(hidden)]
            #[derive(::core::default::Default, ::core::fmt::Debug)]
            #vis struct #handlers<#(#params),*> {
                #(#fields: #params,)*
            }
        }
    }

    fn variants_impl(&self) -> TokenStream {
        let ident = &self.ident;
        let handlers = &self.handlers_ident;
        let unhandled = self
            .classes
            .iter()
            .map(|_| quote!(::one_of::__private::Unhandled));

        quote! {
            impl ::one_of::__private::Variants for #ident {
                type Handlers = #handlers<#(#unhandled),*>;
            }
        }
    }

    fn member_impls(&self) -> Vec<TokenStream> {
        let ident = &self.ident;

        self.candidates
            .iter()
            .map(|candidate| {
                let ty = &candidate.ty;
                let variant = &candidate.variant;

                quote! {
                    impl ::one_of::__private::Member<#ident> for #ty {
                        #[inline]
                        fn wrap(self) -> #ident {
                            #ident::#variant(self)
                        }
                    }
                }
            })
            .collect()
    }

    fn insert_impls(&self) -> Vec<TokenStream> {
        let handlers = &self.handlers_ident;
        let params = self.slot_params();
        let fields = self.slot_fields();

        self.classes
            .iter()
            .enumerate()
            .map(|(filled, class)| {
                let impl_params = params
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| *index != filled)
                    .map(|(_, param)| param);

                let before = params.iter().enumerate().map(|(index, param)| {
                    if index == filled {
                        quote!(::one_of::__private::Unhandled)
                    } else {
                        quote!(#param)
                    }
                });

                let after = params.iter().enumerate().map(|(index, param)| {
                    if index == filled {
                        quote!(__S)
                    } else {
                        quote!(#param)
                    }
                });

                let pattern = fields.iter().enumerate().map(|(index, field)| {
                    if index == filled {
                        quote!(#field: _)
                    } else {
                        quote!(#field)
                    }
                });

                let rebuilt = fields.iter().enumerate().map(|(index, field)| {
                    if index == filled {
                        quote!(#field: slot)
                    } else {
                        quote!(#field)
                    }
                });

                quote! {
                    impl<#(#impl_params,)* __S> ::one_of::__private::Insert<#class, __S>
                        for #handlers<#(#before),*>
                    {
                        type Output = #handlers<#(#after),*>;

                        #[inline]
                        fn insert(self, slot: __S) -> Self::Output {
                            let Self { #(#pattern),* } = self;
                            #handlers { #(#rebuilt),* }
                        }
                    }
                }
            })
            .collect()
    }

    /// The type of the generation chain of a candidate, with the slot type parameters as
    /// link slots.
    fn chain_type(&self, candidate: &Candidate) -> TokenStream {
        let params = self.slot_params();
        let cand = &candidate.ty;
        let link = |class: usize| {
            let target = &self.classes[class];
            let slot = &params[class];
            quote!(::one_of::__private::Link<#cand, #target, #slot>)
        };

        let mut chain = quote!(::one_of::__private::End);

        for generation in candidate.generations.iter().rev() {
            let members = generation_type(generation.iter().map(|class| link(*class)).collect());
            chain = quote!(::one_of::__private::Chain<#members, #chain>);
        }

        let own = link(candidate.class);
        quote!(::one_of::__private::Chain<#own, #chain>)
    }

    /// An expression that builds the generation chain of a candidate from the destructured
    /// slot fields.
    fn chain_value(&self, candidate: &Candidate) -> TokenStream {
        let fields = self.slot_fields();
        let cand = &candidate.ty;
        let link = |class: usize| {
            let target = &self.classes[class];
            let slot = &fields[class];
            quote! {
                ::one_of::__private::Link::<#cand, #target, _>::new(
                    #slot,
                    |__v| __v,
                    |__v| __v,
                )
            }
        };

        let mut chain = quote!(::one_of::__private::End);

        for generation in candidate.generations.iter().rev() {
            let members = generation_value(generation.iter().map(|class| link(*class)).collect());
            chain = quote!(::one_of::__private::Chain::new(#members, #chain));
        }

        let own = link(candidate.class);
        quote!(::one_of::__private::Chain::new(#own, #chain))
    }

    fn dispatch_impls(&self) -> TokenStream {
        let ident = &self.ident;
        let handlers = &self.handlers_ident;
        let params = self.slot_params();
        let fields = self.slot_fields();

        let chain_types: Vec<_> = self
            .candidates
            .iter()
            .map(|candidate| self.chain_type(candidate))
            .collect();
        let chain_values: Vec<_> = self
            .candidates
            .iter()
            .map(|candidate| self.chain_value(candidate))
            .collect();
        let candidate_types: Vec<_> = self.candidates.iter().map(|c| &c.ty).collect();
        let variants: Vec<_> = self.candidates.iter().map(|c| &c.variant).collect();

        quote! {
            impl<__R, #(#params),*> ::one_of::__private::DispatchMut<#ident, __R>
                for #handlers<#(#params),*>
            where
                #(#chain_types: ::one_of::__private::ResolveMut<#candidate_types, __R>,)*
            {
                #[inline]
                fn dispatch_mut(self, value: &mut #ident) -> __R {
                    let Self { #(#fields),* } = self;

                    match value {
                        #(
                            #ident::#variants(__v) => <#chain_types as ::one_of::__private::ResolveMut<
                                #candidate_types,
                                __R,
                            >>::resolve_mut(#chain_values, __v),
                        )*
                    }
                }
            }

            impl<__R, #(#params),*> ::one_of::__private::DispatchRef<#ident, __R>
                for #handlers<#(#params),*>
            where
                #(#chain_types: ::one_of::__private::ResolveRef<#candidate_types, __R>,)*
            {
                #[inline]
                fn dispatch_ref(self, value: &#ident) -> __R {
                    let Self { #(#fields),* } = self;

                    match value {
                        #(
                            #ident::#variants(__v) => <#chain_types as ::one_of::__private::ResolveRef<
                                #candidate_types,
                                __R,
                            >>::resolve_ref(#chain_values, __v),
                        )*
                    }
                }
            }
        }
    }

    fn project_impl(&self) -> TokenStream {
        let ident = &self.ident;
        let handlers = &self.handlers_ident;
        let params = self.slot_params();
        let fields = self.slot_fields();

        let chain_types: Vec<_> = self
            .candidates
            .iter()
            .map(|candidate| self.chain_type(candidate))
            .collect();
        let chain_values: Vec<_> = self
            .candidates
            .iter()
            .map(|candidate| self.chain_value(candidate))
            .collect();
        let candidate_types: Vec<_> = self.candidates.iter().map(|c| &c.ty).collect();
        let variants: Vec<_> = self.candidates.iter().map(|c| &c.variant).collect();

        quote! {
            impl<__T: ?Sized, #(#params: ::core::default::Default),*>
                ::one_of::__private::Project<#ident, __T> for #handlers<#(#params),*>
            where
                #(#chain_types: ::one_of::__private::Locate<#candidate_types, __T>,)*
            {
                #[inline]
                fn project_ref(value: &#ident) -> &__T {
                    let Self { #(#fields),* } = <Self as ::core::default::Default>::default();

                    match value {
                        #(
                            #ident::#variants(__v) => <#chain_types as ::one_of::__private::Locate<
                                #candidate_types,
                                __T,
                            >>::locate_ref(#chain_values, __v),
                        )*
                    }
                }

                #[inline]
                fn project_mut(value: &mut #ident) -> &mut __T {
                    let Self { #(#fields),* } = <Self as ::core::default::Default>::default();

                    match value {
                        #(
                            #ident::#variants(__v) => <#chain_types as ::one_of::__private::Locate<
                                #candidate_types,
                                __T,
                            >>::locate_mut(#chain_values, __v),
                        )*
                    }
                }
            }
        }
    }
}

/// Nests the links of one generation into `Both` pairs, right-associated.
fn generation_type(mut links: Vec<TokenStream>) -> TokenStream {
    let Some(last) = links.pop() else {
        return quote!(::one_of::__private::End);
    };

    links.into_iter().rev().fold(last, |rest, link| {
        quote!(::one_of::__private::Both<#link, #rest>)
    })
}

/// Value-level counterpart of `generation_type`.
fn generation_value(mut links: Vec<TokenStream>) -> TokenStream {
    let Some(last) = links.pop() else {
        return quote!(::one_of::__private::End);
    };

    links.into_iter().rev().fold(last, |rest, link| {
        quote!(::one_of::__private::Both::new(#link, #rest))
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use quote::ToTokens;
    use syn::{File, ImplItem, Item};

    use super::*;

    fn expand(input: TokenStream) -> File {
        let output = entrypoint(&TokenStream::new(), &input);
        syn::parse2::<File>(output).expect("expansion must be valid Rust")
    }

    fn expand_err(attr: TokenStream, input: TokenStream) -> String {
        core(&attr, &input)
            .expect_err("expansion must be rejected")
            .to_string()
    }

    fn impls_of(file: &File, trait_name: &str) -> usize {
        file.items
            .iter()
            .filter(|item| match item {
                Item::Impl(item) => item.trait_.as_ref().is_some_and(|(_, path, _)| {
                    path.segments
                        .last()
                        .is_some_and(|segment| segment.ident == trait_name)
                }),
                _ => false,
            })
            .count()
    }

    #[test]
    fn enum_is_kept_without_extends_attributes() {
        let file = expand(quote! {
            #[derive(Debug)]
            pub enum Shape {
                #[extends(dyn Area)]
                Circle(Circle),
                Square(Square),
            }
        });

        let Item::Enum(item) = &file.items[0] else {
            panic!("first item must be the enum");
        };

        assert_eq!(item.attrs.len(), 1);
        assert!(item.variants.iter().all(|v| v.attrs.is_empty()));
    }

    #[test]
    fn one_insert_impl_per_class() {
        let file = expand(quote! {
            enum Pet {
                #[extends(dyn Named)]
                #[extends(dyn Animal)]
                Cat(Cat),
                #[extends(dyn Named, dyn Loud)]
                Dog(Dog),
            }
        });

        // Cat, Dog, dyn Named, dyn Animal, dyn Loud
        assert_eq!(impls_of(&file, "Insert"), 5);
        assert_eq!(impls_of(&file, "Member"), 2);
        assert_eq!(impls_of(&file, "Variants"), 1);
        assert_eq!(impls_of(&file, "DispatchMut"), 1);
        assert_eq!(impls_of(&file, "DispatchRef"), 1);
        assert_eq!(impls_of(&file, "Project"), 1);
    }

    #[test]
    fn handler_struct_has_slot_per_class() {
        let file = expand(quote! {
            enum Pet {
                #[extends(dyn Named)]
                Cat(Cat),
                #[extends(dyn Named)]
                Dog(Dog),
            }
        });

        let handlers = file
            .items
            .iter()
            .find_map(|item| match item {
                Item::Struct(item) if item.ident == "__PetHandlers" => Some(item),
                _ => None,
            })
            .expect("handler struct must be generated");

        assert_eq!(handlers.fields.len(), 3);
        assert_eq!(handlers.generics.params.len(), 3);
    }

    #[test]
    fn tied_generation_is_nested_in_both() {
        let file = expand(quote! {
            enum Animal {
                #[extends(dyn Swims, dyn Walks)]
                Frog(Frog),
            }
        });

        let dispatch = file
            .items
            .iter()
            .find_map(|item| match item {
                Item::Impl(item) if item.to_token_stream().to_string().contains("DispatchMut") => {
                    Some(item)
                }
                _ => None,
            })
            .expect("dispatch impl must be generated");

        let where_clause = dispatch
            .generics
            .where_clause
            .as_ref()
            .expect("dispatch impl must have bounds")
            .to_token_stream()
            .to_string();

        assert!(where_clause.contains("Both"));
        assert!(where_clause.contains("'static"));
        assert!(matches!(dispatch.items[0], ImplItem::Fn(_)));
    }

    #[test]
    fn rejects_arguments() {
        let error = expand_err(quote!(strict), quote!(enum E { A(A) }));

        assert!(error.contains("does not accept arguments"));
    }

    #[test]
    fn rejects_struct() {
        let error = expand_err(TokenStream::new(), quote!(struct S;));

        assert!(error.contains("only be applied to an enum"));
    }

    #[test]
    fn rejects_generic_enum() {
        let error = expand_err(TokenStream::new(), quote!(enum E<T> { A(T) }));

        assert!(error.contains("generic"));
    }

    #[test]
    fn rejects_empty_enum() {
        let error = expand_err(TokenStream::new(), quote!(enum E {}));

        assert!(error.contains("at least one variant"));
    }

    #[test]
    fn rejects_unit_and_struct_variants() {
        let error = expand_err(TokenStream::new(), quote!(enum E { A, B { x: u8 } }));

        assert!(error.contains("exactly one unnamed field"));
    }

    #[test]
    fn rejects_duplicate_candidate() {
        let error = expand_err(TokenStream::new(), quote!(enum E { A(u8), B(u8) }));

        assert!(error.contains("already a candidate"));
    }

    #[test]
    fn rejects_duplicate_ancestor() {
        let error = expand_err(
            TokenStream::new(),
            quote! {
                enum E {
                    #[extends(dyn Tr)]
                    #[extends(dyn Tr + 'static)]
                    A(A),
                }
            },
        );

        assert!(error.contains("already part of the hierarchy"));
    }

    #[test]
    fn rejects_non_static_trait_object_ancestor() {
        let error = expand_err(
            TokenStream::new(),
            quote! {
                enum E {
                    #[extends(dyn Tr + 'a)]
                    A(A),
                }
            },
        );

        assert!(error.contains("must be `'static`"));
    }

    #[test]
    fn rejects_candidate_as_own_ancestor() {
        let error = expand_err(
            TokenStream::new(),
            quote! {
                enum E {
                    #[extends(A)]
                    A(A),
                }
            },
        );

        assert!(error.contains("already part of the hierarchy"));
    }

    #[test]
    fn compile_error_is_emitted_for_invalid_input() {
        let output = entrypoint(&TokenStream::new(), &quote!(struct S;)).to_string();

        assert!(output.contains("compile_error"));
    }
}
