//! Derive macros for Stellar Burger action enums
//!
//! Every slice action is either an *intent* (something a caller asks for,
//! such as `FetchFeed`) or an *outcome* (the settlement of a request, such
//! as `FeedFetched`). Marking variants lets logging and tests tell the two
//! apart without hand-written matches.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates classification helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use stellar_burger_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum FeedAction {
//!     #[intent]
//!     FetchFeed,
//!
//!     #[outcome]
//!     FeedFetched(Result<FeedPage, String>),
//! }
//!
//! assert!(FeedAction::FetchFeed.is_intent());
//! assert_eq!(FeedAction::FetchFeed.name(), "FetchFeed");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Variant, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_intent()` - Returns true if this variant is marked `#[intent]`
/// - `is_outcome()` - Returns true if this variant is marked `#[outcome]`
/// - `name()` - Returns the variant name, for logs
///
/// # Attributes
///
/// - `#[intent]` - Mark a variant as a caller intent
/// - `#[outcome]` - Mark a variant as a request settlement
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[intent]` and `#[outcome]` attributes
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum OrderAction {
///     #[intent]
///     SubmitOrder { ingredient_ids: Vec<String> },
///
///     #[outcome]
///     OrderSubmitted(Result<OrderConfirmation, String>),
///
///     #[intent]
///     ClearOrder,
/// }
///
/// assert!(OrderAction::ClearOrder.is_intent());
/// assert!(!OrderAction::ClearOrder.is_outcome());
/// ```
#[proc_macro_derive(Action, attributes(intent, outcome))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut intent_arms = Vec::new();
    let mut outcome_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_intent = has_attribute(&variant.attrs, "intent");
        let is_outcome = has_attribute(&variant.attrs, "outcome");

        if is_intent && is_outcome {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[intent] and #[outcome]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(variant);
        if is_intent {
            intent_arms.push(quote! { #pattern => true, });
        }
        if is_outcome {
            outcome_arms.push(quote! { #pattern => true, });
        }

        let variant_name = variant.ident.to_string();
        name_arms.push(quote! { #pattern => #variant_name, });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns true if this action is a caller intent
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#intent_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action settles a request
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_outcome(&self) -> bool {
                match self {
                    #(#outcome_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern that ignores the variant's fields
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
