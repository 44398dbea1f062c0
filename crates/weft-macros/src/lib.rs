//! # Weft Macros
//!
//! Procedural macros for the weft interception framework.
//!
//! Libraries of this kind usually lean on a host runtime that fabricates
//! proxy objects at run time. Rust has no such facility, so the
//! `#[weavable]` attribute generates the equivalent machinery at compile
//! time: a table of operation identifiers and a delegating proxy type that
//! routes every trait method through the weft dispatch protocol.

use proc_macro::TokenStream;
use quote::{format_ident, quote, ToTokens};
use syn::spanned::Spanned;
use syn::{parse_macro_input, FnArg, Ident, ItemTrait, Pat, TraitItem, TraitItemFn};

/// Make a trait weavable.
///
/// Applied to a trait `Foo`, this emits, alongside the unchanged trait:
///
/// - a module `foo_ops` with one `pub fn` per trait method returning that
///   method's [`OperationId`](weft_core::OperationId), used to register
///   advice and baked into the proxy's dispatch calls so registration-time
///   and call-time identifiers always match;
/// - a proxy type `FooProxy<T: Foo>` implementing `Foo` by running the
///   dispatch protocol around a stored target, plus the
///   [`Weavable`](weft_core::Weavable) impl the weaver constructs it
///   through.
///
/// Requirements on the trait: no generics, every method takes `&self`, has
/// no generic parameters, and returns `weft_core::Result<R>` where
/// `R: Default` (the `Default` value is what an around-advised call yields
/// in place of the original's result).
///
/// # Example
///
/// ```rust,ignore
/// use weft_macros::weavable;
///
/// #[weavable]
/// pub trait Greeting {
///     fn greet(&self, name: &str) -> weft_core::Result<String>;
/// }
///
/// // Register advice with the generated identifiers...
/// let aspect = AspectBuilder::new()
///     .with_targets(["Greeting"])
///     .with_before_advice_for(advice, [greeting_ops::greet()])
///     .build();
///
/// // ...and weave the generated proxy type.
/// let proxy: GreetingProxy<SimpleGreeting> = Weaver::new(aspect).weave(target)?;
/// ```
#[proc_macro_attribute]
pub fn weavable(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::TokenStream::from(attr).span(),
            "#[weavable] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as ItemTrait);
    match expand_weavable(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_weavable(input: &ItemTrait) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "#[weavable] does not support generic traits",
        ));
    }

    let vis = &input.vis;
    let trait_ident = &input.ident;
    let interface = trait_ident.to_string();
    let ops_mod = format_ident!("{}_ops", snake_case(&interface));
    let proxy_ident = format_ident!("{}Proxy", trait_ident);

    let mut op_fns = Vec::new();
    let mut op_names = Vec::new();
    let mut proxy_methods = Vec::new();

    for item in &input.items {
        let method = match item {
            TraitItem::Fn(method) => method,
            _ => continue,
        };
        let (op_fn, proxy_method) =
            expand_method(method, &interface, &ops_mod)?;
        op_names.push(method.sig.ident.clone());
        op_fns.push(op_fn);
        proxy_methods.push(proxy_method);
    }

    let ops_doc = format!("Operation identifiers for the `{interface}` interface.");
    let proxy_doc = format!(
        "Intercepting proxy for [`{interface}`]: implements the trait by routing \
         every call through the weft dispatch protocol before delegating to the \
         wrapped target."
    );

    Ok(quote! {
        #input

        #[doc = #ops_doc]
        #vis mod #ops_mod {
            #(#op_fns)*
        }

        #[doc = #proxy_doc]
        #vis struct #proxy_ident<T: #trait_ident> {
            target: T,
            dispatcher: ::weft_core::Dispatcher,
        }

        impl<T: #trait_ident> #proxy_ident<T> {
            /// Borrow the wrapped target.
            pub fn target(&self) -> &T {
                &self.target
            }

            /// Unwrap the proxy, discarding the interception layer.
            pub fn into_inner(self) -> T {
                self.target
            }
        }

        impl<T: #trait_ident> #trait_ident for #proxy_ident<T> {
            #(#proxy_methods)*
        }

        impl<T: #trait_ident> ::weft_core::Weavable for #proxy_ident<T> {
            type Target = T;

            fn interface() -> &'static str {
                #interface
            }

            fn operations() -> ::std::vec::Vec<::weft_core::OperationId> {
                ::std::vec![#(#ops_mod::#op_names()),*]
            }

            fn assemble(target: T, dispatcher: ::weft_core::Dispatcher) -> Self {
                Self { target, dispatcher }
            }
        }
    })
}

/// Expand one trait method into its operation-id function and its proxy
/// delegation impl.
fn expand_method(
    method: &TraitItemFn,
    interface: &str,
    ops_mod: &Ident,
) -> syn::Result<(proc_macro2::TokenStream, proc_macro2::TokenStream)> {
    let sig = &method.sig;
    let name = &sig.ident;

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            sig.generics.span(),
            "#[weavable] does not support generic methods",
        ));
    }
    if sig.asyncness.is_some() {
        return Err(syn::Error::new(
            sig.span(),
            "#[weavable] methods must be synchronous",
        ));
    }
    match sig.receiver() {
        Some(recv) if recv.reference.is_some() && recv.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new(
                sig.span(),
                "#[weavable] methods must take `&self`",
            ));
        }
    }

    let mut arg_idents = Vec::new();
    let mut arg_types = Vec::new();
    for arg in &sig.inputs {
        if let FnArg::Typed(typed) = arg {
            let ident = match typed.pat.as_ref() {
                Pat::Ident(pat) => pat.ident.clone(),
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "#[weavable] method parameters must be plain identifiers",
                    ));
                }
            };
            arg_idents.push(ident);
            arg_types.push(type_token_string(typed.ty.as_ref()));
        }
    }

    let signature = format!("{}({})", name, arg_types.join(","));
    let op_doc = format!("Identifier for `{interface}::{signature}`.");

    let op_fn = quote! {
        #[doc = #op_doc]
        pub fn #name() -> ::weft_core::OperationId {
            ::weft_core::OperationId::new(#interface, #signature)
        }
    };

    let proxy_method = quote! {
        #sig {
            self.dispatcher
                .dispatch(&#ops_mod::#name(), || self.target.#name(#(#arg_idents),*))
        }
    };

    Ok((op_fn, proxy_method))
}

/// Whitespace-normalized token rendering of a type, so signatures compare
/// stably regardless of formatting (`& str` -> `&str`).
fn type_token_string(ty: &syn::Type) -> String {
    ty.to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
