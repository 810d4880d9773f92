//! Expansion of `#[endpoints]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, FnArg, ImplItem, ImplItemFn, ItemImpl, Receiver, Type};

use crate::parse::{is_endpoint_attr, validate_without_route, EndpointsArgs, MethodAttrs};

struct RoutedMethod {
    method: ImplItemFn,
    attrs: MethodAttrs,
}

pub fn expand_endpoints(args: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let args: EndpointsArgs = syn::parse2(args)?;
    let mut item_impl: ItemImpl = syn::parse2(item)?;

    if let Some((_, trait_path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new(
            trait_path.span(),
            "#[endpoints] goes on an inherent impl block",
        ));
    }

    let mut routed = Vec::new();
    for item in &mut item_impl.items {
        let ImplItem::Fn(method) = item else { continue };
        let attrs = MethodAttrs::from_attrs(&method.attrs)?;
        method.attrs.retain(|attr| !is_endpoint_attr(attr));

        if !attrs.is_routed() {
            if let Some(ty) = attrs.validate.first() {
                return Err(validate_without_route(ty.span()));
            }
            continue;
        }
        routed.push(RoutedMethod {
            method: method.clone(),
            attrs,
        });
    }

    let krate = &args.crate_path;
    let root = &args.route;
    let registrations = routed
        .iter()
        .map(registration)
        .collect::<syn::Result<Vec<_>>>()?;

    let as_endpoints = args.register.then(|| {
        quote! {
            fn as_endpoints(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::option::Option<::std::sync::Arc<dyn #krate::Endpoints>> {
                ::std::option::Option::Some(self)
            }
        }
    });

    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();

    Ok(quote! {
        #item_impl

        impl #impl_generics #krate::MapAttributes for #self_ty #where_clause {
            fn route_attributes(table: &mut #krate::EndpointTable<Self>) {
                table.route_root(#root);
                #(#registrations)*
            }

            #as_endpoints
        }
    })
}

fn registration(routed: &RoutedMethod) -> syn::Result<TokenStream> {
    let sig = &routed.method.sig;
    let name = &sig.ident;
    let name_str = name.to_string();

    if let Some(generics) = sig.generics.lt_token {
        return Err(syn::Error::new(generics.span(), "endpoint methods cannot be generic"));
    }

    let mut receiver = None;
    let mut params = Vec::new();
    let mut types: Vec<&Type> = Vec::new();
    for input in &sig.inputs {
        match input {
            FnArg::Receiver(r) => receiver = Some(r),
            FnArg::Typed(typed) => {
                params.push(format_ident!("__arg{}", params.len()));
                types.push(&typed.ty);
            }
        }
    }

    let routes = routed.attrs.routes.iter().map(|route| {
        let verbs = &route.verbs;
        let template = &route.template;
        quote! { .route(&[#(#verbs),*], #template) }
    });
    let validators = routed.attrs.validate.iter().map(|ty| quote! { .validate::<#ty>() });
    let await_call = sig.asyncness.map(|_| quote! { .await });

    let binding = match receiver {
        None => quote! {
            .bind_static(|#(#params: #types),*| async move {
                Self::#name(#(#params),*) #await_call
            })
        },
        Some(r) if is_shared_ref(r) => quote! {
            .bind(|this: ::std::sync::Arc<Self>| {
                move |#(#params: #types),*| {
                    let this = ::std::sync::Arc::clone(&this);
                    async move { this.#name(#(#params),*) #await_call }
                }
            })
        },
        Some(r) => {
            return Err(syn::Error::new(
                r.span(),
                "endpoint methods take `&self` or no receiver",
            ))
        }
    };

    Ok(quote! {
        table
            .method(#name_str)
            #(#routes)*
            #(#validators)*
            #binding;
    })
}

fn is_shared_ref(receiver: &Receiver) -> bool {
    receiver.reference.is_some() && receiver.mutability.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn expand(args: TokenStream, item: TokenStream) -> String {
        expand_endpoints(args, item).unwrap().to_string()
    }

    #[test]
    fn test_strips_route_attributes() {
        let out = expand(
            quote!(route = "api"),
            quote! {
                impl Sample {
                    #[get("echo")]
                    #[validate(Message)]
                    #[inline]
                    pub fn echo(Query(m): Query<Message>) -> String { m.message }
                }
            },
        );
        assert!(!out.contains("# [get"));
        assert!(!out.contains("# [validate"));
        assert!(out.contains("# [inline]"));
        assert!(out.contains("route_root (\"api\")"));
        assert!(out.contains(". validate :: < Message > ()"));
        assert!(out.contains("bind_static"));
    }

    #[test]
    fn test_instance_method_binds_arc() {
        let out = expand(
            quote!(route = "api", register),
            quote! {
                impl Sample {
                    #[http(methods = ["GET", "DELETE"], path = "greet")]
                    pub async fn greet(&self, q: Query<Person>) -> String { self.hello(&q.name) }
                }
            },
        );
        assert!(out.contains(". bind ("));
        assert!(out.contains("Arc < Self >"));
        assert!(out.contains(". await"));
        assert!(out.contains("fn as_endpoints"));
        assert!(out.contains("\"GET\" , \"DELETE\""));
    }

    #[test]
    fn test_unrouted_methods_are_left_alone() {
        let out = expand(
            quote!(),
            quote! {
                impl Sample {
                    fn helper(&mut self) {}
                }
            },
        );
        assert!(!out.contains(". method"));
        assert!(!out.contains("as_endpoints"));
    }

    #[test]
    fn test_rejections() {
        let mutable = expand_endpoints(
            quote!(),
            quote! { impl S { #[get("x")] fn x(&mut self) {} } },
        );
        assert!(mutable.is_err());

        let orphan_validate = expand_endpoints(
            quote!(),
            quote! { impl S { #[validate(A)] fn x() {} } },
        );
        assert!(orphan_validate.is_err());

        let trait_impl = expand_endpoints(quote!(), quote! { impl Clone for S {} });
        assert!(trait_impl.is_err());

        let generic = expand_endpoints(
            quote!(),
            quote! { impl S { #[get("x")] fn x<T>() {} } },
        );
        assert!(generic.is_err());
    }
}
