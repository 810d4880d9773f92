//! Parsing of `#[endpoints]` arguments and method attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Expr, ExprArray, ExprLit, Lit, LitStr, Meta, Path, Token, Type,
};

/// Arguments of `#[endpoints(...)]`.
#[derive(Debug)]
pub struct EndpointsArgs {
    /// Route root every method template is joined onto.
    pub route: String,
    /// Whether the type maps extra routes itself.
    pub register: bool,
    /// Path of the server crate in generated code.
    pub crate_path: Path,
}

fn string_value(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        _ => Err(syn::Error::new(expr.span(), "expected string literal")),
    }
}

impl Parse for EndpointsArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut route = String::new();
        let mut register = false;
        let mut crate_path: Path = syn::parse_quote!(::genesis_server);

        let metas: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;
        for meta in metas {
            match &meta {
                Meta::Path(path) if path.is_ident("register") => register = true,
                Meta::NameValue(nv) if nv.path.is_ident("route") => route = string_value(&nv.value)?,
                Meta::NameValue(nv) if nv.path.is_ident("crate") => {
                    crate_path = syn::parse_str(&string_value(&nv.value)?)
                        .map_err(|e| syn::Error::new(nv.value.span(), e))?;
                }
                _ => {
                    return Err(syn::Error::new(
                        meta.span(),
                        "expected `route = \"...\"`, `crate = \"...\"` or `register`",
                    ))
                }
            }
        }

        Ok(Self {
            route,
            register,
            crate_path,
        })
    }
}

/// One routing attribute on a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttr {
    /// Verb literals, as written.
    pub verbs: Vec<String>,
    /// Method template.
    pub template: String,
}

/// Routing and validation attributes of one method.
#[derive(Debug, Default)]
pub struct MethodAttrs {
    /// Routes in declaration order.
    pub routes: Vec<RouteAttr>,
    /// Types to validate, in declaration order.
    pub validate: Vec<Type>,
}

const VERB_ATTRS: [(&str, &str); 5] = [
    ("get", "GET"),
    ("post", "POST"),
    ("put", "PUT"),
    ("patch", "PATCH"),
    ("delete", "DELETE"),
];

/// Whether the attribute is consumed by `#[endpoints]`.
pub fn is_endpoint_attr(attr: &Attribute) -> bool {
    let path = attr.path();
    path.is_ident("http")
        || path.is_ident("validate")
        || VERB_ATTRS.iter().any(|(name, _)| path.is_ident(name))
}

/// `#[get]` without a template maps the route root itself.
fn verb_template(attr: &Attribute) -> syn::Result<String> {
    match &attr.meta {
        Meta::Path(_) => Ok(String::new()),
        Meta::List(_) => Ok(attr.parse_args::<LitStr>()?.value()),
        Meta::NameValue(nv) => Err(syn::Error::new(nv.span(), "expected `#[verb(\"template\")]`")),
    }
}

fn parse_http(attr: &Attribute) -> syn::Result<RouteAttr> {
    let mut verbs = None;
    let mut template = String::new();

    let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
    for meta in metas {
        match &meta {
            Meta::NameValue(nv) if nv.path.is_ident("methods") => {
                let Expr::Array(ExprArray { elems, .. }) = &nv.value else {
                    return Err(syn::Error::new(nv.value.span(), "expected an array of verbs"));
                };
                verbs = Some(elems.iter().map(string_value).collect::<syn::Result<Vec<_>>>()?);
            }
            Meta::NameValue(nv) if nv.path.is_ident("path") => template = string_value(&nv.value)?,
            _ => {
                return Err(syn::Error::new(
                    meta.span(),
                    "expected `methods = [..]` or `path = \"...\"`",
                ))
            }
        }
    }

    let verbs = verbs.ok_or_else(|| syn::Error::new(attr.span(), "missing `methods = [..]`"))?;
    Ok(RouteAttr { verbs, template })
}

impl MethodAttrs {
    /// Collects the endpoint attributes among `attrs`.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            let path = attr.path();
            if path.is_ident("validate") {
                let types = attr.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;
                if types.is_empty() {
                    return Err(syn::Error::new(attr.span(), "expected at least one type"));
                }
                parsed.validate.extend(types);
            } else if path.is_ident("http") {
                parsed.routes.push(parse_http(attr)?);
            } else if let Some((_, verb)) = VERB_ATTRS.iter().find(|(name, _)| path.is_ident(name)) {
                parsed.routes.push(RouteAttr {
                    verbs: vec![(*verb).to_string()],
                    template: verb_template(attr)?,
                });
            }
        }
        Ok(parsed)
    }

    /// Whether the method is mapped at all.
    pub fn is_routed(&self) -> bool {
        !self.routes.is_empty()
    }
}

/// Error for attributes that need a routed method.
pub fn validate_without_route(span: Span) -> syn::Error {
    syn::Error::new(span, "`#[validate]` needs a routing attribute on the same method")
}
