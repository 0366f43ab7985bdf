use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Expr, GenericArgument, Ident, PathArguments, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    token,
};

/// A single `name: Type = default` or `name: Type (Partial = default)` entry.
struct ConfigField {
    attrs: Vec<Attribute>,
    name: Ident,
    ty: Type,
    default_value: Expr,
    partial_ty: Option<Type>,
}

impl Parse for ConfigField {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;

        // Nested config sections carry their own partial type:
        // field: Type (PartialType = DefaultValue)
        let (partial_ty, default_value) = if input.peek(token::Paren) {
            let content;
            syn::parenthesized!(content in input);
            let partial_ty: Type = content.parse()?;
            content.parse::<Token![=]>()?;
            (Some(partial_ty), content.parse()?)
        } else {
            input.parse::<Token![=]>()?;
            (None, input.parse()?)
        };

        Ok(ConfigField {
            attrs,
            name,
            ty,
            default_value,
            partial_ty,
        })
    }
}

struct ConfigInput {
    attrs: Vec<Attribute>,
    vis: Visibility,
    name: Ident,
    fields: Punctuated<ConfigField, Token![,]>,
}

impl Parse for ConfigInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;
        let content;
        syn::braced!(content in input);
        let fields = content.parse_terminated(ConfigField::parse, Token![,])?;
        Ok(ConfigInput {
            attrs,
            vis,
            name,
            fields,
        })
    }
}

impl ConfigField {
    /// The field type inside the partial struct. Fields that are already
    /// optional are not wrapped a second time.
    fn partial_type(&self) -> proc_macro2::TokenStream {
        let ty = &self.ty;
        match &self.partial_ty {
            Some(partial) => quote! { #partial },
            None if is_option(ty) => quote! { #ty },
            None => quote! { Option<#ty> },
        }
    }

    fn declaration(&self) -> proc_macro2::TokenStream {
        let ConfigField {
            attrs, name, ty, ..
        } = self;
        quote! { #( #attrs )* #name: #ty }
    }

    fn partial_declaration(&self) -> proc_macro2::TokenStream {
        let name = &self.name;
        let partial_ty = self.partial_type();
        quote! {
            #[serde(default)]
            #name: #partial_ty
        }
    }

    fn default_init(&self) -> proc_macro2::TokenStream {
        let ConfigField {
            name,
            default_value,
            ..
        } = self;
        quote! { #name: #default_value }
    }

    fn partial_init(&self) -> proc_macro2::TokenStream {
        let ConfigField {
            name,
            default_value,
            ..
        } = self;
        quote! { #name: partial.#name.into_or(#default_value) }
    }

    /// `with_*` builder, `set_*` setter and `get_*` getter.
    fn accessors(&self) -> proc_macro2::TokenStream {
        let ConfigField { name, ty, .. } = self;
        let with = format_ident!("with_{}", name);
        let set = format_ident!("set_{}", name);
        let get = format_ident!("get_{}", name);

        quote! {
            pub fn #with(mut self, value: #ty) -> Self {
                self.#name = value;
                self
            }

            pub fn #set(&mut self, value: #ty) {
                self.#name = value;
            }

            pub fn #get(&self) -> &#ty {
                &self.#name
            }
        }
    }
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path.segments.last().is_some_and(|segment| {
        segment.ident == "Option"
            && matches!(
                &segment.arguments,
                PathArguments::AngleBracketed(args)
                    if args.args.len() == 1 && matches!(args.args[0], GenericArgument::Type(_))
            )
    })
}

/// Declares a configuration struct together with a `Partial*` twin whose
/// fields are all optional, so TOML files only need to name the settings they
/// change.
///
/// ```ignore
/// config! {
///     pub struct SessionConfig {
///         show_trace: bool = true,
///         logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
///     }
/// }
/// ```
#[proc_macro]
pub fn config(input: TokenStream) -> TokenStream {
    let ConfigInput {
        attrs,
        vis,
        name,
        fields,
    } = parse_macro_input!(input as ConfigInput);
    let partial_name = format_ident!("Partial{}", name);

    let declarations = fields.iter().map(ConfigField::declaration);
    let partial_declarations = fields.iter().map(ConfigField::partial_declaration);
    let partial_inits = fields.iter().map(ConfigField::partial_init);
    let default_inits = fields.iter().map(ConfigField::default_init);
    let accessors = fields.iter().map(ConfigField::accessors);

    quote! {
        #( #attrs )*
        #[derive(Debug, Clone, serde::Serialize)]
        #vis struct #name {
            #( #declarations, )*
        }

        #[derive(Debug, Clone, serde::Deserialize)]
        #vis struct #partial_name {
            #( #partial_declarations, )*
        }

        impl #name {
            pub fn from_partial(partial: #partial_name) -> Self {
                use crate::config::IntoOr;
                #name {
                    #( #partial_inits, )*
                }
            }

            pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
                let partial: #partial_name = toml::from_str(content)?;
                Ok(Self::from_partial(partial))
            }

            pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
                let content = std::fs::read_to_string(std::fs::canonicalize(path)?)?;
                Self::from_toml_str(&content)
            }

            /// Falls back to the defaults when no file is given.
            pub fn from_optional_file<P: AsRef<std::path::Path>>(
                path: Option<P>,
            ) -> anyhow::Result<Self> {
                path.map_or_else(|| Ok(Self::default()), Self::from_file)
            }

            #( #accessors )*
        }

        impl Default for #name {
            fn default() -> Self {
                #name {
                    #( #default_inits, )*
                }
            }
        }

        impl crate::config::IntoOr<#name> for Option<#partial_name> {
            fn into_or(self, or: #name) -> #name {
                self.map_or(or, #name::from_partial)
            }
        }
    }
    .into()
}
