use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

/// Spellings accepted for one unit variant on the command line.
struct VariantSpelling {
    canonical: String,
    aliases: Vec<String>,
}

impl VariantSpelling {
    fn from_attrs(ident: &syn::Ident, attrs: &[Attribute]) -> syn::Result<Self> {
        let mut spelling = Self {
            canonical: utils::to_kebab_case(&ident.to_string()),
            aliases: Vec::new(),
        };
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("cli")) {
            attr.parse_nested_meta(|meta| {
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    spelling.canonical = lit.value();
                } else if meta.path.is_ident("alias") {
                    spelling.aliases.push(lit.value());
                } else {
                    return Err(meta.error("unsupported cli attribute; expected name/alias"));
                }
                Ok(())
            })?;
        }
        Ok(spelling)
    }

    fn literals(&self) -> Vec<LitStr> {
        std::iter::once(&self.canonical)
            .chain(self.aliases.iter())
            .map(|v| LitStr::new(v, Span::call_site()))
            .collect()
    }
}

fn option_name(input: &DeriveInput) -> syn::Result<String> {
    let mut option = utils::to_kebab_case(&input.ident.to_string());
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                option = lit.value();
                return Ok(());
            }
            Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
        })?;
    }
    Ok(option)
}

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_ident = &input.ident;
    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "CliValue can only be derived for enums",
        ));
    };
    let option_lit = LitStr::new(&option_name(input)?, Span::call_site());

    let mut parse_arms = Vec::new();
    let mut display_arms = Vec::new();
    let mut canonical_values = Vec::new();

    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "CliValue only supports enums with unit variants",
            ));
        }
        let variant_ident = &variant.ident;
        let spelling = VariantSpelling::from_attrs(variant_ident, &variant.attrs)?;
        let tokens = spelling.literals();
        let canonical_lit = LitStr::new(&spelling.canonical, Span::call_site());

        parse_arms.push(quote! { #(#tokens)|* => Ok(Self::#variant_ident), });
        display_arms.push(quote! { Self::#variant_ident => #canonical_lit, });
        canonical_values.push(canonical_lit);
    }

    let expected_lit = LitStr::new(
        &canonical_values
            .iter()
            .map(LitStr::value)
            .collect::<Vec<_>>()
            .join("|"),
        Span::call_site(),
    );

    Ok(quote! {
        impl #enum_ident {
            /// Canonical command-line spellings, in declaration order.
            pub const VALUES: &'static [&'static str] = &[#(#canonical_values),*];

            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit,
                        raw,
                        #expected_lit
                    ))),
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(#display_arms)*
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    })
}
