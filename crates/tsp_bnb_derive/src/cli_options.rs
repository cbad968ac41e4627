use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

/// `#[cli(long = "...", parse_with = "...")]` on one struct field.
#[derive(Default)]
struct FieldCli {
    long: Option<String>,
    parse_with: Option<Path>,
}

impl FieldCli {
    fn from_field(field: &Field) -> syn::Result<Self> {
        let mut cli = Self::default();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("cli")) {
            attr.parse_nested_meta(|meta| {
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("long") {
                    cli.long = Some(lit.value());
                } else if meta.path.is_ident("parse_with") {
                    cli.parse_with = Some(syn::parse_str(&lit.value())?);
                } else {
                    return Err(meta.error("unsupported cli attribute; expected long/parse_with"));
                }
                Ok(())
            })?;
        }
        Ok(cli)
    }
}

pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_ident = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "CliOptions can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new(
            input.span(),
            "CliOptions requires named fields",
        ));
    };

    let mut arms = Vec::new();
    let mut long_names = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let cli = FieldCli::from_field(field)?;
        let Some(long) = cli.long else {
            continue;
        };

        let long_lit = LitStr::new(&long, Span::call_site());
        let parse_expr = utils::build_cli_parse_expr(&field.ty, cli.parse_with.as_ref());
        arms.push(quote! {
            #long_lit => {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_input(format!("Missing value for --{name}"))
                })?;
                self.#field_ident = #parse_expr;
                Ok(true)
            }
        });
        long_names.push(long_lit);
    }

    Ok(quote! {
        impl #struct_ident {
            /// Long option names handled by `apply_cli_option`.
            pub const CLI_OPTIONS: &'static [&'static str] = &[#(#long_names),*];

            /// Splits `name=value` or takes the following argument as the value
            /// unless it looks like another option.
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((k, v)) = raw_name.split_once('=') {
                    return (k.to_string(), Some(v.to_string()));
                }
                let value = args.next_if(|next| !next.starts_with("--"));
                (raw_name.to_string(), value)
            }

            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::expand;

    #[test]
    fn only_fields_with_long_names_become_options() {
        let input: DeriveInput = parse_quote! {
            struct Options {
                #[cli(long = "repeat")]
                repeat: usize,
                #[cli(long = "workers", parse_with = "parse_worker_counts")]
                workers: Vec<usize>,
                scratch: bool,
            }
        };
        let out = expand(&input).expect("expand").to_string();
        assert!(out.contains("CLI_OPTIONS"));
        assert!(out.contains("[\"repeat\" , \"workers\"]"));
        assert!(out.contains("self . repeat ="));
        assert!(out.contains("parse_worker_counts"));
        assert!(!out.contains("self . scratch"));
        assert!(out.contains("Missing value for --{name}"));
    }

    #[test]
    fn unknown_cli_key_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Options {
                #[cli(short = "r")]
                repeat: usize,
            }
        };
        let err = expand(&input).expect_err("unknown key");
        assert!(err.to_string().contains("expected long/parse_with"));
    }

    #[test]
    fn tuple_structs_are_rejected() {
        let input: DeriveInput = parse_quote! { struct Options(usize); };
        assert!(expand(&input).is_err());
    }
}
