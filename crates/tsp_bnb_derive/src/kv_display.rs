use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

/// How a field value is rendered after `key = `.
enum KvFormat {
    Display,
    Debug,
    Path,
}

impl KvFormat {
    fn parse(raw: &str, span: Span) -> syn::Result<Self> {
        match raw {
            "display" => Ok(Self::Display),
            "debug" => Ok(Self::Debug),
            "path" => Ok(Self::Path),
            other => Err(syn::Error::new(
                span,
                format!("unsupported kv fmt mode: {other}"),
            )),
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::Debug => "{:?}",
            Self::Display | Self::Path => "{}",
        }
    }
}

pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
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
            "KvDisplay can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new(input.span(), "KvDisplay requires named fields"));
    };

    let mut rows: Vec<(String, KvFormat)> = Vec::new();
    let mut vals = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let mut key = field_ident.to_string();
        let mut format = KvFormat::Display;
        let mut skip = false;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("kv")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    return Ok(());
                }
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    key = lit.value();
                } else if meta.path.is_ident("fmt") {
                    format = KvFormat::parse(&lit.value(), lit.span())?;
                } else {
                    return Err(meta.error("unsupported kv attribute; expected name/fmt/skip"));
                }
                Ok(())
            })?;
        }
        if skip {
            continue;
        }

        vals.push(match format {
            KvFormat::Path => quote! { self.#field_ident.display() },
            KvFormat::Display | KvFormat::Debug => quote! { &self.#field_ident },
        });
        rows.push((key, format));
    }

    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let format_string: String = rows
        .iter()
        .map(|(key, format)| format!("\n\t{key:<width$} = {}", format.placeholder()))
        .collect();
    let format_lit = LitStr::new(&format_string, Span::call_site());

    Ok(quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #format_lit, #(#vals),*)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::expand;

    #[test]
    fn keys_are_aligned_and_formats_applied() {
        let input: DeriveInput = parse_quote! {
            struct Input {
                #[kv(fmt = "path")]
                path: PathBuf,
                #[kv(fmt = "debug", name = "seed")]
                shuffle: Option<u64>,
                #[kv(skip)]
                cache: Vec<u8>,
            }
        };
        let out = expand(&input).expect("expand").to_string();
        assert!(out.contains(r#""\n\tpath = {}\n\tseed = {:?}""#));
        assert!(out.contains("self . path . display ()"));
        assert!(out.contains("& self . shuffle"));
        assert!(!out.contains("cache"));
    }

    #[test]
    fn unknown_format_mode_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Input {
                #[kv(fmt = "hex")]
                seed: u64,
            }
        };
        let err = expand(&input).expect_err("bad fmt");
        assert!(err.to_string().contains("unsupported kv fmt mode: hex"));
    }
}
