use quote::quote;
use syn::{Path, Type};

/// Parsing expression for one CLI value. `raw` and `name` are in scope at the
/// expansion site.
pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    match parse_with {
        Some(parse_with) => quote! { #parse_with(&raw)? },
        None => quote! {
            raw.trim().parse::<#ty>().map_err(|e| crate::Error::invalid_input(format!(
                "Invalid value for --{name}: {raw} ({e})"
            )))?
        },
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{build_cli_parse_expr, to_kebab_case};

    #[test]
    fn to_kebab_case_inserts_dashes_before_ascii_uppercase() {
        assert_eq!(to_kebab_case("ParallelRecursive"), "parallel-recursive");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
        assert_eq!(to_kebab_case("X"), "x");
    }

    #[test]
    fn parse_expr_uses_custom_parser_when_given() {
        let ty: syn::Type = parse_quote!(Vec<usize>);
        let path: syn::Path = parse_quote!(parse_worker_counts);
        let expr = build_cli_parse_expr(&ty, Some(&path)).to_string();
        assert!(expr.contains("parse_worker_counts"));
        assert!(!expr.contains("parse ::"));
    }

    #[test]
    fn parse_expr_falls_back_to_from_str() {
        let ty: syn::Type = parse_quote!(usize);
        let expr = build_cli_parse_expr(&ty, None).to_string();
        assert!(expr.contains("parse :: < usize >"));
        assert!(expr.contains("invalid_input"));
    }
}
