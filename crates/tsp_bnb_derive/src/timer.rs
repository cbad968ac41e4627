use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, ReturnType, parse_macro_input, spanned::Spanned};

pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let func = parse_macro_input!(item as ItemFn);
    match expand(attr.into(), func) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(attr: proc_macro2::TokenStream, func: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let label = if attr.is_empty() {
        func.sig.ident.to_string()
    } else {
        syn::parse2::<LitStr>(attr)?.value()
    };

    if func.sig.asyncness.is_some() {
        return Err(syn::Error::new(
            func.sig.span(),
            "timer does not support async functions",
        ));
    }

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = func;
    let output = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };
    let label_lit = LitStr::new(&label, sig.ident.span());

    Ok(quote! {
        #(#attrs)*
        #vis #sig {
            let __timer_start = std::time::Instant::now();
            #[allow(clippy::redundant_closure_call)]
            let __timer_result = (|| -> #output #block)();
            log::debug!(
                "{}: elapsed={:.3}ms",
                #label_lit,
                __timer_start.elapsed().as_secs_f64() * 1_000.0
            );
            __timer_result
        }
    })
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::{ItemFn, parse_quote};

    use super::expand;

    #[test]
    fn explicit_label_is_logged_and_signature_kept() {
        let func: ItemFn = parse_quote! {
            pub fn solve_matrix(n: usize) -> crate::Result<f64> { Ok(n as f64) }
        };
        let out = expand(quote!("solver"), func).expect("expand").to_string();
        assert!(out.contains("pub fn solve_matrix (n : usize) -> crate :: Result < f64 >"));
        assert!(out.contains("\"solver\""));
        assert!(out.contains("|| -> crate :: Result < f64 >"));
        assert!(out.contains("log :: debug !"));
    }

    #[test]
    fn label_defaults_to_function_name() {
        let func: ItemFn = parse_quote! { fn warm_up() {} };
        let out = expand(quote!(), func).expect("expand").to_string();
        assert!(out.contains("\"warm_up\""));
        assert!(out.contains("|| -> ()"));
    }

    #[test]
    fn async_functions_are_rejected() {
        let func: ItemFn = parse_quote! { async fn fetch() {} };
        let err = expand(quote!(), func).expect_err("async");
        assert!(err.to_string().contains("async"));
    }

    #[test]
    fn non_string_label_is_rejected() {
        let func: ItemFn = parse_quote! { fn run() {} };
        assert!(expand(quote!(42), func).is_err());
    }
}
