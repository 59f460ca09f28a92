use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, ItemFn, PatType, Type};

fn is_f64(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path.path.is_ident("f64"),
        _ => false,
    }
}

fn is_f64_slice(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => match &*reference.elem {
            Type::Slice(slice) => is_f64(&slice.elem),
            _ => false,
        },
        _ => false,
    }
}

/// Turns a plain numeric function into one the expression engine can call.
///
/// `fn hypot(a: f64, b: f64) -> f64` becomes `fn hypot(args: &[f64]) -> f64`
/// plus `const HYPOT_ARITY: Arity = Arity::Fixed(2)`. Missing positional
/// arguments read as NaN.
///
/// A function that already takes `&[f64]` is kept as is and gets
/// `Arity::Variadic`.
///
/// The generated constant names `Arity` unqualified; bring it into scope.
#[proc_macro_attribute]
pub fn expr_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    match expand(input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: ItemFn) -> syn::Result<TokenStream2> {
    let attrs = &input.attrs;
    let vis = &input.vis;
    let fn_name = &input.sig.ident;
    let fn_args = &input.sig.inputs;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;
    let arity_const = format_ident!("{}_ARITY", fn_name.to_string().to_uppercase());

    let typed_args: Vec<&PatType> = fn_args
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .collect();

    if typed_args.len() != fn_args.len() {
        return Err(syn::Error::new_spanned(
            fn_args,
            "expr_fn cannot be used on methods",
        ));
    }

    if let [only] = typed_args.as_slice() {
        if is_f64_slice(&only.ty) {
            return Ok(quote! {
                #input

                #[allow(dead_code)]
                #vis const #arity_const: Arity = Arity::Variadic;
            });
        }
    }

    let arg_extractions = typed_args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            if !is_f64(&arg.ty) {
                return Err(syn::Error::new_spanned(
                    &arg.ty,
                    format!(
                        "argument {} of {} must be f64, or the only argument must be &[f64]",
                        i, fn_name
                    ),
                ));
            }
            let pat = &arg.pat;
            Ok(quote! {
                let #pat: f64 = args.get(#i).copied().unwrap_or(f64::NAN);
            })
        })
        .collect::<syn::Result<Vec<TokenStream2>>>()?;

    let args_len = arg_extractions.len();
    let args_ident = if args_len == 0 {
        format_ident!("_args")
    } else {
        format_ident!("args")
    };

    Ok(quote! {
        #(#attrs)*
        #vis fn #fn_name(#args_ident: &[f64]) #fn_output {
            #(#arg_extractions)*

            #fn_body
        }

        #[allow(dead_code)]
        #vis const #arity_const: Arity = Arity::Fixed(#args_len);
    })
}
