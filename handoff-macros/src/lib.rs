use proc_macro::TokenStream;
use quote::ToTokens;
use syn::parenthesized;
use syn::parse::Parse;
use syn::parse_macro_input;

use syn::Block;
use syn::FnArg;
use syn::Ident;
use syn::ReturnType;
use syn::Token;

/// Wraps a test body in `crate::loom::model` so the same test runs natively
/// and, when built with `RUSTFLAGS="--cfg loom"`, under the loom
/// permutation explorer.
#[proc_macro_attribute]
pub fn internal_test(_: TokenStream, function: TokenStream) -> TokenStream {
  let testing = parse_macro_input!(function as TestFn);

  testing.into_token_stream().into()
}

struct TestFn {
  return_type: ReturnType,
  args: Vec<FnArg>,
  ident: Ident,
  block: Block,
}

impl Parse for TestFn {
  fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
    input.parse::<Token![fn]>()?;
    let ident = input.parse::<Ident>()?;

    let _content;
    parenthesized!(_content in input);

    let mut args = Vec::new();
    loop {
      if _content.is_empty() {
        break;
      }

      args.push(_content.parse::<FnArg>()?);
    }

    let return_type = input.parse::<ReturnType>()?;

    let block = input.parse::<Block>()?;

    Ok(TestFn { return_type, args, block, ident })
  }
}

impl ToTokens for TestFn {
  fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
    let TestFn { return_type, block, ident, args } = self;

    let tokens_to_extend = quote::quote! {
        #[test]
        fn #ident(#(#args),*) #return_type {
            crate::loom::model(|| #block)
        }
    };

    tokens.extend(tokens_to_extend);
  }
}
