mod decorator;

use proc_macro::{self, TokenStream};
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(ToBytesMut, attributes(size))]
pub fn derive_to_bytes(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let s = match &ast.data {
        syn::Data::Struct(ref s) => decorator::generate_to_bytes(s, name),
        _ => panic!("Only structs are supported"),
    };
    s.into()
}

#[proc_macro_derive(FromBuf, attributes(size))]
pub fn derive_from_buf(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let s = match &ast.data {
        syn::Data::Struct(ref s) => decorator::generate_from_buf(s, name),
        _ => panic!("Only structs are supported"),
    };
    s.into()
}

/// Wire struct: fields are encoded in declaration order, big endian.
#[proc_macro_attribute]
pub fn raw_packet(_attrs: TokenStream, code: TokenStream) -> TokenStream {
    let input = parse_macro_input!(code as DeriveInput);
    let s = quote! {
        #[derive(::ospf_macros::ToBytesMut, ::ospf_macros::FromBuf, Clone, Debug, PartialEq, Eq)]
        #input
    };
    s.into()
}
