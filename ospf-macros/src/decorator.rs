use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, Field, Fields, Ident};

fn named_fields(s: &DataStruct) -> impl Iterator<Item = &Field> {
    match &s.fields {
        Fields::Named(fields) => fields.named.iter(),
        _ => panic!("Only named fields are supported"),
    }
}

/// `#[size(count)]` names an earlier field holding the element count of a `Vec` field.
fn size_field(field: &Field) -> Option<Ident> {
    field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("size"))
        .map(|attr| {
            attr.parse_args::<Ident>()
                .expect("#[size(...)] expects the name of a count field")
        })
}

pub fn generate_to_bytes(s: &DataStruct, name: &Ident) -> TokenStream {
    let fields = named_fields(s).map(|f| {
        let ident = &f.ident;
        quote! { ::ospf_packet::ToBytesMut::put_bytes(&self.#ident, buf); }
    });
    quote! {
        impl ::ospf_packet::ToBytesMut for #name {
            fn put_bytes(&self, buf: &mut ::bytes::BytesMut) {
                #(#fields)*
            }
        }
    }
}

pub fn generate_from_buf(s: &DataStruct, name: &Ident) -> TokenStream {
    let reads = named_fields(s).map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        match size_field(f) {
            Some(count) => quote! {
                let #ident = <#ty as ::ospf_packet::FromBufSized>::from_buf_sized(buf, #count as usize)?;
            },
            None => quote! {
                let #ident = <#ty as ::ospf_packet::FromBuf>::from_buf(buf)?;
            },
        }
    });
    let idents = named_fields(s).map(|f| &f.ident);
    quote! {
        impl ::ospf_packet::FromBuf for #name {
            fn from_buf(
                buf: &mut impl ::bytes::Buf,
            ) -> ::std::result::Result<Self, ::ospf_packet::DecodeError> {
                #(#reads)*
                ::std::result::Result::Ok(Self { #(#idents),* })
            }
        }
    }
}
