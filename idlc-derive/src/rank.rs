use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

pub fn derive(tokens: proc_macro::TokenStream) -> TokenStream {
	let DeriveInput {
		ident,
		generics,
		data,
		..
	} = syn::parse(tokens).unwrap();

	let data = match data {
		Data::Enum(data) => data,
		Data::Union(_) => panic!("Unions are not supported"),
		Data::Struct(_) => panic!("Structs are not supported"),
	};

	if !generics.params.is_empty() {
		panic!("Generics are not supported");
	}

	let count = data.variants.len();
	let arms = data.variants.iter().enumerate().map(|(i, variant)| {
		let variant_name = &variant.ident;
		let pattern = match &variant.fields {
			Fields::Unit => quote!(Self::#variant_name),
			Fields::Unnamed(_) => quote!(Self::#variant_name(..)),
			Fields::Named(_) => quote!(Self::#variant_name { .. }),
		};
		quote! { #pattern => #i, }
	});

	quote! {
		impl #ident {
			/// Ordinal position of the active alternative, used for type-promotion ordering.
			pub fn rank(&self) -> usize {
				match self {
					#(#arms)*
				}
			}

			pub const RANK_COUNT: usize = #count;
		}
	}
}
