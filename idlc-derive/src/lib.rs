mod from_repr;
mod rank;

use proc_macro::TokenStream;

#[proc_macro_derive(FromRepr)]
pub fn derive_from_repr(input: TokenStream) -> TokenStream {
	from_repr::derive(input).into()
}

#[proc_macro_derive(Rank)]
pub fn derive_rank(input: TokenStream) -> TokenStream {
	rank::derive(input).into()
}
