// #[derive(Model)] proc-macro implementation
//
// Binds a struct to its backing foreign object and wires the reserved
// back-reference field.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

/// Name of the reserved back-reference field.
const BACK_REFERENCE_FIELD: &str = "vm";

/// Expands #[derive(Model)].
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[derive(Model)]
/// struct Todo {
///     object: Object,
///     vm: Option<Vm>,
///     cache: Vec<String>,
/// }
///
/// // Output:
/// impl ::vbridge::Model for Todo {
///     fn from_object(object: ::vbridge::Object) -> Self {
///         Self { object, vm: Default::default(), cache: Default::default() }
///     }
///     fn object(&self) -> &::vbridge::Object { &self.object }
///     fn vm_slot(&mut self) -> Option<&mut Option<::vbridge::Vm>> { Some(&mut self.vm) }
/// }
/// ```
pub fn expand_model(input: DeriveInput) -> Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "#[derive(Model)] requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Model)] can only be applied to structs",
            ));
        }
    };

    let mut idents = fields.iter().filter_map(|f| f.ident.as_ref());
    let Some(object_field) = idents.next() else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Model)] requires the backing object as the first field",
        ));
    };
    if object_field == BACK_REFERENCE_FIELD {
        return Err(syn::Error::new_spanned(
            object_field,
            "The first field holds the backing object and cannot be the back-reference",
        ));
    }

    let rest: Vec<_> = idents.collect();
    let has_back_reference = rest.iter().any(|ident| *ident == BACK_REFERENCE_FIELD);

    let vm_slot = if has_back_reference {
        quote! {
            fn vm_slot(&mut self) -> ::std::option::Option<&mut ::std::option::Option<::vbridge::Vm>> {
                ::std::option::Option::Some(&mut self.vm)
            }
        }
    } else {
        quote! {}
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::vbridge::Model for #name #ty_generics #where_clause {
            fn from_object(object: ::vbridge::Object) -> Self {
                Self {
                    #object_field: object,
                    #(#rest: ::std::default::Default::default(),)*
                }
            }

            fn object(&self) -> &::vbridge::Object {
                &self.#object_field
            }

            #vm_slot
        }
    };

    Ok(expanded)
}
