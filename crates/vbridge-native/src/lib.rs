// vbridge-native: compile-time method tables for the vbridge method bridge
//
// Provides proc-macros that replace runtime reflection:
// - #[methods] - Builds the method registration table of an impl block
// - #[derive(Model)] - Binds a struct to its backing foreign object
//
// Example:
// ```
// use vbridge::{methods, Model, Object, Vm};
//
// #[derive(Model)]
// struct Counter {
//     object: Object,
//     vm: Option<Vm>,
// }
//
// #[methods]
// impl Counter {
//     pub fn bump(&self, vm: &Vm, by: Object) -> vbridge::BridgeResult<()> {
//         ...
//     }
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemImpl};

mod methods;
mod model;
mod signature;

/// Exposes the exported methods of an inherent impl block to the foreign
/// runtime.
///
/// Every `pub fn` taking `self`, `&self` or `&mut self` becomes one entry of
/// the generated `vbridge::Methods::method_table()`, registered under its
/// Rust name. Private methods and associated functions are left out.
///
/// Parameter convention:
/// - a first parameter of type `Vm` or `&Vm` receives the call-time `this`
///   and consumes no foreign argument
/// - every other parameter must be `Object` or `&Object` and is fed the next
///   foreign argument in order
///
/// The return value goes through `vbridge::MethodReturn`.
///
/// # Example
///
/// ```ignore
/// #[methods]
/// impl Greeter {
///     pub fn greet(&self, vm: &Vm, name: Object) -> BridgeResult<String> {
///         Ok(format!("hello {}", name.as_string()?))
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn methods(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    methods::expand_methods(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Implements `vbridge::Model` for a struct with named fields.
///
/// The first field is the backing-data handle (type `Object`) and is the
/// field rebound on every bridged call. A field named `vm` (type
/// `Option<Vm>`) is the back-reference slot filled in after the component
/// is constructed. All other fields start from `Default::default()`.
///
/// # Example
///
/// ```ignore
/// #[derive(Model)]
/// struct Todo {
///     object: Object,
///     vm: Option<Vm>,
/// }
/// ```
#[proc_macro_derive(Model)]
pub fn derive_model(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    model::expand_model(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
