// #[methods] proc-macro implementation
//
// Generates the `vbridge::Methods` table for an inherent impl block.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{ImplItem, ImplItemFn, ItemImpl, Result, Visibility};

use crate::signature::{plan_method, MethodPlan, PassMode, ReceiverMode};

/// Expands the #[methods] attribute macro.
///
/// Input: inherent impl block
/// Output: the impl block unchanged + `impl vbridge::Methods`
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[methods]
/// impl Calc {
///     pub fn add(&self, vm: &Vm, a: Object, b: Object) -> f64 { ... }
/// }
///
/// // Output:
/// impl Calc {
///     pub fn add(&self, vm: &Vm, a: Object, b: Object) -> f64 { ... }
/// }
///
/// impl ::vbridge::Methods for Calc {
///     fn method_table() -> Vec<::vbridge::MethodDescriptor<Self>> {
///         vec![::vbridge::MethodDescriptor::new(
///             "add",
///             ::vbridge::Signature::new(::vbridge::InstanceParam::Handle, 2),
///             |receiver: Self, call: ::vbridge::Invocation| {
///                 // Take instance handle
///                 // Take foreign arguments
///                 // Call method
///                 // Convert result
///             },
///         )]
///     }
/// }
/// ```
pub fn expand_methods(item: ItemImpl) -> Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[methods] must be applied to an inherent impl block",
        ));
    }

    let mut descriptors = Vec::new();
    for impl_item in &item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        if !matches!(method.vis, Visibility::Public(_)) {
            continue;
        }
        if let Some(plan) = plan_method(&method.sig)? {
            descriptors.push(expand_descriptor(method, &plan));
        }
    }

    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    let expanded = quote! {
        // Keep original impl block
        #item

        impl #impl_generics ::vbridge::Methods for #self_ty #where_clause {
            fn method_table() -> ::std::vec::Vec<::vbridge::MethodDescriptor<Self>> {
                ::std::vec![#(#descriptors),*]
            }
        }
    };

    Ok(expanded)
}

/// One `MethodDescriptor::new(...)` expression.
fn expand_descriptor(method: &ImplItemFn, plan: &MethodPlan) -> TokenStream {
    let method_ident = &method.sig.ident;
    let name = method_ident.to_string();
    let arity = plan.args.len();

    let instance_param = if plan.instance.is_some() {
        quote! { ::vbridge::InstanceParam::Handle }
    } else {
        quote! { ::vbridge::InstanceParam::None }
    };

    let receiver_binding = match plan.receiver {
        ReceiverMode::Mut => quote! { let mut receiver = receiver; },
        ReceiverMode::Ref | ReceiverMode::Value => quote! {},
    };

    // Instance handle extraction (consumes no foreign argument)
    let (instance_take, instance_arg) = match plan.instance {
        Some(mode) => {
            let take = quote! { let instance = call.instance()?; };
            let arg = match mode {
                PassMode::Ref => quote! { &instance },
                PassMode::Value => quote! { instance },
            };
            (take, vec![arg])
        }
        None => (quote! {}, Vec::new()),
    };

    // Foreign argument extraction
    let arg_names: Vec<_> = (0..arity).map(|i| format_ident!("arg{}", i)).collect();
    let args_take = if arity == 0 {
        quote! {}
    } else {
        quote! { let [#(#arg_names),*] = call.into_args::<#arity>()?; }
    };
    let arg_exprs = arg_names.iter().zip(plan.args.iter()).map(|(name, mode)| match mode {
        PassMode::Ref => quote! { &#name },
        PassMode::Value => quote! { #name },
    });
    let call_args = instance_arg.into_iter().chain(arg_exprs);

    quote! {
        ::vbridge::MethodDescriptor::new(
            #name,
            ::vbridge::Signature::new(#instance_param, #arity),
            |receiver: Self, call: ::vbridge::Invocation| -> ::vbridge::BridgeResult<::vbridge::ForeignValue> {
                #receiver_binding
                let runtime = ::std::rc::Rc::clone(call.runtime());
                #instance_take
                #args_take
                let result = receiver.#method_ident(#(#call_args),*);
                ::vbridge::MethodReturn::into_foreign(result, &*runtime)
            },
        )
    }
}
