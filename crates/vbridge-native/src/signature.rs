// Parameter classification for bridged methods
//
// Decides, from the declared signature alone, how each parameter is fed:
// the receiver, the optional leading instance handle, and the foreign
// arguments that follow it.

use syn::{FnArg, Result, Signature, Type};

/// How a value is handed to the method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// By value (`T`)
    Value,
    /// By shared reference (`&T`)
    Ref,
}

/// How the per-call receiver is handed to the method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverMode {
    /// `self`
    Value,
    /// `&self`
    Ref,
    /// `&mut self`
    Mut,
}

/// Calling plan for one bridged method
#[derive(Debug)]
pub struct MethodPlan {
    pub receiver: ReceiverMode,
    pub instance: Option<PassMode>,
    pub args: Vec<PassMode>,
}

/// Strip one level of `&` and report the pass mode.
fn pass_mode(ty: &Type) -> (PassMode, &Type) {
    match ty {
        Type::Reference(r) if r.mutability.is_none() => (PassMode::Ref, &r.elem),
        _ => (PassMode::Value, ty),
    }
}

/// Last path segment of a type, if it is a plain path.
fn last_segment(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string()),
        Type::Paren(inner) => last_segment(&inner.elem),
        Type::Group(inner) => last_segment(&inner.elem),
        _ => None,
    }
}

/// Check whether `ty` names the instance handle type (`Vm` or `&Vm`).
pub fn instance_mode(ty: &Type) -> Option<PassMode> {
    let (mode, inner) = pass_mode(ty);
    match last_segment(inner) {
        Some(name) if name == "Vm" => Some(mode),
        _ => None,
    }
}

/// Build the calling plan for `sig`.
///
/// Returns `Ok(None)` for associated functions (no receiver), which are not
/// part of the method set.
pub fn plan_method(sig: &Signature) -> Result<Option<MethodPlan>> {
    let mut inputs = sig.inputs.iter();

    let receiver = match inputs.next() {
        Some(FnArg::Receiver(recv)) => {
            if recv.colon_token.is_some() {
                return Err(syn::Error::new_spanned(
                    recv,
                    "Typed receivers (self: Type) are not supported in #[methods]",
                ));
            }
            match (&recv.reference, &recv.mutability) {
                (Some(_), Some(_)) => ReceiverMode::Mut,
                (Some(_), None) => ReceiverMode::Ref,
                (None, _) => ReceiverMode::Value,
            }
        }
        _ => return Ok(None),
    };

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "Async methods cannot be bridged",
        ));
    }

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "Generic methods cannot be bridged",
        ));
    }

    let mut instance = None;
    let mut args = Vec::new();

    for (position, arg) in inputs.enumerate() {
        let pat_type = match arg {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(recv) => {
                return Err(syn::Error::new_spanned(recv, "Unexpected receiver"));
            }
        };
        if !matches!(&*pat_type.pat, syn::Pat::Ident(_) | syn::Pat::Wild(_)) {
            return Err(syn::Error::new_spanned(
                &pat_type.pat,
                "Only simple identifiers are supported as arguments",
            ));
        }

        // Only the first parameter after the receiver may take the handle
        if position == 0 {
            if let Some(mode) = instance_mode(&pat_type.ty) {
                instance = Some(mode);
                continue;
            }
        }

        let (mode, _) = pass_mode(&pat_type.ty);
        args.push(mode);
    }

    Ok(Some(MethodPlan {
        receiver,
        instance,
        args,
    }))
}
