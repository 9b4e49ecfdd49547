//! Structural signature and type comparison across two modules.
//!
//! Handles from different modules can never be compared directly, so types
//! are compared by their resolved full-name chains, ignoring resolution
//! scope. This is what edited-method discovery, stub matching and the rename
//! collision keys are built on.

use ilweld_metadata::{
    MemberRefParent, MethodRef, MethodSig, ModuleDef, PropertySig, TypeDefOrRef, TypeRefScope,
    TypeSig,
};

/// Compares signatures between module `a` and module `b`; the first operand
/// of every method lives in `a`, the second in `b`.
pub(crate) struct SigComparer<'m> {
    pub a: &'m ModuleDef,
    pub b: &'m ModuleDef,
}

impl<'m> SigComparer<'m> {
    pub fn new(a: &'m ModuleDef, b: &'m ModuleDef) -> Self {
        SigComparer { a, b }
    }

    pub fn method_sigs_equal(&self, x: &MethodSig, y: &MethodSig) -> bool {
        x.calling_convention == y.calling_convention
            && x.has_this == y.has_this
            && x.explicit_this == y.explicit_this
            && self.method_sigs_equal_ignore_this(x, y)
    }

    /// Equality that tolerates a static/instance difference; used to locate
    /// the edited method even when its static-ness was toggled.
    pub fn method_sigs_equal_ignore_this(&self, x: &MethodSig, y: &MethodSig) -> bool {
        x.gen_param_count == y.gen_param_count
            && self.type_sigs_equal(&x.ret, &y.ret)
            && self.type_sig_lists_equal(&x.params, &y.params)
            && match (&x.params_after_sentinel, &y.params_after_sentinel) {
                (None, None) => true,
                (Some(xs), Some(ys)) => self.type_sig_lists_equal(xs, ys),
                _ => false,
            }
    }

    pub fn property_sigs_equal(&self, x: &PropertySig, y: &PropertySig) -> bool {
        x.has_this == y.has_this
            && self.type_sigs_equal(&x.ret, &y.ret)
            && self.type_sig_lists_equal(&x.params, &y.params)
    }

    fn type_sig_lists_equal(&self, xs: &[TypeSig], ys: &[TypeSig]) -> bool {
        xs.len() == ys.len()
            && xs
                .iter()
                .zip(ys.iter())
                .all(|(x, y)| self.type_sigs_equal(x, y))
    }

    pub fn type_sigs_equal(&self, x: &TypeSig, y: &TypeSig) -> bool {
        use TypeSig::*;
        match (x, y) {
            (Class(tx), Class(ty)) | (ValueType(tx), ValueType(ty)) => {
                self.type_def_or_refs_equal(*tx, *ty)
            }
            (Ptr(ix), Ptr(iy))
            | (ByRef(ix), ByRef(iy))
            | (SZArray(ix), SZArray(iy))
            | (Pinned(ix), Pinned(iy)) => self.type_sigs_equal(ix, iy),
            (
                Array {
                    element: ex,
                    rank: rx,
                    sizes: sx,
                    lower_bounds: lx,
                },
                Array {
                    element: ey,
                    rank: ry,
                    sizes: sy,
                    lower_bounds: ly,
                },
            ) => rx == ry && sx == sy && lx == ly && self.type_sigs_equal(ex, ey),
            (
                ValueArray {
                    element: ex,
                    length: nx,
                },
                ValueArray {
                    element: ey,
                    length: ny,
                },
            ) => nx == ny && self.type_sigs_equal(ex, ey),
            (
                CModReqd {
                    modifier: mx,
                    inner: ix,
                },
                CModReqd {
                    modifier: my,
                    inner: iy,
                },
            )
            | (
                CModOpt {
                    modifier: mx,
                    inner: ix,
                },
                CModOpt {
                    modifier: my,
                    inner: iy,
                },
            ) => self.type_def_or_refs_equal(*mx, *my) && self.type_sigs_equal(ix, iy),
            (
                Module {
                    index: nx,
                    inner: ix,
                },
                Module {
                    index: ny,
                    inner: iy,
                },
            ) => nx == ny && self.type_sigs_equal(ix, iy),
            (FnPtr(sx), FnPtr(sy)) => self.method_sigs_equal(sx, sy),
            (
                GenericInst {
                    is_value_type: vx,
                    ty: tx,
                    args: ax,
                },
                GenericInst {
                    is_value_type: vy,
                    ty: ty_,
                    args: ay,
                },
            ) => {
                vx == vy
                    && self.type_def_or_refs_equal(*tx, *ty_)
                    && self.type_sig_lists_equal(ax, ay)
            }
            (Var { number: nx, .. }, Var { number: ny, .. }) => nx == ny,
            (MVar { number: nx, .. }, MVar { number: ny, .. }) => nx == ny,
            // Only the unit variants (primitives and Sentinel) can reach
            // this arm with matching discriminants.
            _ => std::mem::discriminant(x) == std::mem::discriminant(y),
        }
    }

    pub fn type_def_or_refs_equal(&self, x: TypeDefOrRef, y: TypeDefOrRef) -> bool {
        match (x, y) {
            (TypeDefOrRef::Spec(sx), TypeDefOrRef::Spec(sy)) => {
                self.type_sigs_equal(&self.a.type_spec(sx).sig, &self.b.type_spec(sy).sig)
            }
            (TypeDefOrRef::Spec(_), _) | (_, TypeDefOrRef::Spec(_)) => false,
            _ => match (type_chain(self.a, x), type_chain(self.b, y)) {
                (Some(cx), Some(cy)) => cx == cy,
                _ => false,
            },
        }
    }

}

/// The (namespace, name) chain of a type, innermost last, or `None` when the
/// chain cannot be resolved (e.g. a cyclic reference scope).
pub(crate) fn type_chain(
    module: &ModuleDef,
    tdr: TypeDefOrRef,
) -> Option<Vec<(String, String)>> {
    const MAX_DEPTH: usize = 500;
    let mut chain = Vec::new();
    match tdr {
        TypeDefOrRef::Def(mut id) => loop {
            let td = module.type_def(id);
            chain.push((td.namespace.clone(), td.name.clone()));
            match td.enclosing_type {
                Some(up) => {
                    id = up;
                    if chain.len() > MAX_DEPTH {
                        return None;
                    }
                }
                None => break,
            }
        },
        TypeDefOrRef::Ref(mut id) => loop {
            let tr = module.type_ref(id);
            chain.push((tr.namespace.clone(), tr.name.clone()));
            match tr.scope {
                TypeRefScope::TypeRef(up) => {
                    id = up;
                    if chain.len() > MAX_DEPTH {
                        return None;
                    }
                }
                _ => break,
            }
        },
        TypeDefOrRef::Spec(_) => return None,
    }
    chain.reverse();
    Some(chain)
}

/// A hashable identity key for a method signature that ignores the return
/// type; the rename pass keys its collision sets with this.
pub(crate) fn method_key(module: &ModuleDef, name: &str, sig: &MethodSig) -> String {
    let mut key = String::new();
    key.push_str(name);
    if sig.has_this {
        key.push_str("!this");
    }
    if sig.gen_param_count > 0 {
        key.push_str(&format!("!g{}", sig.gen_param_count));
    }
    key.push('(');
    for (i, p) in sig.params.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        push_type_key(module, p, &mut key);
    }
    key.push(')');
    key
}

/// Property collision key, return type ignored.
pub(crate) fn property_key(module: &ModuleDef, name: &str, sig: &PropertySig) -> String {
    let mut key = String::new();
    key.push_str(name);
    key.push('[');
    for (i, p) in sig.params.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        push_type_key(module, p, &mut key);
    }
    key.push(']');
    key
}

fn push_type_key(module: &ModuleDef, sig: &TypeSig, out: &mut String) {
    use TypeSig::*;
    match sig {
        Void => out.push_str("void"),
        Boolean => out.push_str("bool"),
        Char => out.push_str("char"),
        I1 => out.push_str("i1"),
        U1 => out.push_str("u1"),
        I2 => out.push_str("i2"),
        U2 => out.push_str("u2"),
        I4 => out.push_str("i4"),
        U4 => out.push_str("u4"),
        I8 => out.push_str("i8"),
        U8 => out.push_str("u8"),
        R4 => out.push_str("r4"),
        R8 => out.push_str("r8"),
        String => out.push_str("string"),
        Object => out.push_str("object"),
        IntPtr => out.push_str("native int"),
        UIntPtr => out.push_str("native uint"),
        TypedByRef => out.push_str("typedref"),
        Sentinel => out.push_str("..."),
        Class(t) | ValueType(t) => push_type_ref_key(module, *t, out),
        Ptr(inner) => {
            push_type_key(module, inner, out);
            out.push('*');
        }
        ByRef(inner) => {
            push_type_key(module, inner, out);
            out.push('&');
        }
        SZArray(inner) => {
            push_type_key(module, inner, out);
            out.push_str("[]");
        }
        Pinned(inner) => {
            push_type_key(module, inner, out);
            out.push_str("!pinned");
        }
        Array { element, rank, .. } => {
            push_type_key(module, element, out);
            out.push_str(&format!("[r{rank}]"));
        }
        ValueArray { element, length } => {
            push_type_key(module, element, out);
            out.push_str(&format!("[v{length}]"));
        }
        CModReqd { modifier, inner } | CModOpt { modifier, inner } => {
            push_type_key(module, inner, out);
            out.push_str("!mod:");
            push_type_ref_key(module, *modifier, out);
        }
        Module { inner, .. } => push_type_key(module, inner, out),
        FnPtr(sig) => {
            out.push_str("fnptr:");
            out.push_str(&method_key(module, "", sig));
        }
        GenericInst { ty, args, .. } => {
            push_type_ref_key(module, *ty, out);
            out.push('<');
            for (i, a) in args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_type_key(module, a, out);
            }
            out.push('>');
        }
        Var { number, .. } => out.push_str(&format!("!{number}")),
        MVar { number, .. } => out.push_str(&format!("!!{number}")),
    }
}

fn push_type_ref_key(module: &ModuleDef, tdr: TypeDefOrRef, out: &mut String) {
    if let TypeDefOrRef::Spec(id) = tdr {
        push_type_key(module, &module.type_spec(id).sig, out);
        return;
    }
    match type_chain(module, tdr) {
        Some(chain) => {
            for (i, (ns, name)) in chain.iter().enumerate() {
                if i > 0 {
                    out.push('/');
                }
                if !ns.is_empty() {
                    out.push_str(ns);
                    out.push('.');
                }
                out.push_str(name);
            }
        }
        None => out.push_str("<unresolved>"),
    }
}

/// Identity key for a method reference: declaring scope, name and signature.
pub(crate) fn method_ref_key(module: &ModuleDef, method: MethodRef) -> Option<String> {
    match method {
        MethodRef::Def(id) => {
            let md = module.method(id);
            let declaring = md.declaring_type?;
            let mut key = String::new();
            push_type_ref_key(module, TypeDefOrRef::Def(declaring), &mut key);
            key.push_str("::");
            key.push_str(&method_key(module, &md.name, &md.signature));
            Some(key)
        }
        MethodRef::Member(id) => {
            let mr = module.member_ref(id);
            let mut key = String::new();
            match mr.class {
                MemberRefParent::Type(tdr) => push_type_ref_key(module, tdr, &mut key),
                MemberRefParent::ModuleRef(m) => {
                    key.push_str("module:");
                    key.push_str(&module.module_ref(m).name);
                }
                MemberRefParent::Method(m) => {
                    key.push_str(&method_ref_key(module, MethodRef::Def(m))?);
                }
            }
            key.push_str("::");
            match &mr.signature {
                ilweld_metadata::CallingConventionSig::Method(sig) => {
                    key.push_str(&method_key(module, &mr.name, sig));
                }
                _ => {
                    key.push_str(&mr.name);
                }
            }
            Some(key)
        }
        MethodRef::Spec(id) => {
            let ms = module.method_spec(id);
            let mut key = method_ref_key(module, ms.method)?;
            key.push('<');
            for (i, a) in ms.instantiation.args.iter().enumerate() {
                if i > 0 {
                    key.push(',');
                }
                push_type_key(module, a, &mut key);
            }
            key.push('>');
            Some(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilweld_metadata::{AssemblyInfo, TypeDef, TypeRef, TypeRefScope};

    fn module_with_def(ns: &str, name: &str) -> (ModuleDef, TypeDefOrRef) {
        let mut m = ModuleDef::with_assembly("a.dll", AssemblyInfo::new("a", (1, 0, 0, 0)));
        let t = m.alloc_type_def(TypeDef::new(ns, name));
        m.top_level_types.push(t);
        (m, TypeDefOrRef::Def(t))
    }

    #[test]
    fn def_and_ref_to_same_full_name_compare_equal() {
        let (a, def) = module_with_def("Ns", "C");
        let mut b = ModuleDef::new("b.dll");
        let aref = b.alloc_assembly_ref(AssemblyInfo::new("a", (1, 0, 0, 0)));
        let r = b.alloc_type_ref(TypeRef::new(TypeRefScope::AssemblyRef(aref), "Ns", "C"));
        let cmp = SigComparer::new(&a, &b);
        assert!(cmp.type_def_or_refs_equal(def, TypeDefOrRef::Ref(r)));
        assert!(cmp.type_sigs_equal(&TypeSig::Class(def), &TypeSig::Class(TypeDefOrRef::Ref(r))));
    }

    #[test]
    fn primitive_sigs_compare_structurally() {
        let (a, _) = module_with_def("Ns", "C");
        let (b, _) = module_with_def("Ns", "D");
        let cmp = SigComparer::new(&a, &b);
        assert!(cmp.type_sigs_equal(&TypeSig::I4, &TypeSig::I4));
        assert!(!cmp.type_sigs_equal(&TypeSig::I4, &TypeSig::U4));
        assert!(cmp.type_sigs_equal(
            &TypeSig::SZArray(Box::new(TypeSig::String)),
            &TypeSig::SZArray(Box::new(TypeSig::String))
        ));
    }

    #[test]
    fn method_key_ignores_return_type() {
        let (a, _) = module_with_def("Ns", "C");
        let sig1 = MethodSig::static_method(TypeSig::Void, vec![TypeSig::I4]);
        let sig2 = MethodSig::static_method(TypeSig::I4, vec![TypeSig::I4]);
        assert_eq!(method_key(&a, "Helper", &sig1), method_key(&a, "Helper", &sig2));
        let sig3 = MethodSig::static_method(TypeSig::Void, vec![TypeSig::I8]);
        assert_ne!(method_key(&a, "Helper", &sig1), method_key(&a, "Helper", &sig3));
    }

    #[test]
    fn instance_and_static_keys_differ() {
        let (a, _) = module_with_def("Ns", "C");
        let st = MethodSig::static_method(TypeSig::Void, vec![]);
        let inst = MethodSig::instance_method(TypeSig::Void, vec![]);
        assert_ne!(method_key(&a, "M", &st), method_key(&a, "M", &inst));
    }
}
