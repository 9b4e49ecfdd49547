//! Recursive translation of signatures into the target identity space.

use ilweld_metadata::{
    CallingConventionSig, FieldSig, GenericInstMethodSig, LocalSig, MethodSig, PropertySig,
    TypeSig,
};

use crate::importer::{ImportOp, Importer};

impl Importer<'_> {
    /// Translate a type signature. Primitives are already in canonical form;
    /// everything else is rebuilt with translated components. `Ok(None)`
    /// propagates an unresolvable component.
    pub(crate) fn import_type_sig(&mut self, sig: &TypeSig) -> ImportOp<Option<TypeSig>> {
        let imported = match sig {
            // The target corlib's canonical signature for each primitive
            // element kind is the unit variant itself.
            TypeSig::Void => TypeSig::Void,
            TypeSig::Boolean => TypeSig::Boolean,
            TypeSig::Char => TypeSig::Char,
            TypeSig::I1 => TypeSig::I1,
            TypeSig::U1 => TypeSig::U1,
            TypeSig::I2 => TypeSig::I2,
            TypeSig::U2 => TypeSig::U2,
            TypeSig::I4 => TypeSig::I4,
            TypeSig::U4 => TypeSig::U4,
            TypeSig::I8 => TypeSig::I8,
            TypeSig::U8 => TypeSig::U8,
            TypeSig::R4 => TypeSig::R4,
            TypeSig::R8 => TypeSig::R8,
            TypeSig::String => TypeSig::String,
            TypeSig::Object => TypeSig::Object,
            TypeSig::IntPtr => TypeSig::IntPtr,
            TypeSig::UIntPtr => TypeSig::UIntPtr,
            TypeSig::TypedByRef => TypeSig::TypedByRef,
            TypeSig::Sentinel => TypeSig::Sentinel,
            TypeSig::Class(tdr) => match self.import_type_def_or_ref(*tdr)? {
                Some(t) => TypeSig::Class(t),
                None => return Ok(None),
            },
            TypeSig::ValueType(tdr) => match self.import_type_def_or_ref(*tdr)? {
                Some(t) => TypeSig::ValueType(t),
                None => return Ok(None),
            },
            TypeSig::Ptr(inner) => match self.import_type_sig(inner)? {
                Some(t) => TypeSig::Ptr(Box::new(t)),
                None => return Ok(None),
            },
            TypeSig::ByRef(inner) => match self.import_type_sig(inner)? {
                Some(t) => TypeSig::ByRef(Box::new(t)),
                None => return Ok(None),
            },
            TypeSig::SZArray(inner) => match self.import_type_sig(inner)? {
                Some(t) => TypeSig::SZArray(Box::new(t)),
                None => return Ok(None),
            },
            TypeSig::Pinned(inner) => match self.import_type_sig(inner)? {
                Some(t) => TypeSig::Pinned(Box::new(t)),
                None => return Ok(None),
            },
            TypeSig::Array {
                element,
                rank,
                sizes,
                lower_bounds,
            } => match self.import_type_sig(element)? {
                Some(t) => TypeSig::Array {
                    element: Box::new(t),
                    rank: *rank,
                    sizes: sizes.clone(),
                    lower_bounds: lower_bounds.clone(),
                },
                None => return Ok(None),
            },
            TypeSig::ValueArray { element, length } => match self.import_type_sig(element)? {
                Some(t) => TypeSig::ValueArray {
                    element: Box::new(t),
                    length: *length,
                },
                None => return Ok(None),
            },
            TypeSig::CModReqd { modifier, inner } => {
                match (self.import_type_def_or_ref(*modifier)?, self.import_type_sig(inner)?) {
                    (Some(m), Some(t)) => TypeSig::CModReqd {
                        modifier: m,
                        inner: Box::new(t),
                    },
                    _ => return Ok(None),
                }
            }
            TypeSig::CModOpt { modifier, inner } => {
                match (self.import_type_def_or_ref(*modifier)?, self.import_type_sig(inner)?) {
                    (Some(m), Some(t)) => TypeSig::CModOpt {
                        modifier: m,
                        inner: Box::new(t),
                    },
                    _ => return Ok(None),
                }
            }
            TypeSig::Module { index, inner } => match self.import_type_sig(inner)? {
                Some(t) => TypeSig::Module {
                    index: *index,
                    inner: Box::new(t),
                },
                None => return Ok(None),
            },
            TypeSig::FnPtr(method_sig) => match self.import_method_sig(method_sig)? {
                Some(s) => TypeSig::FnPtr(Box::new(s)),
                None => return Ok(None),
            },
            TypeSig::GenericInst {
                is_value_type,
                ty,
                args,
            } => {
                let new_ty = match self.import_type_def_or_ref(*ty)? {
                    Some(t) => t,
                    None => return Ok(None),
                };
                let mut new_args = Vec::with_capacity(args.len());
                for arg in args {
                    match self.import_type_sig(arg)? {
                        Some(a) => new_args.push(a),
                        None => return Ok(None),
                    }
                }
                TypeSig::GenericInst {
                    is_value_type: *is_value_type,
                    ty: new_ty,
                    args: new_args,
                }
            }
            TypeSig::Var { number, owner } => {
                let new_owner = match owner {
                    Some(type_def) => match self.type_map.get(type_def) {
                        Some(&plan) => Some(self.plans[plan].target_type),
                        None => {
                            return self.fatal_internal(format!(
                                "owner of generic type parameter {number} was never imported"
                            ))
                        }
                    },
                    None => None,
                };
                TypeSig::Var {
                    number: *number,
                    owner: new_owner,
                }
            }
            TypeSig::MVar { number, owner } => {
                let new_owner = match owner {
                    Some(method) => match self.method_map.get(method) {
                        Some(&mapped) => Some(mapped),
                        None => {
                            return self.fatal_internal(format!(
                                "owner of generic method parameter {number} was never imported"
                            ))
                        }
                    },
                    None => None,
                };
                TypeSig::MVar {
                    number: *number,
                    owner: new_owner,
                }
            }
        };
        Ok(Some(imported))
    }

    pub(crate) fn import_method_sig(&mut self, sig: &MethodSig) -> ImportOp<Option<MethodSig>> {
        let ret = match self.import_type_sig(&sig.ret)? {
            Some(t) => t,
            None => return Ok(None),
        };
        let params = match self.import_type_sig_list(&sig.params)? {
            Some(p) => p,
            None => return Ok(None),
        };
        let params_after_sentinel = match &sig.params_after_sentinel {
            Some(tail) => match self.import_type_sig_list(tail)? {
                Some(p) => Some(p),
                None => return Ok(None),
            },
            None => None,
        };
        Ok(Some(MethodSig {
            calling_convention: sig.calling_convention,
            has_this: sig.has_this,
            explicit_this: sig.explicit_this,
            gen_param_count: sig.gen_param_count,
            ret,
            params,
            params_after_sentinel,
        }))
    }

    pub(crate) fn import_field_sig(&mut self, sig: &FieldSig) -> ImportOp<Option<FieldSig>> {
        Ok(self.import_type_sig(&sig.ty)?.map(|ty| FieldSig { ty }))
    }

    pub(crate) fn import_property_sig(
        &mut self,
        sig: &PropertySig,
    ) -> ImportOp<Option<PropertySig>> {
        let ret = match self.import_type_sig(&sig.ret)? {
            Some(t) => t,
            None => return Ok(None),
        };
        let params = match self.import_type_sig_list(&sig.params)? {
            Some(p) => p,
            None => return Ok(None),
        };
        Ok(Some(PropertySig {
            has_this: sig.has_this,
            ret,
            params,
        }))
    }

    pub(crate) fn import_calling_convention_sig(
        &mut self,
        sig: &CallingConventionSig,
    ) -> ImportOp<Option<CallingConventionSig>> {
        let imported = match sig {
            CallingConventionSig::Method(s) => {
                self.import_method_sig(s)?.map(CallingConventionSig::Method)
            }
            CallingConventionSig::Field(s) => {
                self.import_field_sig(s)?.map(CallingConventionSig::Field)
            }
            CallingConventionSig::Property(s) => self
                .import_property_sig(s)?
                .map(CallingConventionSig::Property),
            CallingConventionSig::GenericInstMethod(s) => self
                .import_generic_inst_method_sig(s)?
                .map(CallingConventionSig::GenericInstMethod),
            CallingConventionSig::LocalVars(s) => self
                .import_type_sig_list(&s.locals)?
                .map(|locals| CallingConventionSig::LocalVars(LocalSig { locals })),
        };
        Ok(imported)
    }

    pub(crate) fn import_generic_inst_method_sig(
        &mut self,
        sig: &GenericInstMethodSig,
    ) -> ImportOp<Option<GenericInstMethodSig>> {
        Ok(self
            .import_type_sig_list(&sig.args)?
            .map(|args| GenericInstMethodSig { args }))
    }

    fn import_type_sig_list(&mut self, sigs: &[TypeSig]) -> ImportOp<Option<Vec<TypeSig>>> {
        let mut out = Vec::with_capacity(sigs.len());
        for sig in sigs {
            match self.import_type_sig(sig)? {
                Some(s) => out.push(s),
                None => return Ok(None),
            }
        }
        Ok(Some(out))
    }
}
