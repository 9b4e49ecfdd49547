//! Resolving name collisions on merge-with-rename types.
//!
//! Collision keys: methods and properties by signature with the return type
//! ignored, events and fields by bare name (both live in the same name space
//! of the type). Renames of properties and events seed suggested names for
//! their accessor methods, and the method pass prefers a suggestion over the
//! method's current name.

use std::collections::{HashMap, HashSet};

use ilweld_metadata::MethodId;

use crate::compare::{method_key, property_key};
use crate::diagnostics::DiagnosticCode;
use crate::importer::{ImportOp, Importer};
use crate::plan::PlanKind;

impl Importer<'_> {
    pub(crate) fn rename_merged_duplicates(&mut self) -> ImportOp<()> {
        for plan in 0..self.plans.len() {
            if matches!(
                self.plans[plan].kind,
                PlanKind::Merged {
                    rename_duplicates: true
                }
            ) {
                self.rename_plan_members(plan)?;
            }
        }
        Ok(())
    }

    fn rename_plan_members(&mut self, plan: usize) -> ImportOp<()> {
        let target_type = self.plans[plan].target_type;

        let mut method_keys: HashSet<String> = HashSet::new();
        let mut property_keys: HashSet<String> = HashSet::new();
        // Fields and events share the type's field name space.
        let mut field_event_names: HashSet<String> = HashSet::new();
        {
            let target = &*self.target;
            let td = target.type_def(target_type);
            for &m in &td.methods {
                let md = target.method(m);
                method_keys.insert(method_key(target, &md.name, &md.signature));
            }
            for &p in &td.properties {
                let pd = target.property(p);
                property_keys.insert(property_key(target, &pd.name, &pd.signature));
            }
            for &e in &td.events {
                field_event_names.insert(target.event(e).name.clone());
            }
            for &f in &td.fields {
                field_event_names.insert(target.field(f).name.clone());
            }
        }

        let mut suggested: HashMap<MethodId, String> = HashMap::new();

        let properties = self.plans[plan].created_properties.clone();
        for (_, property) in properties {
            let (name, key, is_virtual, get_method, set_method) = {
                let target = &*self.target;
                let pd = target.property(property);
                let is_virtual = pd
                    .get_method
                    .iter()
                    .chain(pd.set_method.iter())
                    .chain(pd.other_methods.iter())
                    .any(|&m| target.method(m).is_virtual());
                (
                    pd.name.clone(),
                    property_key(target, &pd.name, &pd.signature),
                    is_virtual,
                    pd.get_method,
                    pd.set_method,
                )
            };
            if !property_keys.contains(&key) {
                property_keys.insert(key);
                continue;
            }
            if is_virtual {
                self.report(
                    DiagnosticCode::IM0006,
                    format!("{}: {name}", DiagnosticCode::IM0006.default_message()),
                );
                continue;
            }
            let (new_name, new_key) = {
                let target = &*self.target;
                let sig = target.property(property).signature.clone();
                let mut counter = 0usize;
                loop {
                    let candidate = format!("{name}_{counter}");
                    let candidate_key = property_key(target, &candidate, &sig);
                    if !property_keys.contains(&candidate_key) {
                        break (candidate, candidate_key);
                    }
                    counter += 1;
                }
            };
            self.target.property_mut(property).name = new_name.clone();
            property_keys.insert(new_key);
            if let Some(m) = get_method {
                suggested.insert(m, format!("get_{new_name}"));
            }
            if let Some(m) = set_method {
                suggested.insert(m, format!("set_{new_name}"));
            }
        }

        let events = self.plans[plan].created_events.clone();
        for (_, event) in events {
            let (name, is_virtual, add_method, remove_method, fire_method) = {
                let target = &*self.target;
                let ed = target.event(event);
                let is_virtual = ed
                    .add_method
                    .iter()
                    .chain(ed.remove_method.iter())
                    .chain(ed.fire_method.iter())
                    .chain(ed.other_methods.iter())
                    .any(|&m| target.method(m).is_virtual());
                (
                    ed.name.clone(),
                    is_virtual,
                    ed.add_method,
                    ed.remove_method,
                    ed.fire_method,
                )
            };
            if !field_event_names.contains(&name) {
                field_event_names.insert(name);
                continue;
            }
            if is_virtual {
                self.report(
                    DiagnosticCode::IM0007,
                    format!("{}: {name}", DiagnosticCode::IM0007.default_message()),
                );
                continue;
            }
            let new_name = {
                let mut counter = 0usize;
                loop {
                    let candidate = format!("{name}_{counter}");
                    if !field_event_names.contains(&candidate) {
                        break candidate;
                    }
                    counter += 1;
                }
            };
            self.target.event_mut(event).name = new_name.clone();
            field_event_names.insert(new_name.clone());
            if let Some(m) = add_method {
                suggested.insert(m, format!("add_{new_name}"));
            }
            if let Some(m) = remove_method {
                suggested.insert(m, format!("remove_{new_name}"));
            }
            if let Some(m) = fire_method {
                suggested.insert(m, format!("raise_{new_name}"));
            }
        }

        let methods = self.plans[plan].created_methods.clone();
        for (_, method) in methods {
            let (current_name, is_virtual, sig) = {
                let md = self.target.method(method);
                (md.name.clone(), md.is_virtual(), md.signature.clone())
            };
            let name = suggested
                .get(&method)
                .cloned()
                .unwrap_or_else(|| current_name.clone());
            let key = method_key(self.target, &name, &sig);
            if !method_keys.contains(&key) {
                if name != current_name {
                    self.target.method_mut(method).name = name;
                }
                method_keys.insert(key);
                continue;
            }
            if is_virtual {
                self.report(
                    DiagnosticCode::IM0008,
                    format!("{}: {name}", DiagnosticCode::IM0008.default_message()),
                );
                continue;
            }
            let (new_name, new_key) = {
                let target = &*self.target;
                let mut counter = 0usize;
                loop {
                    let candidate = format!("{name}_{counter}");
                    let candidate_key = method_key(target, &candidate, &sig);
                    if !method_keys.contains(&candidate_key) {
                        break (candidate, candidate_key);
                    }
                    counter += 1;
                }
            };
            self.target.method_mut(method).name = new_name;
            method_keys.insert(new_key);
        }

        let fields = self.plans[plan].created_fields.clone();
        for (_, field) in fields {
            let name = self.target.field(field).name.clone();
            if !field_event_names.contains(&name) {
                field_event_names.insert(name);
                continue;
            }
            let new_name = {
                let mut counter = 0usize;
                loop {
                    let candidate = format!("{name}_{counter}");
                    if !field_event_names.contains(&candidate) {
                        break candidate;
                    }
                    counter += 1;
                }
            };
            self.target.field_mut(field).name = new_name.clone();
            field_event_names.insert(new_name);
        }

        Ok(())
    }
}
