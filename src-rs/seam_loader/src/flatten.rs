//! Destructive substitution of import stubs with their remote definitions.
//!
//! Flattening walks the component and units trees of a fully resolved model
//! and replaces every import stub with a deep, locally owned copy of the
//! concrete definition it stands in for. Each substitution happens in two
//! passes: the first copies structure (variables, nested components, math,
//! resets, referenced units) and records an old-to-new variable map; the
//! second rewrites equivalence edges through that map, carrying over edges
//! internal to the copied definition and re-homing edges that were hosted
//! on the stub's dummy variables.
//!
//! Flattening discards the information needed to reconstruct the original
//! import structure. There is no inverse operation.

use std::collections::HashMap;
use std::rc::Rc;

use seam_error::{AsSeamError, Context};
use seam_model::{ComponentId, Entity, ImportRef, Model, VariableId};

/// An equivalence edge dropped during flattening.
///
/// The edge referenced a dummy variable on an import stub, and the copied
/// remote definition contains no variable of that name to re-home the edge
/// onto. This is a contract violation on the model author's side but is
/// deliberately non-fatal: the edge is dropped and reported so the rest of
/// the tree still flattens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEquivalence {
    component: String,
    variable: String,
}

impl DroppedEquivalence {
    /// Returns the name of the stub component that hosted the dummy
    /// variable.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Returns the name of the dummy variable with no counterpart in the
    /// copied definition.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl AsSeamError for DroppedEquivalence {
    fn message(&self) -> String {
        format!(
            "no variable named `{variable}` exists in the definition substituted for component `{component}`; its equivalence edge was dropped",
            variable = self.variable,
            component = self.component,
        )
    }

    fn context(&self) -> Vec<Context> {
        vec![Context::Help(
            "give the dummy variable the same name as the remote variable it connects to"
                .to_string(),
        )]
    }
}

/// The outcome of one [`flatten`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenReport {
    performed: bool,
    dropped_equivalences: Vec<DroppedEquivalence>,
    skipped_components: Vec<String>,
    skipped_units: Vec<String>,
}

impl FlattenReport {
    const fn skipped_unresolved() -> Self {
        Self {
            performed: false,
            dropped_equivalences: vec![],
            skipped_components: vec![],
            skipped_units: vec![],
        }
    }

    const fn performed() -> Self {
        Self {
            performed: true,
            dropped_equivalences: vec![],
            skipped_components: vec![],
            skipped_units: vec![],
        }
    }

    /// Returns true if flattening actually ran.
    ///
    /// `false` means the model still had unresolved imports and was left
    /// byte-for-byte unchanged.
    #[must_use]
    pub const fn was_performed(&self) -> bool {
        self.performed
    }

    /// Returns the equivalence edges dropped because a dummy variable had
    /// no same-named counterpart in the substituted definition.
    #[must_use]
    pub fn dropped_equivalences(&self) -> &[DroppedEquivalence] {
        &self.dropped_equivalences
    }

    /// Returns the names of stub components left in place because their
    /// import chain never reached a concrete definition.
    ///
    /// This is empty after a flatten that followed a successful resolve.
    #[must_use]
    pub fn skipped_components(&self) -> &[String] {
        &self.skipped_components
    }

    /// Returns the names of stub units definitions left in place because
    /// their import chain never reached a concrete definition.
    #[must_use]
    pub fn skipped_units(&self) -> &[String] {
        &self.skipped_units
    }

    fn is_complete(&self) -> bool {
        self.skipped_components.is_empty() && self.skipped_units.is_empty()
    }
}

/// Replaces every import stub in `model` with a copy of its remote
/// definition.
///
/// Defined only for a fully resolved model: if
/// `model.has_unresolved_imports()` is true this is an explicit no-op, the
/// model is left unchanged, and the returned report says so. Otherwise the
/// substitution runs to completion; afterwards no entity in the tree is an
/// import stub, the import-source registry is empty, and
/// `model.has_unresolved_imports()` is vacuously false.
///
/// Flattening is irreversible. Non-fatal conditions observed along the way
/// are returned in the [`FlattenReport`] rather than raised.
pub fn flatten(model: &mut Model) -> FlattenReport {
    if model.has_unresolved_imports() {
        return FlattenReport::skipped_unresolved();
    }

    let mut report = FlattenReport::performed();

    // Substitutions can introduce new stubs (a copied definition may itself
    // contain import stubs), so the queue grows while it is processed.
    let mut queue: Vec<ComponentId> = model.components_preorder();
    let mut next = 0;
    while next < queue.len() {
        let id = queue[next];
        next += 1;
        if model.component(id).is_import() {
            substitute_component(model, id, &mut report, &mut queue);
        }
    }

    // Units substitutions may append transitively referenced definitions,
    // which may themselves be stubs; the growing list covers them.
    let mut index = 0;
    while index < model.units().len() {
        if model.units()[index].is_import() {
            substitute_units(model, index, &mut report);
        }
        index += 1;
    }

    if report.is_complete() {
        model.clear_import_sources();
    }

    report
}

/// Follows an import chain until a concrete component definition is found.
///
/// A remote definition may itself be an import stub ("nested imports"), in
/// which case the chain continues through that model's own registry.
/// Resolution rejects cyclic import graphs, so the chain is finite.
fn locate_concrete_component(model: &Model, import: &ImportRef) -> Option<(Rc<Model>, ComponentId)> {
    let mut host = Rc::clone(model.import_source(import.url())?.model()?);
    let mut reference = import.reference().to_string();

    loop {
        let found = host.find_component(&reference)?;
        let Some(next) = host.component(found).import() else {
            return Some((host, found));
        };

        let next_url = next.url().to_string();
        let next_reference = next.reference().to_string();
        let next_host = Rc::clone(host.import_source(&next_url)?.model()?);
        reference = next_reference;
        host = next_host;
    }
}

/// Follows an import chain until a concrete units definition is found.
fn locate_concrete_units(model: &Model, import: &ImportRef) -> Option<(Rc<Model>, usize)> {
    let mut host = Rc::clone(model.import_source(import.url())?.model()?);
    let mut reference = import.reference().to_string();

    loop {
        let found = host.units_by_name(&reference)?;
        let Some(next) = host.units()[found].import() else {
            return Some((host, found));
        };

        let next_url = next.url().to_string();
        let next_reference = next.reference().to_string();
        let next_host = Rc::clone(host.import_source(&next_url)?.model()?);
        reference = next_reference;
        host = next_host;
    }
}

fn substitute_component(
    model: &mut Model,
    id: ComponentId,
    report: &mut FlattenReport,
    queue: &mut Vec<ComponentId>,
) {
    let Some(import) = model.component(id).import().cloned() else {
        return;
    };
    let stub_name = model.component(id).name().to_string();

    let Some((host, concrete)) = locate_concrete_component(model, &import) else {
        report.skipped_components.push(stub_name);
        return;
    };

    // remember the dummies hosted on the stub; their equivalence edges are
    // re-homed by name after the copy
    let dummies: Vec<(String, VariableId)> = model
        .component(id)
        .variables()
        .iter()
        .map(|variable| (model.variable(*variable).name().to_string(), *variable))
        .collect();

    // strip the stub down to its name and tree position
    model.clear_component_import(id);
    model.detach_component_variables(id);

    // the stub's id is the locally meaningful handle and wins over the
    // remote id
    if model.component(id).id().is_none() {
        if let Some(remote_id) = host.component(concrete).id().map(str::to_string) {
            model.component_mut(id).set_id(remote_id);
        }
    }

    // pass 1: copy structure and build the old-to-new variable map
    let mut variable_map: HashMap<VariableId, VariableId> = HashMap::new();
    copy_component_contents(model, id, &host, concrete, &mut variable_map, queue);

    let referenced_units: Vec<String> = variable_map
        .values()
        .filter_map(|variable| model.variable(*variable).units().map(str::to_string))
        .collect();
    copy_referenced_units(model, &host, referenced_units);

    // pass 2a: carry over edges internal to the copied definition
    for edge in host.equivalences() {
        let (a, b) = edge.variables();
        let (Some(&new_a), Some(&new_b)) = (variable_map.get(&a), variable_map.get(&b)) else {
            continue;
        };
        if model.add_equivalence(new_a, new_b) {
            if let Some(copied) = model.equivalence_mut(new_a, new_b) {
                if let Some(connection_id) = edge.connection_id() {
                    copied.set_connection_id(connection_id);
                }
                if let Some(mapping_id) = edge.mapping_id() {
                    copied.set_mapping_id(mapping_id);
                }
            }
        }
    }

    // pass 2b: re-home the dummies' edges onto same-named copied variables
    let mut remap: HashMap<VariableId, Option<VariableId>> = HashMap::new();
    for (name, dummy) in &dummies {
        remap.insert(*dummy, model.variable_by_name(id, name));
    }

    let dropped = model.rehome_equivalences(&remap);
    for edge in &dropped {
        for (name, dummy) in &dummies {
            if edge.involves(*dummy) && remap.get(dummy) == Some(&None) {
                report.dropped_equivalences.push(DroppedEquivalence {
                    component: model.component(id).name().to_string(),
                    variable: name.clone(),
                });
            }
        }
    }
}

/// Copies variables, resets, math, and nested children of `from` (in
/// `host`) into `into` (in `model`), recording every copied variable in
/// `variable_map` and enqueueing every copied child for stub processing.
fn copy_component_contents(
    model: &mut Model,
    into: ComponentId,
    host: &Model,
    from: ComponentId,
    variable_map: &mut HashMap<VariableId, VariableId>,
    queue: &mut Vec<ComponentId>,
) {
    let remote = host.component(from);

    if let Some(math) = remote.math() {
        model.component_mut(into).set_math(math.to_string());
    }
    if let Some(encapsulation_id) = remote.encapsulation_id() {
        model
            .component_mut(into)
            .set_encapsulation_id(encapsulation_id.to_string());
    }

    for &remote_variable in remote.variables() {
        let source = host.variable(remote_variable);
        let copied = model.add_variable(into, source.name().to_string());
        let target = model.variable_mut(copied);
        if let Some(variable_id) = source.id() {
            target.set_id(variable_id.to_string());
        }
        if let Some(units) = source.units() {
            target.set_units(units.to_string());
        }
        target.set_interface_type(source.interface_type());
        if let Some(value) = source.initial_value() {
            target.set_initial_value(value.clone());
        }
        variable_map.insert(remote_variable, copied);
    }

    for reset in remote.resets() {
        let mut copied = reset.clone();
        let variable = reset
            .variable()
            .and_then(|variable| variable_map.get(&variable).copied());
        let test_variable = reset
            .test_variable()
            .and_then(|variable| variable_map.get(&variable).copied());
        copied.remap_variables(variable, test_variable);
        model.component_mut(into).add_reset(copied);
    }

    for &remote_child in remote.children() {
        let child = host.component(remote_child);
        let copied_child = model.add_child_component(into, child.name().to_string());
        if let Some(child_id) = child.id() {
            model.component_mut(copied_child).set_id(child_id.to_string());
        }
        if let Some(child_import) = child.import() {
            model.set_component_import(
                copied_child,
                child_import.url().to_string(),
                child_import.reference().to_string(),
            );
            carry_import_source(model, host, child_import.url());
        }
        queue.push(copied_child);
        copy_component_contents(model, copied_child, host, remote_child, variable_map, queue);
    }
}

/// Copies model-scope units definitions named in `pending` (and anything
/// their terms reference, transitively) from `host` into `model`, skipping
/// names already defined locally and names `host` does not define (base
/// units, most commonly).
fn copy_referenced_units(model: &mut Model, host: &Model, mut pending: Vec<String>) {
    while let Some(name) = pending.pop() {
        if model.units_by_name(&name).is_some() {
            continue;
        }
        let Some(index) = host.units_by_name(&name) else {
            continue;
        };

        let units = host.units()[index].clone();
        pending.extend(
            units
                .terms()
                .iter()
                .map(|term| term.reference().to_string()),
        );

        let import_url = units.import().map(|import| import.url().to_string());
        model.add_units(units);
        if let Some(url) = import_url {
            carry_import_source(model, host, &url);
        }
    }
}

/// Makes the local registry able to serve a URL that a copied stub
/// references, sharing the already-resolved remote model from `host`.
fn carry_import_source(model: &mut Model, host: &Model, url: &str) {
    let resolved = host
        .import_source(url)
        .and_then(|source| source.model().cloned());

    let source = model.register_import_source(url.to_string());
    if !source.is_resolved() {
        if let Some(remote) = resolved {
            source.set_model(remote);
        }
    }
}

fn substitute_units(model: &mut Model, index: usize, report: &mut FlattenReport) {
    let Some(import) = model.units()[index].import().cloned() else {
        return;
    };
    let local_name = model.units()[index].name().to_string();

    let Some((host, remote_index)) = locate_concrete_units(model, &import) else {
        report.skipped_units.push(local_name);
        return;
    };

    let local_id = model.units()[index].id().map(str::to_string);

    let mut replacement = host.units()[remote_index].clone();
    replacement.set_name(local_name);
    // the stub's id wins over the remote id
    if let Some(id) = local_id {
        replacement.set_id(id);
    }

    let term_references: Vec<String> = replacement
        .terms()
        .iter()
        .map(|term| term.reference().to_string())
        .collect();

    model.units_mut()[index] = replacement;
    model.clear_units_import(index);
    copy_referenced_units(model, &host, term_references);
}

#[cfg(test)]
mod tests {
    use seam_model::{Prefix, Units};

    use super::*;
    use crate::resolver::resolve_imports;
    use crate::test::{construct, TestModelLoader};

    fn resolved(mut model: Model, loader: &TestModelLoader) -> Model {
        resolve_imports(&mut model, "", loader).expect("fixture models resolve cleanly");
        model
    }

    #[test]
    fn flatten_with_unresolved_imports_changes_nothing() {
        let mut model = construct::model_with_component_stub("main", "cell", "remote.sm", "cell");
        let before = model.clone();

        let report = flatten(&mut model);

        assert!(!report.was_performed());
        assert_eq!(model, before);
        assert!(model.has_unresolved_imports());
    }

    #[test]
    fn flatten_without_imports_is_trivially_complete() {
        let mut model = construct::model_with_concrete_component("main", "cell", &["v"]);

        let report = flatten(&mut model);

        assert!(report.was_performed());
        assert!(report.dropped_equivalences().is_empty());
    }

    #[test]
    fn stubs_are_replaced_by_their_remote_definition() {
        let loader = TestModelLoader::new([("remote.sm", construct::neuron_model())]);
        let model = construct::model_with_component_stub("main", "cell", "remote.sm", "neuron");
        let mut model = resolved(model, &loader);

        let report = flatten(&mut model);

        assert!(report.was_performed());
        assert!(report.skipped_components().is_empty());

        let cell = model.root_component("cell").expect("the stub's name survives");
        let component = model.component(cell);
        assert!(!component.is_import());
        assert_eq!(component.math(), Some("dV/dt = (i_in - i_out) / Cm"));
        assert_eq!(component.children().len(), 1);
        assert!(model.variable_by_name(cell, "V").is_some());

        // no stub anywhere, no sources left behind
        assert!(
            model
                .components_preorder()
                .iter()
                .all(|id| !model.component(*id).is_import())
        );
        assert!(model.import_sources().is_empty());
        assert!(!model.has_unresolved_imports());
    }

    #[test]
    fn stub_id_wins_over_the_remote_id() {
        let mut remote = construct::model_with_concrete_component("remote", "cell", &["v"]);
        let remote_component = remote.root_component("cell").expect("just added");
        remote.component_mut(remote_component).set_id("remote_id");
        let loader = TestModelLoader::new([("remote.sm", remote)]);

        let mut model = Model::new("main");
        let stub = model.add_component("cell");
        model.set_component_import(stub, "remote.sm", "cell");
        model.component_mut(stub).set_id("local_id");
        let mut model = resolved(model, &loader);

        flatten(&mut model);

        assert_eq!(model.component(stub).id(), Some("local_id"));
    }

    #[test]
    fn remote_id_is_kept_when_the_stub_has_none() {
        let mut remote = construct::model_with_concrete_component("remote", "cell", &["v"]);
        let remote_component = remote.root_component("cell").expect("just added");
        remote.component_mut(remote_component).set_id("remote_id");
        let loader = TestModelLoader::new([("remote.sm", remote)]);

        let model = construct::model_with_component_stub("main", "cell", "remote.sm", "cell");
        let stub = model.root_component("cell").expect("just added");
        let mut model = resolved(model, &loader);

        flatten(&mut model);

        assert_eq!(model.component(stub).id(), Some("remote_id"));
    }

    #[test]
    fn dummy_equivalences_are_rehomed_onto_copied_variables() {
        let loader = TestModelLoader::new([(
            "remote.sm",
            construct::model_with_concrete_component("remote", "cell", &["V", "t"]),
        )]);

        let mut model = Model::new("main");
        let sibling = model.add_component("sibling");
        let w = model.add_variable(sibling, "W");
        let stub = model.add_component("cell");
        let dummy = model.add_variable(stub, "V");
        model.set_component_import(stub, "remote.sm", "cell");
        assert!(model.add_equivalence(dummy, w));
        let mut model = resolved(model, &loader);

        let report = flatten(&mut model);

        assert!(report.dropped_equivalences().is_empty());
        assert_eq!(model.equivalent_variable_count(w), 1);

        let rehomed = model
            .equivalent_variable(w, 0)
            .expect("W kept exactly one equivalent");
        assert_ne!(rehomed, dummy);
        assert_eq!(model.variable(rehomed).name(), "V");
        assert_eq!(model.variable(rehomed).owner(), stub);
    }

    #[test]
    fn unmatched_dummy_equivalences_are_dropped_and_reported() {
        let loader = TestModelLoader::new([(
            "remote.sm",
            construct::model_with_concrete_component("remote", "cell", &["V"]),
        )]);

        let mut model = Model::new("main");
        let sibling = model.add_component("sibling");
        let w = model.add_variable(sibling, "W");
        let stub = model.add_component("cell");
        let dummy = model.add_variable(stub, "no_such_variable");
        model.set_component_import(stub, "remote.sm", "cell");
        assert!(model.add_equivalence(dummy, w));
        let mut model = resolved(model, &loader);

        let report = flatten(&mut model);

        assert_eq!(model.equivalent_variable_count(w), 0);
        assert_eq!(report.dropped_equivalences().len(), 1);
        assert_eq!(report.dropped_equivalences()[0].component(), "cell");
        assert_eq!(
            report.dropped_equivalences()[0].variable(),
            "no_such_variable"
        );
    }

    #[test]
    fn nested_import_chains_bottom_out_at_the_concrete_definition() {
        // main -> middle.sm (cell is itself a stub) -> deep.sm (concrete)
        let loader = TestModelLoader::new([
            (
                "middle.sm",
                construct::model_with_component_stub("middle", "cell", "deep.sm", "cell"),
            ),
            (
                "deep.sm",
                construct::model_with_concrete_component("deep", "cell", &["V"]),
            ),
        ]);

        let model = construct::model_with_component_stub("main", "cell", "middle.sm", "cell");
        let mut model = resolved(model, &loader);

        let report = flatten(&mut model);

        assert!(report.skipped_components().is_empty());
        let cell = model.root_component("cell").expect("the stub's name survives");
        assert!(!model.component(cell).is_import());
        assert!(model.variable_by_name(cell, "V").is_some());
        assert!(!model.has_unresolved_imports());
    }

    #[test]
    fn equivalences_internal_to_the_remote_definition_survive() {
        let loader = TestModelLoader::new([("remote.sm", construct::neuron_model())]);
        let model = construct::model_with_component_stub("main", "cell", "remote.sm", "neuron");
        let mut model = resolved(model, &loader);

        flatten(&mut model);

        let cell = model.root_component("cell").expect("the stub's name survives");
        let gate = model.component(cell).children()[0];
        let v_outer = model
            .variable_by_name(cell, "V")
            .expect("V was copied onto the flattened component");
        let v_inner = model
            .variable_by_name(gate, "V")
            .expect("the nested gate has its own V");

        assert_eq!(model.equivalent_variable(v_outer, 0), Some(v_inner));
    }

    #[test]
    fn units_stubs_flatten_to_the_remote_definition() {
        let mut remote = Model::new("units_library");
        let mut mv = Units::new("mV");
        mv.add_unit("volt", Prefix::Milli, 1);
        remote.add_units(mv);
        let loader = TestModelLoader::new([("units.sm", remote)]);

        let mut model = Model::new("main");
        let index = model.add_units(Units::new("local_mV"));
        model.set_units_import(index, "units.sm", "mV");
        let mut model = resolved(model, &loader);

        let report = flatten(&mut model);

        assert!(report.skipped_units().is_empty());
        let units = &model.units()[index];
        assert_eq!(units.name(), "local_mV");
        assert!(!units.is_import());
        assert_eq!(units.terms().len(), 1);
        assert_eq!(units.terms()[0].reference(), "volt");
        assert_eq!(units.terms()[0].prefix(), Prefix::Milli);
    }

    #[test]
    fn units_referenced_by_copied_variables_are_carried_over() {
        let loader = TestModelLoader::new([("remote.sm", construct::neuron_model())]);
        let model = construct::model_with_component_stub("main", "cell", "remote.sm", "neuron");
        let mut model = resolved(model, &loader);

        flatten(&mut model);

        // `neuron`'s V is expressed in mV, defined in the remote model, and
        // mV's own term references pull nothing further
        let mv = model
            .units_by_name("mV")
            .expect("the mV definition was copied over");
        assert_eq!(model.units()[mv].terms()[0].reference(), "volt");
    }

    #[test]
    fn flattening_twice_is_harmless() {
        let loader = TestModelLoader::new([("remote.sm", construct::neuron_model())]);
        let model = construct::model_with_component_stub("main", "cell", "remote.sm", "neuron");
        let mut model = resolved(model, &loader);

        flatten(&mut model);
        let after_first = model.clone();
        let report = flatten(&mut model);

        assert!(report.was_performed());
        assert_eq!(model, after_first);
    }
}
