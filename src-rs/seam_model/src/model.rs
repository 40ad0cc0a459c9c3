//! The model root: component and variable arenas, model-scope units, the
//! equivalence network, and the import-source registry.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use seam_error::{AsSeamError, Context};

use crate::component::Component;
use crate::entity::{Entity, Parent};
use crate::equivalence::Equivalence;
use crate::ids::{ComponentId, VariableId};
use crate::import::{ImportKind, ImportRef, ImportSource};
use crate::units::Units;
use crate::variable::Variable;

/// A mutation that would make a component a descendant of itself.
///
/// Raised by [`Model::reparent_component`]; the model is left unchanged when
/// this error is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralCycleError {
    component: String,
    target: String,
}

impl StructuralCycleError {
    /// Returns the name of the component that was being re-homed.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Returns the name of the rejected destination component.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for StructuralCycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot nest component `{component}` under `{target}`: the destination is the component itself or one of its descendants",
            component = self.component,
            target = self.target,
        )
    }
}

impl AsSeamError for StructuralCycleError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        vec![Context::Help(
            "move the component somewhere outside of its own subtree".to_string(),
        )]
    }
}

/// The root container of a Seam model.
///
/// A model owns its component tree, every variable on it, the model-scope
/// units definitions, the equivalence network connecting variables, and a
/// registry of import sources deduplicated by URL. Components and variables
/// live in arenas and are addressed by [`ComponentId`] and [`VariableId`];
/// arena slots stay valid for the model's lifetime, and entities unlinked
/// from the tree simply become unreachable.
///
/// # Panics
///
/// Arena accessors panic when handed an id that was not produced by this
/// model. That is an internal-invariant violation (a programmer error), not
/// an anticipated failure mode, and is therefore not surfaced as a
/// `Result`.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    id: Option<String>,
    encapsulation_id: Option<String>,
    components: Vec<Component>,
    variables: Vec<Variable>,
    roots: Vec<ComponentId>,
    units: Vec<Units>,
    imports: IndexMap<String, ImportSource>,
    equivalences: Vec<Equivalence>,
}

impl Model {
    /// Creates a new, empty model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            encapsulation_id: None,
            components: vec![],
            variables: vec![],
            roots: vec![],
            units: vec![],
            imports: IndexMap::new(),
            equivalences: vec![],
        }
    }

    /// Returns the name of this model.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames this model.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the identifier of this model's encapsulation marker.
    #[must_use]
    pub fn encapsulation_id(&self) -> Option<&str> {
        self.encapsulation_id.as_deref()
    }

    /// Sets the identifier of this model's encapsulation marker.
    pub fn set_encapsulation_id(&mut self, id: impl Into<String>) {
        self.encapsulation_id = Some(id.into());
    }

    /// Removes the identifier of this model's encapsulation marker.
    pub fn remove_encapsulation_id(&mut self) {
        self.encapsulation_id = None;
    }

    // ---- components ----

    /// Adds a new top-level component and returns its id.
    pub fn add_component(&mut self, name: impl Into<String>) -> ComponentId {
        let id = self.alloc_component(name, Parent::Model);
        self.roots.push(id);
        id
    }

    /// Adds a new component nested under `parent` and returns its id.
    pub fn add_child_component(
        &mut self,
        parent: ComponentId,
        name: impl Into<String>,
    ) -> ComponentId {
        let id = self.alloc_component(name, Parent::Component(parent));
        self.components[parent.index()].push_child(id);
        id
    }

    fn alloc_component(&mut self, name: impl Into<String>, parent: Parent) -> ComponentId {
        let id = ComponentId::from_index(self.components.len());
        self.components.push(Component::new(name, parent));
        id
    }

    /// Returns the component behind `id`.
    #[must_use]
    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.index()]
    }

    /// Returns the component behind `id`, mutably.
    #[must_use]
    pub fn component_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.components[id.index()]
    }

    /// Returns the ids of the top-level components, in insertion order.
    #[must_use]
    pub fn root_components(&self) -> &[ComponentId] {
        &self.roots
    }

    /// Returns the first top-level component with the given name.
    #[must_use]
    pub fn root_component(&self, name: &str) -> Option<ComponentId> {
        self.roots
            .iter()
            .copied()
            .find(|id| self.component(*id).name() == name)
    }

    /// Returns the first component anywhere in the tree with the given name,
    /// searching in pre-order.
    #[must_use]
    pub fn find_component(&self, name: &str) -> Option<ComponentId> {
        self.components_preorder()
            .into_iter()
            .find(|id| self.component(*id).name() == name)
    }

    /// Returns every reachable component id in pre-order.
    #[must_use]
    pub fn components_preorder(&self) -> Vec<ComponentId> {
        let mut order = vec![];
        let mut stack: Vec<ComponentId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.component(id).children().iter().rev());
        }
        order
    }

    /// Moves a component under a new parent.
    ///
    /// The old parent's child list, the new parent's child list, and the
    /// component's parent link are rewritten together.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralCycleError`] and leaves the model unchanged if
    /// the destination is the component itself or one of its descendants.
    pub fn reparent_component(
        &mut self,
        component: ComponentId,
        new_parent: Parent,
    ) -> Result<(), StructuralCycleError> {
        if let Parent::Component(target) = new_parent {
            if target == component || self.has_ancestor(target, component) {
                return Err(StructuralCycleError {
                    component: self.component(component).name().to_string(),
                    target: self.component(target).name().to_string(),
                });
            }
        }

        match self.component(component).parent() {
            Parent::Model => self.roots.retain(|existing| *existing != component),
            Parent::Component(old_parent) => {
                self.components[old_parent.index()].remove_child(component);
            }
        }

        match new_parent {
            Parent::Model => self.roots.push(component),
            Parent::Component(parent) => self.components[parent.index()].push_child(component),
        }
        self.components[component.index()].set_parent(new_parent);

        Ok(())
    }

    fn has_ancestor(&self, node: ComponentId, ancestor: ComponentId) -> bool {
        let mut current = node;
        loop {
            match self.component(current).parent() {
                Parent::Model => return false,
                Parent::Component(parent) if parent == ancestor => return true,
                Parent::Component(parent) => current = parent,
            }
        }
    }

    // ---- variables ----

    /// Adds a new variable to `component` and returns its id.
    pub fn add_variable(&mut self, component: ComponentId, name: impl Into<String>) -> VariableId {
        let id = VariableId::from_index(self.variables.len());
        self.variables.push(Variable::new(name, component));
        self.components[component.index()].push_variable(id);
        id
    }

    /// Returns the variable behind `id`.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    /// Returns the variable behind `id`, mutably.
    #[must_use]
    pub fn variable_mut(&mut self, id: VariableId) -> &mut Variable {
        &mut self.variables[id.index()]
    }

    /// Returns the first variable on `component` with the given name.
    #[must_use]
    pub fn variable_by_name(&self, component: ComponentId, name: &str) -> Option<VariableId> {
        self.component(component)
            .variables()
            .iter()
            .copied()
            .find(|id| self.variable(*id).name() == name)
    }

    /// Unlinks every variable from `component` and returns their ids.
    ///
    /// The variables stay in the arena (their ids remain valid for lookups)
    /// but are no longer reachable from the tree. Equivalence edges that
    /// reference them are left in place; re-homing or dropping those edges
    /// is the caller's responsibility.
    pub fn detach_component_variables(&mut self, component: ComponentId) -> Vec<VariableId> {
        self.components[component.index()].take_variables()
    }

    // ---- units ----

    /// Adds a model-scope units definition and returns its index.
    pub fn add_units(&mut self, units: Units) -> usize {
        self.units.push(units);
        self.units.len() - 1
    }

    /// Returns the model-scope units definitions, in insertion order.
    #[must_use]
    pub fn units(&self) -> &[Units] {
        &self.units
    }

    /// Returns the model-scope units definitions, mutably.
    #[must_use]
    pub fn units_mut(&mut self) -> &mut [Units] {
        &mut self.units
    }

    /// Returns the index of the first units definition with the given name.
    #[must_use]
    pub fn units_by_name(&self, name: &str) -> Option<usize> {
        self.units.iter().position(|units| units.name() == name)
    }

    // ---- imports ----

    /// Marks `component` as an import stub referencing `reference` in the
    /// file at `url`, registering the URL in the import-source registry.
    pub fn set_component_import(
        &mut self,
        component: ComponentId,
        url: impl Into<String>,
        reference: impl Into<String>,
    ) {
        let import = ImportRef::new(url, reference);
        self.register_import_source(import.url().to_string());
        self.components[component.index()].set_import(import);
    }

    /// Clears the import marker of `component`, returning it.
    ///
    /// The registry entry for the URL is kept; other stubs may share it.
    pub fn clear_component_import(&mut self, component: ComponentId) -> Option<ImportRef> {
        self.components[component.index()].take_import()
    }

    /// Marks the units definition at `index` as an import stub referencing
    /// `reference` in the file at `url`, registering the URL.
    pub fn set_units_import(
        &mut self,
        index: usize,
        url: impl Into<String>,
        reference: impl Into<String>,
    ) {
        let import = ImportRef::new(url, reference);
        self.register_import_source(import.url().to_string());
        self.units[index].set_import(import);
    }

    /// Clears the import marker of the units definition at `index`,
    /// returning it.
    pub fn clear_units_import(&mut self, index: usize) -> Option<ImportRef> {
        self.units[index].take_import()
    }

    /// Returns the import source registered for `url`, creating an
    /// unresolved entry if none exists yet.
    pub fn register_import_source(&mut self, url: impl Into<String>) -> &mut ImportSource {
        let url = url.into();
        self.imports
            .entry(url.clone())
            .or_insert_with(|| ImportSource::new(url))
    }

    /// Returns the import source registered for `url`.
    #[must_use]
    pub fn import_source(&self, url: &str) -> Option<&ImportSource> {
        self.imports.get(url)
    }

    /// Returns the import source registered for `url`, mutably.
    #[must_use]
    pub fn import_source_mut(&mut self, url: &str) -> Option<&mut ImportSource> {
        self.imports.get_mut(url)
    }

    /// Returns the import-source registry, keyed by URL in first-reference
    /// order.
    #[must_use]
    pub const fn import_sources(&self) -> &IndexMap<String, ImportSource> {
        &self.imports
    }

    /// Empties the import-source registry.
    pub fn clear_import_sources(&mut self) {
        self.imports.clear();
    }

    /// Collects every import reference carried by a component or units stub
    /// reachable in this model, components first in pre-order, then units in
    /// insertion order.
    #[must_use]
    pub fn import_references(&self) -> Vec<(ImportRef, ImportKind)> {
        let mut references = vec![];
        for id in self.components_preorder() {
            if let Some(import) = self.component(id).import() {
                references.push((import.clone(), ImportKind::Component));
            }
        }
        for units in &self.units {
            if let Some(import) = units.import() {
                references.push((import.clone(), ImportKind::Units));
            }
        }
        references
    }

    /// Returns true if any reachable import stub lacks a resolved source,
    /// or if any resolved source's model itself has unresolved imports.
    ///
    /// This is a derived property, recomputed on every call. Resolution
    /// rejects cyclic import graphs, so the recursion into attached models
    /// terminates.
    #[must_use]
    pub fn has_unresolved_imports(&self) -> bool {
        self.import_references()
            .iter()
            .any(|(import, _)| match self.imports.get(import.url()) {
                Some(source) => match source.model() {
                    Some(remote) => remote.has_unresolved_imports(),
                    None => true,
                },
                None => true,
            })
    }

    // ---- equivalences ----

    /// Connects two variables with an equivalence edge.
    ///
    /// Both ids must come from this model's arena. Returns `false`, leaving
    /// the network untouched, if the two ids are the same variable or the
    /// pair is already connected.
    pub fn add_equivalence(&mut self, a: VariableId, b: VariableId) -> bool {
        if a == b {
            return false;
        }
        if self.equivalences.iter().any(|edge| edge.connects(a, b)) {
            return false;
        }
        self.equivalences.push(Equivalence::new(a, b));
        true
    }

    /// Disconnects two variables.
    ///
    /// Returns `false` if no edge connects the pair.
    pub fn remove_equivalence(&mut self, a: VariableId, b: VariableId) -> bool {
        match self.equivalences.iter().position(|edge| edge.connects(a, b)) {
            Some(index) => {
                self.equivalences.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the number of variables equivalent to `variable`.
    #[must_use]
    pub fn equivalent_variable_count(&self, variable: VariableId) -> usize {
        self.equivalences
            .iter()
            .filter(|edge| edge.involves(variable))
            .count()
    }

    /// Returns the `index`-th variable equivalent to `variable`, in edge
    /// insertion order.
    #[must_use]
    pub fn equivalent_variable(&self, variable: VariableId, index: usize) -> Option<VariableId> {
        self.equivalences
            .iter()
            .filter_map(|edge| edge.other(variable))
            .nth(index)
    }

    /// Returns every equivalence edge, in insertion order.
    #[must_use]
    pub fn equivalences(&self) -> &[Equivalence] {
        &self.equivalences
    }

    /// Returns every equivalence edge, mutably.
    ///
    /// Endpoints are not mutable through this slice, only the identifiers
    /// carried by each edge, so the no-self-loop and no-duplicate
    /// invariants cannot be broken here.
    #[must_use]
    pub fn equivalences_mut(&mut self) -> &mut [Equivalence] {
        &mut self.equivalences
    }

    /// Returns the edge connecting the given unordered pair, if any.
    #[must_use]
    pub fn equivalence(&self, a: VariableId, b: VariableId) -> Option<&Equivalence> {
        self.equivalences.iter().find(|edge| edge.connects(a, b))
    }

    /// Returns the edge connecting the given unordered pair, mutably.
    #[must_use]
    pub fn equivalence_mut(&mut self, a: VariableId, b: VariableId) -> Option<&mut Equivalence> {
        self.equivalences
            .iter_mut()
            .find(|edge| edge.connects(a, b))
    }

    /// Rewrites equivalence endpoints according to `remap` and returns the
    /// edges that had to be dropped.
    ///
    /// For every edge endpoint present in `remap` as `Some(new)`, the
    /// endpoint is rewritten to `new`; an endpoint mapped to `None` has no
    /// replacement, and its whole edge is dropped and returned. Endpoints
    /// absent from `remap` are left alone. Edges that collapse onto
    /// themselves or duplicate a surviving edge after rewriting are
    /// redundant and discarded without being reported.
    pub fn rehome_equivalences(
        &mut self,
        remap: &HashMap<VariableId, Option<VariableId>>,
    ) -> Vec<Equivalence> {
        let mut dropped = vec![];
        let mut kept: Vec<Equivalence> = vec![];

        for mut edge in std::mem::take(&mut self.equivalences) {
            let (a, b) = edge.variables();
            let new_a = remap.get(&a).copied().unwrap_or(Some(a));
            let new_b = remap.get(&b).copied().unwrap_or(Some(b));

            match (new_a, new_b) {
                (Some(a), Some(b)) => {
                    if a == b || kept.iter().any(|existing| existing.connects(a, b)) {
                        continue;
                    }
                    edge.set_variables(a, b);
                    kept.push(edge);
                }
                _ => dropped.push(edge),
            }
        }

        self.equivalences = kept;
        dropped
    }
}

impl Entity for Model {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    fn remove_id(&mut self) {
        self.id = None;
    }
}
