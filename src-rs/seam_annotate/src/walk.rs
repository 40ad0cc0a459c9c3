//! Discovery of identifiable items and identifier access behind one seam.
//!
//! The discovery walk is the single source of truth for which items exist
//! and in which order: model first, then import sources in registry order,
//! units with their terms, components in pre-order with their variables and
//! resets, equivalence edges, and the encapsulation marker last. Every
//! annotator operation that enumerates "all items" goes through this walk,
//! so discovery order is deterministic across the whole crate.

use seam_model::{Entity, Model};

use crate::item::AnyItem;

pub(crate) fn discover(model: &Model) -> Vec<AnyItem> {
    let mut items = vec![AnyItem::Model];

    for index in 0..model.import_sources().len() {
        items.push(AnyItem::ImportSource(index));
    }

    for (units_index, units) in model.units().iter().enumerate() {
        items.push(AnyItem::Units(units_index));
        for term in 0..units.terms().len() {
            items.push(AnyItem::UnitTerm {
                units: units_index,
                term,
            });
        }
    }

    for component in model.components_preorder() {
        items.push(AnyItem::Component(component));
        if participates_in_encapsulation(model, component) {
            items.push(AnyItem::ComponentRef(component));
        }
        for &variable in model.component(component).variables() {
            items.push(AnyItem::Variable(variable));
        }
        for (reset_index, reset) in model.component(component).resets().iter().enumerate() {
            items.push(AnyItem::Reset {
                component,
                reset: reset_index,
            });
            if reset.reset_value().is_some() {
                items.push(AnyItem::ResetValue {
                    component,
                    reset: reset_index,
                });
            }
            if reset.test_value().is_some() {
                items.push(AnyItem::TestValue {
                    component,
                    reset: reset_index,
                });
            }
        }
    }

    for edge in 0..model.equivalences().len() {
        items.push(AnyItem::Connection(edge));
        items.push(AnyItem::MapVariables(edge));
    }

    if has_encapsulation(model) {
        items.push(AnyItem::Encapsulation);
    }

    items
}

/// A component is part of the encapsulation hierarchy if it nests children
/// or is itself nested; a flat model has no hierarchy to identify.
fn participates_in_encapsulation(model: &Model, component: seam_model::ComponentId) -> bool {
    let component = model.component(component);
    !component.children().is_empty() || component.has_component_parent()
}

fn has_encapsulation(model: &Model) -> bool {
    model.encapsulation_id().is_some()
        || model
            .components_preorder()
            .iter()
            .any(|id| !model.component(*id).children().is_empty())
}

/// Returns the identifier currently carried by `item`, if any.
///
/// Items whose indices no longer exist in the model report no identifier.
pub(crate) fn item_id(model: &Model, item: AnyItem) -> Option<String> {
    let id = match item {
        AnyItem::Model => model.id(),
        AnyItem::Component(component) => model.component(component).id(),
        AnyItem::ComponentRef(component) => model.component(component).encapsulation_id(),
        AnyItem::Variable(variable) => model.variable(variable).id(),
        AnyItem::Units(units) => model.units().get(units)?.id(),
        AnyItem::UnitTerm { units, term } => model.units().get(units)?.terms().get(term)?.id(),
        AnyItem::ImportSource(index) => model.import_sources().get_index(index)?.1.id(),
        AnyItem::Reset { component, reset } => model.component(component).resets().get(reset)?.id(),
        AnyItem::ResetValue { component, reset } => model
            .component(component)
            .resets()
            .get(reset)?
            .reset_value_id(),
        AnyItem::TestValue { component, reset } => model
            .component(component)
            .resets()
            .get(reset)?
            .test_value_id(),
        AnyItem::Connection(edge) => model.equivalences().get(edge)?.connection_id(),
        AnyItem::MapVariables(edge) => model.equivalences().get(edge)?.mapping_id(),
        AnyItem::Encapsulation => model.encapsulation_id(),
    };
    id.map(str::to_string)
}

/// Assigns `id` to `item`. Returns `false` if the item's indices no longer
/// exist in the model.
pub(crate) fn set_item_id(model: &mut Model, item: AnyItem, id: &str) -> bool {
    match item {
        AnyItem::Model => model.set_id(id),
        AnyItem::Component(component) => model.component_mut(component).set_id(id),
        AnyItem::ComponentRef(component) => {
            model.component_mut(component).set_encapsulation_id(id);
        }
        AnyItem::Variable(variable) => model.variable_mut(variable).set_id(id),
        AnyItem::Units(units) => match model.units_mut().get_mut(units) {
            Some(units) => units.set_id(id),
            None => return false,
        },
        AnyItem::UnitTerm { units, term } => {
            match model
                .units_mut()
                .get_mut(units)
                .and_then(|units| units.terms_mut().get_mut(term))
            {
                Some(term) => term.set_id(id),
                None => return false,
            }
        }
        AnyItem::ImportSource(index) => {
            let Some(url) = model
                .import_sources()
                .get_index(index)
                .map(|(url, _)| url.clone())
            else {
                return false;
            };
            match model.import_source_mut(&url) {
                Some(source) => source.set_id(id),
                None => return false,
            }
        }
        AnyItem::Reset { component, reset } => {
            match model.component_mut(component).resets_mut().get_mut(reset) {
                Some(reset) => reset.set_id(id),
                None => return false,
            }
        }
        AnyItem::ResetValue { component, reset } => {
            match model.component_mut(component).resets_mut().get_mut(reset) {
                Some(reset) => reset.set_reset_value_id(id),
                None => return false,
            }
        }
        AnyItem::TestValue { component, reset } => {
            match model.component_mut(component).resets_mut().get_mut(reset) {
                Some(reset) => reset.set_test_value_id(id),
                None => return false,
            }
        }
        AnyItem::Connection(edge) => match model.equivalences_mut().get_mut(edge) {
            Some(edge) => edge.set_connection_id(id),
            None => return false,
        },
        AnyItem::MapVariables(edge) => match model.equivalences_mut().get_mut(edge) {
            Some(edge) => edge.set_mapping_id(id),
            None => return false,
        },
        AnyItem::Encapsulation => model.set_encapsulation_id(id),
    }
    true
}

/// Removes the identifier carried by `item`, if any.
pub(crate) fn clear_item_id(model: &mut Model, item: AnyItem) {
    match item {
        AnyItem::Model => model.remove_id(),
        AnyItem::Component(component) => model.component_mut(component).remove_id(),
        AnyItem::ComponentRef(component) => {
            model.component_mut(component).remove_encapsulation_id();
        }
        AnyItem::Variable(variable) => model.variable_mut(variable).remove_id(),
        AnyItem::Units(units) => {
            if let Some(units) = model.units_mut().get_mut(units) {
                units.remove_id();
            }
        }
        AnyItem::UnitTerm { units, term } => {
            if let Some(term) = model
                .units_mut()
                .get_mut(units)
                .and_then(|units| units.terms_mut().get_mut(term))
            {
                term.remove_id();
            }
        }
        AnyItem::ImportSource(index) => {
            let url = model
                .import_sources()
                .get_index(index)
                .map(|(url, _)| url.clone());
            if let Some(url) = url {
                if let Some(source) = model.import_source_mut(&url) {
                    source.remove_id();
                }
            }
        }
        AnyItem::Reset { component, reset } => {
            if let Some(reset) = model.component_mut(component).resets_mut().get_mut(reset) {
                reset.remove_id();
            }
        }
        AnyItem::ResetValue { component, reset } => {
            if let Some(reset) = model.component_mut(component).resets_mut().get_mut(reset) {
                reset.remove_reset_value_id();
            }
        }
        AnyItem::TestValue { component, reset } => {
            if let Some(reset) = model.component_mut(component).resets_mut().get_mut(reset) {
                reset.remove_test_value_id();
            }
        }
        AnyItem::Connection(edge) => {
            if let Some(edge) = model.equivalences_mut().get_mut(edge) {
                edge.remove_connection_id();
            }
        }
        AnyItem::MapVariables(edge) => {
            if let Some(edge) = model.equivalences_mut().get_mut(edge) {
                edge.remove_mapping_id();
            }
        }
        AnyItem::Encapsulation => model.remove_encapsulation_id(),
    }
}
