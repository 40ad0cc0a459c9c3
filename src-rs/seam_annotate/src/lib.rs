//! Identifier dictionary and annotation tooling for Seam models.
//!
//! The [`Annotator`] maintains a bidirectional dictionary between identifier
//! strings and the identifiable items of one attached model: components and
//! their encapsulation references, variables, units and their terms, import
//! sources, resets and their value and test sub-parts, equivalence edges
//! (connection and mapping), the encapsulation marker, and the model
//! itself.
//!
//! Identifiers carry no uniqueness guarantee at the entity level. The
//! annotator is where duplication becomes observable ([`Annotator::duplicate_ids`],
//! [`Annotator::is_unique`]) and repairable ([`Annotator::assign_id`] and
//! the bulk assignment calls, which mint tokens that are re-checked against
//! the live dictionary so a fresh identifier is never a duplicate, even
//! transiently).
//!
//! The annotator is stateful relative to one attached model. Attaching a
//! model with [`Annotator::set_model`] rebuilds the dictionary from
//! scratch; it never merges with a previous attachment. Mutating calls take
//! the model explicitly and keep the dictionary in step with it.

use indexmap::IndexMap;
use rand::Rng;

use seam_model::{ComponentId, Model, VariableId};

mod item;
mod walk;

pub use item::{AnyItem, ItemKind};

/// A bidirectional dictionary between identifier strings and model items.
///
/// See the crate documentation for an overview. All lookup calls answer
/// from the dictionary built at the last attachment or mutation; structural
/// changes made to the model behind the annotator's back are not observed
/// until [`Annotator::set_model`] is called again.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    entries: Vec<(String, AnyItem)>,
    index: IndexMap<String, Vec<AnyItem>>,
}

impl Annotator {
    /// Creates an annotator with no model attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `model`, rebuilding the dictionary from scratch.
    pub fn set_model(&mut self, model: &Model) {
        self.rebuild(model);
    }

    fn rebuild(&mut self, model: &Model) {
        self.entries.clear();
        self.index.clear();

        for item in walk::discover(model) {
            if let Some(id) = walk::item_id(model, item) {
                self.entries.push((id.clone(), item));
                self.index.entry(id).or_default().push(item);
            }
        }
    }

    /// Returns every (identifier, item) pair, in discovery order.
    ///
    /// Items with no identifier are excluded. An identifier carried by
    /// several items appears once per occurrence.
    #[must_use]
    pub fn dictionary(&self) -> &[(String, AnyItem)] {
        &self.entries
    }

    /// Returns every item carrying `id`, in discovery order.
    #[must_use]
    pub fn items(&self, id: &str) -> &[AnyItem] {
        self.index.get(id).map_or(&[], Vec::as_slice)
    }

    /// Returns the single item carrying `id`.
    ///
    /// Returns `None` if the identifier is absent or ambiguous (carried by
    /// more than one item).
    #[must_use]
    pub fn item(&self, id: &str) -> Option<AnyItem> {
        match self.items(id) {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Returns true if exactly one item carries `id`.
    #[must_use]
    pub fn is_unique(&self, id: &str) -> bool {
        self.items(id).len() == 1
    }

    /// Returns the identifiers carried by two or more items, in first
    /// discovery order.
    ///
    /// A model in this state is legal to observe but is not resolvable;
    /// downstream validation is expected to reject it.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<&str> {
        self.index
            .iter()
            .filter(|(_, items)| items.len() > 1)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Returns true if `id` uniquely names the model itself.
    #[must_use]
    pub fn is_model_id(&self, id: &str) -> bool {
        self.item(id) == Some(AnyItem::Model)
    }

    /// Returns true if `id` uniquely names the model's encapsulation marker.
    #[must_use]
    pub fn is_encapsulation_id(&self, id: &str) -> bool {
        self.item(id) == Some(AnyItem::Encapsulation)
    }

    /// Returns the component carrying `id`, if `id` uniquely names one.
    #[must_use]
    pub fn component(&self, id: &str) -> Option<ComponentId> {
        if let Some(AnyItem::Component(component)) = self.item(id) {
            Some(component)
        } else {
            None
        }
    }

    /// Returns the component whose encapsulation reference carries `id`, if
    /// `id` uniquely names one.
    #[must_use]
    pub fn component_ref(&self, id: &str) -> Option<ComponentId> {
        if let Some(AnyItem::ComponentRef(component)) = self.item(id) {
            Some(component)
        } else {
            None
        }
    }

    /// Returns the variable carrying `id`, if `id` uniquely names one.
    #[must_use]
    pub fn variable(&self, id: &str) -> Option<VariableId> {
        if let Some(AnyItem::Variable(variable)) = self.item(id) {
            Some(variable)
        } else {
            None
        }
    }

    /// Returns the index of the units definition carrying `id`, if `id`
    /// uniquely names one.
    #[must_use]
    pub fn units(&self, id: &str) -> Option<usize> {
        if let Some(AnyItem::Units(units)) = self.item(id) {
            Some(units)
        } else {
            None
        }
    }

    /// Returns the (units index, term index) pair of the unit term carrying
    /// `id`, if `id` uniquely names one.
    #[must_use]
    pub fn unit(&self, id: &str) -> Option<(usize, usize)> {
        if let Some(AnyItem::UnitTerm { units, term }) = self.item(id) {
            Some((units, term))
        } else {
            None
        }
    }

    /// Returns the registry index of the import source carrying `id`, if
    /// `id` uniquely names one.
    #[must_use]
    pub fn import_source(&self, id: &str) -> Option<usize> {
        if let Some(AnyItem::ImportSource(index)) = self.item(id) {
            Some(index)
        } else {
            None
        }
    }

    /// Returns the (component, reset index) pair of the reset carrying
    /// `id`, if `id` uniquely names one.
    #[must_use]
    pub fn reset(&self, id: &str) -> Option<(ComponentId, usize)> {
        if let Some(AnyItem::Reset { component, reset }) = self.item(id) {
            Some((component, reset))
        } else {
            None
        }
    }

    /// Returns the (component, reset index) pair of the reset whose
    /// reset-value sub-part carries `id`, if `id` uniquely names one.
    #[must_use]
    pub fn reset_value(&self, id: &str) -> Option<(ComponentId, usize)> {
        if let Some(AnyItem::ResetValue { component, reset }) = self.item(id) {
            Some((component, reset))
        } else {
            None
        }
    }

    /// Returns the (component, reset index) pair of the reset whose
    /// test-value sub-part carries `id`, if `id` uniquely names one.
    #[must_use]
    pub fn test_value(&self, id: &str) -> Option<(ComponentId, usize)> {
        if let Some(AnyItem::TestValue { component, reset }) = self.item(id) {
            Some((component, reset))
        } else {
            None
        }
    }

    /// Returns the equivalence-edge index of the connection carrying `id`,
    /// if `id` uniquely names one.
    #[must_use]
    pub fn connection(&self, id: &str) -> Option<usize> {
        if let Some(AnyItem::Connection(edge)) = self.item(id) {
            Some(edge)
        } else {
            None
        }
    }

    /// Returns the equivalence-edge index of the variable mapping carrying
    /// `id`, if `id` uniquely names one.
    #[must_use]
    pub fn map_variables(&self, id: &str) -> Option<usize> {
        if let Some(AnyItem::MapVariables(edge)) = self.item(id) {
            Some(edge)
        } else {
            None
        }
    }

    /// Mints a fresh identifier and assigns it to exactly the given item
    /// occurrence, replacing any identifier it carried.
    ///
    /// Calling this once per member of a duplicated-identifier group
    /// de-duplicates the group one occurrence at a time. Returns `None`,
    /// changing nothing, if the item's indices do not exist in `model`.
    pub fn assign_id(&mut self, model: &mut Model, item: AnyItem) -> Option<String> {
        let fresh = self.mint_id();
        if !walk::set_item_id(model, item, &fresh) {
            return None;
        }
        self.rebuild(model);
        Some(fresh)
    }

    /// Assigns fresh identifiers to every item of the given kind that has
    /// none.
    ///
    /// Items that already carry an identifier, even a duplicated one, are
    /// left untouched.
    pub fn assign_ids(&mut self, model: &mut Model, kind: ItemKind) {
        self.assign_where(model, |item| item.kind() == kind);
    }

    /// Assigns fresh identifiers to every identifiable item that has none.
    ///
    /// Items that already carry an identifier, even a duplicated one, are
    /// left untouched.
    pub fn assign_all_ids(&mut self, model: &mut Model) {
        self.assign_where(model, |_| true);
    }

    fn assign_where(&mut self, model: &mut Model, wanted: impl Fn(AnyItem) -> bool) {
        for item in walk::discover(model) {
            if wanted(item) && walk::item_id(model, item).is_none() {
                let fresh = self.mint_id();
                walk::set_item_id(model, item, &fresh);
                // keep the index live so further minting in this loop sees
                // the identifier we just handed out
                self.index.entry(fresh).or_default().push(item);
            }
        }
        self.rebuild(model);
    }

    /// Removes every identifier from every reachable item; the dictionary
    /// becomes empty.
    pub fn clear_all_ids(&mut self, model: &mut Model) {
        for item in walk::discover(model) {
            walk::clear_item_id(model, item);
        }
        self.entries.clear();
        self.index.clear();
    }

    /// Mints an identifier that is absent from the live dictionary.
    ///
    /// Tokens are random so that independently annotated models rarely
    /// collide, and every candidate is re-checked against the dictionary so
    /// minting never produces a duplicate, even transiently.
    fn mint_id(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let candidate = format!("{:06x}", rng.random_range(0..0x0100_0000_u32));
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}
