//! Variables, the typed quantities owned by components.

use crate::entity::Entity;
use crate::ids::ComponentId;

/// The declared visibility of a variable across component boundaries.
///
/// The interface type governs which equivalence connections are legal for
/// the variable: `Public` exposes it to siblings and the parent, `Private`
/// to child components, and `PublicAndPrivate` to both. Checking that an
/// equivalence network respects these declarations is a validation concern,
/// not enforced at mutation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterfaceType {
    /// The variable is not visible outside its component.
    #[default]
    None,
    /// The variable is visible to the parent and sibling components.
    Public,
    /// The variable is visible to child components.
    Private,
    /// The variable is visible in both directions.
    PublicAndPrivate,
}

impl InterfaceType {
    /// Returns the canonical textual form of this interface type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Public => "public",
            Self::Private => "private",
            Self::PublicAndPrivate => "public_and_private",
        }
    }

    /// Parses the canonical textual form of an interface type.
    ///
    /// # Returns
    ///
    /// Returns `Some(interface_type)` for one of the four canonical forms,
    /// or `None` for any other string.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "public_and_private" => Some(Self::PublicAndPrivate),
            _ => None,
        }
    }
}

/// The initial value of a variable.
///
/// A variable may be initialized with a numeric literal, with the name of a
/// constant, or by reference to another variable whose value it adopts.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialValue {
    /// A numeric literal.
    Literal(f64),
    /// The name of a constant.
    Constant(String),
    /// The name of another variable whose value is adopted.
    Reference(String),
}

/// A named quantity owned by exactly one component.
///
/// Variables reference their units by name, carry an interface type and an
/// optional initial value, and participate in the model's equivalence
/// network. The equivalence edges themselves are stored centrally on the
/// owning [`crate::Model`], so two variables are connected by a single
/// record regardless of which side the connection was added from.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    id: Option<String>,
    owner: ComponentId,
    units: Option<String>,
    interface: InterfaceType,
    initial_value: Option<InitialValue>,
}

impl Variable {
    pub(crate) fn new(name: impl Into<String>, owner: ComponentId) -> Self {
        Self {
            name: name.into(),
            id: None,
            owner,
            units: None,
            interface: InterfaceType::default(),
            initial_value: None,
        }
    }

    /// Returns the name of this variable.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames this variable.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the component that owns this variable.
    #[must_use]
    pub const fn owner(&self) -> ComponentId {
        self.owner
    }

    /// Returns the name of the units this variable is expressed in.
    #[must_use]
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Sets the units of this variable, by name.
    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = Some(units.into());
    }

    /// Removes the units reference of this variable.
    pub fn remove_units(&mut self) {
        self.units = None;
    }

    /// Returns the interface type of this variable.
    #[must_use]
    pub const fn interface_type(&self) -> InterfaceType {
        self.interface
    }

    /// Sets the interface type of this variable.
    pub fn set_interface_type(&mut self, interface: InterfaceType) {
        self.interface = interface;
    }

    /// Returns the initial value of this variable, if one is set.
    #[must_use]
    pub const fn initial_value(&self) -> Option<&InitialValue> {
        self.initial_value.as_ref()
    }

    /// Sets the initial value of this variable.
    pub fn set_initial_value(&mut self, value: InitialValue) {
        self.initial_value = Some(value);
    }

    /// Removes the initial value of this variable.
    pub fn remove_initial_value(&mut self) {
        self.initial_value = None;
    }
}

impl Entity for Variable {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_type_round_trips_through_names() {
        for interface in [
            InterfaceType::None,
            InterfaceType::Public,
            InterfaceType::Private,
            InterfaceType::PublicAndPrivate,
        ] {
            assert_eq!(InterfaceType::from_name(interface.as_str()), Some(interface));
        }
    }

    #[test]
    fn interface_type_rejects_unknown_names() {
        assert_eq!(InterfaceType::from_name("protected"), None);
    }
}
