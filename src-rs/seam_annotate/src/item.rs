//! The closed set of identifiable item kinds.

use seam_model::{ComponentId, VariableId};

/// A handle to one identifiable item in a model.
///
/// The set of addressable kinds is fixed and known, so retrieval by
/// identifier is a closed sum type rather than a dynamic type check. Every
/// variant carries plain indices into the model it was discovered in;
/// handles stay cheap to copy and never borrow the model.
///
/// Handles are snapshots: they are valid for the model state they were
/// discovered in, and structural mutation of the model (beyond identifier
/// changes) invalidates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyItem {
    /// The model itself.
    Model,
    /// A component.
    Component(ComponentId),
    /// A component's reference in the encapsulation hierarchy.
    ComponentRef(ComponentId),
    /// A variable.
    Variable(VariableId),
    /// A model-scope units definition, by index.
    Units(usize),
    /// A single term of a units definition.
    UnitTerm {
        /// Index of the owning units definition
        units: usize,
        /// Index of the term within it
        term: usize,
    },
    /// An import source, by registry index.
    ImportSource(usize),
    /// A reset declared on a component.
    Reset {
        /// The component declaring the reset
        component: ComponentId,
        /// Index of the reset on that component
        reset: usize,
    },
    /// The reset-value sub-part of a reset.
    ResetValue {
        /// The component declaring the reset
        component: ComponentId,
        /// Index of the reset on that component
        reset: usize,
    },
    /// The test-value sub-part of a reset.
    TestValue {
        /// The component declaring the reset
        component: ComponentId,
        /// Index of the reset on that component
        reset: usize,
    },
    /// The connection an equivalence edge belongs to, by edge index.
    Connection(usize),
    /// The variable mapping of an equivalence edge, by edge index.
    MapVariables(usize),
    /// The model's encapsulation marker.
    Encapsulation,
}

impl AnyItem {
    /// Returns the kind of this item.
    #[must_use]
    pub const fn kind(self) -> ItemKind {
        match self {
            Self::Model => ItemKind::Model,
            Self::Component(_) => ItemKind::Component,
            Self::ComponentRef(_) => ItemKind::ComponentRef,
            Self::Variable(_) => ItemKind::Variable,
            Self::Units(_) => ItemKind::Units,
            Self::UnitTerm { .. } => ItemKind::UnitTerm,
            Self::ImportSource(_) => ItemKind::ImportSource,
            Self::Reset { .. } => ItemKind::Reset,
            Self::ResetValue { .. } => ItemKind::ResetValue,
            Self::TestValue { .. } => ItemKind::TestValue,
            Self::Connection(_) => ItemKind::Connection,
            Self::MapVariables(_) => ItemKind::MapVariables,
            Self::Encapsulation => ItemKind::Encapsulation,
        }
    }
}

/// The kind of an [`AnyItem`], without its handle payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// The model itself.
    Model,
    /// A component.
    Component,
    /// A component's reference in the encapsulation hierarchy.
    ComponentRef,
    /// A variable.
    Variable,
    /// A model-scope units definition.
    Units,
    /// A single term of a units definition.
    UnitTerm,
    /// An import source.
    ImportSource,
    /// A reset.
    Reset,
    /// The reset-value sub-part of a reset.
    ResetValue,
    /// The test-value sub-part of a reset.
    TestValue,
    /// The connection an equivalence edge belongs to.
    Connection,
    /// The variable mapping of an equivalence edge.
    MapVariables,
    /// The model's encapsulation marker.
    Encapsulation,
}

impl ItemKind {
    /// Returns the lowercase textual form of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Component => "component",
            Self::ComponentRef => "component_ref",
            Self::Variable => "variable",
            Self::Units => "units",
            Self::UnitTerm => "unit",
            Self::ImportSource => "import",
            Self::Reset => "reset",
            Self::ResetValue => "reset_value",
            Self::TestValue => "test_value",
            Self::Connection => "connection",
            Self::MapVariables => "map_variables",
            Self::Encapsulation => "encapsulation",
        }
    }
}
