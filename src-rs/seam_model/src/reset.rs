//! Resets, the discontinuous state changes a component may declare.

use crate::entity::Entity;
use crate::ids::VariableId;

/// A discontinuous change applied to a variable when a test condition fires.
///
/// A reset tracks the variable it changes, the variable its test condition
/// watches, an ordering number among the component's resets, and two opaque
/// math blocks: the value to reset to and the test condition itself. The
/// value and test sub-parts are separately identifiable, which is why they
/// carry their own identifier slots alongside the reset's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reset {
    id: Option<String>,
    order: i32,
    variable: Option<VariableId>,
    test_variable: Option<VariableId>,
    reset_value: Option<String>,
    reset_value_id: Option<String>,
    test_value: Option<String>,
    test_value_id: Option<String>,
}

impl Reset {
    /// Creates a new reset with the given order and nothing else set.
    #[must_use]
    pub const fn new(order: i32) -> Self {
        Self {
            id: None,
            order,
            variable: None,
            test_variable: None,
            reset_value: None,
            reset_value_id: None,
            test_value: None,
            test_value_id: None,
        }
    }

    /// Returns the order of this reset.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// Sets the order of this reset.
    pub fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    /// Returns the variable this reset changes.
    #[must_use]
    pub const fn variable(&self) -> Option<VariableId> {
        self.variable
    }

    /// Sets the variable this reset changes.
    pub fn set_variable(&mut self, variable: VariableId) {
        self.variable = Some(variable);
    }

    /// Returns the variable the test condition watches.
    #[must_use]
    pub const fn test_variable(&self) -> Option<VariableId> {
        self.test_variable
    }

    /// Sets the variable the test condition watches.
    pub fn set_test_variable(&mut self, variable: VariableId) {
        self.test_variable = Some(variable);
    }

    /// Rewrites both variable references at once.
    ///
    /// Used when a reset is copied between models and its variable ids must
    /// be re-expressed in the destination model's arena; a reference with no
    /// counterpart in the destination becomes `None`.
    pub fn remap_variables(
        &mut self,
        variable: Option<VariableId>,
        test_variable: Option<VariableId>,
    ) {
        self.variable = variable;
        self.test_variable = test_variable;
    }

    /// Returns the reset-value math block.
    #[must_use]
    pub fn reset_value(&self) -> Option<&str> {
        self.reset_value.as_deref()
    }

    /// Sets the reset-value math block.
    pub fn set_reset_value(&mut self, math: impl Into<String>) {
        self.reset_value = Some(math.into());
    }

    /// Returns the identifier of the reset-value sub-part.
    #[must_use]
    pub fn reset_value_id(&self) -> Option<&str> {
        self.reset_value_id.as_deref()
    }

    /// Sets the identifier of the reset-value sub-part.
    pub fn set_reset_value_id(&mut self, id: impl Into<String>) {
        self.reset_value_id = Some(id.into());
    }

    /// Removes the identifier of the reset-value sub-part.
    pub fn remove_reset_value_id(&mut self) {
        self.reset_value_id = None;
    }

    /// Returns the test-value math block.
    #[must_use]
    pub fn test_value(&self) -> Option<&str> {
        self.test_value.as_deref()
    }

    /// Sets the test-value math block.
    pub fn set_test_value(&mut self, math: impl Into<String>) {
        self.test_value = Some(math.into());
    }

    /// Returns the identifier of the test-value sub-part.
    #[must_use]
    pub fn test_value_id(&self) -> Option<&str> {
        self.test_value_id.as_deref()
    }

    /// Sets the identifier of the test-value sub-part.
    pub fn set_test_value_id(&mut self, id: impl Into<String>) {
        self.test_value_id = Some(id.into());
    }

    /// Removes the identifier of the test-value sub-part.
    pub fn remove_test_value_id(&mut self) {
        self.test_value_id = None;
    }
}

impl Entity for Reset {
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
