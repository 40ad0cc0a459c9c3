//! Named, composable physical unit definitions.

use crate::entity::Entity;
use crate::import::ImportRef;

/// A metric prefix applied to a single unit term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Prefix {
    /// 10^24
    Yotta,
    /// 10^21
    Zetta,
    /// 10^18
    Exa,
    /// 10^15
    Peta,
    /// 10^12
    Tera,
    /// 10^9
    Giga,
    /// 10^6
    Mega,
    /// 10^3
    Kilo,
    /// 10^2
    Hecto,
    /// 10^1
    Deka,
    /// 10^0, the absence of a prefix
    #[default]
    None,
    /// 10^-1
    Deci,
    /// 10^-2
    Centi,
    /// 10^-3
    Milli,
    /// 10^-6
    Micro,
    /// 10^-9
    Nano,
    /// 10^-12
    Pico,
    /// 10^-15
    Femto,
    /// 10^-18
    Atto,
    /// 10^-21
    Zepto,
    /// 10^-24
    Yocto,
}

impl Prefix {
    /// Returns the power of ten this prefix scales by.
    #[must_use]
    pub const fn exponent10(self) -> i32 {
        match self {
            Self::Yotta => 24,
            Self::Zetta => 21,
            Self::Exa => 18,
            Self::Peta => 15,
            Self::Tera => 12,
            Self::Giga => 9,
            Self::Mega => 6,
            Self::Kilo => 3,
            Self::Hecto => 2,
            Self::Deka => 1,
            Self::None => 0,
            Self::Deci => -1,
            Self::Centi => -2,
            Self::Milli => -3,
            Self::Micro => -6,
            Self::Nano => -9,
            Self::Pico => -12,
            Self::Femto => -15,
            Self::Atto => -18,
            Self::Zepto => -21,
            Self::Yocto => -24,
        }
    }

    /// Returns the lowercase SI name of this prefix.
    ///
    /// `Prefix::None` has no name and returns the empty string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yotta => "yotta",
            Self::Zetta => "zetta",
            Self::Exa => "exa",
            Self::Peta => "peta",
            Self::Tera => "tera",
            Self::Giga => "giga",
            Self::Mega => "mega",
            Self::Kilo => "kilo",
            Self::Hecto => "hecto",
            Self::Deka => "deka",
            Self::None => "",
            Self::Deci => "deci",
            Self::Centi => "centi",
            Self::Milli => "milli",
            Self::Micro => "micro",
            Self::Nano => "nano",
            Self::Pico => "pico",
            Self::Femto => "femto",
            Self::Atto => "atto",
            Self::Zepto => "zepto",
            Self::Yocto => "yocto",
        }
    }

    /// Parses a lowercase SI prefix name.
    ///
    /// The empty string parses as `Prefix::None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "yotta" => Some(Self::Yotta),
            "zetta" => Some(Self::Zetta),
            "exa" => Some(Self::Exa),
            "peta" => Some(Self::Peta),
            "tera" => Some(Self::Tera),
            "giga" => Some(Self::Giga),
            "mega" => Some(Self::Mega),
            "kilo" => Some(Self::Kilo),
            "hecto" => Some(Self::Hecto),
            "deka" => Some(Self::Deka),
            "" => Some(Self::None),
            "deci" => Some(Self::Deci),
            "centi" => Some(Self::Centi),
            "milli" => Some(Self::Milli),
            "micro" => Some(Self::Micro),
            "nano" => Some(Self::Nano),
            "pico" => Some(Self::Pico),
            "femto" => Some(Self::Femto),
            "atto" => Some(Self::Atto),
            "zepto" => Some(Self::Zepto),
            "yocto" => Some(Self::Yocto),
            _ => None,
        }
    }
}

/// A single term of a composite units definition.
///
/// Each term references a base or previously defined unit by name and
/// applies a metric prefix and an integer exponent to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTerm {
    reference: String,
    prefix: Prefix,
    exponent: i32,
    id: Option<String>,
}

impl UnitTerm {
    /// Creates a new term referencing the given unit name.
    #[must_use]
    pub fn new(reference: impl Into<String>, prefix: Prefix, exponent: i32) -> Self {
        Self {
            reference: reference.into(),
            prefix,
            exponent,
            id: None,
        }
    }

    /// Returns the name of the unit this term references.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the metric prefix of this term.
    #[must_use]
    pub const fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// Returns the exponent of this term.
    #[must_use]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }
}

impl Entity for UnitTerm {
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

/// A named collection of ordered unit terms, owned by a model.
///
/// Like a component, a units definition may stand in for a remote
/// definition: an import stub carries an [`ImportRef`] and no terms of its
/// own until flattening substitutes the concrete definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Units {
    name: String,
    id: Option<String>,
    terms: Vec<UnitTerm>,
    import: Option<ImportRef>,
}

impl Units {
    /// Creates a new, empty units definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            terms: vec![],
            import: None,
        }
    }

    /// Returns the name of this units definition.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames this units definition.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends a term referencing `reference` with the given prefix and
    /// exponent.
    pub fn add_unit(&mut self, reference: impl Into<String>, prefix: Prefix, exponent: i32) {
        self.terms.push(UnitTerm::new(reference, prefix, exponent));
    }

    /// Appends a prebuilt term.
    pub fn add_term(&mut self, term: UnitTerm) {
        self.terms.push(term);
    }

    /// Returns the ordered terms of this definition.
    #[must_use]
    pub fn terms(&self) -> &[UnitTerm] {
        &self.terms
    }

    /// Returns the ordered terms of this definition, mutably.
    #[must_use]
    pub fn terms_mut(&mut self) -> &mut [UnitTerm] {
        &mut self.terms
    }

    /// Returns the import reference if this definition is an import stub.
    #[must_use]
    pub const fn import(&self) -> Option<&ImportRef> {
        self.import.as_ref()
    }

    /// Returns true if this definition is an import stub.
    #[must_use]
    pub const fn is_import(&self) -> bool {
        self.import.is_some()
    }

    pub(crate) fn set_import(&mut self, import: ImportRef) {
        self.import = Some(import);
    }

    pub(crate) fn take_import(&mut self) -> Option<ImportRef> {
        self.import.take()
    }
}

impl Entity for Units {
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
