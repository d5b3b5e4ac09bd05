//! Command structs for engine operations.
//!
//! These types group parameters for write operations (group creation,
//! expense creation), keeping call sites readable and avoiding long
//! argument lists. The acting member is always passed separately: the
//! engine never infers identity from ambient state.

use crate::{Currency, SplitKind};

/// One caller-supplied share of a custom split, still in decimal form.
///
/// The amount stays `f64` until the split calculator validates and converts
/// it; rejecting bad input (NaN, negative) is part of the fixed validation
/// order.
#[derive(Clone, Debug)]
pub struct SplitValue {
    pub member: String,
    pub amount: f64,
}

/// Create an expense in a group.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub title: String,
    /// Decimal amount as supplied by the caller; validated and converted to
    /// cents by the engine.
    pub amount: f64,
    pub kind: SplitKind,
    /// Members sharing an equal split; `None` means the whole group.
    pub split_with: Option<Vec<String>>,
    /// Shares of a custom split.
    pub splits: Option<Vec<SplitValue>>,
}

impl ExpenseCmd {
    #[must_use]
    pub fn equal(title: impl Into<String>, amount: f64) -> Self {
        Self {
            title: title.into(),
            amount,
            kind: SplitKind::Equal,
            split_with: None,
            splits: None,
        }
    }

    #[must_use]
    pub fn custom(title: impl Into<String>, amount: f64, splits: Vec<SplitValue>) -> Self {
        Self {
            title: title.into(),
            amount,
            kind: SplitKind::Custom,
            split_with: None,
            splits: Some(splits),
        }
    }

    #[must_use]
    pub fn split_with(mut self, members: Vec<String>) -> Self {
        self.split_with = Some(members);
        self
    }
}

/// Create a group.
#[derive(Clone, Debug)]
pub struct GroupCmd {
    pub name: String,
    pub description: Option<String>,
    /// Members to join beyond the creator; deduplicated on creation.
    pub members: Vec<String>,
    pub currency: Option<Currency>,
}

impl GroupCmd {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: Vec::new(),
            currency: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }
}
