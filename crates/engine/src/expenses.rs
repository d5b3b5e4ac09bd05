//! Expense primitives.
//!
//! An `Expense` is an immutable ledger entry: once created it is never
//! updated or deleted. Its split records partition the full amount among
//! group members, penny-exactly.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// How an expense is divided among members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    Equal,
    Custom,
}

impl SplitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for SplitKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "custom" => Ok(Self::Custom),
            other => Err(EngineError::InvalidValue(format!(
                "invalid split kind: {other}"
            ))),
        }
    }
}

/// A member's assigned share of one expense.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub member: String,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub amount: MoneyCents,
    /// Email of the member who fronted the money.
    pub paid_by: String,
    pub kind: SplitKind,
    /// Ordered shares; their sum equals `amount` exactly.
    pub splits: Vec<Split>,
    pub created_by: String,
    /// Assigned by the store at insert; monotonic per group.
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub paid_by_email: String,
    pub split_type: String,
    pub created_by_email: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Groups,
    #[sea_orm(has_many = "super::expense_splits::Entity")]
    ExpenseSplits,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::expense_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseSplits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            group_id: ActiveValue::Set(expense.group_id.to_string()),
            title: ActiveValue::Set(expense.title.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            paid_by_email: ActiveValue::Set(expense.paid_by.clone()),
            split_type: ActiveValue::Set(expense.kind.as_str().to_string()),
            created_by_email: ActiveValue::Set(expense.created_by.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl Expense {
    /// Rebuilds an expense from its stored row and ordered split rows.
    pub fn from_parts(model: Model, splits: Vec<Split>) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidValue(format!("invalid expense id: {}", model.id)))?,
            group_id: Uuid::parse_str(&model.group_id).map_err(|_| {
                EngineError::InvalidValue(format!("invalid group id: {}", model.group_id))
            })?,
            title: model.title,
            amount: MoneyCents::new(model.amount_minor),
            paid_by: model.paid_by_email,
            kind: SplitKind::try_from(model.split_type.as_str())?,
            splits,
            created_by: model.created_by_email,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_kind_decode_failure_is_an_invalid_value() {
        let err = SplitKind::try_from("weird").unwrap_err();
        assert!(matches!(err, EngineError::InvalidValue(_)));
    }
}
