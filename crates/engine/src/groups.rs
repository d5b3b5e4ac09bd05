//! Group primitives.
//!
//! A `Group` is a set of members sharing a ledger of expenses, plus a
//! **payment checkpoint** marking when the ledger was last settled. Only
//! expenses recorded strictly after the checkpoint count toward the live
//! balance.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, MoneyCents, ResultEngine};

/// Per-group marker recording when the ledger was last zeroed and whether it
/// is currently settled.
///
/// The state machine is `OPEN` (`is_paid == false`) ⇄ `SETTLED`
/// (`is_paid == true`): `settle` moves to `SETTLED`, recording any expense
/// moves back to `OPEN`. A group starts `OPEN` with `settled_at == None`,
/// which means the ledger window is all time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub amount: MoneyCents,
    pub currency: Currency,
    pub settled_at: Option<DateTime<Utc>>,
    pub is_paid: bool,
}

impl Checkpoint {
    /// Initial checkpoint of a freshly created group.
    #[must_use]
    pub fn open(currency: Currency) -> Self {
        Self {
            amount: MoneyCents::ZERO,
            currency,
            settled_at: None,
            is_paid: false,
        }
    }

    /// Checkpoint after settling: zeroed, stamped now, marked paid.
    #[must_use]
    pub fn settled_now(&self) -> Self {
        Self {
            amount: MoneyCents::ZERO,
            currency: self.currency,
            settled_at: Some(Utc::now()),
            is_paid: true,
        }
    }

    /// Checkpoint after an expense reopens a settled ledger.
    ///
    /// Only the flag flips; amount, currency, and timestamp stay put so the
    /// window boundary does not move.
    #[must_use]
    pub fn reopened(&self) -> Self {
        Self {
            is_paid: false,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Email of the creator; always the first member and never removable.
    pub admin: String,
    /// Ordered, duplicate-free member emails. Never empty.
    pub members: Vec<String>,
    pub checkpoint: Checkpoint,
}

impl Group {
    /// Builds a new group with the creator as admin and first member.
    ///
    /// The supplied member list is deduplicated while keeping its order; the
    /// admin is folded in at the front.
    pub fn new(
        name: String,
        description: Option<String>,
        admin: String,
        members: Vec<String>,
        currency: Currency,
    ) -> Self {
        let mut all = vec![admin.clone()];
        for member in members {
            if !all.contains(&member) {
                all.push(member);
            }
        }
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            admin,
            members: all,
            checkpoint: Checkpoint::open(currency),
        }
    }

    /// Rebuilds a group from its stored row and ordered member list.
    pub fn from_parts(model: Model, members: Vec<String>) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidValue(format!("invalid group id: {}", model.id)))?,
            name: model.name,
            description: model.description,
            admin: model.admin_email,
            members,
            checkpoint: Checkpoint {
                amount: MoneyCents::new(model.checkpoint_amount_minor),
                currency: Currency::try_from(model.checkpoint_currency.as_str())
                    .unwrap_or_default(),
                settled_at: model.settled_at,
                is_paid: model.is_paid,
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub admin_email: String,
    pub checkpoint_amount_minor: i64,
    pub checkpoint_currency: String,
    pub settled_at: Option<DateTimeUtc>,
    pub is_paid: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::group_members::Entity")]
    GroupMembers,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupMembers.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Group> for ActiveModel {
    fn from(group: &Group) -> Self {
        Self {
            id: ActiveValue::Set(group.id.to_string()),
            name: ActiveValue::Set(group.name.clone()),
            description: ActiveValue::Set(group.description.clone()),
            admin_email: ActiveValue::Set(group.admin.clone()),
            checkpoint_amount_minor: ActiveValue::Set(group.checkpoint.amount.cents()),
            checkpoint_currency: ActiveValue::Set(group.checkpoint.currency.code().to_string()),
            settled_at: ActiveValue::Set(group.checkpoint.settled_at),
            is_paid: ActiveValue::Set(group.checkpoint.is_paid),
        }
    }
}
