//! sea-orm implementation of the store interfaces.
//!
//! One sqlite-backed struct implements both [`GroupStore`] and
//! [`ExpenseStore`]. Writes that touch more than one table run inside a DB
//! transaction; reads go straight to the connection.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Checkpoint, EngineError, Expense, Group, MoneyCents, ResultEngine, Split, expense_splits,
    expenses, group_members, groups,
    store::{ExpenseStore, GroupStore, NewExpense},
};

/// Run a block inside a DB transaction, committing on success.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// sqlite-backed store over a shared [`DatabaseConnection`].
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    #[must_use]
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    async fn members_of<C: ConnectionTrait>(
        conn: &C,
        group_id: &str,
    ) -> ResultEngine<Vec<String>> {
        let rows = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id))
            .order_by_asc(group_members::Column::Position)
            .all(conn)
            .await?;
        Ok(rows.into_iter().map(|row| row.member_email).collect())
    }

    async fn load_group<C: ConnectionTrait>(
        conn: &C,
        group_id: &str,
    ) -> ResultEngine<Option<Group>> {
        let Some(model) = groups::Entity::find_by_id(group_id.to_string())
            .one(conn)
            .await?
        else {
            return Ok(None);
        };
        let members = Self::members_of(conn, group_id).await?;
        Group::from_parts(model, members).map(Some)
    }

    async fn require_group<C: ConnectionTrait>(conn: &C, group_id: &str) -> ResultEngine<Group> {
        Self::load_group(conn, group_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(group_id.to_string()))
    }

    async fn splits_by_expense<C: ConnectionTrait>(
        conn: &C,
        expense_ids: &[String],
    ) -> ResultEngine<HashMap<String, Vec<Split>>> {
        if expense_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut rows = expense_splits::Entity::find()
            .filter(expense_splits::Column::ExpenseId.is_in(expense_ids.iter().cloned()))
            .all(conn)
            .await?;
        rows.sort_by_key(|row| row.position);

        let mut by_expense: HashMap<String, Vec<Split>> = HashMap::new();
        for row in rows {
            by_expense.entry(row.expense_id).or_default().push(Split {
                member: row.member_email,
                amount: MoneyCents::new(row.amount_minor),
            });
        }
        Ok(by_expense)
    }
}

#[async_trait]
impl GroupStore for SqlStore {
    async fn create_group(&self, group: &Group) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            groups::ActiveModel::from(group).insert(&db_tx).await?;

            let rows: Vec<group_members::ActiveModel> = group
                .members
                .iter()
                .enumerate()
                .map(|(position, member)| group_members::ActiveModel {
                    group_id: ActiveValue::Set(group.id.to_string()),
                    member_email: ActiveValue::Set(member.clone()),
                    position: ActiveValue::Set(position as i32),
                })
                .collect();
            group_members::Entity::insert_many(rows).exec(&db_tx).await?;

            Ok(group.clone())
        })
    }

    async fn group_for_member(
        &self,
        group_id: &str,
        member: &str,
    ) -> ResultEngine<Option<Group>> {
        let Some(group) = Self::load_group(&self.database, group_id).await? else {
            return Ok(None);
        };
        if !group.members.iter().any(|m| m == member) {
            return Ok(None);
        }
        Ok(Some(group))
    }

    async fn members(&self, group_id: &str) -> ResultEngine<Vec<String>> {
        Self::require_group(&self.database, group_id)
            .await
            .map(|group| group.members)
    }

    async fn update_checkpoint(
        &self,
        group_id: &str,
        checkpoint: Checkpoint,
    ) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let mut group = Self::require_group(&db_tx, group_id).await?;

            let model = groups::ActiveModel {
                id: ActiveValue::Set(group_id.to_string()),
                checkpoint_amount_minor: ActiveValue::Set(checkpoint.amount.cents()),
                checkpoint_currency: ActiveValue::Set(checkpoint.currency.code().to_string()),
                settled_at: ActiveValue::Set(checkpoint.settled_at),
                is_paid: ActiveValue::Set(checkpoint.is_paid),
                ..Default::default()
            };
            model.update(&db_tx).await?;

            group.checkpoint = checkpoint;
            Ok(group)
        })
    }

    async fn add_members(&self, group_id: &str, members: &[String]) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let group = Self::require_group(&db_tx, group_id).await?;

            let mut position = group.members.len() as i32;
            let mut rows = Vec::new();
            let mut present = group.members.clone();
            for member in members {
                if present.contains(member) {
                    continue;
                }
                present.push(member.clone());
                rows.push(group_members::ActiveModel {
                    group_id: ActiveValue::Set(group_id.to_string()),
                    member_email: ActiveValue::Set(member.clone()),
                    position: ActiveValue::Set(position),
                });
                position += 1;
            }
            if !rows.is_empty() {
                group_members::Entity::insert_many(rows).exec(&db_tx).await?;
            }

            Ok(Group {
                members: present,
                ..group
            })
        })
    }

    async fn remove_members(&self, group_id: &str, members: &[String]) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let mut group = Self::require_group(&db_tx, group_id).await?;

            let removable: Vec<String> = members
                .iter()
                .filter(|member| **member != group.admin)
                .cloned()
                .collect();
            if !removable.is_empty() {
                group_members::Entity::delete_many()
                    .filter(group_members::Column::GroupId.eq(group_id))
                    .filter(group_members::Column::MemberEmail.is_in(removable.clone()))
                    .exec(&db_tx)
                    .await?;
            }

            group.members.retain(|member| !removable.contains(member));
            Ok(group)
        })
    }

    async fn groups_for(&self, member: &str) -> ResultEngine<Vec<Group>> {
        let rows = group_members::Entity::find()
            .filter(group_members::Column::MemberEmail.eq(member))
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(group) = Self::load_group(&self.database, &row.group_id).await? {
                out.push(group);
            }
        }
        Ok(out)
    }

    async fn groups_by_status(&self, is_paid: bool) -> ResultEngine<Vec<Group>> {
        let models = groups::Entity::find()
            .filter(groups::Column::IsPaid.eq(is_paid))
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let members = Self::members_of(&self.database, &model.id).await?;
            out.push(Group::from_parts(model, members)?);
        }
        Ok(out)
    }
}

#[async_trait]
impl ExpenseStore for SqlStore {
    async fn insert(&self, expense: NewExpense) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let group_id = expense.group_id.to_string();
            // FK safety net; the engine has already checked membership.
            Self::require_group(&db_tx, &group_id).await?;

            // Keep created_at strictly increasing within the group so the
            // newest-first ordering and the "since checkpoint" window stay
            // unambiguous even for back-to-back inserts.
            let mut created_at = Utc::now();
            let newest = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.as_str()))
                .order_by_desc(expenses::Column::CreatedAt)
                .one(&db_tx)
                .await?;
            if let Some(newest) = newest
                && created_at <= newest.created_at
            {
                created_at = newest.created_at + Duration::milliseconds(1);
            }

            let persisted = Expense {
                id: Uuid::new_v4(),
                group_id: expense.group_id,
                title: expense.title,
                amount: expense.amount,
                paid_by: expense.paid_by,
                kind: expense.kind,
                splits: expense.splits,
                created_by: expense.created_by,
                created_at,
            };

            expenses::ActiveModel::from(&persisted).insert(&db_tx).await?;
            let rows: Vec<expense_splits::ActiveModel> = persisted
                .splits
                .iter()
                .enumerate()
                .map(|(position, split)| expense_splits::ActiveModel {
                    expense_id: ActiveValue::Set(persisted.id.to_string()),
                    member_email: ActiveValue::Set(split.member.clone()),
                    amount_minor: ActiveValue::Set(split.amount.cents()),
                    position: ActiveValue::Set(position as i32),
                })
                .collect();
            expense_splits::Entity::insert_many(rows).exec(&db_tx).await?;

            Ok(persisted)
        })
    }

    async fn find_since(
        &self,
        group_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<Expense>> {
        let mut query = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id))
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_desc(expenses::Column::Id);
        if let Some(since) = since {
            query = query.filter(expenses::Column::CreatedAt.gt(since));
        }
        let models = query.all(&self.database).await?;

        let ids: Vec<String> = models.iter().map(|model| model.id.clone()).collect();
        let mut splits = Self::splits_by_expense(&self.database, &ids).await?;

        models
            .into_iter()
            .map(|model| {
                let expense_splits = splits.remove(&model.id).unwrap_or_default();
                Expense::from_parts(model, expense_splits)
            })
            .collect()
    }
}
