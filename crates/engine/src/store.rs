//! Store interfaces the engine depends on.
//!
//! The engine holds no state of its own; persistence lives behind these two
//! narrow seams. Each checkpoint update and each expense insert must be
//! atomic at the store level; the engine assumes, but does not implement,
//! that guarantee. Both stores must provide read-after-write consistency
//! for a single group id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Checkpoint, Expense, Group, MoneyCents, ResultEngine, Split, SplitKind};

/// An expense as handed to the store: everything but the id and timestamp,
/// which the store assigns on insert.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub group_id: Uuid,
    pub title: String,
    pub amount: MoneyCents,
    pub paid_by: String,
    pub kind: SplitKind,
    pub splits: Vec<Split>,
    pub created_by: String,
}

/// Group membership and checkpoint persistence.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Persists a freshly built group (row + ordered membership).
    async fn create_group(&self, group: &Group) -> ResultEngine<Group>;

    /// Loads a group only if `member` belongs to it; `None` both when the
    /// group is missing and when the member is an outsider, so callers
    /// cannot distinguish the two.
    async fn group_for_member(&self, group_id: &str, member: &str)
    -> ResultEngine<Option<Group>>;

    /// Ordered member emails of a group.
    async fn members(&self, group_id: &str) -> ResultEngine<Vec<String>>;

    /// Atomically replaces the group's checkpoint, returning the updated
    /// group.
    async fn update_checkpoint(&self, group_id: &str, checkpoint: Checkpoint)
    -> ResultEngine<Group>;

    /// Appends members not already present, keeping existing order.
    async fn add_members(&self, group_id: &str, members: &[String]) -> ResultEngine<Group>;

    /// Removes the given members; the admin row is never touched.
    async fn remove_members(&self, group_id: &str, members: &[String]) -> ResultEngine<Group>;

    /// Every group the member belongs to.
    async fn groups_for(&self, member: &str) -> ResultEngine<Vec<Group>>;

    /// Groups filtered by their checkpoint's paid flag.
    async fn groups_by_status(&self, is_paid: bool) -> ResultEngine<Vec<Group>>;
}

/// Append-only expense persistence.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Persists an expense, assigning its id and a creation timestamp that
    /// is monotonic within the group.
    async fn insert(&self, expense: NewExpense) -> ResultEngine<Expense>;

    /// Expenses of a group created strictly after `since` (all of them when
    /// `None`), newest first.
    async fn find_since(
        &self,
        group_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<Expense>>;
}
