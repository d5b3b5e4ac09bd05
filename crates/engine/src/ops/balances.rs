use chrono::{DateTime, Utc};

use crate::{
    Group, GroupSummary, ResultEngine,
    store::{ExpenseStore, GroupStore},
    summary,
};

use super::Engine;

impl<S: GroupStore + ExpenseStore> Engine<S> {
    /// Computes the group's balance summary over the current ledger window.
    ///
    /// The window runs from the last settlement (exclusive) to now, or all
    /// time if the group was never settled. Derived on every call, never
    /// stored.
    pub async fn summary(&self, group_id: &str, user_id: &str) -> ResultEngine<GroupSummary> {
        let group = self.require_group(group_id, user_id).await?;
        let last_settled = group.checkpoint.settled_at;

        let expenses = self.store.find_since(group_id, last_settled).await?;
        let (members, total_expenses) = summary::aggregate(&group.members, &expenses);

        Ok(GroupSummary {
            group_id: group.id,
            currency: group.checkpoint.currency,
            total_expenses,
            last_settled,
            members,
        })
    }
}

impl<S: GroupStore> Engine<S> {
    /// Settles the group: advances the checkpoint to now and marks it paid.
    ///
    /// No expense record is touched; the next summary simply starts from
    /// zero. Settling an already-settled or empty ledger is legal, the
    /// checkpoint still advances.
    pub async fn settle(&self, group_id: &str, user_id: &str) -> ResultEngine<Group> {
        let group = self.require_group(group_id, user_id).await?;
        tracing::info!(group_id, by = user_id, "settling group ledger");
        self.store
            .update_checkpoint(group_id, group.checkpoint.settled_now())
            .await
    }

    /// When the group was last settled; `None` if it never was.
    pub async fn last_settled(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Option<DateTime<Utc>>> {
        let group = self.require_group(group_id, user_id).await?;
        Ok(group.checkpoint.settled_at)
    }
}
