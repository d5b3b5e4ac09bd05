use crate::{
    EngineError, Expense, ExpenseCmd, MoneyCents, ResultEngine, split,
    store::{ExpenseStore, GroupStore, NewExpense},
};

use super::{Engine, normalize_required_name};

impl<S: GroupStore + ExpenseStore> Engine<S> {
    /// Records a new expense paid by the acting member.
    ///
    /// Validation happens entirely before the insert (validate-then-persist):
    /// membership, title, amount, then the split rules in their fixed order.
    /// If the group was settled, recording the expense reopens the ledger.
    ///
    /// A crash between the insert and the checkpoint flip leaves the group
    /// marked paid with a fresh expense recorded. Closing that window would
    /// take a transaction spanning both stores, which the seams deliberately
    /// do not offer.
    pub async fn new_expense(
        &self,
        group_id: &str,
        user_id: &str,
        cmd: ExpenseCmd,
    ) -> ResultEngine<Expense> {
        let group = self.require_group(group_id, user_id).await?;

        let title = normalize_required_name(&cmd.title, "title")?;
        if !cmd.amount.is_finite() || cmd.amount <= 0.0 {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than 0".to_string(),
            ));
        }
        let total = MoneyCents::from_major(cmd.amount)?;
        if !total.is_positive() {
            // Sub-cent inputs like 0.001 round to zero.
            return Err(EngineError::InvalidAmount(
                "amount must be greater than 0".to_string(),
            ));
        }

        let splits = split::compute_splits(
            cmd.kind,
            total,
            &group.members,
            cmd.split_with.as_deref(),
            cmd.splits.as_deref(),
        )?;

        let expense = self
            .store
            .insert(NewExpense {
                group_id: group.id,
                title,
                amount: total,
                paid_by: user_id.to_string(),
                kind: cmd.kind,
                splits,
                created_by: user_id.to_string(),
            })
            .await?;

        if group.checkpoint.is_paid {
            tracing::debug!(group_id, "expense recorded on a settled ledger, reopening");
            self.store
                .update_checkpoint(group_id, group.checkpoint.reopened())
                .await?;
        }

        Ok(expense)
    }

    /// Full expense history of a group, newest first. Membership-gated.
    pub async fn transactions(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<Expense>> {
        self.require_group(group_id, user_id).await?;
        self.store.find_since(group_id, None).await
    }
}
