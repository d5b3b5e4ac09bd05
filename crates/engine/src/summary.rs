//! The balance aggregator's pure half.
//!
//! Folds a window of expenses into per-member paid/owed totals. The fold is
//! driven by the expense rows, not by current membership: a member who left
//! the group still surfaces here when their rows fall inside the window,
//! because the ledger reflects financial history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, Expense, MoneyCents};

/// Per-member financial summary entry. Derived, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: String,
    /// Sum of expenses this member funded.
    pub paid: MoneyCents,
    /// Sum of this member's split shares.
    pub owes: MoneyCents,
    /// `paid - owes`; negative means the member owes the group.
    pub net_balance: MoneyCents,
}

/// A group's balance summary over its current ledger window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: Uuid,
    pub currency: Currency,
    pub total_expenses: MoneyCents,
    pub last_settled: Option<DateTime<Utc>>,
    pub members: Vec<MemberBalance>,
}

/// Folds expenses into per-member balances plus the window total.
///
/// Every current member gets an entry even with no activity. Payers and
/// split members no longer in the group get entries on the fly; the output
/// lists current members first in membership order, then former members in
/// the order first encountered.
pub fn aggregate(members: &[String], expenses: &[Expense]) -> (Vec<MemberBalance>, MoneyCents) {
    let mut order: Vec<String> = members.to_vec();
    let mut totals: HashMap<String, (MoneyCents, MoneyCents)> = members
        .iter()
        .map(|member| (member.clone(), (MoneyCents::ZERO, MoneyCents::ZERO)))
        .collect();
    let mut total_expenses = MoneyCents::ZERO;

    let mut entry_for = |totals: &mut HashMap<String, (MoneyCents, MoneyCents)>,
                         order: &mut Vec<String>,
                         member: &str| {
        if !totals.contains_key(member) {
            totals.insert(member.to_string(), (MoneyCents::ZERO, MoneyCents::ZERO));
            order.push(member.to_string());
        }
    };

    for expense in expenses {
        total_expenses += expense.amount;

        entry_for(&mut totals, &mut order, &expense.paid_by);
        if let Some((paid, _)) = totals.get_mut(&expense.paid_by) {
            *paid += expense.amount;
        }

        for split in &expense.splits {
            entry_for(&mut totals, &mut order, &split.member);
            if let Some((_, owes)) = totals.get_mut(&split.member) {
                *owes += split.amount;
            }
        }
    }

    let balances = order
        .into_iter()
        .map(|member| {
            let (paid, owes) = totals.get(&member).copied().unwrap_or_default();
            MemberBalance {
                member,
                paid,
                owes,
                net_balance: paid - owes,
            }
        })
        .collect();

    (balances, total_expenses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Split, SplitKind};

    fn expense(paid_by: &str, cents: i64, shares: &[(&str, i64)]) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            title: "test".to_string(),
            amount: MoneyCents::new(cents),
            paid_by: paid_by.to_string(),
            kind: SplitKind::Equal,
            splits: shares
                .iter()
                .map(|(member, amount)| Split {
                    member: member.to_string(),
                    amount: MoneyCents::new(*amount),
                })
                .collect(),
            created_by: paid_by.to_string(),
            created_at: Utc::now(),
        }
    }

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn single_equal_expense_produces_expected_balances() {
        let group = members(&["a@x.io", "b@x.io", "c@x.io"]);
        let expenses = [expense(
            "a@x.io",
            90_00,
            &[("a@x.io", 30_00), ("b@x.io", 30_00), ("c@x.io", 30_00)],
        )];

        let (balances, total) = aggregate(&group, &expenses);

        assert_eq!(total, MoneyCents::new(90_00));
        assert_eq!(
            balances[0],
            MemberBalance {
                member: "a@x.io".to_string(),
                paid: MoneyCents::new(90_00),
                owes: MoneyCents::new(30_00),
                net_balance: MoneyCents::new(60_00),
            }
        );
        for balance in &balances[1..] {
            assert_eq!(balance.paid, MoneyCents::ZERO);
            assert_eq!(balance.owes, MoneyCents::new(30_00));
            assert_eq!(balance.net_balance, MoneyCents::new(-30_00));
        }
    }

    #[test]
    fn empty_window_yields_zeroed_entries_for_all_members() {
        let group = members(&["a@x.io", "b@x.io"]);
        let (balances, total) = aggregate(&group, &[]);

        assert_eq!(total, MoneyCents::ZERO);
        assert_eq!(balances.len(), 2);
        assert!(balances.iter().all(|b| b.paid.is_zero()
            && b.owes.is_zero()
            && b.net_balance.is_zero()));
    }

    #[test]
    fn former_member_appears_after_current_members() {
        let group = members(&["a@x.io", "b@x.io"]);
        let expenses = [expense(
            "gone@x.io",
            60_00,
            &[("a@x.io", 20_00), ("b@x.io", 20_00), ("gone@x.io", 20_00)],
        )];

        let (balances, _) = aggregate(&group, &expenses);

        let order: Vec<&str> = balances.iter().map(|b| b.member.as_str()).collect();
        assert_eq!(order, ["a@x.io", "b@x.io", "gone@x.io"]);
        assert_eq!(balances[2].paid, MoneyCents::new(60_00));
        assert_eq!(balances[2].owes, MoneyCents::new(20_00));
        assert_eq!(balances[2].net_balance, MoneyCents::new(40_00));
    }

    #[test]
    fn balances_accumulate_across_expenses() {
        let group = members(&["a@x.io", "b@x.io"]);
        let expenses = [
            expense("a@x.io", 10_00, &[("a@x.io", 5_00), ("b@x.io", 5_00)]),
            expense("b@x.io", 4_00, &[("a@x.io", 2_00), ("b@x.io", 2_00)]),
        ];

        let (balances, total) = aggregate(&group, &expenses);

        assert_eq!(total, MoneyCents::new(14_00));
        assert_eq!(balances[0].paid, MoneyCents::new(10_00));
        assert_eq!(balances[0].owes, MoneyCents::new(7_00));
        assert_eq!(balances[0].net_balance, MoneyCents::new(3_00));
        assert_eq!(balances[1].net_balance, MoneyCents::new(-3_00));
    }
}
