use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Eur,
    Usd,
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
        /// Member emails besides the creator; the creator is always included
        /// as admin.
        pub members: Option<Vec<String>>,
        pub currency: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub admin: String,
        pub members: Vec<String>,
        pub payment_status: PaymentStatusView,
    }

    /// The group's settlement checkpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentStatusView {
        /// Decimal currency units.
        pub amount: f64,
        pub currency: Currency,
        /// RFC3339 UTC timestamp of the last settlement, if any.
        pub settled_at: Option<DateTime<Utc>>,
        pub is_paid: bool,
    }

    /// Request body for adding or removing members.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersUpdate {
        pub members: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupView>,
    }

    /// Query string for filtering groups by settlement state.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusQuery {
        pub is_paid: bool,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitType {
        Equal,
        Custom,
    }

    /// One member's share of a custom split, in decimal currency units.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitShare {
        pub member: String,
        pub amount: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub title: String,
        /// Decimal currency units. Must be > 0.
        pub amount: f64,
        pub split_type: SplitType,
        /// Equal splits only: subset of members to split among. Absent means
        /// the whole group.
        pub split_with: Option<Vec<String>>,
        /// Custom splits only: explicit per-member shares summing to `amount`.
        pub splits: Option<Vec<SplitShare>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub title: String,
        pub amount: f64,
        pub paid_by: String,
        pub split_type: SplitType,
        pub splits: Vec<SplitShare>,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<ExpenseView>,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberBalanceView {
        pub member: String,
        pub paid: f64,
        pub owes: f64,
        /// `paid - owes`; negative means the member owes the group.
        pub net_balance: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub group_id: Uuid,
        pub currency: Currency,
        pub total_expenses: f64,
        pub last_settled: Option<DateTime<Utc>>,
        pub members: Vec<MemberBalanceView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuditResponse {
        pub last_settled: Option<DateTime<Utc>>,
    }
}
