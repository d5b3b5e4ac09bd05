pub use commands::{ExpenseCmd, GroupCmd, SplitValue};
pub use currency::Currency;
pub use error::EngineError;
pub use expenses::{Expense, Split, SplitKind};
pub use groups::{Checkpoint, Group};
pub use money::MoneyCents;
pub use ops::Engine;
pub use sql_store::SqlStore;
pub use store::{ExpenseStore, GroupStore, NewExpense};
pub use summary::{GroupSummary, MemberBalance};

mod commands;
mod currency;
mod error;
pub mod expense_splits;
pub mod expenses;
pub mod group_members;
pub mod groups;
mod money;
mod ops;
pub mod split;
mod sql_store;
pub mod store;
mod summary;

type ResultEngine<T> = Result<T, EngineError>;
