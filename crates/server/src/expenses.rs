//! Expense API endpoints.

use api_types::expense::{ExpenseNew, ExpenseView, SplitShare, SplitType, TransactionsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

fn map_split_type(kind: engine::SplitKind) -> SplitType {
    match kind {
        engine::SplitKind::Equal => SplitType::Equal,
        engine::SplitKind::Custom => SplitType::Custom,
    }
}

fn expense_view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        title: expense.title,
        amount: expense.amount.to_major(),
        paid_by: expense.paid_by,
        split_type: map_split_type(expense.kind),
        splits: expense
            .splits
            .into_iter()
            .map(|split| SplitShare {
                member: split.member,
                amount: split.amount.to_major(),
            })
            .collect(),
        created_by: expense.created_by,
        created_at: expense.created_at,
    }
}

/// Handle requests for recording a new expense.
pub async fn expense_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let cmd = match payload.split_type {
        SplitType::Equal => {
            let mut cmd = engine::ExpenseCmd::equal(payload.title, payload.amount);
            if let Some(members) = payload.split_with {
                cmd = cmd.split_with(members);
            }
            cmd
        }
        SplitType::Custom => {
            let splits = payload
                .splits
                .unwrap_or_default()
                .into_iter()
                .map(|share| engine::SplitValue {
                    member: share.member,
                    amount: share.amount,
                })
                .collect();
            engine::ExpenseCmd::custom(payload.title, payload.amount, splits)
        }
    };

    let expense = state
        .engine
        .new_expense(&group_id, &user.email, cmd)
        .await?;
    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

/// Handle requests for a group's full expense history, newest first.
pub async fn transactions(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let expenses = state.engine.transactions(&group_id, &user.email).await?;
    Ok(Json(TransactionsResponse {
        transactions: expenses.into_iter().map(expense_view).collect(),
    }))
}
