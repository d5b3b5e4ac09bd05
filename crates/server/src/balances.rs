//! Summary, settlement and audit API endpoints.

use api_types::group::GroupView;
use api_types::summary::{AuditResponse, MemberBalanceView, SummaryResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    ServerError,
    groups::{group_view, map_currency},
    server::ServerState,
    user,
};

/// Handle requests for the group's balance summary over the current window.
pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let summary = state.engine.summary(&group_id, &user.email).await?;
    Ok(Json(SummaryResponse {
        group_id: summary.group_id,
        currency: map_currency(summary.currency),
        total_expenses: summary.total_expenses.to_major(),
        last_settled: summary.last_settled,
        members: summary
            .members
            .into_iter()
            .map(|balance| MemberBalanceView {
                member: balance.member,
                paid: balance.paid.to_major(),
                owes: balance.owes.to_major(),
                net_balance: balance.net_balance.to_major(),
            })
            .collect(),
    }))
}

/// Handle requests for settling a group's ledger.
pub async fn settle(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state.engine.settle(&group_id, &user.email).await?;
    Ok(Json(group_view(group)))
}

/// Handle requests for when the group was last settled.
pub async fn audit(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<AuditResponse>, ServerError> {
    let last_settled = state.engine.last_settled(&group_id, &user.email).await?;
    Ok(Json(AuditResponse { last_settled }))
}
