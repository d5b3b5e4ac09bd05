//! Group API endpoints.

use api_types::group::{
    GroupNew, GroupView, GroupsResponse, MembersUpdate, PaymentStatusView, StatusQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Inr => api_types::Currency::Inr,
        engine::Currency::Eur => api_types::Currency::Eur,
        engine::Currency::Usd => api_types::Currency::Usd,
    }
}

fn map_currency_in(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Inr => engine::Currency::Inr,
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Usd => engine::Currency::Usd,
    }
}

pub(crate) fn group_view(group: engine::Group) -> GroupView {
    GroupView {
        id: group.id,
        name: group.name,
        description: group.description,
        admin: group.admin,
        members: group.members,
        payment_status: PaymentStatusView {
            amount: group.checkpoint.amount.to_major(),
            currency: map_currency(group.checkpoint.currency),
            settled_at: group.checkpoint.settled_at,
            is_paid: group.checkpoint.is_paid,
        },
    }
}

/// Handle requests for creating a new group.
pub async fn group_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let mut cmd = engine::GroupCmd::new(payload.name);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(members) = payload.members {
        cmd = cmd.members(members);
    }
    if let Some(currency) = payload.currency {
        cmd = cmd.currency(map_currency_in(currency));
    }

    let group = state.engine.new_group(&user.email, cmd).await?;
    Ok((StatusCode::CREATED, Json(group_view(group))))
}

/// Handle requests for listing the caller's groups.
pub async fn my_groups(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state.engine.my_groups(&user.email).await?;
    Ok(Json(GroupsResponse {
        groups: groups.into_iter().map(group_view).collect(),
    }))
}

/// Handle requests for listing groups by settlement state.
pub async fn by_status(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state.engine.groups_by_status(query.is_paid).await?;
    Ok(Json(GroupsResponse {
        groups: groups.into_iter().map(group_view).collect(),
    }))
}

/// Handle requests for a single group's details.
pub async fn details(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state.engine.group_details(&group_id, &user.email).await?;
    Ok(Json(group_view(group)))
}

/// Handle requests for adding members to a group.
pub async fn members_add(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<MembersUpdate>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state
        .engine
        .add_members(&group_id, &user.email, payload.members)
        .await?;
    Ok(Json(group_view(group)))
}

/// Handle requests for removing members from a group.
pub async fn members_remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<MembersUpdate>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state
        .engine
        .remove_members(&group_id, &user.email, payload.members)
        .await?;
    Ok(Json(group_view(group)))
}
