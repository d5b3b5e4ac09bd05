use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{balances, expenses, groups, user};

/// The engine flavor the server runs against.
pub type AppEngine = engine::Engine<engine::SqlStore>;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<AppEngine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Email.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = if let Some(user) = user {
        user
    } else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/groups", post(groups::group_new).get(groups::my_groups))
        .route("/groups/status", get(groups::by_status))
        .route("/groups/{group_id}", get(groups::details))
        .route(
            "/groups/{group_id}/members",
            post(groups::members_add).delete(groups::members_remove),
        )
        .route("/groups/{group_id}/expenses", post(expenses::expense_new))
        .route(
            "/groups/{group_id}/transactions",
            get(expenses::transactions),
        )
        .route("/groups/{group_id}/summary", get(balances::summary))
        .route("/groups/{group_id}/settle", post(balances::settle))
        .route("/groups/{group_id}/audit", get(balances::audit))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: AppEngine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}
