use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{AppEngine, run_with_listener};

mod balances;
mod expenses;
mod groups;
mod server;
mod user;

pub mod types {
    pub mod group {
        pub use api_types::group::{
            GroupNew, GroupView, GroupsResponse, MembersUpdate, PaymentStatusView, StatusQuery,
        };
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseNew, ExpenseView, SplitShare, SplitType, TransactionsResponse,
        };
    }

    pub mod summary {
        pub use api_types::summary::{AuditResponse, MemberBalanceView, SummaryResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        // Decode failures come from stored rows, not caller input.
        EngineError::Database(_) | EngineError::InvalidValue(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::InvalidTitle(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidMember(_)
        | EngineError::DuplicateMember(_)
        | EngineError::SplitMismatch(_)
        | EngineError::EmptySplitTarget(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::SplitMismatch("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::DuplicateMember("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_decode_failure_maps_to_500() {
        let res = ServerError::from(EngineError::InvalidValue("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
