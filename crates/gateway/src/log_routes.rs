//! `GET /log` and `PATCH /log`.
//!
//! Reads return the current global level and SQL flag. Patches apply
//! any subset of {global level, SQL flag, per-service overrides};
//! validation failures map to 400, an unparseable body to 422, and
//! store/config failures to 500.

use {
    axum::{
        Json,
        extract::{State, rejection::JsonRejection},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::{Deserialize, Serialize},
};

use logctl_control::{Error, LogPatch, PatchOutcome};

use crate::server::AppState;

/// Wire shape of a bulk update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogPatchRequest {
    pub level: Option<String>,
    pub filter: Option<String>,
    pub sql_enabled: Option<bool>,
    /// `[[serviceName, levelString], ...]`, applied in order.
    pub service_log_level: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogResource {
    level: String,
    sql_enabled: bool,
}

/// Comma-joined, positionally aligned per-service response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceLevelResource {
    service_name: String,
    log_level: String,
}

/// Current global level and SQL flag.
pub async fn get_log(State(state): State<AppState>) -> Response {
    match state.service.snapshot() {
        Ok(snapshot) => Json(LogResource {
            level: snapshot.level.to_string(),
            sql_enabled: snapshot.sql_enabled,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Apply a bulk update to global and per-service log settings.
pub async fn patch_log(
    State(state): State<AppState>,
    body: Result<Json<LogPatchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(json) => json,
        Err(rejection) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": rejection.body_text() })),
            )
                .into_response();
        },
    };

    let patch = LogPatch {
        level: request.level,
        filter: request.filter,
        sql_enabled: request.sql_enabled,
        service_log_level: request.service_log_level,
    };

    match state.service.apply_patch(&patch).await {
        Ok(outcome) => patch_response(&outcome),
        Err(e) => error_response(&e),
    }
}

fn patch_response(outcome: &PatchOutcome) -> Response {
    if outcome.applied.is_empty() {
        return Json(LogResource {
            level: outcome.level.to_string(),
            sql_enabled: outcome.sql_enabled,
        })
        .into_response();
    }

    let (names, levels): (Vec<&str>, Vec<&str>) = outcome
        .applied
        .iter()
        .map(|(name, level)| (name.as_str(), level.as_str()))
        .unzip();
    Json(ServiceLevelResource {
        service_name: names.join(","),
        log_level: levels.join(","),
    })
    .into_response()
}

fn error_response(error: &Error) -> Response {
    let status = if error.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}
