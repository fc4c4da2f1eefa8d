//! REST API handlers.
//!
//! Each handler calls into `ContentStore` and returns the JSON envelope
//! `{ success, data?, message?, warning?, error? }`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::error;

use codegear_content::*;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
            warning: None,
            error: None,
        })
    }

    /// Success after a write. Flags writes that never reached disk.
    fn written(data: T, message: &str, durability: Durability) -> Json<Self> {
        let warning = (durability == Durability::CachedOnly)
            .then(|| "changes were kept in memory only and will be lost on restart".to_string());
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            warning,
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            message: None,
            warning: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn content_error_response(e: &ContentError) -> Response {
    let status = match e {
        ContentError::InvalidPartition(_)
        | ContentError::MissingField(_)
        | ContentError::InvalidPatch { .. } => StatusCode::BAD_REQUEST,
        ContentError::NoticeNotFound(_) => StatusCode::NOT_FOUND,
        ContentError::StorageUnavailable { .. } | ContentError::Serialize(_) => {
            error!(error = %e, "content request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(&e.to_string(), status).into_response()
}

/// Extractor rejections (bad body, query or path) in the same envelope as
/// store errors.
fn rejection_response(status: StatusCode, body_text: &str) -> Response {
    error_response(body_text, status).into_response()
}

/// `?partition=` (or the older `?type=`). Empty means "everything".
#[derive(Debug, Default, serde::Deserialize)]
pub struct PartitionQuery {
    #[serde(default, alias = "type")]
    pub partition: Option<String>,
}

impl PartitionQuery {
    fn name(&self) -> ContentResult<Option<PartitionName>> {
        match self.partition.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

/// Body of `POST /api/content`.
#[derive(Debug, serde::Deserialize)]
pub struct WriteRequest {
    #[serde(default, alias = "type")]
    pub partition: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl WriteRequest {
    fn into_update(self) -> ContentResult<PartitionUpdate> {
        let partition = self
            .partition
            .filter(|p| !p.is_empty())
            .ok_or(ContentError::MissingField("partition"))?;
        let data = self.data.ok_or(ContentError::MissingField("data"))?;
        PartitionUpdate::from_json(partition.parse()?, data)
    }
}

// ── Content ────────────────────────────────────────────────────

/// GET /api/content
pub async fn read_content(
    State(state): State<ApiState>,
    query: Result<Query<PartitionQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };

    match query.name() {
        Ok(Some(name)) => ApiResponse::ok(state.store.read_partition(name)).into_response(),
        Ok(None) => ApiResponse::ok(state.store.read_document()).into_response(),
        Err(e) => content_error_response(&e),
    }
}

/// POST /api/content
pub async fn write_content(
    State(state): State<ApiState>,
    payload: Result<Json<WriteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };

    match req
        .into_update()
        .and_then(|update| state.store.write_partition(update))
    {
        Ok(outcome) => {
            ApiResponse::written(outcome.document, "saved", outcome.durability).into_response()
        }
        Err(e) => content_error_response(&e),
    }
}

/// DELETE /api/content
pub async fn reset_content(
    State(state): State<ApiState>,
    query: Result<Query<PartitionQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };
    let name = match query.name() {
        Ok(name) => name,
        Err(e) => return content_error_response(&e),
    };
    let message = match name {
        Some(_) => "partition reset",
        None => "all content reset",
    };

    match state.store.reset(name) {
        Ok(outcome) => {
            ApiResponse::written(outcome.document, message, outcome.durability).into_response()
        }
        Err(e) => content_error_response(&e),
    }
}

// ── Notices ────────────────────────────────────────────────────

/// POST /api/content/notices
pub async fn add_notice(
    State(state): State<ApiState>,
    payload: Result<Json<NoticeDraft>, JsonRejection>,
) -> impl IntoResponse {
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };

    match state.store.add_notice(draft) {
        Ok((notice, outcome)) => (
            StatusCode::CREATED,
            ApiResponse::written(notice, "notice added", outcome.durability),
        )
            .into_response(),
        Err(e) => content_error_response(&e),
    }
}

/// PATCH /api/content/notices/{id}
pub async fn update_notice(
    State(state): State<ApiState>,
    id: Result<Path<NoticeId>, PathRejection>,
    payload: Result<Json<NoticePatch>, JsonRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };

    match state.store.update_notice(id, patch) {
        Ok((notice, outcome)) => {
            ApiResponse::written(notice, "notice updated", outcome.durability).into_response()
        }
        Err(e) => content_error_response(&e),
    }
}

/// DELETE /api/content/notices/{id}
pub async fn delete_notice(
    State(state): State<ApiState>,
    id: Result<Path<NoticeId>, PathRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };

    match state.store.delete_notice(id) {
        Ok((notice, outcome)) => {
            ApiResponse::written(notice, "notice deleted", outcome.durability).into_response()
        }
        Err(e) => content_error_response(&e),
    }
}

/// POST /api/content/notices/{id}/views
pub async fn record_view(
    State(state): State<ApiState>,
    id: Result<Path<NoticeId>, PathRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };

    match state.store.record_view(id) {
        Ok((notice, _)) => ApiResponse::ok(notice).into_response(),
        Err(e) => content_error_response(&e),
    }
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> ApiState {
        ApiState {
            store: ContentStore::open_in_memory(),
        }
    }

    fn query(partition: &str) -> Result<Query<PartitionQuery>, QueryRejection> {
        Ok(Query(PartitionQuery {
            partition: Some(partition.to_string()),
        }))
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn read_whole_document() {
        let state = test_state();
        let resp = read_content(State(state), Ok(Query(PartitionQuery::default())))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["notices"].as_array().unwrap().len(), 6);
        assert!(body["data"]["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn read_single_partition() {
        let state = test_state();
        let resp = read_content(State(state), query("hero")).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["mainCopy"], "Connecting Intelligence to Hardware");
    }

    #[tokio::test]
    async fn read_invalid_partition() {
        let state = test_state();
        let resp = read_content(State(state), query("settings")).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("settings"));
    }

    #[tokio::test]
    async fn write_merges_singleton() {
        let state = test_state();
        let req = WriteRequest {
            partition: Some("social".to_string()),
            data: Some(json!({ "twitter": "https://x.com/codegear" })),
        };
        let resp = write_content(State(state.clone()), Ok(Json(req)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "saved");
        assert!(body.get("warning").is_none());
        assert_eq!(body["data"]["social"]["twitter"], "https://x.com/codegear");
        assert_eq!(body["data"]["social"]["github"], "https://github.com/codegear");
    }

    #[tokio::test]
    async fn write_missing_fields() {
        let state = test_state();
        let req = WriteRequest {
            partition: None,
            data: Some(json!([])),
        };
        let resp = write_content(State(state.clone()), Ok(Json(req)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = WriteRequest {
            partition: Some("notices".to_string()),
            data: None,
        };
        let resp = write_content(State(state), Ok(Json(req))).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "missing field: data");
    }

    #[tokio::test]
    async fn write_invalid_partition() {
        let state = test_state();
        let req = WriteRequest {
            partition: Some("footer".to_string()),
            data: Some(json!({})),
        };
        let resp = write_content(State(state), Ok(Json(req))).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reset_single_partition() {
        let state = test_state();
        state.store.delete_notice(1).unwrap();

        let resp = reset_content(State(state.clone()), query("notices"))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "partition reset");
        assert_eq!(body["data"]["notices"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn notice_lifecycle() {
        let state = test_state();
        let draft = NoticeDraft {
            category: "공지".to_string(),
            title: "시스템 점검 안내".to_string(),
            content: "점검 시간 동안 서비스가 중단됩니다.".to_string(),
        };

        let resp = add_notice(State(state.clone()), Ok(Json(draft))).await.into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["data"]["id"], 7);

        let patch = NoticePatch {
            category: Some("뉴스".to_string()),
            ..Default::default()
        };
        let resp = update_notice(State(state.clone()), Ok(Path(7)), Ok(Json(patch)))
            .await
            .into_response();
        assert_eq!(body_json(resp).await["data"]["category"], "뉴스");

        let resp = record_view(State(state.clone()), Ok(Path(7))).await.into_response();
        assert_eq!(body_json(resp).await["data"]["views"], 1);

        let resp = delete_notice(State(state.clone()), Ok(Path(7))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = delete_notice(State(state), Ok(Path(7))).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
