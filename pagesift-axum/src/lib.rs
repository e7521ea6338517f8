//! axum integration for pagesift
//!
//! Provides the [`PageQuery`] extractor, which parses a request's query
//! string into [`PageParams`], and an `IntoResponse` mapping that turns
//! pagesift errors into the standard `{error, code, message}` JSON body
//! with a 400 status for client errors.
//!
//! ```ignore
//! async fn list_heroes(
//!     PageQuery(params): PageQuery,
//!     State(pool): State<SqlitePool>,
//! ) -> Result<Json<PaginatedResponse<SqlRow>>, ApiError> {
//!     let query = SelectQuery::from_table("heroes")
//!         .column("id", ScalarType::Int)
//!         .column("name", ScalarType::Text);
//!     let response = Pager::new(params)
//!         .generate_response_async(query, &pool)
//!         .await?;
//!     Ok(Json(response))
//! }
//! ```

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use pagesift::{Error, PageParams, PageUrl, PagerConfig};

/// Extractor that parses filter/search/sort/pagination query parameters
/// with the default [`PagerConfig`].
///
/// For custom bounds or strict mode, call [`page_params_from_parts`] from
/// your own extractor or handler.
#[derive(Debug)]
pub struct PageQuery(pub PageParams);

impl<S: Send + Sync> FromRequestParts<S> for PageQuery {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = page_params_from_parts(parts, &PagerConfig::default())?;
        Ok(Self(params))
    }
}

/// Parse [`PageParams`] from request parts with an explicit configuration.
pub fn page_params_from_parts(parts: &Parts, config: &PagerConfig) -> Result<PageParams, ApiError> {
    let raw_query = parts.uri.query().unwrap_or("");
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw_query)
        .map_err(|e| ApiError(Error::InvalidArgument(format!("Malformed query string: {}", e))))?;
    let url = PageUrl::with_query(parts.uri.path(), raw_query);
    PageParams::from_pairs(url, &pairs, config).map_err(ApiError)
}

/// Response wrapper for pagesift errors.
///
/// Client errors map to 400 with the error's code and message; execution
/// failures map to 500 with the backend detail withheld from the body.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = if self.0.is_client_error() {
            (StatusCode::BAD_REQUEST, "bad_request", self.0.to_string())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Database operation failed".to_string(),
            )
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": self.0.code(),
                "message": message
            })),
        )
            .into_response()
    }
}
