use std::borrow::Cow;

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{
    application::errors::AppError,
    domain::value_objects::validation::{NON_FIELD_ERRORS, validation_error},
};

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `Json<T>` whose rejections answer 400 with field errors instead of axum's plain-text 422.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::Validation(rejection_errors(&rejection))),
        }
    }
}

fn rejection_errors(rejection: &JsonRejection) -> ValidationErrors {
    let (field, message) = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            data_error_field(body_text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&body_text))
        }
        other => (NON_FIELD_ERRORS.to_string(), other.body_text()),
    };

    let mut errors = ValidationErrors::new();
    errors.errors_mut().insert(
        Cow::Owned(field),
        ValidationErrorsKind::Field(vec![validation_error("invalid", message)]),
    );
    errors
}

/// Splits a serde error such as ``duration: invalid value: integer `40000`, expected i16``
/// into the offending field and a message.
fn data_error_field(detail: &str) -> (String, String) {
    let detail = detail.split(" at line ").next().unwrap_or(detail);

    let (path, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.contains(' ') => (Some(path), message),
        _ => (None, detail),
    };

    if let Some(rest) = message.strip_prefix("missing field `") {
        let missing = rest.split('`').next().unwrap_or_default();
        let field = match path {
            Some(path) => format!("{path}.{missing}"),
            None => missing.to_string(),
        };
        return (field, "This field is required.".to_string());
    }

    let field = path.unwrap_or(NON_FIELD_ERRORS).to_string();
    (field, message.to_string())
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct HabitBody {
        action: String,
        duration: i16,
    }

    async fn extract(body: &str) -> Result<JsonBody<HabitBody>, AppError> {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/habits")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        JsonBody::<HabitBody>::from_request(req, &()).await
    }

    fn messages(err: AppError) -> Vec<(String, String)> {
        match err {
            AppError::Validation(errors) => errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors
                        .iter()
                        .map(|error| {
                            let message = error.message.clone().unwrap_or_default().to_string();
                            (field.to_string(), message)
                        })
                        .collect::<Vec<_>>()
                })
                .collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_field_is_reported_as_required() {
        let err = extract(r#"{"duration":30}"#).await.unwrap_err();
        assert_eq!(
            messages(err),
            vec![("action".to_string(), "This field is required.".to_string())]
        );
    }

    #[tokio::test]
    async fn out_of_range_integer_is_reported_on_its_field() {
        let err = extract(r#"{"action":"Stretch","duration":40000}"#).await.unwrap_err();
        let messages = messages(err);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "duration");
        assert!(messages[0].1.contains("40000"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_non_field_error() {
        let err = extract(r#"{"action":"#).await.unwrap_err();
        let messages = messages(err);
        assert_eq!(messages[0].0, NON_FIELD_ERRORS);
    }

    #[tokio::test]
    async fn rejections_answer_bad_request() {
        use axum::{http::StatusCode, response::IntoResponse};

        let err = extract(r#"{"duration":30}"#).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_body_is_extracted() {
        let JsonBody(body) = extract(r#"{"action":"Stretch","duration":30}"#).await.unwrap();
        assert_eq!(body.action, "Stretch");
        assert_eq!(body.duration, 30);
    }
}
