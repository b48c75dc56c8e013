/*
 * Responsibility
 * - JSON body extractor。axum の Json と同じだが、失敗時は AppError::Validation を返す
 * - 壊れた body も field error と同じ 400 {field: message} 形式で返したい
 */
use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::api::dto::field_message;
use crate::error::AppError;

pub const BODY_FIELD: &str = "body";

pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), cause = %rejection.body_text(), "rejected request body");
                Err(AppError::Validation(rejection_fields(&rejection)))
            }
        }
    }
}

fn rejection_fields(rejection: &JsonRejection) -> BTreeMap<String, String> {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => "debe enviarse como application/json",
        JsonRejection::JsonDataError(_) => "no tiene el formato esperado",
        _ => "debe ser un JSON valido",
    };

    let mut fields = BTreeMap::new();
    fields.insert(BODY_FIELD.to_string(), field_message(BODY_FIELD, message));
    fields
}
