//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON extractor that runs the payload's validation rules before the
/// handler sees it. Deserialization and validation failures both surface
/// as a 400 with the offending messages.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value.validate().map_err(|errors| {
            let messages: Vec<String> = errors
                .field_errors()
                .iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{} is invalid", field),
                    })
                })
                .collect();
            AppError::validation(messages.join(", "))
        })?;

        Ok(ValidatedJson(value))
    }
}
