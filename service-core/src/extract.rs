//! Request extractors whose rejections render through [`AppError`].

use crate::error::AppError;
use axum::extract::FromRequest;

/// `axum::Json` for request bodies, with rejections in the `{error, details?}` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
