use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("No images found")]
    NoImages,

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Invalid root directory: {0}")]
    InvalidRoot(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GalleryError::ImageNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            GalleryError::NoImages => (StatusCode::NOT_FOUND, self.to_string()),
            GalleryError::InvalidFileName(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            GalleryError::InvalidRoot(_)
            | GalleryError::Template(_)
            | GalleryError::Internal(_)
            | GalleryError::Io(_) => {
                tracing::error!("{:?}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
