//! Image Upload

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use detection::DetectionError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::AppState;

/// Response for a recorded upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub pothole_detected: bool,
}

/// Image part of the form
#[derive(Debug)]
struct UploadedImage {
    file_name: String,
    bytes: Bytes,
}

/// Fields collected from the multipart body
#[derive(Debug, Default)]
struct UploadForm {
    image: Option<UploadedImage>,
    latitude: Option<String>,
    longitude: Option<String>,
}

impl UploadForm {
    /// Drain the body. The first occurrence of each field wins; an `image`
    /// part only counts when it carries a filename.
    async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "image" => {
                    let Some(file_name) = field.file_name().map(str::to_owned) else {
                        continue;
                    };
                    let bytes = field.bytes().await?;
                    if form.image.is_none() {
                        form.image = Some(UploadedImage { file_name, bytes });
                    }
                }
                "latitude" => {
                    let text = field.text().await?;
                    form.latitude.get_or_insert(text);
                }
                "longitude" => {
                    let text = field.text().await?;
                    form.longitude.get_or_insert(text);
                }
                other => debug!("Ignoring form field '{}'", other),
            }
        }

        Ok(form)
    }
}

/// Stage the image, classify it, and record the observation
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Ok(mut multipart) = multipart else {
        warn!("Upload rejected: body is not multipart/form-data");
        return Err(ApiError::MissingInput);
    };
    let form = UploadForm::read(&mut multipart).await?;

    let (image, latitude, longitude) = match (form.image, form.latitude, form.longitude) {
        (Some(image), Some(latitude), Some(longitude))
            if !latitude.is_empty() && !longitude.is_empty() =>
        {
            (image, latitude, longitude)
        }
        _ => {
            warn!("Upload rejected: missing image, latitude or longitude");
            return Err(ApiError::MissingInput);
        }
    };

    let point = state.validator.point(Some(&latitude), Some(&longitude))?;
    metrics::counter!("pothole_uploads_total").increment(1);

    // Released below on success; dropping the guard on an error path removes it too
    let staged = state.staging.stage(&image.file_name, &image.bytes).await?;

    let detector = Arc::clone(&state.detector);
    let bytes = image.bytes.clone();
    let pothole_detected = tokio::task::spawn_blocking(move || detector.classify(&bytes))
        .await
        .map_err(|e| DetectionError::ClassifierFailed(format!("detector task failed: {e}")))??;

    if pothole_detected {
        metrics::counter!("pothole_detections_total").increment(1);
    }

    let id = state
        .store
        .add(point.latitude, point.longitude, pothole_detected)
        .await?;

    info!(
        "Recorded observation {} at ({}, {}) from {}: pothole_detected={}",
        id,
        point.latitude,
        point.longitude,
        staged.path().display(),
        pothole_detected
    );
    staged.release().await;

    Ok(Json(UploadResponse {
        status: "success",
        pothole_detected,
    }))
}
