//! OTA wire protocol routing.
//!
//! A single catch-all handler serves every path, matched most-specific
//! first: the reserved icon assets, the browser entry page, then the
//! id-addressed manifest and payload. Anything else is a 404 and is not
//! logged, so unrelated probing does not pollute the logs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio_util::io::ReaderStream;

use crate::installer::{InstallOutcome, InstallerStatus};
use crate::metrics::{MANIFESTS_SERVED, PAYLOADS_SERVED};
use crate::registry::PackageRegistry;

use super::assets::{DISPLAY_IMAGE_LARGE_PATH, DISPLAY_IMAGE_SMALL_PATH, PLACEHOLDER_ICON_PNG};
use super::install_server::device_install_link;
use super::manifest::install_manifest;
use super::stream::PayloadStream;

pub(super) struct InstallState {
    pub registry: Arc<PackageRegistry>,
    /// Advertised scheme/host/port, no trailing slash.
    pub base_url: String,
}

pub(super) fn install_router(registry: Arc<PackageRegistry>, base_url: String) -> Router {
    let state = Arc::new(InstallState { registry, base_url });
    Router::new()
        .fallback(get(handle_request))
        .with_state(state)
}

async fn handle_request(State(state): State<Arc<InstallState>>, uri: Uri) -> Response {
    let path = uri.path();

    if path == DISPLAY_IMAGE_SMALL_PATH || path == DISPLAY_IMAGE_LARGE_PATH {
        return (
            [(header::CONTENT_TYPE, "image/png")],
            PLACEHOLDER_ICON_PNG,
        )
            .into_response();
    }

    if let Some(id) = path.strip_prefix("/install/") {
        if !id.is_empty() && !id.contains('/') {
            return install_page(&state, id).await;
        }
    }

    // Remaining routes address a package by filename: /{id}.plist, /{id}.ipa
    let filename = path.trim_start_matches('/');
    if !filename.contains('/') {
        if let Some(id) = filename.strip_suffix(".plist") {
            return serve_manifest(&state, id).await;
        }
        if let Some(id) = filename.strip_suffix(".ipa") {
            return serve_payload(&state, id).await;
        }
    }

    StatusCode::NOT_FOUND.into_response()
}

/// Browser entry point: a minimal page that bounces the client to the
/// device-install URI, which hands control to the native installer.
async fn install_page(state: &InstallState, id: &str) -> Response {
    if state.registry.get(id).await.is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let link = device_install_link(&state.base_url, id);
    let html = format!(
        "<html style=\"background-color: black;\">\n\
         <script type=\"text/javascript\">window.location=\"{link}\"</script>\n\
         </html>"
    );
    ([(header::CONTENT_TYPE, "text/html")], html).into_response()
}

async fn serve_manifest(state: &InstallState, id: &str) -> Response {
    let Some(entry) = state.registry.get(id).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    entry.status.advance(InstallerStatus::SendingManifest);
    MANIFESTS_SERVED.inc();

    let body = install_manifest(&entry.info, &state.base_url, id);
    ([(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

async fn serve_payload(state: &InstallState, id: &str) -> Response {
    let Some(entry) = state.registry.get(id).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    entry.status.advance(InstallerStatus::SendingPayload);

    let file = match tokio::fs::File::open(&entry.package_path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(%id, path = %entry.package_path.display(), error = %e, "failed to open payload");
            entry.status.advance(InstallerStatus::Completed {
                outcome: InstallOutcome::Failure,
            });
            PAYLOADS_SERVED.with_label_values(&["failure"]).inc();
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let content_length = file.metadata().await.ok().map(|m| m.len());
    let stream = PayloadStream::new(ReaderStream::new(file), entry.status.clone());
    let body = Body::from_stream(stream);

    let mut response = (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        body,
    )
        .into_response();
    if let Some(len) = content_length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, header::HeaderValue::from(len));
    }
    response
}
