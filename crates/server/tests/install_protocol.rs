//! Integration tests for the OTA install protocol over a real socket.
//!
//! Each test starts an in-process install server on its random port and
//! plays the device's side of the exchange with a plain HTTP client.

use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use airlift_core::{
    InstallOutcome, InstallServer, InstallServerConfig, InstallerStatus, PackageInfo, StatusHandle,
    DISPLAY_IMAGE_SMALL_PATH, PORT_RANGE,
};

fn package_info(title: &str) -> PackageInfo {
    PackageInfo {
        bundle_identifier: format!("com.example.{title}"),
        bundle_version: "1.0.0".to_string(),
        title: title.to_string(),
    }
}

/// The advertised links use the https scheme the device-side installer
/// requires; the listener itself is plaintext, so tests talk to it over
/// http on the same port.
fn local_url(server: &InstallServer, path: &str) -> String {
    format!("http://127.0.0.1:{}{}", server.port(), path)
}

async fn start_server() -> InstallServer {
    InstallServer::start(InstallServerConfig::default())
        .await
        .expect("install server failed to start")
}

/// Register a package backed by a real payload file; returns its status.
async fn register_payload(
    server: &InstallServer,
    dir: &std::path::Path,
    id: &str,
    content: &[u8],
) -> StatusHandle {
    let path = dir.join(format!("{id}.ipa"));
    std::fs::write(&path, content).unwrap();

    let status = StatusHandle::new();
    server
        .register(id, package_info(id), path, status.clone())
        .await;
    status
}

async fn wait_for_terminal(status: &StatusHandle) -> InstallerStatus {
    for _ in 0..500 {
        if status.is_terminal() {
            return status.get();
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("status never became terminal, last: {:?}", status.get());
}

#[tokio::test]
async fn test_manifest_embeds_payload_and_icon_urls() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server().await;
    let status = register_payload(&server, dir.path(), "alpha", b"payload-bytes").await;

    let response = Client::new()
        .get(local_url(&server, "/alpha.plist"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/xml"
    );

    let body = response.text().await.unwrap();
    assert!(body.contains(&format!("{}/alpha.ipa", server.base_url())));
    assert!(body.contains(&format!("{}{}", server.base_url(), DISPLAY_IMAGE_SMALL_PATH)));
    assert!(body.contains("com.example.alpha"));

    assert!(matches!(status.get(), InstallerStatus::SendingManifest));
    server.shutdown();
}

#[tokio::test]
async fn test_payload_transfer_completes_install() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server().await;
    let content = vec![0x42u8; 64 * 1024];
    let status = register_payload(&server, dir.path(), "beta", &content).await;

    let response = Client::new()
        .get(local_url(&server, "/beta.ipa"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/octet-stream"
    );
    assert_eq!(
        response.content_length(),
        Some(content.len() as u64)
    );
    let bytes = response.bytes().await.unwrap();
    assert_eq!(bytes.as_ref(), content.as_slice());

    let terminal = wait_for_terminal(&status).await;
    assert!(matches!(
        terminal,
        InstallerStatus::Completed {
            outcome: InstallOutcome::Success
        }
    ));
    server.shutdown();
}

#[tokio::test]
async fn test_unknown_ids_are_404_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server().await;
    let status = register_payload(&server, dir.path(), "gamma", b"data").await;

    let client = Client::new();
    for path in ["/nope.plist", "/nope.ipa", "/install/nope", "/unrelated"] {
        let response = client.get(local_url(&server, path)).send().await.unwrap();
        assert_eq!(response.status(), 404, "expected 404 for {path}");
    }

    // Probing other ids never disturbs a registered package.
    assert!(matches!(status.get(), InstallerStatus::Idle));
    server.shutdown();
}

#[tokio::test]
async fn test_install_page_bounces_to_device_link() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server().await;
    register_payload(&server, dir.path(), "delta", b"data").await;

    let response = Client::new()
        .get(local_url(&server, "/install/delta"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/html"
    );
    let body = response.text().await.unwrap();
    assert!(body.contains(&server.install_link("delta")));
    server.shutdown();
}

#[tokio::test]
async fn test_icon_assets_are_served() {
    let server = start_server().await;

    let response = Client::new()
        .get(local_url(&server, DISPLAY_IMAGE_SMALL_PATH))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/png"
    );
    let bytes = response.bytes().await.unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
    server.shutdown();
}

#[tokio::test]
async fn test_missing_payload_file_fails_the_install() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server().await;

    let status = StatusHandle::new();
    server
        .register(
            "ghost",
            package_info("ghost"),
            dir.path().join("never-written.ipa"),
            status.clone(),
        )
        .await;

    let response = Client::new()
        .get(local_url(&server, "/ghost.ipa"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    assert!(matches!(
        status.get(),
        InstallerStatus::Completed {
            outcome: InstallOutcome::Failure
        }
    ));
    server.shutdown();
}

#[tokio::test]
async fn test_bound_port_is_in_fixed_range() {
    let server = start_server().await;
    assert!(PORT_RANGE.contains(&server.port()));
    server.shutdown();
}
