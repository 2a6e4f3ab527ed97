//! OTA install manifest generation.
//!
//! The device installer consumes a property-list document describing where
//! to fetch the payload and what to display while installing. The document
//! is small and fully determined by the package metadata, so it is rendered
//! directly rather than through a serializer.

use crate::registry::PackageInfo;

use super::assets::{DISPLAY_IMAGE_LARGE_PATH, DISPLAY_IMAGE_SMALL_PATH};

/// Render the install manifest for one registered package.
///
/// `base_url` is the scheme/host/port the owning server instance advertises,
/// without a trailing slash; every URL in the manifest is rooted there so the
/// device always talks back to the port the instance actually bound.
pub fn install_manifest(info: &PackageInfo, base_url: &str, id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>items</key>
	<array>
		<dict>
			<key>assets</key>
			<array>
				<dict>
					<key>kind</key>
					<string>software-package</string>
					<key>url</key>
					<string>{base_url}/{id}.ipa</string>
				</dict>
				<dict>
					<key>kind</key>
					<string>display-image</string>
					<key>url</key>
					<string>{base_url}{small_icon}</string>
				</dict>
				<dict>
					<key>kind</key>
					<string>full-size-image</string>
					<key>url</key>
					<string>{base_url}{large_icon}</string>
				</dict>
			</array>
			<key>metadata</key>
			<dict>
				<key>bundle-identifier</key>
				<string>{bundle_id}</string>
				<key>bundle-version</key>
				<string>{bundle_version}</string>
				<key>kind</key>
				<string>software</string>
				<key>title</key>
				<string>{title}</string>
			</dict>
		</dict>
	</array>
</dict>
</plist>
"#,
        small_icon = DISPLAY_IMAGE_SMALL_PATH,
        large_icon = DISPLAY_IMAGE_LARGE_PATH,
        bundle_id = xml_escape(&info.bundle_identifier),
        bundle_version = xml_escape(&info.bundle_version),
        title = xml_escape(&info.title),
    )
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> PackageInfo {
        PackageInfo {
            bundle_identifier: "com.example.demo".to_string(),
            bundle_version: "2.1".to_string(),
            title: "Demo App".to_string(),
        }
    }

    #[test]
    fn test_manifest_references_payload_on_own_port() {
        let manifest = install_manifest(&sample_info(), "https://127.0.0.1:4242", "abc-123");

        assert!(manifest.contains("<string>https://127.0.0.1:4242/abc-123.ipa</string>"));
        assert!(manifest.contains("<string>software-package</string>"));
        assert!(manifest.contains("<string>software</string>"));
        assert!(manifest.contains("<string>com.example.demo</string>"));
        assert!(manifest.contains("<string>2.1</string>"));
        assert!(manifest.contains("<string>Demo App</string>"));
    }

    #[test]
    fn test_manifest_references_display_icons() {
        let manifest = install_manifest(&sample_info(), "https://127.0.0.1:4242", "abc-123");

        assert!(manifest
            .contains("<string>https://127.0.0.1:4242/display-image-small.png</string>"));
        assert!(manifest
            .contains("<string>https://127.0.0.1:4242/display-image-large.png</string>"));
    }

    #[test]
    fn test_title_is_xml_escaped() {
        let info = PackageInfo {
            bundle_identifier: "com.example.demo".to_string(),
            bundle_version: "1.0".to_string(),
            title: "Fish & Chips <beta>".to_string(),
        };
        let manifest = install_manifest(&info, "https://127.0.0.1:4242", "abc");

        assert!(manifest.contains("<string>Fish &amp; Chips &lt;beta&gt;</string>"));
        assert!(!manifest.contains("Fish & Chips <beta>"));
    }
}
