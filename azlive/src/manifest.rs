//! Manifest path building
//!
//! Pure string composition; no remote calls and no input validation. Empty
//! hostname or locator id yields a malformed but non-panicking URL, which
//! callers surface as-is.

/// Format suffix for HLS-compliant players (HLS.js, Shaka, ExoPlayer, iOS).
const HLS_FORMAT: &str = "format=m3u8-cmaf";
/// Format suffix for DASH players.
const DASH_FORMAT: &str = "format=mpd-time-cmaf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPaths {
    pub hls: String,
    pub dash: String,
}

/// Build the HLS and DASH manifest URLs for a published locator.
pub fn manifest_paths(
    scheme: &str,
    hostname: &str,
    locator_id: &str,
    manifest_name: &str,
) -> ManifestPaths {
    let base = format!("{scheme}://{hostname}/{locator_id}/{manifest_name}.ism/manifest");
    ManifestPaths {
        hls: format!("{base}({HLS_FORMAT})"),
        dash: format!("{base}({DASH_FORMAT})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_paths_golden() {
        let paths = manifest_paths("https", "abc.streaming.media.azure.net", "L1", "output");
        assert_eq!(
            paths.hls,
            "https://abc.streaming.media.azure.net/L1/output.ism/manifest(format=m3u8-cmaf)"
        );
        assert_eq!(
            paths.dash,
            "https://abc.streaming.media.azure.net/L1/output.ism/manifest(format=mpd-time-cmaf)"
        );
    }

    #[test]
    fn test_manifest_paths_deterministic() {
        let a = manifest_paths("https", "abc.streaming.media.azure.net", "L1", "output");
        let b = manifest_paths("https", "abc.streaming.media.azure.net", "L1", "output");
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_inputs_do_not_panic() {
        let paths = manifest_paths("https", "", "", "output");
        assert_eq!(paths.hls, "https:////output.ism/manifest(format=m3u8-cmaf)");
    }
}
