//! Remote rendering via the mermaid.ink HTTP API.
//!
//! Diagram source is deflated, base64-encoded and embedded in the request
//! URL (the `pako:` scheme the service expects), so rendering is a single
//! GET with no request body.

use std::io::Write as _;
use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use ureq::Agent;

use crate::error::RenderError;
use crate::format::OutputFormat;

/// Public mermaid.ink instance.
pub const DEFAULT_INK_URL: &str = "https://mermaid.ink";

/// Tiny valid diagram used to probe service availability.
const PROBE_SOURCE: &str = "graph TD;A-->B";

/// Compress and encode diagram source for a mermaid.ink URL.
///
/// The service decodes `pako:` payloads as URL-safe base64 over
/// zlib-compressed UTF-8.
#[must_use]
pub fn encode_diagram(source: &str) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    // Writing to a Vec cannot fail.
    let _ = encoder.write_all(source.as_bytes());
    let compressed = encoder.finish().unwrap_or_default();
    URL_SAFE.encode(compressed)
}

/// Renderer backed by the mermaid.ink API.
///
/// Holds a pooled HTTP agent so repeated renders reuse connections.
pub struct InkRenderer {
    agent: Agent,
    base_url: String,
    theme: Option<String>,
    background: Option<String>,
}

impl InkRenderer {
    /// Create a renderer against the public instance with the given timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_INK_URL, timeout)
    }

    /// Create a renderer against a specific mermaid.ink instance.
    #[must_use]
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            theme: None,
            background: None,
        }
    }

    /// Set the mermaid theme query parameter (e.g. `dark`, `neutral`).
    #[must_use]
    pub fn theme(mut self, theme: &str) -> Self {
        self.theme = Some(theme.to_owned());
        self
    }

    /// Set the background color query parameter (e.g. `white`, `!2b2b2b`).
    #[must_use]
    pub fn background(mut self, background: &str) -> Self {
        self.background = Some(background.to_owned());
        self
    }

    /// Build the request URL for the given source and format.
    fn request_url(&self, source: &str, format: OutputFormat) -> String {
        let endpoint = match format {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "img",
        };
        let payload = encode_diagram(source);
        let mut url = format!("{}/{endpoint}/pako:{payload}", self.base_url);

        let mut params = Vec::new();
        if let Some(theme) = &self.theme {
            params.push(format!("theme={theme}"));
        }
        if let Some(background) = &self.background {
            params.push(format!("bgColor={background}"));
        }
        if matches!(format, OutputFormat::Png) {
            params.push(String::from("type=png"));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    /// Fetch rendered bytes for a diagram.
    fn fetch(&self, source: &str, format: OutputFormat) -> Result<Vec<u8>, RenderError> {
        let url = self.request_url(source, format);
        tracing::debug!(url = %url, "requesting render");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| RenderError::Api(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let detail = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            let message = match status {
                400 => format!("invalid diagram syntax: {detail}"),
                413 => String::from("diagram too large for remote rendering"),
                429 => String::from("rate limited by mermaid.ink, retry later"),
                _ => format!("HTTP {status}: {detail}"),
            };
            return Err(RenderError::Api(message));
        }

        body.read_to_vec().map_err(|e| RenderError::Api(e.to_string()))
    }

    /// Probe the service with a minimal diagram.
    ///
    /// Returns `false` on any network or HTTP failure so callers can fall
    /// back to a local renderer.
    #[must_use]
    pub fn check_api_available(&self) -> bool {
        self.fetch(PROBE_SOURCE, OutputFormat::Svg).is_ok()
    }
}

impl crate::renderer::DiagramRenderer for InkRenderer {
    fn render(
        &self,
        source: &str,
        output_path: &Path,
        format: OutputFormat,
    ) -> Result<(), RenderError> {
        if source.trim().is_empty() {
            return Err(RenderError::EmptySource);
        }

        let data = self.fetch(source, format)?;
        if data.is_empty() {
            return Err(RenderError::EmptyOutput {
                path: output_path.to_path_buf(),
            });
        }
        std::fs::write(output_path, &data).map_err(|e| RenderError::Io {
            path: output_path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_diagram_is_url_safe() {
        let encoded = encode_diagram("graph TD;A-->B;B-->C;C-->D;D-->A");
        assert!(!encoded.is_empty());
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn test_encode_diagram_deterministic() {
        assert_eq!(encode_diagram("pie\n  \"a\": 1"), encode_diagram("pie\n  \"a\": 1"));
    }

    #[test]
    fn test_request_url_svg() {
        let renderer = InkRenderer::new(Duration::from_secs(5));
        let url = renderer.request_url("graph TD;A-->B", OutputFormat::Svg);
        assert!(url.starts_with("https://mermaid.ink/svg/pako:"));
        assert!(!url.contains('?'));
    }

    #[test]
    fn test_request_url_png_with_theme() {
        let renderer =
            InkRenderer::with_base_url("https://ink.example.com/", Duration::from_secs(5))
                .theme("dark")
                .background("white");
        let url = renderer.request_url("pie", OutputFormat::Png);
        assert!(url.starts_with("https://ink.example.com/img/pako:"));
        assert!(url.contains("theme=dark"));
        assert!(url.contains("bgColor=white"));
        assert!(url.contains("type=png"));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let renderer = InkRenderer::with_base_url("http://localhost:3000/", Duration::from_secs(5));
        let url = renderer.request_url("pie", OutputFormat::Svg);
        assert!(url.starts_with("http://localhost:3000/svg/"));
    }
}
