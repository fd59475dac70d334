//! Source locators: local paths and `http(s)://` URLs.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::AppError;

/// Where a source lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    Url(&'a str),
    Path(&'a str),
}

impl<'a> Locator<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let lower = raw.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Locator::Url(raw.trim())
        } else {
            Locator::Path(raw.trim())
        }
    }
}

/// Reads source text for a locator. One HTTP client is shared across reads.
pub struct SourceReader {
    client: Client,
}

impl SourceReader {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::usage(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn read(&self, locator: &str) -> Result<String, AppError> {
        match Locator::parse(locator) {
            Locator::Path(path) => std::fs::read_to_string(path)
                .map_err(|e| AppError::source_unavailable(format!("Failed to read source '{path}': {e}"))),
            Locator::Url(url) => self.fetch(url),
        }
    }

    fn fetch(&self, url: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::source_unavailable(format!("Request for '{url}' failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::source_unavailable(format!(
                "Request for '{url}' failed with status {}.",
                resp.status()
            )));
        }

        resp.text()
            .map_err(|e| AppError::source_unavailable(format!("Failed to read body of '{url}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use crate::error::ErrorKind;

    /// Serve one canned HTTP response on a local port; returns the base URL.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn locator_kinds() {
        assert_eq!(Locator::parse("https://example.org/a.csv"), Locator::Url("https://example.org/a.csv"));
        assert_eq!(Locator::parse("HTTP://example.org/a.csv"), Locator::Url("HTTP://example.org/a.csv"));
        assert_eq!(Locator::parse(" data/sleep.csv "), Locator::Path("data/sleep.csv"));
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let reader = SourceReader::new(Duration::from_secs(1)).unwrap();
        let err = reader.read("definitely/not/here.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    }

    #[test]
    fn url_body_is_returned() {
        let base = serve_once("200 OK", "date,Deep\n2024-01-01,60\n");
        let reader = SourceReader::new(Duration::from_secs(5)).unwrap();
        let text = reader.read(&format!("{base}/sleep.csv")).unwrap();
        assert_eq!(text, "date,Deep\n2024-01-01,60\n");
    }

    #[test]
    fn url_error_status_is_source_unavailable() {
        let base = serve_once("404 Not Found", "missing");
        let reader = SourceReader::new(Duration::from_secs(5)).unwrap();
        let err = reader.read(&format!("{base}/sleep.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
        assert!(err.message().contains("404"), "{}", err.message());
    }

    #[test]
    fn unreachable_url_is_source_unavailable() {
        // Bind then drop so nothing listens on the port.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let reader = SourceReader::new(Duration::from_secs(5)).unwrap();
        let err = reader.read(&format!("http://127.0.0.1:{port}/sleep.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    }
}
