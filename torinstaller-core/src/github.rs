use crate::error::{InstallerError, Result};
use crate::logging::ProgressThrottle;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tokio::runtime::{Builder, Runtime};
use tracing::info;

const USER_AGENT: &str = concat!("TheOtherRoles-Installer/", env!("CARGO_PKG_VERSION"));

/// A GitHub repository publishing the mod as `<ASSET_NAME>` on every release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRepo {
    /// Scheme and host serving the release pages, without a trailing slash.
    pub base_url: String,
    pub owner: String,
    pub repo: String,
}

impl Default for ReleaseRepo {
    fn default() -> Self {
        Self {
            base_url: "https://github.com".into(),
            owner: "Eisbison".into(),
            repo: "TheOtherRoles".into(),
        }
    }
}

impl ReleaseRepo {
    pub const ASSET_NAME: &'static str = "TheOtherRoles.zip";

    fn releases_url(&self) -> String {
        format!("{}/{}/{}/releases", self.base_url, self.owner, self.repo)
    }

    pub fn latest_url(&self) -> String {
        format!("{}/latest", self.releases_url())
    }

    pub fn asset_url(&self, version: &str) -> String {
        format!("{}/download/{version}/{}", self.releases_url(), Self::ASSET_NAME)
    }

    /// Name of the temporary archive written into the game directory.
    pub fn archive_file_name(&self, version: &str) -> String {
        format!("{}_{version}.zip", self.repo)
    }
}

/// Source of the newest published version tag.
pub trait ReleaseChecker {
    fn latest_tag(&self) -> Result<String>;
}

/// Fetches a URL into a file, returning the byte count.
pub trait Downloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Extract `tag_name` from a release metadata document.
pub fn parse_latest_tag(body: &str) -> Result<String> {
    let doc: serde_json::Value = serde_json::from_str(body).map_err(|source| InstallerError::Json {
        context: "release metadata".into(),
        source,
    })?;
    doc.as_object()
        .and_then(|o| o.get("tag_name"))
        .and_then(|t| t.as_str())
        .map(str::to_owned)
        .ok_or(InstallerError::MissingTag)
}

/// Blocking GitHub client; each call drives a private current-thread runtime.
pub struct GitHubReleases {
    repo: ReleaseRepo,
    client: Client,
    rt: Runtime,
}

impl GitHubReleases {
    pub fn new(repo: ReleaseRepo) -> Result<Self> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(InstallerError::Runtime)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| InstallerError::Http { url: String::new(), source })?;
        Ok(Self { repo, client, rt })
    }

    pub fn repo(&self) -> &ReleaseRepo {
        &self.repo
    }

    async fn fetch_latest_tag(&self) -> Result<String> {
        let url = self.repo.latest_url();
        info!("GitHub fetch: {}", url);
        let http = |source: reqwest::Error| InstallerError::Http { url: url.clone(), source };
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(http)?;
        if resp.status() != StatusCode::OK {
            return Err(InstallerError::Status { url: url.clone(), status: resp.status().as_u16() });
        }
        let body = resp.text().await.map_err(http)?;
        parse_latest_tag(&body)
    }

    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<u64> {
        info!("Downloading {}", url);
        let http = |source: reqwest::Error| InstallerError::Http { url: url.to_owned(), source };
        let resp = self.client.get(url).send().await.map_err(http)?;
        if !resp.status().is_success() {
            return Err(InstallerError::Status { url: url.to_owned(), status: resp.status().as_u16() });
        }
        let total = resp.content_length().unwrap_or(0);
        let mut out = File::create(dest).map_err(|e| InstallerError::io("create", dest, e))?;
        let mut stream = resp.bytes_stream();
        let mut throttle = ProgressThrottle::new(500);
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(http)?;
            out.write_all(&chunk).map_err(|e| InstallerError::io("write", dest, e))?;
            written += chunk.len() as u64;
            throttle.report_bytes("Downloading", written, total);
        }
        out.flush().map_err(|e| InstallerError::io("write", dest, e))?;
        info!("Downloaded {} to {}", humansize::format_size(written, humansize::BINARY), dest.display());
        Ok(written)
    }
}

impl ReleaseChecker for GitHubReleases {
    fn latest_tag(&self) -> Result<String> {
        self.rt.block_on(self.fetch_latest_tag())
    }
}

impl Downloader for GitHubReleases {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.rt.block_on(self.fetch_to_file(url, dest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serves one canned response on a loopback port and hands back the raw request head.
    fn serve_once(status: &str, body: &'static [u8]) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let status = status.to_owned();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            let header = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
            head
        });
        (base, handle)
    }

    fn client_for(base_url: String) -> GitHubReleases {
        let repo = ReleaseRepo { base_url, ..ReleaseRepo::default() };
        GitHubReleases {
            repo,
            client: Client::builder().user_agent(USER_AGENT).no_proxy().build().unwrap(),
            rt: Builder::new_current_thread().enable_all().build().unwrap(),
        }
    }

    #[test]
    fn latest_tag_is_requested_as_json() {
        let (base, server) = serve_once("200 OK", br#"{"id":7,"tag_name":"v3.2.0"}"#);
        let gh = client_for(base);

        assert_eq!(gh.latest_tag().unwrap(), "v3.2.0");

        let head = server.join().unwrap();
        let lower = head.to_ascii_lowercase();
        assert!(head.starts_with("GET /Eisbison/TheOtherRoles/releases/latest HTTP/1.1"), "{head}");
        assert!(lower.contains("accept: application/json"), "{head}");
        assert!(lower.contains("user-agent: theotherroles-installer/"), "{head}");
    }

    #[test]
    fn latest_tag_fails_on_error_status() {
        let (base, server) = serve_once("404 Not Found", b"Not Found");
        let gh = client_for(base);

        let err = gh.latest_tag().unwrap_err();

        assert!(matches!(err, InstallerError::Status { status: 404, .. }), "{err}");
        server.join().unwrap();
    }

    #[test]
    fn download_writes_body_to_destination() {
        let payload: &'static [u8] = b"PK\x03\x04 not really a zip \x00\xff";
        let (base, server) = serve_once("200 OK", payload);
        let gh = client_for(base);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("TheOtherRoles_v3.2.0.zip");
        let url = gh.repo().asset_url("v3.2.0");

        let written = gh.download(&url, &dest).unwrap();

        assert_eq!(written, payload.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), payload);
        let head = server.join().unwrap();
        assert!(head.starts_with("GET /Eisbison/TheOtherRoles/releases/download/v3.2.0/TheOtherRoles.zip "), "{head}");
    }

    #[test]
    fn download_fails_on_error_status() {
        let (base, server) = serve_once("503 Service Unavailable", b"");
        let gh = client_for(base);
        let dir = tempfile::tempdir().unwrap();
        let url = gh.repo().asset_url("v3.2.0");

        let err = gh.download(&url, &dir.path().join("x.zip")).unwrap_err();

        assert!(matches!(err, InstallerError::Status { status: 503, .. }), "{err}");
        assert!(!dir.path().join("x.zip").exists());
        server.join().unwrap();
    }

    #[test]
    fn urls_follow_release_layout() {
        let repo = ReleaseRepo::default();
        assert_eq!(repo.latest_url(), "https://github.com/Eisbison/TheOtherRoles/releases/latest");
        assert_eq!(
            repo.asset_url("v3.2.0"),
            "https://github.com/Eisbison/TheOtherRoles/releases/download/v3.2.0/TheOtherRoles.zip"
        );
        assert_eq!(repo.archive_file_name("v3.2.0"), "TheOtherRoles_v3.2.0.zip");
    }

    #[test]
    fn tag_is_read_from_metadata() {
        let body = r#"{"id":1,"tag_name":"v3.2.0","update_url":"/Eisbison/TheOtherRoles/releases/tag/v3.2.0"}"#;
        assert_eq!(parse_latest_tag(body).unwrap(), "v3.2.0");
    }

    #[test]
    fn missing_or_mistyped_tag_is_an_error() {
        assert!(matches!(parse_latest_tag(r#"{"id":1}"#), Err(InstallerError::MissingTag)));
        assert!(matches!(parse_latest_tag(r#"{"tag_name":320}"#), Err(InstallerError::MissingTag)));
        assert!(matches!(parse_latest_tag(r#"["v1"]"#), Err(InstallerError::MissingTag)));
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(matches!(
            parse_latest_tag("<html>rate limited</html>"),
            Err(InstallerError::Json { .. })
        ));
    }
}
