use std::io::{self, Read, Write};
use std::path::Path;

use url::Url;

use super::confirm::{parse_interstitial, Interstitial};
use super::resolve::{download_url, extract_file_id};
use super::DriveConfig;
use crate::error::FetchError;
use crate::source::RemoteSource;
use crate::transfer::Transfer;

/// Interstitial pages followed before giving up.
const MAX_CONFIRM_HOPS: usize = 3;

const NOT_PUBLIC_MESSAGE: &str = "cannot retrieve the public link of the file; \
you may need to change its sharing permission to 'Anyone with the link', \
or the file has had many accesses recently";

/// Blocking Google Drive client.
///
/// File IDs and Drive sharing links are rewritten to the `uc` download
/// endpoint; any other URL is fetched as-is and saved verbatim.
pub struct DriveClient {
    agent: ureq::Agent,
    base_url: Url,
    user_agent: String,
}

impl DriveClient {
    pub fn new(config: DriveConfig) -> Result<Self, FetchError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|source| FetchError::InvalidConfig {
            message: format!("invalid Drive base URL '{}': {source}", config.base_url),
        })?;

        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build();
        let agent: ureq::Agent = agent_config.into();

        Ok(Self {
            agent,
            base_url,
            user_agent: config.user_agent,
        })
    }

    /// First URL to request for `source`, and whether Drive interstitials
    /// should be expected on the way.
    fn request_url(&self, source: &RemoteSource) -> Result<(Url, bool), FetchError> {
        let file_id = match source {
            RemoteSource::FileId(id) => Some(id.clone()),
            RemoteSource::Url(link) => extract_file_id(link),
        };

        match file_id {
            Some(id) => download_url(&self.base_url, &id)
                .map(|url| (url, true))
                .map_err(|err| FetchError::transfer_failed(source.as_str(), err.to_string())),
            None => Url::parse(source.as_str())
                .map(|url| (url, false))
                .map_err(|err| {
                    FetchError::transfer_failed(source.as_str(), format!("invalid URL: {err}"))
                }),
        }
    }
}

impl Transfer for DriveClient {
    fn transfer(&self, source: &RemoteSource, output: &Path) -> Result<(), FetchError> {
        let failed = |message: String| FetchError::transfer_failed(source.as_str(), message);

        let (mut url, expect_interstitials) = self.request_url(source)?;
        tracing::debug!(%url, output = %output.display(), "starting transfer");

        for _ in 0..=MAX_CONFIRM_HOPS {
            let mut response = self
                .agent
                .get(url.as_str())
                .header("User-Agent", self.user_agent.as_str())
                .call()
                .map_err(|err| failed(err.to_string()))?;

            let headers = response.headers();
            let is_attachment = headers.contains_key("content-disposition");
            let is_html = headers
                .get("content-type")
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim_start().to_ascii_lowercase().starts_with("text/html"))
                .unwrap_or(false);

            // Drive marks real downloads with Content-Disposition, whatever their type.
            if !expect_interstitials || is_attachment || !is_html {
                let written = write_atomically(response.body_mut().as_reader(), output)
                    .map_err(|err| failed(format!("writing {}: {err}", output.display())))?;
                tracing::debug!(bytes = written, output = %output.display(), "transfer complete");
                return Ok(());
            }

            let page = response
                .body_mut()
                .read_to_string()
                .map_err(|err| failed(err.to_string()))?;

            match parse_interstitial(&page, &url) {
                Interstitial::Next(next) => {
                    tracing::debug!(%next, "following Drive confirmation page");
                    url = next;
                }
                Interstitial::Error(message) => return Err(failed(message)),
                Interstitial::Unknown => return Err(failed(NOT_PUBLIC_MESSAGE.to_string())),
            }
        }

        Err(failed(format!("gave up after {MAX_CONFIRM_HOPS} confirmation pages")))
    }
}

/// Stream `body` into a uniquely named sibling of `output`, then rename it
/// over `output`.
///
/// The temporary file is removed if anything fails.
fn write_atomically(mut body: impl Read, output: &Path) -> io::Result<u64> {
    let parent = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut partial = tempfile::Builder::new()
        .prefix(".samplefetch-")
        .suffix(".part")
        .tempfile_in(parent)?;

    let written = io::copy(&mut body, partial.as_file_mut())?;
    partial.as_file_mut().flush()?;
    partial.as_file().sync_all()?;
    partial.persist(output).map_err(|err| err.error)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DriveClient {
        DriveClient::new(DriveConfig::default()).expect("client")
    }

    #[test]
    fn file_ids_go_to_uc_endpoint() {
        let (url, drive) = client()
            .request_url(&RemoteSource::FileId("abc".to_string()))
            .expect("url");
        assert!(drive);
        assert_eq!(url.as_str(), "https://drive.google.com/uc?id=abc&export=download");
    }

    #[test]
    fn drive_links_are_rewritten() {
        let source = RemoteSource::Url("https://drive.google.com/file/d/abc/view?usp=sharing".into());
        let (url, drive) = client().request_url(&source).expect("url");
        assert!(drive);
        assert_eq!(url.as_str(), "https://drive.google.com/uc?id=abc&export=download");
    }

    #[test]
    fn other_urls_are_fetched_verbatim() {
        let source = RemoteSource::Url("https://example.org/data/sample.h5".into());
        let (url, drive) = client().request_url(&source).expect("url");
        assert!(!drive);
        assert_eq!(url.as_str(), "https://example.org/data/sample.h5");
    }

    #[test]
    fn malformed_url_is_transfer_failure() {
        let source = RemoteSource::Url("http//missing-colon".into());
        assert!(matches!(
            client().request_url(&source),
            Err(FetchError::TransferFailed { .. })
        ));
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_its_path() {
        let config = DriveConfig {
            base_url: "http://127.0.0.1:9/mirror".to_string(),
            ..DriveConfig::default()
        };
        let client = DriveClient::new(config).expect("client");
        let (url, _) = client
            .request_url(&RemoteSource::FileId("x".into()))
            .expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:9/mirror/uc?id=x&export=download");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let config = DriveConfig {
            base_url: "not a url".to_string(),
            ..DriveConfig::default()
        };
        assert!(matches!(
            DriveClient::new(config),
            Err(FetchError::InvalidConfig { .. })
        ));
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read_dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn atomic_write_replaces_output_and_cleans_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("sample.bin");
        std::fs::write(&output, "stale").expect("write");

        let written = write_atomically(&b"payload"[..], &output).expect("write");
        assert_eq!(written, 7);
        assert_eq!(std::fs::read(&output).expect("read"), b"payload");
        assert_eq!(entries(dir.path()), vec!["sample.bin"]);
    }

    #[test]
    fn atomic_write_leaves_part_named_sibling_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("sample.bin");
        let sibling = dir.path().join("sample.bin.part");
        std::fs::write(&sibling, "unrelated").expect("write");

        write_atomically(&b"payload"[..], &output).expect("write");
        assert_eq!(std::fs::read(&sibling).expect("read"), b"unrelated");
        assert_eq!(entries(dir.path()), vec!["sample.bin", "sample.bin.part"]);
    }

    #[test]
    fn atomic_write_failure_leaves_nothing_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("missing-parent").join("sample.bin");

        assert!(write_atomically(&b"payload"[..], &output).is_err());
        assert!(!output.exists());
        assert!(entries(dir.path()).is_empty());
    }
}
