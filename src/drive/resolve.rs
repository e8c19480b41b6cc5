use url::Url;

/// Hosts whose links carry a Drive file ID.
const DRIVE_HOSTS: &[&str] = &[
    "drive.google.com",
    "docs.google.com",
    "drive.usercontent.google.com",
];

/// Extract the file ID from a Google Drive or Docs sharing link.
///
/// Recognized forms include `/file/d/<id>/view`, `/file/u/0/d/<id>/edit`,
/// `/document/d/<id>/edit`, `/open?id=<id>` and `/uc?id=<id>`. Folder links
/// and links to other hosts return `None`.
pub fn extract_file_id(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    if !DRIVE_HOSTS.contains(&host.as_str()) {
        return None;
    }

    if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "id") {
        let id = id.trim();
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|iter| iter.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if segments.first() == Some(&"drive") {
        return None;
    }

    segments
        .windows(2)
        .find(|pair| pair[0] == "d")
        .map(|pair| pair[1].to_string())
}

/// Build the direct download URL for `file_id` against `base`.
pub fn download_url(base: &Url, file_id: &str) -> Result<Url, url::ParseError> {
    let mut url = base.join("uc")?;
    url.query_pairs_mut()
        .clear()
        .append_pair("id", file_id)
        .append_pair("export", "download");
    Ok(url)
}
