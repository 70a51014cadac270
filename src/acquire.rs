//! Fetch the dataset archive into the download directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;

use crate::dirs::reset_dir;

/// Download `url` into `dest_dir`, which is emptied first. Returns
/// `<dest_dir>/<basename of url>`.
///
/// `http`/`https` go through a blocking HTTP GET; `file://` URLs are copied
/// from the local filesystem.
pub fn download(url: &str, dest_dir: &Path) -> Result<PathBuf> {
    let parsed = Url::parse(url).with_context(|| format!("invalid download URL '{url}'"))?;
    let file_name = file_name_of(&parsed)?;

    reset_dir(dest_dir)?;
    let dest = dest_dir.join(&file_name);

    log::info!(
        "Downloading {file_name} from [{url}] into [{}]",
        dest.display()
    );
    let bytes = match parsed.scheme() {
        "http" | "https" => fetch_http(&parsed, &dest)?,
        "file" => copy_local(&parsed, &dest)?,
        other => bail!("Unsupported URL scheme '{other}'"),
    };
    log::debug!("Wrote {bytes} bytes to {}", dest.display());

    Ok(dest)
}

/// Last non-empty path segment of the URL.
pub fn file_name_of(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .with_context(|| format!("URL '{url}' does not name a file"))
}

fn fetch_http(url: &Url, dest: &Path) -> Result<u64> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;

    let mut response = client
        .get(url.clone())
        .send()
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("downloading {url}"))?;

    let mut file =
        fs::File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
    response
        .copy_to(&mut file)
        .with_context(|| format!("writing {}", dest.display()))
}

fn copy_local(url: &Url, dest: &Path) -> Result<u64> {
    let src = url
        .to_file_path()
        .map_err(|_| anyhow!("URL '{url}' is not a valid local path"))?;
    fs::copy(&src, dest).with_context(|| format!("copying {}", src.display()))
}
