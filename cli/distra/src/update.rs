//! Remote release check.
//!
//! The remote marker is a plain-text `major.minor.subminor` file. A body of
//! `404: Not Found` (what raw file hosts serve for a missing file) means no
//! release is published.

use std::time::Duration;

use anyhow::{Context, Result};

use distra_core::Version;

const NOT_FOUND_BODY: &str = "404: Not Found";
const USER_AGENT: &str = concat!("distra/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of comparing the running version with the published one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Nothing is published remotely.
    Unknown,
    UpToDate,
    Available { local: Version, remote: Version },
}

/// Fetch the published version text from `url`.
///
/// Returns `None` when nothing is published there.
pub fn fetch_remote_version(url: &str) -> Result<Option<String>> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime for HTTP request")?;

    runtime.block_on(async move {
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to connect to {url}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .context("Failed to read version response")?;
        if body.trim() == NOT_FOUND_BODY {
            return Ok(None);
        }
        Ok(Some(body))
    })
}

/// Compare `local` against the text published at `url`.
pub fn check(local: &str, url: &str) -> Result<UpdateStatus> {
    let Some(remote) = fetch_remote_version(url)? else {
        log::debug!("no published version at {url}");
        return Ok(UpdateStatus::Unknown);
    };
    compare(local, &remote)
}

/// Compare two version strings.
pub fn compare(local: &str, remote: &str) -> Result<UpdateStatus> {
    let remote = Version::parse(remote).context("invalid remote version")?;
    let local = Version::parse(local).context("invalid local version")?;
    if local < remote {
        Ok(UpdateStatus::Available { local, remote })
    } else {
        Ok(UpdateStatus::UpToDate)
    }
}

/// User-facing notice for an available update.
pub fn notice(local: &Version, remote: &Version) -> String {
    format!(
        "A new version of Distra is available!({local} -> {remote})\n\
         run `cargo install distra` to install it"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single response with `status` and `body`, then close.
    fn spawn_server(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/version.txt", listener.local_addr().unwrap());

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        });

        url
    }

    #[test]
    fn newer_remote_is_available() {
        let url = spawn_server("200 OK", "1.2.0\n");
        let status = check("1.1.9", &url).unwrap();
        assert_eq!(
            status,
            UpdateStatus::Available {
                local: Version::new(1, 1, 9),
                remote: Version::new(1, 2, 0),
            }
        );
    }

    #[test]
    fn same_version_is_up_to_date() {
        let url = spawn_server("200 OK", "0.3.0");
        assert_eq!(check("0.3.0", &url).unwrap(), UpdateStatus::UpToDate);
    }

    #[test]
    fn not_found_body_is_unknown() {
        let url = spawn_server("200 OK", NOT_FOUND_BODY);
        assert_eq!(check("0.3.0", &url).unwrap(), UpdateStatus::Unknown);
    }

    #[test]
    fn not_found_status_is_unknown() {
        let url = spawn_server("404 Not Found", "");
        assert_eq!(check("0.3.0", &url).unwrap(), UpdateStatus::Unknown);
    }

    #[test]
    fn garbage_remote_is_error() {
        let url = spawn_server("200 OK", "<html>nope</html>");
        assert!(check("0.3.0", &url).is_err());
    }

    #[test]
    fn unreachable_server_is_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/version.txt", listener.local_addr().unwrap());
        drop(listener);
        assert!(fetch_remote_version(&url).is_err());
    }

    #[test]
    fn blank_local_counts_as_zero() {
        assert_eq!(
            compare("", "0.0.1").unwrap(),
            UpdateStatus::Available {
                local: Version::new(0, 0, 0),
                remote: Version::new(0, 0, 1),
            }
        );
    }

    #[test]
    fn notice_mentions_both_versions() {
        let text = notice(&Version::new(0, 2, 0), &Version::new(0, 3, 1));
        assert!(text.starts_with("A new version of Distra is available!(0.2.0 -> 0.3.1)"));
    }
}
