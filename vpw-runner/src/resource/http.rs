// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::ResourceReader;
use crate::errors::ReadResourceError;
use camino::Utf8PathBuf;
use tracing::debug;

/// Fetches resources over HTTP, relative to a base URL.
///
/// The resource `in.txt` with fixture directory `src` and base URL
/// `https://example.com/vpw` is fetched from `https://example.com/vpw/src/in.txt`,
/// mirroring the local layout.
///
/// There is no way to derive a base URL from where the program runs, so none
/// is set by default and the default setup only reads local files. Set
/// `remote-base-url` to enable fetching.
///
/// `ureq` is blocking, so each fetch runs on tokio's blocking pool.
#[derive(Clone, Debug)]
pub struct HttpReader {
    base_url: Option<String>,
    fixture_dir: Utf8PathBuf,
}

impl HttpReader {
    /// Creates a new reader. If `base_url` is `None`, every read fails with
    /// [`ReadResourceError::NoRemoteBase`].
    pub fn new(base_url: Option<String>, fixture_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_url,
            fixture_dir: fixture_dir.into(),
        }
    }

    /// Returns the URL a resource resolves to, if a base URL is configured.
    pub fn url_for(&self, name: &str) -> Option<String> {
        let base_url = self.base_url.as_deref()?;
        let mut url = base_url.trim_end_matches('/').to_owned();
        for segment in self
            .fixture_dir
            .components()
            .map(|c| c.as_str())
            .chain(std::iter::once(name))
        {
            let segment = segment.trim_matches('/');
            if segment.is_empty() || segment == "." {
                continue;
            }
            url.push('/');
            url.push_str(segment);
        }
        Some(url)
    }
}

impl ResourceReader for HttpReader {
    fn location(&self, name: &str) -> String {
        self.url_for(name)
            .unwrap_or_else(|| format!("<no remote base>/{name}"))
    }

    async fn read(&self, name: &str) -> Result<String, ReadResourceError> {
        let url = self.url_for(name).ok_or(ReadResourceError::NoRemoteBase)?;
        debug!("fetching {url}");

        let fetch_url = url.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut response = ureq::get(&fetch_url).call()?;
            response.body_mut().read_to_string()
        })
        .await;

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(error)) => Err(ReadResourceError::Http {
                url,
                error: Box::new(error),
            }),
            Err(error) => Err(ReadResourceError::FetchTask { url, error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://example.com", "src", "in.txt", "https://example.com/src/in.txt" ; "plain")]
    #[test_case("https://example.com/vpw/", "src", "uit.txt", "https://example.com/vpw/src/uit.txt" ; "trailing slash")]
    #[test_case("https://example.com", ".", "in.txt", "https://example.com/in.txt" ; "current dir")]
    #[test_case("https://example.com", "fixtures/2024", "in.txt", "https://example.com/fixtures/2024/in.txt" ; "nested dir")]
    fn url_for(base_url: &str, fixture_dir: &str, name: &str, expected: &str) {
        let reader = HttpReader::new(Some(base_url.to_owned()), fixture_dir);
        assert_eq!(reader.url_for(name).as_deref(), Some(expected));
    }

    #[tokio::test]
    async fn no_base_url() {
        let reader = HttpReader::new(None, "src");
        assert_eq!(reader.url_for("in.txt"), None);
        assert!(matches!(
            reader.read("in.txt").await,
            Err(ReadResourceError::NoRemoteBase)
        ));
    }
}
