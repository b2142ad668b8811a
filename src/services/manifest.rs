use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;

use crate::github::{FileContent, RemoteRepository, RepositoryProvider};
use crate::types::{Branch, DependencyRecord, MANIFEST_PATH, Owner, PackageManifest, RepositoryName};

/// Decodes a manifest payload from the contents endpoint.
///
/// GitHub wraps base64 content at 60 columns, so whitespace is stripped
/// before decoding.
pub fn decode_manifest(file: &FileContent) -> Result<PackageManifest> {
    let content = file
        .content
        .as_deref()
        .with_context(|| format!("{} has no content", file.path))?;

    let raw = match file.encoding.as_deref() {
        Some("base64") | None => {
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = STANDARD
                .decode(compact)
                .with_context(|| format!("{} is not valid base64", file.path))?;
            String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", file.path))?
        }
        Some("utf-8") | Some("utf8") => content.to_string(),
        Some(other) => bail!("{} uses unsupported encoding {}", file.path, other),
    };

    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", file.path))
}

/// Reads dependency manifests through a provider
pub struct ManifestReader<'a, P> {
    provider: &'a P,
}

impl<'a, P: RepositoryProvider> ManifestReader<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Fetches and parses the manifest of one repository
    pub async fn get_package_json(
        &self,
        owner: &Owner,
        name: &RepositoryName,
        git_ref: Option<&Branch>,
    ) -> Result<PackageManifest> {
        tracing::debug!(
            "trying to get {} for {}/{} at {:?}",
            MANIFEST_PATH,
            owner,
            name,
            git_ref.map(Branch::as_str)
        );

        let fetched = self
            .provider
            .get_file_content(owner, name, MANIFEST_PATH, git_ref.map(Branch::as_str))
            .await
            .map_err(anyhow::Error::from)
            .and_then(|file| decode_manifest(&file));

        fetched.with_context(|| format!("could not get {} for repo {}", MANIFEST_PATH, name))
    }

    /// Dependency record of one repository, or `None` when the manifest could
    /// not be read. Failures are logged, never returned.
    pub async fn get_dependencies(
        &self,
        owner: &Owner,
        name: &RepositoryName,
        git_ref: Option<&Branch>,
    ) -> Option<DependencyRecord> {
        match self.get_package_json(owner, name, git_ref).await {
            Ok(manifest) => Some(DependencyRecord::from(manifest)),
            Err(e) => {
                tracing::warn!("{:#}", e);
                None
            }
        }
    }

    /// Resolves dependencies for every repository concurrently.
    ///
    /// One request per repository, all in flight at once. The output lines
    /// up index for index with `repositories`.
    pub async fn get_dependencies_for_all(
        &self,
        repositories: &[RemoteRepository],
        git_ref: Option<&Branch>,
    ) -> Vec<Option<DependencyRecord>> {
        let fetch_futures = repositories
            .iter()
            .map(|repository| self.get_dependencies(&repository.owner, &repository.name, git_ref));

        join_all(fetch_futures).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(json: &str) -> FileContent {
        let mut content = STANDARD.encode(json);
        // mimic GitHub's line wrapping
        content.insert(4, '\n');
        FileContent {
            path: MANIFEST_PATH.to_string(),
            encoding: Some("base64".to_string()),
            content: Some(content),
        }
    }

    #[test]
    fn test_decode_wrapped_base64_manifest() {
        let file = encoded(r#"{"name":"widgets","version":"2.0.0","dependencies":{"a":"1"}}"#);
        let manifest = decode_manifest(&file).unwrap();

        assert_eq!(manifest.name.as_deref(), Some("widgets"));
        assert_eq!(manifest.version.as_deref(), Some("2.0.0"));
        assert_eq!(manifest.dependencies.unwrap().len(), 1);
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let file = encoded("not json at all");
        let error = decode_manifest(&file).unwrap_err();

        assert!(format!("{:#}", error).contains("not valid JSON"));
    }

    #[test]
    fn test_decode_rejects_missing_content() {
        let file = FileContent {
            path: MANIFEST_PATH.to_string(),
            encoding: Some("base64".to_string()),
            content: None,
        };

        assert!(decode_manifest(&file).is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_encoding() {
        let file = FileContent {
            path: MANIFEST_PATH.to_string(),
            encoding: Some("none".to_string()),
            content: Some(String::new()),
        };

        let error = decode_manifest(&file).unwrap_err();
        assert!(error.to_string().contains("unsupported encoding"));
    }
}
