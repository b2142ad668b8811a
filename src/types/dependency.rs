//! Package manifest and dependency types
//!
//! Repositories are described by a `package.json` manifest at their root. Only
//! the package name, version and the three dependency mappings are read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Manifest file read from every repository when dependencies are requested
pub const MANIFEST_PATH: &str = "package.json";

/// Subset of `package.json` the adapter cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub peer_dependencies: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
}

/// Dependency information extracted from a manifest.
///
/// Missing mappings default to empty ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    pub package_name: Option<String>,
    pub version: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    pub peer_dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

impl From<PackageManifest> for DependencyRecord {
    fn from(manifest: PackageManifest) -> Self {
        Self {
            package_name: manifest.name,
            version: manifest.version,
            dependencies: manifest.dependencies.unwrap_or_default(),
            peer_dependencies: manifest.peer_dependencies.unwrap_or_default(),
            dev_dependencies: manifest.dev_dependencies.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults_missing_mappings() {
        let manifest: PackageManifest =
            serde_json::from_str(r#"{"name":"@acme/widgets","version":"1.2.0"}"#).unwrap();
        let record = DependencyRecord::from(manifest);

        assert_eq!(record.package_name.as_deref(), Some("@acme/widgets"));
        assert_eq!(record.version.as_deref(), Some("1.2.0"));
        assert!(record.dependencies.is_empty());
        assert!(record.peer_dependencies.is_empty());
        assert!(record.dev_dependencies.is_empty());
    }

    #[test]
    fn test_record_keeps_all_dependency_kinds() {
        let manifest: PackageManifest = serde_json::from_str(
            r#"{
                "name": "widgets",
                "version": "0.1.0",
                "dependencies": {"lodash": "^4.17.0"},
                "peerDependencies": {"react": ">=16"},
                "devDependencies": {"typescript": "~5.4.0"},
                "scripts": {"build": "tsc"}
            }"#,
        )
        .unwrap();
        let record = DependencyRecord::from(manifest);

        assert_eq!(record.dependencies.get("lodash").map(String::as_str), Some("^4.17.0"));
        assert_eq!(record.peer_dependencies.get("react").map(String::as_str), Some(">=16"));
        assert_eq!(
            record.dev_dependencies.get("typescript").map(String::as_str),
            Some("~5.4.0")
        );
    }
}
