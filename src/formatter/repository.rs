use std::collections::BTreeMap;

use crate::formatter::MarkdownContent;
use crate::types::{OrganizationRepositories, Repository, RepositorySummary};

pub fn repository_body_markdown(repository: &Repository) -> MarkdownContent {
    let mut content = String::new();

    content.push_str(&format!("# {}\n\n", repository.name));

    content.push_str("## Organization\n");
    content.push_str(&format!("{}\n\n", repository.organization));

    content.push_str("## Clone URL\n");
    if let Some(url) = &repository.url {
        content.push_str(&format!("{}\n", url));
    }
    content.push('\n');

    content.push_str("## Default Branch\n");
    if let Some(default_branch) = &repository.default_branch {
        content.push_str(&format!("{}\n", default_branch.as_str()));
    }

    MarkdownContent(content)
}

pub fn repository_list_markdown(groups: &[OrganizationRepositories]) -> MarkdownContent {
    if groups.is_empty() {
        return MarkdownContent("No repositories found.\n".to_string());
    }

    let mut content = String::new();
    for group in groups {
        content.push_str(&format!(
            "## {} ({} repositories)\n",
            group.organization,
            group.repos.len()
        ));
        for repo in &group.repos {
            content.push_str(&repository_summary_line(repo));
        }
        content.push('\n');
    }

    MarkdownContent(content)
}

fn repository_summary_line(summary: &RepositorySummary) -> String {
    let mut line = format!("- {}", summary.name);

    if let Some(package_name) = &summary.package_name {
        line.push_str(&format!(" `{}", package_name));
        if let Some(version) = &summary.version {
            line.push_str(&format!("@{}", version));
        }
        line.push('`');
    }
    line.push('\n');

    if summary.has_dependencies() {
        for (label, mapping) in [
            ("deps", &summary.deps),
            ("peerDeps", &summary.peer_deps),
            ("devDeps", &summary.dev_deps),
        ] {
            if let Some(mapping) = mapping.as_ref().filter(|m| !m.is_empty()) {
                line.push_str(&format!("  - {}: {}\n", label, dependency_list(mapping)));
            }
        }
    }

    line
}

fn dependency_list(mapping: &BTreeMap<String, String>) -> String {
    mapping
        .iter()
        .map(|(name, version)| format!("{}@{}", name, version))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Branch, DependencyRecord, Owner, RepositoryName};

    #[test]
    fn test_repository_markdown() {
        let repository = Repository {
            name: "acme/widgets".to_string(),
            id: "widgets".to_string(),
            organization: Owner::from("acme"),
            url: Some("https://github.com/acme/widgets.git".to_string()),
            default_branch: Some(Branch::new("main")),
        };

        let markdown = repository_body_markdown(&repository).0;
        assert!(markdown.starts_with("# acme/widgets\n"));
        assert!(markdown.contains("https://github.com/acme/widgets.git"));
        assert!(markdown.contains("## Default Branch\nmain\n"));
    }

    #[test]
    fn test_list_markdown_with_dependencies() {
        let mut record = DependencyRecord {
            package_name: Some("@acme/widgets".to_string()),
            version: Some("1.0.0".to_string()),
            ..DependencyRecord::default()
        };
        record
            .dependencies
            .insert("lodash".to_string(), "^4.17.21".to_string());

        let groups = vec![OrganizationRepositories {
            organization: Owner::from("acme"),
            repos: vec![
                RepositorySummary::new(RepositoryName::from("widgets"), Owner::from("acme"))
                    .with_dependencies(record),
                RepositorySummary::new(RepositoryName::from("gadgets"), Owner::from("acme")),
            ],
        }];

        let markdown = repository_list_markdown(&groups).0;
        assert!(markdown.contains("## acme (2 repositories)"));
        assert!(markdown.contains("- widgets `@acme/widgets@1.0.0`"));
        assert!(markdown.contains("  - deps: lodash@^4.17.21"));
        assert!(markdown.contains("- gadgets\n"));
        assert!(!markdown.contains("devDeps"));
    }

    #[test]
    fn test_empty_list_markdown() {
        assert_eq!(repository_list_markdown(&[]).0, "No repositories found.\n");
    }
}
