use ahash::AHashMap;

use crate::types::{OrganizationRepositories, Owner, RepositorySummary};

/// Groups summaries by owner login.
///
/// Groups appear in the order their first member appears; members keep
/// their relative order. Nothing is sorted.
pub fn group_by_organization<I>(summaries: I) -> Vec<OrganizationRepositories>
where
    I: IntoIterator<Item = RepositorySummary>,
{
    let mut groups: Vec<OrganizationRepositories> = Vec::new();
    let mut index_by_owner: AHashMap<Owner, usize> = AHashMap::new();

    for summary in summaries {
        match index_by_owner.get(&summary.project) {
            Some(&index) => groups[index].repos.push(summary),
            None => {
                index_by_owner.insert(summary.project.clone(), groups.len());
                groups.push(OrganizationRepositories {
                    organization: summary.project.clone(),
                    repos: vec![summary],
                });
            }
        }
    }

    groups
}
