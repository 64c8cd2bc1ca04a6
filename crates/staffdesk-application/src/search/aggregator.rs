use futures::future::{self, Either};
use staffdesk_core::config::SearchSettings;
use staffdesk_core::directory::DirectoryService;
use staffdesk_core::error::Result;
use staffdesk_core::identity::RoleSet;
use staffdesk_core::search::{ResultKind, SearchQuery, SearchResult};
use std::collections::HashSet;
use std::sync::Arc;

/// Fans a settled query out over the directory collections and merges the
/// answers into one ranked list.
///
/// Employees are always queried (the backend scopes them). Departments and
/// branches are fetched only for elevated roles, filtered by name on the
/// client and capped. A failing source contributes nothing; the others
/// still come through.
#[derive(Clone)]
pub struct SearchAggregator {
    directory: Arc<dyn DirectoryService>,
    settings: SearchSettings,
}

impl SearchAggregator {
    pub fn new(directory: Arc<dyn DirectoryService>, settings: SearchSettings) -> Self {
        Self {
            directory,
            settings,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn is_elevated(&self, roles: &RoleSet) -> bool {
        roles.intersects(self.settings.elevated_roles.as_slice())
    }

    /// Runs every permitted sub-query concurrently. Never fails.
    pub async fn aggregate(&self, token: &str, query: &SearchQuery, roles: &RoleSet) -> Vec<SearchResult> {
        let employees = self
            .directory
            .search_employees(token, query.as_str(), self.settings.employee_limit);

        let restricted = if self.is_elevated(roles) {
            Either::Left(async {
                futures::join!(
                    self.directory.list_departments(token),
                    self.directory.list_branches(token)
                )
            })
        } else {
            Either::Right(future::ready((Ok(Vec::new()), Ok(Vec::new()))))
        };

        let (employees, (departments, branches)) = futures::join!(employees, restricted);

        let employees = or_empty(ResultKind::Employee, query, employees);
        let departments = or_empty(ResultKind::Department, query, departments);
        let branches = or_empty(ResultKind::Branch, query, branches);

        let limit = self.settings.restricted_limit;
        let primary = employees
            .iter()
            .take(self.settings.employee_limit)
            .map(SearchResult::from);
        let departments = departments
            .iter()
            .filter(|d| query.matches(&d.name))
            .take(limit)
            .map(SearchResult::from);
        let branches = branches
            .iter()
            .filter(|b| query.matches(&b.name))
            .take(limit)
            .map(SearchResult::from);

        let results = merge(primary.chain(departments).chain(branches));
        tracing::debug!(query = query.as_str(), results = results.len(), "search aggregated");
        results
    }
}

fn or_empty<T>(kind: ResultKind, query: &SearchQuery, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(source = %kind, query = query.as_str(), error = %e, "search source failed");
        Vec::new()
    })
}

/// Keeps the first occurrence of each `(kind, id)`.
fn merge(results: impl Iterator<Item = SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .filter(|r| {
            let (kind, id) = r.key();
            seen.insert((kind, id.to_string()))
        })
        .collect()
}
