//! List filters, one shape per list screen.

/// Filter criteria that can be turned into list query parameters.
///
/// Implementations omit blank values so that an untouched filter control
/// never narrows the result set.
pub trait ListFilter: Clone + Send + Sync + 'static {
    /// Query parameters for this filter, excluding `offset` and `limit`.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

fn push_non_blank(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        pairs.push((key, value.to_string()));
    }
}

/// For lists without filter controls (projects, packages, managers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl ListFilter for NoFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Houses list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseFilter {
    /// Owning project id, blank for every project.
    pub project_id: String,
    /// `available`, `reserved`, `sold` or blank for all.
    pub status: String,
    /// Free-text search over address and house number.
    pub search: String,
}

impl ListFilter for HouseFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_blank(&mut pairs, "project_id", &self.project_id);
        push_non_blank(&mut pairs, "status", &self.status);
        push_non_blank(&mut pairs, "search", &self.search);
        pairs
    }
}

/// Clients list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    /// Free-text search over name, phone and email.
    pub search: String,
}

impl ListFilter for ClientFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_blank(&mut pairs, "search", &self.search);
        pairs
    }
}

/// Applications list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    /// `new`, `in_progress`, `completed`, `cancelled` or blank for all.
    pub status: String,
    /// Client id, blank for every client.
    pub client_id: String,
    /// House id, blank for every house.
    pub house_id: String,
    /// Project id, blank for every project.
    pub project_id: String,
    /// Responsible manager id, blank for every manager.
    pub manager_id: String,
}

impl ListFilter for ApplicationFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_blank(&mut pairs, "status", &self.status);
        push_non_blank(&mut pairs, "client_id", &self.client_id);
        push_non_blank(&mut pairs, "house_id", &self.house_id);
        push_non_blank(&mut pairs, "project_id", &self.project_id);
        push_non_blank(&mut pairs, "manager_id", &self.manager_id);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_omitted() {
        let filter = HouseFilter {
            project_id: String::new(),
            status: "  ".to_string(),
            search: "12A".to_string(),
        };

        assert_eq!(filter.query_pairs(), vec![("search", "12A".to_string())]);
    }

    #[test]
    fn test_application_filter_order() {
        let filter = ApplicationFilter {
            status: "new".to_string(),
            manager_id: "3".to_string(),
            ..ApplicationFilter::default()
        };

        assert_eq!(
            filter.query_pairs(),
            vec![("status", "new".to_string()), ("manager_id", "3".to_string())]
        );
    }

    #[test]
    fn test_no_filter_is_empty() {
        assert!(NoFilter.query_pairs().is_empty());
        assert!(ClientFilter::default().query_pairs().is_empty());
    }
}
