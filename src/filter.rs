use serde::Deserialize;

/// Names a root query or mutation field to expose.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RootSelector {
    pub name: String,
    #[serde(default, rename = "disableNesting")]
    pub disable_nesting: bool,
}

impl RootSelector {
    pub fn new(name: &str) -> RootSelector {
        RootSelector { name: name.to_string(), disable_nesting: false }
    }

    pub fn without_nesting(name: &str) -> RootSelector {
        RootSelector { name: name.to_string(), disable_nesting: true }
    }
}

/// Selects which root fields a projected schema exposes.
///
/// A `None` list exposes every root field of that kind with nesting enabled,
/// while `Some(vec![])` exposes none. This is the opposite default of
/// [`check_allowed_graphql_query`](crate::allow_list::check_allowed_graphql_query),
/// where a missing list denies everything.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    #[serde(default, rename = "allowQueries")]
    pub allow_queries: Option<Vec<RootSelector>>,
    #[serde(default, rename = "allowMutations")]
    pub allow_mutations: Option<Vec<RootSelector>>,
}

impl Filter {
    pub fn allow_all() -> Filter {
        Filter::default()
    }

    /// Nesting policy for a root field, or `None` when the field is filtered out.
    pub(crate) fn root_nesting(selectors: Option<&[RootSelector]>, field_name: &str) -> Option<bool> {
        match selectors {
            None => Some(true),
            Some(selectors) => selectors
                .iter()
                .find(|selector| selector.name == field_name)
                .map(|selector| !selector.disable_nesting),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_list_allows_with_nesting() {
        assert_eq!(Filter::root_nesting(None, "users"), Some(true));
    }

    #[test]
    fn empty_list_allows_nothing() {
        assert_eq!(Filter::root_nesting(Some(&[]), "users"), None);
    }

    #[test]
    fn selector_controls_nesting() {
        let selectors = vec![RootSelector::new("users"), RootSelector::without_nesting("apps")];
        assert_eq!(Filter::root_nesting(Some(&selectors), "users"), Some(true));
        assert_eq!(Filter::root_nesting(Some(&selectors), "apps"), Some(false));
        assert_eq!(Filter::root_nesting(Some(&selectors), "files"), None);
    }

    #[test]
    fn decodes_from_json() {
        let filter: Filter = serde_json::from_str(
            r#"{"allowQueries": [{"name": "app", "disableNesting": true}, {"name": "user"}]}"#,
        )
        .unwrap();
        assert_eq!(
            filter.allow_queries,
            Some(vec![RootSelector::without_nesting("app"), RootSelector::new("user")])
        );
        assert_eq!(filter.allow_mutations, None);
    }
}
