use std::collections::{HashMap, HashSet};
use graphql_parser::query::{Definition, Document, FragmentDefinition, OperationDefinition, Selection, SelectionSet};
use crate::error::{Denied, QueryError};

/// Allows every operation of a kind when present in its list.
pub const WILDCARD: &'static str = "*";

/// Decides whether `query` may be forwarded upstream.
///
/// Every field with a sub-selection must be named in the allow-list of its
/// operation kind, wherever it appears in the document; leaf fields are never
/// checked. Missing lists deny everything, which is the opposite default of
/// [`Filter`](crate::filter::Filter). Subscriptions are always denied.
pub fn check_allowed_graphql_query(
    allowed_queries: Option<&[String]>,
    allowed_mutations: Option<&[String]>,
    query: &str,
) -> Result<(), QueryError> {
    let deny_document = || QueryError::QueryNotAllowed(Denied::Document(query.to_string()));

    match (allowed_queries, allowed_mutations) {
        (None, None) => return Err(deny_document()),
        (Some(queries), Some(mutations)) if queries.is_empty() && mutations.is_empty() => {
            return Err(deny_document())
        }
        _ => (),
    }

    let document: Document<'_, String> = graphql_parser::parse_query(query)?;
    let fragments: HashMap<&str, &FragmentDefinition<'_, String>> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
            Definition::Operation(_) => None,
        })
        .collect();

    for definition in &document.definitions {
        let Definition::Operation(operation) = definition else {
            continue;
        };
        let (allowed, selection_set) = match operation {
            OperationDefinition::SelectionSet(selection_set) => (allowed_queries, selection_set),
            OperationDefinition::Query(operation) => (allowed_queries, &operation.selection_set),
            OperationDefinition::Mutation(mutation) => (allowed_mutations, &mutation.selection_set),
            OperationDefinition::Subscription(_) => return Err(deny_document()),
        };
        let allowed = allowed.unwrap_or_default();
        if allowed.iter().any(|name| name == WILDCARD) {
            continue;
        }

        let mut walker = AllowListWalker { allowed, fragments: &fragments, visited_fragments: HashSet::new() };
        walker.walk(selection_set)?;
    }
    Ok(())
}

struct AllowListWalker<'w, 'd, 'a> {
    allowed: &'w [String],
    fragments: &'w HashMap<&'d str, &'d FragmentDefinition<'a, String>>,
    visited_fragments: HashSet<&'d str>,
}

impl<'w, 'd, 'a> AllowListWalker<'w, 'd, 'a> {
    fn walk(&mut self, selection_set: &'d SelectionSet<'a, String>) -> Result<(), QueryError> {
        for selection in &selection_set.items {
            match selection {
                Selection::Field(field) => {
                    if field.selection_set.items.is_empty() {
                        continue;
                    }
                    if !self.allowed.iter().any(|name| *name == field.name) {
                        return Err(QueryError::QueryNotAllowed(Denied::Field(field.name.clone())));
                    }
                    self.walk(&field.selection_set)?;
                }
                Selection::InlineFragment(fragment) => self.walk(&fragment.selection_set)?,
                Selection::FragmentSpread(spread) => {
                    let Some(fragment) = self.fragments.get(spread.fragment_name.as_str()).copied() else {
                        continue;
                    };
                    if self.visited_fragments.insert(fragment.name.as_str()) {
                        self.walk(&fragment.selection_set)?;
                    }
                }
            }
        }
        Ok(())
    }
}
