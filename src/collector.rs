use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, trace};
use crate::error::SchemaError;
use crate::filter::{Filter, RootSelector};
use crate::schema::{Field, Kind, Schema, TypeKey, TypeRef, COMPARISON_EXP_SUFFIX};

/// The part of a schema reachable from the allowed root fields.
///
/// Everything borrows from the [`Schema`] it was collected from. Maps are ordered,
/// root fields by name and types by `(kind, name)`.
#[derive(Debug, Default)]
pub struct Collected<'a> {
    /// Name of the schema's query root type, e.g. `query_root`.
    pub query_type: &'a str,
    pub mutation_type: Option<&'a str>,
    pub queries: BTreeMap<&'a str, &'a Field>,
    pub mutations: BTreeMap<&'a str, &'a Field>,
    pub types: BTreeMap<TypeKey<'a>, &'a TypeRef>,
}

impl<'a> Collected<'a> {
    pub fn contains(&self, kind: Kind, name: &str) -> bool {
        self.types.contains_key(&TypeKey::new(kind, name))
    }
}

/// Flattened `schema.types`, keyed by kind and then by name.
struct TypeRegistry<'a> {
    types: HashMap<Kind, HashMap<&'a str, &'a TypeRef>>,
}

impl<'a> TypeRegistry<'a> {
    fn new(schema: &'a Schema) -> TypeRegistry<'a> {
        let mut types: HashMap<Kind, HashMap<&'a str, &'a TypeRef>> = HashMap::new();
        for type_ref in &schema.types {
            if let Some(key) = type_ref.key() {
                types.entry(key.kind).or_default().insert(key.name, type_ref);
            }
        }
        TypeRegistry { types }
    }

    fn get(&self, kind: Kind, name: &str) -> Option<&'a TypeRef> {
        self.types.get(&kind).and_then(|by_name| by_name.get(name)).copied()
    }

    fn require(&self, kind: Kind, name: &str) -> Result<&'a TypeRef, SchemaError> {
        self.get(kind, name).ok_or_else(|| SchemaError::MissingType { kind, name: name.to_string() })
    }
}

struct Collector<'a> {
    available: TypeRegistry<'a>,
    types: BTreeMap<TypeKey<'a>, &'a TypeRef>,
}

impl<'a> Collector<'a> {
    fn collect_roots(
        &mut self,
        root: &'a TypeRef,
        selectors: Option<&[RootSelector]>,
    ) -> Result<BTreeMap<&'a str, &'a Field>, SchemaError> {
        let mut needed = BTreeMap::new();

        for field in root.fields() {
            let Some(enable_nesting) = Filter::root_nesting(selectors, &field.name) else {
                continue;
            };
            needed.insert(field.name.as_str(), field);

            self.visit(&field.field_type, enable_nesting, false)?;
            for arg in field.args() {
                self.visit(&arg.input_type, enable_nesting, false)?;
            }
        }

        for selector in selectors.unwrap_or_default() {
            if !root.fields().iter().any(|field| field.name == selector.name) {
                debug!(root = root.name().unwrap_or_default(), field = %selector.name, "ignoring selector for unknown root field");
            }
        }

        Ok(needed)
    }

    /// Adds the named type behind `type_ref` and, nesting permitting, everything it references.
    ///
    /// `types` doubles as the visited set: a key already present stops the walk, which
    /// is what terminates cycles, and the first visit decides how deep a type expands.
    fn visit(&mut self, type_ref: &'a TypeRef, enable_nesting: bool, nested: bool) -> Result<(), SchemaError> {
        let base = type_ref.unwrapped();
        let Some(key) = base.key() else {
            return Ok(());
        };
        if self.types.contains_key(&key) {
            return Ok(());
        }
        let full = self.available.require(key.kind, key.name)?;

        match key.kind {
            Kind::Object | Kind::InputObject => {
                if !enable_nesting && nested {
                    trace!(%key, "nesting disabled, not expanding");
                    return Ok(());
                }
                self.types.insert(key, full);

                for field in full.fields() {
                    self.visit(&field.field_type, enable_nesting, true)?;
                    for arg in field.args() {
                        self.visit(&arg.input_type, enable_nesting, true)?;
                    }
                }
                for input_field in full.input_fields() {
                    self.visit(&input_field.input_type, enable_nesting, true)?;
                }
                for interface in full.interfaces() {
                    self.visit(interface, enable_nesting, true)?;
                }
                for possible_type in full.possible_types() {
                    self.visit(possible_type, enable_nesting, true)?;
                }
                if let Some(of_type) = full.of_type() {
                    self.visit(of_type, enable_nesting, true)?;
                }
            }
            Kind::Scalar | Kind::Enum => {
                self.types.insert(key, full);

                let comparison_name = format!("{}{}", key.name, COMPARISON_EXP_SUFFIX);
                if let Some(comparison) = self.available.get(Kind::InputObject, &comparison_name) {
                    self.visit(comparison, enable_nesting, false)?;
                }
            }
            Kind::NonNull | Kind::List => (),
        }
        Ok(())
    }
}

/// Computes the root fields allowed by `filter` and the closure of named types they need.
///
/// Queries are processed before mutations and both share one type map, so a type
/// reached by both expands according to whichever root reached it first.
#[instrument(skip_all, fields(query_type = %schema.query_type.name))]
pub fn collect<'a>(schema: &'a Schema, filter: &Filter) -> Result<Collected<'a>, SchemaError> {
    let mut collector = Collector {
        available: TypeRegistry::new(schema),
        types: BTreeMap::new(),
    };

    let query_root = collector.available.require(Kind::Object, &schema.query_type.name)?;
    let queries = collector.collect_roots(query_root, filter.allow_queries.as_deref())?;

    let mutations = match &schema.mutation_type {
        Some(mutation_type) => {
            let mutation_root = collector.available.require(Kind::Object, &mutation_type.name)?;
            collector.collect_roots(mutation_root, filter.allow_mutations.as_deref())?
        }
        None => BTreeMap::new(),
    };

    debug!(
        queries = queries.len(),
        mutations = mutations.len(),
        types = collector.types.len(),
        "collected reachable schema"
    );

    Ok(Collected {
        query_type: &schema.query_type.name,
        mutation_type: schema.mutation_type.as_ref().map(|it| it.name.as_str()),
        queries,
        mutations,
        types: collector.types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EnumValue, InputValue, RootType};

    fn named(kind: Kind, name: &str) -> TypeRef {
        TypeRef::named(kind, name)
    }

    fn scalar(name: &str) -> TypeRef {
        named(Kind::Scalar, name)
    }

    fn object(name: &str) -> TypeRef {
        named(Kind::Object, name)
    }

    fn type_names(collected: &Collected<'_>) -> Vec<String> {
        collected.types.keys().map(|key| key.to_string()).collect()
    }

    /// Query.app(id: ID!): App, App { id, name, owner: User }, User { id, apps: [App!]! }
    fn app_schema() -> Schema {
        Schema {
            query_type: RootType { name: "Query".to_string() },
            mutation_type: None,
            types: vec![
                object("Query").with_fields(vec![
                    Field::new("app", object("App"))
                        .with_args(vec![InputValue::new("id", TypeRef::non_null(scalar("ID")))]),
                    Field::new("version", TypeRef::non_null(scalar("String"))),
                ]),
                object("App").with_fields(vec![
                    Field::new("id", TypeRef::non_null(scalar("ID"))),
                    Field::new("name", TypeRef::non_null(scalar("String"))),
                    Field::new("owner", object("User")),
                ]),
                object("User").with_fields(vec![
                    Field::new("id", TypeRef::non_null(scalar("ID"))),
                    Field::new(
                        "apps",
                        TypeRef::non_null(TypeRef::list(TypeRef::non_null(object("App")))),
                    ),
                ]),
                scalar("ID"),
                scalar("String"),
            ],
        }
    }

    #[test]
    fn resolves_cycles_once() {
        let schema = app_schema();
        let filter = Filter {
            allow_queries: Some(vec![RootSelector::new("app")]),
            allow_mutations: None,
        };
        let collected = collect(&schema, &filter).unwrap();

        assert_eq!(collected.queries.keys().copied().collect::<Vec<_>>(), vec!["app"]);
        assert_eq!(
            type_names(&collected),
            vec!["OBJECT App", "OBJECT User", "SCALAR ID", "SCALAR String"]
        );
    }

    #[test]
    fn disabled_nesting_keeps_only_direct_type() {
        let schema = app_schema();
        let filter = Filter {
            allow_queries: Some(vec![RootSelector::without_nesting("app")]),
            allow_mutations: None,
        };
        let collected = collect(&schema, &filter).unwrap();

        assert!(collected.contains(Kind::Object, "App"));
        assert!(!collected.contains(Kind::Object, "User"));
        assert!(collected.contains(Kind::Scalar, "String"));
    }

    #[test]
    fn missing_filter_allows_every_root() {
        let schema = app_schema();
        let collected = collect(&schema, &Filter::allow_all()).unwrap();
        assert_eq!(collected.queries.keys().copied().collect::<Vec<_>>(), vec!["app", "version"]);
    }

    #[test]
    fn empty_filter_allows_no_root() {
        let schema = app_schema();
        let filter = Filter { allow_queries: Some(vec![]), allow_mutations: Some(vec![]) };
        let collected = collect(&schema, &filter).unwrap();
        assert!(collected.queries.is_empty());
        assert!(collected.types.is_empty());
    }

    #[test]
    fn unknown_selector_is_ignored() {
        let schema = app_schema();
        let filter = Filter {
            allow_queries: Some(vec![RootSelector::new("nope"), RootSelector::new("version")]),
            allow_mutations: None,
        };
        let collected = collect(&schema, &filter).unwrap();
        assert_eq!(collected.queries.keys().copied().collect::<Vec<_>>(), vec!["version"]);
        assert_eq!(type_names(&collected), vec!["SCALAR String"]);
    }

    #[test]
    fn includes_comparison_expression_of_leaf_types() {
        let schema = Schema {
            query_type: RootType { name: "query_root".to_string() },
            mutation_type: None,
            types: vec![
                object("query_root").with_fields(vec![Field::new("status", named(Kind::Enum, "status_enum"))]),
                named(Kind::Enum, "status_enum")
                    .with_enum_values(vec![EnumValue::new("ACTIVE"), EnumValue::new("DISABLED")]),
                named(Kind::InputObject, "status_enum_comparison_exp").with_input_fields(vec![
                    InputValue::new("_eq", named(Kind::Enum, "status_enum")),
                    InputValue::new("_is_null", scalar("Boolean")),
                ]),
                scalar("Boolean"),
            ],
        };
        let collected = collect(&schema, &Filter::allow_all()).unwrap();
        assert_eq!(
            type_names(&collected),
            vec!["ENUM status_enum", "INPUT_OBJECT status_enum_comparison_exp", "SCALAR Boolean"]
        );
    }

    #[test]
    fn mutations_share_the_type_map() {
        let mut schema = app_schema();
        schema.mutation_type = Some(RootType { name: "Mutation".to_string() });
        schema.types.push(object("Mutation").with_fields(vec![Field::new("renameApp", object("App"))
            .with_args(vec![InputValue::new("name", scalar("String"))])]));

        let filter = Filter {
            allow_queries: Some(vec![RootSelector::without_nesting("app")]),
            allow_mutations: Some(vec![RootSelector::new("renameApp")]),
        };
        let collected = collect(&schema, &filter).unwrap();

        assert_eq!(collected.mutations.keys().copied().collect::<Vec<_>>(), vec!["renameApp"]);
        // App was first reached without nesting, so User stays out.
        assert!(!collected.contains(Kind::Object, "User"));
    }

    #[test]
    fn registry_keys_by_kind_and_name() {
        let schema = Schema {
            query_type: RootType { name: "Query".to_string() },
            mutation_type: None,
            types: vec![
                object("Query").with_fields(vec![
                    Field::new("a", object("Foo")),
                    Field::new("b", scalar("Foo")),
                ]),
                object("Foo").with_fields(vec![Field::new("count", scalar("Int"))]),
                scalar("Foo"),
                scalar("Int"),
            ],
        };
        let collected = collect(&schema, &Filter::allow_all()).unwrap();
        assert_eq!(type_names(&collected), vec!["OBJECT Foo", "SCALAR Foo", "SCALAR Int"]);
    }

    #[test]
    fn records_root_type_names() {
        let mut schema = app_schema();
        schema.mutation_type = Some(RootType { name: "mutation_root".to_string() });
        schema.types.push(object("mutation_root").with_fields(vec![]));

        let collected = collect(&schema, &Filter::allow_all()).unwrap();
        assert_eq!(collected.query_type, "Query");
        assert_eq!(collected.mutation_type, Some("mutation_root"));
    }

    #[test]
    fn missing_type_is_malformed() {
        let schema = Schema {
            query_type: RootType { name: "Query".to_string() },
            mutation_type: None,
            types: vec![object("Query").with_fields(vec![Field::new("ghost", object("Ghost"))])],
        };
        let error = collect(&schema, &Filter::allow_all()).unwrap_err();
        assert!(matches!(
            error,
            SchemaError::MissingType { kind: Kind::Object, ref name } if name == "Ghost"
        ));
    }

    #[test]
    fn missing_root_type_is_malformed() {
        let schema = Schema {
            query_type: RootType { name: "Query".to_string() },
            mutation_type: None,
            types: vec![],
        };
        assert!(matches!(collect(&schema, &Filter::allow_all()), Err(SchemaError::MissingType { .. })));
    }
}
