use std::fmt;
use serde::Deserialize;

pub const BUILT_IN_SCALARS: &'static [&'static str] = &[ "Int", "String", "Float", "Boolean", "ID" ];

/// Suffix of the generated input types carrying comparison operators for a scalar or enum.
pub const COMPARISON_EXP_SUFFIX: &'static str = "_comparison_exp";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Enum,
    InputObject,
    List,
    NonNull,
    Object,
    Scalar,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Enum => "ENUM",
            Kind::InputObject => "INPUT_OBJECT",
            Kind::List => "LIST",
            Kind::NonNull => "NON_NULL",
            Kind::Object => "OBJECT",
            Kind::Scalar => "SCALAR",
        }
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(self, Kind::NonNull | Kind::List)
    }

    /// Object-like kinds are the ones subject to the nesting cutoff.
    pub fn is_composite(&self) -> bool {
        matches!(self, Kind::Object | Kind::InputObject)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a named type in the registry.
///
/// Variants are declared in the lexicographic order of their introspection
/// names, so the derived `Ord` sorts keys by `(kind, name)` as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey<'a> {
    pub kind: Kind,
    pub name: &'a str,
}

impl<'a> TypeKey<'a> {
    pub fn new(kind: Kind, name: &'a str) -> TypeKey<'a> {
        TypeKey { kind, name }
    }
}

impl fmt::Display for TypeKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TypeRef {
    pub kind: Kind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    fields: Option<Vec<Field>>,
    #[serde(default, rename = "inputFields")]
    input_fields: Option<Vec<InputValue>>,
    #[serde(default)]
    interfaces: Option<Vec<TypeRef>>,
    #[serde(default, rename = "possibleTypes")]
    possible_types: Option<Vec<TypeRef>>,
    #[serde(default, rename = "enumValues")]
    enum_values: Option<Vec<EnumValue>>,
    #[serde(default, rename = "ofType")]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    pub fn named(kind: Kind, name: &str) -> TypeRef {
        TypeRef {
            kind,
            name: Some(name.to_string()),
            description: None,
            fields: None,
            input_fields: None,
            interfaces: None,
            possible_types: None,
            enum_values: None,
            of_type: None,
        }
    }

    pub fn wrapping(kind: Kind, of_type: TypeRef) -> TypeRef {
        TypeRef {
            kind,
            name: None,
            description: None,
            fields: None,
            input_fields: None,
            interfaces: None,
            possible_types: None,
            enum_values: None,
            of_type: Some(Box::new(of_type)),
        }
    }

    pub fn non_null(of_type: TypeRef) -> TypeRef {
        TypeRef::wrapping(Kind::NonNull, of_type)
    }

    pub fn list(of_type: TypeRef) -> TypeRef {
        TypeRef::wrapping(Kind::List, of_type)
    }

    pub fn with_description(mut self, description: &str) -> TypeRef {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> TypeRef {
        self.fields = Some(fields);
        self
    }

    pub fn with_input_fields(mut self, input_fields: Vec<InputValue>) -> TypeRef {
        self.input_fields = Some(input_fields);
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<TypeRef>) -> TypeRef {
        self.interfaces = Some(interfaces);
        self
    }

    pub fn with_enum_values(mut self, enum_values: Vec<EnumValue>) -> TypeRef {
        self.enum_values = Some(enum_values);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        self.fields.as_deref().unwrap_or_default()
    }

    pub fn input_fields(&self) -> &[InputValue] {
        self.input_fields.as_deref().unwrap_or_default()
    }

    pub fn interfaces(&self) -> &[TypeRef] {
        self.interfaces.as_deref().unwrap_or_default()
    }

    pub fn possible_types(&self) -> &[TypeRef] {
        self.possible_types.as_deref().unwrap_or_default()
    }

    pub fn enum_values(&self) -> &[EnumValue] {
        self.enum_values.as_deref().unwrap_or_default()
    }

    pub fn of_type(&self) -> Option<&TypeRef> {
        self.of_type.as_deref()
    }

    /// Strips `NON_NULL` and `LIST` wrappers down to the named type.
    pub fn unwrapped(&self) -> &TypeRef {
        let mut current = self;
        while current.kind.is_wrapper() {
            match current.of_type() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    /// Registry key of a named type; `None` for wrappers and nameless refs.
    pub fn key(&self) -> Option<TypeKey<'_>> {
        if self.kind.is_wrapper() {
            return None;
        }
        self.name().map(|name| TypeKey::new(self.kind, name))
    }
}

/// Prints the reference in GraphQL type syntax, e.g. `[String!]!`.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.of_type()) {
            (Kind::NonNull, Some(inner)) => write!(f, "{}!", inner),
            (Kind::List, Some(inner)) => write!(f, "[{}]", inner),
            _ => f.write_str(self.name().unwrap_or_default()),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    args: Option<Vec<InputValue>>,
    #[serde(rename = "type")]
    pub field_type: TypeRef,
}

impl Field {
    pub fn new(name: &str, field_type: TypeRef) -> Field {
        Field { name: name.to_string(), description: None, args: None, field_type }
    }

    pub fn with_description(mut self, description: &str) -> Field {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_args(mut self, args: Vec<InputValue>) -> Field {
        self.args = Some(args);
        self
    }

    pub fn args(&self) -> &[InputValue] {
        self.args.as_deref().unwrap_or_default()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct InputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub input_type: TypeRef,
    #[serde(default, rename = "defaultValue")]
    pub default_value: Option<String>,
}

impl InputValue {
    pub fn new(name: &str, input_type: TypeRef) -> InputValue {
        InputValue { name: name.to_string(), description: None, input_type, default_value: None }
    }

    pub fn with_description(mut self, description: &str) -> InputValue {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_default(mut self, default_value: &str) -> InputValue {
        self.default_value = Some(default_value.to_string());
        self
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl EnumValue {
    pub fn new(name: &str) -> EnumValue {
        EnumValue { name: name.to_string(), description: None }
    }
}

/// Root operation type as returned by introspection, which only carries its name.
#[derive(Deserialize, Debug, Clone)]
pub struct RootType {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Schema {
    #[serde(rename = "queryType")]
    pub query_type: RootType,
    #[serde(default, rename = "mutationType")]
    pub mutation_type: Option<RootType>,
    #[serde(default)]
    pub types: Vec<TypeRef>,
}
