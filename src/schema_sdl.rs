use crate::collector::Collected;
use crate::schema::{Field, InputValue, Kind, TypeKey, TypeRef, BUILT_IN_SCALARS};
use crate::sdl_writer::{SdlOptions, SdlWriter};

const QUERY_TYPE_NAME: &'static str = "Query";
const MUTATION_TYPE_NAME: &'static str = "Mutation";

/// Renders the collected schema fragment as SDL with two-space indentation.
pub fn render(collected: &Collected<'_>) -> String {
    render_with_options(collected, &SdlOptions::default())
}

/// Renders scalars, enums, object types, input types, then the `Query` and
/// `Mutation` root blocks. Declarations within a block are sorted by name, the
/// fields of a declaration keep their schema order.
pub fn render_with_options(collected: &Collected<'_>, options: &SdlOptions) -> String {
    let mut renderer = SdlRenderer {
        collected,
        writer: SdlWriter::new(options),
    };

    for (key, type_ref) in renderer.declarations(Kind::Scalar) {
        if !BUILT_IN_SCALARS.contains(&key.name) {
            renderer.writer.blank_line();
            renderer.writer.description(type_ref.description.as_deref());
            renderer.writer.line(&format!("scalar {}", key.name));
        }
    }
    for (key, type_ref) in renderer.declarations(Kind::Enum) {
        renderer.write_enum(key.name, type_ref);
    }
    for (key, type_ref) in renderer.declarations(Kind::Object) {
        if !renderer.is_root(key.name) {
            renderer.write_object(key.name, type_ref);
        }
    }
    for (key, type_ref) in renderer.declarations(Kind::InputObject) {
        renderer.write_input_object(key.name, type_ref);
    }

    renderer.write_root(QUERY_TYPE_NAME, collected.queries.values().copied());
    if !collected.mutations.is_empty() {
        renderer.write_root(MUTATION_TYPE_NAME, collected.mutations.values().copied());
    }

    renderer.writer.build_string()
}

struct SdlRenderer<'c, 'a> {
    collected: &'c Collected<'a>,
    writer: SdlWriter,
}

impl<'c, 'a> SdlRenderer<'c, 'a> {
    fn declarations(&self, kind: Kind) -> Vec<(TypeKey<'a>, &'a TypeRef)> {
        self.collected
            .types
            .iter()
            .filter(|(key, _)| key.kind == kind)
            .map(|(key, type_ref)| (*key, *type_ref))
            .collect()
    }

    /// Root objects are never declared as such; the filtered root blocks replace them.
    fn is_root(&self, name: &str) -> bool {
        name == self.collected.query_type
            || Some(name) == self.collected.mutation_type
            || name == QUERY_TYPE_NAME
            || name == MUTATION_TYPE_NAME
    }

    /// Name a reference prints as, with the schema's root types renamed to their blocks.
    fn printed_name<'n>(&self, type_ref: &'n TypeRef) -> &'n str {
        let name = type_ref.name().unwrap_or_default();
        if type_ref.kind != Kind::Object {
            name
        } else if name == self.collected.query_type {
            QUERY_TYPE_NAME
        } else if Some(name) == self.collected.mutation_type {
            MUTATION_TYPE_NAME
        } else {
            name
        }
    }

    /// Prints the reference in GraphQL type syntax, e.g. `[String!]!`.
    fn printed_type(&self, type_ref: &TypeRef) -> String {
        match (type_ref.kind, type_ref.of_type()) {
            (Kind::NonNull, Some(inner)) => format!("{}!", self.printed_type(inner)),
            (Kind::List, Some(inner)) => format!("[{}]", self.printed_type(inner)),
            _ => self.printed_name(type_ref).to_string(),
        }
    }

    /// Composite types only render when they were collected; leaf types always are.
    fn is_declared(&self, type_ref: &TypeRef) -> bool {
        let base = type_ref.unwrapped();
        let Some(name) = base.name() else {
            return true;
        };
        if !base.kind.is_composite() {
            return true;
        }
        if base.kind == Kind::Object && name != self.collected.query_type && Some(name) == self.collected.mutation_type {
            return self.collected.contains(base.kind, name) && !self.collected.mutations.is_empty();
        }
        self.collected.contains(base.kind, name)
    }

    fn write_enum(&mut self, name: &str, type_ref: &TypeRef) {
        self.writer.blank_line();
        self.writer.description(type_ref.description.as_deref());
        self.writer.begin_indent(&format!("enum {} {{", name));
        for value in type_ref.enum_values() {
            self.writer.description(value.description.as_deref());
            self.writer.line(&value.name);
        }
        self.writer.end_indent("}");
    }

    fn write_object(&mut self, name: &str, type_ref: &TypeRef) {
        let interfaces: Vec<&str> = type_ref
            .interfaces()
            .iter()
            .filter(|interface| self.is_declared(interface))
            .map(|interface| self.printed_name(interface))
            .collect();
        let header = if interfaces.is_empty() {
            format!("type {} {{", name)
        } else {
            format!("type {} implements {} {{", name, interfaces.join(" & "))
        };

        self.writer.blank_line();
        self.writer.description(type_ref.description.as_deref());
        self.writer.begin_indent(&header);
        for field in type_ref.fields() {
            self.write_field(field);
        }
        self.writer.end_indent("}");
    }

    fn write_input_object(&mut self, name: &str, type_ref: &TypeRef) {
        self.writer.blank_line();
        self.writer.description(type_ref.description.as_deref());
        self.writer.begin_indent(&format!("input {} {{", name));
        for input_field in type_ref.input_fields() {
            if self.is_declared(&input_field.input_type) {
                let signature = self.input_value_signature(input_field);
                self.writer.description(input_field.description.as_deref());
                self.writer.line(&signature);
            }
        }
        self.writer.end_indent("}");
    }

    fn write_root<'f>(&mut self, name: &str, fields: impl Iterator<Item = &'f Field>) {
        self.writer.blank_line();
        self.writer.begin_indent(&format!("type {} {{", name));
        for field in fields {
            self.write_field(field);
        }
        self.writer.end_indent("}");
    }

    fn write_field(&mut self, field: &Field) {
        if !self.is_declared(&field.field_type) {
            return;
        }
        let args: Vec<&InputValue> = field
            .args()
            .iter()
            .filter(|arg| self.is_declared(&arg.input_type))
            .collect();
        let field_type = self.printed_type(&field.field_type);

        self.writer.description(field.description.as_deref());
        if args.is_empty() {
            self.writer.line(&format!("{}: {}", field.name, field_type));
        } else if args.iter().any(|arg| has_description(arg)) {
            self.writer.begin_indent(&format!("{}(", field.name));
            for arg in args {
                let signature = self.input_value_signature(arg);
                self.writer.description(arg.description.as_deref());
                self.writer.line(&signature);
            }
            self.writer.end_indent(&format!("): {}", field_type));
        } else {
            let args: Vec<String> = args.into_iter().map(|arg| self.input_value_signature(arg)).collect();
            self.writer.line(&format!("{}({}): {}", field.name, args.join(", "), field_type));
        }
    }

    fn input_value_signature(&self, value: &InputValue) -> String {
        let input_type = self.printed_type(&value.input_type);
        match &value.default_value {
            Some(default_value) => format!("{}: {} = {}", value.name, input_type, default_value),
            None => format!("{}: {}", value.name, input_type),
        }
    }
}

fn has_description(value: &InputValue) -> bool {
    value.description.as_deref().is_some_and(|it| !it.trim().is_empty())
}
