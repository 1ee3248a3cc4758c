//! SDL rendering
//!
//! Renders the ordered IR as GraphQL schema definition language. Section
//! order is fixed (Query, Mutation, inputs, types, enums, unions, scalars)
//! and each section is already sorted, so the output is byte-stable.

use crate::ir::{EnumDecl, Method, SchemaField, SchemaIr, ServiceType, UnionDecl};

/// First line of every rendered schema
pub const HEADER: &str = "# Code generated by protoc-gen-gql. DO NOT EDIT.";

/// Field given to object types that would otherwise be empty
const PLACEHOLDER_FIELD: &str = "_: Boolean";

const INDENT: &str = "  ";

/// Render `ir` as SDL
pub fn render(ir: &SchemaIr) -> String {
    let mut sdl = Sdl::default();
    sdl.line(HEADER);

    sdl.operations("Query", &ir.queries, true);
    sdl.operations("Mutation", &ir.mutations, false);
    for input in &ir.inputs {
        sdl.object("input", input);
    }
    for ty in &ir.types {
        sdl.object("type", ty);
    }
    for decl in &ir.enums {
        sdl.enumeration(decl);
    }
    for decl in &ir.unions {
        sdl.union(decl);
    }
    for scalar in &ir.scalars {
        sdl.blank();
        sdl.line(&format!("scalar {scalar}"));
    }

    sdl.out
}

#[derive(Default)]
struct Sdl {
    out: String,
}

impl Sdl {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn description(&mut self, doc: &str, indent: &str) {
        if doc.is_empty() {
            return;
        }
        self.line(&format!("{indent}\"\"\""));
        for line in doc.lines() {
            let line = line.trim_end().replace("\"\"\"", "\\\"\"\"");
            if line.is_empty() {
                self.blank();
            } else {
                self.line(&format!("{indent}{line}"));
            }
        }
        self.line(&format!("{indent}\"\"\""));
    }

    fn operations(&mut self, root: &str, methods: &[Method], always: bool) {
        if methods.is_empty() && !always {
            return;
        }
        self.blank();
        self.line(&format!("type {root} {{"));
        if methods.is_empty() {
            self.line(&format!("{INDENT}{PLACEHOLDER_FIELD}"));
        }
        for method in methods {
            self.description(&method.doc, INDENT);
            let args = method
                .request
                .as_ref()
                .map(|req| format!("(req: {req})"))
                .unwrap_or_default();
            self.line(&format!("{INDENT}{}{args}: {}", method.name, method.response));
        }
        self.line("}");
    }

    fn object(&mut self, keyword: &str, ty: &ServiceType) {
        self.blank();
        self.description(&ty.doc, "");
        self.line(&format!("{keyword} {} {{", ty.name));
        if ty.fields.is_empty() {
            self.line(&format!("{INDENT}{PLACEHOLDER_FIELD}"));
        }
        for field in &ty.fields {
            self.field(field);
        }
        self.line("}");
    }

    fn field(&mut self, field: &SchemaField) {
        self.description(&field.doc, INDENT);
        self.line(&format!("{INDENT}{}: {}", field.name, field.type_expr));
    }

    fn enumeration(&mut self, decl: &EnumDecl) {
        self.blank();
        self.description(&decl.doc, "");
        self.line(&format!("enum {} {{", decl.name));
        for value in &decl.values {
            self.description(&value.doc, INDENT);
            self.line(&format!("{INDENT}{}", value.name));
        }
        self.line("}");
    }

    fn union(&mut self, decl: &UnionDecl) {
        self.blank();
        self.line(&format!("union {} = {}", decl.name, decl.members.join(" | ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumValue, TypeBinding};

    fn method(name: &str, request: Option<&str>, response: &str) -> Method {
        Method {
            name: name.to_string(),
            doc: String::new(),
            request: request.map(str::to_string),
            response: response.to_string(),
            mutation: false,
        }
    }

    fn object(name: &str, fields: &[(&str, &str)]) -> ServiceType {
        ServiceType {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(n, t)| SchemaField {
                    name: n.to_string(),
                    type_expr: t.to_string(),
                    doc: String::new(),
                })
                .collect(),
            doc: String::new(),
            origin: None,
        }
    }

    #[test]
    fn test_render_full_schema() {
        let mut get = method("getPainter", Some("GetPainterRequest"), "Painter");
        get.doc = "Look up one painter.".to_string();
        let ir = SchemaIr {
            queries: vec![get, method("listPainters", None, "ListResponse")],
            mutations: vec![method("createPainter", Some("PainterInput"), "Painter")],
            types: vec![
                object("Empty", &[]),
                object("Painter", &[("name", "String"), ("medium", "PainterMedium")]),
            ],
            inputs: vec![object("PainterInput", &[("name", "String")])],
            enums: vec![EnumDecl {
                name: "Style".to_string(),
                values: vec![
                    EnumValue {
                        name: "UNKNOWN".to_string(),
                        doc: String::new(),
                    },
                    EnumValue {
                        name: "CUBISM".to_string(),
                        doc: "Braque and Picasso.".to_string(),
                    },
                ],
                doc: String::new(),
                native: TypeBinding::new("crate::painters", "Style"),
            }],
            unions: vec![UnionDecl {
                name: "PainterMedium".to_string(),
                members: vec!["PainterMediumOil".to_string(), "PainterMediumInk".to_string()],
            }],
            scalars: vec!["ProtoBytes".to_string()],
        };

        let expected = r#"# Code generated by protoc-gen-gql. DO NOT EDIT.

type Query {
  """
  Look up one painter.
  """
  getPainter(req: GetPainterRequest): Painter
  listPainters: ListResponse
}

type Mutation {
  createPainter(req: PainterInput): Painter
}

input PainterInput {
  name: String
}

type Empty {
  _: Boolean
}

type Painter {
  name: String
  medium: PainterMedium
}

enum Style {
  UNKNOWN
  """
  Braque and Picasso.
  """
  CUBISM
}

union PainterMedium = PainterMediumOil | PainterMediumInk

scalar ProtoBytes
"#;
        assert_eq!(render(&ir), expected);
    }

    #[test]
    fn test_empty_query_gets_placeholder() {
        let ir = SchemaIr {
            mutations: vec![method("purge", None, "Empty")],
            ..Default::default()
        };
        let sdl = render(&ir);
        assert!(sdl.contains("type Query {\n  _: Boolean\n}\n"));
        assert!(sdl.contains("type Mutation {\n  purge: Empty\n}\n"));
    }

    #[test]
    fn test_multiline_description() {
        let mut ty = object("Painter", &[("name", "String")]);
        ty.doc = "A painter.\n\nHas a name.".to_string();
        let sdl = render(&SchemaIr {
            types: vec![ty],
            ..Default::default()
        });
        assert!(sdl.contains("\"\"\"\nA painter.\n\nHas a name.\n\"\"\"\ntype Painter {"));
    }
}
