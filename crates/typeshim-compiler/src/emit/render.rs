//! Rendering of a `DeclTree` to TypeScript declaration text.

use std::fmt::Write;

use typeshim_core::Colors;
use typeshim_core::utils::{property_key, quote_string};

use super::config::Config;
use super::decl::{DeclItem, DeclTree, HostCase, HostField, HostType};

/// Render `tree` as the contents of `<Module>.gen.d.ts`.
pub fn render_declarations(tree: &DeclTree, config: &Config) -> String {
    let renderer = Renderer {
        config,
        c: config.colors,
    };
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = renderer.tree(&mut out, tree);
    out
}

struct Renderer<'a> {
    config: &'a Config,
    c: Colors,
}

impl Renderer<'_> {
    fn tree(&self, w: &mut String, tree: &DeclTree) -> std::fmt::Result {
        let c = &self.c;
        if self.config.header {
            writeln!(
                w,
                "{}/* TypeScript file generated from {} by typeshim. */{}",
                c.keyword, tree.module, c.reset
            )?;
            w.push('\n');
        }

        let mut previous_import = false;
        for (i, item) in tree.items.iter().enumerate() {
            let is_import = matches!(item, DeclItem::Import { .. } | DeclItem::ReactImport);
            if i > 0 && !(is_import && previous_import) {
                w.push('\n');
            }
            self.item(w, item)?;
            previous_import = is_import;
        }

        if tree.items.is_empty() && w.ends_with("\n\n") {
            w.pop();
        }
        Ok(())
    }

    fn item(&self, w: &mut String, item: &DeclItem) -> std::fmt::Result {
        let c = &self.c;
        match item {
            DeclItem::Import {
                imported,
                local,
                from,
            } => writeln!(
                w,
                "{}import type{} {{{imported} as {local}}} {}from{} '{from}';",
                c.keyword, c.reset, c.keyword, c.reset
            ),
            DeclItem::ReactImport => writeln!(
                w,
                "{}import type{} * as React {}from{} '{}';",
                c.keyword, c.reset, c.keyword, c.reset, self.config.react_module
            ),
            DeclItem::Type { name, params, body } => {
                write!(
                    w,
                    "{}export type{} {}{name}{}{} =",
                    c.keyword,
                    c.reset,
                    c.name,
                    c.reset,
                    type_params(params)
                )?;
                match body {
                    HostType::Object(fields) if !fields.is_empty() => {
                        w.push_str(" {\n");
                        for field in fields {
                            writeln!(w, "  {};", self.field(field))?;
                        }
                        w.push_str("};\n");
                    }
                    HostType::TaggedUnion(cases) => {
                        for (i, case) in cases.iter().enumerate() {
                            let end = if i + 1 == cases.len() { ";" } else { "" };
                            write!(w, "\n  | {}{end}", self.case(case))?;
                        }
                        w.push('\n');
                    }
                    _ => writeln!(w, " {};", self.inline(body))?,
                }
                Ok(())
            }
            DeclItem::Opaque { name, params } => writeln!(
                w,
                "{}export declare abstract class{} {}{name}{}{} {{ protected opaque: any }}",
                c.keyword,
                c.reset,
                c.name,
                c.reset,
                type_params(params)
            ),
            DeclItem::Group { forward, members } => {
                writeln!(w, "{}// recursive: {}{}", c.keyword, forward.join(", "), c.reset)?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        w.push('\n');
                    }
                    self.item(w, member)?;
                }
                Ok(())
            }
            DeclItem::Value { name, ty } => writeln!(
                w,
                "{}export declare const{} {}{name}{}: {};",
                c.keyword,
                c.reset,
                c.name,
                c.reset,
                self.inline(ty)
            ),
            DeclItem::ImportedValue { name, checked, ty } => {
                writeln!(
                    w,
                    "{}export declare const{} {}{checked}{}: {};",
                    c.keyword,
                    c.reset,
                    c.name,
                    c.reset,
                    self.inline(ty)
                )?;
                writeln!(
                    w,
                    "{}export declare const{} {}{name}{}: unknown;",
                    c.keyword, c.reset, c.name, c.reset
                )
            }
            DeclItem::DefaultExport(name) => writeln!(
                w,
                "{}export default{} {name};",
                c.keyword, c.reset
            ),
        }
    }

    fn inline(&self, ty: &HostType) -> String {
        match ty {
            HostType::Number => "number".to_string(),
            HostType::String => "string".to_string(),
            HostType::Boolean => "boolean".to_string(),
            HostType::Void => "void".to_string(),
            HostType::Unknown => "unknown".to_string(),
            HostType::Named { name, args } => {
                if args.is_empty() {
                    name.clone()
                } else {
                    let args: Vec<_> = args.iter().map(|a| self.inline(a)).collect();
                    format!("{name}<{}>", args.join(", "))
                }
            }
            HostType::Var(name) => name.clone(),
            HostType::Option { inner, nested } => {
                let absent = if *nested { "undefined | null" } else { "undefined" };
                format!("({absent} | {})", self.union_member(inner))
            }
            HostType::Array(inner) => format!("{}[]", self.array_element(inner)),
            HostType::Tuple(elements) => {
                let elements: Vec<_> = elements.iter().map(|e| self.inline(e)).collect();
                format!("[{}]", elements.join(", "))
            }
            HostType::Object(fields) => {
                if fields.is_empty() {
                    return "{}".to_string();
                }
                let fields: Vec<_> = fields.iter().map(|f| self.field(f)).collect();
                format!("{{ {} }}", fields.join("; "))
            }
            HostType::StringUnion(tags) => {
                let tags: Vec<_> = tags.iter().map(|t| self.literal(t)).collect();
                tags.join(" | ")
            }
            HostType::TaggedUnion(cases) => {
                let cases: Vec<_> = cases.iter().map(|c| self.case(c)).collect();
                cases.join(" | ")
            }
            HostType::Function {
                type_params: generics,
                params,
                options_optional,
                result,
            } => {
                let last = params.len().saturating_sub(1);
                let params: Vec<_> = params
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let mark = if *options_optional && i == last { "?" } else { "" };
                        format!("_{}{mark}: {}", i + 1, self.inline(p))
                    })
                    .collect();
                format!(
                    "{}({}) => {}",
                    type_params(generics),
                    params.join(", "),
                    self.inline(result)
                )
            }
            HostType::Component(props) => {
                format!("{}<{}>", self.config.component_type, self.inline(props))
            }
        }
    }

    fn union_member(&self, ty: &HostType) -> String {
        match ty {
            HostType::Function { .. } => format!("({})", self.inline(ty)),
            _ => self.inline(ty),
        }
    }

    fn array_element(&self, ty: &HostType) -> String {
        match ty {
            HostType::Function { .. } | HostType::TaggedUnion(_) => {
                format!("({})", self.inline(ty))
            }
            HostType::StringUnion(tags) if tags.len() > 1 => format!("({})", self.inline(ty)),
            _ => self.inline(ty),
        }
    }

    fn field(&self, field: &HostField) -> String {
        let readonly = if field.readonly { "readonly " } else { "" };
        let mark = if field.optional { "?" } else { "" };
        format!(
            "{readonly}{}{mark}: {}",
            property_key(&field.name),
            self.inline(&field.ty)
        )
    }

    fn case(&self, case: &HostCase) -> String {
        match &case.value {
            Some(value) => format!(
                "{{ tag: {}; value: {} }}",
                self.literal(&case.tag),
                self.inline(value)
            ),
            None => format!("{{ tag: {} }}", self.literal(&case.tag)),
        }
    }

    fn literal(&self, s: &str) -> String {
        format!("{}{}{}", self.c.literal, quote_string(s), self.c.reset)
    }
}

fn type_params(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}
