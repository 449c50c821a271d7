//! Human-readable dump of a module's plans.
//!
//! ```text
//! p1 Types.tree: record {label: id, left?: p2}
//! p2: option(p1)
//! export Types.swap = p3
//! ```

use std::fmt::Write;

use super::converter::{ArgSlot, Convention, Converter, OriginTag};
use super::planner::ModulePlans;
use crate::model::Model;

impl ModulePlans {
    pub fn dump(&self, model: &Model) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(model, &mut out);
        out
    }

    fn format(&self, model: &Model, w: &mut impl Write) -> std::fmt::Result {
        for (id, plan) in self.table.iter() {
            write!(w, "{id}")?;
            if let Some(named) = plan.named {
                write!(w, " {}", model.decl_path(named.decl))?;
                if named.instance > 0 {
                    write!(w, "#{}", named.instance + 1)?;
                }
            }
            write!(w, ": ")?;
            format_converter(w, &plan.converter)?;
            w.write_char('\n')?;
        }
        for (&export, &plan) in &self.exports {
            let keyword = if model.export(export).is_import() {
                "import"
            } else {
                "export"
            };
            writeln!(w, "{keyword} {} = {plan}", model.export_path(export))?;
        }
        Ok(())
    }
}

fn format_origin(w: &mut impl Write, tag: OriginTag) -> std::fmt::Result {
    match tag {
        OriginTag::Constant(n) => write!(w, "const {n}"),
        OriginTag::Block(n) => write!(w, "block {n}"),
        OriginTag::Hash(h) => write!(w, "#{h}"),
    }
}

fn format_converter(w: &mut impl Write, converter: &Converter) -> std::fmt::Result {
    match converter {
        Converter::Identity => write!(w, "id"),
        Converter::Pending => write!(w, "pending"),
        Converter::Option { inner, nested } => {
            let name = if *nested { "nested-option" } else { "option" };
            write!(w, "{name}({inner})")
        }
        Converter::Array(inner) => write!(w, "array({inner})"),
        Converter::Tuple(elements) => {
            write!(w, "tuple(")?;
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    write!(w, ", ")?;
                }
                write!(w, "{element}")?;
            }
            write!(w, ")")
        }
        Converter::Record(fields) => {
            write!(w, "record {{")?;
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    write!(w, ", ")?;
                }
                if field.mutable {
                    write!(w, "mut ")?;
                }
                write!(w, "{}", field.name)?;
                if field.host_name != field.name {
                    write!(w, " as {}", field.host_name)?;
                }
                if field.optional {
                    w.write_char('?')?;
                }
                write!(w, ": {}", field.plan)?;
            }
            write!(w, "}}")
        }
        Converter::Enum(table) => {
            write!(w, "enum {{")?;
            for (i, entry) in table.entries.iter().enumerate() {
                if i > 0 {
                    write!(w, ", ")?;
                }
                match entry.origin {
                    OriginTag::Hash(h) => write!(w, "#{h}")?,
                    other => write!(w, "{}", other.discriminant())?,
                }
                write!(w, " <-> {:?}", entry.host)?;
            }
            write!(w, "}}")
        }
        Converter::Variant(variant) => {
            write!(w, "variant {{")?;
            for (i, case) in variant.cases.iter().enumerate() {
                if i > 0 {
                    write!(w, ", ")?;
                }
                write!(w, "{}", case.tag)?;
                if case.host_tag != case.tag {
                    write!(w, " as {:?}", case.host_tag)?;
                }
                write!(w, ": ")?;
                format_origin(w, case.origin)?;
                if !case.payload.is_empty() {
                    write!(w, " (")?;
                    for (j, plan) in case.payload.iter().enumerate() {
                        if j > 0 {
                            write!(w, ", ")?;
                        }
                        write!(w, "{plan}")?;
                    }
                    write!(w, ")")?;
                }
            }
            write!(w, "}}")
        }
        Converter::Function(func) => {
            let convention = match func.adapter.convention {
                Convention::Uncurried => "fn",
                Convention::Curried => "fn curried",
                Convention::Component => "component",
            };
            write!(w, "{convention}(")?;
            for (i, (slot, plan)) in func.adapter.slots.iter().zip(&func.params).enumerate() {
                if i > 0 {
                    write!(w, ", ")?;
                }
                match slot {
                    ArgSlot::Positional(_) => write!(w, "{plan}")?,
                    ArgSlot::Labeled { name, optional } => {
                        let mark = if *optional { "?" } else { "" };
                        write!(w, "~{name}{mark}: {plan}")?;
                    }
                    ArgSlot::Unit => write!(w, "()")?,
                }
            }
            write!(w, ") -> {}", func.result)
        }
    }
}
