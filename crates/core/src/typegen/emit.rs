//! TypeScript code emission via the Emit trait.

use super::types::{TsModule, TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind};
use super::utils::quote_if_needed;

/// Indentation used inside generated interfaces.
const INDENT: &str = "    ";

/// Trait for emitting TypeScript code from IR nodes.
pub trait Emit {
    /// Convert the node to its TypeScript string representation.
    fn emit(&self) -> String;
}

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Any => "any".to_string(),
        }
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap unions in parentheses
                if matches!(**inner, TsType::Union(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => types.iter().map(|t| t.emit()).collect::<Vec<_>>().join(" | "),
            TsType::Ref(name) => name.clone(),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{key}{opt}: {}", self.ty.emit())
    }
}

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        match &self.kind {
            TypeDefKind::Interface { properties } => {
                let mut output = format!("export interface {} {{\n", self.name);
                for prop in properties {
                    output.push_str(&format!("{INDENT}{};\n", prop.emit()));
                }
                output.push('}');
                output
            }
            TypeDefKind::TypeAlias { ty } => {
                format!("export type {} = {};", self.name, ty.emit())
            }
        }
    }
}

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = self
            .defs
            .iter()
            .map(|def| def.emit())
            .collect::<Vec<_>>()
            .join("\n\n");
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }
}
