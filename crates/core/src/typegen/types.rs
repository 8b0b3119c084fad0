//! TypeScript IR for generated declarations.

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, any
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Named type reference: "Item", "User"
    Ref(String),
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    /// Element type of arrays that were empty in every sample.
    Any,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// A named top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsTypeDef {
    pub name: String,
    pub kind: TypeDefKind,
}

/// Kind of type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefKind {
    /// `export interface Name { ... }`
    Interface { properties: Vec<TsProp> },
    /// `export type Name = T;`
    TypeAlias { ty: TsType },
}

/// All declarations produced from one sample, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsModule {
    pub defs: Vec<TsTypeDef>,
}

impl TsType {
    /// Build a union, flattening nested unions, dropping duplicates and
    /// moving `null` last. A single member collapses to itself.
    pub fn union(members: Vec<TsType>) -> TsType {
        let mut flat: Vec<TsType> = Vec::new();
        for member in members {
            let parts = match member {
                TsType::Union(inner) => inner,
                other => vec![other],
            };
            for part in parts {
                if !flat.contains(&part) {
                    flat.push(part);
                }
            }
        }

        let null = TsType::Primitive(TsPrimitive::Null);
        if let Some(index) = flat.iter().position(|t| *t == null)
            && flat.len() > 1
        {
            let member = flat.remove(index);
            flat.push(member);
        }

        match flat.len() {
            0 => TsType::Primitive(TsPrimitive::Any),
            1 => flat.remove(0),
            _ => TsType::Union(flat),
        }
    }
}
