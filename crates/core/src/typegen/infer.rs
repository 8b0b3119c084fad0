//! Shape inference from sample JSON.

use serde_json::{Map, Value};

use super::emit::Emit;
use super::types::{TsModule, TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind};
use super::utils::{element_name, type_name_from_key};

/// Generate `export interface` / `export type` declarations describing
/// `sample`, rooted at `root_name`.
pub fn generate_type_declarations(sample: &Value, root_name: &str) -> String {
    infer_module(sample, root_name).emit()
}

/// Declarations for a response sample and, when given, a request body
/// sample declared as `<root_name>Request`.
///
/// Both roots share one namespace, so nested declarations never collide.
pub fn generate_endpoint_declarations(response: &Value, request: Option<&Value>, root_name: &str) -> String {
    let request_name = format!("{root_name}Request");
    let mut roots = vec![(response, root_name)];
    if let Some(request) = request {
        roots.push((request, request_name.as_str()));
    }
    infer_roots(&roots).emit()
}

/// Infer the declaration IR for `sample`.
pub fn infer_module(sample: &Value, root_name: &str) -> TsModule {
    infer_roots(&[(sample, root_name)])
}

fn infer_roots(roots: &[(&Value, &str)]) -> TsModule {
    let mut inferrer = Inferrer::default();
    for (sample, root_name) in roots {
        inferrer.root(sample, root_name);
    }
    TsModule {
        defs: inferrer.slots.into_iter().filter_map(Slot::into_def).collect(),
    }
}

#[derive(Debug)]
enum Slot {
    Pending(String),
    Done(TsTypeDef),
    Released,
}

impl Slot {
    fn name(&self) -> Option<&str> {
        match self {
            Slot::Pending(name) => Some(name),
            Slot::Done(def) => Some(&def.name),
            Slot::Released => None,
        }
    }

    fn into_def(self) -> Option<TsTypeDef> {
        match self {
            Slot::Done(def) => Some(def),
            Slot::Pending(_) | Slot::Released => None,
        }
    }
}

/// Declarations are kept in reservation order so parents precede the
/// types they reference.
#[derive(Debug, Default)]
struct Inferrer {
    slots: Vec<Slot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

fn category(value: &Value) -> Category {
    match value {
        Value::Null => Category::Null,
        Value::Bool(_) => Category::Boolean,
        Value::Number(_) => Category::Number,
        Value::String(_) => Category::String,
        Value::Array(_) => Category::Array,
        Value::Object(_) => Category::Object,
    }
}

/// `Item`, `Item1`, `Item2` all share the base `Item`.
fn same_base(name: &str, base: &str) -> bool {
    name.strip_prefix(base)
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

impl Inferrer {
    /// Objects become interfaces; anything else becomes an alias.
    fn root(&mut self, sample: &Value, root_name: &str) {
        if let Value::Object(map) = sample {
            self.object(&[map], root_name);
        } else {
            let slot = self.reserve(root_name);
            let ty = self.infer(&[sample], root_name);
            self.fill(
                slot,
                TsTypeDef {
                    name: root_name.to_string(),
                    kind: TypeDefKind::TypeAlias { ty },
                },
            );
        }
    }

    fn is_taken(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| slot.name() == Some(name))
    }

    fn reserve(&mut self, base: &str) -> usize {
        let mut name = base.to_string();
        let mut counter = 1;
        while self.is_taken(&name) {
            name = format!("{base}{counter}");
            counter += 1;
        }
        self.slots.push(Slot::Pending(name));
        self.slots.len() - 1
    }

    fn fill(&mut self, slot: usize, def: TsTypeDef) {
        self.slots[slot] = Slot::Done(def);
    }

    /// Type for every sample value seen at one position.
    fn infer(&mut self, values: &[&Value], hint: &str) -> TsType {
        let mut order: Vec<Category> = Vec::new();
        for value in values {
            let cat = category(value);
            if !order.contains(&cat) {
                order.push(cat);
            }
        }

        let members = order
            .into_iter()
            .map(|cat| match cat {
                Category::Null => TsType::Primitive(TsPrimitive::Null),
                Category::Boolean => TsType::Primitive(TsPrimitive::Boolean),
                Category::Number => TsType::Primitive(TsPrimitive::Number),
                Category::String => TsType::Primitive(TsPrimitive::String),
                Category::Array => {
                    let elements: Vec<&Value> = values
                        .iter()
                        .filter_map(|v| v.as_array())
                        .flatten()
                        .collect();
                    if elements.is_empty() {
                        TsType::Array(Box::new(TsType::Primitive(TsPrimitive::Any)))
                    } else {
                        TsType::Array(Box::new(self.infer(&elements, &element_name(hint))))
                    }
                }
                Category::Object => {
                    let objects: Vec<&Map<String, Value>> =
                        values.iter().filter_map(|v| v.as_object()).collect();
                    TsType::Ref(self.object(&objects, hint))
                }
            })
            .collect();

        TsType::union(members)
    }

    /// Declare one interface covering every object in `objects` and return
    /// its name. Keys missing from some objects become optional.
    fn object(&mut self, objects: &[&Map<String, Value>], hint: &str) -> String {
        let slot = self.reserve(hint);

        let mut keys: Vec<&str> = Vec::new();
        for object in objects {
            for key in object.keys() {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }

        let mut properties = Vec::with_capacity(keys.len());
        for key in keys {
            let values: Vec<&Value> = objects.iter().filter_map(|o| o.get(key)).collect();
            let optional = values.len() < objects.len();
            let ty = self.infer(&values, &type_name_from_key(key));
            properties.push(TsProp {
                name: key.to_string(),
                ty,
                optional,
            });
        }

        // Reuse an identical interface declared under the same base name.
        let same_shape = self.slots.iter().find_map(|s| match s {
            Slot::Done(TsTypeDef {
                name,
                kind: TypeDefKind::Interface { properties: existing },
            }) if existing == &properties && same_base(name, hint) => Some(name.clone()),
            _ => None,
        });
        if let Some(name) = same_shape {
            self.slots[slot] = Slot::Released;
            return name;
        }

        let name = match &self.slots[slot] {
            Slot::Pending(name) => name.clone(),
            _ => hint.to_string(),
        };
        self.fill(
            slot,
            TsTypeDef {
                name: name.clone(),
                kind: TypeDefKind::Interface { properties },
            },
        );
        name
    }
}
