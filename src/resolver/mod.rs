//! Field resolution
//!
//! Turns a dotted field path into an [`AccessorChain`] against a record's
//! static shape. Each segment is resolved against the type reached so far:
//!
//! - record: declared member (exact name), else the indexer sentinel, else
//!   the record's indexer if it has one
//! - map: key lookup (string keys only)
//! - list: the segment is resolved against the element type and the chain
//!   gains a collection hop
//! - any: dynamic lookup at evaluation time
//! - scalar: unresolvable
//!
//! Error codes:
//! - QUERY_FIELD_UNRESOLVABLE
//! - QUERY_KEY_TYPE_UNSUPPORTED

mod chain;

pub use chain::{AccessorChain, Quantifier, Step};

use crate::errors::{CompileError, CompileResult};
use crate::reflect::{FieldType, KeyKind};

/// Builds accessor chains under one set of path options
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver<'a> {
    indexer_sentinel: Option<&'a str>,
    null_guard: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(indexer_sentinel: Option<&'a str>, null_guard: bool) -> Self {
        Self {
            indexer_sentinel,
            null_guard,
        }
    }

    /// Resolve `path` starting from `root` (normally `FieldType::Object`)
    pub fn resolve(&self, root: &FieldType, path: &str) -> CompileResult<AccessorChain> {
        let path = path.trim();
        let segments: Vec<&str> = path.split('.').map(str::trim).collect();
        let unresolvable = |segment: &str| CompileError::UnresolvableField {
            path: path.to_string(),
            segment: segment.to_string(),
        };

        if segments.iter().any(|s| s.is_empty()) {
            return Err(unresolvable(""));
        }

        let mut steps = Vec::with_capacity(segments.len());
        let mut current = root.clone();
        let mut i = 0;

        while i < segments.len() {
            let segment = segments[i];
            let next = match current.non_null() {
                FieldType::Object(shape_fn) => {
                    let shape = shape_fn();
                    let sentinel_hop = self.indexer_sentinel == Some(segment)
                        && shape.find(segment).is_none()
                        && i + 1 < segments.len();

                    match (shape.indexer(), sentinel_hop) {
                        (Some(indexer), true) => {
                            i += 1;
                            steps.push(Step::Index(segments[i].to_string()));
                            indexer.clone()
                        }
                        _ => {
                            if let Some(member) = shape.find(segment) {
                                steps.push(Step::Member(member.name));
                                member.field_type.clone()
                            } else if let Some(indexer) = shape.indexer() {
                                steps.push(Step::Index(segment.to_string()));
                                indexer.clone()
                            } else {
                                return Err(unresolvable(segment));
                            }
                        }
                    }
                }
                FieldType::Map { key, value } => {
                    if *key != KeyKind::String {
                        return Err(CompileError::UnsupportedKeyType {
                            path: path.to_string(),
                            key_type: key.type_name().to_string(),
                        });
                    }
                    steps.push(Step::Key(segment.to_string()));
                    value.as_ref().clone()
                }
                FieldType::List(element) => {
                    // Same segment again, one level down
                    let element = element.as_ref().clone();
                    steps.push(Step::Each);
                    current = element;
                    continue;
                }
                FieldType::Any => {
                    steps.push(Step::Dynamic(segment.to_string()));
                    FieldType::Any
                }
                _ => return Err(unresolvable(segment)),
            };
            current = next;
            i += 1;
        }

        Ok(AccessorChain::new(
            path.to_string(),
            steps,
            current,
            self.null_guard,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Reflect, Shape, Value};

    fn location_shape() -> Shape {
        Shape::new("Location")
            .member("Latitude", FieldType::Double)
            .member("Longitude", FieldType::Double)
    }

    fn address_shape() -> Shape {
        Shape::new("Address")
            .member("City", FieldType::String)
            .member("Location", FieldType::nullable(FieldType::Object(location_shape)))
    }

    fn settings_shape() -> Shape {
        Shape::new("Settings").with_indexer(FieldType::String)
    }

    fn person_shape() -> Shape {
        Shape::new("Person")
            .member("Name", FieldType::String)
            .member("Address", FieldType::nullable(FieldType::Object(address_shape)))
            .member("Previous", FieldType::List(Box::new(FieldType::Object(address_shape))))
            .member(
                "Labels",
                FieldType::Map {
                    key: KeyKind::String,
                    value: Box::new(FieldType::String),
                },
            )
            .member(
                "Scores",
                FieldType::Map {
                    key: KeyKind::Integer,
                    value: Box::new(FieldType::Int),
                },
            )
            .member("Settings", FieldType::Object(settings_shape))
            .member("Extra", FieldType::Any)
    }

    fn root() -> FieldType {
        FieldType::Object(person_shape)
    }

    #[test]
    fn test_nested_members() {
        let chain = Resolver::default()
            .resolve(&root(), "Address.Location.Latitude")
            .unwrap();
        assert_eq!(
            chain.steps(),
            &[
                Step::Member("Address"),
                Step::Member("Location"),
                Step::Member("Latitude")
            ]
        );
        assert!(matches!(chain.target(), FieldType::Double));
        assert!(!chain.has_collection_hop());
    }

    #[test]
    fn test_member_names_are_case_sensitive() {
        let err = Resolver::default().resolve(&root(), "name").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnresolvableField {
                path: "name".into(),
                segment: "name".into(),
            }
        );
    }

    #[test]
    fn test_scalar_has_no_members() {
        let err = Resolver::default().resolve(&root(), "Name.Length").unwrap_err();
        assert_eq!(err.code(), "QUERY_FIELD_UNRESOLVABLE");
        assert!(Resolver::default().resolve(&root(), "Address..City").is_err());
    }

    #[test]
    fn test_list_hop_resolves_against_element() {
        let chain = Resolver::default().resolve(&root(), "Previous.City").unwrap();
        assert_eq!(
            chain.steps(),
            &[Step::Member("Previous"), Step::Each, Step::Member("City")]
        );
        assert!(chain.has_collection_hop());
    }

    #[test]
    fn test_map_key_lookup() {
        let chain = Resolver::default().resolve(&root(), "Labels.color").unwrap();
        assert_eq!(
            chain.steps(),
            &[Step::Member("Labels"), Step::Key("color".into())]
        );
        assert!(matches!(chain.target(), FieldType::String));
    }

    #[test]
    fn test_integer_keyed_map_is_rejected() {
        let err = Resolver::default().resolve(&root(), "Scores.1").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnsupportedKeyType {
                path: "Scores.1".into(),
                key_type: "integer".into(),
            }
        );
    }

    #[test]
    fn test_indexer_access() {
        let chain = Resolver::default().resolve(&root(), "Settings.theme").unwrap();
        assert_eq!(chain.steps()[1], Step::Index("theme".into()));

        let chain = Resolver::new(Some("Item"), false)
            .resolve(&root(), "Settings.Item.theme")
            .unwrap();
        assert_eq!(
            chain.steps(),
            &[Step::Member("Settings"), Step::Index("theme".into())]
        );
    }

    #[test]
    fn test_any_member_is_dynamic() {
        let chain = Resolver::default().resolve(&root(), "Extra.a.b").unwrap();
        assert_eq!(
            chain.steps(),
            &[
                Step::Member("Extra"),
                Step::Dynamic("a".into()),
                Step::Dynamic("b".into())
            ]
        );
    }

    struct Leaf {
        next: Option<Box<Leaf>>,
        depth: i64,
    }

    fn leaf_shape() -> Shape {
        Shape::new("Leaf")
            .member("Next", FieldType::nullable(FieldType::Object(leaf_shape)))
            .member("Depth", FieldType::Long)
    }

    impl Reflect for Leaf {
        fn shape() -> Shape {
            leaf_shape()
        }

        fn member(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "Next" => Some(match &self.next {
                    Some(next) => Value::Object(next.as_ref()),
                    None => Value::Null,
                }),
                "Depth" => Some(Value::Int(self.depth)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_null_hop_outcomes() {
        let record = Leaf {
            next: None,
            depth: 0,
        };
        let root = FieldType::Object(leaf_shape);
        let is_deep = |v: &Value<'_>| matches!(v, Value::Int(d) if *d > 0);

        let unguarded = Resolver::new(None, false).resolve(&root, "Next.Depth").unwrap();
        let err = unguarded
            .visit(&record, Quantifier::Any, &is_deep)
            .unwrap_err();
        assert_eq!(err.code(), "QUERY_NULL_REFERENCE");

        let guarded = Resolver::new(None, true).resolve(&root, "Next.Depth").unwrap();
        assert!(!guarded.visit(&record, Quantifier::Any, &is_deep).unwrap());
    }

    #[test]
    fn test_recursive_shape_walk() {
        let record = Leaf {
            next: Some(Box::new(Leaf {
                next: None,
                depth: 2,
            })),
            depth: 1,
        };
        let chain = Resolver::default()
            .resolve(&FieldType::Object(leaf_shape), "Next.Depth")
            .unwrap();
        let found = chain
            .visit(&record, Quantifier::Any, &|v| matches!(v, Value::Int(2)))
            .unwrap();
        assert!(found);
    }
}
