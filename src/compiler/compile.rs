//! Recursive descent from a rule tree to a predicate node tree

use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::compare::{Check, Semantics};
use super::{Leaf, Node};
use crate::coercion::{Coercer, Literal, LiteralContext};
use crate::errors::{CompileError, CompileResult};
use crate::observability::{log_event, Event};
use crate::operators::{Arity, Operator, OperatorRegistry, ResolvedOperator};
use crate::options::CompileOptions;
use crate::reflect::FieldType;
use crate::resolver::{AccessorChain, Quantifier, Resolver};
use crate::rule::{Condition, DeclaredType, Rule};

/// Compiles rules against one record type under one set of options
pub(crate) struct Compiler<'o> {
    options: &'o CompileOptions,
    registry: OperatorRegistry<'o>,
    resolver: Resolver<'o>,
    coercer: Coercer<'o>,
    root: FieldType,
}

impl<'o> Compiler<'o> {
    pub fn new(options: &'o CompileOptions, root: FieldType) -> Self {
        Self {
            options,
            registry: options.registry(),
            resolver: Resolver::new(options.indexer_sentinel(), options.null_check_nested_objects),
            coercer: Coercer::new(&options.culture, options.parse_dates_as_utc),
            root,
        }
    }

    pub fn compile(&self, rule: &Rule) -> CompileResult<Node> {
        if rule.is_group() {
            let children = rule
                .rules
                .iter()
                .map(|child| self.compile(child))
                .collect::<CompileResult<Vec<_>>>()?;
            return Ok(match rule.condition {
                Condition::And => Node::And(children),
                Condition::Or => Node::Or(children),
            });
        }

        if rule.is_vacuous() {
            return Ok(Node::True);
        }

        self.leaf(rule)
    }

    fn leaf(&self, rule: &Rule) -> CompileResult<Node> {
        let field = rule.field_path();
        let operator = self
            .registry
            .resolve(rule.operator_name())
            .ok_or_else(|| CompileError::UnknownOperator {
                field: field.to_string(),
                operator: rule.operator_name().to_string(),
            })?;
        let declared = declared_type(rule)?;

        if let ResolvedOperator::Builtin(op) = &operator {
            if op.requires_ordering() && !declared.is_orderable() {
                return Err(CompileError::OperatorTypeMismatch {
                    field: field.to_string(),
                    operator: op.name().to_string(),
                    declared_type: declared.as_str().to_string(),
                });
            }
        }

        let mut chain = self.resolver.resolve(&self.root, field)?;
        if operator.arity() != Arity::None {
            // Value tests on a list apply to its elements
            while matches!(chain.target().non_null(), FieldType::List(_)) {
                chain = chain.through_elements();
            }
        }

        let ctx = LiteralContext {
            field,
            operator: operator.name(),
            declared,
        };
        let literals = self
            .coercer
            .coerce(rule.value.as_ref(), operator.arity(), &ctx)?;

        let quantifier = if operator.is_negated() {
            Quantifier::All
        } else {
            Quantifier::Any
        };

        let check = match &operator {
            ResolvedOperator::Custom(custom) => Check::Custom {
                op: Arc::clone(custom),
                operands: literals,
            },
            ResolvedOperator::Builtin(op) => self.builtin_check(*op, &chain, literals, &ctx)?,
        };

        let target = chain.target().type_name();
        log_event(
            Event::LeafCompiled,
            &[
                ("field", field),
                ("operator", operator.name()),
                ("type", declared.as_str()),
                ("target", target.as_str()),
            ],
        );

        Ok(Node::Leaf(Arc::new(Leaf {
            chain,
            quantifier,
            check,
        })))
    }

    /// Reconcile the coerced literals with the field's static type
    fn builtin_check(
        &self,
        op: Operator,
        chain: &AccessorChain,
        literals: Vec<Literal>,
        ctx: &LiteralContext<'_>,
    ) -> CompileResult<Check> {
        let positive = op.positive();
        let negated = op.is_negated();
        let target = chain.target();
        let mut semantics = Semantics {
            case_sensitive: self.options.string_case_sensitive,
            render_text: false,
            date_only: ctx.declared == DeclaredType::Date,
        };
        let mismatch = |reason: &str| CompileError::TypeMismatch {
            field: ctx.field.to_string(),
            operator: op.name().to_string(),
            declared_type: ctx.declared.as_str().to_string(),
            field_type: target.type_name(),
            reason: reason.to_string(),
        };

        if positive.is_presence_test() {
            return Ok(Check::Builtin {
                op: positive,
                negated,
                operands: literals,
                semantics,
            });
        }

        let base = target.non_null();
        if op.requires_ordering() && !base.is_orderable() {
            return Err(mismatch("field type has no ordering"));
        }

        let mut operands = match base {
            FieldType::Any if positive.is_text_match() => render_all(literals),
            FieldType::Any => literals,
            FieldType::Map { .. } if positive == Operator::Contains => {
                return Ok(Check::MapKey {
                    keys: literals.iter().map(Literal::render).collect(),
                    negated,
                });
            }
            FieldType::Map { .. } => return Err(mismatch("maps only support key presence tests")),
            FieldType::Object(_) | FieldType::List(_) | FieldType::Nullable(_) => {
                return Err(mismatch("composite values cannot be compared to a literal"));
            }
            FieldType::String => render_all(literals),
            FieldType::Enum(members) if !positive.is_text_match() && ctx.declared == DeclaredType::String => {
                semantics.case_sensitive = true;
                semantics.render_text = true;
                literals
                    .iter()
                    .map(|lit| self.enum_member(members, lit, ctx))
                    .collect::<CompileResult<Vec<_>>>()?
            }
            FieldType::Enum(_) if !positive.is_text_match() && ctx.declared.is_numeric() => literals,
            _ if positive.is_text_match() || ctx.declared == DeclaredType::String => {
                if self.options.require_explicit_to_string_conversion {
                    return Err(mismatch("field is not text and implicit conversion is disabled"));
                }
                semantics.render_text = true;
                render_all(literals)
            }
            scalar if compatible(ctx.declared, scalar) => literals,
            _ => return Err(mismatch("declared type does not match the field")),
        };

        if !semantics.case_sensitive {
            for literal in &mut operands {
                if let Literal::Text(text) = literal {
                    *text = text.to_lowercase();
                }
            }
        }

        Ok(Check::Builtin {
            op: positive,
            negated,
            operands,
            semantics,
        })
    }

    /// Canonical member name for an enum literal given as text
    fn enum_member(
        &self,
        members: &[(&'static str, i64)],
        literal: &Literal,
        ctx: &LiteralContext<'_>,
    ) -> CompileResult<Literal> {
        let name = literal.render();
        let found = members.iter().find(|(member, _)| {
            if self.options.string_case_sensitive {
                *member == name
            } else {
                member.eq_ignore_ascii_case(&name)
            }
        });
        match found {
            Some((member, _)) => Ok(Literal::Text((*member).to_string())),
            None => {
                let known: Vec<&str> = members.iter().map(|(member, _)| *member).collect();
                Err(ctx.error(
                    &JsonValue::String(name),
                    format!("no enum member with that name (expected one of {})", known.join(", ")),
                ))
            }
        }
    }
}

fn declared_type(rule: &Rule) -> CompileResult<DeclaredType> {
    match rule.type_tag.as_deref().map(str::trim) {
        None | Some("") => Ok(DeclaredType::default()),
        Some(tag) => DeclaredType::from_tag(tag).ok_or_else(|| CompileError::UnknownType {
            field: rule.field_path().to_string(),
            type_tag: tag.to_string(),
        }),
    }
}

fn render_all(literals: Vec<Literal>) -> Vec<Literal> {
    literals
        .into_iter()
        .map(|lit| match lit {
            Literal::Text(_) => lit,
            other => Literal::Text(other.render()),
        })
        .collect()
}

fn compatible(declared: DeclaredType, field: &FieldType) -> bool {
    match field {
        FieldType::Int | FieldType::Long | FieldType::Double => declared.is_numeric(),
        FieldType::Bool => declared == DeclaredType::Boolean,
        FieldType::Date | FieldType::DateTime => {
            matches!(declared, DeclaredType::Date | DeclaredType::DateTime)
        }
        FieldType::Guid => declared == DeclaredType::Guid,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{KeyKind, Shape};
    use serde_json::json;

    const LEVELS: &[(&str, i64)] = &[("Low", 1), ("High", 3)];

    fn item_shape() -> Shape {
        Shape::new("Item")
            .member("Name", FieldType::String)
            .member("Count", FieldType::Int)
            .member("Active", FieldType::Bool)
            .member("Level", FieldType::Enum(LEVELS))
            .member("Tags", FieldType::List(Box::new(FieldType::String)))
            .member(
                "Attrs",
                FieldType::Map {
                    key: KeyKind::String,
                    value: Box::new(FieldType::String),
                },
            )
            .member("Parent", FieldType::nullable(FieldType::Object(item_shape)))
    }

    fn compile(rule: Rule, options: &CompileOptions) -> CompileResult<Node> {
        Compiler::new(options, FieldType::Object(item_shape)).compile(&rule)
    }

    fn leaf_check(node: &Node) -> &Check {
        match node {
            Node::Leaf(leaf) => &leaf.check,
            other => panic!("expected a leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_group_structure() {
        let options = CompileOptions::default();
        let node = compile(
            Rule::or(vec![
                Rule::leaf("Count", "equal", "integer", 1),
                Rule::and(vec![Rule::new("Name", "is_null")]),
            ]),
            &options,
        )
        .unwrap();
        match node {
            Node::Or(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[1], Node::And(_)));
            }
            other => panic!("expected OR, got {other:?}"),
        }
    }

    #[test]
    fn test_vacuous_rule_is_true() {
        let node = compile(Rule::default(), &CompileOptions::default()).unwrap();
        assert!(matches!(node, Node::True));
    }

    #[test]
    fn test_unknown_operator_and_type() {
        let options = CompileOptions::default();
        let err = compile(Rule::leaf("Count", "like", "integer", 1), &options).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownOperator {
                field: "Count".into(),
                operator: "like".into(),
            }
        );

        let err = compile(Rule::leaf("Count", "equal", "decimal", 1), &options).unwrap_err();
        assert_eq!(err.code(), "QUERY_UNKNOWN_TYPE");
    }

    #[test]
    fn test_ordering_requires_orderable_types() {
        let options = CompileOptions::default();
        let err = compile(Rule::leaf("Name", "greater", "string", "a"), &options).unwrap_err();
        assert_eq!(err.code(), "QUERY_OPERATOR_TYPE_MISMATCH");

        let err = compile(Rule::leaf("Active", "less", "integer", 1), &options).unwrap_err();
        assert_eq!(err.code(), "QUERY_TYPE_MISMATCH");
    }

    #[test]
    fn test_incompatible_declared_type() {
        let err = compile(
            Rule::leaf("Count", "equal", "boolean", true),
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "QUERY_TYPE_MISMATCH");
    }

    #[test]
    fn test_string_against_number_renders_unless_explicit() {
        let node = compile(
            Rule::leaf("Count", "equal", "string", "5"),
            &CompileOptions::default(),
        )
        .unwrap();
        match leaf_check(&node) {
            Check::Builtin { semantics, .. } => assert!(semantics.render_text),
            other => panic!("unexpected check {other:?}"),
        }

        let strict = CompileOptions::default().with_explicit_to_string(true);
        let err = compile(Rule::leaf("Count", "equal", "string", "5"), &strict).unwrap_err();
        assert_eq!(err.code(), "QUERY_TYPE_MISMATCH");
    }

    #[test]
    fn test_enum_names_are_canonicalized() {
        let node = compile(
            Rule::leaf("Level", "in", "string", json!(["high", "LOW"])),
            &CompileOptions::default(),
        )
        .unwrap();
        match leaf_check(&node) {
            Check::Builtin { operands, .. } => assert_eq!(
                operands,
                &vec![Literal::Text("High".into()), Literal::Text("Low".into())]
            ),
            other => panic!("unexpected check {other:?}"),
        }

        let err = compile(
            Rule::leaf("Level", "equal", "string", "Medium"),
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "QUERY_COERCION_FAILED");
    }

    #[test]
    fn test_list_value_tests_apply_to_elements() {
        let node = compile(
            Rule::leaf("Tags", "in", "string", json!(["a"])),
            &CompileOptions::default(),
        )
        .unwrap();
        match node {
            Node::Leaf(leaf) => {
                assert!(leaf.chain.has_collection_hop());
                assert_eq!(leaf.quantifier, Quantifier::Any);
            }
            other => panic!("expected a leaf, got {other:?}"),
        }

        let node = compile(Rule::new("Tags", "is_not_empty"), &CompileOptions::default()).unwrap();
        match node {
            Node::Leaf(leaf) => assert!(!leaf.chain.has_collection_hop()),
            other => panic!("expected a leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_map_root_contains_checks_keys() {
        let node = compile(
            Rule::leaf("Attrs", "not_contains", "string", "Color"),
            &CompileOptions::default(),
        )
        .unwrap();
        match leaf_check(&node) {
            Check::MapKey { keys, negated } => {
                assert_eq!(keys, &vec!["Color".to_string()]);
                assert!(*negated);
            }
            other => panic!("unexpected check {other:?}"),
        }

        let err = compile(
            Rule::leaf("Attrs", "equal", "string", "x"),
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "QUERY_TYPE_MISMATCH");
    }

    #[test]
    fn test_record_target_rejects_value_tests() {
        let err = compile(
            Rule::leaf("Parent", "equal", "string", "x"),
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "QUERY_TYPE_MISMATCH");
        assert!(compile(Rule::new("Parent", "is_null"), &CompileOptions::default()).is_ok());
    }

    #[test]
    fn test_first_error_aborts_compilation() {
        let err = compile(
            Rule::and(vec![
                Rule::leaf("Count", "equal", "integer", 1),
                Rule::leaf("Missing", "equal", "integer", 1),
            ]),
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "Missing");
    }
}
