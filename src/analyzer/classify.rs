//! Type-Shape Classification
//!
//! Recognizes five shapes in a declared type expression:
//!
//! - **Plain**: one of str/int/float/bool
//! - **Optional-of(T)**: a union with an absent marker and one carried
//!   alternative
//! - **Deferred-wrapped(T)**: a union carrying a future wrapper and a box
//!   wrapper together (the expanded `Input[T]` alias); partial matches are
//!   not deferred
//! - **Wrapped(T)**: a single-parameter box (`Output[T]`), possibly inside
//!   an Optional
//! - **Unrecognized**: everything else
//!
//! Precedence when a shape could structurally match more than one of these:
//! Plain, then Deferred, then Wrapped, then Optional. Deferred must run
//! before the Optional and Wrapped checks because the expanded alias
//! co-occurs with Optional-looking unions. Each shape exposes a predicate
//! and an unwrap so callers can ask "is this shape; if so, give me the
//! carried type" without re-deriving the union structure.

use super::typeexpr::TypeExpr;
use crate::types::PropertyType;

/// A classified property: the carried type plus the top-level optionality
/// flag. Optionality reflects only the outermost Optional wrapper and is
/// tracked orthogonally to deferred/box wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub property_type: PropertyType,
    pub optional: bool,
}

/// A plain type is a bare primitive name, not a wrapper or a union.
pub fn is_plain(expr: &TypeExpr) -> bool {
    matches!(expr, TypeExpr::Name(name) if PropertyType::primitive(name).is_some())
}

/// A union that includes the absent marker is an optional type.
pub fn is_optional(expr: &TypeExpr) -> bool {
    matches!(expr, TypeExpr::Union(items) if items.contains(&TypeExpr::None))
}

/// The single non-absent alternative of an optional type.
///
/// Unions with more than one non-absent alternative are deliberately not
/// unwrapped; richer unions classify as unrecognized rather than guessing
/// at a carried type.
pub fn unwrap_optional(expr: &TypeExpr) -> Option<&TypeExpr> {
    if !is_optional(expr) {
        return None;
    }
    let mut carried = expr
        .alternatives()
        .iter()
        .filter(|alt| **alt != TypeExpr::None);
    match (carried.next(), carried.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// A box wrapper (`Output[T]`), directly or among the non-absent
/// alternatives of an optional union.
pub fn is_wrapped(expr: &TypeExpr) -> bool {
    if is_optional(expr) {
        return expr.alternatives().iter().any(is_wrapped);
    }
    matches!(expr, TypeExpr::Subscript { base, args }
        if super::typeexpr::last_segment(base) == "Output" && args.len() == 1)
}

/// The carried parameter of a box wrapper. When the wrapper sits inside an
/// optional union, the box alternative is located first.
pub fn unwrap_wrapped(expr: &TypeExpr) -> Option<&TypeExpr> {
    if is_optional(expr) {
        return expr
            .alternatives()
            .iter()
            .find(|alt| is_wrapped(alt))
            .and_then(unwrap_wrapped);
    }
    match expr {
        TypeExpr::Subscript { base, args }
            if super::typeexpr::last_segment(base) == "Output" && args.len() == 1 =>
        {
            args.first()
        }
        _ => None,
    }
}

/// A deferred value: a union that simultaneously carries a future wrapper
/// and a box wrapper. Both must be present together; a union with only one
/// of them is not deferred.
pub fn is_deferred(expr: &TypeExpr) -> bool {
    let TypeExpr::Union(items) = expr else {
        return false;
    };
    let has_future = items.iter().any(|alt| future_base(alt).is_some());
    let has_box = items.iter().any(is_wrapped);
    has_future && has_box
}

/// The base type carried by the future wrapper of a deferred union.
pub fn unwrap_deferred(expr: &TypeExpr) -> Option<&TypeExpr> {
    if !is_deferred(expr) {
        return None;
    }
    expr.alternatives().iter().find_map(future_base)
}

fn future_base(expr: &TypeExpr) -> Option<&TypeExpr> {
    match expr {
        TypeExpr::Subscript { base, args }
            if super::typeexpr::last_segment(base) == "Awaitable" && args.len() == 1 =>
        {
            args.first()
        }
        _ => None,
    }
}

/// Classify a declared type into its carried type and optionality.
///
/// Returns `None` for unrecognized shapes; the caller owns attributing the
/// failure to a component and attribute.
pub fn resolve(expr: &TypeExpr) -> Option<Resolved> {
    let optional = is_optional(expr);
    let unwrapped = if is_plain(expr) {
        expr
    } else if is_deferred(expr) {
        unwrap_deferred(expr)?
    } else if is_wrapped(expr) {
        unwrap_wrapped(expr)?
    } else if optional {
        unwrap_optional(expr)?
    } else {
        return None;
    };
    carried_type(unwrapped).map(|property_type| Resolved {
        property_type,
        optional,
    })
}

/// True for shapes that represent externally observable values: deferred
/// unions and box wrappers, including optional-wrapped boxes. Plain and
/// merely-optional attributes are not observable state.
pub fn is_observable(expr: &TypeExpr) -> bool {
    is_deferred(expr) || is_wrapped(expr)
}

fn carried_type(expr: &TypeExpr) -> Option<PropertyType> {
    match expr {
        TypeExpr::Name(name) => Some(
            PropertyType::primitive(name).unwrap_or_else(|| PropertyType::Object(name.clone())),
        ),
        TypeExpr::Subscript { .. } => Some(PropertyType::Object(expr.to_string())),
        _ => None,
    }
}
