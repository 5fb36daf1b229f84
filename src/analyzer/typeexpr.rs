//! Declared Type Expressions
//!
//! A small tagged representation of the type annotations found in
//! definition files, parsed once from the annotation text. Classification
//! (see [`super::classify`]) dispatches over this variant instead of
//! re-deriving structure at every predicate.
//!
//! Loading a definition file materializes annotations the way the consuming
//! runtime would: the `Input[T]` alias expands into the union
//! `T | Awaitable[T] | Output[T]`, and nested unions flatten, so an
//! `Optional[Input[str]]` arrives at the classifier as one union carrying
//! the future wrapper, the box wrapper, the bare base type, and the absent
//! marker together.

use std::fmt;

/// A declared type expression in canonical (expanded, flattened) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare or dotted name, e.g. `str` or `pulumi.Output`
    Name(String),
    /// A parameterized name, e.g. `Output[str]`
    Subscript { base: String, args: Vec<TypeExpr> },
    /// A flattened union of alternatives
    Union(Vec<TypeExpr>),
    /// The explicit absent marker (`None`)
    None,
    /// Annotation text the grammar does not cover; always classifies as
    /// unrecognized, carrying the original text for diagnostics
    Opaque(String),
}

impl TypeExpr {
    /// Parse an annotation string into a raw expression.
    ///
    /// Unparseable text degrades to [`TypeExpr::Opaque`] rather than
    /// failing the whole module load; the error surfaces later, attributed
    /// to the specific attribute that declared it.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let mut cursor = Cursor::new(trimmed);
        match cursor.parse_union() {
            Some(expr) if cursor.at_end() => expr,
            _ => Self::Opaque(trimmed.to_string()),
        }
    }

    /// Parse and expand an annotation in one step.
    pub fn parse_expanded(text: &str) -> Self {
        Self::parse(text).expand()
    }

    /// Expand known aliases and flatten unions, mirroring the unwrapping
    /// the consuming runtime applies to these annotations.
    pub fn expand(self) -> Self {
        match self {
            Self::Union(items) => flatten_union(items.into_iter().map(Self::expand)),
            Self::Subscript { base, mut args } => {
                let head = last_segment(&base).to_string();
                match (head.as_str(), args.len()) {
                    ("Optional", 1) => {
                        let inner = args.remove(0).expand();
                        flatten_union([inner, Self::None])
                    }
                    ("Union", _) => flatten_union(args.into_iter().map(Self::expand)),
                    ("Input", 1) => {
                        let inner = args.remove(0).expand();
                        flatten_union([
                            inner.clone(),
                            Self::Subscript {
                                base: "Awaitable".to_string(),
                                args: vec![inner.clone()],
                            },
                            Self::Subscript {
                                base: "Output".to_string(),
                                args: vec![inner],
                            },
                        ])
                    }
                    _ => Self::Subscript {
                        base,
                        args: args.into_iter().map(Self::expand).collect(),
                    },
                }
            }
            other => other,
        }
    }

    /// The alternatives of a union, or a single-element view of `self`.
    pub fn alternatives(&self) -> &[Self] {
        match self {
            Self::Union(items) => items,
            _ => std::slice::from_ref(self),
        }
    }

    /// The last dotted segment of this expression's head name, if any.
    pub fn head(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(last_segment(name)),
            Self::Subscript { base, .. } => Some(last_segment(base)),
            _ => Option::None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name),
            Self::Subscript { base, args } => {
                write!(f, "{}[", base)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "]")
            }
            Self::Union(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Self::None => write!(f, "None"),
            Self::Opaque(text) => write!(f, "{}", text),
        }
    }
}

/// Last dotted segment of a name (`pulumi.Output` -> `Output`).
pub fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Splice nested unions and drop duplicate alternatives, preserving first
/// occurrence order.
fn flatten_union(items: impl IntoIterator<Item = TypeExpr>) -> TypeExpr {
    let mut flat: Vec<TypeExpr> = Vec::new();
    for item in items {
        match item {
            TypeExpr::Union(inner) => {
                for alt in inner {
                    if !flat.contains(&alt) {
                        flat.push(alt);
                    }
                }
            }
            other => {
                if !flat.contains(&other) {
                    flat.push(other);
                }
            }
        }
    }
    if flat.len() == 1 {
        flat.remove(0)
    } else {
        TypeExpr::Union(flat)
    }
}

// =============================================================================
// Annotation text parser
// =============================================================================

struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.skip_ws();
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `primary ('|' primary)*`
    fn parse_union(&mut self) -> Option<TypeExpr> {
        let first = self.parse_primary()?;
        let mut items = vec![first];
        while self.eat(b'|') {
            items.push(self.parse_primary()?);
        }
        if items.len() == 1 {
            items.pop()
        } else {
            Some(TypeExpr::Union(items))
        }
    }

    /// A dotted name with optional subscript, or a quoted forward
    /// reference.
    fn parse_primary(&mut self) -> Option<TypeExpr> {
        self.skip_ws();
        match self.peek()? {
            quote @ (b'"' | b'\'') => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek() != Some(quote) {
                    return Option::None;
                }
                let inner = std::str::from_utf8(&self.src[start..self.pos]).ok()?;
                self.pos += 1;
                // forward references hold a complete annotation
                let mut nested = Cursor::new(inner);
                let expr = nested.parse_union()?;
                nested.at_end().then_some(expr)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let name = self.parse_dotted_name()?;
                if name == "None" {
                    return Some(TypeExpr::None);
                }
                if self.eat(b'[') {
                    let mut args = vec![self.parse_union()?];
                    while self.eat(b',') {
                        args.push(self.parse_union()?);
                    }
                    if !self.eat(b']') {
                        return Option::None;
                    }
                    Some(TypeExpr::Subscript { base: name, args })
                } else {
                    Some(TypeExpr::Name(name))
                }
            }
            _ => Option::None,
        }
    }

    fn parse_dotted_name(&mut self) -> Option<String> {
        let start = self.pos;
        loop {
            let seg_start = self.pos;
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
            {
                self.pos += 1;
            }
            if self.pos == seg_start {
                return Option::None;
            }
            if self.peek() == Some(b'.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .ok()
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_name() {
        assert_eq!(TypeExpr::parse("str"), TypeExpr::Name("str".to_string()));
        assert_eq!(TypeExpr::parse("None"), TypeExpr::None);
    }

    #[test]
    fn test_parse_dotted_subscript() {
        assert_eq!(
            TypeExpr::parse("pulumi.Output[str]"),
            TypeExpr::Subscript {
                base: "pulumi.Output".to_string(),
                args: vec![TypeExpr::Name("str".to_string())],
            }
        );
    }

    #[test]
    fn test_parse_pipe_union() {
        assert_eq!(
            TypeExpr::parse("str | None"),
            TypeExpr::Union(vec![TypeExpr::Name("str".to_string()), TypeExpr::None])
        );
    }

    #[test]
    fn test_parse_forward_reference() {
        assert_eq!(
            TypeExpr::parse("\"Output[str]\""),
            TypeExpr::Subscript {
                base: "Output".to_string(),
                args: vec![TypeExpr::Name("str".to_string())],
            }
        );
    }

    #[test]
    fn test_unparseable_falls_back_to_opaque() {
        assert_eq!(
            TypeExpr::parse("Callable[[int], str]"),
            TypeExpr::Opaque("Callable[[int], str]".to_string())
        );
    }

    #[test]
    fn test_expand_optional_flattens() {
        let expr = TypeExpr::parse_expanded("Optional[str]");
        assert_eq!(
            expr,
            TypeExpr::Union(vec![TypeExpr::Name("str".to_string()), TypeExpr::None])
        );
    }

    #[test]
    fn test_expand_input_alias() {
        let expr = TypeExpr::parse_expanded("pulumi.Input[str]");
        let TypeExpr::Union(items) = expr else {
            panic!("expected a union");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], TypeExpr::Name("str".to_string()));
        assert_eq!(items[1].head(), Some("Awaitable"));
        assert_eq!(items[2].head(), Some("Output"));
    }

    #[test]
    fn test_expand_optional_input_is_one_flat_union() {
        let expr = TypeExpr::parse_expanded("Optional[pulumi.Input[str]]");
        let TypeExpr::Union(items) = expr else {
            panic!("expected a union");
        };
        // bare base, future wrapper, box wrapper, absent marker
        assert_eq!(items.len(), 4);
        assert_eq!(items[3], TypeExpr::None);
    }

    #[test]
    fn test_expand_dedupes_alternatives() {
        let expr = TypeExpr::parse_expanded("Union[str, str, None, None]");
        assert_eq!(
            expr,
            TypeExpr::Union(vec![TypeExpr::Name("str".to_string()), TypeExpr::None])
        );
    }

    #[test]
    fn test_display_round_trips_shape() {
        let expr = TypeExpr::parse("Optional[pulumi.Input[str]]");
        assert_eq!(expr.to_string(), "Optional[pulumi.Input[str]]");
    }

    #[test]
    fn test_trailing_junk_is_opaque() {
        assert_eq!(
            TypeExpr::parse("str]"),
            TypeExpr::Opaque("str]".to_string())
        );
    }
}
