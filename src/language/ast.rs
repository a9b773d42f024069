use crate::language::span::Span;

/// A parsed navigation script: the top-level `var NAME = ...;` bindings in
/// source order.
#[derive(Clone, Debug)]
pub struct Script {
    pub bindings: Vec<Binding>,
}

impl Script {
    /// Returns the first binding with the given name. Generated scripts never
    /// redeclare a name, so later duplicates are ignored.
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|binding| binding.name == name)
    }
}

#[derive(Clone, Debug)]
pub struct Binding {
    pub name: String,
    pub value: Literal,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralKind {
    Null,
    String(String),
    Array(Vec<Literal>),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            LiteralKind::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Literal]> {
        match &self.kind {
            LiteralKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self.kind {
            LiteralKind::Null => "null",
            LiteralKind::String(_) => "a string",
            LiteralKind::Array(_) => "an array",
        }
    }
}
