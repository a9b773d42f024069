use crate::language::span::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    String(String),

    Var,
    Null,

    LBracket,
    RBracket,
    Comma,
    Semi,
    Eq,

    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::String(_) => "string",
            TokenKind::Var => "`var`",
            TokenKind::Null => "`null`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semi => "`;`",
            TokenKind::Eq => "`=`",
            TokenKind::Eof => "end of file",
        }
    }
}
