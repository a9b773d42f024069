use crate::language::{
    ast::{Binding, Literal, LiteralKind, Script},
    errors::{SyntaxError, SyntaxErrors},
    lexer::lex,
    span::Span,
    token::{Token, TokenKind},
};

/// Parses a navigation script into its top-level bindings. `max_depth` bounds
/// array nesting so that hostile input cannot exhaust the stack.
pub fn parse_script(source: &str, max_depth: usize) -> Result<Script, SyntaxErrors> {
    let tokens = match lex(source) {
        Ok(tokens) => tokens,
        Err(errors) => {
            let errs = errors
                .into_iter()
                .map(|err| SyntaxError::new(err.message, err.span))
                .collect();
            return Err(SyntaxErrors::new(errs));
        }
    };
    Parser::new(tokens, max_depth).parse()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<SyntaxError>,
    max_depth: usize,
}

impl Parser {
    fn new(mut tokens: Vec<Token>, max_depth: usize) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: Span::new(end, end),
            });
        }
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            max_depth,
        }
    }

    fn parse(mut self) -> Result<Script, SyntaxErrors> {
        let mut bindings = Vec::new();

        while !self.is_eof() {
            if self.matches(&TokenKind::Semi) {
                continue;
            }

            match self.parse_binding() {
                Ok(binding) => bindings.push(binding),
                Err(err) => {
                    self.report(err);
                    self.synchronize();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(Script { bindings })
        } else {
            Err(SyntaxErrors::new(self.errors))
        }
    }

    fn parse_binding(&mut self) -> Result<Binding, SyntaxError> {
        let start = self.expect(&TokenKind::Var, "Expected `var` declaration")?;
        let name = self.expect_identifier("Expected binding name after `var`")?;
        self.expect(&TokenKind::Eq, "Expected `=` after binding name")?;
        let value = self.parse_literal(0)?;
        let end = if self.check(&TokenKind::Semi) {
            self.advance()
        } else {
            value.span
        };
        Ok(Binding {
            name,
            value,
            span: start.cover(end),
        })
    }

    fn parse_literal(&mut self, depth: usize) -> Result<Literal, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Null => {
                self.advance();
                Ok(Literal {
                    kind: LiteralKind::Null,
                    span: token.span,
                })
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(Literal {
                    kind: LiteralKind::String(value),
                    span: token.span,
                })
            }
            TokenKind::LBracket => self.parse_array(depth),
            _ => Err(self.error_here("Expected `null`, a string, or an array")),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Literal, SyntaxError> {
        let open = self.advance();
        if depth >= self.max_depth {
            return Err(SyntaxError::new(
                format!("Array nesting exceeds {} levels", self.max_depth),
                open,
            )
            .with_label("nested too deeply")
            .with_help("raise `max_depth` in navtree.toml if this script is trusted"));
        }

        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            items.push(self.parse_literal(depth + 1)?);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::RBracket, "Expected `,` or `]` in array")?;

        Ok(Literal {
            kind: LiteralKind::Array(items),
            span: open.cover(close),
        })
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<Span, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(message))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<String, SyntaxError> {
        if let TokenKind::Identifier(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here(message))
        }
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Span {
        let span = self.peek().span;
        self.pos = (self.pos + 1).min(self.tokens.len() - 1);
        span
    }

    fn is_eof(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    fn error_here(&self, message: &str) -> SyntaxError {
        let token = self.peek();
        SyntaxError::new(message, token.span).with_label(format!("found {}", token.kind.describe()))
    }

    fn report(&mut self, err: SyntaxError) {
        self.errors.push(err);
    }

    fn synchronize(&mut self) {
        while !self.is_eof() {
            match self.peek().kind {
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                TokenKind::Var => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Script {
        parse_script(source, 64).expect("script should parse")
    }

    fn strings(literal: &Literal) -> Vec<&str> {
        literal
            .as_array()
            .expect("array literal")
            .iter()
            .filter_map(Literal::as_str)
            .collect()
    }

    #[test]
    fn parses_tree_and_index_bindings() {
        let script = parse(
            r#"
var NAVTREE =
[
  [ "A", "a.html", null ],
  [ "B", "b.html", [
    [ "B1", "b1.html", null ]
  ] ]
];

var NAVTREEINDEX =
[
"a.html",
"b1.html"
];
"#,
        );
        assert_eq!(script.bindings.len(), 2);
        let tree = script.binding("NAVTREE").expect("tree binding");
        let roots = tree.value.as_array().expect("roots");
        assert_eq!(roots.len(), 2);
        let second = roots[1].as_array().expect("entry");
        assert_eq!(second[0].as_str(), Some("B"));
        assert_eq!(second[2].as_array().map(<[Literal]>::len), Some(1));

        let index = script.binding("NAVTREEINDEX").expect("index binding");
        assert_eq!(strings(&index.value), vec!["a.html", "b1.html"]);
    }

    #[test]
    fn accepts_trailing_commas_and_missing_semicolons() {
        let script = parse("var A = [ 'x', 'y', ]\nvar B = null");
        assert_eq!(strings(&script.bindings[0].value), vec!["x", "y"]);
        assert_eq!(script.bindings[1].value.kind, LiteralKind::Null);
    }

    #[test]
    fn binding_span_covers_declaration() {
        let source = r#"var SYNCONMSG = 'on';"#;
        let script = parse(source);
        assert_eq!(script.bindings[0].span, Span::new(0, source.len()));
    }

    #[test]
    fn later_duplicate_bindings_are_ignored_by_lookup() {
        let script = parse("var A = 'first'; var A = 'second';");
        let binding = script.binding("A").expect("binding");
        assert_eq!(binding.value.as_str(), Some("first"));
    }

    #[test]
    fn reports_errors_and_recovers_at_next_binding() {
        let errors = parse_script("var A = [ 'x' 'y' ]; var B = ; var C = null;", 64)
            .expect_err("two broken bindings");
        let messages: Vec<_> = errors.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Expected `,` or `]` in array",
                "Expected `null`, a string, or an array",
            ]
        );
        assert_eq!(errors.errors[0].label, "found string");
    }

    #[test]
    fn rejects_statements_other_than_var() {
        let errors = parse_script("NAVTREE = [];", 64).expect_err("missing var");
        assert_eq!(errors.first_message(), Some("Expected `var` declaration"));
    }

    #[test]
    fn lex_errors_surface_as_syntax_errors() {
        let errors = parse_script("var A = [ 1 ];", 64).expect_err("numbers are not allowed");
        assert_eq!(errors.first_message(), Some("Unexpected character `1`"));
    }

    #[test]
    fn enforces_nesting_limit() {
        assert!(parse_script("var A = [[[null]]];", 3).is_ok());
        let errors = parse_script("var A = [[[[null]]]];", 3).expect_err("too deep");
        let err = &errors.errors[0];
        assert_eq!(err.message, "Array nesting exceeds 3 levels");
        assert_eq!(err.span, Span::new(11, 12));
        assert!(err.help.is_some());
    }
}
