use crate::language::{
    span::Span,
    token::{Token, TokenKind},
};
use nom::{
    IResult, Parser as NomParser,
    branch::alt,
    bytes::complete::{is_not, tag, take_till, take_until, take_while, take_while_m_n},
    character::complete::{char, multispace1, one_of, satisfy},
    combinator::{map, map_opt, recognize, value},
    multi::{fold_many0, many0_count},
    sequence::{delimited, pair, preceded},
};

#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

pub fn lex(source: &str) -> Result<Vec<Token>, Vec<LexError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut rest = source;

    loop {
        if let Ok((next, _)) = trivia(rest) {
            rest = next;
        }
        let Some(first) = rest.chars().next() else {
            break;
        };
        let start = offset_of(source, rest);
        let result = match first {
            '"' | '\'' => string_literal(rest),
            ch if is_identifier_start(ch) => word(rest),
            _ => punctuation(rest),
        };

        match result {
            Ok((next, kind)) => {
                tokens.push(Token {
                    kind,
                    span: Span::new(start, offset_of(source, next)),
                });
                rest = next;
            }
            Err(_) if rest.starts_with("/*") => {
                errors.push(LexError {
                    message: "Unterminated block comment".into(),
                    span: Span::new(start, start + 2),
                });
                rest = "";
            }
            Err(err) if matches!(first, '"' | '\'') => {
                let at = failure_input(&err);
                let offset = offset_of(source, at);
                if at.starts_with('\\') {
                    let len: usize = at.chars().take(2).map(|ch| ch.len_utf8()).sum();
                    errors.push(LexError {
                        message: "Invalid escape sequence in string literal".into(),
                        span: Span::new(offset, offset + len),
                    });
                    rest = skip_string_tail(at, first);
                } else {
                    errors.push(LexError {
                        message: "Unterminated string literal".into(),
                        span: Span::new(start, offset),
                    });
                    rest = skip_char(at);
                }
            }
            Err(_) => {
                errors.push(LexError {
                    message: format!("Unexpected character `{first}`"),
                    span: Span::new(start, start + first.len_utf8()),
                });
                rest = skip_char(rest);
            }
        }
    }

    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    });

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

fn offset_of(source: &str, rest: &str) -> usize {
    source.len() - rest.len()
}

fn skip_char(input: &str) -> &str {
    let mut chars = input.chars();
    chars.next();
    chars.as_str()
}

/// Resumes past the closing `quote` of a string with a bad escape, or at the
/// end of its line when it is never closed.
fn skip_string_tail(input: &str, quote: char) -> &str {
    let mut chars = input.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '\n' => return &input[idx..],
            ch if ch == quote => return &input[idx + ch.len_utf8()..],
            _ => {}
        }
    }
    ""
}

fn failure_input<'a>(err: &nom::Err<nom::error::Error<&'a str>>) -> &'a str {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => "",
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

fn trivia(input: &str) -> IResult<&str, usize> {
    many0_count(alt((multispace1, tag("\u{feff}"), line_comment, block_comment))).parse(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_till(|ch: char| ch == '\n'))).parse(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(delimited(tag("/*"), take_until("*/"), tag("*/"))).parse(input)
}

fn word(input: &str) -> IResult<&str, TokenKind> {
    map(
        recognize(pair(
            satisfy(is_identifier_start),
            take_while(is_identifier_continue),
        )),
        |ident: &str| match ident {
            "var" | "let" | "const" => TokenKind::Var,
            "null" => TokenKind::Null,
            _ => TokenKind::Identifier(ident.to_string()),
        },
    )
    .parse(input)
}

fn punctuation(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::LBracket, char('[')),
        value(TokenKind::RBracket, char(']')),
        value(TokenKind::Comma, char(',')),
        value(TokenKind::Semi, char(';')),
        value(TokenKind::Eq, char('=')),
    ))
    .parse(input)
}

enum StringFragment<'a> {
    Literal(&'a str),
    Escaped(char),
}

fn string_literal(input: &str) -> IResult<&str, TokenKind> {
    let (rest, quote) = one_of("\"'")(input)?;
    let (rest, text) = string_body(quote, rest)?;
    let (rest, _) = char(quote)(rest)?;
    Ok((rest, TokenKind::String(text)))
}

fn string_body(quote: char, input: &str) -> IResult<&str, String> {
    let stop = if quote == '"' { "\"\\" } else { "'\\" };
    fold_many0(
        alt((
            map(is_not(stop), StringFragment::Literal),
            map(escape_sequence, StringFragment::Escaped),
        )),
        String::new,
        |mut text, fragment| {
            match fragment {
                StringFragment::Literal(slice) => text.push_str(slice),
                StringFragment::Escaped(ch) => text.push(ch),
            }
            text
        },
    )
    .parse(input)
}

fn escape_sequence(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            preceded(char('u'), unicode_scalar),
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            value('\u{08}', char('b')),
            value('\u{0C}', char('f')),
            value('\\', char('\\')),
            value('/', char('/')),
            value('"', char('"')),
            value('\'', char('\'')),
        )),
    )
    .parse(input)
}

fn unicode_scalar(input: &str) -> IResult<&str, char> {
    map_opt(
        take_while_m_n(4, 4, |ch: char| ch.is_ascii_hexdigit()),
        |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(std::char::from_u32),
    )
    .parse(input)
}
