use std::fmt;

use chumsky::prelude::*;

pub type Span = SimpleSpan;
pub type ParseError<'src, T> = Rich<'src, T, Span>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<'src> {
    Global,
    Class,
    Macro,
    Module,
    Function,
    If,
    Then,
    Elseif,
    Else,
    Where,
    And,
    Or,
    Not,
    True,
    False,
    Ident(&'src str),
    Int(i64),
    Str(&'src str),
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    BraceOpen,
    BraceClose,
    Comma,
    Semicolon,
    Dot,
    Assign,
    Equal,
    NotEqual,
    LessOrEqual,
    Less,
    GreaterOrEqual,
    Greater,
    Plus,
    Minus,
    Asterisk,
    Pipe,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::Global => "global",
            Token::Class => "class",
            Token::Macro => "macro",
            Token::Module => "module",
            Token::Function => "function",
            Token::If => "if",
            Token::Then => "then",
            Token::Elseif => "elseif",
            Token::Else => "else",
            Token::Where => "where",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::True => "true",
            Token::False => "false",
            Token::Ident(name) => name,
            Token::Int(n) => return write!(f, "{n}"),
            Token::Str(s) => return write!(f, "\"{s}\""),
            Token::ParenOpen => "(",
            Token::ParenClose => ")",
            Token::BracketOpen => "[",
            Token::BracketClose => "]",
            Token::BraceOpen => "{",
            Token::BraceClose => "}",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Dot => ".",
            Token::Assign => "=",
            Token::Equal => "==",
            Token::NotEqual => "!=",
            Token::LessOrEqual => "<=",
            Token::Less => "<",
            Token::GreaterOrEqual => ">=",
            Token::Greater => ">",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Asterisk => "*",
            Token::Pipe => "|",
        };
        write!(f, "{s}")
    }
}

/// Splits scheme source into tokens. `#` starts a comment that runs to the
/// end of the line.
pub fn lexer<'src>()
-> impl Parser<'src, &'src str, Vec<(Token<'src>, Span)>, extra::Err<ParseError<'src, char>>> {
    let bracket = choice((
        just('(').to(Token::ParenOpen),
        just(')').to(Token::ParenClose),
        just('[').to(Token::BracketOpen),
        just(']').to(Token::BracketClose),
        just('{').to(Token::BraceOpen),
        just('}').to(Token::BraceClose),
    ));

    let operator = choice((
        just("==").to(Token::Equal),
        just("!=").to(Token::NotEqual),
        just("<=").to(Token::LessOrEqual),
        just('<').to(Token::Less),
        just(">=").to(Token::GreaterOrEqual),
        just('>').to(Token::Greater),
        just('=').to(Token::Assign),
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Asterisk),
        just('|').to(Token::Pipe),
    ));

    let punctuation = choice((
        just(',').to(Token::Comma),
        just(';').to(Token::Semicolon),
        just('.').to(Token::Dot),
    ));

    let int = text::int(10).try_map(|digits: &str, span| {
        digits
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|err| ParseError::custom(span, format!("invalid integer '{digits}': {err}")))
    });

    let string = just('"')
        .ignore_then(none_of('"').repeated().to_slice())
        .then_ignore(just('"'))
        .map(Token::Str);

    let word = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
        .map(|word: &str| match word {
            "global" => Token::Global,
            "class" => Token::Class,
            "macro" => Token::Macro,
            "module" => Token::Module,
            "function" => Token::Function,
            "if" => Token::If,
            "then" => Token::Then,
            "elseif" => Token::Elseif,
            "else" => Token::Else,
            "where" => Token::Where,
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "true" => Token::True,
            "false" => Token::False,
            ident => Token::Ident(ident),
        });

    let comment = just('#').then(none_of('\n').repeated()).ignored();
    let padding = comment.padded().repeated().padded();

    let token = choice((bracket, operator, punctuation, int, string, word));

    padding.clone().ignore_then(
        token
            .map_with(|token, extra| (token, extra.span()))
            .then_ignore(padding)
            .repeated()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        lexer()
            .parse(src)
            .into_result()
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(tokens("class formal(s) = elseif else_branch"), vec![
            Token::Class,
            Token::Ident("formal"),
            Token::ParenOpen,
            Token::Ident("s"),
            Token::ParenClose,
            Token::Assign,
            Token::Elseif,
            Token::Ident("else_branch"),
        ]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(tokens("a==b != c<=d<e >= f>g = -1*2"), vec![
            Token::Ident("a"),
            Token::Equal,
            Token::Ident("b"),
            Token::NotEqual,
            Token::Ident("c"),
            Token::LessOrEqual,
            Token::Ident("d"),
            Token::Less,
            Token::Ident("e"),
            Token::GreaterOrEqual,
            Token::Ident("f"),
            Token::Greater,
            Token::Ident("g"),
            Token::Assign,
            Token::Minus,
            Token::Int(1),
            Token::Asterisk,
            Token::Int(2),
        ]);
    }

    #[test]
    fn test_structure_literal_and_comments() {
        let src = "# leading comment\n  \"t x*\" | \". (\" # trailing\n# another\n;";
        assert_eq!(tokens(src), vec![
            Token::Str("t x*"),
            Token::Pipe,
            Token::Str(". ("),
            Token::Semicolon,
        ]);
    }

    #[test]
    fn test_spans() {
        let toks = lexer().parse("r [0]").into_result().unwrap();
        assert_eq!(toks[0].1.into_range(), 0..1);
        assert_eq!(toks[1].1.into_range(), 2..3);
        assert_eq!(toks[2].1.into_range(), 3..4);
    }

    #[test]
    fn test_only_comments() {
        assert!(tokens("# nothing here\n   # at all").is_empty());
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_unterminated_string() {
        assert!(lexer().parse("\"t x").has_errors());
        assert!(lexer().parse("a @ b").has_errors());
    }
}
