use chumsky::input::ValueInput;
use chumsky::pratt::*;
use chumsky::prelude::*;
use nk_structure::DotBracketVec;

use crate::ast::*;
use crate::lexer::ParseError;
use crate::lexer::Span;
use crate::lexer::Token;

type Extra<'src> = extra::Err<ParseError<'src, Token<'src>>>;

/// Postfix operations that bind tighter than any operator.
enum Postfix {
    Call(Vec<Expr>),
    Index(Expr),
    Attribute(String),
}

fn apply_postfix(target: Expr, op: Postfix) -> Expr {
    match op {
        Postfix::Call(args) => Expr::Call { callee: Box::new(target), args },
        Postfix::Index(index) => Expr::Index {
            target: Box::new(target),
            index: Box::new(index),
        },
        Postfix::Attribute(name) => Expr::Attribute { target: Box::new(target), name },
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn logical(op: LogicalOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Logical {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Reads the two rows of a structure literal. Row lengths are compared
/// when the literal is evaluated, not here.
pub fn structure_literal(sequence: &str, structure: &str) -> Result<StructureLiteral, String> {
    let sequence = sequence
        .split_whitespace()
        .map(|item| match item {
            "+" => Ok(SequenceItem::Break),
            "?" => Ok(SequenceItem::Wildcard),
            _ => {
                let (name, complement) = match item.strip_suffix('*') {
                    Some(name) => (name, true),
                    None => (item, false),
                };
                let valid = name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if valid {
                    Ok(SequenceItem::Name { name: name.to_string(), complement })
                } else {
                    Err(format!("invalid sequence item '{item}'"))
                }
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    let structure = DotBracketVec::try_from(structure).map_err(|err| err.to_string())?;
    Ok(StructureLiteral { sequence, structure: structure.0 })
}

pub fn expression<'src, I>() -> impl Parser<'src, I, Expr, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    recursive(|expression| {
        let comma = just(Token::Comma);
        let paren_open = just(Token::ParenOpen);
        let paren_close = just(Token::ParenClose);
        let bracket_open = just(Token::BracketOpen);
        let bracket_close = just(Token::BracketClose);

        let ident = select! { Token::Ident(name) => name.to_string() };
        let string = select! { Token::Str(s) => s };

        let literal = select! {
            Token::Int(n) => Expr::Int(n),
            Token::True => Expr::Bool(true),
            Token::False => Expr::Bool(false),
        };

        let structure = string
            .then_ignore(just(Token::Pipe))
            .then(string)
            .try_map(|(sequence, structure), span| {
                structure_literal(sequence, structure)
                    .map(Expr::Structure)
                    .map_err(|msg| ParseError::custom(span, msg))
            });

        let list = expression
            .clone()
            .separated_by(comma)
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(bracket_open, bracket_close)
            .map(Expr::List);

        let parenthesized = expression.clone().delimited_by(paren_open, paren_close);

        let atom = choice((
            literal,
            structure,
            list,
            parenthesized,
            ident.map(Expr::Name),
        ))
        .boxed();

        let postfix = choice((
            expression
                .clone()
                .separated_by(comma)
                .collect::<Vec<_>>()
                .delimited_by(paren_open, paren_close)
                .map(Postfix::Call),
            expression
                .clone()
                .delimited_by(bracket_open, bracket_close)
                .map(Postfix::Index),
            just(Token::Dot).ignore_then(ident).map(Postfix::Attribute),
        ));

        let postfixed = atom
            .then(postfix.repeated().collect::<Vec<_>>())
            .map(|(atom, ops)| ops.into_iter().fold(atom, apply_postfix));

        let prefix = choice((
            just(Token::Not).to(UnaryOp::Not),
            just(Token::Minus).to(UnaryOp::Neg),
        ));

        let unary = prefix
            .repeated()
            .collect::<Vec<_>>()
            .then(postfixed)
            .map(|(ops, operand)| {
                ops.into_iter().rev().fold(operand, |operand, op| Expr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            });

        let operation = unary
            .pratt((
                infix(left(1), just(Token::Or), |l, _, r, _| logical(LogicalOp::Or, l, r)),
                infix(left(2), just(Token::And), |l, _, r, _| logical(LogicalOp::And, l, r)),
                infix(left(3), just(Token::Equal), |l, _, r, _| binary(BinaryOp::Eq, l, r)),
                infix(left(3), just(Token::NotEqual), |l, _, r, _| binary(BinaryOp::Ne, l, r)),
                infix(left(3), just(Token::Less), |l, _, r, _| binary(BinaryOp::Lt, l, r)),
                infix(left(3), just(Token::LessOrEqual), |l, _, r, _| binary(BinaryOp::Le, l, r)),
                infix(left(3), just(Token::Greater), |l, _, r, _| binary(BinaryOp::Gt, l, r)),
                infix(left(3), just(Token::GreaterOrEqual), |l, _, r, _| {
                    binary(BinaryOp::Ge, l, r)
                }),
                infix(left(5), just(Token::Plus), |l, _, r, _| binary(BinaryOp::Add, l, r)),
                infix(left(5), just(Token::Minus), |l, _, r, _| binary(BinaryOp::Sub, l, r)),
                infix(left(7), just(Token::Asterisk), |l, _, r, _| binary(BinaryOp::Mul, l, r)),
            ))
            .boxed();

        let conditional = just(Token::If)
            .ignore_then(expression.clone())
            .then_ignore(just(Token::Then))
            .then(expression.clone())
            .then(
                just(Token::Elseif)
                    .ignore_then(expression.clone())
                    .then_ignore(just(Token::Then))
                    .then(expression.clone())
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .then_ignore(just(Token::Else))
            .then(expression.clone())
            .map(|(((condition, then), elseifs), otherwise)| {
                let mut branches = vec![(condition, then)];
                branches.extend(elseifs);
                Expr::If { branches, otherwise: Box::new(otherwise) }
            });

        let pattern = recursive(|pattern| {
            choice((
                ident.map(Pattern::Name),
                pattern
                    .separated_by(comma)
                    .collect::<Vec<_>>()
                    .delimited_by(bracket_open, bracket_close)
                    .map(Pattern::List),
            ))
        });

        let binding = pattern
            .then_ignore(just(Token::Assign))
            .then(expression.clone())
            .map(|(pattern, value)| Binding { pattern, value });

        let bindings = choice((
            binding
                .clone()
                .separated_by(just(Token::Semicolon))
                .allow_trailing()
                .collect::<Vec<_>>()
                .delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
            binding.map(|binding| vec![binding]),
        ));

        choice((conditional, operation))
            .then(just(Token::Where).ignore_then(bindings).or_not())
            .map(|(body, bindings)| match bindings {
                Some(bindings) => Expr::Where { body: Box::new(body), bindings },
                None => body,
            })
    })
}

/// Parses a whole scheme: declarations separated by `;`.
pub fn parser<'src, I>() -> impl Parser<'src, I, Vec<Declaration>, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    let expr = expression();
    let ident = select! { Token::Ident(name) => name.to_string() };

    let kind = select! {
        Token::Class => DeclKind::Class,
        Token::Macro => DeclKind::Macro,
        Token::Module => DeclKind::Module,
        Token::Function => DeclKind::Function,
    };

    let params = ident
        .separated_by(just(Token::Comma))
        .collect::<Vec<_>>()
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    let function = kind
        .then(ident)
        .then(params)
        .then_ignore(just(Token::Assign))
        .then(expr.clone())
        .map(|(((kind, name), params), body)| {
            Declaration::Function(FunctionDecl { kind, name, params, body })
        });

    let global = just(Token::Global)
        .ignore_then(ident)
        .then_ignore(just(Token::Assign))
        .then(expr)
        .map(|(name, value)| Declaration::Global(GlobalDecl { name, value }));

    choice((global, function))
        .separated_by(just(Token::Semicolon))
        .allow_trailing()
        .collect()
}
