//! Syntax tree of translation schemes.
//!
//! The tree owns all of its data, so a parsed scheme can be shared between
//! threads and outlives the source text it was parsed from.
//!

use std::fmt;

use nk_structure::DotBracket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// Template whose structure result carries its `where` bindings as attributes.
    Class,
    Macro,
    Module,
    Function,
}

impl DeclKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Macro => "macro",
            DeclKind::Module => "module",
            DeclKind::Function => "function",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Global(GlobalDecl),
    Function(FunctionDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDecl {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub kind: DeclKind,
    pub name: String,
    pub params: Vec<String>,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Bool(bool),
    Name(String),
    Structure(StructureLiteral),
    List(Vec<Expr>),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Attribute {
        target: Box<Expr>,
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `and` / `or`: the right operand is only evaluated when needed.
    Logical {
        op: LogicalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `if c1 then e1 elseif c2 then e2 ... else e`
    If {
        branches: Vec<(Expr, Expr)>,
        otherwise: Box<Expr>,
    },
    Where {
        body: Box<Expr>,
        bindings: Vec<Binding>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }

    /// The left operand value that decides the result on its own.
    pub fn decisive(&self) -> bool {
        matches!(self, LogicalOp::Or)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub pattern: Pattern,
    pub value: Expr,
}

/// Left-hand side of a `where` binding: a name or a list to destructure.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Name(String),
    List(Vec<Pattern>),
}

/// A dual-row literal `"t x +" | "( ( +"`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureLiteral {
    pub sequence: Vec<SequenceItem>,
    pub structure: Vec<DotBracket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceItem {
    Name {
        name: String,
        complement: bool,
    },
    Wildcard,
    Break,
}
