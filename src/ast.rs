//! Abstract syntax for expressions and statements.
//!
//! Nodes own their children; dropping the root frees the whole tree.

#[derive(Debug, PartialEq)]
pub enum Stmt {
    Print(Box<Expr>),
    Compound(Vec<Stmt>),
    If(Box<Expr>, Box<Stmt>),
    While(Box<Expr>, Box<Stmt>),
    Push(Box<Expr>, Box<Expr>),

    /// Assignment to a variable, or to one element of a sequence when the index expression is
    /// present.
    Assign(String, Option<Box<Expr>>, Box<Expr>),
}

#[derive(Debug, PartialEq)]
pub enum Expr {
    LitInt(i64),
    Var(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Less(Box<Expr>, Box<Expr>),
    Equals(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Index(Box<Expr>, Box<Expr>),
    Len(Box<Expr>),
    SeqInit(Vec<Expr>),
}
