//! Abstract Syntax Tree node definitions

use crate::scope::Scope;
use core_types::SourcePosition;
use std::rc::Rc;

/// A parsed program: top-level statements plus the declarations of the
/// top-level scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Statements in source order
    pub body: Vec<Statement>,
    /// Declarations of the top-level scope, including every `var` nested in blocks
    pub scope: Scope,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable declaration (var, let, const)
    VariableDeclaration {
        /// Declaration kind
        kind: VariableKind,
        /// List of declarators
        declarations: Vec<VariableDeclarator>,
        /// Source location
        position: SourcePosition,
    },

    /// Function declaration
    FunctionDeclaration {
        /// The function; always named
        function: Rc<FunctionDefinition>,
        /// Source location
        position: SourcePosition,
    },

    /// Expression statement
    ExpressionStatement {
        /// The expression
        expression: Expression,
        /// Source location
        position: SourcePosition,
    },

    /// Return statement
    ReturnStatement {
        /// Return value
        argument: Option<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// If statement
    IfStatement {
        /// Condition
        test: Expression,
        /// Consequent
        consequent: Box<Statement>,
        /// Alternate
        alternate: Option<Box<Statement>>,
        /// Source location
        position: SourcePosition,
    },

    /// While loop
    WhileStatement {
        /// Loop condition
        test: Expression,
        /// Loop body
        body: Box<Statement>,
        /// Source location
        position: SourcePosition,
    },

    /// Do-while loop
    DoWhileStatement {
        /// Loop body
        body: Box<Statement>,
        /// Loop condition
        test: Expression,
        /// Source location
        position: SourcePosition,
    },

    /// Block statement
    BlockStatement {
        /// Block body
        body: Vec<Statement>,
        /// Declarations made directly in this block
        scope: Scope,
        /// Source location
        position: SourcePosition,
    },

    /// Empty statement
    EmptyStatement {
        /// Source location
        position: SourcePosition,
    },

    /// Break statement (unlabelled)
    BreakStatement {
        /// Source location
        position: SourcePosition,
    },

    /// Continue statement (unlabelled)
    ContinueStatement {
        /// Source location
        position: SourcePosition,
    },

    /// Throw statement
    ThrowStatement {
        /// Value to throw
        argument: Expression,
        /// Source location
        position: SourcePosition,
    },

    /// With statement
    WithStatement {
        /// Object whose properties are consulted first
        object: Expression,
        /// Body
        body: Box<Statement>,
        /// Source location
        position: SourcePosition,
    },

    /// Debugger statement
    DebuggerStatement {
        /// Source location
        position: SourcePosition,
    },
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Identifier reference
    Identifier {
        /// Variable name
        name: String,
        /// Source location
        position: SourcePosition,
    },

    /// Literal value
    Literal {
        /// Literal value
        value: Literal,
        /// Source location
        position: SourcePosition,
    },

    /// Template literal. `quasis` always has one more element than `expressions`.
    TemplateLiteral {
        /// Text chunks
        quasis: Vec<String>,
        /// Substitutions between the chunks
        expressions: Vec<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Parenthesized expression
    ParenthesizedExpression {
        /// The inner expression
        expression: Box<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Binary operation
    BinaryExpression {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: BinaryOperator,
        /// Right operand
        right: Box<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Logical expression (&&, ||)
    LogicalExpression {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: LogicalOperator,
        /// Right operand
        right: Box<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Unary operation
    UnaryExpression {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        argument: Box<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Update expression (++, --)
    UpdateExpression {
        /// Operator
        operator: UpdateOperator,
        /// Operand; an identifier or property access
        argument: Box<Expression>,
        /// Is prefix operator
        prefix: bool,
        /// Source location
        position: SourcePosition,
    },

    /// Assignment; `operator` is set for compound forms such as `+=`
    AssignmentExpression {
        /// Target; an identifier or property access
        target: Box<Expression>,
        /// Binary operator of a compound assignment
        operator: Option<BinaryOperator>,
        /// Right-hand side
        value: Box<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Conditional expression (ternary)
    ConditionalExpression {
        /// Condition
        test: Box<Expression>,
        /// Consequent
        consequent: Box<Expression>,
        /// Alternate
        alternate: Box<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Comma-separated expressions, evaluated left to right
    SequenceExpression {
        /// Expressions
        expressions: Vec<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Function call
    CallExpression {
        /// Function being called
        callee: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
        /// Optional call (`f?.()`)
        optional: bool,
        /// Source location
        position: SourcePosition,
    },

    /// Member access (obj.prop or obj[prop])
    MemberExpression {
        /// Receiver
        object: Box<Expression>,
        /// Property: an `Identifier` for dot access, any expression when computed
        property: Box<Expression>,
        /// Is computed (bracket notation)
        computed: bool,
        /// Optional access (`obj?.prop`)
        optional: bool,
        /// Source location
        position: SourcePosition,
    },

    /// Boundary of an access chain containing at least one `?.`. A nullish
    /// receiver at any optional link makes the whole chain Undefined.
    OptionalChain {
        /// The chain
        expression: Box<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// New expression
    NewExpression {
        /// Constructor
        callee: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// Array literal; `None` elements are holes
    ArrayExpression {
        /// Elements
        elements: Vec<Option<Expression>>,
        /// Source location
        position: SourcePosition,
    },

    /// Object literal
    ObjectExpression {
        /// Properties in source order; later duplicates win
        properties: Vec<ObjectProperty>,
        /// Source location
        position: SourcePosition,
    },

    /// Function expression (also used for object method shorthand)
    FunctionExpression {
        /// The function
        function: Rc<FunctionDefinition>,
        /// Source location
        position: SourcePosition,
    },
}

impl Expression {
    /// Source location of the expression
    pub fn position(&self) -> SourcePosition {
        match self {
            Expression::Identifier { position, .. }
            | Expression::Literal { position, .. }
            | Expression::TemplateLiteral { position, .. }
            | Expression::ParenthesizedExpression { position, .. }
            | Expression::BinaryExpression { position, .. }
            | Expression::LogicalExpression { position, .. }
            | Expression::UnaryExpression { position, .. }
            | Expression::UpdateExpression { position, .. }
            | Expression::AssignmentExpression { position, .. }
            | Expression::ConditionalExpression { position, .. }
            | Expression::SequenceExpression { position, .. }
            | Expression::CallExpression { position, .. }
            | Expression::MemberExpression { position, .. }
            | Expression::OptionalChain { position, .. }
            | Expression::NewExpression { position, .. }
            | Expression::ArrayExpression { position, .. }
            | Expression::ObjectExpression { position, .. }
            | Expression::FunctionExpression { position, .. } => *position,
        }
    }

    /// Strip any number of enclosing parentheses
    pub fn unparenthesized(&self) -> &Expression {
        match self {
            Expression::ParenthesizedExpression { expression, .. } => expression.unparenthesized(),
            other => other,
        }
    }

    /// Whether this expression can be assigned to or updated
    pub fn is_simple_target(&self) -> bool {
        matches!(
            self.unparenthesized(),
            Expression::Identifier { .. }
                | Expression::MemberExpression {
                    optional: false,
                    ..
                }
        )
    }
}

/// Variable declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// var
    Var,
    /// let
    Let,
    /// const
    Const,
}

/// One `name [= init]` entry of a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// Declared name
    pub name: String,
    /// Initializer
    pub init: Option<Expression>,
    /// Source location
    pub position: SourcePosition,
}

/// Function definition shared by declarations, expressions and methods
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    /// Function name
    pub name: Option<String>,
    /// Parameters in order
    pub params: Vec<Parameter>,
    /// Body statements
    pub body: Vec<Statement>,
    /// Declarations of the function scope (parameters are vars)
    pub scope: Scope,
    /// Source text of the whole function
    pub source: String,
    /// Source location
    pub position: SourcePosition,
}

/// Function parameter with optional default
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Default value expression
    pub default: Option<Expression>,
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Number literal
    Number(f64),
    /// String literal
    String(String),
    /// true / false
    Boolean(bool),
    /// null
    Null,
}

/// Object literal entry
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    /// Key
    pub key: PropertyKey,
    /// Value
    pub value: Expression,
    /// Written as `{ key }`
    pub shorthand: bool,
    /// Written as `key(params) { body }`; the function does not bind its own name
    pub method: bool,
}

/// Object literal key
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier or keyword key
    Identifier(String),
    /// String literal key
    String(String),
    /// Number literal key
    Number(f64),
    /// Computed key `[expr]`
    Computed(Box<Expression>),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// +
    Add,
    /// -
    Sub,
    /// *
    Mul,
    /// /
    Div,
    /// %
    Mod,
    /// **
    Exp,
    /// ==
    Eq,
    /// !=
    NotEq,
    /// ===
    StrictEq,
    /// !==
    StrictNotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// &
    BitwiseAnd,
    /// |
    BitwiseOr,
    /// ^
    BitwiseXor,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// >>>
    UnsignedRightShift,
    /// in
    In,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// -
    Minus,
    /// +
    Plus,
    /// !
    Not,
    /// ~
    BitwiseNot,
    /// typeof
    Typeof,
    /// void
    Void,
}

/// Update operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// ++
    Increment,
    /// --
    Decrement,
}

/// Short-circuiting operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// &&
    And,
    /// ||
    Or,
}
