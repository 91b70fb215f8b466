//! Syntax tree for XPath 1.0 expressions.

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(String),
    Number(f64),
    Variable(String),
    Call {
        name: String,
        args: Vec<Expression>,
    },
    Binary(Box<Expression>, BinaryOperator, Box<Expression>),
    /// Unary minus.
    Negate(Box<Expression>),
    /// A primary expression narrowed by predicates, as in `(//add)[1]`.
    Filter {
        base: Box<Expression>,
        predicates: Vec<Expression>,
    },
    Path(PathExpr),
}

impl Expression {
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary(Box::new(left), op, Box::new(right))
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Expression::Path(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Union,
}

/// Where a path starts evaluating.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOrigin {
    /// The context node (`add/@key`).
    Context,
    /// The document node (`/configuration`).
    Root,
    /// The node-set produced by another expression (`(//a)[1]/b`).
    Expr(Box<Expression>),
}

/// A location path such as `/configuration/appSettings/add[@key='x']`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub origin: PathOrigin,
    pub steps: Vec<Step>,
}

impl PathExpr {
    pub fn new(origin: PathOrigin, steps: Vec<Step>) -> Self {
        PathExpr { origin, steps }
    }

    /// Appends the steps that follow a `/` or `//` separator.
    pub fn push(&mut self, separator: &str, step: Step) {
        if separator == "//" {
            self.steps.push(Step::descendant_or_self_node());
        }
        self.steps.push(step);
    }
}

/// One step of a location path, like `child::add[@key='x']`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Expression>,
}

impl Step {
    pub fn new(axis: Axis, test: NodeTest) -> Self {
        Step {
            axis,
            test,
            predicates: Vec::new(),
        }
    }

    /// The implicit step that `//` expands to.
    pub fn descendant_or_self_node() -> Self {
        Step::new(Axis::DescendantOrSelf, NodeTest::AnyNode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Attribute,
    Parent,
    Ancestor,
    AncestorOrSelf,
    SelfAxis,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
}

impl Axis {
    pub const NAMES: [(&'static str, Axis); 12] = [
        ("ancestor-or-self", Axis::AncestorOrSelf),
        ("ancestor", Axis::Ancestor),
        ("attribute", Axis::Attribute),
        ("child", Axis::Child),
        ("descendant-or-self", Axis::DescendantOrSelf),
        ("descendant", Axis::Descendant),
        ("following-sibling", Axis::FollowingSibling),
        ("following", Axis::Following),
        ("parent", Axis::Parent),
        ("preceding-sibling", Axis::PrecedingSibling),
        ("preceding", Axis::Preceding),
        ("self", Axis::SelfAxis),
    ];

    /// Reverse axes number their nodes from the context node outwards.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Parent
                | Axis::Ancestor
                | Axis::AncestorOrSelf
                | Axis::PrecedingSibling
                | Axis::Preceding
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// A name as written in the expression, prefix included (e.g. `add`, `x:ext`).
    Name(String),
    /// `*`
    AnyName,
    /// `prefix:*`
    AnyLocalName(String),
    /// `text()`
    Text,
    /// `comment()`
    Comment,
    /// `processing-instruction()`, optionally naming the target.
    ProcessingInstruction(Option<String>),
    /// `node()`
    AnyNode,
}
