//! Borrowed Node References
//!
//! `Node` is the single currency of the walker: one variant per node kind,
//! each holding a mutable borrow of the node inside the tree. Handlers
//! receive a `Node`, may mutate through it, and may hand it back to the
//! dispatcher to go one level deeper.

use crate::ast::types::*;
use std::fmt;

/// Mutable reference to any node of the tree
#[derive(Debug)]
#[non_exhaustive]
pub enum Node<'a> {
    Script(&'a mut Script),
    Line(&'a mut Line),
    Statement(&'a mut Statement),
    Pipeline(&'a mut Pipeline),
    Command(&'a mut Command),
    Compound(&'a mut Compound),
    Conditional(&'a mut Conditional),
    IfClause(&'a mut IfClause),
    ElseClause(&'a mut ElseClause),
    CaseMatch(&'a mut CaseMatch),
    MatchClause(&'a mut MatchClause),
    Pattern(&'a mut Pattern),
    ForLoop(&'a mut ForLoop),
    ArithmeticHeader(&'a mut ArithmeticHeader),
    WhileLoop(&'a mut WhileLoop),
    SelectMenu(&'a mut SelectMenu),
    FunctionDef(&'a mut FunctionDef),
    Grouping(&'a mut Grouping),
    TestExpr(&'a mut TestExpr),
    Arithmetic(&'a mut Arithmetic),
    Redirection(&'a mut Redirection),
    Heredoc(&'a mut Heredoc),
    CommandSubstitution(&'a mut CommandSubstitution),
    ArrayWord(&'a mut ArrayWord),
    BraceWord(&'a mut BraceWord),
    BraceExpansion(&'a mut BraceExpansion),
    Assignment(&'a mut Assignment),
    ParameterExpansion(&'a mut ParameterExpansion),
    Word(&'a mut Word),
    Literal(&'a mut Literal),
    Token(&'a mut Token),
    Identifier(&'a mut Identifier),
}

/// Variant tag of a `Node`, without the borrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum NodeKind {
    Script,
    Line,
    Statement,
    Pipeline,
    Command,
    Compound,
    Conditional,
    IfClause,
    ElseClause,
    CaseMatch,
    MatchClause,
    Pattern,
    ForLoop,
    ArithmeticHeader,
    WhileLoop,
    SelectMenu,
    FunctionDef,
    Grouping,
    TestExpr,
    Arithmetic,
    Redirection,
    Heredoc,
    CommandSubstitution,
    ArrayWord,
    BraceWord,
    BraceExpansion,
    Assignment,
    ParameterExpansion,
    Word,
    Literal,
    Token,
    Identifier,
}

impl NodeKind {
    pub const ALL: [NodeKind; 32] = [
        NodeKind::Script,
        NodeKind::Line,
        NodeKind::Statement,
        NodeKind::Pipeline,
        NodeKind::Command,
        NodeKind::Compound,
        NodeKind::Conditional,
        NodeKind::IfClause,
        NodeKind::ElseClause,
        NodeKind::CaseMatch,
        NodeKind::MatchClause,
        NodeKind::Pattern,
        NodeKind::ForLoop,
        NodeKind::ArithmeticHeader,
        NodeKind::WhileLoop,
        NodeKind::SelectMenu,
        NodeKind::FunctionDef,
        NodeKind::Grouping,
        NodeKind::TestExpr,
        NodeKind::Arithmetic,
        NodeKind::Redirection,
        NodeKind::Heredoc,
        NodeKind::CommandSubstitution,
        NodeKind::ArrayWord,
        NodeKind::BraceWord,
        NodeKind::BraceExpansion,
        NodeKind::Assignment,
        NodeKind::ParameterExpansion,
        NodeKind::Word,
        NodeKind::Literal,
        NodeKind::Token,
        NodeKind::Identifier,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Script => "script",
            NodeKind::Line => "line",
            NodeKind::Statement => "statement",
            NodeKind::Pipeline => "pipeline",
            NodeKind::Command => "command",
            NodeKind::Compound => "compound",
            NodeKind::Conditional => "conditional",
            NodeKind::IfClause => "if-clause",
            NodeKind::ElseClause => "else-clause",
            NodeKind::CaseMatch => "case",
            NodeKind::MatchClause => "match-clause",
            NodeKind::Pattern => "pattern",
            NodeKind::ForLoop => "for",
            NodeKind::ArithmeticHeader => "arithmetic-header",
            NodeKind::WhileLoop => "while",
            NodeKind::SelectMenu => "select",
            NodeKind::FunctionDef => "function",
            NodeKind::Grouping => "grouping",
            NodeKind::TestExpr => "test",
            NodeKind::Arithmetic => "arithmetic",
            NodeKind::Redirection => "redirection",
            NodeKind::Heredoc => "heredoc",
            NodeKind::CommandSubstitution => "command-substitution",
            NodeKind::ArrayWord => "array",
            NodeKind::BraceWord => "brace-word",
            NodeKind::BraceExpansion => "brace-expansion",
            NodeKind::Assignment => "assignment",
            NodeKind::ParameterExpansion => "parameter-expansion",
            NodeKind::Word => "word",
            NodeKind::Literal => "literal",
            NodeKind::Token => "token",
            NodeKind::Identifier => "identifier",
        }
    }

    /// Kinds the dispatcher never descends into
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::Word
                | NodeKind::Literal
                | NodeKind::TestExpr
                | NodeKind::Token
                | NodeKind::Identifier
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Script(_) => NodeKind::Script,
            Node::Line(_) => NodeKind::Line,
            Node::Statement(_) => NodeKind::Statement,
            Node::Pipeline(_) => NodeKind::Pipeline,
            Node::Command(_) => NodeKind::Command,
            Node::Compound(_) => NodeKind::Compound,
            Node::Conditional(_) => NodeKind::Conditional,
            Node::IfClause(_) => NodeKind::IfClause,
            Node::ElseClause(_) => NodeKind::ElseClause,
            Node::CaseMatch(_) => NodeKind::CaseMatch,
            Node::MatchClause(_) => NodeKind::MatchClause,
            Node::Pattern(_) => NodeKind::Pattern,
            Node::ForLoop(_) => NodeKind::ForLoop,
            Node::ArithmeticHeader(_) => NodeKind::ArithmeticHeader,
            Node::WhileLoop(_) => NodeKind::WhileLoop,
            Node::SelectMenu(_) => NodeKind::SelectMenu,
            Node::FunctionDef(_) => NodeKind::FunctionDef,
            Node::Grouping(_) => NodeKind::Grouping,
            Node::TestExpr(_) => NodeKind::TestExpr,
            Node::Arithmetic(_) => NodeKind::Arithmetic,
            Node::Redirection(_) => NodeKind::Redirection,
            Node::Heredoc(_) => NodeKind::Heredoc,
            Node::CommandSubstitution(_) => NodeKind::CommandSubstitution,
            Node::ArrayWord(_) => NodeKind::ArrayWord,
            Node::BraceWord(_) => NodeKind::BraceWord,
            Node::BraceExpansion(_) => NodeKind::BraceExpansion,
            Node::Assignment(_) => NodeKind::Assignment,
            Node::ParameterExpansion(_) => NodeKind::ParameterExpansion,
            Node::Word(_) => NodeKind::Word,
            Node::Literal(_) => NodeKind::Literal,
            Node::Token(_) => NodeKind::Token,
            Node::Identifier(_) => NodeKind::Identifier,
        }
    }

    /// Shorter-lived copy of this reference, so a handler can inspect or
    /// edit a node and still dispatch it afterwards.
    pub fn reborrow(&mut self) -> Node<'_> {
        match self {
            Node::Script(n) => Node::Script(&mut **n),
            Node::Line(n) => Node::Line(&mut **n),
            Node::Statement(n) => Node::Statement(&mut **n),
            Node::Pipeline(n) => Node::Pipeline(&mut **n),
            Node::Command(n) => Node::Command(&mut **n),
            Node::Compound(n) => Node::Compound(&mut **n),
            Node::Conditional(n) => Node::Conditional(&mut **n),
            Node::IfClause(n) => Node::IfClause(&mut **n),
            Node::ElseClause(n) => Node::ElseClause(&mut **n),
            Node::CaseMatch(n) => Node::CaseMatch(&mut **n),
            Node::MatchClause(n) => Node::MatchClause(&mut **n),
            Node::Pattern(n) => Node::Pattern(&mut **n),
            Node::ForLoop(n) => Node::ForLoop(&mut **n),
            Node::ArithmeticHeader(n) => Node::ArithmeticHeader(&mut **n),
            Node::WhileLoop(n) => Node::WhileLoop(&mut **n),
            Node::SelectMenu(n) => Node::SelectMenu(&mut **n),
            Node::FunctionDef(n) => Node::FunctionDef(&mut **n),
            Node::Grouping(n) => Node::Grouping(&mut **n),
            Node::TestExpr(n) => Node::TestExpr(&mut **n),
            Node::Arithmetic(n) => Node::Arithmetic(&mut **n),
            Node::Redirection(n) => Node::Redirection(&mut **n),
            Node::Heredoc(n) => Node::Heredoc(&mut **n),
            Node::CommandSubstitution(n) => Node::CommandSubstitution(&mut **n),
            Node::ArrayWord(n) => Node::ArrayWord(&mut **n),
            Node::BraceWord(n) => Node::BraceWord(&mut **n),
            Node::BraceExpansion(n) => Node::BraceExpansion(&mut **n),
            Node::Assignment(n) => Node::Assignment(&mut **n),
            Node::ParameterExpansion(n) => Node::ParameterExpansion(&mut **n),
            Node::Word(n) => Node::Word(&mut **n),
            Node::Literal(n) => Node::Literal(&mut **n),
            Node::Token(n) => Node::Token(&mut **n),
            Node::Identifier(n) => Node::Identifier(&mut **n),
        }
    }
}

// Any `&mut` to a node type converts into the matching `Node` variant.
macro_rules! impl_from_ref {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Node<'a> {
                fn from(node: &'a mut $ty) -> Self {
                    Node::$ty(node)
                }
            }
        )*
    };
}

impl_from_ref!(
    Script,
    Line,
    Statement,
    Pipeline,
    Command,
    Compound,
    Conditional,
    IfClause,
    ElseClause,
    CaseMatch,
    MatchClause,
    Pattern,
    ForLoop,
    ArithmeticHeader,
    WhileLoop,
    SelectMenu,
    FunctionDef,
    Grouping,
    TestExpr,
    Arithmetic,
    Redirection,
    Heredoc,
    CommandSubstitution,
    ArrayWord,
    BraceWord,
    BraceExpansion,
    Assignment,
    ParameterExpansion,
    Word,
    Literal,
    Token,
    Identifier,
);

// Sum-typed fields convert to whichever node they currently hold.

impl<'a> From<&'a mut CommandOrCompound> for Node<'a> {
    fn from(node: &'a mut CommandOrCompound) -> Self {
        match node {
            CommandOrCompound::Command(command) => Node::Command(command),
            CommandOrCompound::Compound(compound) => Node::Compound(compound),
        }
    }
}

impl<'a> From<&'a mut Argument> for Node<'a> {
    fn from(node: &'a mut Argument) -> Self {
        match node {
            Argument::Assignment(assignment) => Node::Assignment(assignment),
            Argument::Word(word) => Node::Word(word),
        }
    }
}

impl<'a> From<&'a mut CompoundKind> for Node<'a> {
    fn from(node: &'a mut CompoundKind) -> Self {
        match node {
            CompoundKind::If(n) => Node::Conditional(n),
            CompoundKind::Case(n) => Node::CaseMatch(n),
            CompoundKind::While(n) => Node::WhileLoop(n),
            CompoundKind::For(n) => Node::ForLoop(n),
            CompoundKind::Select(n) => Node::SelectMenu(n),
            CompoundKind::Group(n) => Node::Grouping(n),
            CompoundKind::Test(n) => Node::TestExpr(n),
            CompoundKind::Arithmetic(n) => Node::Arithmetic(n),
            CompoundKind::Function(n) => Node::FunctionDef(n),
        }
    }
}

impl<'a> From<&'a mut AssignValue> for Node<'a> {
    fn from(node: &'a mut AssignValue) -> Self {
        match node {
            AssignValue::Word(word) => Node::Word(word),
            AssignValue::Array(array) => Node::ArrayWord(array),
        }
    }
}

impl<'a> From<&'a mut ArithToken> for Node<'a> {
    fn from(node: &'a mut ArithToken) -> Self {
        match node {
            ArithToken::Word(word) => Node::Word(word),
            ArithToken::Operator(token) => Node::Token(token),
        }
    }
}

impl<'a> From<&'a mut HeredocPart> for Node<'a> {
    fn from(node: &'a mut HeredocPart) -> Self {
        match node {
            HeredocPart::Literal(literal) => Node::Literal(literal),
            HeredocPart::Word(word) => Node::Word(word),
        }
    }
}

impl<'a> From<&'a mut ParamModifier> for Node<'a> {
    fn from(node: &'a mut ParamModifier) -> Self {
        match node {
            ParamModifier::Brace(brace) => Node::BraceWord(brace),
            ParamModifier::String(literal) => Node::Literal(literal),
        }
    }
}

impl<'a> From<&'a mut WordPart> for Node<'a> {
    fn from(node: &'a mut WordPart) -> Self {
        match node {
            WordPart::Literal(n) => Node::Literal(n),
            WordPart::Parameter(n) => Node::ParameterExpansion(n),
            WordPart::CommandSubstitution(n) => Node::CommandSubstitution(n),
            WordPart::Arithmetic(n) => Node::Arithmetic(n),
            WordPart::BraceExpansion(n) => Node::BraceExpansion(n),
        }
    }
}
