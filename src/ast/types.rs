//! Abstract Syntax Tree (AST) Types for Shell Scripts
//!
//! This module defines the node model walked by the dispatcher.
//! Node shapes follow the shell grammar: sequences of lines and statements,
//! chained statements and pipelines, compound commands that are exactly one
//! control structure, and word-level leaves.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// SCRIPT & LINES
// =============================================================================

/// Root node and every statement body: a list of lines
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    pub lines: Vec<Line>,
}

/// One source line: statements separated by `;` or `&`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub statements: Vec<Statement>,
}

// =============================================================================
// STATEMENTS & PIPELINES
// =============================================================================

/// A pipeline optionally chained to the next statement: `a && b || c`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub pipeline: Pipeline,
    pub next: Option<Chain>,
}

/// Link from a statement to the one it is chained to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub operator: ChainOperator,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainOperator {
    And,        // &&
    Or,         // ||
    Semi,       // ;
    Background, // &
}

impl fmt::Display for ChainOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
            Self::Semi => write!(f, ";"),
            Self::Background => write!(f, "&"),
        }
    }
}

/// One pipeline stage plus the rest of the pipeline: `a | b | c`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Negate exit status with !
    pub negated: bool,
    pub command: CommandOrCompound,
    pub next: Option<PipeLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeLink {
    /// `|&` pipes stderr too
    pub pipe_stderr: bool,
    pub pipeline: Box<Pipeline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandOrCompound {
    Command(Command),
    Compound(Compound),
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Simple command: `VAR=value name args... >redirections`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Command {
    /// Variable assignments before the command name
    pub assignments: Vec<Assignment>,
    /// Command name followed by its arguments
    pub args: Vec<Argument>,
    pub redirections: Vec<Redirection>,
}

/// Arguments of declaration builtins (`export A=1`) may be assignments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Assignment(Assignment),
    Word(Word),
}

/// Compound command: exactly one control structure plus redirections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    pub kind: CompoundKind,
    pub redirections: Vec<Redirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompoundKind {
    If(Conditional),
    Case(CaseMatch),
    While(WhileLoop),
    For(ForLoop),
    Select(SelectMenu),
    Group(Grouping),
    Test(TestExpr),
    Arithmetic(Arithmetic),
    Function(FunctionDef),
}

// =============================================================================
// CONTROL FLOW
// =============================================================================

/// if / elif / else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub primary: IfClause,
    pub elifs: Vec<IfClause>,
    pub else_clause: Option<ElseClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfClause {
    pub condition: Box<Statement>,
    pub body: Script,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElseClause {
    pub body: Script,
}

/// case WORD in PATTERN) BODY ;; ... esac
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseMatch {
    pub subject: Word,
    pub clauses: Vec<MatchClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchClause {
    pub patterns: Vec<Pattern>,
    pub body: Script,
    pub terminator: CaseTerminator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaseTerminator {
    #[default]
    DoubleSemi,  // ;;
    SemiAnd,     // ;&
    SemiSemiAnd, // ;;&
}

/// One alternative of a case pattern list: `a*|b*` holds two patterns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pattern {
    pub words: Vec<Word>,
}

/// while/until loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileLoop {
    pub until: bool,
    pub condition: Box<Statement>,
    pub body: Script,
}

/// for NAME in WORDS; or for ((init; cond; update));
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForLoop {
    pub variable: Option<Identifier>,
    pub header: ForHeader,
    pub body: Script,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForHeader {
    /// Classic form; an empty list iterates "$@"
    Words(Vec<Word>),
    Arithmetic(ArithmeticHeader),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArithmeticHeader {
    pub init: Option<Arithmetic>,
    pub condition: Option<Arithmetic>,
    pub update: Option<Arithmetic>,
}

/// select NAME in WORDS; do BODY; done
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectMenu {
    pub variable: Identifier,
    pub words: Vec<Word>,
    pub body: Script,
}

/// Command group `{ ...; }` or subshell `( ... )`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grouping {
    pub subshell: bool,
    pub body: Script,
}

// =============================================================================
// FUNCTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: Identifier,
    pub body: Script,
}

// =============================================================================
// ASSIGNMENTS
// =============================================================================

/// Variable assignment: `VAR=value`, `VAR+=value`, `arr[i+1]=value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: Identifier,
    /// Array subscript tokens, empty when there is no subscript
    pub subscript: Vec<ArithToken>,
    /// Append mode: VAR+=value
    pub append: bool,
    pub value: Option<AssignValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignValue {
    Word(Word),
    Array(ArrayWord),
}

/// Array literal: `(a b c)`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayWord {
    pub words: Vec<Word>,
}

// =============================================================================
// REDIRECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redirection {
    /// File descriptor (default depends on operator)
    pub fd: Option<u32>,
    pub operator: RedirectionOperator,
    pub target: Word,
    /// Body of `<<` and `<<-`; the target then holds the delimiter
    pub heredoc: Option<Heredoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectionOperator {
    Less,      // <
    Great,     // >
    DGreat,    // >>
    GreatAnd,  // >&
    LessAnd,   // <&
    LessGreat, // <>
    Clobber,   // >|
    AndGreat,  // &>
    AndDGreat, // &>>
    TLess,     // <<<
    DLess,     // <<
    DLessDash, // <<-
}

impl fmt::Display for RedirectionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Less => write!(f, "<"),
            Self::Great => write!(f, ">"),
            Self::DGreat => write!(f, ">>"),
            Self::GreatAnd => write!(f, ">&"),
            Self::LessAnd => write!(f, "<&"),
            Self::LessGreat => write!(f, "<>"),
            Self::Clobber => write!(f, ">|"),
            Self::AndGreat => write!(f, "&>"),
            Self::AndDGreat => write!(f, "&>>"),
            Self::TLess => write!(f, "<<<"),
            Self::DLess => write!(f, "<<"),
            Self::DLessDash => write!(f, "<<-"),
        }
    }
}

/// Here document body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Heredoc {
    pub parts: Vec<HeredocPart>,
    /// Quoted delimiter means no expansion
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeredocPart {
    Literal(Literal),
    Word(Word),
}

// =============================================================================
// WORDS
// =============================================================================

/// A Word is a sequence of parts that form a single shell word.
///
/// The dispatcher treats a word as a leaf; see `walk::descend_word` for the
/// path into its parts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    /// Short single-line rendering for labels and diagnostics.
    /// Command substitution bodies are elided as `$(...)`.
    pub fn to_plain_string(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            part.write_plain(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WordPart {
    Literal(Literal),
    Parameter(ParameterExpansion),
    CommandSubstitution(CommandSubstitution),
    Arithmetic(Arithmetic),
    BraceExpansion(BraceExpansion),
}

impl WordPart {
    fn write_plain(&self, out: &mut String) {
        match self {
            WordPart::Literal(literal) => match literal.quoting {
                Quoting::Unquoted => out.push_str(&literal.value),
                Quoting::Single => {
                    out.push('\'');
                    out.push_str(&literal.value);
                    out.push('\'');
                }
                Quoting::Double => {
                    out.push('"');
                    out.push_str(&literal.value);
                    out.push('"');
                }
                Quoting::AnsiC => {
                    out.push_str("$'");
                    out.push_str(&literal.value);
                    out.push('\'');
                }
            },
            WordPart::Parameter(param) => {
                if param.operator.is_empty() && param.modifier.is_none() {
                    out.push('$');
                    out.push_str(&param.parameter.name);
                } else {
                    out.push_str("${");
                    out.push_str(&param.parameter.name);
                    out.push_str(&param.operator);
                    match &param.modifier {
                        Some(ParamModifier::Brace(brace)) => {
                            let words: Vec<String> = brace.words.iter().map(Word::to_plain_string).collect();
                            out.push_str(&words.join(" "));
                        }
                        Some(ParamModifier::String(literal)) => out.push_str(&literal.value),
                        None => {}
                    }
                    out.push('}');
                }
            }
            WordPart::CommandSubstitution(sub) => {
                out.push_str(if sub.legacy { "`...`" } else { "$(...)" });
            }
            WordPart::Arithmetic(arith) => {
                out.push_str("$((");
                out.push_str(&arith.to_plain_string());
                out.push_str("))");
            }
            WordPart::BraceExpansion(brace) => {
                let words: Vec<String> = brace.words.iter().map(Word::to_plain_string).collect();
                out.push('{');
                out.push_str(&words.join(","));
                out.push('}');
            }
        }
    }
}

/// Literal text, quoted or not
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub quoting: Quoting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quoting {
    #[default]
    Unquoted,
    Single,
    Double,
    AnsiC,
}

/// A bare name: variable, function or parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Operator or punctuation token kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
}

// =============================================================================
// EXPANSIONS
// =============================================================================

/// `$VAR` or `${VAR<op><modifier>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterExpansion {
    pub parameter: Identifier,
    /// Operator text such as `:-`, `#`, `//`; empty for plain `$VAR`
    pub operator: String,
    pub modifier: Option<ParamModifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamModifier {
    Brace(BraceWord),
    String(Literal),
}

/// Word inside `${...}` after the operator: `${x:-a $b}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BraceWord {
    pub words: Vec<Word>,
}

/// Brace expansion: `{a,b,c}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BraceExpansion {
    pub words: Vec<Word>,
}

/// `$(cmd)` or `` `cmd` ``
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandSubstitution {
    pub command: Script,
    /// Legacy backtick syntax
    pub legacy: bool,
}

/// Arithmetic expansion `$((...))`, command `((...))` or for-header slot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Arithmetic {
    pub tokens: Vec<ArithToken>,
}

impl Arithmetic {
    pub fn to_plain_string(&self) -> String {
        let tokens: Vec<String> = self
            .tokens
            .iter()
            .map(|token| match token {
                ArithToken::Word(word) => word.to_plain_string(),
                ArithToken::Operator(op) => op.text.clone(),
            })
            .collect();
        tokens.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArithToken {
    Word(Word),
    Operator(Token),
}

/// `[ ... ]` or `[[ ... ]]`, kept as raw words
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestExpr {
    /// `[[ ]]` rather than `[ ]`
    pub extended: bool,
    pub words: Vec<Word>,
}

// =============================================================================
// FACTORY FUNCTIONS (AST builders)
// =============================================================================

/// AST factory for building nodes
pub struct AST;

impl AST {
    pub fn script(lines: Vec<Line>) -> Script {
        Script { lines }
    }

    /// Script with one statement per line
    pub fn body(statements: Vec<Statement>) -> Script {
        Script {
            lines: statements
                .into_iter()
                .map(|statement| Line { statements: vec![statement] })
                .collect(),
        }
    }

    pub fn line(statements: Vec<Statement>) -> Line {
        Line { statements }
    }

    pub fn statement(pipeline: Pipeline) -> Statement {
        Statement { pipeline, next: None }
    }

    pub fn chained(pipeline: Pipeline, operator: ChainOperator, next: Statement) -> Statement {
        Statement {
            pipeline,
            next: Some(Chain {
                operator,
                statement: Box::new(next),
            }),
        }
    }

    /// Builds `a | b | c` as nested continuations
    pub fn pipeline(commands: Vec<CommandOrCompound>) -> Pipeline {
        let mut stages = commands.into_iter().rev();
        let mut pipeline = match stages.next() {
            Some(command) => Pipeline { negated: false, command, next: None },
            None => Pipeline {
                negated: false,
                command: CommandOrCompound::Command(Command::default()),
                next: None,
            },
        };
        for command in stages {
            pipeline = Pipeline {
                negated: false,
                command,
                next: Some(PipeLink {
                    pipe_stderr: false,
                    pipeline: Box::new(pipeline),
                }),
            };
        }
        pipeline
    }

    pub fn simple_command(
        assignments: Vec<Assignment>,
        args: Vec<Argument>,
        redirections: Vec<Redirection>,
    ) -> Command {
        Command {
            assignments,
            args,
            redirections,
        }
    }

    /// Statement running one simple command built from plain words
    pub fn command_statement(words: &[&str]) -> Statement {
        let args = words.iter().map(|w| Argument::Word(AST::literal_word(*w))).collect();
        AST::statement(AST::pipeline(vec![CommandOrCompound::Command(
            AST::simple_command(vec![], args, vec![]),
        )]))
    }

    pub fn compound(kind: CompoundKind, redirections: Vec<Redirection>) -> Compound {
        Compound { kind, redirections }
    }

    pub fn word(parts: Vec<WordPart>) -> Word {
        Word { parts }
    }

    pub fn literal(value: impl Into<String>) -> Literal {
        Literal {
            value: value.into(),
            quoting: Quoting::Unquoted,
        }
    }

    pub fn literal_word(value: impl Into<String>) -> Word {
        Word {
            parts: vec![WordPart::Literal(AST::literal(value))],
        }
    }

    pub fn identifier(name: impl Into<String>) -> Identifier {
        Identifier { name: name.into() }
    }

    pub fn token(text: impl Into<String>) -> Token {
        Token { text: text.into() }
    }

    pub fn parameter(name: impl Into<String>) -> ParameterExpansion {
        ParameterExpansion {
            parameter: AST::identifier(name),
            operator: String::new(),
            modifier: None,
        }
    }

    pub fn parameter_with(
        name: impl Into<String>,
        operator: impl Into<String>,
        modifier: ParamModifier,
    ) -> ParameterExpansion {
        ParameterExpansion {
            parameter: AST::identifier(name),
            operator: operator.into(),
            modifier: Some(modifier),
        }
    }

    pub fn assignment(name: impl Into<String>, value: Option<AssignValue>) -> Assignment {
        Assignment {
            name: AST::identifier(name),
            subscript: vec![],
            append: false,
            value,
        }
    }

    pub fn redirection(operator: RedirectionOperator, target: Word, fd: Option<u32>) -> Redirection {
        Redirection {
            fd,
            operator,
            target,
            heredoc: None,
        }
    }

    pub fn here_doc(delimiter: impl Into<String>, parts: Vec<HeredocPart>, strip_tabs: bool) -> Redirection {
        let delimiter = delimiter.into();
        let quoted = delimiter.starts_with('\'') || delimiter.starts_with('"');
        Redirection {
            fd: None,
            operator: if strip_tabs {
                RedirectionOperator::DLessDash
            } else {
                RedirectionOperator::DLess
            },
            target: AST::literal_word(delimiter),
            heredoc: Some(Heredoc { parts, quoted }),
        }
    }

    pub fn if_node(primary: IfClause, elifs: Vec<IfClause>, else_body: Option<Script>) -> Conditional {
        Conditional {
            primary,
            elifs,
            else_clause: else_body.map(|body| ElseClause { body }),
        }
    }

    pub fn if_clause(condition: Statement, body: Script) -> IfClause {
        IfClause {
            condition: Box::new(condition),
            body,
        }
    }

    pub fn for_in(variable: impl Into<String>, words: Vec<Word>, body: Script) -> ForLoop {
        ForLoop {
            variable: Some(AST::identifier(variable)),
            header: ForHeader::Words(words),
            body,
        }
    }

    pub fn for_arithmetic(header: ArithmeticHeader, body: Script) -> ForLoop {
        ForLoop {
            variable: None,
            header: ForHeader::Arithmetic(header),
            body,
        }
    }

    pub fn while_node(condition: Statement, body: Script) -> WhileLoop {
        WhileLoop {
            until: false,
            condition: Box::new(condition),
            body,
        }
    }

    pub fn until_node(condition: Statement, body: Script) -> WhileLoop {
        WhileLoop {
            until: true,
            condition: Box::new(condition),
            body,
        }
    }

    pub fn case_node(subject: Word, clauses: Vec<MatchClause>) -> CaseMatch {
        CaseMatch { subject, clauses }
    }

    pub fn case_item(patterns: Vec<Pattern>, body: Script, terminator: CaseTerminator) -> MatchClause {
        MatchClause {
            patterns,
            body,
            terminator,
        }
    }

    pub fn select(variable: impl Into<String>, words: Vec<Word>, body: Script) -> SelectMenu {
        SelectMenu {
            variable: AST::identifier(variable),
            words,
            body,
        }
    }

    pub fn group(body: Script) -> Grouping {
        Grouping { subshell: false, body }
    }

    pub fn subshell(body: Script) -> Grouping {
        Grouping { subshell: true, body }
    }

    pub fn function_def(name: impl Into<String>, body: Script) -> FunctionDef {
        FunctionDef {
            name: AST::identifier(name),
            body,
        }
    }

    pub fn arithmetic(tokens: Vec<ArithToken>) -> Arithmetic {
        Arithmetic { tokens }
    }

    pub fn command_substitution(command: Script, legacy: bool) -> CommandSubstitution {
        CommandSubstitution { command, legacy }
    }
}
