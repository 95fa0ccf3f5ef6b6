//! One-Level Dispatch
//!
//! `dispatch` maps a node to the routine for its grammar production. Each
//! routine hands the node's immediate children to the handler, in grammar
//! order, and stops at the first error. Nothing here recurses: going deeper
//! is the handler's decision.
//!
//! Child order per production:
//!   script/body   ::= line*
//!   line          ::= statement*
//!   statement     ::= pipeline [statement]
//!   pipeline      ::= (command | compound) [pipeline]
//!   command       ::= assignment* (assignment | word)* redirection*
//!   compound      ::= <one alternative> redirection*
//!   conditional   ::= if-clause if-clause* [else-clause]
//!   if-clause     ::= statement script
//!   case          ::= word match-clause*
//!   match-clause  ::= pattern* script
//!   for           ::= (word* | arithmetic-header) script
//!   while         ::= statement script
//!   select        ::= word* script
//!   redirection   ::= word [heredoc]
//!   assignment    ::= identifier (word | token)* [word | array]
//!   parameter     ::= identifier [brace-word | literal]

use crate::ast::node::Node;
use crate::ast::types::*;
use crate::walk::handler::Handler;
use log::{debug, trace};

/// Hands each immediate child of `node` to `handler`, in grammar order.
///
/// Accepts a `Node` or a `&mut` to any node type. Leaf kinds have no
/// children and return `Ok(())` without calling the handler. The first
/// handler error aborts the enumeration and is returned unchanged; edits the
/// handler already made stay in place.
pub fn dispatch<'n, H>(node: impl Into<Node<'n>>, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    let node = node.into();
    let kind = node.kind();
    trace!("dispatch {}", kind);

    let result = match node {
        Node::Script(n) => script(n, handler),
        Node::Line(n) => line(n, handler),
        Node::Statement(n) => statement(n, handler),
        Node::Pipeline(n) => pipeline(n, handler),
        Node::Command(n) => command(n, handler),
        Node::Compound(n) => compound(n, handler),
        Node::Conditional(n) => conditional(n, handler),
        Node::IfClause(n) => if_clause(n, handler),
        Node::ElseClause(n) => script(&mut n.body, handler),
        Node::CaseMatch(n) => case_match(n, handler),
        Node::MatchClause(n) => match_clause(n, handler),
        Node::Pattern(n) => each(&mut n.words, handler),
        Node::ForLoop(n) => for_loop(n, handler),
        Node::ArithmeticHeader(n) => arithmetic_header(n, handler),
        Node::WhileLoop(n) => while_loop(n, handler),
        Node::SelectMenu(n) => select_menu(n, handler),
        Node::FunctionDef(n) => script(&mut n.body, handler),
        Node::Grouping(n) => script(&mut n.body, handler),
        Node::Arithmetic(n) => each(&mut n.tokens, handler),
        Node::Redirection(n) => redirection(n, handler),
        Node::Heredoc(n) => each(&mut n.parts, handler),
        Node::CommandSubstitution(n) => script(&mut n.command, handler),
        Node::ArrayWord(n) => each(&mut n.words, handler),
        Node::BraceWord(n) => each(&mut n.words, handler),
        Node::BraceExpansion(n) => each(&mut n.words, handler),
        Node::Assignment(n) => assignment(n, handler),
        Node::ParameterExpansion(n) => parameter_expansion(n, handler),
        Node::Word(_)
        | Node::Literal(_)
        | Node::TestExpr(_)
        | Node::Token(_)
        | Node::Identifier(_) => Ok(()),
    };

    if result.is_err() {
        debug!("handler aborted {} enumeration", kind);
    }
    result
}

/// Offers every element of a sequence, in order.
fn each<'a, T, H>(items: &'a mut [T], handler: &mut H) -> Result<(), H::Error>
where
    &'a mut T: Into<Node<'a>>,
    H: Handler + ?Sized,
{
    for item in items {
        handler.handle(item.into())?;
    }
    Ok(())
}

// Bodies of if/else, loops, functions, groups and command substitutions are
// scripts too, so they share this routine.
fn script<H>(node: &mut Script, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    each(&mut node.lines, handler)
}

fn line<H>(node: &mut Line, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    each(&mut node.statements, handler)
}

fn statement<H>(node: &mut Statement, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::Pipeline(&mut node.pipeline))?;
    if let Some(chain) = &mut node.next {
        handler.handle(Node::Statement(chain.statement.as_mut()))?;
    }
    Ok(())
}

fn pipeline<H>(node: &mut Pipeline, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::from(&mut node.command))?;
    if let Some(link) = &mut node.next {
        handler.handle(Node::Pipeline(link.pipeline.as_mut()))?;
    }
    Ok(())
}

fn command<H>(node: &mut Command, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    each(&mut node.assignments, handler)?;
    each(&mut node.args, handler)?;
    each(&mut node.redirections, handler)
}

fn compound<H>(node: &mut Compound, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::from(&mut node.kind))?;
    each(&mut node.redirections, handler)
}

fn conditional<H>(node: &mut Conditional, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::IfClause(&mut node.primary))?;
    each(&mut node.elifs, handler)?;
    if let Some(else_clause) = &mut node.else_clause {
        handler.handle(Node::ElseClause(else_clause))?;
    }
    Ok(())
}

fn if_clause<H>(node: &mut IfClause, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::Statement(node.condition.as_mut()))?;
    handler.handle(Node::Script(&mut node.body))
}

fn case_match<H>(node: &mut CaseMatch, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::Word(&mut node.subject))?;
    each(&mut node.clauses, handler)
}

fn match_clause<H>(node: &mut MatchClause, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    each(&mut node.patterns, handler)?;
    handler.handle(Node::Script(&mut node.body))
}

fn for_loop<H>(node: &mut ForLoop, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    match &mut node.header {
        ForHeader::Words(words) => each(words, handler)?,
        ForHeader::Arithmetic(header) => handler.handle(Node::ArithmeticHeader(header))?,
    }
    handler.handle(Node::Script(&mut node.body))
}

fn arithmetic_header<H>(node: &mut ArithmeticHeader, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    for slot in [&mut node.init, &mut node.condition, &mut node.update] {
        if let Some(expr) = slot {
            handler.handle(Node::Arithmetic(expr))?;
        }
    }
    Ok(())
}

fn while_loop<H>(node: &mut WhileLoop, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::Statement(node.condition.as_mut()))?;
    handler.handle(Node::Script(&mut node.body))
}

fn select_menu<H>(node: &mut SelectMenu, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    each(&mut node.words, handler)?;
    handler.handle(Node::Script(&mut node.body))
}

fn redirection<H>(node: &mut Redirection, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::Word(&mut node.target))?;
    if let Some(heredoc) = &mut node.heredoc {
        handler.handle(Node::Heredoc(heredoc))?;
    }
    Ok(())
}

fn assignment<H>(node: &mut Assignment, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::Identifier(&mut node.name))?;
    each(&mut node.subscript, handler)?;
    if let Some(value) = &mut node.value {
        handler.handle(Node::from(value))?;
    }
    Ok(())
}

fn parameter_expansion<H>(node: &mut ParameterExpansion, handler: &mut H) -> Result<(), H::Error>
where
    H: Handler + ?Sized,
{
    handler.handle(Node::Identifier(&mut node.parameter))?;
    if let Some(modifier) = &mut node.modifier {
        handler.handle(Node::from(modifier))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::node::NodeKind;
    use crate::walk::handler::handler_fn;
    use rstest::rstest;
    use std::convert::Infallible;

    /// Records the kind of every child offered, optionally recursing.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<NodeKind>,
        labels: Vec<String>,
        recurse: bool,
    }

    impl Recorder {
        fn recursive() -> Self {
            Self {
                recurse: true,
                ..Default::default()
            }
        }
    }

    impl Handler for Recorder {
        type Error = Infallible;

        fn handle(&mut self, mut node: Node<'_>) -> Result<(), Infallible> {
            self.seen.push(node.kind());
            match node.reborrow() {
                Node::Word(word) => self.labels.push(word.to_plain_string()),
                Node::Identifier(ident) => self.labels.push(ident.name.clone()),
                Node::Token(token) => self.labels.push(token.text.clone()),
                Node::Literal(literal) => self.labels.push(literal.value.clone()),
                _ => {}
            }
            if self.recurse {
                dispatch(node, self)?;
            }
            Ok(())
        }
    }

    fn immediate<'n>(node: impl Into<Node<'n>>) -> Vec<NodeKind> {
        let mut recorder = Recorder::default();
        dispatch(node, &mut recorder).unwrap();
        recorder.seen
    }

    fn word(text: &str) -> Word {
        AST::literal_word(text)
    }

    fn command_of(words: &[&str]) -> CommandOrCompound {
        CommandOrCompound::Command(AST::simple_command(
            vec![],
            words.iter().map(|w| Argument::Word(word(w))).collect(),
            vec![],
        ))
    }

    fn redirect_to(target: &str) -> Redirection {
        AST::redirection(RedirectionOperator::Great, word(target), None)
    }

    fn sample_if() -> Conditional {
        AST::if_node(
            AST::if_clause(AST::command_statement(&["true"]), AST::body(vec![])),
            vec![AST::if_clause(AST::command_statement(&["false"]), AST::body(vec![]))],
            Some(AST::body(vec![AST::command_statement(&["echo", "no"])])),
        )
    }

    #[test]
    fn test_script_visits_lines_in_order() {
        let mut script = AST::script(vec![
            AST::line(vec![AST::command_statement(&["a"])]),
            AST::line(vec![]),
            AST::line(vec![AST::command_statement(&["b"])]),
        ]);
        assert_eq!(immediate(&mut script), vec![NodeKind::Line; 3]);
    }

    #[test]
    fn test_line_visits_statements() {
        let mut line = AST::line(vec![AST::command_statement(&["a"]), AST::command_statement(&["b"])]);
        assert_eq!(immediate(&mut line), vec![NodeKind::Statement, NodeKind::Statement]);
    }

    #[test]
    fn test_statement_visits_pipeline_then_chained_statement() {
        let mut single = AST::command_statement(&["a"]);
        assert_eq!(immediate(&mut single), vec![NodeKind::Pipeline]);

        let mut chained = AST::chained(
            AST::pipeline(vec![command_of(&["a"])]),
            ChainOperator::And,
            AST::command_statement(&["b"]),
        );
        assert_eq!(immediate(&mut chained), vec![NodeKind::Pipeline, NodeKind::Statement]);
    }

    #[test]
    fn test_pipeline_visits_stage_then_continuation() {
        let mut pipeline = AST::pipeline(vec![command_of(&["a"]), command_of(&["b"])]);
        assert_eq!(immediate(&mut pipeline), vec![NodeKind::Command, NodeKind::Pipeline]);

        let mut compound_stage = AST::pipeline(vec![CommandOrCompound::Compound(AST::compound(
            CompoundKind::Group(AST::group(Script::default())),
            vec![],
        ))]);
        assert_eq!(immediate(&mut compound_stage), vec![NodeKind::Compound]);
    }

    #[test]
    fn test_command_assignments_arguments_redirections() {
        // Scenario A: A=1 B=2 cmd x y >out
        let mut command = AST::simple_command(
            vec![
                AST::assignment("A", Some(AssignValue::Word(word("1")))),
                AST::assignment("B", Some(AssignValue::Word(word("2")))),
            ],
            vec![
                Argument::Word(word("cmd")),
                Argument::Word(word("x")),
                Argument::Word(word("y")),
            ],
            vec![redirect_to("out")],
        );
        assert_eq!(
            immediate(&mut command),
            vec![
                NodeKind::Assignment,
                NodeKind::Assignment,
                NodeKind::Word,
                NodeKind::Word,
                NodeKind::Word,
                NodeKind::Redirection,
            ]
        );
    }

    #[test]
    fn test_command_argument_may_be_assignment() {
        let mut command = AST::simple_command(
            vec![],
            vec![
                Argument::Word(word("export")),
                Argument::Assignment(AST::assignment("PATH", Some(AssignValue::Word(word("/bin"))))),
            ],
            vec![],
        );
        assert_eq!(immediate(&mut command), vec![NodeKind::Word, NodeKind::Assignment]);
    }

    #[rstest]
    #[case(CompoundKind::If(sample_if()), NodeKind::Conditional)]
    #[case(CompoundKind::Case(AST::case_node(AST::literal_word("x"), vec![])), NodeKind::CaseMatch)]
    #[case(CompoundKind::While(AST::while_node(AST::command_statement(&["true"]), Script::default())), NodeKind::WhileLoop)]
    #[case(CompoundKind::For(AST::for_in("i", vec![], Script::default())), NodeKind::ForLoop)]
    #[case(CompoundKind::Select(AST::select("opt", vec![], Script::default())), NodeKind::SelectMenu)]
    #[case(CompoundKind::Group(AST::subshell(Script::default())), NodeKind::Grouping)]
    #[case(CompoundKind::Test(TestExpr::default()), NodeKind::TestExpr)]
    #[case(CompoundKind::Arithmetic(Arithmetic::default()), NodeKind::Arithmetic)]
    #[case(CompoundKind::Function(AST::function_def("f", Script::default())), NodeKind::FunctionDef)]
    fn test_compound_visits_its_one_alternative_then_redirections(
        #[case] kind: CompoundKind,
        #[case] expected: NodeKind,
    ) {
        let mut compound = AST::compound(kind, vec![redirect_to("a"), redirect_to("b")]);
        assert_eq!(
            immediate(&mut compound),
            vec![expected, NodeKind::Redirection, NodeKind::Redirection]
        );
    }

    #[test]
    fn test_conditional_primary_elifs_else() {
        // Scenario C
        let mut conditional = sample_if();
        assert_eq!(
            immediate(&mut conditional),
            vec![NodeKind::IfClause, NodeKind::IfClause, NodeKind::ElseClause]
        );

        let mut no_else = AST::if_node(
            AST::if_clause(AST::command_statement(&["true"]), Script::default()),
            vec![],
            None,
        );
        assert_eq!(immediate(&mut no_else), vec![NodeKind::IfClause]);
    }

    #[test]
    fn test_conditional_branch_order_when_recursing() {
        let mut conditional = sample_if();
        let mut recorder = Recorder::recursive();
        dispatch(&mut conditional, &mut recorder).unwrap();
        let words: Vec<_> = recorder
            .labels
            .iter()
            .filter(|label| ["true", "false", "echo"].contains(&label.as_str()))
            .cloned()
            .collect();
        assert_eq!(words, vec!["true", "false", "echo"]);
    }

    #[test]
    fn test_if_and_else_clauses() {
        let mut clause = AST::if_clause(AST::command_statement(&["true"]), Script::default());
        assert_eq!(immediate(&mut clause), vec![NodeKind::Statement, NodeKind::Script]);

        let mut else_clause = ElseClause {
            body: AST::body(vec![AST::command_statement(&["a"]), AST::command_statement(&["b"])]),
        };
        assert_eq!(immediate(&mut else_clause), vec![NodeKind::Line, NodeKind::Line]);
    }

    #[test]
    fn test_compound_inside_loop_condition() {
        // while if true; then false; fi; do :; done
        let nested_if = AST::compound(
            CompoundKind::If(AST::if_node(
                AST::if_clause(AST::command_statement(&["true"]), AST::body(vec![AST::command_statement(&["false"])])),
                vec![],
                None,
            )),
            vec![],
        );
        let condition = AST::statement(AST::pipeline(vec![CommandOrCompound::Compound(nested_if)]));
        let mut while_loop = AST::while_node(condition, AST::body(vec![AST::command_statement(&[":"])]));

        let mut recorder = Recorder::recursive();
        dispatch(&mut while_loop, &mut recorder).unwrap();
        assert_eq!(
            &recorder.seen[..6],
            &[
                NodeKind::Statement,
                NodeKind::Pipeline,
                NodeKind::Compound,
                NodeKind::Conditional,
                NodeKind::IfClause,
                NodeKind::Statement,
            ]
        );
        assert_eq!(recorder.labels, vec!["true", "false", ":"]);

        // the condition is edited in place through the boxed statement
        dispatch(
            &mut while_loop,
            &mut handler_fn(|node| {
                if let Node::Statement(statement) = node {
                    statement.pipeline.negated = true;
                }
                Ok::<(), Infallible>(())
            }),
        )
        .unwrap();
        assert!(while_loop.condition.pipeline.negated);
    }

    #[test]
    fn test_case_subject_then_clauses() {
        let clause = |p: &str| {
            AST::case_item(
                vec![Pattern { words: vec![word(p)] }],
                Script::default(),
                CaseTerminator::DoubleSemi,
            )
        };
        let mut case = AST::case_node(word("$x"), vec![clause("a*"), clause("b*")]);
        assert_eq!(
            immediate(&mut case),
            vec![NodeKind::Word, NodeKind::MatchClause, NodeKind::MatchClause]
        );
    }

    #[test]
    fn test_match_clause_patterns_then_body() {
        let mut clause = AST::case_item(
            vec![
                Pattern { words: vec![word("a")] },
                Pattern { words: vec![word("b"), word("c")] },
            ],
            AST::body(vec![AST::command_statement(&["echo"])]),
            CaseTerminator::SemiAnd,
        );
        assert_eq!(
            immediate(&mut clause),
            vec![NodeKind::Pattern, NodeKind::Pattern, NodeKind::Script]
        );
        assert_eq!(immediate(&mut clause.patterns[1]), vec![NodeKind::Word, NodeKind::Word]);
    }

    #[test]
    fn test_for_words_or_arithmetic_header_then_body() {
        let mut classic = AST::for_in("i", vec![word("1"), word("2")], Script::default());
        assert_eq!(
            immediate(&mut classic),
            vec![NodeKind::Word, NodeKind::Word, NodeKind::Script]
        );

        let mut c_style = AST::for_arithmetic(
            ArithmeticHeader {
                init: Some(Arithmetic::default()),
                condition: None,
                update: Some(Arithmetic::default()),
            },
            Script::default(),
        );
        assert_eq!(immediate(&mut c_style), vec![NodeKind::ArithmeticHeader, NodeKind::Script]);

        if let ForHeader::Arithmetic(header) = &mut c_style.header {
            assert_eq!(immediate(header), vec![NodeKind::Arithmetic, NodeKind::Arithmetic]);
        }
    }

    #[test]
    fn test_loops_select_function_grouping() {
        let mut until = AST::until_node(AST::command_statement(&["false"]), Script::default());
        assert_eq!(immediate(&mut until), vec![NodeKind::Statement, NodeKind::Script]);

        let mut select = AST::select("opt", vec![word("a"), word("b")], Script::default());
        assert_eq!(
            immediate(&mut select),
            vec![NodeKind::Word, NodeKind::Word, NodeKind::Script]
        );

        let body = || AST::body(vec![AST::command_statement(&["echo"])]);
        assert_eq!(immediate(&mut AST::function_def("f", body())), vec![NodeKind::Line]);
        assert_eq!(immediate(&mut AST::group(body())), vec![NodeKind::Line]);
    }

    #[test]
    fn test_redirection_target_then_heredoc() {
        let mut plain = redirect_to("out");
        assert_eq!(immediate(&mut plain), vec![NodeKind::Word]);

        let mut heredoc = AST::here_doc(
            "EOF",
            vec![
                HeredocPart::Literal(AST::literal("hello ")),
                HeredocPart::Word(AST::word(vec![WordPart::Parameter(AST::parameter("USER"))])),
            ],
            false,
        );
        assert_eq!(immediate(&mut heredoc), vec![NodeKind::Word, NodeKind::Heredoc]);
        let body = heredoc.heredoc.as_mut().unwrap();
        assert_eq!(immediate(body), vec![NodeKind::Literal, NodeKind::Word]);
    }

    #[test]
    fn test_substitution_and_arithmetic() {
        let mut substitution = AST::command_substitution(AST::body(vec![AST::command_statement(&["date"])]), false);
        assert_eq!(immediate(&mut substitution), vec![NodeKind::Line]);

        let mut arithmetic = AST::arithmetic(vec![
            ArithToken::Word(word("i")),
            ArithToken::Operator(AST::token("+")),
            ArithToken::Word(word("1")),
        ]);
        assert_eq!(
            immediate(&mut arithmetic),
            vec![NodeKind::Word, NodeKind::Token, NodeKind::Word]
        );
    }

    #[test]
    fn test_word_sequences() {
        let words = || vec![word("a"), word("b")];
        assert_eq!(immediate(&mut ArrayWord { words: words() }), vec![NodeKind::Word; 2]);
        assert_eq!(immediate(&mut BraceWord { words: words() }), vec![NodeKind::Word; 2]);
        assert_eq!(immediate(&mut BraceExpansion { words: words() }), vec![NodeKind::Word; 2]);
        assert_eq!(immediate(&mut Pattern { words: words() }), vec![NodeKind::Word; 2]);
    }

    #[test]
    fn test_assignment_identifier_subscript_value() {
        let mut assignment = Assignment {
            name: AST::identifier("arr"),
            subscript: vec![
                ArithToken::Word(word("i")),
                ArithToken::Operator(AST::token("+")),
                ArithToken::Word(word("1")),
            ],
            append: false,
            value: Some(AssignValue::Array(ArrayWord { words: vec![word("x")] })),
        };
        assert_eq!(
            immediate(&mut assignment),
            vec![
                NodeKind::Identifier,
                NodeKind::Word,
                NodeKind::Token,
                NodeKind::Word,
                NodeKind::ArrayWord,
            ]
        );

        let mut bare = AST::assignment("X", None);
        assert_eq!(immediate(&mut bare), vec![NodeKind::Identifier]);
    }

    #[test]
    fn test_parameter_expansion_base_then_modifier() {
        let mut plain = AST::parameter("HOME");
        assert_eq!(immediate(&mut plain), vec![NodeKind::Identifier]);

        let mut braced = AST::parameter_with(
            "x",
            ":-",
            ParamModifier::Brace(BraceWord { words: vec![word("default")] }),
        );
        assert_eq!(immediate(&mut braced), vec![NodeKind::Identifier, NodeKind::BraceWord]);

        let mut string = AST::parameter_with("x", "#", ParamModifier::String(AST::literal("*/")));
        assert_eq!(immediate(&mut string), vec![NodeKind::Identifier, NodeKind::Literal]);
    }

    #[test]
    fn test_leaves_never_call_handler() {
        let mut calls = 0;
        let mut count = handler_fn(|_node| {
            calls += 1;
            Ok::<(), ()>(())
        });

        let mut w = AST::word(vec![WordPart::Parameter(AST::parameter("X"))]);
        let mut lit = AST::literal("text");
        let mut test = TestExpr { extended: true, words: vec![word("-f"), word("x")] };
        let mut tok = AST::token("+=");
        let mut ident = AST::identifier("name");

        assert_eq!(dispatch(&mut w, &mut count), Ok(()));
        assert_eq!(dispatch(&mut lit, &mut count), Ok(()));
        assert_eq!(dispatch(&mut test, &mut count), Ok(()));
        assert_eq!(dispatch(&mut tok, &mut count), Ok(()));
        assert_eq!(dispatch(&mut ident, &mut count), Ok(()));
        drop(count);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_empty_optionals_are_skipped() {
        let mut header = ArithmeticHeader::default();
        assert!(immediate(&mut header).is_empty());
        assert!(immediate(&mut Script::default()).is_empty());
        assert!(immediate(&mut Command::default()).is_empty());
    }

    #[test]
    fn test_pipeline_stages_left_to_right_when_recursing() {
        // Scenario B: a | b | c
        let mut pipeline = AST::pipeline(vec![command_of(&["a"]), command_of(&["b"]), command_of(&["c"])]);
        let mut recorder = Recorder::recursive();
        dispatch(&mut pipeline, &mut recorder).unwrap();
        assert_eq!(recorder.labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dispatch_twice_gives_same_sequence() {
        let mut script = AST::script(vec![AST::line(vec![AST::statement(AST::pipeline(vec![
            CommandOrCompound::Compound(AST::compound(CompoundKind::If(sample_if()), vec![redirect_to("log")])),
        ]))])]);
        let mut first = Recorder::recursive();
        let mut second = Recorder::recursive();
        dispatch(&mut script, &mut first).unwrap();
        dispatch(&mut script, &mut second).unwrap();
        assert!(!first.seen.is_empty());
        assert_eq!(first.seen, second.seen);
        assert_eq!(first.labels, second.labels);
    }

    #[derive(Debug, PartialEq)]
    struct Sentinel(u32);

    #[test]
    fn test_failure_on_second_of_four_children() {
        // Scenario D
        let mut array = ArrayWord {
            words: vec![word("1"), word("2"), word("3"), word("4")],
        };
        let mut visited = Vec::new();
        let mut failing = handler_fn(|node| {
            if let Node::Word(w) = node {
                visited.push(w.to_plain_string());
            }
            if visited.len() == 2 {
                Err(Sentinel(42))
            } else {
                Ok(())
            }
        });
        assert_eq!(dispatch(&mut array, &mut failing), Err(Sentinel(42)));
        drop(failing);
        assert_eq!(visited, vec!["1", "2"]);
    }

    #[test]
    fn test_failure_in_prefix_skips_later_groups() {
        let mut command = AST::simple_command(
            vec![AST::assignment("A", None)],
            vec![Argument::Word(word("cmd"))],
            vec![redirect_to("out")],
        );
        let mut calls = 0;
        let mut failing = handler_fn(|_node| {
            calls += 1;
            Err::<(), _>("first")
        });
        assert_eq!(dispatch(&mut command, &mut failing), Err("first"));
        drop(failing);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_failure_deep_in_tree_unwinds_every_level() {
        struct FailOn(&'static str, usize);

        impl Handler for FailOn {
            type Error = String;

            fn handle(&mut self, mut node: Node<'_>) -> Result<(), String> {
                self.1 += 1;
                if let Node::Word(w) = node.reborrow() {
                    if w.to_plain_string() == self.0 {
                        return Err(format!("hit {}", self.0));
                    }
                }
                dispatch(node, self)
            }
        }

        let mut script = AST::body(vec![
            AST::command_statement(&["a", "b"]),
            AST::command_statement(&["c"]),
        ]);
        let mut handler = FailOn("b", 0);
        assert_eq!(dispatch(&mut script, &mut handler), Err("hit b".to_string()));
        // line, statement, pipeline, command, "a", "b"
        assert_eq!(handler.1, 6);
    }

    #[test]
    fn test_mutation_before_failure_is_kept() {
        let mut array = ArrayWord {
            words: vec![word("1"), word("2"), word("3")],
        };
        let mut rewrite = handler_fn(|node| match node {
            Node::Word(w) if w.to_plain_string() == "2" => Err("stop"),
            Node::Word(w) => {
                *w = AST::literal_word("changed");
                Ok(())
            }
            _ => Ok(()),
        });
        assert_eq!(dispatch(&mut array, &mut rewrite), Err("stop"));
        assert_eq!(array.words[0], word("changed"));
        assert_eq!(array.words[2], word("3"));
    }

    #[test]
    fn test_node_value_and_reference_are_equivalent() {
        let mut script = AST::body(vec![AST::command_statement(&["a"])]);
        let by_ref = immediate(&mut script);
        let by_node = immediate(Node::Script(&mut script));
        assert_eq!(by_ref, by_node);
    }
}
