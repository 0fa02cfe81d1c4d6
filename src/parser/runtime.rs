use super::{CstNode, LrParser};
use crate::error::{BuildError, SyntaxError};
use crate::grammar::{Grammar, Symbol};
use crate::lr::{build_automaton, build_table, LrAction};
use crate::tokenizer::TokenStream;

impl LrParser {
    /// Expand macros, augment the grammar and build the LR(1) table.
    ///
    /// All build failures (undefined non-terminal references and every table
    /// conflict) are returned together.
    pub fn new(grammar: &Grammar) -> Result<Self, Vec<BuildError>> {
        let expanded = if grammar.contains_macro() {
            grammar.expand_macros()
        } else {
            grammar.clone()
        };
        let augmented = expanded
            .augment()
            .map_err(|errors| errors.into_iter().map(BuildError::from).collect::<Vec<_>>())?;

        let automaton = build_automaton(&augmented);
        let table = build_table(&augmented, &automaton)
            .map_err(|conflicts| conflicts.into_iter().map(BuildError::from).collect::<Vec<_>>())?;

        Ok(Self {
            grammar: augmented,
            table,
        })
    }

    /// The expanded, augmented grammar the table was built from.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Drive the shift-reduce automaton over the stream and build the tree.
    ///
    /// Two parallel stacks are kept: state ids and produced nodes (tokens as
    /// leaves, non-terminals as subtrees). Reductions pop a body's worth of
    /// entries from both; accept finalizes the single remaining node as the
    /// root.
    pub fn parse(&self, stream: &TokenStream) -> Result<CstNode, SyntaxError> {
        let mut state_stack: Vec<usize> = vec![0];
        let mut node_stack: Vec<CstNode> = Vec::new();
        let mut cursor = 0usize;

        loop {
            let state = *state_stack.last().expect("the state stack is never empty");
            let lookahead = match stream.token_at(cursor) {
                Some(token) => Symbol::Terminal(token.token_type.clone()),
                None => Symbol::EndOfInput,
            };

            match self.table.action(state, &lookahead) {
                Some(&LrAction::Shift(target)) => {
                    let token = stream
                        .token_at(cursor)
                        .expect("shift actions only exist for terminals")
                        .clone();
                    node_stack.push(CstNode::leaf(token));
                    state_stack.push(target);
                    cursor += 1;
                }
                Some(&LrAction::Reduce(production)) => {
                    let rule = &self.grammar.rules()[production];
                    let head = rule
                        .head()
                        .name()
                        .expect("production heads are non-terminals")
                        .clone();

                    let node = if rule.is_epsilon() {
                        CstNode::internal(head.clone(), Vec::new(), stream.previous_end(cursor))
                    } else {
                        let count = rule.body().len();
                        let children: Vec<CstNode> =
                            node_stack.split_off(node_stack.len() - count);
                        state_stack.truncate(state_stack.len() - count);
                        CstNode::internal(head.clone(), children, stream.previous_end(cursor))
                    };
                    node_stack.push(node);

                    let top = *state_stack.last().expect("the state stack is never empty");
                    match self.table.action(top, rule.head()) {
                        Some(&LrAction::Goto(target)) => state_stack.push(target),
                        _ => unreachable!("a reduce is always followed by a goto"),
                    }
                }
                Some(&LrAction::Accept) => {
                    let node = node_stack
                        .pop()
                        .expect("accept leaves the start symbol's node");
                    debug_assert!(node_stack.is_empty());
                    return Ok(finalize_root(node));
                }
                Some(&LrAction::Goto(_)) | None => {
                    let token = stream.token_at(cursor).cloned();
                    let position = token
                        .as_ref()
                        .map_or_else(|| stream.end_position(), |t| t.start);
                    return Err(SyntaxError {
                        token,
                        position,
                        state,
                    });
                }
            }
        }
    }
}

fn finalize_root(node: CstNode) -> CstNode {
    match node {
        CstNode::Internal {
            name,
            children,
            span,
        } => CstNode::Root {
            name,
            children,
            span,
        },
        other => other,
    }
}
