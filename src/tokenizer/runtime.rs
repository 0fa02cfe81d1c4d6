use super::{Token, Tokenizer, TokenizerTable, TransitionTrace};
use crate::error::TokenizeError;
use crate::util::{Code, Log, LINE_BREAKS};
use once_cell::unsync::OnceCell;
use std::collections::HashSet;
use std::rc::Rc;

impl Tokenizer {
    /// Create a tokenizer over a built table. The ignored-token set is
    /// derived from the table's ignored lexeme states; tokens of those types
    /// are still emitted here and dropped by [TokenStream](super::TokenStream)
    /// at parse time.
    pub fn new(table: TokenizerTable) -> Self {
        let ignored: HashSet<Rc<str>> = table
            .states()
            .iter()
            .filter(|state| state.accepting && state.ignored)
            .map(|state| state.name.clone())
            .collect();
        Self {
            table,
            ignored,
            log: OnceCell::new(),
        }
    }

    /// Set a log label to debug the tokenization run.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// Token types dropped from the parsed stream.
    pub fn ignored(&self) -> &HashSet<Rc<str>> {
        &self.ignored
    }

    pub fn table(&self) -> &TokenizerTable {
        &self.table
    }

    /// Split the input into the complete token stream, ignored lexemes
    /// included. Token emission order equals source order.
    pub fn tokenize(&self, code: &Code) -> Result<Vec<Token>, TokenizeError> {
        let length = code.len();
        let mut tokens: Vec<Token> = Vec::new();

        let mut state = 0usize;
        let mut position = 0usize;
        let mut line = 1usize;
        let mut column = 1usize;
        let mut token_start = 0usize;
        let mut start_line = 1usize;
        let mut start_column = 1usize;

        let mut history: Vec<TransitionTrace> = Vec::new();

        loop {
            if position >= length && state == 0 {
                #[cfg(debug_assertions)]
                if let Some(log) = self.log.get() {
                    if log.order() >= Log::Success(()).order() {
                        println!("[{}; Tokenization success]: {} tokens", log, tokens.len());
                    }
                }
                break Ok(tokens);
            }
            let lookahead = code.char_at(position).unwrap_or(super::EOI_CHAR);
            // The sentinel is never consumable: past the end every state
            // misses, so accepting states emit and the rest fail.
            let transition = if position < length {
                self.table.state(state).transitions.get(&lookahead)
            } else {
                None
            };

            match transition {
                Some(&next) => {
                    #[cfg(debug_assertions)]
                    if self.log.get().is_some() {
                        history.push(TransitionTrace {
                            from: state,
                            character: lookahead,
                            to: next,
                            position,
                        });
                    }

                    position += 1;
                    if LINE_BREAKS.contains(&lookahead) {
                        line += 1;
                        column = 1;
                    } else {
                        column += 1;
                    }
                    if state == 0 && next == 0 {
                        // An ignored character: skip without emission.
                        token_start = position;
                        start_line = line;
                        start_column = column;
                    }
                    state = next;
                }
                None => {
                    let current = self.table.state(state);
                    if current.recurse_on_miss {
                        // Longest match ended on the previous character.
                        let token = Token {
                            token_type: current.name.clone(),
                            value: code.slice(token_start, position),
                            start: token_start,
                            end: position,
                            line: start_line,
                            column: start_column,
                        };

                        #[cfg(debug_assertions)]
                        if let Some(log) = self.log.get() {
                            if log.order() >= Log::Verbose(()).order() {
                                println!(
                                    "[{}; Token]: {} {:?} at {}..{}",
                                    log, token.token_type, token.value, token.start, token.end
                                );
                            }
                        }

                        tokens.push(token);
                        state = 0;
                        token_start = position;
                        start_line = line;
                        start_column = column;
                        history.clear();
                    } else if position >= length {
                        #[cfg(debug_assertions)]
                        self.log_failure(position, line, column);

                        break Err(TokenizeError::UnexpectedEndOfInput {
                            position,
                            line,
                            column,
                            state_name: current.name.to_string(),
                        });
                    } else {
                        #[cfg(debug_assertions)]
                        self.log_failure(position, line, column);

                        break Err(TokenizeError::UnexpectedCharacter {
                            character: lookahead,
                            position,
                            line,
                            column,
                            state_name: current.name.to_string(),
                            history: std::mem::take(&mut history),
                        });
                    }
                }
            }
        }
    }

    #[cfg(debug_assertions)]
    fn log_failure(&self, position: usize, line: usize, column: usize) {
        if let Some(log) = self.log.get() {
            if log.order() >= Log::Default(()).order() {
                println!(
                    "[{}; Tokenization failed]: at {} (line {}, column {})",
                    log, position, line, column
                );
            }
        }
    }
}
