use super::{Dfa, DfaBuilder, DfaState, TableState, TokenizerTable, EOI_CHAR};
use crate::error::{BuildError, GrammarError};
use crate::regex::{DerivativeCalculator, Lexeme, LexemeTag, RegexNode};
use crate::util::Log;
use once_cell::unsync::OnceCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

impl DfaBuilder {
    /// Create a builder over the lexeme list. Declaration order is the
    /// priority order on equal-length matches. `ignored_chars` (the
    /// whitespace markers) and the end-of-input sentinel become the
    /// complement characters added to the alphabet.
    pub fn new(lexemes: Vec<Lexeme>, ignored_chars: &[char]) -> Self {
        let mut complement_chars: Vec<char> = ignored_chars.to_vec();
        if !complement_chars.contains(&EOI_CHAR) {
            complement_chars.push(EOI_CHAR);
        }
        Self {
            lexemes,
            ignored_chars: ignored_chars.to_vec(),
            complement_chars,
            calculator: DerivativeCalculator::new(),
            log: OnceCell::new(),
        }
    }

    /// Set a log label to debug state discovery.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// Enumerate the reachable derivative states of the combined lexeme
    /// regex into a DFA.
    pub fn build_dfa(&mut self) -> Result<Dfa, Vec<BuildError>> {
        let mut errors: Vec<BuildError> = Vec::new();

        let mut occurrences: HashMap<Rc<str>, Vec<usize>> = HashMap::new();
        for (index, lexeme) in self.lexemes.iter().enumerate() {
            occurrences
                .entry(lexeme.name.clone())
                .or_default()
                .push(index);
        }
        let mut duplicates: Vec<(Rc<str>, Vec<usize>)> = occurrences
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .collect();
        duplicates.sort_by_key(|(_, indices)| indices[0]);
        for (name, indices) in duplicates {
            errors.push(
                GrammarError::DuplicateLexeme {
                    name: name.to_string(),
                    occurrences: indices,
                }
                .into(),
            );
        }

        for lexeme in &self.lexemes {
            if lexeme.pattern.contains_epsilon() {
                errors.push(
                    GrammarError::NullableLexeme {
                        name: lexeme.name.to_string(),
                    }
                    .into(),
                );
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let tagged: Vec<Rc<RegexNode>> = self
            .lexemes
            .iter()
            .enumerate()
            .map(|(order, lexeme)| {
                let tag = Rc::new(LexemeTag {
                    name: lexeme.name.clone(),
                    order,
                    is_ignored: lexeme.is_ignored,
                });
                lexeme.pattern.tag_deep(&tag)
            })
            .collect();

        let mut alphabet: BTreeSet<char> = BTreeSet::new();
        for pattern in &tagged {
            alphabet.extend(pattern.alphabet(&self.complement_chars));
        }
        let alphabet: Vec<char> = alphabet.into_iter().collect();

        let initial = RegexNode::union_all(tagged);
        let mut states: Vec<DfaState> = vec![new_state(&initial)];
        let mut known: HashMap<String, usize> = HashMap::new();
        known.insert(initial.state_key(), 0);

        let mut index = 0;
        while index < states.len() {
            let source = Rc::clone(&states[index].regex);
            self.calculator.reset_history();

            let mut transitions: Vec<(char, usize)> = Vec::new();
            for &c in &alphabet {
                let derivative = self.calculator.derive(&source, c);
                if derivative.is_empty_set() {
                    // Implicit sink.
                    continue;
                }
                let key = derivative.state_key();
                let target = match known.get(&key) {
                    Some(&id) => id,
                    None => {
                        let id = states.len();
                        known.insert(key, id);
                        states.push(new_state(&derivative));

                        #[cfg(debug_assertions)]
                        if let Some(log) = self.log.get() {
                            if log.order() >= Log::Verbose(()).order() {
                                println!("[{}; DfaState {}]: {}", log, id, states[id].name);
                            }
                        }

                        id
                    }
                };
                transitions.push((c, target));
            }
            states[index].transitions = transitions;
            index += 1;
        }

        #[cfg(debug_assertions)]
        if let Some(log) = self.log.get() {
            if log.order() >= Log::Success(()).order() {
                println!(
                    "[{}; DfaBuild success]: {} states over {} characters",
                    log,
                    states.len(),
                    alphabet.len()
                );
            }
        }

        Ok(Dfa { states, alphabet })
    }

    /// Build the DFA and lower it to the tokenizer table.
    ///
    /// State 0 of the table is a synthetic gate: it carries the initial
    /// state's transitions plus a self-loop for every ignored character, so
    /// skipped characters advance the token start without emission. Accepting
    /// states take the winning lexeme's name and are flagged to end the
    /// current token when no transition matches the lookahead.
    pub fn build_table(&mut self) -> Result<TokenizerTable, Vec<BuildError>> {
        let dfa = self.build_dfa()?;

        let mut gate_transitions: HashMap<char, usize> = HashMap::new();
        for &c in &self.ignored_chars {
            gate_transitions.insert(c, 0);
        }
        // Lexeme transitions take precedence over the skip loop.
        for &(c, target) in &dfa.states[0].transitions {
            gate_transitions.insert(c, target + 1);
        }

        let mut states: Vec<TableState> = Vec::with_capacity(dfa.states.len() + 1);
        states.push(TableState {
            id: 0,
            name: Rc::from(dfa.states[0].name.as_str()),
            accepting: false,
            recurse_on_miss: false,
            ignored: false,
            transitions: gate_transitions,
        });

        for (index, state) in dfa.states.iter().enumerate() {
            let name: Rc<str> = match &state.winner {
                Some(winner) => winner.clone(),
                None => Rc::from(state.name.as_str()),
            };
            states.push(TableState {
                id: index + 1,
                name,
                accepting: state.accepting,
                recurse_on_miss: state.accepting,
                ignored: state.winner_ignored,
                transitions: state
                    .transitions
                    .iter()
                    .map(|&(c, target)| (c, target + 1))
                    .collect(),
            });
        }

        Ok(TokenizerTable { states })
    }
}

fn new_state(regex: &Rc<RegexNode>) -> DfaState {
    let accepting = regex.contains_epsilon();
    let (winner, winner_ignored) = if accepting {
        let mut tags: Vec<Rc<LexemeTag>> = Vec::new();
        collect_accepting_tags(regex, &mut tags);
        match tags.into_iter().min_by_key(|tag| tag.order) {
            Some(tag) => (Some(tag.name.clone()), tag.is_ignored),
            None => (None, false),
        }
    } else {
        (None, false)
    };
    DfaState {
        name: regex.state_key(),
        regex: Rc::clone(regex),
        transitions: Vec::new(),
        accepting,
        winner,
        winner_ignored,
    }
}

/// Collect the lexeme tags of every ε-containing union branch: the lexemes
/// that accept in this state.
fn collect_accepting_tags(node: &Rc<RegexNode>, into: &mut Vec<Rc<LexemeTag>>) {
    if !node.contains_epsilon() {
        return;
    }
    match node.kind() {
        crate::regex::RegexKind::Union(left, right) => {
            collect_accepting_tags(left, into);
            collect_accepting_tags(right, into);
        }
        _ => {
            if let Some(tag) = node.tag() {
                into.push(Rc::clone(tag));
            }
        }
    }
}

impl TokenizerTable {
    pub fn state(&self, id: usize) -> &TableState {
        &self.states[id]
    }

    pub fn states(&self) -> &[TableState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
