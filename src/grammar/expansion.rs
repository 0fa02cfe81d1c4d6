//! Macro expansion: rewriting EBNF macro symbols into pure BNF productions.

use super::{Grammar, MacroSymbol, ProductionRule, Sentence, Symbol};

impl Grammar {
    /// Rewrite every production whose body mentions a macro symbol into pure
    /// BNF productions.
    ///
    /// Each macro occurrence is replaced by a fresh auxiliary non-terminal
    /// `M_{pnum}_{occurrence}` (pnum = index of the rewritten production in
    /// the pre-expansion list, occurrence = a per-production counter), and
    /// the auxiliary rules are:
    ///
    /// - `Grouping(x₁ … x_k)`: `M → x₁ … x_k`
    /// - `Nullable(X)`: `M → X | ε`
    /// - `ZeroOrMore(X)`: `M → X M | ε`
    /// - `OneOrMore(X)`: `M → X M | X`
    /// - `Alternative(s₁ | … | s_k)`: `M → s₁ | … | s_k`
    ///
    /// Macros are processed left-to-right within a body and innermost-first
    /// within a symbol, so the output is identical across runs for the same
    /// input grammar. The output grammar contains no macro symbol.
    pub fn expand_macros(&self) -> Grammar {
        let mut rules: Vec<ProductionRule> = Vec::new();
        for (pnum, rule) in self.rules().iter().enumerate() {
            let mut occurrence = 0usize;
            let mut aux_rules: Vec<ProductionRule> = Vec::new();
            let body: Vec<Symbol> = rule
                .body()
                .iter()
                .map(|symbol| rewrite_symbol(symbol, pnum, &mut occurrence, &mut aux_rules))
                .collect();
            rules.push(ProductionRule::new(
                rule.head().clone(),
                Sentence::new(body),
            ));
            rules.append(&mut aux_rules);
        }

        let expanded = Grammar::new(self.start().clone(), rules);
        debug_assert!(!expanded.contains_macro());
        expanded
    }
}

/// Replace a macro symbol with a fresh auxiliary non-terminal, emitting the
/// auxiliary rules; non-macro symbols pass through unchanged. Operands are
/// rewritten before the macro that owns them, so nested macros are expanded
/// innermost-first.
fn rewrite_symbol(
    symbol: &Symbol,
    pnum: usize,
    occurrence: &mut usize,
    aux_rules: &mut Vec<ProductionRule>,
) -> Symbol {
    let macro_symbol = match symbol {
        Symbol::Macro(m) => m,
        other => return other.clone(),
    };

    match macro_symbol {
        MacroSymbol::Grouping(symbols) => {
            let inner: Vec<Symbol> = symbols
                .iter()
                .map(|s| rewrite_symbol(s, pnum, occurrence, aux_rules))
                .collect();
            let aux = fresh_aux(pnum, occurrence);
            aux_rules.push(ProductionRule::new(aux.clone(), Sentence::new(inner)));
            aux
        }
        MacroSymbol::Nullable(operand) => {
            let x = rewrite_symbol(operand, pnum, occurrence, aux_rules);
            let aux = fresh_aux(pnum, occurrence);
            aux_rules.push(ProductionRule::new(aux.clone(), Sentence::new(vec![x])));
            aux_rules.push(ProductionRule::new(
                aux.clone(),
                Sentence::new(vec![Symbol::Epsilon]),
            ));
            aux
        }
        MacroSymbol::ZeroOrMore(operand) => {
            let x = rewrite_symbol(operand, pnum, occurrence, aux_rules);
            let aux = fresh_aux(pnum, occurrence);
            aux_rules.push(ProductionRule::new(
                aux.clone(),
                Sentence::new(vec![x, aux.clone()]),
            ));
            aux_rules.push(ProductionRule::new(
                aux.clone(),
                Sentence::new(vec![Symbol::Epsilon]),
            ));
            aux
        }
        MacroSymbol::OneOrMore(operand) => {
            let x = rewrite_symbol(operand, pnum, occurrence, aux_rules);
            let aux = fresh_aux(pnum, occurrence);
            aux_rules.push(ProductionRule::new(
                aux.clone(),
                Sentence::new(vec![x.clone(), aux.clone()]),
            ));
            aux_rules.push(ProductionRule::new(aux.clone(), Sentence::new(vec![x])));
            aux
        }
        MacroSymbol::Alternative(sentences) => {
            let bodies: Vec<Vec<Symbol>> = sentences
                .iter()
                .map(|sentence| {
                    sentence
                        .iter()
                        .map(|s| rewrite_symbol(s, pnum, occurrence, aux_rules))
                        .collect()
                })
                .collect();
            let aux = fresh_aux(pnum, occurrence);
            for body in bodies {
                aux_rules.push(ProductionRule::new(aux.clone(), Sentence::new(body)));
            }
            aux
        }
        MacroSymbol::Pipe => {
            unreachable!("raw pipe macros are flattened at sentence construction")
        }
    }
}

fn fresh_aux(pnum: usize, occurrence: &mut usize) -> Symbol {
    let aux = Symbol::non_terminal(&format!("M_{}_{}", pnum, occurrence));
    *occurrence += 1;
    aux
}
