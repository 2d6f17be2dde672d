use std::collections::HashSet;

use super::{grammar::Symbol, Grammar, END_MARK, END_MARK_IDX, EPSILON_IDX};

impl Grammar {
    /// Populates FIRST and FOLLOW for every non-terminal by monotone
    /// fixpoint iteration. Total: cannot fail on a well-formed grammar.
    /// A grammar without a start symbol is left untouched.
    pub fn calculate_first_follow(&mut self) {
        if let Some(start_idx) = self.start_symbol {
            self.symbols[start_idx]
                .mut_non_terminal()
                .unwrap()
                .follow
                .insert(self.symbol_table[END_MARK]);
            self.calculate_first();
            self.calculate_follow();
        }
    }

    /// FOLLOW(start) gains `$` as the very first step of the computation,
    /// so its presence tells whether the derived sets are populated.
    pub fn is_first_follow_computed(&self) -> bool {
        self.start_symbol
            .and_then(|idx| self.symbols[idx].non_terminal())
            .map_or(false, |nt| nt.follow.contains(&END_MARK_IDX))
    }

    pub fn reset_first_follow(&mut self) {
        for nt in self.non_terminal_iter_mut() {
            nt.first = HashSet::new();
            nt.follow = HashSet::new();
        }
    }

    /// FIRST of an arbitrary symbol sequence: scan left to right, stopping
    /// at the first terminal or non-nullable non-terminal. An empty
    /// sequence (or an all-nullable one) yields `{ε}`.
    pub fn first_of_sequence(&self, sequence: &[usize]) -> HashSet<usize> {
        let mut first = HashSet::new();
        for &idx in sequence {
            match &self.symbols[idx] {
                Symbol::Epsilon => {
                    first.insert(EPSILON_IDX);
                    return first;
                }
                Symbol::Terminal(_) => {
                    first.insert(idx);
                    return first;
                }
                Symbol::NonTerminal(nt) => {
                    first.extend(nt.first.iter().cloned().filter(|&s| s != EPSILON_IDX));
                    if !nt.nullable() {
                        return first;
                    }
                }
            }
        }
        first.insert(EPSILON_IDX);
        first
    }

    fn calculate_first(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..self.symbols.len() {
                let first: HashSet<usize> = match &self.symbols[i] {
                    Symbol::NonTerminal(nt) => {
                        nt.productions
                            .iter()
                            .fold(HashSet::new(), |mut first, production| {
                                first.extend(self.first_of_sequence(production));
                                first
                            })
                    }
                    _ => continue,
                };

                let nt = self.symbols[i].mut_non_terminal().unwrap();
                if nt.first.len() != first.len() {
                    changed = true;
                    nt.first = first;
                }
            }
        }
    }

    fn calculate_follow(&mut self) {
        let productions: Vec<(usize, Vec<usize>)> = self
            .non_terminal_iter()
            .flat_map(|nt| nt.productions.iter().map(move |p| (nt.index, p.clone())))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for (left, rhs) in &productions {
                for (i, &symbol) in rhs.iter().enumerate() {
                    if self.symbols[symbol].non_terminal().is_none() {
                        continue;
                    }

                    let first_beta = self.first_of_sequence(&rhs[i + 1..]);
                    let mut gained: HashSet<usize> = first_beta
                        .iter()
                        .cloned()
                        .filter(|&s| s != EPSILON_IDX)
                        .collect();
                    if first_beta.contains(&EPSILON_IDX) {
                        gained.extend(
                            self.symbols[*left]
                                .non_terminal()
                                .unwrap()
                                .follow
                                .iter()
                                .cloned(),
                        );
                    }

                    let nt = self.symbols[symbol].mut_non_terminal().unwrap();
                    let before = nt.follow.len();
                    nt.follow.extend(gained);
                    if nt.follow.len() != before {
                        changed = true;
                    }
                }
            }
        }
    }

    /// FIRST set of a non-terminal as sorted symbol names (ε included when
    /// nullable). `None` when `name` is not a non-terminal.
    pub fn first_of(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.get_symbol_index(name)?;
        let nt = self.symbols[idx].non_terminal()?;
        let mut names: Vec<&str> = nt.first.iter().map(|&s| self.get_symbol_name(s)).collect();
        names.sort_unstable();
        Some(names)
    }

    /// FOLLOW set of a non-terminal as sorted symbol names (`$` included
    /// where present).
    pub fn follow_of(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.get_symbol_index(name)?;
        let nt = self.symbols[idx].non_terminal()?;
        let mut names: Vec<&str> = nt.follow.iter().map(|&s| self.get_symbol_name(s)).collect();
        names.sort_unstable();
        Some(names)
    }
}
