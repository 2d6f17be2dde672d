use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::{Grammar, EPSILON_IDX};

/// Identifies one alternative of a non-terminal: `left` is the arena index
/// of the non-terminal, `alt` the position in its production list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionRef {
    pub left: usize,
    pub alt: usize,
}

/// Two distinct productions competed for the same cell. The table keeps
/// `kept` (first-write-wins) and records `discarded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub non_terminal: usize,
    pub terminal: usize,
    pub kept: ProductionRef,
    pub discarded: ProductionRef,
}

/// LL(1) parsing table: at most one production per
/// (non-terminal, lookahead) cell. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LL1Table {
    cells: HashMap<(usize, usize), ProductionRef>,
    conflicts: Vec<Conflict>,
}

impl LL1Table {
    pub fn get(&self, non_terminal: usize, lookahead: usize) -> Option<ProductionRef> {
        self.cells.get(&(non_terminal, lookahead)).cloned()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    fn set(&mut self, non_terminal: usize, terminal: usize, production: ProductionRef) {
        match self.cells.entry((non_terminal, terminal)) {
            Entry::Vacant(e) => {
                e.insert(production);
            }
            Entry::Occupied(e) => {
                let kept = *e.get();
                // The same production can legally reach a cell through both
                // its FIRST and FOLLOW entries; only distinct productions
                // conflict.
                if kept != production {
                    self.conflicts.push(Conflict {
                        non_terminal,
                        terminal,
                        kept,
                        discarded: production,
                    });
                }
            }
        }
    }
}

impl Grammar {
    pub fn production(&self, reference: ProductionRef) -> &[usize] {
        &self.symbols[reference.left]
            .non_terminal()
            .unwrap()
            .productions[reference.alt]
    }

    /// Builds the LL(1) table from the computed FIRST/FOLLOW sets,
    /// computing them first if that has not happened yet. For every
    /// production `A -> α`: a cell for each terminal in FIRST(α)∖{ε},
    /// then, if ε ∈ FIRST(α), a cell for each terminal in FOLLOW(A).
    /// Terminals are visited in arena order so the build is deterministic.
    pub fn build_ll1_table(&mut self) -> LL1Table {
        if !self.is_first_follow_computed() {
            self.calculate_first_follow();
        }

        let mut table = LL1Table::default();

        let lefts: Vec<usize> = self.non_terminal_iter().map(|nt| nt.index).collect();
        for left in lefts {
            let nt = self.symbols[left].non_terminal().unwrap();
            for (alt, production) in nt.productions.iter().enumerate() {
                let reference = ProductionRef { left, alt };
                let first = self.first_of_sequence(production);

                let mut terminals: Vec<usize> = first
                    .iter()
                    .cloned()
                    .filter(|&t| t != EPSILON_IDX)
                    .collect();
                terminals.sort_unstable();
                for t in terminals {
                    table.set(left, t, reference);
                }

                if first.contains(&EPSILON_IDX) {
                    let mut follow: Vec<usize> = nt.follow.iter().cloned().collect();
                    follow.sort_unstable();
                    for t in follow {
                        table.set(left, t, reference);
                    }
                }
            }
        }

        table
    }
}
