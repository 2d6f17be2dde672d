use std::collections::{HashMap, HashSet};
use std::fmt;

use super::{END_MARK, EPSILON, EPSILON_IDX};

/// A named grammatical category together with its productions and the
/// FIRST/FOLLOW sets derived for it. Sets hold symbol-arena indices.
#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    pub first: HashSet<usize>,
    pub follow: HashSet<usize>,
    pub productions: Vec<Vec<usize>>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            first: HashSet::new(),
            follow: HashSet::new(),
            productions: Vec::new(),
        }
    }

    pub fn nullable(&self) -> bool {
        self.first.contains(&EPSILON_IDX)
    }
}

/// Symbol kind is decided once, when the symbol enters the arena.
#[derive(Debug, Clone)]
pub enum Symbol {
    Epsilon,
    Terminal(String),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

/// Malformed grammar input, surfaced at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    EmptyNonTerminalSet,
    DuplicateNonTerminal(String),
    ReservedSymbol(String),
    UndeclaredStart(String),
    UndeclaredLeftSide(String),
    MisplacedEpsilon,
    Syntax { line: usize, message: String },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::EmptyNonTerminalSet => write!(f, "no non-terminals declared"),
            GrammarError::DuplicateNonTerminal(name) => {
                write!(f, "non-terminal {} declared more than once", name)
            }
            GrammarError::ReservedSymbol(name) => {
                write!(f, "{} is reserved and cannot be declared", name)
            }
            GrammarError::UndeclaredStart(name) => {
                write!(f, "start symbol {} is not a declared non-terminal", name)
            }
            GrammarError::UndeclaredLeftSide(name) => {
                write!(f, "left side {} is not a declared non-terminal", name)
            }
            GrammarError::MisplacedEpsilon => {
                write!(f, "{} cannot appear alongside other symbols", EPSILON)
            }
            GrammarError::Syntax { line, message } => write!(f, "line {}: {}", line, message),
        }
    }
}

impl std::error::Error for GrammarError {}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub start_symbol: Option<usize>,
}

impl Grammar {
    pub fn new() -> Self {
        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            start_symbol: None,
        };

        g.symbols.push(Symbol::Epsilon);
        g.symbol_table.insert(EPSILON.to_string(), EPSILON_IDX);
        g.add_terminal(END_MARK.to_string());

        g
    }

    /// Builds a grammar from an explicit non-terminal declaration list and a
    /// start symbol. Productions are added afterwards with
    /// [`add_production_named`](Self::add_production_named).
    pub fn with_declarations(non_terminals: &[&str], start: &str) -> Result<Self, GrammarError> {
        if non_terminals.is_empty() {
            return Err(GrammarError::EmptyNonTerminalSet);
        }

        let mut g = Self::new();
        for &name in non_terminals {
            if name == EPSILON || name == END_MARK {
                return Err(GrammarError::ReservedSymbol(name.to_string()));
            }
            if g.symbol_table.contains_key(name) {
                return Err(GrammarError::DuplicateNonTerminal(name.to_string()));
            }
            g.add_non_terminal(name);
        }

        match g.get_symbol_index(start) {
            Some(idx) if g.symbols[idx].non_terminal().is_some() => g.start_symbol = Some(idx),
            _ => return Err(GrammarError::UndeclaredStart(start.to_string())),
        }

        Ok(g)
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = &String> {
        self.symbols.iter().filter_map(|s| {
            if let Symbol::Terminal(name) = s {
                Some(name)
            } else {
                None
            }
        })
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols.iter().filter_map(|s| s.non_terminal())
    }

    pub fn non_terminal_iter_mut(&mut self) -> impl Iterator<Item = &mut NonTerminal> {
        self.symbols.iter_mut().filter_map(|s| s.mut_non_terminal())
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        idx
    }

    /// Appends one alternative for `left`. An epsilon alternative is the
    /// single-element sequence `[EPSILON_IDX]`.
    pub fn add_production(&mut self, left: usize, right: Vec<usize>) {
        self.symbols[left]
            .mut_non_terminal()
            .unwrap()
            .productions
            .push(right);
    }

    /// Name-based variant of [`add_production`](Self::add_production).
    /// Unknown right-hand names become terminals; an empty right-hand side
    /// is the epsilon alternative.
    pub fn add_production_named(&mut self, left: &str, right: &[&str]) -> Result<(), GrammarError> {
        let left_idx = match self.get_symbol_index(left) {
            Some(idx) if self.symbols[idx].non_terminal().is_some() => idx,
            _ => return Err(GrammarError::UndeclaredLeftSide(left.to_string())),
        };

        let mut symbols: Vec<usize> = Vec::with_capacity(right.len());
        for &name in right {
            if name == END_MARK {
                return Err(GrammarError::ReservedSymbol(name.to_string()));
            }
            let idx = match self.get_symbol_index(name) {
                Some(idx) => idx,
                None => self.add_terminal(name.to_string()),
            };
            symbols.push(idx);
        }
        if symbols.is_empty() {
            symbols.push(EPSILON_IDX);
        }
        if symbols.len() > 1 && symbols.contains(&EPSILON_IDX) {
            return Err(GrammarError::MisplacedEpsilon);
        }

        self.add_production(left_idx, symbols);
        Ok(())
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::Epsilon => EPSILON,
            Symbol::Terminal(name) => name.as_str(),
            Symbol::NonTerminal(nt) => nt.name.as_str(),
        }
    }

    pub fn production_names(&self, production: &[usize]) -> Vec<&str> {
        production
            .iter()
            .map(|&idx| self.get_symbol_name(idx))
            .collect()
    }
}
