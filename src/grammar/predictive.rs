use std::fmt;

use super::{grammar::Symbol, Grammar, LL1Table, END_MARK, END_MARK_IDX, EPSILON_IDX};

/// One failed parse attempt. The grammar and table are untouched by a
/// failure; the caller can try another input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input token that is not a terminal of the grammar.
    UnknownToken { token: String, position: usize },
    /// No production applies for (stack top, lookahead).
    NoTableEntry { non_terminal: String, lookahead: String },
    /// Stack top is a terminal that does not match the lookahead.
    UnexpectedToken { expected: String, found: String },
    /// The drive loop exceeded its defensive step bound. Only reachable
    /// through a conflicted (non-LL(1)) table.
    StepLimitExceeded { limit: usize },
    /// The grammar has no start symbol to expand.
    MissingStartSymbol,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownToken { token, position } => {
                write!(f, "unknown token {} at position {}", token, position)
            }
            ParseError::NoTableEntry {
                non_terminal,
                lookahead,
            } => write!(f, "no rule for [{}, {}]", non_terminal, lookahead),
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, got {}", expected, found)
            }
            ParseError::StepLimitExceeded { limit } => {
                write!(f, "parse did not terminate within {} steps", limit)
            }
            ParseError::MissingStartSymbol => write!(f, "grammar has no start symbol"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Labeled n-ary tree produced by a successful parse. Each node owns its
/// children; an epsilon expansion is a single ε-labeled leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub symbol: usize,
    pub children: Vec<ParseTree>,
}

impl ParseTree {
    /// Terminal leaf symbols, left to right, epsilon leaves skipped.
    /// For a successful parse this equals the consumed input sequence.
    pub fn terminal_leaves(&self) -> Vec<usize> {
        let mut leaves = Vec::new();
        self.collect_terminal_leaves(&mut leaves);
        leaves
    }

    fn collect_terminal_leaves(&self, leaves: &mut Vec<usize>) {
        if self.children.is_empty() {
            if self.symbol != EPSILON_IDX {
                leaves.push(self.symbol);
            }
        } else {
            for child in &self.children {
                child.collect_terminal_leaves(leaves);
            }
        }
    }
}

/// Nodes are built in an arena while the parse runs and materialized into
/// an owned [`ParseTree`] at the end.
struct NodeArena {
    symbols: Vec<usize>,
    children: Vec<Vec<usize>>,
}

impl NodeArena {
    fn new() -> Self {
        Self {
            symbols: Vec::new(),
            children: Vec::new(),
        }
    }

    fn push(&mut self, symbol: usize) -> usize {
        self.symbols.push(symbol);
        self.children.push(Vec::new());
        self.symbols.len() - 1
    }

    fn attach(&mut self, parent: usize, child: usize) {
        self.children[parent].push(child);
    }

    fn build(&self, index: usize) -> ParseTree {
        ParseTree {
            symbol: self.symbols[index],
            children: self.children[index].iter().map(|&c| self.build(c)).collect(),
        }
    }
}

/// Table-driven parser. Read-only over the grammar; each call to
/// [`parse`](Self::parse) owns its stacks and tree.
pub struct PredictiveParser<'a> {
    grammar: &'a Grammar,
    table: LL1Table,
}

impl<'a> PredictiveParser<'a> {
    /// The table is usually the output of
    /// [`Grammar::build_ll1_table`](Grammar::build_ll1_table); a table with
    /// conflicts still parses with its first-registered entries.
    pub fn new(grammar: &'a Grammar, table: LL1Table) -> Self {
        Self { grammar, table }
    }

    pub fn table(&self) -> &LL1Table {
        &self.table
    }

    /// Runs the stack-based drive loop over `input` (terminal names; the
    /// `$` end marker is appended internally).
    pub fn parse(&self, input: &[&str]) -> Result<ParseTree, ParseError> {
        let grammar = self.grammar;
        let start = grammar.start_symbol.ok_or(ParseError::MissingStartSymbol)?;

        let mut tokens: Vec<usize> = Vec::with_capacity(input.len() + 1);
        for (position, &token) in input.iter().enumerate() {
            match grammar.get_symbol_index(token) {
                Some(idx) if grammar.symbols[idx].is_terminal() => tokens.push(idx),
                _ => {
                    return Err(ParseError::UnknownToken {
                        token: token.to_string(),
                        position,
                    })
                }
            }
        }
        tokens.push(END_MARK_IDX);

        let mut nodes = NodeArena::new();
        let root = nodes.push(start);

        // Bottom of the symbol stack is $; the node stack carries a
        // matching sentinel so both stacks always have equal depth.
        let mut symbol_stack: Vec<usize> = vec![END_MARK_IDX, start];
        let mut node_stack: Vec<Option<usize>> = vec![None, Some(root)];

        let limit = self.step_limit(input.len());
        let mut steps = 0usize;
        let mut cursor = 0usize;

        while symbol_stack.len() > 1 {
            debug_assert_eq!(symbol_stack.len(), node_stack.len());

            steps += 1;
            if steps > limit {
                return Err(ParseError::StepLimitExceeded { limit });
            }

            let top = *symbol_stack.last().unwrap();
            let lookahead = tokens.get(cursor).copied().unwrap_or(END_MARK_IDX);

            match &grammar.symbols[top] {
                Symbol::Terminal(_) if top == lookahead => {
                    symbol_stack.pop();
                    node_stack.pop();
                    cursor += 1;
                }
                Symbol::NonTerminal(_) => {
                    let reference = match self.table.get(top, lookahead) {
                        Some(r) => r,
                        None => {
                            return Err(ParseError::NoTableEntry {
                                non_terminal: grammar.get_symbol_name(top).to_string(),
                                lookahead: grammar.get_symbol_name(lookahead).to_string(),
                            })
                        }
                    };

                    symbol_stack.pop();
                    let current = node_stack.pop().unwrap().unwrap();

                    let production = grammar.production(reference).to_vec();
                    if production == [EPSILON_IDX] {
                        let child = nodes.push(EPSILON_IDX);
                        nodes.attach(current, child);
                    } else {
                        // Children hang under the current node left to
                        // right; both stacks grow right to left so their
                        // tops stay aligned.
                        let mut child_nodes = Vec::with_capacity(production.len());
                        for &symbol in &production {
                            let child = nodes.push(symbol);
                            nodes.attach(current, child);
                            child_nodes.push(child);
                        }
                        for (&symbol, &child) in
                            production.iter().zip(child_nodes.iter()).rev()
                        {
                            symbol_stack.push(symbol);
                            node_stack.push(Some(child));
                        }
                    }
                }
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        expected: grammar.get_symbol_name(top).to_string(),
                        found: grammar.get_symbol_name(lookahead).to_string(),
                    })
                }
            }
        }

        if cursor == tokens.len() - 1 {
            Ok(nodes.build(root))
        } else {
            Err(ParseError::UnexpectedToken {
                expected: END_MARK.to_string(),
                found: tokens
                    .get(cursor)
                    .map(|&t| grammar.get_symbol_name(t))
                    .unwrap_or(END_MARK)
                    .to_string(),
            })
        }
    }

    /// A correctly built LL(1) table consumes a token or shrinks the
    /// stack every few steps; a loop that revisits the same configuration
    /// would run forever, so the drive loop carries this generous bound.
    fn step_limit(&self, input_len: usize) -> usize {
        let productions: usize = self
            .grammar
            .non_terminal_iter()
            .map(|nt| nt.productions.len())
            .sum();
        (input_len + 2) * (self.grammar.symbols.len() + 1) * (productions + 1)
    }
}
