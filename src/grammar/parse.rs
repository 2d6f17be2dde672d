use super::{Grammar, GrammarError, END_MARK, EPSILON, EPSILON_IDX};

/// Spellings accepted for the empty-string symbol in grammar text.
const EPSILON_ALIASES: [&str; 4] = ["ε", "ϵ", "Є", "eps"];

fn normalize_epsilon(token: &str) -> &str {
    if EPSILON_ALIASES.contains(&token) {
        EPSILON
    } else {
        token
    }
}

impl Grammar {
    /// Parses grammar text of the form `A -> a B | ε`, one rule per line.
    /// A line starting with `|` continues the previous left side. Every
    /// left side becomes a non-terminal, the first one the start symbol;
    /// all remaining names are terminals.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut g = Self::new();

        let mut raw_productions: Vec<(usize, &str, usize)> = Vec::new();

        let mut previous_left: Option<usize> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(GrammarError::Syntax {
                    line: i + 1,
                    message: "too many \"->\"".to_string(),
                });
            }
            let (left, rights): (usize, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(GrammarError::Syntax {
                        line: i + 1,
                        message: "empty left side".to_string(),
                    });
                }
                if left_str.split_whitespace().count() != 1 {
                    return Err(GrammarError::Syntax {
                        line: i + 1,
                        message: "left side contains whitespace".to_string(),
                    });
                }
                let left = match g.get_symbol_index(left_str) {
                    Some(idx) if g.symbols[idx].non_terminal().is_some() => idx,
                    Some(_) => {
                        return Err(GrammarError::Syntax {
                            line: i + 1,
                            message: format!("{} cannot be a left side", left_str),
                        })
                    }
                    None => g.add_non_terminal(left_str),
                };
                (left, parts[1].trim())
            } else {
                let rest = parts[0].trim();
                match (previous_left, rest.starts_with('|')) {
                    (Some(idx), true) => (idx, rest[1..].trim()),
                    _ => {
                        return Err(GrammarError::Syntax {
                            line: i + 1,
                            message: "cannot find left side".to_string(),
                        })
                    }
                }
            };

            previous_left = Some(left);

            raw_productions.push((left, rights, i + 1));
        }

        for (left, rights, line) in raw_productions {
            for right in rights.split('|') {
                let mut symbols: Vec<usize> = Vec::new();
                for token in right.split_whitespace().map(normalize_epsilon) {
                    if token == END_MARK {
                        return Err(GrammarError::Syntax {
                            line,
                            message: format!(
                                "{} is reserved and cannot appear in a production",
                                END_MARK
                            ),
                        });
                    }
                    let idx = match g.get_symbol_index(token) {
                        Some(idx) => idx,
                        None => g.add_terminal(token.to_string()),
                    };
                    symbols.push(idx);
                }
                if symbols.is_empty() {
                    symbols.push(EPSILON_IDX);
                }
                if symbols.len() > 1 && symbols.contains(&EPSILON_IDX) {
                    return Err(GrammarError::Syntax {
                        line,
                        message: format!(
                            "{} cannot appear alongside other symbols in an alternative",
                            EPSILON
                        ),
                    });
                }
                g.add_production(left, symbols);
            }
        }

        let start_symbol = g.non_terminal_iter().next().map(|nt| nt.index);
        g.start_symbol = start_symbol;

        Ok(g)
    }
}
