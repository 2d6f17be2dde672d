extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{
    Grammar, GrammarError, LL1Table, ParseError, ParseTree, PredictiveParser,
};

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(mut g) => {
            g.calculate_first_follow();
            g.to_first_follow_output_vec().to_json()
        }
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(mut g) => {
            let table = g.build_ll1_table();
            g.ll1_table_output(&table).to_json()
        }
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

#[wasm_bindgen]
pub fn parse_to_json(grammar: &str, input: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(mut g) => {
            let table = g.build_ll1_table();
            let parser = PredictiveParser::new(&g, table);
            let tokens: Vec<&str> = input.split_whitespace().collect();
            match parser.parse(&tokens) {
                Ok(tree) => g.tree_output(&tree).to_json(),
                Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
            }
        }
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}


#[cfg(test)]
mod declaration_tests {
    use crate::grammar::{GrammarError, EPSILON_IDX};
    use crate::Grammar;

    #[test]
    fn valid_declarations() {
        let mut g = Grammar::with_declarations(&["S", "A"], "S").unwrap();
        g.add_production_named("S", &["A", "b"]).unwrap();
        g.add_production_named("A", &[]).unwrap();

        let s = g.symbol_table["S"];
        let a = g.symbol_table["A"];
        assert_eq!(g.start_symbol, Some(s));
        assert!(g.symbols[g.symbol_table["b"]].is_terminal());
        assert_eq!(
            g.symbols[a].non_terminal().unwrap().productions[0],
            vec![EPSILON_IDX]
        );
    }

    #[test]
    fn empty_declaration_list() {
        assert_eq!(
            Grammar::with_declarations(&[], "S").unwrap_err(),
            GrammarError::EmptyNonTerminalSet
        );
    }

    #[test]
    fn duplicate_declaration() {
        assert_eq!(
            Grammar::with_declarations(&["S", "S"], "S").unwrap_err(),
            GrammarError::DuplicateNonTerminal("S".to_string())
        );
    }

    #[test]
    fn reserved_names_rejected() {
        assert_eq!(
            Grammar::with_declarations(&["S", "$"], "S").unwrap_err(),
            GrammarError::ReservedSymbol("$".to_string())
        );
    }

    #[test]
    fn undeclared_start() {
        assert_eq!(
            Grammar::with_declarations(&["S"], "X").unwrap_err(),
            GrammarError::UndeclaredStart("X".to_string())
        );
    }

    #[test]
    fn epsilon_alongside_other_symbols_is_rejected() {
        let mut g = Grammar::with_declarations(&["S"], "S").unwrap();
        assert_eq!(
            g.add_production_named("S", &["a", "ε"]),
            Err(GrammarError::MisplacedEpsilon)
        );
        // a lone ε is still the epsilon alternative
        g.add_production_named("S", &["ε"]).unwrap();
        let s = g.symbol_table["S"];
        assert_eq!(
            g.symbols[s].non_terminal().unwrap().productions[0],
            vec![EPSILON_IDX]
        );
    }

    #[test]
    fn end_marker_in_right_side_is_rejected() {
        let mut g = Grammar::with_declarations(&["S"], "S").unwrap();
        assert_eq!(
            g.add_production_named("S", &["$"]),
            Err(GrammarError::ReservedSymbol("$".to_string()))
        );
    }

    #[test]
    fn undeclared_left_side() {
        let mut g = Grammar::with_declarations(&["S"], "S").unwrap();
        assert_eq!(
            g.add_production_named("A", &["a"]),
            Err(GrammarError::UndeclaredLeftSide("A".to_string()))
        );
    }
}



#[cfg(test)]
mod predictive_tests {
    use pretty_assertions::assert_eq;

    use crate::grammar::{ParseError, PredictiveParser, EPSILON_IDX};
    use crate::Grammar;

    const EXPR: &str = "E -> T E'
E' -> + T E' | ε
T -> F T'
T' -> * F T' | ε
F -> ( E ) | id";

    fn leaf_names(g: &Grammar, tree: &crate::ParseTree) -> Vec<String> {
        tree.terminal_leaves()
            .iter()
            .map(|&s| g.get_symbol_name(s).to_string())
            .collect()
    }

    #[test]
    fn parses_expression_and_reproduces_input() {
        let mut g = Grammar::parse(EXPR).unwrap();
        let table = g.build_ll1_table();
        let parser = PredictiveParser::new(&g, table);

        let input = ["id", "+", "id", "*", "id"];
        let tree = parser.parse(&input).unwrap();

        assert_eq!(tree.symbol, g.start_symbol.unwrap());
        assert_eq!(leaf_names(&g, &tree), input);
    }

    #[test]
    fn parses_nested_parentheses() {
        let mut g = Grammar::parse(EXPR).unwrap();
        let table = g.build_ll1_table();
        let parser = PredictiveParser::new(&g, table);

        let input = ["(", "id", "+", "id", ")", "*", "id"];
        let tree = parser.parse(&input).unwrap();
        assert_eq!(leaf_names(&g, &tree), input);
    }

    #[test]
    fn epsilon_expansion_is_a_single_epsilon_leaf() {
        let mut g = Grammar::parse(EXPR).unwrap();
        let table = g.build_ll1_table();
        let parser = PredictiveParser::new(&g, table);

        let tree = parser.parse(&["id"]).unwrap();

        // E -> T E', E' -> ε: the E' child holds exactly one ε leaf
        let e_prime = &tree.children[1];
        assert_eq!(e_prime.symbol, g.symbol_table["E'"]);
        assert_eq!(e_prime.children.len(), 1);
        assert_eq!(e_prime.children[0].symbol, EPSILON_IDX);
        assert!(e_prime.children[0].children.is_empty());
    }

    #[test]
    fn trailing_operator_is_a_structured_error() {
        let mut g = Grammar::parse(EXPR).unwrap();
        let table = g.build_ll1_table();
        let parser = PredictiveParser::new(&g, table);

        match parser.parse(&["id", "+"]) {
            Err(ParseError::NoTableEntry {
                non_terminal,
                lookahead,
            }) => {
                assert_eq!(non_terminal, "T");
                assert_eq!(lookahead, "$");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn failed_parse_does_not_mutate_the_grammar() {
        let mut g = Grammar::parse(EXPR).unwrap();
        let table = g.build_ll1_table();

        let first_before = g.first_of("E").unwrap();
        let follow_before = g.follow_of("E'").unwrap();

        let parser = PredictiveParser::new(&g, table);
        assert!(parser.parse(&["id", "+"]).is_err());

        assert_eq!(g.first_of("E").unwrap(), first_before);
        assert_eq!(g.follow_of("E'").unwrap(), follow_before);
    }

    #[test]
    fn unknown_token_is_rejected_up_front() {
        let mut g = Grammar::parse(EXPR).unwrap();
        let table = g.build_ll1_table();
        let parser = PredictiveParser::new(&g, table);

        match parser.parse(&["id", "?", "id"]) {
            Err(ParseError::UnknownToken { token, position }) => {
                assert_eq!(token, "?");
                assert_eq!(position, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // non-terminal names are not valid input tokens either
        assert!(matches!(
            parser.parse(&["E"]),
            Err(ParseError::UnknownToken { .. })
        ));
    }

    #[test]
    fn leftover_input_is_an_error() {
        let mut g = Grammar::parse("S -> a").unwrap();
        let table = g.build_ll1_table();
        let parser = PredictiveParser::new(&g, table);

        match parser.parse(&["a", "a"]) {
            Err(ParseError::UnexpectedToken { expected, found }) => {
                assert_eq!(expected, "$");
                assert_eq!(found, "a");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn left_recursive_table_hits_the_step_bound() {
        // A -> A a keeps re-selecting itself at the same position; the
        // conflicted table must trip the bound instead of looping.
        let mut g = Grammar::parse("A -> A a | a").unwrap();
        let table = g.build_ll1_table();
        assert!(!table.is_ll1());

        let parser = PredictiveParser::new(&g, table);
        assert!(matches!(
            parser.parse(&["a"]),
            Err(ParseError::StepLimitExceeded { .. })
        ));
    }

    #[test]
    fn empty_input_parses_a_nullable_start() {
        let mut g = Grammar::parse("S -> a | ε").unwrap();
        let table = g.build_ll1_table();
        let parser = PredictiveParser::new(&g, table);

        let tree = parser.parse(&[]).unwrap();
        assert_eq!(leaf_names(&g, &tree), Vec::<String>::new());
    }
}

#[cfg(test)]
mod output_tests {
    use crate::Grammar;

    const EXPR: &str = "E -> T E'
E' -> + T E' | ε
T -> F T'
T' -> * F T' | ε
F -> ( E ) | id";

    #[test]
    fn production_output_lists_alternatives() {
        let g = Grammar::parse(EXPR).unwrap();
        let text = g.to_production_output_vec().to_plaintext();
        assert!(text.contains("E -> T E'"));
        assert!(text.contains("F -> ( E ) | id"));
    }

    #[test]
    fn first_follow_output_includes_nullability() {
        let mut g = Grammar::parse(EXPR).unwrap();
        g.calculate_first_follow();
        let text = g.to_first_follow_output_vec().to_plaintext();
        assert!(text.contains("E' | true"));
        assert!(text.contains("E | false"));
    }

    #[test]
    fn table_output_renders_cells_and_conflicts() {
        let mut g = Grammar::parse("A -> a | a B\nB -> b").unwrap();
        let table = g.build_ll1_table();
        let text = g.ll1_table_output(&table).to_plaintext();
        assert!(text.contains("A -> a"));
        assert!(text.contains("conflict at [A, a]"));
    }

    #[test]
    fn tree_renders_with_indentation() {
        let mut g = Grammar::parse("S -> a").unwrap();
        let table = g.build_ll1_table();
        let parser = crate::PredictiveParser::new(&g, table);
        let tree = parser.parse(&["a"]).unwrap();
        assert_eq!(g.tree_to_plaintext(&tree), "S\n  a\n");
    }

    #[test]
    fn json_outputs_are_well_formed() {
        let json = crate::first_follow_to_json(EXPR);
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());

        let json = crate::ll1_table_to_json(EXPR);
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());

        let json = crate::parse_to_json(EXPR, "id + id");
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());

        let json = crate::parse_to_json(EXPR, "id +");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("error").is_some());
    }

    #[test]
    fn error_json_escapes_quotes() {
        // the unknown-token message embeds the token itself
        let json = crate::parse_to_json(EXPR, "id \" id");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["error"].as_str().unwrap().contains('"'));

        let json = crate::first_follow_to_json("S -> a -> b");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("error").is_some());
    }
}
