use crowbook_text_processing::escape;
use serde::Serialize;

use super::{ll1_table::LL1Table, predictive::ParseTree, Grammar, EPSILON};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub alternatives: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize) -> String {
        let rights = self
            .alternatives
            .iter()
            .map(|right| right.join(" "))
            .collect::<Vec<_>>()
            .join(" | ");
        format!("{:>width$} -> {}", self.left, rights, width = left_width)
    }

    pub fn to_latex(&self) -> String {
        let rights = self
            .alternatives
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        format!("{} & \\rightarrow & {}", escape::tex(self.left), rights)
            .replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_width = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|p| p.to_plaintext(left_width))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|p| p.to_latex()))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<_>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[derive(Debug, Serialize)]
struct FirstFollowOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl FirstFollowOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn set(items: &[&str]) -> String {
            items
                .iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join("\\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            set(&self.first),
            set(&self.follow)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct FirstFollowOutputVec<'a> {
    data: Vec<FirstFollowOutput<'a>>,
}

impl FirstFollowOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|e| e.to_plaintext())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[derive(Debug, Serialize)]
pub struct ConflictOutput<'a> {
    pub non_terminal: &'a str,
    pub terminal: &'a str,
    pub kept: String,
    pub discarded: String,
}

#[derive(Debug, Serialize)]
pub struct LL1TableOutput<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<Option<String>>)>,
    conflicts: Vec<ConflictOutput<'a>>,
}

impl LL1TableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(row.iter().map(|cell| cell.clone().unwrap_or_default()));
            output.push(line);
        }

        let mut width = vec![0; self.terminals.len() + 1];
        for j in 0..output[0].len() {
            width[j] = output.iter().map(|line| line[j].len()).max().unwrap();
        }
        let grid = output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        if self.conflicts.is_empty() {
            grid
        } else {
            let conflicts = self
                .conflicts
                .iter()
                .map(|c| {
                    format!(
                        "conflict at [{}, {}]: kept {}, discarded {}",
                        c.non_terminal, c.terminal, c.kept, c.discarded
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            grid + "\n" + &conflicts
        }
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let body = self
            .rows
            .iter()
            .map(|(left, row)| {
                let mut line: Vec<String> = vec![escape::tex(*left).to_string()];
                line.extend(row.iter().map(|cell| {
                    cell.as_deref()
                        .map(|s| {
                            format!("\\text{{{}}}", escape::tex(s)).replace(EPSILON, "\\epsilon")
                        })
                        .unwrap_or_default()
                }));
                line.join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &body + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[derive(Debug, Serialize)]
pub struct ParseTreeOutput<'a> {
    symbol: &'a str,
    children: Vec<ParseTreeOutput<'a>>,
}

impl ParseTreeOutput<'_> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .non_terminal_iter()
            .map(|nt| ProductionOutput {
                left: nt.name.as_str(),
                alternatives: nt
                    .productions
                    .iter()
                    .map(|p| self.production_names(p))
                    .collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }

    pub fn to_first_follow_output_vec(&self) -> FirstFollowOutputVec {
        let data = self
            .non_terminal_iter()
            .map(|nt| {
                let mut entry = FirstFollowOutput {
                    name: nt.name.as_str(),
                    nullable: nt.nullable(),
                    first: nt
                        .first
                        .iter()
                        .map(|&idx| self.get_symbol_name(idx))
                        .collect(),
                    follow: nt
                        .follow
                        .iter()
                        .map(|&idx| self.get_symbol_name(idx))
                        .collect(),
                };
                entry.first.sort_unstable();
                entry.follow.sort_unstable();
                entry
            })
            .collect();
        FirstFollowOutputVec { data }
    }

    fn render_production(&self, reference: super::ProductionRef) -> String {
        format!(
            "{} -> {}",
            self.get_symbol_name(reference.left),
            self.production_names(self.production(reference)).join(" ")
        )
    }

    pub fn ll1_table_output(&self, table: &LL1Table) -> LL1TableOutput {
        let terminals: Vec<&str> = self.terminal_iter().map(|t| t.as_str()).collect();
        let columns: Vec<usize> = terminals
            .iter()
            .map(|&t| self.get_symbol_index(t).unwrap())
            .collect();

        let rows = self
            .non_terminal_iter()
            .map(|nt| {
                let row = columns
                    .iter()
                    .map(|&terminal| {
                        table
                            .get(nt.index, terminal)
                            .map(|reference| self.render_production(reference))
                    })
                    .collect();
                (nt.name.as_str(), row)
            })
            .collect();

        let conflicts = table
            .conflicts()
            .iter()
            .map(|c| ConflictOutput {
                non_terminal: self.get_symbol_name(c.non_terminal),
                terminal: self.get_symbol_name(c.terminal),
                kept: self.render_production(c.kept),
                discarded: self.render_production(c.discarded),
            })
            .collect();

        LL1TableOutput {
            terminals,
            rows,
            conflicts,
        }
    }

    pub fn tree_output<'a>(&'a self, tree: &ParseTree) -> ParseTreeOutput<'a> {
        ParseTreeOutput {
            symbol: self.get_symbol_name(tree.symbol),
            children: tree.children.iter().map(|c| self.tree_output(c)).collect(),
        }
    }

    pub fn tree_to_plaintext(&self, tree: &ParseTree) -> String {
        let mut out = String::new();
        self.render_tree(tree, 0, &mut out);
        out
    }

    fn render_tree(&self, node: &ParseTree, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(self.get_symbol_name(node.symbol));
        out.push('\n');
        for child in &node.children {
            self.render_tree(child, depth + 1, out);
        }
    }
}
