use nu_ansi_term::Color::{Cyan, Yellow};
use querytext_core::Operator;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};

use crate::{error::CliResult, utils::Colored};

#[derive(Debug, Serialize)]
pub struct OperatorEntry {
    pub name: &'static str,
    pub token: &'static str,
    pub case_insensitive: bool,
    pub insensitive_form: Option<&'static str>,
}

impl From<Operator> for OperatorEntry {
    fn from(op: Operator) -> Self {
        Self {
            name: op.name(),
            token: op.token(),
            case_insensitive: op.is_case_insensitive(),
            insensitive_form: op.case_insensitive().map(Operator::token),
        }
    }
}

pub fn operator_entries() -> Vec<OperatorEntry> {
    Operator::ALL.into_iter().map(OperatorEntry::from).collect()
}

fn operator_table(entries: &[OperatorEntry]) -> String {
    let mut builder = Builder::new();
    builder.push_record(["Name", "Token", "[c] form"]);
    for entry in entries {
        builder.push_record([
            entry.name.to_string(),
            format!("{}", Colored(Cyan, entry.token)),
            entry
                .insensitive_form
                .map(|token| format!("{}", Colored(Yellow, token)))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    builder
        .build()
        .with(Panel::header("Operators"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string()
}

pub fn list_operators(json: bool) -> CliResult<()> {
    let entries = operator_entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", operator_table(&entries));
    }

    Ok(())
}
