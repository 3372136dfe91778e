use std::any::type_name;

use documented::{Documented, DocumentedFields};
use toml_edit::{Decor, DocumentMut, Item, RawString, Table};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Appends each line of `docs` to the prefix of `decor` as a `#` comment.
///
/// Blank documentation lines become a bare `#`. An existing prefix is kept,
/// separated from the new comments by a `#` line unless it already ends in a
/// blank line.
pub fn append_docs_as_toml_comments(decor: &mut Decor, docs: &str) {
    let old_prefix = decor.prefix().and_then(RawString::as_str).unwrap_or("");

    let comments: String = docs
        .lines()
        .map(|line| {
            if line.is_empty() {
                "#\n".to_string()
            } else {
                format!("# {line}\n")
            }
        })
        .collect();

    let new_prefix = match old_prefix.lines().last() {
        None => format!("{old_prefix}{comments}"),
        Some("") => format!("{old_prefix}{comments}"),
        Some(_) => format!("{old_prefix}#\n{comments}"),
    };
    decor.set_prefix(new_prefix);
}

/// Annotates every key of `table` with the doc comment of the matching field
/// of `T`.
///
/// Non-root tables also get `T`'s own doc comment above their header. Keys
/// with no matching field are logged and left as they are.
pub fn annotate_toml_table<T>(table: &mut Table, is_root: bool) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    if !is_root {
        append_docs_as_toml_comments(table.decor_mut(), T::DOCS);
    }

    for (mut key, item) in table.iter_mut() {
        let key_str = key.get().to_string();
        let Ok(docs) = T::get_field_docs(&key_str) else {
            warn!(
                "Field '{}' has no documentation in '{}', leaving it unannotated",
                key_str,
                type_name::<T>()
            );
            continue;
        };

        match item {
            Item::None => return Err(ConfigError::UnexpectedTomlItem(key_str)),
            Item::Value(_) => append_docs_as_toml_comments(key.leaf_decor_mut(), docs),
            Item::Table(sub_table) => append_docs_as_toml_comments(sub_table.decor_mut(), docs),
            Item::ArrayOfTables(array) => {
                if let Some(first) = array.iter_mut().next() {
                    append_docs_as_toml_comments(first.decor_mut(), docs);
                }
            }
        }
    }

    Ok(())
}

/// Appends `key` as a commented-out example after the last item of `doc`,
/// preceded by the doc comment of the matching field of `T`.
///
/// Used for optional fields that are unset and so absent from the serialized
/// document. Keys already present are left alone.
pub fn append_commented_field<T>(doc: &mut DocumentMut, key: &str, example: &str)
where
    T: DocumentedFields,
{
    if doc.contains_key(key) {
        return;
    }

    let Ok(docs) = T::get_field_docs(key) else {
        warn!(
            "Field '{}' has no documentation in '{}', not adding an example",
            key,
            type_name::<T>()
        );
        return;
    };

    let mut decor = Decor::new("", "");
    append_docs_as_toml_comments(&mut decor, docs);
    let comments = decor.prefix().and_then(RawString::as_str).unwrap_or("");

    let trailing = doc.trailing().as_str().unwrap_or("").to_string();
    doc.set_trailing(format!("{trailing}\n{comments}# {key} = {example}\n"));
}
