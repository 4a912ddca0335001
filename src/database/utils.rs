use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?").expect("placeholder pattern is valid"));

/// Collapses whitespace of a query and numbers its `?` placeholders as `$1, $2, ...`.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 0;
    PLACEHOLDER
        .replace_all(&cleaned, |_: &Captures| {
            param_index += 1;
            format!("${}", param_index)
        })
        .into_owned()
}
