//! Brace Templates
//!
//! Path templates use `{name}` placeholders, optionally with a constraint
//! after a comma (`{sample,[^/]+}`), the way the orchestration engine writes
//! them. Placeholders without a value are left in place so the engine can
//! resolve them later.

/// Renders `text`, asking `lookup` for each placeholder's value.
///
/// `lookup` receives the placeholder name with any constraint stripped.
/// `{{` and `}}` render as literal `{` and `}`. Other unmatched braces are
/// copied through verbatim.
pub(crate) fn render<F>(text: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut rendered = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(brace) = rest.find(['{', '}']) {
        rendered.push_str(&rest[..brace]);
        let tail = &rest[brace..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            rendered.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            rendered.push('}');
            rest = &tail[1..];
            continue;
        }

        let after = &tail[1..];
        match after.find(['{', '}']) {
            Some(close) if close > 0 && after.as_bytes()[close] == b'}' => {
                let body = &after[..close];
                match lookup(placeholder_name(body)) {
                    Some(value) => rendered.push_str(&value),
                    None => {
                        rendered.push('{');
                        rendered.push_str(body);
                        rendered.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                rendered.push('{');
                rest = after;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

/// Strips a `,constraint` suffix from a placeholder body.
fn placeholder_name(body: &str) -> &str {
    body.split(',').next().unwrap_or(body).trim()
}

/// Checks if a string contains at least one placeholder.
pub fn has_placeholders(text: &str) -> bool {
    !placeholder_names(text).is_empty()
}

/// Extracts placeholder names from a template, in order of appearance.
///
/// # Example
/// ```
/// use rattle::paths::template::placeholder_names;
///
/// let names = placeholder_names("{sample}/{sample}-{read_group,\\w+}.bam");
/// assert_eq!(names, vec!["sample", "sample", "read_group"]);
/// ```
pub fn placeholder_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    render(text, |name| {
        names.push(name.to_string());
        None
    });
    names
}

/// Returns `name` if the whole of `text` is a single `{name}` placeholder.
///
/// # Example
/// ```
/// use rattle::paths::template::placeholder_key;
///
/// assert_eq!(placeholder_key("{mate}"), Some("mate"));
/// assert_eq!(placeholder_key("r1"), None);
/// assert_eq!(placeholder_key("{mate}.fq"), None);
/// ```
pub fn placeholder_key(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains(['{', '}']) {
        return None;
    }
    Some(placeholder_name(inner))
}

/// Substitutes every placeholder that has a value in `values`.
///
/// # Example
/// ```
/// use rattle::paths::template::substitute;
///
/// let path = substitute("out/{sample}-{read_group}.txt", [("sample", "s1")]);
/// assert_eq!(path, "out/s1-{read_group}.txt");
/// ```
pub fn substitute<'a, I>(text: &str, values: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let values: Vec<(&str, &str)> = values.into_iter().collect();
    render(text, |name| {
        values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("{sample}.fastq"));
        assert!(has_placeholders("output/{id}.txt"));
        assert!(!has_placeholders("regular_file.txt"));
        assert!(!has_placeholders("odd}{braces"));
        assert!(!has_placeholders("{}"));
    }

    #[test]
    fn test_placeholder_names() {
        assert_eq!(placeholder_names("reads/{sample}.fastq"), vec!["sample"]);
        assert_eq!(
            placeholder_names("{id}_{replicate}.txt"),
            vec!["id", "replicate"]
        );
    }

    #[test]
    fn test_placeholder_names_with_constraint() {
        assert_eq!(placeholder_names("{sample,[A-Z]+}.bam"), vec!["sample"]);
    }

    #[test]
    fn test_substitute_known_values() {
        let result = substitute(
            "results/output-{sample}-{read_group}.txt",
            [("sample", "sample01"), ("read_group", "rg01")],
        );
        assert_eq!(result, "results/output-sample01-rg01.txt");
    }

    #[test]
    fn test_substitute_keeps_unknown_placeholders() {
        let result = substitute("{sample}/{unknown,\\d+}.txt", [("sample", "s1")]);
        assert_eq!(result, "s1/{unknown,\\d+}.txt");
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        let result = substitute("{a}-{b}", [("a", "{b}"), ("b", "x")]);
        assert_eq!(result, "{b}-x");
    }

    #[test]
    fn test_unbalanced_braces_pass_through() {
        assert_eq!(substitute("a{b", [("b", "x")]), "a{b");
        assert_eq!(substitute("a}b", [("b", "x")]), "a}b");
        assert_eq!(substitute("{{b}", [("b", "x")]), "{b}");
    }

    #[test]
    fn test_doubled_braces_are_literal() {
        assert_eq!(
            substitute("{sample}.{{ext}}", [("sample", "s1"), ("ext", "bam")]),
            "s1.{ext}"
        );
        assert_eq!(substitute("{{sample}}", [("sample", "s1")]), "{sample}");
        assert_eq!(substitute("a}}b{{c", Vec::<(&str, &str)>::new()), "a}b{c");
        assert_eq!(placeholder_names("{{literal}}/{sample}"), vec!["sample"]);
    }

    #[test]
    fn test_placeholder_key() {
        assert_eq!(placeholder_key("{r1}"), Some("r1"));
        assert_eq!(placeholder_key("{mate,r[12]}"), Some("mate"));
        assert_eq!(placeholder_key("{}"), None);
        assert_eq!(placeholder_key("{a}{b}"), None);
        assert_eq!(placeholder_key("plain"), None);
    }
}
