use super::model::{IdSequence, Query, SectionMap};

const HEADER_PREFIX: &str = "-- Query ";
const COMMENT_PREFIX: &str = "--";
const FALLBACK_MIN_FRAGMENT_CHARS: usize = 20;
const FALLBACK_TITLE_MAX_CHARS: usize = 50;
const FALLBACK_TITLE: &str = "SQL Query";

/// Fixed description assigned to queries synthesized by the fallback splitter.
pub const AUTO_EXTRACTED_DESCRIPTION: &str = "Auto-extracted query";

/// Line-oriented parser over the `-- Query <n>.<n>: <title>` convention.
///
/// Pure function of its input: never fails, never returns a query with empty
/// SQL. Malformed headers are ordinary comment lines rather than errors.
#[derive(Debug, Default)]
pub struct QueryParser {
    sections: SectionMap,
}

impl QueryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sections(sections: SectionMap) -> Self {
        Self { sections }
    }

    /// Parses one source file's text into an ordered sequence of queries.
    ///
    /// When no header-style query is found the whole text is re-scanned by the
    /// fallback splitter; the two passes are never merged for a single file.
    pub fn parse(&self, text: &str, source_name: &str, ids: &mut IdSequence) -> Vec<Query> {
        let section = self.sections.section_for(source_name);
        let mut queries = Vec::new();
        let mut current: Option<Query> = None;
        let mut in_body = false;

        for raw_line in text.lines() {
            let line = raw_line.trim();

            if let Some((number, title)) = parse_header(line) {
                if let Some(query) = current.take() {
                    if !query.sql.trim().is_empty() {
                        queries.push(query);
                    }
                }
                current = Some(Query {
                    id: header_id(section, number, ids.next_token()),
                    number: number.to_string(),
                    title: title.to_string(),
                    sql: String::new(),
                    section: section.to_string(),
                    filename: source_name.to_string(),
                    description: String::new(),
                });
                in_body = true;
            } else if let Some(comment) = line.strip_prefix(COMMENT_PREFIX) {
                // First comment line after the header becomes the description.
                // The slot stays open until filled, even once the body ended.
                if let Some(query) = current.as_mut() {
                    if query.description.is_empty() {
                        query.description = comment.trim().to_string();
                    }
                }
            } else if in_body && !line.is_empty() {
                if let Some(query) = current.as_mut() {
                    query.sql.push_str(line);
                    query.sql.push('\n');
                    if line.ends_with(';') {
                        in_body = false;
                    }
                }
            }
        }

        if let Some(query) = current {
            if !query.sql.trim().is_empty() {
                queries.push(query);
            }
        }

        if queries.is_empty() {
            self.extract_fallback(text, source_name, section, ids)
        } else {
            queries
        }
    }

    /// Splits the raw text on `;` and synthesizes a query per fragment that is
    /// long enough to plausibly be a statement.
    fn extract_fallback(
        &self,
        text: &str,
        source_name: &str,
        section: &str,
        ids: &mut IdSequence,
    ) -> Vec<Query> {
        text.split(';')
            .map(str::trim)
            .filter(|fragment| fragment.chars().count() > FALLBACK_MIN_FRAGMENT_CHARS)
            .enumerate()
            .map(|(index, fragment)| Query {
                id: fallback_id(section, index, ids.next_token()),
                number: format!("{}.0", index + 1),
                title: extract_title(fragment),
                sql: format!("{fragment};"),
                section: section.to_string(),
                filename: source_name.to_string(),
                description: AUTO_EXTRACTED_DESCRIPTION.to_string(),
            })
            .collect()
    }
}

/// Matches the trimmed line against `-- Query <int>.<int>: <title>`.
///
/// Returns the number and trimmed title; anything that does not match
/// exactly is not a header.
fn parse_header(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(HEADER_PREFIX)?;
    let (number, title) = rest.split_once(':')?;
    let number = number.trim();
    let (major, minor) = number.split_once('.')?;
    if !is_integer(major) || !is_integer(minor) {
        return None;
    }
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some((number, title))
}

fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn header_id(section: &str, number: &str, token: u64) -> String {
    format!("{}_{}_{}", section, number.replace('.', "_"), token)
}

fn fallback_id(section: &str, index: usize, token: u64) -> String {
    format!("{section}_custom_{index}_{token}")
}

/// Derives a display title from the first line of a fallback fragment.
fn extract_title(fragment: &str) -> String {
    let first_line = fragment.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return FALLBACK_TITLE.to_string();
    }
    if first_line.chars().count() > FALLBACK_TITLE_MAX_CHARS {
        let truncated: String = first_line.chars().take(FALLBACK_TITLE_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, source_name: &str) -> Vec<Query> {
        let mut ids = IdSequence::new();
        QueryParser::new().parse(text, source_name, &mut ids)
    }

    #[test]
    fn parses_single_header_query() {
        let text = "-- Query 2.3: Foo Bar\nSELECT *\nFROM people;\n";
        let queries = parse(text, "demographics.sql");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].number, "2.3");
        assert_eq!(queries[0].title, "Foo Bar");
        assert_eq!(queries[0].sql, "SELECT *\nFROM people;\n");
        assert_eq!(queries[0].section, "Demographics");
        assert_eq!(queries[0].filename, "demographics.sql");
        assert_eq!(queries[0].description, "");
    }

    #[test]
    fn parses_multiple_queries_in_order() {
        let text = "\
-- Query 1.1: First
SELECT 1 FROM a;

-- Query 1.2: Second
SELECT 2 FROM b;
";
        let queries = parse(text, "analytics.sql");
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].number, "1.1");
        assert_eq!(queries[1].number, "1.2");
        assert_eq!(queries[1].sql, "SELECT 2 FROM b;\n");
    }

    #[test]
    fn first_comment_line_becomes_description() {
        let text = "\
-- Query 1.1: Titled
-- Counts everyone in the table
-- a second comment is ignored
SELECT COUNT(*) FROM people;
";
        let queries = parse(text, "x.sql");
        assert_eq!(queries[0].description, "Counts everyone in the table");
    }

    #[test]
    fn description_slot_stays_open_after_body_ends() {
        let text = "\
-- Query 1.1: Titled
SELECT 1;
-- late comment
";
        let queries = parse(text, "x.sql");
        assert_eq!(queries[0].description, "late comment");
    }

    #[test]
    fn malformed_header_is_an_ordinary_comment_line() {
        let text = "\
-- Query 1.1: Real
-- Query one.two: not a header
SELECT 1;
";
        let queries = parse(text, "x.sql");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].number, "1.1");
        assert_eq!(queries[0].description, "Query one.two: not a header");
    }

    #[test]
    fn header_without_title_does_not_start_a_query() {
        let text = "-- Query 1.1:\nSELECT 1;\n";
        let queries = parse(text, "x.sql");
        // The header pass found nothing, so the fallback splitter handled
        // the whole text instead.
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].description, AUTO_EXTRACTED_DESCRIPTION);
        assert_eq!(queries[0].number, "1.0");
    }

    #[test]
    fn query_with_empty_sql_is_dropped() {
        let text = "\
-- Query 1.1: Empty
-- Query 1.2: Has body
SELECT 1 FROM somewhere;
";
        let queries = parse(text, "x.sql");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].number, "1.2");
    }

    #[test]
    fn trailing_query_without_terminator_is_committed() {
        let text = "-- Query 3.1: Open ended\nSELECT name FROM people";
        let queries = parse(text, "x.sql");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].sql, "SELECT name FROM people\n");
    }

    #[test]
    fn body_ends_at_semicolon() {
        let text = "\
-- Query 1.1: Bounded
SELECT 1;
stray line after terminator
";
        let queries = parse(text, "x.sql");
        assert_eq!(queries[0].sql, "SELECT 1;\n");
    }

    #[test]
    fn comment_lines_are_not_sql() {
        let text = "\
-- Query 1.1: Commented
SELECT a,
-- inline note
       b FROM t;
";
        let queries = parse(text, "x.sql");
        assert_eq!(queries[0].sql, "SELECT a,\nb FROM t;\n");
        assert_eq!(queries[0].description, "inline note");
    }

    #[test]
    fn fallback_extracts_headerless_sql() {
        let text = "SELECT * FROM people WHERE age > 30;";
        let queries = parse(text, "notes.sql");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].number, "1.0");
        assert_eq!(queries[0].title, "SELECT * FROM people WHERE age > 30");
        assert_eq!(queries[0].sql, "SELECT * FROM people WHERE age > 30;");
        assert_eq!(queries[0].description, AUTO_EXTRACTED_DESCRIPTION);
        assert_eq!(queries[0].section, "Other");
    }

    #[test]
    fn fallback_skips_short_fragments() {
        let text = "SELECT 1;\nSELECT name, age FROM people ORDER BY age;";
        let queries = parse(text, "notes.sql");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].number, "1.0");
        assert!(queries[0].sql.starts_with("SELECT name, age"));
    }

    #[test]
    fn fallback_title_is_truncated_with_ellipsis() {
        let long_line = "SELECT first_name, last_name, date_of_birth, city FROM people";
        let text = format!("{long_line};");
        let queries = parse(&text, "notes.sql");
        let expected: String = long_line.chars().take(50).collect();
        assert_eq!(queries[0].title, format!("{expected}..."));
    }

    #[test]
    fn fallback_does_not_run_when_headers_matched() {
        let text = "\
-- Query 1.1: Only this one
SELECT id FROM people;
SELECT * FROM people WHERE age > 30 ORDER BY age;
";
        let queries = parse(text, "x.sql");
        // The trailing statement belongs to no header and is not
        // auto-extracted, because the header pass found a query.
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].number, "1.1");
    }

    #[test]
    fn empty_input_yields_no_queries() {
        assert!(parse("", "x.sql").is_empty());
        assert!(parse("\n\n\n", "x.sql").is_empty());
    }

    #[test]
    fn never_returns_empty_sql() {
        let inputs = [
            "",
            "-- Query 1.1: A\n-- Query 1.2: B",
            ";;;;",
            "short;",
            "-- just a comment\n",
        ];
        for input in inputs {
            for query in parse(input, "anything.sql") {
                assert!(!query.sql.trim().is_empty());
            }
        }
    }

    #[test]
    fn reparse_differs_only_in_id() {
        let text = "\
-- Query 1.1: Stable
-- description here
SELECT 1 FROM t;
";
        let parser = QueryParser::new();
        let mut ids = IdSequence::new();
        let first = parser.parse(text, "performance.sql", &mut ids);
        let second = parser.parse(text, "performance.sql", &mut ids);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.number, b.number);
            assert_eq!(a.title, b.title);
            assert_eq!(a.sql, b.sql);
            assert_eq!(a.section, b.section);
            assert_eq!(a.filename, b.filename);
            assert_eq!(a.description, b.description);
        }
    }

    #[test]
    fn header_ids_embed_section_and_number() {
        let queries = parse("-- Query 4.2: T\nSELECT 1;\n", "analytics.sql");
        assert_eq!(queries[0].id, "Analytics_4_2_0");
    }
}
