use lazy_static::lazy_static;
use regex::Regex;

/// Clauses of this many characters or fewer are treated as noise.
const MIN_CLAUSE_CHARS: usize = 20;

lazy_static! {
    /// Sentence end (`.` or `;`), a whitespace run, then an uppercase letter.
    /// Group 1 is the whitespace the split consumes.
    static ref CLAUSE_BOUNDARY: Regex = Regex::new(r"[.;](\s+)[A-Z]").unwrap();
}

/// Split raw document text into candidate clauses.
///
/// Each candidate is trimmed; candidates of 20 characters or fewer are dropped.
/// Order follows the source text and nothing is merged after the split.
pub fn split_into_clauses(text: &str) -> Vec<String> {
    let text = text.trim();
    let mut clauses = Vec::new();
    let mut start = 0;

    for caps in CLAUSE_BOUNDARY.captures_iter(text) {
        let Some(gap) = caps.get(1) else { continue };
        push_clause(&mut clauses, &text[start..gap.start()]);
        start = gap.end();
    }
    push_clause(&mut clauses, &text[start..]);

    clauses
}

fn push_clause(clauses: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if candidate.chars().count() > MIN_CLAUSE_CHARS {
        clauses.push(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        assert!(split_into_clauses("").is_empty());
        assert!(split_into_clauses("   \n\t ").is_empty());
    }

    #[test]
    fn test_no_boundary_yields_whole_text() {
        let text = "  the parties agree to the following terms  ";
        assert_eq!(
            split_into_clauses(text),
            vec!["the parties agree to the following terms".to_string()]
        );
    }

    #[test]
    fn test_splits_on_period_and_semicolon() {
        let text = "The tenant shall pay rent monthly. The landlord keeps the deposit; \
                    Either party may terminate with notice.";
        assert_eq!(
            split_into_clauses(text),
            vec![
                "The tenant shall pay rent monthly.".to_string(),
                "The landlord keeps the deposit;".to_string(),
                "Either party may terminate with notice.".to_string(),
            ]
        );
    }

    #[test]
    fn test_lowercase_after_period_is_not_a_boundary() {
        let text = "Payment is due on the 1st. of each month without exception.";
        assert_eq!(split_into_clauses(text).len(), 1);
    }

    #[test]
    fn test_short_fragments_are_dropped() {
        let text = "ARTICLE 1. This agreement is governed by the laws of Delaware.";
        assert_eq!(
            split_into_clauses(text),
            vec!["This agreement is governed by the laws of Delaware.".to_string()]
        );
    }

    #[test]
    fn test_exactly_twenty_chars_is_dropped() {
        // 20 characters
        let short = "Abcdefghij klmnopqr.";
        assert_eq!(short.chars().count(), 20);
        assert!(split_into_clauses(short).is_empty());
        assert_eq!(split_into_clauses("Abcdefghij klmnopqrs.").len(), 1);
    }

    #[test]
    fn test_newlines_count_as_whitespace() {
        let text = "The first clause runs long enough.\n\nThe second clause runs long enough.";
        assert_eq!(split_into_clauses(text).len(), 2);
    }

    proptest! {
        #[test]
        fn prop_clauses_are_long_and_ordered(text in "[A-Za-z .;\n]{0,300}") {
            let clauses = split_into_clauses(&text);
            let mut cursor = 0;
            for clause in &clauses {
                prop_assert!(clause.chars().count() >= 21);
                prop_assert_eq!(clause.trim(), clause.as_str());
                let found = text[cursor..].find(clause.as_str());
                prop_assert!(found.is_some());
                cursor += found.unwrap() + clause.len();
            }
        }
    }
}
