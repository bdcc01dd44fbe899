//! Follow-up question suggestions.

use lexrag_core::lang::detect_direction;

/// Upper bound on suggestions returned to callers.
pub const MAX_RELATED: usize = 3;

/// Prompt asking for short follow-up questions in the query's language.
///
/// Only the first `prefix_chars` characters of the answer are included.
pub fn build_related_prompt(query: &str, answer: &str, prefix_chars: usize) -> String {
    let language = detect_direction(query).language_name();
    let excerpt: String = answer.chars().take(prefix_chars).collect();
    format!(
        "A user asked a legal assistant the following question:\n{query}\n\n\
         The assistant answered (excerpt):\n{excerpt}\n\n\
         Suggest exactly {MAX_RELATED} short follow-up questions the user is likely to ask next \
         about the same topic. Write them in {language}. Output one question per line, \
         without numbering, bullets or any other text.\n"
    )
}

/// Extracts up to three questions from a completion, one per line.
///
/// Leading enumeration (`1.`, `2)`, `٣-`, `-`, `*`, `•`) is stripped and lines
/// shorter than `min_chars` characters are dropped.
pub fn parse_related(text: &str, min_chars: usize) -> Vec<String> {
    text.lines()
        .map(strip_marker)
        .filter(|line| line.chars().count() >= min_chars.max(1))
        .take(MAX_RELATED)
        .map(str::to_string)
        .collect()
}

fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    let digits_end = line
        .char_indices()
        .find(|(_, c)| !c.is_numeric())
        .map_or(line.len(), |(i, _)| i);
    let rest = if digits_end > 0 {
        match line[digits_end..].chars().next() {
            Some(c @ ('.' | ')' | '-' | ':')) => &line[digits_end + c.len_utf8()..],
            _ => line,
        }
    } else {
        line.trim_start_matches(['-', '*', '•'])
    };
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_enumeration_and_bullets() {
        let text = "1. What about sick leave?\n2) Is leave paid?\n- Can leave be carried over?\n* extra";
        assert_eq!(
            parse_related(text, 5),
            vec!["What about sick leave?", "Is leave paid?", "Can leave be carried over?"]
        );
    }

    #[test]
    fn arabic_indic_numbers_are_stripped() {
        let text = "١. ما هي الإجازة المرضية؟\n٢- هل الإجازة مدفوعة الأجر؟";
        assert_eq!(parse_related(text, 5), vec!["ما هي الإجازة المرضية؟", "هل الإجازة مدفوعة الأجر؟"]);
    }

    #[test]
    fn short_and_blank_lines_are_dropped() {
        let text = "\n\n3.\nok\nHow is overtime calculated?\n";
        assert_eq!(parse_related(text, 5), vec!["How is overtime calculated?"]);
    }

    #[test]
    fn never_more_than_three() {
        let text = "First question here?\nSecond question here?\nThird question here?\nFourth question here?";
        assert_eq!(parse_related(text, 5).len(), MAX_RELATED);
    }

    #[test]
    fn leading_year_is_kept_without_marker() {
        assert_eq!(parse_related("2003 labor law changes?", 5), vec!["2003 labor law changes?"]);
    }

    #[test]
    fn prompt_truncates_answer_by_characters() {
        let answer = "ع".repeat(1000);
        let prompt = build_related_prompt("ما هي الإجازة؟", &answer, 400);
        assert!(prompt.contains(&"ع".repeat(400)));
        assert!(!prompt.contains(&"ع".repeat(401)));
        assert!(prompt.contains("Arabic"));
    }
}
