//! Text normalization used for diagnostics

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

const STOP_WORDS_PT: &[&str] = &[
    "de", "da", "do", "dos", "das", "o", "a", "os", "as", "um", "uma", "para", "por", "em", "e",
    "ou", "que", "com", "no", "na", "nos", "nas",
];

const STOP_WORDS_EN: &[&str] = &[
    "the", "a", "an", "in", "on", "at", "of", "for", "and", "or", "to", "is", "are", "be", "was",
    "were", "this", "that",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    STOP_WORDS_PT
        .iter()
        .chain(STOP_WORDS_EN)
        .copied()
        .collect()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Valid regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("Valid regex"));

/// Collapse whitespace runs into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Lower-case word tokens of `text` with stop words removed.
///
/// Falls back to the whitespace-collapsed input when every token is a stop
/// word, so the result is only empty for blank input.
pub fn normalize(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let lowered = collapsed.to_lowercase();

    let kept: Vec<&str> = WORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !STOP_WORDS.contains(token))
        .collect();

    if kept.is_empty() {
        collapsed
    } else {
        kept.join(" ")
    }
}

/// First `max_chars` characters of `text`, for log previews
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_normalize_removes_stop_words() {
        let out = normalize("Bom dia, poderiam informar o status do chamado?");
        assert_eq!(out, "bom dia poderiam informar status chamado");
    }

    #[test]
    fn test_normalize_mixed_languages() {
        let out = normalize("The report is attached para o time");
        assert_eq!(out, "report attached time");
    }

    #[test]
    fn test_normalize_all_stop_words_falls_back() {
        assert_eq!(normalize("  The   a  de "), "The a de");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "Feliz Natal a toda a equipe! Muito sucesso!",
            "Segue em anexo o relatório de conformidade do cliente 123.",
            "The  OR  and",
            "de-a",
            "CASE#54821 ÁRVORE Ação",
            "Atualize sua senha: http://banco-seguro-login.xyz",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("ação", 2), "aç");
        assert_eq!(preview("abc", 10), "abc");
    }
}
