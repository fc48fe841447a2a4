use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").expect("valid regex");
    static ref NON_ENGLISH: Regex =
        Regex::new(r#"[^a-zA-Z0-9\s.,!?;'"-]"#).expect("valid regex");
    static ref NON_ASCII: Regex = Regex::new(r"[^\x00-\x7F]+").expect("valid regex");
}

/// Tokenize text into lowercase word tokens (maximal `\w+` runs).
///
/// This is the single tokenization rule shared by vocabulary construction,
/// TF counting, and query vectorization; the three must never diverge or
/// query vectors stop lining up with index columns. No stemming and no
/// stopword removal here; cleaning happens upstream of the engine.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Restrict text to English letters, digits, whitespace, and basic
/// punctuation, then strip any remaining non-ASCII runs.
///
/// Applied before tokenization on the TF path only; vocabulary and IDF see
/// the raw text. See the note on [`crate::index::Index::build`].
pub fn restrict_to_english(text: &str) -> String {
    let kept = NON_ENGLISH.replace_all(text, "");
    NON_ASCII.replace_all(&kept, "").into_owned()
}

/// Case-insensitive whole-word matcher for a literal keyword.
///
/// The keyword is escaped, so the resulting pattern is always valid.
pub fn whole_word_matcher(keyword: &str) -> Regex {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
        .expect("escaped literal is a valid pattern")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits_on_word_boundaries() {
        let toks = tokenize("Visit the Eiffel Tower!");
        assert_eq!(toks, vec!["visit", "the", "eiffel", "tower"]);
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(tokenize("route_66 in 2024"), vec!["route_66", "in", "2024"]);
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("!!! ...").is_empty());
    }

    #[test]
    fn english_restriction_drops_accents_and_symbols() {
        assert_eq!(restrict_to_english("café crème"), "caf crme");
        assert_eq!(restrict_to_english("fun❤fair"), "funfair");
        assert_eq!(restrict_to_english("Tower, 100%!"), "Tower, 100!");
    }

    #[test]
    fn whole_word_matcher_is_case_insensitive_and_exact() {
        let re = whole_word_matcher("visit");
        assert_eq!(re.find_iter("Visit a visitor, then visit again").count(), 2);
    }
}
