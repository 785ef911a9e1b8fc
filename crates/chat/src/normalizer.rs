//! Query normalization.

/// Turn a raw message into a question.
///
/// Statements are wrapped in a verification template so retrieval and
/// generation treat them as claims to check. The template is applied before
/// translation, in the pivot language.
pub fn normalize(raw: &str) -> String {
    let text = raw.trim();
    if text.ends_with('?') {
        text.to_string()
    } else {
        format!("Is this claim supported by the provided texts: {}?", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_passes_through() {
        assert_eq!(normalize("What is truth?"), "What is truth?");
        assert_eq!(normalize("  What is truth?  "), "What is truth?");
    }

    #[test]
    fn test_statement_is_wrapped() {
        assert_eq!(
            normalize("truth"),
            "Is this claim supported by the provided texts: truth?"
        );
        assert_eq!(
            normalize(" patience is rewarded \n"),
            "Is this claim supported by the provided texts: patience is rewarded?"
        );
    }

    #[test]
    fn test_fullwidth_question_mark_is_not_a_question() {
        assert_eq!(
            normalize("真理是什么？"),
            "Is this claim supported by the provided texts: 真理是什么？?"
        );
    }
}
