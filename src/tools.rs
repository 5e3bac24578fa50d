// src/tools.rs
use regex::Regex;
use std::sync::LazyLock;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```(?:json)?").expect("leading fence pattern"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```$").expect("trailing fence pattern"));

/// Number of whitespace-separated tokens in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Trims a model reply and removes a leading ```` ```json ```` / ```` ``` ````
/// fence and a trailing ```` ``` ```` fence.
pub fn strip_code_fences(raw: &str) -> String {
    let text = raw.trim();
    let text = LEADING_FENCE.replace(text, "");
    let text = text.trim();
    let text = TRAILING_FENCE.replace(text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whitespace_tokens() {
        assert_eq!(word_count("This essay has exactly six words"), 6);
        assert_eq!(word_count("  spaced\tout\n\nwords  "), 3);
        assert_eq!(word_count("well-known, isn't it?"), 3);
    }

    #[test]
    fn empty_text_has_no_words() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count(" \n\t "), 0);
    }

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"score\": 7}\n```";
        assert_eq!(strip_code_fences(raw), "{\"score\": 7}");
    }

    #[test]
    fn strips_fence_case_insensitively() {
        let raw = "  ```JSON\n{\"a\": 1}```  ";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(
            strip_code_fences("  Sure, here it is: not json \n"),
            "Sure, here it is: not json"
        );
    }
}
