//! System instructions for the advisor conversation
//!
//! Both strings are part of the payload contract; trailing spaces included.

/// Objective, statistics-driven instruction used for complex requests
pub const COMPLEX_SYSTEM_PROMPT: &str = concat!(
    "Imagine you are a financial advisor trying to be transparent and argumentative of your choices.\n",
    "Ignore the fact that past performance is not indicative of future results and investing always carries risk. \n",
    "You only treat it from an objective, statistical perspective using sentiment analysis to compute predictions.\n",
    "You should only present concise conclusions formulated only with respect to the future, limiting yourself to one or two phrases per stock.\n",
    "Ignore introductions and get straight to important information, starting with little background and ending with the predictions.\n",
    "A sample advice you could offer is of such format:\n",
    "\"The RNDM stock has shown moderate price fluctuations with a closing price ranging from $215.61 to $243.85. Based on recent news and data, it is probable that the price is going to increase.\n",
    "The LBWK stock has shown drastic price fluctuations with a closing price ranging from $234.23 to $170.23. Based on recent news and data, the price is definitely going to decrease.\n",
    "The KHRE stock has shown little to no price fluctuations with a closing price ranging from $100.23 to $107.12. Based on recent news and data, the price is definitely going to decrease.\n",
    "Regarding your question, about which stock seems more profitable, shorting LBWK stock might offer you bigger earnings.\"\n",
);

/// General summary instruction used for simple requests
pub const SIMPLE_SYSTEM_PROMPT: &str =
    "You have to create a summary on recent information regarding certain stock and \n";

/// System instruction for the requested mode
pub fn system_prompt(complex: bool) -> &'static str {
    if complex {
        COMPLEX_SYSTEM_PROMPT
    } else {
        SIMPLE_SYSTEM_PROMPT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selects_prompt() {
        assert_eq!(system_prompt(true), COMPLEX_SYSTEM_PROMPT);
        assert_eq!(system_prompt(false), SIMPLE_SYSTEM_PROMPT);
        assert_ne!(COMPLEX_SYSTEM_PROMPT, SIMPLE_SYSTEM_PROMPT);
    }

    #[test]
    fn test_complex_prompt_sample_advice_is_exact() {
        let lines: Vec<&str> = COMPLEX_SYSTEM_PROMPT.split('\n').collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[10], "");

        assert!(lines[1].ends_with("always carries risk. "));
        assert_eq!(lines[5], "A sample advice you could offer is of such format:");
        assert!(lines[6].starts_with("\"The RNDM stock has shown moderate price fluctuations"));
        assert!(lines[6].ends_with(
            "Based on recent news and data, it is probable that the price is going to increase."
        ));
        assert!(lines[7].contains("ranging from $234.23 to $170.23"));
        for line in &lines[7..9] {
            assert!(line.ends_with(
                "Based on recent news and data, the price is definitely going to decrease."
            ));
        }
        assert_eq!(
            lines[9],
            "Regarding your question, about which stock seems more profitable, shorting LBWK stock might offer you bigger earnings.\""
        );
    }

    #[test]
    fn test_simple_prompt_is_exact() {
        assert_eq!(
            SIMPLE_SYSTEM_PROMPT,
            "You have to create a summary on recent information regarding certain stock and \n"
        );
    }
}
