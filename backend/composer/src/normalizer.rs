//! Cleans raw model output into the message shown to the user.

use once_cell::sync::Lazy;
use regex::Regex;

/// Preambles models like to put in front of the actual message.
pub const BOILERPLATE_PREFIXES: &[&str] = &[
    "Here's a message:",
    "Message:",
    "Response:",
    "Ice breaker:",
    "Here's an ice breaker:",
    "Here's what I'd say:",
    "I would say:",
    "Try this:",
    "How about:",
    "Suggestion:",
];

static PREFIX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = BOILERPLATE_PREFIXES
        .iter()
        .map(|p| regex::escape(p))
        .collect();
    Regex::new(&format!("(?i)^(?:{})", alternatives.join("|")))
        .expect("boilerplate prefixes form a valid pattern")
});

/// Trim, unwrap one pair of matching quotes, drop one leading preamble, trim.
///
/// The pass is repeated until the text stops changing, which makes the
/// function idempotent: `"Message: 'hi'"` and `Message: "hi"` both end as `hi`.
pub fn normalize(raw: &str) -> String {
    let mut current = raw.trim();
    loop {
        let next = normalize_once(current);
        if next.len() == current.len() {
            return next.to_string();
        }
        current = next;
    }
}

fn normalize_once(text: &str) -> &str {
    let text = strip_quotes(text.trim());
    let text = match PREFIX_PATTERN.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    text.trim()
}

fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_outer_quotes_only() {
        assert_eq!(normalize("\"Hello there\""), "Hello there");
        assert_eq!(normalize("'She said \"hi\" to me'"), "She said \"hi\" to me");
    }

    #[test]
    fn strips_leading_preamble() {
        assert_eq!(
            normalize("Here's a message: Hey, nice hiking photo!"),
            "Hey, nice hiking photo!"
        );
        assert_eq!(normalize("  SUGGESTION:   Tacos?  "), "Tacos?");
    }

    #[test]
    fn leaves_preamble_elsewhere_untouched() {
        let text = "My favorite reply is Try this: pizza";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn unmatched_quotes_are_kept() {
        assert_eq!(normalize("\"Hello there'"), "\"Hello there'");
        assert_eq!(normalize("\""), "\"");
    }

    #[test]
    fn quotes_inside_preamble_are_resolved() {
        assert_eq!(normalize("Message: \"Hi there\""), "Hi there");
        assert_eq!(normalize("\"How about: dinner?\""), "dinner?");
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n"), "");
        assert_eq!(normalize("\"\""), "");
    }

    #[test]
    fn idempotent_over_generated_inputs() {
        let bodies = [
            "",
            "Hey, nice hiking photo!",
            "  padded  ",
            "\"inner quoted\"",
            "'single'",
            "Message:",
            "message: nested",
            "ends with quote\"",
            "Try this: How about: stacked",
            "emoji 🍕 and ünïcödé",
        ];
        let wrappers: [(&str, &str); 5] = [("", ""), ("\"", "\""), ("'", "'"), (" ", "\n"), ("\"", "'")];

        let mut prefixes: Vec<String> = vec![String::new()];
        for p in BOILERPLATE_PREFIXES {
            prefixes.push(p.to_string());
            prefixes.push(p.to_uppercase());
            prefixes.push(format!("{p} "));
        }

        for body in bodies {
            for prefix in &prefixes {
                for (open, close) in wrappers {
                    let candidates = [
                        format!("{open}{prefix}{body}{close}"),
                        format!("{prefix}{open}{body}{close}"),
                    ];
                    for input in candidates {
                        let once = normalize(&input);
                        assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
                    }
                }
            }
        }
    }
}
