use anyhow::Result;
use regex::{Regex, RegexBuilder};

/// Content checks applied to visitor messages before they reach an owner.
///
/// Keywords come from the contact configuration.
pub struct SpamFilter {
    markup: Regex,
    patterns: Vec<Regex>,
}

impl SpamFilter {
    pub fn new(keywords: &[String]) -> Result<Self> {
        let markup = RegexBuilder::new(r"<[^>]*>|<script")
            .case_insensitive(true)
            .build()?;

        let mut patterns = vec![
            // URLs
            RegexBuilder::new(r"https?://\S+")
                .case_insensitive(true)
                .build()?,
            // Email addresses in message
            RegexBuilder::new(r"\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b")
                .case_insensitive(true)
                .build()?,
        ];

        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if !keywords.is_empty() {
            patterns.push(
                RegexBuilder::new(&format!(r"\b({})\b", keywords.join("|")))
                    .case_insensitive(true)
                    .build()?,
            );
        }

        Ok(Self { markup, patterns })
    }

    /// HTML tags or anything that opens a script block
    pub fn contains_markup(&self, text: &str) -> bool {
        self.markup.is_match(text)
    }

    pub fn is_spam(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}
