//! Script-direction heuristic used to pick the answer language.
//!
//! This is a character-share count over the Arabic block, not a language
//! identifier: text is right-to-left when more than half of its alphabetic
//! characters fall in U+0600..=U+06FF.

use serde::{Deserialize, Serialize};

const RTL_SCRIPT: std::ops::RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl TextDirection {
    /// Language the model is asked to answer in.
    pub fn language_name(self) -> &'static str {
        match self {
            TextDirection::Rtl => "Arabic",
            TextDirection::Ltr => "English",
        }
    }

    /// Fixed phrase the model must emit when the context has no answer.
    pub fn not_found_sentinel(self) -> &'static str {
        match self {
            TextDirection::Rtl => "المستندات المقدمة لا تحتوي على هذه المعلومات.",
            TextDirection::Ltr => "The provided documents do not contain this information.",
        }
    }

    /// Value for an HTML `dir` attribute.
    pub fn html_dir(self) -> &'static str {
        match self {
            TextDirection::Rtl => "rtl",
            TextDirection::Ltr => "ltr",
        }
    }
}

/// Classifies `text` as right-to-left or left-to-right.
///
/// Text with no alphabetic characters is LTR.
pub fn detect_direction(text: &str) -> TextDirection {
    let (rtl, total) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(rtl, total), c| {
            (rtl + usize::from(RTL_SCRIPT.contains(&c)), total + 1)
        });
    if total > 0 && rtl * 2 > total {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}
