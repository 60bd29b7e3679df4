//! Character filtering for model output before it reaches the screen or a PDF.
//!
//! The renderable set is ASCII, the Hangul syllable block, and a short
//! punctuation list. Everything else becomes a single space, so positions
//! (counted in characters) line up between input and output.

use std::fmt;
use std::ops::Deref;

use serde::{Serialize, Serializer};

/// First and last code points of the Hangul syllable block.
const HANGUL_SYLLABLES: std::ops::RangeInclusive<char> = '\u{AC00}'..='\u{D7AF}';

/// Punctuation kept regardless of script.
const PUNCTUATION_ALLOW_LIST: &str = ".,!?()-/:%";

const REPLACEMENT: char = ' ';

/// Text that only contains renderable characters.
///
/// The only way to build one is through [`sanitize_text`], so holding a
/// `SanitizedText` is proof the filter ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SanitizedText(String);

impl SanitizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SanitizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SanitizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SanitizedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Whether `c` survives sanitization unchanged.
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii() || HANGUL_SYLLABLES.contains(&c) || PUNCTUATION_ALLOW_LIST.contains(c)
}

/// Replace every character outside the renderable set with a space.
///
/// Total and stateless. The output has exactly as many characters as the
/// input (byte length may shrink when wide characters become spaces).
pub fn sanitize_text(text: &str) -> SanitizedText {
    SanitizedText(
        text.chars()
            .map(|c| if is_allowed_char(c) { c } else { REPLACEMENT })
            .collect(),
    )
}
