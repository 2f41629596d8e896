//! Checkbox token recognition
//!
//! A checkbox token is the exact 3-character literal `[` + one of
//! {space, `x`, `X`} + `]`. Anything else that merely looks checkbox-shaped
//! (`[y]`, `[xx]`, `[ x]`) is never matched and never an error. Scanning
//! yields non-overlapping matches, left to right, with byte offsets.

use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Byte (and character) length of a checkbox token.
pub const TOKEN_LEN: usize = 3;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

/// The compiled checkbox token pattern, shared across all scans.
fn token_regex() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"\[[ xX]\]").expect("checkbox token pattern is valid"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Checkbox Token
// ─────────────────────────────────────────────────────────────────────────────

/// A single checkbox token with its boolean state.
///
/// The state character is preserved (`x` vs `X`) so that payload comparisons
/// against the literal source text stay exact; toggling always produces the
/// canonical lowercase `[x]` or `[ ]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxToken {
    state: char,
}

impl CheckboxToken {
    /// An unchecked token, `[ ]`.
    pub const UNCHECKED: CheckboxToken = CheckboxToken { state: ' ' };

    /// A checked token, `[x]`.
    pub const CHECKED: CheckboxToken = CheckboxToken { state: 'x' };

    /// Parse a 3-character literal into a token.
    ///
    /// Returns `None` for anything that is not exactly `[ ]`, `[x]`, or `[X]`.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "[ ]" => Some(CheckboxToken { state: ' ' }),
            "[x]" => Some(CheckboxToken { state: 'x' }),
            "[X]" => Some(CheckboxToken { state: 'X' }),
            _ => None,
        }
    }

    /// Whether this token represents the checked state.
    pub fn checked(&self) -> bool {
        self.state == 'x' || self.state == 'X'
    }

    /// The exact 3-character literal of this token.
    pub fn as_str(&self) -> &'static str {
        match self.state {
            ' ' => "[ ]",
            'X' => "[X]",
            _ => "[x]",
        }
    }

    /// The state character living between the brackets.
    pub fn state_char(&self) -> char {
        self.state
    }

    /// The token with the opposite state, in canonical form.
    ///
    /// A checked token (either case) toggles to `[ ]`; an unchecked token
    /// toggles to lowercase `[x]`.
    pub fn toggled(&self) -> Self {
        if self.checked() {
            CheckboxToken::UNCHECKED
        } else {
            CheckboxToken::CHECKED
        }
    }
}

impl fmt::Display for CheckboxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Tokens travel inside JSON payloads as their literal text, so round-tripping
// preserves the `x` vs `X` distinction.
impl Serialize for CheckboxToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CheckboxToken {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct TokenVisitor;

        impl Visitor<'_> for TokenVisitor {
            type Value = CheckboxToken;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a checkbox token literal: \"[ ]\", \"[x]\", or \"[X]\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<CheckboxToken, E> {
                CheckboxToken::parse(value)
                    .ok_or_else(|| E::custom(format!("not a checkbox token: {:?}", value)))
            }
        }

        deserializer.deserialize_str(TokenVisitor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Token Scanning
// ─────────────────────────────────────────────────────────────────────────────

/// A checkbox token match within a scanned text span.
///
/// Offsets are byte offsets local to the scanned text; callers add the scan
/// region's base offset to obtain absolute positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch {
    /// Byte offset of the opening `[`
    pub start: usize,
    /// Byte offset one past the closing `]`
    pub end: usize,
    /// The matched token
    pub token: CheckboxToken,
}

/// Scan a text span for checkbox tokens.
///
/// Produces non-overlapping matches in left-to-right order. The iterator is
/// lazy; scanning restarts from scratch on every call.
pub fn scan_tokens(text: &str) -> impl Iterator<Item = TokenMatch> + '_ {
    token_regex().find_iter(text).filter_map(|m| {
        CheckboxToken::parse(m.as_str()).map(|token| TokenMatch {
            start: m.start(),
            end: m.end(),
            token,
        })
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
