//! Configuration Command Processing
//!
//! Config writes arrive as `KEY:VALUE;KEY:VALUE;...` text. The parser turns
//! them into an ordered [`Command`] and the configurator applies each
//! directive to the radio, producing one [`Report`] per directive.

use ::core::fmt::Write;

use defmt::Format;
use heapless::Vec;

use crate::core::protocol::NotifyText;
use crate::radio::RadioError;

pub mod configurator;
pub mod parser;

/// Maximum number of directives kept from one config write
pub const MAX_DIRECTIVES: usize = 16;

/// Recognized directive keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum DirectiveKey {
    Freq,
    Mod,
    Pwr,
    Role,
}

impl DirectiveKey {
    /// Match a key token case-insensitively
    pub fn from_token(token: &str) -> Option<Self> {
        const KEYS: [(&str, DirectiveKey); 4] = [
            ("FREQ", DirectiveKey::Freq),
            ("MOD", DirectiveKey::Mod),
            ("PWR", DirectiveKey::Pwr),
            ("ROLE", DirectiveKey::Role),
        ];

        KEYS.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|&(_, key)| key)
    }

    /// Canonical upper-case token
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveKey::Freq => "FREQ",
            DirectiveKey::Mod => "MOD",
            DirectiveKey::Pwr => "PWR",
            DirectiveKey::Role => "ROLE",
        }
    }
}

/// One parsed key/value pair. The value borrows from the config write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub struct Directive<'a> {
    pub key: DirectiveKey,
    pub value: &'a str,
}

/// Directives parsed from one config write, in input order
#[derive(Debug, Default, Clone, PartialEq, Eq, Format)]
pub struct Command<'a> {
    pub directives: Vec<Directive<'a>, MAX_DIRECTIVES>,
    /// Segments dropped for a missing `:` or an unknown key
    pub ignored: usize,
    /// Recognized directives dropped because the command was full
    pub overflow: usize,
}

impl<'a> Command<'a> {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive<'a>> {
        self.directives.iter()
    }
}

/// Why a directive was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum ApplyError {
    /// The radio driver returned a failure status
    RadioRejected(RadioError),
    /// Value is not one of the accepted tokens (modulation, role)
    UnsupportedValue,
    /// Numeric value could not be parsed
    MalformedNumber,
}

impl From<RadioError> for ApplyError {
    fn from(err: RadioError) -> Self {
        ApplyError::RadioRejected(err)
    }
}

/// Result of applying one directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum Outcome {
    /// Applied to the radio and recorded in the settings
    Applied,
    /// Not applied; settings unchanged
    Rejected(ApplyError),
    /// Accepted but not implemented in hardware (power)
    Noted,
}

/// Directive paired with its outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub struct Report<'a> {
    pub directive: Directive<'a>,
    pub outcome: Outcome,
}

/// Reports for one applied command, in application order
pub type Reports<'a> = Vec<Report<'a>, MAX_DIRECTIVES>;

/// Longest directive value echoed back in a report line
const MAX_ECHOED_VALUE: usize = 48;

impl Report<'_> {
    /// Render the report as a log notification line, e.g. `MOD:XYZ rejected: unsupported value`
    pub fn to_text(&self) -> NotifyText {
        let mut text = NotifyText::new();
        let value = clip(self.directive.value, MAX_ECHOED_VALUE);
        let key = self.directive.key.as_str();
        // Key, clipped value and verdict always fit in MAX_NOTIFY_LEN.
        let _ = match self.outcome {
            Outcome::Applied => write!(text, "{}:{} applied", key, value),
            Outcome::Noted => write!(text, "{}:{} noted: not implemented", key, value),
            Outcome::Rejected(ApplyError::RadioRejected(e)) => {
                write!(text, "{}:{} rejected: radio code {}", key, value, e.code())
            }
            Outcome::Rejected(ApplyError::UnsupportedValue) => {
                write!(text, "{}:{} rejected: unsupported value", key, value)
            }
            Outcome::Rejected(ApplyError::MalformedNumber) => {
                write!(text, "{}:{} rejected: malformed number", key, value)
            }
        };
        text
    }
}

/// Cut `value` to at most `max` bytes without splitting a character
fn clip(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
