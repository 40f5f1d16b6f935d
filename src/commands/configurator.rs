//! Radio Configurator
//!
//! Applies parsed directives to the radio in input order. Each directive is
//! independent: a rejected FREQ does not stop a following MOD. Settings are
//! only updated after the driver accepted a change, so [`RadioSettings`] is
//! the bridge's best-effort view of the chip, never read back from it.

use defmt::{info, warn, Format};

use super::{ApplyError, Command, Directive, DirectiveKey, Outcome, Report, Reports};
use crate::radio::{Modulation, Radio, Role};

/// Configuration currently believed to be active on the radio
#[derive(Debug, Clone, Copy, PartialEq, Format)]
pub struct RadioSettings {
    pub frequency_mhz: f32,
    pub modulation: Modulation,
    pub role: Role,
    /// Last power request; logged, never forwarded to the radio
    pub requested_power: Option<i32>,
}

impl RadioSettings {
    pub const fn new(frequency_mhz: f32, modulation: Modulation) -> Self {
        Self {
            frequency_mhz,
            modulation,
            role: Role::Unset,
            requested_power: None,
        }
    }
}

/// Apply every directive of `command`, returning one report per directive
pub fn apply<'a, R: Radio + ?Sized>(command: &Command<'a>, radio: &mut R, settings: &mut RadioSettings) -> Reports<'a> {
    let mut reports = Reports::new();

    for directive in command.iter() {
        let outcome = apply_directive(directive, radio, settings);
        log_outcome(directive, outcome);
        // Command and Reports share MAX_DIRECTIVES, so this cannot overflow.
        let _ = reports.push(Report {
            directive: *directive,
            outcome,
        });
    }

    reports
}

/// Apply a single directive
pub fn apply_directive<R: Radio + ?Sized>(directive: &Directive<'_>, radio: &mut R, settings: &mut RadioSettings) -> Outcome {
    let result = match directive.key {
        DirectiveKey::Freq => apply_frequency(directive.value, radio, settings),
        DirectiveKey::Mod => apply_modulation(directive.value, radio, settings),
        DirectiveKey::Pwr => {
            note_power(directive.value, settings);
            return Outcome::Noted;
        }
        DirectiveKey::Role => apply_role(directive.value, settings),
    };

    match result {
        Ok(()) => Outcome::Applied,
        Err(e) => Outcome::Rejected(e),
    }
}

fn apply_frequency<R: Radio + ?Sized>(value: &str, radio: &mut R, settings: &mut RadioSettings) -> Result<(), ApplyError> {
    let mhz = parse_frequency(value)?;
    radio.set_frequency(mhz)?;
    settings.frequency_mhz = mhz;
    Ok(())
}

/// Parse a FREQ value. Malformed, non-finite and non-positive numbers are
/// rejected before the radio sees them.
pub fn parse_frequency(value: &str) -> Result<f32, ApplyError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|mhz| mhz.is_finite() && *mhz > 0.0)
        .ok_or(ApplyError::MalformedNumber)
}

/// Match a modulation token case-insensitively
pub fn parse_modulation(value: &str) -> Option<Modulation> {
    if value.eq_ignore_ascii_case("OOK") {
        Some(Modulation::Ook)
    } else if value.eq_ignore_ascii_case("FSK") {
        Some(Modulation::Fsk)
    } else {
        None
    }
}

/// Match a role token case-insensitively
pub fn parse_role(value: &str) -> Option<Role> {
    if value.eq_ignore_ascii_case("Transmitter") {
        Some(Role::Transmitter)
    } else if value.eq_ignore_ascii_case("Receiver") {
        Some(Role::Receiver)
    } else {
        None
    }
}

fn apply_modulation<R: Radio + ?Sized>(value: &str, radio: &mut R, settings: &mut RadioSettings) -> Result<(), ApplyError> {
    let modulation = parse_modulation(value).ok_or(ApplyError::UnsupportedValue)?;
    radio.set_ook(modulation == Modulation::Ook)?;
    settings.modulation = modulation;
    Ok(())
}

fn apply_role(value: &str, settings: &mut RadioSettings) -> Result<(), ApplyError> {
    settings.role = parse_role(value).ok_or(ApplyError::UnsupportedValue)?;
    Ok(())
}

fn note_power(value: &str, settings: &mut RadioSettings) {
    match value.parse::<i32>() {
        Ok(power) => settings.requested_power = Some(power),
        Err(_) => warn!("CONFIG: Power value {=str} is not an integer", value),
    }
}

fn log_outcome(directive: &Directive<'_>, outcome: Outcome) {
    match outcome {
        Outcome::Applied => info!("CONFIG: {}={=str} applied", directive.key, directive.value),
        Outcome::Rejected(ApplyError::RadioRejected(e)) => warn!(
            "CONFIG: {}={=str} rejected by radio, code {} ({})",
            directive.key,
            directive.value,
            e.code(),
            e
        ),
        Outcome::Rejected(e) => warn!("CONFIG: {}={=str} rejected: {}", directive.key, directive.value, e),
        Outcome::Noted => info!(
            "CONFIG: {}={=str} received (not implemented)",
            directive.key,
            directive.value
        ),
    }
}
