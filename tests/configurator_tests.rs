#![no_std]
#![no_main]

mod common;

use subghz_ble_bridge::commands::configurator::{self, RadioSettings};
use subghz_ble_bridge::commands::{parser, ApplyError, Outcome};
use subghz_ble_bridge::radio::{Modulation, RadioError, Role};

fn settings() -> RadioSettings {
    RadioSettings::new(433.0, Modulation::Ook)
}

#[defmt_test::tests]
mod tests {
    use defmt::{assert, assert_eq};

    use super::*;
    use crate::common::*;

    #[test]
    fn test_frequency_applied() {
        let mut radio = MockRadio::new();
        let mut settings = settings();

        let command = parser::parse("FREQ:868.0");
        let reports = configurator::apply(&command, &mut radio, &mut settings);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, Outcome::Applied);
        assert_eq!(radio.frequency_calls.as_slice(), &[868.0f32]);
        assert_eq!(settings.frequency_mhz, 868.0);
    }

    #[test]
    fn test_repeated_frequency_last_wins() {
        let mut radio = MockRadio::new();
        let mut settings = settings();

        let command = parser::parse("FREQ:433.0;FREQ:868.0");
        let reports = configurator::apply(&command, &mut radio, &mut settings);

        assert_eq!(reports.len(), 2);
        assert_eq!(radio.frequency_calls.as_slice(), &[433.0f32, 868.0]);
        assert_eq!(settings.frequency_mhz, 868.0);
    }

    #[test]
    fn test_modulation_case_insensitive() {
        let mut lower_radio = MockRadio::new();
        let mut lower = settings();
        let lower_reports = configurator::apply(&parser::parse("MOD:fsk"), &mut lower_radio, &mut lower);

        let mut upper_radio = MockRadio::new();
        let mut upper = settings();
        let upper_reports = configurator::apply(&parser::parse("MOD:FSK"), &mut upper_radio, &mut upper);

        assert_eq!(lower_reports[0].outcome, upper_reports[0].outcome);
        assert_eq!(lower_radio.ook_calls.as_slice(), &[false]);
        assert_eq!(upper_radio.ook_calls.as_slice(), &[false]);
        assert_eq!(lower.modulation, Modulation::Fsk);
        assert_eq!(upper.modulation, Modulation::Fsk);
    }

    #[test]
    fn test_unsupported_modulation_rejected() {
        let mut radio = MockRadio::new();
        let mut settings = settings();

        let reports = configurator::apply(&parser::parse("MOD:XYZ"), &mut radio, &mut settings);

        assert_eq!(reports[0].outcome, Outcome::Rejected(ApplyError::UnsupportedValue));
        assert_eq!(radio.call_count(), 0);
        assert_eq!(settings.modulation, Modulation::Ook);
    }

    #[test]
    fn test_malformed_frequency_never_reaches_radio() {
        let mut radio = MockRadio::new();
        let mut settings = settings();

        let reports = configurator::apply(&parser::parse("FREQ:abc;FREQ:inf;FREQ:"), &mut radio, &mut settings);

        assert_eq!(reports.len(), 3);
        for report in reports.iter() {
            assert_eq!(report.outcome, Outcome::Rejected(ApplyError::MalformedNumber));
        }
        assert_eq!(radio.call_count(), 0);
        assert_eq!(settings.frequency_mhz, 433.0);
    }

    #[test]
    fn test_non_positive_frequency_rejected() {
        let mut radio = MockRadio::new();
        let mut settings = settings();

        let reports = configurator::apply(&parser::parse("FREQ:0;FREQ:-1;FREQ:-433"), &mut radio, &mut settings);

        assert_eq!(reports.len(), 3);
        for report in reports.iter() {
            assert_eq!(report.outcome, Outcome::Rejected(ApplyError::MalformedNumber));
        }
        assert_eq!(radio.call_count(), 0);
        assert_eq!(settings.frequency_mhz, 433.0);
    }

    #[test]
    fn test_radio_failure_leaves_settings() {
        let mut radio = MockRadio::rejecting_frequency(RadioError::InvalidFrequency);
        let mut settings = settings();

        let reports = configurator::apply(&parser::parse("FREQ:1000.0;MOD:FSK"), &mut radio, &mut settings);

        assert_eq!(
            reports[0].outcome,
            Outcome::Rejected(ApplyError::RadioRejected(RadioError::InvalidFrequency))
        );
        assert_eq!(settings.frequency_mhz, 433.0);
        // Directives are independent: MOD still applies
        assert_eq!(reports[1].outcome, Outcome::Applied);
        assert_eq!(settings.modulation, Modulation::Fsk);
    }

    #[test]
    fn test_power_noted_without_radio_call() {
        let mut radio = MockRadio::new();
        let mut settings = settings();

        let reports = configurator::apply(&parser::parse("PWR:10"), &mut radio, &mut settings);
        assert_eq!(reports[0].outcome, Outcome::Noted);
        assert_eq!(settings.requested_power, Some(10));

        let reports = configurator::apply(&parser::parse("PWR:max"), &mut radio, &mut settings);
        assert_eq!(reports[0].outcome, Outcome::Noted);
        assert_eq!(settings.requested_power, Some(10));

        assert_eq!(radio.call_count(), 0);
    }

    #[test]
    fn test_role_recorded() {
        let mut radio = MockRadio::new();
        let mut settings = settings();
        assert_eq!(settings.role, Role::Unset);

        let reports = configurator::apply(&parser::parse("ROLE:receiver"), &mut radio, &mut settings);
        assert_eq!(reports[0].outcome, Outcome::Applied);
        assert_eq!(settings.role, Role::Receiver);

        let reports = configurator::apply(&parser::parse("ROLE:Relay"), &mut radio, &mut settings);
        assert_eq!(reports[0].outcome, Outcome::Rejected(ApplyError::UnsupportedValue));
        assert_eq!(settings.role, Role::Receiver);

        assert_eq!(radio.call_count(), 0);
    }

    #[test]
    fn test_empty_command_touches_nothing() {
        let mut radio = MockRadio::new();
        let mut settings = settings();

        let reports = configurator::apply(&parser::parse(""), &mut radio, &mut settings);

        assert!(reports.is_empty());
        assert_eq!(radio.call_count(), 0);
        assert_eq!(settings, RadioSettings::new(433.0, Modulation::Ook));
    }

    #[test]
    fn test_report_text() {
        let mut radio = MockRadio::rejecting_frequency(RadioError::InvalidFrequency);
        let mut settings = settings();

        let reports = configurator::apply(&parser::parse("FREQ:1000;MOD:XYZ;PWR:10;MOD:OOK"), &mut radio, &mut settings);

        assert_eq!(reports[0].to_text().as_str(), "FREQ:1000 rejected: radio code -12");
        assert_eq!(reports[1].to_text().as_str(), "MOD:XYZ rejected: unsupported value");
        assert_eq!(reports[2].to_text().as_str(), "PWR:10 noted: not implemented");
        assert_eq!(reports[3].to_text().as_str(), "MOD:OOK applied");
    }
}
