//! `--key value` option parsing for shell commands.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use subtrack_domain::{parse_calendar_date, BillingCycle};

use crate::cli::context::CommandError;

/// Positional arguments plus `--key value` options; bare `--flag`s map to an
/// empty value.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs<'a> {
    pub positionals: Vec<&'a str>,
    options: BTreeMap<&'a str, &'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// `flags` name options that take no value.
    pub fn parse(
        args: &[&'a str],
        allowed: &[&str],
        flags: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(key) = arg.strip_prefix("--") else {
                parsed.positionals.push(arg);
                continue;
            };
            if !allowed.contains(&key) && !flags.contains(&key) {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{key}`"
                )));
            }
            let value = if flags.contains(&key) {
                ""
            } else {
                iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("option `--{key}` needs a value"))
                })?
            };
            parsed.options.insert(key, value);
        }
        Ok(parsed)
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.options.get(key).copied()
    }

    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn positional(&self, index: usize, name: &str) -> Result<&'a str, CommandError> {
        self.positionals
            .get(index)
            .copied()
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing <{name}>")))
    }
}

pub fn parse_cost(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a number")))
}

pub fn parse_cycle(raw: &str) -> Result<BillingCycle, CommandError> {
    match BillingCycle::from_raw(raw) {
        BillingCycle::Other(_) => Err(CommandError::InvalidArguments(format!(
            "unknown billing cycle `{raw}` (weekly, monthly, quarterly, yearly)"
        ))),
        cycle => Ok(cycle),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    parse_calendar_date(raw)
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM-DD date")))
}

pub fn parse_days(raw: &str) -> Result<u32, CommandError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a day count")))
}

/// Empty text clears an optional field.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
