//! Assertion helpers that fail the current test with expected vs actual

use std::fmt::Debug;

use regex::Regex;

use crate::error::{Error, Result};

pub fn expect_eq<T: PartialEq + Debug + ?Sized>(context: &str, expected: &T, actual: &T) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::assertion(
            context,
            format!("{:?}", expected),
            format!("{:?}", actual),
        ))
    }
}

pub fn expect_true(context: &str, condition: bool) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::assertion(context, true, false))
    }
}

pub fn expect_contains(context: &str, actual: &str, needle: &str) -> Result<()> {
    if actual.contains(needle) {
        Ok(())
    } else {
        Err(Error::assertion(
            context,
            format!("to contain {:?}", needle),
            format!("{:?}", actual),
        ))
    }
}

pub fn expect_contains_ignore_case(context: &str, actual: &str, needle: &str) -> Result<()> {
    if actual.to_lowercase().contains(&needle.to_lowercase()) {
        Ok(())
    } else {
        Err(Error::assertion(
            context,
            format!("to contain {:?} (case-insensitive)", needle),
            format!("{:?}", actual),
        ))
    }
}

pub fn expect_matches(context: &str, actual: &str, pattern: &Regex) -> Result<()> {
    if pattern.is_match(actual) {
        Ok(())
    } else {
        Err(Error::assertion(
            context,
            format!("to match /{}/", pattern.as_str()),
            format!("{:?}", actual),
        ))
    }
}

/// Expect an HTTP status to be one of `accepted`
pub fn expect_status_in(context: &str, accepted: &[u16], actual: u16) -> Result<()> {
    if accepted.contains(&actual) {
        Ok(())
    } else {
        Err(Error::assertion(context, format!("one of {:?}", accepted), actual))
    }
}
