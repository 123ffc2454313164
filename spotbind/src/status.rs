//! Status-code disambiguation.
//!
//! A native call returns a handle, a primitive, or an `sp_error`. Only the
//! last kind is checked: [`disambiguate`] finds the enumeration member for a
//! status-shaped result and reports "no match" for everything else,
//! including status values the enumeration does not know.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{Error, ErrorKind};
use crate::value::RawResult;

static BY_VALUE: Lazy<HashMap<i32, ErrorKind>> =
    Lazy::new(|| ErrorKind::ALL.iter().map(|k| (k.value(), *k)).collect());

static BY_SYMBOL: Lazy<HashMap<&'static str, ErrorKind>> =
    Lazy::new(|| ErrorKind::ALL.iter().map(|k| (k.symbol(), *k)).collect());

/// Outcome of [`disambiguate`]: the untouched raw result plus the matched
/// status, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disambiguation {
    pub raw: RawResult,
    pub kind: Option<ErrorKind>,
}

impl Disambiguation {
    /// A matched status other than `ok`.
    pub fn failure(&self) -> Option<ErrorKind> {
        self.kind.filter(|k| !k.is_ok())
    }

    pub fn into_parts(self) -> (RawResult, Option<ErrorKind>) {
        (self.raw, self.kind)
    }
}

/// Look up the enumeration member whose value is `code`.
pub fn from_value(code: i32) -> Option<ErrorKind> {
    BY_VALUE.get(&code).copied()
}

pub(crate) fn by_symbol(symbol: &str) -> Option<ErrorKind> {
    BY_SYMBOL.get(symbol).copied()
}

/// Classify a raw native result. Total: absence of a match is a valid outcome.
pub fn disambiguate(raw: RawResult) -> Disambiguation {
    let kind = match &raw {
        RawResult::Status(code) => from_value(*code),
        _ => None,
    };
    Disambiguation { raw, kind }
}

/// Turn a raw result into `Err(Error::Status)` when it is a non-ok status.
///
/// `ok`, unknown status values and non-status results pass through unchanged.
pub fn check(raw: RawResult) -> Result<RawResult, Error> {
    let outcome = disambiguate(raw);
    match outcome.failure() {
        Some(kind) => Err(Error::Status(kind)),
        None => Ok(outcome.raw),
    }
}

/// Value of a status symbol; unknown symbols are an [`Error::InvalidSymbol`]
/// labelled with `type_label`.
pub fn enum_value(symbol: &str, type_label: &str) -> Result<i32, Error> {
    by_symbol(symbol)
        .map(ErrorKind::value)
        .ok_or_else(|| Error::InvalidSymbol {
            type_label: type_label.to_string(),
            symbol: symbol.to_string(),
        })
}
