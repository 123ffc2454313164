//! Error types for the binding.
//!
//! [`ErrorKind`] is the native status enumeration (`sp_error`). [`Error`] is
//! what the Rust side returns: either a non-ok status surfaced by a checked
//! call, or a failure to reach the native call at all.

use serde::{Deserialize, Serialize};

/// Native status codes, one per `sp_error` value.
///
/// `Ok` is the only non-error member. Discriminants match the native header,
/// including its gaps (4, 28-30, 37-38).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Ok = 0,
    BadApiVersion = 1,
    ApiInitializationFailed = 2,
    TrackNotPlayable = 3,
    BadApplicationKey = 5,
    BadUsernameOrPassword = 6,
    UserBanned = 7,
    UnableToContactServer = 8,
    ClientTooOld = 9,
    OtherPermanent = 10,
    BadUserAgent = 11,
    MissingCallback = 12,
    InvalidIndata = 13,
    IndexOutOfRange = 14,
    UserNeedsPremium = 15,
    OtherTransient = 16,
    IsLoading = 17,
    NoStreamAvailable = 18,
    PermissionDenied = 19,
    InboxIsFull = 20,
    NoCache = 21,
    NoSuchUser = 22,
    NoCredentials = 23,
    NetworkDisabled = 24,
    InvalidDeviceId = 25,
    CantOpenTraceFile = 26,
    ApplicationBanned = 27,
    OfflineTooManyTracks = 31,
    OfflineDiskCache = 32,
    OfflineExpired = 33,
    OfflineNotAllowed = 34,
    OfflineLicenseLost = 35,
    OfflineLicenseError = 36,
    LastfmAuthError = 39,
    InvalidArgument = 40,
    SystemFailure = 41,
}

impl ErrorKind {
    /// Every member, in declaration order.
    pub const ALL: [ErrorKind; 36] = [
        ErrorKind::Ok,
        ErrorKind::BadApiVersion,
        ErrorKind::ApiInitializationFailed,
        ErrorKind::TrackNotPlayable,
        ErrorKind::BadApplicationKey,
        ErrorKind::BadUsernameOrPassword,
        ErrorKind::UserBanned,
        ErrorKind::UnableToContactServer,
        ErrorKind::ClientTooOld,
        ErrorKind::OtherPermanent,
        ErrorKind::BadUserAgent,
        ErrorKind::MissingCallback,
        ErrorKind::InvalidIndata,
        ErrorKind::IndexOutOfRange,
        ErrorKind::UserNeedsPremium,
        ErrorKind::OtherTransient,
        ErrorKind::IsLoading,
        ErrorKind::NoStreamAvailable,
        ErrorKind::PermissionDenied,
        ErrorKind::InboxIsFull,
        ErrorKind::NoCache,
        ErrorKind::NoSuchUser,
        ErrorKind::NoCredentials,
        ErrorKind::NetworkDisabled,
        ErrorKind::InvalidDeviceId,
        ErrorKind::CantOpenTraceFile,
        ErrorKind::ApplicationBanned,
        ErrorKind::OfflineTooManyTracks,
        ErrorKind::OfflineDiskCache,
        ErrorKind::OfflineExpired,
        ErrorKind::OfflineNotAllowed,
        ErrorKind::OfflineLicenseLost,
        ErrorKind::OfflineLicenseError,
        ErrorKind::LastfmAuthError,
        ErrorKind::InvalidArgument,
        ErrorKind::SystemFailure,
    ];

    /// Underlying native value.
    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == ErrorKind::Ok
    }

    /// Symbolic name as the scripting side spells it (`bad_username_or_password`).
    pub fn symbol(self) -> &'static str {
        match self {
            ErrorKind::Ok => "ok",
            ErrorKind::BadApiVersion => "bad_api_version",
            ErrorKind::ApiInitializationFailed => "api_initialization_failed",
            ErrorKind::TrackNotPlayable => "track_not_playable",
            ErrorKind::BadApplicationKey => "bad_application_key",
            ErrorKind::BadUsernameOrPassword => "bad_username_or_password",
            ErrorKind::UserBanned => "user_banned",
            ErrorKind::UnableToContactServer => "unable_to_contact_server",
            ErrorKind::ClientTooOld => "client_too_old",
            ErrorKind::OtherPermanent => "other_permanent",
            ErrorKind::BadUserAgent => "bad_user_agent",
            ErrorKind::MissingCallback => "missing_callback",
            ErrorKind::InvalidIndata => "invalid_indata",
            ErrorKind::IndexOutOfRange => "index_out_of_range",
            ErrorKind::UserNeedsPremium => "user_needs_premium",
            ErrorKind::OtherTransient => "other_transient",
            ErrorKind::IsLoading => "is_loading",
            ErrorKind::NoStreamAvailable => "no_stream_available",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::InboxIsFull => "inbox_is_full",
            ErrorKind::NoCache => "no_cache",
            ErrorKind::NoSuchUser => "no_such_user",
            ErrorKind::NoCredentials => "no_credentials",
            ErrorKind::NetworkDisabled => "network_disabled",
            ErrorKind::InvalidDeviceId => "invalid_device_id",
            ErrorKind::CantOpenTraceFile => "cant_open_trace_file",
            ErrorKind::ApplicationBanned => "application_banned",
            ErrorKind::OfflineTooManyTracks => "offline_too_many_tracks",
            ErrorKind::OfflineDiskCache => "offline_disk_cache",
            ErrorKind::OfflineExpired => "offline_expired",
            ErrorKind::OfflineNotAllowed => "offline_not_allowed",
            ErrorKind::OfflineLicenseLost => "offline_license_lost",
            ErrorKind::OfflineLicenseError => "offline_license_error",
            ErrorKind::LastfmAuthError => "lastfm_auth_error",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::SystemFailure => "system_failure",
        }
    }

    /// Short English description, available without the native library.
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::Ok => "No error",
            ErrorKind::BadApiVersion => "The library version targeted does not match the one you claim you support",
            ErrorKind::ApiInitializationFailed => "Initialization of library failed, are cache locations etc. valid?",
            ErrorKind::TrackNotPlayable => "The track specified for playing cannot be played",
            ErrorKind::BadApplicationKey => "The application key is invalid",
            ErrorKind::BadUsernameOrPassword => "Login failed because of bad username and/or password",
            ErrorKind::UserBanned => "The specified username is banned",
            ErrorKind::UnableToContactServer => "Cannot connect to the Spotify backend system",
            ErrorKind::ClientTooOld => "Client is too old, library will need to be updated",
            ErrorKind::OtherPermanent => "Some other error occurred, and it is permanent (e.g. trying to relogin will not help)",
            ErrorKind::BadUserAgent => "The user agent string is invalid or too long",
            ErrorKind::MissingCallback => "No valid callback registered to handle events",
            ErrorKind::InvalidIndata => "Input data was either missing or invalid",
            ErrorKind::IndexOutOfRange => "Index out of range",
            ErrorKind::UserNeedsPremium => "The specified user needs a premium account",
            ErrorKind::OtherTransient => "A transient error occurred",
            ErrorKind::IsLoading => "The resource is currently loading",
            ErrorKind::NoStreamAvailable => "Could not find any suitable stream to play",
            ErrorKind::PermissionDenied => "Requested operation is not allowed",
            ErrorKind::InboxIsFull => "Target inbox is full",
            ErrorKind::NoCache => "Cache is not enabled",
            ErrorKind::NoSuchUser => "Requested user does not exist",
            ErrorKind::NoCredentials => "No credentials are stored",
            ErrorKind::NetworkDisabled => "Network disabled",
            ErrorKind::InvalidDeviceId => "Invalid device ID",
            ErrorKind::CantOpenTraceFile => "Unable to open trace file",
            ErrorKind::ApplicationBanned => "This application is no longer allowed to use the Spotify service",
            ErrorKind::OfflineTooManyTracks => "Reached the device limit for number of tracks to download",
            ErrorKind::OfflineDiskCache => "Disk cache is full so no more tracks can be downloaded to offline mode",
            ErrorKind::OfflineExpired => "Offline key has expired, the user needs to go online again",
            ErrorKind::OfflineNotAllowed => "This user is not allowed to use offline mode",
            ErrorKind::OfflineLicenseLost => "The license for this device has been lost",
            ErrorKind::OfflineLicenseError => "The Spotify license server does not respond correctly",
            ErrorKind::LastfmAuthError => "A LastFM scrobble authentication error has occurred",
            ErrorKind::InvalidArgument => "An invalid argument was specified",
            ErrorKind::SystemFailure => "An operating system error",
        }
    }

    /// Resolve a symbolic name. Unknown names yield `None`.
    pub fn from_symbol(symbol: &str) -> Option<ErrorKind> {
        crate::status::by_symbol(symbol)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Failures that happen before a native call produces a value.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{0}")]
    Load(String),
    #[error("symbol {symbol} not found: {reason}")]
    SymbolNotFound { symbol: String, reason: String },
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("{op} expects {expected} arguments, got {got}")]
    ArgumentCount {
        op: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{op} argument {index}: expected {expected}, got {got}")]
    ArgumentKind {
        op: &'static str,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },
    #[error("string argument contains an interior NUL byte")]
    InteriorNul,
    #[error("binding has been shut down")]
    ShutDown,
}

/// Errors returned by the binding API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The native call returned a status other than `ok`.
    #[error("{kind} ({code}): {description}", code = .0.value(), kind = .0.symbol(), description = .0.description())]
    Status(ErrorKind),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("invalid {type_label}: {symbol}")]
    InvalidSymbol {
        type_label: String,
        symbol: String,
    },
}

impl Error {
    /// The status carried by this error, if it came from the native library.
    pub fn status(&self) -> Option<ErrorKind> {
        match self {
            Error::Status(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_match_native_header() {
        assert_eq!(ErrorKind::Ok.value(), 0);
        assert_eq!(ErrorKind::TrackNotPlayable.value(), 3);
        assert_eq!(ErrorKind::BadApplicationKey.value(), 5);
        assert_eq!(ErrorKind::ApplicationBanned.value(), 27);
        assert_eq!(ErrorKind::OfflineTooManyTracks.value(), 31);
        assert_eq!(ErrorKind::OfflineLicenseError.value(), 36);
        assert_eq!(ErrorKind::LastfmAuthError.value(), 39);
        assert_eq!(ErrorKind::SystemFailure.value(), 41);
    }

    #[test]
    fn test_only_ok_is_ok() {
        let oks: Vec<_> = ErrorKind::ALL.iter().filter(|k| k.is_ok()).collect();
        assert_eq!(oks, vec![&ErrorKind::Ok]);
    }

    #[test]
    fn test_serde_uses_symbols() {
        let json = serde_json::to_string(&ErrorKind::NetworkDisabled).unwrap();
        assert_eq!(json, r#""network_disabled""#);
        let back: ErrorKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorKind::NetworkDisabled);
    }

    #[test]
    fn test_status_error_display() {
        let err = Error::Status(ErrorKind::BadUsernameOrPassword);
        let msg = err.to_string();
        assert!(msg.starts_with("bad_username_or_password (6):"), "{msg}");
        assert_eq!(err.status(), Some(ErrorKind::BadUsernameOrPassword));
    }

    #[test]
    fn test_invalid_symbol_display() {
        let err = Error::InvalidSymbol {
            type_label: "error value".to_string(),
            symbol: "moo".to_string(),
        };
        assert_eq!(err.to_string(), "invalid error value: moo");
        assert_eq!(err.status(), None);
    }
}
