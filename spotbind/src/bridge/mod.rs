//! C ABI bridge for scripting hosts.

pub mod abi;
pub mod envelope;

/// Codes returned by bridge functions that report success as `i32`.
///
/// Distinct from [`crate::ErrorKind`]: these describe the bridge call itself,
/// not a native status.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeResult {
    /// Success.
    Ok = 0,
    /// The handle does not exist in the handle table.
    InvalidHandle = 1,
    /// A required argument was null or not valid UTF-8.
    InvalidArgument = 2,
    /// An internal error occurred (logged via tracing).
    Internal = 3,
}
