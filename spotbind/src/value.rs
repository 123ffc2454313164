//! Values crossing the native boundary: handles, arguments, raw results.

use serde::{Deserialize, Serialize};

/// Opaque reference to a native-owned object (session, track, playlist, ...).
///
/// Reference counting belongs to the native library (`*_add_ref` /
/// `*_release`); a `Handle` is only the pointer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(pub u64);

impl Handle {
    pub const NULL: Handle = Handle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// The shape a native signature declares for its return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// `sp_error`.
    Status,
    Handle,
    Int,
    UInt,
    Bool,
    Str,
    Void,
}

/// A value returned by a native call, tagged with its declared shape.
///
/// Only [`RawResult::Status`] carries the status enumeration's representation;
/// an `Int` that happens to equal a status value is still just an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawResult {
    Status(i32),
    Handle(Handle),
    Int(i32),
    UInt(u64),
    Bool(bool),
    Str(Option<String>),
    Void,
}

impl RawResult {
    pub fn shape(&self) -> Shape {
        match self {
            RawResult::Status(_) => Shape::Status,
            RawResult::Handle(_) => Shape::Handle,
            RawResult::Int(_) => Shape::Int,
            RawResult::UInt(_) => Shape::UInt,
            RawResult::Bool(_) => Shape::Bool,
            RawResult::Str(_) => Shape::Str,
            RawResult::Void => Shape::Void,
        }
    }

    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            RawResult::Handle(h) => Some(*h),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            RawResult::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawResult::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawResult::Str(s) => s.as_deref(),
            _ => None,
        }
    }
}

/// Parameter kinds a native operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Handle,
    Int,
    Size,
    Bool,
    /// `const char *`; also accepts [`Arg::Null`].
    Str,
    /// An `sp_error` passed by value (e.g. to `sp_error_message`).
    Status,
}

impl ArgKind {
    pub fn name(self) -> &'static str {
        match self {
            ArgKind::Handle => "handle",
            ArgKind::Int => "int",
            ArgKind::Size => "size",
            ArgKind::Bool => "bool",
            ArgKind::Str => "string",
            ArgKind::Status => "status",
        }
    }
}

/// An argument forwarded verbatim to a native operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Arg {
    Handle(Handle),
    Int(i32),
    Size(u64),
    Bool(bool),
    Str(String),
    Status(i32),
    Null,
}

impl Arg {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Arg::Handle(_) => "handle",
            Arg::Int(_) => "int",
            Arg::Size(_) => "size",
            Arg::Bool(_) => "bool",
            Arg::Str(_) => "string",
            Arg::Status(_) => "status",
            Arg::Null => "null",
        }
    }

    /// Whether this argument can be passed where `kind` is declared.
    pub fn fits(&self, kind: ArgKind) -> bool {
        matches!(
            (self, kind),
            (Arg::Handle(_), ArgKind::Handle)
                | (Arg::Int(_), ArgKind::Int)
                | (Arg::Size(_), ArgKind::Size)
                | (Arg::Bool(_), ArgKind::Bool)
                | (Arg::Str(_), ArgKind::Str)
                | (Arg::Null, ArgKind::Str)
                | (Arg::Status(_), ArgKind::Status)
        )
    }
}
