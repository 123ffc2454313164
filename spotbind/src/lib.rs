//! Typed binding layer over the libspotify C interface.
//!
//! The native library does all the work; this crate describes how to call
//! it. Raw results are classified by [`disambiguate`]: status-shaped results
//! are matched against [`ErrorKind`], everything else passes through.
//! [`Binding::invoke_checked`] turns a non-ok status into [`Error::Status`].
//!
//! A C ABI in [`bridge`] exposes the same operations to scripting hosts.

pub mod binding;
pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod operation;
pub mod status;
pub mod value;

pub use binding::Binding;
pub use config::LibraryConfig;
pub use dispatch::NativeDispatch;
pub use error::{DispatchError, Error, ErrorKind};
pub use loader::NativeLibrary;
pub use operation::Operation;
pub use status::{disambiguate, enum_value, Disambiguation};
pub use value::{Arg, Handle, RawResult, Shape};
