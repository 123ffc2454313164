//! Binding: the caller-owned context every native call goes through.

use crate::config::LibraryConfig;
use crate::dispatch::NativeDispatch;
use crate::error::{Error, ErrorKind};
use crate::loader::NativeLibrary;
use crate::operation::Operation;
use crate::status;
use crate::value::{Arg, RawResult};

/// One binding to the native library.
///
/// There is no global instance: callers create a `Binding`, pass it to
/// whatever needs the native library, and end it with [`Binding::shutdown`].
pub struct Binding<D: NativeDispatch = Box<dyn NativeDispatch>> {
    dispatch: D,
}

impl Binding<NativeLibrary> {
    /// Load the native library from the configured candidates.
    pub fn open(config: &LibraryConfig) -> Result<Self, Error> {
        let lib = NativeLibrary::open(config)?;
        tracing::info!("libspotify loaded from {}", lib.path().display());
        Ok(Self::init(lib))
    }
}

impl<D: NativeDispatch> Binding<D> {
    pub fn init(dispatch: D) -> Self {
        tracing::debug!("binding initialized");
        Self { dispatch }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatch
    }

    /// Call `op` and return its raw result without looking at status codes.
    pub fn invoke(&self, op: Operation, args: &[Arg]) -> Result<RawResult, Error> {
        op.check_args(args)?;
        Ok(self.dispatch.call(op, args)?)
    }

    /// Call `op`; a non-ok status becomes [`Error::Status`].
    ///
    /// Results that are not status codes, and status values the enumeration
    /// does not know, are returned unchanged.
    pub fn invoke_checked(&self, op: Operation, args: &[Arg]) -> Result<RawResult, Error> {
        status::check(self.invoke(op, args)?)
    }

    pub fn invoke_by_name(&self, name: &str, args: &[Arg]) -> Result<RawResult, Error> {
        self.invoke(Operation::lookup(name)?, args)
    }

    pub fn invoke_checked_by_name(&self, name: &str, args: &[Arg]) -> Result<RawResult, Error> {
        self.invoke_checked(Operation::lookup(name)?, args)
    }

    /// The native library's message for `kind`, falling back to the built-in
    /// description when the library returns null.
    pub fn error_message(&self, kind: ErrorKind) -> Result<String, Error> {
        let raw = self.invoke(Operation::ErrorMessage, &[Arg::Status(kind.value())])?;
        Ok(raw
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| kind.description().to_string()))
    }

    pub fn build_id(&self) -> Result<Option<String>, Error> {
        let raw = self.invoke(Operation::BuildId, &[])?;
        Ok(raw.as_str().map(str::to_string))
    }

    /// End the binding. Native objects still referenced by handles are the
    /// caller's to release beforehand.
    pub fn shutdown(self) {
        tracing::debug!("binding shut down");
    }
}
