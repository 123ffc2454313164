//! The seam between the binding and the native library.

use crate::error::DispatchError;
use crate::operation::Operation;
use crate::value::{Arg, RawResult};

/// Performs a native call and returns its raw, unclassified result.
///
/// Implementations must call the native operation exactly once per `call`
/// and must not interpret status codes; that is the binding's job.
pub trait NativeDispatch: Send + Sync {
    fn call(&self, op: Operation, args: &[Arg]) -> Result<RawResult, DispatchError>;
}

impl<T: NativeDispatch + ?Sized> NativeDispatch for Box<T> {
    fn call(&self, op: Operation, args: &[Arg]) -> Result<RawResult, DispatchError> {
        (**self).call(op, args)
    }
}
