//! Checked invocation through the public API.
//!
//! Tests cover:
//! - ok, non-ok, handle and unknown-status results (scenarios A-D)
//! - exactly one native call per invocation, before classification
//! - stable classification across repeated calls
//! - argument validation ahead of the native call

use std::sync::atomic::{AtomicUsize, Ordering};

use spotbind::{
    disambiguate, Arg, Binding, DispatchError, Error, ErrorKind, Handle, NativeDispatch,
    Operation, RawResult,
};

/// Returns a fixed result and counts calls.
struct Scripted {
    result: RawResult,
    calls: AtomicUsize,
}

impl Scripted {
    fn returning(result: RawResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NativeDispatch for Scripted {
    fn call(&self, _op: Operation, _args: &[Arg]) -> Result<RawResult, DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

fn session() -> Arg {
    Arg::Handle(Handle(0x5e55))
}

#[test]
fn ok_status_returns_raw_result() {
    let binding = Binding::init(Scripted::returning(RawResult::Status(0)));
    let raw = binding
        .invoke_checked(Operation::SessionLogout, &[session()])
        .unwrap();
    assert_eq!(raw, RawResult::Status(0));
    assert_eq!(binding.dispatcher().calls(), 1);
}

#[test]
fn bad_credentials_fail_with_that_symbol() {
    let binding = Binding::init(Scripted::returning(RawResult::Status(
        ErrorKind::BadUsernameOrPassword.value(),
    )));
    let args = [
        session(),
        Arg::Str("alice".into()),
        Arg::Str("hunter2".into()),
        Arg::Bool(false),
        Arg::Null,
    ];
    let err = binding
        .invoke_checked(Operation::SessionLogin, &args)
        .unwrap_err();
    match err {
        Error::Status(kind) => assert_eq!(kind, ErrorKind::BadUsernameOrPassword),
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(binding.dispatcher().calls(), 1);
}

#[test]
fn handle_result_is_transparent() {
    let binding = Binding::init(Scripted::returning(RawResult::Handle(Handle(0x7f00_0010))));
    let raw = binding
        .invoke_checked(Operation::SessionPlaylistcontainer, &[session()])
        .unwrap();
    assert_eq!(raw, RawResult::Handle(Handle(0x7f00_0010)));
    assert_eq!(disambiguate(raw).kind, None);

    let unchecked = binding
        .invoke(Operation::SessionPlaylistcontainer, &[session()])
        .unwrap();
    assert_eq!(unchecked, RawResult::Handle(Handle(0x7f00_0010)));
}

#[test]
fn integer_result_equal_to_a_status_value_is_not_a_status() {
    let binding = Binding::init(Scripted::returning(RawResult::Int(40)));
    let raw = binding
        .invoke_checked(Operation::TrackDuration, &[Arg::Handle(Handle(1))])
        .unwrap();
    assert_eq!(raw.as_int(), Some(40));
}

#[test]
fn unknown_status_is_unrecognized_not_failure() {
    let binding = Binding::init(Scripted::returning(RawResult::Status(77)));
    let raw = binding
        .invoke_checked(Operation::ImageError, &[Arg::Handle(Handle(9))])
        .unwrap();
    assert_eq!(raw, RawResult::Status(77));

    let outcome = disambiguate(raw);
    assert_eq!(outcome.kind, None);
    assert_ne!(outcome.kind, Some(ErrorKind::Ok));
}

#[test]
fn classification_is_repeatable() {
    let binding = Binding::init(Scripted::returning(RawResult::Status(
        ErrorKind::NetworkDisabled.value(),
    )));
    let first = binding
        .invoke_checked(Operation::SessionRelogin, &[session()])
        .unwrap_err()
        .status();
    let second = binding
        .invoke_checked(Operation::SessionRelogin, &[session()])
        .unwrap_err()
        .status();
    assert_eq!(first, Some(ErrorKind::NetworkDisabled));
    assert_eq!(first, second);
    assert_eq!(binding.dispatcher().calls(), 2);
}

#[test]
fn every_non_ok_status_fails_with_itself() {
    for kind in ErrorKind::ALL.into_iter().filter(|k| !k.is_ok()) {
        let binding = Binding::init(Scripted::returning(RawResult::Status(kind.value())));
        let err = binding
            .invoke_checked(Operation::TrackError, &[Arg::Handle(Handle(1))])
            .unwrap_err();
        assert_eq!(err.status(), Some(kind));
    }
}

#[test]
fn wrong_arguments_are_rejected_before_the_call() {
    let binding = Binding::init(Scripted::returning(RawResult::Status(0)));
    let err = binding
        .invoke_checked(Operation::SessionPlayerPlay, &[session(), Arg::Int(1)])
        .unwrap_err();
    assert!(matches!(err, Error::Dispatch(DispatchError::ArgumentKind { index: 1, .. })));
    assert_eq!(err.status(), None);
    assert_eq!(binding.dispatcher().calls(), 0);
}

#[test]
fn invoke_by_name_resolves_catalogue_entries() {
    let binding = Binding::init(Scripted::returning(RawResult::Status(
        ErrorKind::IsLoading.value(),
    )));
    let err = binding
        .invoke_checked_by_name("search_error", &[Arg::Handle(Handle(3))])
        .unwrap_err();
    assert_eq!(err.status(), Some(ErrorKind::IsLoading));

    let err = binding
        .invoke_checked_by_name("sp_search_error", &[Arg::Handle(Handle(3))])
        .unwrap_err();
    assert!(matches!(err, Error::Dispatch(DispatchError::UnknownOperation(_))));
}
