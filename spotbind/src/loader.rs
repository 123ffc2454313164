//! Runtime loading of the native library.
//!
//! Symbols are resolved on first use and cached. Calls are made through
//! machine-word signatures: every catalogue parameter is a pointer, integer
//! or boolean, so it occupies one pointer-sized register or stack slot, and
//! the return word is narrowed by the operation's declared [`Shape`].

use std::collections::HashMap;
use std::ffi::{c_char, CStr, CString};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use parking_lot::Mutex;

use crate::config::{LibraryConfig, INSTALL_HINT};
use crate::dispatch::NativeDispatch;
use crate::error::DispatchError;
use crate::operation::Operation;
use crate::value::{Arg, Handle, RawResult, Shape};

/// A loaded copy of the native library.
pub struct NativeLibrary {
    path: PathBuf,
    library: Library,
    symbols: Mutex<HashMap<&'static str, usize>>,
}

impl NativeLibrary {
    /// Load the library from one path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let path = path.as_ref().to_path_buf();
        // Loading runs the library's initializers; the caller chose the path.
        let library = unsafe { Library::new(&path) }.map_err(|e| {
            DispatchError::Load(format!("failed to load '{}': {e}", path.display()))
        })?;
        tracing::debug!("loaded native library from {}", path.display());
        Ok(Self {
            path,
            library,
            symbols: Mutex::new(HashMap::new()),
        })
    }

    /// Try each configured candidate in order; the first that loads wins.
    pub fn open(config: &LibraryConfig) -> Result<Self, DispatchError> {
        let candidates = config.candidates();
        let mut failures = Vec::with_capacity(candidates.len());
        for path in &candidates {
            match Self::load(path) {
                Ok(lib) => return Ok(lib),
                Err(e) => {
                    tracing::debug!("{e}");
                    failures.push(e.to_string());
                }
            }
        }
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Err(DispatchError::Load(format!(
            "Failed to load the `libspotify` library. Make sure it is installed, either \
             globally on your system, in your LD_LIBRARY_PATH, or in your current working \
             directory ({cwd}). Tried:\n  {}\nFor installation instructions, see {INSTALL_HINT}",
            failures.join("\n  ")
        )))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn address(&self, op: Operation) -> Result<usize, DispatchError> {
        let symbol = op.symbol();
        if let Some(&addr) = self.symbols.lock().get(symbol) {
            return Ok(addr);
        }
        let name = CString::new(symbol).map_err(|_| DispatchError::InteriorNul)?;
        let sym: Symbol<*const ()> = unsafe { self.library.get(name.as_bytes_with_nul()) }
            .map_err(|e| DispatchError::SymbolNotFound {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;
        let addr = *sym as usize;
        self.symbols.lock().insert(symbol, addr);
        tracing::trace!("resolved {symbol} at {addr:#x}");
        Ok(addr)
    }
}

/// One argument or return slot: pointer-sized on every target, so 32-bit
/// builds pass `int` and pointer arguments in a single stack slot.
type Word = usize;

/// Convert arguments to machine words. Strings are copied into `keep`, which
/// must outlive the call.
fn marshal(args: &[Arg], keep: &mut Vec<CString>) -> Result<Vec<Word>, DispatchError> {
    args.iter()
        .map(|arg| {
            Ok(match arg {
                Arg::Handle(h) => h.0 as Word,
                Arg::Int(v) | Arg::Status(v) => *v as isize as Word,
                Arg::Size(v) => *v as Word,
                Arg::Bool(b) => Word::from(*b),
                Arg::Null => 0,
                Arg::Str(s) => {
                    let c = CString::new(s.as_str()).map_err(|_| DispatchError::InteriorNul)?;
                    let ptr = c.as_ptr() as Word;
                    keep.push(c);
                    ptr
                }
            })
        })
        .collect()
}

/// Narrow a return value to the declared shape. `Shape::UInt` values arrive
/// whole; every other shape arrives as a zero-extended [`Word`].
///
/// # Safety
///
/// For `Shape::Str`, `word` must be null or point at a NUL-terminated string.
unsafe fn unmarshal(word: u64, shape: Shape) -> RawResult {
    match shape {
        Shape::Status => RawResult::Status(word as u32 as i32),
        Shape::Int => RawResult::Int(word as u32 as i32),
        Shape::UInt => RawResult::UInt(word),
        Shape::Bool => RawResult::Bool(word & 0xff != 0),
        Shape::Handle => RawResult::Handle(Handle(word as Word as u64)),
        Shape::Void => RawResult::Void,
        Shape::Str => {
            let ptr = word as Word as *const c_char;
            if ptr.is_null() {
                RawResult::Str(None)
            } else {
                let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
                RawResult::Str(Some(s))
            }
        }
    }
}

// libspotify exports use `__stdcall` on 32-bit Windows and the C convention
// everywhere else, which is exactly what "system" selects.
type Fn0<R> = unsafe extern "system" fn() -> R;
type Fn1<R> = unsafe extern "system" fn(Word) -> R;
type Fn2<R> = unsafe extern "system" fn(Word, Word) -> R;
type Fn3<R> = unsafe extern "system" fn(Word, Word, Word) -> R;
type Fn4<R> = unsafe extern "system" fn(Word, Word, Word, Word) -> R;
type Fn5<R> = unsafe extern "system" fn(Word, Word, Word, Word, Word) -> R;

macro_rules! call_arity {
    ($ret:ty, $addr:expr, $words:expr) => {
        match *$words {
            [] => std::mem::transmute::<usize, Fn0<$ret>>($addr)(),
            [a] => std::mem::transmute::<usize, Fn1<$ret>>($addr)(a),
            [a, b] => std::mem::transmute::<usize, Fn2<$ret>>($addr)(a, b),
            [a, b, c] => std::mem::transmute::<usize, Fn3<$ret>>($addr)(a, b, c),
            [a, b, c, d] => std::mem::transmute::<usize, Fn4<$ret>>($addr)(a, b, c, d),
            [a, b, c, d, e] => std::mem::transmute::<usize, Fn5<$ret>>($addr)(a, b, c, d, e),
            _ => return None,
        }
    };
}

/// Call the function at `addr` with `words`. A `Shape::UInt` return is read
/// as a full `u64`, which 32-bit targets return in a register pair.
///
/// # Safety
///
/// `addr` must be a function taking `words.len()` word-sized arguments and
/// returning a value of `shape`.
unsafe fn call_words(addr: usize, words: &[Word], shape: Shape) -> Option<u64> {
    unsafe {
        Some(if shape == Shape::UInt {
            call_arity!(u64, addr, words)
        } else {
            call_arity!(Word, addr, words) as u64
        })
    }
}

impl NativeDispatch for NativeLibrary {
    fn call(&self, op: Operation, args: &[Arg]) -> Result<RawResult, DispatchError> {
        let addr = self.address(op)?;
        let mut keep = Vec::new();
        let words = marshal(args, &mut keep)?;
        let shape = op.returns();
        // Arguments were validated against the catalogue signature by the binding.
        let word = unsafe { call_words(addr, &words, shape) }.ok_or(DispatchError::ArgumentCount {
            op: op.name(),
            expected: op.params().len(),
            got: words.len(),
        })?;
        drop(keep);
        Ok(unsafe { unmarshal(word, shape) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marshal_words() {
        let mut keep = Vec::new();
        let words = marshal(
            &[
                Arg::Handle(Handle(0x1000)),
                Arg::Int(-1),
                Arg::Bool(true),
                Arg::Null,
                Arg::Str("abc".into()),
            ],
            &mut keep,
        )
        .unwrap();
        assert_eq!(words[0], 0x1000);
        assert_eq!(words[1] as u32 as i32, -1);
        assert_eq!(words[1], usize::MAX);
        assert_eq!(words[2], 1);
        assert_eq!(words[3], 0);
        assert_eq!(keep.len(), 1);
        assert_eq!(words[4], keep[0].as_ptr() as usize);
    }

    #[test]
    fn test_marshal_rejects_interior_nul() {
        let mut keep = Vec::new();
        let err = marshal(&[Arg::Str("a\0b".into())], &mut keep).unwrap_err();
        assert!(matches!(err, DispatchError::InteriorNul));
    }

    #[test]
    fn test_unmarshal_narrows() {
        unsafe {
            assert_eq!(unmarshal(0xffff_ffff_0000_0006, Shape::Status), RawResult::Status(6));
            assert_eq!(unmarshal(0xffff_ffff, Shape::Int), RawResult::Int(-1));
            assert_eq!(unmarshal(0x100, Shape::Bool), RawResult::Bool(false));
            assert_eq!(unmarshal(1, Shape::Bool), RawResult::Bool(true));
            assert_eq!(unmarshal(0, Shape::Str), RawResult::Str(None));
            assert_eq!(unmarshal(9, Shape::Void), RawResult::Void);
        }
    }

    #[test]
    fn test_unmarshal_string() {
        let s = CString::new("0.1.2").unwrap();
        let raw = unsafe { unmarshal(s.as_ptr() as Word as u64, Shape::Str) };
        assert_eq!(raw, RawResult::Str(Some("0.1.2".to_string())));
    }

    unsafe extern "system" fn add3(a: Word, b: Word, c: Word) -> Word {
        a + b + c
    }

    unsafe extern "system" fn wide(hi: Word, lo: Word) -> u64 {
        ((hi as u64) << 32) | lo as u64
    }

    type SeekFn = unsafe extern "system" fn(Word, i32) -> Word;

    unsafe extern "system" fn second_int(_session: Word, offset: i32) -> Word {
        offset as isize as Word
    }

    #[test]
    fn test_call_words_dispatches_by_arity() {
        let addr = add3 as Fn3<Word> as usize;
        assert_eq!(unsafe { call_words(addr, &[1, 2, 3], Shape::Int) }, Some(6));
        assert_eq!(unsafe { call_words(addr, &[0; 6], Shape::Int) }, None);
    }

    #[test]
    fn test_call_words_reads_wide_return() {
        let addr = wide as Fn2<u64> as usize;
        let got = unsafe { call_words(addr, &[0x1, 0x2], Shape::UInt) };
        assert_eq!(got, Some(0x1_0000_0002));
    }

    #[test]
    fn test_int_argument_lands_in_its_own_slot() {
        let mut keep = Vec::new();
        let words = marshal(&[Arg::Handle(Handle(0x1000)), Arg::Int(30000)], &mut keep).unwrap();
        let addr = second_int as SeekFn as usize;
        let got = unsafe { call_words(addr, &words, Shape::Int) }.unwrap();
        assert_eq!(unsafe { unmarshal(got, Shape::Int) }, RawResult::Int(30000));
    }

    #[test]
    fn test_open_reports_tried_paths() {
        let cfg = LibraryConfig {
            library_path: Some(PathBuf::from("/nonexistent/libspotify-test.so")),
            extra_search_paths: Vec::new(),
        };
        match NativeLibrary::open(&cfg) {
            Ok(_) => {} // a real libspotify is installed on this machine
            Err(e) => {
                let msg = e.to_string();
                assert!(msg.contains("/nonexistent/libspotify-test.so"), "{msg}");
                assert!(msg.contains(INSTALL_HINT));
            }
        }
    }
}
