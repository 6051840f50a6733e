// src/resolver/common.rs
//
// Common utilities shared across probe modules.

pub use crate::error::ProbeResult;

use crate::error::ProbeError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::debug;

/// Run `f`, converting a panic into [`ProbeError::InternalPanic`].
///
/// The JPEG binding reports libjpeg's fatal errors by unwinding out of the
/// error hook. Everything the closure owns is dropped during the unwind, so
/// the decoder is destroyed before control returns here.
pub fn run_with_panic_policy<T, F>(label: &'static str, f: F) -> ProbeResult<T>
where
    F: FnOnce() -> ProbeResult<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            debug!(target: "icc_resolver::probe", %label, %message, "panic contained");
            Err(ProbeError::internal_panic(format!("{label}: {message}")))
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Log a swallowed probe failure and collapse it into "no profile".
pub fn log_miss<T>(probe: &'static str, result: ProbeResult<Option<T>>) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(err) => {
            debug!(
                target: "icc_resolver::probe",
                %probe,
                category = err.category().as_str(),
                error = %err,
                "probe failed"
            );
            None
        }
    }
}
