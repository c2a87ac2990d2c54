//! Invocation contract
//!
//! Runs one iteration of a test and turns every way it can fail (returned
//! error, panic, callback failure, dropped completion handle, broken module)
//! into a [`CaseError`].

use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::{self, AssertUnwindSafe};
use tokio::sync::oneshot;

use crate::models::CaseError;
use crate::suite::{Done, Outcome, TestFn};

/// Invoke a test once and wait for it to settle
pub async fn invoke(func: &TestFn) -> Result<(), CaseError> {
    match func {
        TestFn::Sync(f) => catch(|| f())?.map_err(CaseError::Failed),
        TestFn::Async(f) => settle(catch(|| f())?).await,
        TestFn::Callback(f) => {
            let (done, rx) = Done::channel();
            match catch(|| f(done))? {
                None => completion(rx).await,
                Some(returned) => race(completion(rx), settle(returned)).await,
            }
        }
        TestFn::Broken(err) => Err(CaseError::Load(err.clone())),
    }
}

/// Call synchronously, converting a panic into a case error
fn catch<T>(f: impl FnOnce() -> T) -> Result<T, CaseError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(CaseError::panicked)
}

/// Await a returned future, converting a panic while polling
async fn settle(future: BoxFuture<'static, Outcome>) -> Result<(), CaseError> {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(outcome) => outcome.map_err(CaseError::Failed),
        Err(payload) => Err(CaseError::panicked(payload)),
    }
}

/// Wait for the completion handle to be signalled
async fn completion(rx: oneshot::Receiver<Outcome>) -> Result<(), CaseError> {
    match rx.await {
        Ok(outcome) => outcome.map_err(CaseError::Callback),
        Err(_) => Err(CaseError::CallbackDropped),
    }
}

/// Race the completion callback against the returned future
///
/// Resolves on the first failure from either side, or once both succeed.
/// When both fail within the same poll the callback's error is kept.
async fn race(
    callback: impl std::future::Future<Output = Result<(), CaseError>>,
    returned: impl std::future::Future<Output = Result<(), CaseError>>,
) -> Result<(), CaseError> {
    tokio::pin!(callback);
    tokio::pin!(returned);

    tokio::select! {
        biased;
        outcome = &mut callback => {
            outcome?;
            returned.await
        }
        outcome = &mut returned => {
            if let Err(err) = outcome {
                // a callback failure signalled during the same poll takes precedence
                return match callback.as_mut().now_or_never() {
                    Some(Err(CaseError::CallbackDropped)) | Some(Ok(())) | None => Err(err),
                    Some(Err(callback_err)) => Err(callback_err),
                };
            }
            callback.await
        }
    }
}
