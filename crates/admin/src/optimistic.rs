//! Optimistic UI updates.
//!
//! The tentative change is applied before the request goes out so the table
//! reflects it immediately. If the request fails, or its future is dropped
//! before completing, the state is put back exactly as it was.

use std::future::Future;

/// Apply `mutate` to `state`, run `request`, and roll back unless it succeeds.
///
/// # Errors
///
/// Returns the request's error after restoring `state`.
pub async fn with_optimistic_update<T, R, E, Fut>(
    state: &mut T,
    mutate: impl FnOnce(&mut T),
    request: impl FnOnce() -> Fut,
) -> Result<R, E>
where
    T: Clone,
    Fut: Future<Output = Result<R, E>>,
{
    let mut guard = Rollback {
        snapshot: Some(state.clone()),
        state,
    };
    mutate(&mut *guard.state);

    let result = request().await;
    if result.is_ok() {
        guard.snapshot = None;
    }
    result
}

/// Restores the snapshot on drop unless it has been taken.
struct Rollback<'a, T> {
    state: &'a mut T,
    snapshot: Option<T>,
}

impl<T> Drop for Rollback<'_, T> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.state = snapshot;
        }
    }
}
