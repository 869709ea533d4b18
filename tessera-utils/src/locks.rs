//! Lock aliases, so the locking crate is chosen in one place.

/// A synchronous mutex.
pub type SyncMutex<T> = parking_lot::Mutex<T>;
/// Guard returned by [`SyncMutex::lock`].
pub type SyncMutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;
