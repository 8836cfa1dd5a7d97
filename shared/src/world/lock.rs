use std::{
    marker::PhantomData,
    ops::Deref,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    thread::{self, ThreadId},
};

struct LockState {
    owner: Option<ThreadId>,
    depth: usize,
}

/// A mutual-exclusion lock that the owning thread may re-enter.
///
/// The lock is only taken through [`lock`](Self::lock) and
/// [`try_lock`](Self::try_lock), and only released by dropping the returned
/// [`ReentrantLockGuard`]. Other threads get in once every guard of the
/// owning thread is gone.
///
/// Since guards on the same thread may nest, the value is handed out as `&T`;
/// callers that need mutation use interior mutability inside `T`.
///
/// ```compile_fail
/// let lock = vault_shared::ReentrantLock::new(());
/// let _guard = lock.lock();
/// lock.release();
/// ```
pub struct ReentrantLock<T> {
    state: Mutex<LockState>,
    released: Condvar,
    data: T,
}

// SAFETY: `data` is only reachable through a guard, and guards only exist on
// the thread that currently owns the lock, so `T` is never observed from two
// threads at once. `T: Send` is required because ownership of the access
// moves between threads over time.
unsafe impl<T: Send> Sync for ReentrantLock<T> {}

impl<T> ReentrantLock<T> {
    pub fn new(data: T) -> Self {
        Self {
            state: Mutex::new(LockState {
                owner: None,
                depth: 0,
            }),
            released: Condvar::new(),
            data,
        }
    }

    fn state(&self) -> MutexGuard<'_, LockState> {
        // the inner mutex is never held while user code runs
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Blocks until the lock is free or already owned by the calling thread.
    fn acquire(&self) {
        let current = thread::current().id();
        let mut state = self.state();

        loop {
            match state.owner {
                None => {
                    state.owner = Some(current);
                    state.depth = 1;
                    return;
                }
                Some(owner) if owner == current => {
                    state.depth += 1;
                    return;
                }
                Some(_) => {
                    state = self
                        .released
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    fn try_acquire(&self) -> bool {
        let current = thread::current().id();
        let mut state = self.state();

        match state.owner {
            None => {
                state.owner = Some(current);
                state.depth = 1;
                true
            }
            Some(owner) if owner == current => {
                state.depth += 1;
                true
            }
            Some(_) => false,
        }
    }

    // Undoes one `acquire`. Only a dropping guard calls this.
    fn release(&self) {
        let current = thread::current().id();
        let mut state = self.state();

        if state.owner != Some(current) {
            panic!(
                "ReentrantLock released by thread {:?} which does not own it (owner: {:?})",
                current, state.owner
            );
        }

        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.released.notify_one();
        }
    }

    pub fn lock(&self) -> ReentrantLockGuard<'_, T> {
        self.acquire();
        ReentrantLockGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    pub fn try_lock(&self) -> Option<ReentrantLockGuard<'_, T>> {
        if self.try_acquire() {
            Some(ReentrantLockGuard {
                lock: self,
                _not_send: PhantomData,
            })
        } else {
            None
        }
    }

    pub fn is_owned_by_current_thread(&self) -> bool {
        self.state().owner == Some(thread::current().id())
    }

    /// How many times the owning thread has acquired the lock; 0 when free.
    pub fn depth(&self) -> usize {
        self.state().depth
    }
}

/// Releases its [`ReentrantLock`] when dropped, including during unwinding.
pub struct ReentrantLockGuard<'a, T> {
    lock: &'a ReentrantLock<T>,
    // guards must be dropped on the thread that acquired them
    _not_send: PhantomData<*const ()>,
}

impl<T> Deref for ReentrantLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.lock.data
    }
}

impl<T> Drop for ReentrantLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
