//! Process-global environment mutation helpers.
//!
//! Environment variables are shared by every test thread, so mutation goes
//! through [`ScopedEnv`], which holds a global lock for its whole lifetime and
//! restores every touched variable when dropped.

use std::sync::{Mutex, MutexGuard, OnceLock};

fn global_env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: every writer holds the global env lock through `ScopedEnv`.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Serialized view of the process environment that undoes its changes on drop.
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Acquire the global environment lock.
    ///
    /// A poisoned lock (a previous holder panicked) is recovered, since the
    /// previous holder's guard already restored its variables while unwinding.
    pub fn lock() -> Self {
        let lock = global_env_lock()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            saved: Vec::new(),
            _lock: lock,
        }
    }

    fn remember(&mut self, key: &str) {
        if self.saved.iter().all(|(saved, _)| saved != key) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
        }
    }

    /// Set `key=value` until this scope ends.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.remember(key);
        write_var(key, Some(value));
        self
    }

    /// Remove `key` until this scope ends.
    pub fn remove(mut self, key: &str) -> Self {
        self.remember(key);
        write_var(key, None);
        self
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            write_var(&key, previous.as_deref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{write_var, ScopedEnv};

    #[test]
    fn scoped_env_restores_previous_values() {
        let key = "RECIPEBOX_TEST_SCOPED_ENV_RESTORE";
        {
            let _outer = ScopedEnv::lock().set(key, "before");
        }
        assert!(std::env::var(key).is_err());

        let env = ScopedEnv::lock().set(key, "first").set(key, "second");
        assert_eq!(std::env::var(key).ok().as_deref(), Some("second"));
        drop(env);
        assert!(std::env::var(key).is_err());
    }

    #[test]
    fn scoped_env_remove_restores_existing_value() {
        let key = "RECIPEBOX_TEST_SCOPED_ENV_REMOVE";
        let env = ScopedEnv::lock();
        write_var(key, Some("original"));

        let env = env.remove(key);
        assert!(std::env::var(key).is_err());
        drop(env);

        assert_eq!(std::env::var(key).ok().as_deref(), Some("original"));
        write_var(key, None);
    }
}
