//! Serialises environment mutation across unit tests.

use std::env;

use tokio::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::const_new(());

/// Holds the environment lock and restores every touched variable on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets one variable while holding the lock.
    pub async fn set_var(key: &str, value: &str) -> Self {
        Self::set_vars(&[(key, value)]).await
    }

    /// Sets several variables while holding the lock.
    pub async fn set_vars(vars: &[(&str, &str)]) -> Self {
        let guard = ENV_LOCK.lock().await;
        let previous = vars
            .iter()
            .map(|(key, value)| {
                let old = env::var(key).ok();
                unsafe { env::set_var(key, value) };
                ((*key).to_owned(), old)
            })
            .collect();
        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            match old {
                Some(value) => unsafe { env::set_var(key, value) },
                None => unsafe { env::remove_var(key) },
            }
        }
    }
}
