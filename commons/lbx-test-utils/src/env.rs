//! Environment variable test helpers.
//!
//! Config tests mutate process-wide env vars; these guards restore the
//! previous values on drop so tests stay order-independent when run with
//! serial_test.

/// RAII guard that restores (or unsets) the original value when dropped.
pub struct EnvGuard {
    key: String,
    prev: Option<String>,
}

impl EnvGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            if let Some(ref v) = self.prev {
                std::env::set_var(&self.key, v);
            } else {
                std::env::remove_var(&self.key);
            }
        }
    }
}

/// Set an environment variable returning a guard that restores the previous
/// value when dropped.
pub fn set_env_guarded(key: &str, val: &str) -> EnvGuard {
    let prev = std::env::var(key).ok();
    unsafe {
        std::env::set_var(key, val);
    }
    EnvGuard {
        key: key.to_string(),
        prev,
    }
}

/// Remove every variable with the given prefix. Config tests call this first
/// so stray values from the surrounding shell cannot leak in.
pub fn clear_prefixed(prefix: &str) {
    let keys: Vec<String> = std::env::vars()
        .filter_map(|(k, _)| k.starts_with(prefix).then_some(k))
        .collect();
    for k in keys {
        unsafe {
            std::env::remove_var(k);
        }
    }
}

/// Builder-style collection of environment guards. Dropping restores all keys.
pub struct Env {
    guards: Vec<EnvGuard>,
}

impl Env {
    /// Create empty builder.
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Set a key -> val, capturing previous value; chainable.
    pub fn set(mut self, key: &str, val: &str) -> Self {
        self.guards.push(set_env_guarded(key, val));
        self
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
