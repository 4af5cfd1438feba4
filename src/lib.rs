//! mini_swarm: keyword-routed multi-handler request service.
//!
//! A free-text request comes in, every registered handler scores it,
//! the best match runs its tools, and a uniform response envelope goes
//! back out.  This library crate re-exports modules so integration
//! tests (under `tests/`) can access them.

pub mod config;
pub mod gateway;
pub mod handlers;
pub mod router;
pub mod tools;
pub mod utils;

/// Return the swarmd home directory.
///
/// Resolution order:
/// 1. `SWARMD_HOME` environment variable
/// 2. `$HOME/.swarmd`
pub fn swarm_home() -> std::path::PathBuf {
    if let Ok(p) = std::env::var("SWARMD_HOME") {
        std::path::PathBuf::from(p)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(".swarmd")
    }
}
