//! Tracing setup helpers for applications embedding `tickline`.
//!
//! Setup stays explicit and opt-in: hosts either call
//! [`init_default_tracing`] or wire their own `tracing` subscriber and
//! filters before creating an engine.

/// Installs a compact `tracing` subscriber honoring `RUST_LOG`, falling
/// back to the `info` level. Only available with the `telemetry` feature.
///
/// Returns `true` on success and `false` when the feature is disabled or a
/// global subscriber was already installed by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
