//! Tracing/logging setup shared by binaries, examples and benches.

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize logging with explicit filter directives (e.g. `"valsem_core=trace"`),
/// ignoring `RUST_LOG`.
pub fn init_with_filter(directives: &str) {
    tracing::init_with_filter(directives);
}

/// Subscriber configuration (filters, formatting).
pub mod tracing;
