//! Buffer lifecycle metrics.
//!
//! Buffers report two events: `grow`, when output storage is reallocated
//! (with the element `kind` and the new `capacity`), and `flush`, when an
//! output buffer is written to its destination (with the number of
//! `elements`). Each event becomes one `KZBUF_METRIC: { ... }` line on the
//! `kzbuf::metric` log target. Release builds compile the calls away.

/// Level metric records are logged at. `enable_verbose_logging` shows it.
pub const METRIC_LEVEL: log::Level = log::Level::Info;

/// Logs one metric record made of `"key" = value` fields, in debug builds only.
///
/// Every value only needs `Display`.
///
/// # Example
/// ```
/// use kzbuf::log_metric;
/// let capacity = 8192;
/// log_metric!("event" = "grow", "kind" = "int16", "capacity" = capacity);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let fields = [$(format!("\"{}\": \"{}\"", $key, $value)),+];
            $crate::__log::log!(
                target: "kzbuf::metric",
                $crate::__METRIC_LEVEL,
                "KZBUF_METRIC: {{ {} }}",
                fields.join(", ")
            );
        }
    };
}
