use thiserror::Error;

/// Construction-time failures. Per-frame numeric anomalies are clamped and
/// never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("seed {0} is degenerate for the particle generator (multiple of 2^31-1)")]
    DegenerateSeed(u64),
    #[error("unknown visual variant `{0}` (expected disk, spiral, sphere or tunnel)")]
    UnknownVariant(String),
    #[error("unknown quality tier `{0}` (expected high or low)")]
    UnknownTier(String),
}
