/// Classification for how the resolution pipeline reacts to a failure.
///
/// # Behavior Summary
///
/// | Class | Pipeline continues? | Surfaced to caller? |
/// |-------|---------------------|---------------------|
/// | `DegradeToMiss` | Yes, stage counts as a miss | No |
/// | `SkipRecord` | Yes, offending value is skipped | No |
/// | `LogOnly` | Yes, value already returned | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// A lookup could not be completed (network, status, parse, `ok=false`).
    /// The stage is treated as if it returned no candidate.
    DegradeToMiss,

    /// A record or field had an unexpected shape.
    /// The scanner moves on to the next field or record.
    SkipRecord,

    /// A persistence write failed after the value was already bound.
    /// Logged and counted, never retried.
    LogOnly,
}
