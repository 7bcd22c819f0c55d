/// Classification for retry policy.
///
/// Used by the update orchestrator to decide how loudly to report a
/// failed lookup. Neither class retries inside the current cycle.
///
/// # Behavior Summary
///
/// | Class | Retried next cycle? | Logged as |
/// |-------|---------------------|-----------|
/// | `NextCycle` | Yes | warning |
/// | `NeedsUserAction` | Yes (will keep failing) | error |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient or provider-side failure.
    /// The cached quote keeps serving until a later cycle succeeds.
    NextCycle,

    /// The request was rejected because of the configured credential.
    /// Later cycles are still attempted, but only the user can fix it.
    NeedsUserAction,
}
