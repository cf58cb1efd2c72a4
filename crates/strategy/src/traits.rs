//! Signal rule trait

use crate::context::SignalContext;
use crate::signals::EntrySignal;

/// Trait for entry rules.
///
/// A rule sees one instrument at a time and returns at most one direction.
/// Rules are stateless; everything that persists across days belongs to the
/// lifecycle layer.
///
/// # Thread Safety
/// Rules must be `Send + Sync` so instruments can be evaluated in parallel.
pub trait SignalRule: Send + Sync {
    /// Evaluates the rule for one instrument.
    fn evaluate(&self, ctx: &SignalContext<'_>) -> EntrySignal;

    /// Name of the rule for logging/debugging.
    fn name(&self) -> &'static str;
}
