/// Fire-and-forget haptic feedback.
pub trait HapticSink: Send + Sync {
    /// Emit a single feedback pulse.
    fn pulse(&self);
}
