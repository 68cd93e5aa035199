//! Deferred reveal steps.
//!
//! Reveal pacing never decides outcomes: every step a round schedules
//! is a presentation beat against an outcome already drawn. The host
//! drives the clock by calling `Engine::tick`, which drains due steps
//! in (due time, insertion) order.

/// What a due step does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    /// Reveal the coin flip result and settle.
    FlipSettle,
    /// The crash curve reaches the bust point.
    CrashPoint,
    /// Deal the next card of the blackjack opening sequence.
    DealCard,
    /// Reveal one dealer card during the dealer's turn.
    DealerDraw,
    /// Credit the fixed blackjack payout.
    DealerSettle,
    /// Reveal case opening winners and settle.
    SpinSettle,
    /// Resolve one battle round of drops.
    BattleRound,
    /// Award the battle pot.
    BattleSettle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledStep {
    pub due_at: u64,
    pub seq: u64,
    pub round_id: u64,
    pub kind: StepKind,
}

/// Pending reveal steps, drained by `Engine::tick`.
#[derive(Clone, Debug, Default)]
pub struct RevealScheduler {
    steps: Vec<ScheduledStep>,
    next_seq: u64,
}

impl RevealScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_at: u64, round_id: u64, kind: StepKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.steps.push(ScheduledStep {
            due_at,
            seq,
            round_id,
            kind,
        });
    }

    /// Remove and return all steps due at or before `now`, ordered by
    /// (due time, insertion order).
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledStep> {
        let mut due: Vec<ScheduledStep> = Vec::new();
        self.steps.retain(|step| {
            if step.due_at <= now {
                due.push(*step);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|step| (step.due_at, step.seq));
        due
    }

    /// Drop every pending step for a round (used on cancellation).
    pub fn cancel_round(&mut self, round_id: u64) {
        self.steps.retain(|step| step.round_id != round_id);
    }

    /// Earliest pending due time, if any. Lets hosts sleep precisely.
    pub fn next_due(&self) -> Option<u64> {
        self.steps.iter().map(|step| step.due_at).min()
    }

    pub fn pending(&self, round_id: u64) -> usize {
        self.steps.iter().filter(|s| s.round_id == round_id).count()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_order() {
        let mut sched = RevealScheduler::new();
        sched.schedule(200, 1, StepKind::DealCard);
        sched.schedule(100, 1, StepKind::DealCard);
        sched.schedule(100, 2, StepKind::FlipSettle);
        sched.schedule(300, 3, StepKind::SpinSettle);

        let due = sched.drain_due(200);
        assert_eq!(due.len(), 3);
        // Same due time resolves in insertion order
        assert_eq!(due[0].round_id, 1);
        assert_eq!(due[0].due_at, 100);
        assert_eq!(due[1].round_id, 2);
        assert_eq!(due[2].due_at, 200);

        assert_eq!(sched.next_due(), Some(300));
        assert!(sched.drain_due(250).is_empty());
        assert_eq!(sched.drain_due(300).len(), 1);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_cancel_round() {
        let mut sched = RevealScheduler::new();
        sched.schedule(100, 1, StepKind::DealCard);
        sched.schedule(200, 1, StepKind::DealCard);
        sched.schedule(150, 2, StepKind::FlipSettle);
        sched.cancel_round(1);
        assert_eq!(sched.pending(1), 0);
        let due = sched.drain_due(1_000);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].round_id, 2);
    }
}
