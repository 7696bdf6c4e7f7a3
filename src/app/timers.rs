//! Deterministische Periodik für Label-Spreizung und Label-Rundlauf.
//!
//! Es laufen keine Threads; der Host meldet die verstrichene Zeit und erhält
//! die fälligen Aufgaben zurück.

/// Periodische Aufgabe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerJob {
    /// Ein Spreiz-Durchlauf des Label-Overlays
    LabelSpread,
    /// Nächstes Label nach oben holen
    TopLabelRotation,
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period_ms: u64,
    elapsed_ms: u64,
}

impl Interval {
    fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            elapsed_ms: 0,
        }
    }

    /// Anzahl der in `elapsed_ms` fälligen Ausführungen. Periode 0 = deaktiviert.
    fn advance(&mut self, elapsed_ms: u64) -> u64 {
        if self.period_ms == 0 {
            return 0;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        let due = self.elapsed_ms / self.period_ms;
        self.elapsed_ms %= self.period_ms;
        due
    }
}

/// Zeitgeber der Anwendung.
#[derive(Debug, Clone)]
pub struct Timers {
    spread: Interval,
    rotation: Interval,
}

impl Timers {
    /// Obergrenze der Spreiz-Durchläufe pro Aufruf, damit lange Pausen nicht nachlaufen.
    pub const MAX_SPREAD_CATCH_UP: u64 = 10;

    /// Zeitgeber mit den Perioden in Millisekunden.
    pub fn new(spread_interval_ms: u64, rotation_interval_ms: u64) -> Self {
        Self {
            spread: Interval::new(spread_interval_ms),
            rotation: Interval::new(rotation_interval_ms),
        }
    }

    /// Schreitet um `elapsed_ms` voran und liefert die fälligen Aufgaben in Ausführungsreihenfolge.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<TimerJob> {
        let spreads = self.spread.advance(elapsed_ms).min(Self::MAX_SPREAD_CATCH_UP);
        let rotations = self.rotation.advance(elapsed_ms);

        let mut jobs = Vec::with_capacity((spreads + rotations.min(1)) as usize);
        jobs.extend((0..spreads).map(|_| TimerJob::LabelSpread));
        // Mehrfache Rotation in einem Schritt wäre unsichtbar
        if rotations > 0 {
            jobs.push(TimerJob::TopLabelRotation);
        }
        jobs
    }

    /// Setzt beide Zeitgeber zurück.
    pub fn reset(&mut self) {
        self.spread.elapsed_ms = 0;
        self.rotation.elapsed_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_become_due_after_their_period() {
        let mut timers = Timers::new(100, 2000);
        assert!(timers.advance(50).is_empty());
        assert_eq!(timers.advance(50), vec![TimerJob::LabelSpread]);
        assert_eq!(timers.advance(250).len(), 2);

        let jobs = timers.advance(1700);
        assert_eq!(jobs.last(), Some(&TimerJob::TopLabelRotation));
        assert_eq!(
            jobs.iter().filter(|j| **j == TimerJob::LabelSpread).count(),
            10
        );
    }

    #[test]
    fn test_huge_elapsed_time_is_capped_not_overflowing() {
        let mut timers = Timers::new(100, 2000);
        timers.advance(50);
        let jobs = timers.advance(u64::MAX);
        assert_eq!(jobs.len(), Timers::MAX_SPREAD_CATCH_UP as usize + 1);
        assert_eq!(jobs.last(), Some(&TimerJob::TopLabelRotation));
    }

    #[test]
    fn test_zero_period_disables_job() {
        let mut timers = Timers::new(0, 0);
        assert!(timers.advance(10_000).is_empty());
    }

    #[test]
    fn test_reset_discards_partial_progress() {
        let mut timers = Timers::new(100, 0);
        timers.advance(90);
        timers.reset();
        assert!(timers.advance(20).is_empty());
    }
}
