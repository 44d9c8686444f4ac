use super::types::SimTime;

/// Running aggregate of independent samples
#[derive(Debug, Clone, Default)]
pub struct Tally {
    count: u64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Tally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample
    pub fn record(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all samples, 0.0 when nothing was recorded
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Forget every sample
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Time-weighted average of a level that changes at discrete instants,
/// such as the length of a queue.
#[derive(Debug, Clone)]
pub struct LevelMonitor {
    level: usize,
    since: SimTime,
    last_change: SimTime,
    area: f64,
}

impl LevelMonitor {
    /// Start observing at `now` with the given level
    pub fn new(level: usize, now: SimTime) -> Self {
        Self {
            level,
            since: now,
            last_change: now,
            area: 0.0,
        }
    }

    /// Record that the level became `level` at `now`
    pub fn set(&mut self, level: usize, now: SimTime) {
        self.accumulate(now);
        self.level = level;
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Mean level over [start, now]; 0.0 for an empty window
    pub fn mean(&self, now: SimTime) -> f64 {
        let elapsed = now.saturating_sub(self.since);
        if elapsed == 0 {
            return 0.0;
        }
        let pending = (now.saturating_sub(self.last_change)) as f64 * self.level as f64;
        (self.area + pending) / elapsed as f64
    }

    /// Restart the observation window at `now`, keeping the current level
    pub fn reset(&mut self, now: SimTime) {
        self.since = now;
        self.last_change = now;
        self.area = 0.0;
    }

    fn accumulate(&mut self, now: SimTime) {
        let elapsed = now.saturating_sub(self.last_change);
        self.area += elapsed as f64 * self.level as f64;
        self.last_change = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tally_mean_is_zero() {
        let tally = Tally::new();
        assert_eq!(tally.count(), 0);
        assert_eq!(tally.mean(), 0.0);
        assert_eq!(tally.max(), None);
    }

    #[test]
    fn test_tally_aggregates() {
        let mut tally = Tally::new();
        tally.record(2.0);
        tally.record(4.0);
        tally.record(9.0);
        assert_eq!(tally.count(), 3);
        assert_eq!(tally.mean(), 5.0);
        assert_eq!(tally.min(), Some(2.0));
        assert_eq!(tally.max(), Some(9.0));

        tally.reset();
        assert_eq!(tally.count(), 0);
        assert_eq!(tally.mean(), 0.0);
    }

    #[test]
    fn test_level_monitor_time_weighted_mean() {
        let mut monitor = LevelMonitor::new(0, 0);
        monitor.set(2, 10);
        monitor.set(1, 20);
        // 0 for 10 units, 2 for 10 units, 1 for 20 units
        assert_eq!(monitor.mean(40), 40.0 / 40.0);
    }

    #[test]
    fn test_level_monitor_reset_keeps_level() {
        let mut monitor = LevelMonitor::new(0, 0);
        monitor.set(3, 5);
        monitor.reset(100);
        assert_eq!(monitor.level(), 3);
        assert_eq!(monitor.mean(100), 0.0);
        assert_eq!(monitor.mean(110), 3.0);
    }
}
