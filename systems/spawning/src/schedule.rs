//! Precomputed target appearance times.

use std::time::Duration;

use bertha_knockout_core::RandomSource;

/// Ascending target spawn times for one round.
///
/// Entry `i` lands at `(i + u) * duration / count` for a uniform `u` in
/// `0.0..1.0`, so appearances stay evenly spread while their exact moment
/// varies. Entries are consumed in order and never revisited.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetSchedule {
    entries: Vec<Duration>,
    cursor: usize,
}

impl TargetSchedule {
    /// Jitters `count` evenly spaced offsets across `duration`.
    pub fn generate<R>(count: u32, duration: Duration, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let mut entries = Vec::with_capacity(count as usize);
        if count > 0 {
            let spacing = duration.as_secs_f64() / f64::from(count);
            for index in 0..count {
                let offset = (f64::from(index) + rng.next_unit()) * spacing;
                entries.push(Duration::from_secs_f64(offset).min(duration));
            }
        }
        entries.sort_unstable();
        Self { entries, cursor: 0 }
    }

    /// Every entry of the schedule, consumed or not.
    #[must_use]
    pub fn entries(&self) -> &[Duration] {
        &self.entries
    }

    /// Entries that have not been consumed yet.
    #[must_use]
    pub fn pending(&self) -> &[Duration] {
        &self.entries[self.cursor..]
    }

    /// Consumes the next entry if it is due at `elapsed`.
    pub(crate) fn take_due(&mut self, elapsed: Duration) -> Option<Duration> {
        let next = *self.entries.get(self.cursor)?;
        if next > elapsed {
            return None;
        }
        self.cursor += 1;
        Some(next)
    }
}
