// Tick scheduler - Periodic timers in emulated clock time
//
// Timers are registered with a frequency in Hz of the emulated CPU clock, so
// render and input cadence follow emulation speed rather than the host's wall
// clock. The runloop asks how many cycles remain until the next deadline,
// runs the CPU for that long, advances the scheduler and fires what is due.

use crate::error::{FrontendError, Result};

#[derive(Debug, Clone)]
struct Timer<T> {
    period: u64,
    next_fire: u64,
    target: T,
}

/// Periodic timer queue keyed by emulated clock cycles
#[derive(Debug, Clone)]
pub struct TickScheduler<T> {
    clock_rate: u64,
    now: u64,
    timers: Vec<Timer<T>>,
}

impl<T: Copy> TickScheduler<T> {
    /// Create a scheduler for a CPU running at `clock_rate` Hz
    pub fn new(clock_rate: u64) -> Self {
        Self {
            clock_rate,
            now: 0,
            timers: Vec::new(),
        }
    }

    /// Register `target` to fire `frequency` times per emulated second
    ///
    /// The first firing happens one period from now.
    ///
    /// # Errors
    /// `InvalidTimerRate` for a zero frequency or one above the clock rate
    pub fn add_timer(&mut self, frequency: u32, target: T) -> Result<()> {
        if frequency == 0 || frequency as u64 > self.clock_rate {
            return Err(FrontendError::InvalidTimerRate {
                frequency,
                clock_rate: self.clock_rate,
            });
        }

        let period = self.clock_rate / frequency as u64;
        self.timers.push(Timer {
            period,
            next_fire: self.now + period,
            target,
        });
        tracing::debug!(frequency, period, "timer registered");
        Ok(())
    }

    /// Emulated clock rate in Hz
    pub fn clock_rate(&self) -> u64 {
        self.clock_rate
    }

    /// Cycles elapsed since the scheduler was created
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of registered timers
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Cycles until the earliest deadline, at least 1
    ///
    /// With no timers registered this is one sixtieth of an emulated second.
    pub fn cycles_until_next(&self) -> u64 {
        self.timers
            .iter()
            .map(|timer| timer.next_fire.saturating_sub(self.now))
            .min()
            .unwrap_or(self.clock_rate / 60)
            .max(1)
    }

    /// Move the clock forward by `cycles`
    pub fn advance(&mut self, cycles: u64) {
        self.now += cycles;
    }

    /// Take every timer that is due, earliest deadline first
    ///
    /// Each timer fires at most once per call. A timer that fell more than
    /// one period behind skips the missed deadlines instead of bursting.
    pub fn take_due(&mut self) -> Vec<T> {
        let mut due: Vec<(u64, usize)> = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.next_fire <= self.now)
            .map(|(index, timer)| (timer.next_fire, index))
            .collect();
        due.sort_unstable();

        let now = self.now;
        due.into_iter()
            .map(|(_, index)| {
                let timer = &mut self.timers[index];
                timer.next_fire += timer.period;
                if timer.next_fire <= now {
                    let behind = now - timer.next_fire;
                    timer.next_fire += (behind / timer.period + 1) * timer.period;
                }
                timer.target
            })
            .collect()
    }
}
