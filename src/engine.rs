//! The idle-triggered mover loop.
//!
//! One `tick()` per second, driven by the caller's timer. In reactive mode the
//! engine polls the OS idle time and nudges the cursor once it crosses the
//! configured threshold; in proactive mode it nudges unconditionally every
//! interval. Either way the nudge direction alternates so the cursor
//! oscillates around its resting position instead of drifting.

use anyhow::Result;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::{Config, Mode};
use crate::idle::IdleSource;
use crate::pointer::{PointerDevice, Position};

/// Upper bound for randomized move magnitudes, in pixels.
const MAX_RANDOM_OFFSET: f64 = 600.0;

/// What happened during a single loop iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Below the idle threshold; nothing to do.
    Waiting,
    /// User input resumed after an idle stretch.
    Resumed,
    /// The cursor was nudged.
    Moved { from: Position, to: Position },
    /// Proactive mode, counting down to the next move.
    Pending { seconds_until_move: u64 },
    /// An OS interaction failed this iteration; the loop carries on.
    Faulted,
}

/// Per-iteration snapshot consumed by the status display.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub outcome: Outcome,
    /// Idle seconds as last reported by the OS (reactive mode only).
    pub idle_seconds: u64,
    pub is_idle: bool,
    /// Total cursor moves since startup.
    pub moves: u64,
}

/// The mover loop state machine.
///
/// Owns all mutable loop state; the configuration snapshot is taken once at
/// construction and never changes.
pub struct Engine<I, P> {
    config: Config,
    idle: I,
    pointer: P,
    /// Current move direction, +1.0 or -1.0; flips after each successful move.
    direction: f64,
    /// Ticks elapsed, for proactive-mode scheduling.
    ticks: u64,
    /// Idle seconds as of the last reactive tick, for the status display.
    idle_seconds: u64,
    is_idle: bool,
    moves: u64,
}

impl<I: IdleSource, P: PointerDevice> Engine<I, P> {
    pub fn new(config: Config, idle: I, pointer: P) -> Self {
        Self {
            config,
            idle,
            pointer,
            direction: 1.0,
            ticks: 0,
            idle_seconds: 0,
            is_idle: false,
            moves: 0,
        }
    }

    /// Total cursor moves since startup.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Run one loop iteration.
    pub fn tick(&mut self) -> TickReport {
        let outcome = match self.config.mode {
            Mode::Reactive => self.tick_reactive(),
            Mode::Proactive => self.tick_proactive(),
        };

        TickReport {
            outcome,
            idle_seconds: self.idle_seconds,
            is_idle: self.is_idle,
            moves: self.moves,
        }
    }

    fn tick_reactive(&mut self) -> Outcome {
        let idle = match self.idle.idle_time() {
            Ok(duration) => duration,
            Err(e) => {
                warn!("Failed to query idle time: {:#}", e);
                return Outcome::Faulted;
            }
        };

        let idle_secs = idle.as_secs();

        if idle_secs >= self.config.interval_seconds {
            self.is_idle = true;
            self.idle_seconds = idle_secs;
            return match self.nudge() {
                Ok((from, to)) => Outcome::Moved { from, to },
                Err(e) => {
                    warn!("Failed to nudge cursor: {:#}", e);
                    Outcome::Faulted
                }
            };
        }

        // The OS reporting zero idle again means the user (or our own nudge)
        // produced input since the last tick.
        if idle_secs == 0 && self.idle_seconds != 0 {
            self.is_idle = false;
            self.idle_seconds = 0;
            return Outcome::Resumed;
        }

        self.idle_seconds = idle_secs;
        Outcome::Waiting
    }

    fn tick_proactive(&mut self) -> Outcome {
        self.ticks += 1;

        if self.ticks % self.config.interval_seconds == 0 {
            return match self.nudge() {
                Ok((from, to)) => Outcome::Moved { from, to },
                Err(e) => {
                    warn!("Failed to nudge cursor: {:#}", e);
                    Outcome::Faulted
                }
            };
        }

        Outcome::Pending {
            seconds_until_move: self.config.interval_seconds
                - self.ticks % self.config.interval_seconds,
        }
    }

    /// Displace the cursor along the diagonal and flip the direction.
    ///
    /// The direction only flips after a successful move so that actual moves
    /// strictly alternate even across transient pointer failures.
    fn nudge(&mut self) -> Result<(Position, Position)> {
        let from = self.pointer.position()?;

        let magnitude = if self.config.randomize {
            random_offset(&mut rand::thread_rng())
        } else {
            self.config.offset_px
        };

        let delta = (magnitude * self.direction).round() as i32;
        let to = from.offset_by(delta);

        self.pointer.move_to(to)?;
        debug!("Nudged cursor {} -> {}", from, to);

        self.direction = -self.direction;
        self.moves += 1;

        Ok((from, to))
    }
}

/// Draw a move magnitude uniformly from `[-MAX_RANDOM_OFFSET, MAX_RANDOM_OFFSET]`.
fn random_offset(rng: &mut impl Rng) -> f64 {
    rng.gen_range(-MAX_RANDOM_OFFSET..=MAX_RANDOM_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Idle source replaying a fixed list of samples, then zero.
    struct ScriptedIdle {
        samples: VecDeque<u64>,
    }

    impl ScriptedIdle {
        fn new(samples: &[u64]) -> Self {
            Self {
                samples: samples.iter().copied().collect(),
            }
        }
    }

    impl IdleSource for ScriptedIdle {
        fn idle_time(&mut self) -> Result<Duration> {
            Ok(Duration::from_secs(self.samples.pop_front().unwrap_or(0)))
        }
    }

    struct FailingIdle;

    impl IdleSource for FailingIdle {
        fn idle_time(&mut self) -> Result<Duration> {
            Err(anyhow!("no display"))
        }
    }

    /// Pointer that tracks its position and records every move.
    struct RecordingPointer {
        pos: Position,
        moves: Vec<Position>,
        failures_left: u32,
    }

    impl RecordingPointer {
        fn at(x: i32, y: i32) -> Self {
            Self {
                pos: Position::new(x, y),
                moves: Vec::new(),
                failures_left: 0,
            }
        }

        fn failing_first(x: i32, y: i32, failures: u32) -> Self {
            Self {
                failures_left: failures,
                ..Self::at(x, y)
            }
        }
    }

    impl PointerDevice for RecordingPointer {
        fn position(&mut self) -> Result<Position> {
            Ok(self.pos)
        }

        fn move_to(&mut self, target: Position) -> Result<()> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(anyhow!("transient pointer failure"));
            }
            self.pos = target;
            self.moves.push(target);
            Ok(())
        }
    }

    fn reactive_config(offset_px: f64, interval_seconds: u64) -> Config {
        Config {
            offset_px,
            interval_seconds,
            mode: Mode::Reactive,
            ..Config::default()
        }
    }

    fn proactive_config(offset_px: f64, interval_seconds: u64) -> Config {
        Config {
            mode: Mode::Proactive,
            ..reactive_config(offset_px, interval_seconds)
        }
    }

    #[test]
    fn direction_alternates_across_consecutive_moves() {
        let config = proactive_config(10.0, 1);
        let mut engine = Engine::new(config, ScriptedIdle::new(&[]), RecordingPointer::at(0, 0));

        for _ in 0..4 {
            engine.tick();
        }

        let moves = &engine.pointer.moves;
        assert_eq!(
            moves,
            &vec![
                Position::new(10, 10),
                Position::new(0, 0),
                Position::new(10, 10),
                Position::new(0, 0),
            ]
        );
    }

    #[test]
    fn two_moves_return_the_cursor_to_its_origin() {
        let config = reactive_config(7.0, 10);
        let mut engine = Engine::new(
            config,
            ScriptedIdle::new(&[10, 10]),
            RecordingPointer::at(320, 240),
        );

        engine.tick();
        engine.tick();

        assert_eq!(engine.pointer.pos, Position::new(320, 240));
        assert_eq!(engine.moves(), 2);
    }

    #[test]
    fn no_move_below_the_threshold() {
        let config = reactive_config(1.0, 30);
        let mut engine = Engine::new(config, ScriptedIdle::new(&[29]), RecordingPointer::at(0, 0));

        let report = engine.tick();

        assert_eq!(report.outcome, Outcome::Waiting);
        assert_eq!(report.idle_seconds, 29);
        assert!(engine.pointer.moves.is_empty());
    }

    #[test]
    fn move_triggers_once_idle_reaches_the_threshold() {
        let config = reactive_config(1.0, 30);
        let mut engine = Engine::new(config, ScriptedIdle::new(&[30]), RecordingPointer::at(0, 0));

        let report = engine.tick();

        assert!(matches!(report.outcome, Outcome::Moved { .. }));
        assert!(report.is_idle);
        assert_eq!(engine.pointer.moves.len(), 1);
    }

    #[test]
    fn idle_counter_resets_when_activity_resumes() {
        let config = reactive_config(1.0, 30);
        let mut engine = Engine::new(
            config,
            ScriptedIdle::new(&[5, 10, 0]),
            RecordingPointer::at(0, 0),
        );

        assert_eq!(engine.tick().idle_seconds, 5);
        assert_eq!(engine.tick().idle_seconds, 10);

        let report = engine.tick();
        assert_eq!(report.outcome, Outcome::Resumed);
        assert_eq!(report.idle_seconds, 0);
        assert!(!report.is_idle);
    }

    #[test]
    fn idle_spike_past_threshold_triggers_exactly_one_move() {
        // --offset 5 --max-idle 10, idle jumping 0 -> 15 -> 0
        let config = reactive_config(5.0, 10);
        let mut engine = Engine::new(
            config,
            ScriptedIdle::new(&[0, 15, 0]),
            RecordingPointer::at(100, 100),
        );

        engine.tick();
        let report = engine.tick();
        engine.tick();

        assert_eq!(
            report.outcome,
            Outcome::Moved {
                from: Position::new(100, 100),
                to: Position::new(105, 105),
            }
        );
        assert_eq!(engine.pointer.moves, vec![Position::new(105, 105)]);
    }

    #[test]
    fn proactive_moves_only_on_interval_multiples() {
        let config = proactive_config(1.0, 3);
        let mut engine = Engine::new(config, ScriptedIdle::new(&[]), RecordingPointer::at(0, 0));

        let outcomes: Vec<Outcome> = (0..7).map(|_| engine.tick().outcome).collect();

        assert_eq!(
            outcomes[0],
            Outcome::Pending {
                seconds_until_move: 2
            }
        );
        assert_eq!(
            outcomes[1],
            Outcome::Pending {
                seconds_until_move: 1
            }
        );
        assert!(matches!(outcomes[2], Outcome::Moved { .. }));
        assert!(matches!(outcomes[5], Outcome::Moved { .. }));
        assert_eq!(engine.pointer.moves.len(), 2);
    }

    #[test]
    fn fractional_offsets_round_per_move() {
        let config = proactive_config(2.4, 1);
        let mut engine = Engine::new(config, ScriptedIdle::new(&[]), RecordingPointer::at(0, 0));

        engine.tick();

        assert_eq!(engine.pointer.moves, vec![Position::new(2, 2)]);
    }

    #[test]
    fn idle_query_failure_is_survivable() {
        let config = reactive_config(1.0, 30);
        let mut engine = Engine::new(config, FailingIdle, RecordingPointer::at(0, 0));

        assert_eq!(engine.tick().outcome, Outcome::Faulted);
        assert_eq!(engine.tick().outcome, Outcome::Faulted);
        assert!(engine.pointer.moves.is_empty());
    }

    #[test]
    fn pointer_failure_does_not_flip_the_direction() {
        let config = reactive_config(10.0, 1);
        let mut engine = Engine::new(
            config,
            ScriptedIdle::new(&[5, 5]),
            RecordingPointer::failing_first(0, 0, 1),
        );

        assert_eq!(engine.tick().outcome, Outcome::Faulted);

        // The first successful move still goes in the positive direction.
        let report = engine.tick();
        assert_eq!(
            report.outcome,
            Outcome::Moved {
                from: Position::new(0, 0),
                to: Position::new(10, 10),
            }
        );
        assert_eq!(report.moves, 1);
    }

    #[test]
    fn random_magnitude_stays_within_the_limit() {
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let magnitude = random_offset(&mut rng);
            assert!((-MAX_RANDOM_OFFSET..=MAX_RANDOM_OFFSET).contains(&magnitude));
        }
    }
}
