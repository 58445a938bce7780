//! Progress timelines driving the crouch interpolations.
//!
//! A [`Timeline`] owns a playback position and a [`Curve`]. Ticking a playing
//! timeline moves the position forward or backward and reports the curve
//! value at the new position; ticking a stopped timeline does nothing.

use serde::{Deserialize, Serialize};

/// Maps elapsed time to a progress value.
pub trait Curve {
    fn evaluate(&self, time: f32) -> f32;

    /// Time of the last key. Playback stops there.
    fn length(&self) -> f32;
}

/// A single curve key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// Piecewise-linear curve through a sorted list of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedCurve {
    keys: Vec<CurveKey>,
}

impl KeyedCurve {
    /// Build a curve from keys in any order. Empty input yields a flat zero curve.
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Straight ramp from 0 to 1 over `duration` seconds.
    pub fn linear(duration: f32) -> Self {
        Self::new(vec![
            CurveKey { time: 0.0, value: 0.0 },
            CurveKey { time: duration.max(f32::EPSILON), value: 1.0 },
        ])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }
}

impl Curve for KeyedCurve {
    fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; the one before it starts the segment
        let upper = self.keys.partition_point(|key| key.time <= time);
        let (a, b) = (self.keys[upper - 1], self.keys[upper]);
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        a.value + (b.value - a.value) * ((time - a.time) / span)
    }

    fn length(&self) -> f32 {
        self.keys.last().map_or(0.0, |key| key.time)
    }
}

/// Playback direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Play/reverse timeline over a curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline<C = KeyedCurve> {
    curve: C,
    position: f32,
    direction: Direction,
    playing: bool,
}

impl<C: Curve> Timeline<C> {
    pub fn new(curve: C) -> Self {
        Self {
            curve,
            position: 0.0,
            direction: Direction::Forward,
            playing: false,
        }
    }

    /// Play forward from the current position.
    pub fn play(&mut self) {
        self.direction = Direction::Forward;
        self.playing = true;
    }

    /// Play backward from the current position.
    pub fn reverse(&mut self) {
        self.direction = Direction::Backward;
        self.playing = true;
    }

    /// Rewind to the start and play forward.
    pub fn play_from_start(&mut self) {
        self.position = 0.0;
        self.play();
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn set_position(&mut self, position: f32) {
        self.position = position.clamp(0.0, self.curve.length());
    }

    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    pub fn is_reversing(&self) -> bool {
        self.playing && self.direction == Direction::Backward
    }

    /// Curve value at the current position, clamped to `[0, 1]`.
    pub fn value(&self) -> f32 {
        self.curve.evaluate(self.position).clamp(0.0, 1.0)
    }

    /// Advance playback. Returns the new progress value while playing,
    /// including the tick that reaches the end and stops.
    pub fn tick(&mut self, delta_time: f32) -> Option<f32> {
        if !self.playing {
            return None;
        }

        let length = self.curve.length();
        match self.direction {
            Direction::Forward => {
                self.position += delta_time;
                if self.position >= length {
                    self.position = length;
                    self.playing = false;
                }
            }
            Direction::Backward => {
                self.position -= delta_time;
                if self.position <= 0.0 {
                    self.position = 0.0;
                    self.playing = false;
                }
            }
        }

        Some(self.value())
    }
}
