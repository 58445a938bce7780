//! Cancelable deferred events.
//!
//! Timers are owned by the character, so dropping the character drops every
//! pending event with it. Handles carry a generation: once a timer fires or
//! is cleared, its handle goes stale and can never match a later timer that
//! reuses the same slot.

/// Handle returned by [`TimerManager::set_timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    slot: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<E> {
    generation: u32,
    pending: Option<Pending<E>>,
}

#[derive(Debug, Clone)]
struct Pending<E> {
    remaining: f32,
    event: E,
}

/// One-shot timers delivering events of type `E`.
#[derive(Debug, Clone)]
pub struct TimerManager<E> {
    slots: Vec<Slot<E>>,
}

impl<E> Default for TimerManager<E> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<E> TimerManager<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire after `delay` seconds.
    pub fn set_timer(&mut self, delay: f32, event: E) -> TimerHandle {
        let pending = Pending {
            remaining: delay.max(0.0),
            event,
        };

        let free = self.slots.iter().position(|slot| slot.pending.is_none());
        let slot = match free {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    pending: None,
                });
                self.slots.len() - 1
            }
        };

        let entry = &mut self.slots[slot];
        entry.generation = entry.generation.wrapping_add(1);
        entry.pending = Some(pending);

        TimerHandle {
            slot,
            generation: entry.generation,
        }
    }

    /// Cancel a pending timer. Stale handles are ignored.
    /// Returns whether a timer was actually removed.
    pub fn clear_timer(&mut self, handle: TimerHandle) -> bool {
        match self.live_slot_mut(handle) {
            Some(slot) => {
                slot.pending = None;
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.live_slot(handle).is_some()
    }

    /// Seconds left before the timer fires.
    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.live_slot(handle)
            .and_then(|slot| slot.pending.as_ref())
            .map(|pending| pending.remaining)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| slot.pending.is_some()).count()
    }

    /// Advance all timers and collect the events that came due, in slot order.
    pub fn tick(&mut self, delta_time: f32) -> Vec<E> {
        let mut fired = Vec::new();
        for slot in &mut self.slots {
            let due = match slot.pending.as_mut() {
                Some(pending) => {
                    pending.remaining -= delta_time;
                    pending.remaining <= 0.0
                }
                None => false,
            };
            if due {
                if let Some(pending) = slot.pending.take() {
                    fired.push(pending.event);
                }
            }
        }
        fired
    }

    fn live_slot(&self, handle: TimerHandle) -> Option<&Slot<E>> {
        self.slots
            .get(handle.slot)
            .filter(|slot| slot.generation == handle.generation && slot.pending.is_some())
    }

    fn live_slot_mut(&mut self, handle: TimerHandle) -> Option<&mut Slot<E>> {
        self.slots
            .get_mut(handle.slot)
            .filter(|slot| slot.generation == handle.generation && slot.pending.is_some())
    }
}
