//! Cooperative, single-threaded tick scheduler.
//!
//! Snapshot-dispatch avoids iterator invalidation: `update` moves the live
//! entries out from under the lock, runs them without holding it, then
//! merges the result back in. Deferred detach avoids races between a
//! callback removing itself and the ongoing dispatch; immediate detach is
//! kept for editing the schedule between updates.
//!
//! The source keys entries on a `(fn ptr, ctx ptr)` pair; Rust closures have
//! no comparable identity, so `attach` mints a fresh [`TickId`] instead and
//! returns it. A freshly minted id can never collide, so the public surface
//! can't actually observe `AlreadyAttached` — it's kept for symmetry with
//! `NotAttached` and exercised directly against [`Tick::attach_with_id`].
//!
//! `attach`/`detach` called by a callback reentrantly, from inside its own
//! dispatch, operate on entries outside that dispatch's snapshot (new
//! attaches land for next tick; detach of an id currently running returns
//! `NotAttached`). Use `request_detach` to remove yourself mid-dispatch —
//! it is always safe and always deferred to the next `update`.

use std::sync::Mutex;

use crate::error::{BuylError, BuylResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

type Callback = Box<dyn FnMut(f32)>;

#[derive(Default)]
struct TickState {
    entries: Vec<(TickId, Callback)>,
    pending_detach: Vec<TickId>,
    next_id: u64,
}

#[derive(Default)]
pub struct Tick {
    inner: Mutex<TickState>,
}

impl Tick {
    pub fn new() -> Self {
        Tick::default()
    }

    /// Mints a fresh [`TickId`] and attaches `callback` under it. Always
    /// succeeds: a newly minted id can't already be present.
    pub fn attach(&self, callback: Callback) -> TickId {
        let mut state = self.inner.lock().unwrap();
        let id = TickId(state.next_id);
        state.next_id += 1;
        state.entries.push((id, callback));
        id
    }

    /// Attaches under a caller-chosen id. Fails with `AlreadyAttached` if
    /// that id is already present. Exists for parity with the source's
    /// duplicate-pair check; ordinary callers should use [`Tick::attach`].
    pub fn attach_with_id(&self, id: TickId, callback: Callback) -> BuylResult<()> {
        let mut state = self.inner.lock().unwrap();
        if state.entries.iter().any(|(eid, _)| *eid == id) {
            return Err(BuylError::AlreadyAttached);
        }
        state.entries.push((id, callback));
        Ok(())
    }

    /// Removes `id` immediately. Fails with `NotAttached` if absent.
    pub fn detach(&self, id: TickId) -> BuylResult<()> {
        let mut state = self.inner.lock().unwrap();
        let before = state.entries.len();
        state.entries.retain(|(eid, _)| *eid != id);
        if state.entries.len() == before {
            Err(BuylError::NotAttached)
        } else {
            Ok(())
        }
    }

    /// Queues `id` for removal at the start of the next `update`.
    pub fn request_detach(&self, id: TickId) {
        let mut state = self.inner.lock().unwrap();
        state.pending_detach.push(id);
    }

    pub fn update(&self, dt: f32) {
        let mut to_run = {
            let mut state = self.inner.lock().unwrap();
            let pending = std::mem::take(&mut state.pending_detach);
            if !pending.is_empty() {
                log::debug!("tick: applying {} queued detach(es)", pending.len());
                state.entries.retain(|(eid, _)| !pending.contains(eid));
            }
            std::mem::take(&mut state.entries)
        };

        for (id, callback) in to_run.iter_mut() {
            log::trace!("tick: dispatching callback {id:?}");
            callback(dt);
        }

        let mut state = self.inner.lock().unwrap();
        to_run.append(&mut state.entries);
        state.entries = to_run;
    }

    /// Copies up to `max` attached ids; returns how many were copied.
    pub fn list_attached(&self, out: &mut Vec<TickId>, max: usize) -> usize {
        let state = self.inner.lock().unwrap();
        let n = state.entries.len().min(max);
        out.extend(state.entries.iter().take(n).map(|(id, _)| *id));
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn duplicate_attach_with_id_is_rejected() {
        let tick = Tick::new();
        tick.attach_with_id(TickId(1), Box::new(|_| {})).unwrap();
        assert_eq!(
            tick.attach_with_id(TickId(1), Box::new(|_| {})),
            Err(BuylError::AlreadyAttached)
        );
    }

    #[test]
    fn fresh_attach_ids_never_collide() {
        let tick = Tick::new();
        let a = tick.attach(Box::new(|_| {}));
        let b = tick.attach(Box::new(|_| {}));
        assert_ne!(a, b);
    }

    #[test]
    fn detach_missing_entry_fails() {
        let tick = Tick::new();
        assert_eq!(tick.detach(TickId(99)), Err(BuylError::NotAttached));
    }

    #[test]
    fn update_dispatches_every_attached_callback_once() {
        let tick = Tick::new();
        let counter = Arc::new(AtomicI32::new(0));
        for _ in 0..3 {
            let c = counter.clone();
            tick.attach(Box::new(move |_| { c.fetch_add(1, Ordering::SeqCst); }));
        }
        tick.update(0.016);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        tick.update(0.016);
        assert_eq!(counter.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn request_detach_takes_effect_next_update_not_current() {
        let tick = Tick::new();
        let counter = Arc::new(AtomicI32::new(0));
        let c = counter.clone();
        let id = tick.attach(Box::new(move |_| { c.fetch_add(1, Ordering::SeqCst); }));
        tick.request_detach(id);
        tick.update(0.016);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        tick.update(0.016);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn list_attached_respects_max() {
        let tick = Tick::new();
        for _ in 0..5 {
            tick.attach(Box::new(|_| {}));
        }
        let mut out = Vec::new();
        let n = tick.list_attached(&mut out, 2);
        assert_eq!(n, 2);
        assert_eq!(out.len(), 2);
    }
}
