//! Single-producer single-consumer channel of fixed-shape values.
//!
//! Used to hand spectrum snapshots and display curves from the producing side
//! to the consuming side without locks. Every slot is allocated up front by
//! `prepare`, and values are copied in and out with `clone_from`, so pushing a
//! value of the same shape as the template never allocates.
//!
//! A full channel drops the value being pushed. The producer must never wait
//! on the consumer.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct BoundedChannel<T> {
    /// Slot storage
    slots: Box<[UnsafeCell<T>]>,
    /// Total number of values ever pushed (only modified by the producer)
    write_pos: AtomicUsize,
    /// Total number of values ever pulled (only modified by the consumer)
    read_pos: AtomicUsize,
}

// A slot is only touched by the producer while it sits between read_pos and
// read_pos + capacity, and only by the consumer while it sits between
// read_pos and write_pos. The index updates below publish those hand-offs.
unsafe impl<T: Send> Send for BoundedChannel<T> {}
unsafe impl<T: Send> Sync for BoundedChannel<T> {}

impl<T: Clone> BoundedChannel<T> {
    pub fn new(capacity: usize, template: T) -> Self {
        Self {
            slots: (0..capacity)
                .map(|_| UnsafeCell::new(template.clone()))
                .collect(),
            write_pos: AtomicUsize::new(0),
            read_pos: AtomicUsize::new(0),
        }
    }

    /// Resize and empty the channel. Any value not yet pulled is lost.
    pub fn prepare(&mut self, capacity: usize, template: T) {
        *self = Self::new(capacity, template);
    }

    /// Producer side. Returns `false` (and drops the value) when the channel is full.
    pub fn push(&self, value: &T) -> bool {
        let write = self.write_pos.load(Ordering::Relaxed);
        let read = self.read_pos.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= self.slots.len() {
            return false;
        }

        let idx = write % self.slots.len();
        // SAFETY: the slot is outside the readable range, and we are the only producer
        unsafe {
            (*self.slots[idx].get()).clone_from(value);
        }

        self.write_pos.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Consumer side. Copies the oldest value into `out`.
    pub fn pull(&self, out: &mut T) -> bool {
        let write = self.write_pos.load(Ordering::Acquire);
        let read = self.read_pos.load(Ordering::Relaxed);

        if write == read {
            return false;
        }

        let idx = read % self.slots.len();
        // SAFETY: the slot is inside the readable range, and we are the only consumer
        unsafe {
            out.clone_from(&*self.slots[idx].get());
        }

        self.read_pos.store(read.wrapping_add(1), Ordering::Release);
        true
    }
}

impl<T> BoundedChannel<T> {
    /// Number of values waiting. Exact on the producer or consumer thread,
    /// a snapshot in `[0, capacity]` anywhere else.
    pub fn available_for_reading(&self) -> usize {
        // read_pos never passes write_pos, so loading it first keeps the
        // difference from underflowing.
        let read = self.read_pos.load(Ordering::Acquire);
        let write = self.write_pos.load(Ordering::Acquire);
        write.wrapping_sub(read).min(self.slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.available_for_reading() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn push_then_pull_in_order() {
        let channel = BoundedChannel::new(4, 0u32);
        assert!(channel.is_empty());

        assert!(channel.push(&1));
        assert!(channel.push(&2));
        assert_eq!(channel.available_for_reading(), 2);

        let mut out = 0;
        assert!(channel.pull(&mut out));
        assert_eq!(out, 1);
        assert!(channel.pull(&mut out));
        assert_eq!(out, 2);
        assert!(!channel.pull(&mut out));
        assert_eq!(out, 2, "a failed pull leaves the output untouched");
    }

    #[test]
    fn full_channel_drops_newest() {
        let channel = BoundedChannel::new(2, 0u32);
        assert!(channel.push(&10));
        assert!(channel.push(&20));
        assert!(!channel.push(&30));
        assert_eq!(channel.available_for_reading(), 2);

        let mut out = 0;
        channel.pull(&mut out);
        assert_eq!(out, 10);
        channel.pull(&mut out);
        assert_eq!(out, 20);
        assert!(channel.is_empty());
    }

    #[test]
    fn wraps_around_non_power_of_two_capacity() {
        let channel = BoundedChannel::new(3, 0usize);
        let mut out = 0;

        for round in 0..10 {
            assert!(channel.push(&(round * 2)));
            assert!(channel.push(&(round * 2 + 1)));
            assert!(channel.pull(&mut out));
            assert_eq!(out, round * 2);
            assert!(channel.pull(&mut out));
            assert_eq!(out, round * 2 + 1);
        }
        assert!(channel.is_empty());
    }

    #[test]
    fn prepare_discards_pending_values() {
        let mut channel = BoundedChannel::new(4, vec![0.0f32; 8]);
        channel.push(&vec![1.0; 8]);
        channel.push(&vec![2.0; 8]);

        channel.prepare(6, vec![0.0; 16]);
        assert_eq!(channel.capacity(), 6);
        assert!(channel.is_empty());

        let mut out = Vec::new();
        assert!(!channel.pull(&mut out));
        assert!(channel.push(&vec![3.0; 16]));
        assert!(channel.pull(&mut out));
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn zero_capacity_never_accepts() {
        let channel = BoundedChannel::new(0, 0u8);
        assert!(!channel.push(&1));
        assert_eq!(channel.available_for_reading(), 0);
    }

    #[test]
    fn concurrent_producer_and_consumer() {
        const COUNT: usize = 10_000;
        let channel = BoundedChannel::new(8, vec![0usize; 4]);
        let done = AtomicBool::new(false);

        let received = std::thread::scope(|scope| {
            scope.spawn(|| {
                let mut value = vec![0usize; 4];
                let mut next = 0;
                while next < COUNT {
                    value.fill(next);
                    if channel.push(&value) {
                        next += 1;
                    } else {
                        std::thread::yield_now();
                    }
                }
            });

            // Neither producer nor consumer: only ever sees a count in range.
            scope.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    let available = channel.available_for_reading();
                    assert!(available <= channel.capacity(), "{available} values waiting");
                }
            });

            let consumer = scope.spawn(|| {
                let mut out = vec![0usize; 4];
                let mut received = Vec::with_capacity(COUNT);
                while received.len() < COUNT {
                    if channel.pull(&mut out) {
                        assert!(out.iter().all(|&v| v == out[0]), "torn value {out:?}");
                        received.push(out[0]);
                    } else {
                        std::thread::yield_now();
                    }
                }
                received
            });

            let received = consumer.join();
            done.store(true, Ordering::Relaxed);
            received.expect("consumer thread panicked")
        });

        assert!(received.iter().copied().eq(0..COUNT));
        assert!(channel.is_empty());
    }
}
