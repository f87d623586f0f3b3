use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

/// Provides multithreading dispatch primitives and a thread count.
///
/// Systems that go wide do their own domain specific load balancing on top, so all that's needed
/// here is a way to jumpstart some threads. Wrapping an existing thread pool works fine.
pub trait ThreadDispatcher: Send + Sync {
    /// Gets the number of workers available in the thread dispatcher.
    fn thread_count(&self) -> usize;

    /// Runs `worker_body` on up to `maximum_worker_count` workers, passing each its worker index.
    /// Returns once every worker has finished.
    fn dispatch_workers(&self, worker_body: &(dyn Fn(usize) + Sync), maximum_worker_count: usize);
}

/// Dispatcher that spins up scoped threads for each dispatch. The calling thread acts as worker 0.
#[derive(Debug, Clone, Copy)]
pub struct SimpleThreadDispatcher {
    thread_count: usize,
}

impl SimpleThreadDispatcher {
    pub fn new(thread_count: NonZeroUsize) -> Self {
        Self {
            thread_count: thread_count.get(),
        }
    }

    /// Creates a dispatcher with one worker per available hardware thread.
    pub fn with_available_parallelism() -> Self {
        Self::new(std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN))
    }
}

impl ThreadDispatcher for SimpleThreadDispatcher {
    #[inline]
    fn thread_count(&self) -> usize {
        self.thread_count
    }

    fn dispatch_workers(&self, worker_body: &(dyn Fn(usize) + Sync), maximum_worker_count: usize) {
        let worker_count = self.thread_count.min(maximum_worker_count);
        if worker_count <= 1 {
            worker_body(0);
            return;
        }
        let result = crossbeam_utils::thread::scope(|scope| {
            for worker_index in 1..worker_count {
                scope.spawn(move |_| worker_body(worker_index));
            }
            worker_body(0);
        });
        if let Err(payload) = result {
            std::panic::resume_unwind(payload);
        }
    }
}

/// Hands out `&mut` access to slots of a slice by index across threads.
///
/// Callers must claim every index at most once; the looper guarantees that with its atomic counter.
struct DisjointSlots<'a, T> {
    base: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Sync for DisjointSlots<'_, T> {}

impl<'a, T> DisjointSlots<'a, T> {
    fn new(items: &'a mut [T]) -> Self {
        Self {
            base: items.as_mut_ptr(),
            len: items.len(),
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// No other reference to slot `index` may be live.
    #[inline(always)]
    unsafe fn get_mut(&self, index: usize) -> &'a mut T {
        debug_assert!(index < self.len);
        &mut *self.base.add(index)
    }
}

/// Flat parallel-for over a dispatcher.
pub struct ParallelLooper;

impl ParallelLooper {
    /// Visits every item exactly once across the dispatcher's workers.
    ///
    /// Workers claim the next index from a shared counter, so expensive items don't stall a
    /// statically assigned range. Returns once every item has been processed.
    pub fn for_each_mut<J, F>(dispatcher: &dyn ThreadDispatcher, items: &mut [J], body: F)
    where
        J: Send,
        F: Fn(usize, &mut J) + Sync,
    {
        let count = items.len();
        if count == 0 {
            return;
        }
        let slots = DisjointSlots::new(items);
        let next_index = CachePadded::new(AtomicUsize::new(0));
        let worker = |worker_index: usize| loop {
            let index = next_index.fetch_add(1, Ordering::Relaxed);
            if index >= count {
                break;
            }
            // SAFETY: fetch_add hands out each index once.
            let item = unsafe { slots.get_mut(index) };
            body(worker_index, item);
        };
        dispatcher.dispatch_workers(&worker, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn dispatcher(threads: usize) -> SimpleThreadDispatcher {
        SimpleThreadDispatcher::new(NonZeroUsize::new(threads).unwrap())
    }

    #[test]
    fn every_item_visited_once() {
        let mut items = vec![0u32; 1000];
        ParallelLooper::for_each_mut(&dispatcher(4), &mut items, |_, item| *item += 1);
        assert!(items.iter().all(|&visits| visits == 1));
    }

    #[test]
    fn worker_indices_stay_in_range() {
        let seen = Mutex::new(HashSet::new());
        let mut items = vec![(); 64];
        ParallelLooper::for_each_mut(&dispatcher(3), &mut items, |worker, _| {
            seen.lock().unwrap().insert(worker);
        });
        assert!(seen.into_inner().unwrap().iter().all(|&worker| worker < 3));
    }

    #[test]
    fn worker_count_is_capped_by_dispatch() {
        let calls = AtomicUsize::new(0);
        dispatcher(8).dispatch_workers(
            &|_| {
                calls.fetch_add(1, Ordering::Relaxed);
            },
            2,
        );
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn empty_loop_does_not_dispatch() {
        let mut items: Vec<u8> = Vec::new();
        ParallelLooper::for_each_mut(&dispatcher(2), &mut items, |_, _| unreachable!());
    }

    #[test]
    #[should_panic]
    fn worker_panics_reach_the_caller() {
        let mut items = vec![0u8; 16];
        ParallelLooper::for_each_mut(&dispatcher(4), &mut items, |_, item| {
            if *item == 0 {
                panic!("worker failure");
            }
        });
    }
}
