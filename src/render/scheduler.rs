use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifError, GifResult};
use crate::render::pool::WorkerPool;

/// Completed frames of one render, densely indexed `0..N`.
///
/// Only constructed once every slot has been filled, so holders never observe a missing frame.
#[derive(Clone, Debug)]
pub struct FrameResult<T> {
    frames: Vec<T>,
}

impl<T> FrameResult<T> {
    pub(crate) fn from_slots(slots: Vec<Option<T>>) -> GifResult<Self> {
        if slots.is_empty() {
            return Err(GifError::configuration("render has no frames"));
        }
        let mut frames = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            let frame = slot.ok_or_else(|| {
                GifError::interrupted(format!("frame {i} was never completed"))
            })?;
            frames.push(frame);
        }
        Ok(Self { frames })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frames. A constructed result always holds at least one.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `idx`.
    pub fn get(&self, idx: FrameIndex) -> Option<&T> {
        self.frames.get(idx.as_usize())
    }

    /// Re-key every frame `i` to `N-1-i`. The frame count does not change.
    pub fn reversed(mut self) -> Self {
        self.frames.reverse();
        self
    }

    /// Frames paired with their index, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, &T)> {
        self.frames
            .iter()
            .enumerate()
            .map(|(i, f)| (FrameIndex(i as u32), f))
    }

    /// Consume into `(index, frame)` pairs, ascending.
    pub fn into_indexed(self) -> impl Iterator<Item = (FrameIndex, T)> {
        self.frames
            .into_iter()
            .enumerate()
            .map(|(i, f)| (FrameIndex(i as u32), f))
    }
}

type Completion<T> = (FrameIndex, GifResult<T>);

/// Fans one task per frame out over a [`WorkerPool`] and waits for all of them.
///
/// The calling thread blocks until every task has reported (or the first failure / deadline), so
/// it must not itself be a worker of the same pool. Tasks borrow the caller's inputs, so `run`
/// never returns while one of them is still executing.
#[derive(Clone, Copy, Debug)]
pub struct FrameScheduler<'p> {
    pool: &'p WorkerPool,
    deadline: Option<Duration>,
}

impl<'p> FrameScheduler<'p> {
    /// Scheduler over `pool` with an unconditional wait.
    pub fn new(pool: &'p WorkerPool) -> Self {
        Self {
            pool,
            deadline: None,
        }
    }

    /// Deadline for the barrier wait. `None` waits forever.
    ///
    /// Once it elapses no further task is started and the run fails with
    /// [`GifError::InterruptedWait`]. Tasks already executing are not pre-empted: `run` returns
    /// after they finish, so a call takes up to the deadline plus the longest in-flight task.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Run `task` for every index in `0..n` and collect the results by index.
    ///
    /// Tasks complete in any order. On the first task error (or panic, which is converted into
    /// [`GifError::Synthesis`]) or when the deadline elapses, tasks that have not started yet are
    /// skipped, in-flight tasks run to completion, their results are dropped and the error is
    /// returned.
    pub fn run<T, F>(&self, n: usize, task: F) -> GifResult<FrameResult<T>>
    where
        T: Send,
        F: Fn(FrameIndex) -> GifResult<T> + Sync,
    {
        if n == 0 {
            return Err(GifError::configuration("render has no frames"));
        }
        let count = u32::try_from(n)
            .map_err(|_| GifError::configuration(format!("render has too many frames ({n})")))?;

        let started = Instant::now();
        let deadline = self.deadline.map(|d| started + d);
        let cancel = AtomicBool::new(false);
        tracing::debug!(
            frames = n,
            threads = self.pool.threads(),
            "dispatching synthesis tasks"
        );

        let collected = self.pool.rayon().in_place_scope(|scope| {
            let (tx, rx) = mpsc::channel::<Completion<T>>();
            for i in 0..count {
                let tx = tx.clone();
                let task = &task;
                let cancel = &cancel;
                scope.spawn(move |_| {
                    if cancel.load(Ordering::Acquire) {
                        return;
                    }
                    let idx = FrameIndex(i);
                    let result = panic::catch_unwind(AssertUnwindSafe(|| task(idx)))
                        .unwrap_or_else(|payload| {
                            Err(GifError::synthesis(idx, panic_message(payload.as_ref())))
                        });
                    // The collector may have stopped listening already.
                    let _ = tx.send((idx, result));
                });
            }
            drop(tx);

            let collected = collect(rx, n, deadline);
            if collected.is_err() {
                cancel.store(true, Ordering::Release);
            }
            collected
        });

        match &collected {
            Ok(_) => tracing::debug!(
                frames = n,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "all frames synthesized"
            ),
            Err(e) => tracing::warn!(frames = n, error = %e, "frame synthesis aborted"),
        }
        collected
    }
}

fn collect<T>(
    rx: mpsc::Receiver<Completion<T>>,
    n: usize,
    deadline: Option<Instant>,
) -> GifResult<FrameResult<T>> {
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(n).collect();
    let mut done = 0usize;
    while done < n {
        let (idx, result) = match deadline {
            None => rx.recv().map_err(|_| {
                GifError::interrupted(format!(
                    "workers stopped reporting after {done} of {n} frames"
                ))
            })?,
            Some(at) => rx
                .recv_timeout(at.saturating_duration_since(Instant::now()))
                .map_err(|e| match e {
                    RecvTimeoutError::Timeout => GifError::interrupted(format!(
                        "deadline elapsed after {done} of {n} frames"
                    )),
                    RecvTimeoutError::Disconnected => GifError::interrupted(format!(
                        "workers stopped reporting after {done} of {n} frames"
                    )),
                })?,
        };

        let frame = result?;
        let slot = slots.get_mut(idx.as_usize()).ok_or_else(|| {
            GifError::Other(anyhow::anyhow!(
                "internal error: frame {idx} outside of 0..{n}"
            ))
        })?;
        if slot.replace(frame).is_some() {
            return Err(GifError::Other(anyhow::anyhow!(
                "internal error: frame {idx} reported twice"
            )));
        }
        done += 1;
    }
    FrameResult::from_slots(slots)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {s}")
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;
