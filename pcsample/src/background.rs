//! Running a sampling call on the rayon thread pool, so that the caller's thread (for example a
//! request handler) is not blocked while a large cloud is reduced.

use crate::common::CancelToken;
use crate::sampling::{SamplingOptions, Strategy, sample_with_cancel};
use crate::{Point3, Result, SampleError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::mpsc::{Receiver, channel};
use tracing::debug;

/// A handle to a sampling job started with [`spawn_sample`].
pub struct SampleHandle {
    receiver: Receiver<Result<Vec<Point3>>>,
    cancel: CancelToken,
}

impl SampleHandle {
    /// Ask the job to stop at its next cancellation check. The job then reports
    /// [`SampleError::Cancelled`] from [`SampleHandle::join`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The token the job is polling, for sharing with other parties that may need to stop it.
    pub fn token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Block until the job finishes and return its result.
    pub fn join(self) -> Result<Vec<Point3>> {
        self.receiver.recv().unwrap_or(Err(SampleError::WorkerLost))
    }

    /// Return the result if the job has already finished, without blocking.
    pub fn try_join(&self) -> Option<Result<Vec<Point3>>> {
        self.receiver.try_recv().ok()
    }
}

/// Start a sampling job on the rayon global pool. The job owns its input and draws its random
/// numbers from a `StdRng` seeded with `seed`, so the same arguments always produce the same
/// result as a direct call to [`crate::sample`] with an identically seeded generator.
///
/// # Arguments
///
/// * `points`: the input points, moved into the job
/// * `target`: the maximum number of points to return
/// * `strategy`: the selection strategy
/// * `options`: strategy parameters
/// * `seed`: the seed for the job's random generator
/// * `cancel`: a token the job polls; trip it (or let its deadline pass) to stop the job early
///
/// returns: SampleHandle
pub fn spawn_sample(
    points: Vec<Point3>,
    target: usize,
    strategy: Strategy,
    options: SamplingOptions,
    seed: u64,
    cancel: CancelToken,
) -> SampleHandle {
    let (sender, receiver) = channel();
    let token = cancel.clone();

    rayon::spawn(move || {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = sample_with_cancel(&points, target, strategy, &options, &mut rng, &token);
        if sender.send(result).is_err() {
            debug!("sampling job finished after its handle was dropped");
        }
    });

    SampleHandle { receiver, cancel }
}
