//! Going from a dependency to a [`ParchmentTransformer`], off the calling thread.
//!
//! [`resolve`] locates the mapping archive right away, and then reads and parses it in a single blocking task. The
//! returned [`PendingTransformer`] completes with the transformer, or with the first error of any step.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use log::{debug, info};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};
use crate::adapter::Adapters;
use crate::archive::ArchiveError;
use crate::reader::{MappingDeserializer, ParseError};
use crate::resolve::{ArchiveLocator, DependencySpec, ResolutionError};
use crate::transformer::ParchmentTransformer;

#[derive(Debug, Error)]
pub enum PipelineError {
	#[error(transparent)]
	Resolution(#[from] ResolutionError),
	#[error(transparent)]
	Archive(#[from] ArchiveError),
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error("resolving the mappings was cancelled")]
	Cancelled,
	#[error("the task resolving the mappings failed")]
	TaskFailed(#[source] JoinError),
}

/// Resolves the mappings of the given dependency, giving a transformer once done.
///
/// Locating the archive happens on the calling thread. If that fails, no task is started and the returned future
/// completes with that error.
pub fn resolve(spec: &DependencySpec, locator: &impl ArchiveLocator, adapters: Adapters, executor: &Handle) -> PendingTransformer {
	let cancelled = Arc::new(AtomicBool::new(false));

	let path = match locator.locate(spec) {
		Ok(path) => path,
		Err(e) => return PendingTransformer {
			state: State::Failed(e.into()),
			cancelled,
		},
	};

	info!("resolving mappings {spec} (state key {})", spec.state_key());

	let task = {
		let cancelled = cancelled.clone();
		move || load(path, adapters, &cancelled)
	};

	PendingTransformer {
		state: State::Running(executor.spawn_blocking(task)),
		cancelled,
	}
}

fn load(path: PathBuf, adapters: Adapters, cancelled: &AtomicBool) -> Result<ParchmentTransformer, PipelineError> {
	if cancelled.load(Ordering::Acquire) {
		debug!("not reading {path:?}, cancelled");
		return Err(PipelineError::Cancelled);
	}

	let document = crate::archive::read(&path)?;
	let table = MappingDeserializer::new(adapters).parse(&document)?;

	debug!("read mappings for {} classes from {path:?}", table.classes.len());
	Ok(ParchmentTransformer::new(table))
}

/// A [`ParchmentTransformer`] that's still being resolved.
///
/// Dropping this cancels it.
#[derive(Debug)]
pub struct PendingTransformer {
	state: State,
	cancelled: Arc<AtomicBool>,
}

#[derive(Debug)]
enum State {
	Failed(PipelineError),
	Running(JoinHandle<Result<ParchmentTransformer, PipelineError>>),
	Done,
}

impl PendingTransformer {
	/// Cancels resolving.
	///
	/// If the archive isn't being read yet, it won't be read at all. In any case, this then completes with
	/// [`PipelineError::Cancelled`] or an error from before the cancellation, never with a transformer.
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Release);
		if let State::Running(handle) = &self.state {
			handle.abort();
		}
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Acquire)
	}
}

impl Future for PendingTransformer {
	type Output = Result<ParchmentTransformer, PipelineError>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.get_mut();

		let result = match std::mem::replace(&mut this.state, State::Done) {
			State::Failed(e) => Err(e),
			State::Running(mut handle) => match Pin::new(&mut handle).poll(cx) {
				Poll::Pending => {
					this.state = State::Running(handle);
					return Poll::Pending;
				},
				Poll::Ready(Ok(result)) => result,
				Poll::Ready(Err(e)) if e.is_cancelled() => Err(PipelineError::Cancelled),
				Poll::Ready(Err(e)) => Err(PipelineError::TaskFailed(e)),
			},
			State::Done => panic!("PendingTransformer polled after completion"),
		};

		Poll::Ready(match result {
			Ok(_) if this.is_cancelled() => Err(PipelineError::Cancelled),
			result => result,
		})
	}
}

impl Drop for PendingTransformer {
	fn drop(&mut self) {
		self.cancel();
	}
}
