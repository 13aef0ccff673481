use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::TaskClass;

/// Runtime for callers outside any tokio context, such as a host UI thread.
static FALLBACK: LazyLock<Runtime> = LazyLock::new(|| {
	Builder::new_multi_thread()
		.worker_threads(1)
		.thread_name("lively-worker")
		.enable_time()
		.build()
		.expect("failed to build lively-worker fallback runtime")
});

/// Spawns `fut` inside a span tagged with its task class.
///
/// Runs on the ambient runtime when there is one.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	let fut = fut.instrument(tracing::trace_span!("worker.task", worker_class = class.as_str()));
	match Handle::try_current() {
		Ok(handle) => handle.spawn(fut),
		Err(_) => FALLBACK.spawn(fut),
	}
}
