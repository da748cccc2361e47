use std::collections::HashMap;
use std::sync::Arc;

use imagepool_core::{LoadSummary, LoaderConfig, ProcessId};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cache::ImageCache;
use crate::context::{LoaderContext, LoaderState};
use crate::descriptor::ImageBatch;
use crate::error::LoadError;
use crate::handle::ImageHandle;
use crate::process::{LoadProcess, PendingLoad};
use crate::source::{FileSource, ImageSource};
use crate::texture::TextureAsset;

/// Outcome of a single issued load, on its way back to the owning process.
struct ItemEvent {
    process: ProcessId,
    slot: usize,
    outcome: Result<TextureAsset, LoadError>,
}

enum Command {
    Adopt(Box<LoadProcess>),
    Item(ItemEvent),
}

/// Entry point for loading images. Submits batches, tracks the active load
/// processes, and owns the shared cache of loaded images.
///
/// All load outcomes are funneled through one dispatcher task, so the
/// callbacks of a manager never run concurrently with each other. Callbacks
/// run without any manager lock held and may call back into the manager.
#[derive(Clone)]
pub struct ImageManager {
    ctx: Arc<LoaderContext>,
    source: Arc<dyn ImageSource>,
    runtime: Handle,
    commands: mpsc::UnboundedSender<Command>,
}

impl ImageManager {
    /// Create a manager driven by the tokio runtime of the calling context.
    pub fn new(source: Arc<dyn ImageSource>) -> Result<Self, LoadError> {
        let runtime = Handle::try_current().map_err(|_| LoadError::NoRuntime)?;
        Ok(Self::with_runtime(source, runtime))
    }

    /// Create a manager whose loads and dispatcher run on `runtime`.
    pub fn with_runtime(source: Arc<dyn ImageSource>, runtime: Handle) -> Self {
        let ctx = Arc::new(LoaderContext::new());
        let (commands, receiver) = mpsc::unbounded_channel();

        let dispatcher = Dispatcher {
            ctx: Arc::clone(&ctx),
            processes: HashMap::new(),
        };
        runtime.spawn(dispatcher.run(receiver));
        info!("ImageManager created");

        Self {
            ctx,
            source,
            runtime,
            commands,
        }
    }

    /// Create a manager reading images from disk under the configured base path.
    pub fn from_config(config: &LoaderConfig) -> Result<Self, LoadError> {
        Self::new(Arc::new(FileSource::new(&config.base_path)))
    }

    /// Start loading a batch of images.
    ///
    /// `on_progress` receives this batch's percentage after every image that
    /// loads; `on_complete` fires once after every image has loaded or failed.
    /// A batch with an invalid descriptor is rejected as a whole: nothing is
    /// issued and neither callback fires.
    pub fn load(
        &self,
        batch: impl Into<ImageBatch>,
        on_complete: impl FnOnce(LoadSummary) + Send + 'static,
        on_progress: impl FnMut(f64) + Send + 'static,
    ) -> Result<ProcessId, LoadError> {
        let id = self.ctx.ids.generate();
        let batch = batch.into();

        // Rejected batches and callbacks must drop with the state unlocked,
        // since their captures may call back into the manager.
        if let Err(e) = batch.validate() {
            warn!("Load process {} aborted: {}", id, e);
            return Err(e);
        }

        let mut process = LoadProcess::new(id);
        let pending = {
            let mut state = self.ctx.state.lock();
            let LoaderState { cache, registry } = &mut *state;
            let pending =
                process.start(batch, Box::new(on_complete), Box::new(on_progress), cache)?;
            registry.register(id, process.requested());
            pending
        };

        let requested = process.requested();
        if let Err(rejected) = self.commands.send(Command::Adopt(Box::new(process))) {
            drop(rejected);
            self.ctx.withdraw(id, requested);
            warn!("Load process {} aborted: dispatcher has shut down", id);
            return Err(LoadError::ShutDown);
        }

        for load in pending {
            self.issue(id, load);
        }
        Ok(id)
    }

    fn issue(&self, process: ProcessId, load: PendingLoad) {
        let source = Arc::clone(&self.source);
        let commands = self.commands.clone();
        let runtime = self.runtime.clone();

        self.runtime.spawn(async move {
            let PendingLoad { slot, name, source: locator } = load;
            // A panicking source still has to resolve its slot.
            let task = runtime.spawn(async move { source.load(&name, &locator).await });
            let outcome = match task.await {
                Ok(result) => result,
                Err(e) => Err(LoadError::TaskFailed(e.to_string())),
            };
            if commands
                .send(Command::Item(ItemEvent {
                    process,
                    slot,
                    outcome,
                }))
                .is_err()
            {
                debug!("Dispatcher gone, dropping outcome of {} slot {}", process, slot);
            }
        });
    }

    /// True when no load process is active.
    pub fn has_finished(&self) -> bool {
        self.ctx.state.lock().registry.is_empty()
    }

    /// Wait until no load process is active.
    pub async fn wait_until_finished(&self) {
        loop {
            let notified = self.ctx.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.has_finished() {
                return;
            }
            notified.await;
        }
    }

    /// Percentage of every image ever requested that has loaded.
    pub fn progress(&self) -> f64 {
        self.ctx.state.lock().cache.global_progress()
    }

    /// Progress of an active process, or `None` once it has finished.
    pub fn process_progress(&self, id: ProcessId) -> Option<f64> {
        self.ctx.state.lock().registry.get(id).map(|s| s.progress())
    }

    pub fn is_loading(&self, id: ProcessId) -> bool {
        self.ctx.state.lock().registry.contains(id)
    }

    /// IDs of all active processes.
    pub fn active_processes(&self) -> Vec<ProcessId> {
        self.ctx.state.lock().registry.ids()
    }

    /// The cached image called `name`, sharing its pixel data.
    pub fn get_image(&self, name: &str) -> Option<ImageHandle> {
        self.ctx.state.lock().cache.get(name).cloned()
    }

    /// A copy of the cached image called `name` with its own pixel data.
    pub fn clone_image(&self, name: &str) -> Option<ImageHandle> {
        self.ctx
            .state
            .lock()
            .cache
            .get(name)
            .map(ImageHandle::deep_clone)
    }

    /// Drop the image called `name` from the cache.
    pub fn remove(&self, name: &str) -> Option<ImageHandle> {
        self.ctx.state.lock().cache.remove(name)
    }

    /// Empty the cache and reset global progress. Refused, returning false,
    /// while any load process is active.
    pub fn clear(&self) -> bool {
        let mut state = self.ctx.state.lock();
        let LoaderState { cache, registry } = &mut *state;
        if !cache.clear(registry) {
            warn!("Cannot clear cache: {} load processes still running", registry.len());
            return false;
        }
        registry.clear();
        info!("Image cache cleared");
        true
    }

    /// Read access to the live cache. The cache stays locked for the duration
    /// of `f`, so `f` must not call back into the manager.
    pub fn with_cache<R>(&self, f: impl FnOnce(&ImageCache) -> R) -> R {
        f(&self.ctx.state.lock().cache)
    }
}

/// Owns the running load processes and applies load outcomes one at a time.
struct Dispatcher {
    ctx: Arc<LoaderContext>,
    processes: HashMap<ProcessId, LoadProcess>,
}

impl Dispatcher {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = receiver.recv().await {
            match command {
                Command::Adopt(process) => self.adopt(*process),
                Command::Item(event) => self.dispatch(event),
            }
        }
        debug!("Dispatcher stopped with {} processes left", self.processes.len());
    }

    fn adopt(&mut self, mut process: LoadProcess) {
        if !process.check_terminal(&self.ctx) {
            self.processes.insert(process.id(), process);
        }
    }

    fn dispatch(&mut self, event: ItemEvent) {
        let Some(process) = self.processes.get_mut(&event.process) else {
            warn!("Outcome for unknown load process {}", event.process);
            return;
        };
        process.resolve(event.slot, event.outcome, &self.ctx);
        if process.is_terminal() {
            self.processes.remove(&event.process);
        }
    }
}
