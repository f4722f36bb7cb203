use ambertop::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns workflow progress events into log lines with phase timings.
#[derive(Clone, Default)]
pub struct CliProgressHandler {
    phase: Arc<Mutex<Option<(&'static str, Instant)>>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let phase = self.phase.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut phase_guard) = phase.lock() else {
                warn!("Progress mutex was poisoned. Cannot record progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    info!("{}...", name);
                    *phase_guard = Some((name, Instant::now()));
                }
                Progress::PhaseFinish => {
                    if let Some((name, started)) = phase_guard.take() {
                        info!("{} finished in {:.2?}.", name, started.elapsed());
                    }
                }
                Progress::Decoded { collection, count } => {
                    debug!("  {:>16}: {}", collection, count);
                }
                Progress::Message(msg) => {
                    info!("  {}", msg);
                }
            }
        })
    }
}
