//! Render scheduling: debounces form edits, supersedes in-flight renders and
//! publishes results into shared state for the UI thread.

use crate::catalog::Catalog;
use crate::constants::RENDER_DEBOUNCE_MS;
use crate::params::ParameterInput;
use crate::render::RenderPipeline;
use crate::types::{RenderState, RenderStatus};
use eframe::egui;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct RenderScheduler {
    catalog: Arc<Catalog>,
    pipeline: Arc<RenderPipeline>,
    state: Arc<Mutex<RenderState>>,
    cancel_token: Option<CancellationToken>,
    /// Form snapshot the current generation was scheduled for
    last_seen: Option<ParameterInput>,
    pending_since: Option<Instant>,
    debounce: Duration,
}

pub(crate) fn lock_state(state: &Mutex<RenderState>) -> MutexGuard<'_, RenderState> {
    // A panicked render task must not take the UI down with it
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RenderScheduler {
    pub fn new(catalog: Arc<Catalog>, pipeline: Arc<RenderPipeline>) -> Self {
        Self {
            catalog,
            pipeline,
            state: Arc::new(Mutex::new(RenderState::default())),
            cancel_token: None,
            last_seen: None,
            pending_since: None,
            debounce: Duration::from_millis(RENDER_DEBOUNCE_MS),
        }
    }

    /// Swap the pipeline (e.g. after the generator command changed) and
    /// re-render with it.
    pub fn set_pipeline(&mut self, pipeline: Arc<RenderPipeline>) {
        self.pipeline = pipeline;
        self.last_seen = None;
    }

    pub fn status(&self) -> (u64, RenderStatus) {
        let s = lock_state(&self.state);
        (s.generation, s.status.clone())
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Note the current form. Any change supersedes the in-flight render and
    /// restarts the debounce timer.
    pub fn observe(&mut self, input: &ParameterInput, now: Instant) {
        if self.last_seen.as_ref() == Some(input) {
            return;
        }
        self.last_seen = Some(input.clone());
        self.supersede(input.has_text());
        self.pending_since = Some(now);
    }

    /// Start the pending render once the debounce window has passed.
    /// Returns how long until it is due, if still waiting.
    pub fn poll(
        &mut self,
        runtime: &tokio::runtime::Handle,
        ctx: &egui::Context,
        now: Instant,
    ) -> Option<Duration> {
        let since = self.pending_since?;
        let elapsed = now.saturating_duration_since(since);
        if elapsed < self.debounce {
            return Some(self.debounce - elapsed);
        }
        self.pending_since = None;
        self.start(runtime, ctx);
        None
    }

    /// Abort any in-flight render (shutdown)
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }

    /// Cancel the in-flight render and retire the published result
    fn supersede(&mut self, has_text: bool) {
        self.cancel();
        let mut s = lock_state(&self.state);
        s.generation += 1;
        s.status = if has_text {
            RenderStatus::Rendering
        } else {
            RenderStatus::Idle
        };
    }

    fn start(&mut self, runtime: &tokio::runtime::Handle, ctx: &egui::Context) {
        let Some(input) = self.last_seen.clone() else {
            return;
        };

        let generation = {
            let mut s = lock_state(&self.state);
            if !input.has_text() {
                // Nothing to show, and nothing to ask the generator for
                s.status = RenderStatus::Idle;
                return;
            }
            s.status = RenderStatus::Rendering;
            s.generation
        };

        let token = CancellationToken::new();
        self.cancel_token = Some(token.clone());

        debug!(generation, "Scheduling render");

        let catalog = self.catalog.clone();
        let pipeline = self.pipeline.clone();
        let state = self.state.clone();
        let ctx = ctx.clone();

        runtime.spawn(async move {
            let result = pipeline.render_input(&catalog, &input, &token).await;
            let status = match result {
                Ok(result) => RenderStatus::Complete(Arc::new(result)),
                Err(e) if e.is_cancelled() => {
                    debug!(generation, "Render superseded");
                    return;
                }
                Err(e) => {
                    warn!(generation, kind = e.kind(), error = %e, "Render failed");
                    RenderStatus::Failed {
                        message: e.user_message(),
                        kind: e.kind(),
                        detail: e.detail(),
                    }
                }
            };

            let mut s = lock_state(&state);
            if s.generation == generation {
                s.status = status;
                drop(s);
                ctx.request_repaint();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{Behavior, SolidGenerator};
    use std::sync::atomic::Ordering;

    fn setup(behavior: Behavior) -> (RenderScheduler, Arc<SolidGenerator>, ParameterInput) {
        let catalog = Arc::new(Catalog::bundled().unwrap());
        let generator = Arc::new(SolidGenerator::new(behavior));
        let pipeline = Arc::new(RenderPipeline::new(generator.clone()));
        let mut input = ParameterInput::defaults(&catalog);
        input.width = 128;
        input.height = 96;
        input.text = "hello world hello".into();
        (RenderScheduler::new(catalog, pipeline), generator, input)
    }

    fn wait_for_outcome(scheduler: &RenderScheduler) -> (u64, RenderStatus) {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let (generation, status) = scheduler.status();
            if !matches!(status, RenderStatus::Rendering) || Instant::now() > deadline {
                return (generation, status);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn waits_for_debounce_then_renders() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = egui::Context::default();
        let (mut scheduler, generator, input) = setup(Behavior::Solid);

        let t0 = Instant::now();
        scheduler.observe(&input, t0);
        assert!(scheduler.is_pending());
        assert!(scheduler.poll(runtime.handle(), &ctx, t0).is_some());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

        let due = t0 + Duration::from_millis(RENDER_DEBOUNCE_MS);
        assert!(scheduler.poll(runtime.handle(), &ctx, due).is_none());
        assert!(!scheduler.is_pending());

        match wait_for_outcome(&scheduler) {
            (_, RenderStatus::Complete(result)) => {
                assert_eq!((result.width(), result.height()), (128, 96))
            }
            _ => panic!("expected a completed render"),
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unchanged_input_is_not_rescheduled() {
        let (mut scheduler, _, input) = setup(Behavior::Solid);
        let t0 = Instant::now();
        scheduler.observe(&input, t0);
        let (generation, _) = scheduler.status();
        scheduler.observe(&input, t0 + Duration::from_secs(1));
        assert_eq!(scheduler.status().0, generation);
    }

    #[test]
    fn edits_bump_generation() {
        let (mut scheduler, _, mut input) = setup(Behavior::Solid);
        let t0 = Instant::now();
        scheduler.observe(&input, t0);
        let (first, _) = scheduler.status();
        input.collocations = !input.collocations;
        scheduler.observe(&input, t0);
        assert_eq!(scheduler.status().0, first + 1);
    }

    #[test]
    fn edit_retires_previous_result() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = egui::Context::default();
        let (mut scheduler, _, mut input) = setup(Behavior::Solid);

        let t0 = Instant::now();
        scheduler.observe(&input, t0);
        scheduler.poll(runtime.handle(), &ctx, t0 + Duration::from_secs(1));
        let (first_generation, first) = match wait_for_outcome(&scheduler) {
            (generation, RenderStatus::Complete(result)) => (generation, result),
            _ => panic!("expected a completed render"),
        };
        assert_eq!(first.width(), 128);

        input.width = 256;
        let t1 = Instant::now();
        scheduler.observe(&input, t1);

        // While the new render is pending the old image is no longer published
        let (generation, status) = scheduler.status();
        assert_eq!(generation, first_generation + 1);
        assert!(matches!(status, RenderStatus::Rendering));

        scheduler.poll(runtime.handle(), &ctx, t1 + Duration::from_secs(1));
        match wait_for_outcome(&scheduler) {
            (g, RenderStatus::Complete(second)) => {
                assert_eq!(g, generation);
                assert_eq!(second.width(), 256);
                assert!(!Arc::ptr_eq(&first, &second));
            }
            _ => panic!("expected a completed render"),
        }
    }

    #[test]
    fn superseded_in_flight_render_is_discarded() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = egui::Context::default();
        let (mut scheduler, generator, mut input) =
            setup(Behavior::Slow(Duration::from_millis(300)));

        let t0 = Instant::now();
        scheduler.observe(&input, t0);
        scheduler.poll(runtime.handle(), &ctx, t0 + Duration::from_secs(1));
        assert!(matches!(scheduler.status().1, RenderStatus::Rendering));

        // Edit while the first render is still running
        input.width = 256;
        let t1 = Instant::now();
        scheduler.observe(&input, t1);
        scheduler.poll(runtime.handle(), &ctx, t1 + Duration::from_secs(1));

        match wait_for_outcome(&scheduler) {
            (_, RenderStatus::Complete(result)) => assert_eq!(result.width(), 256),
            _ => panic!("expected a completed render"),
        }

        // Give the first render time to finish; its result must not land
        std::thread::sleep(Duration::from_millis(500));
        match scheduler.status() {
            (_, RenderStatus::Complete(result)) => assert_eq!(result.width(), 256),
            _ => panic!("expected the second render to stay published"),
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn blank_text_stays_idle() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = egui::Context::default();
        let (mut scheduler, generator, mut input) = setup(Behavior::Solid);
        input.text = "   ".into();

        let t0 = Instant::now();
        scheduler.observe(&input, t0);
        scheduler.poll(runtime.handle(), &ctx, t0 + Duration::from_secs(1));

        assert!(matches!(scheduler.status().1, RenderStatus::Idle));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failures_surface_kind_and_detail() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let ctx = egui::Context::default();
        let (mut scheduler, _, mut input) = setup(Behavior::Solid);
        input.max_words = "abc".into();

        let t0 = Instant::now();
        scheduler.observe(&input, t0);
        scheduler.poll(runtime.handle(), &ctx, t0 + Duration::from_secs(1));

        match wait_for_outcome(&scheduler) {
            (
                _,
                RenderStatus::Failed {
                    message,
                    kind,
                    detail,
                },
            ) => {
                assert_eq!(message, crate::constants::RENDER_FAILED_MESSAGE);
                assert_eq!(kind, "Settings");
                assert!(detail.contains("abc"));
            }
            _ => panic!("expected a failed render"),
        }
    }
}
