//! Mount/pause/resize/dispose state machine shared by every frontend.
//!
//! Host event handlers only record state here; all work happens in
//! [`Lifecycle::frame`], called once per host animation frame.

use crate::animation::{
    AnimationController, FrameInput, InteractionState, MotionTuning, PointerSample,
};
use crate::config::HexFieldConfig;
use crate::constants::{MAX_FRAME_DT_SEC, RESIZE_DEBOUNCE_MS};
use crate::error::LifecycleError;
use crate::lattice::{LatticeCache, LatticePoint};
use crate::profile::{select_profile, PerformanceProfile};
use crate::render::{BackendKind, Frame, RendererBackend};
use crate::surface::{LatticeTransform, SurfaceSize};
use glam::Vec2;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Unmounted,
    Initializing,
    Running,
    Paused,
    Disposed,
}

/// Independent reasons to stop the frame loop; any one of them pauses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PauseReasons {
    pub offscreen: bool,
    pub document_hidden: bool,
    pub external: bool,
    pub motion_frozen: bool,
}

impl PauseReasons {
    pub fn any(&self) -> bool {
        self.offscreen || self.document_hidden || self.external || self.motion_frozen
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostHints {
    pub reduced_motion: bool,
    pub low_power: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    Paused,
    /// Running but nothing drawn: the surface has no size yet.
    Skipped,
    /// Not mounted, or already disposed.
    Inactive,
    /// The backend failed; the host should swap in the next ladder rung.
    Failed(BackendKind),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingResize {
    due_ms: f64,
    surface: SurfaceSize,
    viewport_width: f32,
}

pub struct Lifecycle<B: RendererBackend> {
    state: LifecycleState,
    config: HexFieldConfig,
    hints: HostHints,
    reasons: PauseReasons,
    backend: Option<B>,
    surface: SurfaceSize,
    viewport_width: f32,
    profile: PerformanceProfile,
    cache: LatticeCache,
    lattice: Arc<[LatticePoint]>,
    transform: LatticeTransform,
    controller: AnimationController,
    pointer_css: Option<Vec2>,
    pending_resize: Option<PendingResize>,
    last_frame_ms: Option<f64>,
    frames_rendered: u64,
}

impl<B: RendererBackend> Lifecycle<B> {
    pub fn new(config: HexFieldConfig, hints: HostHints) -> Self {
        let profile = Self::pick_profile(&config, &hints, 0.0);
        let surface = SurfaceSize::new(0.0, 0.0, 1.0);
        let reasons = PauseReasons {
            external: config.paused,
            ..PauseReasons::default()
        };
        Self {
            state: LifecycleState::Unmounted,
            controller: AnimationController::new(MotionTuning::from(&config), profile),
            transform: LatticeTransform::fit(&surface, profile.rings, profile.spacing),
            config,
            hints,
            reasons,
            backend: None,
            surface,
            viewport_width: 0.0,
            profile,
            cache: LatticeCache::default(),
            lattice: Arc::from(Vec::new()),
            pointer_css: None,
            pending_resize: None,
            last_frame_ms: None,
            frames_rendered: 0,
        }
    }

    fn pick_profile(
        config: &HexFieldConfig,
        hints: &HostHints,
        viewport_width: f32,
    ) -> PerformanceProfile {
        select_profile(
            viewport_width,
            config.perf_mode.tier(),
            hints.reduced_motion,
            hints.low_power,
        )
        .with_overrides(config.rings, config.dot_size)
    }

    /// Attach `backend` and start. Only valid from `Unmounted`.
    pub fn mount(
        &mut self,
        mut backend: B,
        surface: SurfaceSize,
        viewport_width: f32,
    ) -> Result<(), LifecycleError> {
        if self.state != LifecycleState::Unmounted {
            backend.dispose();
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                action: "mount",
            });
        }
        self.state = LifecycleState::Initializing;

        let profile = Self::pick_profile(&self.config, &self.hints, viewport_width);
        let lattice = match self
            .cache
            .get_or_build(profile.rings, profile.spacing, self.config.hollow_ratio)
        {
            Ok(lattice) => lattice,
            Err(err) => {
                backend.dispose();
                self.state = LifecycleState::Unmounted;
                return Err(err.into());
            }
        };

        backend.resize(&surface);
        backend.upload_lattice(&lattice, &profile);
        self.surface = surface;
        self.viewport_width = viewport_width;
        self.transform = LatticeTransform::fit(&surface, profile.rings, profile.spacing);
        self.profile = profile;
        self.lattice = lattice;
        self.controller.set_profile(profile);
        self.controller.reset();
        log::info!(
            "mounted {} backend: {:?} tier, {} rings, {} points",
            backend.kind().name(),
            profile.tier,
            profile.rings,
            self.lattice.len()
        );
        self.backend = Some(backend);

        self.state = if self.reasons.any() {
            LifecycleState::Paused
        } else {
            LifecycleState::Running
        };
        Ok(())
    }

    pub fn set_offscreen(&mut self, offscreen: bool) {
        self.reasons.offscreen = offscreen;
        self.sync_pause();
    }

    pub fn set_document_hidden(&mut self, hidden: bool) {
        self.reasons.document_hidden = hidden;
        self.sync_pause();
    }

    pub fn set_external_pause(&mut self, paused: bool) {
        self.reasons.external = paused;
        self.sync_pause();
    }

    fn sync_pause(&mut self) {
        match (self.state, self.reasons.any()) {
            (LifecycleState::Running, true) => {
                log::info!("paused: {:?}", self.reasons);
                self.state = LifecycleState::Paused;
            }
            (LifecycleState::Paused, false) => {
                log::info!("resumed");
                self.state = LifecycleState::Running;
                // the first frame after resume measures from itself
                self.last_frame_ms = None;
            }
            _ => {}
        }
    }

    /// Latest pointer position in container CSS pixels; coalesced until the next frame.
    pub fn pointer_moved(&mut self, css: Vec2) {
        if self.state != LifecycleState::Disposed {
            self.pointer_css = Some(css);
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer_css = None;
    }

    /// Record a container resize; applied once `RESIZE_DEBOUNCE_MS` passes without another.
    pub fn request_resize(&mut self, now_ms: f64, surface: SurfaceSize, viewport_width: f32) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        self.pending_resize = Some(PendingResize {
            due_ms: now_ms + RESIZE_DEBOUNCE_MS,
            surface,
            viewport_width,
        });
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending_resize.is_some()
    }

    fn apply_resize(&mut self, pending: PendingResize) {
        let surface = pending.surface;
        let profile = Self::pick_profile(&self.config, &self.hints, pending.viewport_width);
        let geometry_changed =
            profile.rings != self.profile.rings || profile.spacing != self.profile.spacing;

        if geometry_changed {
            match self
                .cache
                .get_or_build(profile.rings, profile.spacing, self.config.hollow_ratio)
            {
                Ok(lattice) => self.lattice = lattice,
                Err(err) => {
                    log::error!("lattice rebuild failed, keeping previous: {err}");
                    return;
                }
            }
            log::info!("profile {:?} -> {:?}", self.profile.tier, profile.tier);
        }

        let profile_changed = profile != self.profile;
        self.surface = surface;
        self.viewport_width = pending.viewport_width;
        self.profile = profile;
        self.controller.set_profile(profile);
        self.transform = LatticeTransform::fit(&surface, profile.rings, profile.spacing);
        if let Some(backend) = self.backend.as_mut() {
            backend.resize(&surface);
            if profile_changed {
                backend.upload_lattice(&self.lattice, &profile);
            }
        }
    }

    /// Advance and draw one frame. `now_ms` is the host's monotonic frame timestamp.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        match self.state {
            LifecycleState::Running => {}
            LifecycleState::Paused => return FrameOutcome::Paused,
            _ => return FrameOutcome::Inactive,
        }

        if let Some(pending) = self.pending_resize {
            if now_ms >= pending.due_ms {
                self.pending_resize = None;
                self.apply_resize(pending);
            }
        }
        if self.surface.is_degenerate() {
            self.last_frame_ms = Some(now_ms);
            return FrameOutcome::Skipped;
        }
        let Some(backend) = self.backend.as_mut() else {
            return FrameOutcome::Inactive;
        };

        let dt = self
            .last_frame_ms
            .map_or(0.0, |last| ((now_ms - last) / 1000.0) as f32)
            .clamp(0.0, MAX_FRAME_DT_SEC);
        self.last_frame_ms = Some(now_ms);

        let input = FrameInput {
            pointer: self.pointer_css.map(|css| PointerSample {
                lattice: self.transform.to_lattice(css),
                ndc: self.surface.css_to_ndc(css),
            }),
        };
        let interaction = self.controller.tick(dt, &input, &self.lattice);
        let frame = Frame {
            lattice: &self.lattice,
            interaction,
            profile: &self.profile,
            surface: &self.surface,
            transform: &self.transform,
            config: &self.config,
            time: interaction.elapsed,
        };

        match backend.render_frame(&frame) {
            Ok(()) => {
                self.frames_rendered += 1;
                if self.config.freeze_on_reduced_motion
                    && !self.profile.motion
                    && !self.reasons.motion_frozen
                {
                    // keep the first frame on screen as a still image
                    self.reasons.motion_frozen = true;
                    self.sync_pause();
                }
                FrameOutcome::Rendered
            }
            Err(err) => {
                let kind = backend.kind();
                log::error!("{} backend failed: {err}", kind.name());
                FrameOutcome::Failed(kind)
            }
        }
    }

    /// Swap the active backend, typically for the next rung of the degradation ladder.
    pub fn replace_backend(&mut self, mut backend: B) {
        if self.state == LifecycleState::Disposed {
            backend.dispose();
            return;
        }
        if let Some(mut old) = self.backend.take() {
            log::warn!(
                "replacing {} backend with {}",
                old.kind().name(),
                backend.kind().name()
            );
            old.dispose();
        }
        backend.resize(&self.surface);
        backend.upload_lattice(&self.lattice, &self.profile);
        self.backend = Some(backend);
    }

    /// Tear down; safe to call more than once.
    pub fn dispose(&mut self) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        if let Some(mut backend) = self.backend.take() {
            backend.dispose();
        }
        self.pointer_css = None;
        self.pending_resize = None;
        self.last_frame_ms = None;
        self.cache.clear();
        self.state = LifecycleState::Disposed;
        log::info!("disposed after {} frames", self.frames_rendered);
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    pub fn pause_reasons(&self) -> PauseReasons {
        self.reasons
    }

    pub fn elapsed(&self) -> f32 {
        self.controller.state().elapsed
    }

    pub fn interaction(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn profile(&self) -> &PerformanceProfile {
        &self.profile
    }

    pub fn surface(&self) -> &SurfaceSize {
        &self.surface
    }

    pub fn transform(&self) -> &LatticeTransform {
        &self.transform
    }

    pub fn lattice(&self) -> &Arc<[LatticePoint]> {
        &self.lattice
    }

    pub fn config(&self) -> &HexFieldConfig {
        &self.config
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.backend.as_ref().map(|b| b.kind())
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}
