// Lifecycle behavior driven through recording backends and drawing targets.

use glam::Vec2;
use hexfield_core::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Log {
    frames: usize,
    uploads: usize,
    resizes: usize,
    disposes: usize,
    last_upload_len: usize,
    last_elapsed: f32,
    dots: usize,
}

struct SpyBackend {
    kind: BackendKind,
    log: Rc<RefCell<Log>>,
    fail: bool,
}

impl SpyBackend {
    fn new(log: &Rc<RefCell<Log>>) -> Self {
        Self {
            kind: BackendKind::PointCloud,
            log: Rc::clone(log),
            fail: false,
        }
    }
}

impl RendererBackend for SpyBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn upload_lattice(&mut self, lattice: &[LatticePoint], _profile: &PerformanceProfile) {
        let mut log = self.log.borrow_mut();
        log.uploads += 1;
        log.last_upload_len = lattice.len();
    }

    fn resize(&mut self, _surface: &SurfaceSize) {
        self.log.borrow_mut().resizes += 1;
    }

    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        if self.fail {
            return Err(RenderError::SurfaceLost);
        }
        let mut log = self.log.borrow_mut();
        log.frames += 1;
        log.last_elapsed = frame.interaction.elapsed;
        Ok(())
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposes += 1;
    }
}

/// Counts draw calls issued to a 2D target.
#[derive(Clone, Default)]
struct SpyCanvas(Rc<RefCell<Log>>);

impl DotCanvas for SpyCanvas {
    fn begin_frame(&mut self, _surface: &SurfaceSize, _background: [f32; 4]) {
        self.0.borrow_mut().frames += 1;
    }

    fn fill_dot(&mut self, _center: Vec2, _radius: f32, _rgba: [f32; 4]) {
        self.0.borrow_mut().dots += 1;
    }

    fn release(&mut self) {
        self.0.borrow_mut().disposes += 1;
    }
}

fn wide_surface() -> SurfaceSize {
    SurfaceSize::new(1600.0, 900.0, 1.0)
}

fn mounted(config: HexFieldConfig, hints: HostHints) -> (Lifecycle<SpyBackend>, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut lc = Lifecycle::new(config, hints);
    lc.mount(SpyBackend::new(&log), wide_surface(), 1600.0).unwrap();
    (lc, log)
}

#[test]
fn mount_uploads_and_runs() {
    let (lc, log) = mounted(HexFieldConfig::default(), HostHints::default());
    assert_eq!(lc.state(), LifecycleState::Running);
    assert_eq!(lc.profile().tier, PerfTier::Wide);
    let log = log.borrow();
    assert_eq!(log.uploads, 1);
    assert_eq!(log.resizes, 1);
    assert_eq!(log.last_upload_len, lattice_len(13, DEFAULT_HOLLOW_RATIO));
}

#[test]
fn mount_twice_is_rejected() {
    let (mut lc, _) = mounted(HexFieldConfig::default(), HostHints::default());
    let other = Rc::new(RefCell::new(Log::default()));
    let err = lc.mount(SpyBackend::new(&other), wide_surface(), 1600.0).unwrap_err();
    assert_eq!(
        err,
        LifecycleError::InvalidTransition {
            from: LifecycleState::Running,
            action: "mount"
        }
    );
    // the rejected backend is released, not leaked
    assert_eq!(other.borrow().disposes, 1);
}

#[test]
fn frame_before_mount_is_inactive() {
    let mut lc: Lifecycle<SpyBackend> =
        Lifecycle::new(HexFieldConfig::default(), HostHints::default());
    assert_eq!(lc.frame(0.0), FrameOutcome::Inactive);
}

#[test]
fn elapsed_tracks_frame_timestamps() {
    let (mut lc, _) = mounted(HexFieldConfig::default(), HostHints::default());
    assert_eq!(lc.frame(1000.0), FrameOutcome::Rendered);
    lc.frame(1016.0);
    lc.frame(1032.0);
    assert!((lc.elapsed() - 0.032).abs() < 1e-5);
}

#[test]
fn long_gaps_are_clamped() {
    let (mut lc, _) = mounted(HexFieldConfig::default(), HostHints::default());
    lc.frame(0.0);
    lc.frame(5000.0);
    assert!((lc.elapsed() - MAX_FRAME_DT_SEC).abs() < 1e-6);
}

#[test]
fn pause_freezes_elapsed_and_resumes_without_jump() {
    let (mut lc, log) = mounted(HexFieldConfig::default(), HostHints::default());
    lc.frame(0.0);
    lc.frame(16.0);
    let before = lc.elapsed();

    lc.set_offscreen(true);
    assert_eq!(lc.state(), LifecycleState::Paused);
    for i in 0..10 {
        assert_eq!(lc.frame(100.0 + i as f64 * 16.0), FrameOutcome::Paused);
    }
    assert_eq!(lc.elapsed(), before);
    let frames_while_paused = log.borrow().frames;

    lc.set_offscreen(false);
    assert_eq!(lc.state(), LifecycleState::Running);
    lc.frame(60_000.0);
    // first frame after resume contributes no time
    assert_eq!(lc.elapsed(), before);
    lc.frame(60_016.0);
    assert!((lc.elapsed() - before - 0.016).abs() < 1e-5);
    assert_eq!(log.borrow().frames, frames_while_paused + 2);
}

#[test]
fn any_pause_reason_keeps_it_paused() {
    let (mut lc, _) = mounted(HexFieldConfig::default(), HostHints::default());
    lc.set_document_hidden(true);
    lc.set_external_pause(true);
    lc.set_document_hidden(false);
    assert_eq!(lc.state(), LifecycleState::Paused);
    lc.set_external_pause(false);
    assert_eq!(lc.state(), LifecycleState::Running);
}

#[test]
fn paused_config_mounts_paused() {
    let config = HexFieldConfig {
        paused: true,
        ..HexFieldConfig::default()
    };
    let (mut lc, log) = mounted(config, HostHints::default());
    assert_eq!(lc.state(), LifecycleState::Paused);
    assert_eq!(lc.frame(0.0), FrameOutcome::Paused);
    assert_eq!(log.borrow().frames, 0);
}

#[test]
fn dispose_is_idempotent_and_stops_drawing() {
    let (mut lc, log) = mounted(HexFieldConfig::default(), HostHints::default());
    lc.frame(0.0);
    lc.dispose();
    lc.dispose();
    assert_eq!(lc.state(), LifecycleState::Disposed);
    assert_eq!(log.borrow().disposes, 1);

    let frames = log.borrow().frames;
    for i in 0..5 {
        assert_eq!(lc.frame(100.0 * i as f64), FrameOutcome::Inactive);
    }
    lc.pointer_moved(Vec2::new(10.0, 10.0));
    lc.request_resize(0.0, SurfaceSize::new(10.0, 10.0, 1.0), 10.0);
    assert!(!lc.has_pending_resize());
    assert_eq!(log.borrow().frames, frames);
}

#[test]
fn canvas_draws_nothing_after_dispose() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut lc = Lifecycle::new(HexFieldConfig::default(), HostHints::default());
    lc.mount(CanvasRenderer::new(SpyCanvas(Rc::clone(&log))), wide_surface(), 1600.0)
        .unwrap();
    lc.frame(0.0);
    let dots = log.borrow().dots;
    assert!(dots > 0);

    lc.dispose();
    lc.frame(16.0);
    lc.frame(32.0);
    assert_eq!(log.borrow().dots, dots);
    assert_eq!(log.borrow().disposes, 1);
}

#[test]
fn resize_is_debounced_and_keeps_latest() {
    let (mut lc, log) = mounted(HexFieldConfig::default(), HostHints::default());
    lc.frame(0.0);
    lc.request_resize(10.0, SurfaceSize::new(700.0, 500.0, 1.0), 700.0);
    lc.request_resize(50.0, SurfaceSize::new(300.0, 500.0, 1.0), 300.0);

    lc.frame(100.0);
    assert!(lc.has_pending_resize());
    assert_eq!(lc.profile().tier, PerfTier::Wide);

    lc.frame(150.0);
    assert!(!lc.has_pending_resize());
    assert_eq!(lc.profile().tier, PerfTier::Narrow);
    assert_eq!(lc.surface().css_width, 300.0);
    assert_eq!(log.borrow().last_upload_len, lattice_len(7, DEFAULT_HOLLOW_RATIO));
}

#[test]
fn same_tier_resize_reuses_lattice() {
    let (mut lc, log) = mounted(HexFieldConfig::default(), HostHints::default());
    let before = std::sync::Arc::clone(lc.lattice());
    lc.request_resize(0.0, SurfaceSize::new(1200.0, 700.0, 2.0), 1200.0);
    lc.frame(200.0);
    assert!(std::sync::Arc::ptr_eq(&before, lc.lattice()));
    assert_eq!(log.borrow().uploads, 1);
    assert_eq!(log.borrow().resizes, 2);
    assert_eq!(lc.transform().center, Vec2::new(600.0, 350.0));
}

#[test]
fn degenerate_surface_skips_frames() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut lc = Lifecycle::new(HexFieldConfig::default(), HostHints::default());
    lc.mount(SpyBackend::new(&log), SurfaceSize::new(0.0, 0.0, 1.0), 0.0)
        .unwrap();
    assert_eq!(lc.frame(0.0), FrameOutcome::Skipped);
    assert_eq!(log.borrow().frames, 0);

    lc.request_resize(0.0, wide_surface(), 1600.0);
    assert_eq!(lc.frame(150.0), FrameOutcome::Rendered);
}

#[test]
fn reduced_motion_freeze_pauses_after_first_frame() {
    let config = HexFieldConfig {
        freeze_on_reduced_motion: true,
        ..HexFieldConfig::default()
    };
    let hints = HostHints {
        reduced_motion: true,
        low_power: false,
    };
    let (mut lc, log) = mounted(config, hints);
    assert_eq!(lc.frame(0.0), FrameOutcome::Rendered);
    assert_eq!(lc.state(), LifecycleState::Paused);
    assert!(lc.pause_reasons().motion_frozen);
    assert_eq!(lc.frame(16.0), FrameOutcome::Paused);
    assert_eq!(log.borrow().frames, 1);
}

#[test]
fn failing_backend_reports_and_can_be_replaced() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut lc = Lifecycle::new(HexFieldConfig::default(), HostHints::default());
    let mut failing = SpyBackend::new(&log);
    failing.fail = true;
    lc.mount(failing, wide_surface(), 1600.0).unwrap();
    assert_eq!(lc.frame(0.0), FrameOutcome::Failed(BackendKind::PointCloud));

    let next = log.borrow().disposes;
    let mut canvas = SpyBackend::new(&log);
    canvas.kind = BackendKind::Canvas2d;
    lc.replace_backend(canvas);
    assert_eq!(log.borrow().disposes, next + 1);
    assert_eq!(lc.backend_kind(), Some(BackendKind::Canvas2d));
    assert_eq!(lc.frame(16.0), FrameOutcome::Rendered);
}

#[test]
fn pointer_feeds_focus_set() {
    let (mut lc, _) = mounted(HexFieldConfig::default(), HostHints::default());
    let center = lc.surface().css_center();
    lc.pointer_moved(center + Vec2::new(40.0, 0.0));
    lc.frame(0.0);
    assert!(lc.interaction().pointer_active());
    assert!(!lc.interaction().focus.is_empty());
    assert!(lc.interaction().focus.len() <= lc.profile().focus_count);

    lc.pointer_left();
    lc.frame(16.0);
    assert!(lc.interaction().focus.is_empty());
}

#[test]
fn static_backend_draws_once_per_change() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut lc = Lifecycle::new(HexFieldConfig::default(), HostHints::default());
    lc.mount(StaticRenderer::new(SpyCanvas(Rc::clone(&log))), wide_surface(), 1600.0)
        .unwrap();
    lc.frame(0.0);
    lc.frame(16.0);
    lc.frame(32.0);
    assert_eq!(log.borrow().frames, 1);

    lc.request_resize(40.0, SurfaceSize::new(1000.0, 800.0, 1.0), 1000.0);
    lc.frame(200.0);
    lc.frame(216.0);
    assert_eq!(log.borrow().frames, 2);
}
