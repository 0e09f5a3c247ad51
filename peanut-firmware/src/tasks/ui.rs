//! Graph screen loop
//!
//! Scan keys, apply them, redraw if anything changed, push the frame, sleep.
//! Drawing checkpoints keep scanning the keypad and give up on the frame
//! as soon as a key is tapped, so a slow plot never swallows input.

use core::ops::ControlFlow;

use defmt::*;
use embassy_time::{Instant, Timer};
use heapless::Vec;

use peanut_core::bus::BusArbiter;
use peanut_core::config::DeviceConfig;
use peanut_core::controls::{GraphView, InteractiveControls, ViewMode};
use peanut_core::governor::{PerformanceGovernor, MESH};
use peanut_core::graph::{
    complex, CoordinateMapper, GraphBounds, GraphOptions, Renderer2D, Viewport,
};
use peanut_core::keypad::{Key, KeyEvent, KeyScanner, Keymap, PressKind, MAX_EVENTS};
use peanut_core::plot3d::{MeshCache, Projector3D};
use peanut_core::traits::{Cooperate, Evaluator, KeyMatrix, NamedSurface};
use peanut_display::surface::FONT_HEIGHT;
use peanut_display::{palette, DisplaySurface, HeapSource, Resolution};
use peanut_drivers::display::Ili9341;
use peanut_hal::{ConfigurableBus, DelayUs, OutputPin};

use crate::demo::{self, GraphKind};
use crate::memory::HeapProbe;

type EventQueue = Vec<KeyEvent, MAX_EVENTS>;

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Keeps the keypad scanned while a frame is being drawn
struct KeyWatch<'a, M> {
    scanner: &'a mut KeyScanner<M>,
    queue: &'a mut EventQueue,
}

impl<M: KeyMatrix> Cooperate for KeyWatch<'_, M> {
    fn checkpoint(&mut self) -> ControlFlow<()> {
        let mut tapped = false;
        for event in self.scanner.get_events(now_ms()) {
            tapped |= event.kind == PressKind::Tap;
            // Full queue drops the newest
            let _ = self.queue.push(event);
        }
        if tapped {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Everything a redraw reads
struct Scene<'a> {
    mode: ViewMode,
    kind: GraphKind,
    governor: &'a PerformanceGovernor,
    pressure: bool,
    regression: Option<(f32, f32)>,
}

/// Run the graph screen forever
pub async fn run<B, CS, DC, RST, D, M>(
    config: &DeviceConfig,
    arbiter: &mut BusArbiter<B, CS>,
    panel: &mut Ili9341<DC, RST, D>,
    scanner: &mut KeyScanner<M>,
) where
    B: ConfigurableBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayUs,
    M: KeyMatrix,
{
    let d = &config.display;
    let mut surface = DisplaySurface::allocate_with_floor(
        d.width,
        d.height,
        d.min_width,
        d.min_height,
        &mut HeapSource,
    );
    let (width, height) = (surface.width(), surface.height());
    match surface.resolution() {
        Resolution::Native => info!("Framebuffer {}x{}", width, height),
        Resolution::Reduced => warn!("Framebuffer reduced to {}x{}", width, height),
        Resolution::Headless => error!("No memory for a framebuffer, running headless"),
    }

    let viewport = Viewport::inset(width, height, config.graph.margin_x, config.graph.margin_y);
    let mut view = GraphView::new(
        CoordinateMapper::new(GraphBounds::DEFAULT, viewport),
        Projector3D::for_surface(width, height),
    );
    let mut controls = InteractiveControls::new();
    let mut governor = config.governor();
    let mut cache = MeshCache::new();
    let keymap = Keymap::basic();
    let mut kind = GraphKind::default();
    let mut queue = EventQueue::new();
    let mut redraw = true;

    let mut f = demo::wave;
    let regression = demo::fit_line(&demo::SCATTER);

    info!("Graph screen ready");

    loop {
        for event in scanner.get_events(now_ms()) {
            let _ = queue.push(event);
        }
        for event in core::mem::take(&mut queue) {
            if event.kind != PressKind::Tap {
                continue;
            }
            let Some(key) = keymap.key_at(event.position) else {
                continue;
            };
            redraw |= apply_key(key, &mut controls, &mut view, &mut governor, &mut kind, &mut f);
        }

        if redraw {
            let start = governor.start_frame(now_ms());
            let pressure = governor.check_memory_pressure(&mut HeapProbe);
            if pressure {
                cache.clear();
            }

            let scene = Scene {
                mode: controls.mode(),
                kind,
                governor: &governor,
                pressure,
                regression,
            };
            let mut watch = KeyWatch {
                scanner: &mut *scanner,
                queue: &mut queue,
            };
            let finished = draw(&mut surface, &mut view, &scene, &mut cache, &mut f, &mut watch);

            // An abandoned frame is redrawn from scratch on the next pass
            if finished {
                redraw = false;
                let before = governor.profile();
                let verdict = governor.end_frame(start, now_ms());
                if governor.profile() != before {
                    info!("Quality {}: {}", verdict, governor.profile());
                }
                let status = controls.status(&view, &mut f);
                draw_status(&mut surface, &status);
            }
        }

        if !redraw {
            if let Err(fault) = surface.flush(&mut panel.link(arbiter), false) {
                warn!("Frame push failed: {}", fault);
            }
        }

        Timer::after_millis(u64::from(config.system.main_loop_delay_ms)).await;
    }
}

/// Route one tapped key; returns whether the screen must be redrawn
fn apply_key<E: Evaluator>(
    key: Key,
    controls: &mut InteractiveControls,
    view: &mut GraphView,
    governor: &mut PerformanceGovernor,
    kind: &mut GraphKind,
    f: &mut E,
) -> bool {
    // F3 on the 2D screen picks what is plotted
    if controls.mode() == ViewMode::Mode2D && key == Key::F3 {
        *kind = kind.next();
        view.mapper.reset();
        if let Some(bounds) = kind.initial_bounds() {
            view.mapper.set_bounds(bounds);
        }
        info!("Graph: {}", *kind);
        return true;
    }

    let mode = controls.mode();
    let preset = governor.mode();
    let redraw = controls.handle_key(key, view, governor, f);
    if controls.mode() != mode {
        info!("View: {}", controls.mode().name());
    }
    if governor.mode() != preset {
        info!("Performance mode: {}", governor.mode().name());
    }
    redraw
}

/// Draw the current scene; `false` if a checkpoint abandoned it
fn draw<E: Evaluator, C: Cooperate>(
    surface: &mut DisplaySurface,
    view: &mut GraphView,
    scene: &Scene<'_>,
    cache: &mut MeshCache,
    f: &mut E,
    coop: &mut C,
) -> bool {
    let profile = scene.governor.profile();

    match (scene.mode, scene.kind) {
        (ViewMode::Mode3D, _) => {
            let resolution = if scene.pressure {
                MESH.min
            } else {
                profile.mesh_resolution
            };
            let mut eval = NamedSurface::new(demo::SURFACE_SOURCE, demo::surface);
            let Some(mesh) = cache.get_or_generate(
                &mut eval,
                demo::SURFACE_RANGE,
                demo::SURFACE_RANGE,
                resolution,
                coop,
            ) else {
                return false;
            };
            let area = Viewport::new(0, 0, surface.width(), surface.height());
            view.projector
                .render_scene(surface, &area, Some(mesh), true, view.show_wireframe);
            true
        }
        // Trace follows the function whatever the 2D screen was showing
        (ViewMode::Trace, _) | (ViewMode::Mode2D, GraphKind::Function) => {
            let samples = scene
                .governor
                .effective_samples(view.mapper.bounds().width(), scene.pressure);
            let options = GraphOptions {
                trace_x: (scene.mode == ViewMode::Trace).then_some(view.trace_x),
                ..GraphOptions::default()
            };
            let stats =
                Renderer2D::new(surface, &view.mapper).render_graph(&options, f, samples, coop);
            !stats.cancelled
        }
        (ViewMode::Mode2D, GraphKind::Scatter) => {
            let mut renderer = Renderer2D::new(surface, &view.mapper);
            renderer.clear_graph_area();
            renderer.draw_grid();
            renderer.draw_axes();
            renderer.plot_data_points(&demo::SCATTER, palette::DATA_POINTS);
            if let Some((slope, intercept)) = scene.regression {
                renderer.plot_regression_line(slope, intercept);
            }
            true
        }
        (ViewMode::Mode2D, GraphKind::TimeSeries) => {
            let mut renderer = Renderer2D::new(surface, &view.mapper);
            renderer.clear_graph_area();
            renderer.draw_grid();
            renderer.draw_axes();
            renderer.plot_time_series(&demo::SERIES, palette::FUNCTION, true);
            true
        }
        (ViewMode::Mode2D, GraphKind::Bars) => {
            let mut renderer = Renderer2D::new(surface, &view.mapper);
            renderer.clear_graph_area();
            renderer.draw_grid();
            renderer.draw_axes();
            renderer.plot_bar_chart(&demo::BARS, palette::FUNCTION);
            true
        }
        (ViewMode::Mode2D, GraphKind::Complex) => {
            complex::plot_complex_plane(surface, &mut view.mapper, &demo::ROOTS, palette::FUNCTION);
            true
        }
        (ViewMode::Mode2D, GraphKind::Mandelbrot) => complex::plot_mandelbrot(
            surface,
            &view.mapper,
            u32::from(profile.iteration_limit),
            coop,
        ),
    }
}

fn draw_status(surface: &mut DisplaySurface, line: &str) {
    let width = u32::from(surface.width());
    surface.fill_rect(0, 0, width, u32::from(FONT_HEIGHT), palette::BACKGROUND);
    surface.draw_text(line, 2, 0, palette::TEXT);
}
