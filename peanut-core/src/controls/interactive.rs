//! Key handling for the graph screen

use core::fmt::Write;

use crate::governor::PerformanceGovernor;
use crate::graph::{auto_scale, CoordinateMapper};
use crate::keypad::Key;
use crate::plot3d::{Projector3D, ROTATE_STEP};
use crate::traits::{Evaluator, PlotValue};

use super::mode::ViewMode;

/// 2D zoom-in factor for `+`
pub const ZOOM_IN: f32 = 1.5;
/// 2D zoom-out factor for `−`
pub const ZOOM_OUT: f32 = 0.67;
/// Pan distance as a share of the visible extent
pub const PAN_FRACTION: f32 = 0.1;
pub const DEFAULT_TRACE_STEP: f32 = 0.1;

/// 3D distance multipliers for `+` and `−`
const DISTANCE_IN: f32 = 0.9;
const DISTANCE_OUT: f32 = 1.1;

/// Status bar text
pub type StatusLine = heapless::String<64>;

/// Everything the keys can change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphView {
    pub mapper: CoordinateMapper,
    pub projector: Projector3D,
    pub show_wireframe: bool,
    pub trace_x: f32,
    pub trace_step: f32,
}

impl GraphView {
    pub fn new(mapper: CoordinateMapper, projector: Projector3D) -> Self {
        Self {
            mapper,
            projector,
            show_wireframe: true,
            trace_x: 0.0,
            trace_step: DEFAULT_TRACE_STEP,
        }
    }

    fn clamp_trace(&mut self) {
        let b = self.mapper.bounds();
        self.trace_x = self.trace_x.clamp(b.x_min(), b.x_max());
    }
}

/// Mode state plus key dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractiveControls {
    mode: ViewMode,
}

impl InteractiveControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Apply one key and report whether a redraw is needed
    ///
    /// `f` is the plotted function; 2D uses it for auto-scale. The governor
    /// supplies the auto-scale sample count and takes the 3D preset cycle.
    pub fn handle_key<E: Evaluator>(
        &mut self,
        key: Key,
        view: &mut GraphView,
        governor: &mut PerformanceGovernor,
        f: &mut E,
    ) -> bool {
        match self.mode {
            ViewMode::Mode2D => self.handle_2d(key, view, governor, f),
            ViewMode::Mode3D => self.handle_3d(key, view, governor),
            ViewMode::Trace => self.handle_trace(key, view),
        }
    }

    fn handle_2d<E: Evaluator>(
        &mut self,
        key: Key,
        view: &mut GraphView,
        governor: &PerformanceGovernor,
        f: &mut E,
    ) -> bool {
        let mapper = &mut view.mapper;
        let (w, h) = (mapper.bounds().width(), mapper.bounds().height());

        match key {
            Key::Add => mapper.zoom(ZOOM_IN, None).is_ok(),
            Key::Subtract => mapper.zoom(ZOOM_OUT, None).is_ok(),
            Key::Digit(8) => mapper.pan(0.0, h * PAN_FRACTION).is_ok(),
            Key::Digit(2) => mapper.pan(0.0, -h * PAN_FRACTION).is_ok(),
            Key::Digit(4) => mapper.pan(-w * PAN_FRACTION, 0.0).is_ok(),
            Key::Digit(6) => mapper.pan(w * PAN_FRACTION, 0.0).is_ok(),
            Key::Digit(5) => {
                mapper.reset();
                true
            }
            Key::Enter => {
                let samples = usize::from(governor.profile().sample_count);
                matches!(auto_scale(mapper, f, samples), Ok(true))
            }
            Key::F1 | Key::F2 => {
                self.mode = self.mode.transition(key);
                if self.mode == ViewMode::Trace {
                    view.clamp_trace();
                }
                true
            }
            _ => false,
        }
    }

    fn handle_3d(
        &mut self,
        key: Key,
        view: &mut GraphView,
        governor: &mut PerformanceGovernor,
    ) -> bool {
        let projector = &mut view.projector;

        match key {
            Key::Digit(8) => projector.rotate(-ROTATE_STEP, 0.0),
            Key::Digit(2) => projector.rotate(ROTATE_STEP, 0.0),
            Key::Digit(4) => projector.rotate(0.0, -ROTATE_STEP),
            Key::Digit(6) => projector.rotate(0.0, ROTATE_STEP),
            Key::Add => projector.zoom(DISTANCE_IN),
            Key::Subtract => projector.zoom(DISTANCE_OUT),
            Key::Digit(5) => projector.reset_view(),
            Key::F1 => view.show_wireframe = !view.show_wireframe,
            Key::F2 => self.mode = self.mode.transition(key),
            Key::F3 => {
                governor.cycle_mode();
            }
            _ => return false,
        }
        true
    }

    fn handle_trace(&mut self, key: Key, view: &mut GraphView) -> bool {
        let redraw = match key {
            Key::Digit(4) => {
                view.trace_x -= view.trace_step;
                true
            }
            Key::Digit(6) => {
                view.trace_x += view.trace_step;
                true
            }
            // Step changes show up on the next move
            Key::Add => {
                view.trace_step *= 0.5;
                false
            }
            Key::Subtract => {
                view.trace_step *= 2.0;
                false
            }
            Key::F1 => {
                self.mode = self.mode.transition(key);
                true
            }
            _ => false,
        };
        view.clamp_trace();
        redraw
    }

    /// One-line description of the current mode
    pub fn status<E: Evaluator>(&self, view: &GraphView, f: &mut E) -> StatusLine {
        let mut line = StatusLine::new();
        match self.mode {
            ViewMode::Trace => {
                let y = f.evaluate(view.trace_x).plot_value();
                // Overlong numbers truncate the line
                let _ = write!(line, "Trace: X={:.3}, Y={:.3}", view.trace_x, y);
            }
            mode => {
                let _ = line.push_str(mode.name());
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::governor::PerformanceMode;
    use crate::graph::{GraphBounds, Viewport};
    use crate::plot3d::Camera;

    fn view() -> GraphView {
        let mapper = CoordinateMapper::new(GraphBounds::DEFAULT, Viewport::new(0, 0, 320, 240));
        GraphView::new(mapper, Projector3D::for_surface(320, 240))
    }

    fn press(controls: &mut InteractiveControls, view: &mut GraphView, key: Key) -> bool {
        let mut governor = PerformanceGovernor::default();
        controls.handle_key(key, view, &mut governor, &mut |x: f32| x * 2.0)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_2d_zoom() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        assert!(press(&mut c, &mut v, Key::Add));
        assert!(approx(v.mapper.bounds().width(), 20.0 / 1.5));
        assert!(press(&mut c, &mut v, Key::Subtract));
        assert!(approx(v.mapper.bounds().width(), 20.0 / 1.5 / 0.67));
    }

    #[test]
    fn test_2d_pan_and_reset() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        assert!(press(&mut c, &mut v, Key::Digit(8)));
        assert!(approx(v.mapper.bounds().y_min(), -8.0));
        assert!(press(&mut c, &mut v, Key::Digit(4)));
        assert!(approx(v.mapper.bounds().x_max(), 8.0));
        assert!(press(&mut c, &mut v, Key::Digit(5)));
        assert_eq!(*v.mapper.bounds(), GraphBounds::DEFAULT);
    }

    #[test]
    fn test_2d_auto_scale() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        assert!(press(&mut c, &mut v, Key::Enter));
        // 2x over [-10, 10] spans [-20, 20], padded by 10%
        assert!(approx(v.mapper.bounds().y_min(), -24.0));
        assert!(approx(v.mapper.bounds().y_max(), 24.0));
    }

    #[test]
    fn test_unmapped_key_no_redraw() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        assert!(!press(&mut c, &mut v, Key::Menu));
        assert!(!press(&mut c, &mut v, Key::Digit(7)));
        assert_eq!(*v.mapper.bounds(), GraphBounds::DEFAULT);
    }

    #[test]
    fn test_3d_controls() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        assert!(press(&mut c, &mut v, Key::F2));
        assert_eq!(c.mode(), ViewMode::Mode3D);

        let start = *v.projector.camera();
        assert!(press(&mut c, &mut v, Key::Digit(8)));
        assert!(approx(v.projector.camera().tilt, start.tilt - 0.1));
        assert!(press(&mut c, &mut v, Key::Digit(6)));
        assert!(approx(v.projector.camera().azimuth, start.azimuth + 0.1));
        assert!(press(&mut c, &mut v, Key::Add));
        assert!(approx(v.projector.camera().distance, 13.5));

        assert!(press(&mut c, &mut v, Key::F1));
        assert!(!v.show_wireframe);

        assert!(press(&mut c, &mut v, Key::Digit(5)));
        assert_eq!(*v.projector.camera(), Camera::default());

        // 2D bounds untouched by 3D keys
        assert_eq!(*v.mapper.bounds(), GraphBounds::DEFAULT);

        assert!(press(&mut c, &mut v, Key::F2));
        assert_eq!(c.mode(), ViewMode::Mode2D);
    }

    #[test]
    fn test_3d_cycles_preset() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        let mut governor = PerformanceGovernor::default();
        let mut f = |x: f32| x;
        c.handle_key(Key::F2, &mut v, &mut governor, &mut f);
        assert!(c.handle_key(Key::F3, &mut v, &mut governor, &mut f));
        assert_eq!(governor.mode(), PerformanceMode::Fast);
    }

    #[test]
    fn test_trace_movement_and_step() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        assert!(press(&mut c, &mut v, Key::F1));
        assert_eq!(c.mode(), ViewMode::Trace);

        assert!(press(&mut c, &mut v, Key::Digit(6)));
        assert!(approx(v.trace_x, 0.1));
        assert!(!press(&mut c, &mut v, Key::Subtract));
        assert!(approx(v.trace_step, 0.2));
        assert!(press(&mut c, &mut v, Key::Digit(4)));
        assert!(approx(v.trace_x, -0.1));
        assert!(!press(&mut c, &mut v, Key::Add));
        assert!(!press(&mut c, &mut v, Key::Add));
        assert!(approx(v.trace_step, 0.05));
    }

    #[test]
    fn test_trace_clamped_to_bounds() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        press(&mut c, &mut v, Key::F1);
        v.trace_step = 50.0;
        press(&mut c, &mut v, Key::Digit(6));
        assert_eq!(v.trace_x, 10.0);
        press(&mut c, &mut v, Key::Digit(4));
        assert_eq!(v.trace_x, -10.0);
    }

    #[test]
    fn test_trace_exits_to_2d() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        press(&mut c, &mut v, Key::F1);
        // F2 does nothing in trace
        assert!(!press(&mut c, &mut v, Key::F2));
        assert_eq!(c.mode(), ViewMode::Trace);
        assert!(press(&mut c, &mut v, Key::F1));
        assert_eq!(c.mode(), ViewMode::Mode2D);
    }

    #[test]
    fn test_status_line() {
        let mut c = InteractiveControls::new();
        let mut v = view();
        let mut f = |x: f32| x * 2.0;
        assert_eq!(c.status(&v, &mut f).as_str(), "2D Graph");
        press(&mut c, &mut v, Key::F2);
        assert_eq!(c.status(&v, &mut f).as_str(), "3D View");
        press(&mut c, &mut v, Key::F2);
        press(&mut c, &mut v, Key::F1);
        v.trace_x = 1.5;
        assert_eq!(c.status(&v, &mut f).as_str(), "Trace: X=1.500, Y=3.000");
    }
}
