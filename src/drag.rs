//! Pointer drag handling and the gauge's mutable state.
//!
//! Events arrive serially from the host. `GaugeState` only changes through the
//! named transitions below, so a move delivered while idle can never touch the
//! current value.

use serde::Serialize;

use crate::error::{GaugeError, Result};
use crate::geometry::{AngleMapper, Point, Rect};
use crate::ir::HistoricalPoint;
use crate::quantize::ValueQuantizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, surface: Rect },
    Move { position: Point, surface: Rect },
    Up,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GaugeState {
    pub current_value: f64,
    pub drag: DragState,
    pub panel_open: bool,
}

impl GaugeState {
    pub fn new(current_value: f64) -> Self {
        Self {
            current_value,
            ..Default::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn begin_drag(&mut self, value: Result<f64>) -> Result<f64> {
        self.drag = DragState::Dragging;
        self.commit(value)
    }

    /// Returns `Ok(None)` when idle; the value is left alone.
    pub fn drag_to(&mut self, value: Result<f64>) -> Result<Option<f64>> {
        if !self.is_dragging() {
            return Ok(None);
        }
        self.commit(value).map(Some)
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn select_point(&mut self, point: &HistoricalPoint, quantizer: &ValueQuantizer) -> Result<f64> {
        self.commit(quantizer.try_quantize(point.margin))
    }

    pub fn set_value(&mut self, raw: f64, quantizer: &ValueQuantizer) -> Result<f64> {
        self.commit(quantizer.try_quantize(raw))
    }

    pub fn toggle_panel(&mut self) -> bool {
        self.panel_open = !self.panel_open;
        self.panel_open
    }

    fn commit(&mut self, value: Result<f64>) -> Result<f64> {
        match value {
            Ok(v) if v.is_finite() => {
                self.current_value = v;
                Ok(v)
            }
            Ok(v) => Err(self.discard(GaugeError::ValueError { value: v })),
            Err(err) => Err(self.discard(err)),
        }
    }

    fn discard(&self, err: GaugeError) -> GaugeError {
        log::warn!("discarding gauge value, keeping {}: {err}", self.current_value);
        err
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PointerDragController {
    mapper: AngleMapper,
    quantizer: ValueQuantizer,
    center_ratio: f64,
}

impl PointerDragController {
    pub fn new(bound: f64, quantizer: ValueQuantizer, center_ratio: f64) -> Self {
        Self {
            mapper: AngleMapper::new(bound, Point::new(0.0, 0.0)),
            quantizer,
            center_ratio,
        }
    }

    /// Rotation center inside the input surface: horizontally centered, and
    /// pushed down because the semicircle's pivot sits below the box midpoint.
    pub fn pivot(&self, surface: &Rect) -> Point {
        Point::new(
            surface.x + surface.width / 2.0,
            surface.y + surface.height * self.center_ratio,
        )
    }

    /// Dial angle of the pointer around the pivot, in `[-90, 270)`. Anything
    /// below the pivot lands past the nearest end of the arc.
    pub fn raw_angle(&self, position: Point, surface: &Rect) -> Option<f64> {
        if surface.is_degenerate() {
            return None;
        }
        let pivot = self.pivot(surface);
        let dx = position.x - pivot.x;
        let dy = pivot.y - position.y;
        let mut angle = dy.atan2(dx).to_degrees();
        if angle < -90.0 {
            angle += 360.0;
        }
        Some(angle)
    }

    pub fn margin_at(&self, position: Point, surface: &Rect) -> Result<f64> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(GaugeError::ValueError {
                value: if position.x.is_finite() { position.y } else { position.x },
            });
        }
        let Some(angle) = self.raw_angle(position, surface) else {
            return Ok(0.0);
        };
        self.quantizer.try_quantize(self.mapper.angle_to_margin(angle))
    }

    /// Feed one pointer event through the state machine. Returns the new value
    /// when the event changed it.
    pub fn handle(&self, state: &mut GaugeState, event: &PointerEvent) -> Result<Option<f64>> {
        match event {
            PointerEvent::Down { position, surface } => {
                let value = state.begin_drag(self.margin_at(*position, surface))?;
                log::debug!("drag start at {position:?} -> {value}");
                Ok(Some(value))
            }
            PointerEvent::Move { position, surface } => {
                if !state.is_dragging() {
                    return Ok(None);
                }
                state.drag_to(self.margin_at(*position, surface))
            }
            PointerEvent::Up | PointerEvent::Leave => {
                if state.is_dragging() {
                    log::debug!("drag end at {}", state.current_value);
                }
                state.end_drag();
                Ok(None)
            }
        }
    }
}
