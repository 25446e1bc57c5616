//! Current control state of one open joystick

use crate::device::{Capabilities, InputEvent};

/// Last known value of every axis, button, hat and ball.
///
/// Sized from the device's capabilities when the session starts. Events
/// addressing a component past those counts mean the device reported
/// inconsistent capabilities and abort with a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoystickSnapshot {
    pub axes: Vec<i16>,
    pub buttons: Vec<bool>,
    pub hats: Vec<u8>,
    /// Relative (x, y) motion from the most recent ball event
    pub balls: Vec<(i16, i16)>,
}

impl JoystickSnapshot {
    pub fn new(caps: Capabilities) -> Self {
        Self {
            axes: vec![0; caps.axes],
            buttons: vec![false; caps.buttons],
            hats: vec![0; caps.hats],
            balls: vec![(0, 0); caps.balls],
        }
    }

    /// Store the value carried by `event`.
    ///
    /// Returns `false` for events that carry no control state (`Quit`,
    /// `Unknown`).
    ///
    /// # Panics
    ///
    /// If the event's component index is outside the snapshot.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::AxisMotion { axis, value } => {
                *slot(&mut self.axes, axis, "axis") = value;
            }
            InputEvent::ButtonChange { button, pressed } => {
                *slot(&mut self.buttons, button, "button") = pressed;
            }
            InputEvent::HatMotion { hat, value } => {
                *slot(&mut self.hats, hat, "hat") = value;
            }
            InputEvent::BallMotion { ball, dx, dy } => {
                *slot(&mut self.balls, ball, "ball") = (dx, dy);
            }
            InputEvent::Quit | InputEvent::Unknown { .. } => return false,
        }
        true
    }
}

fn slot<'a, T>(values: &'a mut [T], index: u8, kind: &str) -> &'a mut T {
    let len = values.len();
    let index = usize::from(index);
    assert!(
        index < len,
        "{kind} index {index} out of range: device reported {len} {kind}(s)"
    );
    &mut values[index]
}
