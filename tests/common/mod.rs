//! Scripted input backend and screen shared by the integration tests.
#![allow(dead_code)]

use anyhow::Result;
use evdev_jstest::tui::{Screen, ScreenInput, TestView};
use evdev_jstest::{Capabilities, DeviceError, InputBackend, InputDevice, InputEvent, JoystickSnapshot};
use std::collections::VecDeque;

pub fn caps(axes: usize, buttons: usize, hats: usize, balls: usize) -> Capabilities {
    Capabilities {
        axes,
        buttons,
        hats,
        balls,
    }
}

/// Device whose events are delivered in batches, one batch per drain
#[derive(Debug, Clone)]
pub struct ScriptedDevice {
    pub index: i32,
    pub name: String,
    pub caps: Capabilities,
    /// `open` fails with a permission error, like a node the user can't read
    pub unopenable: bool,
    batches: VecDeque<VecDeque<InputEvent>>,
}

impl ScriptedDevice {
    pub fn new(name: &str, caps: Capabilities) -> Self {
        Self {
            index: 0,
            name: name.to_string(),
            caps,
            unopenable: false,
            batches: VecDeque::new(),
        }
    }

    pub fn unopenable(mut self) -> Self {
        self.unopenable = true;
        self
    }

    /// Queue the events one drain pass will see
    pub fn batch(mut self, events: impl IntoIterator<Item = InputEvent>) -> Self {
        self.batches.push_back(events.into_iter().collect());
        self
    }

    /// A drain pass that finds nothing
    pub fn quiet(mut self) -> Self {
        self.batches.push_back(VecDeque::new());
        self
    }
}

impl InputDevice for ScriptedDevice {
    fn index(&self) -> i32 {
        self.index
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn poll_event(&mut self) -> Result<Option<InputEvent>, DeviceError> {
        let Some(batch) = self.batches.front_mut() else {
            return Ok(None);
        };
        match batch.pop_front() {
            Some(event) => Ok(Some(event)),
            None => {
                self.batches.pop_front();
                Ok(None)
            }
        }
    }

    fn wait_event(&mut self) -> Result<InputEvent, DeviceError> {
        while let Some(batch) = self.batches.front_mut() {
            if let Some(event) = batch.pop_front() {
                return Ok(event);
            }
            self.batches.pop_front();
        }
        // Script exhausted: behave like the user hit Ctrl-C
        Ok(InputEvent::Quit)
    }
}

/// Backend over a fixed device list
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pub devices: Vec<ScriptedDevice>,
    pub opened: Vec<i32>,
}

impl ScriptedBackend {
    pub fn new(devices: Vec<ScriptedDevice>) -> Self {
        Self {
            devices,
            opened: Vec::new(),
        }
    }
}

impl InputBackend for ScriptedBackend {
    type Device = ScriptedDevice;

    fn device_count(&self) -> usize {
        self.devices.len()
    }

    fn device_name(&self, index: usize) -> Option<String> {
        self.devices.get(index).map(|d| d.name.clone())
    }

    fn open(&mut self, index: i32) -> Result<ScriptedDevice, DeviceError> {
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| self.devices.get(i))
            .ok_or(DeviceError::NotFound(index))?;
        if slot.unopenable {
            return Err(DeviceError::Open {
                path: format!("/dev/input/event{index}"),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "Permission denied",
                ),
            });
        }
        let mut device = slot.clone();
        device.index = index;
        self.opened.push(index);
        Ok(device)
    }
}

/// Screen that records every frame and replays scripted terminal input.
/// Once the script runs out it asks the loop to exit.
#[derive(Debug, Default)]
pub struct RecordingScreen {
    pub frames: Vec<JoystickSnapshot>,
    pub polls: usize,
    inputs: VecDeque<ScreenInput>,
}

impl RecordingScreen {
    pub fn new(inputs: impl IntoIterator<Item = ScreenInput>) -> Self {
        Self {
            frames: Vec::new(),
            polls: 0,
            inputs: inputs.into_iter().collect(),
        }
    }

    /// Stay idle for `ticks` polls, then exit
    pub fn idle_for(ticks: usize) -> Self {
        Self::new(std::iter::repeat(ScreenInput::Idle).take(ticks))
    }
}

impl Screen for RecordingScreen {
    fn draw(&mut self, view: &TestView<'_>) -> Result<()> {
        self.frames.push(view.snapshot.clone());
        Ok(())
    }

    fn poll_input(&mut self) -> Result<ScreenInput> {
        self.polls += 1;
        Ok(self.inputs.pop_front().unwrap_or(ScreenInput::Exit))
    }
}
