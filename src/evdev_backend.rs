//! Linux evdev input backend
//!
//! Finds joysticks among `/dev/input/event*` nodes and translates their raw
//! kernel events into [`InputEvent`]s indexed by capability position.

use crate::device::{
    Capabilities, DeviceError, InputBackend, InputDevice, InputEvent, HAT_CENTERED, HAT_DOWN,
    HAT_LEFT, HAT_RIGHT, HAT_UP,
};
use evdev::{AbsoluteAxisCode, Device, EventType, KeyCode, RelativeAxisCode};
use std::collections::{HashMap, VecDeque};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Component indices travel as `u8`, so at most this many of each kind are exposed
const MAX_COMPONENTS: usize = 256;

/// How long `wait_event` sleeps in poll(2) before re-checking for an interrupt
const WAIT_SLICE_MS: libc::c_int = 100;

/// X/Y axis pairs that make up hats 0-3
const HAT_AXES: [(AbsoluteAxisCode, AbsoluteAxisCode); 4] = [
    (AbsoluteAxisCode::ABS_HAT0X, AbsoluteAxisCode::ABS_HAT0Y),
    (AbsoluteAxisCode::ABS_HAT1X, AbsoluteAxisCode::ABS_HAT1Y),
    (AbsoluteAxisCode::ABS_HAT2X, AbsoluteAxisCode::ABS_HAT2Y),
    (AbsoluteAxisCode::ABS_HAT3X, AbsoluteAxisCode::ABS_HAT3Y),
];

/// X/Y relative axis pairs reported as trackballs
const BALL_AXES: [(RelativeAxisCode, RelativeAxisCode); 2] = [
    (RelativeAxisCode::REL_X, RelativeAxisCode::REL_Y),
    (RelativeAxisCode::REL_RX, RelativeAxisCode::REL_RY),
];

/// A joystick node found during the initial scan
#[derive(Debug, Clone)]
struct DeviceEntry {
    path: PathBuf,
    name: String,
}

/// evdev-backed input subsystem.
///
/// Scans once on [`EvdevBackend::init`]; there is no hot-plug handling.
/// SIGINT is only caught after [`EvdevBackend::watch_interrupts`].
pub struct EvdevBackend {
    devices: Vec<DeviceEntry>,
    interrupted: Arc<AtomicBool>,
}

impl EvdevBackend {
    /// Scan for joysticks
    pub fn init() -> Result<Self, DeviceError> {
        let mut devices: Vec<DeviceEntry> = evdev::enumerate()
            .filter_map(|(path, device)| {
                let name = device.name().unwrap_or("Unknown").to_string();
                if is_joystick(&device) {
                    debug!("Found joystick {:?} at {}", name, path.display());
                    Some(DeviceEntry { path, name })
                } else {
                    debug!("Skipping {:?} at {}", name, path.display());
                    None
                }
            })
            .collect();

        devices.sort_by(|a, b| {
            node_number(&a.path)
                .cmp(&node_number(&b.path))
                .then_with(|| a.path.cmp(&b.path))
        });

        Ok(Self {
            devices,
            interrupted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Catch SIGINT and deliver it as one `Quit` from the next
    /// `poll_event`/`wait_event` of any joystick opened from this backend.
    /// Can only be installed once per process.
    pub fn watch_interrupts(&self) -> Result<(), DeviceError> {
        let flag = self.interrupted.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .map_err(DeviceError::Signal)
    }
}

impl InputBackend for EvdevBackend {
    type Device = EvdevJoystick;

    fn device_count(&self) -> usize {
        self.devices.len()
    }

    fn device_name(&self, index: usize) -> Option<String> {
        self.devices.get(index).map(|d| d.name.clone())
    }

    fn open(&mut self, index: i32) -> Result<EvdevJoystick, DeviceError> {
        let entry = usize::try_from(index)
            .ok()
            .and_then(|i| self.devices.get(i))
            .ok_or(DeviceError::NotFound(index))?;

        let open_error = |source| DeviceError::Open {
            path: entry.path.display().to_string(),
            source,
        };
        let device = Device::open(&entry.path).map_err(open_error)?;
        device.set_nonblocking(true).map_err(open_error)?;

        debug!("Opened joystick {} ({})", index, entry.path.display());
        Ok(EvdevJoystick::new(
            index,
            entry.name.clone(),
            device,
            self.interrupted.clone(),
        ))
    }
}

/// Absolute axis exposed as a joystick axis, with its reported range
#[derive(Debug, Clone, Copy)]
struct AxisInfo {
    code: AbsoluteAxisCode,
    minimum: i32,
    maximum: i32,
}

/// An open evdev joystick
pub struct EvdevJoystick {
    index: i32,
    name: String,
    device: Device,
    axes: Vec<AxisInfo>,
    buttons: Vec<KeyCode>,
    /// Hat numbers (0-3) present on the device, in order
    hats: Vec<usize>,
    /// Last X/Y reading per hat number
    hat_state: [(i32, i32); 4],
    /// Ball pair numbers present on the device, in order
    balls: Vec<usize>,
    pending: VecDeque<InputEvent>,
    interrupted: Arc<AtomicBool>,
}

impl EvdevJoystick {
    fn new(index: i32, name: String, device: Device, interrupted: Arc<AtomicBool>) -> Self {
        let ranges: HashMap<AbsoluteAxisCode, (i32, i32)> = device
            .get_absinfo()
            .map(|infos| {
                infos
                    .map(|(code, info)| (code, (info.minimum(), info.maximum())))
                    .collect()
            })
            .unwrap_or_default();

        let mut axes = Vec::new();
        let mut hats = Vec::new();
        if let Some(abs) = device.supported_absolute_axes() {
            axes = abs
                .iter()
                .filter(|code| hat_number(code.0).is_none() && !is_multitouch(code.0))
                .take(MAX_COMPONENTS)
                .map(|code| {
                    let (minimum, maximum) = ranges.get(&code).copied().unwrap_or((0, 0));
                    AxisInfo {
                        code,
                        minimum,
                        maximum,
                    }
                })
                .collect();
            hats = HAT_AXES
                .iter()
                .enumerate()
                .filter(|(_, (x, y))| abs.contains(*x) || abs.contains(*y))
                .map(|(n, _)| n)
                .collect();
        }

        let buttons = device
            .supported_keys()
            .map(|keys| {
                keys.iter()
                    .filter(|key| key.0 >= KeyCode::BTN_0.0 /* BTN_MISC */)
                    .take(MAX_COMPONENTS)
                    .collect()
            })
            .unwrap_or_default();

        let balls = device
            .supported_relative_axes()
            .map(|rel| {
                BALL_AXES
                    .iter()
                    .enumerate()
                    .filter(|(_, (x, y))| rel.contains(*x) || rel.contains(*y))
                    .map(|(n, _)| n)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            index,
            name,
            device,
            axes,
            buttons,
            hats,
            hat_state: [(0, 0); 4],
            balls,
            pending: VecDeque::new(),
            interrupted,
        }
    }

    /// Read everything the kernel has queued into `pending`
    fn fill(&mut self) -> Result<(), DeviceError> {
        let raw: Vec<evdev::InputEvent> = match self.device.fetch_events() {
            Ok(events) => events.collect(),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(()),
            Err(e) => return Err(DeviceError::Read(e)),
        };

        for event in raw {
            if let Some(event) = self.translate(&event) {
                self.pending.push_back(event);
            }
        }
        Ok(())
    }

    /// Map a kernel event onto a capability-indexed event
    fn translate(&mut self, event: &evdev::InputEvent) -> Option<InputEvent> {
        let kind = event.event_type();
        let code = event.code();
        let value = event.value();

        if kind == EventType::KEY {
            // 2 = autorepeat
            if value == 2 {
                return None;
            }
            let button = self.buttons.iter().position(|key| key.0 == code)?;
            Some(InputEvent::ButtonChange {
                button: button as u8,
                pressed: value != 0,
            })
        } else if kind == EventType::ABSOLUTE {
            if let Some(number) = hat_number(code) {
                let hat = self.hats.iter().position(|&n| n == number)?;
                let state = &mut self.hat_state[number];
                if code == HAT_AXES[number].0 .0 {
                    state.0 = value;
                } else {
                    state.1 = value;
                }
                return Some(InputEvent::HatMotion {
                    hat: hat as u8,
                    value: hat_mask(state.0, state.1),
                });
            }
            let axis = self.axes.iter().position(|a| a.code.0 == code)?;
            let info = self.axes[axis];
            Some(InputEvent::AxisMotion {
                axis: axis as u8,
                value: scale_axis(value, info.minimum, info.maximum),
            })
        } else if kind == EventType::RELATIVE {
            let (number, is_x) = BALL_AXES.iter().enumerate().find_map(|(n, (x, y))| {
                if x.0 == code {
                    Some((n, true))
                } else if y.0 == code {
                    Some((n, false))
                } else {
                    None
                }
            })?;
            let ball = self.balls.iter().position(|&n| n == number)?;
            let delta = value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
            let (dx, dy) = if is_x { (delta, 0) } else { (0, delta) };
            Some(InputEvent::BallMotion {
                ball: ball as u8,
                dx,
                dy,
            })
        } else if kind == EventType::SYNCHRONIZATION || kind == EventType::MISC {
            None
        } else {
            Some(InputEvent::Unknown { kind: kind.0 })
        }
    }

    /// Sleep in poll(2) until the device is readable or the wait slice ends
    fn wait_readable(&self) -> Result<(), DeviceError> {
        let mut fds = libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `fds` is a single valid pollfd whose descriptor is owned by
        // `self.device` for the whole call.
        let rc = unsafe { libc::poll(&mut fds, 1, WAIT_SLICE_MS) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::Interrupted {
                return Err(DeviceError::Read(err));
            }
        }
        Ok(())
    }
}

impl InputDevice for EvdevJoystick {
    fn index(&self) -> i32 {
        self.index
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            axes: self.axes.len(),
            buttons: self.buttons.len(),
            hats: self.hats.len(),
            balls: self.balls.len(),
        }
    }

    fn poll_event(&mut self) -> Result<Option<InputEvent>, DeviceError> {
        if self.interrupted.swap(false, Ordering::SeqCst) {
            return Ok(Some(InputEvent::Quit));
        }
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.pop_front())
    }

    fn wait_event(&mut self) -> Result<InputEvent, DeviceError> {
        loop {
            if let Some(event) = self.poll_event()? {
                return Ok(event);
            }
            self.wait_readable()?;
        }
    }
}

/// Whether a device looks like a joystick or gamepad: an X/Y stick plus at
/// least one button from the joystick/gamepad block.
fn is_joystick(device: &Device) -> bool {
    let has_stick = device.supported_absolute_axes().is_some_and(|abs| {
        abs.contains(AbsoluteAxisCode::ABS_X) && abs.contains(AbsoluteAxisCode::ABS_Y)
    });
    let has_buttons = device
        .supported_keys()
        .is_some_and(|keys| keys.iter().any(|key| is_joystick_button(key.0)));
    has_stick && has_buttons
}

/// Joystick, gamepad and "trigger happy" button codes; excludes digitizer tools
fn is_joystick_button(code: u16) -> bool {
    (KeyCode::BTN_TRIGGER.0 /* BTN_JOYSTICK */..KeyCode::BTN_TOOL_PEN.0 /* BTN_DIGI */).contains(&code)
        || code >= KeyCode::BTN_TRIGGER_HAPPY1.0
}

/// Hat number (0-3) for an `ABS_HAT*` code
fn hat_number(code: u16) -> Option<usize> {
    let first = AbsoluteAxisCode::ABS_HAT0X.0;
    let last = AbsoluteAxisCode::ABS_HAT3Y.0;
    (first..=last)
        .contains(&code)
        .then(|| usize::from(code - first) / 2)
}

fn is_multitouch(code: u16) -> bool {
    code >= AbsoluteAxisCode::ABS_MT_SLOT.0
}

/// Trailing number of an `eventN` node, used to order devices
fn node_number(path: &Path) -> u32 {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("event"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

/// Scale a raw reading from `[minimum, maximum]` onto the signed 16-bit range
pub fn scale_axis(value: i32, minimum: i32, maximum: i32) -> i16 {
    let lo = i64::from(i16::MIN);
    let hi = i64::from(i16::MAX);
    if maximum <= minimum {
        return i64::from(value).clamp(lo, hi) as i16;
    }
    let span = i64::from(maximum) - i64::from(minimum);
    let offset = i64::from(value) - i64::from(minimum);
    (offset * (hi - lo) / span + lo).clamp(lo, hi) as i16
}

/// Combine a hat's X/Y readings into a direction bitmask
pub fn hat_mask(x: i32, y: i32) -> u8 {
    let mut mask = HAT_CENTERED;
    if y < 0 {
        mask |= HAT_UP;
    } else if y > 0 {
        mask |= HAT_DOWN;
    }
    if x < 0 {
        mask |= HAT_LEFT;
    } else if x > 0 {
        mask |= HAT_RIGHT;
    }
    mask
}
