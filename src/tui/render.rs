//! Test-mode rendering
//!
//! Rows are built as plain text first so the layout can be checked without
//! a terminal; [`render`] only adds styling and paints them.

use crate::device::{HAT_DOWN, HAT_LEFT, HAT_RIGHT, HAT_UP};
use crate::snapshot::JoystickSnapshot;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Columns taken by the axis label and value in front of the bar
pub const BAR_MARGIN: u16 = 20;

/// Everything needed to paint one frame
#[derive(Debug, Clone, Copy)]
pub struct TestView<'a> {
    pub snapshot: &'a JoystickSnapshot,
    pub name: &'a str,
    pub index: i32,
}

/// Render the whole test screen
pub fn render(frame: &mut Frame, view: &TestView) {
    let area = frame.area();
    let lines = view_lines(view, area.width);
    frame.render_widget(Paragraph::new(lines), area);
}

/// Build every line of the test screen for a terminal `width` columns wide
pub fn view_lines(view: &TestView, width: u16) -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let snapshot = view.snapshot;
    let bar = bar_width(width);
    let mut lines = Vec::new();

    lines.push(Line::styled(format!("Joystick Name:   '{}'", view.name), heading));
    lines.push(Line::from(format!("Joystick Number: {}", view.index)));
    lines.push(Line::default());

    lines.push(Line::styled(format!("Axes {:2}:", snapshot.axes.len()), heading));
    for (i, &value) in snapshot.axes.iter().enumerate() {
        lines.push(Line::from(axis_row(i, value, bar)));
    }
    lines.push(Line::default());

    lines.push(Line::styled(
        format!("Buttons {:2}:", snapshot.buttons.len()),
        heading,
    ));
    for (i, &pressed) in snapshot.buttons.iter().enumerate() {
        let row = button_row(i, pressed);
        if pressed {
            lines.push(Line::styled(row, Style::default().fg(Color::Green)));
        } else {
            lines.push(Line::from(row));
        }
    }
    lines.push(Line::default());

    lines.push(Line::styled(format!("Hats {:2}:", snapshot.hats.len()), heading));
    for (i, &mask) in snapshot.hats.iter().enumerate() {
        lines.extend(hat_rows(i, mask).into_iter().map(Line::from));
    }
    lines.push(Line::default());

    lines.push(Line::styled(format!("Balls {:2}:", snapshot.balls.len()), heading));
    for (i, &delta) in snapshot.balls.iter().enumerate() {
        lines.push(Line::from(ball_row(i, delta)));
    }
    lines.push(Line::default());

    lines.push(Line::styled(
        "Press Ctrl-c or q to exit",
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

/// Number of bar cells for a terminal `width` columns wide
pub fn bar_width(width: u16) -> usize {
    usize::from(width.saturating_sub(BAR_MARGIN))
}

/// Cell marked for `value` in a bar of `width` cells.
///
/// Maps -32767..=32767 linearly onto 0..width; -32768 truncates to cell 0.
pub fn bar_position(value: i16, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let last = width as i64 - 1;
    ((i64::from(value) + 32767) * last / 65534).clamp(0, last) as usize
}

/// `[   #    ]` bar for an axis value
pub fn axis_bar(value: i16, width: usize) -> String {
    let pos = bar_position(value, width);
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for i in 0..width {
        bar.push(if i == pos { '#' } else { ' ' });
    }
    bar.push(']');
    bar
}

pub fn axis_row(index: usize, value: i16, bar_width: usize) -> String {
    format!("  {:2}: {:6}  {}", index, value, axis_bar(value, bar_width))
}

pub fn button_row(index: usize, pressed: bool) -> String {
    let glyph = if pressed { "[#]" } else { "[ ]" };
    format!("  {:2}: {}  {}", index, u8::from(pressed), glyph)
}

/// Value line plus a 3x3 direction diagram with per-direction flags
pub fn hat_rows(index: usize, mask: u8) -> Vec<String> {
    let bit = |flag: u8| if mask & flag != 0 { '1' } else { '0' };
    let rows = [
        mask & HAT_UP != 0,
        mask & (HAT_UP | HAT_DOWN) == 0,
        mask & HAT_DOWN != 0,
    ];
    let cols = [
        mask & HAT_LEFT != 0,
        mask & (HAT_LEFT | HAT_RIGHT) == 0,
        mask & HAT_RIGHT != 0,
    ];
    let cell = |r: usize, c: usize| if rows[r] && cols[c] { 'O' } else { ' ' };
    let grid = |r: usize| format!("|{} {} {}|", cell(r, 0), cell(r, 1), cell(r, 2));

    vec![
        format!("  {:2}: value: {}", index, mask),
        format!("  +-----+  up:    {}", bit(HAT_UP)),
        format!("  {}  down:  {}", grid(0), bit(HAT_DOWN)),
        format!("  {}  left:  {}", grid(1), bit(HAT_LEFT)),
        format!("  {}  right: {}", grid(2), bit(HAT_RIGHT)),
        "  +-----+".to_string(),
    ]
}

pub fn ball_row(index: usize, (dx, dy): (i16, i16)) -> String {
    format!("  {:2}: {:6} {:6}", index, dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Capabilities;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_bar_position_bounds() {
        for width in [1usize, 2, 3, 10, 60, 200] {
            for value in [i16::MIN, -32767, -20000, -1, 0, 1, 20000, i16::MAX] {
                let pos = bar_position(value, width);
                assert!(pos < width, "value {value} width {width} -> {pos}");
            }
            assert_eq!(bar_position(i16::MIN, width), 0);
            assert_eq!(bar_position(i16::MAX, width), width - 1);
        }
    }

    #[test]
    fn test_bar_position_midpoint() {
        assert_eq!(bar_position(0, 61), 30);
        assert_eq!(bar_position(0, 60), 29);
    }

    #[test]
    fn test_axis_bar_glyphs() {
        assert_eq!(axis_bar(i16::MIN, 5), "[#    ]");
        assert_eq!(axis_bar(i16::MAX, 5), "[    #]");
        assert_eq!(axis_bar(0, 5), "[  #  ]");
        assert_eq!(axis_bar(0, 0), "[]");
    }

    #[test]
    fn test_bar_width_narrow_terminal() {
        assert_eq!(bar_width(80), 60);
        assert_eq!(bar_width(20), 0);
        assert_eq!(bar_width(5), 0);
    }

    #[test]
    fn test_button_row() {
        assert_eq!(button_row(3, true), "   3: 1  [#]");
        assert_eq!(button_row(12, false), "  12: 0  [ ]");
    }

    #[test]
    fn test_hat_centered_marks_middle_only() {
        let rows = hat_rows(0, 0);
        assert_eq!(
            rows,
            vec![
                "   0: value: 0",
                "  +-----+  up:    0",
                "  |     |  down:  0",
                "  |  O  |  left:  0",
                "  |     |  right: 0",
                "  +-----+",
            ]
        );
    }

    #[test]
    fn test_hat_up_left_marks_corner() {
        let rows = hat_rows(1, HAT_UP | HAT_LEFT);
        assert_eq!(
            rows,
            vec![
                "   1: value: 9",
                "  +-----+  up:    1",
                "  |O    |  down:  0",
                "  |     |  left:  1",
                "  |     |  right: 0",
                "  +-----+",
            ]
        );
    }

    #[test]
    fn test_hat_orthogonal_directions() {
        assert_eq!(hat_rows(0, HAT_UP)[2], "  |  O  |  down:  0");
        assert_eq!(hat_rows(0, HAT_RIGHT)[3], "  |    O|  left:  0");
        assert_eq!(hat_rows(0, HAT_DOWN)[4], "  |  O  |  right: 0");
        assert_eq!(hat_rows(0, HAT_DOWN | HAT_RIGHT)[4], "  |    O|  right: 1");
    }

    #[test]
    fn test_ball_row() {
        assert_eq!(ball_row(0, (5, -3)), "   0:      5     -3");
    }

    #[test]
    fn test_view_shows_axis_value_in_its_row() {
        let mut snapshot = JoystickSnapshot::new(Capabilities {
            axes: 3,
            buttons: 0,
            hats: 0,
            balls: 0,
        });
        snapshot.apply(&crate::device::InputEvent::AxisMotion {
            axis: 1,
            value: -4321,
        });
        let view = TestView {
            snapshot: &snapshot,
            name: "Pad",
            index: 2,
        };
        let lines: Vec<String> = view_lines(&view, 30).iter().map(text).collect();

        assert_eq!(lines[0], "Joystick Name:   'Pad'");
        assert_eq!(lines[1], "Joystick Number: 2");
        assert_eq!(lines[3], "Axes  3:");
        assert_eq!(lines[4], axis_row(0, 0, 10));
        assert_eq!(lines[5], axis_row(1, -4321, 10));
        assert!(lines[5].starts_with("   1:  -4321  ["));
        assert_eq!(lines[6], axis_row(2, 0, 10));
        assert_eq!(lines.last().unwrap(), "Press Ctrl-c or q to exit");
    }
}
