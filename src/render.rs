//! Terminal rendering for datebook types.
//!
//! Extension traits that add colored output to datebook-core types using
//! owo_colors.

use datebook_core::grid::{self, CalendarCell};
use datebook_core::{Appointment, AppointmentKind, MonthView, SyncState};
use owo_colors::OwoColorize;

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Every cell is four columns wide.
const CELL_WIDTH: usize = 4;

/// Extension trait for terminal rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for MonthView {
    fn render(&self) -> String {
        let width = CELL_WIDTH * WEEKDAYS.len();
        let mut lines = Vec::with_capacity(2 + grid::GRID_WEEKS);

        let title = format!("{:^width$}", self.month.to_string());
        lines.push(title.bold().to_string());

        let header: String = WEEKDAYS.iter().map(|d| format!(" {d:>2} ")).collect();
        lines.push(header.dimmed().to_string());

        for week in grid::weeks(&self.cells) {
            lines.push(week.iter().map(Render::render).collect());
        }

        lines.join("\n")
    }
}

impl Render for CalendarCell {
    fn render(&self) -> String {
        let text = cell_text(self);
        if !self.in_current_month {
            text.dimmed().to_string()
        } else if self.has_appointment {
            text.green().bold().to_string()
        } else if self.is_today {
            text.cyan().to_string()
        } else {
            text
        }
    }
}

/// Uncolored cell text: today in brackets, a trailing `*` for days with
/// appointments.
fn cell_text(cell: &CalendarCell) -> String {
    let day = cell.day;
    match (cell.is_today, cell.has_appointment) {
        (true, _) => format!("[{day:>2}]"),
        (false, true) => format!(" {day:>2}*"),
        (false, false) => format!(" {day:>2} "),
    }
}

impl Render for AppointmentKind {
    fn render(&self) -> String {
        let label = format!("[{self}]");
        match self {
            AppointmentKind::Medical => label.red().to_string(),
            AppointmentKind::Class => label.blue().to_string(),
            AppointmentKind::Personal => label.magenta().to_string(),
            AppointmentKind::General => label.dimmed().to_string(),
        }
    }
}

impl Render for Appointment {
    fn render(&self) -> String {
        format!(
            "{} {:>8}  {} {} {}",
            self.date.bold(),
            self.time,
            self.title,
            self.kind.render(),
            self.id.dimmed()
        )
    }
}

impl Render for SyncState {
    fn render(&self) -> String {
        match self {
            SyncState::Error => self.red().to_string(),
            SyncState::Idle => self.green().to_string(),
            _ => self.yellow().to_string(),
        }
    }
}

/// Render a month's appointments, one per line.
pub fn render_appointments(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "No appointments".dimmed().to_string();
    }

    appointments
        .iter()
        .map(Render::render)
        .collect::<Vec<_>>()
        .join("\n")
}
