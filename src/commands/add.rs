use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use datebook_core::time_format::format_time_12h;
use datebook_core::{AppointmentKind, DateKey, NewAppointment, StoreBackend, SyncController};

use crate::commands::{note_if_local, show::print_month};
use crate::render::Render;

pub async fn run(
    controller: &SyncController<StoreBackend>,
    date: DateKey,
    title: Option<String>,
    time: Option<String>,
    kind: Option<AppointmentKind>,
) -> Result<()> {
    let mut request = NewAppointment::on(date);
    request.title = title;
    request.time = time
        .as_deref()
        .map(format_time_12h)
        .transpose()
        .context("Invalid --time, expected HH:MM")?;
    request.kind = kind;

    // Show the month the appointment lands in
    controller.goto(date.year_month()).await?;

    let created = controller.create(request).await?;
    println!("{} {}", "Created".green(), created.render());
    note_if_local(controller.store());
    println!();

    print_month(controller).await;
    Ok(())
}
