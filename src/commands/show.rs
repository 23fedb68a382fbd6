use anyhow::Result;

use datebook_core::{AppointmentStore, SyncController, YearMonth};

use crate::render::{Render, render_appointments};

pub async fn run<S: AppointmentStore>(
    controller: &SyncController<S>,
    month: Option<YearMonth>,
) -> Result<()> {
    match month {
        Some(month) => controller.goto(month).await?,
        None => controller.load().await?,
    };

    print_month(controller).await;
    Ok(())
}

/// Grid followed by the displayed month's appointments.
pub async fn print_month<S: AppointmentStore>(controller: &SyncController<S>) {
    println!("{}", controller.month_view().await.render());
    println!();
    println!("{}", render_appointments(&controller.appointments().await));
}
