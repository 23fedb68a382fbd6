use anyhow::Result;
use owo_colors::OwoColorize;

use datebook_core::{AppointmentId, DatebookError, StoreBackend, SyncController};

use crate::commands::note_if_local;

pub async fn run(controller: &SyncController<StoreBackend>, id: String) -> Result<()> {
    let id = AppointmentId::new(id);

    match controller.delete(&id).await {
        Ok(()) => {
            println!("{} {}", "Deleted".red(), id);
            Ok(())
        }
        Err(DatebookError::NotFound(_)) => {
            note_if_local(controller.store());
            anyhow::bail!("No appointment with id '{id}'")
        }
        Err(e) => Err(e.into()),
    }
}
