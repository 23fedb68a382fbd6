pub mod add;
pub mod browse;
pub mod config;
pub mod delete;
pub mod show;

use owo_colors::OwoColorize;

use datebook_core::StoreBackend;

/// Appointments written to a local store vanish when the process exits.
fn note_if_local(store: &StoreBackend) {
    if matches!(store, StoreBackend::Local(_)) {
        println!(
            "{}",
            "Note: no server configured, appointments are kept in memory only".dimmed()
        );
    }
}
