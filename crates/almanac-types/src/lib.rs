//! Shared type definitions for the Almanac events service.
//!
//! This crate is the single source of truth for the types that cross the
//! HTTP boundary. Types flow downstream to `TypeScript` via `ts-rs` for the
//! frontend that renders the events.
//!
//! # Modules
//!
//! - [`event`] -- Stored historical events and the field projection
//! - [`response`] -- The `GET /events` response body and match kind

pub mod event;
pub mod response;

// Re-export all public types at crate root for convenience.
pub use event::{Event, EventFields};
pub use response::{EventsResponse, YearMatch};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::event::Event::export_all();
        let _ = crate::response::YearMatch::export_all();
        let _ = crate::response::EventsResponse::export_all();
    }
}
