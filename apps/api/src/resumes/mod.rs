// Resume resource: payload validation, owner-scoped persistence, HTTP handlers.
// Handlers talk to storage only through the `ResumeStore` trait held in `AppState`.

pub mod handlers;
pub mod store;
pub mod validation;
