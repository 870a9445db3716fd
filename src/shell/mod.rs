// Composition root for the event_log bounded context.
//
// Responsibilities:
// - Read config from environment.
// - Instantiate the configured object store.
// - Wire the store and routing strategy into the append handler.
// - Expose the HTTP router to the binary.

pub mod config;
pub mod http;
pub mod state;
