//! Application layer use cases for the launcher.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules in `potlink-core`) and the infrastructure (processes,
//! services, files, windows).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "play media
//!   with the helper running, then clean up").
//! - **Depend on abstractions** (the traits in [`ports`]) rather than concrete
//!   implementations, so the infrastructure can be swapped in tests.
//! - **Contain no OS calls, no file system access, no UI code**.
//!
//! # Sub-modules
//!
//! - **`ports`** – The traits and error types the infrastructure implements.
//!
//! - **`elevate`** – Relaunches as administrator when the selected variant
//!   controls a Windows service.
//!
//! - **`configure`** – Loads the config, decides whether the setup dialog is
//!   needed, and persists what the user confirmed.
//!
//! - **`launch_session`** – Starts the helper and the player, waits for the
//!   player, and guarantees cleanup on every exit path.

pub mod configure;
pub mod elevate;
pub mod launch_session;
pub mod ports;
