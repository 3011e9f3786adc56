//! Process infrastructure: spawning, waiting, and image-name kills.
//!
//! - **`command`** – builds console commands with the console window hidden.
//! - **`system`** – the real `tokio::process` launcher and the `taskkill`
//!   terminator.
//! - **`mock`** – recording doubles for tests.

pub mod command;
pub mod mock;
pub mod system;
