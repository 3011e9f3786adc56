//! Service control infrastructure.
//!
//! The OpenList variant runs its helper as the Windows service
//! `openlist_desktop_service`.  [`system::SystemServiceController`] drives it
//! through the stock `net` and `sc` tools; [`mock`] records commands for
//! tests.

pub mod mock;
pub mod system;
