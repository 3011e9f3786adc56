//! Helper readiness probes.
//!
//! AlistHelper serves the Alist web UI on `127.0.0.1:5244` once it is up.
//! [`TcpPortProbe`] treats "a TCP connect succeeds" as ready.  Each attempt
//! is capped at [`CONNECT_TIMEOUT`] so a filtered port cannot stall the
//! polling loop past its deadline.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

use crate::application::ports::PortProbe;

/// Upper bound on a single connect attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(200);

/// [`PortProbe`] that attempts a loopback TCP connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpPortProbe;

impl TcpPortProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PortProbe for TcpPortProbe {
    async fn is_listening(&self, port: u16) -> bool {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                debug!("port {port} not ready: {e}");
                false
            }
            Err(_) => {
                debug!("port {port} connect timed out");
                false
            }
        }
    }
}

pub mod mock {
    //! Scripted probe for tests.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::application::ports::PortProbe;

    /// Reports "not listening" for the first `failures` calls, then
    /// "listening" forever (or never, for [`ScriptedPortProbe::never_ready`]).
    #[derive(Debug)]
    pub struct ScriptedPortProbe {
        failures: Option<usize>,
        calls: AtomicUsize,
    }

    impl ScriptedPortProbe {
        pub fn ready_after(failures: usize) -> Self {
            Self {
                failures: Some(failures),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn never_ready() -> Self {
            Self {
                failures: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PortProbe for ScriptedPortProbe {
        async fn is_listening(&self, _port: u16) -> bool {
            let previous = self.calls.fetch_add(1, Ordering::SeqCst);
            matches!(self.failures, Some(failures) if previous >= failures)
        }
    }
}
