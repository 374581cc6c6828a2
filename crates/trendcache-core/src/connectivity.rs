//! Network availability checks.
//!
//! The repository asks a [`Connectivity`] oracle once per fetch and picks
//! the online or offline path from the answer. Oracles never fail: when the
//! platform can't tell, the answer is "offline", which is always safe since
//! the offline path only reads the local snapshot.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Public addresses used to ask the OS for a route, tried in order so an
/// IPv6-only host still counts as online. Nothing is sent to them.
const DEFAULT_ROUTE_TARGETS: [&str; 2] = ["1.1.1.1:443", "[2606:4700:4700::1111]:443"];

pub trait Connectivity: Send + Sync {
    /// Whether at least one network transport is currently usable.
    fn is_online(&self) -> bool;
}

impl<T: Connectivity + ?Sized> Connectivity for Arc<T> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}

/// Asks the OS whether there is a route off the machine.
///
/// `connect` on a UDP socket only performs a route lookup, so the check is
/// local and returns immediately. If no interface (wifi, cellular, wired)
/// is up there is no route and the lookup fails.
#[derive(Debug, Clone)]
pub struct RouteConnectivity {
    targets: Vec<SocketAddr>,
}

impl RouteConnectivity {
    pub fn new() -> Self {
        Self {
            targets: DEFAULT_ROUTE_TARGETS
                .iter()
                .filter_map(|addr| addr.parse().ok())
                .collect(),
        }
    }

    pub fn with_target(target: SocketAddr) -> Self {
        Self::with_targets(vec![target])
    }

    pub fn with_targets(targets: Vec<SocketAddr>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &[SocketAddr] {
        &self.targets
    }

    fn has_route(target: SocketAddr) -> std::io::Result<bool> {
        let bind_addr: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(target)?;
        let local = socket.local_addr()?;
        // A route that only leads back to loopback doesn't count.
        Ok(!local.ip().is_unspecified() && !local.ip().is_loopback())
    }
}

impl Default for RouteConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

impl Connectivity for RouteConnectivity {
    fn is_online(&self) -> bool {
        self.targets.iter().any(|&target| match Self::has_route(target) {
            Ok(online) => online,
            Err(e) => {
                debug!(%target, error = %e, "No route available");
                false
            }
        })
    }
}

/// Always gives the same answer. Backs the configured offline mode.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

impl StaticConnectivity {
    pub fn online() -> Self {
        Self(true)
    }

    pub fn offline() -> Self {
        Self(false)
    }
}

impl Connectivity for StaticConnectivity {
    fn is_online(&self) -> bool {
        self.0
    }
}

/// Connectivity that can be flipped at runtime.
#[derive(Debug, Default)]
pub struct ManualConnectivity {
    online: AtomicBool,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for ManualConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
