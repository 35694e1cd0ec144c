//! Centralized configuration constants for the router actors
//!
//! All timeout, retry, and threshold values are defined here with the
//! rationale for each value.

/// TCP session parameters
pub mod socket {
    /// Default Videohub control port
    ///
    /// **Value**: 9990
    ///
    /// **Rationale**: Every Videohub model listens for its text control
    /// protocol on TCP 9990. Configurable per connection for routers
    /// behind port forwards.
    pub const DEFAULT_PORT: u16 = 9990;

    /// Keep-alive interval (seconds)
    ///
    /// **Value**: 15s
    ///
    /// **Rationale**: The device drops idle control sessions after about
    /// a minute. A PING every 15s keeps the session alive with wide
    /// margin while staying negligible on the wire (6 bytes). The device
    /// answers with a bare `ACK`.
    pub const PING_INTERVAL_SECS: u64 = 15;

    /// Timeout for the initial TCP connect (milliseconds)
    ///
    /// **Value**: 5000ms
    ///
    /// **Rationale**: Standard UX timeout for connection operations on a
    /// LAN; an unreachable router should fail fast enough for the
    /// reconnect schedule to take over.
    pub const CONNECT_TIMEOUT_MS: u64 = 5000;

    /// Read buffer size for the socket read loop (bytes)
    ///
    /// **Value**: 4096
    ///
    /// **Rationale**: The largest routine burst is the startup dump of a
    /// 288-port router (tens of KiB); 4 KiB reads keep that to a handful
    /// of syscalls without oversizing the steady state, which is a few
    /// dozen bytes per confirmation.
    pub const READ_BUFFER_SIZE: usize = 4096;
}

/// Reconnection scheduling
pub mod reconnect {
    /// Ceiling on the exponential backoff delay (milliseconds)
    ///
    /// **Value**: 30000ms (30 seconds)
    ///
    /// **Rationale**: After roughly nine failed attempts the schedule
    /// holds at 30s. A router that is down for maintenance should not be
    /// hammered, but an operator plugging it back in should not wait
    /// minutes for the adapter to notice.
    pub const MAX_RETRY_DELAY_MS: u64 = 30_000;
}
