use std::time::Duration;

pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

/// Label for the single data channel the initiator creates.
pub const GAME_CHANNEL_LABEL: &str = "gameData";

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<String>,
    /// Cap on waiting for candidate gathering before a local descriptor is
    /// treated as final. Hitting the cap ships a partial descriptor, which
    /// degrades connectivity rather than breaking it.
    pub settle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![DEFAULT_STUN_SERVER.to_string()],
            settle_timeout: Duration::from_secs(2),
        }
    }
}
