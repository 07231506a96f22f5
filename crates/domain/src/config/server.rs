use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Destination every accepted client is dispatched to, e.g. `tcp://example.com:80`.
    #[serde(default)]
    pub forward_to: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            forward_to: None,
        }
    }
}

fn default_listen_address() -> String {
    "127.0.0.1:1080".to_string()
}
