//! The YAML config file handed to the MCP server.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub remote: RemoteSection,
    pub openclaw: OpenClawSection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSection {
    pub game_url: String,
    pub auto_start: bool,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSection {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenClawSection {
    pub gateway_url: String,
    pub token: String,
    pub agent_name: String,
}

impl ServerConfig {
    /// Fixed defaults; `auto_start` is the only wizard-controlled field.
    pub fn with_auto_start(auto_start: bool) -> Self {
        Self {
            server: ServerSection {
                game_url: "ws://localhost:8765/game".to_string(),
                auto_start,
                log_level: "info".to_string(),
            },
            remote: RemoteSection {
                host: "0.0.0.0".to_string(),
                port: 8765,
            },
            openclaw: OpenClawSection {
                gateway_url: "ws://127.0.0.1:18789".to_string(),
                token: String::new(),
                agent_name: "stardew-farmer".to_string(),
            },
        }
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "server:")?;
        writeln!(f, "  game_url: {}", quoted(&self.server.game_url))?;
        writeln!(f, "  auto_start: {}", self.server.auto_start)?;
        writeln!(f, "  log_level: {}", quoted(&self.server.log_level))?;
        writeln!(f)?;
        writeln!(f, "remote:")?;
        writeln!(f, "  host: {}", quoted(&self.remote.host))?;
        writeln!(f, "  port: {}", self.remote.port)?;
        writeln!(f)?;
        writeln!(f, "openclaw:")?;
        writeln!(f, "  gateway_url: {}", quoted(&self.openclaw.gateway_url))?;
        writeln!(f, "  token: {}", quoted(&self.openclaw.token))?;
        writeln!(f, "  agent_name: {}", quoted(&self.openclaw.agent_name))
    }
}

/// Render `value` as a YAML double-quoted scalar.
fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
