use thiserror::Error;

/// Failures of individual install steps. The `Display` text is exactly what
/// the install screen shows as the fatal error.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("ToolchainMissing: {name}")]
    ToolchainMissing { name: String },

    #[error("BuildFailed: {component}: {cause}")]
    BuildFailed { component: Component, cause: String },

    #[error("InstallFailed: {cause}")]
    InstallFailed { cause: String },

    #[error("ConfigWriteFailed: {cause}")]
    ConfigWriteFailed { cause: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Server,
    Plugin,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::Server => write!(f, "server"),
            Component::Plugin => write!(f, "plugin"),
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure_kind() {
        let missing = InstallError::ToolchainMissing {
            name: "go".to_string(),
        };
        assert_eq!(missing.to_string(), "ToolchainMissing: go");

        let build = InstallError::BuildFailed {
            component: Component::Plugin,
            cause: "dotnet: nonzero exit (code 1)".to_string(),
        };
        assert_eq!(
            build.to_string(),
            "BuildFailed: plugin: dotnet: nonzero exit (code 1)"
        );
    }
}
