//! Concrete program/argument shapes for the host platform.
//!
//! The executor builds invocations through this seam so tests and
//! non-Windows hosts can script the invoker without caring about the exact
//! argument vectors.

/// One concrete command line, ready for the invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The program to invoke.
    pub program: String,
    /// Its arguments.
    pub args: Vec<String>,
}

impl CommandLine {
    fn new(program: &str, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program: program.to_string(),
            args: args.into_iter().collect(),
        }
    }
}

/// Builds the platform command lines for each task kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformCommands;

impl PlatformCommands {
    /// Probe whether a registry path exists.
    #[must_use]
    pub fn registry_query(&self, path: &str) -> CommandLine {
        CommandLine::new("reg", ["query".to_string(), path.to_string()])
    }

    /// Create a registry path.
    #[must_use]
    pub fn registry_create(&self, path: &str) -> CommandLine {
        CommandLine::new("reg", ["add".to_string(), path.to_string(), "/f".to_string()])
    }

    /// Set a registry value with its declared type.
    #[must_use]
    pub fn registry_set(
        &self,
        path: &str,
        value_name: &str,
        value_type: &str,
        value_data: &str,
    ) -> CommandLine {
        CommandLine::new(
            "reg",
            [
                "add".to_string(),
                path.to_string(),
                "/v".to_string(),
                value_name.to_string(),
                "/t".to_string(),
                value_type.to_string(),
                "/d".to_string(),
                value_data.to_string(),
                "/f".to_string(),
            ],
        )
    }

    /// Install one package by identifier.
    #[must_use]
    pub fn package_install(&self, id: &str) -> CommandLine {
        CommandLine::new(
            "winget",
            [
                "install".to_string(),
                "--id".to_string(),
                id.to_string(),
                "--accept-source-agreements".to_string(),
                "--accept-package-agreements".to_string(),
                "--silent".to_string(),
            ],
        )
    }

    /// Uninstall one package by identifier.
    #[must_use]
    pub fn package_uninstall(&self, id: &str) -> CommandLine {
        CommandLine::new(
            "winget",
            [
                "uninstall".to_string(),
                "--id".to_string(),
                id.to_string(),
                "--accept-source-agreements".to_string(),
                "--accept-package-agreements".to_string(),
            ],
        )
    }

    /// Remove an app package by wildcard name match.
    #[must_use]
    pub fn appx_uninstall(&self, name: &str) -> CommandLine {
        CommandLine::new(
            "powershell",
            [
                "-Command".to_string(),
                format!("Get-AppxPackage *{name}* | Remove-AppxPackage"),
            ],
        )
    }

    /// Install one language-runtime dependency.
    #[must_use]
    pub fn python_install(&self, requirement: &str) -> CommandLine {
        CommandLine::new(
            "pip",
            ["install".to_string(), requirement.to_string()],
        )
    }

    /// Run a pre-formatted command string through the platform shell.
    #[must_use]
    pub fn shell(&self, command: &str) -> CommandLine {
        if cfg!(windows) {
            CommandLine::new("cmd", ["/C".to_string(), command.to_string()])
        } else {
            CommandLine::new("sh", ["-c".to_string(), command.to_string()])
        }
    }

    /// Refresh group policy after a policy-flavored stage.
    #[must_use]
    pub fn policy_refresh(&self) -> CommandLine {
        CommandLine::new("gpupdate", ["/force".to_string()])
    }
}
