//! systemd unit generation: pure functions, no I/O, no async.
//!
//! The caller is responsible for writing the returned text to disk.

#![allow(clippy::format_push_string)]

use crate::domain::app_config::ApplicationConfig;

/// User and group the generated service runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccount {
    pub user: String,
    pub group: String,
}

impl ServiceAccount {
    /// Account whose group has the same name as the user.
    #[must_use]
    pub fn same_group(user: &str) -> Self {
        Self {
            user: user.to_string(),
            group: user.to_string(),
        }
    }
}

/// File name of the unit generated for `config`.
#[must_use]
pub fn unit_file_name(config: &ApplicationConfig) -> String {
    format!("{}.service", config.name)
}

/// `ExecStart` command line: binary path, then the arguments separated by spaces.
#[must_use]
pub fn exec_start(config: &ApplicationConfig) -> String {
    let binary = config.binary_path().display().to_string();
    if config.args.is_empty() {
        binary
    } else {
        format!("{binary} {}", config.args.join(" "))
    }
}

/// Render the `.service` unit for `config`.
///
/// The output depends only on its inputs, so re-rendering the same config
/// yields the same bytes.
#[must_use]
pub fn render(config: &ApplicationConfig, account: &ServiceAccount) -> String {
    let install_dir = config.install_dir.display();

    let mut out = String::new();
    out.push_str("[Unit]\n");
    out.push_str(&format!("Description={}\n", config.name));
    out.push_str("Wants=network-online.target\n");
    out.push_str("After=network-online.target\n");
    out.push('\n');
    out.push_str("[Service]\n");
    out.push_str("Type=simple\n");
    out.push_str(&format!("ExecStart={}\n", exec_start(config)));
    out.push_str("Restart=always\n");
    out.push_str(&format!("User={}\n", account.user));
    out.push_str(&format!("Group={}\n", account.group));
    out.push_str(&format!("WorkingDirectory={install_dir}\n"));
    out.push('\n');
    out.push_str("[Install]\n");
    out.push_str("WantedBy=multi-user.target\n");
    out
}
