//! Version command

/// Run the version command.
pub fn run() {
    println!("steamgr {}", env!("CARGO_PKG_VERSION"));
}
