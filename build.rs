use std::process::Command;

fn main() {
    // PROMPTMAXX_HUD_VERSION may be injected by the release pipeline;
    // local builds use the Cargo.toml version.
    let version = std::env::var("PROMPTMAXX_HUD_VERSION")
        .unwrap_or_else(|_| std::env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo:rustc-env=PROMPTMAXX_HUD_VERSION={version}");

    let commit = std::env::var("PROMPTMAXX_HUD_COMMIT").unwrap_or_else(|_| {
        match Command::new("git").args(["rev-parse", "--short", "HEAD"]).output() {
            Ok(o) if o.status.success() => String::from_utf8_lossy(&o.stdout).trim().to_string(),
            _ => "unknown".to_string(),
        }
    });
    println!("cargo:rustc-env=PROMPTMAXX_HUD_COMMIT={commit}");

    println!("cargo:rerun-if-env-changed=PROMPTMAXX_HUD_VERSION");
    println!("cargo:rerun-if-env-changed=PROMPTMAXX_HUD_COMMIT");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
