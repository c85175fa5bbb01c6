use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    println!("cargo:rustc-env=RENTBOOK_COMMIT={}", commit_label());
    println!(
        "cargo:rustc-env=RENTBOOK_BUILT_ON={}",
        chrono::Utc::now().format("%Y-%m-%d")
    );
    println!(
        "cargo:rustc-env=RENTBOOK_PROFILE={}",
        env::var("PROFILE").unwrap_or_else(|_| "unknown".into())
    );
}

/// Short commit id, suffixed with `+` when the working tree has local edits.
fn commit_label() -> String {
    let Some(hash) = git(&["rev-parse", "--short", "HEAD"]).filter(|hash| !hash.is_empty()) else {
        return "unknown".into();
    };
    match git(&["status", "--porcelain"]) {
        Some(changes) if !changes.is_empty() => format!("{hash}+"),
        _ => hash,
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
