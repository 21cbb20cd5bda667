use std::process::Command;
use vergen::EmitBuilder;

fn main() {
    // Check if we're in a git repository
    let is_git_available = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    // Generate build-time metadata based on git availability
    let result = if is_git_available {
        EmitBuilder::builder()
            .build_timestamp()
            .git_sha(true) // Short SHA
            .emit()
    } else {
        EmitBuilder::builder().build_timestamp().emit()
    };

    // BuildInfo falls back to "unknown" for anything not emitted
    if let Err(err) = result {
        println!("cargo:warning=Unable to generate build metadata: {err}");
    }
}
