use std::process::Command;
use vergen::EmitBuilder;

fn main() {
    let in_git_checkout = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    let mut builder = EmitBuilder::builder();
    builder.build_timestamp();
    if in_git_checkout {
        builder.git_sha(true);
    }

    // Missing metadata falls back to "unknown" at compile time
    if let Err(e) = builder.emit() {
        println!("cargo:warning=unable to emit build metadata: {e}");
    }
}
