//! External LaTeX compiler invocation.
//!
//! The compiler is the only external process the pipeline blocks on, so the
//! invocation is bounded by an explicit wall-clock timeout. The outcome is a
//! status value, not an exception: the assembler branches to the fallback
//! renderer on anything other than `Compiled`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

const ARTIFACT_NAME: &str = "project_report.pdf";

/// Auxiliary byproducts removed best-effort after a successful compile.
const AUX_EXTENSIONS: [&str; 5] = ["aux", "log", "fls", "fdb_latexmk", "toc"];

#[derive(Debug)]
pub enum RenderStatus {
    Compiled(PathBuf),
    CompilerMissing,
    CompilerFailed(String),
    TimedOut,
}

/// Run `compiler` over `tex_path`, producing the PDF artifact in `out_dir`.
pub fn compile(compiler: &str, tex_path: &Path, out_dir: &Path, timeout: Duration) -> RenderStatus {
    let binary = match which::which(compiler) {
        Ok(path) => path,
        Err(_) => {
            log::warn!("Compiler '{compiler}' not found on PATH");
            return RenderStatus::CompilerMissing;
        }
    };

    let stderr_path = out_dir.join("compile_stderr.log");
    let stderr_file = match fs::File::create(&stderr_path) {
        Ok(file) => file,
        Err(e) => return RenderStatus::CompilerFailed(format!("cannot capture stderr: {e}")),
    };

    let mut child = match Command::new(&binary)
        .arg("-pdf")
        .arg(format!("-outdir={}", out_dir.display()))
        .arg(tex_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(stderr_file)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return RenderStatus::CompilerFailed(format!("failed to spawn compiler: {e}")),
    };

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    log::error!("Compiler timed out after {}s, killing it", timeout.as_secs());
                    let _ = child.kill();
                    let _ = child.wait();
                    return RenderStatus::TimedOut;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                return RenderStatus::CompilerFailed(format!("failed to wait on compiler: {e}"));
            }
        }
    };

    if !status.success() {
        let detail = fs::read_to_string(&stderr_path).unwrap_or_default();
        let tail: String = detail.lines().rev().take(10).collect::<Vec<_>>().join("; ");
        return RenderStatus::CompilerFailed(format!("exit status {status}: {tail}"));
    }

    let artifact = out_dir.join(ARTIFACT_NAME);
    if artifact.exists() {
        cleanup_aux_files(tex_path);
        let _ = fs::remove_file(&stderr_path);
        RenderStatus::Compiled(artifact)
    } else {
        RenderStatus::CompilerFailed("compiler exited cleanly but produced no PDF".to_string())
    }
}

fn cleanup_aux_files(tex_path: &Path) {
    for ext in AUX_EXTENSIONS {
        let aux = tex_path.with_extension(ext);
        if aux.exists() {
            if let Err(e) = fs::remove_file(&aux) {
                log::warn!("Could not remove {}: {}", aux.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_compiler_reported_as_status() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("report.tex");
        fs::write(&tex, "\\documentclass{article}\n").unwrap();
        let status = compile(
            "definitely-not-a-real-compiler",
            &tex,
            dir.path(),
            Duration::from_secs(5),
        );
        assert!(matches!(status, RenderStatus::CompilerMissing));
    }

    #[test]
    fn failing_compiler_reported_as_status() {
        // `false` exists everywhere and exits nonzero immediately.
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("report.tex");
        fs::write(&tex, "x").unwrap();
        let status = compile("false", &tex, dir.path(), Duration::from_secs(5));
        assert!(matches!(status, RenderStatus::CompilerFailed(_)));
    }

    #[test]
    fn hung_compiler_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("report.tex");
        fs::write(&tex, "x").unwrap();
        // A compiler that sleeps far past the timeout, ignoring its arguments.
        // (GNU `yes` rejects `-pdf` as an invalid option, so it cannot stand
        // in for a hung process here.)
        let fake = dir.path().join("hung-compiler.sh");
        fs::write(&fake, "#!/bin/sh\nsleep 60\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();
        }
        let status = compile(
            fake.to_str().unwrap(),
            &tex,
            dir.path(),
            Duration::from_millis(300),
        );
        assert!(matches!(status, RenderStatus::TimedOut));
    }
}
