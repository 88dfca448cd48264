use codereport::config::Config;
use codereport::core::ReportFormat;
use codereport::errors::Error;
use codereport::model::DisabledModel;
use codereport::report::ReportAssembler;
use std::fs;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Config pointing at a compiler that cannot exist, so every report takes
/// the text fallback path deterministically.
fn fallback_config(output_dir: &Path) -> Config {
    Config {
        output_dir: output_dir.to_path_buf(),
        compiler: "codereport-test-no-such-compiler".to_string(),
        compile_timeout_secs: 5,
        ..Config::default()
    }
}

fn write_zip(path: &Path, members: &[(&str, &str)]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in members {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn single_file_report_falls_back_to_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.py");
    fs::write(&input, "def add(a, b):\n    return a + b\n").unwrap();

    let config = fallback_config(&dir.path().join("reports"));
    let assembler = ReportAssembler::new(&config, &DisabledModel);
    let outcome = assembler.generate(&input, "sample.py").unwrap();

    assert_eq!(outcome.format, ReportFormat::Text);
    assert_eq!(outcome.format.content_type(), "text/plain");
    let content = fs::read_to_string(&outcome.path).unwrap();
    assert!(content.contains("Project Report: sample.py"));
    assert!(content.contains("Analysis of sample.py"));
    assert!(content.contains("add function."));
    assert!(content.contains("Lines of Code: 2"));
    assert!(content.contains("Functions: 1"));
}

#[test]
fn batch_survives_an_unparseable_member() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("project.zip");
    write_zip(
        &archive,
        &[
            ("good_a.py", "def f(a):\n    return a\n"),
            ("good_b.py", "while True:\n    pass\n"),
            ("broken.py", "def broken(:\n"),
        ],
    );

    let config = fallback_config(&dir.path().join("reports"));
    let assembler = ReportAssembler::new(&config, &DisabledModel);
    let outcome = assembler.generate(&archive, "project.zip").unwrap();

    let content = fs::read_to_string(&outcome.path).unwrap();
    // Sections exist for every member, in sorted order.
    assert!(content.contains("Analysis of good_a.py"));
    assert!(content.contains("Analysis of good_b.py"));
    assert!(content.contains("Analysis of broken.py"));
    // The valid members carry real findings.
    assert!(content.contains("Potential infinite loop at line 1"));
    // The broken member degrades in-band instead of aborting the batch.
    assert!(content.contains("Failed to generate docstrings."));
    assert!(content.contains("Error during code review:"));
    assert!(content.contains("Lines of Code: 0"));
}

#[test]
fn failing_compiler_also_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("one.py");
    fs::write(&input, "x = 1\n").unwrap();

    let mut config = fallback_config(&dir.path().join("reports"));
    // `false` exists and exits nonzero: CompilerFailed instead of Missing.
    config.compiler = "false".to_string();
    let assembler = ReportAssembler::new(&config, &DisabledModel);
    let outcome = assembler.generate(&input, "one.py").unwrap();
    assert_eq!(outcome.format, ReportFormat::Text);
}

#[test]
fn unsupported_extension_is_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "hello").unwrap();

    let config = fallback_config(&dir.path().join("reports"));
    let assembler = ReportAssembler::new(&config, &DisabledModel);
    let err = assembler.generate(&input, "notes.txt").unwrap_err();
    assert!(matches!(err, Error::UnsupportedInput));
}

#[test]
fn archive_without_python_files_is_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("empty.zip");
    write_zip(&archive, &[("readme.md", "# nothing here")]);

    let config = fallback_config(&dir.path().join("reports"));
    let assembler = ReportAssembler::new(&config, &DisabledModel);
    let err = assembler.generate(&archive, "empty.zip").unwrap_err();
    assert!(matches!(err, Error::NoSourceFiles));
}

#[test]
fn corrupt_archive_is_terminal_and_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("corrupt.zip");
    fs::write(&archive, b"definitely not a zip").unwrap();

    let config = fallback_config(&dir.path().join("reports"));
    let assembler = ReportAssembler::new(&config, &DisabledModel);
    let err = assembler.generate(&archive, "corrupt.zip").unwrap_err();
    assert!(matches!(err, Error::CorruptArchive(_)));
    assert_ne!(err.to_string(), Error::NoSourceFiles.to_string());
}

#[test]
fn oversized_upload_rejected_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("big.py");
    fs::write(&input, "#".repeat(4096)).unwrap();

    let reports = dir.path().join("reports");
    let mut config = fallback_config(&reports);
    config.max_upload_bytes = 1024;
    let assembler = ReportAssembler::new(&config, &DisabledModel);
    let err = assembler.generate(&input, "big.py").unwrap_err();
    assert!(matches!(err, Error::PayloadTooLarge { .. }));
    // Rejected before the arena was created: no request directory remains.
    assert!(!reports.exists() || fs::read_dir(&reports).unwrap().next().is_none());
}

#[test]
fn concurrent_style_requests_get_distinct_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("again.py");
    fs::write(&input, "def f():\n    pass\n").unwrap();

    let config = fallback_config(&dir.path().join("reports"));
    let assembler = ReportAssembler::new(&config, &DisabledModel);
    let first = assembler.generate(&input, "again.py").unwrap();
    let second = assembler.generate(&input, "again.py").unwrap();
    assert_ne!(first.path, second.path);
    assert!(first.path.exists());
    assert!(second.path.exists());
}
