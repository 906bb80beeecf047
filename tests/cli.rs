use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ado-wiki"))
}

fn write_files(root: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}

/// A docs tree with one of everything the converter rewrites.
fn scaffold_docs() -> Result<TempDir, Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    write_files(
        &temp.path().join("docs"),
        &[
            ("README.md", "# Fabrikam Tools\n\nBuild tooling for Fabrikam.\n"),
            ("index.md", "---\nlayout: home\n---\n"),
            (
                "guide/overview.md",
                "---\ntitle: Overview\n---\n# Overview\n\n```mermaid\nflowchart LR\n  A ----> B\n```\n",
            ),
            (
                "guide/setup.md",
                "# Setup\n\n::: warning\nNeeds admin rights.\n:::\n\nSee [the script](../../scripts/setup.sh).\n",
            ),
            ("images/flow.png", "not really a png"),
        ],
    )?;
    Ok(temp)
}

fn convert(temp: &TempDir) -> Command {
    let mut cmd = cli();
    cmd.arg("--source")
        .arg(temp.path().join("docs"))
        .arg("--output")
        .arg(temp.path().join("wiki"))
        .arg("convert");
    cmd
}

#[test]
fn convert_writes_wiki_and_prints_summary() -> TestResult {
    let temp = scaffold_docs()?;

    convert(&temp)
        .assert()
        .success()
        .stdout(contains("5 files: 4 pages, 1 asset"))
        .stdout(contains(
            "Rewrites: 2 front matter, 1 diagrams, 1 links, 1 admonitions",
        ))
        .stdout(contains("index.md synthesized (trivial)"));

    let wiki = temp.path().join("wiki");
    assert_eq!(
        fs::read_to_string(wiki.join("guide/overview.md"))?,
        "# Overview\n\n::: mermaid\ngraph LR\n  A --> B\n:::\n"
    );
    assert_eq!(
        fs::read_to_string(wiki.join("guide/setup.md"))?,
        "# Setup\n\n> [!WARNING]\n> Needs admin rights.\n\nSee the script.\n"
    );
    assert_eq!(fs::read_to_string(wiki.join("images/flow.png"))?, "not really a png");
    assert!(fs::read_to_string(wiki.join("index.md"))?.starts_with("# Fabrikam Tools\n"));
    assert_eq!(fs::read_to_string(wiki.join("guide/.order"))?, "overview\nsetup\n");
    assert_eq!(fs::read_to_string(wiki.join(".order"))?, "index\nREADME\n");
    Ok(())
}

#[test]
fn logs_go_to_stderr_not_stdout() -> TestResult {
    let temp = scaffold_docs()?;

    convert(&temp)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(contains("DEBUG").not())
        .stderr(contains("DEBUG"));
    Ok(())
}

#[test]
fn report_flag_writes_json() -> TestResult {
    let temp = scaffold_docs()?;
    let report_path = temp.path().join("report.json");

    convert(&temp).arg("--report").arg(&report_path).assert().success();

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path)?)?;
    assert_eq!(report["pages_converted"], 4);
    assert_eq!(report["stats"]["diagrams_converted"], 1);
    assert_eq!(report["landing"]["decision"], "synthesized");
    assert_eq!(report["landing"]["reason"]["kind"], "trivial");
    Ok(())
}

#[test]
fn no_admonitions_flag_keeps_containers() -> TestResult {
    let temp = scaffold_docs()?;

    convert(&temp).arg("--no-admonitions").assert().success();

    let setup = fs::read_to_string(temp.path().join("wiki/guide/setup.md"))?;
    assert!(setup.contains("::: warning\nNeeds admin rights.\n:::\n"));
    Ok(())
}

#[test]
fn per_file_failure_exits_one_and_still_summarizes() -> TestResult {
    let temp = scaffold_docs()?;
    fs::write(temp.path().join("docs/guide/broken.md"), [0xff, 0xfe, 0x41])?;

    convert(&temp)
        .assert()
        .code(1)
        .stdout(contains("Failures (1)"))
        .stdout(contains("guide/broken.md"));

    assert!(temp.path().join("wiki/guide/setup.md").exists());
    Ok(())
}

#[test]
fn unbalanced_diagram_is_a_warning_not_a_failure() -> TestResult {
    let temp = scaffold_docs()?;
    write_files(
        &temp.path().join("docs"),
        &[("guide/draft.md", "```mermaid\ngraph TD\n")],
    )?;

    convert(&temp)
        .assert()
        .success()
        .stdout(contains("Warnings"))
        .stdout(contains("mermaid block never closed, left unchanged"));
    Ok(())
}

#[test]
fn missing_source_is_fatal() -> TestResult {
    let temp = TempDir::new()?;

    cli()
        .arg("--source")
        .arg(temp.path().join("nope"))
        .arg("--output")
        .arg(temp.path().join("wiki"))
        .arg("convert")
        .assert()
        .code(2)
        .stderr(contains("Cannot read source root"));

    assert!(!temp.path().join("wiki").exists());
    Ok(())
}

#[test]
fn invalid_config_is_fatal() -> TestResult {
    let temp = scaffold_docs()?;
    fs::write(
        temp.path().join("docs/ado-wiki.toml"),
        "[landing]\npage = \"nested/home.md\"\n",
    )?;

    convert(&temp)
        .assert()
        .code(2)
        .stderr(contains("landing.page"));
    Ok(())
}

#[test]
fn unknown_config_key_is_fatal() -> TestResult {
    let temp = scaffold_docs()?;
    fs::write(temp.path().join("docs/ado-wiki.toml"), "[passes]\nmermaid = false\n")?;

    convert(&temp).assert().code(2).stderr(contains("mermaid"));
    Ok(())
}

#[test]
fn output_containing_source_is_refused() -> TestResult {
    let temp = scaffold_docs()?;

    cli()
        .arg("--source")
        .arg(temp.path().join("docs"))
        .arg("--output")
        .arg(temp.path())
        .arg("convert")
        .assert()
        .code(2)
        .stderr(contains("must not contain the source root"));

    assert!(temp.path().join("docs/index.md").exists());
    Ok(())
}

#[test]
fn foreign_output_directory_is_refused() -> TestResult {
    let temp = scaffold_docs()?;
    write_files(&temp.path().join("wiki"), &[("notes.txt", "keep me")])?;

    convert(&temp).assert().code(2).stderr(contains("refusing to replace it"));

    assert_eq!(fs::read_to_string(temp.path().join("wiki/notes.txt"))?, "keep me");
    Ok(())
}

#[test]
fn rerun_replaces_previous_wiki() -> TestResult {
    let temp = scaffold_docs()?;
    convert(&temp).assert().success();
    fs::remove_file(temp.path().join("docs/guide/setup.md"))?;

    convert(&temp).assert().success();

    assert!(!temp.path().join("wiki/guide/setup.md").exists());
    assert_eq!(fs::read_to_string(temp.path().join("wiki/guide/.order"))?, "overview\n");
    Ok(())
}

#[test]
fn check_reports_without_writing() -> TestResult {
    let temp = scaffold_docs()?;

    cli()
        .arg("--source")
        .arg(temp.path().join("docs"))
        .arg("--output")
        .arg(temp.path().join("wiki"))
        .arg("check")
        .assert()
        .success()
        .stdout(contains("(dry run)"))
        .stdout(contains("1 diagrams"));

    assert!(!temp.path().join("wiki").exists());
    Ok(())
}

#[test]
fn gen_config_prints_loadable_defaults() -> TestResult {
    let output = cli().arg("gen-config").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output)?;

    assert!(text.contains("[landing]"));
    assert!(text.contains("pinned = ["));
    let parsed: toml::Value = toml::from_str(&text)?;
    assert!(parsed.get("order").is_some());
    Ok(())
}
