use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_version_command() -> Result<()> {
    let mut cmd = Command::cargo_bin("regsweep")?;
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("regsweep 0.1.0"));
    Ok(())
}

#[test]
fn test_version_subcommand() -> Result<()> {
    let mut cmd = Command::cargo_bin("regsweep")?;
    cmd.arg("version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("regsweep 0.1.0"));
    Ok(())
}

#[test]
fn test_help_command() -> Result<()> {
    let mut cmd = Command::cargo_bin("regsweep")?;
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains(
        "Garbage collector for stale container image tags",
    ));
    Ok(())
}

#[test]
fn test_registry_help() -> Result<()> {
    let mut cmd = Command::cargo_bin("regsweep")?;
    cmd.arg("registry").arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--keep-stable-days"))
        .stdout(predicate::str::contains("--password-stdin"));
    Ok(())
}

#[test]
fn test_registry_requires_filter_prefix() -> Result<()> {
    let mut cmd = Command::cargo_bin("regsweep")?;
    cmd.arg("registry").arg("https://registry.example");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--filter-prefix"));
    Ok(())
}

#[test]
fn test_registry_requires_base_url() -> Result<()> {
    let mut cmd = Command::cargo_bin("regsweep")?;
    cmd.arg("registry").arg("--filter-prefix").arg("myapp");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("base_url").or(predicate::str::contains("BASE_URL")));
    Ok(())
}
