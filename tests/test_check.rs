use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::predicate;

const INSTANCE: &str = r#"forall(x1, x2)
depend(y, x1)
g = or(y, x1)
output(g)
"#;

#[test]
fn test_check_valid_instance() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("test_instance.dqcir")?;
    file.write_str(INSTANCE)?;
    let mut cmd = Command::cargo_bin("skolibri")?;
    cmd.arg("check").arg("-f").arg(file.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("y depends on [x1]"))
        .stdout(predicate::str::contains("the output gate is g"));
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_check_invalid_instance() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("test_instance.dqcir")?;
    file.write_str("forall(x)\ndepend(y, z)\noutput(y)\n")?;
    let mut cmd = Command::cargo_bin("skolibri")?;
    cmd.arg("check")
        .arg("-f")
        .arg(file.path())
        .arg("--logging-level")
        .arg("off");
    cmd.assert().code(1);
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_check_missing_output_gate() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("test_instance.dqcir")?;
    file.write_str("forall(x)\nexists(y)\n")?;
    let mut cmd = Command::cargo_bin("skolibri")?;
    cmd.arg("check")
        .arg("-f")
        .arg(file.path())
        .arg("--logging-level")
        .arg("off");
    cmd.assert().code(1);
    file.close().unwrap();
    Ok(())
}
