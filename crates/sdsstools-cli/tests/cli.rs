use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DEFAULTS: &str = "
cat1:
  key1: value
  key2: 1
cat2:
  key3: ${CLITEST_VARIABLE:-fallback}
";

fn sdss(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sdss").unwrap();
    cmd.env("HOME", home)
        .env_remove("RUST_LOG")
        .env_remove("CLITEST_CONFIG_PATH")
        .env_remove("CLITEST_VARIABLE")
        .env_remove("OBSERVATORY");
    cmd
}

fn write_defaults(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("clitest.yml");
    fs::write(&path, DEFAULTS).unwrap();
    path
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    sdss(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sdsstools"));
}

#[test]
fn test_version_verbose() {
    let home = TempDir::new().unwrap();
    sdss(home.path())
        .args(["version", "--verbose"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("sdsstools-core")
                .and(predicate::str::contains("sdsstools-types"))
                .and(predicate::str::contains("Architecture"))
                .and(predicate::str::contains(std::env::consts::ARCH)),
        );
}

#[test]
fn test_config_key() {
    let dir = TempDir::new().unwrap();
    let defaults = write_defaults(&dir);

    sdss(dir.path())
        .args(["config", "clitest", "cat1.key1", "--file"])
        .arg(&defaults)
        .assert()
        .success()
        .stdout("value\n");

    sdss(dir.path())
        .args(["config", "clitest", "cat2.key3", "--file"])
        .arg(&defaults)
        .env("CLITEST_VARIABLE", "from_env")
        .assert()
        .success()
        .stdout("from_env\n");
}

#[test]
fn test_config_user_override() {
    let dir = TempDir::new().unwrap();
    let defaults = write_defaults(&dir);

    let user_dir = dir.path().join(".config/sdss");
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(user_dir.join("clitest.yaml"), "cat1:\n  key1: user_value\n").unwrap();

    sdss(dir.path())
        .args(["config", "clitest", "cat1.key1", "--file"])
        .arg(&defaults)
        .assert()
        .success()
        .stdout("user_value\n");

    sdss(dir.path())
        .args(["config", "clitest", "cat1.key1", "--no-user", "--file"])
        .arg(&defaults)
        .assert()
        .success()
        .stdout("value\n");

    let env_file = dir.path().join("env.yml");
    fs::write(&env_file, "cat1:\n  key1: env_value\n").unwrap();

    sdss(dir.path())
        .args(["config", "clitest", "cat1", "--file"])
        .arg(&defaults)
        .env("CLITEST_CONFIG_PATH", &env_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("key1: env_value").and(predicate::str::contains("key2: 1")));
}

#[test]
fn test_config_json_and_replace() {
    let dir = TempDir::new().unwrap();
    let defaults = write_defaults(&dir);
    let user = dir.path().join("user.yml");
    fs::write(&user, "cat1:\n  key1: replaced\n").unwrap();

    sdss(dir.path())
        .args(["config", "clitest", "--json", "--replace", "--file"])
        .arg(&defaults)
        .arg("--user-path")
        .arg(&user)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key1\": \"replaced\"").and(predicate::str::contains("cat2").not()));
}

#[test]
fn test_config_strict_missing_key() {
    let dir = TempDir::new().unwrap();
    let defaults = write_defaults(&dir);

    sdss(dir.path())
        .args(["config", "clitest", "cat1.missing", "--file"])
        .arg(&defaults)
        .assert()
        .success()
        .stdout("null\n");

    sdss(dir.path())
        .args(["config", "clitest", "cat1.missing", "--strict", "--file"])
        .arg(&defaults)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Key not found: cat1.missing"));
}

#[test]
fn test_config_missing_user_path() {
    let dir = TempDir::new().unwrap();

    sdss(dir.path())
        .args(["config", "clitest", "--user-path", "/does/not/exist.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_sjd() {
    let home = TempDir::new().unwrap();

    sdss(home.path())
        .args(["sjd", "--observatory", "APO", "--date", "2022-04-25T11:27:51"])
        .assert()
        .success()
        .stdout("59694\n");

    sdss(home.path())
        .args(["sjd", "--date", "2022-04-25T11:27:51"])
        .env("OBSERVATORY", "lco")
        .assert()
        .success()
        .stdout("59694\n");

    sdss(home.path())
        .args(["sjd", "--observatory", "KPNO"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid observatory"));
}
