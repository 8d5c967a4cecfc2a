//! Integration tests for the flashpolicy binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn flashpolicy() -> Command {
    let mut cmd = Command::cargo_bin("flashpolicy").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_render_simple_policy() {
    flashpolicy()
        .args(["render", "--domain", "media.example.com", "--to-ports", "80,443"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml version=\"1.0\"?>"))
        .stdout(predicate::str::contains(
            r#"<allow-access-from domain="media.example.com" to-ports="80,443"/>"#,
        ));
}

#[test]
fn test_render_no_access() {
    flashpolicy()
        .args(["render", "--no-access"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<site-control permitted-cross-domain-policies="none"/>"#,
        ));
}

#[test]
fn test_render_invalid_site_control() {
    flashpolicy()
        .args(["render", "--site-control", "everything"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a valid site-control value"));
}

#[test]
fn test_check_valid_policy() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"<?xml version="1.0"?>
<!DOCTYPE cross-domain-policy SYSTEM "http://www.adobe.com/xml/dtds/cross-domain-policy.dtd">
<cross-domain-policy>
  <site-control permitted-cross-domain-policies="master-only"/>
  <allow-access-from domain="*.example.com"/>
</cross-domain-policy>"#,
    )
    .unwrap();

    flashpolicy()
        .arg("check")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 elements"))
        .stdout(predicate::str::contains("allow-access-from domain=*.example.com"));
}

#[test]
fn test_check_invalid_policy() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"<policy-file-request/>").unwrap();

    flashpolicy()
        .arg("check")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_config_lists_routes() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(
        br#"
[server]
port = 9843

[[policies]]
path = "/crossdomain.xml"
view = "simple"
domains = ["a.example.com", "b.example.com"]
"#,
    )
    .unwrap();

    flashpolicy()
        .arg("config")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0.0:9843"))
        .stdout(predicate::str::contains("/crossdomain.xml -> simple (2 elements)"));
}

#[test]
fn test_unknown_command() {
    flashpolicy().arg("publish").assert().failure();
}
