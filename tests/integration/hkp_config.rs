use predicates::prelude::*;

use crate::common::ID;
use crate::integration::common::Hkp;

#[test]
fn template() {
    let hkp = Hkp::new();

    hkp.command_args(["config", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "#keyserver = \"hkps://keys.openpgp.org\""))
        .stdout(predicate::str::contains("#format = \"human-readable\""));

    // The template can be used as configuration file.
    let file = hkp.scratch_file("config.toml");
    let file_arg = file.to_str().unwrap();
    hkp.run(hkp.command_args(["config", "template", "--output", file_arg]),
            true);
    hkp.command_args(["--config", file_arg, "config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "network.keyserver = \"hkps://keys.openpgp.org\""));

    // Not overwritten without --force.
    hkp.run(hkp.command_args(["config", "template", "--output", file_arg]),
            false);
    hkp.run(hkp.command_args(["config", "template", "--output", file_arg,
                              "--force"]),
            true);
}

#[test]
fn get() {
    let hkp = Hkp::new();

    let output = hkp.run(hkp.command_args(["config", "get"]), true);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("network.keyserver = \"{}\"",
                                     hkp.server().url())),
            "{}", stdout);
    assert!(stdout.contains("network.options = []"), "{}", stdout);
    assert!(stdout.contains("output.format = \"human-readable\""),
            "{}", stdout);

    // The command line takes precedence.
    hkp.command_args(["--server", "hkps://keys.example.org",
                      "--option", "nm",
                      "--output-format", "json",
                      "config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "network.keyserver = \"hkps://keys.example.org\""))
        .stdout(predicate::str::contains("network.port = 443"))
        .stdout(predicate::str::contains("network.options = [\"nm\"]"))
        .stdout(predicate::str::contains("output.format = \"json\""));
}

#[test]
fn configured_options() {
    let hkp = Hkp::with_config("options = [\"nm\", \"x-foo\"]\n");

    hkp.get(&[], ID);
    let r = hkp.server().last_request();
    assert_eq!(r.param("options"), Some("mr,nm,x-foo"));

    // Options given on the command line replace them.
    hkp.get(&["--option", "x-bar"], ID);
    let r = hkp.server().last_request();
    assert_eq!(r.param("options"), Some("mr,x-bar"));
}

#[test]
fn configured_output_format() {
    let hkp = Hkp::with_config("\n[output]\nformat = \"json\"\n");

    let stdout = hkp.search(&[], "testy");
    let keys: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(keys.as_array().unwrap().len(), 2);

    let stdout = hkp.search(&["--output-format", "human-readable"], "testy");
    assert!(stdout.ends_with("Found 2\u{a0}keys.\n"), "{}", stdout);
}

#[test]
fn configured_port() {
    let hkp = Hkp::with_config("port = 1\n");

    // Port 1 is not our keyserver.
    assert!(hkp.get_maybe(&[], ID).is_err());
    assert!(hkp.server().requests().is_empty());

    // A port in a keyserver URL given on the command line wins.
    let url = hkp.server().url();
    hkp.get(&["--server", url.as_str()], ID);
    assert_eq!(hkp.server().requests().len(), 1);

    hkp.command_args(["--server", url.as_str(), "config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            format!("network.port = {}", url.rsplit(':').next().unwrap())));
}

#[test]
fn invalid_configuration() {
    let hkp = Hkp::with_config("keyservers = []\n");

    hkp.command_args(["config", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown keys: keyservers"));

    let hkp = Hkp::with_config("port = \"11371\"\n");
    hkp.command_args(["config", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a integer but a string"));
}

#[test]
fn missing_configuration() {
    let hkp = Hkp::new();
    let file = hkp.scratch_file("nonexistent.toml");

    hkp.command_args(["--config", file.to_str().unwrap(), "config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "network.keyserver = \"hkps://keys.openpgp.org\""))
        .stdout(predicate::str::contains("network.port = 443"));
}
