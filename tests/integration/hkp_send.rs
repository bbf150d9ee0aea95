use crate::common::KEY;
use crate::integration::common::Hkp;

#[test]
fn send_stdin() {
    let hkp = Hkp::new();

    let stdout = hkp.send(&[], KEY);
    assert_eq!(stdout, "200\n");

    let r = hkp.server().last_request();
    assert_eq!(r.path, "/pks/add");
    assert_eq!(r.param("keytext"), Some(KEY));
    assert_eq!(r.param("options"), Some("mr"));
}

#[test]
fn send_file() {
    let hkp = Hkp::new();
    let file = hkp.scratch_file("key.asc");
    std::fs::write(&file, KEY).unwrap();

    let stdout = hkp.send(&["--option", "nm", file.to_str().unwrap()], "");
    assert_eq!(stdout, "200\n");

    let r = hkp.server().last_request();
    assert_eq!(r.param("keytext"), Some(KEY));
    assert_eq!(r.param("options"), Some("mr,nm"));
}

#[test]
fn send_rejected() {
    let hkp = Hkp::new();

    let stderr = hkp.send_maybe(&[], "not a key").unwrap_err();
    assert!(stderr.contains("HTTP status 400"), "{}", stderr);
}

#[test]
fn send_nothing() {
    let hkp = Hkp::new();

    let stderr = hkp.send_maybe(&[], "\n").unwrap_err();
    assert!(stderr.contains("No key(s) given"), "{}", stderr);
    assert!(hkp.server().requests().is_empty());
}

#[test]
fn send_missing_file() {
    let hkp = Hkp::new();
    let file = hkp.scratch_file("missing.asc");

    let stderr = hkp.send_maybe(&[file.to_str().unwrap()], "").unwrap_err();
    assert!(stderr.contains("Failed to open"), "{}", stderr);
}
