use super::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

const REQUIRED: [(&str, &str); 3] = [
    ("EMAILJS_PUBLIC_KEY", "pk_test"),
    ("EMAILJS_SERVICE_ID", "service_mapia"),
    ("EMAILJS_TEMPLATE_ID", "template_request"),
];

#[test]
fn required_only_uses_defaults() {
    let cfg = MapiaConfig::from_lookup(lookup(&REQUIRED)).unwrap();

    assert_eq!(cfg.emailjs.base_url, emailjs::DEFAULT_BASE_URL);
    assert_eq!(cfg.emailjs.public_key, "pk_test");
    assert_eq!(cfg.emailjs.private_key, None);
    assert_eq!(
        cfg.emailjs.target,
        DispatchTarget { service_id: "service_mapia".into(), template_id: "template_request".into() }
    );
    assert_eq!(cfg.drive.upload_base_url, drive::DEFAULT_UPLOAD_BASE_URL);
    assert_eq!(cfg.drive.api_base_url, drive::DEFAULT_API_BASE_URL);
    assert_eq!(cfg.drive.folder_id, None);
    assert_eq!(cfg.connect_timeout, Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
}

#[test]
fn missing_service_id_is_reported() {
    let err = MapiaConfig::from_lookup(lookup(&[REQUIRED[0], REQUIRED[2]])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { var: "EMAILJS_SERVICE_ID" }));
}

#[test]
fn blank_values_count_as_missing() {
    let err = MapiaConfig::from_lookup(lookup(&[("EMAILJS_PUBLIC_KEY", "  "), REQUIRED[1], REQUIRED[2]])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { var: "EMAILJS_PUBLIC_KEY" }));
}

#[test]
fn overrides_are_trimmed() {
    let mut pairs = REQUIRED.to_vec();
    pairs.extend([
        ("EMAILJS_BASE_URL", "http://127.0.0.1:9000/"),
        ("DRIVE_FOLDER_ID", "folder-1"),
        ("DRIVE_API_BASE_URL", "http://127.0.0.1:9001/drive/v3/"),
        ("HTTP_CONNECT_TIMEOUT_SECS", "3"),
    ]);

    let cfg = MapiaConfig::from_lookup(lookup(&pairs)).unwrap();

    assert_eq!(cfg.emailjs.base_url, "http://127.0.0.1:9000");
    assert_eq!(cfg.drive.api_base_url, "http://127.0.0.1:9001/drive/v3");
    assert_eq!(cfg.drive.require_folder().unwrap(), "folder-1");
    assert_eq!(cfg.connect_timeout, Duration::from_secs(3));
}

#[test]
fn folder_is_required_only_on_demand() {
    let cfg = MapiaConfig::from_lookup(lookup(&REQUIRED)).unwrap();
    assert!(matches!(cfg.drive.require_folder(), Err(ConfigError::Missing { var: "DRIVE_FOLDER_ID" })));
}

#[test]
fn bad_timeout_is_rejected() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("HTTP_CONNECT_TIMEOUT_SECS", "soon"));

    let err = MapiaConfig::from_lookup(lookup(&pairs)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "HTTP_CONNECT_TIMEOUT_SECS", .. }));
}
