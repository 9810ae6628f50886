use super::*;
use crate::area::LatLng;

fn ana() -> ContactInfo {
    ContactInfo { name: "Ana Ruiz".into(), email: "ana@x.co".into(), phone: None }
}

#[test]
fn empty_inputs_use_sentinels() {
    let payload = SubmissionPayload::assemble(&ana(), &FileLinks::default(), None, &RequestDetails::default()).unwrap();
    assert_eq!(payload.user_phone, NOT_SPECIFIED);
    assert_eq!(payload.hectares, NOT_SPECIFIED);
    assert_eq!(payload.file_links, NO_FILES);
    assert_eq!(payload.map_coordinates, NO_AREA);
    assert_eq!(payload.comments, NO_COMMENTS);
}

#[test]
fn whitespace_only_details_count_as_empty() {
    let details = RequestDetails { hectares: "  ".into(), comments: "\n".into() };
    let payload = SubmissionPayload::assemble(&ana(), &FileLinks::default(), None, &details).unwrap();
    assert_eq!(payload.hectares, NOT_SPECIFIED);
    assert_eq!(payload.comments, NO_COMMENTS);
}

#[test]
fn provided_values_pass_through() {
    let contact = ContactInfo { phone: Some("+57 300".into()), ..ana() };
    let details = RequestDetails { hectares: "120".into(), comments: "Lote norte".into() };
    let payload = SubmissionPayload::assemble(&contact, &FileLinks::default(), None, &details).unwrap();
    assert_eq!(payload.user_name, "Ana Ruiz");
    assert_eq!(payload.user_email, "ana@x.co");
    assert_eq!(payload.user_phone, "+57 300");
    assert_eq!(payload.hectares, "120");
    assert_eq!(payload.comments, "Lote norte");
}

#[test]
fn links_render_in_upload_order() {
    let mut links = FileLinks::default();
    links.push(FileSlot::Image, "https://drive.test/a");
    links.push(FileSlot::Vector, "https://drive.test/b");
    assert_eq!(links.render(), "Ortomosaico: https://drive.test/a\nArchivo vectorial: https://drive.test/b\n");

    let payload = SubmissionPayload::assemble(&ana(), &links, None, &RequestDetails::default()).unwrap();
    assert!(payload.file_links.starts_with("Ortomosaico: "));
}

#[test]
fn area_is_pretty_json() {
    let area = AreaSelection::Marker(LatLng::new(4.5, -74.25));
    let payload =
        SubmissionPayload::assemble(&ana(), &FileLinks::default(), Some(&area), &RequestDetails::default()).unwrap();
    assert!(payload.map_coordinates.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&payload.map_coordinates).unwrap();
    assert_eq!(value["type"], "marker");
}

#[test]
fn params_carry_all_seven_fields() {
    let payload = SubmissionPayload::assemble(&ana(), &FileLinks::default(), None, &RequestDetails::default()).unwrap();
    let params = payload.to_params();
    let keys: Vec<_> = params.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["comments", "file_links", "hectares", "map_coordinates", "user_email", "user_name", "user_phone"]
    );
    assert_eq!(params["user_name"], "Ana Ruiz");
}
