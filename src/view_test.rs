use super::test_helpers::{RecordingView, ViewEvent};
use super::*;

#[test]
fn busy_control_disables_then_restores() {
    let view = RecordingView::new();
    {
        let _busy = BusyControl::engage(view.clone(), ControlId::RequestSubmit, "Procesando...");
        assert_eq!(view.control(ControlId::RequestSubmit), ("Procesando...".to_owned(), false));
    }
    assert_eq!(view.control(ControlId::RequestSubmit), ("Enviar Solicitud".to_owned(), true));
}

#[test]
fn busy_control_restores_on_early_return() {
    fn fails(view: Arc<RecordingView>) -> Result<(), &'static str> {
        let _busy = BusyControl::engage(view, ControlId::InquirySubmit, "Enviando...");
        Err("boom")
    }

    let view = RecordingView::new();
    assert!(fails(view.clone()).is_err());
    assert_eq!(view.control(ControlId::InquirySubmit), ("Enviar Mensaje".to_owned(), true));
}

#[test]
fn busy_control_leaves_other_controls_alone() {
    let view = RecordingView::new();
    let _busy = BusyControl::engage(view.clone(), ControlId::RequestSubmit, "Procesando...");
    assert_eq!(view.control(ControlId::InquirySubmit), ("Enviar Mensaje".to_owned(), true));
    assert_eq!(
        view.events(),
        vec![ViewEvent::Control { control: ControlId::RequestSubmit, label: "Procesando...".into(), enabled: false }]
    );
}

#[test]
fn placeholders_match_page_copy() {
    assert_eq!(StatusSlot::Map.placeholder(), "↑ Click para abrir mapa\nDibuja o marca tu área");
    assert_eq!(StatusSlot::Vector.placeholder(), "↑ Click para subir\nFormatos: .KML, .KMZ, .SHP, .ZIP");
}

#[test]
fn file_slots_map_to_status_slots() {
    assert_eq!(StatusSlot::from(FileSlot::Image), StatusSlot::Image);
    assert_eq!(StatusSlot::from(FileSlot::Vector), StatusSlot::Vector);
}
