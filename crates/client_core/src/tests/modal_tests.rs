use super::*;

#[test]
fn open_locks_scroll_and_close_restores_it() {
    let mut body = BodyState {
        overflow: Overflow::Scroll,
    };
    let mut modal = ModalController::default();

    modal.open(&mut body);
    assert!(modal.is_open());
    assert_eq!(body.overflow, Overflow::Hidden);

    assert!(modal.close(&mut body));
    assert_eq!(modal.visibility(), Visibility::Hidden);
    assert_eq!(body.overflow, Overflow::Scroll);
}

#[test]
fn opening_twice_keeps_the_first_saved_overflow() {
    let mut body = BodyState::default();
    let mut modal = ModalController::default();

    modal.open(&mut body);
    modal.open(&mut body);
    modal.close(&mut body);

    assert_eq!(body.overflow, Overflow::Auto);
}

#[test]
fn closing_a_closed_modal_is_a_no_op() {
    let mut body = BodyState {
        overflow: Overflow::Visible,
    };
    let mut modal = ModalController::default();

    assert!(!modal.close(&mut body));
    assert_eq!(body.overflow, Overflow::Visible);
}

#[test]
fn backdrop_click_closes_but_content_click_does_not() {
    let mut body = BodyState::default();
    let mut modal = ModalController::default();
    modal.open(&mut body);

    assert!(!modal.handle_click("modal-content", &mut body));
    assert!(modal.is_open());

    assert!(modal.handle_click(INFO_MODAL_ID, &mut body));
    assert!(!modal.is_open());
    assert_eq!(body.overflow, Overflow::Auto);
}

#[test]
fn only_escape_closes() {
    let mut body = BodyState::default();
    let mut modal = ModalController::default();
    modal.open(&mut body);

    for key in ["Enter", "a", "Esc", "escape"] {
        assert!(!modal.handle_key(key, &mut body), "{key} closed the modal");
    }
    assert!(modal.is_open());

    assert!(modal.handle_key(ESCAPE_KEY, &mut body));
    assert!(!modal.is_open());
}
