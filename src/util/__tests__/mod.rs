use crate::util::{Code, Position};

#[test]
fn positions_are_one_based() {
    let code = Code::from("ab\ncd");
    assert_eq!(code.obtain_position(0), Position::new(1, 1));
    assert_eq!(code.obtain_position(1), Position::new(1, 2));
    assert_eq!(code.obtain_position(3), Position::new(2, 1));
    assert_eq!(code.obtain_position(4), Position::new(2, 2));
}

#[test]
fn every_break_character_starts_a_new_line() {
    let code = Code::from("a\rb\u{2028}c\u{2029}d");
    assert_eq!(code.obtain_position(2).line, 2);
    assert_eq!(code.obtain_position(4).line, 3);
    assert_eq!(code.obtain_position(6).line, 4);
}

#[test]
fn slicing_is_character_based() {
    let code = Code::from("héllo");
    assert_eq!(code.len(), 5);
    assert_eq!(code.slice(1, 3), "él");
    assert_eq!(code.char_at(4), Some('o'));
    assert_eq!(code.char_at(5), None);
}
