use crate::position::*;

#[test]
fn zero_is_additive_identity() {
    let d = PositionDelta::new(3, 7);
    assert_eq!(d + PositionDelta::ZERO, d);
    assert_eq!(PositionDelta::ZERO + d, d);
}

#[test]
fn same_line_deltas_accumulate_cols() {
    let a = PositionDelta::new(0, 2);
    let b = PositionDelta::new(0, 3);
    assert_eq!(a + b, PositionDelta::new(0, 5));
}

#[test]
fn crossing_a_newline_resets_cols_to_rhs() {
    let a = PositionDelta::new(0, 5);
    let b = PositionDelta::NEW_LINE;
    assert_eq!(a + b, PositionDelta::new(1, 0));

    let c = PositionDelta::new(1, 2);
    assert_eq!(a + c, PositionDelta::new(1, 2));
}

#[test]
fn position_plus_delta_without_newline_advances_col() {
    let p = Position::START + PositionDelta::new(0, 4);
    assert_eq!(p, Position { line: 1, col: 5 });
}

#[test]
fn position_plus_delta_with_newline_resets_col() {
    let p = Position::START + PositionDelta::new(2, 3);
    assert_eq!(p, Position { line: 3, col: 4 });
}

#[test]
fn position_tracking_over_a_token_stream() {
    // "ab\ncd": 'a' -> (0,1), 'b' -> (0,1), '\n' -> (1,0)
    let calc = |c: char| {
        if c == '\n' {
            PositionDelta::NEW_LINE
        } else {
            PositionDelta::ONE_COL
        }
    };
    let mut pos = Position::START;
    for c in "ab\n".chars() {
        pos = pos + calc(c);
    }
    assert_eq!(pos, Position { line: 2, col: 1 });
    pos = pos + calc('c');
    assert_eq!(pos, Position { line: 2, col: 2 });
}
