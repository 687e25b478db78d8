/// 1-based `(line, column)` of the character at `index` in `source`.
///
/// Lines split on `'\n'`; an index past the end points just after the last
/// character.
pub fn locate(source: &str, index: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for c in source.chars().take(index) {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
