/// Calculates the 1-based line and column number for a byte offset in the
/// source text, as carried by error spans. Intended for error presentation
/// only; it walks the source from the start on each call.
pub fn line_and_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (pos, c) in source.char_indices() {
        if pos >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
