// Output assembly: token stream to text.
//
// Generated output is a flat token stream in which the line boundary acts as
// a line separator. `split_lines` cuts the finished stream at every boundary;
// tokens after the last boundary belong to an unfinished line and are not
// emitted. `render_line` joins one line with single spaces, except that the
// punctuation marks in `ATTACHED_PUNCTUATION` attach to the preceding word.

use lyricist_lang::Token;

/// Marks written without a space before them.
pub const ATTACHED_PUNCTUATION: &[&str] = &[",", ".", ":", ";", "!", "?"];

/// Join the words of one line.
pub fn render_line(tokens: &[Token]) -> String {
    let mut out = String::new();
    for word in tokens.iter().filter_map(Token::as_word) {
        if !out.is_empty() && !ATTACHED_PUNCTUATION.contains(&word) {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Split a token stream into finished lines.
pub fn split_lines(tokens: &[Token]) -> Vec<&[Token]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_boundary() {
            lines.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    lines
}

/// Render a whole token stream as newline-separated lines.
pub fn render_song(tokens: &[Token]) -> String {
    split_lines(tokens)
        .into_iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join("\n")
}
