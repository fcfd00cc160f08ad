//! Line-oriented tokenizing shared by the OBJ and MTL parsers.

use std::io::BufRead;

use crate::error::{ObjError, ObjResult};

/// Call `f` with every line (1-based number, contents without `\r\n`).
/// Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn for_each_line<R, F>(mut reader: R, mut f: F) -> ObjResult<()>
where
    R: BufRead,
    F: FnMut(usize, &str) -> ObjResult<()>,
{
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| ObjError::Read {
                line: line_no + 1,
                source,
            })?;
        if read == 0 {
            return Ok(());
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        f(line_no, line.trim_end_matches(['\n', '\r']))?;
    }
}

/// Parse up to `N` floats. Parsing stops at the first missing or malformed
/// token; unfilled components stay zero.
pub(crate) fn parse_floats<'a, const N: usize>(
    mut tokens: impl Iterator<Item = &'a str>,
) -> [f32; N] {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        match tokens.next().and_then(|t| t.parse::<f32>().ok()) {
            Some(v) => *slot = v,
            None => break,
        }
    }
    out
}

/// Everything after the leading `command` token, trimmed.
pub(crate) fn rest_of_line<'a>(line: &'a str, command: &str) -> &'a str {
    line.trim_start()
        .strip_prefix(command)
        .map(str::trim)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn lines_are_numbered_and_stripped() {
        let mut seen = Vec::new();
        for_each_line(Cursor::new("a\r\nb\n\nc"), |no, line| {
            seen.push((no, line.to_owned()));
            Ok(())
        })
        .expect("lines");
        assert_eq!(
            seen,
            vec![
                (1, "a".to_owned()),
                (2, "b".to_owned()),
                (3, String::new()),
                (4, "c".to_owned()),
            ]
        );
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let bytes: &[u8] = b"# caf\xe9\nv 1 2 3\n";
        let mut count = 0;
        for_each_line(Cursor::new(bytes), |_, _| {
            count += 1;
            Ok(())
        })
        .expect("lossy lines");
        assert_eq!(count, 2);
    }

    #[test]
    fn floats_stop_at_first_bad_token() {
        let v: [f32; 3] = parse_floats("1.5 oops 3".split_whitespace());
        assert_eq!(v, [1.5, 0.0, 0.0]);

        let v: [f32; 3] = parse_floats("1 2".split_whitespace());
        assert_eq!(v, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn rest_of_line_keeps_inner_spaces() {
        assert_eq!(rest_of_line("  map_Kd  my tex.png \t", "map_Kd"), "my tex.png");
        assert_eq!(rest_of_line("map_Kd", "map_Kd"), "");
    }
}
