use std::io::{self, BufRead};

/// Most URIs accepted from one input stream.
const MAX_URIS: usize = 100_000;

pub struct InputReader;

impl InputReader {
    /// Reads one file URI per line from stdin.
    pub fn read_stdin_uris() -> io::Result<Vec<String>> {
        Self::read_uris(io::stdin().lock())
    }

    /// Reads one file URI per line, trimming whitespace and skipping blank lines.
    pub fn read_uris<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
        let mut uris = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let uri = line.trim();
            if uri.is_empty() {
                continue;
            }

            if uris.len() == MAX_URIS {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("more than {MAX_URIS} file URIs on input"),
                ));
            }
            uris.push(uri.to_string());
        }

        Ok(uris)
    }
}
