//! Line-oriented terminal input.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

pub struct Console<R> {
    lines: Lines<R>,
}

impl Console<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Console<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `label` and read one line. `None` at end of input.
    pub async fn prompt(&mut self, label: &str) -> std::io::Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(label.as_bytes()).await?;
        stdout.flush().await?;
        self.lines.next_line().await
    }

    /// Like [`prompt`](Self::prompt), but end of input is an error.
    pub async fn require(&mut self, label: &str) -> std::io::Result<String> {
        self.prompt(label).await?.ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "input closed")
        })
    }
}

/// `value`, else the environment variable `var`, else a prompt.
pub async fn value_or_prompt<R: AsyncBufRead + Unpin>(
    console: &mut Console<R>,
    value: Option<&str>,
    var: &str,
    label: &str,
) -> std::io::Result<String> {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        return Ok(value.trim().to_string());
    }
    if let Ok(value) = std::env::var(var) {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Ok(console.require(label).await?.trim().to_string())
}
