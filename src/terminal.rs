//! Line-based prompt surface for the command line.
//!
//! Choices are printed as a numbered list and answered by typing the number.
//! An empty line, an unknown number, or end of input counts as dismissal.

use std::time::Duration;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stderr, Stdin,
};
use tokio::sync::Mutex;

use crate::surface::{PickItem, PromptRequest, PromptSurface, Severity, StatusSurface};

pub struct TerminalSurface<R, W> {
    // One lock for both ends so concurrent prompts never interleave
    io: Mutex<(R, W)>,
}

impl TerminalSurface<BufReader<Stdin>, Stderr> {
    /// Read answers from stdin and print prompts to stderr.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> TerminalSurface<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }

    async fn ask(&self, header: String, choices: Vec<String>) -> Option<usize> {
        let mut io = self.io.lock().await;
        let (reader, writer) = &mut *io;

        let mut text = header;
        text.push('\n');
        for (index, choice) in choices.iter().enumerate() {
            text.push_str(&format!("  {}) {}\n", index + 1, choice));
        }
        text.push_str("(enter a number, or leave empty to dismiss)\n> ");

        if let Err(err) = write_all_and_flush(writer, text.as_bytes()).await {
            log::debug!(target: "formatter_arbiter::terminal", "Prompt write failed: {}", err);
            return None;
        }

        let mut answer = String::new();
        match reader.read_line(&mut answer).await {
            Ok(0) => None,
            Ok(_) => parse_choice(&answer, choices.len()),
            Err(err) => {
                log::debug!(target: "formatter_arbiter::terminal", "Prompt read failed: {}", err);
                None
            }
        }
    }
}

async fn write_all_and_flush<W: AsyncWrite + Unpin>(
    writer: &mut W,
    bytes: &[u8],
) -> std::io::Result<()> {
    writer.write_all(bytes).await?;
    writer.flush().await
}

/// 1-based answer to a 0-based index.
fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    let number = answer.trim().parse::<usize>().ok()?;
    (1..=count).contains(&number).then(|| number - 1)
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

impl<R, W> PromptSurface for TerminalSurface<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn prompt(&self, request: PromptRequest) -> Option<usize> {
        let header = format!("[{}] {}", severity_tag(request.severity), request.message);
        self.ask(header, request.actions).await
    }

    async fn quick_pick(&self, items: Vec<PickItem>, placeholder: String) -> Option<usize> {
        let choices = items
            .into_iter()
            .map(|item| match item.description {
                Some(description) => format!("{}  {}", item.label, description),
                None => item.label,
            })
            .collect();
        self.ask(placeholder, choices).await
    }
}

/// Status notices printed to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalStatus;

impl StatusSurface for TerminalStatus {
    fn show_transient(&self, message: &str, _duration: Duration) {
        // A terminal line cannot auto-dismiss; the duration is ignored
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::first("1\n", 3, Some(0))]
    #[case::padded("  3 \n", 3, Some(2))]
    #[case::out_of_range("4\n", 3, None)]
    #[case::zero("0\n", 3, None)]
    #[case::empty("\n", 3, None)]
    #[case::text("beta\n", 3, None)]
    fn parse_choice_cases(
        #[case] answer: &str,
        #[case] count: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(parse_choice(answer, count), expected);
    }

    #[tokio::test]
    async fn quick_pick_prints_items_and_reads_answer() {
        let surface = TerminalSurface::new(&b"2\n"[..], Vec::new());

        let picked = surface
            .quick_pick(
                vec![
                    PickItem::new("Alpha"),
                    PickItem::new("Beta").with_description("(default)"),
                ],
                "Select a formatter".to_string(),
            )
            .await;

        assert_eq!(picked, Some(1));
        let (_, output) = surface.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Select a formatter\n"));
        assert!(output.contains("  1) Alpha\n"));
        assert!(output.contains("  2) Beta  (default)\n"));
    }

    #[tokio::test]
    async fn prompt_at_end_of_input_is_dismissed() {
        let surface = TerminalSurface::new(&b""[..], Vec::new());

        let answer = surface
            .prompt(PromptRequest {
                severity: Severity::Info,
                message: "There are multiple formatters".to_string(),
                actions: vec!["Configure...".to_string()],
                silent: false,
            })
            .await;

        assert_eq!(answer, None);
        let (_, output) = surface.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("[info] There are multiple formatters"));
    }

    #[test]
    fn terminal_status_prints_without_a_runtime() {
        TerminalStatus.show_transient("Extension 'ext.c' is not available", Duration::ZERO);
    }

    #[tokio::test]
    async fn sequential_prompts_consume_one_line_each() {
        let surface = TerminalSurface::new(&b"1\n2\n"[..], Vec::new());

        let items = || vec![PickItem::new("a"), PickItem::new("b")];
        let first = surface.quick_pick(items(), String::new()).await;
        let second = surface.quick_pick(items(), String::new()).await;

        assert_eq!((first, second), (Some(0), Some(1)));
    }
}
