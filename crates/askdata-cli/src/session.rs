use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use askdata_agent::{AgentOptions, DataAgent, Intent, ResultEnvelope};
use askdata_model::{import_csv_path, CsvOptions};

use crate::render::{self, OutputFormat};

pub const NO_DATASET: &str = "Please load a CSV file to begin.";

const HELP: &str = "\
Ask a question about the loaded data, or use a command:
  :load <path>   load a CSV file (clears the history)
  :info          rows, columns and column names
  :history       questions asked so far
  :help          this message
  :quit, :q      exit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question: String,
    pub intent: Intent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

struct Loaded {
    path: PathBuf,
    agent: DataAgent,
}

/// One conversation: at most one loaded dataset plus the questions asked against it.
pub struct ChatSession {
    csv_options: CsvOptions,
    agent_options: AgentOptions,
    loaded: Option<Loaded>,
    history: Vec<HistoryEntry>,
}

impl ChatSession {
    pub fn new(csv_options: CsvOptions, agent_options: AgentOptions) -> Self {
        Self {
            csv_options,
            agent_options,
            loaded: None,
            history: Vec::new(),
        }
    }

    /// Replace the current dataset. History is cleared even if the new file is the same one.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let dataset = import_csv_path(path, self.csv_options.clone())
            .with_context(|| format!("load {}", path.display()))?;
        log::info!(
            "loaded {} ({} rows, {} columns)",
            path.display(),
            dataset.row_count(),
            dataset.column_count()
        );
        self.loaded = Some(Loaded {
            path: path.to_path_buf(),
            agent: DataAgent::with_options(dataset, self.agent_options),
        });
        self.history.clear();
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Answer `question`, or `None` when no dataset is loaded.
    pub fn ask(&mut self, question: &str) -> Option<ResultEnvelope> {
        let loaded = self.loaded.as_ref()?;
        let envelope = loaded.agent.process_query(question);
        self.history.push(HistoryEntry {
            question: question.to_string(),
            intent: envelope.intent,
        });
        Some(envelope)
    }

    /// Handle one line of chat input, writing the reply to `out`.
    pub fn handle_line(
        &mut self,
        line: &str,
        format: OutputFormat,
        out: &mut impl Write,
    ) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(command) = line.strip_prefix(':') else {
            self.answer(line, format, out)?;
            return Ok(Flow::Continue);
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "q" | "quit" => return Ok(Flow::Quit),
            "help" => writeln!(out, "{HELP}")?,
            "load" if arg.is_empty() => writeln!(out, "usage: :load <path>")?,
            "load" => match self.load(Path::new(arg)) {
                Ok(()) => self.write_info(out)?,
                Err(err) => writeln!(out, "error: {err:#}")?,
            },
            "info" => self.write_info(out)?,
            "history" => self.write_history(out)?,
            other => writeln!(out, "unknown command `:{other}` (try :help)")?,
        }
        Ok(Flow::Continue)
    }

    fn answer(&mut self, question: &str, format: OutputFormat, out: &mut impl Write) -> Result<()> {
        match self.ask(question) {
            Some(envelope) => writeln!(out, "{}", render::render(&envelope, format)?)?,
            None => writeln!(out, "{NO_DATASET}")?,
        }
        Ok(())
    }

    fn write_info(&self, out: &mut impl Write) -> Result<()> {
        let Some(loaded) = &self.loaded else {
            writeln!(out, "{NO_DATASET}")?;
            return Ok(());
        };
        let dataset = loaded.agent.dataset();
        writeln!(out, "File: {}", loaded.path.display())?;
        writeln!(out, "Rows: {}", dataset.row_count())?;
        writeln!(out, "Columns: {}", dataset.column_count())?;
        writeln!(out, "Column names: {}", dataset.column_names().join(", "))?;
        Ok(())
    }

    fn write_history(&self, out: &mut impl Write) -> Result<()> {
        if self.history().is_empty() {
            writeln!(out, "No questions yet.")?;
        }
        for (i, entry) in self.history().iter().enumerate() {
            writeln!(out, "{}. {} -> {}", i + 1, entry.question, entry.intent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn session() -> ChatSession {
        ChatSession::new(CsvOptions::default(), AgentOptions::default())
    }

    fn send(session: &mut ChatSession, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = session.handle_line(line, OutputFormat::Text, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn questions_need_a_dataset() {
        let mut session = session();
        let (flow, out) = send(&mut session, "average sales");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, format!("{NO_DATASET}\n"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn loading_resets_history() {
        let file = csv_file("region,sales\neast,10\nwest,20\neast,30\n");
        let mut session = session();
        session.load(file.path()).unwrap();

        let (_, out) = send(&mut session, "average sales");
        assert_eq!(out, "Intent: GET_AVG\n20\n");
        send(&mut session, "count");
        assert_eq!(
            session.history(),
            &[
                HistoryEntry {
                    question: "average sales".into(),
                    intent: Intent::Average,
                },
                HistoryEntry {
                    question: "count".into(),
                    intent: Intent::Count,
                },
            ]
        );

        let (_, out) = send(&mut session, &format!(":load {}", file.path().display()));
        assert!(out.contains("Rows: 3"), "{out}");
        assert!(session.history().is_empty());
    }

    #[test]
    fn failed_load_keeps_the_previous_dataset() {
        let file = csv_file("a\n1\n");
        let mut session = session();
        session.load(file.path()).unwrap();
        let (flow, out) = send(&mut session, ":load /definitely/not/here.csv");
        assert_eq!(flow, Flow::Continue);
        assert!(out.starts_with("error: load /definitely/not/here.csv"), "{out}");
        assert!(session.is_loaded());
    }

    #[test]
    fn commands() {
        let mut session = session();
        assert_eq!(send(&mut session, ":q").0, Flow::Quit);
        assert_eq!(send(&mut session, "  :quit  ").0, Flow::Quit);
        assert!(send(&mut session, ":help").1.contains(":load <path>"));
        assert_eq!(send(&mut session, ":history").1, "No questions yet.\n");
        assert_eq!(send(&mut session, ":info").1, format!("{NO_DATASET}\n"));
        assert_eq!(send(&mut session, ":load").1, "usage: :load <path>\n");
        assert!(send(&mut session, ":bogus").1.starts_with("unknown command `:bogus`"));
        assert_eq!(send(&mut session, "   ").1, "");
    }
}
