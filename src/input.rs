use anyhow::{Context, Result};
use reedline::{
    FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    Reedline, Signal,
};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// Where command and follow-up tokens come from
pub trait CommandSource {
    /// Read one line after showing `prompt`. `Ok(None)` once the source
    /// is exhausted (end of input, Ctrl+D, Ctrl+C).
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Pre-recorded input, for tests and non-interactive runs
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl CommandSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

/// Plain buffered reader, used when stdin is not a terminal
pub struct StdinInput<R: BufRead, W: Write> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> StdinInput<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> CommandSource for StdinInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

struct NavigatorPrompt {
    label: String,
}

impl Prompt for NavigatorPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.label.as_str())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "falhou ",
        };
        Cow::Owned(format!("({}busca: {})", prefix, history_search.term))
    }
}

/// Interactive line editor with optional file-backed history
pub struct LineEditorInput {
    editor: Reedline,
}

impl LineEditorInput {
    pub fn new(history: Option<(PathBuf, usize)>) -> Result<Self> {
        let mut editor = Reedline::create();
        if let Some((path, capacity)) = history {
            debug!("Command history at {}", path.display());
            let history = FileBackedHistory::with_file(capacity, path)
                .map_err(|e| anyhow::anyhow!("Failed to open command history: {}", e))?;
            editor = editor.with_history(Box::new(history));
        }
        Ok(Self { editor })
    }
}

impl CommandSource for LineEditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let prompt = NavigatorPrompt {
            label: prompt.to_string(),
        };
        match self.editor.read_line(&prompt)? {
            Signal::Success(buffer) => Ok(Some(buffer)),
            Signal::CtrlD | Signal::CtrlC => Ok(None),
        }
    }
}
