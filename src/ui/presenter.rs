use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

use crate::help_text::{HelpEntry, HelpText};
use crate::output::{FilterResult, Notice, NoticeKind, Output, PageView};
use crate::ui::chart_renderer::ChartRenderer;
use crate::ui::table_renderer::{render_column_summaries, render_rows};
use crate::ui::typewriter::Typewriter;

pub const COLUMNS_HEADING: &str = "Colunas disponíveis no arquivo CSV:";
pub const FILTER_HEADING: &str = "Resultado do filtro:";
pub const INFO_HEADING: &str = "Resumo das colunas:";

/// Turns navigator output into something the user can see
pub trait Presenter {
    fn present(&mut self, output: &Output) -> Result<()>;
}

/// Keeps every output in memory. Used by tests and for scripted runs.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    outputs: Vec<Output>,
}

impl RecordingPresenter {
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn pages(&self) -> Vec<&PageView> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Page(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn last_page(&self) -> Option<&PageView> {
        self.pages().pop()
    }

    pub fn clear(&mut self) {
        self.outputs.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, output: &Output) -> Result<()> {
        self.outputs.push(output.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PresenterOptions {
    pub clear_screen: bool,
    pub use_color: bool,
    pub typewriter: Option<Typewriter>,
}

/// Writes tables, notices and charts to a terminal-like sink
pub struct TerminalPresenter<W: Write> {
    out: W,
    options: PresenterOptions,
    charts: Option<Box<dyn ChartRenderer>>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, options: PresenterOptions) -> Self {
        Self {
            out,
            options,
            charts: None,
        }
    }

    pub fn with_charts(mut self, renderer: Box<dyn ChartRenderer>) -> Self {
        self.charts = Some(renderer);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn notice_color(kind: NoticeKind) -> Color {
        match kind {
            NoticeKind::Info => Color::Cyan,
            NoticeKind::Warning => Color::Yellow,
            NoticeKind::Error => Color::Red,
        }
    }

    /// One line of prose, typed out when the typewriter is on
    fn write_line(&mut self, text: &str, color: Option<Color>) -> Result<()> {
        let color = color.filter(|_| self.options.use_color);
        if let Some(color) = color {
            queue!(self.out, SetForegroundColor(color))?;
        }
        match self.options.typewriter {
            Some(typewriter) => typewriter.write(&mut self.out, text)?,
            None => self.out.write_all(text.as_bytes())?,
        }
        if color.is_some() {
            queue!(self.out, ResetColor)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn present_page(&mut self, page: &PageView) -> Result<()> {
        if self.options.clear_screen {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", page.range_label())?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", render_rows(&page.columns, &page.rows))?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", page.page_label())?;
        Ok(())
    }

    fn present_columns(&mut self, columns: &[(usize, String)]) -> Result<()> {
        writeln!(self.out)?;
        self.write_line(COLUMNS_HEADING, Some(Color::Green))?;
        for (index, name) in columns {
            writeln!(self.out, "{} - {}", index, name)?;
        }
        Ok(())
    }

    fn present_filter(&mut self, result: &FilterResult) -> Result<()> {
        writeln!(self.out)?;
        self.write_line(FILTER_HEADING, Some(Color::Green))?;
        writeln!(self.out, "{}", render_rows(&result.columns, &result.rows))?;
        Ok(())
    }

    fn present_help(&mut self, entries: &[HelpEntry]) -> Result<()> {
        writeln!(self.out)?;
        self.write_line(HelpText::TITLE, Some(Color::Green))?;
        for entry in entries {
            self.write_line(&format!("{} - {}", entry.key, entry.description), None)?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, output: &Output) -> Result<()> {
        match output {
            Output::Page(page) => self.present_page(page)?,
            Output::Columns(columns) => self.present_columns(columns)?,
            Output::ColumnInfo(summaries) => {
                writeln!(self.out)?;
                self.write_line(INFO_HEADING, Some(Color::Green))?;
                writeln!(self.out, "{}", render_column_summaries(summaries))?;
            }
            Output::FilterResult(result) => self.present_filter(result)?,
            Output::Help(entries) => self.present_help(entries)?,
            Output::Notice(notice) => {
                let color = Self::notice_color(notice.kind());
                self.write_line(&notice.to_string(), Some(color))?;
            }
            Output::Chart(request) => {
                if let Some(charts) = &self.charts {
                    writeln!(self.out)?;
                    charts.render(&mut self.out, request)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataRow, DataValue};
    use crate::output::ChartRequest;
    use crate::ui::chart_renderer::TextChartRenderer;

    fn plain() -> TerminalPresenter<Vec<u8>> {
        TerminalPresenter::new(Vec::new(), PresenterOptions::default())
    }

    fn text(presenter: TerminalPresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    fn sample_page() -> PageView {
        PageView {
            start_row: 1,
            end_row: 2,
            total_rows: 2,
            page_number: 1,
            page_count: 1,
            columns: vec!["city".to_string()],
            rows: vec![
                DataRow::new(vec![DataValue::String("Recife".to_string())]),
                DataRow::new(vec![DataValue::String("Natal".to_string())]),
            ],
        }
    }

    #[test]
    fn test_recording_presenter_collects() {
        let mut presenter = RecordingPresenter::default();
        presenter.present(&Output::Page(sample_page())).unwrap();
        presenter.present(&Notice::LastPage.into()).unwrap();

        assert_eq!(presenter.outputs().len(), 2);
        assert_eq!(presenter.notices(), vec![Notice::LastPage]);
        assert_eq!(presenter.last_page().map(|p| p.total_rows), Some(2));

        presenter.clear();
        assert!(presenter.outputs().is_empty());
    }

    #[test]
    fn test_page_has_labels_and_rows() {
        let mut presenter = plain();
        presenter.present(&Output::Page(sample_page())).unwrap();
        let out = text(presenter);

        assert!(out.contains("Mostrando linhas 1 a 2 de 2:"));
        assert!(out.contains("Recife"));
        assert!(out.contains("Página 1 de 1"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_columns_listed_by_index() {
        let mut presenter = plain();
        presenter
            .present(&Output::Columns(vec![
                (0, "city".to_string()),
                (1, "price".to_string()),
            ]))
            .unwrap();
        let out = text(presenter);

        assert!(out.contains(COLUMNS_HEADING));
        assert!(out.contains("0 - city\n1 - price\n"));
    }

    #[test]
    fn test_notice_colored_only_when_enabled() {
        let mut presenter = plain();
        presenter.present(&Notice::FirstPage.into()).unwrap();
        assert_eq!(text(presenter), "Você já está na primeira página!\n");

        let mut colored = TerminalPresenter::new(
            Vec::new(),
            PresenterOptions {
                use_color: true,
                ..Default::default()
            },
        );
        colored.present(&Notice::FirstPage.into()).unwrap();
        let out = text(colored);
        assert!(out.contains('\u{1b}'));
        assert!(out.contains("Você já está na primeira página!"));
    }

    #[test]
    fn test_typewriter_output_matches_plain() {
        let mut presenter = TerminalPresenter::new(
            Vec::new(),
            PresenterOptions {
                typewriter: Some(Typewriter::from_millis(0)),
                ..Default::default()
            },
        );
        presenter.present(&Notice::Farewell.into()).unwrap();
        assert_eq!(text(presenter), "Saindo do programa...\n");
    }

    #[test]
    fn test_clear_screen_before_page() {
        let mut presenter = TerminalPresenter::new(
            Vec::new(),
            PresenterOptions {
                clear_screen: true,
                ..Default::default()
            },
        );
        presenter.present(&Output::Page(sample_page())).unwrap();
        assert!(text(presenter).starts_with('\u{1b}'));
    }

    #[test]
    fn test_charts_need_a_renderer() {
        let request = Output::Chart(ChartRequest::Bar {
            column: "city".to_string(),
            counts: vec![(DataValue::String("Recife".to_string()), 2)],
        });

        let mut without = plain();
        without.present(&request).unwrap();
        assert!(text(without).is_empty());

        let mut with = plain().with_charts(Box::new(TextChartRenderer::new(10, 5)));
        with.present(&request).unwrap();
        assert!(text(with).contains("Contagem de valores em 'city'"));
    }

    #[test]
    fn test_help_lists_entries() {
        let mut presenter = plain();
        presenter
            .present(&Output::Help(HelpText::entries(false)))
            .unwrap();
        let out = text(presenter);
        assert!(out.contains(HelpText::TITLE));
        assert!(out.contains("q - Sair"));
        assert!(!out.contains("b - "));
    }
}
