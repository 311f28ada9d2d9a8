use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::{parse_column_token, ColumnToken, Command};
use crate::data::datatable::DataTable;
use crate::help_text::HelpText;
use crate::input::CommandSource;
use crate::output::{ChartRequest, FilterResult, Notice, Output, PageView};
use crate::ui::presenter::Presenter;

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const COMMAND_PROMPT: &str = "Digite um comando: ";
pub const FILTER_COLUMN_PROMPT: &str = "Digite o número da coluna para filtrar: ";
pub const BAR_COLUMN_PROMPT: &str = "Digite o número da coluna para o gráfico: ";
pub const SCATTER_X_PROMPT: &str = "Digite o número da coluna do eixo X: ";
pub const SCATTER_Y_PROMPT: &str = "Digite o número da coluna do eixo Y: ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigatorError {
    #[error("Page size must be a positive integer")]
    InvalidPageSize,
}

/// How the "page X of Y" total is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageCountMode {
    /// `max(1, ceil(rows / page_size))`
    #[default]
    Exact,
    /// `floor(rows / page_size) + 1`, which reports one extra page when the
    /// row count is an exact multiple of the page size
    Legacy,
}

impl PageCountMode {
    pub fn page_count(self, row_count: usize, page_size: usize) -> usize {
        match self {
            PageCountMode::Exact => row_count.div_ceil(page_size).max(1),
            PageCountMode::Legacy => row_count / page_size + 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigatorOptions {
    pub page_size: usize,
    pub page_count_mode: PageCountMode,
    pub charts_enabled: bool,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_count_mode: PageCountMode::default(),
            charts_enabled: true,
        }
    }
}

/// Paging cursor and command interpreter over a loaded table
pub struct Navigator {
    model: Arc<DataTable>,
    current_row: usize,
    page_size: usize,
    page_count_mode: PageCountMode,
    charts_enabled: bool,
    exited: bool,
}

impl Navigator {
    pub fn new(model: Arc<DataTable>) -> Self {
        Self {
            model,
            current_row: 0,
            page_size: DEFAULT_PAGE_SIZE,
            page_count_mode: PageCountMode::default(),
            charts_enabled: true,
            exited: false,
        }
    }

    pub fn with_options(
        model: Arc<DataTable>,
        options: NavigatorOptions,
    ) -> Result<Self, NavigatorError> {
        if options.page_size == 0 {
            return Err(NavigatorError::InvalidPageSize);
        }
        Ok(Self {
            page_size: options.page_size,
            page_count_mode: options.page_count_mode,
            charts_enabled: options.charts_enabled,
            ..Self::new(model)
        })
    }

    pub fn model(&self) -> &DataTable {
        &self.model
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// The page anchored at the cursor
    pub fn current_page(&self) -> PageView {
        let total_rows = self.model.row_count();
        let end = (self.current_row + self.page_size).min(total_rows);
        PageView {
            start_row: if total_rows == 0 {
                0
            } else {
                self.current_row + 1
            },
            end_row: end,
            total_rows,
            page_number: self.current_row / self.page_size + 1,
            page_count: self.page_count_mode.page_count(total_rows, self.page_size),
            columns: self.model.column_names(),
            rows: self.model.row_slice(self.current_row, end).to_vec(),
        }
    }

    pub fn next_page(&mut self) -> Vec<Output> {
        let mut outputs = Vec::new();
        if self.current_row + self.page_size < self.model.row_count() {
            self.current_row += self.page_size;
            debug!("Cursor moved forward to row {}", self.current_row);
        } else {
            outputs.push(Notice::LastPage.into());
        }
        outputs.push(Output::Page(self.current_page()));
        outputs
    }

    pub fn prev_page(&mut self) -> Vec<Output> {
        let mut outputs = Vec::new();
        if self.current_row >= self.page_size {
            self.current_row -= self.page_size;
            debug!("Cursor moved back to row {}", self.current_row);
        } else {
            outputs.push(Notice::FirstPage.into());
        }
        outputs.push(Output::Page(self.current_page()));
        outputs
    }

    pub fn columns(&self) -> Output {
        Output::Columns(
            self.model
                .column_names()
                .into_iter()
                .enumerate()
                .collect(),
        )
    }

    pub fn column_info(&self) -> Output {
        Output::ColumnInfo(self.model.column_summaries())
    }

    pub fn help(&self) -> Output {
        Output::Help(HelpText::entries(self.charts_enabled))
    }

    /// Help followed by the first page, shown when a session opens
    pub fn start(&self) -> Vec<Output> {
        vec![self.help(), Output::Page(self.current_page())]
    }

    /// Validate a column index token against the table
    pub fn select_column(&self, token: &str) -> Result<usize, Notice> {
        match parse_column_token(token, self.model.column_count()) {
            ColumnToken::Valid(index) => Ok(index),
            ColumnToken::NotAnInteger(token) => {
                warn!("Rejected column token {:?}", token);
                Err(Notice::InvalidColumnToken(token))
            }
            ColumnToken::OutOfRange(index) => {
                warn!("Column index {} out of range", index);
                Err(Notice::ColumnOutOfRange {
                    index,
                    column_count: self.model.column_count(),
                })
            }
        }
    }

    /// Rows equal to `value` in an already validated column. Never moves
    /// the cursor.
    pub fn filter(&self, column: usize, value: &str) -> Output {
        let column_name = match self.model.column(column) {
            Ok(c) => c.name.clone(),
            Err(_) => {
                return Notice::ColumnOutOfRange {
                    index: column as i64,
                    column_count: self.model.column_count(),
                }
                .into()
            }
        };

        match self.model.filter_equals(column, value) {
            Ok(rows) if !rows.is_empty() => Output::FilterResult(FilterResult {
                column: column_name,
                value: value.to_string(),
                columns: self.model.column_names(),
                rows: rows.into_iter().cloned().collect(),
            }),
            _ => Notice::NoMatch {
                value: value.to_string(),
            }
            .into(),
        }
    }

    pub fn bar_chart(&self, column: usize) -> Output {
        match (self.model.column(column), self.model.distinct_value_counts(column)) {
            (Ok(c), Ok(counts)) => Output::Chart(ChartRequest::Bar {
                column: c.name.clone(),
                counts,
            }),
            _ => Notice::ColumnOutOfRange {
                index: column as i64,
                column_count: self.model.column_count(),
            }
            .into(),
        }
    }

    pub fn scatter_chart(&self, x: usize, y: usize) -> Output {
        for index in [x, y] {
            match self.model.column(index) {
                Ok(c) if c.data_type.is_numeric() => {}
                Ok(c) => {
                    return Notice::NonNumericColumn {
                        column: c.name.clone(),
                    }
                    .into()
                }
                Err(_) => {
                    return Notice::ColumnOutOfRange {
                        index: index as i64,
                        column_count: self.model.column_count(),
                    }
                    .into()
                }
            }
        }

        let names = self.model.column_names();
        match self.model.numeric_pairs(x, y) {
            Ok(points) => Output::Chart(ChartRequest::Scatter {
                x_column: names[x].clone(),
                y_column: names[y].clone(),
                points,
            }),
            Err(_) => Notice::ColumnOutOfRange {
                index: y as i64,
                column_count: self.model.column_count(),
            }
            .into(),
        }
    }

    /// Run one command to completion, reading follow-up tokens from
    /// `input` and handing every payload to `presenter`.
    pub fn execute(
        &mut self,
        command: Command,
        input: &mut dyn CommandSource,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        debug!("Executing command: {:?}", command);
        match command {
            Command::NextPage => present_all(presenter, self.next_page())?,
            Command::PreviousPage => present_all(presenter, self.prev_page())?,
            Command::Columns => presenter.present(&self.columns())?,
            Command::Info => presenter.present(&self.column_info())?,
            Command::Help => presenter.present(&self.help())?,
            Command::Filter => self.run_filter(input, presenter)?,
            Command::BarChart if self.charts_enabled => self.run_bar_chart(input, presenter)?,
            Command::ScatterChart if self.charts_enabled => {
                self.run_scatter_chart(input, presenter)?
            }
            Command::Quit => {
                self.exited = true;
                presenter.present(&Notice::Farewell.into())?;
            }
            Command::BarChart | Command::ScatterChart | Command::Unknown(_) => {
                presenter.present(&Notice::InvalidCommand(command.to_string()).into())?
            }
        }
        Ok(())
    }

    /// Read-execute-display loop until `quit` or the input runs dry
    pub fn run(
        &mut self,
        input: &mut dyn CommandSource,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        info!(
            "Session started on '{}' ({} rows, page size {})",
            self.model.name,
            self.model.row_count(),
            self.page_size
        );
        present_all(presenter, self.start())?;

        while !self.exited {
            match input.read_line(COMMAND_PROMPT)? {
                Some(line) => self.execute(Command::parse(&line), input, presenter)?,
                None => {
                    debug!("Input exhausted, ending session");
                    self.exited = true;
                    presenter.present(&Notice::Farewell.into())?;
                }
            }
        }

        info!("Session ended at row {}", self.current_row);
        Ok(())
    }

    /// Read and validate one column token. `Ok(None)` means the command
    /// was aborted.
    fn read_column(
        &self,
        prompt: &str,
        input: &mut dyn CommandSource,
        presenter: &mut dyn Presenter,
    ) -> Result<Option<usize>> {
        let Some(token) = input.read_line(prompt)? else {
            return Ok(None);
        };
        match self.select_column(&token) {
            Ok(index) => Ok(Some(index)),
            Err(notice) => {
                presenter.present(&notice.into())?;
                Ok(None)
            }
        }
    }

    fn run_filter(
        &self,
        input: &mut dyn CommandSource,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        presenter.present(&self.columns())?;
        let Some(column) = self.read_column(FILTER_COLUMN_PROMPT, input, presenter)? else {
            return Ok(());
        };

        let prompt = format!(
            "Digite o valor para filtrar na coluna '{}': ",
            self.model.column_names()[column]
        );
        let Some(value) = input.read_line(&prompt)? else {
            return Ok(());
        };
        presenter.present(&self.filter(column, value.trim()))
    }

    fn run_bar_chart(
        &self,
        input: &mut dyn CommandSource,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        presenter.present(&self.columns())?;
        if let Some(column) = self.read_column(BAR_COLUMN_PROMPT, input, presenter)? {
            presenter.present(&self.bar_chart(column))?;
        }
        Ok(())
    }

    fn run_scatter_chart(
        &self,
        input: &mut dyn CommandSource,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        presenter.present(&self.columns())?;
        let Some(x) = self.read_column(SCATTER_X_PROMPT, input, presenter)? else {
            return Ok(());
        };
        let Some(y) = self.read_column(SCATTER_Y_PROMPT, input, presenter)? else {
            return Ok(());
        };
        presenter.present(&self.scatter_chart(x, y))
    }
}

fn present_all(presenter: &mut dyn Presenter, outputs: Vec<Output>) -> Result<()> {
    for output in &outputs {
        presenter.present(output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataColumn, DataRow, DataValue};
    use crate::input::ScriptedInput;
    use crate::ui::presenter::RecordingPresenter;

    fn numbered_table(rows: usize) -> Arc<DataTable> {
        let mut table = DataTable::new("numbers");
        table.add_column(DataColumn::new("n"));
        for i in 0..rows {
            table
                .add_row(DataRow::new(vec![DataValue::Integer(i as i64)]))
                .unwrap();
        }
        table.infer_column_types();
        Arc::new(table)
    }

    fn city_prices() -> Arc<DataTable> {
        let mut table = DataTable::new("prices");
        table.add_column(DataColumn::new("city"));
        table.add_column(DataColumn::new("price"));
        for (city, price) in [("A", 100), ("B", 200), ("A", 150)] {
            table
                .add_row(DataRow::new(vec![
                    DataValue::String(city.to_string()),
                    DataValue::Integer(price),
                ]))
                .unwrap();
        }
        table.infer_column_types();
        Arc::new(table)
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let options = NavigatorOptions {
            page_size: 0,
            ..NavigatorOptions::default()
        };
        assert_eq!(
            Navigator::with_options(numbered_table(3), options).err(),
            Some(NavigatorError::InvalidPageSize)
        );
    }

    #[test]
    fn test_initial_page_small_table() {
        let nav = Navigator::new(city_prices());
        let page = nav.current_page();
        assert_eq!(page.start_row, 1);
        assert_eq!(page.end_row, 3);
        assert_eq!(page.total_rows, 3);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.page_label(), "Página 1 de 1");
    }

    #[test]
    fn test_paging_twenty_five_rows() {
        let mut nav = Navigator::new(numbered_table(25));

        nav.next_page();
        assert_eq!(nav.current_row(), 10);
        nav.next_page();
        assert_eq!(nav.current_row(), 20);

        let outputs = nav.next_page();
        assert_eq!(nav.current_row(), 20);
        assert_eq!(outputs[0], Output::Notice(Notice::LastPage));
        match &outputs[1] {
            Output::Page(page) => {
                assert_eq!(page.start_row, 21);
                assert_eq!(page.end_row, 25);
                assert_eq!(page.rows.len(), 5);
                assert_eq!(page.page_label(), "Página 3 de 3");
            }
            other => panic!("expected page, got {:?}", other),
        }
    }

    #[test]
    fn test_prev_at_start_is_noop() {
        let mut nav = Navigator::new(numbered_table(25));
        let outputs = nav.prev_page();
        assert_eq!(nav.current_row(), 0);
        assert_eq!(outputs[0], Output::Notice(Notice::FirstPage));
        assert!(matches!(outputs[1], Output::Page(_)));
    }

    #[test]
    fn test_empty_table_page() {
        let mut nav = Navigator::new(numbered_table(0));
        let page = nav.current_page();
        assert_eq!(page.range_label(), "Mostrando linhas 0 a 0 de 0:");
        assert_eq!(page.page_label(), "Página 1 de 1");

        assert_eq!(nav.next_page()[0], Output::Notice(Notice::LastPage));
        assert_eq!(nav.prev_page()[0], Output::Notice(Notice::FirstPage));
        assert_eq!(nav.current_row(), 0);
    }

    #[test]
    fn test_page_count_modes() {
        assert_eq!(PageCountMode::Exact.page_count(20, 10), 2);
        assert_eq!(PageCountMode::Legacy.page_count(20, 10), 3);
        assert_eq!(PageCountMode::Exact.page_count(21, 10), 3);
        assert_eq!(PageCountMode::Legacy.page_count(21, 10), 3);
        assert_eq!(PageCountMode::Exact.page_count(0, 10), 1);
        assert_eq!(PageCountMode::Legacy.page_count(0, 10), 1);
    }

    #[test]
    fn test_filter_matches() {
        let nav = Navigator::new(city_prices());
        match nav.filter(0, "A") {
            Output::FilterResult(result) => {
                assert_eq!(result.column, "city");
                assert_eq!(result.rows.len(), 2);
                assert_eq!(result.rows[1].get(1), Some(&DataValue::Integer(150)));
            }
            other => panic!("expected filter result, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_no_match_keeps_cursor() {
        let mut nav = Navigator::new(numbered_table(25));
        nav.next_page();
        let output = nav.filter(0, "999");
        assert_eq!(
            output,
            Output::Notice(Notice::NoMatch {
                value: "999".to_string()
            })
        );
        assert_eq!(nav.current_row(), 10);
    }

    #[test]
    fn test_select_column_validation() {
        let nav = Navigator::new(city_prices());
        assert_eq!(nav.select_column("1"), Ok(1));
        assert_eq!(
            nav.select_column("xx"),
            Err(Notice::InvalidColumnToken("xx".to_string()))
        );
        assert_eq!(
            nav.select_column("2"),
            Err(Notice::ColumnOutOfRange {
                index: 2,
                column_count: 2
            })
        );
    }

    #[test]
    fn test_filter_flow_reads_column_then_value() {
        let mut nav = Navigator::new(city_prices());
        let mut input = ScriptedInput::new(["1", " 200 "]);
        let mut presenter = RecordingPresenter::default();

        nav.execute(Command::Filter, &mut input, &mut presenter)
            .unwrap();

        assert_eq!(
            input.prompts(),
            &[
                FILTER_COLUMN_PROMPT.to_string(),
                "Digite o valor para filtrar na coluna 'price': ".to_string()
            ]
        );
        assert!(matches!(presenter.outputs()[0], Output::Columns(_)));
        match &presenter.outputs()[1] {
            Output::FilterResult(result) => {
                assert_eq!(result.value, "200");
                assert_eq!(result.rows.len(), 1);
            }
            other => panic!("expected filter result, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_flow_aborts_on_bad_token() {
        let mut nav = Navigator::new(city_prices());
        let mut input = ScriptedInput::new(["xx", "A"]);
        let mut presenter = RecordingPresenter::default();

        nav.execute(Command::Filter, &mut input, &mut presenter)
            .unwrap();

        assert_eq!(
            presenter.notices(),
            vec![Notice::InvalidColumnToken("xx".to_string())]
        );
        // the value prompt was never shown
        assert_eq!(input.remaining(), 1);
        assert_eq!(nav.current_row(), 0);
    }

    #[test]
    fn test_charts_disabled_are_invalid_commands() {
        let options = NavigatorOptions {
            charts_enabled: false,
            ..NavigatorOptions::default()
        };
        let mut nav = Navigator::with_options(city_prices(), options).unwrap();
        let mut input = ScriptedInput::new(["0"]);
        let mut presenter = RecordingPresenter::default();

        nav.execute(Command::BarChart, &mut input, &mut presenter)
            .unwrap();

        assert_eq!(
            presenter.notices(),
            vec![Notice::InvalidCommand("bar".to_string())]
        );
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn test_bar_chart_counts() {
        let nav = Navigator::new(city_prices());
        assert_eq!(
            nav.bar_chart(0),
            Output::Chart(ChartRequest::Bar {
                column: "city".to_string(),
                counts: vec![
                    (DataValue::String("A".to_string()), 2),
                    (DataValue::String("B".to_string()), 1),
                ],
            })
        );
    }

    #[test]
    fn test_scatter_requires_numeric_columns() {
        let nav = Navigator::new(city_prices());
        assert_eq!(
            nav.scatter_chart(0, 1),
            Output::Notice(Notice::NonNumericColumn {
                column: "city".to_string()
            })
        );
        match nav.scatter_chart(1, 1) {
            Output::Chart(ChartRequest::Scatter { points, .. }) => assert_eq!(points.len(), 3),
            other => panic!("expected scatter, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_command_reports_invalid() {
        let mut nav = Navigator::new(city_prices());
        let mut input = ScriptedInput::default();
        let mut presenter = RecordingPresenter::default();

        nav.execute(Command::parse("  "), &mut input, &mut presenter)
            .unwrap();

        assert!(!nav.is_exited());
        assert_eq!(
            presenter.notices(),
            vec![Notice::InvalidCommand(String::new())]
        );
    }

    #[test]
    fn test_quit_sets_exited() {
        let mut nav = Navigator::new(city_prices());
        let mut input = ScriptedInput::default();
        let mut presenter = RecordingPresenter::default();

        nav.execute(Command::Quit, &mut input, &mut presenter)
            .unwrap();

        assert!(nav.is_exited());
        assert_eq!(presenter.notices(), vec![Notice::Farewell]);
    }
}
