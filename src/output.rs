//! Display payloads produced by the navigator.
//!
//! Nothing here touches a terminal. A [`Presenter`](crate::ui::presenter::Presenter)
//! decides how each payload is drawn.

use std::fmt;

use crate::data::datatable::{ColumnSummary, DataRow, DataValue};
use crate::help_text::HelpEntry;

/// One page of rows anchored at the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// 1-based first row shown, 0 for an empty table
    pub start_row: usize,
    /// 1-based last row shown (inclusive)
    pub end_row: usize,
    pub total_rows: usize,
    pub page_number: usize,
    pub page_count: usize,
    pub columns: Vec<String>,
    pub rows: Vec<DataRow>,
}

impl PageView {
    pub fn range_label(&self) -> String {
        format!(
            "Mostrando linhas {} a {} de {}:",
            self.start_row, self.end_row, self.total_rows
        )
    }

    pub fn page_label(&self) -> String {
        format!("Página {} de {}", self.page_number, self.page_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub column: String,
    pub value: String,
    pub columns: Vec<String>,
    pub rows: Vec<DataRow>,
}

/// Validated input handed to a chart renderer
#[derive(Debug, Clone, PartialEq)]
pub enum ChartRequest {
    Bar {
        column: String,
        counts: Vec<(DataValue, usize)>,
    },
    Scatter {
        x_column: String,
        y_column: String,
        points: Vec<(f64, f64)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Non-fatal messages. None of these end the session except `Farewell`,
/// which accompanies `quit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LastPage,
    FirstPage,
    NoMatch { value: String },
    InvalidCommand(String),
    InvalidColumnToken(String),
    ColumnOutOfRange { index: i64, column_count: usize },
    NonNumericColumn { column: String },
    Farewell,
}

impl Notice {
    pub fn kind(&self) -> NoticeKind {
        match self {
            Notice::LastPage | Notice::FirstPage | Notice::NoMatch { .. } | Notice::Farewell => {
                NoticeKind::Info
            }
            Notice::InvalidCommand(_) => NoticeKind::Warning,
            Notice::InvalidColumnToken(_)
            | Notice::ColumnOutOfRange { .. }
            | Notice::NonNumericColumn { .. } => NoticeKind::Error,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LastPage => write!(f, "Você já está na última página!"),
            Notice::FirstPage => write!(f, "Você já está na primeira página!"),
            Notice::NoMatch { value } => {
                write!(f, "Nenhum resultado encontrado para o filtro: {}", value)
            }
            Notice::InvalidCommand(_) => write!(f, "Comando inválido! Digite 'h' para ajuda."),
            Notice::InvalidColumnToken(_) => write!(f, "Entrada inválida. Tente novamente."),
            Notice::ColumnOutOfRange { .. } => write!(f, "Número da coluna inválido!"),
            Notice::NonNumericColumn { column } => {
                write!(f, "A coluna '{}' não é numérica.", column)
            }
            Notice::Farewell => write!(f, "Saindo do programa..."),
        }
    }
}

/// Everything the navigator can ask a presenter to show
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Page(PageView),
    Columns(Vec<(usize, String)>),
    ColumnInfo(Vec<ColumnSummary>),
    FilterResult(FilterResult),
    Help(Vec<HelpEntry>),
    Notice(Notice),
    Chart(ChartRequest),
}

impl From<Notice> for Output {
    fn from(notice: Notice) -> Self {
        Output::Notice(notice)
    }
}
