/// A single line of the command reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub key: &'static str,
    pub description: &'static str,
}

const fn entry(key: &'static str, description: &'static str) -> HelpEntry {
    HelpEntry { key, description }
}

const BASE_COMMANDS: [HelpEntry; 6] = [
    entry("n", "Próxima página"),
    entry("p", "Página anterior"),
    entry("c", "Listar colunas"),
    entry("f", "Filtrar por uma coluna (seleção por número)"),
    entry("i", "Resumo de qualidade das colunas"),
    entry("h", "Exibir ajuda"),
];

const CHART_COMMANDS: [HelpEntry; 2] = [
    entry("b", "Gráfico de barras da contagem de valores de uma coluna"),
    entry("s", "Gráfico de dispersão de duas colunas numéricas"),
];

const QUIT: HelpEntry = entry("q", "Sair");

/// Manages the command reference shown by `h`
pub struct HelpText;

impl HelpText {
    pub const TITLE: &'static str = "Comandos disponíveis:";

    /// Commands in display order; chart commands only when charts are on
    pub fn entries(charts_enabled: bool) -> Vec<HelpEntry> {
        let mut entries = BASE_COMMANDS.to_vec();
        if charts_enabled {
            entries.extend(CHART_COMMANDS);
        }
        entries.push(QUIT);
        entries
    }
}
