use crate::analyzer::AnalyzerClient;
use crate::config::Config;
use crate::history::HistoryStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analyzer: AnalyzerClient,
    pub history: HistoryStore,
}
