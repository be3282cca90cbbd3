// History service - Use case for building a player-count chart
use crate::application::status_client::StatusClient;
use crate::domain::error::ClientError;
use crate::domain::history::{ChartConfiguration, HistorySeries, TimeWindow};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryChart {
    /// Nothing recorded in the window; show an empty state.
    Empty { window: TimeWindow },
    Ready {
        window: TimeWindow,
        series: HistorySeries,
        config: ChartConfiguration,
    },
}

impl HistoryChart {
    /// Build a chart from raw samples without touching the input.
    pub fn from_series(series: &HistorySeries, window: TimeWindow) -> Self {
        if series.is_empty() {
            return HistoryChart::Empty { window };
        }

        let sorted = series.sort_ascending();
        let config = ChartConfiguration::compute(&sorted, window);
        HistoryChart::Ready {
            window,
            series: sorted,
            config,
        }
    }

    /// `(sample index, label)` pairs for the X axis.
    pub fn x_labels(&self) -> Vec<(usize, String)> {
        match self {
            HistoryChart::Empty { .. } => Vec::new(),
            HistoryChart::Ready { series, config, .. } => config
                .label_indices(series.len())
                .into_iter()
                .map(|i| {
                    let label = config.time_label_format.format(series.samples[i].timestamp_ms);
                    (i, label)
                })
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct HistoryService {
    client: Arc<StatusClient>,
}

impl HistoryService {
    pub fn new(client: Arc<StatusClient>) -> Self {
        Self { client }
    }

    pub async fn load_chart(
        &self,
        address: &str,
        port: u16,
        window: TimeWindow,
    ) -> Result<HistoryChart, ClientError> {
        let series = self.client.fetch_history(address, port, window).await?;
        tracing::debug!(
            "Loaded {} history samples for {}:{} ({})",
            series.len(),
            address,
            port,
            window.label()
        );
        Ok(HistoryChart::from_series(&series, window))
    }
}
