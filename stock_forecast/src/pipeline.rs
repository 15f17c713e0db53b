//! Request entry points: symbol and horizon in, chart out

use crate::chart::ForecastChart;
use crate::config::ForecastConfig;
use crate::engine::{validate_horizon, ForecastEngine};
use crate::error::Result;
use crate::models::{GridSearchSvr, LinearRegressor, ModelKind, Regressor, SvrRegressor};
use crate::preparation::{prepare, PreparedData};
use crate::series::HistoricalSeries;
use crate::source::PriceSource;
use tracing::info;

/// Forecast `horizon_days` periods of a ticker's closing price.
///
/// The symbol is resolved through `source`; every other step is pure and
/// retrains a fresh model, so concurrent calls do not interact.
pub fn prediction<S: PriceSource + ?Sized>(
    source: &S,
    symbol: &str,
    horizon_days: i64,
    config: &ForecastConfig,
) -> Result<ForecastChart> {
    // reject a bad request before touching the source
    check_request(horizon_days, config)?;

    let series = source.history(symbol)?;
    forecast_checked(symbol, &series, horizon_days, config)
}

/// Forecast from a series the caller already holds
pub fn forecast_series(
    symbol: &str,
    series: &HistoricalSeries,
    horizon_days: i64,
    config: &ForecastConfig,
) -> Result<ForecastChart> {
    check_request(horizon_days, config)?;
    forecast_checked(symbol, series, horizon_days, config)
}

fn check_request(horizon_days: i64, config: &ForecastConfig) -> Result<()> {
    config.validate()?;
    validate_horizon(horizon_days, config.max_horizon)?;
    Ok(())
}

fn forecast_checked(
    symbol: &str,
    series: &HistoricalSeries,
    horizon_days: i64,
    config: &ForecastConfig,
) -> Result<ForecastChart> {
    let prepared = prepare(series, config.preparation_options())?;

    info!(
        symbol,
        observations = series.len(),
        horizon = horizon_days,
        model = ?config.model,
        "forecasting"
    );

    match config.model {
        ModelKind::Svr => run(SvrRegressor::new(config.svr)?, symbol, series, &prepared, horizon_days, config),
        ModelKind::Linear => run(LinearRegressor::new(), symbol, series, &prepared, horizon_days, config),
        ModelKind::GridSearch => run(
            GridSearchSvr::new(config.grid.clone(), config.svr)?,
            symbol,
            series,
            &prepared,
            horizon_days,
            config,
        ),
    }
}

fn run<R: Regressor>(
    regressor: R,
    symbol: &str,
    series: &HistoricalSeries,
    prepared: &PreparedData,
    horizon_days: i64,
    config: &ForecastConfig,
) -> Result<ForecastChart> {
    let engine = ForecastEngine::new(regressor)
        .with_max_horizon(config.max_horizon)
        .with_holdout(config.holdout_ratio);
    let output = engine.run(prepared, horizon_days)?;

    Ok(ForecastChart {
        symbol: symbol.to_string(),
        model: output.model,
        historical: series.points().to_vec(),
        forecast: output.forecast,
        validation: output.validation,
    })
}
