use assert_approx_eq::assert_approx_eq;
use forecast_math::forecast_accuracy;
use stock_forecast::models::LinearRegressor;
use stock_forecast::{ForecastEngine, TrainingSet};

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let accuracy = forecast_accuracy(&predicted, &actual).unwrap();

    assert_approx_eq!(accuracy.mae, 2.4, 1e-9);
    assert_approx_eq!(accuracy.mse, 6.0, 1e-9);
    assert_approx_eq!(accuracy.rmse, 6.0_f64.sqrt(), 1e-9);
    // percentages, not fractions
    assert_approx_eq!(accuracy.mape, 10.3, 1e-9);
    assert!(accuracy.smape > 0.0 && accuracy.smape < 15.0);
}

#[test]
fn test_holdout_scores_the_tail() {
    let features: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let mut targets: Vec<f64> = features.iter().map(|x| 2.0 * x).collect();
    targets[8] = 17.0;
    targets[9] = 20.0;
    let training = TrainingSet::new(features, targets).unwrap();

    let engine = ForecastEngine::new(LinearRegressor::new()).with_holdout(Some(0.2));
    let accuracy = engine.holdout_accuracy(&training).unwrap().unwrap();

    // the line is fitted on the first eight points only
    assert_approx_eq!(accuracy.mae, 1.5, 1e-9);
    assert_approx_eq!(accuracy.mse, 2.5, 1e-9);
}

#[test]
fn test_holdout_skipped_when_disabled_or_too_short() {
    let training = TrainingSet::new(vec![0.0, 1.0], vec![1.0, 2.0]).unwrap();

    let disabled = ForecastEngine::new(LinearRegressor::new()).with_holdout(None);
    assert!(disabled.holdout_accuracy(&training).unwrap().is_none());

    // one point held out leaves a single training point
    let short = ForecastEngine::new(LinearRegressor::new()).with_holdout(Some(0.1));
    assert!(short.holdout_accuracy(&training).unwrap().is_none());
}
