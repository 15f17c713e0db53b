use forecast_math::MathError;
use std::io;
use stock_forecast::ForecastError;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Solver failures surface as fit errors
    let math_error = MathError::NotConverged { iterations: 10 };
    let forecast_error = ForecastError::from(math_error);
    match forecast_error {
        ForecastError::ModelFit(msg) => assert!(msg.contains("10 iterations")),
        other => panic!("Expected ModelFit variant, got {:?}", other),
    }

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::JsonError(_)
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidHorizon("horizon must be positive, got 0".to_string());
    let error_string = format!("{}", error);
    assert_eq!(error_string, "Invalid horizon: horizon must be positive, got 0");

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_input_errors_distinguished_from_fit_errors() {
    let input_errors = [
        ForecastError::InsufficientData("1 observation".to_string()),
        ForecastError::MalformedSeries("duplicate date".to_string()),
        ForecastError::InvalidHorizon("0".to_string()),
    ];
    for error in &input_errors {
        assert!(error.is_input_error(), "{} should be an input error", error);
    }

    let fit_error = ForecastError::ModelFit("all feature values are identical".to_string());
    assert!(!fit_error.is_input_error());
}
