use assert_approx_eq::assert_approx_eq;
use stock_forecast::error::ForecastError;
use stock_forecast::metrics::evaluate;

#[test]
fn test_perfect_prediction_scores_perfectly() {
    let actual = vec![10.0, 20.0, 30.0, 40.0];
    let metrics = evaluate(&actual, &actual).unwrap();

    assert_approx_eq!(metrics.mae, 0.0);
    assert_approx_eq!(metrics.mse, 0.0);
    assert_approx_eq!(metrics.rmse, 0.0);
    assert_approx_eq!(metrics.r2, 1.0);
    assert_approx_eq!(metrics.mape.unwrap(), 0.0);
}

#[test]
fn test_known_error_values() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];
    let metrics = evaluate(&actual, &predicted).unwrap();

    assert_approx_eq!(metrics.mae, 2.4, 1e-9);
    assert_approx_eq!(metrics.mse, 6.0, 1e-9);
    assert_approx_eq!(metrics.rmse, 6.0_f64.sqrt(), 1e-9);
    // SS_res = 30, SS_tot = 1000
    assert_approx_eq!(metrics.r2, 0.97, 1e-9);
    // (20 + 10 + 10 + 7.5 + 4) / 5
    assert_approx_eq!(metrics.mape.unwrap(), 10.3, 1e-9);
}

#[test]
fn test_mape_excludes_zero_actuals() {
    // Must not raise a division error; the zero-actual pair is dropped and
    // the remaining pair still contributes
    let metrics = evaluate(&[0.0, 10.0], &[1.0, 9.0]).unwrap();
    assert_approx_eq!(metrics.mape.unwrap(), 10.0, 1e-9);
    assert_approx_eq!(metrics.mae, 1.0, 1e-9);
}

#[test]
fn test_mape_undefined_when_all_actuals_zero() {
    let metrics = evaluate(&[0.0, 0.0], &[1.0, 2.0]).unwrap();
    assert!(metrics.mape.is_none());
}

#[test]
fn test_constant_actuals_r2_degenerate_case() {
    let actual = vec![5.0, 5.0, 5.0];
    assert_approx_eq!(evaluate(&actual, &actual).unwrap().r2, 1.0);
    assert_approx_eq!(
        evaluate(&actual, &[5.0, 6.0, 4.0]).unwrap().r2,
        0.0
    );
}

#[test]
fn test_shape_preconditions() {
    assert!(matches!(
        evaluate(&[], &[]),
        Err(ForecastError::ValidationError(_))
    ));
    assert!(matches!(
        evaluate(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::ValidationError(_))
    ));
}
