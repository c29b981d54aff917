use std::cell::RefCell;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spsa_optimizer::{
    ExtraArg, ExtraArgs, IterationReport, ObjectiveError, ParamVector, PlainObjective, Spsa,
    SpsaConfig,
};

fn sphere(theta: &[f64], _: &ExtraArgs) -> f64 {
    theta.iter().map(|x| x * x).sum()
}

#[test]
fn seeded_runs_are_bit_identical() {
    let config = SpsaConfig::new(250)
        .with_progress_stride(10)
        .with_seed(1234);
    let start = [0.3, -2.0, 5.0, 1.0];

    let a = Spsa::new(config.clone())
        .run(&mut PlainObjective::new(sphere), start)
        .unwrap();
    let b = Spsa::new(config)
        .run(&mut PlainObjective::new(sphere), start)
        .unwrap();

    assert_eq!(a.theta, b.theta);
    assert_eq!(a.value.to_bits(), b.value.to_bits());
    assert_eq!(a.progress, b.progress);
}

#[test]
fn different_seeds_take_different_paths() {
    let start = [0.3, -2.0, 5.0, 1.0, 4.0];
    let a = Spsa::new(SpsaConfig::new(20).with_seed(1))
        .run(&mut PlainObjective::new(sphere), start)
        .unwrap();
    let b = Spsa::new(SpsaConfig::new(20).with_seed(2))
        .run(&mut PlainObjective::new(sphere), start)
        .unwrap();
    assert_ne!(a.theta, b.theta);
}

#[test]
fn injected_rng_matches_seeded_rng() {
    let start = [1.0, 2.0, 3.0];
    let seeded = Spsa::new(SpsaConfig::new(50).with_seed(77))
        .run(&mut PlainObjective::new(sphere), start)
        .unwrap();
    // The injected source wins over config.seed.
    let injected = Spsa::with_rng(SpsaConfig::new(50).with_seed(1), ChaCha8Rng::seed_from_u64(77))
        .run(&mut PlainObjective::new(sphere), start)
        .unwrap();
    assert_eq!(seeded.theta, injected.theta);
}

#[test]
fn progress_log_has_floor_n_over_stride_entries() {
    for (n_iter, stride) in [(100, 7), (100, 10), (5, 10), (1, 1), (0, 3)] {
        let config = SpsaConfig::new(n_iter).with_progress_stride(stride).with_seed(0);
        let outcome = Spsa::new(config)
            .run(&mut PlainObjective::new(sphere), [1.0, 1.0])
            .unwrap();
        let progress = outcome.progress.unwrap();
        assert_eq!(outcome.iterations, n_iter);
        assert_eq!(progress.len(), n_iter / stride, "n_iter={n_iter} stride={stride}");
        for (i, sample) in progress.samples().iter().enumerate() {
            assert_eq!(sample.iteration, (i + 1) * stride);
        }
    }
}

#[test]
fn no_progress_stride_means_no_log() {
    let outcome = Spsa::new(SpsaConfig::new(10).with_seed(0))
        .run(&mut PlainObjective::new(sphere), [1.0])
        .unwrap();
    assert!(outcome.progress.is_none());
}

#[test]
fn evaluation_count_matches_schedule() {
    let calls = RefCell::new(0usize);
    let mut f = PlainObjective::new(|theta: &[f64], _: &ExtraArgs| {
        *calls.borrow_mut() += 1;
        sphere(theta, &ExtraArgs::empty())
    });

    let (n_iter, progress, report) = (50, 7, 5);
    let config = SpsaConfig::new(n_iter)
        .with_progress_stride(progress)
        .with_report_stride(report)
        .with_seed(4);
    let outcome = Spsa::new(config).run(&mut f, [1.0, -1.0, 2.0]).unwrap();

    let expected = 2 * n_iter + n_iter / progress + n_iter / report + 1;
    assert_eq!(outcome.evaluations, expected);
    assert_eq!(*calls.borrow(), expected);
}

#[test]
fn plain_run_uses_two_evaluations_per_iteration_plus_final() {
    let outcome = Spsa::new(SpsaConfig::new(40).with_seed(4))
        .run(&mut PlainObjective::new(sphere), ParamVector::zeros(100))
        .unwrap();
    assert_eq!(outcome.evaluations, 81);
}

#[test]
fn bounds_hold_after_every_iteration() {
    let lower = [-0.5, 0.0, 1.0];
    let upper = [0.5, 2.0, 1.5];
    // Linear objective pushes every coordinate towards the upper bound.
    let mut f = PlainObjective::new(|theta: &[f64], _: &ExtraArgs| -theta.iter().sum::<f64>());
    let mut violations = Vec::new();
    let mut reports = 0;
    let mut observer = |r: &IterationReport| {
        reports += 1;
        for i in 0..3 {
            if r.theta[i] < lower[i] || r.theta[i] > upper[i] {
                violations.push((r.iteration, i, r.theta[i]));
            }
        }
    };
    let config = SpsaConfig::new(300)
        .with_theta_min(lower)
        .with_theta_max(upper)
        .with_report_stride(1)
        .with_gains(spsa_optimizer::GainSchedule::default().with_a(5.0))
        .with_seed(10);
    let outcome = Spsa::new(config)
        .run_with_observer(&mut f, [0.0, 1.0, 1.2], &mut observer)
        .unwrap();

    assert_eq!(reports, 300);
    assert!(violations.is_empty(), "out of bounds: {violations:?}");
    assert!(outcome.value < -2.0);
}

#[test]
fn extra_arguments_reach_every_call_unchanged() {
    let expected: ExtraArgs = vec![
        ExtraArg::from("Extra parameter"),
        ExtraArg::from(42_i64),
        ExtraArg::from(serde_json::json!({"scale": 2.0})),
    ]
    .into_iter()
    .collect();

    let seen = RefCell::new(Vec::new());
    let mut f = |theta: &[f64], extra: &ExtraArgs| -> Result<f64, ObjectiveError> {
        seen.borrow_mut().push(extra.clone());
        Ok(theta.iter().map(|x| x * x).sum())
    };
    let config = SpsaConfig::new(25)
        .with_extra_args(expected.iter().cloned())
        .with_progress_stride(5)
        .with_seed(3);
    let outcome = Spsa::new(config).run(&mut f, [1.0, 2.0]).unwrap();

    let seen = seen.into_inner();
    assert_eq!(seen.len(), outcome.evaluations);
    assert!(seen.iter().all(|extra| *extra == expected));
}

#[test]
fn missing_extras_are_passed_as_empty() {
    let mut f = |_: &[f64], extra: &ExtraArgs| -> Result<f64, ObjectiveError> {
        if extra.is_empty() {
            Ok(0.0)
        } else {
            Err("unexpected extras".into())
        }
    };
    Spsa::new(SpsaConfig::new(3).with_seed(0))
        .run(&mut f, [0.0])
        .unwrap();
}
