use spsa_optimizer::{optimize, ExtraArgs, PlainObjective, SpsaConfig};

fn sphere(theta: &[f64], _: &ExtraArgs) -> f64 {
    theta.iter().map(|x| x * x).sum()
}

#[test]
fn sphere_converges_to_origin() {
    for seed in 0..5 {
        let mut f = PlainObjective::new(sphere);
        let config = SpsaConfig::new(1000).with_seed(seed);
        let outcome = optimize(&mut f, [2.0, 3.0, -1.0], &config).unwrap();

        let dist = outcome.theta.distance(&[0.0, 0.0, 0.0]);
        assert!(dist < 0.1, "seed {seed}: ended at {} (distance {dist})", outcome.theta);
        assert!(outcome.value < 0.01);
    }
}

#[test]
fn lower_bounded_sphere_converges_to_corner() {
    let target = [0.5, 0.4, 0.3];
    for seed in 0..5 {
        let mut f = PlainObjective::new(sphere).with_arity(5);
        let config = SpsaConfig::new(1000)
            .with_extra_args(["Extra parameter", "Another parameter"])
            .with_theta_min(target)
            .with_report_stride(5)
            .with_progress_stride(5)
            .with_seed(seed);
        let outcome = optimize(&mut f, [2.0, 3.0, 1.0], &config).unwrap();

        let dist = outcome.theta.distance(&target);
        assert!(dist < 0.1, "seed {seed}: ended at {} (distance {dist})", outcome.theta);
        for (x, min) in outcome.theta.iter().zip(target) {
            assert!(*x >= min);
        }
        assert!((outcome.value - 0.5).abs() < 0.1);

        let progress = outcome.progress.unwrap();
        assert_eq!(progress.len(), 200);
        let first = progress.samples()[0].value;
        let last = progress.last().unwrap().value;
        assert!(last < first);
    }
}

#[test]
fn box_constrained_minimum_on_upper_face() {
    // Unconstrained minimum at (3, 3) lies outside the box.
    let mut f = PlainObjective::new(|theta: &[f64], _: &ExtraArgs| {
        theta.iter().map(|x| (x - 3.0) * (x - 3.0)).sum::<f64>()
    });
    let config = SpsaConfig::new(1500)
        .with_theta_min([-1.0, -1.0])
        .with_theta_max([1.0, 2.0])
        .with_seed(21);
    let outcome = optimize(&mut f, [0.0, 0.0], &config).unwrap();
    assert!(outcome.theta.distance(&[1.0, 2.0]) < 0.1, "ended at {}", outcome.theta);
}
