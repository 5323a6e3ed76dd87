//! Tape lifecycle across Jacobian computations: reuse, defaulting, cleanup.

use std::panic::{self, AssertUnwindSafe};

use jacobian_ad::{
    adjoint_jacobian, adjoint_jacobian_into, adjoint_jacobian_with, forward_jacobian, Dual,
    JacobianConfig, Reverse, Tape,
};

fn f_rev(v: &mut [Reverse<f64>]) -> Vec<Reverse<f64>> {
    vec![v[0].sin() * v[1], v[0] * v[1] * v[2], v[2].exp() - v[0]]
}

fn point() -> Vec<Reverse<f64>> {
    [0.3, -1.2, 0.8].iter().map(|&x| Reverse::new(x)).collect()
}

#[test]
fn back_to_back_on_one_tape() {
    let mut tape = Tape::new();
    let config = JacobianConfig::default();
    let x = point();

    let first = adjoint_jacobian_with(&x, f_rev, &config, Some(&mut tape)).unwrap();
    let second = adjoint_jacobian_with(&x, f_rev, &config, Some(&mut tape)).unwrap();
    assert_eq!(first, second);

    let mut third = vec![vec![0.0; 3]; 3];
    adjoint_jacobian_into(&x, f_rev, third.iter_mut(), &config, Some(&mut tape)).unwrap();
    assert_eq!(first, third);
}

#[test]
fn repeated_calls_do_not_grow_the_tape() {
    let mut tape = Tape::new();
    let config = JacobianConfig::default();
    let x = point();

    adjoint_jacobian_with(&x, f_rev, &config, Some(&mut tape)).unwrap();
    let variables = tape.num_variables();
    let statements = tape.num_statements();
    assert!(variables >= x.len());

    for _ in 0..100 {
        adjoint_jacobian_with(&x, f_rev, &config, Some(&mut tape)).unwrap();
        let mut rows = vec![vec![0.0; 3]; 3];
        adjoint_jacobian_into(&x, f_rev, rows.iter_mut(), &config, Some(&mut tape)).unwrap();
    }
    assert_eq!(tape.num_variables(), variables);
    assert_eq!(tape.num_statements(), statements);
}

#[test]
fn active_tape_does_not_grow_across_calls() {
    let mut tape = Tape::<f64>::new();
    let guard = tape.activate();
    adjoint_jacobian(&point(), f_rev).unwrap();
    for _ in 0..50 {
        adjoint_jacobian(&point(), f_rev).unwrap();
    }
    drop(guard);
    let variables = tape.num_variables();

    let mut fresh = Tape::<f64>::new();
    adjoint_jacobian_with(&point(), f_rev, &JacobianConfig::default(), Some(&mut fresh)).unwrap();
    assert_eq!(variables, fresh.num_variables());
}

#[test]
fn reused_tape_matches_fresh_tape() {
    let x = point();
    let mut tape = Tape::new();
    // Leave unrelated state behind on the tape first.
    adjoint_jacobian_with(
        &[Reverse::new(5.0)],
        |v| vec![v[0] * v[0] * v[0]],
        &JacobianConfig::default(),
        Some(&mut tape),
    )
    .unwrap();

    let reused =
        adjoint_jacobian_with(&x, f_rev, &JacobianConfig::default(), Some(&mut tape)).unwrap();
    let fresh = adjoint_jacobian(&x, f_rev).unwrap();
    assert_eq!(reused, fresh);
}

#[test]
fn tape_stays_usable_for_manual_sweeps() {
    let mut tape = Tape::new();
    adjoint_jacobian_with(&point(), f_rev, &JacobianConfig::default(), Some(&mut tape)).unwrap();

    let mut x = Reverse::new(2.0);
    tape.register_input(&mut x);
    tape.new_recording();
    let mut y = {
        let _guard = tape.activate();
        x * x * 3.0
    };
    tape.register_output(&mut y);
    tape.set_derivative(&y, 1.0);
    tape.compute_adjoints();
    assert_eq!(tape.derivative(&x), 12.0);

    tape.clear_derivatives();
    assert_eq!(tape.derivative(&x), 0.0);
}

#[test]
fn caller_tape_is_not_left_active() {
    let mut tape = Tape::<f64>::new();
    adjoint_jacobian_with(&point(), f_rev, &JacobianConfig::default(), Some(&mut tape)).unwrap();
    assert!(!Tape::<f64>::is_active());
    assert!(tape.num_variables() > 0);
}

#[test]
fn temporary_tape_is_scoped_to_the_call() {
    assert!(!Tape::<f64>::is_active());
    adjoint_jacobian(&point(), f_rev).unwrap();
    assert!(!Tape::<f64>::is_active());
}

#[test]
fn active_tape_is_the_default() {
    let mut tape = Tape::<f64>::new();
    let expected = adjoint_jacobian(&point(), f_rev).unwrap();

    let guard = tape.activate();
    let jac = adjoint_jacobian(&point(), f_rev).unwrap();
    assert!(Tape::<f64>::is_active());
    drop(guard);

    assert_eq!(jac, expected);
    assert!(tape.num_variables() > 0, "active tape was not used");
}

#[test]
fn supplied_tape_wins_over_active_tape() {
    let mut active = Tape::<f64>::new();
    let mut supplied = Tape::<f64>::new();

    let guard = active.activate();
    adjoint_jacobian_with(
        &point(),
        f_rev,
        &JacobianConfig::default(),
        Some(&mut supplied),
    )
    .unwrap();
    // The previously active tape is restored after the recorded evaluation.
    assert!(Tape::<f64>::is_active());
    drop(guard);

    assert_eq!(active.num_variables(), 0);
    assert!(supplied.num_variables() > 0);
}

#[test]
fn panicking_function_releases_the_tape() {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        adjoint_jacobian(&point(), |_: &mut [Reverse<f64>]| -> Vec<Reverse<f64>> {
            panic!("boom")
        })
    }));
    assert!(result.is_err());
    assert!(!Tape::<f64>::is_active());
}

#[test]
fn caller_input_is_not_mutated() {
    let x = point();
    adjoint_jacobian(&x, f_rev).unwrap();
    for (xi, &orig) in x.iter().zip(&[0.3, -1.2, 0.8]) {
        assert_eq!(xi.value(), orig);
        assert!(!xi.is_active());
    }

    let xd = [Dual::constant(0.3), Dual::constant(-1.2)];
    forward_jacobian(&xd, |v| vec![v[0] * v[1], v[1].cos()]).unwrap();
    assert_eq!(xd[0].re, 0.3);
    assert_eq!(xd[1].re, -1.2);
    assert_eq!(xd[0].derivative(), 0.0);
    assert_eq!(xd[1].derivative(), 0.0);
}

#[test]
fn caller_tangents_do_not_leak_into_forward_mode() {
    let clean = [Dual::constant(1.5), Dual::constant(0.5)];
    let dirty = [Dual::new(1.5, 7.0), Dual::new(0.5, -3.0)];
    let f = |v: &mut [Dual<f64>]| vec![v[0] * v[1], v[0] - v[1]];
    assert_eq!(
        forward_jacobian(&clean, f).unwrap(),
        forward_jacobian(&dirty, f).unwrap()
    );
}
