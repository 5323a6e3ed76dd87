#![cfg(feature = "parallel")]

use approx::assert_relative_eq;
use jacobian_ad::{
    forward_jacobian, forward_jacobian_par, forward_jacobian_par_into, Dual, Error, Extent,
    JacobianConfig,
};

fn f(v: &mut [Dual<f64>]) -> Vec<Dual<f64>> {
    let n = v.len();
    (0..n)
        .map(|i| v[i].sin() * v[(i + 1) % n] + v[i].exp())
        .collect()
}

fn point(n: usize) -> Vec<Dual<f64>> {
    (0..n).map(|i| Dual::constant(0.1 * i as f64 + 0.3)).collect()
}

#[test]
fn matches_serial_forward_mode() {
    let x = point(12);
    let serial = forward_jacobian(&x, f).unwrap();
    let par = forward_jacobian_par(&x, f, &JacobianConfig::default()).unwrap();
    assert_eq!(serial.len(), par.len());
    for (rs, rp) in serial.iter().zip(&par) {
        for (s, p) in rs.iter().zip(rp) {
            assert_relative_eq!(*s, *p, max_relative = 1e-14);
        }
    }
}

#[test]
fn fills_caller_rows() {
    let x = point(4);
    let mut jac = vec![vec![f64::NAN; 4]; 4];
    forward_jacobian_par_into(&x, f, jac.iter_mut(), &JacobianConfig::default()).unwrap();
    assert!(jac.iter().flatten().all(|c| c.is_finite()));
}

#[test]
fn rejects_wrong_row_count() {
    let x = point(3);
    let mut jac = vec![vec![0.0; 3]; 2];
    let err = forward_jacobian_par_into(&x, f, jac.iter_mut(), &JacobianConfig::default())
        .unwrap_err();
    assert_eq!(
        err,
        Error::DimensionMismatch {
            what: Extent::Rows,
            expected: 3,
            actual: 2,
        }
    );
}

#[test]
fn rejects_declared_codomain_mismatch() {
    let config = JacobianConfig::default().with_codomain(5);
    assert!(matches!(
        forward_jacobian_par(&point(3), f, &config),
        Err(Error::DimensionMismatch {
            what: Extent::Outputs,
            expected: 5,
            actual: 3,
        })
    ));
}
