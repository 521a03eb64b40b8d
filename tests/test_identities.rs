//! Minor conditions in polymorphism minions of known templates

use pcsp_rs::identities::conditions::{cyclic, hageman_mitschke, olsak, siggers, wnu};
use pcsp_rs::identities::{loop_condition, parse_identities};
use pcsp_rs::indicator::{
    check_minor_condition, satisfies_minor_condition, solve_minor_condition,
};
use pcsp_rs::solver::{CspSolver, Options};
use pcsp_rs::structure::library::{affine, clique, cycle, hornsat, nae, ocycle, onein};

fn solver() -> CspSolver {
    CspSolver::new(Options::default())
}

#[test]
fn binary_polymorphisms_of_k3() {
    let sigma = parse_identities(&["p(x,y) = p(x,y)"]).unwrap();
    let solutions = solve_minor_condition(&clique(3), &clique(3), &sigma, &solver())
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(solutions.len(), 12);
}

#[test]
fn pixley_for_one_in_three_vs_nae() {
    let sigma = parse_identities(&["p(xxy) = p(yxx) = p(yxy) = p(yyy)"]).unwrap();
    let witness = check_minor_condition(&onein(3), &nae(2, 3), &sigma, &solver()).unwrap();
    let witness = witness.expect("1-in-3 vs NAE has a Pixley polymorphism");

    let p = &witness["p"];
    for x in 0..2 {
        for y in 0..2 {
            let value = p.apply(&[x, x, y]).copied();
            assert_eq!(value, p.apply(&[y, x, x]).copied());
            assert_eq!(value, p.apply(&[y, x, y]).copied());
            assert_eq!(value, p.apply(&[y, y, y]).copied());
        }
    }
    assert!(satisfies_minor_condition(&witness, &sigma).unwrap());
}

#[test]
fn equations_fail_barto_kozik() {
    let sigma = parse_identities(&[
        "u(xxy) = u(xyx) = u(yxx) = d(xy)",
        "v(xxxy) = v(xxyx) = v(xyxx) = v(yxxx) = d(xy)",
    ])
    .unwrap();
    let witness = check_minor_condition(&affine(2, 3), &affine(2, 3), &sigma, &solver()).unwrap();
    assert!(witness.is_none());
}

#[test]
fn horn_sat_has_a_set_function() {
    let sigma = parse_identities(&["d(xy) = d(yx) = t(xxy) = t(xyy)", "t(xyz) = t(yzx)"]).unwrap();
    let witness = check_minor_condition(&hornsat(), &hornsat(), &sigma, &solver()).unwrap();
    let witness = witness.expect("Horn-SAT has a semilattice");
    assert_eq!(witness["t"].arity(), 3);
    assert!(satisfies_minor_condition(&witness, &sigma).unwrap());
}

#[test]
fn c5_to_k4_has_no_cyclic_ternary_polymorphism() {
    let parsed = parse_identities(&["c(xyz) = c(yzx)"]).unwrap();
    assert!(check_minor_condition(&cycle(5), &clique(4), &parsed, &solver())
        .unwrap()
        .is_none());

    let looped = loop_condition(&ocycle(3)).unwrap();
    assert!(check_minor_condition(&cycle(5), &clique(4), &looped, &solver())
        .unwrap()
        .is_none());
}

#[test]
fn equations_have_siggers() {
    for sigma in [loop_condition(&clique(3)).unwrap(), siggers(6).unwrap(), siggers(4).unwrap()] {
        let witness = check_minor_condition(&affine(2, 3), &affine(2, 3), &sigma, &solver()).unwrap();
        assert!(witness.is_some());
    }
}

#[test]
fn equations_have_a_minority() {
    let witness = check_minor_condition(&affine(2, 3), &affine(2, 3), &wnu(3).unwrap(), &solver())
        .unwrap()
        .expect("x + y + z is a weak near-unanimity");
    let w = &witness["w"];
    assert_eq!(w.apply(&[1, 0, 0]), w.apply(&[0, 1, 0]));
}

#[test]
fn maltsev_separates_equations_from_horn() {
    let maltsev = hageman_mitschke(1).unwrap();
    assert!(check_minor_condition(&affine(2, 3), &affine(2, 3), &maltsev, &solver())
        .unwrap()
        .is_some());
    assert!(check_minor_condition(&hornsat(), &hornsat(), &maltsev, &solver())
        .unwrap()
        .is_none());
}

#[test]
fn one_in_three_vs_nae_has_no_ternary_cyclic() {
    // three rows of 1-in-3 form a permutation matrix, whose columns are
    // cyclic shifts of each other, so a cyclic operation is constant on them
    let c3 = cyclic(3).unwrap();
    assert!(check_minor_condition(&onein(3), &nae(2, 3), &c3, &solver())
        .unwrap()
        .is_none());
}

#[test]
fn olsak_shape() {
    let o = olsak(2, 3).unwrap();
    assert_eq!(o.num_constraints(), 3);
    assert_eq!(o.size_of(&"i0".to_string()), Some(2));
}
