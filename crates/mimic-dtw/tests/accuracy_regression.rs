//! Accuracy regression tests for mimic-dtw.
//!
//! Pin alignment costs, warping paths, and DBA barycenters for small
//! hand-checkable frame sequences so that changes to the recurrence or its
//! tie order are caught.

use mimic_dtw::{DbaConfig, Dtw, Frame, Manhattan, Sequence};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn frames(values: &[(f64, f64, f64)]) -> Vec<Frame> {
    values.iter().copied().map(Frame::from).collect()
}

fn wave(n: usize) -> Vec<Frame> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.5;
            Frame::new(t.sin(), t.cos(), 0.0)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// a) alignment costs and paths
// ---------------------------------------------------------------------------

#[test]
fn alignments_match_known_values() {
    let cases: Vec<(Vec<Frame>, Vec<Frame>, f64, f64, Vec<(usize, usize)>)> = vec![
        (
            frames(&[(0.0, 0.0, 0.0); 3]),
            frames(&[(1.0, 1.0, 1.0); 3]),
            5.196152422706632,
            9.0,
            vec![(0, 0), (1, 1), (2, 2)],
        ),
        (
            frames(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 0.0, 0.0)]),
            frames(&[(0.0, 0.0, 0.0); 3]),
            1.0,
            1.0,
            vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
        ),
        (
            frames(&[(1.0, 0.0, 0.0), (2.0, 0.0, 0.0), (3.0, 0.0, 0.0)]),
            frames(&[(3.0, 0.0, 0.0), (2.0, 0.0, 0.0), (1.0, 0.0, 0.0)]),
            4.0,
            4.0,
            vec![(0, 0), (1, 1), (2, 2)],
        ),
        (
            frames(&[(0.0, 0.0, 0.0)]),
            frames(&[(3.0, 4.0, 12.0)]),
            13.0,
            19.0,
            vec![(0, 0)],
        ),
        (
            frames(&[(0.0, 1.0, 0.0), (0.0, 2.0, 0.0), (0.0, 3.0, 0.0), (0.0, 4.0, 0.0)]),
            frames(&[(0.0, 1.0, 0.0), (0.0, 4.0, 0.0)]),
            2.0,
            2.0,
            vec![(0, 0), (1, 0), (2, 1), (3, 1)],
        ),
        (
            frames(&[(1.0, 1.0, 0.0), (2.0, 2.0, 0.0), (3.0, 3.0, 0.0)]),
            frames(&[
                (1.0, 1.0, 0.0),
                (1.0, 1.0, 0.0),
                (2.0, 2.0, 0.0),
                (2.0, 2.0, 0.0),
                (3.0, 3.0, 0.0),
            ]),
            0.0,
            0.0,
            vec![(0, 0), (0, 1), (1, 2), (1, 3), (2, 4)],
        ),
        (
            frames(&[(0.0, 0.0, 1.0), (0.0, 0.0, -1.0), (0.0, 0.0, 1.0)]),
            frames(&[(0.0, 0.0, -1.0), (0.0, 0.0, 1.0), (0.0, 0.0, -1.0)]),
            4.0,
            4.0,
            vec![(0, 0), (0, 1), (1, 2), (2, 2)],
        ),
    ];

    let euclidean = Dtw::euclidean();
    let manhattan = Dtw::new(Manhattan);
    for (i, (a, b, want, want_l1, want_path)) in cases.iter().enumerate() {
        let alignment = euclidean.align(a, b);
        let got = alignment.distance.value();
        assert!(
            (got - want).abs() < 1e-10,
            "case {i}: got {got:.15}, expected {want:.15}"
        );
        let path: Vec<(usize, usize)> = alignment.path.steps().iter().map(|s| (s.a, s.b)).collect();
        assert_eq!(&path, want_path, "case {i}: path mismatch");
        assert!(alignment.path.is_boundary_constrained(a.len(), b.len()));

        let rolling = euclidean.distance(a, b).value();
        assert!((rolling - got).abs() < 1e-10, "case {i}: rolling {rolling}");

        let l1 = manhattan.distance(a, b).value();
        assert!((l1 - want_l1).abs() < 1e-10, "case {i}: manhattan {l1}");
    }
}

// ---------------------------------------------------------------------------
// b) DBA barycenters
// ---------------------------------------------------------------------------

#[test]
fn dba_of_speed_variants_recovers_the_wave() {
    let short = wave(10);
    let medium = wave(12);
    let long = wave(14);
    let result = DbaConfig::new()
        .average(&[medium.clone(), long, short])
        .expect("valid input");

    assert_eq!(result.average.len(), 12);
    assert_eq!(result.iterations, 2);
    assert!(result.converged);
    for (i, (got, want)) in result.average.as_slice().iter().zip(&medium).enumerate().take(10) {
        assert!((got.x - want.x).abs() < 1e-9, "frame {i}: x {}", got.x);
        assert!((got.y - want.y).abs() < 1e-9, "frame {i}: y {}", got.y);
    }
    // The last two indices absorb the extra frames of the longer variant.
    let tail = result.average[10];
    assert!((tail.x - -0.9651262223304581).abs() < 1e-9);
    assert!((tail.y - 0.11884285716522426).abs() < 1e-9);
    let last = result.average[11];
    assert!((last.x - -0.4905812557833983).abs() < 1e-9);
    assert!((last.y - 0.6286603323060259).abs() < 1e-9);
}

#[test]
fn dba_average_is_a_valid_sequence() {
    let inputs: Vec<Sequence> = [6, 8, 9, 7]
        .iter()
        .map(|&n| Sequence::new(wave(n)).expect("finite"))
        .collect();
    let result = DbaConfig::new().with_max_iter(3).average(&inputs).expect("valid input");
    assert_eq!(result.average.len(), 6);
    assert!(result.iterations <= 3);
    assert!(result.final_change.is_finite());
}
