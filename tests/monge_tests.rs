use logdiff::error::Error;
use logdiff::monge::BitonicMongeArray;

fn distance(a: &i64, b: &i64) -> i64 {
    (a - b).abs()
}

fn pairs(reds: &[i64], blues: &[i64]) -> Vec<(i64, i64)> {
    BitonicMongeArray::new(reds, blues, distance)
        .unwrap()
        .perfmatch()
        .into_iter()
        .map(|m| {
            let (cost, blue) = m.expect("every red is matched");
            (cost, *blue)
        })
        .collect()
}

#[test]
fn square_input_matches_identity_diagonal() {
    assert_eq!(
        pairs(&[1, 10, 20, 32], &[2, 4, 5, 10]),
        vec![(1, 2), (6, 4), (15, 5), (22, 10)]
    );
}

#[test]
fn rectangular_input_matches_reference_pairs() {
    assert_eq!(
        pairs(&[1, 3, 10, 20, 21], &[2, 4, 5, 11, 18, 32, 45]),
        vec![(1, 2), (1, 4), (1, 11), (2, 18), (11, 32)]
    );
}

#[test]
fn harder_fixture_matches_reference_pairs() {
    assert_eq!(
        pairs(
            &[17, 69, 119, 132, 215, 282, 317],
            &[33, 76, 120, 133, 150, 175, 256, 328, 355, 375, 403, 456]
        ),
        vec![(16, 33), (7, 76), (1, 120), (1, 133), (40, 175), (26, 256), (11, 328)]
    );
}

#[test]
fn cheaper_row_to_blue_pair_wins() {
    assert_eq!(pairs(&[56, 62, 91], &[21, 56, 62, 91]), vec![(35, 21), (0, 62), (0, 91)]);
}

#[test]
fn costs_equal_distance_to_matched_blue() {
    let reds = [3.5, 7.25, 40.0];
    let blues = [1.0, 3.0, 8.0, 39.5, 100.0];
    let matrix = BitonicMongeArray::new(&reds, &blues, |a: &f64, b: &f64| (a - b).abs()).unwrap();
    let matched = matrix.perfmatch_complete().unwrap();
    assert_eq!(matched.len(), reds.len());
    for (red, (cost, blue)) in reds.iter().zip(matched) {
        assert_eq!(cost, (red - blue).abs());
    }
}

#[test]
fn more_reds_than_blues_is_rejected() {
    let result = BitonicMongeArray::new(&[1, 2, 3], &[1, 2], distance);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn band_dimensions() {
    let matrix = BitonicMongeArray::new(&[1, 2], &[1, 2, 3, 4, 5], distance).unwrap();
    assert_eq!(matrix.height(), 2);
    assert_eq!(matrix.diagonals_amount(), 4);
}

#[test]
fn empty_reds_produce_empty_matching() {
    let reds: [i64; 0] = [];
    let matrix = BitonicMongeArray::new(&reds, &[1, 2], distance).unwrap();
    assert!(matrix.perfmatch().is_empty());
}

#[test]
fn show_brackets_matched_cells() {
    let matrix = BitonicMongeArray::new(&[1, 10], &[2, 4, 5], distance).unwrap();
    let mut out = String::new();
    matrix.show(&mut out).unwrap();

    assert_eq!(out.lines().count(), 3);
    assert_eq!(out.matches('[').count(), 2);
    // 1 -> 2 and 10 -> 4 minimise the total
    assert!(out.lines().nth(1).unwrap().contains("[1"));
    assert!(out.lines().nth(2).unwrap().contains("[6"));
}
