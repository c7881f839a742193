use super::*;

#[test]
fn can_access_entries_in_constant_time() {
    let matrix = CostMatrix::new(3, vec![0, 1, 2, 3, 0, 5, 6, 7, 0]).unwrap();

    assert_eq!(matrix.size(), 3);
    assert_eq!(matrix.at(0, 1), 1);
    assert_eq!(matrix.at(2, 1), 7);
    assert_eq!(matrix.cost(1, 2), 5);
    assert_eq!(matrix.duration(2, 0), 6);
}

#[test]
fn cannot_create_matrix_with_wrong_size() {
    assert!(CostMatrix::new(2, vec![0, 1, 2]).is_err());
    assert!(CostMatrix::from_rows(vec![vec![0, 1], vec![2]]).is_err());
}

#[test]
fn can_extract_sub_matrix_keeping_order() {
    let matrix = CostMatrix::new(3, vec![0, 1, 2, 3, 0, 5, 6, 7, 0]).unwrap();

    let sub = matrix.sub_matrix(&[2, 0]);

    assert_eq!(sub.size(), 2);
    assert_eq!(sub.at(0, 0), 0);
    assert_eq!(sub.at(0, 1), 6);
    assert_eq!(sub.at(1, 0), 2);
    assert_eq!(sub.at(1, 1), 0);
}
