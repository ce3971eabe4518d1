use txpage_core::errors::PagerError;
use txpage_core::pagination::{clamp_page, compute_range, max_page, PageRequest};

#[test]
fn pages_tile_the_ledger_without_gaps_or_overlap() {
    for total in 0..=60u64 {
        for size in 1..=7u64 {
            let mut covered = vec![0u32; total as usize];
            for page in 1..=max_page(total, size) {
                let range = compute_range(total, size, Some(page as i64)).unwrap();
                assert!(range.len() <= size, "total {total} size {size} page {page}");
                for seq in range.start..range.end {
                    covered[seq as usize] += 1;
                }
            }
            assert!(
                covered.iter().all(|c| *c == 1),
                "total {total} size {size}: {covered:?}"
            );
        }
    }
}

#[test]
fn each_page_ends_where_the_previous_one_starts() {
    let (total, size) = (1_001u64, 20u64);
    assert_eq!(compute_range(total, size, Some(1)).unwrap().end, total);
    for page in 1..max_page(total, size) {
        let newer = compute_range(total, size, Some(page as i64)).unwrap();
        let older = compute_range(total, size, Some(page as i64 + 1)).unwrap();
        assert_eq!(older.end, newer.start);
        assert!(older.start <= older.end);
    }
}

#[test]
fn bounds_never_increase_with_page_number() {
    for (total, size) in [(45u64, 20u64), (0, 5), (7, 7), (1_000, 3), (99, 100)] {
        let mut previous = compute_range(total, size, Some(1)).unwrap();
        for page in 2..=max_page(total, size) + 1 {
            let Ok(range) = compute_range(total, size, Some(page as i64)) else {
                break;
            };
            assert!(range.start <= previous.start, "total {total} size {size} page {page}");
            assert!(range.end <= previous.end, "total {total} size {size} page {page}");
            previous = range;
        }
    }
}

#[test]
fn range_calculation_is_pure() {
    for page in [-3, 0, 1, 2, 3] {
        assert_eq!(
            compute_range(45, 20, Some(page)),
            compute_range(45, 20, Some(page))
        );
    }
}

#[test]
fn pages_past_the_end_are_invalid_until_clamped() {
    let err = compute_range(45, 20, Some(4)).unwrap_err();
    assert!(matches!(err, PagerError::InvalidRange { page: 4, .. }));
    assert!(err.is_recoverable());
    assert_eq!(clamp_page(Some(4), 45, 20), 3);
    let request = PageRequest::new(4, 20, 45).unwrap().clamped();
    assert_eq!(request.range().unwrap().len(), 5);
}
