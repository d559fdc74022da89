/// Up to three consecutive page numbers centred on `current`, clamped to `1..=last`.
pub fn page_window(current: u32, last: u32) -> Vec<u32> {
    let (current, last) = (i64::from(current), i64::from(last));
    let mut start = current - 1;
    if start < 1 {
        start = 1;
    } else if start > last - 2 {
        start = (last - 2).max(1);
    }
    (start..start + 3)
        .filter(|page| *page <= last)
        .map(|page| page as u32)
        .collect()
}

pub fn can_go_back(current: u32) -> bool {
    current > 1
}

pub fn can_go_forward(current: u32, last: u32) -> bool {
    current < last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 1), vec![1]);
        assert_eq!(page_window(5, 10), vec![4, 5, 6]);
        assert_eq!(page_window(10, 10), vec![8, 9, 10]);
        assert_eq!(page_window(1, 2), vec![1, 2]);
        assert_eq!(page_window(1, 10), vec![1, 2, 3]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3]);
        assert_eq!(page_window(9, 10), vec![8, 9, 10]);
        // nothing loaded yet
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_page_window_invariants() {
        for last in 0..=25u32 {
            for current in 1..=last.max(1) {
                let window = page_window(current, last);
                assert!(window.len() <= 3.min(last as usize), "{current}/{last}: {window:?}");
                assert!(window.iter().all(|p| *p >= 1 && *p <= last));
                assert!(window.windows(2).all(|w| w[1] == w[0] + 1));
                if last <= 3 {
                    assert_eq!(window, (1..=last).collect::<Vec<_>>());
                } else {
                    assert!(window.contains(&current));
                }
            }
        }
    }

    #[test]
    fn test_paginator_bounds() {
        assert!(!can_go_back(1));
        assert!(can_go_back(2));
        assert!(can_go_forward(1, 2));
        assert!(!can_go_forward(2, 2));
    }
}
