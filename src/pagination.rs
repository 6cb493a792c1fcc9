//! Fixed-size, 1-based paging over an already ordered result set.

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns page `page` of `items`, `page_size` items per page.
///
/// Pages start at 1. A page past the end, or page 0, is an empty slice; the
/// caller decides whether that means "not found".
pub fn paginate<T>(page: usize, page_size: usize, items: &[T]) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(paginate(1, 10, &items), &items[0..10]);
    }

    #[test]
    fn last_page_is_clipped() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(paginate(3, 10, &items), &[20, 21, 22, 23, 24]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<u32> = (0..25).collect();
        assert!(paginate(4, 10, &items).is_empty());
        assert!(paginate(0, 10, &items).is_empty());
        assert!(paginate(usize::MAX, 10, &items).is_empty());
        assert!(paginate(1, 10, &Vec::<u32>::new()).is_empty());
    }

    #[test]
    fn pages_cover_items_without_gaps() {
        let items: Vec<u32> = (0..37).collect();
        for k in 1..=5 {
            let covered: Vec<u32> = (1..=k)
                .flat_map(|p| paginate(p, QUESTIONS_PER_PAGE, &items).iter().copied())
                .collect();
            let expected = &items[..(QUESTIONS_PER_PAGE * k).min(items.len())];
            assert_eq!(covered, expected);
        }
    }
}
