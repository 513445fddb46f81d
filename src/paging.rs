//! Lazy, index-addressable access to paged list endpoints.
//!
//! [`Pages`] fetches page 1 on first use and takes its length as the page
//! size. Non-negative indices walk forward page by page; negative indices
//! need the list length, which costs one request for the last page once its
//! number is known (from the `Link` header, or by walking to the first short
//! page). Every fetched page stays cached for the lifetime of the `Pages`.

use std::collections::BTreeMap;
use std::ops::{Bound, RangeBounds};

use tracing::debug;

use crate::error::{Error, Result};

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of the last page, when the server advertised it.
    pub last_page: Option<u32>,
}

/// Anything that can produce numbered pages (1-based).
///
/// A source that ignores the page number and keeps returning the same items
/// is treated as ending at the first repeat.
pub trait PageSource<T> {
    fn fetch_page(&self, page: u32) -> Result<Page<T>>;
}

/// A list endpoint seen as a lazily loaded sequence.
///
/// `Pages` also iterates, yielding `Result<T>` and stopping after the last
/// item or the first error.
pub struct Pages<'a, T> {
    source: Box<dyn PageSource<T> + 'a>,
    pages: BTreeMap<u32, Vec<T>>,
    page_size: Option<usize>,
    last_page: Option<u32>,
    cursor: usize,
    done: bool,
}

impl<'a, T: Clone + PartialEq> Pages<'a, T> {
    pub fn new(source: impl PageSource<T> + 'a) -> Self {
        Self {
            source: Box::new(source),
            pages: BTreeMap::new(),
            page_size: None,
            last_page: None,
            cursor: 0,
            done: false,
        }
    }

    /// Item at `index`; negative values count from the end.
    pub fn get(&mut self, index: isize) -> Result<T> {
        let resolved = if index < 0 {
            let len = self.len()?;
            len.checked_sub(index.unsigned_abs())
                .ok_or(Error::IndexOutOfRange {
                    index,
                    len: Some(len),
                })?
        } else {
            index as usize
        };

        let size = self.page_size()?;
        if size == 0 {
            return Err(Error::IndexOutOfRange {
                index,
                len: Some(0),
            });
        }
        let target =
            page_of(resolved, size).ok_or(Error::IndexOutOfRange { index, len: None })?;

        // Forward access walks every page in between; from-the-end access
        // already knows the total and jumps straight to the target.
        if index >= 0 {
            for n in 2..target {
                if self.beyond_end(n) {
                    return Err(Error::IndexOutOfRange { index, len: None });
                }
                self.load(n)?;
            }
        }
        if self.beyond_end(target) {
            return Err(Error::IndexOutOfRange { index, len: None });
        }
        self.load(target)?;
        if self.beyond_end(target) {
            return Err(Error::IndexOutOfRange { index, len: None });
        }
        self.pages[&target]
            .get(resolved % size)
            .cloned()
            .ok_or(Error::IndexOutOfRange { index, len: None })
    }

    /// Total number of items. Fetches page 1 and the last page, plus any
    /// pages needed to find the last one when the server sent no `Link`.
    pub fn len(&mut self) -> Result<usize> {
        let size = self.page_size()?;
        if size == 0 {
            return Ok(0);
        }
        let last = match self.last_page {
            Some(last) => last,
            None => self.walk_to_end()?,
        };
        if last == 0 {
            return Ok(0);
        }
        let tail = self.load(last)?.len();
        Ok((last as usize - 1) * size + tail)
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.page_size()? == 0)
    }

    /// Items in `range`, clamped to the list like slicing a finite sequence.
    /// Negative bounds count from the end.
    pub fn slice(&mut self, range: impl RangeBounds<isize>) -> Result<Vec<T>> {
        let negative_start = matches!(
            range.start_bound(),
            Bound::Included(&i) | Bound::Excluded(&i) if i < 0
        );
        let open_or_negative_end = !matches!(
            range.end_bound(),
            Bound::Included(&i) | Bound::Excluded(&i) if i >= 0
        );
        let needs_len = negative_start || open_or_negative_end;
        let len = if needs_len {
            Some(self.len()? as isize)
        } else {
            None
        };
        // Negative bounds are resolved before an inclusive end is widened.
        let resolve = |i: isize| match len {
            Some(len) if i < 0 => len + i,
            _ => i,
        };

        let start = match range.start_bound() {
            Bound::Included(&s) => resolve(s),
            Bound::Excluded(&s) => resolve(s).saturating_add(1),
            Bound::Unbounded => 0,
        }
        .max(0);
        let end = match range.end_bound() {
            Bound::Included(&e) => resolve(e).saturating_add(1),
            Bound::Excluded(&e) => resolve(e),
            Bound::Unbounded => len.unwrap_or(0),
        };
        let end = len.map_or(end, |len| end.min(len));

        let mut out = Vec::new();
        for i in start..end {
            match self.get(i) {
                Ok(item) => out.push(item),
                Err(Error::IndexOutOfRange { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Numbers of the pages fetched so far, ascending.
    pub fn fetched_pages(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    /// Page size, fetching page 1 if needed.
    fn page_size(&mut self) -> Result<usize> {
        if self.page_size.is_none() {
            self.load(1)?;
        }
        Ok(self.page_size.unwrap_or(0))
    }

    fn beyond_end(&self, page: u32) -> bool {
        self.last_page.is_some_and(|last| page > last)
    }

    fn repeats_previous(&self, n: u32, items: &[T]) -> bool {
        n > 1 && self.pages.get(&(n - 1)).is_some_and(|prev| prev.as_slice() == items)
    }

    fn walk_to_end(&mut self) -> Result<u32> {
        let mut n = 1;
        loop {
            if let Some(last) = self.last_page {
                return Ok(last);
            }
            n += 1;
            self.load(n)?;
        }
    }

    fn load(&mut self, n: u32) -> Result<&Vec<T>> {
        if !self.pages.contains_key(&n) {
            debug!(page = n, "fetching page");
            let page = self.source.fetch_page(n)?;
            self.record(n, &page);
            self.pages.insert(n, page.items);
        }
        Ok(&self.pages[&n])
    }

    fn record(&mut self, n: u32, page: &Page<T>) {
        let count = page.items.len();
        if n == 1 {
            self.page_size = Some(count);
        }
        if self.last_page.is_none() {
            self.last_page = page.last_page;
        }
        if self.last_page.is_none() && count > 0 && self.repeats_previous(n, &page.items) {
            debug!(page = n, "page repeats its predecessor, treating as end of list");
            self.last_page = Some(n - 1);
            return;
        }
        let size = self.page_size.unwrap_or(count);
        if count == 0 {
            self.last_page = Some(n - 1);
        } else if count < size {
            self.last_page = Some(n);
        }
    }
}

impl<T: Clone + PartialEq> Iterator for Pages<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.get(self.cursor as isize) {
            Ok(item) => {
                self.cursor += 1;
                Some(Ok(item))
            }
            Err(Error::IndexOutOfRange { .. }) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<T> std::fmt::Debug for Pages<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pages")
            .field("fetched", &self.pages.keys().collect::<Vec<_>>())
            .field("page_size", &self.page_size)
            .field("last_page", &self.last_page)
            .finish()
    }
}

/// 1-based page holding `index`, `None` when it cannot be addressed.
fn page_of(index: usize, size: usize) -> Option<u32> {
    u32::try_from(index / size).ok()?.checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Serves `total` integers in pages of `size`, recording every request.
    struct Numbers {
        total: usize,
        size: usize,
        link: bool,
        requests: RefCell<Vec<u32>>,
    }

    impl Numbers {
        fn new(total: usize, size: usize) -> Self {
            Self {
                total,
                size,
                link: true,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource<usize> for &Numbers {
        fn fetch_page(&self, page: u32) -> Result<Page<usize>> {
            self.requests.borrow_mut().push(page);
            let start = (page as usize - 1) * self.size;
            let end = (start + self.size).min(self.total);
            let last = self.total.div_ceil(self.size).max(1) as u32;
            Ok(Page {
                items: (start.min(end)..end).collect(),
                last_page: self.link.then_some(last),
            })
        }
    }

    #[test]
    fn forward_index_walks_intermediate_pages() {
        let src = Numbers::new(100, 20);
        let mut pages = Pages::new(&src);
        assert_eq!(pages.get(45).unwrap(), 45);
        assert_eq!(*src.requests.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn negative_index_skips_middle_pages() {
        let src = Numbers::new(95, 20);
        let mut pages = Pages::new(&src);
        assert_eq!(pages.get(-1).unwrap(), 94);
        assert_eq!(*src.requests.borrow(), vec![1, 5]);
        assert_eq!(pages.get(-20).unwrap(), 75);
        assert_eq!(*src.requests.borrow(), vec![1, 5, 4]);
    }

    #[test]
    fn pages_are_cached() {
        let src = Numbers::new(50, 20);
        let mut pages = Pages::new(&src);
        pages.get(30).unwrap();
        pages.get(21).unwrap();
        pages.get(0).unwrap();
        assert_eq!(*src.requests.borrow(), vec![1, 2]);
        assert_eq!(pages.fetched_pages(), vec![1, 2]);
    }

    #[test]
    fn index_past_end_is_out_of_range() {
        let src = Numbers::new(30, 20);
        let mut pages = Pages::new(&src);
        assert!(matches!(pages.get(30), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(pages.get(-31), Err(Error::IndexOutOfRange { .. })));
        assert_eq!(pages.get(-30).unwrap(), 0);
    }

    #[test]
    fn len_without_link_header_walks_to_short_page() {
        let mut src = Numbers::new(45, 20);
        src.link = false;
        let mut pages = Pages::new(&src);
        assert_eq!(pages.len().unwrap(), 45);
        assert_eq!(*src.requests.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn exact_multiple_without_link_needs_empty_page() {
        let mut src = Numbers::new(40, 20);
        src.link = false;
        let mut pages = Pages::new(&src);
        assert_eq!(pages.len().unwrap(), 40);
        assert_eq!(pages.get(-1).unwrap(), 39);
        assert_eq!(*src.requests.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_list() {
        let src = Numbers::new(0, 20);
        let mut pages = Pages::new(&src);
        assert!(pages.is_empty().unwrap());
        assert_eq!(pages.len().unwrap(), 0);
        assert!(matches!(pages.get(0), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(pages.get(-1), Err(Error::IndexOutOfRange { .. })));
        assert!(pages.next().is_none());
    }

    #[test]
    fn slice_clamps_and_accepts_negative_bounds() {
        let src = Numbers::new(50, 20);
        let mut pages = Pages::new(&src);
        assert_eq!(pages.slice(18..22).unwrap(), vec![18, 19, 20, 21]);
        assert_eq!(pages.slice(-3..).unwrap(), vec![47, 48, 49]);
        assert_eq!(pages.slice(45..60).unwrap(), vec![45, 46, 47, 48, 49]);
        assert_eq!(pages.slice(..=2).unwrap(), vec![0, 1, 2]);
        assert!(pages.slice(-2..-5).unwrap().is_empty());
        assert_eq!(pages.slice(..=-1).unwrap(), (0..50).collect::<Vec<_>>());
        assert_eq!(pages.slice(-3..=-1).unwrap(), vec![47, 48, 49]);
        assert_eq!(pages.slice(-2..=-2).unwrap(), vec![48]);
        assert_eq!(pages.slice(-200..2).unwrap(), vec![0, 1]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn unaddressable_page_is_out_of_range() {
        let src = Numbers::new(100, 20);
        let mut pages = Pages::new(&src);
        assert!(matches!(
            pages.get(((20usize << 32) | 5) as isize),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            pages.get((u32::MAX as usize * 20) as isize),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert_eq!(*src.requests.borrow(), vec![1]);
    }

    #[test]
    fn page_numbers() {
        assert_eq!(page_of(0, 20), Some(1));
        assert_eq!(page_of(45, 20), Some(3));
        assert_eq!(page_of(u32::MAX as usize * 20, 20), None);
    }

    /// Ignores the page number and always answers with the same items.
    struct Stuck {
        requests: RefCell<Vec<u32>>,
    }

    impl PageSource<u8> for &Stuck {
        fn fetch_page(&self, page: u32) -> Result<Page<u8>> {
            self.requests.borrow_mut().push(page);
            Ok(Page {
                items: vec![7, 8],
                last_page: None,
            })
        }
    }

    #[test]
    fn repeated_page_ends_the_list() {
        let src = Stuck {
            requests: RefCell::new(Vec::new()),
        };
        let mut pages = Pages::new(&src);
        assert_eq!(pages.len().unwrap(), 2);
        let all: Vec<u8> = pages.map(|r| r.unwrap()).collect();
        assert_eq!(all, vec![7, 8]);
        assert_eq!(*src.requests.borrow(), vec![1, 2]);
    }

    #[test]
    fn iterator_yields_everything_once() {
        let src = Numbers::new(41, 20);
        let pages = Pages::new(&src);
        let all: Vec<usize> = pages.map(|r| r.unwrap()).collect();
        assert_eq!(all, (0..41).collect::<Vec<_>>());
        assert_eq!(*src.requests.borrow(), vec![1, 2, 3]);
    }

    struct Failing;

    impl PageSource<u8> for Failing {
        fn fetch_page(&self, _page: u32) -> Result<Page<u8>> {
            Err(Error::InvalidArgument("boom".into()))
        }
    }

    #[test]
    fn iterator_stops_after_first_error() {
        let mut pages = Pages::new(Failing);
        assert!(matches!(pages.next(), Some(Err(Error::InvalidArgument(_)))));
        assert!(pages.next().is_none());
    }
}
