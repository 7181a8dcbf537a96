use super::types::PageLink;

pub const PREVIOUS_LABEL: &str = "« Previous";
pub const NEXT_LABEL: &str = "Next »";
pub const GAP_LABEL: &str = "...";

/// Page numbers to render around `current`, with `None` marking a gap.
///
/// The first and last page are always present. Pages within `on_each_side`
/// of the current page are listed; everything else collapses into a gap.
/// A gap that would hide a single page shows that page instead.
pub fn page_numbers(current: u64, last: u64, on_each_side: u64) -> Vec<Option<u64>> {
    let last = last.max(1);
    let current = current.clamp(1, last);

    let window_start = current.saturating_sub(on_each_side).max(1);
    let window_end = current.saturating_add(on_each_side).min(last);

    let mut pages = Vec::new();

    if window_start > 1 {
        pages.push(Some(1));
        match window_start {
            2 => {}
            3 => pages.push(Some(2)),
            _ => pages.push(None),
        }
    }

    pages.extend((window_start..=window_end).map(Some));

    if window_end < last {
        match last - window_end {
            1 => {}
            2 => pages.push(Some(last - 1)),
            _ => pages.push(None),
        }
        pages.push(Some(last));
    }

    pages
}

/// Build the full link list for a page, Previous/Next included.
///
/// `url_for` maps a page number to the URL the link should point at; it
/// is only called for pages that are reachable (not for gaps, not for
/// Previous on the first page or Next on the last).
pub fn build_links<F>(current: u64, last: u64, on_each_side: u64, url_for: F) -> Vec<PageLink>
where
    F: Fn(u64) -> Option<String>,
{
    let last = last.max(1);
    let current = current.clamp(1, last);
    let mut links = Vec::new();

    links.push(PageLink {
        url: (current > 1).then(|| url_for(current - 1)).flatten(),
        label: PREVIOUS_LABEL.to_string(),
        active: false,
    });

    for entry in page_numbers(current, last, on_each_side) {
        match entry {
            Some(n) => links.push(PageLink {
                url: url_for(n),
                label: n.to_string(),
                active: n == current,
            }),
            None => links.push(PageLink {
                url: None,
                label: GAP_LABEL.to_string(),
                active: false,
            }),
        }
    }

    links.push(PageLink {
        url: (current < last).then(|| url_for(current + 1)).flatten(),
        label: NEXT_LABEL.to_string(),
        active: false,
    });

    links
}
