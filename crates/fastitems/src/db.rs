//! The in-memory item list served by `GET /items/`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FakeItem {
    pub item_name: &'static str,
}

pub static FAKE_ITEMS_DB: [FakeItem; 3] = [
    FakeItem { item_name: "Foo" },
    FakeItem { item_name: "Bar" },
    FakeItem { item_name: "Baz" },
];

/// `FAKE_ITEMS_DB[skip:skip + limit]` with Python slice semantics:
/// negative bounds count from the end and out-of-range bounds clamp.
pub fn page(skip: i64, limit: i64) -> &'static [FakeItem] {
    let (start, end) = slice_bounds(FAKE_ITEMS_DB.len(), skip, skip.saturating_add(limit));
    &FAKE_ITEMS_DB[start..end]
}

fn slice_bounds(len: usize, start: i64, stop: i64) -> (usize, usize) {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let clamp = |i: i64| {
        if i < 0 {
            (i + len).max(0)
        } else {
            i.min(len)
        }
    };

    let start = clamp(start);
    let stop = clamp(stop).max(start);
    // both are within 0..=len here
    (start as usize, stop as usize)
}
