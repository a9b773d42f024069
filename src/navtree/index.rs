use serde::Serialize;

/// Anchors that open each `navtreeindexN.js` chunk, in generator order.
///
/// The order is whatever the generator wrote. It is never re-sorted; lookups
/// scan it the same way the viewer does.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnchorIndex {
    entries: Vec<String>,
}

/// The index chunk a page lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexChunk {
    pub position: usize,
    /// No entry sorts at or before the url; the viewer falls back to the
    /// first root page.
    pub fallback: bool,
}

impl IndexChunk {
    pub fn script_name(&self) -> String {
        format!("navtreeindex{}", self.position)
    }
}

impl AnchorIndex {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the first entry that sorts before its predecessor.
    pub fn first_unsorted(&self) -> Option<usize> {
        self.entries
            .windows(2)
            .position(|pair| pair[0] > pair[1])
            .map(|position| position + 1)
    }

    pub fn is_sorted(&self) -> bool {
        self.first_unsorted().is_none()
    }

    /// Picks the chunk holding `url`: the last entry of the leading run that
    /// compares less than or equal to it.
    pub fn chunk_for(&self, url: &str) -> Option<IndexChunk> {
        if self.entries.is_empty() {
            return None;
        }
        let run = self
            .entries
            .iter()
            .take_while(|entry| entry.as_str() <= url)
            .count();
        Some(match run {
            0 => IndexChunk {
                position: 0,
                fallback: true,
            },
            run => IndexChunk {
                position: run - 1,
                fallback: false,
            },
        })
    }
}
