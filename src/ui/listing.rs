//! The listing view: composition root of the feed grid.
//!
//! [`ListingView::mount`] is the one-time effect that triggers the feed
//! fetch; [`ListingView::compose`] is the pure projection of the current
//! props into a [`ListingTree`] that the grid renderer draws. Keeping the two
//! apart means recomposing (on every redraw, toggle change or catalog update)
//! can never issue another fetch.

use crate::feed::Feed;
use crate::listing::ListingGroup;

/// Inputs to one composition of the listing.
#[derive(Debug, Clone)]
pub struct ListingProps<'a> {
    pub loading_feeds: bool,
    pub feed_groups: Vec<ListingGroup<'a>>,
    pub enable_health: bool,
    pub compare_offchain: bool,
}

/// What the listing renders. Exactly one of the two states, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingTree<'a> {
    /// Placeholder while the catalog is loading.
    Loading,
    /// One section per group, in group order.
    Loaded(Vec<Section<'a>>),
}

impl<'a> ListingTree<'a> {
    pub fn sections(&self) -> &[Section<'a>] {
        match self {
            Self::Loading => &[],
            Self::Loaded(sections) => sections,
        }
    }

    /// Item widgets in display order, across all sections.
    pub fn items(&self) -> impl Iterator<Item = &GridItemProps<'a>> {
        self.sections().iter().flat_map(|s| s.items.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub caption: String,
    pub items: Vec<GridItemProps<'a>>,
}

/// Input of one grid item widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridItemProps<'a> {
    pub feed: &'a Feed,
    pub compare_offchain: bool,
    pub enable_health: bool,
}

impl GridItemProps<'_> {
    /// Widget identity.
    pub fn key(&self) -> &str {
        &self.feed.name
    }
}

/// Section heading for a group.
pub fn caption(group_name: &str) -> String {
    format!("Decentralized Price Reference Data for {} Pairs", group_name)
}

/// Mount state of the listing.
#[derive(Debug, Default)]
pub struct ListingView {
    mounted: bool,
}

impl ListingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Run the mount effect.
    ///
    /// Calls `fetch_feeds` on the first call after construction or
    /// [`Self::unmount`], and never again for the same mount. Returns
    /// whether the effect ran.
    pub fn mount(&mut self, fetch_feeds: impl FnOnce()) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        tracing::debug!("Listing mounted, triggering feed fetch");
        fetch_feeds();
        true
    }

    /// End the current mount. The next [`Self::mount`] fetches again.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Project props into the render tree.
    pub fn compose<'a>(&self, props: &ListingProps<'a>) -> ListingTree<'a> {
        if props.loading_feeds {
            return ListingTree::Loading;
        }

        let sections = props
            .feed_groups
            .iter()
            .map(|group| Section {
                caption: caption(group.name),
                items: group
                    .feeds
                    .iter()
                    .map(|&feed| GridItemProps {
                        feed,
                        compare_offchain: props.compare_offchain,
                        enable_health: props.enable_health,
                    })
                    .collect(),
            })
            .collect();

        ListingTree::Loaded(sections)
    }
}
